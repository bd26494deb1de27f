/// Unit tests for sampler, array, render target, query and render context validation.

use crate::validation::resource::*;
use crate::report::Findings;
use galaxy_3d_render::glam::{UVec2, UVec3};
use galaxy_3d_render::galaxy3d::debug::{ResourceKind, ValidationErrorKind};
use galaxy_3d_render::galaxy3d::render::{
    AttachmentType, QueryDesc, QueryType, RenderContextDesc, RenderingCaps, RenderingFeatures,
    SamplerDesc, TextureDesc, TextureFormat, TextureType,
};

fn kinds(findings: &Findings) -> Vec<ValidationErrorKind> {
    findings.items().iter().map(|f| f.kind).collect()
}

// ============================================================================
// Samplers and arrays
// ============================================================================

#[test]
fn test_default_sampler_is_valid() {
    let mut findings = Findings::new("create_sampler");
    validate_sampler_desc(&mut findings, &RenderingCaps::default(), &SamplerDesc::default());
    assert!(kinds(&findings).is_empty());
}

#[test]
fn test_sampler_rules() {
    let desc = SamplerDesc {
        max_anisotropy: 32,
        min_lod: 4.0,
        max_lod: 2.0,
        ..SamplerDesc::default()
    };
    let mut findings = Findings::new("create_sampler");
    validate_sampler_desc(&mut findings, &RenderingCaps::default(), &desc);
    assert_eq!(kinds(&findings), vec![ValidationErrorKind::LimitExceeded, ValidationErrorKind::InvalidArgument]);

    let caps = RenderingCaps {
        features: RenderingFeatures::all() - RenderingFeatures::SAMPLERS,
        ..RenderingCaps::default()
    };
    let mut findings = Findings::new("create_sampler");
    validate_sampler_desc(&mut findings, &caps, &SamplerDesc::default());
    assert_eq!(kinds(&findings), vec![ValidationErrorKind::UnsupportedFeature]);
}

#[test]
fn test_sampler_nan_lod() {
    let desc = SamplerDesc {
        min_lod: f32::NAN,
        ..SamplerDesc::default()
    };
    let mut findings = Findings::new("create_sampler");
    validate_sampler_desc(&mut findings, &RenderingCaps::default(), &desc);
    assert_eq!(kinds(&findings), vec![ValidationErrorKind::InvalidArgument]);
}

#[test]
fn test_empty_array() {
    let mut findings = Findings::new("create_texture_array");
    validate_array_len(&mut findings, ResourceKind::Texture, 0);
    assert_eq!(kinds(&findings), vec![ValidationErrorKind::InvalidArgument]);
    assert_eq!(findings.items()[0].message, "texture array must not be empty");

    let mut findings = Findings::new("create_sampler_array");
    validate_array_len(&mut findings, ResourceKind::Sampler, 2);
    assert!(kinds(&findings).is_empty());
}

// ============================================================================
// Render targets
// ============================================================================

fn color_texture(width: u32, height: u32, mip_levels: u32) -> TextureDesc {
    let mut desc = TextureDesc::new_2d(TextureFormat::R8G8B8A8_UNORM, width, height);
    desc.mip_levels = mip_levels;
    desc
}

fn attachment(attachment_type: AttachmentType, texture: Option<&TextureDesc>) -> ResolvedAttachment<'_> {
    ResolvedAttachment {
        attachment_type,
        texture,
        mip_level: 0,
        array_layer: 0,
    }
}

#[test]
fn test_valid_render_target() {
    let color = color_texture(512, 256, 1);
    let depth = TextureDesc::new_2d(TextureFormat::D24_UNORM_S8_UINT, 512, 256);
    let attachments = [
        attachment(AttachmentType::Color, Some(&color)),
        attachment(AttachmentType::DepthStencil, Some(&depth)),
    ];
    let mut findings = Findings::new("create_render_target");
    validate_render_target(&mut findings, &RenderingCaps::default(), UVec2::new(512, 256), 1, &attachments);
    assert!(kinds(&findings).is_empty());
}

#[test]
fn test_render_target_limits() {
    let caps = RenderingCaps {
        max_color_attachments: 1,
        ..RenderingCaps::default()
    };
    let attachments = [
        attachment(AttachmentType::Color, None),
        attachment(AttachmentType::Color, None),
        attachment(AttachmentType::Depth, None),
        attachment(AttachmentType::Stencil, None),
    ];
    let mut findings = Findings::new("create_render_target");
    validate_render_target(&mut findings, &caps, UVec2::new(0, 64), 16, &attachments);
    assert_eq!(
        kinds(&findings),
        vec![
            ValidationErrorKind::InvalidArgument,
            ValidationErrorKind::LimitExceeded,
            ValidationErrorKind::LimitExceeded,
            ValidationErrorKind::InvalidArgument,
        ]
    );
}

#[test]
fn test_render_target_without_attachments() {
    let mut findings = Findings::new("create_render_target");
    validate_render_target(&mut findings, &RenderingCaps::default(), UVec2::new(64, 64), 1, &[]);
    assert_eq!(kinds(&findings), vec![ValidationErrorKind::InvalidArgument]);
}

#[test]
fn test_attachment_texture_checks() {
    let color = color_texture(512, 512, 2);

    // Mip 1 is 256x256
    let mut mip_one = attachment(AttachmentType::Color, Some(&color));
    mip_one.mip_level = 1;
    let mut findings = Findings::new("create_render_target");
    validate_render_target(&mut findings, &RenderingCaps::default(), UVec2::new(256, 256), 1, &[mip_one]);
    assert!(kinds(&findings).is_empty());

    let mut findings = Findings::new("create_render_target");
    validate_render_target(&mut findings, &RenderingCaps::default(), UVec2::new(512, 256), 1, &[mip_one]);
    assert_eq!(kinds(&findings), vec![ValidationErrorKind::SizeMismatch]);

    let mut bad_mip = mip_one;
    bad_mip.mip_level = 2;
    let mut findings = Findings::new("create_render_target");
    validate_render_target(&mut findings, &RenderingCaps::default(), UVec2::new(128, 128), 1, &[bad_mip]);
    assert_eq!(kinds(&findings), vec![ValidationErrorKind::LimitExceeded]);

    let mut bad_layer = attachment(AttachmentType::Color, Some(&color));
    bad_layer.array_layer = 1;
    let mut findings = Findings::new("create_render_target");
    validate_render_target(&mut findings, &RenderingCaps::default(), UVec2::new(512, 512), 1, &[bad_layer]);
    assert_eq!(kinds(&findings), vec![ValidationErrorKind::RangeViolation]);
}

#[test]
fn test_attachment_format_mismatch() {
    let color = color_texture(64, 64, 1);
    let depth_only = TextureDesc::new_2d(TextureFormat::D32_FLOAT, 64, 64);

    let mut findings = Findings::new("create_render_target");
    validate_render_target(
        &mut findings,
        &RenderingCaps::default(),
        UVec2::new(64, 64),
        1,
        &[attachment(AttachmentType::Depth, Some(&color))],
    );
    assert_eq!(kinds(&findings), vec![ValidationErrorKind::InvalidArgument]);

    let mut findings = Findings::new("create_render_target");
    validate_render_target(
        &mut findings,
        &RenderingCaps::default(),
        UVec2::new(64, 64),
        1,
        &[attachment(AttachmentType::DepthStencil, Some(&depth_only))],
    );
    assert_eq!(kinds(&findings), vec![ValidationErrorKind::InvalidArgument]);
}

#[test]
fn test_cube_face_attachment() {
    let cube = TextureDesc {
        texture_type: TextureType::TextureCube,
        format: TextureFormat::R8G8B8A8_UNORM,
        extent: UVec3::new(128, 128, 1),
        array_layers: 1,
        mip_levels: 1,
        samples: 1,
    };
    let mut face = attachment(AttachmentType::Color, Some(&cube));
    face.array_layer = 5;
    let mut findings = Findings::new("create_render_target");
    validate_render_target(&mut findings, &RenderingCaps::default(), UVec2::new(128, 128), 1, &[face]);
    assert!(kinds(&findings).is_empty());
}

// ============================================================================
// Queries and render contexts
// ============================================================================

#[test]
fn test_query_rules() {
    let mut findings = Findings::new("create_query");
    validate_query_desc(
        &mut findings,
        &RenderingCaps::default(),
        &QueryDesc { query_type: QueryType::AnySamplesPassed, render_condition: true },
    );
    assert!(kinds(&findings).is_empty());

    let mut findings = Findings::new("create_query");
    validate_query_desc(
        &mut findings,
        &RenderingCaps::default(),
        &QueryDesc { query_type: QueryType::TimeElapsed, render_condition: true },
    );
    assert_eq!(kinds(&findings), vec![ValidationErrorKind::InvalidArgument]);

    let caps = RenderingCaps {
        features: RenderingFeatures::all() - RenderingFeatures::STREAM_OUTPUTS,
        ..RenderingCaps::default()
    };
    let mut findings = Findings::new("create_query");
    validate_query_desc(
        &mut findings,
        &caps,
        &QueryDesc { query_type: QueryType::StreamOutPrimitivesWritten, render_condition: false },
    );
    assert_eq!(kinds(&findings), vec![ValidationErrorKind::UnsupportedFeature]);
}

#[test]
fn test_render_context_rules() {
    let mut findings = Findings::new("create_render_context");
    validate_render_context_desc(&mut findings, &RenderingCaps::default(), &RenderContextDesc::default());
    assert!(kinds(&findings).is_empty());

    let desc = RenderContextDesc {
        resolution: UVec2::new(800, 0),
        samples: 0,
        vsync: false,
    };
    let mut findings = Findings::new("create_render_context");
    validate_render_context_desc(&mut findings, &RenderingCaps::default(), &desc);
    assert_eq!(kinds(&findings), vec![ValidationErrorKind::InvalidArgument, ValidationErrorKind::LimitExceeded]);
}
