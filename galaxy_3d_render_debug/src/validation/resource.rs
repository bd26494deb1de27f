/// Sampler, resource array, render target, query and render context validation

use galaxy_3d_render::glam::UVec2;
use galaxy_3d_render::galaxy3d::debug::{ResourceKind, ValidationErrorKind};
use galaxy_3d_render::galaxy3d::render::{
    AttachmentType, QueryDesc, QueryType, RenderContextDesc, RenderingCaps, RenderingFeatures,
    SamplerDesc, TextureDesc,
};
use crate::report::Findings;

pub(crate) fn validate_sampler_desc(findings: &mut Findings, caps: &RenderingCaps, desc: &SamplerDesc) {
    if !caps.has(RenderingFeatures::SAMPLERS) {
        findings.error(ValidationErrorKind::UnsupportedFeature, "sampler objects are not supported");
    }
    if desc.max_anisotropy == 0 || desc.max_anisotropy > caps.max_anisotropy {
        findings.error(
            ValidationErrorKind::LimitExceeded,
            format!("anisotropy {} outside [1, {}]", desc.max_anisotropy, caps.max_anisotropy),
        );
    }
    // Also rejects NaN bounds
    if !(desc.min_lod <= desc.max_lod) {
        findings.error(
            ValidationErrorKind::InvalidArgument,
            format!("min LOD {} is greater than max LOD {}", desc.min_lod, desc.max_lod),
        );
    }
}

/// Check the element count of a buffer, texture or sampler array
pub(crate) fn validate_array_len(findings: &mut Findings, element_kind: ResourceKind, len: usize) {
    if len == 0 {
        findings.error(
            ValidationErrorKind::InvalidArgument,
            format!("{} array must not be empty", element_kind.name()),
        );
    }
}

/// Render target attachment with its texture resolved from the registry
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolvedAttachment<'a> {
    pub attachment_type: AttachmentType,
    pub texture: Option<&'a TextureDesc>,
    pub mip_level: u32,
    pub array_layer: u32,
}

pub(crate) fn validate_render_target(
    findings: &mut Findings,
    caps: &RenderingCaps,
    resolution: UVec2,
    samples: u32,
    attachments: &[ResolvedAttachment<'_>],
) {
    if !caps.has(RenderingFeatures::RENDER_TARGETS) {
        findings.error(ValidationErrorKind::UnsupportedFeature, "render targets are not supported");
    }
    if resolution.x == 0 || resolution.y == 0 {
        findings.error(
            ValidationErrorKind::InvalidArgument,
            format!("render target resolution {}x{} has a zero dimension", resolution.x, resolution.y),
        );
    }
    if samples == 0 || samples > caps.max_samples {
        findings.error(
            ValidationErrorKind::LimitExceeded,
            format!("sample count {} outside [1, {}]", samples, caps.max_samples),
        );
    }
    if attachments.is_empty() {
        findings.error(ValidationErrorKind::InvalidArgument, "render target has no attachment");
        return;
    }

    let color_count = attachments
        .iter()
        .filter(|attachment| attachment.attachment_type == AttachmentType::Color)
        .count();
    if color_count > caps.max_color_attachments as usize {
        findings.error(
            ValidationErrorKind::LimitExceeded,
            format!("{} color attachments exceed limit {}", color_count, caps.max_color_attachments),
        );
    }
    if attachments.len() - color_count > 1 {
        findings.error(
            ValidationErrorKind::InvalidArgument,
            "render target has more than one depth/stencil attachment",
        );
    }

    for (index, attachment) in attachments.iter().enumerate() {
        if let Some(texture) = attachment.texture {
            validate_attachment_texture(findings, index, attachment, texture, resolution);
        }
    }
}

fn validate_attachment_texture(
    findings: &mut Findings,
    index: usize,
    attachment: &ResolvedAttachment<'_>,
    texture: &TextureDesc,
    resolution: UVec2,
) {
    if attachment.attachment_type.is_depth_stencil() != texture.format.is_depth() {
        findings.error(
            ValidationErrorKind::InvalidArgument,
            format!(
                "attachment {}: {:?} attachment with {:?} texture",
                index, attachment.attachment_type, texture.format
            ),
        );
    }
    if matches!(attachment.attachment_type, AttachmentType::Stencil | AttachmentType::DepthStencil)
        && !texture.format.has_stencil()
    {
        findings.error(
            ValidationErrorKind::InvalidArgument,
            format!("attachment {}: {:?} has no stencil component", index, texture.format),
        );
    }
    if attachment.mip_level >= texture.mip_levels {
        findings.error(
            ValidationErrorKind::LimitExceeded,
            format!(
                "attachment {}: mip level {} out of range, texture has {} levels",
                index, attachment.mip_level, texture.mip_levels
            ),
        );
        return;
    }
    if attachment.array_layer >= texture.layer_count() {
        findings.error(
            ValidationErrorKind::RangeViolation,
            format!(
                "attachment {}: layer {} outside [0, {})",
                index, attachment.array_layer, texture.layer_count()
            ),
        );
    }

    let extent = texture.mip_extent(attachment.mip_level);
    if extent.x != resolution.x || extent.y != resolution.y {
        findings.error(
            ValidationErrorKind::SizeMismatch,
            format!(
                "attachment {}: mip {} is {}x{}, render target is {}x{}",
                index, attachment.mip_level, extent.x, extent.y, resolution.x, resolution.y
            ),
        );
    }
}

pub(crate) fn validate_query_desc(findings: &mut Findings, caps: &RenderingCaps, desc: &QueryDesc) {
    if desc.query_type == QueryType::StreamOutPrimitivesWritten && !caps.has(RenderingFeatures::STREAM_OUTPUTS) {
        findings.error(ValidationErrorKind::UnsupportedFeature, "stream-output queries are not supported");
    }
    if desc.render_condition && !desc.query_type.is_occlusion() {
        findings.error(
            ValidationErrorKind::InvalidArgument,
            format!("{:?} queries cannot be used as render conditions", desc.query_type),
        );
    }
}

pub(crate) fn validate_render_context_desc(findings: &mut Findings, caps: &RenderingCaps, desc: &RenderContextDesc) {
    if desc.resolution.x == 0 || desc.resolution.y == 0 {
        findings.error(
            ValidationErrorKind::InvalidArgument,
            format!("resolution {}x{} has a zero dimension", desc.resolution.x, desc.resolution.y),
        );
    }
    if desc.samples == 0 || desc.samples > caps.max_samples {
        findings.error(
            ValidationErrorKind::LimitExceeded,
            format!("sample count {} outside [1, {}]", desc.samples, caps.max_samples),
        );
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
