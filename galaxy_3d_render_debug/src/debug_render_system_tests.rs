/// Unit tests for DebugRenderSystem.
///
/// Every test wraps a MockRenderSystem, which records the calls that reach
/// the backend, so tests can check that rejected calls were never forwarded.

use crate::debug_render_system::*;
use crate::config::{BenignViolationPolicy, DebugLayerConfig};
use crate::registry::{BufferHandle, ShaderHandle, TextureHandle};
use crate::test_utils::CaptureDebugger;
use galaxy_3d_render::glam::{UVec2, UVec3};
use galaxy_3d_render::galaxy3d::{Error, RenderSystem};
use galaxy_3d_render::galaxy3d::debug::{
    DebugSeverity, RenderingProfiler, ResourceKind, ValidationErrorKind,
};
use galaxy_3d_render::galaxy3d::render::*;
use galaxy_3d_render::mock_render_system::{MockBuffer, MockRenderSystem};
use std::sync::Arc;

type DebugMock = DebugRenderSystem<MockRenderSystem>;

fn quiet_config(policy: BenignViolationPolicy) -> DebugLayerConfig {
    DebugLayerConfig {
        benign_policy: policy,
        log_delegations: false,
    }
}

fn setup_with(mock: MockRenderSystem) -> (DebugMock, Arc<CaptureDebugger>, Arc<RenderingProfiler>) {
    let debugger = Arc::new(CaptureDebugger::default());
    let profiler = Arc::new(RenderingProfiler::new());
    let layer = DebugRenderSystem::new(mock, Some(profiler.clone()), Some(debugger.clone()))
        .with_config(quiet_config(BenignViolationPolicy::Warn));
    (layer, debugger, profiler)
}

fn setup() -> (DebugMock, Arc<CaptureDebugger>, Arc<RenderingProfiler>) {
    setup_with(MockRenderSystem::new())
}

/// Kind of the validation error, panics on any other error
fn rejection(err: Error) -> ValidationErrorKind {
    err.as_validation().map(|err| err.kind).expect("expected a validation error")
}

fn mappable_buffer(layer: &mut DebugMock, size: u64) -> BufferHandle {
    let desc = BufferDesc::new(BufferKind::Storage, size)
        .with_cpu_access(CpuAccessFlags::READ | CpuAccessFlags::WRITE);
    layer.create_buffer(&desc, None).unwrap()
}

fn mipmapped_texture(layer: &mut DebugMock, size: u32, mip_levels: u32) -> TextureHandle {
    let mut desc = TextureDesc::new_2d(TextureFormat::R8G8B8A8_UNORM, size, size);
    desc.mip_levels = mip_levels;
    layer.create_texture(&desc, None).unwrap()
}

fn shader(layer: &mut DebugMock, stage: ShaderStage) -> ShaderHandle {
    let desc = ShaderDesc {
        stage,
        source: ShaderSource::Code("void main() {}".to_string()),
        entry_point: "main".to_string(),
    };
    layer.create_shader(&desc).unwrap()
}

fn generated_mip_levels(layer: &DebugMock, texture: TextureHandle) -> u32 {
    layer.registry.textures.lookup(texture, "test").unwrap().meta.generated_mip_levels
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_new_forwards_common_queries() {
    let (layer, debugger, _) = setup();
    assert_eq!(layer.renderer_info().renderer_name, "Mock");
    assert_eq!(layer.rendering_caps(), RenderingCaps::default());
    assert_eq!(layer.shading_language(), ShadingLanguage::SPIRV);
    assert_eq!(layer.renderer_family(), RendererFamily::Unknown);
    assert_eq!(layer.live_object_count(), 0);
    assert!(debugger.reports().is_empty());
}

#[test]
fn test_set_configuration_is_forwarded() {
    let (mut layer, _, _) = setup();
    let config = RenderSystemConfig {
        default_image_color: [255, 0, 255, 255],
    };
    layer.set_configuration(config);
    assert_eq!(layer.instance().config(), config);
}

#[test]
fn test_direct3d_constant_buffer_alignment() {
    let caps = RenderingCaps {
        constant_buffer_alignment: 0,
        ..RenderingCaps::default()
    };
    let desc = BufferDesc::new(BufferKind::Constant, 20);

    let (mut layer, _, _) = setup_with(MockRenderSystem::with_caps(caps.clone()).with_renderer_name("OpenGL 4.5"));
    assert_eq!(layer.renderer_family(), RendererFamily::OpenGL);
    assert!(layer.create_buffer(&desc, None).is_ok());

    let (mut layer, _, _) = setup_with(MockRenderSystem::with_caps(caps).with_renderer_name("Direct3D 11"));
    assert_eq!(layer.renderer_family(), RendererFamily::Direct3D);
    assert_eq!(layer.validation_caps().constant_buffer_alignment, 16);
    // The reported caps are left untouched
    assert_eq!(layer.rendering_caps().constant_buffer_alignment, 0);

    let err = layer.create_buffer(&desc, None).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::AlignmentViolation);
    assert_eq!(layer.instance().call_count("create_buffer"), 0);
}

// ============================================================================
// Buffers
// ============================================================================

#[test]
fn test_write_past_end_is_rejected() {
    let (mut layer, debugger, _) = setup();
    let buffer = layer.create_buffer(&BufferDesc::new(BufferKind::Storage, 256), None).unwrap();

    let err = layer.write_buffer(&buffer, 200, &[0u8; 100]).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::BoundsViolation);
    assert_eq!(layer.instance().call_count("write_buffer"), 0);

    let reports = debugger.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].severity, DebugSeverity::Error);
    assert_eq!(reports[0].source, "write_buffer");
    assert_eq!(reports[0].kind, ValidationErrorKind::BoundsViolation);
}

#[test]
fn test_full_write_is_delegated() {
    let (mut layer, debugger, _) = setup();
    let buffer = layer.create_buffer(&BufferDesc::new(BufferKind::Storage, 1024), None).unwrap();

    layer.write_buffer(&buffer, 0, &[7u8; 1024]).unwrap();
    assert_eq!(layer.instance().call_count("write_buffer"), 1);
    assert!(debugger.reports().is_empty());

    let data = layer.instance().buffer_data(&MockBuffer { id: 1 }).unwrap();
    assert!(data.iter().all(|byte| *byte == 7));
}

#[test]
fn test_typed_write_goes_through_validation() {
    let (mut layer, _, _) = setup();
    let buffer = layer.create_buffer(&BufferDesc::new(BufferKind::Storage, 16), None).unwrap();

    layer.write_buffer_typed(&buffer, 0, &[1.0f32, 2.0, 3.0, 4.0]).unwrap();
    let err = layer.write_buffer_typed(&buffer, 4, &[1.0f32, 2.0, 3.0, 4.0]).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::BoundsViolation);
    assert_eq!(layer.instance().call_count("write_buffer"), 1);
}

#[test]
fn test_zero_length_write_is_a_noop() {
    let (mut layer, debugger, _) = setup();
    let buffer = layer.create_buffer(&BufferDesc::new(BufferKind::Storage, 64), None).unwrap();

    layer.write_buffer(&buffer, 0, &[]).unwrap();
    assert_eq!(layer.instance().call_count("write_buffer"), 0);

    let reports = debugger.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].severity, DebugSeverity::Warning);
    assert_eq!(layer.validation_stats().warnings, 1);
}

#[test]
fn test_initial_data_too_long() {
    let (mut layer, _, _) = setup();
    let err = layer
        .create_buffer(&BufferDesc::new(BufferKind::Storage, 4), Some(&[0u8; 8]))
        .unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::BoundsViolation);
    assert_eq!(layer.live_count(ResourceKind::Buffer), 0);
}

#[test]
fn test_map_twice_is_invalid_state() {
    let (mut layer, _, _) = setup();
    let buffer = mappable_buffer(&mut layer, 64);

    layer.map_buffer(&buffer, CpuAccess::WriteOnly).unwrap()[0] = 42;
    let err = layer.map_buffer(&buffer, CpuAccess::ReadOnly).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::InvalidState);
    assert_eq!(layer.instance().call_count("map_buffer"), 1);
    assert_eq!(layer.instance().buffer_data(&MockBuffer { id: 1 }).unwrap()[0], 42);
}

#[test]
fn test_unmap_without_map_is_invalid_state() {
    let (mut layer, _, _) = setup();
    let buffer = mappable_buffer(&mut layer, 64);

    let err = layer.unmap_buffer(&buffer).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::InvalidState);
    assert_eq!(layer.instance().call_count("unmap_buffer"), 0);
}

#[test]
fn test_unmap_after_unmap_is_invalid_state() {
    let (mut layer, _, _) = setup();
    let buffer = mappable_buffer(&mut layer, 64);

    layer.map_buffer(&buffer, CpuAccess::ReadWrite).unwrap();
    layer.unmap_buffer(&buffer).unwrap();
    let err = layer.unmap_buffer(&buffer).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::InvalidState);
    assert_eq!(layer.instance().call_count("unmap_buffer"), 1);

    // Mapping works again once unmapped
    assert!(layer.map_buffer(&buffer, CpuAccess::ReadOnly).is_ok());
}

#[test]
fn test_map_without_cpu_access() {
    let (mut layer, _, _) = setup();
    let buffer = layer.create_buffer(&BufferDesc::new(BufferKind::Storage, 64), None).unwrap();

    let err = layer.map_buffer(&buffer, CpuAccess::ReadOnly).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::AccessViolation);
}

#[test]
fn test_write_while_mapped() {
    let (mut layer, _, _) = setup();
    let buffer = mappable_buffer(&mut layer, 64);
    layer.map_buffer(&buffer, CpuAccess::WriteOnly).unwrap();

    let err = layer.write_buffer(&buffer, 0, &[1, 2, 3]).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::AccessViolation);

    layer.unmap_buffer(&buffer).unwrap();
    assert!(layer.write_buffer(&buffer, 0, &[1, 2, 3]).is_ok());
}

#[test]
fn test_release_mapped_buffer_warns() {
    let (mut layer, debugger, _) = setup();
    let buffer = mappable_buffer(&mut layer, 64);
    layer.map_buffer(&buffer, CpuAccess::ReadOnly).unwrap();

    layer.release_buffer(buffer).unwrap();
    assert_eq!(layer.instance().call_count("release_buffer"), 1);
    assert_eq!(layer.live_count(ResourceKind::Buffer), 0);
    assert_eq!(debugger.reports()[0].severity, DebugSeverity::Warning);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_released_handle_is_not_found() {
    let (mut layer, debugger, _) = setup();
    let buffer = layer.create_buffer(&BufferDesc::new(BufferKind::Storage, 64), None).unwrap();
    layer.release_buffer(buffer).unwrap();
    assert_eq!(layer.live_count(ResourceKind::Buffer), 0);
    assert_eq!(layer.instance().live_object_count(), 0);

    let err = layer.write_buffer(&buffer, 0, &[1]).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::NotFound);
    let err = layer.release_buffer(buffer).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::NotFound);

    assert_eq!(layer.instance().call_count("release_buffer"), 1);
    let reports = debugger.reports();
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.kind == ValidationErrorKind::NotFound));
    assert_eq!(reports[1].source, "release_buffer");
}

#[test]
fn test_every_kind_round_trips_through_the_registry() {
    let (mut layer, _, profiler) = setup();

    let context = layer.create_render_context(&RenderContextDesc::default()).unwrap();
    let query = layer
        .create_query(&QueryDesc { query_type: QueryType::SamplesPassed, render_condition: true })
        .unwrap();
    let fence = layer.create_fence().unwrap();
    let command_buffer = layer.create_command_buffer().unwrap();
    let sampler = layer.create_sampler(&SamplerDesc::default()).unwrap();
    let sampler_array = layer.create_sampler_array(&[&sampler]).unwrap();
    assert_eq!(layer.live_object_count(), 6);
    assert_eq!(layer.instance().live_object_count(), 6);

    layer.release_sampler_array(sampler_array).unwrap();
    layer.release_sampler(sampler).unwrap();
    layer.release_command_buffer(command_buffer).unwrap();
    layer.release_fence(fence).unwrap();
    layer.release_query(query).unwrap();
    layer.release_render_context(context).unwrap();

    assert_eq!(layer.live_object_count(), 0);
    assert_eq!(layer.instance().live_object_count(), 0);
    let stats = profiler.stats();
    assert_eq!(stats.created_count(ResourceKind::Fence), 1);
    assert_eq!(stats.released_count(ResourceKind::SamplerArray), 1);
    assert_eq!(layer.validation_stats().total(), 0);
}

#[test]
fn test_make_current_checks_context() {
    let (mut layer, debugger, _) = setup();
    let context = layer.create_render_context(&RenderContextDesc::default()).unwrap();
    layer.make_current(&context).unwrap();
    layer.release_render_context(context).unwrap();

    let err = layer.make_current(&context).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::NotFound);
    assert_eq!(layer.instance().call_count("make_current"), 1);
    assert_eq!(debugger.reports()[0].source, "make_current");
}

#[test]
fn test_backend_fault_passes_through() {
    let (mut layer, debugger, profiler) = setup();
    layer.instance_mut().fail_next_call();

    let err = layer.create_buffer(&BufferDesc::new(BufferKind::Storage, 64), None).unwrap_err();
    match err {
        Error::BackendError(message) => assert_eq!(message, "create_buffer: simulated backend failure"),
        other => panic!("expected a backend error, got {:?}", other),
    }
    assert_eq!(layer.live_count(ResourceKind::Buffer), 0);
    assert!(debugger.reports().is_empty());
    assert_eq!(profiler.stats().created_count(ResourceKind::Buffer), 0);
}

#[test]
fn test_into_inner_returns_wrapped_system() {
    let (mut layer, _, _) = setup();
    layer.create_fence().unwrap();
    let mock = layer.into_inner();
    assert_eq!(mock.call_count("create_fence"), 1);
    assert_eq!(mock.live_object_count(), 1);
}

// ============================================================================
// Textures
// ============================================================================

#[test]
fn test_texture_over_limit_is_not_registered() {
    let caps = RenderingCaps {
        max_texture_2d_size: 4096,
        ..RenderingCaps::default()
    };
    let (mut layer, _, _) = setup_with(MockRenderSystem::with_caps(caps));

    let err = layer
        .create_texture(&TextureDesc::new_2d(TextureFormat::R8G8B8A8_UNORM, 5000, 256), None)
        .unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::LimitExceeded);
    assert_eq!(layer.live_count(ResourceKind::Texture), 0);
    assert_eq!(layer.instance().call_count("create_texture"), 0);
}

#[test]
fn test_huge_texture_with_image_is_rejected() {
    let (mut layer, _, _) = setup();
    let desc = TextureDesc {
        texture_type: TextureType::Texture3D,
        format: TextureFormat::R8G8B8A8_UNORM,
        extent: UVec3::splat(u32::MAX),
        array_layers: 1,
        mip_levels: 1,
        samples: 1,
    };
    let pixels = [0u8; 4];
    let image = ImageDesc {
        format: ImageFormat::RGBA,
        data_type: DataType::UInt8,
        data: &pixels,
    };

    let err = layer.create_texture(&desc, Some(&image)).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::LimitExceeded);
    assert_eq!(layer.live_count(ResourceKind::Texture), 0);
    assert_eq!(layer.instance().call_count("create_texture"), 0);
}

#[test]
fn test_single_layer_array_texture_warns() {
    let (mut layer, debugger, _) = setup();
    let desc = TextureDesc {
        texture_type: TextureType::Texture2DArray,
        ..TextureDesc::new_2d(TextureFormat::R8G8B8A8_UNORM, 64, 64)
    };

    assert!(layer.create_texture(&desc, None).is_ok());
    assert_eq!(layer.live_count(ResourceKind::Texture), 1);
    let reports = debugger.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].severity, DebugSeverity::Warning);
}

#[test]
fn test_single_layer_array_texture_rejected_when_fatal() {
    let (layer, debugger, _) = setup();
    let mut layer = layer.with_config(quiet_config(BenignViolationPolicy::Fatal));
    let desc = TextureDesc {
        texture_type: TextureType::Texture2DArray,
        ..TextureDesc::new_2d(TextureFormat::R8G8B8A8_UNORM, 64, 64)
    };

    let err = layer.create_texture(&desc, None).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::InvalidArgument);
    assert_eq!(layer.live_count(ResourceKind::Texture), 0);
    assert_eq!(debugger.reports()[0].severity, DebugSeverity::Error);
    assert_eq!(layer.config().benign_policy, BenignViolationPolicy::Fatal);
}

#[test]
fn test_generated_mips_never_decrease() {
    let (mut layer, _, _) = setup();
    let texture = mipmapped_texture(&mut layer, 256, 9);
    assert_eq!(generated_mip_levels(&layer, texture), 1);

    let range = MipRange {
        base_mip_level: 0,
        num_mip_levels: 4,
        base_array_layer: 0,
        num_array_layers: 1,
    };
    layer.generate_mips_range(&texture, &range).unwrap();
    assert_eq!(generated_mip_levels(&layer, texture), 4);

    layer.generate_mips(&texture).unwrap();
    assert_eq!(generated_mip_levels(&layer, texture), 9);

    layer.generate_mips_range(&texture, &MipRange { num_mip_levels: 2, ..range }).unwrap();
    assert_eq!(generated_mip_levels(&layer, texture), 9);
    assert_eq!(layer.instance().call_count("generate_mips_range"), 2);
}

#[test]
fn test_mip_range_past_declared_count() {
    let (mut layer, _, profiler) = setup();
    let texture = mipmapped_texture(&mut layer, 256, 9);

    let range = MipRange {
        base_mip_level: 6,
        num_mip_levels: 4,
        base_array_layer: 0,
        num_array_layers: 1,
    };
    let err = layer.generate_mips_range(&texture, &range).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::RangeViolation);
    assert_eq!(generated_mip_levels(&layer, texture), 1);
    assert_eq!(profiler.stats().mip_generations, 0);
}

#[test]
fn test_empty_mip_range_is_a_noop() {
    let (mut layer, debugger, _) = setup();
    let texture = mipmapped_texture(&mut layer, 64, 7);

    let range = MipRange {
        base_mip_level: 1,
        num_mip_levels: 0,
        base_array_layer: 0,
        num_array_layers: 1,
    };
    layer.generate_mips_range(&texture, &range).unwrap();
    assert_eq!(layer.instance().call_count("generate_mips_range"), 0);
    assert_eq!(debugger.reports()[0].severity, DebugSeverity::Warning);
}

#[test]
fn test_empty_mip_range_past_the_end() {
    let (mut layer, _, _) = setup();
    let texture = mipmapped_texture(&mut layer, 64, 1);

    let range = MipRange {
        base_mip_level: 1,
        num_mip_levels: 0,
        base_array_layer: 0,
        num_array_layers: 1,
    };
    let err = layer.generate_mips_range(&texture, &range).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::RangeViolation);

    let layers_past_end = MipRange { base_mip_level: 0, num_mip_levels: 1, base_array_layer: 1, num_array_layers: 0 };
    let err = layer.generate_mips_range(&texture, &layers_past_end).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::RangeViolation);
    assert_eq!(layer.instance().call_count("generate_mips_range"), 0);
}

#[test]
fn test_texture_write_checks() {
    let (mut layer, _, _) = setup();
    let texture = mipmapped_texture(&mut layer, 8, 2);
    let region = SubTextureDesc {
        mip_level: 1,
        offset: UVec3::ZERO,
        extent: UVec3::new(4, 4, 1),
        base_array_layer: 0,
        num_array_layers: 1,
    };
    let pixels = [0u8; 64];
    let image = ImageDesc {
        format: ImageFormat::RGBA,
        data_type: DataType::UInt8,
        data: &pixels,
    };
    layer.write_texture(&texture, &region, &image).unwrap();

    let short = ImageDesc { data: &pixels[..60], ..image };
    let err = layer.write_texture(&texture, &region, &short).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::SizeMismatch);

    let outside = SubTextureDesc { offset: UVec3::new(2, 0, 0), ..region };
    let err = layer.write_texture(&texture, &outside, &image).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::BoundsViolation);

    let err = layer.write_texture(&texture, &SubTextureDesc { mip_level: 2, ..region }, &image).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::LimitExceeded);

    let empty = SubTextureDesc { extent: UVec3::new(0, 4, 1), ..region };
    layer.write_texture(&texture, &empty, &image).unwrap();
    assert_eq!(layer.instance().call_count("write_texture"), 1);
}

#[test]
fn test_texture_read_and_query() {
    let (mut layer, _, profiler) = setup();
    layer.set_configuration(RenderSystemConfig { default_image_color: [1, 2, 3, 4] });
    let texture = mipmapped_texture(&mut layer, 4, 1);

    let mut data = [0u8; 64];
    layer.read_texture(&texture, 0, ImageFormat::RGBA, DataType::UInt8, &mut data).unwrap();
    assert_eq!(&data[..8], &[1, 2, 3, 4, 1, 2, 3, 4]);

    let mut small = [0u8; 16];
    let err = layer
        .read_texture(&texture, 0, ImageFormat::RGBA, DataType::UInt8, &mut small)
        .unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::SizeMismatch);
    assert_eq!(profiler.stats().texture_reads, 1);

    let desc = layer.query_texture_desc(&texture).unwrap();
    assert_eq!(desc.extent, UVec3::new(4, 4, 1));

    layer.release_texture(texture).unwrap();
    let err = layer.query_texture_desc(&texture).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::NotFound);
}

#[test]
fn test_resource_arrays() {
    let (mut layer, _, _) = setup();
    let vertices = layer.create_buffer(&BufferDesc::new(BufferKind::Vertex { stride: 16 }, 64), None).unwrap();
    let more_vertices = layer.create_buffer(&BufferDesc::new(BufferKind::Vertex { stride: 32 }, 64), None).unwrap();
    let indices = layer.create_buffer(&BufferDesc::new(BufferKind::Index(IndexFormat::U16), 64), None).unwrap();

    let array = layer.create_buffer_array(&[&vertices, &more_vertices]).unwrap();
    let err = layer.create_buffer_array(&[&vertices, &indices]).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::InvalidArgument);
    let err = layer.create_buffer_array(&[]).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::InvalidArgument);

    let err = layer.create_texture_array(&[]).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::InvalidArgument);
    let texture = mipmapped_texture(&mut layer, 16, 1);
    let texture_array = layer.create_texture_array(&[&texture]).unwrap();

    layer.release_texture(texture).unwrap();
    let err = layer.create_texture_array(&[&texture]).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::NotFound);

    layer.release_buffer_array(array).unwrap();
    layer.release_texture_array(texture_array).unwrap();
    assert_eq!(layer.instance().call_count("create_buffer_array"), 1);
    assert_eq!(layer.instance().call_count("create_texture_array"), 1);
}

// ============================================================================
// Render targets
// ============================================================================

#[test]
fn test_render_target_attachments() {
    let (mut layer, _, _) = setup();
    let color = mipmapped_texture(&mut layer, 256, 2);
    let depth = layer
        .create_texture(&TextureDesc::new_2d(TextureFormat::D24_UNORM_S8_UINT, 256, 256), None)
        .unwrap();

    let desc: RenderTargetDesc<'_, DebugMock> = RenderTargetDesc {
        resolution: UVec2::new(256, 256),
        samples: 1,
        attachments: vec![
            AttachmentDesc { attachment_type: AttachmentType::Color, texture: Some(&color), mip_level: 0, array_layer: 0 },
            AttachmentDesc { attachment_type: AttachmentType::DepthStencil, texture: Some(&depth), mip_level: 0, array_layer: 0 },
        ],
    };
    let render_target = layer.create_render_target(&desc).unwrap();

    let mip_one: RenderTargetDesc<'_, DebugMock> = RenderTargetDesc {
        resolution: UVec2::new(256, 256),
        samples: 1,
        attachments: vec![
            AttachmentDesc { attachment_type: AttachmentType::Color, texture: Some(&color), mip_level: 1, array_layer: 0 },
        ],
    };
    let err = layer.create_render_target(&mip_one).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::SizeMismatch);
    assert_eq!(layer.instance().call_count("create_render_target"), 1);

    layer.release_render_target(render_target).unwrap();
    assert_eq!(layer.live_count(ResourceKind::RenderTarget), 0);
}

// ============================================================================
// Shaders and pipelines
// ============================================================================

#[test]
fn test_graphics_pipeline_setup() {
    let (mut layer, debugger, _) = setup();
    let vertex = shader(&mut layer, ShaderStage::Vertex);
    let fragment = shader(&mut layer, ShaderStage::Fragment);

    let mut program_desc: ShaderProgramDesc<'_, DebugMock> = ShaderProgramDesc::new();
    program_desc.vertex_shader = Some(&vertex);
    program_desc.fragment_shader = Some(&fragment);
    let program = layer.create_shader_program(&program_desc).unwrap();

    let layout = layer
        .create_pipeline_layout(&PipelineLayoutDesc {
            bindings: vec![BindingDesc {
                resource_type: ResourceType::ConstantBuffer,
                stages: ShaderStageFlags::VERTEX,
                slot: 0,
            }],
        })
        .unwrap();

    let mut pipeline_desc: GraphicsPipelineDesc<'_, DebugMock> = GraphicsPipelineDesc::new(&program);
    pipeline_desc.pipeline_layout = Some(&layout);
    let pipeline = layer.create_graphics_pipeline(&pipeline_desc).unwrap();
    assert!(debugger.reports().is_empty());

    let err = layer.create_compute_pipeline(&ComputePipelineDesc { shader_program: &program, pipeline_layout: None });
    assert_eq!(rejection(err.unwrap_err()), ValidationErrorKind::InvalidArgument);

    layer.release_graphics_pipeline(pipeline).unwrap();
    layer.release_pipeline_layout(layout).unwrap();
    let err = layer.create_graphics_pipeline(&pipeline_desc).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::NotFound);
    assert_eq!(layer.instance().call_count("create_graphics_pipeline"), 1);
}

#[test]
fn test_shader_in_wrong_slot() {
    let (mut layer, _, _) = setup();
    let fragment = shader(&mut layer, ShaderStage::Fragment);

    let mut program_desc: ShaderProgramDesc<'_, DebugMock> = ShaderProgramDesc::new();
    program_desc.vertex_shader = Some(&fragment);
    let err = layer.create_shader_program(&program_desc).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::InvalidArgument);
    assert_eq!(layer.instance().call_count("create_shader_program"), 0);
}

#[test]
fn test_compute_pipeline() {
    let (mut layer, _, _) = setup();
    let compute = shader(&mut layer, ShaderStage::Compute);
    let mut program_desc: ShaderProgramDesc<'_, DebugMock> = ShaderProgramDesc::new();
    program_desc.compute_shader = Some(&compute);
    let program = layer.create_shader_program(&program_desc).unwrap();

    let pipeline = layer
        .create_compute_pipeline(&ComputePipelineDesc { shader_program: &program, pipeline_layout: None })
        .unwrap();
    let desc: GraphicsPipelineDesc<'_, DebugMock> = GraphicsPipelineDesc::new(&program);
    let err = layer.create_graphics_pipeline(&desc).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::InvalidArgument);

    layer.release_compute_pipeline(pipeline).unwrap();
    layer.release_shader_program(program).unwrap();
    layer.release_shader(compute).unwrap();
    assert_eq!(layer.live_object_count(), 0);
}

#[test]
fn test_unsupported_topology() {
    let caps = RenderingCaps {
        supported_topologies: vec![PrimitiveTopology::TriangleList],
        ..RenderingCaps::default()
    };
    let (mut layer, _, _) = setup_with(MockRenderSystem::with_caps(caps));
    let vertex = shader(&mut layer, ShaderStage::Vertex);
    let mut program_desc: ShaderProgramDesc<'_, DebugMock> = ShaderProgramDesc::new();
    program_desc.vertex_shader = Some(&vertex);
    let program = layer.create_shader_program(&program_desc).unwrap();

    let mut pipeline_desc: GraphicsPipelineDesc<'_, DebugMock> = GraphicsPipelineDesc::new(&program);
    pipeline_desc.primitive_topology = PrimitiveTopology::LineStrip;
    let err = layer.create_graphics_pipeline(&pipeline_desc).unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::UnsupportedFeature);
}

#[test]
fn test_resource_heap_matches_layout() {
    let (mut layer, _, _) = setup();
    let layout = layer
        .create_pipeline_layout(&PipelineLayoutDesc {
            bindings: vec![
                BindingDesc { resource_type: ResourceType::ConstantBuffer, stages: ShaderStageFlags::VERTEX, slot: 0 },
                BindingDesc { resource_type: ResourceType::Texture, stages: ShaderStageFlags::FRAGMENT, slot: 0 },
            ],
        })
        .unwrap();
    let constants = layer.create_buffer(&BufferDesc::new(BufferKind::Constant, 64), None).unwrap();
    let texture = mipmapped_texture(&mut layer, 16, 1);

    let heap = layer
        .create_resource_heap(&ResourceHeapDesc {
            pipeline_layout: &layout,
            resources: vec![ResourceView::Buffer(&constants), ResourceView::Texture(&texture)],
        })
        .unwrap();

    let err = layer
        .create_resource_heap(&ResourceHeapDesc {
            pipeline_layout: &layout,
            resources: vec![ResourceView::Texture(&texture), ResourceView::Buffer(&constants)],
        })
        .unwrap_err();
    assert_eq!(rejection(err), ValidationErrorKind::InvalidArgument);
    assert_eq!(layer.instance().call_count("create_resource_heap"), 1);

    layer.release_resource_heap(heap).unwrap();
    assert_eq!(layer.live_count(ResourceKind::ResourceHeap), 0);
}

// ============================================================================
// Profiler and statistics
// ============================================================================

#[test]
fn test_profiler_counts_delegated_calls_only() {
    let (mut layer, _, profiler) = setup();
    let buffer = layer.create_buffer(&BufferDesc::new(BufferKind::Storage, 128), None).unwrap();
    let _ = layer.create_buffer(&BufferDesc::new(BufferKind::Storage, 0), None);

    layer.write_buffer(&buffer, 0, &[0u8; 64]).unwrap();
    let _ = layer.write_buffer(&buffer, 100, &[0u8; 64]);
    layer.write_buffer(&buffer, 0, &[]).unwrap();

    let stats = profiler.stats();
    assert_eq!(stats.created_count(ResourceKind::Buffer), 1);
    assert_eq!(stats.buffer_writes, 1);
    assert_eq!(stats.buffer_bytes_written, 64);

    let validation = layer.validation_stats();
    assert_eq!(validation.errors, 2);
    assert_eq!(validation.warnings, 1);
    layer.reset_validation_stats();
    assert_eq!(layer.validation_stats().total(), 0);
}

#[test]
fn test_live_objects_summary() {
    let (mut layer, _, _) = setup();
    layer.create_buffer(&BufferDesc::new(BufferKind::Storage, 16), None).unwrap();
    layer.create_buffer(&BufferDesc::new(BufferKind::Storage, 16), None).unwrap();
    layer.create_fence().unwrap();

    assert_eq!(layer.live_objects(), vec![(ResourceKind::Buffer, 2), (ResourceKind::Fence, 1)]);
    assert_eq!(layer.live_object_count(), 3);
}
