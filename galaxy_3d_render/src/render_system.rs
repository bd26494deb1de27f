/// RenderSystem trait - main resource factory interface

use crate::error::Result;
use crate::caps::RenderingCaps;
use crate::buffer::{BufferDesc, CpuAccess};
use crate::texture::{TextureDesc, ImageDesc, SubTextureDesc, MipRange, ImageFormat, DataType};
use crate::sampler::SamplerDesc;
use crate::shader::{ShaderDesc, ShaderProgramDesc};
use crate::pipeline::{GraphicsPipelineDesc, ComputePipelineDesc};
use crate::resource_heap::{PipelineLayoutDesc, ResourceHeapDesc};
use crate::render_target::{RenderTargetDesc, RenderContextDesc};
use crate::query::QueryDesc;

// ============================================================================
// Common types
// ============================================================================

/// Shading language consumed by a render system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadingLanguage {
    GLSL,
    HLSL,
    SPIRV,
    MSL,
}

/// Graphics API family behind a render system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererFamily {
    OpenGL,
    Direct3D,
    Vulkan,
    Metal,
    Unknown,
}

impl RendererFamily {
    /// Determine the family from a renderer name such as "OpenGL 4.5" or "Direct3D 11"
    pub fn from_renderer_name(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if name.contains("opengl") {
            RendererFamily::OpenGL
        } else if name.contains("direct3d") || name.contains("d3d") {
            RendererFamily::Direct3D
        } else if name.contains("vulkan") {
            RendererFamily::Vulkan
        } else if name.contains("metal") {
            RendererFamily::Metal
        } else {
            RendererFamily::Unknown
        }
    }
}

/// Descriptive information about a render system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererInfo {
    pub renderer_name: String,
    pub device_name: String,
    pub vendor_name: String,
    pub shading_language_name: String,
}

impl RendererInfo {
    /// API family determined from `renderer_name`
    pub fn family(&self) -> RendererFamily {
        RendererFamily::from_renderer_name(&self.renderer_name)
    }
}

/// Runtime configuration forwarded to a render system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSystemConfig {
    /// RGBA color backends fill uninitialized texture contents with
    pub default_image_color: [u8; 4],
}

impl Default for RenderSystemConfig {
    fn default() -> Self {
        Self {
            default_image_color: [0, 0, 0, 255],
        }
    }
}

// ============================================================================
// RenderSystem trait
// ============================================================================

/// Main render system trait
///
/// Implemented by backends (OpenGL, Direct3D, Vulkan, ...) and by the debug
/// layer, which wraps another render system and exposes the same interface.
/// Each resource kind is an associated handle type: backends use their native
/// objects, the debug layer uses registry keys.
///
/// Every `create_*` call hands ownership of the new object to the caller;
/// the matching `release_*` call takes it back and destroys it.
pub trait RenderSystem {
    type RenderContext;
    type Buffer;
    type BufferArray;
    type Texture;
    type TextureArray;
    type Sampler;
    type SamplerArray;
    type RenderTarget;
    type Shader;
    type ShaderProgram;
    type PipelineLayout;
    type GraphicsPipeline;
    type ComputePipeline;
    type ResourceHeap;
    type Query;
    type Fence;
    type CommandBuffer;

    // ===== COMMON =====

    /// Renderer, device and vendor names
    fn renderer_info(&self) -> RendererInfo;

    /// Limits and optional features of this render system
    fn rendering_caps(&self) -> RenderingCaps;

    fn shading_language(&self) -> ShadingLanguage;

    fn set_configuration(&mut self, config: RenderSystemConfig);

    // ===== RENDER CONTEXT =====

    fn create_render_context(&mut self, desc: &RenderContextDesc) -> Result<Self::RenderContext>;

    fn release_render_context(&mut self, render_context: Self::RenderContext) -> Result<()>;

    /// Make `render_context` the target of subsequent rendering commands
    fn make_current(&mut self, render_context: &Self::RenderContext) -> Result<()>;

    // ===== BUFFERS =====

    /// Create a buffer, optionally filling its first `initial_data.len()` bytes
    fn create_buffer(&mut self, desc: &BufferDesc, initial_data: Option<&[u8]>) -> Result<Self::Buffer>;

    fn release_buffer(&mut self, buffer: Self::Buffer) -> Result<()>;

    /// Write `data` into the buffer starting at byte `offset`
    fn write_buffer(&mut self, buffer: &Self::Buffer, offset: u64, data: &[u8]) -> Result<()>;

    /// Write a slice of plain-old-data values into the buffer
    fn write_buffer_typed<T: bytemuck::Pod>(&mut self, buffer: &Self::Buffer, offset: u64, data: &[T]) -> Result<()>
    where
        Self: Sized,
    {
        self.write_buffer(buffer, offset, bytemuck::cast_slice(data))
    }

    /// Map the whole buffer into CPU memory
    fn map_buffer(&mut self, buffer: &Self::Buffer, access: CpuAccess) -> Result<&mut [u8]>;

    fn unmap_buffer(&mut self, buffer: &Self::Buffer) -> Result<()>;

    fn create_buffer_array(&mut self, buffers: &[&Self::Buffer]) -> Result<Self::BufferArray>;

    fn release_buffer_array(&mut self, buffer_array: Self::BufferArray) -> Result<()>;

    // ===== TEXTURES =====

    /// Create a texture, optionally uploading level-0 data for every layer
    fn create_texture(&mut self, desc: &TextureDesc, image: Option<&ImageDesc<'_>>) -> Result<Self::Texture>;

    fn release_texture(&mut self, texture: Self::Texture) -> Result<()>;

    /// Descriptor the texture was created with
    fn query_texture_desc(&self, texture: &Self::Texture) -> Result<TextureDesc>;

    fn write_texture(&mut self, texture: &Self::Texture, region: &SubTextureDesc, image: &ImageDesc<'_>) -> Result<()>;

    /// Read a whole mip level (all layers) into `data`
    fn read_texture(
        &mut self,
        texture: &Self::Texture,
        mip_level: u32,
        format: ImageFormat,
        data_type: DataType,
        data: &mut [u8],
    ) -> Result<()>;

    /// Generate every mip level from level 0
    fn generate_mips(&mut self, texture: &Self::Texture) -> Result<()>;

    /// Generate the mip levels of a sub-resource range from the level below `base_mip_level`
    fn generate_mips_range(&mut self, texture: &Self::Texture, range: &MipRange) -> Result<()>;

    fn create_texture_array(&mut self, textures: &[&Self::Texture]) -> Result<Self::TextureArray>;

    fn release_texture_array(&mut self, texture_array: Self::TextureArray) -> Result<()>;

    // ===== SAMPLERS =====

    fn create_sampler(&mut self, desc: &SamplerDesc) -> Result<Self::Sampler>;

    fn release_sampler(&mut self, sampler: Self::Sampler) -> Result<()>;

    fn create_sampler_array(&mut self, samplers: &[&Self::Sampler]) -> Result<Self::SamplerArray>;

    fn release_sampler_array(&mut self, sampler_array: Self::SamplerArray) -> Result<()>;

    // ===== RENDER TARGETS =====

    fn create_render_target(&mut self, desc: &RenderTargetDesc<'_, Self>) -> Result<Self::RenderTarget>;

    fn release_render_target(&mut self, render_target: Self::RenderTarget) -> Result<()>;

    // ===== SHADERS =====

    fn create_shader(&mut self, desc: &ShaderDesc) -> Result<Self::Shader>;

    fn release_shader(&mut self, shader: Self::Shader) -> Result<()>;

    fn create_shader_program(&mut self, desc: &ShaderProgramDesc<'_, Self>) -> Result<Self::ShaderProgram>;

    fn release_shader_program(&mut self, shader_program: Self::ShaderProgram) -> Result<()>;

    // ===== PIPELINE LAYOUTS AND RESOURCE HEAPS =====

    fn create_pipeline_layout(&mut self, desc: &PipelineLayoutDesc) -> Result<Self::PipelineLayout>;

    fn release_pipeline_layout(&mut self, pipeline_layout: Self::PipelineLayout) -> Result<()>;

    fn create_resource_heap(&mut self, desc: &ResourceHeapDesc<'_, Self>) -> Result<Self::ResourceHeap>;

    fn release_resource_heap(&mut self, resource_heap: Self::ResourceHeap) -> Result<()>;

    // ===== PIPELINE STATES =====

    fn create_graphics_pipeline(&mut self, desc: &GraphicsPipelineDesc<'_, Self>) -> Result<Self::GraphicsPipeline>;

    fn release_graphics_pipeline(&mut self, pipeline: Self::GraphicsPipeline) -> Result<()>;

    fn create_compute_pipeline(&mut self, desc: &ComputePipelineDesc<'_, Self>) -> Result<Self::ComputePipeline>;

    fn release_compute_pipeline(&mut self, pipeline: Self::ComputePipeline) -> Result<()>;

    // ===== QUERIES, FENCES, COMMAND BUFFERS =====

    fn create_query(&mut self, desc: &QueryDesc) -> Result<Self::Query>;

    fn release_query(&mut self, query: Self::Query) -> Result<()>;

    fn create_fence(&mut self) -> Result<Self::Fence>;

    fn release_fence(&mut self, fence: Self::Fence) -> Result<()>;

    fn create_command_buffer(&mut self) -> Result<Self::CommandBuffer>;

    fn release_command_buffer(&mut self, command_buffer: Self::CommandBuffer) -> Result<()>;
}
