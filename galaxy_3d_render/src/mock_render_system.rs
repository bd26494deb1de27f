/// Mock RenderSystem for tests (no GPU required)
///
/// Records every call it receives so tests can check what reached the
/// backend, keeps buffer contents in memory so writes and maps can be
/// observed, and can be told to fail the next call to simulate backend faults.

use rustc_hash::{FxHashMap, FxHashSet};
use crate::error::Result;
use crate::render_bail;
use crate::render_system::{
    RenderSystem, RendererInfo, RenderSystemConfig, ShadingLanguage,
};
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
// Mock native handles
// ============================================================================

macro_rules! mock_handles {
    ($($name:ident => $kind:literal),* $(,)?) => {
        $(
            /// Mock native handle
            #[derive(Debug, PartialEq, Eq, Hash)]
            pub struct $name {
                pub id: u32,
            }

            impl $name {
                pub const KIND: &'static str = $kind;
            }
        )*
    };
}

mock_handles! {
    MockRenderContext => "render_context",
    MockBuffer => "buffer",
    MockBufferArray => "buffer_array",
    MockTexture => "texture",
    MockTextureArray => "texture_array",
    MockSampler => "sampler",
    MockSamplerArray => "sampler_array",
    MockRenderTarget => "render_target",
    MockShader => "shader",
    MockShaderProgram => "shader_program",
    MockPipelineLayout => "pipeline_layout",
    MockGraphicsPipeline => "graphics_pipeline",
    MockComputePipeline => "compute_pipeline",
    MockResourceHeap => "resource_heap",
    MockQuery => "query",
    MockFence => "fence",
    MockCommandBuffer => "command_buffer",
}

// ============================================================================
// Mock RenderSystem
// ============================================================================

/// Mock render system that tracks created objects without a GPU
#[derive(Debug)]
pub struct MockRenderSystem {
    caps: RenderingCaps,
    info: RendererInfo,
    config: RenderSystemConfig,
    next_id: u32,
    fail_next: bool,
    /// Every call received, in order (failed calls included)
    calls: Vec<String>,
    /// Live objects: id -> kind
    live: FxHashMap<u32, &'static str>,
    buffers: FxHashMap<u32, Vec<u8>>,
    mapped_buffers: FxHashSet<u32>,
    textures: FxHashMap<u32, TextureDesc>,
}

impl MockRenderSystem {
    /// Create a mock render system with default capabilities
    pub fn new() -> Self {
        Self::with_caps(RenderingCaps::default())
    }

    /// Create a mock render system reporting the given capabilities
    pub fn with_caps(caps: RenderingCaps) -> Self {
        Self {
            caps,
            info: RendererInfo {
                renderer_name: "Mock".to_string(),
                device_name: "Mock Device".to_string(),
                vendor_name: "Galaxy3D".to_string(),
                shading_language_name: "SPIR-V".to_string(),
            },
            config: RenderSystemConfig::default(),
            next_id: 1,
            fail_next: false,
            calls: Vec::new(),
            live: FxHashMap::default(),
            buffers: FxHashMap::default(),
            mapped_buffers: FxHashSet::default(),
            textures: FxHashMap::default(),
        }
    }

    /// Report a different renderer name (e.g. "Direct3D 11")
    pub fn with_renderer_name(mut self, name: &str) -> Self {
        self.info.renderer_name = name.to_string();
        self
    }

    /// Make the next call fail with a backend error
    pub fn fail_next_call(&mut self) {
        self.fail_next = true;
    }

    /// Every call received, in order
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Number of times `name` was called
    pub fn call_count(&self, name: &str) -> usize {
        self.calls.iter().filter(|call| call.as_str() == name).count()
    }

    /// Number of live objects of every kind
    pub fn live_object_count(&self) -> usize {
        self.live.len()
    }

    /// Number of live objects of one kind (e.g. `MockBuffer::KIND`)
    pub fn live_count(&self, kind: &str) -> usize {
        self.live.values().filter(|k| **k == kind).count()
    }

    /// Current contents of a buffer
    pub fn buffer_data(&self, buffer: &MockBuffer) -> Option<&[u8]> {
        self.buffers.get(&buffer.id).map(|data| data.as_slice())
    }

    /// Configuration last received through `set_configuration`
    pub fn config(&self) -> RenderSystemConfig {
        self.config
    }

    fn begin_call(&mut self, name: &str) -> Result<()> {
        self.calls.push(name.to_string());
        if self.fail_next {
            self.fail_next = false;
            render_bail!("galaxy3d::mock", "{}: simulated backend failure", name);
        }
        Ok(())
    }

    fn allocate(&mut self, kind: &'static str) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.live.insert(id, kind);
        id
    }

    fn free(&mut self, id: u32, kind: &'static str) -> Result<()> {
        match self.live.remove(&id) {
            Some(live_kind) if live_kind == kind => Ok(()),
            Some(live_kind) => {
                self.live.insert(id, live_kind);
                render_bail!("galaxy3d::mock", "release of {} #{}: object is a {}", kind, id, live_kind);
            }
            None => {
                render_bail!("galaxy3d::mock", "release of unknown {} #{}", kind, id);
            }
        }
    }

    fn require_live(&self, id: u32, kind: &'static str) -> Result<()> {
        if self.live.get(&id) != Some(&kind) {
            render_bail!("galaxy3d::mock", "{} #{} is not alive", kind, id);
        }
        Ok(())
    }
}

impl Default for MockRenderSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSystem for MockRenderSystem {
    type RenderContext = MockRenderContext;
    type Buffer = MockBuffer;
    type BufferArray = MockBufferArray;
    type Texture = MockTexture;
    type TextureArray = MockTextureArray;
    type Sampler = MockSampler;
    type SamplerArray = MockSamplerArray;
    type RenderTarget = MockRenderTarget;
    type Shader = MockShader;
    type ShaderProgram = MockShaderProgram;
    type PipelineLayout = MockPipelineLayout;
    type GraphicsPipeline = MockGraphicsPipeline;
    type ComputePipeline = MockComputePipeline;
    type ResourceHeap = MockResourceHeap;
    type Query = MockQuery;
    type Fence = MockFence;
    type CommandBuffer = MockCommandBuffer;

    fn renderer_info(&self) -> RendererInfo {
        self.info.clone()
    }

    fn rendering_caps(&self) -> RenderingCaps {
        self.caps.clone()
    }

    fn shading_language(&self) -> ShadingLanguage {
        ShadingLanguage::SPIRV
    }

    fn set_configuration(&mut self, config: RenderSystemConfig) {
        self.calls.push("set_configuration".to_string());
        self.config = config;
    }

    // ===== RENDER CONTEXT =====

    fn create_render_context(&mut self, _desc: &RenderContextDesc) -> Result<MockRenderContext> {
        self.begin_call("create_render_context")?;
        Ok(MockRenderContext { id: self.allocate(MockRenderContext::KIND) })
    }

    fn release_render_context(&mut self, render_context: MockRenderContext) -> Result<()> {
        self.begin_call("release_render_context")?;
        self.free(render_context.id, MockRenderContext::KIND)
    }

    fn make_current(&mut self, render_context: &MockRenderContext) -> Result<()> {
        self.begin_call("make_current")?;
        self.require_live(render_context.id, MockRenderContext::KIND)
    }

    // ===== BUFFERS =====

    fn create_buffer(&mut self, desc: &BufferDesc, initial_data: Option<&[u8]>) -> Result<MockBuffer> {
        self.begin_call("create_buffer")?;
        let mut data = vec![0u8; desc.size as usize];
        if let Some(initial) = initial_data {
            if initial.len() > data.len() {
                render_bail!("galaxy3d::mock", "create_buffer: {} bytes of initial data for a {} byte buffer",
                    initial.len(), data.len());
            }
            data[..initial.len()].copy_from_slice(initial);
        }
        let id = self.allocate(MockBuffer::KIND);
        self.buffers.insert(id, data);
        Ok(MockBuffer { id })
    }

    fn release_buffer(&mut self, buffer: MockBuffer) -> Result<()> {
        self.begin_call("release_buffer")?;
        self.free(buffer.id, MockBuffer::KIND)?;
        self.buffers.remove(&buffer.id);
        self.mapped_buffers.remove(&buffer.id);
        Ok(())
    }

    fn write_buffer(&mut self, buffer: &MockBuffer, offset: u64, data: &[u8]) -> Result<()> {
        self.begin_call("write_buffer")?;
        let storage = match self.buffers.get_mut(&buffer.id) {
            Some(storage) => storage,
            None => render_bail!("galaxy3d::mock", "write_buffer: unknown buffer #{}", buffer.id),
        };
        let start = offset as usize;
        let end = start + data.len();
        if end > storage.len() {
            render_bail!("galaxy3d::mock", "write_buffer: range {}..{} outside {} bytes", start, end, storage.len());
        }
        storage[start..end].copy_from_slice(data);
        Ok(())
    }

    fn map_buffer(&mut self, buffer: &MockBuffer, _access: CpuAccess) -> Result<&mut [u8]> {
        self.begin_call("map_buffer")?;
        if !self.mapped_buffers.insert(buffer.id) {
            render_bail!("galaxy3d::mock", "map_buffer: buffer #{} already mapped", buffer.id);
        }
        match self.buffers.get_mut(&buffer.id) {
            Some(storage) => Ok(storage.as_mut_slice()),
            None => render_bail!("galaxy3d::mock", "map_buffer: unknown buffer #{}", buffer.id),
        }
    }

    fn unmap_buffer(&mut self, buffer: &MockBuffer) -> Result<()> {
        self.begin_call("unmap_buffer")?;
        if !self.mapped_buffers.remove(&buffer.id) {
            render_bail!("galaxy3d::mock", "unmap_buffer: buffer #{} not mapped", buffer.id);
        }
        Ok(())
    }

    fn create_buffer_array(&mut self, buffers: &[&MockBuffer]) -> Result<MockBufferArray> {
        self.begin_call("create_buffer_array")?;
        for buffer in buffers {
            self.require_live(buffer.id, MockBuffer::KIND)?;
        }
        Ok(MockBufferArray { id: self.allocate(MockBufferArray::KIND) })
    }

    fn release_buffer_array(&mut self, buffer_array: MockBufferArray) -> Result<()> {
        self.begin_call("release_buffer_array")?;
        self.free(buffer_array.id, MockBufferArray::KIND)
    }

    // ===== TEXTURES =====

    fn create_texture(&mut self, desc: &TextureDesc, _image: Option<&ImageDesc<'_>>) -> Result<MockTexture> {
        self.begin_call("create_texture")?;
        let id = self.allocate(MockTexture::KIND);
        self.textures.insert(id, desc.clone());
        Ok(MockTexture { id })
    }

    fn release_texture(&mut self, texture: MockTexture) -> Result<()> {
        self.begin_call("release_texture")?;
        self.free(texture.id, MockTexture::KIND)?;
        self.textures.remove(&texture.id);
        Ok(())
    }

    fn query_texture_desc(&self, texture: &MockTexture) -> Result<TextureDesc> {
        match self.textures.get(&texture.id) {
            Some(desc) => Ok(desc.clone()),
            None => render_bail!("galaxy3d::mock", "query_texture_desc: unknown texture #{}", texture.id),
        }
    }

    fn write_texture(&mut self, texture: &MockTexture, _region: &SubTextureDesc, _image: &ImageDesc<'_>) -> Result<()> {
        self.begin_call("write_texture")?;
        self.require_live(texture.id, MockTexture::KIND)
    }

    fn read_texture(
        &mut self,
        texture: &MockTexture,
        _mip_level: u32,
        _format: ImageFormat,
        _data_type: DataType,
        data: &mut [u8],
    ) -> Result<()> {
        self.begin_call("read_texture")?;
        self.require_live(texture.id, MockTexture::KIND)?;
        let color = self.config.default_image_color;
        for (i, byte) in data.iter_mut().enumerate() {
            *byte = color[i % 4];
        }
        Ok(())
    }

    fn generate_mips(&mut self, texture: &MockTexture) -> Result<()> {
        self.begin_call("generate_mips")?;
        self.require_live(texture.id, MockTexture::KIND)
    }

    fn generate_mips_range(&mut self, texture: &MockTexture, _range: &MipRange) -> Result<()> {
        self.begin_call("generate_mips_range")?;
        self.require_live(texture.id, MockTexture::KIND)
    }

    fn create_texture_array(&mut self, textures: &[&MockTexture]) -> Result<MockTextureArray> {
        self.begin_call("create_texture_array")?;
        for texture in textures {
            self.require_live(texture.id, MockTexture::KIND)?;
        }
        Ok(MockTextureArray { id: self.allocate(MockTextureArray::KIND) })
    }

    fn release_texture_array(&mut self, texture_array: MockTextureArray) -> Result<()> {
        self.begin_call("release_texture_array")?;
        self.free(texture_array.id, MockTextureArray::KIND)
    }

    // ===== SAMPLERS =====

    fn create_sampler(&mut self, _desc: &SamplerDesc) -> Result<MockSampler> {
        self.begin_call("create_sampler")?;
        Ok(MockSampler { id: self.allocate(MockSampler::KIND) })
    }

    fn release_sampler(&mut self, sampler: MockSampler) -> Result<()> {
        self.begin_call("release_sampler")?;
        self.free(sampler.id, MockSampler::KIND)
    }

    fn create_sampler_array(&mut self, samplers: &[&MockSampler]) -> Result<MockSamplerArray> {
        self.begin_call("create_sampler_array")?;
        for sampler in samplers {
            self.require_live(sampler.id, MockSampler::KIND)?;
        }
        Ok(MockSamplerArray { id: self.allocate(MockSamplerArray::KIND) })
    }

    fn release_sampler_array(&mut self, sampler_array: MockSamplerArray) -> Result<()> {
        self.begin_call("release_sampler_array")?;
        self.free(sampler_array.id, MockSamplerArray::KIND)
    }

    // ===== RENDER TARGETS =====

    fn create_render_target(&mut self, desc: &RenderTargetDesc<'_, Self>) -> Result<MockRenderTarget> {
        self.begin_call("create_render_target")?;
        for attachment in &desc.attachments {
            if let Some(texture) = attachment.texture {
                self.require_live(texture.id, MockTexture::KIND)?;
            }
        }
        Ok(MockRenderTarget { id: self.allocate(MockRenderTarget::KIND) })
    }

    fn release_render_target(&mut self, render_target: MockRenderTarget) -> Result<()> {
        self.begin_call("release_render_target")?;
        self.free(render_target.id, MockRenderTarget::KIND)
    }

    // ===== SHADERS =====

    fn create_shader(&mut self, _desc: &ShaderDesc) -> Result<MockShader> {
        self.begin_call("create_shader")?;
        Ok(MockShader { id: self.allocate(MockShader::KIND) })
    }

    fn release_shader(&mut self, shader: MockShader) -> Result<()> {
        self.begin_call("release_shader")?;
        self.free(shader.id, MockShader::KIND)
    }

    fn create_shader_program(&mut self, desc: &ShaderProgramDesc<'_, Self>) -> Result<MockShaderProgram> {
        self.begin_call("create_shader_program")?;
        for (_, shader) in desc.slots() {
            if let Some(shader) = shader {
                self.require_live(shader.id, MockShader::KIND)?;
            }
        }
        Ok(MockShaderProgram { id: self.allocate(MockShaderProgram::KIND) })
    }

    fn release_shader_program(&mut self, shader_program: MockShaderProgram) -> Result<()> {
        self.begin_call("release_shader_program")?;
        self.free(shader_program.id, MockShaderProgram::KIND)
    }

    // ===== PIPELINE LAYOUTS AND RESOURCE HEAPS =====

    fn create_pipeline_layout(&mut self, _desc: &PipelineLayoutDesc) -> Result<MockPipelineLayout> {
        self.begin_call("create_pipeline_layout")?;
        Ok(MockPipelineLayout { id: self.allocate(MockPipelineLayout::KIND) })
    }

    fn release_pipeline_layout(&mut self, pipeline_layout: MockPipelineLayout) -> Result<()> {
        self.begin_call("release_pipeline_layout")?;
        self.free(pipeline_layout.id, MockPipelineLayout::KIND)
    }

    fn create_resource_heap(&mut self, desc: &ResourceHeapDesc<'_, Self>) -> Result<MockResourceHeap> {
        self.begin_call("create_resource_heap")?;
        self.require_live(desc.pipeline_layout.id, MockPipelineLayout::KIND)?;
        Ok(MockResourceHeap { id: self.allocate(MockResourceHeap::KIND) })
    }

    fn release_resource_heap(&mut self, resource_heap: MockResourceHeap) -> Result<()> {
        self.begin_call("release_resource_heap")?;
        self.free(resource_heap.id, MockResourceHeap::KIND)
    }

    // ===== PIPELINE STATES =====

    fn create_graphics_pipeline(&mut self, desc: &GraphicsPipelineDesc<'_, Self>) -> Result<MockGraphicsPipeline> {
        self.begin_call("create_graphics_pipeline")?;
        self.require_live(desc.shader_program.id, MockShaderProgram::KIND)?;
        Ok(MockGraphicsPipeline { id: self.allocate(MockGraphicsPipeline::KIND) })
    }

    fn release_graphics_pipeline(&mut self, pipeline: MockGraphicsPipeline) -> Result<()> {
        self.begin_call("release_graphics_pipeline")?;
        self.free(pipeline.id, MockGraphicsPipeline::KIND)
    }

    fn create_compute_pipeline(&mut self, desc: &ComputePipelineDesc<'_, Self>) -> Result<MockComputePipeline> {
        self.begin_call("create_compute_pipeline")?;
        self.require_live(desc.shader_program.id, MockShaderProgram::KIND)?;
        Ok(MockComputePipeline { id: self.allocate(MockComputePipeline::KIND) })
    }

    fn release_compute_pipeline(&mut self, pipeline: MockComputePipeline) -> Result<()> {
        self.begin_call("release_compute_pipeline")?;
        self.free(pipeline.id, MockComputePipeline::KIND)
    }

    // ===== QUERIES, FENCES, COMMAND BUFFERS =====

    fn create_query(&mut self, _desc: &QueryDesc) -> Result<MockQuery> {
        self.begin_call("create_query")?;
        Ok(MockQuery { id: self.allocate(MockQuery::KIND) })
    }

    fn release_query(&mut self, query: MockQuery) -> Result<()> {
        self.begin_call("release_query")?;
        self.free(query.id, MockQuery::KIND)
    }

    fn create_fence(&mut self) -> Result<MockFence> {
        self.begin_call("create_fence")?;
        Ok(MockFence { id: self.allocate(MockFence::KIND) })
    }

    fn release_fence(&mut self, fence: MockFence) -> Result<()> {
        self.begin_call("release_fence")?;
        self.free(fence.id, MockFence::KIND)
    }

    fn create_command_buffer(&mut self) -> Result<MockCommandBuffer> {
        self.begin_call("create_command_buffer")?;
        Ok(MockCommandBuffer { id: self.allocate(MockCommandBuffer::KIND) })
    }

    fn release_command_buffer(&mut self, command_buffer: MockCommandBuffer) -> Result<()> {
        self.begin_call("release_command_buffer")?;
        self.free(command_buffer.id, MockCommandBuffer::KIND)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_render_system_tests.rs"]
mod tests;
