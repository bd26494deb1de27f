/// Object registry for the debug layer.
///
/// Every object the debug layer hands out is a generational slot-map key
/// pointing at a tracked entry: the native handle of the wrapped render
/// system plus the metadata needed to validate later calls on the object.
/// Keys of released objects never match again, even when their slot is reused.

use slotmap::{new_key_type, Key, SlotMap};
use galaxy_3d_render::galaxy3d::RenderSystem;
use galaxy_3d_render::galaxy3d::debug::{ResourceKind, ValidationError, ValidationErrorKind};
use galaxy_3d_render::galaxy3d::render::{
    BufferDesc, CpuAccess, TextureDesc, ShaderStage, ShaderStageFlags, BindingDesc,
};

// ===== HANDLES =====

new_key_type! {
    /// Render context created through the debug layer
    pub struct RenderContextHandle;
    /// Buffer created through the debug layer
    pub struct BufferHandle;
    pub struct BufferArrayHandle;
    /// Texture created through the debug layer
    pub struct TextureHandle;
    pub struct TextureArrayHandle;
    pub struct SamplerHandle;
    pub struct SamplerArrayHandle;
    pub struct RenderTargetHandle;
    /// Shader created through the debug layer
    pub struct ShaderHandle;
    pub struct ShaderProgramHandle;
    pub struct PipelineLayoutHandle;
    pub struct GraphicsPipelineHandle;
    pub struct ComputePipelineHandle;
    pub struct ResourceHeapHandle;
    pub struct QueryHandle;
    pub struct FenceHandle;
    pub struct CommandBufferHandle;
}

// ===== TRACKED METADATA =====

/// A native handle paired with debug-only metadata
#[derive(Debug)]
pub(crate) struct Tracked<N, M> {
    pub native: N,
    pub meta: M,
}

impl<N, M> Tracked<N, M> {
    pub fn new(native: N, meta: M) -> Self {
        Self { native, meta }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct BufferMeta {
    pub desc: BufferDesc,
    /// Access the buffer is currently mapped with
    pub mapped: Option<CpuAccess>,
}

impl BufferMeta {
    pub fn new(desc: &BufferDesc) -> Self {
        Self {
            desc: desc.clone(),
            mapped: None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TextureMeta {
    pub desc: TextureDesc,
    /// Number of mip levels holding defined contents (never decreases)
    pub generated_mip_levels: u32,
}

impl TextureMeta {
    pub fn new(desc: &TextureDesc) -> Self {
        Self {
            desc: desc.clone(),
            generated_mip_levels: 1,
        }
    }

    /// Record that levels `[0, level_count)` now hold defined contents
    pub fn mark_generated(&mut self, level_count: u32) {
        self.generated_mip_levels = self
            .generated_mip_levels
            .max(level_count.min(self.desc.mip_levels));
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ShaderMeta {
    pub stage: ShaderStage,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ShaderProgramMeta {
    /// Stages with an attached shader
    pub stages: ShaderStageFlags,
}

#[derive(Debug, Clone)]
pub(crate) struct PipelineLayoutMeta {
    pub bindings: Vec<BindingDesc>,
}

// ===== CONTAINER =====

/// Live objects of one resource kind
pub(crate) struct HwObjectContainer<K: Key, T> {
    kind: ResourceKind,
    objects: SlotMap<K, T>,
}

impl<K: Key, T> HwObjectContainer<K, T> {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            objects: SlotMap::with_key(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Register a new object and return its handle
    pub fn insert(&mut self, entry: T) -> K {
        self.objects.insert(entry)
    }

    /// Entry of a live object, `NotFound` for unknown or released handles
    pub fn lookup(&self, key: K, source: &str) -> Result<&T, ValidationError> {
        self.objects.get(key).ok_or_else(|| self.not_found(key, source))
    }

    /// Entry of an optional reference; `None` stays `None`
    pub fn lookup_opt(&self, key: Option<K>, source: &str) -> Result<Option<&T>, ValidationError> {
        key.map(|key| self.lookup(key, source)).transpose()
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.objects.get_mut(key)
    }

    /// Remove an object and hand its entry back for backend teardown
    pub fn release(&mut self, key: K, source: &str) -> Result<T, ValidationError> {
        let kind = self.kind;
        self.objects.remove(key).ok_or_else(|| not_found_error(kind, key, source))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    fn not_found(&self, key: K, source: &str) -> ValidationError {
        not_found_error(self.kind, key, source)
    }
}

fn not_found_error<K: Key>(kind: ResourceKind, key: K, source: &str) -> ValidationError {
    ValidationError::new(
        ValidationErrorKind::NotFound,
        source,
        format!("{} {:?} is uninitialized or was released", kind.name(), key.data()),
    )
}

// ===== REGISTRY =====

/// One container per resource kind
pub(crate) struct ObjectRegistry<R: RenderSystem> {
    pub render_contexts: HwObjectContainer<RenderContextHandle, Tracked<R::RenderContext, ()>>,
    pub buffers: HwObjectContainer<BufferHandle, Tracked<R::Buffer, BufferMeta>>,
    pub buffer_arrays: HwObjectContainer<BufferArrayHandle, Tracked<R::BufferArray, ()>>,
    pub textures: HwObjectContainer<TextureHandle, Tracked<R::Texture, TextureMeta>>,
    pub texture_arrays: HwObjectContainer<TextureArrayHandle, Tracked<R::TextureArray, ()>>,
    pub samplers: HwObjectContainer<SamplerHandle, Tracked<R::Sampler, ()>>,
    pub sampler_arrays: HwObjectContainer<SamplerArrayHandle, Tracked<R::SamplerArray, ()>>,
    pub render_targets: HwObjectContainer<RenderTargetHandle, Tracked<R::RenderTarget, ()>>,
    pub shaders: HwObjectContainer<ShaderHandle, Tracked<R::Shader, ShaderMeta>>,
    pub shader_programs: HwObjectContainer<ShaderProgramHandle, Tracked<R::ShaderProgram, ShaderProgramMeta>>,
    pub pipeline_layouts: HwObjectContainer<PipelineLayoutHandle, Tracked<R::PipelineLayout, PipelineLayoutMeta>>,
    pub graphics_pipelines: HwObjectContainer<GraphicsPipelineHandle, Tracked<R::GraphicsPipeline, ()>>,
    pub compute_pipelines: HwObjectContainer<ComputePipelineHandle, Tracked<R::ComputePipeline, ()>>,
    pub resource_heaps: HwObjectContainer<ResourceHeapHandle, Tracked<R::ResourceHeap, ()>>,
    pub queries: HwObjectContainer<QueryHandle, Tracked<R::Query, ()>>,
    pub fences: HwObjectContainer<FenceHandle, Tracked<R::Fence, ()>>,
    pub command_buffers: HwObjectContainer<CommandBufferHandle, Tracked<R::CommandBuffer, ()>>,
}

impl<R: RenderSystem> ObjectRegistry<R> {
    pub fn new() -> Self {
        Self {
            render_contexts: HwObjectContainer::new(ResourceKind::RenderContext),
            buffers: HwObjectContainer::new(ResourceKind::Buffer),
            buffer_arrays: HwObjectContainer::new(ResourceKind::BufferArray),
            textures: HwObjectContainer::new(ResourceKind::Texture),
            texture_arrays: HwObjectContainer::new(ResourceKind::TextureArray),
            samplers: HwObjectContainer::new(ResourceKind::Sampler),
            sampler_arrays: HwObjectContainer::new(ResourceKind::SamplerArray),
            render_targets: HwObjectContainer::new(ResourceKind::RenderTarget),
            shaders: HwObjectContainer::new(ResourceKind::Shader),
            shader_programs: HwObjectContainer::new(ResourceKind::ShaderProgram),
            pipeline_layouts: HwObjectContainer::new(ResourceKind::PipelineLayout),
            graphics_pipelines: HwObjectContainer::new(ResourceKind::GraphicsPipeline),
            compute_pipelines: HwObjectContainer::new(ResourceKind::ComputePipeline),
            resource_heaps: HwObjectContainer::new(ResourceKind::ResourceHeap),
            queries: HwObjectContainer::new(ResourceKind::Query),
            fences: HwObjectContainer::new(ResourceKind::Fence),
            command_buffers: HwObjectContainer::new(ResourceKind::CommandBuffer),
        }
    }

    /// Number of live objects of one kind
    pub fn len(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::RenderContext => self.render_contexts.len(),
            ResourceKind::Buffer => self.buffers.len(),
            ResourceKind::BufferArray => self.buffer_arrays.len(),
            ResourceKind::Texture => self.textures.len(),
            ResourceKind::TextureArray => self.texture_arrays.len(),
            ResourceKind::Sampler => self.samplers.len(),
            ResourceKind::SamplerArray => self.sampler_arrays.len(),
            ResourceKind::RenderTarget => self.render_targets.len(),
            ResourceKind::Shader => self.shaders.len(),
            ResourceKind::ShaderProgram => self.shader_programs.len(),
            ResourceKind::PipelineLayout => self.pipeline_layouts.len(),
            ResourceKind::GraphicsPipeline => self.graphics_pipelines.len(),
            ResourceKind::ComputePipeline => self.compute_pipelines.len(),
            ResourceKind::ResourceHeap => self.resource_heaps.len(),
            ResourceKind::Query => self.queries.len(),
            ResourceKind::Fence => self.fences.len(),
            ResourceKind::CommandBuffer => self.command_buffers.len(),
        }
    }

    /// Number of live objects of every kind
    pub fn total_len(&self) -> usize {
        ALL_KINDS.iter().map(|kind| self.len(*kind)).sum()
    }

    /// Kinds with live objects and their counts
    pub fn live_objects(&self) -> Vec<(ResourceKind, usize)> {
        ALL_KINDS
            .iter()
            .map(|kind| (*kind, self.len(*kind)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

const ALL_KINDS: [ResourceKind; 17] = [
    ResourceKind::RenderContext,
    ResourceKind::Buffer,
    ResourceKind::BufferArray,
    ResourceKind::Texture,
    ResourceKind::TextureArray,
    ResourceKind::Sampler,
    ResourceKind::SamplerArray,
    ResourceKind::RenderTarget,
    ResourceKind::Shader,
    ResourceKind::ShaderProgram,
    ResourceKind::PipelineLayout,
    ResourceKind::GraphicsPipeline,
    ResourceKind::ComputePipeline,
    ResourceKind::ResourceHeap,
    ResourceKind::Query,
    ResourceKind::Fence,
    ResourceKind::CommandBuffer,
];

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
