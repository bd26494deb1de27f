/// DebugRenderSystem - validating implementation of the RenderSystem trait
///
/// Wraps another render system. Every call resolves its input handles in the
/// object registry, validates the descriptor, and only then forwards to the
/// wrapped instance. Objects created through the layer are handed out as
/// generational handles owning the native object.

use std::sync::Arc;
use slotmap::Key;
use galaxy_3d_render::{render_info, render_warn};
use galaxy_3d_render::galaxy3d::{RenderSystem, Result};
use galaxy_3d_render::galaxy3d::debug::{RenderingDebugger, RenderingProfiler, ResourceKind};
use galaxy_3d_render::galaxy3d::render::{
    AttachmentDesc, BufferDesc, ComputePipelineDesc, CpuAccess, DataType, GraphicsPipelineDesc,
    ImageDesc, ImageFormat, MipRange, PipelineLayoutDesc, QueryDesc, RenderContextDesc,
    RenderTargetDesc, RendererFamily, RendererInfo, RenderingCaps, RenderSystemConfig,
    ResourceHeapDesc, ResourceView, SamplerDesc, ShaderDesc, ShaderProgramDesc, ShadingLanguage,
    SubTextureDesc, TextureDesc,
};
use crate::config::DebugLayerConfig;
use crate::registry::*;
use crate::report::{Diagnostics, Findings, ValidationStats};
use crate::validation::buffer::{
    validate_buffer_array, validate_buffer_desc, validate_buffer_map, validate_buffer_release,
    validate_buffer_unmap, validate_buffer_write,
};
use crate::validation::texture::{
    is_empty_mip_range, is_empty_region, validate_generate_mips, validate_generate_mips_range,
    validate_initial_image, validate_texture_desc, validate_texture_read, validate_texture_write,
};
use crate::validation::shader::{validate_shader_desc, validate_shader_program, AttachedShader};
use crate::validation::pipeline::{
    validate_compute_pipeline, validate_graphics_pipeline, validate_pipeline_layout,
    validate_resource_heap, BoundResource,
};
use crate::validation::resource::{
    validate_array_len, validate_query_desc, validate_render_context_desc, validate_render_target,
    validate_sampler_desc, ResolvedAttachment,
};

/// Minimum constant buffer alignment enforced for Direct3D backends (bytes)
const D3D_CONSTANT_BUFFER_ALIGNMENT: u64 = 16;

/// Debug layer wrapping a render system
pub struct DebugRenderSystem<R: RenderSystem> {
    /// Wrapped render system
    instance: R,
    /// Limits enforced by the validators
    caps: RenderingCaps,
    family: RendererFamily,
    registry: ObjectRegistry<R>,
    diagnostics: Diagnostics,
    profiler: Option<Arc<RenderingProfiler>>,
}

impl<R: RenderSystem> DebugRenderSystem<R> {
    /// Wrap a render system
    ///
    /// # Arguments
    ///
    /// * `instance` - Render system receiving the validated calls
    /// * `profiler` - Counts the calls forwarded to `instance`
    /// * `debugger` - Receives every warning and error found by the layer
    pub fn new(
        instance: R,
        profiler: Option<Arc<RenderingProfiler>>,
        debugger: Option<Arc<dyn RenderingDebugger>>,
    ) -> Self {
        let info = instance.renderer_info();
        let family = info.family();
        let caps = effective_caps(instance.rendering_caps(), family);

        render_info!("galaxy3d::debug", "Debug layer enabled for {} on {} ({:?} family)",
            info.renderer_name, info.device_name, family);

        Self {
            instance,
            caps,
            family,
            registry: ObjectRegistry::new(),
            diagnostics: Diagnostics::new(debugger, DebugLayerConfig::default()),
            profiler,
        }
    }

    /// Same layer with the given configuration
    pub fn with_config(mut self, config: DebugLayerConfig) -> Self {
        self.diagnostics.set_config(config);
        self
    }

    pub fn config(&self) -> &DebugLayerConfig {
        self.diagnostics.config()
    }

    pub fn set_config(&mut self, config: DebugLayerConfig) {
        self.diagnostics.set_config(config);
    }

    /// API family of the wrapped render system
    pub fn renderer_family(&self) -> RendererFamily {
        self.family
    }

    /// Limits the validators check against
    ///
    /// The wrapped system's capabilities, tightened by family-specific rules.
    pub fn validation_caps(&self) -> &RenderingCaps {
        &self.caps
    }

    pub fn instance(&self) -> &R {
        &self.instance
    }

    /// Direct access to the wrapped render system
    ///
    /// Objects created through this reference are not tracked by the layer.
    pub fn instance_mut(&mut self) -> &mut R {
        &mut self.instance
    }

    /// Remove the layer and return the wrapped render system
    ///
    /// Objects still alive are leaked: their native handles are dropped
    /// without being released.
    pub fn into_inner(self) -> R {
        for (kind, count) in self.registry.live_objects() {
            render_warn!("galaxy3d::debug", "{} {} object(s) still alive when removing the debug layer",
                count, kind.name());
        }
        self.instance
    }

    /// Errors and warnings reported so far
    pub fn validation_stats(&self) -> ValidationStats {
        self.diagnostics.stats()
    }

    pub fn reset_validation_stats(&self) {
        self.diagnostics.reset_stats();
    }

    /// Number of live objects of one kind created through the layer
    pub fn live_count(&self, kind: ResourceKind) -> usize {
        self.registry.len(kind)
    }

    pub fn live_object_count(&self) -> usize {
        self.registry.total_len()
    }

    /// Kinds with live objects and their counts
    pub fn live_objects(&self) -> Vec<(ResourceKind, usize)> {
        self.registry.live_objects()
    }
}

/// Capabilities with the rules of the backend family applied
fn effective_caps(mut caps: RenderingCaps, family: RendererFamily) -> RenderingCaps {
    if family == RendererFamily::Direct3D {
        caps.constant_buffer_alignment = caps.constant_buffer_alignment.max(D3D_CONSTANT_BUFFER_ALIGNMENT);
    }
    caps
}

fn profile(profiler: &Option<Arc<RenderingProfiler>>, record: impl FnOnce(&RenderingProfiler)) {
    if let Some(profiler) = profiler {
        record(profiler);
    }
}

/// Track a native object created by the wrapped render system
fn register<K: Key, N, M>(
    profiler: &Option<Arc<RenderingProfiler>>,
    container: &mut HwObjectContainer<K, Tracked<N, M>>,
    native: N,
    meta: M,
) -> K {
    profile(profiler, |p| p.record_create(container.kind()));
    container.insert(Tracked::new(native, meta))
}

/// Stop tracking an object and release its native object
///
/// The handle is invalid afterwards, even if the wrapped render system
/// fails to release the native object.
fn release_tracked<K: Key, N, M>(
    diagnostics: &Diagnostics,
    profiler: &Option<Arc<RenderingProfiler>>,
    container: &mut HwObjectContainer<K, Tracked<N, M>>,
    key: K,
    source: &'static str,
    release: impl FnOnce(N) -> Result<()>,
) -> Result<()> {
    let entry = diagnostics.check(container.release(key, source))?;
    diagnostics.trace_delegation(source);
    release(entry.native)?;
    profile(profiler, |p| p.record_release(container.kind()));
    Ok(())
}

impl<R: RenderSystem> RenderSystem for DebugRenderSystem<R> {
    type RenderContext = RenderContextHandle;
    type Buffer = BufferHandle;
    type BufferArray = BufferArrayHandle;
    type Texture = TextureHandle;
    type TextureArray = TextureArrayHandle;
    type Sampler = SamplerHandle;
    type SamplerArray = SamplerArrayHandle;
    type RenderTarget = RenderTargetHandle;
    type Shader = ShaderHandle;
    type ShaderProgram = ShaderProgramHandle;
    type PipelineLayout = PipelineLayoutHandle;
    type GraphicsPipeline = GraphicsPipelineHandle;
    type ComputePipeline = ComputePipelineHandle;
    type ResourceHeap = ResourceHeapHandle;
    type Query = QueryHandle;
    type Fence = FenceHandle;
    type CommandBuffer = CommandBufferHandle;

    // ===== COMMON =====

    fn renderer_info(&self) -> RendererInfo {
        self.instance.renderer_info()
    }

    fn rendering_caps(&self) -> RenderingCaps {
        self.instance.rendering_caps()
    }

    fn shading_language(&self) -> ShadingLanguage {
        self.instance.shading_language()
    }

    fn set_configuration(&mut self, config: RenderSystemConfig) {
        self.diagnostics.trace_delegation("set_configuration");
        self.instance.set_configuration(config);
    }

    // ===== RENDER CONTEXT =====

    fn create_render_context(&mut self, desc: &RenderContextDesc) -> Result<RenderContextHandle> {
        const SOURCE: &str = "create_render_context";
        let mut findings = Findings::new(SOURCE);
        validate_render_context_desc(&mut findings, &self.caps, desc);
        self.diagnostics.resolve(findings)?;

        self.diagnostics.trace_delegation(SOURCE);
        let native = self.instance.create_render_context(desc)?;
        Ok(register(&self.profiler, &mut self.registry.render_contexts, native, ()))
    }

    fn release_render_context(&mut self, render_context: RenderContextHandle) -> Result<()> {
        release_tracked(
            &self.diagnostics,
            &self.profiler,
            &mut self.registry.render_contexts,
            render_context,
            "release_render_context",
            |native| self.instance.release_render_context(native),
        )
    }

    fn make_current(&mut self, render_context: &RenderContextHandle) -> Result<()> {
        const SOURCE: &str = "make_current";
        let entry = self.diagnostics.check(self.registry.render_contexts.lookup(*render_context, SOURCE))?;

        self.diagnostics.trace_delegation(SOURCE);
        self.instance.make_current(&entry.native)
    }

    // ===== BUFFERS =====

    fn create_buffer(&mut self, desc: &BufferDesc, initial_data: Option<&[u8]>) -> Result<BufferHandle> {
        const SOURCE: &str = "create_buffer";
        let mut findings = Findings::new(SOURCE);
        validate_buffer_desc(&mut findings, &self.caps, desc, initial_data);
        self.diagnostics.resolve(findings)?;

        self.diagnostics.trace_delegation(SOURCE);
        let native = self.instance.create_buffer(desc, initial_data)?;
        Ok(register(&self.profiler, &mut self.registry.buffers, native, BufferMeta::new(desc)))
    }

    fn release_buffer(&mut self, buffer: BufferHandle) -> Result<()> {
        const SOURCE: &str = "release_buffer";
        let entry = self.diagnostics.check(self.registry.buffers.lookup(buffer, SOURCE))?;
        let mut findings = Findings::new(SOURCE);
        validate_buffer_release(&mut findings, &entry.meta);
        self.diagnostics.resolve(findings)?;

        release_tracked(
            &self.diagnostics,
            &self.profiler,
            &mut self.registry.buffers,
            buffer,
            SOURCE,
            |native| self.instance.release_buffer(native),
        )
    }

    fn write_buffer(&mut self, buffer: &BufferHandle, offset: u64, data: &[u8]) -> Result<()> {
        const SOURCE: &str = "write_buffer";
        let entry = self.diagnostics.check(self.registry.buffers.lookup(*buffer, SOURCE))?;
        let mut findings = Findings::new(SOURCE);
        validate_buffer_write(&mut findings, &entry.meta, offset, data.len());
        self.diagnostics.resolve(findings)?;

        if data.is_empty() {
            return Ok(());
        }

        self.diagnostics.trace_delegation(SOURCE);
        self.instance.write_buffer(&entry.native, offset, data)?;
        profile(&self.profiler, |p| p.record_buffer_write(data.len() as u64));
        Ok(())
    }

    fn map_buffer(&mut self, buffer: &BufferHandle, access: CpuAccess) -> Result<&mut [u8]> {
        const SOURCE: &str = "map_buffer";
        let entry = self.diagnostics.check(self.registry.buffers.lookup(*buffer, SOURCE))?;
        let mut findings = Findings::new(SOURCE);
        validate_buffer_map(&mut findings, &entry.meta, access);
        self.diagnostics.resolve(findings)?;

        self.diagnostics.trace_delegation(SOURCE);
        let mapped = self.instance.map_buffer(&entry.native, access)?;
        if let Some(entry) = self.registry.buffers.get_mut(*buffer) {
            entry.meta.mapped = Some(access);
        }
        profile(&self.profiler, |p| p.record_buffer_map());
        Ok(mapped)
    }

    fn unmap_buffer(&mut self, buffer: &BufferHandle) -> Result<()> {
        const SOURCE: &str = "unmap_buffer";
        let entry = self.diagnostics.check(self.registry.buffers.lookup(*buffer, SOURCE))?;
        let mut findings = Findings::new(SOURCE);
        validate_buffer_unmap(&mut findings, &entry.meta);
        self.diagnostics.resolve(findings)?;

        self.diagnostics.trace_delegation(SOURCE);
        self.instance.unmap_buffer(&entry.native)?;
        if let Some(entry) = self.registry.buffers.get_mut(*buffer) {
            entry.meta.mapped = None;
        }
        Ok(())
    }

    fn create_buffer_array(&mut self, buffers: &[&BufferHandle]) -> Result<BufferArrayHandle> {
        const SOURCE: &str = "create_buffer_array";
        let mut natives = Vec::with_capacity(buffers.len());
        let mut kinds = Vec::with_capacity(buffers.len());
        for buffer in buffers {
            let entry = self.diagnostics.check(self.registry.buffers.lookup(**buffer, SOURCE))?;
            natives.push(&entry.native);
            kinds.push(entry.meta.desc.kind);
        }

        let mut findings = Findings::new(SOURCE);
        validate_buffer_array(&mut findings, &kinds);
        self.diagnostics.resolve(findings)?;

        self.diagnostics.trace_delegation(SOURCE);
        let native = self.instance.create_buffer_array(&natives)?;
        Ok(register(&self.profiler, &mut self.registry.buffer_arrays, native, ()))
    }

    fn release_buffer_array(&mut self, buffer_array: BufferArrayHandle) -> Result<()> {
        release_tracked(
            &self.diagnostics,
            &self.profiler,
            &mut self.registry.buffer_arrays,
            buffer_array,
            "release_buffer_array",
            |native| self.instance.release_buffer_array(native),
        )
    }

    // ===== TEXTURES =====

    fn create_texture(&mut self, desc: &TextureDesc, image: Option<&ImageDesc<'_>>) -> Result<TextureHandle> {
        const SOURCE: &str = "create_texture";
        let mut findings = Findings::new(SOURCE);
        validate_texture_desc(&mut findings, &self.caps, desc);
        if let Some(image) = image {
            validate_initial_image(&mut findings, desc, image);
        }
        self.diagnostics.resolve(findings)?;

        self.diagnostics.trace_delegation(SOURCE);
        let native = self.instance.create_texture(desc, image)?;
        Ok(register(&self.profiler, &mut self.registry.textures, native, TextureMeta::new(desc)))
    }

    fn release_texture(&mut self, texture: TextureHandle) -> Result<()> {
        release_tracked(
            &self.diagnostics,
            &self.profiler,
            &mut self.registry.textures,
            texture,
            "release_texture",
            |native| self.instance.release_texture(native),
        )
    }

    fn query_texture_desc(&self, texture: &TextureHandle) -> Result<TextureDesc> {
        const SOURCE: &str = "query_texture_desc";
        let entry = self.diagnostics.check(self.registry.textures.lookup(*texture, SOURCE))?;
        self.instance.query_texture_desc(&entry.native)
    }

    fn write_texture(&mut self, texture: &TextureHandle, region: &SubTextureDesc, image: &ImageDesc<'_>) -> Result<()> {
        const SOURCE: &str = "write_texture";
        let entry = self.diagnostics.check(self.registry.textures.lookup(*texture, SOURCE))?;
        let mut findings = Findings::new(SOURCE);
        validate_texture_write(&mut findings, &entry.meta, region, image);
        self.diagnostics.resolve(findings)?;

        if is_empty_region(region) {
            return Ok(());
        }

        self.diagnostics.trace_delegation(SOURCE);
        self.instance.write_texture(&entry.native, region, image)?;
        profile(&self.profiler, |p| p.record_texture_write());
        Ok(())
    }

    fn read_texture(
        &mut self,
        texture: &TextureHandle,
        mip_level: u32,
        format: ImageFormat,
        data_type: DataType,
        data: &mut [u8],
    ) -> Result<()> {
        const SOURCE: &str = "read_texture";
        let entry = self.diagnostics.check(self.registry.textures.lookup(*texture, SOURCE))?;
        let mut findings = Findings::new(SOURCE);
        validate_texture_read(&mut findings, &entry.meta, mip_level, format, data_type, data.len());
        self.diagnostics.resolve(findings)?;

        self.diagnostics.trace_delegation(SOURCE);
        self.instance.read_texture(&entry.native, mip_level, format, data_type, data)?;
        profile(&self.profiler, |p| p.record_texture_read());
        Ok(())
    }

    fn generate_mips(&mut self, texture: &TextureHandle) -> Result<()> {
        const SOURCE: &str = "generate_mips";
        let entry = self.diagnostics.check(self.registry.textures.lookup(*texture, SOURCE))?;
        let mut findings = Findings::new(SOURCE);
        validate_generate_mips(&mut findings, &entry.meta);
        self.diagnostics.resolve(findings)?;

        self.diagnostics.trace_delegation(SOURCE);
        self.instance.generate_mips(&entry.native)?;
        if let Some(entry) = self.registry.textures.get_mut(*texture) {
            let mip_levels = entry.meta.desc.mip_levels;
            entry.meta.mark_generated(mip_levels);
        }
        profile(&self.profiler, |p| p.record_mip_generation());
        Ok(())
    }

    fn generate_mips_range(&mut self, texture: &TextureHandle, range: &MipRange) -> Result<()> {
        const SOURCE: &str = "generate_mips_range";
        let entry = self.diagnostics.check(self.registry.textures.lookup(*texture, SOURCE))?;
        let mut findings = Findings::new(SOURCE);
        validate_generate_mips_range(&mut findings, &entry.meta, range);
        self.diagnostics.resolve(findings)?;

        if is_empty_mip_range(range) {
            return Ok(());
        }

        self.diagnostics.trace_delegation(SOURCE);
        self.instance.generate_mips_range(&entry.native, range)?;
        if let Some(entry) = self.registry.textures.get_mut(*texture) {
            entry.meta.mark_generated(range.base_mip_level.saturating_add(range.num_mip_levels));
        }
        profile(&self.profiler, |p| p.record_mip_generation());
        Ok(())
    }

    fn create_texture_array(&mut self, textures: &[&TextureHandle]) -> Result<TextureArrayHandle> {
        const SOURCE: &str = "create_texture_array";
        let mut natives = Vec::with_capacity(textures.len());
        for texture in textures {
            let entry = self.diagnostics.check(self.registry.textures.lookup(**texture, SOURCE))?;
            natives.push(&entry.native);
        }

        let mut findings = Findings::new(SOURCE);
        validate_array_len(&mut findings, ResourceKind::Texture, natives.len());
        self.diagnostics.resolve(findings)?;

        self.diagnostics.trace_delegation(SOURCE);
        let native = self.instance.create_texture_array(&natives)?;
        Ok(register(&self.profiler, &mut self.registry.texture_arrays, native, ()))
    }

    fn release_texture_array(&mut self, texture_array: TextureArrayHandle) -> Result<()> {
        release_tracked(
            &self.diagnostics,
            &self.profiler,
            &mut self.registry.texture_arrays,
            texture_array,
            "release_texture_array",
            |native| self.instance.release_texture_array(native),
        )
    }

    // ===== SAMPLERS =====

    fn create_sampler(&mut self, desc: &SamplerDesc) -> Result<SamplerHandle> {
        const SOURCE: &str = "create_sampler";
        let mut findings = Findings::new(SOURCE);
        validate_sampler_desc(&mut findings, &self.caps, desc);
        self.diagnostics.resolve(findings)?;

        self.diagnostics.trace_delegation(SOURCE);
        let native = self.instance.create_sampler(desc)?;
        Ok(register(&self.profiler, &mut self.registry.samplers, native, ()))
    }

    fn release_sampler(&mut self, sampler: SamplerHandle) -> Result<()> {
        release_tracked(
            &self.diagnostics,
            &self.profiler,
            &mut self.registry.samplers,
            sampler,
            "release_sampler",
            |native| self.instance.release_sampler(native),
        )
    }

    fn create_sampler_array(&mut self, samplers: &[&SamplerHandle]) -> Result<SamplerArrayHandle> {
        const SOURCE: &str = "create_sampler_array";
        let mut natives = Vec::with_capacity(samplers.len());
        for sampler in samplers {
            let entry = self.diagnostics.check(self.registry.samplers.lookup(**sampler, SOURCE))?;
            natives.push(&entry.native);
        }

        let mut findings = Findings::new(SOURCE);
        validate_array_len(&mut findings, ResourceKind::Sampler, natives.len());
        self.diagnostics.resolve(findings)?;

        self.diagnostics.trace_delegation(SOURCE);
        let native = self.instance.create_sampler_array(&natives)?;
        Ok(register(&self.profiler, &mut self.registry.sampler_arrays, native, ()))
    }

    fn release_sampler_array(&mut self, sampler_array: SamplerArrayHandle) -> Result<()> {
        release_tracked(
            &self.diagnostics,
            &self.profiler,
            &mut self.registry.sampler_arrays,
            sampler_array,
            "release_sampler_array",
            |native| self.instance.release_sampler_array(native),
        )
    }

    // ===== RENDER TARGETS =====

    fn create_render_target(&mut self, desc: &RenderTargetDesc<'_, Self>) -> Result<RenderTargetHandle> {
        const SOURCE: &str = "create_render_target";
        let mut resolved = Vec::with_capacity(desc.attachments.len());
        let mut attachments: Vec<AttachmentDesc<'_, R>> = Vec::with_capacity(desc.attachments.len());
        for attachment in &desc.attachments {
            let texture = self
                .diagnostics
                .check(self.registry.textures.lookup_opt(attachment.texture.copied(), SOURCE))?;
            resolved.push(ResolvedAttachment {
                attachment_type: attachment.attachment_type,
                texture: texture.map(|entry| &entry.meta.desc),
                mip_level: attachment.mip_level,
                array_layer: attachment.array_layer,
            });
            attachments.push(AttachmentDesc {
                attachment_type: attachment.attachment_type,
                texture: texture.map(|entry| &entry.native),
                mip_level: attachment.mip_level,
                array_layer: attachment.array_layer,
            });
        }

        let mut findings = Findings::new(SOURCE);
        validate_render_target(&mut findings, &self.caps, desc.resolution, desc.samples, &resolved);
        self.diagnostics.resolve(findings)?;

        let native_desc: RenderTargetDesc<'_, R> = RenderTargetDesc {
            resolution: desc.resolution,
            samples: desc.samples,
            attachments,
        };
        self.diagnostics.trace_delegation(SOURCE);
        let native = self.instance.create_render_target(&native_desc)?;
        Ok(register(&self.profiler, &mut self.registry.render_targets, native, ()))
    }

    fn release_render_target(&mut self, render_target: RenderTargetHandle) -> Result<()> {
        release_tracked(
            &self.diagnostics,
            &self.profiler,
            &mut self.registry.render_targets,
            render_target,
            "release_render_target",
            |native| self.instance.release_render_target(native),
        )
    }

    // ===== SHADERS =====

    fn create_shader(&mut self, desc: &ShaderDesc) -> Result<ShaderHandle> {
        const SOURCE: &str = "create_shader";
        let mut findings = Findings::new(SOURCE);
        validate_shader_desc(&mut findings, &self.caps, desc);
        self.diagnostics.resolve(findings)?;

        self.diagnostics.trace_delegation(SOURCE);
        let native = self.instance.create_shader(desc)?;
        Ok(register(&self.profiler, &mut self.registry.shaders, native, ShaderMeta { stage: desc.stage }))
    }

    fn release_shader(&mut self, shader: ShaderHandle) -> Result<()> {
        release_tracked(
            &self.diagnostics,
            &self.profiler,
            &mut self.registry.shaders,
            shader,
            "release_shader",
            |native| self.instance.release_shader(native),
        )
    }

    fn create_shader_program(&mut self, desc: &ShaderProgramDesc<'_, Self>) -> Result<ShaderProgramHandle> {
        const SOURCE: &str = "create_shader_program";
        let mut attached = Vec::new();
        let mut natives: [Option<&R::Shader>; 6] = [None; 6];
        for (native, (slot, shader)) in natives.iter_mut().zip(desc.slots()) {
            let entry = self.diagnostics.check(self.registry.shaders.lookup_opt(shader.copied(), SOURCE))?;
            if let Some(entry) = entry {
                attached.push(AttachedShader { slot, stage: entry.meta.stage });
                *native = Some(&entry.native);
            }
        }

        let mut findings = Findings::new(SOURCE);
        let stages = validate_shader_program(&mut findings, &self.caps, &attached, desc.vertex_attribute_count());
        self.diagnostics.resolve(findings)?;

        // Same order as `ShaderProgramDesc::slots`
        let [vertex_shader, tess_control_shader, tess_evaluation_shader, geometry_shader, fragment_shader, compute_shader] =
            natives;
        let native_desc: ShaderProgramDesc<'_, R> = ShaderProgramDesc {
            vertex_shader,
            tess_control_shader,
            tess_evaluation_shader,
            geometry_shader,
            fragment_shader,
            compute_shader,
            vertex_formats: desc.vertex_formats.clone(),
        };
        self.diagnostics.trace_delegation(SOURCE);
        let native = self.instance.create_shader_program(&native_desc)?;
        Ok(register(&self.profiler, &mut self.registry.shader_programs, native, ShaderProgramMeta { stages }))
    }

    fn release_shader_program(&mut self, shader_program: ShaderProgramHandle) -> Result<()> {
        release_tracked(
            &self.diagnostics,
            &self.profiler,
            &mut self.registry.shader_programs,
            shader_program,
            "release_shader_program",
            |native| self.instance.release_shader_program(native),
        )
    }

    // ===== PIPELINE LAYOUTS AND RESOURCE HEAPS =====

    fn create_pipeline_layout(&mut self, desc: &PipelineLayoutDesc) -> Result<PipelineLayoutHandle> {
        const SOURCE: &str = "create_pipeline_layout";
        let mut findings = Findings::new(SOURCE);
        validate_pipeline_layout(&mut findings, &self.caps, &desc.bindings);
        self.diagnostics.resolve(findings)?;

        self.diagnostics.trace_delegation(SOURCE);
        let native = self.instance.create_pipeline_layout(desc)?;
        let meta = PipelineLayoutMeta { bindings: desc.bindings.clone() };
        Ok(register(&self.profiler, &mut self.registry.pipeline_layouts, native, meta))
    }

    fn release_pipeline_layout(&mut self, pipeline_layout: PipelineLayoutHandle) -> Result<()> {
        release_tracked(
            &self.diagnostics,
            &self.profiler,
            &mut self.registry.pipeline_layouts,
            pipeline_layout,
            "release_pipeline_layout",
            |native| self.instance.release_pipeline_layout(native),
        )
    }

    fn create_resource_heap(&mut self, desc: &ResourceHeapDesc<'_, Self>) -> Result<ResourceHeapHandle> {
        const SOURCE: &str = "create_resource_heap";
        let layout = self
            .diagnostics
            .check(self.registry.pipeline_layouts.lookup(*desc.pipeline_layout, SOURCE))?;

        let mut bound = Vec::with_capacity(desc.resources.len());
        let mut resources: Vec<ResourceView<'_, R>> = Vec::with_capacity(desc.resources.len());
        for view in &desc.resources {
            match view {
                ResourceView::Buffer(buffer) => {
                    let entry = self.diagnostics.check(self.registry.buffers.lookup(**buffer, SOURCE))?;
                    bound.push(BoundResource::Buffer(entry.meta.desc.kind));
                    resources.push(ResourceView::Buffer(&entry.native));
                }
                ResourceView::Texture(texture) => {
                    let entry = self.diagnostics.check(self.registry.textures.lookup(**texture, SOURCE))?;
                    bound.push(BoundResource::Texture);
                    resources.push(ResourceView::Texture(&entry.native));
                }
                ResourceView::Sampler(sampler) => {
                    let entry = self.diagnostics.check(self.registry.samplers.lookup(**sampler, SOURCE))?;
                    bound.push(BoundResource::Sampler);
                    resources.push(ResourceView::Sampler(&entry.native));
                }
            }
        }

        let mut findings = Findings::new(SOURCE);
        validate_resource_heap(&mut findings, &layout.meta.bindings, &bound);
        self.diagnostics.resolve(findings)?;

        let native_desc: ResourceHeapDesc<'_, R> = ResourceHeapDesc {
            pipeline_layout: &layout.native,
            resources,
        };
        self.diagnostics.trace_delegation(SOURCE);
        let native = self.instance.create_resource_heap(&native_desc)?;
        Ok(register(&self.profiler, &mut self.registry.resource_heaps, native, ()))
    }

    fn release_resource_heap(&mut self, resource_heap: ResourceHeapHandle) -> Result<()> {
        release_tracked(
            &self.diagnostics,
            &self.profiler,
            &mut self.registry.resource_heaps,
            resource_heap,
            "release_resource_heap",
            |native| self.instance.release_resource_heap(native),
        )
    }

    // ===== PIPELINE STATES =====

    fn create_graphics_pipeline(&mut self, desc: &GraphicsPipelineDesc<'_, Self>) -> Result<GraphicsPipelineHandle> {
        const SOURCE: &str = "create_graphics_pipeline";
        let program = self
            .diagnostics
            .check(self.registry.shader_programs.lookup(*desc.shader_program, SOURCE))?;
        let layout = self
            .diagnostics
            .check(self.registry.pipeline_layouts.lookup_opt(desc.pipeline_layout.copied(), SOURCE))?;
        let render_target = self
            .diagnostics
            .check(self.registry.render_targets.lookup_opt(desc.render_target.copied(), SOURCE))?;

        let mut findings = Findings::new(SOURCE);
        validate_graphics_pipeline(&mut findings, &self.caps, program.meta.stages, desc.primitive_topology);
        self.diagnostics.resolve(findings)?;

        let native_desc: GraphicsPipelineDesc<'_, R> = GraphicsPipelineDesc {
            shader_program: &program.native,
            pipeline_layout: layout.map(|entry| &entry.native),
            render_target: render_target.map(|entry| &entry.native),
            primitive_topology: desc.primitive_topology,
            rasterizer: desc.rasterizer,
            depth: desc.depth,
            blend_enabled: desc.blend_enabled,
        };
        self.diagnostics.trace_delegation(SOURCE);
        let native = self.instance.create_graphics_pipeline(&native_desc)?;
        Ok(register(&self.profiler, &mut self.registry.graphics_pipelines, native, ()))
    }

    fn release_graphics_pipeline(&mut self, pipeline: GraphicsPipelineHandle) -> Result<()> {
        release_tracked(
            &self.diagnostics,
            &self.profiler,
            &mut self.registry.graphics_pipelines,
            pipeline,
            "release_graphics_pipeline",
            |native| self.instance.release_graphics_pipeline(native),
        )
    }

    fn create_compute_pipeline(&mut self, desc: &ComputePipelineDesc<'_, Self>) -> Result<ComputePipelineHandle> {
        const SOURCE: &str = "create_compute_pipeline";
        let program = self
            .diagnostics
            .check(self.registry.shader_programs.lookup(*desc.shader_program, SOURCE))?;
        let layout = self
            .diagnostics
            .check(self.registry.pipeline_layouts.lookup_opt(desc.pipeline_layout.copied(), SOURCE))?;

        let mut findings = Findings::new(SOURCE);
        validate_compute_pipeline(&mut findings, program.meta.stages);
        self.diagnostics.resolve(findings)?;

        let native_desc: ComputePipelineDesc<'_, R> = ComputePipelineDesc {
            shader_program: &program.native,
            pipeline_layout: layout.map(|entry| &entry.native),
        };
        self.diagnostics.trace_delegation(SOURCE);
        let native = self.instance.create_compute_pipeline(&native_desc)?;
        Ok(register(&self.profiler, &mut self.registry.compute_pipelines, native, ()))
    }

    fn release_compute_pipeline(&mut self, pipeline: ComputePipelineHandle) -> Result<()> {
        release_tracked(
            &self.diagnostics,
            &self.profiler,
            &mut self.registry.compute_pipelines,
            pipeline,
            "release_compute_pipeline",
            |native| self.instance.release_compute_pipeline(native),
        )
    }

    // ===== QUERIES, FENCES, COMMAND BUFFERS =====

    fn create_query(&mut self, desc: &QueryDesc) -> Result<QueryHandle> {
        const SOURCE: &str = "create_query";
        let mut findings = Findings::new(SOURCE);
        validate_query_desc(&mut findings, &self.caps, desc);
        self.diagnostics.resolve(findings)?;

        self.diagnostics.trace_delegation(SOURCE);
        let native = self.instance.create_query(desc)?;
        Ok(register(&self.profiler, &mut self.registry.queries, native, ()))
    }

    fn release_query(&mut self, query: QueryHandle) -> Result<()> {
        release_tracked(
            &self.diagnostics,
            &self.profiler,
            &mut self.registry.queries,
            query,
            "release_query",
            |native| self.instance.release_query(native),
        )
    }

    fn create_fence(&mut self) -> Result<FenceHandle> {
        self.diagnostics.trace_delegation("create_fence");
        let native = self.instance.create_fence()?;
        Ok(register(&self.profiler, &mut self.registry.fences, native, ()))
    }

    fn release_fence(&mut self, fence: FenceHandle) -> Result<()> {
        release_tracked(
            &self.diagnostics,
            &self.profiler,
            &mut self.registry.fences,
            fence,
            "release_fence",
            |native| self.instance.release_fence(native),
        )
    }

    fn create_command_buffer(&mut self) -> Result<CommandBufferHandle> {
        self.diagnostics.trace_delegation("create_command_buffer");
        let native = self.instance.create_command_buffer()?;
        Ok(register(&self.profiler, &mut self.registry.command_buffers, native, ()))
    }

    fn release_command_buffer(&mut self, command_buffer: CommandBufferHandle) -> Result<()> {
        release_tracked(
            &self.diagnostics,
            &self.profiler,
            &mut self.registry.command_buffers,
            command_buffer,
            "release_command_buffer",
            |native| self.instance.release_command_buffer(native),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "debug_render_system_tests.rs"]
mod tests;
