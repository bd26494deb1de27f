/*!
# Galaxy 3D Render - Debug Layer

Validating layer in front of any `RenderSystem`.

`DebugRenderSystem<R>` wraps a render system and implements the same trait,
so it can be used anywhere the wrapped one can. Every call goes through
three phases:

1. Input handles are resolved in the object registry and the descriptor is
   validated against the wrapped system's capabilities and the recorded
   state of the objects involved.
2. Valid calls are forwarded to the wrapped render system.
3. New native objects are registered and handed out as generational handles;
   mutations update the recorded state.

Rejected calls never reach the wrapped system and return
`Error::Validation`. Every finding is posted to the optional
`RenderingDebugger`, forwarded calls are counted by the optional
`RenderingProfiler`.

```no_run
use std::sync::Arc;
use galaxy_3d_render::galaxy3d::RenderSystem;
use galaxy_3d_render::galaxy3d::debug::LogDebugger;
use galaxy_3d_render::galaxy3d::render::{BufferDesc, BufferKind};
use galaxy_3d_render_debug::galaxy3d::DebugRenderSystem;

fn upload<R: RenderSystem>(backend: R) -> galaxy_3d_render::galaxy3d::Result<()> {
    let mut render_system = DebugRenderSystem::new(backend, None, Some(Arc::new(LogDebugger)));
    let buffer = render_system.create_buffer(&BufferDesc::new(BufferKind::Constant, 256), None)?;
    render_system.write_buffer(&buffer, 0, &[0u8; 64])?;
    render_system.release_buffer(buffer)
}
```
*/

// Internal modules
mod config;
mod registry;
mod report;
mod validation;
mod debug_render_system;

#[cfg(test)]
mod test_utils;

// Main galaxy3d namespace module
pub mod galaxy3d {
    pub use crate::debug_render_system::DebugRenderSystem;
    pub use crate::config::{BenignViolationPolicy, DebugLayerConfig};
    pub use crate::report::ValidationStats;
    pub use crate::registry::{
        RenderContextHandle, BufferHandle, BufferArrayHandle, TextureHandle, TextureArrayHandle,
        SamplerHandle, SamplerArrayHandle, RenderTargetHandle, ShaderHandle, ShaderProgramHandle,
        PipelineLayoutHandle, GraphicsPipelineHandle, ComputePipelineHandle, ResourceHeapHandle,
        QueryHandle, FenceHandle, CommandBufferHandle,
    };
}
