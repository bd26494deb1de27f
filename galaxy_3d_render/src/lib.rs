/*!
# Galaxy 3D Render

Platform-agnostic render system API for the Galaxy3D engine.

The `RenderSystem` trait is the factory interface every backend implements
(OpenGL, Direct3D, Vulkan, ...). Each resource kind is an associated handle
type, so a layer can wrap another render system and expose the exact same
interface with its own handles. The `galaxy_3d_render_debug` crate uses this
to put a validating debug layer in front of any backend.

## Architecture

- **RenderSystem**: factory trait for every GPU resource
- **RenderingCaps**: immutable limits and feature flags of a backend
- **Descriptors**: buffer, texture, sampler, shader, pipeline, render target,
  resource heap, query and render context descriptors
- **Diagnostics**: validation taxonomy, debugger trait and call profiler
- **Log**: pluggable logger with colored console output by default
*/

// Internal modules
mod error;
mod caps;
mod buffer;
mod texture;
mod sampler;
mod shader;
mod pipeline;
mod resource_heap;
mod render_target;
mod query;
mod render_system;
mod diagnostics;
pub mod log;

#[cfg(any(test, feature = "mock"))]
pub mod mock_render_system;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Render system factory trait
    pub use crate::render_system::RenderSystem;

    // Logging sub-module (types and functions; macros live at the crate root)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, set_min_severity, min_severity,
            log, log_detailed,
        };
    }

    // Render sub-module with all descriptor and capability types
    pub mod render {
        pub use crate::render_system::{
            RendererInfo, RendererFamily, RenderSystemConfig, ShadingLanguage,
        };
        pub use crate::caps::{RenderingCaps, RenderingFeatures};
        pub use crate::buffer::*;
        pub use crate::texture::*;
        pub use crate::sampler::*;
        pub use crate::shader::*;
        pub use crate::pipeline::*;
        pub use crate::resource_heap::*;
        pub use crate::render_target::*;
        pub use crate::query::*;
    }

    // Diagnostics sub-module (debugger, profiler, validation taxonomy)
    pub mod debug {
        pub use crate::diagnostics::*;
    }
}

// Re-export math library at crate root
pub use glam;
