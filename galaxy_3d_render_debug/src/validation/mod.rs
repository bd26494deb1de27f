//! Descriptor validators
//!
//! Pure checks, one module per resource family. Each validator pushes its
//! findings into a `Findings` collector and never calls the wrapped render
//! system; `DebugRenderSystem` decides what happens to the call.

pub(crate) mod buffer;
pub(crate) mod texture;
pub(crate) mod shader;
pub(crate) mod pipeline;
pub(crate) mod resource;
