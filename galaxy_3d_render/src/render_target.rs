/// Render target and render context descriptors

use glam::UVec2;
use crate::render_system::RenderSystem;

/// Role of a render target attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentType {
    Color,
    Depth,
    DepthStencil,
    Stencil,
}

impl AttachmentType {
    /// Returns true for depth and/or stencil attachments
    pub fn is_depth_stencil(&self) -> bool {
        !matches!(self, AttachmentType::Color)
    }
}

/// One attachment of a render target
pub struct AttachmentDesc<'a, R: RenderSystem + ?Sized> {
    pub attachment_type: AttachmentType,
    /// Texture to render into (None = backend-managed renderbuffer)
    pub texture: Option<&'a R::Texture>,
    pub mip_level: u32,
    /// Array layer (cube faces count as layers)
    pub array_layer: u32,
}

/// Descriptor for creating a render target
pub struct RenderTargetDesc<'a, R: RenderSystem + ?Sized> {
    pub resolution: UVec2,
    /// Multisample count (1 = no multisampling)
    pub samples: u32,
    pub attachments: Vec<AttachmentDesc<'a, R>>,
}

/// Descriptor for creating a render context (swap chain owner)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContextDesc {
    pub resolution: UVec2,
    pub samples: u32,
    pub vsync: bool,
}

impl Default for RenderContextDesc {
    fn default() -> Self {
        Self {
            resolution: UVec2::new(800, 600),
            samples: 1,
            vsync: true,
        }
    }
}
