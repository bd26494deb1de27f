/// Rendering capabilities - limits and feature flags reported by a render system

use bitflags::bitflags;
use crate::pipeline::PrimitiveTopology;

bitflags! {
    /// Optional features a render system may support
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderingFeatures: u32 {
        const RENDER_TARGETS           = 1 << 0;
        const TEXTURES_3D              = 1 << 1;
        const CUBE_TEXTURES            = 1 << 2;
        const TEXTURE_ARRAYS           = 1 << 3;
        const CUBE_TEXTURE_ARRAYS      = 1 << 4;
        const MULTISAMPLE_TEXTURES     = 1 << 5;
        const SAMPLERS                 = 1 << 6;
        const CONSTANT_BUFFERS         = 1 << 7;
        const STORAGE_BUFFERS          = 1 << 8;
        const GEOMETRY_SHADERS         = 1 << 9;
        const TESSELLATION_SHADERS     = 1 << 10;
        const COMPUTE_SHADERS          = 1 << 11;
        const STREAM_OUTPUTS           = 1 << 12;
    }
}

/// Immutable snapshot of what a render system supports
///
/// Queried once through `RenderSystem::rendering_caps()`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderingCaps {
    /// Supported optional features
    pub features: RenderingFeatures,
    /// Maximum size of any buffer (bytes)
    pub max_buffer_size: u64,
    /// Maximum size of a constant (uniform) buffer (bytes)
    pub max_constant_buffer_size: u64,
    /// Constant buffer sizes must be a multiple of this value (bytes, 0 or 1 = no rule)
    pub constant_buffer_alignment: u64,
    /// Maximum width of 1D textures
    pub max_texture_1d_size: u32,
    /// Maximum width/height of 2D textures
    pub max_texture_2d_size: u32,
    /// Maximum width/height/depth of 3D textures
    pub max_texture_3d_size: u32,
    /// Maximum face size of cube textures
    pub max_texture_cube_size: u32,
    /// Maximum number of array layers
    pub max_texture_array_layers: u32,
    /// Maximum number of mip levels
    pub max_mip_levels: u32,
    /// Maximum multisample count
    pub max_samples: u32,
    /// Maximum sampler anisotropy
    pub max_anisotropy: u32,
    /// Maximum number of color attachments per render target
    pub max_color_attachments: u32,
    /// Maximum number of vertex attributes per shader program
    pub max_vertex_attributes: u32,
    /// Maximum control points per patch
    pub max_patch_vertices: u32,
    /// Primitive topologies the backend can draw
    pub supported_topologies: Vec<PrimitiveTopology>,
}

impl RenderingCaps {
    /// Whether every feature in `features` is supported
    pub fn has(&self, features: RenderingFeatures) -> bool {
        self.features.contains(features)
    }

    /// Whether the topology is drawable by the backend
    ///
    /// Patch lists match on the topology kind; their control point count is
    /// limited separately by `max_patch_vertices`.
    pub fn supports_topology(&self, topology: PrimitiveTopology) -> bool {
        self.supported_topologies.iter().any(|supported| match (supported, topology) {
            (PrimitiveTopology::PatchList(_), PrimitiveTopology::PatchList(_)) => true,
            (a, b) => *a == b,
        })
    }
}

impl Default for RenderingCaps {
    /// Conservative desktop-class limits with every feature enabled
    fn default() -> Self {
        Self {
            features: RenderingFeatures::all(),
            max_buffer_size: 256 * 1024 * 1024,
            max_constant_buffer_size: 64 * 1024,
            constant_buffer_alignment: 16,
            max_texture_1d_size: 16384,
            max_texture_2d_size: 16384,
            max_texture_3d_size: 2048,
            max_texture_cube_size: 16384,
            max_texture_array_layers: 2048,
            max_mip_levels: 15,
            max_samples: 8,
            max_anisotropy: 16,
            max_color_attachments: 8,
            max_vertex_attributes: 16,
            max_patch_vertices: 32,
            supported_topologies: vec![
                PrimitiveTopology::PointList,
                PrimitiveTopology::LineList,
                PrimitiveTopology::LineStrip,
                PrimitiveTopology::TriangleList,
                PrimitiveTopology::TriangleStrip,
                PrimitiveTopology::PatchList(1),
            ],
        }
    }
}
