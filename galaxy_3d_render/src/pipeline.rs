/// Pipeline state descriptors

use crate::render_system::RenderSystem;

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    PointList,
    LineList,
    LineStrip,
    TriangleList,
    TriangleStrip,
    /// Tessellation patches with the given number of control points
    PatchList(u32),
}

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CullMode {
    None,
    Front,
    Back,
}

/// Polygon rendering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolygonMode {
    Fill,
    Line,
    Point,
}

/// Rasterizer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterizerDesc {
    pub cull_mode: CullMode,
    pub polygon_mode: PolygonMode,
}

impl Default for RasterizerDesc {
    fn default() -> Self {
        Self {
            cull_mode: CullMode::Back,
            polygon_mode: PolygonMode::Fill,
        }
    }
}

/// Depth test state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DepthDesc {
    pub test_enabled: bool,
    pub write_enabled: bool,
}

/// Descriptor for creating a graphics pipeline
pub struct GraphicsPipelineDesc<'a, R: RenderSystem + ?Sized> {
    /// Linked program; must contain a vertex shader
    pub shader_program: &'a R::ShaderProgram,
    pub pipeline_layout: Option<&'a R::PipelineLayout>,
    /// Target the pipeline renders into (None = the render context's back buffer)
    pub render_target: Option<&'a R::RenderTarget>,
    pub primitive_topology: PrimitiveTopology,
    pub rasterizer: RasterizerDesc,
    pub depth: DepthDesc,
    pub blend_enabled: bool,
}

impl<'a, R: RenderSystem + ?Sized> GraphicsPipelineDesc<'a, R> {
    /// Triangle-list pipeline with default fixed-function state
    pub fn new(shader_program: &'a R::ShaderProgram) -> Self {
        Self {
            shader_program,
            pipeline_layout: None,
            render_target: None,
            primitive_topology: PrimitiveTopology::TriangleList,
            rasterizer: RasterizerDesc::default(),
            depth: DepthDesc::default(),
            blend_enabled: false,
        }
    }
}

/// Descriptor for creating a compute pipeline
pub struct ComputePipelineDesc<'a, R: RenderSystem + ?Sized> {
    /// Linked program; must contain a compute shader
    pub shader_program: &'a R::ShaderProgram,
    pub pipeline_layout: Option<&'a R::PipelineLayout>,
}
