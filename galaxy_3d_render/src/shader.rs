/// Shader and shader program descriptors

use bitflags::bitflags;
use crate::render_system::RenderSystem;

/// Programmable pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    TessControl,
    TessEvaluation,
    Geometry,
    Fragment,
    Compute,
}

impl ShaderStage {
    /// The matching single-bit stage flag
    pub fn flag(&self) -> ShaderStageFlags {
        match self {
            ShaderStage::Vertex => ShaderStageFlags::VERTEX,
            ShaderStage::TessControl => ShaderStageFlags::TESS_CONTROL,
            ShaderStage::TessEvaluation => ShaderStageFlags::TESS_EVALUATION,
            ShaderStage::Geometry => ShaderStageFlags::GEOMETRY,
            ShaderStage::Fragment => ShaderStageFlags::FRAGMENT,
            ShaderStage::Compute => ShaderStageFlags::COMPUTE,
        }
    }
}

bitflags! {
    /// Set of shader stages
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderStageFlags: u8 {
        const VERTEX          = 1 << 0;
        const TESS_CONTROL    = 1 << 1;
        const TESS_EVALUATION = 1 << 2;
        const GEOMETRY        = 1 << 3;
        const FRAGMENT        = 1 << 4;
        const COMPUTE         = 1 << 5;

        const TESSELLATION = Self::TESS_CONTROL.bits() | Self::TESS_EVALUATION.bits();
        const ALL_GRAPHICS = Self::VERTEX.bits()
            | Self::TESSELLATION.bits()
            | Self::GEOMETRY.bits()
            | Self::FRAGMENT.bits();
    }
}

/// Shader code handed to the backend as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderSource {
    /// High-level source text (GLSL, HLSL, ...)
    Code(String),
    /// Pre-compiled binary (SPIR-V, DXBC, ...)
    Binary(Vec<u8>),
}

/// Descriptor for creating a shader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderDesc {
    pub stage: ShaderStage,
    pub source: ShaderSource,
    pub entry_point: String,
}

/// One vertex attribute of an input layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    pub name: String,
    /// Binding location in the shader
    pub location: u32,
    /// Byte offset inside a vertex
    pub offset: u32,
}

/// Vertex input layout of one vertex buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexFormat {
    pub attributes: Vec<VertexAttribute>,
    /// Bytes per vertex
    pub stride: u32,
}

/// Descriptor for linking shaders into a program
///
/// Every slot holds a shader of the slot's stage. A program is either a
/// graphics program (vertex shader required) or a compute-only program.
pub struct ShaderProgramDesc<'a, R: RenderSystem + ?Sized> {
    pub vertex_shader: Option<&'a R::Shader>,
    pub tess_control_shader: Option<&'a R::Shader>,
    pub tess_evaluation_shader: Option<&'a R::Shader>,
    pub geometry_shader: Option<&'a R::Shader>,
    pub fragment_shader: Option<&'a R::Shader>,
    pub compute_shader: Option<&'a R::Shader>,
    pub vertex_formats: Vec<VertexFormat>,
}

impl<'a, R: RenderSystem + ?Sized> ShaderProgramDesc<'a, R> {
    /// Empty descriptor (no shader attached)
    pub fn new() -> Self {
        Self {
            vertex_shader: None,
            tess_control_shader: None,
            tess_evaluation_shader: None,
            geometry_shader: None,
            fragment_shader: None,
            compute_shader: None,
            vertex_formats: Vec::new(),
        }
    }

    /// Slots paired with the stage each expects, in pipeline order
    pub fn slots(&self) -> [(ShaderStage, Option<&'a R::Shader>); 6] {
        [
            (ShaderStage::Vertex, self.vertex_shader),
            (ShaderStage::TessControl, self.tess_control_shader),
            (ShaderStage::TessEvaluation, self.tess_evaluation_shader),
            (ShaderStage::Geometry, self.geometry_shader),
            (ShaderStage::Fragment, self.fragment_shader),
            (ShaderStage::Compute, self.compute_shader),
        ]
    }

    /// Total number of vertex attributes over all vertex formats
    pub fn vertex_attribute_count(&self) -> usize {
        self.vertex_formats.iter().map(|format| format.attributes.len()).sum()
    }
}

impl<'a, R: RenderSystem + ?Sized> Default for ShaderProgramDesc<'a, R> {
    fn default() -> Self {
        Self::new()
    }
}
