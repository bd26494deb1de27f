/// Shader and shader program validation

use galaxy_3d_render::galaxy3d::debug::ValidationErrorKind;
use galaxy_3d_render::galaxy3d::render::{
    RenderingCaps, RenderingFeatures, ShaderDesc, ShaderSource, ShaderStage, ShaderStageFlags,
};
use crate::report::Findings;

/// Feature a shader stage depends on
fn stage_feature(stage: ShaderStage) -> RenderingFeatures {
    match stage {
        ShaderStage::Vertex | ShaderStage::Fragment => RenderingFeatures::empty(),
        ShaderStage::TessControl | ShaderStage::TessEvaluation => RenderingFeatures::TESSELLATION_SHADERS,
        ShaderStage::Geometry => RenderingFeatures::GEOMETRY_SHADERS,
        ShaderStage::Compute => RenderingFeatures::COMPUTE_SHADERS,
    }
}

pub(crate) fn validate_shader_desc(findings: &mut Findings, caps: &RenderingCaps, desc: &ShaderDesc) {
    if !caps.has(stage_feature(desc.stage)) {
        findings.error(
            ValidationErrorKind::UnsupportedFeature,
            format!("{:?} shaders are not supported", desc.stage),
        );
    }

    let empty_source = match &desc.source {
        ShaderSource::Code(code) => code.trim().is_empty(),
        ShaderSource::Binary(binary) => binary.is_empty(),
    };
    if empty_source {
        findings.error(ValidationErrorKind::InvalidArgument, "shader source is empty");
    }
    if desc.entry_point.is_empty() {
        findings.error(ValidationErrorKind::InvalidArgument, "shader entry point is empty");
    }
}

/// Shader attached to a program slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AttachedShader {
    /// Stage the slot expects
    pub slot: ShaderStage,
    /// Stage the shader was created for
    pub stage: ShaderStage,
}

/// Check the composition of a shader program; returns the attached stages
pub(crate) fn validate_shader_program(
    findings: &mut Findings,
    caps: &RenderingCaps,
    attached: &[AttachedShader],
    vertex_attribute_count: usize,
) -> ShaderStageFlags {
    let mut stages = ShaderStageFlags::empty();
    for shader in attached {
        if shader.stage != shader.slot {
            findings.error(
                ValidationErrorKind::InvalidArgument,
                format!("{:?} shader attached to the {:?} slot", shader.stage, shader.slot),
            );
        }
        stages |= shader.slot.flag();
    }

    if stages.is_empty() {
        findings.error(ValidationErrorKind::InvalidArgument, "shader program has no shader attached");
        return stages;
    }

    if stages.contains(ShaderStageFlags::COMPUTE) {
        if stages.intersects(ShaderStageFlags::ALL_GRAPHICS) {
            findings.error(
                ValidationErrorKind::InvalidArgument,
                "compute shaders cannot be linked with graphics stages",
            );
        }
    } else if !stages.contains(ShaderStageFlags::VERTEX) {
        findings.error(ValidationErrorKind::InvalidArgument, "graphics program has no vertex shader");
    }

    let tessellation = stages & ShaderStageFlags::TESSELLATION;
    if !tessellation.is_empty() && tessellation != ShaderStageFlags::TESSELLATION {
        findings.error(
            ValidationErrorKind::InvalidArgument,
            "tessellation control and evaluation shaders must be attached together",
        );
    }

    if vertex_attribute_count > caps.max_vertex_attributes as usize {
        findings.error(
            ValidationErrorKind::LimitExceeded,
            format!(
                "{} vertex attributes exceed limit {}",
                vertex_attribute_count, caps.max_vertex_attributes
            ),
        );
    }

    stages
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
