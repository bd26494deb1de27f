/// Pipeline layout, resource heap and pipeline state validation

use rustc_hash::FxHashSet;
use galaxy_3d_render::galaxy3d::debug::ValidationErrorKind;
use galaxy_3d_render::galaxy3d::render::{
    BindingDesc, BufferKind, PrimitiveTopology, RenderingCaps, RenderingFeatures, ResourceType,
    ShaderStageFlags,
};
use crate::report::Findings;

/// Feature a binding's resource type depends on
fn resource_feature(resource_type: ResourceType) -> RenderingFeatures {
    match resource_type {
        ResourceType::ConstantBuffer => RenderingFeatures::CONSTANT_BUFFERS,
        ResourceType::StorageBuffer => RenderingFeatures::STORAGE_BUFFERS,
        ResourceType::Texture => RenderingFeatures::empty(),
        ResourceType::Sampler => RenderingFeatures::SAMPLERS,
    }
}

pub(crate) fn validate_pipeline_layout(findings: &mut Findings, caps: &RenderingCaps, bindings: &[BindingDesc]) {
    let mut slots = FxHashSet::default();
    for (index, binding) in bindings.iter().enumerate() {
        if binding.stages.is_empty() {
            findings.error(
                ValidationErrorKind::InvalidArgument,
                format!("binding {} is not visible to any shader stage", index),
            );
        }
        if !slots.insert((binding.resource_type, binding.slot)) {
            findings.error(
                ValidationErrorKind::InvalidArgument,
                format!("binding {} reuses {:?} slot {}", index, binding.resource_type, binding.slot),
            );
        }
        if !caps.has(resource_feature(binding.resource_type)) {
            findings.error(
                ValidationErrorKind::UnsupportedFeature,
                format!("binding {}: {:?} resources are not supported", index, binding.resource_type),
            );
        }
    }
}

/// Resource bound in a resource heap, as recorded by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoundResource {
    Buffer(BufferKind),
    Texture,
    Sampler,
}

impl BoundResource {
    fn matches(&self, resource_type: ResourceType) -> bool {
        matches!(
            (self, resource_type),
            (BoundResource::Buffer(BufferKind::Constant), ResourceType::ConstantBuffer)
                | (BoundResource::Buffer(BufferKind::Storage), ResourceType::StorageBuffer)
                | (BoundResource::Texture, ResourceType::Texture)
                | (BoundResource::Sampler, ResourceType::Sampler)
        )
    }
}

/// Check that a heap binds one matching resource per layout binding
pub(crate) fn validate_resource_heap(findings: &mut Findings, bindings: &[BindingDesc], resources: &[BoundResource]) {
    if resources.is_empty() {
        findings.error(ValidationErrorKind::InvalidArgument, "resource heap binds no resource");
        return;
    }
    if resources.len() != bindings.len() {
        findings.error(
            ValidationErrorKind::InvalidArgument,
            format!("{} resources for a layout with {} bindings", resources.len(), bindings.len()),
        );
        return;
    }
    for (index, (resource, binding)) in resources.iter().zip(bindings).enumerate() {
        if !resource.matches(binding.resource_type) {
            findings.error(
                ValidationErrorKind::InvalidArgument,
                format!("resource {} is a {:?}, binding expects {:?}", index, resource, binding.resource_type),
            );
        }
    }
}

/// Check a graphics pipeline against its program stages
pub(crate) fn validate_graphics_pipeline(
    findings: &mut Findings,
    caps: &RenderingCaps,
    program_stages: ShaderStageFlags,
    topology: PrimitiveTopology,
) {
    if !program_stages.contains(ShaderStageFlags::VERTEX) {
        findings.error(
            ValidationErrorKind::InvalidArgument,
            "graphics pipeline requires a shader program with a vertex shader",
        );
    }

    if !caps.supports_topology(topology) {
        findings.error(
            ValidationErrorKind::UnsupportedFeature,
            format!("primitive topology {:?} is not supported", topology),
        );
        return;
    }

    let tessellated = program_stages.contains(ShaderStageFlags::TESSELLATION);
    match topology {
        PrimitiveTopology::PatchList(control_points) => {
            if control_points == 0 || control_points > caps.max_patch_vertices {
                findings.error(
                    ValidationErrorKind::LimitExceeded,
                    format!("{} patch control points outside [1, {}]", control_points, caps.max_patch_vertices),
                );
            }
            if !tessellated {
                findings.error(
                    ValidationErrorKind::InvalidArgument,
                    "patch topology requires tessellation shaders",
                );
            }
        }
        _ if tessellated => {
            findings.error(
                ValidationErrorKind::InvalidArgument,
                format!("tessellation shaders require a patch topology, got {:?}", topology),
            );
        }
        _ => {}
    }
}

pub(crate) fn validate_compute_pipeline(findings: &mut Findings, program_stages: ShaderStageFlags) {
    if !program_stages.contains(ShaderStageFlags::COMPUTE) {
        findings.error(
            ValidationErrorKind::InvalidArgument,
            "compute pipeline requires a shader program with a compute shader",
        );
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
