/// Pipeline layout and resource heap descriptors

use crate::render_system::RenderSystem;
use crate::shader::ShaderStageFlags;

/// Kind of resource bound at a layout slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    ConstantBuffer,
    StorageBuffer,
    Texture,
    Sampler,
}

/// One binding of a pipeline layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingDesc {
    pub resource_type: ResourceType,
    /// Stages that access the binding (must not be empty)
    pub stages: ShaderStageFlags,
    /// Binding slot, unique per resource type
    pub slot: u32,
}

/// Descriptor for creating a pipeline layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineLayoutDesc {
    pub bindings: Vec<BindingDesc>,
}

/// A resource bound in a resource heap
pub enum ResourceView<'a, R: RenderSystem + ?Sized> {
    Buffer(&'a R::Buffer),
    Texture(&'a R::Texture),
    Sampler(&'a R::Sampler),
}

/// Descriptor for creating a resource heap
///
/// `resources[i]` is bound at `pipeline_layout`'s binding `i`.
pub struct ResourceHeapDesc<'a, R: RenderSystem + ?Sized> {
    pub pipeline_layout: &'a R::PipelineLayout,
    pub resources: Vec<ResourceView<'a, R>>,
}
