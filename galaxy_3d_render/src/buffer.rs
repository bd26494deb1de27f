/// Buffer descriptor and CPU access types

use bitflags::bitflags;

/// Index buffer element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    /// 16-bit indices (max 65535 vertices)
    U16,
    /// 32-bit indices
    U32,
}

impl IndexFormat {
    /// Size in bytes of one index element
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexFormat::U16 => 2,
            IndexFormat::U32 => 4,
        }
    }
}

/// What the buffer is bound as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Vertex buffer, `stride` bytes per vertex (0 = unspecified)
    Vertex { stride: u32 },
    /// Index buffer
    Index(IndexFormat),
    /// Constant (uniform) buffer
    Constant,
    /// Storage buffer
    Storage,
}

/// How often the buffer contents are expected to change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    /// Written once, drawn many times
    Static,
    /// Rewritten frequently
    Dynamic,
}

bitflags! {
    /// CPU access allowed on a buffer once it is mapped
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CpuAccessFlags: u8 {
        const READ  = 1 << 0;
        const WRITE = 1 << 1;
    }
}

/// Access requested when mapping a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpuAccess {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl CpuAccess {
    /// Flags a buffer must have been created with to allow this access
    pub fn required_flags(&self) -> CpuAccessFlags {
        match self {
            CpuAccess::ReadOnly => CpuAccessFlags::READ,
            CpuAccess::WriteOnly => CpuAccessFlags::WRITE,
            CpuAccess::ReadWrite => CpuAccessFlags::READ | CpuAccessFlags::WRITE,
        }
    }
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone, PartialEq)]
pub struct BufferDesc {
    /// Size in bytes
    pub size: u64,
    /// Binding kind
    pub kind: BufferKind,
    /// Update frequency hint
    pub usage: BufferUsage,
    /// CPU access allowed through `map_buffer`
    pub cpu_access: CpuAccessFlags,
}

impl BufferDesc {
    /// Static buffer of `size` bytes with no CPU access
    pub fn new(kind: BufferKind, size: u64) -> Self {
        Self {
            size,
            kind,
            usage: BufferUsage::Static,
            cpu_access: CpuAccessFlags::empty(),
        }
    }

    /// Same descriptor with the given CPU access flags
    pub fn with_cpu_access(mut self, cpu_access: CpuAccessFlags) -> Self {
        self.cpu_access = cpu_access;
        self
    }

    /// Same descriptor with the given usage
    pub fn with_usage(mut self, usage: BufferUsage) -> Self {
        self.usage = usage;
        self
    }
}
