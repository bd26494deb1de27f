//! Diagnostics collaborators
//!
//! The debug layer reports every validation finding to a `RenderingDebugger`
//! and counts the calls it forwards with a `RenderingProfiler`. Both are
//! injected at construction and both are optional.

use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use rustc_hash::FxHashMap;

// ============================================================================
// Validation taxonomy
// ============================================================================

/// Category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// Malformed descriptor field
    InvalidArgument,
    /// Value beyond a capability limit
    LimitExceeded,
    /// Offset/length outside the backing store
    BoundsViolation,
    /// Size not a multiple of a backend alignment rule
    AlignmentViolation,
    /// Supplied data size inconsistent with declared geometry/format
    SizeMismatch,
    /// Sub-range outside the declared extent
    RangeViolation,
    /// Access mode incompatible with declared usage or current mapping state
    AccessViolation,
    /// Backend lacks the required capability
    UnsupportedFeature,
    /// Operation inapplicable to the object's current lifecycle state
    InvalidState,
    /// Handle unknown to the registry (uninitialized or released resource)
    NotFound,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationErrorKind::InvalidArgument => "invalid argument",
            ValidationErrorKind::LimitExceeded => "limit exceeded",
            ValidationErrorKind::BoundsViolation => "bounds violation",
            ValidationErrorKind::AlignmentViolation => "alignment violation",
            ValidationErrorKind::SizeMismatch => "size mismatch",
            ValidationErrorKind::RangeViolation => "range violation",
            ValidationErrorKind::AccessViolation => "access violation",
            ValidationErrorKind::UnsupportedFeature => "unsupported feature",
            ValidationErrorKind::InvalidState => "invalid state",
            ValidationErrorKind::NotFound => "uninitialized resource",
        };
        f.write_str(name)
    }
}

/// A call rejected by the debug layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Failure category
    pub kind: ValidationErrorKind,
    /// Name of the failing call (e.g. "write_buffer")
    pub source: String,
    /// Human-readable description
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}: {}", self.kind, self.source, self.message)
    }
}

// ============================================================================
// Debugger
// ============================================================================

/// Severity of a debug report
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DebugSeverity {
    /// The call was tolerated
    Warning,
    /// The call was rejected
    Error,
}

/// One finding surfaced by the debug layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugReport {
    pub severity: DebugSeverity,
    /// Name of the call that produced the finding
    pub source: String,
    pub kind: ValidationErrorKind,
    pub message: String,
}

/// Receiver for debug-layer findings
///
/// Reports are posted synchronously, during the call that produced them.
pub trait RenderingDebugger: Send + Sync {
    fn post_report(&self, report: &DebugReport);
}

/// Debugger that forwards every report to the global logger
///
/// Warnings are logged at WARN, errors at ERROR, under the
/// `galaxy3d::debug` source tag.
#[derive(Debug, Default)]
pub struct LogDebugger;

impl RenderingDebugger for LogDebugger {
    fn post_report(&self, report: &DebugReport) {
        match report.severity {
            DebugSeverity::Warning => {
                crate::render_warn!("galaxy3d::debug", "[{}] {}: {}",
                    report.source, report.kind, report.message);
            }
            DebugSeverity::Error => {
                crate::render_error!("galaxy3d::debug", "[{}] {}: {}",
                    report.source, report.kind, report.message);
            }
        }
    }
}

// ============================================================================
// Profiler
// ============================================================================

/// Resource kinds tracked by the debug layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    RenderContext,
    Buffer,
    BufferArray,
    Texture,
    TextureArray,
    Sampler,
    SamplerArray,
    RenderTarget,
    Shader,
    ShaderProgram,
    PipelineLayout,
    GraphicsPipeline,
    ComputePipeline,
    ResourceHeap,
    Query,
    Fence,
    CommandBuffer,
}

impl ResourceKind {
    /// Lowercase name used in diagnostics ("buffer", "shader program", ...)
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::RenderContext => "render context",
            ResourceKind::Buffer => "buffer",
            ResourceKind::BufferArray => "buffer array",
            ResourceKind::Texture => "texture",
            ResourceKind::TextureArray => "texture array",
            ResourceKind::Sampler => "sampler",
            ResourceKind::SamplerArray => "sampler array",
            ResourceKind::RenderTarget => "render target",
            ResourceKind::Shader => "shader",
            ResourceKind::ShaderProgram => "shader program",
            ResourceKind::PipelineLayout => "pipeline layout",
            ResourceKind::GraphicsPipeline => "graphics pipeline",
            ResourceKind::ComputePipeline => "compute pipeline",
            ResourceKind::ResourceHeap => "resource heap",
            ResourceKind::Query => "query",
            ResourceKind::Fence => "fence",
            ResourceKind::CommandBuffer => "command buffer",
        }
    }
}

/// Snapshot of the profiler counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileStats {
    /// Successful creations per resource kind
    pub created: FxHashMap<ResourceKind, u64>,
    /// Releases per resource kind
    pub released: FxHashMap<ResourceKind, u64>,
    pub buffer_writes: u64,
    pub buffer_bytes_written: u64,
    pub buffer_maps: u64,
    pub texture_writes: u64,
    pub texture_reads: u64,
    pub mip_generations: u64,
}

impl ProfileStats {
    /// Number of successful creations of `kind`
    pub fn created_count(&self, kind: ResourceKind) -> u64 {
        self.created.get(&kind).copied().unwrap_or(0)
    }

    /// Number of releases of `kind`
    pub fn released_count(&self, kind: ResourceKind) -> u64 {
        self.released.get(&kind).copied().unwrap_or(0)
    }
}

/// Call statistics for the calls the debug layer forwarded to the backend
///
/// Counters only move for calls that passed validation.
#[derive(Debug, Default)]
pub struct RenderingProfiler {
    created: Mutex<FxHashMap<ResourceKind, u64>>,
    released: Mutex<FxHashMap<ResourceKind, u64>>,
    buffer_writes: AtomicU64,
    buffer_bytes_written: AtomicU64,
    buffer_maps: AtomicU64,
    texture_writes: AtomicU64,
    texture_reads: AtomicU64,
    mip_generations: AtomicU64,
}

impl RenderingProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_create(&self, kind: ResourceKind) {
        if let Ok(mut created) = self.created.lock() {
            *created.entry(kind).or_insert(0) += 1;
        }
    }

    pub fn record_release(&self, kind: ResourceKind) {
        if let Ok(mut released) = self.released.lock() {
            *released.entry(kind).or_insert(0) += 1;
        }
    }

    pub fn record_buffer_write(&self, bytes: u64) {
        self.buffer_writes.fetch_add(1, Ordering::Relaxed);
        self.buffer_bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_buffer_map(&self) {
        self.buffer_maps.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_texture_write(&self) {
        self.texture_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_texture_read(&self) {
        self.texture_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_mip_generation(&self) {
        self.mip_generations.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy of all counters
    pub fn stats(&self) -> ProfileStats {
        ProfileStats {
            created: self.created.lock().map(|m| m.clone()).unwrap_or_default(),
            released: self.released.lock().map(|m| m.clone()).unwrap_or_default(),
            buffer_writes: self.buffer_writes.load(Ordering::Relaxed),
            buffer_bytes_written: self.buffer_bytes_written.load(Ordering::Relaxed),
            buffer_maps: self.buffer_maps.load(Ordering::Relaxed),
            texture_writes: self.texture_writes.load(Ordering::Relaxed),
            texture_reads: self.texture_reads.load(Ordering::Relaxed),
            mip_generations: self.mip_generations.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        if let Ok(mut created) = self.created.lock() {
            created.clear();
        }
        if let Ok(mut released) = self.released.lock() {
            released.clear();
        }
        self.buffer_writes.store(0, Ordering::Relaxed);
        self.buffer_bytes_written.store(0, Ordering::Relaxed);
        self.buffer_maps.store(0, Ordering::Relaxed);
        self.texture_writes.store(0, Ordering::Relaxed);
        self.texture_reads.store(0, Ordering::Relaxed);
        self.mip_generations.store(0, Ordering::Relaxed);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod tests;
