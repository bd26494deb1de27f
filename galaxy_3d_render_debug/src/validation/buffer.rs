/// Buffer validation: creation limits, write bounds and mapping state

use galaxy_3d_render::galaxy3d::debug::ValidationErrorKind;
use galaxy_3d_render::galaxy3d::render::{
    BufferDesc, BufferKind, CpuAccess, RenderingCaps, RenderingFeatures,
};
use crate::registry::BufferMeta;
use crate::report::Findings;

/// Check a buffer descriptor and its optional initial data
pub(crate) fn validate_buffer_desc(
    findings: &mut Findings,
    caps: &RenderingCaps,
    desc: &BufferDesc,
    initial_data: Option<&[u8]>,
) {
    if desc.size == 0 {
        findings.error(ValidationErrorKind::LimitExceeded, "buffer size must not be zero");
    } else if desc.size > caps.max_buffer_size {
        findings.error(
            ValidationErrorKind::LimitExceeded,
            format!("buffer size {} exceeds limit {}", desc.size, caps.max_buffer_size),
        );
    }

    match desc.kind {
        BufferKind::Constant => validate_constant_buffer(findings, caps, desc.size),
        BufferKind::Storage => {
            if !caps.has(RenderingFeatures::STORAGE_BUFFERS) {
                findings.error(ValidationErrorKind::UnsupportedFeature, "storage buffers are not supported");
            }
        }
        BufferKind::Vertex { stride } => {
            if stride > 0 && desc.size % stride as u64 != 0 {
                findings.warn(
                    ValidationErrorKind::InvalidArgument,
                    format!("vertex buffer size {} is not a multiple of its stride {}", desc.size, stride),
                );
            }
        }
        BufferKind::Index(format) => {
            let index_size = format.size_bytes() as u64;
            if desc.size % index_size != 0 {
                findings.warn(
                    ValidationErrorKind::InvalidArgument,
                    format!("index buffer size {} is not a multiple of its index size {}", desc.size, index_size),
                );
            }
        }
    }

    if let Some(data) = initial_data {
        if data.len() as u64 > desc.size {
            findings.error(
                ValidationErrorKind::BoundsViolation,
                format!("{} bytes of initial data exceed buffer size {}", data.len(), desc.size),
            );
        }
    }
}

fn validate_constant_buffer(findings: &mut Findings, caps: &RenderingCaps, size: u64) {
    if !caps.has(RenderingFeatures::CONSTANT_BUFFERS) {
        findings.error(ValidationErrorKind::UnsupportedFeature, "constant buffers are not supported");
    }
    if size > caps.max_constant_buffer_size {
        findings.error(
            ValidationErrorKind::LimitExceeded,
            format!("constant buffer size {} exceeds limit {}", size, caps.max_constant_buffer_size),
        );
    }
    let alignment = caps.constant_buffer_alignment;
    if alignment > 1 && size % alignment != 0 {
        findings.error(
            ValidationErrorKind::AlignmentViolation,
            format!("constant buffer size {} is not a multiple of {}", size, alignment),
        );
    }
}

/// Check that `[offset, offset + len)` lies inside a buffer of `size` bytes
pub(crate) fn validate_buffer_range(findings: &mut Findings, size: u64, offset: u64, len: u64) {
    match offset.checked_add(len) {
        Some(end) if end <= size => {}
        Some(end) => findings.error(
            ValidationErrorKind::BoundsViolation,
            format!("range [{}, {}) exceeds buffer size {}", offset, end, size),
        ),
        None => findings.error(
            ValidationErrorKind::BoundsViolation,
            format!("range at offset {} with length {} overflows", offset, len),
        ),
    }
}

/// Check a write through the API
pub(crate) fn validate_buffer_write(findings: &mut Findings, meta: &BufferMeta, offset: u64, len: usize) {
    if meta.mapped.is_some() {
        findings.error(ValidationErrorKind::AccessViolation, "cannot write to a buffer while it is mapped");
    }
    if len == 0 {
        findings.warn(ValidationErrorKind::InvalidArgument, "zero-length write has no effect");
        return;
    }
    validate_buffer_range(findings, meta.desc.size, offset, len as u64);
}

/// Check a map request against the buffer's CPU access and mapping state
pub(crate) fn validate_buffer_map(findings: &mut Findings, meta: &BufferMeta, access: CpuAccess) {
    if meta.mapped.is_some() {
        findings.error(ValidationErrorKind::InvalidState, "buffer is already mapped");
    }
    let required = access.required_flags();
    if !meta.desc.cpu_access.contains(required) {
        findings.error(
            ValidationErrorKind::AccessViolation,
            format!("{:?} access requires CPU access {:?}, buffer has {:?}", access, required, meta.desc.cpu_access),
        );
    }
}

pub(crate) fn validate_buffer_unmap(findings: &mut Findings, meta: &BufferMeta) {
    if meta.mapped.is_none() {
        findings.error(ValidationErrorKind::InvalidState, "buffer is not mapped");
    }
}

pub(crate) fn validate_buffer_release(findings: &mut Findings, meta: &BufferMeta) {
    if meta.mapped.is_some() {
        findings.warn(ValidationErrorKind::InvalidState, "releasing a buffer that is still mapped");
    }
}

/// Check the elements of a buffer array
pub(crate) fn validate_buffer_array(findings: &mut Findings, kinds: &[BufferKind]) {
    let Some(first) = kinds.first() else {
        findings.error(ValidationErrorKind::InvalidArgument, "buffer array must not be empty");
        return;
    };
    if let Some(index) = kinds.iter().position(|kind| !same_binding(kind, first)) {
        findings.error(
            ValidationErrorKind::InvalidArgument,
            format!("buffer array mixes {:?} and {:?} buffers (element {})", first, kinds[index], index),
        );
    }
}

/// Whether two buffer kinds bind the same way (vertex strides may differ)
fn same_binding(a: &BufferKind, b: &BufferKind) -> bool {
    match (a, b) {
        (BufferKind::Vertex { .. }, BufferKind::Vertex { .. }) => true,
        (a, b) => a == b,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
