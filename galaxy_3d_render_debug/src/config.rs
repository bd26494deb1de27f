/// Debug layer configuration

/// How benign violations are handled
///
/// Benign violations are well-defined for the backend but usually a
/// mistake: a zero-length write, an array texture with a single layer,
/// an empty mip range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BenignViolationPolicy {
    /// Report a warning and let the call proceed
    #[default]
    Warn,
    /// Reject the call like any other violation
    Fatal,
}

/// Configuration for DebugRenderSystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugLayerConfig {
    /// Handling of benign violations
    pub benign_policy: BenignViolationPolicy,
    /// Log every call forwarded to the wrapped render system at TRACE level
    pub log_delegations: bool,
}

impl Default for DebugLayerConfig {
    fn default() -> Self {
        Self {
            benign_policy: BenignViolationPolicy::Warn,
            log_delegations: cfg!(debug_assertions),
        }
    }
}
