//! Validation findings and their dispatch
//!
//! Validators push findings into a `Findings` collector. `Diagnostics`
//! then posts every finding to the debugger, counts it, and turns the
//! first fatal one into the error returned to the caller.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use galaxy_3d_render::render_trace;
use galaxy_3d_render::galaxy3d::{Error, Result};
use galaxy_3d_render::galaxy3d::debug::{
    DebugReport, DebugSeverity, RenderingDebugger, ValidationError, ValidationErrorKind,
};
use crate::config::{BenignViolationPolicy, DebugLayerConfig};

// ============================================================================
// Findings
// ============================================================================

/// One violation found by a validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Finding {
    pub kind: ValidationErrorKind,
    pub message: String,
    /// Tolerated under `BenignViolationPolicy::Warn`
    pub benign: bool,
}

/// Violations found while validating one call
#[derive(Debug)]
pub(crate) struct Findings {
    source: &'static str,
    items: Vec<Finding>,
}

impl Findings {
    pub fn new(source: &'static str) -> Self {
        Self {
            source,
            items: Vec::new(),
        }
    }

    /// Record a violation that rejects the call
    pub fn error(&mut self, kind: ValidationErrorKind, message: impl Into<String>) {
        self.items.push(Finding {
            kind,
            message: message.into(),
            benign: false,
        });
    }

    /// Record a benign violation
    pub fn warn(&mut self, kind: ValidationErrorKind, message: impl Into<String>) {
        self.items.push(Finding {
            kind,
            message: message.into(),
            benign: true,
        });
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|finding| !finding.benign)
    }

    #[cfg(test)]
    pub fn items(&self) -> &[Finding] {
        &self.items
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Number of findings reported by the debug layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationStats {
    /// Findings that rejected a call
    pub errors: u32,
    /// Tolerated benign findings
    pub warnings: u32,
}

impl ValidationStats {
    pub fn total(&self) -> u32 {
        self.errors + self.warnings
    }
}

/// Thread-safe validation statistics tracker
#[derive(Debug, Default)]
struct ValidationStatsTracker {
    errors: AtomicU32,
    warnings: AtomicU32,
}

impl ValidationStatsTracker {
    fn increment_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    fn increment_warning(&self) {
        self.warnings.fetch_add(1, Ordering::Relaxed);
    }

    fn get_stats(&self) -> ValidationStats {
        ValidationStats {
            errors: self.errors.load(Ordering::Relaxed),
            warnings: self.warnings.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        self.errors.store(0, Ordering::Relaxed);
        self.warnings.store(0, Ordering::Relaxed);
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Posts findings to the debugger and applies the benign-violation policy
pub(crate) struct Diagnostics {
    debugger: Option<Arc<dyn RenderingDebugger>>,
    config: DebugLayerConfig,
    stats: ValidationStatsTracker,
}

impl Diagnostics {
    pub fn new(debugger: Option<Arc<dyn RenderingDebugger>>, config: DebugLayerConfig) -> Self {
        Self {
            debugger,
            config,
            stats: ValidationStatsTracker::default(),
        }
    }

    pub fn config(&self) -> &DebugLayerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DebugLayerConfig) {
        self.config = config;
    }

    /// Report every finding; fails with the first one that rejects the call
    pub fn resolve(&self, findings: Findings) -> Result<()> {
        let source = findings.source;
        let mut rejection: Option<ValidationError> = None;

        for finding in findings.items {
            let fatal = !finding.benign || self.config.benign_policy == BenignViolationPolicy::Fatal;
            self.post(source, finding.kind, &finding.message, fatal);
            if fatal && rejection.is_none() {
                rejection = Some(ValidationError::new(finding.kind, source, finding.message));
            }
        }

        match rejection {
            Some(err) => Err(Error::Validation(err)),
            None => Ok(()),
        }
    }

    /// Report a failed handle lookup
    pub fn check<T>(&self, lookup: std::result::Result<T, ValidationError>) -> Result<T> {
        lookup.map_err(|err| {
            self.post(&err.source, err.kind, &err.message, true);
            Error::Validation(err)
        })
    }

    /// Log a call forwarded to the wrapped render system
    pub fn trace_delegation(&self, source: &str) {
        if self.config.log_delegations {
            render_trace!("galaxy3d::debug", "forwarding {}", source);
        }
    }

    pub fn stats(&self) -> ValidationStats {
        self.stats.get_stats()
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    fn post(&self, source: &str, kind: ValidationErrorKind, message: &str, fatal: bool) {
        let severity = if fatal {
            self.stats.increment_error();
            DebugSeverity::Error
        } else {
            self.stats.increment_warning();
            DebugSeverity::Warning
        };

        if let Some(debugger) = &self.debugger {
            debugger.post_report(&DebugReport {
                severity,
                source: source.to_string(),
                kind,
                message: message.to_string(),
            });
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
