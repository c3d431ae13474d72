//! Diagnostic hook configuration

use serde::{Deserialize, Serialize};

/// Active diagnostic hooks for a filter adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosticsConfig {
    /// Emit one audit log record per evaluation
    pub audit_enabled: bool,
    /// Accumulate evaluation counters and timings
    pub profiling_enabled: bool,
}

impl DiagnosticsConfig {
    /// No hooks enabled
    pub const fn disabled() -> Self {
        Self {
            audit_enabled: false,
            profiling_enabled: false,
        }
    }

    pub const fn with_audit(mut self, enabled: bool) -> Self {
        self.audit_enabled = enabled;
        self
    }

    pub const fn with_profiling(mut self, enabled: bool) -> Self {
        self.profiling_enabled = enabled;
        self
    }

    /// Check if any hook is enabled
    pub const fn any_enabled(&self) -> bool {
        self.audit_enabled || self.profiling_enabled
    }
}
