// ABOUTME: Diagnostics accumulator for non-fatal warnings during deployment.
// ABOUTME: Records resources a failed deployment leaves behind and cleanup that went wrong.

use serde::Serialize;

/// Collects non-fatal warnings during a deployment.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn container_left(message: impl Into<String>) -> Self {
        Self::new(WarningKind::ContainerLeft, message)
    }

    pub fn dns_record_left(message: impl Into<String>) -> Self {
        Self::new(WarningKind::DnsRecordLeft, message)
    }

    pub fn proxy_files_left(message: impl Into<String>) -> Self {
        Self::new(WarningKind::ProxyFilesLeft, message)
    }

    pub fn compensation_failed(message: impl Into<String>) -> Self {
        Self::new(WarningKind::CompensationFailed, message)
    }

    fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A container from a failed deployment is still on the engine.
    ContainerLeft,
    /// A DNS record from a failed deployment still exists.
    DnsRecordLeft,
    /// Proxy files from a failed deployment are still written.
    ProxyFilesLeft,
    /// A cleanup step failed; the resource needs manual removal.
    CompensationFailed,
}
