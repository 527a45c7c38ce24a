use std::cell::RefCell;

use interfacer_types::{Diagnostic, Severity};

/// Receives user-facing diagnostics from the engine.
pub trait DiagnosticSink {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        let path = diagnostic
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        match diagnostic.severity {
            Severity::Error => {
                tracing::error!(target: "interfacer.diagnostics", code = diagnostic.code, %path, "{}", diagnostic.message)
            }
            Severity::Warning => {
                tracing::warn!(target: "interfacer.diagnostics", code = diagnostic.code, %path, "{}", diagnostic.message)
            }
            Severity::Info => {
                tracing::info!(target: "interfacer.diagnostics", code = diagnostic.code, %path, "{}", diagnostic.message)
            }
        }
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }

    pub fn with_code(&self, code: &str) -> Vec<Diagnostic> {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.code == code)
            .cloned()
            .collect()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }
}
