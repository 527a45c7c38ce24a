use std::path::PathBuf;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    pub path: Option<PathBuf>,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            path,
        }
    }

    pub fn warning(code: &'static str, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            path,
        }
    }

    pub fn info(code: &'static str, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self {
            severity: Severity::Info,
            code,
            message: message.into(),
            path,
        }
    }
}
