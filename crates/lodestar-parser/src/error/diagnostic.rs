//! The core diagnostic type for the parser error system.
//!
//! A [`Diagnostic`] represents a single error or warning with optional
//! error code and help text.

use std::fmt;

use crate::error::{Severity, error_code::ErrorCode};

/// A diagnostic message produced while validating a layout request.
///
/// # Example
///
/// ```text
/// error[E100]: node type `Employee` is not present in the graph
///    = help: known node types: Company, Person
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E100]: message" or "warning: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_code() {
        let diag = Diagnostic::error("unknown node type").with_code(ErrorCode::E100);
        assert_eq!(diag.to_string(), "error[E100]: unknown node type");
    }

    #[test]
    fn test_display_without_code() {
        let diag = Diagnostic::warning("something odd");
        assert_eq!(diag.to_string(), "warning: something odd");
    }

    #[test]
    fn test_builder_fields() {
        let diag = Diagnostic::warning("unknown strategy")
            .with_code(ErrorCode::W201)
            .with_help("falling back to force-directed");

        assert!(diag.severity().is_warning());
        assert_eq!(diag.code(), Some(ErrorCode::W201));
        assert_eq!(diag.message(), "unknown strategy");
        assert_eq!(diag.help(), Some("falling back to force-directed"));
    }
}
