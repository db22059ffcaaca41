//! The ParseError type for wrapping validation diagnostics.
//!
//! [`ParseError`] wraps the diagnostics collected while validating a request
//! once at least one of them is an error.

use std::fmt;

use crate::error::Diagnostic;

/// Error type for a failed parse.
///
/// Holds every diagnostic collected up to the failure, warnings included.
#[derive(Debug, Clone)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    /// Create a new parse error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the error, returning its diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut errors = self.diagnostics.iter().filter(|d| d.severity().is_error());
        if let Some(first) = errors.next() {
            write!(f, "{}", first)?;
            let more = errors.count();
            if more > 0 {
                write!(f, " (+{} more)", more)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_error_from_diagnostic() {
        let diag = Diagnostic::error("test error").with_code(ErrorCode::E100);
        let err: ParseError = diag.into();

        assert_eq!(err.diagnostics().len(), 1);
        assert_eq!(err.diagnostics()[0].message(), "test error");
    }

    #[test]
    fn test_parse_error_display_counts_errors_only() {
        let err = ParseError::new(vec![
            Diagnostic::warning("a warning"),
            Diagnostic::error("first").with_code(ErrorCode::E100),
            Diagnostic::error("second"),
        ]);

        assert_eq!(err.to_string(), "error[E100]: first (+1 more)");
    }
}
