//! Severity levels for diagnostics.
//!
//! This module defines the severity of diagnostic messages,
//! distinguishing between hard validation errors and soft warnings.

use std::fmt;

/// The severity level of a diagnostic.
///
/// Severity determines how the diagnostic is handled:
/// - [`Severity::Error`] aborts the requested layout; the parser substitutes
///   the default layout
/// - [`Severity::Warning`] is logged and parsing continues with a substitute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// A validation failure, such as a node type missing from the graph.
    Error,

    /// A non-fatal finding, such as an unknown relationship or strategy tag.
    Warning,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}
