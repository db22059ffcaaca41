//! Error codes for the layout parser diagnostic system.
//!
//! Codes are organized by severity:
//! - `E1xx` - Validation errors (hard, trigger the default layout)
//! - `W2xx` - Warnings (soft, processing continues)

use std::fmt;

/// Codes categorizing parser diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Validation Errors (E1xx)
    // =========================================================================
    /// Unknown node type.
    ///
    /// A role slot names a node type that is not present in the graph context.
    E100,

    /// Missing node type.
    ///
    /// A role slot has an empty node type, or the strategy requires a role
    /// that the request does not populate.
    E101,

    // =========================================================================
    // Warnings (W2xx)
    // =========================================================================
    /// Unknown relationship.
    ///
    /// The relationship is recorded verbatim and may match no edges.
    W200,

    /// Unknown strategy tag.
    ///
    /// The request is treated as `force-directed`.
    W201,

    /// Malformed modification key.
    ///
    /// The modification is skipped.
    W202,

    /// Unknown time property.
    ///
    /// An explicitly requested time property is not present in the graph.
    W203,

    /// Unknown hierarchy role.
    ///
    /// The tertiary slot names a role other than parent, child or related;
    /// `related` is used instead.
    W204,

    /// Unknown node type in a modification key.
    ///
    /// The modification is skipped.
    W205,

    /// Unknown semantic attribute.
    ///
    /// The attribute is kept and may be missing on every node.
    W206,
}

impl ErrorCode {
    /// Returns the string representation of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E100 => "E100",
            Self::E101 => "E101",
            Self::W200 => "W200",
            Self::W201 => "W201",
            Self::W202 => "W202",
            Self::W203 => "W203",
            Self::W204 => "W204",
            Self::W205 => "W205",
            Self::W206 => "W206",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::W206.to_string(), "W206");
    }
}
