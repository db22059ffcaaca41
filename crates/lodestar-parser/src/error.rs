//! Error and diagnostic system for the layout parser.
//!
//! This module provides:
//! - Error codes for documentation and searchability
//! - Severity levels separating hard validation errors from soft warnings
//! - A diagnostic collector for accumulating multiple findings
//!
//! # Overview
//!
//! The system is built around the [`Diagnostic`] type, which represents a
//! single error or warning with an optional code and help text. Hard errors
//! are wrapped in [`ParseError`]; the public parser entry points never return
//! it, they convert it into the default layout instead.
//!
//! # Example
//!
//! ```
//! # use lodestar_parser::error::{Diagnostic, ErrorCode};
//! let diag = Diagnostic::warning("relationship `Mentors` is not present in the graph")
//!     .with_code(ErrorCode::W200)
//!     .with_help("the relationship is kept and may match no edges");
//! assert!(diag.severity().is_warning());
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use parse_error::ParseError;
pub use severity::Severity;
