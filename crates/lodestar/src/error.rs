//! Error types for Lodestar operations.
//!
//! [`CompileError`] is raised by the compiler and not recovered there;
//! [`LodestarError`] wraps it together with rejected requests and the I/O,
//! configuration and serialization failures of the surrounding application.

use std::io;

use thiserror::Error;

use lodestar_core::graph::NodeId;
use lodestar_parser::error::ParseError;

/// Failure to compile a structured layout against a graph snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("cannot compile a layout for an empty graph")]
    EmptyGraph,

    #[error("node id {0} appears more than once in the snapshot")]
    DuplicateNode(NodeId),

    #[error("invalid layout parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f32 },
}

/// The main error type for Lodestar operations.
#[derive(Debug, Error)]
pub enum LodestarError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A request rejected by the parser, for callers that opt out of the
    /// default-layout substitution.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
