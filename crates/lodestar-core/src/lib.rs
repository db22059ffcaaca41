//! Lodestar Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Lodestar layout
//! parser and compiler. It includes:
//!
//! - **Geometry**: 3D vectors and axes ([`geometry`] module)
//! - **Graph**: The snapshot of nodes and edges being laid out ([`graph`] module)
//! - **Context**: Known node types, relationships and properties ([`context`] module)
//! - **Request**: Structured layout requests ([`request`] module)
//! - **Layout**: The validated structured layout specification ([`layout`] module)

pub mod context;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod request;
