//! # Lodestar Parser
//!
//! Validates structured layout requests against the schema of the current
//! graph and expands them into a [`StructuredLayout`].
//!
//! ## Usage
//!
//! ```
//! # use lodestar_core::{context::GraphContext, layout::LayoutKind, request::{LayoutRequest, RoleSlot}};
//! # use lodestar_parser::LayoutParser;
//! let context = GraphContext::new(["Company", "Person"], ["WorksAt"], Vec::<String>::new());
//! let request = LayoutRequest::new("hierarchical-grouping")
//!     .with_primary(RoleSlot::new("Company"))
//!     .with_secondary(RoleSlot::new("Person").with_group_by("WorksAt relationship"));
//!
//! let layout = LayoutParser::default().parse(&request, &context);
//! assert_eq!(layout.kind(), LayoutKind::HierarchicalForce);
//! assert_eq!(layout.groups()[0].relationship(), "WorksAt");
//! ```
//!
//! Parsing never fails. A request that does not validate is replaced by the
//! default force-directed layout, see [`LayoutParser::parse`].
//!
//! [`StructuredLayout`]: lodestar_core::layout::StructuredLayout

mod config;
pub mod error;
mod parser;
mod strategy;
mod text;

pub use config::{Intensity, IntensityTable, ParserConfig};
pub use parser::{LayoutParser, ParseOutcome, Strategy};
pub use text::{extract_relationship, parse_force_value, parse_force_value_with};
