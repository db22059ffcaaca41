//! Per-strategy expansion of a validated request.
//!
//! Each submodule exposes `expand`, which builds the strategy-specific part
//! of a [`StructuredLayout`]: its plan and, for hierarchical grouping, the
//! hierarchy and groups. Forces from modifications and the derived
//! constraints are shared and added by the parser afterwards.
//!
//! [`StructuredLayout`]: lodestar_core::layout::StructuredLayout

pub(crate) mod force_directed;
pub(crate) mod hierarchical;
pub(crate) mod radial;
pub(crate) mod semantic;
pub(crate) mod temporal;

use lodestar_core::{context::GraphContext, request::LayoutRequest};

use crate::{config::ParserConfig, error::DiagnosticCollector};

/// Everything a strategy needs while expanding a request.
pub(crate) struct Expansion<'a> {
    pub request: &'a LayoutRequest,
    pub context: &'a GraphContext,
    pub config: &'a ParserConfig,
    pub diagnostics: &'a mut DiagnosticCollector,
}
