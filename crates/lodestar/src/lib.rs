//! # Lodestar
//!
//! A 3D graph layout engine. Structured layout requests are validated and
//! expanded by [`lodestar_parser`], compiled here into a set of force and
//! constraint functions, and integrated once per frame by the host's render
//! loop.
//!
//! ## Usage
//!
//! ```
//! # use lodestar::{LayoutEngine, AppConfig};
//! # use lodestar_core::{graph::{GraphEdge, GraphNode, GraphSnapshot}, request::{LayoutRequest, RoleSlot}};
//! let mut snapshot = GraphSnapshot::new(
//!     vec![GraphNode::new(1, "Company"), GraphNode::new(2, "Person")],
//!     vec![GraphEdge::new(2, 1, "WorksAt")],
//! );
//! lodestar::scatter_positions(snapshot.nodes_mut(), 7, 1.0);
//!
//! let request = LayoutRequest::new("hierarchical-grouping")
//!     .with_primary(RoleSlot::new("Company"))
//!     .with_secondary(RoleSlot::new("Person").with_group_by("WorksAt relationship"));
//!
//! let mut engine = LayoutEngine::new(AppConfig::default());
//! engine.apply_request(&request, &snapshot).expect("snapshot is not empty");
//! let report = engine.tick(snapshot.nodes_mut(), 0.016).expect("layout is active");
//! assert_eq!(report.iteration, 1);
//! ```
//!
//! The [`LayoutCompiler`] can also be used directly. It reports failures
//! instead of substituting a default; [`LayoutEngine`] does the substitution.

pub mod compile;
pub mod config;
mod engine;
pub mod error;
mod executable;
mod seed;

pub use compile::LayoutCompiler;
pub use config::{AppConfig, RepulsionMode, SimulationConfig};
pub use engine::LayoutEngine;
pub use error::{CompileError, LodestarError};
pub use executable::{ExecutableLayout, FrameReport, SimulationState};
pub use seed::scatter_positions;
