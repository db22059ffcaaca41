//! Orchestration of parse, compile and update.
//!
//! [`LayoutEngine`] owns the active [`ExecutableLayout`]. A new request
//! replaces it for the next tick; a request that cannot be compiled is
//! retried once as the default layout, and if that fails too the previous
//! layout stays active.

use log::{error, info, warn};

use lodestar_core::{
    context::GraphContext,
    graph::{GraphNode, GraphSnapshot},
    layout::{LayoutKind, StructuredLayout},
    request::LayoutRequest,
};
use lodestar_parser::LayoutParser;

use crate::{
    compile::LayoutCompiler,
    config::AppConfig,
    error::LodestarError,
    executable::{ExecutableLayout, FrameReport},
};

/// Reason recorded on the default layout substituted after a compile error.
const COMPILE_FAILED: &str = "compile-failed";

/// Parses, compiles and drives layouts for one graph view.
#[derive(Debug, Default)]
pub struct LayoutEngine {
    parser: LayoutParser,
    compiler: LayoutCompiler,
    active: Option<ExecutableLayout>,
}

impl LayoutEngine {
    pub fn new(config: AppConfig) -> Self {
        Self {
            parser: LayoutParser::new(config.parser),
            compiler: LayoutCompiler::new(config.simulation),
            active: None,
        }
    }

    pub fn parser(&self) -> &LayoutParser {
        &self.parser
    }

    pub fn compiler(&self) -> &LayoutCompiler {
        &self.compiler
    }

    /// Returns the active layout, if any request has been applied.
    pub fn active(&self) -> Option<&ExecutableLayout> {
        self.active.as_ref()
    }

    /// Applies a request, deriving the graph context from the snapshot.
    pub fn apply_request(
        &mut self,
        request: &LayoutRequest,
        snapshot: &GraphSnapshot,
    ) -> Result<LayoutKind, LodestarError> {
        let context = GraphContext::from_snapshot(snapshot);
        self.apply_request_with_context(request, &context, snapshot)
    }

    /// Parses and compiles a request, making the result the active layout.
    ///
    /// # Errors
    ///
    /// Returns the compile error of the default layout when both the
    /// requested and the default layout fail to compile. The previous
    /// layout, if any, stays active.
    pub fn apply_request_with_context(
        &mut self,
        request: &LayoutRequest,
        context: &GraphContext,
        snapshot: &GraphSnapshot,
    ) -> Result<LayoutKind, LodestarError> {
        let structured = self.parser.parse(request, context);
        self.apply_layout(&structured, snapshot)
    }

    /// Compiles an already structured layout and makes it the active one.
    ///
    /// A layout that fails to compile is replaced by the default layout,
    /// built from the request recorded in its metadata.
    ///
    /// # Errors
    ///
    /// Same as [`LayoutEngine::apply_request_with_context`].
    pub fn apply_layout(
        &mut self,
        layout: &StructuredLayout,
        snapshot: &GraphSnapshot,
    ) -> Result<LayoutKind, LodestarError> {
        let executable = match self.compiler.compile(layout, snapshot) {
            Ok(executable) => executable,
            Err(err) => {
                warn!(err:% = err; "Compile failed, retrying with the default layout");
                let fallback = self
                    .parser
                    .default_layout(layout.metadata().request(), COMPILE_FAILED);
                self.compile_or_keep(&fallback, snapshot)?
            }
        };

        let kind = executable.kind();
        info!(kind = kind.as_str(), forces = executable.forces().len(); "Activated layout");
        self.active = Some(executable);
        Ok(kind)
    }

    fn compile_or_keep(
        &self,
        layout: &StructuredLayout,
        snapshot: &GraphSnapshot,
    ) -> Result<ExecutableLayout, LodestarError> {
        self.compiler.compile(layout, snapshot).map_err(|err| {
            error!(
                err:% = err,
                kept_previous = self.active.is_some();
                "Default layout failed to compile"
            );
            err.into()
        })
    }

    /// Advances the active layout by one frame.
    pub fn tick(&mut self, nodes: &mut [GraphNode], delta_time: f32) -> Option<FrameReport> {
        self.active
            .as_mut()
            .map(|layout| layout.update(nodes, delta_time))
    }

    /// Returns `true` when there is nothing left to animate.
    pub fn is_settled(&self) -> bool {
        self.active.as_ref().is_none_or(ExecutableLayout::is_settled)
    }

    /// Ticks with the configured time step until settled or `max_frames`
    /// frames have run. Returns the last frame's report.
    pub fn settle(&mut self, nodes: &mut [GraphNode], max_frames: u32) -> Option<FrameReport> {
        let time_step = self.compiler.config().time_step();
        let mut last = None;
        for _ in 0..max_frames {
            if self.is_settled() {
                break;
            }
            last = self.tick(nodes, time_step);
        }
        last
    }
}
