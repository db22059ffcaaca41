//! The compiled, runnable simulation.
//!
//! An [`ExecutableLayout`] is immutable after compile apart from its
//! [`SimulationState`] and its copy of the node positions. A new layout
//! request replaces it wholesale.

use log::{trace, warn};
use serde::Serialize;

use lodestar_core::{
    geometry::Vec3,
    graph::{GraphNode, NodeId},
    layout::LayoutKind,
};

use crate::{
    compile::{
        constraint::ConstraintEntry,
        force::ForceEntry,
        index::{EdgeLookup, NodeLookup},
    },
    config::SimulationConfig,
};

/// Mutable progress of a simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationState {
    iteration: u32,
    energy: f32,
    converged: bool,
}

impl SimulationState {
    /// Number of update calls so far.
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Summed displacement magnitude of the last update.
    pub fn energy(&self) -> f32 {
        self.energy
    }

    pub fn converged(&self) -> bool {
        self.converged
    }
}

/// The outcome of one update call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport {
    pub iteration: u32,
    pub total_energy: f32,
    pub converged: bool,
}

/// A compiled layout: forces, constraints, indices, configuration and state.
#[derive(Debug, Clone)]
pub struct ExecutableLayout {
    kind: LayoutKind,
    forces: Vec<ForceEntry>,
    constraints: Vec<ConstraintEntry>,
    nodes: NodeLookup,
    edges: EdgeLookup,
    config: SimulationConfig,
    state: SimulationState,
    /// Last known positions, aligned to the node arena.
    positions: Vec<Vec3>,
}

impl ExecutableLayout {
    pub(crate) fn new(
        kind: LayoutKind,
        forces: Vec<ForceEntry>,
        constraints: Vec<ConstraintEntry>,
        nodes: NodeLookup,
        edges: EdgeLookup,
        positions: Vec<Vec3>,
        config: SimulationConfig,
    ) -> Self {
        Self {
            kind,
            forces,
            constraints,
            nodes,
            edges,
            config,
            state: SimulationState::default(),
            positions,
        }
    }

    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    pub fn forces(&self) -> &[ForceEntry] {
        &self.forces
    }

    pub fn constraints(&self) -> &[ConstraintEntry] {
        &self.constraints
    }

    pub fn nodes(&self) -> &NodeLookup {
        &self.nodes
    }

    pub fn edges(&self) -> &EdgeLookup {
        &self.edges
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Returns the last known position of a node.
    pub fn position_of(&self, id: NodeId) -> Option<Vec3> {
        self.nodes.slot(id).map(|slot| self.positions[slot])
    }

    /// Returns `true` once converged or the iteration cap is reached.
    pub fn is_settled(&self) -> bool {
        self.state.converged || self.state.iteration >= self.config.iterations()
    }

    /// Advances the simulation by one frame and writes the new positions
    /// back into `nodes`.
    ///
    /// Positions are read from `nodes` first, so the host may move nodes
    /// between frames. Nodes that were not part of the compiled snapshot are
    /// ignored; compiled nodes missing from `nodes` keep their last known
    /// position and still take part in the frame.
    pub fn update(&mut self, nodes: &mut [GraphNode], delta_time: f32) -> FrameReport {
        let slots: Vec<Option<usize>> = nodes
            .iter()
            .map(|node| self.nodes.slot(node.id()))
            .collect();
        for (node, slot) in nodes.iter().zip(&slots) {
            if let Some(slot) = slot {
                self.positions[*slot] = node.position();
            }
        }

        let report = self.step(delta_time);

        for (node, slot) in nodes.iter_mut().zip(&slots) {
            if let Some(slot) = slot {
                node.set_position(self.positions[*slot]);
            }
        }
        report
    }

    /// Advances the simulation by one frame on the layout's own positions.
    pub fn step(&mut self, delta_time: f32) -> FrameReport {
        let mut accumulators = vec![Vec3::ZERO; self.positions.len()];
        for entry in &self.forces {
            entry.accumulate(&self.positions, &mut accumulators);
        }
        for entry in &self.constraints {
            entry.accumulate(&self.positions, &mut accumulators);
        }

        let mut energy = 0.0;
        for (slot, (position, force)) in self.positions.iter_mut().zip(&accumulators).enumerate() {
            let velocity = force.scale(delta_time);
            if !velocity.is_finite() {
                warn!(
                    node = self.nodes.id(slot).raw(),
                    iteration = self.state.iteration;
                    "Non-finite displacement, holding node in place"
                );
                continue;
            }
            *position = position.add_vec(velocity);
            energy += velocity.length();
        }

        self.state.iteration += 1;
        self.state.energy = energy;
        self.state.converged = energy < self.config.tolerance();
        trace!(
            iteration = self.state.iteration,
            energy = energy,
            converged = self.state.converged;
            "Simulation frame"
        );

        FrameReport {
            iteration: self.state.iteration,
            total_energy: energy,
            converged: self.state.converged,
        }
    }
}
