//! Node and edge indices built once per compile.
//!
//! Nodes are placed in a dense arena in snapshot order; every compiled force
//! and constraint refers to nodes by their arena slot, and per-force outputs
//! are arrays aligned to it.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, warn};
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use lodestar_core::{
    geometry::Vec3,
    graph::{GraphSnapshot, NodeId},
};

use crate::error::CompileError;

/// Arena of the compiled nodes, with lookups by id and by type.
#[derive(Debug, Clone)]
pub struct NodeLookup {
    ids: Vec<NodeId>,
    types: Vec<String>,
    by_id: HashMap<NodeId, usize>,
    by_type: IndexMap<String, Vec<usize>>,
}

impl NodeLookup {
    /// Builds the arena from a snapshot, returning it with the initial
    /// positions aligned to it.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::DuplicateNode`] if two nodes share an id.
    pub fn build(snapshot: &GraphSnapshot) -> Result<(Self, Vec<Vec3>), CompileError> {
        let count = snapshot.nodes().len();
        let mut lookup = Self {
            ids: Vec::with_capacity(count),
            types: Vec::with_capacity(count),
            by_id: HashMap::with_capacity(count),
            by_type: IndexMap::new(),
        };
        let mut positions = Vec::with_capacity(count);

        for (slot, node) in snapshot.nodes().iter().enumerate() {
            if lookup.by_id.insert(node.id(), slot).is_some() {
                return Err(CompileError::DuplicateNode(node.id()));
            }
            lookup.ids.push(node.id());
            lookup.types.push(node.node_type().to_string());
            lookup
                .by_type
                .entry(node.node_type().to_string())
                .or_default()
                .push(slot);
            positions.push(node.position());
        }

        debug!(nodes = count, types = lookup.by_type.len(); "Built node index");
        Ok((lookup, positions))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the arena slot of a node id.
    pub fn slot(&self, id: NodeId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    pub fn id(&self, slot: usize) -> NodeId {
        self.ids[slot]
    }

    pub fn node_type(&self, slot: usize) -> &str {
        &self.types[slot]
    }

    /// Returns the slots of every node of a type, in snapshot order.
    pub fn of_type(&self, node_type: &str) -> &[usize] {
        self.by_type.get(node_type).map_or(&[], Vec::as_slice)
    }
}

/// A directed edge between two arena slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub from: usize,
    pub to: usize,
}

/// Edges between compiled nodes, indexed by ordered endpoint pair and by type.
#[derive(Debug, Clone)]
pub struct EdgeLookup {
    graph: DiGraph<NodeId, String>,
    by_pair: HashMap<(usize, usize), Vec<String>>,
    by_type: IndexMap<String, Vec<Link>>,
}

impl EdgeLookup {
    /// Builds the edge index. Edges with an endpoint outside the node set
    /// are dropped with a warning.
    pub fn build(snapshot: &GraphSnapshot, nodes: &NodeLookup) -> Self {
        let mut graph = DiGraph::with_capacity(nodes.len(), snapshot.edges().len());
        for slot in 0..nodes.len() {
            graph.add_node(nodes.id(slot));
        }

        let mut lookup = Self {
            graph,
            by_pair: HashMap::new(),
            by_type: IndexMap::new(),
        };
        let mut dropped = 0usize;

        for edge in snapshot.edges() {
            let (Some(from), Some(to)) = (nodes.slot(edge.from()), nodes.slot(edge.to())) else {
                warn!(
                    from = edge.from().raw(),
                    to = edge.to().raw(),
                    edge_type = edge.edge_type();
                    "Ignoring edge with an endpoint outside the node set"
                );
                dropped += 1;
                continue;
            };

            lookup.graph.add_edge(
                NodeIndex::new(from),
                NodeIndex::new(to),
                edge.edge_type().to_string(),
            );
            lookup
                .by_pair
                .entry((from, to))
                .or_default()
                .push(edge.edge_type().to_string());
            lookup
                .by_type
                .entry(edge.edge_type().to_string())
                .or_default()
                .push(Link { from, to });
        }

        debug!(
            edges = lookup.graph.edge_count(),
            dropped,
            types = lookup.by_type.len();
            "Built edge index"
        );
        lookup
    }

    pub fn len(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// Returns the types of the edges running from `from` to `to`.
    pub fn between(&self, from: usize, to: usize) -> &[String] {
        self.by_pair.get(&(from, to)).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if an edge joins the two slots in either direction.
    pub fn connected(&self, a: usize, b: usize) -> bool {
        !self.between(a, b).is_empty() || !self.between(b, a).is_empty()
    }

    /// Returns every edge of a type.
    pub fn of_type(&self, edge_type: &str) -> &[Link] {
        self.by_type.get(edge_type).map_or(&[], Vec::as_slice)
    }

    /// Iterates over edge types with their edges, in first-seen order.
    pub fn by_type(&self) -> impl Iterator<Item = (&str, &[Link])> {
        self.by_type
            .iter()
            .map(|(edge_type, links)| (edge_type.as_str(), links.as_slice()))
    }

    /// Iterates over the slots joined to `slot` by an edge of `edge_type`,
    /// either direction.
    pub fn neighbors_via<'a>(
        &'a self,
        slot: usize,
        edge_type: &'a str,
    ) -> impl Iterator<Item = usize> + 'a {
        let node = NodeIndex::new(slot);
        let outgoing = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .filter(move |edge| edge.weight() == edge_type)
            .map(|edge| edge.target().index());
        let incoming = self
            .graph
            .edges_directed(node, Direction::Incoming)
            .filter(move |edge| edge.weight() == edge_type)
            .map(|edge| edge.source().index());
        outgoing.chain(incoming)
    }
}
