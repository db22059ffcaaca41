//! Schema view of the current graph.
//!
//! [`GraphContext`] tells the parser which node types, relationship types and
//! properties exist, so layout requests can be validated before anything is
//! compiled.

use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::graph::GraphSnapshot;

/// The node types, relationship types and property names present in a graph.
///
/// Properties are listed as `"Type.property"` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphContext {
    #[serde(default)]
    node_types: BTreeSet<String>,
    #[serde(default)]
    relationship_types: BTreeSet<String>,
    #[serde(default)]
    properties: Vec<String>,
}

impl GraphContext {
    /// Creates a context from explicit type and property lists.
    pub fn new(
        node_types: impl IntoIterator<Item = impl Into<String>>,
        relationship_types: impl IntoIterator<Item = impl Into<String>>,
        properties: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            node_types: node_types.into_iter().map(Into::into).collect(),
            relationship_types: relationship_types.into_iter().map(Into::into).collect(),
            properties: properties.into_iter().map(Into::into).collect(),
        }
    }

    /// Derives a context from the contents of a snapshot.
    ///
    /// Property names are collected in first-seen order without duplicates.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Self {
        let mut context = Self::default();
        let mut seen = BTreeSet::new();

        for node in snapshot.nodes() {
            context.node_types.insert(node.node_type().to_string());
            for name in node.properties().keys() {
                let qualified = format!("{}.{}", node.node_type(), name);
                if seen.insert(qualified.clone()) {
                    context.properties.push(qualified);
                }
            }
        }
        for edge in snapshot.edges() {
            context.relationship_types.insert(edge.edge_type().to_string());
        }

        debug!(
            node_types = context.node_types.len(),
            relationship_types = context.relationship_types.len(),
            properties = context.properties.len();
            "Derived graph context from snapshot"
        );
        context
    }

    pub fn node_types(&self) -> &BTreeSet<String> {
        &self.node_types
    }

    pub fn relationship_types(&self) -> &BTreeSet<String> {
        &self.relationship_types
    }

    /// Returns the qualified `"Type.property"` names.
    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    pub fn has_node_type(&self, node_type: &str) -> bool {
        self.node_types.contains(node_type)
    }

    pub fn has_relationship_type(&self, relationship: &str) -> bool {
        self.relationship_types.contains(relationship)
    }

    /// Returns the bare property names (the part after the type prefix),
    /// in listing order without duplicates.
    pub fn property_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for qualified in &self.properties {
            let name = qualified
                .split_once('.')
                .map_or(qualified.as_str(), |(_, name)| name);
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}
