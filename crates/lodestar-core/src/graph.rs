//! Graph snapshot types consumed by the layout engine.
//!
//! A [`GraphSnapshot`] is the read-only view of the property graph that the
//! host hands to the engine: its [`GraphNode`]s (with mutable positions) and
//! [`GraphEdge`]s. The engine borrows a snapshot for one compile + update
//! session and never outlives it.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::geometry::Vec3;

/// Stable identifier of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates a node identifier from its raw value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for NodeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A property value attached to a node or edge.
///
/// Values are kept loosely typed, the way they arrive from a property graph
/// store. Layouts that need numbers (temporal, semantic) go through
/// [`PropertyValue::as_number`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl PropertyValue {
    /// Interprets the value as a number.
    ///
    /// Numbers are returned as-is. Text is parsed as a floating point number
    /// first, then as an ISO-8601 calendar date (`YYYY-MM-DD`) or date-time,
    /// which yields days since the Unix epoch. Impossible dates have no
    /// numeric reading, and neither do booleans.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lodestar_core::graph::PropertyValue;
    /// assert_eq!(PropertyValue::Number(4.5).as_number(), Some(4.5));
    /// assert_eq!(PropertyValue::Text("12".into()).as_number(), Some(12.0));
    /// assert_eq!(PropertyValue::Text("1970-01-02".into()).as_number(), Some(1.0));
    /// assert_eq!(PropertyValue::Bool(true).as_number(), None);
    /// ```
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => n.is_finite().then_some(*n),
            PropertyValue::Text(text) => {
                let text = text.trim();
                text.parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .or_else(|| iso_date_to_days(text).map(|days| days as f64))
            }
            PropertyValue::Bool(_) => None,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Parses an ISO-8601 date or date-time into days since 1970-01-01.
///
/// Date-times contribute the calendar date in their own offset.
fn iso_date_to_days(text: &str) -> Option<i64> {
    let date = DateTime::parse_from_rfc3339(text)
        .map(|datetime| datetime.date_naive())
        .or_else(|_| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
                .map(|datetime| datetime.date())
        })
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
        .ok()?;
    Some(
        date.signed_duration_since(DateTime::<Utc>::UNIX_EPOCH.date_naive())
            .num_days(),
    )
}

/// A node of the property graph.
///
/// Nodes have implicit unit mass. Identity is by [`NodeId`]; the position is
/// the only field the engine ever writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    id: NodeId,
    #[serde(rename = "type")]
    node_type: String,
    #[serde(default)]
    position: Vec3,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    properties: IndexMap<String, PropertyValue>,
}

impl GraphNode {
    /// Creates a node at the origin with no properties.
    pub fn new(id: impl Into<NodeId>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            position: Vec3::ZERO,
            properties: IndexMap::new(),
        }
    }

    /// Sets the initial position.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Adds a property.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn properties(&self) -> &IndexMap<String, PropertyValue> {
        &self.properties
    }

    /// Returns a single property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

/// A directed, typed edge of the property graph.
///
/// Edges are read-only to the engine. An edge whose endpoints are not both
/// present in the node set is ignored at compile time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    from: NodeId,
    to: NodeId,
    #[serde(rename = "type")]
    edge_type: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    attrs: IndexMap<String, PropertyValue>,
}

impl GraphEdge {
    /// Creates an edge without attributes.
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>, edge_type: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            edge_type: edge_type.into(),
            attrs: IndexMap::new(),
        }
    }

    /// Adds an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn from(&self) -> NodeId {
        self.from
    }

    pub fn to(&self) -> NodeId {
        self.to
    }

    pub fn edge_type(&self) -> &str {
        &self.edge_type
    }

    pub fn attrs(&self) -> &IndexMap<String, PropertyValue> {
        &self.attrs
    }
}

/// A snapshot of the graph: nodes and edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    nodes: Vec<GraphNode>,
    #[serde(default)]
    edges: Vec<GraphEdge>,
}

impl GraphSnapshot {
    /// Creates a snapshot from nodes and edges.
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Mutable access to the nodes, for the host's update loop.
    pub fn nodes_mut(&mut self) -> &mut [GraphNode] {
        &mut self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Returns `true` if the snapshot has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_builder() {
        let node = GraphNode::new(7, "Person")
            .with_position(Vec3::new(1.0, 2.0, 3.0))
            .with_property("name", "Ada");

        assert_eq!(node.id(), NodeId::new(7));
        assert_eq!(node.node_type(), "Person");
        assert_eq!(node.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(node.property("name"), Some(&PropertyValue::Text("Ada".into())));
        assert!(node.property("age").is_none());
    }

    #[test]
    fn test_edge_builder() {
        let edge = GraphEdge::new(2, 1, "WorksAt").with_attr("since", 2019.0);
        assert_eq!(edge.from(), NodeId::new(2));
        assert_eq!(edge.to(), NodeId::new(1));
        assert_eq!(edge.edge_type(), "WorksAt");
        assert_eq!(edge.attrs().len(), 1);
    }

    #[test]
    fn test_property_as_number() {
        assert_eq!(PropertyValue::Number(3.0).as_number(), Some(3.0));
        assert_eq!(PropertyValue::Number(f64::NAN).as_number(), None);
        assert_eq!(PropertyValue::Text(" 2.5 ".into()).as_number(), Some(2.5));
        assert_eq!(PropertyValue::Text("hello".into()).as_number(), None);
        assert_eq!(PropertyValue::Bool(false).as_number(), None);
    }

    #[test]
    fn test_property_iso_dates() {
        assert_eq!(iso_date_to_days("1970-01-01"), Some(0));
        assert_eq!(iso_date_to_days("2000-03-01"), Some(11_017));
        assert_eq!(iso_date_to_days("1969-12-31"), Some(-1));
        assert_eq!(iso_date_to_days("2021-06-15T10:00:00Z"), iso_date_to_days("2021-06-15"));
        assert_eq!(iso_date_to_days("2021-13-01"), None);
        assert_eq!(iso_date_to_days("2021-06-15x"), None);
        assert_eq!(iso_date_to_days("2021"), None);
        assert_eq!(iso_date_to_days("2021-06-15 10:00:00"), iso_date_to_days("2021-06-15"));
        assert_eq!(iso_date_to_days("2021-06-15T23:30:00-02:00"), iso_date_to_days("2021-06-15"));
        assert_eq!(iso_date_to_days("2021-06-15T25:00:00Z"), None);
    }

    #[test]
    fn test_impossible_dates_have_no_number() {
        assert_eq!(PropertyValue::Text("2021-02-31".into()).as_number(), None);
        assert_eq!(PropertyValue::Text("2023-02-29".into()).as_number(), None);
        assert_eq!(PropertyValue::Text("2021-04-31".into()).as_number(), None);
        assert_eq!(
            PropertyValue::Text("2024-02-29".into()).as_number(),
            Some(19_782.0)
        );
    }

    #[test]
    fn test_snapshot_deserialize_toml() {
        let source = r#"
            [[nodes]]
            id = 1
            type = "Company"

            [[nodes]]
            id = 2
            type = "Person"
            position = { x = 1.0, y = 0.0, z = -1.0 }
            properties = { joinedAt = "2020-01-01", age = 31 }

            [[edges]]
            from = 2
            to = 1
            type = "WorksAt"
        "#;

        let snapshot: GraphSnapshot = toml::from_str(source).expect("valid snapshot");
        assert_eq!(snapshot.nodes().len(), 2);
        assert_eq!(snapshot.edges().len(), 1);
        assert_eq!(snapshot.nodes()[0].position(), Vec3::ZERO);
        assert_eq!(snapshot.nodes()[1].position(), Vec3::new(1.0, 0.0, -1.0));
        assert_eq!(
            snapshot.nodes()[1].property("age").and_then(PropertyValue::as_number),
            Some(31.0)
        );
        assert_eq!(snapshot.edges()[0].edge_type(), "WorksAt");
    }
}
