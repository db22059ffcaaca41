//! Structured layout specification.
//!
//! A [`StructuredLayout`] is the validated intermediate form produced by the
//! parser and consumed by the compiler. Every type name it references existed
//! in the graph context at parse time.
//!
//! # Pipeline Position
//!
//! ```text
//! LayoutRequest + GraphContext
//!     ↓ parser
//! StructuredLayout (these types) - hierarchy, groups, forces, constraints
//!     ↓ compiler (+ GraphSnapshot)
//! ExecutableLayout
//!     ↓ update() once per frame
//! Node positions
//! ```

use std::{fmt, str::FromStr};

use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::{geometry::Axis, request::LayoutRequest};

/// The compiled layout family, i.e. the `type` tag of a structured layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    HierarchicalForce,
    ForceDirected,
    Radial,
    Temporal,
    Semantic,
}

impl LayoutKind {
    /// Returns the wire tag of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutKind::HierarchicalForce => "hierarchical-force",
            LayoutKind::ForceDirected => "force-directed",
            LayoutKind::Radial => "radial",
            LayoutKind::Temporal => "temporal",
            LayoutKind::Semantic => "semantic",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Position of a node type in the requested hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HierarchyRole {
    Parent,
    Child,
    #[default]
    Related,
}

impl FromStr for HierarchyRole {
    type Err = UnknownTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parent" => Ok(Self::Parent),
            "child" => Ok(Self::Child),
            "related" => Ok(Self::Related),
            _ => Err(UnknownTagError::new("hierarchy role", s)),
        }
    }
}

/// Error returned when a tag string does not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {what} `{tag}`")]
pub struct UnknownTagError {
    what: &'static str,
    tag: String,
}

impl UnknownTagError {
    pub fn new(what: &'static str, tag: impl Into<String>) -> Self {
        Self {
            what,
            tag: tag.into(),
        }
    }

    /// Returns the unrecognized tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// One level of the requested hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyEntry {
    #[serde(rename = "type")]
    node_type: String,
    level: u32,
    role: HierarchyRole,
}

impl HierarchyEntry {
    pub fn new(node_type: impl Into<String>, level: u32, role: HierarchyRole) -> Self {
        Self {
            node_type: node_type.into(),
            level,
            role,
        }
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn role(&self) -> HierarchyRole {
        self.role
    }
}

/// How grouped children are arranged around their parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrangement {
    #[default]
    Circular,
}

/// Children of one type grouped around parents of another type, joined by a
/// named relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDescriptor {
    parent: String,
    children: String,
    relationship: String,
    #[serde(default)]
    arrangement: Arrangement,
    radius: f32,
}

impl GroupDescriptor {
    pub fn new(
        parent: impl Into<String>,
        children: impl Into<String>,
        relationship: impl Into<String>,
        arrangement: Arrangement,
        radius: f32,
    ) -> Self {
        Self {
            parent: parent.into(),
            children: children.into(),
            relationship: relationship.into(),
            arrangement,
            radius,
        }
    }

    pub fn parent(&self) -> &str {
        &self.parent
    }

    pub fn children(&self) -> &str {
        &self.children
    }

    pub fn relationship(&self) -> &str {
        &self.relationship
    }

    pub fn arrangement(&self) -> Arrangement {
        self.arrangement
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

/// A pair of node types, optionally restricted to one relationship type.
///
/// The textual form is `"A-B"` (also accepted: `"A->B"`, `"A<->B"`, `"A,B"`)
/// optionally followed by `" via R"`.
///
/// # Examples
///
/// ```
/// # use lodestar_core::layout::PairKey;
/// let key: PairKey = "Person-Company via WorksAt".parse().unwrap();
/// assert_eq!(key.source(), "Person");
/// assert_eq!(key.target(), "Company");
/// assert_eq!(key.via(), Some("WorksAt"));
/// assert_eq!(key.to_string(), "Person-Company via WorksAt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey {
    source: String,
    target: String,
    via: Option<String>,
}

impl PairKey {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            via: None,
        }
    }

    pub fn with_via(mut self, relationship: impl Into<String>) -> Self {
        self.via = Some(relationship.into());
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn via(&self) -> Option<&str> {
        self.via.as_deref()
    }

    /// Returns `true` if this key joins types `a` and `b` in either order.
    pub fn joins(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// Error returned when a pair key cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed pair key `{0}`, expected `A-B` optionally followed by `via R`")]
pub struct ParsePairKeyError(String);

impl FromStr for PairKey {
    type Err = ParsePairKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePairKeyError(s.to_string());
        let trimmed = s.trim();

        let (pair, via) = match trimmed.split_once(" via ") {
            Some((pair, via)) => (pair.trim(), Some(via.trim())),
            None => (trimmed, None),
        };

        let (source, target) = ["<->", "->", ",", "-"]
            .iter()
            .find_map(|sep| pair.split_once(sep))
            .ok_or_else(err)?;
        let (source, target) = (source.trim(), target.trim());

        let is_word = |w: &str| !w.is_empty() && !w.contains(char::is_whitespace);
        if !is_word(source) || !is_word(target) || via.is_some_and(|v| !is_word(v)) {
            return Err(err());
        }

        let key = PairKey::new(source, target);
        Ok(match via {
            Some(via) => key.with_via(via),
            None => key,
        })
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)?;
        if let Some(via) = &self.via {
            write!(f, " via {via}")?;
        }
        Ok(())
    }
}

impl Serialize for PairKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PairKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// The qualitative kind of a quantified force.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForceKind {
    Attraction,
    Repulsion,
    #[default]
    Spring,
}

impl fmt::Display for ForceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ForceKind::Attraction => "attraction",
            ForceKind::Repulsion => "repulsion",
            ForceKind::Spring => "spring",
        };
        write!(f, "{s}")
    }
}

/// A force with numeric strength and rest distance.
///
/// Repulsions carry a negative strength on the charge scale; attractions and
/// springs carry a positive spring constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantifiedForce {
    strength: f32,
    distance: f32,
    kind: ForceKind,
}

impl QuantifiedForce {
    pub fn new(strength: f32, distance: f32, kind: ForceKind) -> Self {
        Self {
            strength,
            distance,
            kind,
        }
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn kind(&self) -> ForceKind {
        self.kind
    }
}

/// A typed constraint descriptor.
///
/// Descriptors with an unrecognized `type` deserialize to
/// [`ConstraintDescriptor::Unknown`]; the compiler skips them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ConstraintDescriptor {
    /// Nodes of `higher` type sit at least `min_distance` above connected
    /// nodes of `lower` type.
    #[serde(rename_all = "camelCase")]
    Vertical {
        higher: String,
        lower: String,
        min_distance: f32,
    },
    /// Nodes of `node_type` stay within `distance` of the nearest node of
    /// `near_to` type.
    #[serde(rename_all = "camelCase")]
    Proximity {
        node_type: String,
        near_to: String,
        distance: f32,
    },
    /// All nodes keep at least `min_distance` from each other.
    #[serde(rename_all = "camelCase")]
    Separation { min_distance: f32 },
    #[serde(other)]
    Unknown,
}

impl ConstraintDescriptor {
    /// Returns the descriptor's type tag.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ConstraintDescriptor::Vertical { .. } => "vertical",
            ConstraintDescriptor::Proximity { .. } => "proximity",
            ConstraintDescriptor::Separation { .. } => "separation",
            ConstraintDescriptor::Unknown => "unknown",
        }
    }
}

/// Global parameters of a force-directed layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceDirectedPlan {
    charge: f32,
    gravity: f32,
    damping: f32,
    /// Per node type charge overrides.
    #[serde(default)]
    type_charges: IndexMap<String, f32>,
}

impl ForceDirectedPlan {
    pub fn new(charge: f32, gravity: f32, damping: f32) -> Self {
        Self {
            charge,
            gravity,
            damping,
            type_charges: IndexMap::new(),
        }
    }

    pub fn with_type_charge(mut self, node_type: impl Into<String>, charge: f32) -> Self {
        self.type_charges.insert(node_type.into(), charge);
        self
    }

    pub fn charge(&self) -> f32 {
        self.charge
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn type_charges(&self) -> &IndexMap<String, f32> {
        &self.type_charges
    }

    /// Returns the charge for a node type, falling back to the global charge.
    pub fn charge_for(&self, node_type: &str) -> f32 {
        self.type_charges
            .get(node_type)
            .copied()
            .unwrap_or(self.charge)
    }
}

/// One concentric ring of a radial layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ring {
    node_type: String,
    radius: f32,
    /// Spread members evenly around the ring.
    #[serde(default)]
    angular: bool,
}

impl Ring {
    pub fn new(node_type: impl Into<String>, radius: f32, angular: bool) -> Self {
        Self {
            node_type: node_type.into(),
            radius,
            angular,
        }
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn angular(&self) -> bool {
        self.angular
    }
}

/// Concentric ring placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadialPlan {
    rings: Vec<Ring>,
    radial_weight: f32,
    tangential_weight: f32,
}

impl RadialPlan {
    pub fn new(rings: Vec<Ring>, radial_weight: f32, tangential_weight: f32) -> Self {
        Self {
            rings,
            radial_weight,
            tangential_weight,
        }
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn radial_weight(&self) -> f32 {
        self.radial_weight
    }

    pub fn tangential_weight(&self) -> f32 {
        self.tangential_weight
    }
}

/// Placement along a time axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalPlan {
    axis: Axis,
    property: String,
    /// Node types placed on the axis; empty means every type.
    #[serde(default)]
    node_types: Vec<String>,
}

impl TemporalPlan {
    pub fn new(axis: Axis, property: impl Into<String>, node_types: Vec<String>) -> Self {
        Self {
            axis,
            property: property.into(),
            node_types,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn node_types(&self) -> &[String] {
        &self.node_types
    }

    /// Returns `true` if nodes of `node_type` are placed on the axis.
    pub fn includes(&self, node_type: &str) -> bool {
        self.node_types.is_empty() || self.node_types.iter().any(|t| t == node_type)
    }
}

/// Placement algorithm tag for semantic layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlacementAlgorithm {
    #[default]
    DimensionalityReduction,
}

/// Attribute-similarity placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticPlan {
    attributes: Vec<String>,
    dimensions: u8,
    #[serde(default)]
    algorithm: PlacementAlgorithm,
}

impl SemanticPlan {
    pub fn new(attributes: Vec<String>, dimensions: u8, algorithm: PlacementAlgorithm) -> Self {
        Self {
            attributes,
            dimensions,
            algorithm,
        }
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn dimensions(&self) -> u8 {
        self.dimensions
    }

    pub fn algorithm(&self) -> PlacementAlgorithm {
        self.algorithm
    }
}

/// Strategy-specific part of a structured layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
pub enum LayoutPlan {
    HierarchicalForce,
    ForceDirected(ForceDirectedPlan),
    Radial(RadialPlan),
    Temporal(TemporalPlan),
    Semantic(SemanticPlan),
}

impl LayoutPlan {
    pub fn kind(&self) -> LayoutKind {
        match self {
            LayoutPlan::HierarchicalForce => LayoutKind::HierarchicalForce,
            LayoutPlan::ForceDirected(_) => LayoutKind::ForceDirected,
            LayoutPlan::Radial(_) => LayoutKind::Radial,
            LayoutPlan::Temporal(_) => LayoutKind::Temporal,
            LayoutPlan::Semantic(_) => LayoutKind::Semantic,
        }
    }
}

/// Provenance of a structured layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request: Option<LayoutRequest>,
    strategy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    timestamp: u64,
}

impl LayoutMetadata {
    /// Creates metadata stamped with the current time.
    pub fn new(strategy: impl Into<String>, request: Option<LayoutRequest>) -> Self {
        let timestamp = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        Self {
            request,
            strategy: strategy.into(),
            reason: None,
            timestamp,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn request(&self) -> Option<&LayoutRequest> {
        self.request.as_ref()
    }

    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

/// The validated, strategy-expanded layout specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredLayout {
    plan: LayoutPlan,
    #[serde(default)]
    hierarchy: Vec<HierarchyEntry>,
    #[serde(default)]
    groups: Vec<GroupDescriptor>,
    #[serde(default)]
    forces: IndexMap<PairKey, QuantifiedForce>,
    #[serde(default)]
    constraints: Vec<ConstraintDescriptor>,
    metadata: LayoutMetadata,
}

impl StructuredLayout {
    /// Creates a layout with the given plan and no hierarchy, groups, forces
    /// or constraints.
    pub fn new(plan: LayoutPlan, metadata: LayoutMetadata) -> Self {
        Self {
            plan,
            hierarchy: Vec::new(),
            groups: Vec::new(),
            forces: IndexMap::new(),
            constraints: Vec::new(),
            metadata,
        }
    }

    /// Returns the layout family tag.
    pub fn kind(&self) -> LayoutKind {
        self.plan.kind()
    }

    pub fn plan(&self) -> &LayoutPlan {
        &self.plan
    }

    pub fn hierarchy(&self) -> &[HierarchyEntry] {
        &self.hierarchy
    }

    pub fn groups(&self) -> &[GroupDescriptor] {
        &self.groups
    }

    pub fn forces(&self) -> &IndexMap<PairKey, QuantifiedForce> {
        &self.forces
    }

    pub fn constraints(&self) -> &[ConstraintDescriptor] {
        &self.constraints
    }

    pub fn metadata(&self) -> &LayoutMetadata {
        &self.metadata
    }

    pub fn add_hierarchy_entry(&mut self, entry: HierarchyEntry) {
        self.hierarchy.push(entry);
    }

    pub fn add_group(&mut self, group: GroupDescriptor) {
        self.groups.push(group);
    }

    /// Adds a pair force, replacing any previous force for the same key.
    pub fn add_force(&mut self, key: PairKey, force: QuantifiedForce) {
        self.forces.insert(key, force);
    }

    pub fn add_constraint(&mut self, constraint: ConstraintDescriptor) {
        self.constraints.push(constraint);
    }

    /// Finds the force configured for a pair of types, preferring a key
    /// restricted to `relationship` over an unrestricted one.
    pub fn force_between(
        &self,
        a: &str,
        b: &str,
        relationship: Option<&str>,
    ) -> Option<&QuantifiedForce> {
        self.entry_between(a, b, relationship).map(|(_, force)| force)
    }

    /// Like [`force_between`](Self::force_between), also returning the key
    /// that matched.
    pub fn entry_between(
        &self,
        a: &str,
        b: &str,
        relationship: Option<&str>,
    ) -> Option<(&PairKey, &QuantifiedForce)> {
        let restricted = relationship.and_then(|rel| {
            self.forces
                .iter()
                .find(|(key, _)| key.joins(a, b) && key.via() == Some(rel))
        });
        restricted
            .or_else(|| {
                self.forces
                    .iter()
                    .find(|(key, _)| key.joins(a, b) && key.via().is_none())
            })
    }

    /// Finds the force configured for edges of a relationship type, keyed by
    /// `via` regardless of the endpoint types.
    pub fn force_for_relationship(&self, relationship: &str) -> Option<&QuantifiedForce> {
        self.forces
            .iter()
            .find(|(key, _)| key.via() == Some(relationship))
            .map(|(_, force)| force)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_layout() -> StructuredLayout {
        let mut layout = StructuredLayout::new(
            LayoutPlan::HierarchicalForce,
            LayoutMetadata::new("hierarchical-grouping", None),
        );
        layout.add_hierarchy_entry(HierarchyEntry::new("Company", 0, HierarchyRole::Parent));
        layout.add_hierarchy_entry(HierarchyEntry::new("Person", 1, HierarchyRole::Child));
        layout.add_group(GroupDescriptor::new(
            "Company",
            "Person",
            "WorksAt",
            Arrangement::Circular,
            3.0,
        ));
        layout.add_force(
            PairKey::new("Person", "Company"),
            QuantifiedForce::new(0.8, 2.0, ForceKind::Attraction),
        );
        layout.add_constraint(ConstraintDescriptor::Vertical {
            higher: "Company".into(),
            lower: "Person".into(),
            min_distance: 2.0,
        });
        layout
    }

    #[test]
    fn test_layout_kind_tags() {
        assert_eq!(LayoutKind::HierarchicalForce.to_string(), "hierarchical-force");
        assert_eq!(LayoutKind::ForceDirected.as_str(), "force-directed");
        assert_eq!(sample_layout().kind(), LayoutKind::HierarchicalForce);
    }

    #[test]
    fn test_hierarchy_role_from_str() {
        assert_eq!("Parent".parse::<HierarchyRole>(), Ok(HierarchyRole::Parent));
        assert_eq!("child".parse::<HierarchyRole>(), Ok(HierarchyRole::Child));
        let err = "sibling".parse::<HierarchyRole>().unwrap_err();
        assert_eq!(err.tag(), "sibling");
    }

    #[test]
    fn test_pair_key_parsing() {
        let plain: PairKey = "Person-Company".parse().unwrap();
        assert_eq!(plain, PairKey::new("Person", "Company"));

        let arrow: PairKey = "Person -> Company".parse().unwrap();
        assert_eq!(arrow, PairKey::new("Person", "Company"));

        let both: PairKey = "Person<->Project via WorksOn".parse().unwrap();
        assert_eq!(both, PairKey::new("Person", "Project").with_via("WorksOn"));

        let comma: PairKey = "Person, Person".parse().unwrap();
        assert_eq!(comma, PairKey::new("Person", "Person"));

        assert!("Person".parse::<PairKey>().is_err());
        assert!("-Company".parse::<PairKey>().is_err());
        assert!("Person-Company via".parse::<PairKey>().is_err());
        assert!("Big Person-Company".parse::<PairKey>().is_err());
    }

    #[test]
    fn test_pair_key_joins_either_order() {
        let key = PairKey::new("Person", "Company");
        assert!(key.joins("Person", "Company"));
        assert!(key.joins("Company", "Person"));
        assert!(!key.joins("Person", "Project"));
    }

    #[test]
    fn test_force_between_prefers_restricted_key() {
        let mut layout = sample_layout();
        layout.add_force(
            PairKey::new("Company", "Person").with_via("WorksAt"),
            QuantifiedForce::new(0.2, 5.0, ForceKind::Attraction),
        );

        let restricted = layout.force_between("Person", "Company", Some("WorksAt")).unwrap();
        assert_eq!(restricted.strength(), 0.2);

        let unrestricted = layout.force_between("Person", "Company", Some("Knows")).unwrap();
        assert_eq!(unrestricted.strength(), 0.8);

        assert!(layout.force_between("Person", "Project", None).is_none());
        let (key, _) = layout.entry_between("Company", "Person", Some("WorksAt")).unwrap();
        assert_eq!(key, &PairKey::new("Company", "Person").with_via("WorksAt"));
        assert_eq!(layout.force_for_relationship("WorksAt").unwrap().distance(), 5.0);
        assert!(layout.force_for_relationship("Knows").is_none());
    }

    #[test]
    fn test_constraint_unknown_type_deserializes() {
        let source = r#"
            type = "magnetic"
            strength = 3.0
        "#;
        let constraint: ConstraintDescriptor = toml::from_str(source).unwrap();
        assert_eq!(constraint, ConstraintDescriptor::Unknown);
        assert_eq!(constraint.kind_name(), "unknown");
    }

    #[test]
    fn test_layout_toml_roundtrip_keeps_structure() {
        let layout = sample_layout();
        let text = toml::to_string(&layout).expect("serializable");
        let parsed: StructuredLayout = toml::from_str(&text).expect("deserializable");

        assert_eq!(parsed.kind(), LayoutKind::HierarchicalForce);
        assert_eq!(parsed.hierarchy(), layout.hierarchy());
        assert_eq!(parsed.groups(), layout.groups());
        assert_eq!(parsed.constraints(), layout.constraints());
        assert_eq!(parsed.forces().len(), 1);
    }

    #[test]
    fn test_plan_charge_for() {
        let plan = ForceDirectedPlan::new(-100.0, 0.1, 0.9).with_type_charge("Company", -500.0);
        assert_eq!(plan.charge_for("Company"), -500.0);
        assert_eq!(plan.charge_for("Person"), -100.0);
    }

    #[test]
    fn test_temporal_plan_includes() {
        let all = TemporalPlan::new(Axis::Z, "createdAt", Vec::new());
        assert!(all.includes("Anything"));

        let some = TemporalPlan::new(Axis::X, "createdAt", vec!["Person".into()]);
        assert!(some.includes("Person"));
        assert!(!some.includes("Company"));
    }
}
