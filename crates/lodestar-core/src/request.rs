//! Layout requests.
//!
//! A [`LayoutRequest`] is the structured form of a user's arrangement intent,
//! produced by an external component (voice or text understanding is out of
//! scope). It names a strategy, up to three role slots, qualitative force
//! modifications and optional hints. Nothing here is validated; that is the
//! parser's job.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::geometry::Axis;

/// A structured layout request.
///
/// # Examples
///
/// ```
/// # use lodestar_core::request::{LayoutRequest, RoleSlot};
/// let request = LayoutRequest::new("hierarchical-grouping")
///     .with_primary(RoleSlot::new("Company"))
///     .with_secondary(RoleSlot::new("Person").with_group_by("WorksAt relationship"));
///
/// assert_eq!(request.strategy(), "hierarchical-grouping");
/// assert!(request.tertiary().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    /// Strategy tag, kept as free text so unknown tags survive until parsing.
    strategy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    primary: Option<RoleSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    secondary: Option<RoleSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tertiary: Option<RoleSlot>,
    /// Pair key (`"A-B"` or `"A-B via R"`) to qualitative force description.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    modifications: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    visual: Option<VisualHints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_axis: Option<Axis>,
    /// Explicit time-bearing property for temporal layouts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_property: Option<String>,
    /// Explicit attributes for semantic layouts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<String>,
}

impl LayoutRequest {
    /// Creates a request for the given strategy tag with no roles.
    pub fn new(strategy: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            ..Self::default()
        }
    }

    pub fn with_primary(mut self, slot: RoleSlot) -> Self {
        self.primary = Some(slot);
        self
    }

    pub fn with_secondary(mut self, slot: RoleSlot) -> Self {
        self.secondary = Some(slot);
        self
    }

    pub fn with_tertiary(mut self, slot: RoleSlot) -> Self {
        self.tertiary = Some(slot);
        self
    }

    /// Adds a qualitative force modification for a pair key.
    pub fn with_modification(mut self, pair: impl Into<String>, description: impl Into<String>) -> Self {
        self.modifications.insert(pair.into(), description.into());
        self
    }

    pub fn with_visual(mut self, visual: VisualHints) -> Self {
        self.visual = Some(visual);
        self
    }

    pub fn with_time_axis(mut self, axis: Axis) -> Self {
        self.time_axis = Some(axis);
        self
    }

    pub fn with_time_property(mut self, property: impl Into<String>) -> Self {
        self.time_property = Some(property.into());
        self
    }

    pub fn with_attributes(mut self, attributes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    pub fn primary(&self) -> Option<&RoleSlot> {
        self.primary.as_ref()
    }

    pub fn secondary(&self) -> Option<&RoleSlot> {
        self.secondary.as_ref()
    }

    pub fn tertiary(&self) -> Option<&RoleSlot> {
        self.tertiary.as_ref()
    }

    /// Returns the populated role slots in primary, secondary, tertiary order.
    pub fn roles(&self) -> impl Iterator<Item = &RoleSlot> {
        [&self.primary, &self.secondary, &self.tertiary]
            .into_iter()
            .flatten()
    }

    pub fn modifications(&self) -> &IndexMap<String, String> {
        &self.modifications
    }

    pub fn visual(&self) -> Option<&VisualHints> {
        self.visual.as_ref()
    }

    pub fn time_axis(&self) -> Option<Axis> {
        self.time_axis
    }

    pub fn time_property(&self) -> Option<&str> {
        self.time_property.as_deref()
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }
}

/// A role slot: a node type plus the qualifiers that shape its placement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSlot {
    node_type: String,
    /// Free-text description of the grouping relationship.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    spatial_priority: Option<String>,
    /// Node type this role should stay close to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    near_to: Option<String>,
    /// Explicit hierarchy role; only honoured for the tertiary slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
}

impl RoleSlot {
    /// Creates a slot for a node type with no qualifiers.
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            ..Self::default()
        }
    }

    pub fn with_group_by(mut self, description: impl Into<String>) -> Self {
        self.group_by = Some(description.into());
        self
    }

    pub fn with_spatial_priority(mut self, priority: impl Into<String>) -> Self {
        self.spatial_priority = Some(priority.into());
        self
    }

    pub fn with_near_to(mut self, target: impl Into<String>) -> Self {
        self.near_to = Some(target.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn group_by(&self) -> Option<&str> {
        self.group_by.as_deref()
    }

    pub fn spatial_priority(&self) -> Option<&str> {
        self.spatial_priority.as_deref()
    }

    pub fn near_to(&self) -> Option<&str> {
        self.near_to.as_deref()
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

/// Optional visual hints attached to a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualHints {
    /// Free-text spacing hint, e.g. `"well separated"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    spacing: Option<String>,
}

impl VisualHints {
    pub fn with_spacing(spacing: impl Into<String>) -> Self {
        Self {
            spacing: Some(spacing.into()),
        }
    }

    pub fn spacing(&self) -> Option<&str> {
        self.spacing.as_deref()
    }
}
