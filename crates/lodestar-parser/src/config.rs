//! Heuristic constants used by the layout parser.
//!
//! Every number the parser derives from a qualitative request lives here, so
//! the mapping can be tuned from the `[parser]` section of a TOML config.

use serde::Deserialize;

use lodestar_core::geometry::Axis;

/// A strength and rest distance pair for one qualitative intensity.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Intensity {
    pub strength: f32,
    pub distance: f32,
}

impl Intensity {
    pub const fn new(strength: f32, distance: f32) -> Self {
        Self { strength, distance }
    }
}

/// The `strong`/`medium`/`weak` intensity table.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct IntensityTable {
    pub strong: Intensity,
    pub medium: Intensity,
    pub weak: Intensity,
}

impl Default for IntensityTable {
    fn default() -> Self {
        Self {
            strong: Intensity::new(0.8, 2.0),
            medium: Intensity::new(0.5, 3.0),
            weak: Intensity::new(0.2, 5.0),
        }
    }
}

/// Parser configuration section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    intensities: IntensityTable,
    /// Multiplier turning a repulsion intensity into a charge.
    repulsion_scale: f32,
    group_radius: f32,

    default_charge: f32,
    default_gravity: f32,
    default_damping: f32,
    high_priority_charge: f32,
    normal_priority_charge: f32,

    /// Ring radii for the primary, secondary and tertiary roles.
    ring_radii: [f32; 3],
    radial_weight: f32,
    tangential_weight: f32,

    vertical_min_distance: f32,
    separation_min_distance: f32,
    proximity_distance: f32,

    /// Property names tried in order when a temporal request names none.
    time_properties: Vec<String>,
    default_time_property: String,
    default_time_axis: Axis,

    semantic_dimensions: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            intensities: IntensityTable::default(),
            repulsion_scale: 500.0,
            group_radius: 3.0,
            default_charge: -100.0,
            default_gravity: 0.1,
            default_damping: 0.9,
            high_priority_charge: -500.0,
            normal_priority_charge: -200.0,
            ring_radii: [0.0, 3.0, 6.0],
            radial_weight: 0.8,
            tangential_weight: 0.3,
            vertical_min_distance: 2.0,
            separation_min_distance: 4.0,
            proximity_distance: 2.0,
            time_properties: [
                "createdAt",
                "created",
                "date",
                "timestamp",
                "joinedAt",
                "since",
                "startDate",
                "founded",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            default_time_property: "createdAt".to_string(),
            default_time_axis: Axis::Z,
            semantic_dimensions: 3,
        }
    }
}

impl ParserConfig {
    pub fn intensities(&self) -> &IntensityTable {
        &self.intensities
    }

    pub fn repulsion_scale(&self) -> f32 {
        self.repulsion_scale
    }

    pub fn group_radius(&self) -> f32 {
        self.group_radius
    }

    pub fn default_charge(&self) -> f32 {
        self.default_charge
    }

    pub fn default_gravity(&self) -> f32 {
        self.default_gravity
    }

    pub fn default_damping(&self) -> f32 {
        self.default_damping
    }

    /// Returns the charge override for a role's spatial priority.
    pub fn priority_charge(&self, priority: &str) -> f32 {
        if priority.trim().eq_ignore_ascii_case("high") {
            self.high_priority_charge
        } else {
            self.normal_priority_charge
        }
    }

    pub fn ring_radii(&self) -> [f32; 3] {
        self.ring_radii
    }

    pub fn radial_weight(&self) -> f32 {
        self.radial_weight
    }

    pub fn tangential_weight(&self) -> f32 {
        self.tangential_weight
    }

    pub fn vertical_min_distance(&self) -> f32 {
        self.vertical_min_distance
    }

    pub fn separation_min_distance(&self) -> f32 {
        self.separation_min_distance
    }

    pub fn proximity_distance(&self) -> f32 {
        self.proximity_distance
    }

    pub fn time_properties(&self) -> &[String] {
        &self.time_properties
    }

    pub fn default_time_property(&self) -> &str {
        &self.default_time_property
    }

    pub fn default_time_axis(&self) -> Axis {
        self.default_time_axis
    }

    pub fn semantic_dimensions(&self) -> u8 {
        self.semantic_dimensions
    }
}
