//! Structured layout to executable simulation.
//!
//! The compiler builds the node and edge indices once, then dispatches on the
//! layout family to assemble force entries, followed by the pair forces from
//! request modifications and the compiled constraints.

use indexmap::IndexSet;
use log::{debug, info, warn};

use lodestar_core::{
    geometry::Axis,
    graph::GraphSnapshot,
    layout::{
        ConstraintDescriptor, ForceDirectedPlan, ForceKind, HierarchyRole, LayoutPlan, PairKey,
        RadialPlan, SemanticPlan, StructuredLayout, TemporalPlan,
    },
};

use crate::{
    compile::{
        constraint::{Constraint, ConstraintEntry},
        force::{CircleSlot, Force, ForceEntry, RingSlot, slot_angles},
        index::{EdgeLookup, Link, NodeLookup},
    },
    config::{RepulsionMode, SimulationConfig},
    error::CompileError,
    executable::ExecutableLayout,
};

/// Charge of the repulsion keeping top-level parents apart.
const PARENT_CHARGE: f32 = -500.0;
/// Parents farther apart than this do not repel each other.
const PARENT_CUTOFF: f32 = 10.0;
const GROUP_SPRING_STRENGTH: f32 = 0.8;
const CIRCULAR_WEIGHT: f32 = 0.5;
const GRAVITY: f32 = 0.1;

const EDGE_SPRING_STRENGTH: f32 = 0.5;
const EDGE_REST_LENGTH: f32 = 3.0;
/// Charge used by layout families whose plan carries none.
const DEFAULT_CHARGE: f32 = -100.0;

/// Width of the time axis that dated nodes are spread over.
const TIME_SPAN: f32 = 20.0;
const AXIS_BIAS_STRENGTH: f32 = 0.5;

/// Feature distance to spatial distance factor.
const SEMANTIC_SCALE: f32 = 10.0;
const SEMANTIC_MIN_DISTANCE: f32 = 1.0;
const ATTRIBUTE_STRENGTH: f32 = 0.3;
/// Pull toward the plane when fewer than three dimensions are requested.
const FLATTEN_STRENGTH: f32 = 0.5;

const PROXIMITY_WEIGHT: f32 = 0.5;

/// Compiles structured layouts against graph snapshots.
#[derive(Debug, Clone, Default)]
pub struct LayoutCompiler {
    config: SimulationConfig,
}

impl LayoutCompiler {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Compiles `layout` against the nodes and edges of `snapshot`.
    ///
    /// The compiler does not substitute a default on failure; that is the
    /// caller's decision.
    ///
    /// # Errors
    ///
    /// - [`CompileError::EmptyGraph`] if the snapshot has no nodes
    /// - [`CompileError::DuplicateNode`] if two nodes share an id
    /// - [`CompileError::InvalidParameter`] for a non-finite number, or a
    ///   negative radius or distance, in the layout
    pub fn compile(
        &self,
        layout: &StructuredLayout,
        snapshot: &GraphSnapshot,
    ) -> Result<ExecutableLayout, CompileError> {
        info!(kind = layout.kind().as_str(); "Compiling layout");
        if snapshot.is_empty() {
            return Err(CompileError::EmptyGraph);
        }
        validate_parameters(layout)?;

        let (nodes, positions) = NodeLookup::build(snapshot)?;
        let edges = EdgeLookup::build(snapshot, &nodes);

        let mut build = Build {
            layout,
            snapshot,
            nodes: &nodes,
            edges: &edges,
            config: &self.config,
            forces: Vec::new(),
            consumed: IndexSet::new(),
        };
        match layout.plan() {
            LayoutPlan::HierarchicalForce => build.hierarchical(),
            LayoutPlan::ForceDirected(plan) => build.force_directed(plan),
            LayoutPlan::Radial(plan) => build.radial(plan),
            LayoutPlan::Temporal(plan) => build.temporal(plan),
            LayoutPlan::Semantic(plan) => build.semantic(plan),
        }
        build.pair_forces();
        let constraints = build.constraints();
        let forces = build.forces;

        debug!(
            forces = forces.len(),
            constraints = constraints.len(),
            nodes = nodes.len(),
            edges = edges.len();
            "Layout compiled"
        );
        Ok(ExecutableLayout::new(
            layout.kind(),
            forces,
            constraints,
            nodes,
            edges,
            positions,
            self.config.clone(),
        ))
    }
}

/// Working state of one compile call.
struct Build<'a> {
    layout: &'a StructuredLayout,
    snapshot: &'a GraphSnapshot,
    nodes: &'a NodeLookup,
    edges: &'a EdgeLookup,
    config: &'a SimulationConfig,
    forces: Vec<ForceEntry>,
    /// Pair modifications already folded into a family-specific force.
    consumed: IndexSet<&'a PairKey>,
}

impl Build<'_> {
    fn push(&mut self, name: impl Into<String>, force: Force) {
        let entry = ForceEntry::new(name, force);
        debug!(name = entry.name(), kind = entry.kind(); "Added force");
        self.forces.push(entry);
    }

    fn gravity(&mut self, strength: f32) {
        self.push("gravity", Force::Gravity { strength });
    }

    /// Global many-body repulsion with a charge per arena slot.
    fn repulsion(&mut self, charge_for: impl Fn(&str) -> f32) {
        let charges = (0..self.nodes.len())
            .map(|slot| charge_for(self.nodes.node_type(slot)))
            .collect();
        let theta = match self.config.repulsion() {
            RepulsionMode::Naive => None,
            RepulsionMode::BarnesHut => Some(self.config.theta()),
        };
        self.push("repulsion", Force::Repulsion { charges, theta });
    }

    /// One spring per edge type, configured by a `via` force when present.
    fn edge_springs(&mut self) {
        let (layout, edges) = (self.layout, self.edges);
        for (edge_type, links) in edges.by_type() {
            let configured = layout.forces().iter().find(|(key, force)| {
                key.via() == Some(edge_type) && force.kind() != ForceKind::Repulsion
            });
            let (strength, rest_length) = match configured {
                Some((key, force)) => {
                    self.consumed.insert(key);
                    (force.strength(), force.distance())
                }
                None => (EDGE_SPRING_STRENGTH, EDGE_REST_LENGTH),
            };
            self.push(
                format!("spring:{edge_type}"),
                Force::Spring {
                    links: links.to_vec(),
                    strength,
                    rest_length,
                },
            );
        }
    }

    fn hierarchical(&mut self) {
        let layout = self.layout;
        let mut parent_types: IndexSet<&str> = layout
            .hierarchy()
            .iter()
            .filter(|entry| entry.role() == HierarchyRole::Parent)
            .map(|entry| entry.node_type())
            .collect();
        parent_types.extend(layout.groups().iter().map(|group| group.parent()));

        let parents: Vec<usize> = parent_types
            .iter()
            .flat_map(|node_type| self.nodes.of_type(node_type).iter().copied())
            .collect();
        if parents.len() > 1 {
            let pairs = unordered_pairs(&parents);
            self.push(
                "parent-repulsion",
                Force::PairRepulsion {
                    pairs,
                    charge: PARENT_CHARGE,
                    cutoff: Some(PARENT_CUTOFF),
                },
            );
        }

        for group in layout.groups() {
            let folded = layout
                .entry_between(group.parent(), group.children(), Some(group.relationship()))
                .filter(|(_, force)| force.kind() != ForceKind::Repulsion);
            let strength = match folded {
                Some((key, force)) => {
                    self.consumed.insert(key);
                    force.strength()
                }
                None => GROUP_SPRING_STRENGTH,
            };

            let mut links = Vec::new();
            let mut slots = Vec::new();
            for &parent in self.nodes.of_type(group.parent()) {
                let mut children: Vec<usize> = self
                    .edges
                    .neighbors_via(parent, group.relationship())
                    .filter(|&child| child != parent && self.nodes.node_type(child) == group.children())
                    .collect();
                children.sort_unstable();
                children.dedup();

                for (&child, angle) in children.iter().zip(slot_angles(children.len())) {
                    links.push(Link {
                        from: child,
                        to: parent,
                    });
                    slots.push(CircleSlot {
                        node: child,
                        center: parent,
                        angle,
                    });
                }
            }

            if links.is_empty() {
                debug!(
                    relationship = group.relationship();
                    "No edges match group, skipping its forces"
                );
                continue;
            }
            let label = format!("{}/{}", group.parent(), group.children());
            self.push(
                format!("group-spring:{label}"),
                Force::Spring {
                    links,
                    strength,
                    rest_length: group.radius(),
                },
            );
            self.push(
                format!("circular:{label}"),
                Force::Circular {
                    slots,
                    radius: group.radius(),
                    weight: CIRCULAR_WEIGHT,
                },
            );
        }

        self.gravity(GRAVITY);
    }

    fn force_directed(&mut self, plan: &ForceDirectedPlan) {
        self.repulsion(|node_type| plan.charge_for(node_type));
        self.edge_springs();
        self.gravity(plan.gravity());
    }

    fn radial(&mut self, plan: &RadialPlan) {
        for ring in plan.rings() {
            let members = self.nodes.of_type(ring.node_type());
            let slots = if ring.angular() {
                members
                    .iter()
                    .zip(slot_angles(members.len()))
                    .map(|(&node, angle)| RingSlot {
                        node,
                        angle: Some(angle),
                    })
                    .collect()
            } else {
                members
                    .iter()
                    .map(|&node| RingSlot { node, angle: None })
                    .collect()
            };
            self.push(
                format!("ring:{}", ring.node_type()),
                Force::Ring {
                    members: slots,
                    radius: ring.radius(),
                    radial_weight: plan.radial_weight(),
                    tangential_weight: plan.tangential_weight(),
                },
            );
        }
        self.repulsion(|_| DEFAULT_CHARGE);
        self.gravity(GRAVITY);
    }

    fn temporal(&mut self, plan: &TemporalPlan) {
        let dated: Vec<(usize, f64)> = self
            .numeric_values(plan.property(), |node_type| plan.includes(node_type))
            .collect();

        if dated.is_empty() {
            warn!(property = plan.property(); "No node carries a usable time value");
        } else {
            let targets = normalize(&dated)
                .map(|(slot, unit)| (slot, (unit - 0.5) * TIME_SPAN))
                .collect();
            self.push(
                format!("time-axis:{}", plan.property()),
                Force::AxisBias {
                    axis: plan.axis(),
                    targets,
                    strength: AXIS_BIAS_STRENGTH,
                },
            );
        }

        self.repulsion(|_| DEFAULT_CHARGE);
        self.edge_springs();
        self.gravity(GRAVITY);
    }

    fn semantic(&mut self, plan: &SemanticPlan) {
        let count = self.nodes.len();
        let mut features = vec![Vec::with_capacity(plan.attributes().len()); count];

        for attribute in plan.attributes() {
            let mut column = vec![0.5f32; count];
            let values: Vec<(usize, f64)> = self.numeric_values(attribute, |_| true).collect();
            for (slot, unit) in normalize(&values) {
                column[slot] = unit;
            }
            for (feature, value) in features.iter_mut().zip(column) {
                feature.push(value);
            }
        }

        let pairs = (0..count)
            .flat_map(|a| ((a + 1)..count).map(move |b| (a, b)))
            .map(|(a, b)| {
                let feature_distance = features[a]
                    .iter()
                    .zip(&features[b])
                    .map(|(x, y)| (x - y) * (x - y))
                    .sum::<f32>()
                    .sqrt();
                (a, b, (feature_distance * SEMANTIC_SCALE).max(SEMANTIC_MIN_DISTANCE))
            })
            .collect();
        self.push(
            "attribute-distance",
            Force::AttributeDistance {
                pairs,
                strength: ATTRIBUTE_STRENGTH,
            },
        );

        if plan.dimensions() < 3 {
            let mut flatten = vec![Axis::Y];
            if plan.dimensions() < 2 {
                flatten.push(Axis::Z);
            }
            for axis in flatten {
                self.push(
                    format!("flatten:{axis}"),
                    Force::AxisBias {
                        axis,
                        targets: (0..count).map(|slot| (slot, 0.0)).collect(),
                        strength: FLATTEN_STRENGTH,
                    },
                );
            }
        }

        self.gravity(GRAVITY);
    }

    /// Numeric values of a property on the nodes whose type passes `filter`.
    fn numeric_values<'b>(
        &'b self,
        property: &'b str,
        filter: impl Fn(&str) -> bool + 'b,
    ) -> impl Iterator<Item = (usize, f64)> + 'b {
        (0..self.nodes.len())
            .filter(move |&slot| filter(self.nodes.node_type(slot)))
            .filter_map(move |slot| {
                self.snapshot.nodes()[slot]
                    .property(property)
                    .and_then(|value| value.as_number())
                    .map(|value| (slot, value))
            })
    }

    /// Forces from pair modifications not already folded into the family's
    /// own forces.
    fn pair_forces(&mut self) {
        let layout = self.layout;
        for (key, force) in layout.forces() {
            if self.consumed.contains(key) {
                continue;
            }

            let name = key.to_string();
            if force.kind() == ForceKind::Repulsion {
                let pairs = self.type_pairs(key);
                if pairs.is_empty() {
                    continue;
                }
                self.push(
                    format!("pair-repulsion:{name}"),
                    Force::PairRepulsion {
                        pairs,
                        charge: force.strength(),
                        cutoff: None,
                    },
                );
            } else {
                let links = self.links_joining(key);
                if links.is_empty() {
                    debug!(pair = name.as_str(); "No edges join pair, skipping its spring");
                    continue;
                }
                self.push(
                    format!("pair-spring:{name}"),
                    Force::Spring {
                        links,
                        strength: force.strength(),
                        rest_length: force.distance(),
                    },
                );
            }
        }
    }

    /// Node pairs of the key's two types; with `via`, only pairs joined by
    /// an edge of that type.
    fn type_pairs(&self, key: &PairKey) -> Vec<(usize, usize)> {
        if key.via().is_some() {
            return self
                .links_joining(key)
                .into_iter()
                .map(|link| (link.from, link.to))
                .collect();
        }
        let mut pairs = Vec::new();
        for &a in self.nodes.of_type(key.source()) {
            for &b in self.nodes.of_type(key.target()) {
                let first_seen = key.source() != key.target() || a < b;
                if a != b && first_seen {
                    pairs.push((a, b));
                }
            }
        }
        pairs
    }

    /// Edges whose endpoint types match the key, restricted to `via` when set.
    fn links_joining(&self, key: &PairKey) -> Vec<Link> {
        let matches = |link: &Link| {
            key.joins(self.nodes.node_type(link.from), self.nodes.node_type(link.to))
        };
        match key.via() {
            Some(via) => self.edges.of_type(via).iter().copied().filter(matches).collect(),
            None => self
                .edges
                .by_type()
                .flat_map(|(_, links)| links.iter().copied())
                .filter(matches)
                .collect(),
        }
    }

    fn constraints(&self) -> Vec<ConstraintEntry> {
        let mut compiled = Vec::new();
        for descriptor in self.layout.constraints() {
            let entry = match descriptor {
                ConstraintDescriptor::Vertical {
                    higher,
                    lower,
                    min_distance,
                } => {
                    let pairs = self
                        .nodes
                        .of_type(lower)
                        .iter()
                        .filter_map(|&child| {
                            self.nodes
                                .of_type(higher)
                                .iter()
                                .find(|&&parent| {
                                    parent != child && self.edges.connected(child, parent)
                                })
                                .map(|&parent| (child, parent))
                        })
                        .collect();
                    ConstraintEntry::new(
                        format!("vertical:{higher}/{lower}"),
                        Constraint::Vertical {
                            pairs,
                            min_distance: *min_distance,
                        },
                    )
                }
                ConstraintDescriptor::Proximity {
                    node_type,
                    near_to,
                    distance,
                } => ConstraintEntry::new(
                    format!("proximity:{node_type}/{near_to}"),
                    Constraint::Proximity {
                        members: self.nodes.of_type(node_type).to_vec(),
                        anchors: self.nodes.of_type(near_to).to_vec(),
                        distance: *distance,
                        weight: PROXIMITY_WEIGHT,
                    },
                ),
                ConstraintDescriptor::Separation { min_distance } => ConstraintEntry::new(
                    "separation",
                    Constraint::Separation {
                        min_distance: *min_distance,
                    },
                ),
                ConstraintDescriptor::Unknown => {
                    warn!("Skipping constraint of unknown type");
                    continue;
                }
            };
            debug!(name = entry.name(), kind = entry.kind(); "Added constraint");
            compiled.push(entry);
        }
        compiled
    }
}

/// All unordered pairs of distinct slots.
fn unordered_pairs(slots: &[usize]) -> Vec<(usize, usize)> {
    slots
        .iter()
        .enumerate()
        .flat_map(|(i, &a)| slots[i + 1..].iter().map(move |&b| (a, b)))
        .collect()
}

/// Min/max normalizes values onto `[0, 1]`; a constant column maps to 0.5.
fn normalize(values: &[(usize, f64)]) -> impl Iterator<Item = (usize, f32)> + '_ {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &(_, v)| {
            (min.min(v), max.max(v))
        });
    let range = max - min;
    values.iter().map(move |&(slot, value)| {
        let unit = if range > f64::EPSILON {
            (value - min) / range
        } else {
            0.5
        };
        (slot, unit as f32)
    })
}

fn check(name: &'static str, value: f32) -> Result<(), CompileError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CompileError::InvalidParameter { name, value })
    }
}

fn check_length(name: &'static str, value: f32) -> Result<(), CompileError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CompileError::InvalidParameter { name, value })
    }
}

fn validate_parameters(layout: &StructuredLayout) -> Result<(), CompileError> {
    match layout.plan() {
        LayoutPlan::HierarchicalForce | LayoutPlan::Temporal(_) | LayoutPlan::Semantic(_) => {}
        LayoutPlan::ForceDirected(plan) => {
            check("charge", plan.charge())?;
            check("gravity", plan.gravity())?;
            for &charge in plan.type_charges().values() {
                check("type charge", charge)?;
            }
        }
        LayoutPlan::Radial(plan) => {
            check("radial weight", plan.radial_weight())?;
            check("tangential weight", plan.tangential_weight())?;
            for ring in plan.rings() {
                check_length("ring radius", ring.radius())?;
            }
        }
    }
    for group in layout.groups() {
        check_length("group radius", group.radius())?;
    }
    for force in layout.forces().values() {
        check("force strength", force.strength())?;
        check_length("force distance", force.distance())?;
    }
    for constraint in layout.constraints() {
        match constraint {
            ConstraintDescriptor::Vertical { min_distance, .. }
            | ConstraintDescriptor::Separation { min_distance } => {
                check_length("constraint distance", *min_distance)?
            }
            ConstraintDescriptor::Proximity { distance, .. } => {
                check_length("constraint distance", *distance)?
            }
            ConstraintDescriptor::Unknown => {}
        }
    }
    Ok(())
}
