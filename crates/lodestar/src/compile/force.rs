//! Compiled force primitives.
//!
//! A [`Force`] is plain data: a kind plus the numeric parameters and arena
//! slots it acts on. [`Force::accumulate`] is the stateless dispatcher that
//! interprets it against the current positions.

use std::f32::consts::TAU;

use lodestar_core::geometry::{Axis, Vec3};

use crate::compile::{
    index::Link,
    octree::{Octree, charge_force},
};

/// Distances below this are clamped when computing inverse-square forces.
pub const MIN_DISTANCE: f32 = 0.1;

/// A child held on a circle around a center node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleSlot {
    pub node: usize,
    pub center: usize,
    /// Angle in radians within the horizontal plane.
    pub angle: f32,
}

/// A member of a radial ring, with its angular slot when distributed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingSlot {
    pub node: usize,
    pub angle: Option<f32>,
}

/// A force kind with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Force {
    /// Many-body repulsion over every node. `charges` is aligned to the
    /// arena; a zero charge exerts nothing. With `theta` set the octree
    /// approximation is used.
    Repulsion { charges: Vec<f32>, theta: Option<f32> },
    /// Repulsion between explicit node pairs, ignored beyond `cutoff`.
    PairRepulsion {
        pairs: Vec<(usize, usize)>,
        charge: f32,
        cutoff: Option<f32>,
    },
    /// Hooke springs along links.
    Spring {
        links: Vec<Link>,
        strength: f32,
        rest_length: f32,
    },
    /// Pulls each slot's node toward its point on a circle around the slot's
    /// center node.
    Circular {
        slots: Vec<CircleSlot>,
        radius: f32,
        weight: f32,
    },
    /// Pulls every node toward the origin.
    Gravity { strength: f32 },
    /// Pulls members onto a horizontal ring around the vertical axis.
    Ring {
        members: Vec<RingSlot>,
        radius: f32,
        radial_weight: f32,
        tangential_weight: f32,
    },
    /// Pulls nodes toward a target coordinate on one axis.
    AxisBias {
        axis: Axis,
        targets: Vec<(usize, f32)>,
        strength: f32,
    },
    /// Springs with a rest length per pair.
    AttributeDistance {
        pairs: Vec<(usize, usize, f32)>,
        strength: f32,
    },
}

impl Force {
    /// Returns the kind tag of this force.
    pub fn kind(&self) -> &'static str {
        match self {
            Force::Repulsion { .. } => "repulsion",
            Force::PairRepulsion { .. } => "pair-repulsion",
            Force::Spring { .. } => "spring",
            Force::Circular { .. } => "circular",
            Force::Gravity { .. } => "gravity",
            Force::Ring { .. } => "ring",
            Force::AxisBias { .. } => "axis-bias",
            Force::AttributeDistance { .. } => "attribute-distance",
        }
    }

    /// Adds this force's per-node contribution to `out`.
    ///
    /// `out` must be aligned to `positions`.
    pub fn accumulate(&self, positions: &[Vec3], out: &mut [Vec3]) {
        match self {
            Force::Repulsion { charges, theta } => match theta {
                Some(theta) => {
                    let tree = Octree::build(positions, charges);
                    for (body, force) in out.iter_mut().enumerate() {
                        *force = force.add_vec(tree.force_on(
                            body,
                            positions,
                            charges,
                            *theta,
                            MIN_DISTANCE,
                        ));
                    }
                }
                None => {
                    for (i, &at) in positions.iter().enumerate() {
                        for (j, &from) in positions.iter().enumerate() {
                            if i != j && charges[j] != 0.0 {
                                out[i] = out[i].add_vec(charge_force(at, from, charges[j], MIN_DISTANCE));
                            }
                        }
                    }
                }
            },
            Force::PairRepulsion {
                pairs,
                charge,
                cutoff,
            } => {
                for &(a, b) in pairs {
                    if cutoff.is_some_and(|cutoff| positions[a].distance(positions[b]) > cutoff) {
                        continue;
                    }
                    let push = charge_force(positions[a], positions[b], *charge, MIN_DISTANCE);
                    out[a] = out[a].add_vec(push);
                    out[b] = out[b].sub_vec(push);
                }
            }
            Force::Spring {
                links,
                strength,
                rest_length,
            } => {
                for link in links {
                    spring(positions, out, link.from, link.to, *strength, *rest_length);
                }
            }
            Force::Circular {
                slots,
                radius,
                weight,
            } => {
                for slot in slots {
                    let target = positions[slot.center].on_horizontal_circle(*radius, slot.angle);
                    let pull = target.sub_vec(positions[slot.node]).scale(*weight);
                    out[slot.node] = out[slot.node].add_vec(pull);
                }
            }
            Force::Gravity { strength } => {
                for (force, position) in out.iter_mut().zip(positions) {
                    *force = force.sub_vec(position.scale(*strength));
                }
            }
            Force::Ring {
                members,
                radius,
                radial_weight,
                tangential_weight,
            } => {
                for member in members {
                    let flat = positions[member.node].horizontal();
                    let radial = match flat.normalized() {
                        Some(direction) => direction.scale((radius - flat.length()) * radial_weight),
                        None => member
                            .angle
                            .map(|angle| Vec3::ZERO.on_horizontal_circle(radius * radial_weight, angle))
                            .unwrap_or(Vec3::ZERO),
                    };
                    let tangential = member
                        .angle
                        .map(|angle| {
                            Vec3::ZERO
                                .on_horizontal_circle(*radius, angle)
                                .sub_vec(flat)
                                .scale(*tangential_weight)
                        })
                        .unwrap_or(Vec3::ZERO);
                    out[member.node] = out[member.node].add_vec(radial).add_vec(tangential);
                }
            }
            Force::AxisBias {
                axis,
                targets,
                strength,
            } => {
                for &(node, target) in targets {
                    let offset = target - positions[node].component(*axis);
                    out[node] = out[node].add_vec(Vec3::along(*axis, offset * strength));
                }
            }
            Force::AttributeDistance { pairs, strength } => {
                for &(a, b, rest_length) in pairs {
                    spring(positions, out, a, b, *strength, rest_length);
                }
            }
        }
    }
}

/// Hooke spring between two slots: positive when stretched, pulling the
/// endpoints together.
fn spring(positions: &[Vec3], out: &mut [Vec3], a: usize, b: usize, strength: f32, rest: f32) {
    let delta = positions[b].sub_vec(positions[a]);
    let Some(direction) = delta.normalized() else {
        return;
    };
    let pull = direction.scale(strength * (delta.length() - rest));
    out[a] = out[a].add_vec(pull);
    out[b] = out[b].sub_vec(pull);
}

/// Evenly spaced angles for `count` slots on a circle.
pub(crate) fn slot_angles(count: usize) -> impl Iterator<Item = f32> {
    let step = if count == 0 { 0.0 } else { TAU / count as f32 };
    (0..count).map(move |i| i as f32 * step)
}

/// A named force of a compiled layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceEntry {
    name: String,
    force: Force,
}

impl ForceEntry {
    pub fn new(name: impl Into<String>, force: Force) -> Self {
        Self {
            name: name.into(),
            force,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &'static str {
        self.force.kind()
    }

    pub fn force(&self) -> &Force {
        &self.force
    }

    /// Returns this entry's force on every node.
    pub fn apply(&self, positions: &[Vec3]) -> Vec<Vec3> {
        let mut out = vec![Vec3::ZERO; positions.len()];
        self.force.accumulate(positions, &mut out);
        out
    }

    /// Adds this entry's force on every node into `out`.
    pub fn accumulate(&self, positions: &[Vec3], out: &mut [Vec3]) {
        self.force.accumulate(positions, out);
    }
}
