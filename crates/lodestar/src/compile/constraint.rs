//! Compiled constraints.
//!
//! Constraints produce correction vectors that the update step adds to the
//! force accumulators, so they bend the simulation rather than snapping
//! positions.

use lodestar_core::geometry::Vec3;

/// A constraint kind with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Each `(child, parent)` pair keeps the parent at least `min_distance`
    /// above the child.
    Vertical {
        pairs: Vec<(usize, usize)>,
        min_distance: f32,
    },
    /// Members drift toward their nearest anchor when farther than
    /// `distance`.
    Proximity {
        members: Vec<usize>,
        anchors: Vec<usize>,
        distance: f32,
        weight: f32,
    },
    /// Every pair of nodes keeps at least `min_distance` apart.
    Separation { min_distance: f32 },
}

impl Constraint {
    pub fn kind(&self) -> &'static str {
        match self {
            Constraint::Vertical { .. } => "vertical",
            Constraint::Proximity { .. } => "proximity",
            Constraint::Separation { .. } => "separation",
        }
    }

    /// Adds this constraint's corrections to `out`.
    pub fn accumulate(&self, positions: &[Vec3], out: &mut [Vec3]) {
        match self {
            Constraint::Vertical {
                pairs,
                min_distance,
            } => {
                for &(child, parent) in pairs {
                    let gap = positions[parent].y() - positions[child].y();
                    if gap < *min_distance {
                        let push = Vec3::new(0.0, gap - min_distance, 0.0);
                        out[child] = out[child].add_vec(push);
                    }
                }
            }
            Constraint::Proximity {
                members,
                anchors,
                distance,
                weight,
            } => {
                for &member in members {
                    let position = positions[member];
                    let nearest = anchors
                        .iter()
                        .filter(|&&anchor| anchor != member)
                        .map(|&anchor| (anchor, position.distance(positions[anchor])))
                        .min_by(|a, b| a.1.total_cmp(&b.1));
                    let Some((anchor, gap)) = nearest else {
                        continue;
                    };
                    if gap <= *distance {
                        continue;
                    }
                    if let Some(direction) = positions[anchor].sub_vec(position).normalized() {
                        out[member] = out[member].add_vec(direction.scale((gap - distance) * weight));
                    }
                }
            }
            Constraint::Separation { min_distance } => {
                for i in 0..positions.len() {
                    for j in (i + 1)..positions.len() {
                        let delta = positions[i].sub_vec(positions[j]);
                        let gap = delta.length();
                        if gap >= *min_distance {
                            continue;
                        }
                        let Some(direction) = delta.normalized() else {
                            continue;
                        };
                        let push = direction.scale((min_distance - gap) * 0.5);
                        out[i] = out[i].add_vec(push);
                        out[j] = out[j].sub_vec(push);
                    }
                }
            }
        }
    }
}

/// A named constraint of a compiled layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintEntry {
    name: String,
    constraint: Constraint,
}

impl ConstraintEntry {
    pub fn new(name: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            name: name.into(),
            constraint,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &'static str {
        self.constraint.kind()
    }

    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    /// Returns this entry's correction for every node.
    pub fn apply(&self, positions: &[Vec3]) -> Vec<Vec3> {
        let mut out = vec![Vec3::ZERO; positions.len()];
        self.constraint.accumulate(positions, &mut out);
        out
    }

    pub fn accumulate(&self, positions: &[Vec3], out: &mut [Vec3]) {
        self.constraint.accumulate(positions, out);
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_vertical_pushes_child_down() {
        let entry = ConstraintEntry::new(
            "vertical:Company/Person",
            Constraint::Vertical {
                pairs: vec![(1, 0)],
                min_distance: 2.0,
            },
        );

        let violated = [Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.5, 0.0)];
        let corrections = entry.apply(&violated);
        assert_approx_eq!(f32, corrections[1].y(), -1.5);
        assert!(corrections[0].is_zero());

        let satisfied = [Vec3::new(0.0, 3.0, 0.0), Vec3::new(0.0, 1.0, 0.0)];
        assert!(entry.apply(&satisfied).iter().all(|c| c.is_zero()));
    }

    #[test]
    fn test_proximity_pulls_toward_nearest_anchor() {
        let constraint = Constraint::Proximity {
            members: vec![0],
            anchors: vec![1, 2],
            distance: 2.0,
            weight: 0.5,
        };
        let positions = [
            Vec3::ZERO,
            Vec3::new(6.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -20.0),
        ];
        let mut out = vec![Vec3::ZERO; 3];
        constraint.accumulate(&positions, &mut out);

        assert_approx_eq!(f32, out[0].x(), 2.0);
        assert_approx_eq!(f32, out[0].z(), 0.0);

        let close = [Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(9.0, 0.0, 0.0)];
        let mut out = vec![Vec3::ZERO; 3];
        constraint.accumulate(&close, &mut out);
        assert!(out[0].is_zero());
    }

    #[test]
    fn test_separation_splits_deficit() {
        let entry = ConstraintEntry::new("separation", Constraint::Separation { min_distance: 4.0 });
        let positions = [Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(50.0, 0.0, 0.0)];

        let corrections = entry.apply(&positions);
        assert_approx_eq!(f32, corrections[0].x(), -1.0);
        assert_approx_eq!(f32, corrections[1].x(), 1.0);
        assert!(corrections[2].is_zero());
        assert_eq!(entry.kind(), "separation");
    }
}
