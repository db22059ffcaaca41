//! Barnes–Hut octree for many-body repulsion.
//!
//! Cells far enough from a body (cell width over distance below `theta`) act
//! as a single aggregated charge at their charge-weighted center. The tree is
//! rebuilt from scratch every frame.

use lodestar_core::geometry::Vec3;

/// Depth at which coincident bodies stop being split.
const MAX_DEPTH: u32 = 24;

#[derive(Debug, Clone)]
struct Cell {
    center: Vec3,
    half: f32,
    charge: f32,
    charge_center: Vec3,
    kind: CellKind,
}

#[derive(Debug, Clone)]
enum CellKind {
    Leaf(Vec<usize>),
    Branch(Vec<usize>),
}

impl Cell {
    fn contains(&self, point: Vec3) -> bool {
        let offset = point.sub_vec(self.center);
        offset.x().abs() <= self.half && offset.y().abs() <= self.half && offset.z().abs() <= self.half
    }
}

/// An octree over a set of charged bodies.
#[derive(Debug, Clone)]
pub struct Octree {
    cells: Vec<Cell>,
}

impl Octree {
    /// Builds a tree over `positions`, each body carrying `charges[i]`.
    pub fn build(positions: &[Vec3], charges: &[f32]) -> Self {
        let mut tree = Self { cells: Vec::new() };
        if positions.is_empty() {
            return tree;
        }

        let (min, max) = positions.iter().fold(
            (positions[0], positions[0]),
            |(min, max), p| {
                (
                    Vec3::new(min.x().min(p.x()), min.y().min(p.y()), min.z().min(p.z())),
                    Vec3::new(max.x().max(p.x()), max.y().max(p.y()), max.z().max(p.z())),
                )
            },
        );
        let center = min.add_vec(max).scale(0.5);
        let extent = max.sub_vec(min);
        let half = (extent.x().max(extent.y()).max(extent.z()) * 0.5).max(f32::EPSILON) * 1.001;

        let bodies: Vec<usize> = (0..positions.len()).collect();
        tree.insert(positions, charges, bodies, center, half, 0);
        tree
    }

    /// Returns the repulsion on `body` from every other body.
    ///
    /// Each contribution is `direction * (-charge / d²)` with `d` clamped to
    /// `min_distance`, matching the pairwise path.
    pub fn force_on(
        &self,
        body: usize,
        positions: &[Vec3],
        charges: &[f32],
        theta: f32,
        min_distance: f32,
    ) -> Vec3 {
        if self.cells.is_empty() {
            return Vec3::ZERO;
        }
        let mut force = Vec3::ZERO;
        let mut stack = vec![0usize];
        let position = positions[body];

        while let Some(index) = stack.pop() {
            let cell = &self.cells[index];
            match &cell.kind {
                CellKind::Leaf(bodies) => {
                    for &other in bodies {
                        if other != body {
                            force = force.add_vec(charge_force(
                                position,
                                positions[other],
                                charges[other],
                                min_distance,
                            ));
                        }
                    }
                }
                CellKind::Branch(children) => {
                    let distance = position.distance(cell.charge_center);
                    let far = !cell.contains(position)
                        && distance > 0.0
                        && (cell.half * 2.0) / distance < theta;
                    if far {
                        force = force.add_vec(charge_force(
                            position,
                            cell.charge_center,
                            cell.charge,
                            min_distance,
                        ));
                    } else {
                        stack.extend(children.iter().copied());
                    }
                }
            }
        }
        force
    }

    fn insert(
        &mut self,
        positions: &[Vec3],
        charges: &[f32],
        bodies: Vec<usize>,
        center: Vec3,
        half: f32,
        depth: u32,
    ) -> usize {
        let charge: f32 = bodies.iter().map(|&b| charges[b]).sum();
        let charge_center = if charge.abs() > f32::EPSILON {
            bodies
                .iter()
                .fold(Vec3::ZERO, |acc, &b| acc.add_vec(positions[b].scale(charges[b])))
                .scale(1.0 / charge)
        } else {
            bodies
                .iter()
                .fold(Vec3::ZERO, |acc, &b| acc.add_vec(positions[b]))
                .scale(1.0 / bodies.len() as f32)
        };

        let index = self.cells.len();
        self.cells.push(Cell {
            center,
            half,
            charge,
            charge_center,
            kind: CellKind::Leaf(Vec::new()),
        });

        if bodies.len() <= 1 || depth >= MAX_DEPTH {
            self.cells[index].kind = CellKind::Leaf(bodies);
            return index;
        }

        let mut octants: [Vec<usize>; 8] = Default::default();
        for body in bodies {
            octants[octant(center, positions[body])].push(body);
        }

        let child_half = half * 0.5;
        let mut children = Vec::new();
        for (octant, members) in octants.into_iter().enumerate() {
            if members.is_empty() {
                continue;
            }
            let child_center = Vec3::new(
                center.x() + if octant & 1 != 0 { child_half } else { -child_half },
                center.y() + if octant & 2 != 0 { child_half } else { -child_half },
                center.z() + if octant & 4 != 0 { child_half } else { -child_half },
            );
            children.push(self.insert(positions, charges, members, child_center, child_half, depth + 1));
        }
        self.cells[index].kind = CellKind::Branch(children);
        index
    }
}

fn octant(center: Vec3, point: Vec3) -> usize {
    usize::from(point.x() >= center.x())
        | usize::from(point.y() >= center.y()) << 1
        | usize::from(point.z() >= center.z()) << 2
}

/// Repulsion on a body at `at` from a charge `charge` located at `from`.
pub(crate) fn charge_force(at: Vec3, from: Vec3, charge: f32, min_distance: f32) -> Vec3 {
    let delta = at.sub_vec(from);
    let Some(direction) = delta.normalized() else {
        return Vec3::ZERO;
    };
    let distance = delta.length().max(min_distance);
    direction.scale(-charge / (distance * distance))
}
