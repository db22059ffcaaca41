//! Initial placement.
//!
//! Nodes that share a position exert no direction on each other, so
//! repulsion cannot separate them. [`scatter_positions`] jitters every node
//! that coincides with an earlier one.

use std::collections::HashSet;

use log::{debug, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};

use lodestar_core::{geometry::Vec3, graph::GraphNode};

/// Jitter attempts per node before leaving it where it is.
const MAX_ATTEMPTS: u32 = 16;

/// Jitters nodes whose position repeats an earlier node's, by up to `radius`
/// along each axis. The same `seed` always yields the same placement.
///
/// Returns the number of nodes moved. A radius that is not a positive finite
/// number leaves every node in place.
pub fn scatter_positions(nodes: &mut [GraphNode], seed: u64, radius: f32) -> usize {
    if !radius.is_finite() || radius <= 0.0 {
        warn!(radius = radius; "Scatter radius must be positive, leaving nodes in place");
        return 0;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen = HashSet::with_capacity(nodes.len());
    let mut moved = 0;

    for node in nodes.iter_mut() {
        let mut position = node.position();
        let mut attempts = 0;
        while attempts < MAX_ATTEMPTS && !seen.insert(bits(position)) {
            attempts += 1;
            let jitter = Vec3::new(
                rng.random_range(-radius..=radius),
                rng.random_range(-radius..=radius),
                rng.random_range(-radius..=radius),
            );
            position = position.add_vec(jitter);
        }
        if position != node.position() {
            node.set_position(position);
            moved += 1;
        }
    }

    debug!(moved = moved, seed = seed; "Scattered coincident nodes");
    moved
}

fn bits(position: Vec3) -> (u32, u32, u32) {
    (
        position.x().to_bits(),
        position.y().to_bits(),
        position.z().to_bits(),
    )
}
