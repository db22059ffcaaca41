use log::debug;

use lodestar_core::layout::{ForceDirectedPlan, LayoutMetadata, LayoutPlan, StructuredLayout};

use crate::strategy::Expansion;

/// Expands a `force-directed` request, also used for unknown strategies.
///
/// Roles with a spatial priority get a per-type charge override.
pub(crate) fn expand(exp: &mut Expansion<'_>, metadata: LayoutMetadata) -> StructuredLayout {
    let config = exp.config;
    let mut plan = ForceDirectedPlan::new(
        config.default_charge(),
        config.default_gravity(),
        config.default_damping(),
    );

    for slot in exp.request.roles() {
        if let Some(priority) = slot.spatial_priority() {
            let charge = config.priority_charge(priority);
            debug!(node_type = slot.node_type(), charge = charge; "Charge override from spatial priority");
            plan = plan.with_type_charge(slot.node_type(), charge);
        }
    }

    StructuredLayout::new(LayoutPlan::ForceDirected(plan), metadata)
}
