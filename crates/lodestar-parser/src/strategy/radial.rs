use lodestar_core::layout::{LayoutMetadata, LayoutPlan, RadialPlan, Ring, StructuredLayout};

use crate::strategy::Expansion;

/// Expands a `radial` request into concentric rings.
///
/// Slots map to the configured ring radii in order. Only the secondary ring
/// spreads its members angularly.
pub(crate) fn expand(exp: &mut Expansion<'_>, metadata: LayoutMetadata) -> StructuredLayout {
    let request = exp.request;
    let config = exp.config;
    let [inner, middle, outer] = config.ring_radii();

    let rings = [
        request.primary().map(|slot| Ring::new(slot.node_type(), inner, false)),
        request.secondary().map(|slot| Ring::new(slot.node_type(), middle, true)),
        request.tertiary().map(|slot| Ring::new(slot.node_type(), outer, false)),
    ]
    .into_iter()
    .flatten()
    .collect();

    let plan = RadialPlan::new(rings, config.radial_weight(), config.tangential_weight());
    StructuredLayout::new(LayoutPlan::Radial(plan), metadata)
}

#[cfg(test)]
mod tests {
    use lodestar_core::{
        context::GraphContext,
        request::{LayoutRequest, RoleSlot},
    };

    use super::*;
    use crate::{config::ParserConfig, error::DiagnosticCollector};

    #[test]
    fn test_rings() {
        let request = LayoutRequest::new("radial")
            .with_primary(RoleSlot::new("Company"))
            .with_secondary(RoleSlot::new("Person"))
            .with_tertiary(RoleSlot::new("Project"));
        let context = GraphContext::default();
        let config = ParserConfig::default();
        let mut diagnostics = DiagnosticCollector::new();
        let mut exp = Expansion {
            request: &request,
            context: &context,
            config: &config,
            diagnostics: &mut diagnostics,
        };

        let layout = expand(&mut exp, LayoutMetadata::new("radial", None));
        let LayoutPlan::Radial(plan) = layout.plan() else {
            panic!("expected radial plan");
        };
        let rings: Vec<_> = plan
            .rings()
            .iter()
            .map(|r| (r.node_type(), r.radius(), r.angular()))
            .collect();
        assert_eq!(
            rings,
            vec![
                ("Company", 0.0, false),
                ("Person", 3.0, true),
                ("Project", 6.0, false)
            ]
        );
        assert_eq!(plan.radial_weight(), 0.8);
        assert_eq!(plan.tangential_weight(), 0.3);
    }
}
