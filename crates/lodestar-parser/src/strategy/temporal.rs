use log::debug;

use lodestar_core::layout::{LayoutMetadata, LayoutPlan, StructuredLayout, TemporalPlan};

use crate::{
    error::{Diagnostic, ErrorCode},
    parser::role_types,
    strategy::Expansion,
};

/// Expands a `temporal` request.
///
/// An explicit time property is kept even when the graph lacks it. Otherwise
/// the first entry of the preference list present in the graph wins, with
/// the configured default as the last resort.
pub(crate) fn expand(exp: &mut Expansion<'_>, metadata: LayoutMetadata) -> StructuredLayout {
    let request = exp.request;
    let config = exp.config;
    let available = exp.context.property_names();

    let axis = request.time_axis().unwrap_or(config.default_time_axis());
    let property = match request.time_property() {
        Some(explicit) => {
            if !available.contains(&explicit) {
                exp.diagnostics.emit(
                    Diagnostic::warning(format!(
                        "time property `{explicit}` is not present in the graph"
                    ))
                    .with_code(ErrorCode::W203)
                    .with_help("nodes without the property are not placed on the time axis"),
                );
            }
            explicit.to_string()
        }
        None => config
            .time_properties()
            .iter()
            .find(|candidate| available.contains(&candidate.as_str()))
            .map_or_else(|| config.default_time_property().to_string(), Clone::clone),
    };

    debug!(axis:% = axis, property = property.as_str(); "Temporal axis selected");
    let plan = TemporalPlan::new(axis, property, role_types(request));
    StructuredLayout::new(LayoutPlan::Temporal(plan), metadata)
}

#[cfg(test)]
mod tests {
    use lodestar_core::{
        context::GraphContext,
        geometry::Axis,
        request::{LayoutRequest, RoleSlot},
    };

    use super::*;
    use crate::{config::ParserConfig, error::DiagnosticCollector};

    fn run(request: &LayoutRequest, properties: &[&str]) -> (TemporalPlan, Vec<Diagnostic>) {
        let context = GraphContext::new(["Person"], Vec::<String>::new(), properties.iter().copied());
        let config = ParserConfig::default();
        let mut diagnostics = DiagnosticCollector::new();
        let mut exp = Expansion {
            request,
            context: &context,
            config: &config,
            diagnostics: &mut diagnostics,
        };
        let layout = expand(&mut exp, LayoutMetadata::new("temporal", None));
        let LayoutPlan::Temporal(plan) = layout.plan() else {
            panic!("expected temporal plan");
        };
        (plan.clone(), diagnostics.finish().unwrap())
    }

    #[test]
    fn test_preference_order_wins_over_listing_order() {
        let request = LayoutRequest::new("temporal");
        let (plan, _) = run(&request, &["Person.since", "Person.date"]);
        assert_eq!(plan.property(), "date");
        assert_eq!(plan.axis(), Axis::Z);
        assert!(plan.node_types().is_empty());
    }

    #[test]
    fn test_default_property_when_none_match() {
        let request = LayoutRequest::new("temporal").with_time_axis(Axis::X);
        let (plan, diagnostics) = run(&request, &["Person.name"]);
        assert_eq!(plan.property(), "createdAt");
        assert_eq!(plan.axis(), Axis::X);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_explicit_property_kept_with_warning() {
        let request = LayoutRequest::new("temporal")
            .with_primary(RoleSlot::new("Person"))
            .with_time_property("hiredOn");
        let (plan, diagnostics) = run(&request, &["Person.joinedAt"]);
        assert_eq!(plan.property(), "hiredOn");
        assert_eq!(plan.node_types(), ["Person"]);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::W203));
    }
}
