use lodestar_core::layout::{
    LayoutMetadata, LayoutPlan, PlacementAlgorithm, SemanticPlan, StructuredLayout,
};

use crate::{
    error::{Diagnostic, ErrorCode},
    strategy::Expansion,
};

/// Expands a `semantic` request.
///
/// Uses the explicitly requested attributes, or every property in the graph
/// when none are named.
pub(crate) fn expand(exp: &mut Expansion<'_>, metadata: LayoutMetadata) -> StructuredLayout {
    let available = exp.context.property_names();
    let requested = exp.request.attributes();

    let attributes: Vec<String> = if requested.is_empty() {
        available.iter().map(|name| name.to_string()).collect()
    } else {
        for attribute in requested {
            if !available.contains(&attribute.as_str()) {
                exp.diagnostics.emit(
                    Diagnostic::warning(format!(
                        "attribute `{attribute}` is not present in the graph"
                    ))
                    .with_code(ErrorCode::W206),
                );
            }
        }
        requested.to_vec()
    };

    let plan = SemanticPlan::new(
        attributes,
        exp.config.semantic_dimensions(),
        PlacementAlgorithm::DimensionalityReduction,
    );
    StructuredLayout::new(LayoutPlan::Semantic(plan), metadata)
}

#[cfg(test)]
mod tests {
    use lodestar_core::{context::GraphContext, request::LayoutRequest};

    use super::*;
    use crate::{config::ParserConfig, error::DiagnosticCollector};

    fn run(request: &LayoutRequest) -> (SemanticPlan, Vec<Diagnostic>) {
        let context = GraphContext::new(
            ["Person"],
            Vec::<String>::new(),
            ["Person.age", "Person.score", "Company.age"],
        );
        let config = ParserConfig::default();
        let mut diagnostics = DiagnosticCollector::new();
        let mut exp = Expansion {
            request,
            context: &context,
            config: &config,
            diagnostics: &mut diagnostics,
        };
        let layout = expand(&mut exp, LayoutMetadata::new("semantic", None));
        let LayoutPlan::Semantic(plan) = layout.plan() else {
            panic!("expected semantic plan");
        };
        (plan.clone(), diagnostics.finish().unwrap())
    }

    #[test]
    fn test_all_properties_by_default() {
        let (plan, _) = run(&LayoutRequest::new("semantic"));
        assert_eq!(plan.attributes(), ["age", "score"]);
        assert_eq!(plan.dimensions(), 3);
        assert_eq!(plan.algorithm(), PlacementAlgorithm::DimensionalityReduction);
    }

    #[test]
    fn test_explicit_attributes() {
        let request = LayoutRequest::new("semantic").with_attributes(["score", "height"]);
        let (plan, diagnostics) = run(&request);
        assert_eq!(plan.attributes(), ["score", "height"]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::W206));
    }
}
