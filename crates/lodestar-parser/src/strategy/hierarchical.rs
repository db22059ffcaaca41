use lodestar_core::layout::{
    Arrangement, GroupDescriptor, HierarchyEntry, HierarchyRole, LayoutMetadata, LayoutPlan,
    StructuredLayout,
};

use crate::{
    error::{Diagnostic, ErrorCode},
    parser::unknown_relationship,
    strategy::Expansion,
    text::extract_relationship,
};

/// Expands a `hierarchical-grouping` request.
///
/// Slots map to levels 0, 1 and 2. The primary slot is the parent, the
/// secondary the child, and the tertiary takes its requested role (default
/// `related`). A secondary `groupBy` produces one circular group around the
/// primary type.
pub(crate) fn expand(exp: &mut Expansion<'_>, metadata: LayoutMetadata) -> StructuredLayout {
    let request = exp.request;
    let mut layout = StructuredLayout::new(LayoutPlan::HierarchicalForce, metadata);

    if let Some(primary) = request.primary() {
        layout.add_hierarchy_entry(HierarchyEntry::new(
            primary.node_type(),
            0,
            HierarchyRole::Parent,
        ));
    }
    if let Some(secondary) = request.secondary() {
        layout.add_hierarchy_entry(HierarchyEntry::new(
            secondary.node_type(),
            1,
            HierarchyRole::Child,
        ));
    }
    if let Some(tertiary) = request.tertiary() {
        let role = match tertiary.role().map(str::parse::<HierarchyRole>) {
            None => HierarchyRole::Related,
            Some(Ok(role)) => role,
            Some(Err(err)) => {
                exp.diagnostics.emit(
                    Diagnostic::warning(err.to_string())
                        .with_code(ErrorCode::W204)
                        .with_help("expected `parent`, `child` or `related`; using `related`"),
                );
                HierarchyRole::Related
            }
        };
        layout.add_hierarchy_entry(HierarchyEntry::new(tertiary.node_type(), 2, role));
    }

    let Some((secondary, group_by)) = request
        .secondary()
        .and_then(|secondary| secondary.group_by().map(|group_by| (secondary, group_by)))
    else {
        return layout;
    };
    let Some(primary) = request.primary() else {
        exp.diagnostics.emit(
            Diagnostic::error("grouping requires a `primary` role to group around")
                .with_code(ErrorCode::E101)
                .with_help("add a primary role naming the parent node type"),
        );
        return layout;
    };

    let relationship = extract_relationship(group_by);
    if !exp.context.has_relationship_type(&relationship) {
        exp.diagnostics.emit(unknown_relationship(&relationship));
    }
    layout.add_group(GroupDescriptor::new(
        primary.node_type(),
        secondary.node_type(),
        relationship,
        Arrangement::Circular,
        exp.config.group_radius(),
    ));
    layout
}

#[cfg(test)]
mod tests {
    use lodestar_core::{
        context::GraphContext,
        request::{LayoutRequest, RoleSlot},
    };

    use super::*;
    use crate::{config::ParserConfig, error::DiagnosticCollector};

    fn run(request: &LayoutRequest) -> (StructuredLayout, DiagnosticCollector) {
        let context = GraphContext::new(
            ["Company", "Person", "Project"],
            ["WorksAt", "WorksOn"],
            Vec::<String>::new(),
        );
        let config = ParserConfig::default();
        let mut diagnostics = DiagnosticCollector::new();
        let mut exp = Expansion {
            request,
            context: &context,
            config: &config,
            diagnostics: &mut diagnostics,
        };
        let layout = expand(&mut exp, LayoutMetadata::new("hierarchical-grouping", None));
        (layout, diagnostics)
    }

    #[test]
    fn test_tertiary_role() {
        let request = LayoutRequest::new("hierarchical-grouping")
            .with_primary(RoleSlot::new("Company"))
            .with_tertiary(RoleSlot::new("Project").with_role("child"));

        let (layout, diagnostics) = run(&request);
        assert_eq!(layout.hierarchy()[1].level(), 2);
        assert_eq!(layout.hierarchy()[1].role(), HierarchyRole::Child);
        assert!(layout.groups().is_empty());
        assert!(diagnostics.finish().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_tertiary_role_defaults_to_related() {
        let request = LayoutRequest::new("hierarchical-grouping")
            .with_tertiary(RoleSlot::new("Project").with_role("cousin"));

        let (layout, diagnostics) = run(&request);
        assert_eq!(layout.hierarchy()[0].role(), HierarchyRole::Related);
        let warnings = diagnostics.finish().unwrap();
        assert_eq!(warnings[0].code(), Some(ErrorCode::W204));
    }

    #[test]
    fn test_group_without_primary_is_error() {
        let request = LayoutRequest::new("hierarchical-grouping")
            .with_secondary(RoleSlot::new("Person").with_group_by("WorksAt relationship"));

        let (layout, diagnostics) = run(&request);
        assert!(layout.groups().is_empty());
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn test_group_radius_from_config() {
        let request = LayoutRequest::new("hierarchical-grouping")
            .with_primary(RoleSlot::new("Company"))
            .with_secondary(RoleSlot::new("Person").with_group_by("through WorksOn"));

        let (layout, _) = run(&request);
        assert_eq!(layout.groups()[0].relationship(), "WorksOn");
        assert_eq!(layout.groups()[0].arrangement(), Arrangement::Circular);
        assert_eq!(layout.groups()[0].radius(), 3.0);
    }
}
