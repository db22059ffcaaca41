//! Request validation and strategy dispatch.

use std::{fmt, str::FromStr};

use log::{debug, error, info};

use lodestar_core::{
    context::GraphContext,
    layout::{
        ConstraintDescriptor, ForceDirectedPlan, LayoutMetadata, LayoutPlan, PairKey,
        StructuredLayout, UnknownTagError,
    },
    request::{LayoutRequest, RoleSlot},
};

use crate::{
    config::ParserConfig,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    strategy::{self, Expansion},
    text::parse_force_value_with,
};

/// Strategy tag recorded in the metadata of the fallback layout.
const DEFAULT_STRATEGY: &str = "default";
/// Reason recorded when a request failed validation.
const PARSING_FAILED: &str = "parsing-failed";

/// The layout strategies a request can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    HierarchicalGrouping,
    ForceDirected,
    Radial,
    Temporal,
    Semantic,
}

impl Strategy {
    /// Returns the request tag of this strategy.
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::HierarchicalGrouping => "hierarchical-grouping",
            Strategy::ForceDirected => "force-directed",
            Strategy::Radial => "radial",
            Strategy::Temporal => "temporal",
            Strategy::Semantic => "semantic",
        }
    }
}

impl FromStr for Strategy {
    type Err = UnknownTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hierarchical-grouping" => Ok(Self::HierarchicalGrouping),
            "force-directed" => Ok(Self::ForceDirected),
            "radial" => Ok(Self::Radial),
            "temporal" => Ok(Self::Temporal),
            "semantic" => Ok(Self::Semantic),
            _ => Err(UnknownTagError::new("strategy", s)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parsed layout together with the diagnostics produced on the way.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    layout: StructuredLayout,
    diagnostics: Vec<Diagnostic>,
    fallback: bool,
}

impl ParseOutcome {
    pub fn layout(&self) -> &StructuredLayout {
        &self.layout
    }

    pub fn into_layout(self) -> StructuredLayout {
        self.layout
    }

    /// Warnings for an accepted request; everything collected for a
    /// rejected one.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns `true` if the request was rejected and the default layout
    /// substituted.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

/// Turns layout requests into structured layouts.
#[derive(Debug, Clone, Default)]
pub struct LayoutParser {
    config: ParserConfig,
}

impl LayoutParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses a request against the graph context.
    ///
    /// Never fails. A request referencing node types missing from `context`
    /// yields the default force-directed layout, whose metadata carries
    /// strategy `"default"` and reason `"parsing-failed"`.
    pub fn parse(&self, request: &LayoutRequest, context: &GraphContext) -> StructuredLayout {
        self.parse_with_diagnostics(request, context).into_layout()
    }

    /// Like [`LayoutParser::parse`], also returning the diagnostics.
    pub fn parse_with_diagnostics(
        &self,
        request: &LayoutRequest,
        context: &GraphContext,
    ) -> ParseOutcome {
        info!(strategy = request.strategy(); "Parsing layout request");

        match self.try_parse(request, context) {
            Ok((layout, diagnostics)) => {
                debug!(
                    kind = layout.kind().as_str(),
                    hierarchy = layout.hierarchy().len(),
                    groups = layout.groups().len(),
                    forces = layout.forces().len(),
                    constraints = layout.constraints().len(),
                    warnings = diagnostics.len();
                    "Layout request parsed"
                );
                ParseOutcome {
                    layout,
                    diagnostics,
                    fallback: false,
                }
            }
            Err(err) => {
                error!(err:% = err; "Layout request rejected, using default layout");
                ParseOutcome {
                    layout: self.default_layout(Some(request), PARSING_FAILED),
                    diagnostics: err.into_diagnostics(),
                    fallback: true,
                }
            }
        }
    }

    /// Builds the default force-directed layout with the given reason.
    pub fn default_layout(&self, request: Option<&LayoutRequest>, reason: &str) -> StructuredLayout {
        let plan = ForceDirectedPlan::new(
            self.config.default_charge(),
            self.config.default_gravity(),
            self.config.default_damping(),
        );
        let metadata = LayoutMetadata::new(DEFAULT_STRATEGY, request.cloned()).with_reason(reason);
        StructuredLayout::new(LayoutPlan::ForceDirected(plan), metadata)
    }

    fn try_parse(
        &self,
        request: &LayoutRequest,
        context: &GraphContext,
    ) -> Result<(StructuredLayout, Vec<Diagnostic>), ParseError> {
        let mut diagnostics = DiagnosticCollector::new();
        validate_roles(request, context, &mut diagnostics);

        let strategy = request.strategy().parse::<Strategy>().unwrap_or_else(|err| {
            diagnostics.emit(
                Diagnostic::warning(format!("unknown strategy `{}`", err.tag()))
                    .with_code(ErrorCode::W201)
                    .with_help("treating the request as `force-directed`"),
            );
            Strategy::ForceDirected
        });
        let metadata = LayoutMetadata::new(strategy.as_str(), Some(request.clone()));

        let mut expansion = Expansion {
            request,
            context,
            config: &self.config,
            diagnostics: &mut diagnostics,
        };
        let mut layout = match strategy {
            Strategy::HierarchicalGrouping => strategy::hierarchical::expand(&mut expansion, metadata),
            Strategy::ForceDirected => strategy::force_directed::expand(&mut expansion, metadata),
            Strategy::Radial => strategy::radial::expand(&mut expansion, metadata),
            Strategy::Temporal => strategy::temporal::expand(&mut expansion, metadata),
            Strategy::Semantic => strategy::semantic::expand(&mut expansion, metadata),
        };

        self.add_modifications(&mut layout, request, context, &mut diagnostics);
        self.add_constraints(&mut layout, request);

        let warnings = diagnostics.finish()?;
        Ok((layout, warnings))
    }

    /// Quantifies the request's pair modifications into layout forces.
    fn add_modifications(
        &self,
        layout: &mut StructuredLayout,
        request: &LayoutRequest,
        context: &GraphContext,
        diagnostics: &mut DiagnosticCollector,
    ) {
        for (key, description) in request.modifications() {
            let pair: PairKey = match key.parse() {
                Ok(pair) => pair,
                Err(err) => {
                    diagnostics.emit(
                        Diagnostic::warning(err.to_string())
                            .with_code(ErrorCode::W202)
                            .with_help("the modification is skipped"),
                    );
                    continue;
                }
            };

            if let Some(unknown) = [pair.source(), pair.target()]
                .into_iter()
                .find(|node_type| !context.has_node_type(node_type))
            {
                diagnostics.emit(
                    Diagnostic::warning(format!(
                        "modification `{key}` names node type `{unknown}` that is not present in the graph"
                    ))
                    .with_code(ErrorCode::W205)
                    .with_help("the modification is skipped"),
                );
                continue;
            }

            if let Some(via) = pair.via().filter(|via| !context.has_relationship_type(via)) {
                diagnostics.emit(unknown_relationship(via));
            }

            let force = parse_force_value_with(description, &self.config);
            debug!(pair:% = pair, kind:% = force.kind(), strength = force.strength(); "Quantified modification");
            layout.add_force(pair, force);
        }
    }

    fn add_constraints(&self, layout: &mut StructuredLayout, request: &LayoutRequest) {
        if let (Some(primary), Some(secondary)) = (request.primary(), request.secondary()) {
            layout.add_constraint(ConstraintDescriptor::Vertical {
                higher: primary.node_type().to_string(),
                lower: secondary.node_type().to_string(),
                min_distance: self.config.vertical_min_distance(),
            });
        }

        let near = request
            .tertiary()
            .and_then(|tertiary| tertiary.near_to().map(|near_to| (tertiary, near_to)));
        if let Some((tertiary, near_to)) = near {
            layout.add_constraint(ConstraintDescriptor::Proximity {
                node_type: tertiary.node_type().to_string(),
                near_to: near_to.to_string(),
                distance: self.config.proximity_distance(),
            });
        }

        let well_separated = request
            .visual()
            .and_then(|visual| visual.spacing())
            .is_some_and(|spacing| spacing.to_lowercase().contains("well separated"));
        if well_separated {
            layout.add_constraint(ConstraintDescriptor::Separation {
                min_distance: self.config.separation_min_distance(),
            });
        }
    }
}

/// Builds the soft warning for a relationship missing from the graph.
pub(crate) fn unknown_relationship(relationship: &str) -> Diagnostic {
    Diagnostic::warning(format!(
        "relationship `{relationship}` is not present in the graph"
    ))
    .with_code(ErrorCode::W200)
    .with_help("the relationship is kept and may match no edges")
}

/// Checks every populated role slot against the graph context.
fn validate_roles(
    request: &LayoutRequest,
    context: &GraphContext,
    diagnostics: &mut DiagnosticCollector,
) {
    let slots = [
        ("primary", request.primary()),
        ("secondary", request.secondary()),
        ("tertiary", request.tertiary()),
    ];
    for (name, slot) in slots {
        let Some(slot) = slot else { continue };
        validate_node_type(name, slot.node_type(), context, diagnostics);
        if let Some(near_to) = slot.near_to() {
            validate_node_type("nearTo", near_to, context, diagnostics);
        }
    }
}

fn validate_node_type(
    field: &str,
    node_type: &str,
    context: &GraphContext,
    diagnostics: &mut DiagnosticCollector,
) {
    if node_type.trim().is_empty() {
        diagnostics.emit(
            Diagnostic::error(format!("`{field}` role has no node type")).with_code(ErrorCode::E101),
        );
    } else if !context.has_node_type(node_type) {
        let known: Vec<&str> = context.node_types().iter().map(String::as_str).collect();
        diagnostics.emit(
            Diagnostic::error(format!(
                "node type `{node_type}` in `{field}` is not present in the graph"
            ))
            .with_code(ErrorCode::E100)
            .with_help(format!("known node types: {}", known.join(", "))),
        );
    }
}

/// Node types of the populated role slots, in slot order.
pub(crate) fn role_types(request: &LayoutRequest) -> Vec<String> {
    request
        .roles()
        .map(RoleSlot::node_type)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use lodestar_core::{
        layout::{ForceKind, HierarchyRole, LayoutKind},
        request::VisualHints,
    };

    use super::*;

    fn context() -> GraphContext {
        GraphContext::new(
            ["Company", "Person", "Project"],
            ["WorksAt", "WorksOn", "Knows"],
            ["Person.joinedAt", "Company.founded", "Person.age"],
        )
    }

    fn grouping_request() -> LayoutRequest {
        LayoutRequest::new("hierarchical-grouping")
            .with_primary(RoleSlot::new("Company"))
            .with_secondary(RoleSlot::new("Person").with_group_by("WorksAt relationship"))
    }

    #[test]
    fn test_strategy_tags_map_to_layout_kinds() {
        let parser = LayoutParser::default();
        let cases = [
            ("hierarchical-grouping", LayoutKind::HierarchicalForce),
            ("force-directed", LayoutKind::ForceDirected),
            ("radial", LayoutKind::Radial),
            ("temporal", LayoutKind::Temporal),
            ("semantic", LayoutKind::Semantic),
            ("spiral-galaxy", LayoutKind::ForceDirected),
        ];

        for (tag, expected) in cases {
            let request = LayoutRequest::new(tag).with_primary(RoleSlot::new("Company"));
            let layout = parser.parse(&request, &context());
            assert_eq!(layout.kind(), expected, "strategy `{tag}`");
        }
    }

    #[test]
    fn test_unknown_strategy_warns() {
        let parser = LayoutParser::default();
        let outcome = parser.parse_with_diagnostics(&LayoutRequest::new("spiral"), &context());

        assert!(!outcome.is_fallback());
        assert_eq!(outcome.diagnostics()[0].code(), Some(ErrorCode::W201));
        assert_eq!(outcome.layout().metadata().strategy(), "force-directed");
    }

    #[test]
    fn test_unknown_node_type_falls_back() {
        let parser = LayoutParser::default();
        let request = LayoutRequest::new("hierarchical-grouping")
            .with_primary(RoleSlot::new("Employee"));

        let outcome = parser.parse_with_diagnostics(&request, &context());

        assert!(outcome.is_fallback());
        let layout = outcome.layout();
        assert_eq!(layout.kind(), LayoutKind::ForceDirected);
        assert_eq!(layout.metadata().strategy(), "default");
        assert_eq!(layout.metadata().reason(), Some("parsing-failed"));
        assert!(layout.hierarchy().is_empty());
        assert!(
            outcome
                .diagnostics()
                .iter()
                .any(|d| d.code() == Some(ErrorCode::E100))
        );
    }

    #[test]
    fn test_empty_node_type_falls_back() {
        let parser = LayoutParser::default();
        let request = LayoutRequest::new("radial").with_primary(RoleSlot::new(" "));

        let outcome = parser.parse_with_diagnostics(&request, &context());
        assert!(outcome.is_fallback());
        assert_eq!(outcome.diagnostics()[0].code(), Some(ErrorCode::E101));
    }

    #[test]
    fn test_unknown_near_to_falls_back() {
        let parser = LayoutParser::default();
        let request = grouping_request().with_tertiary(RoleSlot::new("Project").with_near_to("Team"));

        let layout = parser.parse(&request, &context());
        assert_eq!(layout.metadata().reason(), Some("parsing-failed"));
    }

    #[test]
    fn test_grouping_example() {
        let layout = LayoutParser::default().parse(&grouping_request(), &context());

        assert_eq!(layout.kind(), LayoutKind::HierarchicalForce);
        let hierarchy: Vec<_> = layout
            .hierarchy()
            .iter()
            .map(|e| (e.node_type(), e.level(), e.role()))
            .collect();
        assert_eq!(
            hierarchy,
            vec![
                ("Company", 0, HierarchyRole::Parent),
                ("Person", 1, HierarchyRole::Child),
            ]
        );

        let group = &layout.groups()[0];
        assert_eq!(group.parent(), "Company");
        assert_eq!(group.children(), "Person");
        assert_eq!(group.relationship(), "WorksAt");
        assert_eq!(group.radius(), 3.0);
        assert_eq!(layout.metadata().strategy(), "hierarchical-grouping");
        assert!(layout.metadata().request().is_some());
    }

    #[test]
    fn test_vertical_constraint_when_primary_and_secondary() {
        let layout = LayoutParser::default().parse(&grouping_request(), &context());
        assert_eq!(
            layout.constraints(),
            [ConstraintDescriptor::Vertical {
                higher: "Company".into(),
                lower: "Person".into(),
                min_distance: 2.0,
            }]
        );

        let single = LayoutRequest::new("force-directed").with_primary(RoleSlot::new("Company"));
        assert!(LayoutParser::default().parse(&single, &context()).constraints().is_empty());
    }

    #[test]
    fn test_proximity_and_separation_constraints() {
        let request = LayoutRequest::new("force-directed")
            .with_tertiary(RoleSlot::new("Project").with_near_to("Person"))
            .with_visual(VisualHints::with_spacing("Well Separated please"));

        let layout = LayoutParser::default().parse(&request, &context());
        let kinds: Vec<_> = layout.constraints().iter().map(|c| c.kind_name()).collect();
        assert_eq!(kinds, vec!["proximity", "separation"]);
    }

    #[test]
    fn test_modifications_quantified() {
        let request = grouping_request()
            .with_modification("Person-Company", "strong attraction")
            .with_modification("Company->Company", "weak repulsion")
            .with_modification("Person-Project via WorksOn", "spring")
            .with_modification("nonsense", "strong attraction")
            .with_modification("Person-Team", "weak attraction");

        let outcome = LayoutParser::default().parse_with_diagnostics(&request, &context());
        let layout = outcome.layout();

        assert_eq!(layout.forces().len(), 3);
        let attraction = layout.force_between("Company", "Person", None).unwrap();
        assert_eq!(attraction.kind(), ForceKind::Attraction);
        let repulsion = layout.force_between("Company", "Company", None).unwrap();
        assert_eq!(repulsion.strength(), -100.0);
        assert!(layout.force_for_relationship("WorksOn").is_some());

        let codes: Vec<_> = outcome.diagnostics().iter().filter_map(|d| d.code()).collect();
        assert_eq!(codes, vec![ErrorCode::W202, ErrorCode::W205]);
    }

    #[test]
    fn test_unknown_relationship_is_soft() {
        let request = LayoutRequest::new("hierarchical-grouping")
            .with_primary(RoleSlot::new("Company"))
            .with_secondary(RoleSlot::new("Person").with_group_by("via MentoredBy"));

        let outcome = LayoutParser::default().parse_with_diagnostics(&request, &context());
        assert!(!outcome.is_fallback());
        assert_eq!(outcome.layout().groups()[0].relationship(), "MentoredBy");
        assert_eq!(outcome.diagnostics()[0].code(), Some(ErrorCode::W200));
    }

    #[test]
    fn test_default_layout_shape() {
        let layout = LayoutParser::default().default_layout(None, "compile-failed");
        let LayoutPlan::ForceDirected(plan) = layout.plan() else {
            panic!("expected force-directed plan");
        };
        assert_eq!(plan.charge(), -100.0);
        assert_eq!(plan.gravity(), 0.1);
        assert_eq!(plan.damping(), 0.9);
        assert_eq!(layout.metadata().strategy(), "default");
        assert_eq!(layout.metadata().reason(), Some("compile-failed"));
    }
}
