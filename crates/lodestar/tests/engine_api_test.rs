//! Integration tests for the LayoutEngine API
//!
//! These tests drive the public surface end to end: request, parse, compile
//! and frame updates against a snapshot.

use float_cmp::approx_eq;
use lodestar::{AppConfig, LayoutCompiler, LayoutEngine, SimulationConfig, scatter_positions};
use lodestar_core::{
    geometry::Vec3,
    graph::{GraphEdge, GraphNode, GraphSnapshot, NodeId},
    layout::{LayoutKind, LayoutMetadata, LayoutPlan, RadialPlan, Ring, StructuredLayout},
    request::{LayoutRequest, RoleSlot},
};
use lodestar_parser::LayoutParser;

fn chain_snapshot() -> GraphSnapshot {
    GraphSnapshot::new(
        vec![
            GraphNode::new(1, "Service").with_position(Vec3::new(0.0, 0.0, 0.0)),
            GraphNode::new(2, "Service").with_position(Vec3::new(1.0, 0.5, 0.0)),
            GraphNode::new(3, "Service").with_position(Vec3::new(-1.0, 0.3, 0.8)),
        ],
        vec![
            GraphEdge::new(2, 1, "Calls"),
            GraphEdge::new(3, 2, "Calls"),
        ],
    )
}

fn company_snapshot() -> GraphSnapshot {
    let mut snapshot = GraphSnapshot::new(
        vec![
            GraphNode::new(1, "Company"),
            GraphNode::new(2, "Company"),
            GraphNode::new(10, "Person"),
            GraphNode::new(11, "Person"),
            GraphNode::new(12, "Person"),
        ],
        vec![
            GraphEdge::new(10, 1, "WorksAt"),
            GraphEdge::new(11, 1, "WorksAt"),
            GraphEdge::new(12, 2, "WorksAt"),
        ],
    );
    scatter_positions(snapshot.nodes_mut(), 42, 5.0);
    snapshot
}

fn grouping_request() -> LayoutRequest {
    LayoutRequest::new("hierarchical-grouping")
        .with_primary(RoleSlot::new("Company").with_spatial_priority("high"))
        .with_secondary(RoleSlot::new("Person").with_group_by("WorksAt relationship"))
}

#[test]
fn test_parse_then_compile() {
    let snapshot = company_snapshot();
    let context = lodestar_core::context::GraphContext::from_snapshot(&snapshot);

    let layout = LayoutParser::default().parse(&grouping_request(), &context);
    assert_eq!(layout.kind(), LayoutKind::HierarchicalForce);

    let executable = LayoutCompiler::default()
        .compile(&layout, &snapshot)
        .expect("snapshot has nodes");
    assert_eq!(executable.kind(), LayoutKind::HierarchicalForce);
    assert!(
        executable
            .forces()
            .iter()
            .any(|entry| entry.name() == "group-spring:Company/Person")
    );
    assert_eq!(executable.nodes().len(), 5);
    assert_eq!(executable.edges().len(), 3);
}

#[test]
fn test_zero_time_step_keeps_positions() {
    let mut snapshot = company_snapshot();
    let before: Vec<Vec3> = snapshot.nodes().iter().map(GraphNode::position).collect();

    let mut engine = LayoutEngine::default();
    engine
        .apply_request(&grouping_request(), &snapshot)
        .expect("layout compiles");
    let report = engine.tick(snapshot.nodes_mut(), 0.0).expect("layout is active");

    let after: Vec<Vec3> = snapshot.nodes().iter().map(GraphNode::position).collect();
    assert_eq!(before, after);
    assert_eq!(report.iteration, 1);
    assert_eq!(report.total_energy, 0.0);
}

#[test]
fn test_chain_converges() {
    let mut snapshot = chain_snapshot();
    let mut engine = LayoutEngine::default();
    let kind = engine
        .apply_request(&LayoutRequest::new("force-directed"), &snapshot)
        .expect("layout compiles");
    assert_eq!(kind, LayoutKind::ForceDirected);

    let mut converged = false;
    for _ in 0..500 {
        let report = engine.tick(snapshot.nodes_mut(), 0.5).expect("layout is active");
        if report.converged {
            converged = true;
            break;
        }
    }
    assert!(converged, "chain did not converge within 500 frames");
    assert!(engine.is_settled());

    let position = |id: u64| {
        snapshot
            .nodes()
            .iter()
            .find(|node| node.id() == NodeId::new(id))
            .map(GraphNode::position)
            .expect("node exists")
    };
    let (a, b, c) = (position(1), position(2), position(3));
    assert!(a.is_finite() && b.is_finite() && c.is_finite());

    // The middle of the chain settles at the centre, with both edges equal.
    assert!(b.length() < 0.5, "middle node at {b}");
    assert!(approx_eq!(f32, a.distance(b), c.distance(b), epsilon = 0.05));
    assert!(approx_eq!(
        f32,
        a.distance(c),
        a.distance(b) + b.distance(c),
        epsilon = 0.1
    ));
}

#[test]
fn test_settle_uses_configured_time_step() {
    let mut snapshot = chain_snapshot();
    let config = AppConfig {
        simulation: SimulationConfig::default().with_iterations(40),
        ..AppConfig::default()
    };
    let mut engine = LayoutEngine::new(config);
    engine
        .apply_request(&LayoutRequest::new("force-directed"), &snapshot)
        .expect("layout compiles");

    let report = engine.settle(snapshot.nodes_mut(), 1000).expect("frames ran");
    assert!(report.iteration <= 40);
    assert!(engine.is_settled());
    assert!(engine.settle(snapshot.nodes_mut(), 10).is_none());
}

#[test]
fn test_unknown_nodes_are_ignored() {
    let snapshot = chain_snapshot();
    let mut engine = LayoutEngine::default();
    engine
        .apply_request(&LayoutRequest::new("force-directed"), &snapshot)
        .expect("layout compiles");

    let stranger = Vec3::new(100.0, 100.0, 100.0);
    let mut nodes = snapshot.nodes().to_vec();
    nodes.push(GraphNode::new(99, "Service").with_position(stranger));

    engine.tick(&mut nodes, 0.5).expect("layout is active");
    assert_eq!(nodes[3].position(), stranger);
    assert_ne!(nodes[1].position(), snapshot.nodes()[1].position());
}

#[test]
fn test_missing_nodes_keep_last_position() {
    let snapshot = chain_snapshot();
    let mut engine = LayoutEngine::default();
    engine
        .apply_request(&LayoutRequest::new("force-directed"), &snapshot)
        .expect("layout compiles");

    let mut partial = snapshot.nodes()[..2].to_vec();
    engine.tick(&mut partial, 0.5).expect("layout is active");

    let active = engine.active().expect("layout is active");
    assert!(active.position_of(NodeId::new(3)).is_some());
    assert!(active.position_of(NodeId::new(99)).is_none());
}

#[test]
fn test_failed_request_keeps_previous_layout() {
    let snapshot = company_snapshot();
    let mut engine = LayoutEngine::default();
    engine
        .apply_request(&grouping_request(), &snapshot)
        .expect("layout compiles");

    let result = engine.apply_request(&LayoutRequest::new("radial"), &GraphSnapshot::default());
    assert!(result.is_err());

    let active = engine.active().expect("previous layout kept");
    assert_eq!(active.kind(), LayoutKind::HierarchicalForce);
}

#[test]
fn test_unparseable_request_falls_back_to_default() {
    let snapshot = company_snapshot();
    let mut engine = LayoutEngine::default();

    let request = LayoutRequest::new("radial").with_primary(RoleSlot::new("Spaceship"));
    let kind = engine.apply_request(&request, &snapshot).expect("default compiles");
    assert_eq!(kind, LayoutKind::ForceDirected);
}

#[test]
fn test_invalid_layout_compiles_default_instead() {
    let snapshot = company_snapshot();
    let plan = RadialPlan::new(vec![Ring::new("Person", -2.0, true)], 0.8, 0.3);
    let layout = StructuredLayout::new(
        LayoutPlan::Radial(plan),
        LayoutMetadata::new("radial", Some(LayoutRequest::new("radial"))),
    );

    assert!(LayoutCompiler::default().compile(&layout, &snapshot).is_err());

    let mut engine = LayoutEngine::default();
    let kind = engine.apply_layout(&layout, &snapshot).expect("default compiles");
    assert_eq!(kind, LayoutKind::ForceDirected);
}

#[test]
fn test_no_active_layout_is_settled() {
    let mut engine = LayoutEngine::default();
    assert!(engine.is_settled());
    assert!(engine.tick(&mut [], 0.016).is_none());
}
