use std::cell::RefCell;

use crate::geom::{Point, point};
use crate::*;

/// Stub engine: lines nodes up 100 apart on the x axis and records what it
/// was given.
#[derive(Default)]
struct RecordingEngine {
    nodes: RefCell<Vec<SizedNode>>,
    edges: RefCell<Vec<(usize, usize)>>,
}

impl LayoutEngine for RecordingEngine {
    fn layout(
        &self,
        nodes: &[SizedNode],
        edges: &[(usize, usize)],
        _spacing: LayoutSpacing,
    ) -> Vec<Point> {
        *self.nodes.borrow_mut() = nodes.to_vec();
        *self.edges.borrow_mut() = edges.to_vec();
        (0..nodes.len())
            .map(|ix| point(ix as f64 * 100.0, 0.0))
            .collect()
    }
}

fn campus() -> Diagram {
    let raw = parse_document(
        "entities:\nstudent u.id, name;\ncourse u.code;\nrelationships:\nstudent 0m enrols_in 0m course;\n",
    );
    Diagram::load(raw.entities, raw.relationships)
}

#[test]
fn positions_are_recentered_on_the_reference_point() {
    let diagram = campus();
    let engine = RecordingEngine::default();
    let positions = compute_layout(
        &diagram.entities,
        &diagram.relationships,
        point(200.0, 300.0),
        &engine,
    );

    // Engine coords (0,0) and (100,0) have centroid (50,0); world flips the
    // offset around the reference.
    assert_eq!(positions, vec![point(250.0, 300.0), point(150.0, 300.0)]);
}

#[test]
fn node_sizes_grow_with_attribute_count() {
    let diagram = campus();
    let engine = RecordingEngine::default();
    compute_layout(
        &diagram.entities,
        &diagram.relationships,
        Point::origin(),
        &engine,
    );

    let nodes = engine.nodes.borrow();
    let student = nodes
        .iter()
        .find(|n| n.id == NodeId::entity("student"))
        .unwrap();
    assert_eq!((student.width, student.height), (160.0, 88.0));
    let course = nodes
        .iter()
        .find(|n| n.id == NodeId::entity("course"))
        .unwrap();
    assert_eq!((course.width, course.height), (160.0, 64.0));
}

#[test]
fn connectors_get_the_fixed_small_box() {
    let raw = parse_document(
        "entities:\nvehicle.super.total.disjoint u.vin, type(d);\ncar.sub.vehicle;\n",
    );
    let diagram = Diagram::load(raw.entities, raw.relationships);
    let engine = RecordingEngine::default();
    let positions = compute_layout(
        &diagram.entities,
        &diagram.relationships,
        Point::origin(),
        &engine,
    );

    // One position per entity, connector included.
    assert_eq!(positions.len(), 3);
    let nodes = engine.nodes.borrow();
    let connector = nodes
        .iter()
        .find(|n| n.id == NodeId::connector("vehicle"))
        .unwrap();
    assert_eq!((connector.width, connector.height), (50.0, 50.0));

    // Both derived headless links survive as engine edges.
    assert_eq!(engine.edges.borrow().len(), 2);
}

#[test]
fn relationships_with_unknown_endpoints_produce_no_edges() {
    let raw = parse_document(
        "entities:\nstudent u.id;\nrelationships:\nstudent 0m visits 0m library;\n",
    );
    let diagram = Diagram::load(raw.entities, raw.relationships);
    let engine = RecordingEngine::default();
    compute_layout(
        &diagram.entities,
        &diagram.relationships,
        Point::origin(),
        &engine,
    );
    assert!(engine.edges.borrow().is_empty());
}

#[test]
fn empty_model_yields_no_positions() {
    let engine = RecordingEngine::default();
    let positions = compute_layout(&[], &[], Point::origin(), &engine);
    assert!(positions.is_empty());
}

#[test]
fn default_spacing_matches_the_er_tuning() {
    let spacing = LayoutSpacing::default();
    assert_eq!(spacing.nodesep, 120.0);
    assert_eq!(spacing.ranksep, 200.0);
    assert_eq!(spacing.marginx, 40.0);
    assert_eq!(spacing.marginy, 40.0);
}
