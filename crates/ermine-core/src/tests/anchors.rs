use rustc_hash::FxHashMap;

use crate::geom::{Rect, rect};
use crate::*;

fn geometry(boxes: &[(&NodeId, Rect)]) -> FxHashMap<NodeId, Rect> {
    boxes
        .iter()
        .map(|(id, r)| ((*id).clone(), *r))
        .collect()
}

fn lookup(map: &FxHashMap<NodeId, Rect>) -> impl Fn(&NodeId) -> Option<Rect> + '_ {
    move |id| map.get(id).copied()
}

#[test]
fn two_arrows_into_the_same_top_side_fan_out() {
    let rels = vec![
        parse_relationship_command("alpha 11 r1 0m course").unwrap(),
        parse_relationship_command("beta 11 r2 0m course").unwrap(),
    ];
    let alpha = NodeId::entity("alpha");
    let beta = NodeId::entity("beta");
    let course = NodeId::entity("course");
    // Both sources sit above the course box, mostly vertical.
    let map = geometry(&[
        (&alpha, rect(-80.0, -300.0, 160.0, 88.0)),
        (&beta, rect(-60.0, -300.0, 160.0, 88.0)),
        (&course, rect(-80.0, 0.0, 160.0, 88.0)),
    ]);

    let anchors = assign_anchors(&rels, &lookup(&map), 25.0);
    assert_eq!(anchors.len(), 2);

    let first = anchors[&0].end;
    let second = anchors[&1].end;
    assert_eq!(first.side, Side::Top);
    assert_eq!(second.side, Side::Top);
    assert_eq!(first.offset, -12.5);
    assert_eq!(second.offset, 12.5);

    // The sources each own their (node, bottom) group alone.
    assert_eq!(anchors[&0].start.side, Side::Bottom);
    assert_eq!(anchors[&0].start.offset, 0.0);
}

#[test]
fn group_offsets_are_symmetric_and_distinct() {
    let rels = vec![
        parse_relationship_command("a 11 r1 0m hub").unwrap(),
        parse_relationship_command("b 11 r2 0m hub").unwrap(),
        parse_relationship_command("c 11 r3 0m hub").unwrap(),
    ];
    let hub = NodeId::entity("hub");
    let map = geometry(&[
        (&NodeId::entity("a"), rect(-500.0, -20.0, 100.0, 40.0)),
        (&NodeId::entity("b"), rect(-500.0, -10.0, 100.0, 40.0)),
        (&NodeId::entity("c"), rect(-500.0, 0.0, 100.0, 40.0)),
        (&hub, rect(0.0, 0.0, 100.0, 40.0)),
    ]);

    let anchors = assign_anchors(&rels, &lookup(&map), 10.0);
    let offsets: Vec<f64> = (0..3).map(|ix| anchors[&ix].end.offset).collect();

    assert_eq!(offsets, vec![-10.0, 0.0, 10.0]);
    assert_eq!(offsets.iter().sum::<f64>(), 0.0);
    assert!(anchors.values().all(|a| a.end.side == Side::Left));
}

#[test]
fn horizontal_pairs_anchor_left_and_right() {
    let rels = vec![parse_relationship_command("west 11 links 0m east").unwrap()];
    let map = geometry(&[
        (&NodeId::entity("west"), rect(0.0, 0.0, 100.0, 40.0)),
        (&NodeId::entity("east"), rect(400.0, 10.0, 100.0, 40.0)),
    ]);

    let anchors = assign_anchors(&rels, &lookup(&map), 25.0);
    assert_eq!(anchors[&0].start.side, Side::Right);
    assert_eq!(anchors[&0].end.side, Side::Left);
}

#[test]
fn lone_arrow_sits_on_the_side_midpoint() {
    let rels = vec![parse_relationship_command("north 11 links 0m south").unwrap()];
    let map = geometry(&[
        (&NodeId::entity("north"), rect(0.0, 0.0, 100.0, 40.0)),
        (&NodeId::entity("south"), rect(0.0, 300.0, 100.0, 40.0)),
    ]);

    let anchors = assign_anchors(&rels, &lookup(&map), 25.0);
    let RelAnchors { start, end } = anchors[&0];
    assert_eq!(start.offset, 0.0);
    assert_eq!(end.offset, 0.0);
    assert_eq!(start.side, Side::Bottom);
    assert_eq!(end.side, Side::Top);
}

#[test]
fn unresolved_endpoints_leave_no_entry() {
    let rels = vec![
        parse_relationship_command("ghost 11 haunts 0m house").unwrap(),
        parse_relationship_command("owner 11 owns 0m house").unwrap(),
    ];
    let map = geometry(&[
        (&NodeId::entity("owner"), rect(0.0, 0.0, 100.0, 40.0)),
        (&NodeId::entity("house"), rect(0.0, 300.0, 100.0, 40.0)),
    ]);

    let anchors = assign_anchors(&rels, &lookup(&map), 25.0);
    assert!(!anchors.contains_key(&0));
    assert!(anchors.contains_key(&1));
}

#[test]
fn unary_relationship_uses_opposite_sides_of_one_node() {
    let rels = vec![parse_relationship_command("employee 01 manages 0m employee").unwrap()];
    let employee = NodeId::entity("employee");
    let map = geometry(&[(&employee, rect(0.0, 0.0, 160.0, 88.0))]);

    let anchors = assign_anchors(&rels, &lookup(&map), 25.0);
    assert_eq!(anchors[&0].start.side, Side::Top);
    assert_eq!(anchors[&0].end.side, Side::Bottom);
}

#[test]
fn top_bottom_offsets_are_horizontal() {
    assert!(Side::Top.offset_is_horizontal());
    assert!(Side::Bottom.offset_is_horizontal());
    assert!(!Side::Left.offset_is_horizontal());
    assert!(!Side::Right.offset_is_horizontal());
}
