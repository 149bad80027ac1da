//! Anchor-side assignment: fans out arrows touching the same side of the
//! same node so their endpoints do not overlap.
//!
//! This pass reads live geometry once (through the injected
//! [`NodeGeometry`] capability) and is otherwise pure; it runs after the
//! nodes have been rendered and measured.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::geom::Rect;
use crate::model::{NodeId, Relationship};

/// Default lateral spacing between arrows sharing a node side.
pub const ANCHOR_GAP: f64 = 25.0;

/// Compass side of a node's bounding box where an arrow terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Top/bottom anchors fan out horizontally, left/right ones vertically.
    pub fn offset_is_horizontal(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}

/// One resolved arrow endpoint: the side it terminates on and its lateral
/// offset from that side's midpoint (along x for top/bottom, y for
/// left/right).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnchorPoint {
    pub side: Side,
    pub offset: f64,
}

/// Anchor hints for one relationship, keyed by its index in the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RelAnchors {
    pub start: AnchorPoint,
    pub end: AnchorPoint,
}

/// Live node geometry, owned by the rendering surface. `None` means the
/// node is not on screen yet; its relationships keep their default anchors.
pub trait NodeGeometry {
    fn bounding_box(&self, id: &NodeId) -> Option<Rect>;
}

impl<F> NodeGeometry for F
where
    F: Fn(&NodeId) -> Option<Rect>,
{
    fn bounding_box(&self, id: &NodeId) -> Option<Rect> {
        self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndpointRole {
    Start,
    End,
}

/// Classifies both endpoints of every resolvable relationship to a compass
/// side, then spreads arrows sharing a (node, side) pair symmetrically
/// around the side's midpoint: the i-th of N gets `(i - (N-1)/2) * gap`.
///
/// Relationships with an unresolved endpoint get no entry.
pub fn assign_anchors(
    relationships: &[Relationship],
    geometry: &impl NodeGeometry,
    gap: f64,
) -> FxHashMap<usize, RelAnchors> {
    // Arrows per (node, side), in relationship order.
    let mut sides: FxHashMap<(NodeId, Side), Vec<(usize, EndpointRole)>> = FxHashMap::default();

    for (index, rel) in relationships.iter().enumerate() {
        let start_id = &rel.arrows[0].from;
        let end_id = &rel.arrows[0].to;
        let (Some(start_rect), Some(end_rect)) = (
            geometry.bounding_box(start_id),
            geometry.bounding_box(end_id),
        ) else {
            continue;
        };

        let delta = end_rect.center() - start_rect.center();
        // Mostly-horizontal pairs anchor on left/right, mostly-vertical on
        // top/bottom; each side faces the other node.
        let (start_side, end_side) = if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 {
                (Side::Right, Side::Left)
            } else {
                (Side::Left, Side::Right)
            }
        } else if delta.y > 0.0 {
            (Side::Bottom, Side::Top)
        } else {
            (Side::Top, Side::Bottom)
        };

        sides
            .entry((start_id.clone(), start_side))
            .or_default()
            .push((index, EndpointRole::Start));
        sides
            .entry((end_id.clone(), end_side))
            .or_default()
            .push((index, EndpointRole::End));
    }

    #[derive(Default)]
    struct Slots {
        start: Option<AnchorPoint>,
        end: Option<AnchorPoint>,
    }

    let mut resolved: FxHashMap<usize, Slots> = FxHashMap::default();
    for ((_, side), group) in &sides {
        let total = group.len();
        for (i, &(index, role)) in group.iter().enumerate() {
            let offset = (i as f64 - (total as f64 - 1.0) / 2.0) * gap;
            let anchor = AnchorPoint {
                side: *side,
                offset,
            };
            let slots = resolved.entry(index).or_default();
            match role {
                EndpointRole::Start => slots.start = Some(anchor),
                EndpointRole::End => slots.end = Some(anchor),
            }
        }
    }

    resolved
        .into_iter()
        .filter_map(|(index, slots)| match (slots.start, slots.end) {
            (Some(start), Some(end)) => Some((index, RelAnchors { start, end })),
            _ => None,
        })
        .collect()
}
