//! Layout coordination: translates the model into the layout engine's
//! node/edge input and maps the engine's coordinates back to world space.
//!
//! The engine itself is an injected capability ([`LayoutEngine`]): sized
//! nodes and directed edges in, one center coordinate per node out. The
//! remap keeps the recomputed diagram centered on the point the camera is
//! currently looking at.

use rustc_hash::FxHashMap;

use crate::geom::{Point, point};
use crate::model::{Entity, EntityKind, NodeId, Relationship};

/// Spacing handed to the layout engine: the tuning that reads well for
/// entity boxes of the sizes estimated below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSpacing {
    pub nodesep: f64,
    pub ranksep: f64,
    pub marginx: f64,
    pub marginy: f64,
}

impl Default for LayoutSpacing {
    fn default() -> Self {
        Self {
            nodesep: 120.0,
            ranksep: 200.0,
            marginx: 40.0,
            marginy: 40.0,
        }
    }
}

/// One layout input node.
#[derive(Debug, Clone, PartialEq)]
pub struct SizedNode {
    pub id: NodeId,
    pub width: f64,
    pub height: f64,
}

/// External layered layout engine contract: returns one center coordinate
/// per node, in input order. Edges are (from, to) indices into `nodes`.
pub trait LayoutEngine {
    fn layout(
        &self,
        nodes: &[SizedNode],
        edges: &[(usize, usize)],
        spacing: LayoutSpacing,
    ) -> Vec<Point>;
}

const CONNECTOR_SIZE: f64 = 50.0;
const ENTITY_WIDTH: f64 = 160.0;
const ENTITY_BASE_HEIGHT: f64 = 40.0;
const ATTR_ROW_HEIGHT: f64 = 24.0;

/// Estimated on-screen box for a node that has not been measured yet:
/// connectors are small and fixed, entity boxes grow one row per attribute.
pub fn estimate_size(entity: &Entity) -> (f64, f64) {
    if entity.kind == EntityKind::Connector {
        (CONNECTOR_SIZE, CONNECTOR_SIZE)
    } else {
        (
            ENTITY_WIDTH,
            ENTITY_BASE_HEIGHT + entity.attributes.len() as f64 * ATTR_ROW_HEIGHT,
        )
    }
}

/// Computes a world position for every entity (connectors included), one
/// entry per input index.
///
/// Edges are built only for relationships whose both endpoints are known
/// nodes. The engine's coordinates are recentered on `reference` with
/// `world = reference - (coord - centroid)`; world coordinates follow the
/// application's `screen = viewport_middle + camera - world` convention,
/// hence the sign flip.
pub fn compute_layout(
    entities: &[Entity],
    relationships: &[Relationship],
    reference: Point,
    engine: &impl LayoutEngine,
) -> Vec<Point> {
    let mut index_of: FxHashMap<NodeId, usize> = FxHashMap::default();
    let mut nodes = Vec::with_capacity(entities.len());
    for (ix, entity) in entities.iter().enumerate() {
        let id = entity.node_id();
        index_of.insert(id.clone(), ix);
        let (width, height) = estimate_size(entity);
        nodes.push(SizedNode { id, width, height });
    }

    let mut edges = Vec::new();
    for rel in relationships {
        let (from, to) = rel.endpoints();
        if let (Some(&a), Some(&b)) = (index_of.get(from), index_of.get(to)) {
            edges.push((a, b));
        }
    }

    let coords = engine.layout(&nodes, &edges, LayoutSpacing::default());

    let count = coords.len().max(1) as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for coord in &coords {
        sum_x += coord.x;
        sum_y += coord.y;
    }
    let centroid = point(sum_x / count, sum_y / count);

    coords
        .iter()
        .map(|coord| {
            point(
                reference.x - (coord.x - centroid.x),
                reference.y - (coord.y - centroid.y),
            )
        })
        .collect()
}
