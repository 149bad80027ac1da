#![forbid(unsafe_code)]

//! Layered graph layout: sized nodes and directed edges in, per-node center
//! coordinates out.
//!
//! The pipeline is deliberately small and deterministic:
//! cycle breaking -> longest-path ranking -> one barycenter ordering round ->
//! rank-by-rank coordinate assignment. Ranks flow top-to-bottom; the output
//! coordinate of every node is the center of its box.

mod acyclic;
mod order;
mod position;
mod rank;

use rustc_hash::FxHashMap;
use serde::Serialize;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Spacing knobs, in the same units as node sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Horizontal gap between boxes that share a rank.
    pub nodesep: f64,
    /// Vertical gap between consecutive rank bands.
    pub ranksep: f64,
    pub marginx: f64,
    pub marginy: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nodesep: 50.0,
            ranksep: 50.0,
            marginx: 0.0,
            marginy: 0.0,
        }
    }
}

/// A sized box to place. `x`/`y` are `None` until [`layout`] runs.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

#[derive(Debug, Default)]
pub struct Graph {
    pub config: Config,
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<(usize, usize)>,
    index: FxHashMap<String, usize>,
}

impl Graph {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            edges: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Registers a node. Re-adding an id updates its size in place.
    pub fn add_node(&mut self, id: impl Into<String>, width: f64, height: f64) {
        let id = id.into();
        match self.index.get(&id) {
            Some(&ix) => {
                self.nodes[ix].width = width;
                self.nodes[ix].height = height;
            }
            None => {
                self.index.insert(id.clone(), self.nodes.len());
                self.nodes.push(Node {
                    id,
                    width,
                    height,
                    x: None,
                    y: None,
                });
            }
        }
    }

    /// Adds a directed edge. Endpoints must already be registered; edges
    /// naming unknown nodes are dropped.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        if let (Some(&a), Some(&b)) = (self.index.get(from), self.index.get(to)) {
            self.edges.push((a, b));
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&ix| &self.nodes[ix])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Runs the layout pipeline, filling in every node's `x`/`y` center.
pub fn layout(g: &mut Graph) {
    if g.nodes.is_empty() {
        return;
    }
    let edges = acyclic::break_cycles(g.nodes.len(), &g.edges);
    let ranks = rank::longest_path(g.nodes.len(), &edges);
    let layers = order::build_layers(&ranks);
    let layers = order::barycenter_round(layers, &edges, g.nodes.len());
    position::assign(g, &layers);
}
