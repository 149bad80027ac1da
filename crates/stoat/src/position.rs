//! Rank-by-rank coordinate assignment.
//!
//! Ranks stack vertically with `ranksep` between bands; within a rank the run
//! of boxes is separated by `nodesep` and centered on the widest rank.

use crate::Graph;

pub(crate) fn assign(g: &mut Graph, layers: &[Vec<usize>]) {
    let config = g.config;

    let mut rank_widths: Vec<f64> = Vec::with_capacity(layers.len());
    let mut rank_heights: Vec<f64> = Vec::with_capacity(layers.len());
    for layer in layers {
        let mut width = 0.0;
        let mut height = 0.0_f64;
        for (i, &n) in layer.iter().enumerate() {
            width += g.nodes[n].width;
            if i + 1 < layer.len() {
                width += config.nodesep;
            }
            height = height.max(g.nodes[n].height);
        }
        rank_widths.push(width);
        rank_heights.push(height);
    }
    let max_width = rank_widths.iter().copied().fold(0.0_f64, f64::max);

    let mut y_cursor = config.marginy;
    for (r, layer) in layers.iter().enumerate() {
        let y = y_cursor + rank_heights[r] / 2.0;
        let mut x_cursor = config.marginx + (max_width - rank_widths[r]) / 2.0;
        for &n in layer {
            let node = &mut g.nodes[n];
            node.x = Some(x_cursor + node.width / 2.0);
            node.y = Some(y);
            x_cursor += node.width + config.nodesep;
        }
        y_cursor += rank_heights[r];
        if r + 1 < layers.len() {
            y_cursor += config.ranksep;
        }
    }
}
