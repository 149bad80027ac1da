//! Within-rank ordering.
//!
//! The initial order of a rank is node insertion order. One barycenter round
//! (a downward then an upward sweep) pulls each node toward the mean position
//! of its neighbors in the adjacent rank, which removes most crossings on the
//! small graphs this engine targets.

use rustc_hash::FxHashMap;

pub(crate) fn build_layers(ranks: &[usize]) -> Vec<Vec<usize>> {
    let max = ranks.iter().copied().max().unwrap_or(0);
    let mut layers = vec![Vec::new(); max + 1];
    for (node, &r) in ranks.iter().enumerate() {
        layers[r].push(node);
    }
    layers
}

pub(crate) fn barycenter_round(
    mut layers: Vec<Vec<usize>>,
    edges: &[(usize, usize)],
    node_count: usize,
) -> Vec<Vec<usize>> {
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    let mut succs: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    for &(from, to) in edges {
        preds[to].push(from);
        succs[from].push(to);
    }

    let mut pos = vec![0usize; node_count];
    for layer in &layers {
        for (i, &n) in layer.iter().enumerate() {
            pos[n] = i;
        }
    }

    for r in 1..layers.len() {
        sort_layer(&mut layers[r], &preds, &pos);
        for (i, &n) in layers[r].iter().enumerate() {
            pos[n] = i;
        }
    }
    for r in (0..layers.len().saturating_sub(1)).rev() {
        sort_layer(&mut layers[r], &succs, &pos);
        for (i, &n) in layers[r].iter().enumerate() {
            pos[n] = i;
        }
    }

    layers
}

/// Stable sort by mean neighbor position; nodes without neighbors keep their
/// current slot as the key, so they do not drift.
fn sort_layer(layer: &mut [usize], neighbors: &[Vec<usize>], pos: &[usize]) {
    let keys: FxHashMap<usize, f64> = layer
        .iter()
        .enumerate()
        .map(|(i, &n)| {
            let ns = &neighbors[n];
            let key = if ns.is_empty() {
                i as f64
            } else {
                ns.iter().map(|&m| pos[m] as f64).sum::<f64>() / ns.len() as f64
            };
            (n, key)
        })
        .collect();
    layer.sort_by(|a, b| {
        keys[a]
            .partial_cmp(&keys[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_follow_ranks_in_insertion_order() {
        let layers = build_layers(&[0, 1, 0, 1]);
        assert_eq!(layers, vec![vec![0, 2], vec![1, 3]]);
    }

    #[test]
    fn crossing_pair_is_untangled() {
        // 0 and 1 on rank 0; 2 and 3 on rank 1. Edges 0->3 and 1->2 cross
        // under the initial order; the sweep swaps the lower rank.
        let layers = vec![vec![0, 1], vec![2, 3]];
        let ordered = barycenter_round(layers, &[(0, 3), (1, 2)], 4);
        assert_eq!(ordered[1], vec![3, 2]);
    }
}
