//! Cycle breaking by DFS back-edge reversal.
//!
//! Self-loops are dropped here: reversing one cannot make the graph acyclic
//! and they must not constrain rank assignment.

pub(crate) fn break_cycles(node_count: usize, edges: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let mut out: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    for (ix, &(from, to)) in edges.iter().enumerate() {
        if from != to {
            out[from].push(ix);
        }
    }

    const WHITE: u8 = 0;
    const GRAY: u8 = 1;
    const BLACK: u8 = 2;
    let mut color = vec![WHITE; node_count];
    let mut reversed = vec![false; edges.len()];

    // Iterative DFS, roots visited in insertion order for determinism.
    for root in 0..node_count {
        if color[root] != WHITE {
            continue;
        }
        color[root] = GRAY;
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            if cursor == out[node].len() {
                color[node] = BLACK;
                stack.pop();
                continue;
            }
            frame.1 += 1;
            let edge_ix = out[node][cursor];
            let (_, to) = edges[edge_ix];
            match color[to] {
                WHITE => {
                    color[to] = GRAY;
                    stack.push((to, 0));
                }
                GRAY => reversed[edge_ix] = true,
                _ => {}
            }
        }
    }

    edges
        .iter()
        .enumerate()
        .filter(|&(_, &(from, to))| from != to)
        .map(|(ix, &(from, to))| if reversed[ix] { (to, from) } else { (from, to) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverses_back_edges_only() {
        let edges = [(0, 1), (1, 2), (2, 0)];
        let broken = break_cycles(3, &edges);
        assert_eq!(broken, vec![(0, 1), (1, 2), (0, 2)]);
    }

    #[test]
    fn drops_self_loops() {
        let edges = [(0, 0), (0, 1)];
        assert_eq!(break_cycles(2, &edges), vec![(0, 1)]);
    }

    #[test]
    fn acyclic_input_is_untouched() {
        let edges = [(0, 1), (0, 2), (1, 3), (2, 3)];
        assert_eq!(break_cycles(4, &edges), edges.to_vec());
    }
}
