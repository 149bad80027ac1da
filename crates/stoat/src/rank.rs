//! Longest-path ranking over a Kahn topological order.

use std::collections::VecDeque;

pub(crate) fn longest_path(node_count: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut out: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    let mut indegree = vec![0usize; node_count];
    for &(from, to) in edges {
        out[from].push(to);
        indegree[to] += 1;
    }

    // Deterministic Kahn order: initial nodes in insertion order.
    let mut queue: VecDeque<usize> = (0..node_count).filter(|&n| indegree[n] == 0).collect();
    let mut topo: Vec<usize> = Vec::with_capacity(node_count);
    while let Some(n) = queue.pop_front() {
        topo.push(n);
        for &w in &out[n] {
            indegree[w] -= 1;
            if indegree[w] == 0 {
                queue.push_back(w);
            }
        }
    }

    // Cycles are broken before ranking; an incomplete order means a caller
    // bug, so fall back to insertion order instead of looping.
    if topo.len() != node_count {
        topo = (0..node_count).collect();
    }

    let mut rank = vec![0usize; node_count];
    for &n in &topo {
        for &w in &out[n] {
            rank[w] = rank[w].max(rank[n] + 1);
        }
    }
    rank
}
