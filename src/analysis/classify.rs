//! Topology classification for the active loop.
//!
//! Deliberately heuristic: the engine only ever solves single-loop or
//! simple-parallel networks, so classification just has to separate those
//! cases. The node-pair check catches parallel branches that share both
//! end nodes even when no junction reaches degree three; the degree check
//! is the fallback.

use std::collections::HashMap;

use crate::component::ComponentId;

use super::nodes::{NetId, NodeResolution};
use super::CircuitType;

/// Classify the eligible group as Single Load, Series, or Parallel.
pub fn classify(
    group: &[ComponentId],
    loads: &[ComponentId],
    resolution: &NodeResolution,
) -> CircuitType {
    if loads.len() <= 1 {
        return CircuitType::SingleLoad;
    }

    // Two or more loads spanning the same pair of electrical nodes are
    // parallel branches.
    let mut node_pair_counts: HashMap<(NetId, NetId), usize> = HashMap::new();
    for load in loads {
        let mut nodes: Vec<NetId> = resolution
            .component_nodes
            .get(load)
            .map(|nodes| nodes.clone())
            .unwrap_or_default();
        nodes.sort();
        nodes.dedup();
        if nodes.len() >= 2 {
            *node_pair_counts.entry((nodes[0], nodes[1])).or_insert(0) += 1;
        }
    }
    if node_pair_counts.values().any(|&count| count >= 2) {
        return CircuitType::Parallel;
    }

    // A junction with more than two neighbors means current branches.
    let has_branch_point = group.iter().any(|member| {
        resolution
            .adjacency
            .get(member)
            .is_some_and(|neighbors| neighbors.len() > 2)
    });
    if has_branch_point {
        return CircuitType::Parallel;
    }

    CircuitType::Series
}
