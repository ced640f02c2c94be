//! Human-readable traversal of the active loop.
//!
//! Display-only: the string has no effect on metrics. Traversal is
//! breadth-first from the first battery (or the first group member when no
//! battery exists), with neighbors expanded in component-id order so the
//! same snapshot always renders the same path.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::component::{Component, ComponentId};

use super::nodes::NodeResolution;

/// Placeholder shown when there is nothing to trace.
pub const EMPTY_PATH: &str = "—";

/// Render the loop as an arrow-joined list of code labels.
pub fn describe_active_path(
    group: &[ComponentId],
    batteries: &[ComponentId],
    resolution: &NodeResolution,
    table: &HashMap<ComponentId, &Component>,
) -> String {
    if group.is_empty() {
        return EMPTY_PATH.to_string();
    }

    let in_group: HashSet<ComponentId> = group.iter().copied().collect();
    let start = batteries.first().copied().unwrap_or(group[0]);

    let mut visited: HashSet<ComponentId> = HashSet::new();
    let mut queue: VecDeque<ComponentId> = VecDeque::from([start]);
    let mut ordered: Vec<&str> = Vec::new();

    while let Some(current) = queue.pop_front() {
        if !visited.insert(current) {
            continue;
        }
        ordered.push(table[&current].code_label.as_str());

        if let Some(neighbors) = resolution.adjacency.get(&current) {
            // BTreeSet iteration is already id-sorted.
            for &neighbor in neighbors {
                if in_group.contains(&neighbor) && !visited.contains(&neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
    }

    if ordered.is_empty() {
        EMPTY_PATH.to_string()
    } else {
        ordered.join(" → ")
    }
}
