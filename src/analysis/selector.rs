//! Active-loop selection.
//!
//! Scans components in input order, flood-filling each unvisited one into
//! its full connected subgraph. The first subgraph that can actually power
//! a loop wins; the scan stops immediately rather than hunting for a
//! "better" candidate.

use std::collections::HashSet;

use tracing::debug;

use crate::component::{Component, ComponentId};

use super::nodes::NodeResolution;

/// The selected closed, powered subgraph.
#[derive(Debug, Clone)]
pub struct ActiveGroup {
    /// Group members in flood-fill discovery order.
    pub members: Vec<ComponentId>,
    /// Member batteries, in input order.
    pub batteries: Vec<ComponentId>,
    /// Member load components, in input order. Load kinds are included
    /// even at zero resistance so the solver can flag them as shorts.
    pub loads: Vec<ComponentId>,
}

/// Pick the first eligible connected group, if any.
///
/// Eligibility requires, all at once: at least two members, at least one
/// battery, at least one passive load, no open switch, and every member's
/// wired-terminal count meeting its requirement.
pub fn select_active_group(
    components: &[Component],
    resolution: &NodeResolution,
) -> Option<ActiveGroup> {
    let mut visited: HashSet<ComponentId> = HashSet::new();

    for component in components {
        if visited.contains(&component.id) {
            continue;
        }

        let mut stack = vec![component.id];
        visited.insert(component.id);
        let mut candidates: Vec<ComponentId> = Vec::new();

        while let Some(current) = stack.pop() {
            candidates.push(current);
            if let Some(neighbors) = resolution.adjacency.get(&current) {
                for &neighbor in neighbors {
                    if visited.insert(neighbor) {
                        stack.push(neighbor);
                    }
                }
            }
        }

        if candidates.len() < 2 {
            continue;
        }

        let in_group: HashSet<ComponentId> = candidates.iter().copied().collect();
        let batteries: Vec<ComponentId> = components
            .iter()
            .filter(|c| in_group.contains(&c.id) && c.is_source())
            .map(|c| c.id)
            .collect();
        let loads: Vec<ComponentId> = components
            .iter()
            .filter(|c| {
                in_group.contains(&c.id) && (c.kind.is_load_kind() || c.is_passive_load())
            })
            .map(|c| c.id)
            .collect();
        let has_passive_load = components
            .iter()
            .any(|c| in_group.contains(&c.id) && c.is_passive_load());

        let has_open_switch = components
            .iter()
            .any(|c| in_group.contains(&c.id) && c.is_switch() && !c.is_switch_closed());
        if has_open_switch {
            continue;
        }

        if batteries.is_empty() || !has_passive_load {
            continue;
        }

        let fully_wired = components
            .iter()
            .filter(|c| in_group.contains(&c.id))
            .all(|c| {
                resolution
                    .terminal_counts
                    .get(&c.id)
                    .copied()
                    .unwrap_or(0)
                    >= c.required_terminals()
            });
        if !fully_wired {
            continue;
        }

        debug!(
            members = candidates.len(),
            batteries = batteries.len(),
            loads = loads.len(),
            "selected active loop"
        );
        return Some(ActiveGroup {
            members: candidates,
            batteries,
            loads,
        });
    }

    None
}
