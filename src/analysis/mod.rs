//! The circuit analysis engine.
//!
//! One synchronous pass over the full component and wire snapshot:
//!
//! 1. [`nodes`] resolves wires and terminals into electrical nodes and
//!    derives the component adjacency graph.
//! 2. [`selector`] flood-fills for the first connected group that can
//!    power a closed loop.
//! 3. [`classify`] labels the group Single Load, Series, or Parallel.
//! 4. [`metrics`] solves the loop in closed form under Ohm's Law.
//! 5. [`path`] renders a deterministic traversal string for display.
//!
//! The pass is pure computation over the caller's collections: it performs
//! no I/O, never blocks, and runs in time linear in components plus wires.
//! Every degenerate input maps to a non-fatal `Alert` plus issue strings;
//! the caller always receives a well-formed [`Analysis`] record.

pub mod classify;
pub mod metrics;
pub mod nodes;
pub mod path;
pub mod selector;
pub mod union_find;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::component::{Component, ComponentId, OperatingMetrics};
use crate::wire::{Wire, WireId};

/// Topology label of the analyzed network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CircuitType {
    Open,
    #[serde(rename = "Single Load")]
    SingleLoad,
    Series,
    Parallel,
}

impl fmt::Display for CircuitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CircuitType::Open => "Open",
            CircuitType::SingleLoad => "Single Load",
            CircuitType::Series => "Series",
            CircuitType::Parallel => "Parallel",
        };
        write!(f, "{name}")
    }
}

/// Overall status of the analyzed network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CircuitStatus {
    /// No closed, powered loop exists.
    Open,
    /// A loop was found and solved.
    Closed,
    /// A loop (or the board as a whole) has a problem worth flagging.
    Alert,
}

impl fmt::Display for CircuitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CircuitStatus::Open => "Open",
            CircuitStatus::Closed => "Closed",
            CircuitStatus::Alert => "Alert",
        };
        write!(f, "{name}")
    }
}

/// Default status detail when no loop is active.
pub const DETAIL_OPEN: &str = "⚫ Open Circuit";

/// The aggregate record produced by every analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub component_count: usize,
    pub wire_count: usize,
    pub active_component_count: usize,
    pub active_wire_count: usize,
    #[serde(rename = "type")]
    pub circuit_type: CircuitType,
    pub status: CircuitStatus,
    pub status_detail: String,
    pub total_voltage: f64,
    pub total_current: f64,
    pub total_resistance: f64,
    pub total_power: f64,
    pub path_description: String,
    /// Ordered, de-duplicated diagnostics.
    pub issues: Vec<String>,
}

impl Analysis {
    fn open(component_count: usize, wire_count: usize) -> Self {
        Self {
            component_count,
            wire_count,
            active_component_count: 0,
            active_wire_count: 0,
            circuit_type: CircuitType::Open,
            status: CircuitStatus::Open,
            status_detail: DETAIL_OPEN.to_string(),
            total_voltage: 0.0,
            total_current: 0.0,
            total_resistance: 0.0,
            total_power: 0.0,
            path_description: path::EMPTY_PATH.to_string(),
            issues: Vec::new(),
        }
    }
}

/// Full result of a pass: the aggregate record plus the selected subsets
/// and the per-component metrics map.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub analysis: Analysis,
    /// Members of the active loop, if one was selected.
    pub active_components: Option<Vec<ComponentId>>,
    /// Wires carrying the active loop, if one was selected.
    pub active_wires: Option<Vec<WireId>>,
    /// Metrics for every component the solver touched.
    pub metrics: BTreeMap<ComponentId, OperatingMetrics>,
}

/// Drop repeated issue strings, keeping the first occurrence of each.
pub(crate) fn dedupe_issues(issues: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    issues
        .into_iter()
        .filter(|issue| seen.insert(issue.clone()))
        .collect()
}

/// Analyze a snapshot of components and wires.
///
/// The engine never mutates its inputs; component operating metrics are
/// returned in the outcome for the caller to apply.
pub fn analyze_circuit(components: &[Component], wires: &[Wire]) -> AnalysisOutcome {
    let mut analysis = Analysis::open(components.len(), wires.len());

    let resolution = nodes::resolve(components, wires);
    analysis.issues.extend(resolution.issues.iter().cloned());

    let table: HashMap<ComponentId, &Component> =
        components.iter().map(|c| (c.id, c)).collect();

    let mut active_components = None;
    let mut active_wires = None;
    let mut component_metrics: BTreeMap<ComponentId, OperatingMetrics> = BTreeMap::new();

    if let Some(group) = selector::select_active_group(components, &resolution) {
        let active_set: HashSet<ComponentId> = group.members.iter().copied().collect();
        let active_clusters: HashSet<usize> = resolution
            .clusters
            .iter()
            .enumerate()
            .filter(|(_, cluster)| {
                cluster
                    .components
                    .iter()
                    .filter(|c| active_set.contains(c))
                    .count()
                    >= 2
            })
            .map(|(index, _)| index)
            .collect();
        let wires_active: Vec<WireId> = wires
            .iter()
            .filter(|wire| {
                resolution
                    .wire_cluster
                    .get(&wire.id)
                    .is_some_and(|cluster| active_clusters.contains(cluster))
            })
            .map(|wire| wire.id)
            .collect();

        let circuit_type = classify::classify(&group.members, &group.loads, &resolution);
        let (summary, per_component, metric_issues) = metrics::solve(
            &group.members,
            &group.batteries,
            &group.loads,
            circuit_type,
            &table,
        );

        analysis.circuit_type = circuit_type;
        analysis.status = summary.status;
        analysis.status_detail = summary.detail.to_string();
        analysis.total_voltage = summary.total_voltage;
        analysis.total_current = summary.total_current;
        analysis.total_resistance = summary.total_resistance;
        analysis.total_power = summary.total_power;
        analysis.active_component_count = group.members.len();
        analysis.active_wire_count = wires_active.len();
        analysis.path_description =
            path::describe_active_path(&group.members, &group.batteries, &resolution, &table);
        analysis.issues.extend(metric_issues);

        if analysis.status == CircuitStatus::Closed && summary.detail == metrics::DETAIL_POWERED {
            analysis.status_detail = format!("✓ {circuit_type} circuit powered");
        }

        active_components = Some(group.members.clone());
        active_wires = Some(wires_active);
        component_metrics = per_component;
    }

    analysis.issues = dedupe_issues(analysis.issues);

    AnalysisOutcome {
        analysis,
        active_components,
        active_wires,
        metrics: component_metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentKind, Side};
    use crate::wire::{Attachment, PointId};

    use approx::assert_relative_eq;

    fn component(id: u64, kind: ComponentKind) -> Component {
        let index = id + 1;
        Component::new(
            ComponentId(id),
            kind,
            format!("{} {index}", kind.label()),
            format!("{}{index}", kind.prefix()),
        )
    }

    fn wire(id: u64, from: (u64, Side), to: (u64, Side)) -> Wire {
        let mut wire = Wire::new(WireId(id));
        wire.point_mut(PointId::A).unwrap().attachment = Some(Attachment {
            component: ComponentId(from.0),
            side: from.1,
        });
        wire.point_mut(PointId::B).unwrap().attachment = Some(Attachment {
            component: ComponentId(to.0),
            side: to.1,
        });
        wire
    }

    #[test]
    fn test_unattached_everything_stays_open() {
        let components = vec![
            component(0, ComponentKind::Battery),
            component(1, ComponentKind::Resistor),
        ];
        let wires = vec![Wire::new(WireId(0)), Wire::new(WireId(1))];

        let outcome = analyze_circuit(&components, &wires);
        let analysis = &outcome.analysis;
        assert_eq!(analysis.status, CircuitStatus::Open);
        assert_eq!(analysis.active_component_count, 0);
        assert!(outcome.active_components.is_none());
        // Two loose wires, one de-duplicated issue string.
        assert!(analysis
            .issues
            .contains(&"Wire with no connections detected".to_string()));
    }

    #[test]
    fn test_single_load_loop_end_to_end() {
        let components = vec![
            component(0, ComponentKind::Battery),
            component(1, ComponentKind::Resistor),
        ];
        let wires = vec![
            wire(0, (0, Side::Right), (1, Side::Left)),
            wire(1, (1, Side::Right), (0, Side::Left)),
        ];

        let outcome = analyze_circuit(&components, &wires);
        let analysis = &outcome.analysis;
        assert_eq!(analysis.status, CircuitStatus::Closed);
        assert_eq!(analysis.circuit_type, CircuitType::SingleLoad);
        assert_eq!(analysis.status_detail, "✓ Single Load circuit powered");
        assert_relative_eq!(analysis.total_current, 0.09);
        assert_relative_eq!(analysis.total_power, 0.81);
        assert_eq!(analysis.active_component_count, 2);
        assert_eq!(analysis.active_wire_count, 2);
        assert_eq!(analysis.path_description, "B1 → R2");
        assert!(analysis.issues.is_empty());
        assert_relative_eq!(outcome.metrics[&ComponentId(1)].voltage, 9.0);
    }

    #[test]
    fn test_series_loop_end_to_end() {
        let mut components = vec![
            component(0, ComponentKind::Battery),
            component(1, ComponentKind::Resistor),
            component(2, ComponentKind::Resistor),
        ];
        components[2].resistance = 200.0;
        let wires = vec![
            wire(0, (0, Side::Right), (1, Side::Left)),
            wire(1, (1, Side::Right), (2, Side::Left)),
            wire(2, (2, Side::Right), (0, Side::Left)),
        ];

        let outcome = analyze_circuit(&components, &wires);
        let analysis = &outcome.analysis;
        assert_eq!(analysis.circuit_type, CircuitType::Series);
        assert_relative_eq!(analysis.total_resistance, 300.0);
        assert_relative_eq!(analysis.total_current, 0.03);
        assert_relative_eq!(outcome.metrics[&ComponentId(1)].voltage, 3.0);
        assert_relative_eq!(outcome.metrics[&ComponentId(2)].voltage, 6.0);
        assert_eq!(analysis.path_description, "B1 → R2 → R3");
    }

    #[test]
    fn test_parallel_loop_end_to_end() {
        let components = vec![
            component(0, ComponentKind::Battery),
            component(1, ComponentKind::Resistor),
            component(2, ComponentKind::Resistor),
        ];
        let wires = vec![
            wire(0, (0, Side::Right), (1, Side::Left)),
            wire(1, (0, Side::Right), (2, Side::Left)),
            wire(2, (1, Side::Right), (0, Side::Left)),
            wire(3, (2, Side::Right), (0, Side::Left)),
        ];

        let outcome = analyze_circuit(&components, &wires);
        let analysis = &outcome.analysis;
        assert_eq!(analysis.circuit_type, CircuitType::Parallel);
        assert_relative_eq!(analysis.total_resistance, 50.0);
        assert_relative_eq!(analysis.total_current, 0.18);
        for id in [ComponentId(1), ComponentId(2)] {
            assert_relative_eq!(outcome.metrics[&id].current, 0.09);
            assert_relative_eq!(outcome.metrics[&id].voltage, 9.0);
        }
    }

    #[test]
    fn test_zero_resistance_load_shorts_the_loop() {
        let mut components = vec![
            component(0, ComponentKind::Battery),
            component(1, ComponentKind::Resistor),
            component(2, ComponentKind::Resistor),
        ];
        components[2].resistance = 0.0;
        let wires = vec![
            wire(0, (0, Side::Right), (1, Side::Left)),
            wire(1, (1, Side::Right), (2, Side::Left)),
            wire(2, (2, Side::Right), (0, Side::Left)),
        ];

        let outcome = analyze_circuit(&components, &wires);
        let analysis = &outcome.analysis;
        assert_eq!(analysis.status, CircuitStatus::Alert);
        assert_eq!(analysis.status_detail, "⚠️ Short circuit detected");
        assert!(analysis
            .issues
            .iter()
            .any(|issue| issue.contains("zero resistance")));
        assert_eq!(outcome.metrics[&ComponentId(2)], OperatingMetrics::default());
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let mut components = vec![
            component(0, ComponentKind::Battery),
            component(1, ComponentKind::Resistor),
            component(2, ComponentKind::Resistor),
        ];
        components[2].resistance = 200.0;
        let wires = vec![
            wire(0, (0, Side::Right), (1, Side::Left)),
            wire(1, (1, Side::Right), (2, Side::Left)),
            wire(2, (2, Side::Right), (0, Side::Left)),
        ];

        let first = analyze_circuit(&components, &wires);
        let second = analyze_circuit(&components, &wires);
        assert_eq!(first.analysis, second.analysis);
        assert_eq!(first.metrics, second.metrics);
        assert_eq!(first.active_components, second.active_components);
        assert_eq!(first.active_wires, second.active_wires);
    }

    #[test]
    fn test_dedupe_issues_keeps_first_occurrence() {
        let issues = vec![
            "a".to_string(),
            "b".to_string(),
            "a".to_string(),
            "c".to_string(),
            "b".to_string(),
        ];
        assert_eq!(dedupe_issues(issues), vec!["a", "b", "c"]);
    }
}
