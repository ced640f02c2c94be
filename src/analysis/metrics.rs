//! Closed-form metrics for the active loop.
//!
//! Applies Ohm's Law to the classified topology: series loops sum
//! resistances, parallel networks combine them by reciprocal sum, and every
//! quantity is a pure reduction so the result is independent of iteration
//! order. Degenerate cases short-circuit into an Alert summary with an
//! issue string; they never fail the pass.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::component::{Component, ComponentId, OperatingMetrics};

use super::{CircuitStatus, CircuitType};

/// Aggregate totals plus the status the solver settled on.
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub total_voltage: f64,
    pub total_resistance: f64,
    pub total_current: f64,
    pub total_power: f64,
    pub status: CircuitStatus,
    pub detail: &'static str,
}

/// Detail shown when the solver completes without an alert. The caller
/// refines it with the circuit type afterwards.
pub const DETAIL_POWERED: &str = "✓ Circuit Complete & Powered";

/// Solve the loop, returning the summary, per-component metrics, and any
/// arithmetic issues raised along the way.
pub fn solve(
    group: &[ComponentId],
    batteries: &[ComponentId],
    loads: &[ComponentId],
    circuit_type: CircuitType,
    table: &HashMap<ComponentId, &Component>,
) -> (
    MetricsSummary,
    BTreeMap<ComponentId, OperatingMetrics>,
    Vec<String>,
) {
    let mut summary = MetricsSummary {
        total_voltage: batteries.iter().map(|id| table[id].voltage()).sum(),
        total_resistance: 0.0,
        total_current: 0.0,
        total_power: 0.0,
        status: CircuitStatus::Closed,
        detail: DETAIL_POWERED,
    };
    let mut per_component: BTreeMap<ComponentId, OperatingMetrics> = BTreeMap::new();
    let mut issues: Vec<String> = Vec::new();

    let total_voltage = summary.total_voltage;
    if total_voltage <= 0.0 {
        issues.push("No active voltage source detected".to_string());
        summary.status = CircuitStatus::Alert;
        summary.detail = "⚠️ Add an active battery";
        return (summary, per_component, issues);
    }

    if loads.is_empty() {
        issues.push("No passive load connected to the circuit".to_string());
        summary.status = CircuitStatus::Alert;
        summary.detail = "⚠️ Add a resistor, bulb, or other load";
        return (summary, per_component, issues);
    }

    let positive_loads: Vec<ComponentId> = loads
        .iter()
        .copied()
        .filter(|id| table[id].resistance() > 0.0)
        .collect();
    let zero_loads: Vec<ComponentId> = loads
        .iter()
        .copied()
        .filter(|id| table[id].resistance() <= 0.0)
        .collect();
    if !zero_loads.is_empty() {
        for id in &zero_loads {
            issues.push(format!(
                "{} has zero resistance (short path)",
                table[id].display_label
            ));
            per_component.insert(*id, OperatingMetrics::default());
        }
        summary.status = CircuitStatus::Alert;
        summary.detail = "⚠️ Short circuit detected";
        return (summary, per_component, issues);
    }

    if circuit_type == CircuitType::Parallel && positive_loads.len() >= 2 {
        let inverse_sum: f64 = positive_loads
            .iter()
            .map(|id| 1.0 / table[id].resistance())
            .sum();
        if inverse_sum <= 0.0 {
            issues.push("Unable to compute equivalent resistance for parallel network".to_string());
            summary.status = CircuitStatus::Alert;
            summary.detail = "⚠️ Calculation error";
            return (summary, per_component, issues);
        }

        summary.total_resistance = 1.0 / inverse_sum;
        summary.total_current = positive_loads
            .iter()
            .map(|id| total_voltage / table[id].resistance())
            .sum();
        summary.total_power = positive_loads
            .iter()
            .map(|id| total_voltage * total_voltage / table[id].resistance())
            .sum();

        // Every parallel branch sees the full source voltage.
        for id in &positive_loads {
            let resistance = table[id].resistance();
            per_component.insert(
                *id,
                OperatingMetrics {
                    current: total_voltage / resistance,
                    voltage: total_voltage,
                    power: total_voltage * total_voltage / resistance,
                },
            );
        }
    } else {
        if circuit_type != CircuitType::Series && circuit_type != CircuitType::SingleLoad {
            issues.push("Circuit contains mixed branches; using series approximation".to_string());
        }

        let equivalent_resistance: f64 = positive_loads
            .iter()
            .map(|id| table[id].resistance())
            .sum();
        if equivalent_resistance <= 0.0 {
            issues.push("Equivalent resistance is zero; cannot compute current".to_string());
            summary.status = CircuitStatus::Alert;
            summary.detail = "⚠️ Calculation error";
            return (summary, per_component, issues);
        }

        let total_current = total_voltage / equivalent_resistance;
        summary.total_resistance = equivalent_resistance;
        summary.total_current = total_current;
        summary.total_power = total_voltage * total_current;

        // The loop current flows through every load; drops split by R.
        for id in &positive_loads {
            let resistance = table[id].resistance();
            per_component.insert(
                *id,
                OperatingMetrics {
                    current: total_current,
                    voltage: total_current * resistance,
                    power: total_current * total_current * resistance,
                },
            );
        }
    }

    for id in batteries {
        let voltage = table[id].voltage();
        per_component.insert(
            *id,
            OperatingMetrics {
                current: summary.total_current,
                voltage,
                power: voltage * summary.total_current,
            },
        );
    }

    // Members without a resistance contribution (closed switches, ideal
    // meters) still carry the loop current.
    for id in group {
        per_component.entry(*id).or_insert(OperatingMetrics {
            current: summary.total_current,
            voltage: 0.0,
            power: 0.0,
        });
    }

    debug!(
        voltage = summary.total_voltage,
        current = summary.total_current,
        resistance = summary.total_resistance,
        "solved circuit metrics"
    );

    (summary, per_component, issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentKind;

    use approx::assert_relative_eq;

    fn component(id: u64, kind: ComponentKind) -> Component {
        Component::new(
            ComponentId(id),
            kind,
            format!("{} {id}", kind.label()),
            format!("{}{id}", kind.prefix()),
        )
    }

    fn table(components: &[Component]) -> HashMap<ComponentId, &Component> {
        components.iter().map(|c| (c.id, c)).collect()
    }

    #[test]
    fn test_single_load_ohms_law() {
        let components = vec![
            component(0, ComponentKind::Battery),
            component(1, ComponentKind::Resistor),
        ];
        let table = table(&components);
        let group = vec![ComponentId(0), ComponentId(1)];

        let (summary, per_component, issues) = solve(
            &group,
            &[ComponentId(0)],
            &[ComponentId(1)],
            CircuitType::SingleLoad,
            &table,
        );

        assert!(issues.is_empty());
        assert_eq!(summary.status, CircuitStatus::Closed);
        assert_relative_eq!(summary.total_current, 0.09);
        assert_relative_eq!(summary.total_power, 0.81);
        assert_relative_eq!(per_component[&ComponentId(1)].voltage, 9.0);
    }

    #[test]
    fn test_series_voltage_divider() {
        let mut components = vec![
            component(0, ComponentKind::Battery),
            component(1, ComponentKind::Resistor),
            component(2, ComponentKind::Resistor),
        ];
        components[2].resistance = 200.0;
        let table = table(&components);
        let group = vec![ComponentId(0), ComponentId(1), ComponentId(2)];

        let (summary, per_component, _) = solve(
            &group,
            &[ComponentId(0)],
            &[ComponentId(1), ComponentId(2)],
            CircuitType::Series,
            &table,
        );

        assert_relative_eq!(summary.total_resistance, 300.0);
        assert_relative_eq!(summary.total_current, 0.03);
        assert_relative_eq!(per_component[&ComponentId(1)].voltage, 3.0);
        assert_relative_eq!(per_component[&ComponentId(2)].voltage, 6.0);
        assert_relative_eq!(per_component[&ComponentId(1)].current, 0.03);
        assert_relative_eq!(per_component[&ComponentId(2)].current, 0.03);
    }

    #[test]
    fn test_parallel_branches() {
        let components = vec![
            component(0, ComponentKind::Battery),
            component(1, ComponentKind::Resistor),
            component(2, ComponentKind::Resistor),
        ];
        let table = table(&components);
        let group = vec![ComponentId(0), ComponentId(1), ComponentId(2)];

        let (summary, per_component, _) = solve(
            &group,
            &[ComponentId(0)],
            &[ComponentId(1), ComponentId(2)],
            CircuitType::Parallel,
            &table,
        );

        assert_relative_eq!(summary.total_resistance, 50.0);
        assert_relative_eq!(summary.total_current, 0.18);
        for id in [ComponentId(1), ComponentId(2)] {
            assert_relative_eq!(per_component[&id].current, 0.09);
            assert_relative_eq!(per_component[&id].voltage, 9.0);
        }
    }

    #[test]
    fn test_zero_resistance_load_is_a_short() {
        let mut components = vec![
            component(0, ComponentKind::Battery),
            component(1, ComponentKind::Resistor),
            component(2, ComponentKind::Resistor),
        ];
        components[2].resistance = 0.0;
        // A zero-ohm resistor is no longer a passive load, but the original
        // loads list may still carry it when it sits inside the loop.
        let table = table(&components);
        let group = vec![ComponentId(0), ComponentId(1), ComponentId(2)];

        let (summary, per_component, issues) = solve(
            &group,
            &[ComponentId(0)],
            &[ComponentId(1), ComponentId(2)],
            CircuitType::Series,
            &table,
        );

        assert_eq!(summary.status, CircuitStatus::Alert);
        assert_eq!(summary.detail, "⚠️ Short circuit detected");
        assert!(issues[0].contains("zero resistance"));
        let shorted = per_component[&ComponentId(2)];
        assert_eq!(shorted, OperatingMetrics::default());
        // The solver stops before computing anything else.
        assert!(!per_component.contains_key(&ComponentId(1)));
    }

    #[test]
    fn test_no_source_alerts() {
        let components = vec![component(1, ComponentKind::Resistor)];
        let table = table(&components);
        let group = vec![ComponentId(1)];

        let (summary, _, issues) = solve(&group, &[], &[ComponentId(1)], CircuitType::SingleLoad, &table);

        assert_eq!(summary.status, CircuitStatus::Alert);
        assert_eq!(summary.detail, "⚠️ Add an active battery");
        assert_eq!(issues, vec!["No active voltage source detected".to_string()]);
    }

    #[test]
    fn test_mixed_topology_notes_series_approximation() {
        let components = vec![
            component(0, ComponentKind::Battery),
            component(1, ComponentKind::Resistor),
        ];
        let table = table(&components);
        let group = vec![ComponentId(0), ComponentId(1)];

        let (_, _, issues) = solve(
            &group,
            &[ComponentId(0)],
            &[ComponentId(1)],
            CircuitType::Open,
            &table,
        );

        assert!(issues
            .iter()
            .any(|issue| issue.contains("series approximation")));
    }

    #[test]
    fn test_switch_member_defaults_to_loop_current() {
        let components = vec![
            component(0, ComponentKind::Battery),
            component(1, ComponentKind::Resistor),
            component(2, ComponentKind::Switch),
        ];
        let table = table(&components);
        let group = vec![ComponentId(0), ComponentId(1), ComponentId(2)];

        let (summary, per_component, _) = solve(
            &group,
            &[ComponentId(0)],
            &[ComponentId(1)],
            CircuitType::SingleLoad,
            &table,
        );

        let switch = per_component[&ComponentId(2)];
        assert_relative_eq!(switch.current, summary.total_current);
        assert_eq!(switch.voltage, 0.0);
        assert_eq!(switch.power, 0.0);
    }
}
