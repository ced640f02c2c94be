//! The breadboard: owned storage for components and wires plus the editor
//! operations that mutate them.
//!
//! Components and wires live in plain vectors and are addressed by stable
//! ids, never by index. Attachments adopt transitively across linked wire
//! endpoints so that a chain of wires hanging off one terminal behaves as a
//! single strand, matching what the analyzer's node resolver expects.

use std::collections::{BTreeMap, HashSet, VecDeque};

use tracing::debug;

use crate::analysis::{self, Analysis, CircuitStatus};
use crate::component::{Component, ComponentId, ComponentKind, OperatingMetrics, Side};
use crate::error::{BreadboardError, Result};
use crate::wire::{Attachment, PointId, Wire, WireId};

/// An editable board of components and wires.
#[derive(Debug, Default)]
pub struct Breadboard {
    components: Vec<Component>,
    wires: Vec<Wire>,
    next_component_id: u64,
    next_wire_id: u64,
    kind_counters: BTreeMap<&'static str, u64>,
    latest: Option<Analysis>,
}

impl Breadboard {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a board from loaded components and wires.
    ///
    /// Id counters resume past the highest loaded id, and label counters
    /// resume past the highest index parsed from each kind's code labels,
    /// so additions after a load never collide with loaded entries.
    pub(crate) fn from_parts(components: Vec<Component>, wires: Vec<Wire>) -> Self {
        let next_component_id = components.iter().map(|c| c.id.0 + 1).max().unwrap_or(0);
        let next_wire_id = wires.iter().map(|w| w.id.0 + 1).max().unwrap_or(0);

        let mut kind_counters: BTreeMap<&'static str, u64> = BTreeMap::new();
        for component in &components {
            let prefix = component.kind.prefix();
            let index = component
                .code_label
                .strip_prefix(prefix)
                .and_then(|rest| rest.parse::<u64>().ok())
                .unwrap_or(0);
            let counter = kind_counters.entry(component.kind.label()).or_insert(0);
            *counter = (*counter).max(index);
        }

        Self {
            components,
            wires,
            next_component_id,
            next_wire_id,
            kind_counters,
            latest: None,
        }
    }

    /// All components, in insertion order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// All wires, in insertion order.
    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    /// The record produced by the most recent [`Breadboard::analyze`] call.
    pub fn latest_analysis(&self) -> Option<&Analysis> {
        self.latest.as_ref()
    }

    /// Look up a component by id.
    pub fn component(&self, id: ComponentId) -> Result<&Component> {
        self.components
            .iter()
            .find(|c| c.id == id)
            .ok_or(BreadboardError::ComponentNotFound(id))
    }

    /// Look up a component by id, mutably.
    pub fn component_mut(&mut self, id: ComponentId) -> Result<&mut Component> {
        self.components
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(BreadboardError::ComponentNotFound(id))
    }

    /// Look up a wire by id.
    pub fn wire(&self, id: WireId) -> Result<&Wire> {
        self.wires
            .iter()
            .find(|w| w.id == id)
            .ok_or(BreadboardError::WireNotFound(id))
    }

    /// Look up a wire by id, mutably.
    pub fn wire_mut(&mut self, id: WireId) -> Result<&mut Wire> {
        self.wires
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(BreadboardError::WireNotFound(id))
    }

    /// Add a new component of the given kind with catalog defaults.
    ///
    /// Labels count per kind, so the second resistor becomes `Resistor 2`
    /// and `R2` no matter what was added in between.
    pub fn add_component(&mut self, kind: ComponentKind) -> ComponentId {
        let counter = self.kind_counters.entry(kind.label()).or_insert(0);
        *counter += 1;
        let index = *counter;

        let id = ComponentId(self.next_component_id);
        self.next_component_id += 1;

        let display_label = format!("{} {index}", kind.label());
        let code_label = format!("{}{index}", kind.prefix());
        debug!(%id, ?kind, label = %display_label, "add component");
        self.components
            .push(Component::new(id, kind, display_label, code_label));
        id
    }

    /// Add a new, fully disconnected wire.
    pub fn add_wire(&mut self) -> WireId {
        let id = WireId(self.next_wire_id);
        self.next_wire_id += 1;
        debug!(%id, "add wire");
        self.wires.push(Wire::new(id));
        id
    }

    /// Remove a component, detaching it from every wire.
    pub fn remove_component(&mut self, id: ComponentId) -> Result<()> {
        let index = self
            .components
            .iter()
            .position(|c| c.id == id)
            .ok_or(BreadboardError::ComponentNotFound(id))?;
        self.components.remove(index);
        for wire in &mut self.wires {
            wire.detach_component(id);
        }
        debug!(%id, "remove component");
        Ok(())
    }

    /// Remove a wire, clearing every link other wires hold to it.
    pub fn remove_wire(&mut self, id: WireId) -> Result<()> {
        let index = self
            .wires
            .iter()
            .position(|w| w.id == id)
            .ok_or(BreadboardError::WireNotFound(id))?;
        self.wires.remove(index);
        for wire in &mut self.wires {
            wire.unlink_wire(id);
        }
        debug!(%id, "remove wire");
        Ok(())
    }

    /// Attach a wire's connection point to a component terminal.
    ///
    /// The point is freed first, then the attachment propagates to any
    /// points still linked to it.
    pub fn attach(
        &mut self,
        wire: WireId,
        point: PointId,
        component: ComponentId,
        side: Side,
    ) -> Result<()> {
        self.component(component)?;
        self.detach(wire, point)?;

        let attachment = Attachment { component, side };
        self.point_mut(wire, point)?.attachment = Some(attachment);
        debug!(%wire, %point, %component, %side, "attach");
        self.propagate_attachment(wire, point, attachment)?;
        Ok(())
    }

    /// Link a wire's connection point to a point on another wire.
    ///
    /// If the target point is attached to a component, this point adopts
    /// that attachment and propagates it onward.
    pub fn link(
        &mut self,
        wire: WireId,
        point: PointId,
        other: WireId,
        other_point: PointId,
    ) -> Result<()> {
        if wire == other {
            return Ok(());
        }
        self.detach(wire, point)?;

        self.point_mut(other, other_point)?
            .links
            .insert((wire, point));
        self.point_mut(wire, point)?.links.insert((other, other_point));
        debug!(%wire, %point, %other, %other_point, "link");

        if let Some(attachment) = self.point_ref(other, other_point)?.attachment {
            self.point_mut(wire, point)?.attachment = Some(attachment);
            self.propagate_attachment(wire, point, attachment)?;
        }
        Ok(())
    }

    /// Free a connection point: drop its attachment and sever its links on
    /// both sides.
    pub fn detach(&mut self, wire: WireId, point: PointId) -> Result<()> {
        let links: Vec<_> = self.point_ref(wire, point)?.links.iter().copied().collect();
        for (other, other_point) in links {
            if let Ok(target) = self.point_mut(other, other_point) {
                target.links.remove(&(wire, point));
            }
        }
        let target = self.point_mut(wire, point)?;
        target.attachment = None;
        target.links.clear();
        Ok(())
    }

    /// Run a full analysis pass and apply its results to the board.
    ///
    /// Operating metrics and active flags are rewritten on every call, so
    /// the pass is idempotent for an unchanged board.
    pub fn analyze(&mut self) -> Analysis {
        for component in &mut self.components {
            component.reset_operating_metrics();
            component.active = false;
        }
        for wire in &mut self.wires {
            wire.active = false;
        }

        let outcome = analysis::analyze_circuit(&self.components, &self.wires);
        let mut record = outcome.analysis;

        if let Some(active) = &outcome.active_components {
            let fallback = OperatingMetrics {
                current: record.total_current,
                voltage: 0.0,
                power: 0.0,
            };
            for id in active {
                if let Ok(component) = self.component_mut(*id) {
                    let metrics = outcome.metrics.get(id).copied().unwrap_or(fallback);
                    component.update_operating_metrics(metrics);
                    component.active = true;
                }
            }
            if let Some(wires) = &outcome.active_wires {
                for id in wires {
                    if let Ok(wire) = self.wire_mut(*id) {
                        wire.active = true;
                    }
                }
            }
        } else if !self.components.is_empty() {
            self.refine_open_status(&mut record);
        }

        record.issues = analysis::dedupe_issues(std::mem::take(&mut record.issues));
        self.latest = Some(record.clone());
        record
    }

    /// Replace a generic open verdict with a concrete hint about what is
    /// missing from the board.
    fn refine_open_status(&self, record: &mut Analysis) {
        let has_battery = self
            .components
            .iter()
            .any(|c| c.is_source() && c.voltage() > 0.0);
        let has_load = self.components.iter().any(|c| {
            matches!(
                c.kind,
                ComponentKind::Resistor
                    | ComponentKind::Bulb
                    | ComponentKind::Led
                    | ComponentKind::Diode
            ) && c.resistance() > 0.0
        });
        let open_switches: Vec<&Component> = self
            .components
            .iter()
            .filter(|c| c.is_switch() && !c.is_switch_closed())
            .collect();

        if !open_switches.is_empty() && has_battery && has_load {
            let mut names = open_switches
                .iter()
                .take(2)
                .map(|c| c.display_label.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            if open_switches.len() > 2 {
                names.push_str(&format!(" +{} more", open_switches.len() - 2));
            }
            record.status = CircuitStatus::Alert;
            record.status_detail = format!("⚠️ Close {names} to complete the circuit");
            record
                .issues
                .push(format!("{names} open; close to complete the circuit"));
        } else if has_battery && !has_load {
            record.status = CircuitStatus::Alert;
            record.status_detail = "⚠️ Add a resistor or bulb to complete the circuit".to_string();
            record
                .issues
                .push("Add a resistor or bulb to complete the circuit".to_string());
        } else if has_load && !has_battery {
            record.status = CircuitStatus::Alert;
            record.status_detail = "⚠️ Add a battery to power the circuit".to_string();
            record
                .issues
                .push("Add a battery to power the circuit".to_string());
        } else if self.components.len() >= 2 {
            record.status = CircuitStatus::Alert;
            record.status_detail =
                "⚠️ Connect all terminals with wires to close the loop".to_string();
            record
                .issues
                .push("Connect all terminals with wires to close the loop".to_string());
        }
    }

    /// Push an attachment outward across linked connection points.
    ///
    /// Each linked point adopts the attachment, replacing whatever it held,
    /// and passes it along its own links. The starting point is marked
    /// visited so a cycle of links terminates.
    fn propagate_attachment(
        &mut self,
        wire: WireId,
        point: PointId,
        attachment: Attachment,
    ) -> Result<()> {
        let mut visited: HashSet<(WireId, PointId)> = HashSet::new();
        visited.insert((wire, point));
        let mut queue: VecDeque<(WireId, PointId)> = VecDeque::new();
        queue.push_back((wire, point));

        while let Some((current_wire, current_point)) = queue.pop_front() {
            let links: Vec<_> = self
                .point_ref(current_wire, current_point)?
                .links
                .iter()
                .copied()
                .collect();
            for link in links {
                if !visited.insert(link) {
                    continue;
                }
                self.point_mut(link.0, link.1)?.attachment = Some(attachment);
                queue.push_back(link);
            }
        }
        Ok(())
    }

    fn point_ref(&self, wire: WireId, point: PointId) -> Result<&crate::wire::ConnectionPoint> {
        self.wire(wire)?
            .point(point)
            .ok_or_else(|| BreadboardError::PointNotFound {
                wire,
                point: point.to_string(),
            })
    }

    fn point_mut(
        &mut self,
        wire: WireId,
        point: PointId,
    ) -> Result<&mut crate::wire::ConnectionPoint> {
        self.wire_mut(wire)?
            .point_mut(point)
            .ok_or_else(|| BreadboardError::PointNotFound {
                wire,
                point: point.to_string(),
            })
    }
}
