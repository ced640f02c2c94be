//! Component model: the kind catalog and per-component state.
//!
//! A component's `resistance` and `voltage` are configuration owned by the
//! editor. The operating metrics (current, voltage drop, power) are
//! transient: reset to zero at the start of every analysis pass and written
//! back by the metrics solver, never persisted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_BATTERY_VOLTAGE, DEFAULT_BULB_RESISTANCE, DEFAULT_RESISTOR_RESISTANCE};

/// A unique identifier for a component on the board.
///
/// Ids are assigned monotonically by the board and stay stable across
/// deletions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub u64);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// The side of a component a wire terminal attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Top => "top",
            Side::Bottom => "bottom",
        };
        write!(f, "{name}")
    }
}

/// The fixed set of component kinds the engine understands.
///
/// Every accessor below matches exhaustively so that a new kind is forced
/// through the resolver, selector, and solver rules at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Battery,
    Resistor,
    Bulb,
    Led,
    Diode,
    Capacitor,
    Switch,
    SwitchSpst,
    SwitchSpdt,
    Ammeter,
    Voltmeter,
    Ground,
    /// A wire segment placed as a block component.
    Wire,
}

impl ComponentKind {
    /// Human-readable catalog label.
    pub fn label(&self) -> &'static str {
        match self {
            ComponentKind::Battery => "Battery",
            ComponentKind::Resistor => "Resistor",
            ComponentKind::Bulb => "Light Bulb",
            ComponentKind::Led => "LED",
            ComponentKind::Diode => "Diode",
            ComponentKind::Capacitor => "Capacitor",
            ComponentKind::Switch => "Switch",
            ComponentKind::SwitchSpst => "Switch (SPST)",
            ComponentKind::SwitchSpdt => "Switch (SPDT)",
            ComponentKind::Ammeter => "Ammeter",
            ComponentKind::Voltmeter => "Voltmeter",
            ComponentKind::Ground => "Ground",
            ComponentKind::Wire => "Wire",
        }
    }

    /// Short prefix used to build code labels like `R1` or `B2`.
    pub fn prefix(&self) -> &'static str {
        match self {
            ComponentKind::Battery => "B",
            ComponentKind::Resistor => "R",
            ComponentKind::Bulb => "L",
            ComponentKind::Led => "D",
            ComponentKind::Diode => "D",
            ComponentKind::Capacitor => "C",
            ComponentKind::Switch | ComponentKind::SwitchSpst | ComponentKind::SwitchSpdt => "S",
            ComponentKind::Ammeter => "A",
            ComponentKind::Voltmeter => "V",
            ComponentKind::Ground => "G",
            ComponentKind::Wire => "W",
        }
    }

    /// Catalog default resistance in ohms.
    pub fn default_resistance(&self) -> f64 {
        match self {
            ComponentKind::Resistor => DEFAULT_RESISTOR_RESISTANCE,
            ComponentKind::Bulb => DEFAULT_BULB_RESISTANCE,
            ComponentKind::Battery
            | ComponentKind::Led
            | ComponentKind::Diode
            | ComponentKind::Capacitor
            | ComponentKind::Switch
            | ComponentKind::SwitchSpst
            | ComponentKind::SwitchSpdt
            | ComponentKind::Ammeter
            | ComponentKind::Voltmeter
            | ComponentKind::Ground
            | ComponentKind::Wire => 0.0,
        }
    }

    /// Catalog default source voltage in volts.
    pub fn default_voltage(&self) -> f64 {
        match self {
            ComponentKind::Battery => DEFAULT_BATTERY_VOLTAGE,
            ComponentKind::Resistor
            | ComponentKind::Bulb
            | ComponentKind::Led
            | ComponentKind::Diode
            | ComponentKind::Capacitor
            | ComponentKind::Switch
            | ComponentKind::SwitchSpst
            | ComponentKind::SwitchSpdt
            | ComponentKind::Ammeter
            | ComponentKind::Voltmeter
            | ComponentKind::Ground
            | ComponentKind::Wire => 0.0,
        }
    }

    /// Whether this kind is a switch variant.
    pub fn is_switch(&self) -> bool {
        matches!(
            self,
            ComponentKind::Switch | ComponentKind::SwitchSpst | ComponentKind::SwitchSpdt
        )
    }

    /// Whether this kind is treated as a resistive load by the analyzer
    /// (it still needs a positive resistance to actually count as one).
    pub fn is_load_kind(&self) -> bool {
        matches!(
            self,
            ComponentKind::Resistor
                | ComponentKind::Bulb
                | ComponentKind::Led
                | ComponentKind::Diode
                | ComponentKind::Ammeter
                | ComponentKind::Voltmeter
        )
    }

    /// Number of wired terminals this kind needs before it can join a loop.
    pub fn required_terminals(&self) -> usize {
        match self {
            ComponentKind::Ground => 1,
            ComponentKind::Battery
            | ComponentKind::Resistor
            | ComponentKind::Bulb
            | ComponentKind::Led
            | ComponentKind::Diode
            | ComponentKind::Capacitor
            | ComponentKind::Switch
            | ComponentKind::SwitchSpst
            | ComponentKind::SwitchSpdt
            | ComponentKind::Ammeter
            | ComponentKind::Voltmeter
            | ComponentKind::Wire => 2,
        }
    }
}

/// Transient electrical quantities computed for a component each pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatingMetrics {
    /// Current through the component in amperes.
    pub current: f64,
    /// Voltage across the component in volts.
    pub voltage: f64,
    /// Power dissipated (or delivered) in watts.
    pub power: f64,
}

impl OperatingMetrics {
    /// Build a metrics triple, clamping each quantity at zero.
    pub fn new(current: f64, voltage: f64, power: f64) -> Self {
        Self {
            current: current.max(0.0),
            voltage: voltage.max(0.0),
            power: power.max(0.0),
        }
    }
}

/// A discrete component on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: ComponentId,
    pub kind: ComponentKind,
    /// Label shown in diagnostics, e.g. `"Resistor 1"`.
    pub display_label: String,
    /// Short label used in path descriptions, e.g. `"R1"`.
    pub code_label: String,
    /// Configured resistance in ohms.
    pub resistance: f64,
    /// Configured source voltage in volts (nonzero only for batteries).
    pub voltage: f64,
    /// Contact state, meaningful only for switch kinds.
    pub switch_closed: bool,
    /// Metrics from the most recent analysis pass.
    pub metrics: OperatingMetrics,
    /// Whether the component was part of the last active loop.
    pub active: bool,
}

impl Component {
    /// Create a component with the catalog defaults for its kind.
    pub fn new(
        id: ComponentId,
        kind: ComponentKind,
        display_label: String,
        code_label: String,
    ) -> Self {
        Self {
            id,
            kind,
            display_label,
            code_label,
            resistance: kind.default_resistance(),
            voltage: kind.default_voltage(),
            switch_closed: true,
            metrics: OperatingMetrics::default(),
            active: false,
        }
    }

    /// Effective resistance seen by the analyzer.
    pub fn resistance(&self) -> f64 {
        self.resistance
    }

    /// Source voltage: batteries report their configured voltage, every
    /// other kind reports zero.
    pub fn voltage(&self) -> f64 {
        match self.kind {
            ComponentKind::Battery => self.voltage,
            _ => 0.0,
        }
    }

    /// Whether the component is a voltage source.
    pub fn is_source(&self) -> bool {
        self.kind == ComponentKind::Battery
    }

    /// Whether the component is a switch variant.
    pub fn is_switch(&self) -> bool {
        self.kind.is_switch()
    }

    /// Switch contact state. Non-switch kinds always conduct.
    pub fn is_switch_closed(&self) -> bool {
        !self.is_switch() || self.switch_closed
    }

    /// Whether the component behaves as a passive load in analysis.
    ///
    /// Load kinds qualify when their resistance is positive; a battery never
    /// does; anything else counts only if it carries a positive resistance.
    pub fn is_passive_load(&self) -> bool {
        if self.kind.is_load_kind() {
            return self.resistance() > 0.0;
        }
        if self.is_source() {
            return false;
        }
        self.resistance() > 0.0
    }

    /// Number of wired terminals required before this component can join a
    /// loop.
    pub fn required_terminals(&self) -> usize {
        self.kind.required_terminals()
    }

    /// Zero out the transient metrics ahead of an analysis pass.
    pub fn reset_operating_metrics(&mut self) {
        self.metrics = OperatingMetrics::default();
    }

    /// Apply solver output, clamping each quantity at zero.
    pub fn update_operating_metrics(&mut self, metrics: OperatingMetrics) {
        self.metrics = OperatingMetrics::new(metrics.current, metrics.voltage, metrics.power);
    }
}
