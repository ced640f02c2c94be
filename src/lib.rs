//! # Breadboard Core
//!
//! The circuit analysis engine behind an educational breadboard builder.
//!
//! This library provides:
//! - An arena-based model of components and wires ([`Breadboard`])
//! - Electrical node resolution via chained union-find passes
//! - Detection of the active (closed, powered) loop and its topology
//! - Ohm's-law metrics for the loop and every component in it
//! - Non-fatal diagnostic issues for every degenerate network
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`board`] - Breadboard arena, editor operations, analyze-and-apply
//! - [`component`] - Component model and the kind catalog
//! - [`wire`] - Wires, connection points, attachments, and links
//! - [`analysis`] - The analysis engine (node resolver, loop selector,
//!   topology classifier, metrics solver, path describer)
//! - [`snapshot`] - JSON persistence of a board
//!
//! ## Usage
//!
//! ```
//! use breadboard_core::{Breadboard, CircuitStatus, ComponentKind, PointId, Side};
//!
//! let mut board = Breadboard::new();
//! let battery = board.add_component(ComponentKind::Battery);
//! let resistor = board.add_component(ComponentKind::Resistor);
//! let w1 = board.add_wire();
//! let w2 = board.add_wire();
//! board.attach(w1, PointId::A, battery, Side::Left).unwrap();
//! board.attach(w1, PointId::B, resistor, Side::Left).unwrap();
//! board.attach(w2, PointId::A, resistor, Side::Right).unwrap();
//! board.attach(w2, PointId::B, battery, Side::Right).unwrap();
//!
//! let analysis = board.analyze();
//! assert_eq!(analysis.status, CircuitStatus::Closed);
//! ```
//!
//! ## Analysis Method
//!
//! Every pass runs the same fixed pipeline over the full component and wire
//! list:
//!
//! 1. Union wires that link to each other into contiguous strands, then
//!    union the component terminals each strand touches into electrical
//!    nodes.
//! 2. Derive component adjacency from shared nodes and flood-fill for the
//!    first connected group that has a source, a load, closed switches, and
//!    fully wired terminals.
//! 3. Classify the group (Single Load / Series / Parallel) and solve it in
//!    closed form: series resistances sum, parallel resistances combine by
//!    reciprocal sum.
//!
//! Degenerate networks never fail a pass; they produce an `Alert` status
//! and entries in the issue list instead.

pub mod analysis;
pub mod board;
pub mod component;
pub mod error;
pub mod snapshot;
pub mod wire;

// Re-export main types for convenience
pub use analysis::{Analysis, CircuitStatus, CircuitType};
pub use board::Breadboard;
pub use component::{Component, ComponentId, ComponentKind, OperatingMetrics, Side};
pub use error::{BreadboardError, Result};
pub use wire::{PointId, Wire, WireId};

/// Default battery voltage in volts.
pub const DEFAULT_BATTERY_VOLTAGE: f64 = 9.0;

/// Default resistor value in ohms.
pub const DEFAULT_RESISTOR_RESISTANCE: f64 = 100.0;

/// Default light bulb filament resistance in ohms.
pub const DEFAULT_BULB_RESISTANCE: f64 = 150.0;
