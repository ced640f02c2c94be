//! JSON snapshot persistence.
//!
//! A snapshot captures the editable state of a board: every component's
//! configuration and every wire's attachments and links. Transient state
//! (operating metrics, active flags, the latest analysis) is not stored;
//! running [`Breadboard::analyze`] after a load reproduces it.
//!
//! Wires are stored positionally and links reference wires by array index,
//! so wire ids are reassigned densely on load. Component ids are preserved
//! as written.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::Breadboard;
use crate::component::{Component, ComponentId, ComponentKind, Side};
use crate::error::{BreadboardError, Result};
use crate::wire::{Attachment, PointId, Wire, WireId};

/// Current snapshot document version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotDoc {
    version: u32,
    components: Vec<ComponentDoc>,
    wires: Vec<WireDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ComponentDoc {
    id: u64,
    kind: ComponentKind,
    display_label: String,
    code_label: String,
    #[serde(default)]
    voltage: f64,
    #[serde(default)]
    resistance: f64,
    #[serde(default = "default_true")]
    switch_closed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireDoc {
    #[serde(default)]
    joints: usize,
    /// Only points holding an attachment or at least one link are listed.
    #[serde(default)]
    points: Vec<PointDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PointDoc {
    point: PointId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attachment: Option<AttachmentDoc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    links: Vec<LinkDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AttachmentDoc {
    component: u64,
    side: Side,
}

#[derive(Debug, Serialize, Deserialize)]
struct LinkDoc {
    /// Index of the target wire in the document's `wires` array.
    wire: usize,
    point: PointId,
}

fn default_true() -> bool {
    true
}

fn to_document(board: &Breadboard) -> SnapshotDoc {
    let wire_index: std::collections::HashMap<WireId, usize> = board
        .wires()
        .iter()
        .enumerate()
        .map(|(index, wire)| (wire.id, index))
        .collect();

    let components = board
        .components()
        .iter()
        .map(|component| ComponentDoc {
            id: component.id.0,
            kind: component.kind,
            display_label: component.display_label.clone(),
            code_label: component.code_label.clone(),
            voltage: component.voltage,
            resistance: component.resistance,
            switch_closed: component.switch_closed,
        })
        .collect();

    let wires = board
        .wires()
        .iter()
        .map(|wire| {
            let points = wire
                .points()
                .filter(|(_, p)| !p.is_free())
                .map(|(point, p)| PointDoc {
                    point,
                    attachment: p.attachment.map(|a| AttachmentDoc {
                        component: a.component.0,
                        side: a.side,
                    }),
                    links: p
                        .links
                        .iter()
                        .filter_map(|(target, target_point)| {
                            wire_index.get(target).map(|&index| LinkDoc {
                                wire: index,
                                point: *target_point,
                            })
                        })
                        .collect(),
                })
                .collect();
            WireDoc {
                joints: wire.point_ids().len() - 2,
                points,
            }
        })
        .collect();

    SnapshotDoc {
        version: SNAPSHOT_VERSION,
        components,
        wires,
    }
}

fn from_document(doc: SnapshotDoc) -> Result<Breadboard> {
    let mut components = Vec::with_capacity(doc.components.len());
    for entry in doc.components {
        let mut component = Component::new(
            ComponentId(entry.id),
            entry.kind,
            entry.display_label,
            entry.code_label,
        );
        component.voltage = entry.voltage;
        component.resistance = entry.resistance;
        component.switch_closed = entry.switch_closed;
        components.push(component);
    }
    let known: std::collections::HashSet<ComponentId> =
        components.iter().map(|c| c.id).collect();

    let wire_count = doc.wires.len();
    let mut wires = Vec::with_capacity(wire_count);
    for (index, entry) in doc.wires.into_iter().enumerate() {
        let mut wire = Wire::new(WireId(index as u64));
        for _ in 0..entry.joints {
            wire.add_joint();
        }
        for point_doc in entry.points {
            let point = wire.point_mut(point_doc.point).ok_or_else(|| {
                BreadboardError::PointNotFound {
                    wire: WireId(index as u64),
                    point: point_doc.point.to_string(),
                }
            })?;
            if let Some(attachment) = point_doc.attachment {
                let component = ComponentId(attachment.component);
                if !known.contains(&component) {
                    return Err(BreadboardError::SnapshotUnknownComponent {
                        wire_index: index,
                        component: attachment.component,
                    });
                }
                point.attachment = Some(Attachment {
                    component,
                    side: attachment.side,
                });
            }
            for link in point_doc.links {
                if link.wire >= wire_count {
                    return Err(BreadboardError::SnapshotUnknownWire {
                        wire_index: index,
                        target: link.wire,
                    });
                }
                point.links.insert((WireId(link.wire as u64), link.point));
            }
        }
        wires.push(wire);
    }

    Ok(Breadboard::from_parts(components, wires))
}

/// Serialize a board to a JSON string.
pub fn to_json(board: &Breadboard) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_document(board))?)
}

/// Rebuild a board from a JSON string.
pub fn from_json(json: &str) -> Result<Breadboard> {
    from_document(serde_json::from_str(json)?)
}

/// Write a board snapshot to a file.
pub fn save(board: &Breadboard, path: &Path) -> Result<()> {
    let json = to_json(board)?;
    fs::write(path, json).map_err(|source| BreadboardError::SnapshotWrite {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), "snapshot saved");
    Ok(())
}

/// Load a board snapshot from a file.
pub fn load(path: &Path) -> Result<Breadboard> {
    let json = fs::read_to_string(path).map_err(|source| BreadboardError::SnapshotRead {
        path: path.display().to_string(),
        source,
    })?;
    let board = from_json(&json)?;
    info!(
        path = %path.display(),
        components = board.components().len(),
        wires = board.wires().len(),
        "snapshot loaded"
    );
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::CircuitStatus;

    fn sample_board() -> Breadboard {
        let mut board = Breadboard::new();
        let battery = board.add_component(ComponentKind::Battery);
        let resistor = board.add_component(ComponentKind::Resistor);
        board.component_mut(resistor).unwrap().resistance = 220.0;
        let w1 = board.add_wire();
        let w2 = board.add_wire();
        board.attach(w1, PointId::A, battery, Side::Right).unwrap();
        board.attach(w1, PointId::B, resistor, Side::Left).unwrap();
        board.attach(w2, PointId::A, resistor, Side::Right).unwrap();
        board.attach(w2, PointId::B, battery, Side::Left).unwrap();
        board
    }

    #[test]
    fn test_json_round_trip_preserves_the_circuit() {
        let mut original = sample_board();
        let before = original.analyze();

        let json = to_json(&original).unwrap();
        let mut restored = from_json(&json).unwrap();
        assert_eq!(restored.components().len(), 2);
        assert_eq!(restored.components()[1].resistance, 220.0);
        assert_eq!(restored.components()[1].code_label, "R1");

        let after = restored.analyze();
        assert_eq!(after, before);
        assert_eq!(after.status, CircuitStatus::Closed);
    }

    #[test]
    fn test_file_round_trip() {
        let board = sample_board();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");

        save(&board, &path).unwrap();
        let restored = load(&path).unwrap();
        assert_eq!(restored.components().len(), board.components().len());
        assert_eq!(restored.wires().len(), board.wires().len());
    }

    #[test]
    fn test_loaded_board_extends_labels_without_collision() {
        let json = to_json(&sample_board()).unwrap();
        let mut board = from_json(&json).unwrap();
        let second = board.add_component(ComponentKind::Resistor);
        assert_eq!(board.component(second).unwrap().code_label, "R2");
    }

    #[test]
    fn test_unknown_component_reference_is_rejected() {
        let json = r#"{
            "version": 1,
            "components": [],
            "wires": [{
                "joints": 0,
                "points": [{
                    "point": "a",
                    "attachment": {"component": 5, "side": "left"}
                }]
            }]
        }"#;
        assert!(matches!(
            from_json(json),
            Err(BreadboardError::SnapshotUnknownComponent {
                wire_index: 0,
                component: 5
            })
        ));
    }

    #[test]
    fn test_unknown_wire_link_is_rejected() {
        let json = r#"{
            "version": 1,
            "components": [],
            "wires": [{
                "joints": 0,
                "points": [{
                    "point": "b",
                    "links": [{"wire": 9, "point": "a"}]
                }]
            }]
        }"#;
        assert!(matches!(
            from_json(json),
            Err(BreadboardError::SnapshotUnknownWire {
                wire_index: 0,
                target: 9
            })
        ));
    }

    #[test]
    fn test_malformed_json_is_a_format_error() {
        assert!(matches!(
            from_json("{not json"),
            Err(BreadboardError::SnapshotFormat(_))
        ));
    }
}
