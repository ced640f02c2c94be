//! Wires and their connection points.
//!
//! A wire always has two endpoints (`a` and `b`) and may grow intermediate
//! joints. Every endpoint or joint is a connection point that can hold at
//! most one component attachment and any number of links to connection
//! points on other wires. Linked points form one contiguous electrical
//! strand; the node resolver unions strands into electrical nodes.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::component::{ComponentId, Side};

/// A unique identifier for a wire on the board.
///
/// Ids are assigned monotonically by the board and stay stable across
/// deletions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireId(pub u64);

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{}", self.0)
    }
}

/// Address of a connection point on a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointId {
    /// The fixed `a` endpoint.
    A,
    /// The fixed `b` endpoint.
    B,
    /// An intermediate joint, by index.
    Joint(usize),
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointId::A => write!(f, "a"),
            PointId::B => write!(f, "b"),
            PointId::Joint(i) => write!(f, "joint{i}"),
        }
    }
}

/// A component terminal a connection point is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Attachment {
    pub component: ComponentId,
    pub side: Side,
}

/// A link from one wire's connection point to another wire's.
pub type Link = (WireId, PointId);

/// One endpoint or joint on a wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionPoint {
    /// The component terminal this point is attached to, if any.
    pub attachment: Option<Attachment>,
    /// Connection points on other wires this point is linked to.
    pub links: BTreeSet<Link>,
}

impl ConnectionPoint {
    /// Whether the point holds neither an attachment nor any link.
    pub fn is_free(&self) -> bool {
        self.attachment.is_none() && self.links.is_empty()
    }
}

/// A wire on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    pub id: WireId,
    /// Whether the wire carried the last active loop.
    pub active: bool,
    end_a: ConnectionPoint,
    end_b: ConnectionPoint,
    joints: Vec<ConnectionPoint>,
}

impl Wire {
    /// Create a wire with both endpoints unattached and no joints.
    pub fn new(id: WireId) -> Self {
        Self {
            id,
            active: false,
            end_a: ConnectionPoint::default(),
            end_b: ConnectionPoint::default(),
            joints: Vec::new(),
        }
    }

    /// Add an intermediate joint and return its address.
    pub fn add_joint(&mut self) -> PointId {
        self.joints.push(ConnectionPoint::default());
        PointId::Joint(self.joints.len() - 1)
    }

    /// Look up a connection point.
    pub fn point(&self, point: PointId) -> Option<&ConnectionPoint> {
        match point {
            PointId::A => Some(&self.end_a),
            PointId::B => Some(&self.end_b),
            PointId::Joint(i) => self.joints.get(i),
        }
    }

    /// Look up a connection point mutably.
    pub fn point_mut(&mut self, point: PointId) -> Option<&mut ConnectionPoint> {
        match point {
            PointId::A => Some(&mut self.end_a),
            PointId::B => Some(&mut self.end_b),
            PointId::Joint(i) => self.joints.get_mut(i),
        }
    }

    /// Iterate connection points in fixed order: `a`, `b`, then joints.
    pub fn points(&self) -> impl Iterator<Item = (PointId, &ConnectionPoint)> {
        [(PointId::A, &self.end_a), (PointId::B, &self.end_b)]
            .into_iter()
            .chain(
                self.joints
                    .iter()
                    .enumerate()
                    .map(|(i, p)| (PointId::Joint(i), p)),
            )
    }

    /// Iterate connection point addresses in fixed order.
    pub fn point_ids(&self) -> Vec<PointId> {
        self.points().map(|(id, _)| id).collect()
    }

    /// Number of connection points holding an attachment.
    pub fn attachment_count(&self) -> usize {
        self.points().filter(|(_, p)| p.attachment.is_some()).count()
    }

    /// Total number of links across all connection points.
    pub fn link_count(&self) -> usize {
        self.points().map(|(_, p)| p.links.len()).sum()
    }

    /// Attachments plus links; zero means the wire floats entirely.
    pub fn connection_count(&self) -> usize {
        self.attachment_count() + self.link_count()
    }

    /// Components attached anywhere on this wire, in point order.
    pub fn attached_components(&self) -> Vec<ComponentId> {
        self.points()
            .filter_map(|(_, p)| p.attachment.map(|a| a.component))
            .collect()
    }

    /// Drop every attachment referencing the given component.
    ///
    /// Returns true when anything was removed.
    pub fn detach_component(&mut self, component: ComponentId) -> bool {
        let mut updated = false;
        for point in self.points_mut() {
            if point
                .attachment
                .is_some_and(|a| a.component == component)
            {
                point.attachment = None;
                updated = true;
            }
        }
        updated
    }

    /// Drop every link pointing at the given wire.
    pub fn unlink_wire(&mut self, wire: WireId) {
        for point in self.points_mut() {
            point.links.retain(|(target, _)| *target != wire);
        }
    }

    fn points_mut(&mut self) -> impl Iterator<Item = &mut ConnectionPoint> {
        [&mut self.end_a, &mut self.end_b]
            .into_iter()
            .chain(self.joints.iter_mut())
    }
}
