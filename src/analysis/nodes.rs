//! Electrical node resolution and component adjacency.
//!
//! Two chained union-find passes reconstruct the topology:
//!
//! 1. Wires whose connection points link to each other are unioned into
//!    **wire clusters** - maximal contiguous strands of wire.
//! 2. Every component terminal attached anywhere in a cluster is unioned
//!    into one **electrical node** - the equivalence class of terminals
//!    connected with no intervening component.
//!
//! Shared nodes then induce the component adjacency relation that the
//! active-loop selector flood-fills. Connectivity diagnostics (floating
//! wires, under-connected terminals, open switches) are raised here; they
//! are informational and never block the pass.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use tracing::debug;

use crate::component::{Component, ComponentId};
use crate::wire::{Attachment, Wire, WireId};

use super::union_find::{KeyedUnionFind, UnionFind};

/// Identifier of a resolved electrical node, dense and deterministic for a
/// given attachment/link topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetId(pub usize);

impl fmt::Display for NetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// One maximal strand of linked wires.
#[derive(Debug, Clone, Default)]
pub struct WireCluster {
    /// Member wires in input order.
    pub wires: Vec<WireId>,
    /// Components attached anywhere in the strand.
    pub components: BTreeSet<ComponentId>,
}

/// Output of node resolution, consumed by the rest of the pipeline.
#[derive(Debug, Clone)]
pub struct NodeResolution {
    /// Components sharing at least one electrical node, per component.
    pub adjacency: BTreeMap<ComponentId, BTreeSet<ComponentId>>,
    /// How many of each component's terminals are actually wired.
    pub terminal_counts: BTreeMap<ComponentId, usize>,
    /// Electrical nodes touching each component, in discovery order.
    pub component_nodes: BTreeMap<ComponentId, Vec<NetId>>,
    /// Wire clusters in first-seen wire order.
    pub clusters: Vec<WireCluster>,
    /// Cluster index for every wire.
    pub wire_cluster: HashMap<WireId, usize>,
    /// Connectivity diagnostics, in wire order then component order.
    pub issues: Vec<String>,
}

/// Resolve electrical nodes and derive the component adjacency graph.
pub fn resolve(components: &[Component], wires: &[Wire]) -> NodeResolution {
    let wire_index: HashMap<WireId, usize> = wires
        .iter()
        .enumerate()
        .map(|(index, wire)| (wire.id, index))
        .collect();

    let mut wire_sets = UnionFind::new(wires.len());
    let mut terminal_counts: BTreeMap<ComponentId, usize> =
        components.iter().map(|c| (c.id, 0)).collect();
    let mut issues = Vec::new();

    for (index, wire) in wires.iter().enumerate() {
        for (_, point) in wire.points() {
            for (linked, _) in &point.links {
                if let Some(&other) = wire_index.get(linked) {
                    wire_sets.union(index, other);
                }
            }
            if let Some(attachment) = point.attachment {
                *terminal_counts.entry(attachment.component).or_insert(0) += 1;
            }
        }

        match wire.connection_count() {
            0 => issues.push("Wire with no connections detected".to_string()),
            1 => issues.push("Wire with a floating endpoint detected".to_string()),
            _ => {}
        }
    }

    // Group wires into clusters, ordered by first member.
    let mut cluster_of_root: HashMap<usize, usize> = HashMap::new();
    let mut clusters: Vec<WireCluster> = Vec::new();
    let mut wire_cluster: HashMap<WireId, usize> = HashMap::new();
    for (index, wire) in wires.iter().enumerate() {
        let root = wire_sets.find(index);
        let cluster_index = *cluster_of_root.entry(root).or_insert_with(|| {
            clusters.push(WireCluster::default());
            clusters.len() - 1
        });
        clusters[cluster_index].wires.push(wire.id);
        wire_cluster.insert(wire.id, cluster_index);
    }

    // Union every terminal reachable within a cluster against the first
    // one, bounding the work to one union per terminal.
    let mut terminal_sets: KeyedUnionFind<Attachment> = KeyedUnionFind::new();
    for cluster in &mut clusters {
        let mut terminals: Vec<Attachment> = Vec::new();
        for wire_id in &cluster.wires {
            let wire = &wires[wire_index[wire_id]];
            for (_, point) in wire.points() {
                if let Some(attachment) = point.attachment {
                    terminals.push(attachment);
                    cluster.components.insert(attachment.component);
                }
            }
        }
        if let Some((&base, rest)) = terminals.split_first() {
            if rest.is_empty() {
                // A lone terminal still becomes a (singleton) node.
                terminal_sets.find(base);
            }
            for &terminal in rest {
                terminal_sets.union(base, terminal);
            }
        }
    }

    // Resolve union-find roots into dense node ids, in the order terminals
    // were first seen, and group components by node.
    let mut net_of_root: HashMap<usize, NetId> = HashMap::new();
    let mut node_members: BTreeMap<NetId, BTreeSet<ComponentId>> = BTreeMap::new();
    let mut component_nodes: BTreeMap<ComponentId, Vec<NetId>> =
        components.iter().map(|c| (c.id, Vec::new())).collect();
    let terminals: Vec<Attachment> = terminal_sets.keys().to_vec();
    for terminal in terminals {
        let root = terminal_sets.find(terminal);
        let next = NetId(net_of_root.len());
        let net = *net_of_root.entry(root).or_insert(next);
        node_members.entry(net).or_default().insert(terminal.component);
        let nodes = component_nodes.entry(terminal.component).or_default();
        if !nodes.contains(&net) {
            nodes.push(net);
        }
    }

    // Components sharing a node become mutually adjacent.
    let mut adjacency: BTreeMap<ComponentId, BTreeSet<ComponentId>> =
        components.iter().map(|c| (c.id, BTreeSet::new())).collect();
    for members in node_members.values() {
        if members.len() < 2 {
            continue;
        }
        let members: Vec<ComponentId> = members.iter().copied().collect();
        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                adjacency.entry(members[i]).or_default().insert(members[j]);
                adjacency.entry(members[j]).or_default().insert(members[i]);
            }
        }
    }

    // Per-component connectivity diagnostics, in input order.
    for component in components {
        let connected = terminal_counts.get(&component.id).copied().unwrap_or(0);
        let required = component.required_terminals();
        if connected < required {
            issues.push(format!(
                "{}: {}/{} terminals connected",
                component.display_label, connected, required
            ));
        }
        if component.is_switch() && !component.is_switch_closed() {
            issues.push(format!(
                "{} is open; close it to complete the circuit",
                component.display_label
            ));
        }
    }

    debug!(
        wires = wires.len(),
        clusters = clusters.len(),
        nodes = node_members.len(),
        "resolved electrical nodes"
    );

    NodeResolution {
        adjacency,
        terminal_counts,
        component_nodes,
        clusters,
        wire_cluster,
        issues,
    }
}
