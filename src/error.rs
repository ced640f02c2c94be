//! Error types for the breadboard engine.
//!
//! Circuit analysis itself never fails: degenerate networks become `Alert`
//! statuses and diagnostic issue strings on the [`Analysis`] record. The
//! errors here cover the fallible edges of the crate - editor operations
//! referencing ids that no longer exist, and snapshot persistence.
//!
//! [`Analysis`]: crate::analysis::Analysis

use thiserror::Error;

use crate::component::ComponentId;
use crate::wire::WireId;

/// Result type alias using [`BreadboardError`].
pub type Result<T> = std::result::Result<T, BreadboardError>;

/// Unified error type for all breadboard operations.
#[derive(Error, Debug)]
pub enum BreadboardError {
    // ============ Editor Errors ============
    /// A component id that is not on the board.
    #[error("Component {0} not found on the board")]
    ComponentNotFound(ComponentId),

    /// A wire id that is not on the board.
    #[error("Wire {0} not found on the board")]
    WireNotFound(WireId),

    /// A connection point that does not exist on the wire.
    #[error("Wire {wire} has no connection point '{point}'")]
    PointNotFound { wire: WireId, point: String },

    // ============ Snapshot Errors ============
    /// Error reading a snapshot file.
    #[error("Failed to read snapshot '{path}': {source}")]
    SnapshotRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a snapshot file.
    #[error("Failed to write snapshot '{path}': {source}")]
    SnapshotWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot JSON that does not parse or serialize.
    #[error("Malformed snapshot document: {0}")]
    SnapshotFormat(#[from] serde_json::Error),

    /// A wire attachment referencing a component id missing from the document.
    #[error("Snapshot wire {wire_index} references unknown component id {component}")]
    SnapshotUnknownComponent { wire_index: usize, component: u64 },

    /// A wire link referencing a wire index missing from the document.
    #[error("Snapshot wire {wire_index} links to unknown wire index {target}")]
    SnapshotUnknownWire { wire_index: usize, target: usize },
}
