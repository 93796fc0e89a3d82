//! # lane-graph: Lane Network Model for Driving Ground Truth
//!
//! Structural and geometric contract for the lane part of a simulated
//! ground-truth snapshot: lanes connected by split/merge topology, bounded
//! by sampled boundary polylines with per-point width/height.
//!
//! ## Design Principles
//!
//! 1. **Decoding is someone else's job**: `record` mirrors the already-decoded
//!    message; nothing here speaks the wire format
//! 2. **Immutable snapshots**: a `LaneNetwork` is built once per snapshot and
//!    only ever read afterwards
//! 3. **Findings are data**: building never fails on bad topology; the
//!    validator returns `Violation`s and the consumer decides
//! 4. **Deterministic**: same input, same violations, same order
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lane_graph::{Snapshot, ValidationConfig, LaneId};
//!
//! # fn example(json: &str) -> lane_graph::Result<()> {
//! let snapshot = Snapshot::from_json_str(json, &ValidationConfig::default())?;
//!
//! for v in snapshot.violations() {
//!     println!("{v}");
//! }
//!
//! let network = snapshot.network();
//! for lane in network.successors_of(LaneId(4))?.lanes {
//!     println!("lane {} is {:.1} m long", lane.id(), lane.length());
//! }
//! let corridor = network.reachable_from(LaneId(4), 10)?;
//! println!("{} lanes ahead", corridor.reached.len() - 1);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod geometry;
pub mod model;
pub mod record;
pub mod network;
pub mod validate;
pub mod snapshot;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Lane, LaneBoundary, BoundaryPoint, BoundarySample, BoundaryLookup,
    LaneId, BoundaryId, LaneType, LaneSubtype, LaneFraming,
    BoundaryType, BoundaryColor, BoundarySide, DashPhase,
};

// ============================================================================
// Re-exports: Graph & validation
// ============================================================================

pub use network::{LaneNetwork, Neighbours, Relation, Reachability, ReachedLane};
pub use validate::{validate, ValidationConfig, Violation, ViolationKind, Severity, GeometrySubject};

// ============================================================================
// Re-exports: Ingestion
// ============================================================================

pub use record::GroundTruthRecord;
pub use snapshot::{Snapshot, SnapshotCell, Rejection, RecordRef};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Empty geometry")]
    EmptyGeometry,

    #[error("Arc length {requested} outside [0, {length}]")]
    OutOfRange { requested: f64, length: f64 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
