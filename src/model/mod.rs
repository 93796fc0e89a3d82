//! # Lane Model
//!
//! Immutable entities for one ground-truth snapshot: lanes, boundaries and
//! their classifications. Construction checks each entity's own shape;
//! anything that needs a second entity lives in `network` or `validate`.
//!
//! Design rule: no topology here. This module is pure data: no I/O, no
//! state, no cross-lane lookups beyond the `BoundaryLookup` seam.

pub mod id;
pub mod classification;
pub mod boundary;
pub mod lane;

pub use id::{LaneId, BoundaryId};
pub use classification::{
    LaneType, LaneSubtype, LaneFraming, BoundaryType, BoundaryColor, BoundarySide,
};
pub use boundary::{
    LaneBoundary, BoundaryPoint, BoundarySample, BoundaryLookup, PointAttributes, DashPhase,
};
pub use lane::{Lane, LaneIdSet, BoundaryIdList};
