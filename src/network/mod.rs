//! # Lane Network Graph
//!
//! Owns every lane and boundary of one snapshot and answers topology
//! queries over them.
//!
//! ## Guarantees
//!
//! - **Never fails to build**: dangling ids, duplicate ids and asymmetric
//!   links are kept as-is. Producers may legitimately emit partial data;
//!   judging it is the validator's job.
//! - **Read-only after `build()`**: every query takes `&self`, so a network
//!   can be shared behind an `Arc` by any number of readers without locks.
//! - **Deterministic order**: lanes iterate in ingestion order, and every
//!   neighbour list follows the order of the stored id set.

pub mod traversal;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::model::*;
use crate::{Error, Result};

pub use traversal::{Reachability, ReachedLane};

// ============================================================================
// Relation
// ============================================================================

/// A directed lane-to-lane link kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Successor,
    Antecessor,
    LeftAdjacent,
    RightAdjacent,
}

impl Relation {
    pub const ALL: [Relation; 4] = [
        Relation::Successor,
        Relation::Antecessor,
        Relation::LeftAdjacent,
        Relation::RightAdjacent,
    ];

    /// The link the other lane should hold back to this one.
    pub fn inverse(self) -> Relation {
        match self {
            Relation::Successor => Relation::Antecessor,
            Relation::Antecessor => Relation::Successor,
            Relation::LeftAdjacent => Relation::RightAdjacent,
            Relation::RightAdjacent => Relation::LeftAdjacent,
        }
    }

    /// The id set this relation reads on a lane.
    pub fn ids(self, lane: &Lane) -> &[LaneId] {
        match self {
            Relation::Successor => lane.successor_ids(),
            Relation::Antecessor => lane.antecessor_ids(),
            Relation::LeftAdjacent => lane.left_adjacent_ids(),
            Relation::RightAdjacent => lane.right_adjacent_ids(),
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Relation::Successor => "successor",
            Relation::Antecessor => "antecessor",
            Relation::LeftAdjacent => "left-adjacent",
            Relation::RightAdjacent => "right-adjacent",
        })
    }
}

// ============================================================================
// Neighbours
// ============================================================================

/// A lane's id set resolved against the network.
#[derive(Debug, Clone, Default)]
pub struct Neighbours<'a> {
    pub lanes: SmallVec<[&'a Lane; 4]>,
    /// Ids that name no lane in this snapshot.
    pub dangling: SmallVec<[LaneId; 2]>,
}

impl<'a> Neighbours<'a> {
    pub fn ids(&self) -> Vec<LaneId> {
        self.lanes.iter().map(|l| l.id()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }
}

// ============================================================================
// LaneNetwork
// ============================================================================

/// The lane graph of one snapshot.
#[derive(Debug, Clone, Default)]
pub struct LaneNetwork {
    /// Ingestion order, duplicates excluded.
    lanes: Vec<Lane>,
    /// lane id → position in `lanes`
    index: HashMap<LaneId, usize>,
    boundaries: HashMap<BoundaryId, LaneBoundary>,
    /// Boundary ids in ingestion order, for deterministic scans.
    boundary_order: Vec<BoundaryId>,
    duplicate_lanes: Vec<LaneId>,
    duplicate_boundaries: Vec<BoundaryId>,
}

impl LaneNetwork {
    /// Index lanes and boundaries. First occurrence of an id wins; later
    /// ones are dropped and remembered for the validator.
    pub fn build(
        lanes: impl IntoIterator<Item = Lane>,
        boundaries: impl IntoIterator<Item = LaneBoundary>,
    ) -> Self {
        let mut network = Self::default();

        for lane in lanes {
            let id = lane.id();
            if network.index.contains_key(&id) {
                tracing::warn!(lane = %id, "duplicate lane id, keeping first occurrence");
                network.duplicate_lanes.push(id);
                continue;
            }
            network.index.insert(id, network.lanes.len());
            network.lanes.push(lane);
        }

        for boundary in boundaries {
            let id = boundary.id();
            if network.boundaries.contains_key(&id) {
                tracing::warn!(boundary = %id, "duplicate boundary id, keeping first occurrence");
                network.duplicate_boundaries.push(id);
                continue;
            }
            network.boundary_order.push(id);
            network.boundaries.insert(id, boundary);
        }

        tracing::debug!(
            lanes = network.lanes.len(),
            boundaries = network.boundaries.len(),
            "lane network built"
        );
        network
    }

    /// Index lanes that reference no boundaries.
    pub fn from_lanes(lanes: impl IntoIterator<Item = Lane>) -> Self {
        Self::build(lanes, std::iter::empty::<LaneBoundary>())
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn lane(&self, id: LaneId) -> Result<&Lane> {
        self.get(id).ok_or_else(|| Error::NotFound(format!("Lane {id}")))
    }

    pub fn get(&self, id: LaneId) -> Option<&Lane> {
        self.index.get(&id).map(|&i| &self.lanes[i])
    }

    pub fn contains(&self, id: LaneId) -> bool {
        self.index.contains_key(&id)
    }

    /// Lanes in ingestion order.
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// Boundaries in ingestion order.
    pub fn boundaries(&self) -> impl Iterator<Item = &LaneBoundary> + '_ {
        self.boundary_order.iter().filter_map(|id| self.boundaries.get(id))
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn boundary_count(&self) -> usize {
        self.boundaries.len()
    }

    /// Lane ids that appeared more than once at build time.
    pub fn duplicate_lane_ids(&self) -> &[LaneId] {
        &self.duplicate_lanes
    }

    /// Boundary ids that appeared more than once at build time.
    pub fn duplicate_boundary_ids(&self) -> &[BoundaryId] {
        &self.duplicate_boundaries
    }

    // ========================================================================
    // Neighbour queries
    // ========================================================================

    /// Resolve one of a lane's id sets, skipping (and recording) dangling ids.
    pub fn neighbours(&self, id: LaneId, relation: Relation) -> Result<Neighbours<'_>> {
        let lane = self.lane(id)?;
        let mut out = Neighbours::default();
        for &other in relation.ids(lane) {
            match self.get(other) {
                Some(l) => out.lanes.push(l),
                None => out.dangling.push(other),
            }
        }
        Ok(out)
    }

    pub fn successors_of(&self, id: LaneId) -> Result<Neighbours<'_>> {
        self.neighbours(id, Relation::Successor)
    }

    pub fn antecessors_of(&self, id: LaneId) -> Result<Neighbours<'_>> {
        self.neighbours(id, Relation::Antecessor)
    }

    pub fn left_adjacent_of(&self, id: LaneId) -> Result<Neighbours<'_>> {
        self.neighbours(id, Relation::LeftAdjacent)
    }

    pub fn right_adjacent_of(&self, id: LaneId) -> Result<Neighbours<'_>> {
        self.neighbours(id, Relation::RightAdjacent)
    }

    /// Boundaries referenced by a lane on one side; missing ids are skipped.
    pub fn boundaries_of(&self, id: LaneId, side: BoundarySide) -> Result<Vec<&LaneBoundary>> {
        let lane = self.lane(id)?;
        Ok(lane
            .boundary_ids(side)
            .iter()
            .filter_map(|b| self.boundaries.get(b))
            .collect())
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Width of a lane at centre-line station `s`.
    pub fn width_at(&self, id: LaneId, s: f64) -> Result<f64> {
        self.lane(id)?.width_at(s, self)
    }
}

impl BoundaryLookup for LaneNetwork {
    fn boundary(&self, id: BoundaryId) -> Option<&LaneBoundary> {
        self.boundaries.get(&id)
    }
}

// ============================================================================
// Tests
// ============================================================================
