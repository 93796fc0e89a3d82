//! # Snapshot Ingestion
//!
//! Turns one decoded ground-truth record into a validated, immutable
//! [`Snapshot`], and hands snapshots to concurrent readers.
//!
//! ```text
//! GroundTruthRecord → Snapshot::ingest()
//!   → per-record construction (bad records become Rejections)
//!   → LaneNetwork::build() → validate()
//!   → SnapshotCell::publish() → readers call current()
//! ```

pub mod cell;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{BoundaryId, LaneId};
use crate::network::LaneNetwork;
use crate::record::GroundTruthRecord;
use crate::validate::{validate, Severity, ValidationConfig, Violation};
use crate::Error;

pub use cell::SnapshotCell;

/// The record a rejection refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "record", content = "id")]
pub enum RecordRef {
    Lane(LaneId),
    Boundary(BoundaryId),
}

/// A record that failed its own shape checks and was left out of the graph.
#[derive(Debug)]
pub struct Rejection {
    pub record: RecordRef,
    pub error: Error,
}

/// One ingested ground-truth snapshot.
#[derive(Debug)]
pub struct Snapshot {
    timestamp: Option<DateTime<Utc>>,
    network: Arc<LaneNetwork>,
    violations: Vec<Violation>,
    rejections: Vec<Rejection>,
    attachments: serde_json::Map<String, serde_json::Value>,
}

impl Snapshot {
    /// Build and validate the lane network of one decoded record.
    ///
    /// Only an invalid `config` fails the snapshot as a whole. Malformed
    /// records are rejected one by one, and cross-lane problems come back
    /// as violations.
    #[tracing::instrument(skip_all, fields(lanes = record.lane.len(), boundaries = record.lane_boundary.len()))]
    pub fn ingest(record: GroundTruthRecord, config: &ValidationConfig) -> crate::Result<Self> {
        config.check()?;

        let mut rejections = Vec::new();

        let mut boundaries = Vec::with_capacity(record.lane_boundary.len());
        for b in record.lane_boundary {
            let id = BoundaryId(b.id);
            match b.into_boundary() {
                Ok(boundary) => boundaries.push(boundary),
                Err(error) => {
                    tracing::warn!(boundary = %id, %error, "boundary rejected");
                    rejections.push(Rejection { record: RecordRef::Boundary(id), error });
                }
            }
        }

        let mut lanes = Vec::with_capacity(record.lane.len());
        for l in record.lane {
            let id = LaneId(l.id);
            match l.into_lane() {
                Ok(lane) => lanes.push(lane),
                Err(error) => {
                    tracing::warn!(lane = %id, %error, "lane rejected");
                    rejections.push(Rejection { record: RecordRef::Lane(id), error });
                }
            }
        }

        let network = LaneNetwork::build(lanes, boundaries);
        let violations = validate(&network, config)?;

        Ok(Self {
            timestamp: record.timestamp.and_then(|t| t.to_datetime()),
            network: Arc::new(network),
            violations,
            rejections,
            attachments: record.attachments,
        })
    }

    /// Parse a JSON-rendered record and ingest it.
    pub fn from_json_str(s: &str, config: &ValidationConfig) -> crate::Result<Self> {
        config.check()?;
        Self::ingest(GroundTruthRecord::from_json_str(s)?, config)
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn network(&self) -> &LaneNetwork {
        &self.network
    }

    /// Shared handle to the network, for readers that outlive the snapshot.
    pub fn network_handle(&self) -> Arc<LaneNetwork> {
        Arc::clone(&self.network)
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn rejections(&self) -> &[Rejection] {
        &self.rejections
    }

    /// Non-lane records carried through from the input.
    pub fn attachments(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.attachments
    }

    pub fn error_count(&self) -> usize {
        self.violations.iter().filter(|v| v.severity == Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.violations.iter().filter(|v| v.severity == Severity::Warning).count()
    }

    /// No rejections and no violations of any severity.
    pub fn is_clean(&self) -> bool {
        self.rejections.is_empty() && self.violations.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
