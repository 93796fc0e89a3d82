//! # Snapshot Records
//!
//! Serde mirror of the decoded ground-truth message. The external
//! serialization layer hands these over; this crate never touches the wire
//! format itself. Fields follow the schema's cardinality: scalars default
//! to zero, repeated fields to empty, optional fields to `None`.
//!
//! Everything that is not lane data (vehicles, objects, signs, environment)
//! is kept as opaque JSON in [`GroundTruthRecord::attachments`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::Point3;
use crate::model::{
    BoundaryColor, BoundaryId, BoundaryPoint, BoundarySide, BoundaryType, DashPhase, Lane,
    LaneBoundary, LaneFraming, LaneId, LaneSubtype, LaneType,
};
use crate::Result;

/// Schema vector; absent components are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vector3Record {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<Vector3Record> for Point3 {
    fn from(v: Vector3Record) -> Self {
        Point3::new(v.x, v.y, v.z)
    }
}

impl From<Point3> for Vector3Record {
    fn from(p: Point3) -> Self {
        Self { x: p.x, y: p.y, z: p.z }
    }
}

/// Snapshot time as seconds + nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestampRecord {
    pub seconds: i64,
    pub nanos: u32,
}

impl TimestampRecord {
    /// `None` when the value is outside chrono's representable range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanos)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryPointRecord {
    pub position: Vector3Record,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub dash: Option<DashPhase>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneBoundaryRecord {
    pub id: u64,
    pub boundary_line: Vec<BoundaryPointRecord>,
    #[serde(rename = "type")]
    pub boundary_type: BoundaryType,
    pub color: BoundaryColor,
}

impl LaneBoundaryRecord {
    pub fn into_boundary(self) -> Result<LaneBoundary> {
        let points = self
            .boundary_line
            .into_iter()
            .map(|p| BoundaryPoint {
                position: p.position.into(),
                width: p.width,
                height: p.height,
                dash: p.dash,
            })
            .collect();
        LaneBoundary::new(BoundaryId(self.id), self.boundary_type, self.color, points)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneRecord {
    pub id: u64,
    #[serde(rename = "type")]
    pub lane_type: LaneType,
    pub subtype: Option<LaneSubtype>,
    pub framing: Option<LaneFraming>,
    pub centerline: Vec<Vector3Record>,
    pub left_adjacent_lane_id: Vec<u64>,
    pub right_adjacent_lane_id: Vec<u64>,
    pub antecessor_lane_id: Vec<u64>,
    pub successor_lane_id: Vec<u64>,
    pub left_lane_boundary_id: Vec<u64>,
    pub right_lane_boundary_id: Vec<u64>,
    pub free_lane_boundary_id: Vec<u64>,
}

impl LaneRecord {
    pub fn into_lane(self) -> Result<Lane> {
        let center_line = self.centerline.into_iter().map(Point3::from).collect();
        let mut lane = Lane::new(LaneId(self.id), self.lane_type, center_line)?;
        if let Some(subtype) = self.subtype {
            lane = lane.with_subtype(subtype);
        }
        if let Some(framing) = self.framing {
            lane = lane.with_framing(framing);
        }
        Ok(lane
            .with_left_adjacent(self.left_adjacent_lane_id)
            .with_right_adjacent(self.right_adjacent_lane_id)
            .with_antecessors(self.antecessor_lane_id)
            .with_successors(self.successor_lane_id)
            .with_boundaries(BoundarySide::Left, self.left_lane_boundary_id)
            .with_boundaries(BoundarySide::Right, self.right_lane_boundary_id)
            .with_boundaries(BoundarySide::Free, self.free_lane_boundary_id))
    }
}

/// One decoded ground-truth message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundTruthRecord {
    pub timestamp: Option<TimestampRecord>,
    pub lane: Vec<LaneRecord>,
    pub lane_boundary: Vec<LaneBoundaryRecord>,
    /// Non-lane records, carried through untouched.
    #[serde(flatten)]
    pub attachments: serde_json::Map<String, serde_json::Value>,
}

impl GroundTruthRecord {
    /// Read a decoded snapshot from its JSON rendering.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_record_defaults_and_conversion() {
        let record: LaneRecord = serde_json::from_str(
            r#"{
                "id": 4,
                "type": "driving",
                "centerline": [{"x": 0.0}, {"x": 2.0, "y": 0.5}],
                "successor_lane_id": [6, 7]
            }"#,
        )
        .unwrap();
        assert_eq!(record.framing, None);

        let lane = record.into_lane().unwrap();
        assert_eq!(lane.id(), LaneId(4));
        assert_eq!(lane.successor_ids(), &[LaneId(6), LaneId(7)]);
        assert_eq!(lane.center_line().first(), Some(Point3::ZERO));
    }

    #[test]
    fn test_explicit_unknown_differs_from_absent() {
        let record: LaneRecord = serde_json::from_str(
            r#"{"id": 1, "type": "driving", "framing": "unknown", "centerline": [{"x": 0.0}, {"x": 1.0}]}"#,
        )
        .unwrap();
        assert_eq!(record.subtype, None);
        assert_eq!(record.framing, Some(LaneFraming::Unknown));

        let lane = record.into_lane().unwrap();
        assert_eq!(lane.subtype(), None);
        assert_eq!(lane.framing(), Some(LaneFraming::Unknown));
    }

    #[test]
    fn test_boundary_record_keeps_missing_attributes_absent() {
        let record: LaneBoundaryRecord = serde_json::from_str(
            r#"{
                "id": 10,
                "type": "dashed_line",
                "color": "white",
                "boundary_line": [
                    {"position": {"x": 0.0}, "width": 0.15, "dash": "start"},
                    {"position": {"x": 3.0}, "dash": "end"}
                ]
            }"#,
        )
        .unwrap();
        let boundary = record.into_boundary().unwrap();
        assert_eq!(boundary.points()[1].width, None);
        assert_eq!(boundary.resolved()[1].width, 0.15);
        assert_eq!(boundary.points()[1].dash, Some(DashPhase::End));
    }

    #[test]
    fn test_attachments_pass_through() {
        let gt = GroundTruthRecord::from_json_str(
            r#"{
                "timestamp": {"seconds": 1700000000, "nanos": 500},
                "moving_object": [{"id": 1}],
                "environmental_conditions": {"fog": "good_visibility"}
            }"#,
        )
        .unwrap();
        assert!(gt.lane.is_empty());
        assert!(gt.attachments.contains_key("moving_object"));
        assert!(gt.attachments.contains_key("environmental_conditions"));
        assert!(gt.timestamp.unwrap().to_datetime().is_some());
    }
}
