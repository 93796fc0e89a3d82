//! Lane: one segment of the lane network.

use smallvec::SmallVec;

use super::{BoundaryId, BoundaryLookup, BoundarySide, LaneFraming, LaneId, LaneSubtype, LaneType};
use crate::geometry::{right_normal, Point3, Polyline};
use crate::{Error, Result};

/// Lane id set. Most lanes have one or two neighbours per relation.
pub type LaneIdSet = SmallVec<[LaneId; 4]>;

/// Boundary references on one side of a lane.
pub type BoundaryIdList = SmallVec<[BoundaryId; 2]>;

/// A lane segment.
///
/// The centre line runs in the direction of travel. Id sets are
/// de-duplicated, first occurrence wins.
#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    id: LaneId,
    lane_type: LaneType,
    subtype: Option<LaneSubtype>,
    framing: Option<LaneFraming>,
    center_line: Polyline,
    left_boundary_ids: BoundaryIdList,
    right_boundary_ids: BoundaryIdList,
    free_boundary_ids: BoundaryIdList,
    left_adjacent_ids: LaneIdSet,
    right_adjacent_ids: LaneIdSet,
    antecessor_ids: LaneIdSet,
    successor_ids: LaneIdSet,
}

impl Lane {
    /// Build a lane, checking its own shape.
    ///
    /// The centre line must be non-empty unless the type is unknown, and its
    /// arc length must strictly increase from point to point.
    pub fn new(id: LaneId, lane_type: LaneType, center_line: Vec<Point3>) -> Result<Self> {
        let center_line = Polyline::new(center_line)
            .map_err(|e| Error::InvalidShape(format!("lane {id}: {e}")))?;

        if center_line.is_empty() && lane_type != LaneType::Unknown {
            return Err(Error::InvalidShape(format!(
                "lane {id}: empty centre line on a {lane_type:?} lane"
            )));
        }
        if let Some(segment) = center_line.first_degenerate_segment() {
            return Err(Error::InvalidShape(format!(
                "lane {id}: centre line segment {segment} has zero length"
            )));
        }

        Ok(Self {
            id,
            lane_type,
            subtype: None,
            framing: None,
            center_line,
            left_boundary_ids: SmallVec::new(),
            right_boundary_ids: SmallVec::new(),
            free_boundary_ids: SmallVec::new(),
            left_adjacent_ids: SmallVec::new(),
            right_adjacent_ids: SmallVec::new(),
            antecessor_ids: SmallVec::new(),
            successor_ids: SmallVec::new(),
        })
    }

    pub fn with_subtype(mut self, subtype: LaneSubtype) -> Self {
        self.subtype = Some(subtype);
        self
    }

    pub fn with_framing(mut self, framing: LaneFraming) -> Self {
        self.framing = Some(framing);
        self
    }

    pub fn with_successors(mut self, ids: impl IntoIterator<Item = impl Into<LaneId>>) -> Self {
        self.successor_ids = dedup(ids);
        self
    }

    pub fn with_antecessors(mut self, ids: impl IntoIterator<Item = impl Into<LaneId>>) -> Self {
        self.antecessor_ids = dedup(ids);
        self
    }

    pub fn with_left_adjacent(mut self, ids: impl IntoIterator<Item = impl Into<LaneId>>) -> Self {
        self.left_adjacent_ids = dedup(ids);
        self
    }

    pub fn with_right_adjacent(mut self, ids: impl IntoIterator<Item = impl Into<LaneId>>) -> Self {
        self.right_adjacent_ids = dedup(ids);
        self
    }

    pub fn with_boundaries(
        mut self,
        side: BoundarySide,
        ids: impl IntoIterator<Item = impl Into<BoundaryId>>,
    ) -> Self {
        let list = dedup(ids);
        match side {
            BoundarySide::Left => self.left_boundary_ids = list,
            BoundarySide::Right => self.right_boundary_ids = list,
            BoundarySide::Free => self.free_boundary_ids = list,
        }
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> LaneId {
        self.id
    }

    pub fn lane_type(&self) -> LaneType {
        self.lane_type
    }

    /// `None` when the producer left the subtype out.
    pub fn subtype(&self) -> Option<LaneSubtype> {
        self.subtype
    }

    pub fn framing(&self) -> Option<LaneFraming> {
        self.framing
    }

    pub fn center_line(&self) -> &Polyline {
        &self.center_line
    }

    pub fn boundary_ids(&self, side: BoundarySide) -> &[BoundaryId] {
        match side {
            BoundarySide::Left => &self.left_boundary_ids,
            BoundarySide::Right => &self.right_boundary_ids,
            BoundarySide::Free => &self.free_boundary_ids,
        }
    }

    /// Every boundary reference, left then right then free.
    pub fn all_boundary_ids(&self) -> impl Iterator<Item = (BoundarySide, BoundaryId)> + '_ {
        [BoundarySide::Left, BoundarySide::Right, BoundarySide::Free]
            .into_iter()
            .flat_map(move |side| self.boundary_ids(side).iter().map(move |&id| (side, id)))
    }

    pub fn left_adjacent_ids(&self) -> &[LaneId] {
        &self.left_adjacent_ids
    }

    pub fn right_adjacent_ids(&self) -> &[LaneId] {
        &self.right_adjacent_ids
    }

    pub fn antecessor_ids(&self) -> &[LaneId] {
        &self.antecessor_ids
    }

    pub fn successor_ids(&self) -> &[LaneId] {
        &self.successor_ids
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Centre-line arc length.
    pub fn length(&self) -> f64 {
        self.center_line.length()
    }

    /// Centre-line position at station `s`.
    pub fn position_at(&self, s: f64) -> Result<Point3> {
        self.center_line.point_at(s)
    }

    /// Lane width at centre-line station `s`.
    ///
    /// Each side's offset is measured along the centre line's right-pointing
    /// normal, using the nearest referenced boundary on that side. The width
    /// is `right_offset - left_offset`.
    pub fn width_at<L>(&self, s: f64, boundaries: &L) -> Result<f64>
    where
        L: BoundaryLookup + ?Sized,
    {
        let center = self.center_line.point_at(s)?;
        let normal = self
            .center_line
            .tangent_at(s)?
            .and_then(right_normal)
            .ok_or(Error::EmptyGeometry)?;

        let right = self
            .side_offset(BoundarySide::Right, center, normal, boundaries)?
            .ok_or_else(|| Error::NotFound(format!("right boundary of lane {}", self.id)))?;
        let left = self
            .side_offset(BoundarySide::Left, center, normal, boundaries)?
            .ok_or_else(|| Error::NotFound(format!("left boundary of lane {}", self.id)))?;

        Ok(right - left)
    }

    fn side_offset<L>(
        &self,
        side: BoundarySide,
        center: Point3,
        normal: Point3,
        boundaries: &L,
    ) -> Result<Option<f64>>
    where
        L: BoundaryLookup + ?Sized,
    {
        let nearest = self
            .boundary_ids(side)
            .iter()
            .filter_map(|&id| boundaries.boundary(id))
            .filter_map(|b| b.polyline().project(center).map(|proj| (b, proj)))
            .min_by(|(_, a), (_, b)| a.distance.total_cmp(&b.distance));

        let Some((boundary, proj)) = nearest else {
            return Ok(None);
        };

        let station = proj.station.clamp(0.0, boundary.length());
        let sample = boundary.offset_at(station)?;
        Ok(Some((sample.position - center).dot(normal)))
    }
}

fn dedup<T, A>(ids: impl IntoIterator<Item = impl Into<T>>) -> SmallVec<A>
where
    T: PartialEq,
    A: smallvec::Array<Item = T>,
{
    let mut out: SmallVec<A> = SmallVec::new();
    for id in ids {
        let id = id.into();
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundaryColor, BoundaryPoint, BoundaryType, LaneBoundary};

    fn straight(y: f64) -> Vec<Point3> {
        (0..=4).map(|i| Point3::new(i as f64 * 2.5, y, 0.0)).collect()
    }

    fn marking(id: u64, y: f64) -> LaneBoundary {
        LaneBoundary::new(
            BoundaryId(id),
            BoundaryType::SolidLine,
            BoundaryColor::White,
            straight(y).into_iter().map(BoundaryPoint::new).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_width_from_both_sides() {
        let lane = Lane::new(LaneId(1), LaneType::Driving, straight(0.0))
            .unwrap()
            .with_boundaries(BoundarySide::Left, [10u64])
            .with_boundaries(BoundarySide::Right, [11u64]);
        let boundaries = vec![marking(10, 1.75), marking(11, -1.75)];

        let w = lane.width_at(5.0, boundaries.as_slice()).unwrap();
        assert!((w - 3.5).abs() < 1e-9, "got {w}");
    }

    #[test]
    fn test_width_picks_nearest_dash_segment() {
        let lane = Lane::new(LaneId(1), LaneType::Driving, straight(0.0))
            .unwrap()
            .with_boundaries(BoundarySide::Left, [20u64, 21])
            .with_boundaries(BoundarySide::Right, [11u64]);
        let near = LaneBoundary::new(
            BoundaryId(20),
            BoundaryType::DashedLine,
            BoundaryColor::White,
            vec![
                BoundaryPoint::new(Point3::new(0.0, 1.5, 0.0)),
                BoundaryPoint::new(Point3::new(3.0, 1.5, 0.0)),
            ],
        )
        .unwrap();
        let far = LaneBoundary::new(
            BoundaryId(21),
            BoundaryType::DashedLine,
            BoundaryColor::White,
            vec![
                BoundaryPoint::new(Point3::new(6.0, 1.5, 0.0)),
                BoundaryPoint::new(Point3::new(9.0, 1.5, 0.0)),
            ],
        )
        .unwrap();
        let boundaries = vec![near, far, marking(11, -1.5)];

        let w = lane.width_at(7.0, boundaries.as_slice()).unwrap();
        assert!((w - 3.0).abs() < 1e-9, "got {w}");
    }

    #[test]
    fn test_width_without_boundary_is_not_found() {
        let lane = Lane::new(LaneId(1), LaneType::Driving, straight(0.0))
            .unwrap()
            .with_boundaries(BoundarySide::Right, [11u64]);
        let boundaries = vec![marking(11, -1.75)];
        assert!(matches!(
            lane.width_at(1.0, boundaries.as_slice()),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_empty_center_line_only_for_unknown() {
        assert!(Lane::new(LaneId(1), LaneType::Unknown, vec![]).is_ok());
        assert!(matches!(
            Lane::new(LaneId(1), LaneType::Driving, vec![]),
            Err(Error::InvalidShape(_))
        ));
    }

    #[test]
    fn test_repeated_point_rejected() {
        let err = Lane::new(
            LaneId(1),
            LaneType::Driving,
            vec![Point3::ZERO, Point3::X, Point3::X],
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidShape(_)));
    }

    #[test]
    fn test_id_sets_dedup() {
        let lane = Lane::new(LaneId(1), LaneType::Driving, straight(0.0))
            .unwrap()
            .with_successors([2u64, 3, 2]);
        assert_eq!(lane.successor_ids(), &[LaneId(2), LaneId(3)]);
        assert_eq!(lane.length(), 10.0);
    }
}
