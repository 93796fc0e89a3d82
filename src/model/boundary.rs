//! Lane boundary: an ordered run of boundary points.

use serde::{Deserialize, Serialize};

use super::{BoundaryColor, BoundaryId, BoundaryType};
use crate::geometry::{Point3, Polyline};
use crate::{Error, Result};

/// Where a boundary point sits within a dashed marking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashPhase {
    #[default]
    Unknown,
    Other,
    Start,
    Continue,
    End,
    Gap,
}

/// A single sampled point of a boundary, as delivered by the producer.
///
/// `width` and `height` are optional: an absent value holds the previous
/// point's value (or 0 at the first point). `dash` is only set on dashed
/// markings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPoint {
    pub position: Point3,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub dash: Option<DashPhase>,
}

impl BoundaryPoint {
    pub fn new(position: Point3) -> Self {
        Self {
            position,
            width: None,
            height: None,
            dash: None,
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_dash(mut self, dash: DashPhase) -> Self {
        self.dash = Some(dash);
        self
    }
}

/// Width/height after inheritance has been applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointAttributes {
    pub width: f64,
    pub height: f64,
}

/// Result of an [`LaneBoundary::offset_at`] query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundarySample {
    pub position: Point3,
    pub width: f64,
    pub height: f64,
}

/// A lane boundary: one continuous marking or edge.
///
/// Dashed lines arrive as one boundary per painted segment.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneBoundary {
    id: BoundaryId,
    boundary_type: BoundaryType,
    color: BoundaryColor,
    points: Vec<BoundaryPoint>,
    /// Inherited attributes, one per point.
    resolved: Vec<PointAttributes>,
    line: Polyline,
}

impl LaneBoundary {
    /// Build a boundary, resolving width/height inheritance once.
    ///
    /// Rejects negative or non-finite width/height and non-finite positions.
    pub fn new(
        id: BoundaryId,
        boundary_type: BoundaryType,
        color: BoundaryColor,
        points: Vec<BoundaryPoint>,
    ) -> Result<Self> {
        for (i, p) in points.iter().enumerate() {
            check_attribute(id, i, "width", p.width)?;
            check_attribute(id, i, "height", p.height)?;
        }

        let line = Polyline::new(points.iter().map(|p| p.position).collect())
            .map_err(|e| Error::InvalidShape(format!("boundary {id}: {e}")))?;

        let resolved = points
            .iter()
            .scan(PointAttributes::default(), |last, p| {
                last.width = p.width.unwrap_or(last.width);
                last.height = p.height.unwrap_or(last.height);
                Some(*last)
            })
            .collect();

        Ok(Self {
            id,
            boundary_type,
            color,
            points,
            resolved,
            line,
        })
    }

    pub fn id(&self) -> BoundaryId {
        self.id
    }

    pub fn boundary_type(&self) -> BoundaryType {
        self.boundary_type
    }

    pub fn color(&self) -> BoundaryColor {
        self.color
    }

    /// Points as delivered, before inheritance.
    pub fn points(&self) -> &[BoundaryPoint] {
        &self.points
    }

    /// Resolved attributes, parallel to [`points`](Self::points).
    pub fn resolved(&self) -> &[PointAttributes] {
        &self.resolved
    }

    pub fn polyline(&self) -> &Polyline {
        &self.line
    }

    pub fn length(&self) -> f64 {
        self.line.length()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Position, width and height at `arc_length` from the first point.
    ///
    /// Position is interpolated. Width and height step: they belong to the
    /// point that starts the bracketing segment.
    pub fn offset_at(&self, arc_length: f64) -> Result<BoundarySample> {
        let locus = self.line.locate(arc_length)?;
        let attrs = self.resolved[locus.index];
        Ok(BoundarySample {
            position: self.line.point_at_locus(locus),
            width: attrs.width,
            height: attrs.height,
        })
    }
}

fn check_attribute(id: BoundaryId, index: usize, name: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(Error::InvalidShape(format!(
            "boundary {id}: point {index} has invalid {name} {v}"
        ))),
        _ => Ok(()),
    }
}

// ============================================================================
// Lookup
// ============================================================================

/// Anything that can resolve a boundary id.
pub trait BoundaryLookup {
    fn boundary(&self, id: BoundaryId) -> Option<&LaneBoundary>;
}

impl BoundaryLookup for hashbrown::HashMap<BoundaryId, LaneBoundary> {
    fn boundary(&self, id: BoundaryId) -> Option<&LaneBoundary> {
        self.get(&id)
    }
}

impl BoundaryLookup for [LaneBoundary] {
    fn boundary(&self, id: BoundaryId) -> Option<&LaneBoundary> {
        self.iter().find(|b| b.id == id)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn inheritance_boundary() -> LaneBoundary {
        LaneBoundary::new(
            BoundaryId(1),
            BoundaryType::SolidLine,
            BoundaryColor::White,
            vec![
                BoundaryPoint::new(Point3::new(0.0, 0.0, 0.0)).with_width(0.1),
                BoundaryPoint::new(Point3::new(2.0, 0.0, 0.0)),
                BoundaryPoint::new(Point3::new(4.0, 0.0, 0.0)).with_width(0.2).with_height(0.3),
                BoundaryPoint::new(Point3::new(6.0, 0.0, 0.0)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_resolution_folds_once() {
        let b = inheritance_boundary();
        let widths: Vec<f64> = b.resolved().iter().map(|a| a.width).collect();
        let heights: Vec<f64> = b.resolved().iter().map(|a| a.height).collect();
        assert_eq!(widths, vec![0.1, 0.1, 0.2, 0.2]);
        assert_eq!(heights, vec![0.0, 0.0, 0.3, 0.3]);
    }

    #[test]
    fn test_attributes_step_at_points() {
        let b = inheritance_boundary();

        let before_p1 = b.offset_at(1.0).unwrap();
        assert_eq!((before_p1.width, before_p1.height), (0.1, 0.0));

        let between = b.offset_at(3.0).unwrap();
        assert_eq!((between.width, between.height), (0.1, 0.0));

        let at_p2 = b.offset_at(4.0).unwrap();
        assert_eq!((at_p2.width, at_p2.height), (0.2, 0.3));

        let after = b.offset_at(5.5).unwrap();
        assert_eq!((after.width, after.height), (0.2, 0.3));
    }

    #[test]
    fn test_empty_boundary_query() {
        let b = LaneBoundary::new(BoundaryId(2), BoundaryType::Curb, BoundaryColor::None, vec![]).unwrap();
        assert!(matches!(b.offset_at(0.0), Err(Error::EmptyGeometry)));
    }

    #[test]
    fn test_beyond_length_is_out_of_range() {
        let b = inheritance_boundary();
        match b.offset_at(6.5) {
            Err(Error::OutOfRange { requested, length }) => {
                assert_eq!(requested, 6.5);
                assert_eq!(length, 6.0);
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_width_rejected() {
        let err = LaneBoundary::new(
            BoundaryId(3),
            BoundaryType::SolidLine,
            BoundaryColor::White,
            vec![BoundaryPoint::new(Point3::ZERO).with_width(-0.1)],
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidShape(_)));
    }

    #[test]
    fn test_slice_lookup() {
        let all = vec![inheritance_boundary()];
        assert!(all.as_slice().boundary(BoundaryId(1)).is_some());
        assert!(all.as_slice().boundary(BoundaryId(9)).is_none());
    }
}
