//! End-to-end tests for boundary geometry: width/height inheritance,
//! arc-length queries and lane width derived from boundaries.

use glam::DVec3;
use lane_graph::{
    BoundaryColor, BoundaryId, BoundaryPoint, BoundarySide, BoundaryType, Error, Lane,
    LaneBoundary, LaneId, LaneNetwork, LaneType,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// ============================================================================
// Helpers
// ============================================================================

fn solid(id: u64, points: Vec<BoundaryPoint>) -> LaneBoundary {
    LaneBoundary::new(BoundaryId(id), BoundaryType::SolidLine, BoundaryColor::White, points).unwrap()
}

fn line_at(y: f64, xs: &[f64]) -> Vec<BoundaryPoint> {
    xs.iter().map(|&x| BoundaryPoint::new(DVec3::new(x, y, 0.0))).collect()
}

// ============================================================================
// 1. Inheritance: [(p0, w=0.1, -), (p1, -, -), (p2, w=0.2, h=0.3)]
// ============================================================================

#[test]
fn test_width_height_inheritance() {
    let b = solid(
        1,
        vec![
            BoundaryPoint::new(DVec3::new(0.0, 0.0, 0.0)).with_width(0.1),
            BoundaryPoint::new(DVec3::new(3.0, 0.0, 0.0)),
            BoundaryPoint::new(DVec3::new(6.0, 0.0, 0.0)).with_width(0.2).with_height(0.3),
        ],
    );

    for s in [0.0, 1.0, 2.999] {
        let sample = b.offset_at(s).unwrap();
        assert_eq!((sample.width, sample.height), (0.1, 0.0), "before p1 at s={s}");
    }
    for s in [3.0, 4.5, 5.999] {
        let sample = b.offset_at(s).unwrap();
        assert_eq!((sample.width, sample.height), (0.1, 0.0), "between p1 and p2 at s={s}");
    }
    let at_p2 = b.offset_at(6.0).unwrap();
    assert_eq!((at_p2.width, at_p2.height), (0.2, 0.3));
    assert_eq!(at_p2.position, DVec3::new(6.0, 0.0, 0.0));
}

#[test]
fn test_offset_errors() {
    let empty = solid(2, vec![]);
    assert!(matches!(empty.offset_at(0.0), Err(Error::EmptyGeometry)));

    let b = solid(3, line_at(0.0, &[0.0, 2.0]));
    assert!(matches!(b.offset_at(2.0001), Err(Error::OutOfRange { .. })));
}

// ============================================================================
// 2. Lane width from left/right boundaries
// ============================================================================

#[test]
fn test_lane_width_through_network() {
    let lane = Lane::new(
        LaneId(1),
        LaneType::Driving,
        vec![DVec3::new(0.0, 0.0, 0.0), DVec3::new(4.0, 0.0, 0.0), DVec3::new(8.0, 0.0, 0.0)],
    )
    .unwrap()
    .with_boundaries(BoundarySide::Left, [100u64])
    .with_boundaries(BoundarySide::Right, [101u64]);

    let net = LaneNetwork::build(
        [lane],
        [
            solid(100, line_at(1.6, &[0.0, 4.0, 8.0])),
            solid(101, line_at(-1.9, &[0.0, 4.0, 8.0])),
        ],
    );

    for s in [0.0, 2.5, 8.0] {
        let w = net.width_at(LaneId(1), s).unwrap();
        assert!((w - 3.5).abs() < 1e-9, "width {w} at s={s}");
    }
    assert_eq!(net.boundaries_of(LaneId(1), BoundarySide::Left).unwrap().len(), 1);
    assert!(matches!(net.width_at(LaneId(1), 9.0), Err(Error::OutOfRange { .. })));
}

#[test]
fn test_lane_width_missing_boundary_record() {
    let lane = Lane::new(
        LaneId(1),
        LaneType::Driving,
        vec![DVec3::new(0.0, 0.0, 0.0), DVec3::new(4.0, 0.0, 0.0)],
    )
    .unwrap()
    .with_boundaries(BoundarySide::Left, [100u64])
    .with_boundaries(BoundarySide::Right, [404u64]);
    let net = LaneNetwork::build([lane], [solid(100, line_at(1.75, &[0.0, 4.0]))]);

    assert!(matches!(net.width_at(LaneId(1), 1.0), Err(Error::NotFound(_))));
}

// ============================================================================
// 3. Property: arc-length end points round-trip
// ============================================================================

proptest! {
    #[test]
    fn prop_offset_endpoints(
        coords in proptest::collection::vec((-100.0f64..100.0, -100.0f64..100.0, -5.0f64..5.0), 1..12)
    ) {
        let points: Vec<BoundaryPoint> = coords
            .iter()
            .map(|&(x, y, z)| BoundaryPoint::new(DVec3::new(x, y, z)))
            .collect();
        let first = points[0].position;
        let last = points[points.len() - 1].position;
        let b = solid(7, points);

        prop_assert_eq!(b.offset_at(0.0).unwrap().position, first);
        let end = b.offset_at(b.length()).unwrap().position;
        prop_assert!(end.distance(last) <= 1e-9 * (1.0 + last.length()));
    }
}
