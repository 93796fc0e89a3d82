//! # Snapshot Validator
//!
//! Cross-checks a built [`LaneNetwork`] and returns every finding as data.
//! Nothing here mutates the network or fails: a snapshot with violations is
//! still fully queryable, and the caller decides what is acceptable.
//!
//! Checks run lane by lane, in ingestion order, always in this sequence:
//!
//! 1. dangling lane and boundary references (error)
//! 2. successor endpoint coincidence (error)
//! 3. antecessor/successor symmetry (warning)
//! 4. left/right adjacency symmetry (warning)
//! 5. point spacing (error) and chord deviation (review)
//! 6. unknown classifications (warning)
//!
//! Duplicate ids are reported before any per-lane check. An invalid
//! [`ValidationConfig`] is refused up front: a NaN tolerance would otherwise
//! never be exceeded.

pub mod config;
pub mod violation;

use hashbrown::HashSet;

use crate::geometry::{menger_curvature, Point3, Polyline};
use crate::model::*;
use crate::network::{LaneNetwork, Relation};
use crate::Result;

pub use config::ValidationConfig;
pub use violation::{GeometrySubject, Severity, Violation, ViolationKind};

/// Run every check over `network`.
///
/// Fails only with [`Error::InvalidConfig`](crate::Error::InvalidConfig).
#[tracing::instrument(skip_all, fields(lanes = network.len()))]
pub fn validate(network: &LaneNetwork, config: &ValidationConfig) -> Result<Vec<Violation>> {
    config.check()?;

    let mut out = Vec::new();
    check_duplicates(network, &mut out);

    // Shared boundaries are checked once, at the first lane referencing them.
    let mut seen_boundaries = HashSet::new();

    for lane in network.lanes() {
        check_dangling(network, lane, &mut out);
        check_successor_endpoints(network, lane, config, &mut out);
        check_symmetry(network, lane, &[Relation::Successor, Relation::Antecessor], &mut out);
        check_symmetry(network, lane, &[Relation::LeftAdjacent, Relation::RightAdjacent], &mut out);
        check_sampling(network, lane, config, &mut seen_boundaries, &mut out);
        check_classification(network, lane, &mut out);
    }

    let errors = out.iter().filter(|v| v.is_error()).count();
    tracing::debug!(errors, warnings = out.len() - errors, "validation finished");
    Ok(out)
}

// ============================================================================
// Checks
// ============================================================================

fn check_duplicates(network: &LaneNetwork, out: &mut Vec<Violation>) {
    for &id in network.duplicate_lane_ids() {
        out.push(
            Violation::error(ViolationKind::DuplicateIdentifier, format!("lane id {id} appears more than once"))
                .with_lane(id),
        );
    }
    for &id in network.duplicate_boundary_ids() {
        out.push(
            Violation::error(
                ViolationKind::DuplicateIdentifier,
                format!("boundary id {id} appears more than once"),
            )
            .with_boundary(id),
        );
    }
}

fn check_dangling(network: &LaneNetwork, lane: &Lane, out: &mut Vec<Violation>) {
    let id = lane.id();
    for relation in Relation::ALL {
        for &target in relation.ids(lane) {
            if !network.contains(target) {
                out.push(
                    Violation::error(
                        ViolationKind::DanglingReference,
                        format!("lane {id} lists missing lane {target} as {relation}"),
                    )
                    .with_lane(id)
                    .with_lane(target)
                    .with_relation(relation),
                );
            }
        }
    }
    for (side, boundary) in lane.all_boundary_ids() {
        if network.boundary(boundary).is_none() {
            out.push(
                Violation::error(
                    ViolationKind::DanglingReference,
                    format!("lane {id} lists missing boundary {boundary} on its {side} side"),
                )
                .with_lane(id)
                .with_boundary(boundary),
            );
        }
    }
}

fn check_successor_endpoints(
    network: &LaneNetwork,
    lane: &Lane,
    config: &ValidationConfig,
    out: &mut Vec<Violation>,
) {
    let Some(end) = lane.center_line().last() else { return };
    for &succ in lane.successor_ids() {
        let Some(start) = network.get(succ).and_then(|s| s.center_line().first()) else {
            continue;
        };
        let gap = end.distance(start);
        if gap > config.epsilon {
            out.push(
                Violation::error(
                    ViolationKind::GeometryToleranceExceeded,
                    format!(
                        "lane {} ends {gap:.3} m away from the start of successor {succ} (epsilon {})",
                        lane.id(),
                        config.epsilon
                    ),
                )
                .with_lane(lane.id())
                .with_lane(succ)
                .with_relation(Relation::Successor)
                .with_geometry(GeometrySubject::CenterLine),
            );
        }
    }
}

/// Every existing target of `relations` should link back with the inverse.
fn check_symmetry(network: &LaneNetwork, lane: &Lane, relations: &[Relation], out: &mut Vec<Violation>) {
    let id = lane.id();
    for &relation in relations {
        let inverse = relation.inverse();
        for &target in relation.ids(lane) {
            let Some(other) = network.get(target) else { continue };
            if !inverse.ids(other).contains(&id) {
                out.push(
                    Violation::warning(
                        ViolationKind::TopologyAsymmetry,
                        format!("lane {id} lists {target} as {relation}, but {target} does not list {id} as {inverse}"),
                    )
                    .with_lane(id)
                    .with_lane(target)
                    .with_relation(relation),
                );
            }
        }
    }
}

fn check_sampling(
    network: &LaneNetwork,
    lane: &Lane,
    config: &ValidationConfig,
    seen_boundaries: &mut HashSet<BoundaryId>,
    out: &mut Vec<Violation>,
) {
    check_polyline(lane.id(), GeometrySubject::CenterLine, lane.center_line(), config, out);

    for (_, id) in lane.all_boundary_ids() {
        if !seen_boundaries.insert(id) {
            continue;
        }
        if let Some(boundary) = network.boundary(id) {
            check_polyline(lane.id(), GeometrySubject::Boundary(id), boundary.polyline(), config, out);
        }
    }
}

/// Spacing and chord-deviation checks for one polyline.
fn check_polyline(
    lane: LaneId,
    subject: GeometrySubject,
    line: &Polyline,
    config: &ValidationConfig,
    out: &mut Vec<Violation>,
) {
    let points = line.points();
    let what = match subject {
        GeometrySubject::CenterLine => format!("lane {lane} centre line"),
        GeometrySubject::Boundary(id) => format!("boundary {id}"),
    };

    for (i, (a, b)) in line.segments().enumerate() {
        let length = a.distance(b);
        if length > config.max_spacing {
            out.push(
                Violation::error(
                    ViolationKind::GeometryToleranceExceeded,
                    format!(
                        "{what}: points {i} and {} are {length:.2} m apart (max {})",
                        i + 1,
                        config.max_spacing
                    ),
                )
                .with_lane(lane)
                .with_geometry(subject)
                .with_segment(i),
            );
        }

        let deviation = chord_deviation(points, i);
        if deviation > config.max_chord_deviation {
            out.push(
                Violation::warning(
                    ViolationKind::ReviewNeeded,
                    format!(
                        "{what}: segment {i} may deviate {deviation:.3} m from the sampled curve (max {})",
                        config.max_chord_deviation
                    ),
                )
                .with_lane(lane)
                .with_geometry(subject)
                .with_segment(i),
            );
        }
    }
}

/// Estimated gap between segment `i` and the curve it samples.
///
/// The sampled data cannot tell how far the true line strays from a
/// segment. Take the larger discrete curvature at the segment's two ends and
/// compute the sagitta `kappa * L^2 / 8` of an arc with that curvature.
///
/// Both curvature circles pass through the segment's end points, so
/// `kappa <= 2 / L` and the estimate stays below `L / 4` however short the
/// neighbouring segments are.
fn chord_deviation(points: &[Point3], i: usize) -> f64 {
    let curvature_at = |v: usize| -> f64 {
        if v == 0 || v + 1 >= points.len() {
            0.0
        } else {
            menger_curvature(points[v - 1], points[v], points[v + 1])
        }
    };
    let length = points[i].distance(points[i + 1]);
    let kappa = curvature_at(i).max(curvature_at(i + 1));
    (kappa * length * length / 8.0).min(length / 4.0)
}

fn check_classification(network: &LaneNetwork, lane: &Lane, out: &mut Vec<Violation>) {
    let id = lane.id();
    let lane_fields = [
        ("type", lane.lane_type() == LaneType::Unknown),
        ("subtype", lane.subtype() == Some(LaneSubtype::Unknown)),
        ("framing", lane.framing() == Some(LaneFraming::Unknown)),
    ];
    for (field, unknown) in lane_fields {
        if unknown {
            out.push(
                Violation::warning(ViolationKind::UnknownClassification, format!("lane {id} has unknown {field}"))
                    .with_lane(id),
            );
        }
    }

    for (_, boundary_id) in lane.all_boundary_ids() {
        let Some(boundary) = network.boundary(boundary_id) else { continue };
        let unknown_type = boundary.boundary_type() == BoundaryType::Unknown;
        let unknown_color =
            boundary.boundary_type().is_marking() && boundary.color() == BoundaryColor::Unknown;
        if unknown_type || unknown_color {
            let field = if unknown_type { "type" } else { "colour" };
            out.push(
                Violation::warning(
                    ViolationKind::UnknownClassification,
                    format!("boundary {boundary_id} of lane {id} has unknown {field}"),
                )
                .with_lane(id)
                .with_boundary(boundary_id),
            );
        }
        if let Some(index) = boundary.points().iter().position(|p| p.dash == Some(DashPhase::Unknown)) {
            out.push(
                Violation::warning(
                    ViolationKind::UnknownClassification,
                    format!("boundary {boundary_id} of lane {id} has unknown dash phase at point {index}"),
                )
                .with_lane(id)
                .with_boundary(boundary_id)
                .with_segment(index),
            );
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
