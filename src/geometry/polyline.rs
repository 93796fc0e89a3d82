//! Polyline with cached cumulative arc length.

use super::Point3;
use crate::{Error, Result};

/// An ordered point sequence with its arc-length stations.
///
/// `stations[i]` is the distance along the polyline from the first point to
/// `points[i]`; `stations[0] == 0.0` whenever the polyline is non-empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    points: Vec<Point3>,
    stations: Vec<f64>,
}

/// Where a station falls on a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Locus {
    /// Index of the point that starts the bracketing segment. Equal to the
    /// last point index when the station is the end of the polyline.
    pub index: usize,
    /// Fraction along the bracketing segment, in `[0, 1)`.
    pub t: f64,
}

/// Closest point on a polyline to some query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub station: f64,
    pub point: Point3,
    pub distance: f64,
}

impl Polyline {
    /// Build a polyline, rejecting non-finite coordinates.
    pub fn new(points: Vec<Point3>) -> Result<Self> {
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(Error::InvalidShape(format!(
                "point {i} has a non-finite coordinate"
            )));
        }

        let mut stations = Vec::with_capacity(points.len());
        let mut acc = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                acc += points[i - 1].distance(*p);
            }
            stations.push(acc);
        }

        Ok(Self { points, stations })
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn stations(&self) -> &[f64] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Point3> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point3> {
        self.points.last().copied()
    }

    /// Total arc length. Zero for empty and single-point polylines.
    pub fn length(&self) -> f64 {
        self.stations.last().copied().unwrap_or(0.0)
    }

    /// Consecutive point pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Point3, Point3)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Index of the first segment of zero length, if any.
    pub fn first_degenerate_segment(&self) -> Option<usize> {
        self.stations.windows(2).position(|w| w[1] <= w[0])
    }

    /// Find the segment bracketing station `s`.
    pub fn locate(&self, s: f64) -> Result<Locus> {
        if self.points.is_empty() {
            return Err(Error::EmptyGeometry);
        }
        let length = self.length();
        // NaN fails the range check too
        if !(0.0..=length).contains(&s) {
            return Err(Error::OutOfRange { requested: s, length });
        }

        let last = self.points.len() - 1;
        let index = self
            .stations
            .partition_point(|&station| station <= s)
            .saturating_sub(1)
            .min(last);
        if index == last {
            return Ok(Locus { index, t: 0.0 });
        }

        let span = self.stations[index + 1] - self.stations[index];
        let t = if span > 0.0 { (s - self.stations[index]) / span } else { 0.0 };
        Ok(Locus { index, t })
    }

    /// Interpolated position at a located station.
    pub fn point_at_locus(&self, locus: Locus) -> Point3 {
        let a = self.points[locus.index];
        match self.points.get(locus.index + 1) {
            Some(&b) if locus.t > 0.0 => a.lerp(b, locus.t),
            _ => a,
        }
    }

    /// Interpolated position at station `s`.
    pub fn point_at(&self, s: f64) -> Result<Point3> {
        let locus = self.locate(s)?;
        Ok(self.point_at_locus(locus))
    }

    /// Unit direction of travel at station `s`.
    ///
    /// At the end point the last segment's direction is used. `None` when
    /// the polyline has no segment of non-zero length around `s`.
    pub fn tangent_at(&self, s: f64) -> Result<Option<Point3>> {
        let locus = self.locate(s)?;
        let last = self.points.len() - 1;
        let start = if locus.index == last { last.saturating_sub(1) } else { locus.index };
        Ok(self
            .points
            .get(start + 1)
            .and_then(|&b| (b - self.points[start]).try_normalize()))
    }

    /// Closest point on the polyline to `p`.
    pub fn project(&self, p: Point3) -> Option<Projection> {
        let first = *self.points.first()?;
        let mut best = Projection {
            station: 0.0,
            point: first,
            distance: first.distance(p),
        };

        for (i, (a, b)) in self.segments().enumerate() {
            let ab = b - a;
            let len_sq = ab.length_squared();
            if len_sq == 0.0 {
                continue;
            }
            let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
            let point = a + ab * t;
            let distance = point.distance(p);
            if distance < best.distance {
                best = Projection {
                    station: self.stations[i] + (self.stations[i + 1] - self.stations[i]) * t,
                    point,
                    distance,
                };
            }
        }

        Some(best)
    }
}

// ============================================================================
// Tests
// ============================================================================
