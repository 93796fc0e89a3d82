//! Validation findings.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::model::{BoundaryId, LaneId};
use crate::network::Relation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// Machine-readable violation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// An id set or boundary list names something absent from the snapshot.
    DanglingReference,
    /// A link is not mirrored by the linked lane.
    TopologyAsymmetry,
    /// Endpoint coincidence or point spacing outside tolerance.
    GeometryToleranceExceeded,
    /// Sampling may be too coarse for the curve; needs a human look.
    ReviewNeeded,
    /// An `Unknown` classification in ground truth.
    UnknownClassification,
    /// The same id was ingested twice.
    DuplicateIdentifier,
}

/// Which polyline a geometric finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "on", content = "id")]
pub enum GeometrySubject {
    CenterLine,
    Boundary(BoundaryId),
}

/// One finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub severity: Severity,
    pub kind: ViolationKind,
    /// Offending lane first, then the lane it references (if any).
    pub lanes: SmallVec<[LaneId; 2]>,
    pub relation: Option<Relation>,
    pub boundary: Option<BoundaryId>,
    pub geometry: Option<GeometrySubject>,
    /// Index of the offending point or segment.
    pub segment: Option<usize>,
    pub message: String,
}

impl Violation {
    pub fn new(severity: Severity, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind,
            lanes: SmallVec::new(),
            relation: None,
            boundary: None,
            geometry: None,
            segment: None,
            message: message.into(),
        }
    }

    pub fn error(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, kind, message)
    }

    pub fn warning(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, kind, message)
    }

    pub fn with_lane(mut self, id: LaneId) -> Self {
        self.lanes.push(id);
        self
    }

    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relation = Some(relation);
        self
    }

    pub fn with_boundary(mut self, id: BoundaryId) -> Self {
        self.boundary = Some(id);
        self
    }

    pub fn with_geometry(mut self, subject: GeometrySubject) -> Self {
        if let GeometrySubject::Boundary(id) = subject {
            self.boundary = Some(id);
        }
        self.geometry = Some(subject);
        self
    }

    pub fn with_segment(mut self, index: usize) -> Self {
        self.segment = Some(index);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// The lane the finding was raised on.
    pub fn lane(&self) -> Option<LaneId> {
        self.lanes.first().copied()
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{level}[{:?}]: {}", self.kind, self.message)
    }
}
