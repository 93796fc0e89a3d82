//! Bounded breadth-first traversal along the direction of travel.
//!
//! Lane graphs are expected to be acyclic along successor edges, but
//! producers can emit malformed loops, so traversal keeps a visited set
//! and always stops at `max_hops`.

use hashbrown::HashMap;

use super::LaneNetwork;
use crate::model::LaneId;
use crate::Result;

/// A lane reached by [`LaneNetwork::reachable_from`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReachedLane {
    pub id: LaneId,
    /// Successor hops from the start lane (0 for the start itself).
    pub hops: usize,
    /// BFS parent; `None` for the start lane.
    pub via: Option<LaneId>,
}

/// Outcome of a bounded successor traversal.
#[derive(Debug, Clone, Default)]
pub struct Reachability {
    /// Reached lanes in BFS order, start lane first.
    pub reached: Vec<ReachedLane>,
    /// `(from, missing)` pairs for successor ids that name no lane.
    pub dangling: Vec<(LaneId, LaneId)>,
    /// True when unexplored successors remained at the hop limit.
    pub truncated: bool,
    position: HashMap<LaneId, usize>,
}

impl Reachability {
    pub fn ids(&self) -> Vec<LaneId> {
        self.reached.iter().map(|r| r.id).collect()
    }

    pub fn contains(&self, id: LaneId) -> bool {
        self.position.contains_key(&id)
    }

    pub fn hops_to(&self, id: LaneId) -> Option<usize> {
        self.position.get(&id).map(|&i| self.reached[i].hops)
    }

    /// Lane ids from the start lane to `id`, following BFS parents.
    pub fn path_to(&self, id: LaneId) -> Option<Vec<LaneId>> {
        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let entry = self.reached[*self.position.get(&current)?];
            path.push(entry.id);
            cursor = entry.via;
        }
        path.reverse();
        Some(path)
    }

    fn push(&mut self, lane: ReachedLane) {
        self.position.insert(lane.id, self.reached.len());
        self.reached.push(lane);
    }
}

impl LaneNetwork {
    /// Every lane reachable from `start` within `max_hops` successor hops.
    pub fn reachable_from(&self, start: LaneId, max_hops: usize) -> Result<Reachability> {
        self.lane(start)?;

        let mut out = Reachability::default();
        out.push(ReachedLane { id: start, hops: 0, via: None });

        let mut frontier = vec![start];
        for hop in 1..=max_hops {
            let mut next = Vec::new();
            for &id in &frontier {
                let Some(lane) = self.get(id) else { continue };
                for &succ in lane.successor_ids() {
                    if !self.contains(succ) {
                        out.dangling.push((id, succ));
                        continue;
                    }
                    // Cycle guard
                    if out.contains(succ) {
                        continue;
                    }
                    out.push(ReachedLane { id: succ, hops: hop, via: Some(id) });
                    next.push(succ);
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        // The last frontier is either fully expanded or sits at the limit.
        out.truncated = frontier.iter().filter_map(|&id| self.get(id)).any(|lane| {
            lane.successor_ids()
                .iter()
                .any(|&s| self.contains(s) && !out.contains(s))
        });

        tracing::trace!(
            start = %start,
            max_hops,
            reached = out.reached.len(),
            truncated = out.truncated,
            "successor traversal"
        );
        Ok(out)
    }

    /// Shortest successor corridor from `from` to `to`, if one exists
    /// within `max_hops`.
    pub fn route(&self, from: LaneId, to: LaneId, max_hops: usize) -> Result<Option<Vec<LaneId>>> {
        self.lane(to)?;
        Ok(self.reachable_from(from, max_hops)?.path_to(to))
    }
}

// ============================================================================
// Tests
// ============================================================================
