//! Row packing: stack a lane's intervals into rows so that no two intervals
//! sharing a row overlap in time.
//!
//! This is first-fit by earliest start. It is not row-count optimal for every
//! input, but it is deterministic, so an unchanged lane always renders the
//! same way.

use uuid::Uuid;

use crate::model::PlanningInterval;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowAssignment {
    pub interval_id: Uuid,
    pub row: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackResult {
    /// One assignment per input interval, in input order.
    pub assignments: Vec<RowAssignment>,
    pub row_count: usize,
}

/// Assign every interval to the lowest row it fits in.
pub fn pack(intervals: &[PlanningInterval]) -> PackResult {
    // Stable sort: equal starts keep their input order.
    let mut order: Vec<usize> = (0..intervals.len()).collect();
    order.sort_by_key(|&i| intervals[i].start);

    let mut rows: Vec<Vec<&PlanningInterval>> = Vec::new();
    let mut row_of = vec![0usize; intervals.len()];

    for idx in order {
        let interval = &intervals[idx];
        let free = rows
            .iter()
            .position(|placed| !placed.iter().any(|other| interval.overlaps(other)));
        let row = match free {
            Some(row) => row,
            None => {
                rows.push(Vec::new());
                rows.len() - 1
            }
        };
        rows[row].push(interval);
        row_of[idx] = row;
    }

    let assignments = intervals
        .iter()
        .zip(row_of)
        .map(|(interval, row)| RowAssignment {
            interval_id: interval.id,
            row,
        })
        .collect();

    PackResult {
        assignments,
        row_count: rows.len(),
    }
}

/// One team lane after packing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedLane {
    pub team: String,
    pub intervals: Vec<PlanningInterval>,
    pub packing: PackResult,
}

impl PackedLane {
    /// `(interval, row)` pairs in store order.
    pub fn rows(&self) -> impl Iterator<Item = (&PlanningInterval, usize)> {
        self.intervals
            .iter()
            .zip(self.packing.assignments.iter().map(|a| a.row))
    }

    pub fn row_count(&self) -> usize {
        self.packing.row_count
    }
}

/// Group intervals by lane (in `lanes` order) and pack each lane.
/// Intervals whose team is not listed are not shown.
pub fn pack_lanes(intervals: &[PlanningInterval], lanes: &[String]) -> Vec<PackedLane> {
    lanes
        .iter()
        .map(|team| {
            let members: Vec<PlanningInterval> = intervals
                .iter()
                .filter(|i| &i.team == team)
                .cloned()
                .collect();
            let packing = pack(&members);
            PackedLane {
                team: team.clone(),
                intervals: members,
                packing,
            }
        })
        .collect()
}
