use chrono::NaiveDate;
use uuid::Uuid;

use super::project::Project;

/// The unit of roadmap layout: one project's span inside its team lane.
///
/// Always satisfies `start <= end`; [`PlanningInterval::from_project`] refuses
/// projects that would break it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanningInterval {
    pub id: Uuid,
    pub team: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PlanningInterval {
    pub fn new(id: Uuid, team: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id,
            team: team.into(),
            start,
            end,
        }
    }

    /// Derive the interval for a project, or `None` when its dates are missing
    /// or inverted.
    pub fn from_project(project: &Project) -> Option<Self> {
        let (start, end) = match (project.start_date, project.end_date) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                tracing::debug!(project = %project.id, name = %project.name, "unscheduled project left out of layout");
                return None;
            }
        };
        if end < start {
            tracing::warn!(
                project = %project.id,
                name = %project.name,
                %start,
                %end,
                "project ends before it starts; left out of layout"
            );
            return None;
        }
        Some(Self::new(project.id, project.team.clone(), start, end))
    }

    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Half-open overlap test on `[start, end)`.
    pub fn overlaps(&self, other: &PlanningInterval) -> bool {
        spans_overlap((self.start, self.end), (other.start, other.end))
    }
}

/// `[a.0, a.1)` and `[b.0, b.1)` share at least one instant.
pub fn spans_overlap(a: (NaiveDate, NaiveDate), b: (NaiveDate, NaiveDate)) -> bool {
    !(a.1 <= b.0 || a.0 >= b.1)
}

/// Every project that can take part in layout, in store order.
pub fn collect_intervals(projects: &[Project]) -> Vec<PlanningInterval> {
    projects.iter().filter_map(PlanningInterval::from_project).collect()
}
