use chrono::{DateTime, Utc};
use egui::Color32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::interval::{collect_intervals, PlanningInterval};
use super::project::{Project, Team};
use crate::error::StoreError;

/// The authoritative list of teams and projects behind the roadmap.
///
/// Every mutation bumps [`ProjectStore::revision`]; the layout cache compares
/// revisions to know when the scheduler has to run again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectStore {
    pub name: String,
    teams: Vec<Team>,
    projects: Vec<Project>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(skip)]
    revision: u64,
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self {
            name: "Untitled Roadmap".to_string(),
            teams: Vec::new(),
            projects: Vec::new(),
            created: Utc::now(),
            modified: Utc::now(),
            revision: 0,
        }
    }
}

impl ProjectStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }

    pub fn team_names(&self) -> Vec<String> {
        self.teams.iter().map(|t| t.name.clone()).collect()
    }

    pub fn project(&self, id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// All projects that can be laid out, in store order.
    pub fn intervals(&self) -> Vec<PlanningInterval> {
        collect_intervals(&self.projects)
    }

    /// Touch the modified timestamp and notify layout watchers.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
        self.revision += 1;
    }

    pub fn add_team(&mut self, name: &str, color: Color32) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyTeamName);
        }
        if self
            .teams
            .iter()
            .any(|t| t.name.eq_ignore_ascii_case(name))
        {
            return Err(StoreError::DuplicateTeam(name.to_string()));
        }
        self.teams.push(Team::new(name, color));
        self.touch();
        Ok(())
    }

    /// Make sure a team exists, creating it with `color` if needed.
    pub fn ensure_team(&mut self, name: &str, color: Color32) {
        if self.team(name).is_none() && self.add_team(name, color).is_err() {
            tracing::debug!(team = name, "team differs only by case; keeping existing lane");
        }
    }

    pub fn remove_team(&mut self, name: &str) -> Result<(), StoreError> {
        let idx = self
            .teams
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| StoreError::UnknownTeam(name.to_string()))?;
        let in_use = self.projects.iter().filter(|p| p.team == name).count();
        if in_use > 0 {
            return Err(StoreError::TeamInUse {
                team: name.to_string(),
                projects: in_use,
            });
        }
        self.teams.remove(idx);
        self.touch();
        Ok(())
    }

    pub fn add_project(&mut self, project: Project) -> Result<Uuid, StoreError> {
        if self.team(&project.team).is_none() {
            return Err(StoreError::UnknownTeam(project.team));
        }
        let id = project.id;
        self.projects.push(project);
        self.touch();
        Ok(id)
    }

    /// Replace a project wholesale. This is the single write used when a
    /// roadmap gesture completes.
    pub fn update_project(&mut self, project: Project) -> Result<(), StoreError> {
        if self.team(&project.team).is_none() {
            return Err(StoreError::UnknownTeam(project.team));
        }
        let slot = self
            .projects
            .iter_mut()
            .find(|p| p.id == project.id)
            .ok_or(StoreError::UnknownProject(project.id))?;
        *slot = project;
        self.touch();
        Ok(())
    }

    pub fn remove_project(&mut self, id: Uuid) -> Result<Project, StoreError> {
        let idx = self
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::UnknownProject(id))?;
        let removed = self.projects.remove(idx);
        self.touch();
        Ok(removed)
    }

    /// Apply a committed interval (dates and lane) to its project.
    pub fn commit_interval(&mut self, interval: &PlanningInterval) -> Result<(), StoreError> {
        let mut project = self
            .project(interval.id)
            .cloned()
            .ok_or(StoreError::UnknownProject(interval.id))?;
        project.start_date = Some(interval.start);
        project.end_date = Some(interval.end);
        project.team = interval.team.clone();
        self.update_project(project)
    }
}
