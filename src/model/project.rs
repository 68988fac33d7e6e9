use chrono::NaiveDate;
use egui::Color32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProjectStatus {
    Proposed,
    #[default]
    Planned,
    InProgress,
    OnHold,
    Done,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 5] = [
        ProjectStatus::Proposed,
        ProjectStatus::Planned,
        ProjectStatus::InProgress,
        ProjectStatus::OnHold,
        ProjectStatus::Done,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Proposed => "Proposed",
            ProjectStatus::Planned => "Planned",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::OnHold => "On Hold",
            ProjectStatus::Done => "Done",
        }
    }

    /// Lenient parse used by CSV import. Unknown text maps to `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "proposed" | "idea" | "draft" | "new" => Some(ProjectStatus::Proposed),
            "planned" | "not started" | "not-started" | "scheduled" => Some(ProjectStatus::Planned),
            "in progress" | "in-progress" | "active" | "started" => Some(ProjectStatus::InProgress),
            "on hold" | "on-hold" | "paused" | "blocked" => Some(ProjectStatus::OnHold),
            "done" | "finished" | "complete" | "completed" => Some(ProjectStatus::Done),
            _ => None,
        }
    }
}

/// A team owns one lane on the roadmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    /// Bar color for this team's projects (stored as RGBA).
    #[serde(with = "color_serde")]
    pub color: Color32,
}

impl Team {
    pub fn new(name: impl Into<String>, color: Color32) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// A project on the roadmap. Projects without both dates stay in the store but
/// are left out of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub team: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub description: String,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        team: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            team: team.into(),
            start_date: Some(start),
            end_date: Some(end),
            status: ProjectStatus::default(),
            description: String::new(),
        }
    }

    /// A project with no dates yet.
    pub fn unscheduled(name: impl Into<String>, team: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            team: team.into(),
            start_date: None,
            end_date: None,
            status: ProjectStatus::Proposed,
            description: String::new(),
        }
    }
}

/// Serde helper for `Color32`.
mod color_serde {
    use egui::Color32;
    use serde::{self, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        color.to_array().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Color32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [r, g, b, a]: [u8; 4] = Deserialize::deserialize(deserializer)?;
        Ok(Color32::from_rgba_premultiplied(r, g, b, a))
    }
}
