//! Typed errors for the store/io layer and the gesture controller.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the project store and the file/CSV layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid roadmap file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required columns. Found headers: {0:?}. Need columns for: name, team.")]
    MissingColumns(Vec<String>),

    #[error("No valid projects found in CSV ({skipped} rows skipped)")]
    NoRows { skipped: usize },

    #[error("Unknown project {0}")]
    UnknownProject(Uuid),

    #[error("Unknown team '{0}'")]
    UnknownTeam(String),

    #[error("A team named '{0}' already exists")]
    DuplicateTeam(String),

    #[error("Team name must not be empty")]
    EmptyTeamName,

    #[error("Team '{team}' still has {projects} project(s)")]
    TeamInUse { team: String, projects: usize },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors from the pointer-gesture controller. None of these reach the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GestureError {
    #[error("a gesture is already in progress")]
    AlreadyActive,

    #[error("no gesture in progress")]
    NoSession,
}
