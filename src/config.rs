//! Layout configuration and persisted user settings.
//!
//! [`RoadmapConfig`] collects every layout constant the roadmap core needs. It is
//! built once (from [`Settings`]) and handed to each component; nothing in the core
//! reads ambient globals.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Immutable layout constants shared by the time scale, scheduler and gestures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadmapConfig {
    /// Number of horizontal slots in the planning window.
    pub slot_count: u32,
    /// Length of one slot in days.
    pub slot_days: u32,
    /// Height of one packed row in pixels.
    pub row_height: f32,
    /// Vertical padding added to every lane (split above and below the rows).
    pub lane_padding: f32,
    /// Lanes are never shorter than this, even when empty.
    pub min_lane_height: f32,
    /// Width of the team-label column on the left of every lane.
    pub label_gutter_width: f32,
    /// Bars never render narrower than this percentage of the lane width.
    pub min_visible_percent: f64,
    pub header_height: f32,
    /// Width of the trailing-edge resize affordance.
    pub handle_width: f32,
}

impl Default for RoadmapConfig {
    fn default() -> Self {
        Self {
            slot_count: 52,
            slot_days: 7,
            row_height: 34.0,
            lane_padding: 10.0,
            min_lane_height: 56.0,
            label_gutter_width: 150.0,
            min_visible_percent: 2.0,
            header_height: 40.0,
            handle_width: 8.0,
        }
    }
}

impl RoadmapConfig {
    /// Replace nonsensical values (zero slots, negative sizes) with defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.slot_count == 0 {
            self.slot_count = defaults.slot_count;
        }
        if self.slot_days == 0 {
            self.slot_days = defaults.slot_days;
        }
        if !(self.row_height > 0.0) {
            self.row_height = defaults.row_height;
        }
        if !(self.lane_padding >= 0.0) {
            self.lane_padding = defaults.lane_padding;
        }
        if !(self.min_lane_height >= 0.0) {
            self.min_lane_height = defaults.min_lane_height;
        }
        if !(self.label_gutter_width >= 0.0) {
            self.label_gutter_width = defaults.label_gutter_width;
        }
        if !(0.0..=100.0).contains(&self.min_visible_percent) {
            self.min_visible_percent = defaults.min_visible_percent;
        }
        if !(self.header_height >= 0.0) {
            self.header_height = defaults.header_height;
        }
        if !(self.handle_width > 0.0) {
            self.handle_width = defaults.handle_width;
        }
        self
    }

    /// Lane height needed to show `rows` packed rows.
    pub fn lane_height_for_rows(&self, rows: usize) -> f32 {
        (rows as f32 * self.row_height + self.lane_padding).max(self.min_lane_height)
    }
}

/// Persisted user settings (lives in the OS config directory).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Planning year shown on startup; `None` means the current year.
    pub planning_year: Option<i32>,
    pub layout: RoadmapConfig,
    /// Team lanes hidden from the roadmap.
    pub hidden_teams: BTreeSet<String>,
}

impl Settings {
    /// Location of `settings.json`.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "RoadmapPlanner")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .unwrap_or_else(|| PathBuf::from(".").join("settings.json"))
    }

    /// Load settings, falling back to defaults when the file is missing or broken.
    pub fn load(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str::<Settings>(&contents) {
            Ok(mut settings) => {
                settings.layout = settings.layout.sanitized();
                settings
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) {
        let json = match serde_json::to_string_pretty(self) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialise settings");
                return;
            }
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = std::fs::write(path, json) {
            tracing::warn!(path = %path.display(), error = %e, "failed to write settings");
        }
    }
}
