use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::config::{RoadmapConfig, Settings};
use crate::model::{Project, ProjectStatus, ProjectStore};
use crate::roadmap::scale::shift_days;
use crate::roadmap::{GestureCommit, GestureController, GestureKind, RoadmapLayout, TimeScale};
use crate::ui;
use crate::ui::project_panel::PanelAction;

/// Fields of the "Add Project" dialog.
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub name: String,
    pub team: String,
    pub scheduled: bool,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Main application state.
pub struct RoadmapApp {
    pub store: ProjectStore,
    pub settings: Settings,
    settings_path: PathBuf,
    pub config: RoadmapConfig,
    pub planning_year: i32,
    pub gestures: GestureController,
    layout: RoadmapLayout,
    /// Store revision and visible lanes the cached layout was built from.
    layout_key: Option<(u64, Vec<String>)>,
    pub file_path: Option<PathBuf>,
    pub selected: Option<Uuid>,

    // Dialog state
    pub show_add_project: bool,
    pub show_add_team: bool,
    pub show_about: bool,
    pub new_project: ProjectDraft,
    pub new_team_name: String,

    pub status_message: String,
}

impl RoadmapApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let settings_path = Settings::default_path();
        let settings = Settings::load(&settings_path);
        Self::with_settings(settings, settings_path)
    }

    /// Build the app around already loaded settings, starting on the sample roadmap.
    pub fn with_settings(settings: Settings, settings_path: PathBuf) -> Self {
        let config = settings.layout.clone().sanitized();
        let planning_year = settings
            .planning_year
            .unwrap_or_else(|| chrono::Local::now().date_naive().year());
        let store = Self::sample_store(planning_year);
        let new_project = ProjectDraft {
            name: String::new(),
            team: String::new(),
            scheduled: true,
            start: NaiveDate::from_yo_opt(planning_year, 1).unwrap_or_default(),
            end: NaiveDate::from_yo_opt(planning_year, 15).unwrap_or_default(),
        };
        tracing::info!(year = planning_year, path = %settings_path.display(), "roadmap planner started");

        Self {
            store,
            settings,
            settings_path,
            gestures: GestureController::new(config.clone()),
            config,
            planning_year,
            layout: RoadmapLayout::default(),
            layout_key: None,
            file_path: None,
            selected: None,
            show_add_project: false,
            show_add_team: false,
            show_about: false,
            new_project,
            new_team_name: String::new(),
            status_message: "Ready".to_string(),
        }
    }

    /// Generate a sample roadmap for demonstration.
    fn sample_store(year: i32) -> ProjectStore {
        let week = |w: i64| {
            let jan1 = NaiveDate::from_yo_opt(year, 1).unwrap_or_default();
            shift_days(jan1, w * 7)
        };
        let mut store = ProjectStore::new("Sample Roadmap");
        for (i, team) in ["Platform", "Payments", "Mobile"].into_iter().enumerate() {
            store.ensure_team(team, ui::theme::team_color(i));
        }

        let mut projects = vec![
            Project::new("Service mesh rollout", "Platform", week(1), week(9)),
            Project::new("Observability revamp", "Platform", week(6), week(14)),
            Project::new("Kubernetes upgrade", "Platform", week(18), week(22)),
            Project::new("Card tokenisation", "Payments", week(2), week(12)),
            Project::new("SEPA instant", "Payments", week(14), week(26)),
            Project::new("Refund automation", "Payments", week(20), week(28)),
            Project::new("Offline mode", "Mobile", week(4), week(16)),
            Project::new("Design system v2", "Mobile", week(10), week(20)),
        ];
        projects[0].status = ProjectStatus::Done;
        projects[1].status = ProjectStatus::InProgress;
        projects[3].status = ProjectStatus::InProgress;
        projects[6].status = ProjectStatus::OnHold;
        projects.push(Project::unscheduled("Wallet integration", "Payments"));

        for project in projects {
            if let Err(e) = store.add_project(project) {
                tracing::warn!(error = %e, "sample project rejected");
            }
        }
        store
    }

    pub fn scale(&self) -> TimeScale {
        TimeScale::for_year(self.planning_year, &self.config)
    }

    pub fn visible_teams(&self) -> Vec<String> {
        self.store
            .team_names()
            .into_iter()
            .filter(|name| !self.settings.hidden_teams.contains(name))
            .collect()
    }

    /// Re-run the scheduler when the store or the visible lanes changed.
    pub fn refresh_layout(&mut self) -> &RoadmapLayout {
        let key = (self.store.revision(), self.visible_teams());
        if self.layout_key.as_ref() != Some(&key) {
            self.layout = RoadmapLayout::build(&self.store, &key.1, &self.config);
            self.layout_key = Some(key);
        }
        &self.layout
    }

    fn replace_store(&mut self, store: ProjectStore, file_path: Option<PathBuf>) {
        self.gestures.cancel();
        self.store = store;
        self.file_path = file_path;
        self.selected = None;
        self.layout_key = None;
    }

    fn save_settings(&self) {
        self.settings.save(&self.settings_path);
    }

    // --- File operations ---

    pub fn new_roadmap(&mut self) {
        self.replace_store(ProjectStore::default(), None);
        self.status_message = "New roadmap created".to_string();
    }

    pub fn open_roadmap(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Roadmap", &["roadmap.json", "json"])
            .pick_file()
        {
            match crate::io::load_store(&path) {
                Ok(store) => {
                    self.replace_store(store, Some(path));
                    self.status_message = "Roadmap loaded".to_string();
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "failed to load roadmap");
                    self.status_message = format!("Error loading: {}", e);
                }
            }
        }
    }

    pub fn save_roadmap(&mut self) {
        match self.file_path.clone() {
            Some(path) => self.write_to(&path),
            None => self.save_roadmap_as(),
        }
    }

    pub fn save_roadmap_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Roadmap", &["roadmap.json", "json"])
            .set_file_name(format!("{}.roadmap.json", self.store.name))
            .save_file()
        {
            self.file_path = Some(path.clone());
            self.write_to(&path);
        }
    }

    fn write_to(&mut self, path: &Path) {
        self.store.touch();
        match crate::io::save_store(&self.store, path) {
            Ok(()) => self.status_message = "Roadmap saved".to_string(),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to save roadmap");
                self.status_message = format!("Error saving: {}", e);
            }
        }
    }

    pub fn import_csv(&mut self) {
        // Guard: if the current roadmap has projects, confirm before replacing
        if !self.store.projects().is_empty() {
            let confirm = rfd::MessageDialog::new()
                .set_title("Import CSV")
                .set_description("This will replace the current roadmap. Continue?")
                .set_buttons(rfd::MessageButtons::YesNo)
                .show();
            if confirm != rfd::MessageDialogResult::Yes {
                return;
            }
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        {
            match crate::io::csv_import::import_csv(&path) {
                Ok((store, skipped)) => {
                    let count = store.projects().len();
                    self.replace_store(store, None);
                    self.status_message = if skipped > 0 {
                        format!("Imported {} projects ({} rows skipped)", count, skipped)
                    } else {
                        format!("Imported {} projects", count)
                    };
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "csv import failed");
                    self.status_message = format!("CSV import failed: {}", e);
                }
            }
        }
    }

    pub fn export_csv(&mut self) {
        if self.store.projects().is_empty() {
            self.status_message = "Nothing to export; the roadmap has no projects".to_string();
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(format!("{}.csv", self.store.name))
            .save_file()
        {
            match crate::io::csv_export::export_csv(self.store.projects(), &path) {
                Ok(count) => self.status_message = format!("Exported {} projects to CSV", count),
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "csv export failed");
                    self.status_message = format!("CSV export failed: {}", e);
                }
            }
        }
    }

    pub fn open_settings_folder(&mut self) {
        let Some(dir) = self.settings_path.parent() else {
            return;
        };
        if let Err(e) = std::fs::create_dir_all(dir).and_then(|_| open::that(dir)) {
            tracing::warn!(path = %dir.display(), error = %e, "could not open settings folder");
            self.status_message = format!("Could not open settings folder: {}", e);
        }
    }

    // --- View ---

    pub fn shift_year(&mut self, delta: i32) {
        self.set_year(self.planning_year + delta);
    }

    pub fn reset_year(&mut self) {
        self.set_year(chrono::Local::now().date_naive().year());
    }

    fn set_year(&mut self, year: i32) {
        // The gesture's scale belongs to the old window.
        self.gestures.cancel();
        self.planning_year = year;
        self.settings.planning_year = Some(year);
        self.save_settings();
        self.status_message = format!("Planning year {}", year);
    }

    pub fn set_team_visible(&mut self, team: &str, visible: bool) {
        self.gestures.cancel();
        if visible {
            self.settings.hidden_teams.remove(team);
        } else {
            self.settings.hidden_teams.insert(team.to_string());
        }
        self.save_settings();
    }

    // --- Project operations ---

    pub fn open_add_project(&mut self) {
        let scale = self.scale();
        let today = chrono::Local::now().date_naive();
        let start = if scale.contains(today) {
            scale.slot_start(today)
        } else {
            scale.origin()
        };
        self.new_project = ProjectDraft {
            name: String::new(),
            team: self
                .selected
                .and_then(|id| self.store.project(id))
                .map(|p| p.team.clone())
                .or_else(|| self.visible_teams().into_iter().next())
                .unwrap_or_default(),
            scheduled: true,
            start,
            end: shift_days(start, 2 * scale.slot_days()),
        };
        self.show_add_project = true;
    }

    pub fn create_project_from_dialog(&mut self) {
        let draft = self.new_project.clone();
        let name = if draft.name.trim().is_empty() {
            "New Project".to_string()
        } else {
            draft.name.trim().to_string()
        };
        let project = if draft.scheduled {
            let end = if draft.end >= draft.start {
                draft.end
            } else {
                shift_days(draft.start, self.scale().slot_days())
            };
            Project::new(name, draft.team, draft.start, end)
        } else {
            Project::unscheduled(name, draft.team)
        };

        match self.store.add_project(project) {
            Ok(id) => {
                self.selected = Some(id);
                self.status_message = "Project added".to_string();
            }
            Err(e) => self.status_message = format!("Could not add project: {}", e),
        }
    }

    /// Returns true when the team was created and the dialog may close.
    pub fn create_team_from_dialog(&mut self) -> bool {
        let color = ui::theme::team_color(self.store.teams().len());
        match self.store.add_team(&self.new_team_name, color) {
            Ok(()) => {
                self.status_message = format!("Team '{}' added", self.new_team_name.trim());
                true
            }
            Err(e) => {
                self.status_message = e.to_string();
                false
            }
        }
    }

    pub fn remove_team(&mut self, name: &str) {
        match self.store.remove_team(name) {
            Ok(()) => {
                self.settings.hidden_teams.remove(name);
                self.status_message = format!("Team '{}' removed", name);
            }
            Err(e) => self.status_message = e.to_string(),
        }
    }

    pub fn delete_project(&mut self, id: Uuid) {
        if self.gestures.working_copy(id).is_some() {
            self.gestures.cancel();
        }
        match self.store.remove_project(id) {
            Ok(project) => {
                if self.selected == Some(id) {
                    self.selected = None;
                }
                self.status_message = format!("Deleted '{}'", project.name);
            }
            Err(e) => self.status_message = e.to_string(),
        }
    }

    fn apply_panel_action(&mut self, action: PanelAction) {
        match action {
            PanelAction::None => {}
            PanelAction::Select(id) => self.selected = Some(id),
            PanelAction::AddProject => self.open_add_project(),
            PanelAction::Delete(id) => self.delete_project(id),
            PanelAction::Update(project) => {
                if let Err(e) = self.store.update_project(project) {
                    self.status_message = e.to_string();
                }
            }
        }
    }

    /// Write a finished gesture back to the store. Unchanged results are dropped.
    pub fn apply_commit(&mut self, commit: GestureCommit) {
        if !commit.changed() {
            return;
        }
        let verb = match commit.kind {
            GestureKind::Move => "Moved",
            GestureKind::Resize => "Resized",
        };
        match self.store.commit_interval(&commit.interval) {
            Ok(()) => {
                let name = self
                    .store
                    .project(commit.interval.id)
                    .map(|p| p.name.clone())
                    .unwrap_or_default();
                self.status_message = format!(
                    "{} '{}' ({} → {}, {})",
                    verb,
                    name,
                    commit.interval.start.format("%Y-%m-%d"),
                    commit.interval.end.format("%Y-%m-%d"),
                    commit.interval.team,
                );
            }
            Err(e) => {
                tracing::warn!(project = %commit.interval.id, error = %e, "gesture result rejected");
                self.status_message = format!("Could not apply change: {}", e);
            }
        }
    }
}

impl eframe::App for RoadmapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        // Handle keyboard shortcuts outside closures to avoid borrow issues
        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S)) {
            self.save_roadmap();
        }

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        let scheduled = self.store.intervals().len();
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Projects: {} · On roadmap: {} · Teams: {}",
                                self.store.projects().len(),
                                scheduled,
                                self.store.teams().len(),
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Left panel: project editor + list
        let mut actions = Vec::new();
        egui::SidePanel::left("project_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .min_width(200.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                if let Some(project) = self.selected.and_then(|id| self.store.project(id)) {
                    actions.push(ui::project_panel::show_project_editor(project, &self.store, ui));
                    ui.add_space(4.0);
                    ui.separator();
                }
                actions.push(ui::project_panel::show_project_list(&self.store, self.selected, ui));
            });
        for action in actions {
            self.apply_panel_action(action);
        }

        // Central panel: roadmap chart
        self.refresh_layout();
        let scale = self.scale();
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        let interaction = egui::CentralPanel::default()
            .frame(chart_frame)
            .show(ctx, |ui| {
                let view = ui::roadmap_chart::RoadmapView {
                    store: &self.store,
                    layout: &self.layout,
                    config: &self.config,
                    scale,
                };
                ui::roadmap_chart::show_roadmap_chart(view, &mut self.gestures, &mut self.selected, ui)
            })
            .inner;
        if interaction.cancelled {
            self.status_message = "Change cancelled".to_string();
        }
        if let Some(commit) = interaction.commit {
            self.apply_commit(commit);
        }

        // Dialogs
        if self.show_add_project {
            ui::dialogs::show_add_project_dialog(self, ctx);
        }
        if self.show_add_team {
            ui::dialogs::show_add_team_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlanningInterval;

    fn app() -> (RoadmapApp, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            planning_year: Some(2025),
            ..Settings::default()
        };
        let app = RoadmapApp::with_settings(settings, dir.path().join("settings.json"));
        (app, dir)
    }

    fn first_scheduled(app: &RoadmapApp) -> PlanningInterval {
        app.store.intervals().into_iter().next().unwrap()
    }

    #[test]
    fn sample_roadmap_has_three_lanes_in_the_planning_year() {
        let (mut app, _dir) = app();
        assert_eq!(app.store.team_names(), vec!["Platform", "Payments", "Mobile"]);
        let scale = app.scale();
        assert!(app.store.intervals().iter().all(|iv| scale.contains(iv.start)));
        assert_eq!(app.refresh_layout().lanes.len(), 3);
    }

    #[test]
    fn layout_is_rebuilt_only_when_the_store_changes() {
        let (mut app, _dir) = app();
        app.refresh_layout();
        let key = app.layout_key.clone();
        app.refresh_layout();
        assert_eq!(app.layout_key, key);

        let original = first_scheduled(&app);
        let mut moved = original.clone();
        moved.start = shift_days(moved.start, 7);
        moved.end = shift_days(moved.end, 7);
        app.apply_commit(GestureCommit {
            kind: GestureKind::Move,
            original,
            interval: moved.clone(),
        });
        app.refresh_layout();
        assert_ne!(app.layout_key, key);
        let project = app.store.project(moved.id).unwrap();
        assert_eq!(project.start_date, Some(moved.start));
        assert_eq!(project.end_date, Some(moved.end));
    }

    #[test]
    fn unchanged_commit_does_not_touch_the_store() {
        let (mut app, _dir) = app();
        let original = first_scheduled(&app);
        let before = app.store.revision();
        app.apply_commit(GestureCommit {
            kind: GestureKind::Resize,
            original: original.clone(),
            interval: original,
        });
        assert_eq!(app.store.revision(), before);
    }

    #[test]
    fn commit_to_another_lane_reassigns_the_team() {
        let (mut app, _dir) = app();
        let original = first_scheduled(&app);
        let mut moved = original.clone();
        moved.team = "Mobile".to_string();
        app.apply_commit(GestureCommit {
            kind: GestureKind::Move,
            original,
            interval: moved.clone(),
        });
        assert_eq!(app.store.project(moved.id).unwrap().team, "Mobile");
        assert!(app.status_message.starts_with("Moved"));
    }

    #[test]
    fn hidden_teams_drop_out_of_the_layout_and_persist() {
        let (mut app, dir) = app();
        app.set_team_visible("Payments", false);
        let lanes: Vec<String> = app.refresh_layout().lanes.iter().map(|l| l.team.clone()).collect();
        assert_eq!(lanes, vec!["Platform", "Mobile"]);

        let reloaded = Settings::load(&dir.path().join("settings.json"));
        assert!(reloaded.hidden_teams.contains("Payments"));
    }

    #[test]
    fn new_project_defaults_to_a_slot_aligned_start() {
        let (mut app, _dir) = app();
        app.open_add_project();
        app.new_project.name = "Fraud scoring".into();
        app.new_project.team = "Payments".into();
        app.create_project_from_dialog();

        let id = app.selected.unwrap();
        let project = app.store.project(id).unwrap();
        let start = project.start_date.unwrap();
        assert!(app.scale().is_slot_boundary(start));
        assert_eq!((project.end_date.unwrap() - start).num_days(), 14);
    }

    #[test]
    fn team_with_projects_cannot_be_removed() {
        let (mut app, _dir) = app();
        app.remove_team("Mobile");
        assert_eq!(app.store.teams().len(), 3);
        assert!(app.status_message.contains("Mobile"));

        app.new_team_name = "Data".into();
        app.create_team_from_dialog();
        app.remove_team("Data");
        assert!(app.store.team("Data").is_none());
    }

    #[test]
    fn duplicate_team_keeps_the_dialog_open() {
        let (mut app, _dir) = app();
        app.new_team_name = "platform".into();
        assert!(!app.create_team_from_dialog());
        app.new_team_name = "Data".into();
        assert!(app.create_team_from_dialog());
        assert_eq!(app.store.teams().len(), 4);
    }
}
