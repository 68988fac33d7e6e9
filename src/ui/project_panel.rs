use chrono::NaiveDate;
use egui::{Color32, RichText, Ui};
use uuid::Uuid;

use crate::model::{Project, ProjectStatus, ProjectStore};
use crate::roadmap::scale::shift_days;
use crate::ui::theme;

/// Actions the side panel can request.
pub enum PanelAction {
    None,
    Select(Uuid),
    Update(Project),
    Delete(Uuid),
    AddProject,
}

fn field_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(10.0).color(theme::TEXT_DIM).strong());
}

/// Inline editor for the selected project. Edits a draft and hands it back
/// only when something changed.
pub fn show_project_editor(project: &Project, store: &ProjectStore, ui: &mut Ui) -> PanelAction {
    let mut draft = project.clone();
    let mut changed = false;
    let mut delete = false;

    ui.add_space(6.0);
    ui.label(RichText::new("Edit Project").strong().size(13.0).color(theme::TEXT_PRIMARY));
    ui.add_space(4.0);

    let frame = egui::Frame {
        fill: theme::BG_DARK,
        rounding: egui::Rounding::same(4.0),
        inner_margin: egui::Margin::same(8.0),
        outer_margin: egui::Margin::ZERO,
        stroke: egui::Stroke::new(1.0, theme::BORDER_SUBTLE),
        shadow: egui::epaint::Shadow::NONE,
    };

    frame.show(ui, |ui| {
        ui.spacing_mut().item_spacing.y = 6.0;
        ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;

        field_label(ui, "Name");
        changed |= ui
            .add_sized(
                [ui.available_width(), 24.0],
                egui::TextEdit::singleline(&mut draft.name)
                    .font(egui::FontId::proportional(12.0))
                    .text_color(theme::TEXT_PRIMARY),
            )
            .changed();

        field_label(ui, "Team");
        egui::ComboBox::from_id_salt("team_combo")
            .selected_text(RichText::new(&draft.team).size(11.0))
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                for team in store.teams() {
                    changed |= ui
                        .selectable_value(&mut draft.team, team.name.clone(), team.name.as_str())
                        .changed();
                }
            });

        field_label(ui, "Status");
        egui::ComboBox::from_id_salt("status_combo")
            .selected_text(RichText::new(draft.status.label()).size(11.0))
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                for status in ProjectStatus::ALL {
                    changed |= ui
                        .selectable_value(&mut draft.status, status, status.label())
                        .changed();
                }
            });

        field_label(ui, "Schedule");
        let mut scheduled = draft.start_date.is_some() && draft.end_date.is_some();
        if ui.checkbox(&mut scheduled, "On the roadmap").changed() {
            if scheduled {
                let start = chrono::Local::now().date_naive();
                draft.start_date = Some(start);
                draft.end_date = Some(shift_days(start, 14));
            } else {
                draft.start_date = None;
                draft.end_date = None;
            }
            changed = true;
        }
        if let (Some(mut start), Some(mut end)) = (draft.start_date, draft.end_date) {
            changed |= date_row(ui, "Start", &mut start, "editor_dp_start");
            changed |= date_row(ui, "End", &mut end, "editor_dp_end");
            draft.start_date = Some(start);
            draft.end_date = Some(end);
            if end < start {
                ui.label(
                    RichText::new(format!("{} End is before start; hidden from the roadmap", egui_phosphor::regular::WARNING))
                        .size(10.0)
                        .color(theme::COLLISION),
                );
            }
        }

        field_label(ui, "Description");
        changed |= ui
            .add(
                egui::TextEdit::multiline(&mut draft.description)
                    .desired_rows(3)
                    .desired_width(f32::INFINITY),
            )
            .changed();

        ui.add_space(2.0);
        let del_btn = egui::Button::new(
            RichText::new(format!("{}  Delete Project", egui_phosphor::regular::TRASH))
                .color(Color32::WHITE)
                .size(12.0),
        )
        .fill(Color32::from_rgb(150, 50, 50))
        .rounding(egui::Rounding::same(4.0));
        if ui.add_sized([ui.available_width(), 26.0], del_btn).clicked() {
            delete = true;
        }
    });

    if delete {
        PanelAction::Delete(project.id)
    } else if changed {
        PanelAction::Update(draft)
    } else {
        PanelAction::None
    }
}

fn date_row(ui: &mut Ui, label: &str, date: &mut NaiveDate, salt: &str) -> bool {
    ui.horizontal(|ui| {
        ui.label(RichText::new(label).size(11.0).color(theme::TEXT_SECONDARY));
        ui.add(egui_extras::DatePickerButton::new(date).id_salt(salt))
            .changed()
    })
    .inner
}

/// Project list grouped by team lane, in lane order.
pub fn show_project_list(store: &ProjectStore, selected: Option<Uuid>, ui: &mut Ui) -> PanelAction {
    let mut action = PanelAction::None;

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new("Projects").strong().size(15.0).color(theme::TEXT_PRIMARY));
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("({})", store.projects().len()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(4.0);

    let btn = egui::Button::new(
        RichText::new(format!("{}  Add Project", egui_phosphor::regular::PLUS))
            .color(Color32::WHITE)
            .size(12.0),
    )
    .fill(theme::ACCENT)
    .rounding(egui::Rounding::same(5.0));
    if ui.add_sized([ui.available_width(), 30.0], btn).clicked() {
        action = PanelAction::AddProject;
    }

    ui.add_space(6.0);
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for team in store.teams() {
                let projects: Vec<&Project> =
                    store.projects().iter().filter(|p| p.team == team.name).collect();

                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    let (dot_rect, _) =
                        ui.allocate_exact_size(egui::vec2(8.0, 8.0), egui::Sense::hover());
                    ui.painter().circle_filled(dot_rect.center(), 4.0, team.color);
                    ui.label(RichText::new(&team.name).size(12.0).strong().color(theme::TEXT_SECONDARY));
                    ui.label(RichText::new(format!("{}", projects.len())).size(10.0).color(theme::TEXT_DIM));
                });

                for project in projects {
                    if project_row(ui, project, selected == Some(project.id)) {
                        action = PanelAction::Select(project.id);
                    }
                    ui.add_space(1.0);
                }
            }
        });

    action
}

fn project_row(ui: &mut Ui, project: &Project, is_selected: bool) -> bool {
    let frame = egui::Frame {
        fill: if is_selected { theme::BG_SELECTED } else { theme::BG_PANEL },
        rounding: egui::Rounding::same(4.0),
        inner_margin: egui::Margin::symmetric(6.0, 4.0),
        outer_margin: egui::Margin::ZERO,
        stroke: egui::Stroke::NONE,
        shadow: egui::epaint::Shadow::NONE,
    };

    let frame_resp = frame.show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 6.0;
            let name_color = if is_selected { Color32::WHITE } else { theme::TEXT_PRIMARY };
            ui.add(egui::Label::new(RichText::new(&project.name).size(12.0).color(name_color)).truncate());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let dates = match (project.start_date, project.end_date) {
                    (Some(start), Some(end)) => {
                        format!("{} → {}", start.format("%d/%m"), end.format("%d/%m"))
                    }
                    _ => "unscheduled".to_string(),
                };
                ui.label(RichText::new(dates).size(10.0).color(theme::TEXT_SECONDARY));
            });
        });
    });

    ui.interact(
        frame_resp.response.rect,
        egui::Id::new(("project-row", project.id)),
        egui::Sense::click(),
    )
    .clicked()
}
