use crate::app::RoadmapApp;
use crate::ui::theme;
use egui::{Color32, Context, RichText, Window};

const DIALOG_WIDTH: f32 = 320.0;

/// Render the "Add Project" dialog.
pub fn show_add_project_dialog(app: &mut RoadmapApp, ctx: &Context) {
    let mut should_close = false;
    Window::new(RichText::new("Add Project").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
            ui.add_space(4.0);

            let teams = app.store.team_names();
            let draft = &mut app.new_project;
            egui::Grid::new("add_project_grid")
                .num_columns(2)
                .striped(false)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Name").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [200.0, 24.0],
                        egui::TextEdit::singleline(&mut draft.name)
                            .hint_text("Project name...")
                            .text_color(theme::TEXT_PRIMARY),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Team").color(theme::TEXT_SECONDARY));
                    egui::ComboBox::from_id_salt("dlg_team_combo")
                        .selected_text(draft.team.as_str())
                        .width(200.0)
                        .show_ui(ui, |ui| {
                            for team in &teams {
                                ui.selectable_value(&mut draft.team, team.clone(), team.as_str());
                            }
                        });
                    ui.end_row();

                    ui.label("");
                    ui.checkbox(&mut draft.scheduled, "On the roadmap");
                    ui.end_row();

                    if draft.scheduled {
                        ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
                        ui.add(
                            egui_extras::DatePickerButton::new(&mut draft.start)
                                .id_salt("dlg_dp_start"),
                        );
                        ui.end_row();

                        ui.label(RichText::new("End").color(theme::TEXT_SECONDARY));
                        ui.add(
                            egui_extras::DatePickerButton::new(&mut draft.end)
                                .id_salt("dlg_dp_end"),
                        );
                        ui.end_row();
                    }
                });

            if teams.is_empty() {
                ui.add_space(4.0);
                ui.label(
                    RichText::new("Add a team first; every project needs a lane.")
                        .size(11.0)
                        .color(theme::TEXT_DIM),
                );
            }

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let create_btn = egui::Button::new(RichText::new("Create").color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui
                    .add_enabled(!teams.is_empty(), create_btn)
                    .clicked()
                {
                    app.create_project_from_dialog();
                    should_close = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    should_close = true;
                }
            });
            ui.add_space(2.0);
        });

    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_add_project = false;
    }
}

/// Render the "Add Team" dialog.
pub fn show_add_team_dialog(app: &mut RoadmapApp, ctx: &Context) {
    let mut should_close = false;
    Window::new(RichText::new("Add Team").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new("Name").color(theme::TEXT_SECONDARY));
                let edit = ui.add_sized(
                    [220.0, 24.0],
                    egui::TextEdit::singleline(&mut app.new_team_name)
                        .hint_text("Team name...")
                        .text_color(theme::TEXT_PRIMARY),
                );
                if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    should_close = app.create_team_from_dialog();
                }
            });

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let create_btn = egui::Button::new(RichText::new("Create").color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], create_btn).clicked() {
                    should_close = app.create_team_from_dialog();
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    should_close = true;
                }
            });
            ui.add_space(2.0);
        });

    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_add_team = false;
        app.new_team_name.clear();
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut RoadmapApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([DIALOG_WIDTH, 220.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Roadmap Planner").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Plan team projects across a 52-week year.");
                ui.label(
                    RichText::new("Right-drag or Alt/Shift-drag a bar to move it. Drag its right edge to resize.")
                        .size(11.0)
                        .color(theme::TEXT_DIM),
                );
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}
