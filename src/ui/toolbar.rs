use crate::app::RoadmapApp;
use crate::ui::theme;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut RoadmapApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button(format!("{}  New Roadmap", icons::FILE)).clicked() {
                app.new_roadmap();
                ui.close_menu();
            }
            if ui.button(format!("{}  Open...", icons::FOLDER_OPEN)).clicked() {
                app.open_roadmap();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Save          Ctrl+S", icons::FLOPPY_DISK)).clicked() {
                app.save_roadmap();
                ui.close_menu();
            }
            if ui.button("      Save As...").clicked() {
                app.save_roadmap_as();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Import CSV...", icons::DOWNLOAD_SIMPLE)).clicked() {
                app.import_csv();
                ui.close_menu();
            }
            if ui.button(format!("{}  Export CSV...", icons::UPLOAD_SIMPLE)).clicked() {
                app.export_csv();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Edit  ").font(theme::font_menu()), |ui| {
            if ui.button(format!("{}  Add Project", icons::PLUS)).clicked() {
                app.open_add_project();
                ui.close_menu();
            }
            if ui.button(format!("{}  Add Team", icons::USERS)).clicked() {
                app.show_add_team = true;
                ui.close_menu();
            }
            ui.menu_button(format!("{}  Remove Team", icons::TRASH), |ui| {
                for name in app.store.team_names() {
                    if ui.button(name.as_str()).clicked() {
                        app.remove_team(&name);
                        ui.close_menu();
                    }
                }
            });
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            if ui.button(format!("{}  Previous Year", icons::CARET_LEFT)).clicked() {
                app.shift_year(-1);
                ui.close_menu();
            }
            if ui.button(format!("{}  Next Year", icons::CARET_RIGHT)).clicked() {
                app.shift_year(1);
                ui.close_menu();
            }
            if ui.button(format!("{}  This Year", icons::CALENDAR_BLANK)).clicked() {
                app.reset_year();
                ui.close_menu();
            }
            ui.separator();
            ui.label(RichText::new("Team Lanes").small().weak());
            for name in app.store.team_names() {
                let mut visible = !app.settings.hidden_teams.contains(&name);
                if ui.checkbox(&mut visible, name.as_str()).changed() {
                    app.set_team_visible(&name, visible);
                }
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button(format!("{}  About", icons::INFO)).clicked() {
                app.show_about = true;
                ui.close_menu();
            }
            if ui.button(format!("{}  Open Settings Folder", icons::GEAR)).clicked() {
                app.open_settings_folder();
                ui.close_menu();
            }
        });

        // Right-aligned roadmap name and planning year
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let modified = if app.file_path.is_some() { "" } else { " (unsaved)" };
            ui.label(
                RichText::new(format!("{}{} · {}", app.store.name, modified, app.planning_year))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
