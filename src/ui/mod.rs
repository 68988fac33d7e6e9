pub mod dialogs;
pub mod project_panel;
pub mod roadmap_chart;
pub mod theme;
pub mod toolbar;
