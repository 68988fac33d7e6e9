pub mod interval;
pub mod project;
pub mod store;

pub use interval::PlanningInterval;
pub use project::{Project, ProjectStatus};
pub use store::ProjectStore;
