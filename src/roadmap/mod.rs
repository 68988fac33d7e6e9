//! Roadmap timeline engine: time scale, row packing, lane geometry and the
//! pointer gestures that move and resize bars. Nothing in here paints; the
//! renderer in `ui::roadmap_chart` drives it.

pub mod collision;
pub mod geometry;
pub mod gesture;
pub mod lanes;
pub mod packing;
pub mod scale;

pub use geometry::{LaneGeometry, RoadmapLayout};
pub use gesture::{
    qualifies_as_move, CollisionTicket, GestureCommit, GestureController, GestureKind,
    GestureStart, Track,
};
pub use lanes::{ContentFrame, LaneBoundaryTracker, ScreenQuery, ScreenSnapshot};
pub use scale::TimeScale;
