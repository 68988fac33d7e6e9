//! Advisory overlap check between a gesture's bar and the bars around it.
//!
//! This never blocks a placement; the scheduler settles real overlaps once the
//! gesture is committed.

use egui::Rect;

/// Strict axis-aligned overlap: boxes that only touch do not collide.
pub fn boxes_overlap(a: &Rect, b: &Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

pub fn has_collision(target: &Rect, siblings: &[Rect]) -> bool {
    siblings.iter().any(|other| boxes_overlap(target, other))
}
