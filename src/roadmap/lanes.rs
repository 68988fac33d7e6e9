//! Lane boundary tracking and the on-screen measurements it reads from.
//!
//! The renderer records where it actually drew each lane and bar into a
//! [`ScreenSnapshot`]. Gestures only ever see that data through
//! [`ScreenQuery`], so tests can hand in synthetic rectangles instead.
//!
//! Everything recorded for gestures is in content space: relative to the top
//! left of the scrollable lane container, not the window. Scrolling while a
//! bar is held then moves the pointer through the content instead of
//! invalidating the measured lanes.

use std::collections::HashMap;

use egui::{Pos2, Rect};
use uuid::Uuid;

/// Where the scrollable content's origin sits on screen this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentFrame {
    origin: Pos2,
}

impl ContentFrame {
    pub fn new(origin: Pos2) -> Self {
        Self { origin }
    }

    pub fn to_content(&self, pos: Pos2) -> Pos2 {
        pos - self.origin.to_vec2()
    }

    pub fn rect_to_content(&self, rect: Rect) -> Rect {
        rect.translate(-self.origin.to_vec2())
    }

    pub fn rect_to_screen(&self, rect: Rect) -> Rect {
        rect.translate(self.origin.to_vec2())
    }
}

/// Read access to measured geometry, in content space.
pub trait ScreenQuery {
    fn lane_rect(&self, team: &str) -> Option<Rect>;
    fn item_rect(&self, id: Uuid) -> Option<Rect>;
    /// Every measured bar.
    fn item_rects(&self) -> Vec<(Uuid, Rect)>;
}

/// Rectangles measured during one paint.
#[derive(Debug, Clone, Default)]
pub struct ScreenSnapshot {
    lanes: HashMap<String, Rect>,
    items: HashMap<Uuid, Rect>,
}

impl ScreenSnapshot {
    pub fn record_lane(&mut self, team: impl Into<String>, rect: Rect) {
        self.lanes.insert(team.into(), rect);
    }

    pub fn record_item(&mut self, id: Uuid, rect: Rect) {
        self.items.insert(id, rect);
    }
}

impl ScreenQuery for ScreenSnapshot {
    fn lane_rect(&self, team: &str) -> Option<Rect> {
        self.lanes.get(team).copied()
    }

    fn item_rect(&self, id: Uuid) -> Option<Rect> {
        self.items.get(&id).copied()
    }

    fn item_rects(&self) -> Vec<(Uuid, Rect)> {
        self.items.iter().map(|(id, rect)| (*id, *rect)).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaneBounds {
    pub team: String,
    pub top: f32,
    pub bottom: f32,
}

/// Vertical extent of each rendered lane, captured once per gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaneBoundaryTracker {
    bounds: Vec<LaneBounds>,
}

impl LaneBoundaryTracker {
    /// Measure `lanes` through `query`. Lanes that are no longer on screen are
    /// skipped.
    pub fn measure<Q: ScreenQuery + ?Sized>(lanes: &[String], query: &Q) -> Self {
        let bounds = lanes
            .iter()
            .filter_map(|team| {
                query.lane_rect(team).map(|rect| LaneBounds {
                    team: team.clone(),
                    top: rect.top(),
                    bottom: rect.bottom(),
                })
            })
            .collect();
        Self { bounds }
    }

    /// Lane under vertical position `y`; `None` above, below or between lanes.
    pub fn lane_at(&self, y: f32) -> Option<&str> {
        self.bounds
            .iter()
            .find(|b| y >= b.top && y < b.bottom)
            .map(|b| b.team.as_str())
    }
}
