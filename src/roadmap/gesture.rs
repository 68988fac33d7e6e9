//! Pointer gestures on roadmap bars: moving a bar (both boundaries follow the
//! pointer, lane changes allowed) and resizing it (only the end follows).
//!
//! A gesture owns a working copy of the interval. The store never sees that
//! copy until [`GestureController::finish`] hands back a [`GestureCommit`].
//! Every update recomputes from the snapshot taken at pointer-down plus the
//! total pointer travel, so rounding never accumulates across frames.

use egui::{Modifiers, PointerButton, Pos2, Rect, Vec2};

use crate::config::RoadmapConfig;
use crate::error::GestureError;
use crate::model::PlanningInterval;

use super::collision::has_collision;
use super::geometry::LaneExpansion;
use super::lanes::{LaneBoundaryTracker, ScreenQuery};
use super::scale::{shift_days, TimeScale};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Start and end move together; the row and lane may change.
    Move,
    /// Only the end moves, in whole slots.
    Resize,
}

impl GestureKind {
    pub fn moves_start(self) -> bool {
        matches!(self, GestureKind::Move)
    }
}

/// A press on a bar's body is a move (not a click) when it uses the secondary
/// button, or the primary button with Alt or Shift held.
pub fn qualifies_as_move(button: PointerButton, modifiers: Modifiers) -> bool {
    match button {
        PointerButton::Secondary => true,
        PointerButton::Primary => modifiers.alt || modifiers.shift,
        _ => false,
    }
}

/// Horizontal extent of the timeline track (lane width minus the label gutter)
/// in the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub left: f32,
    pub width: f32,
}

impl Track {
    pub fn new(left: f32, width: f32) -> Self {
        Self { left, width }
    }

    /// Fractional slot offset at screen `x`; `None` for a collapsed track.
    pub fn offset_at(&self, x: f32, scale: &TimeScale) -> Option<f64> {
        if self.width <= 0.0 {
            return None;
        }
        let percent = f64::from(x - self.left) / f64::from(self.width) * 100.0;
        Some(scale.percent_to_offset(percent))
    }

    /// Slot length of a horizontal distance.
    pub fn slots_in(&self, dx: f32, scale: &TimeScale) -> Option<f64> {
        if self.width <= 0.0 {
            return None;
        }
        Some(scale.percent_to_offset(f64::from(dx) / f64::from(self.width) * 100.0))
    }

    pub fn x_at_percent(&self, percent: f64) -> f32 {
        self.left + (percent / 100.0) as f32 * self.width
    }
}

/// What the renderer knows about a bar at pointer-down.
#[derive(Debug, Clone, Copy)]
pub struct GestureStart<'a> {
    pub kind: GestureKind,
    pub interval: &'a PlanningInterval,
    pub row: usize,
    pub lane_row_count: usize,
    pub item_rect: Rect,
    pub pointer: Pos2,
}

/// Handle for a collision check deferred until after the next paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionTicket {
    session: u64,
}

/// Final result of a gesture, ready to be written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureCommit {
    pub kind: GestureKind,
    pub original: PlanningInterval,
    pub interval: PlanningInterval,
}

impl GestureCommit {
    pub fn changed(&self) -> bool {
        self.original != self.interval
    }
}

#[derive(Debug, Clone)]
pub struct GestureSession {
    id: u64,
    kind: GestureKind,
    scale: TimeScale,
    original: PlanningInterval,
    working: PlanningInterval,
    pointer_origin: Pos2,
    /// Pointer position relative to the bar's top-left corner at pointer-down.
    grab_offset: Vec2,
    start_row: usize,
    row: usize,
    lane_row_count: usize,
    pending_lane: Option<String>,
    colliding: bool,
    lanes: LaneBoundaryTracker,
}

impl GestureSession {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    pub fn original(&self) -> &PlanningInterval {
        &self.original
    }

    pub fn working(&self) -> &PlanningInterval {
        &self.working
    }

    /// Row the bar is currently shown in, within its origin lane.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Lane the pointer is over, if it differs from the bar's own lane.
    pub fn pending_lane(&self) -> Option<&str> {
        self.pending_lane.as_deref()
    }

    pub fn is_colliding(&self) -> bool {
        self.colliding
    }

    /// The bar has been dragged below the last packed row of its own lane.
    /// A pending move to another lane never grows the origin lane.
    pub fn is_expanding(&self) -> bool {
        self.pending_lane.is_none() && self.row >= self.lane_row_count
    }

    pub fn expansion(&self) -> Option<LaneExpansion> {
        self.is_expanding().then(|| LaneExpansion {
            team: self.original.team.clone(),
            rows: self.row.saturating_add(1),
        })
    }

    fn track_move(&mut self, pointer: Pos2, track: Track, row_height: f32) {
        let dy = pointer.y - self.pointer_origin.y;
        // `as` saturates for huge or non-finite ratios.
        let row_delta = (dy / row_height).round() as i64;
        let start_row = i64::try_from(self.start_row).unwrap_or(i64::MAX);
        self.row = usize::try_from(start_row.saturating_add(row_delta).max(0)).unwrap_or(usize::MAX);

        let left = pointer.x - self.grab_offset.x;
        if let Some(offset) = track.offset_at(left, &self.scale) {
            let start = self.scale.snapped_date(offset);
            let duration = self.original.duration_days();
            let (start, end) = self.scale.clamp_span(start, shift_days(start, duration));
            self.working.start = start;
            self.working.end = end;
        }

        self.pending_lane = self
            .lanes
            .lane_at(pointer.y)
            .filter(|team| *team != self.original.team)
            .map(str::to_string);
    }

    fn track_resize(&mut self, pointer: Pos2, track: Track) {
        let item_left = track.x_at_percent(self.scale.left_percent(self.original.start));
        if let Some(slots) = track.slots_in(pointer.x - item_left, &self.scale) {
            let slots = TimeScale::snap(slots).max(1.0) as i64;
            self.working.end = shift_days(self.original.start, slots * self.scale.slot_days());
        }
    }
}

/// Owns at most one active gesture.
#[derive(Debug)]
pub struct GestureController {
    config: RoadmapConfig,
    session: Option<GestureSession>,
    next_id: u64,
}

impl GestureController {
    pub fn new(config: RoadmapConfig) -> Self {
        Self {
            config,
            session: None,
            next_id: 1,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// The in-flight copy of `id`, if it is the interval being manipulated.
    pub fn working_copy(&self, id: uuid::Uuid) -> Option<&PlanningInterval> {
        self.session
            .as_ref()
            .filter(|s| s.original.id == id)
            .map(|s| &s.working)
    }

    pub fn expansion(&self) -> Option<LaneExpansion> {
        self.session.as_ref().and_then(GestureSession::expansion)
    }

    /// Start a gesture. A second start while one is running is refused and the
    /// running gesture continues untouched.
    pub fn begin(
        &mut self,
        start: GestureStart<'_>,
        scale: TimeScale,
        lanes: LaneBoundaryTracker,
    ) -> Result<u64, GestureError> {
        if self.session.is_some() {
            tracing::debug!(project = %start.interval.id, "gesture start ignored; one is already active");
            return Err(GestureError::AlreadyActive);
        }
        let id = self.next_id;
        self.next_id += 1;
        tracing::debug!(
            session = id,
            kind = ?start.kind,
            project = %start.interval.id,
            row = start.row,
            "gesture started"
        );
        self.session = Some(GestureSession {
            id,
            kind: start.kind,
            scale,
            original: start.interval.clone(),
            working: start.interval.clone(),
            pointer_origin: start.pointer,
            grab_offset: start.pointer - start.item_rect.min,
            start_row: start.row,
            row: start.row,
            lane_row_count: start.lane_row_count,
            pending_lane: None,
            colliding: false,
            lanes,
        });
        Ok(id)
    }

    /// Follow the pointer. Returns a ticket for the collision check that has to
    /// run once the updated bar has been painted.
    pub fn update(&mut self, pointer: Pos2, track: Track) -> Result<CollisionTicket, GestureError> {
        let row_height = self.config.row_height;
        let session = self.session.as_mut().ok_or(GestureError::NoSession)?;
        match session.kind {
            GestureKind::Move => session.track_move(pointer, track, row_height),
            GestureKind::Resize => session.track_resize(pointer, track),
        }
        Ok(CollisionTicket {
            session: session.id,
        })
    }

    /// Run a deferred collision check. Tickets from a finished or different
    /// gesture are dropped and return `None`.
    pub fn resolve_collision<Q: ScreenQuery + ?Sized>(
        &mut self,
        ticket: CollisionTicket,
        query: &Q,
    ) -> Option<bool> {
        let session = self.session.as_mut().filter(|s| s.id == ticket.session)?;
        let id = session.original.id;
        let target = query.item_rect(id)?;
        let siblings: Vec<Rect> = query
            .item_rects()
            .into_iter()
            .filter(|(other, _)| *other != id)
            .map(|(_, rect)| rect)
            .collect();
        session.colliding = has_collision(&target, &siblings);
        Some(session.colliding)
    }

    /// End the gesture and hand back its result. A pending lane change is
    /// applied only for moves.
    pub fn finish(&mut self) -> Result<GestureCommit, GestureError> {
        let session = self.session.take().ok_or(GestureError::NoSession)?;
        let mut interval = session.working;
        if session.kind.moves_start() {
            if let Some(team) = session.pending_lane {
                interval.team = team;
            }
        }
        tracing::debug!(
            session = session.id,
            project = %interval.id,
            team = %interval.team,
            start = %interval.start,
            end = %interval.end,
            "gesture finished"
        );
        Ok(GestureCommit {
            kind: session.kind,
            original: session.original,
            interval,
        })
    }

    /// Drop the gesture without producing a commit.
    pub fn cancel(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                tracing::debug!(session = session.id, "gesture cancelled");
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap::geometry::stack_lanes;
    use crate::roadmap::lanes::{ContentFrame, ScreenSnapshot};
    use crate::roadmap::packing::{pack, PackedLane};
    use chrono::NaiveDate;
    use egui::{pos2, vec2};
    use proptest::prelude::*;
    use uuid::Uuid;

    const TRACK_LEFT: f32 = 150.0;
    // 10 px per slot.
    const TRACK_WIDTH: f32 = 520.0;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn config() -> RoadmapConfig {
        RoadmapConfig::default()
    }

    fn scale() -> TimeScale {
        TimeScale::for_year(2025, &config())
    }

    fn track() -> Track {
        Track::new(TRACK_LEFT, TRACK_WIDTH)
    }

    fn interval(start: NaiveDate, end: NaiveDate) -> PlanningInterval {
        PlanningInterval::new(Uuid::from_u128(1), "Trading", start, end)
    }

    fn bar_rect(iv: &PlanningInterval, row: usize) -> Rect {
        let s = scale();
        let left = track().x_at_percent(s.left_percent(iv.start));
        let right = track().x_at_percent(s.left_percent(iv.start) + s.width_percent(iv.start, iv.end));
        let top = 45.0 + row as f32 * config().row_height;
        Rect::from_min_max(pos2(left, top), pos2(right, top + config().row_height - 6.0))
    }

    fn lanes() -> LaneBoundaryTracker {
        let mut snap = ScreenSnapshot::default();
        snap.record_lane("Trading", Rect::from_min_max(pos2(0.0, 40.0), pos2(670.0, 120.0)));
        snap.record_lane("Risk", Rect::from_min_max(pos2(0.0, 120.0), pos2(670.0, 176.0)));
        LaneBoundaryTracker::measure(&["Trading".to_string(), "Risk".to_string()], &snap)
    }

    fn begin(
        controller: &mut GestureController,
        kind: GestureKind,
        iv: &PlanningInterval,
        pointer: Pos2,
    ) -> u64 {
        controller
            .begin(
                GestureStart {
                    kind,
                    interval: iv,
                    row: 0,
                    lane_row_count: 2,
                    item_rect: bar_rect(iv, 0),
                    pointer,
                },
                scale(),
                lanes(),
            )
            .unwrap()
    }

    #[test]
    fn move_trigger_needs_secondary_button_or_modifier() {
        assert!(qualifies_as_move(PointerButton::Secondary, Modifiers::NONE));
        assert!(qualifies_as_move(PointerButton::Primary, Modifiers::ALT));
        assert!(qualifies_as_move(PointerButton::Primary, Modifiers::SHIFT));
        assert!(!qualifies_as_move(PointerButton::Primary, Modifiers::NONE));
        assert!(!qualifies_as_move(PointerButton::Middle, Modifiers::ALT));
    }

    #[test]
    fn drag_by_three_weeks_keeps_duration() {
        let iv = interval(d(2025, 3, 5), d(2025, 3, 19));
        let mut controller = GestureController::new(config());
        let rect = bar_rect(&iv, 0);
        let down = rect.min + vec2(10.0, 8.0);
        begin(&mut controller, GestureKind::Move, &iv, down);

        controller.update(down + vec2(30.0, 0.0), track()).unwrap();
        let commit = controller.finish().unwrap();
        assert_eq!(commit.interval.start, d(2025, 3, 26));
        assert_eq!(commit.interval.end, d(2025, 4, 9));
        assert_eq!(commit.interval.team, "Trading");
        assert!(commit.changed());
        assert!(!controller.is_active());
    }

    #[test]
    fn unaligned_start_snaps_to_a_week_boundary() {
        let iv = interval(d(2025, 3, 1), d(2025, 3, 15));
        let mut controller = GestureController::new(config());
        let down = bar_rect(&iv, 0).min + vec2(4.0, 4.0);
        begin(&mut controller, GestureKind::Move, &iv, down);

        controller.update(down + vec2(30.0, 0.0), track()).unwrap();
        let working = controller.working_copy(iv.id).unwrap().clone();
        assert!(scale().is_slot_boundary(working.start));
        assert_eq!(working.start, d(2025, 3, 19));
        assert_eq!(working.duration_days(), 14);
    }

    #[test]
    fn small_jitter_does_not_move_an_aligned_bar() {
        let iv = interval(d(2025, 3, 5), d(2025, 3, 19));
        let mut controller = GestureController::new(config());
        let down = bar_rect(&iv, 0).min + vec2(5.0, 5.0);
        begin(&mut controller, GestureKind::Move, &iv, down);
        controller.update(down + vec2(3.0, 2.0), track()).unwrap();
        let commit = controller.finish().unwrap();
        assert!(!commit.changed());
    }

    #[test]
    fn many_small_moves_match_one_large_move() {
        let iv = interval(d(2025, 3, 5), d(2025, 3, 19));
        let down = bar_rect(&iv, 0).min + vec2(5.0, 5.0);

        let mut stepped = GestureController::new(config());
        begin(&mut stepped, GestureKind::Move, &iv, down);
        for step in 1..=47 {
            stepped
                .update(down + vec2(step as f32 * 0.9, 0.0), track())
                .unwrap();
        }

        let mut jumped = GestureController::new(config());
        begin(&mut jumped, GestureKind::Move, &iv, down);
        jumped.update(down + vec2(47.0 * 0.9, 0.0), track()).unwrap();

        assert_eq!(stepped.finish().unwrap(), jumped.finish().unwrap());
    }

    #[test]
    fn resize_snaps_end_to_whole_weeks_from_start() {
        let iv = interval(d(2025, 4, 1), d(2025, 4, 30));
        let mut controller = GestureController::new(config());
        let rect = bar_rect(&iv, 0);
        let down = pos2(rect.right() - 2.0, rect.center().y);
        begin(&mut controller, GestureKind::Resize, &iv, down);

        // Item left edge sits at ~278.6; 300 is a bit over two slots away.
        controller.update(pos2(300.0, rect.center().y + 50.0), track()).unwrap();
        let commit = controller.finish().unwrap();
        assert_eq!(commit.interval.start, d(2025, 4, 1));
        assert_eq!(commit.interval.end, d(2025, 4, 15));
        assert_eq!(commit.interval.team, "Trading");
    }

    #[test]
    fn resize_never_drops_below_one_slot() {
        let iv = interval(d(2025, 4, 1), d(2025, 4, 30));
        let mut controller = GestureController::new(config());
        let rect = bar_rect(&iv, 0);
        begin(&mut controller, GestureKind::Resize, &iv, pos2(rect.right(), rect.center().y));
        controller.update(pos2(rect.left() - 80.0, rect.center().y), track()).unwrap();
        let working = controller.working_copy(iv.id).unwrap();
        assert_eq!(working.start, d(2025, 4, 1));
        assert_eq!(working.end, d(2025, 4, 8));
    }

    #[test]
    fn resize_ignores_lane_crossing() {
        let iv = interval(d(2025, 4, 1), d(2025, 4, 30));
        let mut controller = GestureController::new(config());
        let rect = bar_rect(&iv, 0);
        begin(&mut controller, GestureKind::Resize, &iv, pos2(rect.right(), rect.center().y));
        controller.update(pos2(rect.right(), 150.0), track()).unwrap();
        assert_eq!(controller.session().unwrap().pending_lane(), None);
        assert_eq!(controller.finish().unwrap().interval.team, "Trading");
    }

    #[test]
    fn crossing_into_another_lane_is_pending_until_release() {
        let iv = interval(d(2025, 3, 5), d(2025, 3, 19));
        let mut controller = GestureController::new(config());
        let down = bar_rect(&iv, 0).min + vec2(5.0, 5.0);
        begin(&mut controller, GestureKind::Move, &iv, down);

        controller.update(pos2(down.x, 150.0), track()).unwrap();
        assert_eq!(controller.session().unwrap().pending_lane(), Some("Risk"));
        assert_eq!(controller.working_copy(iv.id).unwrap().team, "Trading");

        controller.update(pos2(down.x, 60.0), track()).unwrap();
        assert_eq!(controller.session().unwrap().pending_lane(), None);

        controller.update(pos2(down.x, 160.0), track()).unwrap();
        let commit = controller.finish().unwrap();
        assert_eq!(commit.interval.team, "Risk");
        assert_eq!(commit.interval.duration_days(), 14);
    }

    #[test]
    fn pointer_outside_every_lane_is_not_a_crossing() {
        let iv = interval(d(2025, 3, 5), d(2025, 3, 19));
        let mut controller = GestureController::new(config());
        let down = bar_rect(&iv, 0).min + vec2(5.0, 5.0);
        begin(&mut controller, GestureKind::Move, &iv, down);
        controller.update(pos2(down.x, 400.0), track()).unwrap();
        assert_eq!(controller.session().unwrap().pending_lane(), None);
        assert_eq!(controller.finish().unwrap().interval.team, "Trading");
    }

    #[test]
    fn dragging_below_last_row_expands_only_the_origin_lane() {
        let cfg = config();
        let iv = interval(d(2025, 3, 5), d(2025, 3, 19));
        let mut controller = GestureController::new(cfg.clone());
        let down = bar_rect(&iv, 0).min + vec2(5.0, 5.0);
        begin(&mut controller, GestureKind::Move, &iv, down);

        // Still inside Trading's measured bounds, one row past its packing.
        controller
            .update(down + vec2(0.0, 2.0 * cfg.row_height), track())
            .unwrap();
        let session = controller.session().unwrap();
        assert_eq!(session.row(), 2);
        assert_eq!(session.pending_lane(), None);
        assert!(session.is_expanding());
        let expansion = controller.expansion().unwrap();
        assert_eq!(expansion, LaneExpansion { team: "Trading".into(), rows: 3 });

        let packed = |team: &str, n: usize| {
            let intervals: Vec<_> = (0..n)
                .map(|i| PlanningInterval::new(Uuid::from_u128(100 + i as u128), team, d(2025, 1, 1), d(2025, 2, 1)))
                .collect();
            let packing = pack(&intervals);
            PackedLane { team: team.into(), intervals, packing }
        };
        let lanes = vec![packed("Trading", 2), packed("Risk", 2)];
        let at_rest = stack_lanes(&lanes, &cfg, None);
        let live = stack_lanes(&lanes, &cfg, Some(&expansion));
        assert_eq!(live[0].pixel_height, 3.0 * cfg.row_height + cfg.lane_padding);
        assert_eq!(live[1].pixel_height, at_rest[1].pixel_height);

        // Dragging back up ends the expansion.
        controller.update(down, track()).unwrap();
        assert!(controller.expansion().is_none());
    }

    #[test]
    fn crossing_into_another_lane_does_not_grow_the_origin_lane() {
        let iv = interval(d(2025, 3, 5), d(2025, 3, 19));
        let mut controller = GestureController::new(config());
        let down = pos2(bar_rect(&iv, 0).min.x + 5.0, 53.0);
        begin(&mut controller, GestureKind::Move, &iv, down);

        controller.update(pos2(down.x, 160.0), track()).unwrap();
        let session = controller.session().unwrap();
        assert_eq!(session.pending_lane(), Some("Risk"));
        assert_eq!(session.row(), 3);
        assert!(!session.is_expanding());
        assert_eq!(controller.expansion(), None);

        for y in (0..=400).step_by(5) {
            controller.update(pos2(down.x, y as f32), track()).unwrap();
            let session = controller.session().unwrap();
            assert!(
                session.pending_lane().is_none() || controller.expansion().is_none(),
                "lane crossing and expansion both active at y={y}"
            );
        }

        controller.update(pos2(down.x, 160.0), track()).unwrap();
        assert_eq!(controller.finish().unwrap().interval.team, "Risk");
    }

    #[test]
    fn scrolling_mid_gesture_moves_the_pointer_through_the_content() {
        let iv = interval(d(2025, 3, 5), d(2025, 3, 19));
        let mut controller = GestureController::new(config());
        let before = ContentFrame::new(pos2(0.0, 100.0));
        let screen_down = before.rect_to_screen(bar_rect(&iv, 0)).min + vec2(5.0, 5.0);
        begin(&mut controller, GestureKind::Move, &iv, before.to_content(screen_down));

        controller.update(before.to_content(screen_down), track()).unwrap();
        assert_eq!(controller.session().unwrap().pending_lane(), None);
        assert_eq!(controller.session().unwrap().row(), 0);

        // Wheel scroll of 80px with the pointer held still on screen.
        let after = ContentFrame::new(pos2(0.0, 20.0));
        controller.update(after.to_content(screen_down), track()).unwrap();
        let session = controller.session().unwrap();
        assert_eq!(session.pending_lane(), Some("Risk"));
        assert_eq!(session.row(), 2);
        assert_eq!(controller.finish().unwrap().interval.team, "Risk");
    }

    #[test]
    fn extreme_pointer_travel_saturates_the_row() {
        let iv = interval(d(2025, 3, 5), d(2025, 3, 19));
        let mut controller = GestureController::new(config());
        let rect = bar_rect(&iv, 1);
        let down = rect.min + vec2(5.0, 5.0);
        controller
            .begin(
                GestureStart {
                    kind: GestureKind::Move,
                    interval: &iv,
                    row: 1,
                    lane_row_count: 2,
                    item_rect: rect,
                    pointer: down,
                },
                scale(),
                lanes(),
            )
            .unwrap();

        controller.update(pos2(down.x, f32::MAX), track()).unwrap();
        let session = controller.session().unwrap();
        assert_eq!(session.pending_lane(), None);
        assert!(session.row() >= i64::MAX as usize);
        assert!(controller.expansion().is_some());

        controller.update(pos2(down.x, f32::MIN), track()).unwrap();
        assert_eq!(controller.session().unwrap().row(), 0);
        assert_eq!(controller.finish().unwrap().interval, iv);
    }

    #[test]
    fn rows_never_go_negative() {
        let iv = interval(d(2025, 3, 5), d(2025, 3, 19));
        let mut controller = GestureController::new(config());
        let down = bar_rect(&iv, 0).min + vec2(5.0, 5.0);
        begin(&mut controller, GestureKind::Move, &iv, down);
        controller.update(down - vec2(0.0, 500.0), track()).unwrap();
        assert_eq!(controller.session().unwrap().row(), 0);
    }

    #[test]
    fn second_start_is_ignored() {
        let iv = interval(d(2025, 3, 5), d(2025, 3, 19));
        let other = PlanningInterval::new(Uuid::from_u128(2), "Risk", d(2025, 6, 4), d(2025, 6, 18));
        let mut controller = GestureController::new(config());
        let down = bar_rect(&iv, 0).min + vec2(5.0, 5.0);
        let first = begin(&mut controller, GestureKind::Move, &iv, down);

        let err = controller
            .begin(
                GestureStart {
                    kind: GestureKind::Resize,
                    interval: &other,
                    row: 0,
                    lane_row_count: 1,
                    item_rect: bar_rect(&other, 0),
                    pointer: down,
                },
                scale(),
                lanes(),
            )
            .unwrap_err();
        assert_eq!(err, GestureError::AlreadyActive);
        let session = controller.session().unwrap();
        assert_eq!(session.id(), first);
        assert_eq!(session.original().id, iv.id);
        assert_eq!(session.kind(), GestureKind::Move);
    }

    #[test]
    fn update_and_finish_without_session_fail() {
        let mut controller = GestureController::new(config());
        assert_eq!(controller.update(pos2(0.0, 0.0), track()), Err(GestureError::NoSession));
        assert_eq!(controller.finish(), Err(GestureError::NoSession));
        assert!(!controller.cancel());
    }

    #[test]
    fn cancel_discards_the_working_copy() {
        let iv = interval(d(2025, 3, 5), d(2025, 3, 19));
        let mut controller = GestureController::new(config());
        let down = bar_rect(&iv, 0).min + vec2(5.0, 5.0);
        begin(&mut controller, GestureKind::Move, &iv, down);
        controller.update(down + vec2(100.0, 0.0), track()).unwrap();
        assert!(controller.cancel());
        assert!(controller.working_copy(iv.id).is_none());
        assert!(controller.finish().is_err());
    }

    #[test]
    fn collision_check_reads_painted_rects() {
        let iv = interval(d(2025, 3, 5), d(2025, 3, 19));
        let mut controller = GestureController::new(config());
        let rect = bar_rect(&iv, 0);
        begin(&mut controller, GestureKind::Move, &iv, rect.min + vec2(5.0, 5.0));
        let ticket = controller.update(rect.min + vec2(25.0, 5.0), track()).unwrap();

        let mut snap = ScreenSnapshot::default();
        snap.record_item(iv.id, rect.translate(vec2(20.0, 0.0)));
        snap.record_item(Uuid::from_u128(9), rect.translate(vec2(30.0, 0.0)));
        assert_eq!(controller.resolve_collision(ticket, &snap), Some(true));
        assert!(controller.session().unwrap().is_colliding());

        let mut clear = ScreenSnapshot::default();
        clear.record_item(iv.id, rect);
        clear.record_item(Uuid::from_u128(9), rect.translate(vec2(0.0, 100.0)));
        assert_eq!(controller.resolve_collision(ticket, &clear), Some(false));
    }

    #[test]
    fn stale_collision_tickets_are_dropped() {
        let iv = interval(d(2025, 3, 5), d(2025, 3, 19));
        let mut controller = GestureController::new(config());
        let rect = bar_rect(&iv, 0);
        begin(&mut controller, GestureKind::Move, &iv, rect.min);
        let ticket = controller.update(rect.min + vec2(5.0, 0.0), track()).unwrap();
        controller.finish().unwrap();

        let mut snap = ScreenSnapshot::default();
        snap.record_item(iv.id, rect);
        snap.record_item(Uuid::from_u128(9), rect);
        assert_eq!(controller.resolve_collision(ticket, &snap), None);

        begin(&mut controller, GestureKind::Move, &iv, rect.min);
        assert_eq!(controller.resolve_collision(ticket, &snap), None);
        assert!(!controller.session().unwrap().is_colliding());
    }

    #[test]
    fn collapsed_track_leaves_dates_alone() {
        let iv = interval(d(2025, 3, 5), d(2025, 3, 19));
        let mut controller = GestureController::new(config());
        let down = bar_rect(&iv, 0).min;
        begin(&mut controller, GestureKind::Move, &iv, down);
        controller.update(down + vec2(200.0, 0.0), Track::new(0.0, 0.0)).unwrap();
        assert_eq!(controller.finish().unwrap().interval, iv);
    }

    proptest! {
        #[test]
        fn resize_never_touches_start(
            start in 0i64..300,
            len in 1i64..90,
            moves in prop::collection::vec((-400.0f32..400.0, -200.0f32..200.0), 1..20),
        ) {
            let s = d(2025, 1, 1) + chrono::Duration::days(start);
            let iv = interval(s, s + chrono::Duration::days(len));
            let mut controller = GestureController::new(config());
            let rect = bar_rect(&iv, 0);
            let down = pos2(rect.right(), rect.center().y);
            begin(&mut controller, GestureKind::Resize, &iv, down);
            for (dx, dy) in moves {
                controller.update(down + vec2(dx, dy), track()).unwrap();
                let working = controller.working_copy(iv.id).unwrap();
                prop_assert_eq!(working.start, iv.start);
                prop_assert!(working.end > working.start);
                prop_assert_eq!(working.duration_days() % 7, 0);
            }
            let commit = controller.finish().unwrap();
            prop_assert_eq!(commit.interval.start, iv.start);
        }

        #[test]
        fn move_never_changes_duration(
            start in 0i64..300,
            len in 1i64..90,
            moves in prop::collection::vec((-400.0f32..400.0, -200.0f32..200.0), 1..20),
        ) {
            let s = d(2025, 1, 1) + chrono::Duration::days(start);
            let iv = interval(s, s + chrono::Duration::days(len));
            let mut controller = GestureController::new(config());
            let down = bar_rect(&iv, 0).min + vec2(3.0, 3.0);
            begin(&mut controller, GestureKind::Move, &iv, down);
            for (dx, dy) in moves {
                controller.update(down + vec2(dx, dy), track()).unwrap();
                let working = controller.working_copy(iv.id).unwrap();
                prop_assert_eq!(working.duration_days(), len);
            }
            let commit = controller.finish().unwrap();
            prop_assert_eq!(commit.interval.duration_days(), len);
        }
    }
}
