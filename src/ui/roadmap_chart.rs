use chrono::Datelike;
use egui::{Color32, CursorIcon, Painter, PointerButton, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use uuid::Uuid;

use crate::config::RoadmapConfig;
use crate::model::{PlanningInterval, ProjectStatus, ProjectStore};
use crate::roadmap::{
    qualifies_as_move, CollisionTicket, ContentFrame, GestureCommit, GestureController, GestureKind,
    GestureStart, LaneBoundaryTracker, LaneGeometry, RoadmapLayout, ScreenQuery, ScreenSnapshot,
    TimeScale, Track,
};
use crate::ui::theme;

/// Everything the chart reads in one frame.
pub struct RoadmapView<'a> {
    pub store: &'a ProjectStore,
    pub layout: &'a RoadmapLayout,
    pub config: &'a RoadmapConfig,
    pub scale: TimeScale,
}

/// Result details from interactions in the roadmap chart.
#[derive(Debug, Clone, Default)]
pub struct ChartInteraction {
    /// A gesture ended this frame and its result should be written back.
    pub commit: Option<GestureCommit>,
    pub cancelled: bool,
}

enum GestureEnd {
    Commit,
    Cancel,
}

/// Render the roadmap chart (central panel).
pub fn show_roadmap_chart(
    view: RoadmapView<'_>,
    gestures: &mut GestureController,
    selected: &mut Option<Uuid>,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();
    let config = view.config;

    let (escape, released, focused, pointer) = ui.input(|i| {
        (
            i.key_pressed(egui::Key::Escape),
            !i.pointer.any_down(),
            i.focused,
            i.pointer.latest_pos(),
        )
    });

    let ending = if !gestures.is_active() {
        None
    } else if escape {
        Some(GestureEnd::Cancel)
    } else if released || !focused {
        Some(GestureEnd::Commit)
    } else {
        None
    };

    if matches!(ending, Some(GestureEnd::Cancel)) {
        interaction.cancelled = gestures.cancel();
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            // The painter is allocated at the cursor, so this is its top left.
            let frame = ContentFrame::new(ui.cursor().min);
            let canvas_left = ui.cursor().min.x;
            let canvas_width = ui.available_width();
            let content_track = Track::new(
                config.label_gutter_width,
                canvas_width - config.label_gutter_width,
            );
            let track = Track::new(canvas_left + content_track.left, content_track.width);

            let mut ticket: Option<CollisionTicket> = None;
            if ending.is_none() {
                if let Some(pointer) = pointer {
                    ticket = gestures.update(frame.to_content(pointer), content_track).ok();
                }
            }

            let expansion = gestures.expansion();
            let geometry = view.layout.geometry_with(config, expansion.as_ref());
            let lanes_height = geometry.last().map(|g| g.screen_bottom).unwrap_or(0.0);
            let chart_height = (config.header_height + lanes_height + 40.0).max(ui.available_height());

            let (response, painter) =
                ui.allocate_painter(Vec2::new(canvas_width, chart_height), Sense::click());
            let origin = response.rect.min;
            let lanes_top = origin.y + config.header_height;
            let mut snapshot = ScreenSnapshot::default();
            let mut consumed_click = false;

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

            let pending_lane = gestures
                .session()
                .and_then(|s| s.pending_lane())
                .map(str::to_string);
            for (i, lane) in geometry.iter().enumerate() {
                let lane_rect = Rect::from_min_max(
                    Pos2::new(origin.x, lanes_top + lane.screen_top),
                    Pos2::new(origin.x + canvas_width, lanes_top + lane.screen_bottom),
                );
                let color = view.store.team(&lane.team).map(|t| t.color).unwrap_or(theme::ACCENT);
                draw_lane(&painter, lane, lane_rect, track, i, color, config);
                if pending_lane.as_deref() == Some(lane.team.as_str()) {
                    painter.rect_filled(lane_rect, 0.0, theme::LANE_TARGET);
                }
                if expansion.as_ref().is_some_and(|e| e.team == lane.team) {
                    let packed_bottom =
                        lane_rect.top() + config.lane_height_for_rows(lane.row_count);
                    painter.rect_filled(
                        Rect::from_min_max(
                            Pos2::new(track.left, packed_bottom),
                            lane_rect.right_bottom(),
                        ),
                        0.0,
                        theme::LANE_EXPANSION,
                    );
                }
                snapshot.record_lane(lane.team.clone(), frame.rect_to_content(lane_rect));
            }

            draw_timeline_header(&painter, origin, canvas_width, track, &view.scale, config);
            draw_today_line(&painter, track, &view.scale, lanes_top, origin.y + chart_height);

            let track_clip = Rect::from_min_max(
                Pos2::new(track.left, lanes_top),
                Pos2::new(origin.x + canvas_width, origin.y + chart_height),
            );
            let bar_painter = painter.with_clip_rect(track_clip);
            let lane_names: Vec<String> = geometry.iter().map(|g| g.team.clone()).collect();
            let modifiers = ui.input(|i| i.modifiers);

            for (lane, geo) in view.layout.lanes.iter().zip(geometry.iter()) {
                let lane_top = lanes_top + geo.screen_top + config.lane_padding / 2.0;
                for (interval, packed_row) in lane.rows() {
                    let live = gestures
                        .session()
                        .filter(|s| s.original().id == interval.id)
                        .map(|s| (s.working().clone(), s.row(), s.is_colliding()));
                    let (shown, row, colliding) = match &live {
                        Some((working, row, colliding)) => (working, *row, *colliding),
                        None => (interval, packed_row, false),
                    };
                    let Some(project) = view.store.project(interval.id) else {
                        continue;
                    };
                    let color = view.store.team(&lane.team).map(|t| t.color).unwrap_or(theme::ACCENT);
                    let y = lane_top + row as f32 * config.row_height;
                    let bar_rect = bar_rect_for(shown, y, track, &view.scale, config);
                    let is_selected = *selected == Some(interval.id);

                    draw_bar(
                        &bar_painter,
                        bar_rect,
                        &project.name,
                        color,
                        project.status,
                        is_selected,
                        colliding,
                    );
                    snapshot.record_item(interval.id, frame.rect_to_content(bar_rect));

                    let bar_response = ui.interact(
                        bar_rect,
                        ui.make_persistent_id(("roadmap-bar", interval.id)),
                        Sense::click_and_drag(),
                    );
                    let handle_rect = Rect::from_min_max(
                        Pos2::new(bar_rect.right() - config.handle_width, bar_rect.top()),
                        Pos2::new(bar_rect.right() + config.handle_width * 0.5, bar_rect.bottom()),
                    );
                    let handle_response = ui.interact(
                        handle_rect,
                        ui.make_persistent_id(("roadmap-resize", interval.id)),
                        Sense::drag(),
                    );

                    if bar_response.clicked() {
                        *selected = Some(interval.id);
                        consumed_click = true;
                    }

                    let kind = if handle_response.drag_started_by(PointerButton::Primary) {
                        Some(GestureKind::Resize)
                    } else if [PointerButton::Primary, PointerButton::Secondary]
                        .into_iter()
                        .any(|b| bar_response.drag_started_by(b) && qualifies_as_move(b, modifiers))
                    {
                        Some(GestureKind::Move)
                    } else {
                        None
                    };
                    let press = handle_response
                        .interact_pointer_pos()
                        .or_else(|| bar_response.interact_pointer_pos());
                    if let (Some(kind), Some(press)) = (kind, press) {
                        let lanes = LaneBoundaryTracker::measure(&lane_names, &snapshot);
                        let start = GestureStart {
                            kind,
                            interval,
                            row: packed_row,
                            lane_row_count: lane.row_count(),
                            item_rect: frame.rect_to_content(bar_rect),
                            pointer: frame.to_content(press),
                        };
                        if gestures.begin(start, view.scale, lanes).is_ok() {
                            *selected = Some(interval.id);
                            consumed_click = true;
                        }
                    }

                    if live.is_none() && !gestures.is_active() {
                        let handle_hot = handle_response.hovered();
                        if handle_hot {
                            ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal);
                        }
                        if is_selected || handle_hot {
                            draw_handle(&bar_painter, bar_rect);
                        }
                        if bar_response.hovered() || handle_hot {
                            show_bar_tooltip(ui, interval, &project.name, project.status, &view.scale);
                        }
                    }
                }
            }

            if let Some(session) = gestures.session() {
                ui.ctx().set_cursor_icon(match session.kind() {
                    GestureKind::Move => CursorIcon::Grabbing,
                    GestureKind::Resize => CursorIcon::ResizeHorizontal,
                });
                if let Some(rect) = snapshot.item_rect(session.original().id) {
                    draw_handle(&bar_painter, frame.rect_to_screen(rect));
                }
            }

            if let Some(ticket) = ticket {
                gestures.resolve_collision(ticket, &snapshot);
            }

            if response.clicked() && !consumed_click {
                *selected = None;
            }
        });

    if matches!(ending, Some(GestureEnd::Commit)) {
        interaction.commit = gestures.finish().ok();
    }
    if gestures.is_active() {
        ui.ctx().request_repaint();
    }

    interaction
}

fn bar_rect_for(
    interval: &PlanningInterval,
    row_top: f32,
    track: Track,
    scale: &TimeScale,
    config: &RoadmapConfig,
) -> Rect {
    let left = scale.left_percent(interval.start);
    let width = scale.width_percent(interval.start, interval.end);
    let x_start = track.x_at_percent(left);
    let x_end = track.x_at_percent(left + width);
    Rect::from_min_max(
        Pos2::new(x_start, row_top + theme::BAR_INSET),
        Pos2::new(x_end, row_top + config.row_height - theme::BAR_INSET),
    )
}

fn draw_lane(
    painter: &Painter,
    lane: &LaneGeometry,
    rect: Rect,
    track: Track,
    index: usize,
    color: Color32,
    config: &RoadmapConfig,
) {
    let bg = if index % 2 == 0 { theme::BG_PANEL } else { theme::BG_LANE_ALT };
    painter.rect_filled(rect, 0.0, bg);
    painter.line_segment(
        [rect.left_bottom(), rect.right_bottom()],
        Stroke::new(0.5, theme::BORDER_SUBTLE),
    );

    // Label gutter
    let gutter = Rect::from_min_max(rect.min, Pos2::new(track.left, rect.bottom()));
    painter.rect_filled(gutter, 0.0, theme::BG_GUTTER);
    painter.line_segment(
        [gutter.right_top(), gutter.right_bottom()],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
    let label_y = rect.top() + config.lane_padding / 2.0 + config.row_height / 2.0;
    painter.circle_filled(Pos2::new(gutter.left() + 12.0, label_y), 4.0, color);
    let galley = painter.layout_no_wrap(lane.team.clone(), theme::font_lane(), theme::TEXT_PRIMARY);
    painter.with_clip_rect(gutter.shrink(2.0)).galley(
        Pos2::new(gutter.left() + 22.0, label_y - galley.size().y / 2.0),
        galley,
        Color32::TRANSPARENT,
    );
}

fn draw_timeline_header(
    painter: &Painter,
    origin: Pos2,
    width: f32,
    track: Track,
    scale: &TimeScale,
    config: &RoadmapConfig,
) {
    let header_height = config.header_height;
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, header_height)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + header_height),
            Pos2::new(origin.x + width, origin.y + header_height),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
    painter.text(
        Pos2::new(origin.x + 10.0, origin.y + header_height / 2.0),
        egui::Align2::LEFT_CENTER,
        scale.origin().year().to_string(),
        theme::font_header(),
        theme::TEXT_PRIMARY,
    );

    let slot_width = track.width / scale.slot_count().max(1) as f32;
    let grid_bottom = painter.clip_rect().bottom();
    let mut last_month = None;
    for (index, first_day) in scale.slots() {
        let x = track.x_at_percent(scale.offset_to_percent(f64::from(index)));
        let month_start = last_month != Some(first_day.month());
        last_month = Some(first_day.month());

        painter.line_segment(
            [Pos2::new(x, origin.y + header_height), Pos2::new(x, grid_bottom)],
            Stroke::new(if month_start { 1.0 } else { 0.5 }, theme::GRID_LINE),
        );
        if month_start {
            painter.text(
                Pos2::new(x + 3.0, origin.y + 12.0),
                egui::Align2::LEFT_CENTER,
                first_day.format("%b").to_string(),
                theme::font_header(),
                theme::TEXT_PRIMARY,
            );
        }
        if slot_width >= 18.0 {
            painter.text(
                Pos2::new(x + 3.0, origin.y + 28.0),
                egui::Align2::LEFT_CENTER,
                first_day.day().to_string(),
                theme::font_sub(),
                theme::TEXT_SECONDARY,
            );
        }
    }
}

fn draw_today_line(painter: &Painter, track: Track, scale: &TimeScale, top: f32, bottom: f32) {
    let today = chrono::Local::now().date_naive();
    if !scale.contains(today) {
        return;
    }
    let x = track.x_at_percent(scale.left_percent(today));
    painter.line_segment(
        [Pos2::new(x, top), Pos2::new(x, bottom)],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(Pos2::new(x - badge_w / 2.0, top - 1.0), Vec2::new(badge_w, 14.0));
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        egui::Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

fn draw_bar(
    painter: &Painter,
    bar_rect: Rect,
    name: &str,
    color: Color32,
    status: ProjectStatus,
    is_selected: bool,
    colliding: bool,
) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    // Soft shadow
    painter.rect_filled(bar_rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));

    painter.rect_filled(bar_rect, rounding, color);
    let highlight_rect = Rect::from_min_size(
        bar_rect.min,
        Vec2::new(bar_rect.width(), (bar_rect.height() * 0.45).max(4.0)),
    );
    painter.rect_filled(
        highlight_rect,
        Rounding {
            nw: theme::BAR_ROUNDING,
            ne: theme::BAR_ROUNDING,
            sw: 0.0,
            se: 0.0,
        },
        Color32::from_white_alpha(25),
    );
    if status == ProjectStatus::Done {
        painter.rect_filled(bar_rect, rounding, theme::STATUS_DONE_OVERLAY);
    }

    if colliding {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::COLLISION),
        );
    } else if is_selected {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    if bar_rect.width() > 30.0 {
        let galley = painter.layout_no_wrap(name.to_string(), theme::font_bar(), theme::TEXT_ON_BAR);
        let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
        painter.with_clip_rect(bar_rect.intersect(painter.clip_rect())).galley(
            Pos2::new(bar_rect.left() + 6.0, text_y),
            galley,
            Color32::TRANSPARENT,
        );
    }
}

/// Pill on the trailing edge marking where a resize grabs.
fn draw_handle(painter: &Painter, bar_rect: Rect) {
    let handle_h = bar_rect.height() * 0.55;
    let handle = Rect::from_min_size(
        Pos2::new(bar_rect.right() - 5.0, bar_rect.center().y - handle_h / 2.0),
        Vec2::new(4.0, handle_h),
    );
    painter.rect_filled(handle, Rounding::same(2.0), theme::HANDLE_COLOR);
}

fn show_bar_tooltip(
    ui: &Ui,
    interval: &PlanningInterval,
    name: &str,
    status: ProjectStatus,
    scale: &TimeScale,
) {
    egui::show_tooltip_at_pointer(
        ui.ctx(),
        ui.layer_id(),
        egui::Id::new(("roadmap-tip", interval.id)),
        |ui| {
            ui.strong(name);
            ui.label(format!(
                "{} → {}",
                interval.start.format("%d/%m/%Y"),
                interval.end.format("%d/%m/%Y"),
            ));
            ui.label(format!("{} · {} days", status.label(), interval.duration_days()));
            if !scale.is_slot_boundary(interval.start) {
                ui.label(
                    egui::RichText::new("Starts off the weekly grid; the next move snaps it")
                        .size(10.0)
                        .color(theme::TEXT_DIM),
                );
            }
        },
    );
}
