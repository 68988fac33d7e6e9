//! Conversion between calendar dates and horizontal lane positions.
//!
//! The planning window starts at `origin` and is divided into `slot_count`
//! slots of `slot_days` days each. Positions are expressed as fractional slot
//! offsets, and as percentages of the lane's track width for rendering.

use chrono::{Duration, NaiveDate};

use crate::config::RoadmapConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    origin: NaiveDate,
    slot_count: u32,
    slot_days: u32,
    min_visible_percent: f64,
}

impl TimeScale {
    pub fn new(origin: NaiveDate, config: &RoadmapConfig) -> Self {
        Self {
            origin,
            slot_count: config.slot_count.max(1),
            slot_days: config.slot_days.max(1),
            min_visible_percent: config.min_visible_percent,
        }
    }

    /// A window starting on January 1st of `year`.
    pub fn for_year(year: i32, config: &RoadmapConfig) -> Self {
        let origin = NaiveDate::from_yo_opt(year, 1).unwrap_or_default();
        Self::new(origin, config)
    }

    pub fn origin(&self) -> NaiveDate {
        self.origin
    }

    pub fn slot_count(&self) -> u32 {
        self.slot_count
    }

    pub fn slot_days(&self) -> i64 {
        i64::from(self.slot_days)
    }

    /// First day after the planning window.
    pub fn window_end(&self) -> NaiveDate {
        shift_days(self.origin, i64::from(self.slot_count) * self.slot_days())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.origin && date < self.window_end()
    }

    /// Fractional slot index of `date`.
    pub fn date_to_offset(&self, date: NaiveDate) -> f64 {
        (date - self.origin).num_days() as f64 / self.slot_days() as f64
    }

    pub fn offset_to_percent(&self, offset: f64) -> f64 {
        offset / f64::from(self.slot_count) * 100.0
    }

    pub fn percent_to_offset(&self, percent: f64) -> f64 {
        percent / 100.0 * f64::from(self.slot_count)
    }

    /// Date at `offset`, rounded to the nearest whole day.
    pub fn offset_to_date(&self, offset: f64) -> NaiveDate {
        let days = (offset * self.slot_days() as f64).round();
        if !days.is_finite() {
            return self.origin;
        }
        shift_days(self.origin, days as i64)
    }

    /// Round a pointer-derived offset to the nearest whole slot.
    pub fn snap(offset: f64) -> f64 {
        offset.round()
    }

    /// Date at the slot boundary nearest to `offset`.
    pub fn snapped_date(&self, offset: f64) -> NaiveDate {
        self.offset_to_date(Self::snap(offset))
    }

    /// First day of the slot containing `date`.
    pub fn slot_start(&self, date: NaiveDate) -> NaiveDate {
        self.offset_to_date(self.date_to_offset(date).floor())
    }

    pub fn is_slot_boundary(&self, date: NaiveDate) -> bool {
        (date - self.origin).num_days().rem_euclid(self.slot_days()) == 0
    }

    /// Left edge of a bar starting at `start`, in percent of the track width.
    pub fn left_percent(&self, start: NaiveDate) -> f64 {
        self.offset_to_percent(self.date_to_offset(start))
    }

    /// Width of a bar in percent, never narrower than the configured minimum.
    pub fn width_percent(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        let slots = (end - start).num_days() as f64 / self.slot_days() as f64;
        self.offset_to_percent(slots).max(self.min_visible_percent)
    }

    /// Clamp a degenerate span to one slot.
    pub fn clamp_span(&self, start: NaiveDate, end: NaiveDate) -> (NaiveDate, NaiveDate) {
        if end <= start {
            (start, shift_days(start, self.slot_days()))
        } else {
            (start, end)
        }
    }

    /// `(index, first day)` of every slot in the window.
    pub fn slots(&self) -> impl Iterator<Item = (u32, NaiveDate)> + '_ {
        (0..self.slot_count).map(move |i| (i, shift_days(self.origin, i64::from(i) * self.slot_days())))
    }
}

/// `date + days`, saturating at the ends of the calendar.
pub fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}
