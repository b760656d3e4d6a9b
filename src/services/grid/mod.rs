//! Discrete time axis of the schedule grid.
//!
//! Converts between minutes and vertical pixels and maps a pointer position
//! inside a day/venue column to a snapped minute of the day. Every input is
//! coerced into range; nothing here fails.

use crate::models::settings::GridSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid {
    day_start_minute: i64,
    day_end_minute: i64,
    slot_interval_minutes: i64,
    pixels_per_slot: f32,
}

impl TimeGrid {
    /// Out-of-range values are repaired rather than rejected: a
    /// non-positive interval or scale becomes 1, an inverted day collapses
    /// to a single instant.
    pub fn new(
        day_start_minute: i64,
        day_end_minute: i64,
        slot_interval_minutes: i64,
        pixels_per_slot: f32,
    ) -> Self {
        let pixels_per_slot = if pixels_per_slot.is_finite() && pixels_per_slot > 0.0 {
            pixels_per_slot
        } else {
            1.0
        };
        Self {
            day_start_minute,
            day_end_minute: day_end_minute.max(day_start_minute),
            slot_interval_minutes: slot_interval_minutes.max(1),
            pixels_per_slot,
        }
    }

    pub fn from_settings(settings: &GridSettings) -> Self {
        Self::new(
            settings.day_start_minute,
            settings.day_end_minute,
            settings.slot_interval_minutes,
            settings.pixels_per_slot,
        )
    }

    pub fn day_start_minute(&self) -> i64 {
        self.day_start_minute
    }

    pub fn day_end_minute(&self) -> i64 {
        self.day_end_minute
    }

    pub fn slot_interval_minutes(&self) -> i64 {
        self.slot_interval_minutes
    }

    pub fn pixels_per_slot(&self) -> f32 {
        self.pixels_per_slot
    }

    /// Number of grid lines between day start and day end
    pub fn total_slots(&self) -> i64 {
        let span = self.day_end_minute - self.day_start_minute;
        (span + self.slot_interval_minutes - 1) / self.slot_interval_minutes
    }

    /// Full pixel height of a day column
    pub fn column_height(&self) -> f32 {
        self.total_slots() as f32 * self.pixels_per_slot
    }

    /// Minute of day for every grid line, first line at day start
    pub fn slot_minutes(&self) -> Vec<i64> {
        (0..self.total_slots())
            .map(|i| self.day_start_minute + i * self.slot_interval_minutes)
            .collect()
    }

    pub fn minutes_to_pixels(&self, minutes: f32) -> f32 {
        (minutes / self.slot_interval_minutes as f32) * self.pixels_per_slot
    }

    pub fn pixels_to_minutes(&self, pixels: f32) -> f32 {
        (pixels / self.pixels_per_slot) * self.slot_interval_minutes as f32
    }

    /// Round half-up to the nearest slot boundary
    pub fn round_to_slot(&self, minutes: f32) -> i64 {
        let slot = self.slot_interval_minutes as f32;
        (((minutes / slot) + 0.5).floor() as i64).saturating_mul(self.slot_interval_minutes)
    }

    pub fn clamp_to_day(&self, minute: i64) -> i64 {
        minute.clamp(self.day_start_minute, self.day_end_minute)
    }

    pub fn contains_minute(&self, minute: i64) -> bool {
        (self.day_start_minute..=self.day_end_minute).contains(&minute)
    }

    /// Minute of day under `pointer_y` for a column whose top edge is at
    /// `container_top_y`, snapped to the slot grid and clamped to the day.
    pub fn time_slot_from_pointer(&self, pointer_y: f32, container_top_y: f32) -> i64 {
        let relative_y = pointer_y - container_top_y;
        let minutes = self.day_start_minute as f32 + self.pixels_to_minutes(relative_y);
        if !minutes.is_finite() {
            return self.day_start_minute;
        }
        self.clamp_to_day(self.round_to_slot(minutes))
    }

    /// Vertical offset of a minute of day from the column top
    pub fn top_for_minute(&self, minute_of_day: i64) -> f32 {
        self.minutes_to_pixels((minute_of_day - self.day_start_minute) as f32)
    }
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self::from_settings(&GridSettings::default())
    }
}
