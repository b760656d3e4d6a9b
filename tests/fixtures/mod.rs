// Test fixtures - reusable test data
// A small competition board with two venue columns and a pick panel

use chrono::{NaiveDate, NaiveDateTime};
use egui::{vec2, Pos2, Rect};

use venue_scheduler::interaction::SchedulerBoard;
use venue_scheduler::models::catalog::{CatalogEntry, CatalogProvider};
use venue_scheduler::models::item::{ItemKindTag, Venue};
use venue_scheduler::models::settings::GridSettings;
use venue_scheduler::services::schedule::ScheduleStore;

/// Left edge of the first venue column; the panel sits to its left
pub const GRID_LEFT: f32 = 100.0;
pub const GRID_TOP: f32 = 100.0;
pub const COLUMN_WIDTH: f32 = 200.0;

pub mod dates {
    use super::*;

    /// Oct 9, 2025
    pub fn competition_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 9).unwrap()
    }

    pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
        competition_day().and_hms_opt(hour, minute, 0).unwrap()
    }
}

pub mod venues {
    use super::*;

    pub fn wilk() -> Venue {
        Venue::new("Wilk")
    }

    pub fn rb() -> Venue {
        Venue::new("RB")
    }
}

/// 8:00 to 22:00 in 15 minute slots, 12px each
pub fn scenario_settings() -> GridSettings {
    GridSettings {
        day_start_minute: 480,
        day_end_minute: 1320,
        slot_interval_minutes: 15,
        pixels_per_slot: 12.0,
        drag_preview_width: 100.0,
        ..GridSettings::default()
    }
}

pub struct FixtureCatalog;

impl CatalogProvider for FixtureCatalog {
    fn entries(&self) -> anyhow::Result<Vec<CatalogEntry>> {
        Ok(vec![
            CatalogEntry::new("e1", "Novice Latin", ItemKindTag::Event),
            CatalogEntry::new("e2", "Amateur Latin", ItemKindTag::Event),
            CatalogEntry::new("e3", "Novice Standard", ItemKindTag::Event),
            CatalogEntry::new("b1", "Latin Block", ItemKindTag::Block).color("#1d4ed8"),
            CatalogEntry::new("break", "Break", ItemKindTag::Event).infinite(true),
        ])
    }
}

pub fn seeded_store() -> ScheduleStore {
    ScheduleStore::from_catalog(scenario_settings(), &FixtureCatalog).unwrap()
}

/// Board with the panel and both venue columns registered
pub fn seeded_board() -> SchedulerBoard {
    let mut board = SchedulerBoard::new(seeded_store());
    let height = board.store().grid().column_height();
    let zones = board.zones_mut();
    zones.register_panel(Rect::from_min_size(Pos2::ZERO, vec2(GRID_LEFT, 1000.0)));
    for (index, venue) in [venues::wilk(), venues::rb()].into_iter().enumerate() {
        zones.register_column(
            dates::competition_day(),
            venue,
            Rect::from_min_size(
                Pos2::new(GRID_LEFT + COLUMN_WIDTH * index as f32, GRID_TOP),
                vec2(COLUMN_WIDTH, height),
            ),
        );
    }
    board
}

/// Pointer near the left edge of `column` at `minute` of day
pub fn pointer_at(board: &SchedulerBoard, column: usize, minute: i64) -> Pos2 {
    Pos2::new(
        GRID_LEFT + COLUMN_WIDTH * column as f32 + 10.0,
        GRID_TOP + board.store().grid().top_for_minute(minute),
    )
}

/// Where a placed item is drawn in `column`
pub fn item_rect(board: &SchedulerBoard, column: usize, start_minute: i64, minutes: i64) -> Rect {
    let grid = board.store().grid();
    Rect::from_min_size(
        Pos2::new(
            GRID_LEFT + COLUMN_WIDTH * column as f32,
            GRID_TOP + grid.top_for_minute(start_minute),
        ),
        vec2(COLUMN_WIDTH, grid.minutes_to_pixels(minutes as f32)),
    )
}
