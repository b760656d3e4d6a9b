// Venue Scheduler
// Demo entry point: seeds a board, replays a few gestures and prints the layout

use anyhow::Result;
use chrono::NaiveDate;
use egui::{vec2, Pos2, Rect};
use serde_json::json;

use venue_scheduler::interaction::SchedulerBoard;
use venue_scheduler::models::catalog::{CatalogProvider, DemoCatalog, JsonCatalog};
use venue_scheduler::models::item::{ItemId, Venue};
use venue_scheduler::models::settings::GridSettings;
use venue_scheduler::services::layout::BucketKey;
use venue_scheduler::services::schedule::ScheduleStore;
use venue_scheduler::services::validation::validate_span;
use venue_scheduler::utils::time_format::{format_duration, format_time};

const COLUMN_WIDTH: f32 = 240.0;
const GRID_TOP: f32 = 40.0;

fn main() -> Result<()> {
    env_logger::init();

    log::info!("Starting Venue Scheduler demo");

    let settings = GridSettings::load_or_default(&GridSettings::default_path());
    let catalog: Box<dyn CatalogProvider> = match std::env::args().nth(1) {
        Some(path) => Box::new(JsonCatalog::new(path)),
        None => Box::new(DemoCatalog),
    };

    let mut store = ScheduleStore::from_catalog(settings, catalog.as_ref())?;
    let day = chrono::Local::now().date_naive();
    let venues = [Venue::new("Main Ballroom"), Venue::new("Side Room")];
    store.add_day(day);
    for venue in &venues {
        store.add_venue(venue.clone());
    }

    let mut board = SchedulerBoard::new(store);
    register_columns(&mut board, day, &venues);
    replay_demo_gestures(&mut board);

    for change in board.store_mut().take_changes() {
        log::debug!(
            "change {}: {:?} -> {:?}",
            change.item_id,
            change.before,
            change.after
        );
    }

    let store = board.store();
    let buckets: Vec<_> = store
        .bucket_keys()
        .iter()
        .map(|key| bucket_json(store, key))
        .collect();
    let panel: Vec<_> = store
        .available_items()
        .iter()
        .map(|item| json!({ "id": item.id, "name": item.name, "state": item.state() }))
        .collect();

    let output = json!({ "buckets": buckets, "panel": panel });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn register_columns(board: &mut SchedulerBoard, day: NaiveDate, venues: &[Venue]) {
    let height = board.store().grid().column_height();
    let zones = board.zones_mut();
    zones.register_panel(Rect::from_min_size(Pos2::ZERO, vec2(COLUMN_WIDTH, height)));
    for (index, venue) in venues.iter().enumerate() {
        let left = COLUMN_WIDTH * (index as f32 + 1.0);
        zones.register_column(
            day,
            venue.clone(),
            Rect::from_min_size(Pos2::new(left, GRID_TOP), vec2(COLUMN_WIDTH, height)),
        );
    }
}

/// Pointer just inside the left edge of a column at the given minute of day
fn pointer_at(board: &SchedulerBoard, column: usize, minute: i64) -> Pos2 {
    let y = GRID_TOP + board.store().grid().top_for_minute(minute);
    Pos2::new(COLUMN_WIDTH * (column as f32 + 1.0) + 10.0, y)
}

fn drag(board: &mut SchedulerBoard, id: &str, to: Pos2) {
    let id = ItemId::new(id);
    if board.begin_drag(&id, Pos2::ZERO, Pos2::ZERO) {
        board.drag_to(to);
        if board.drop_at(to).is_none() {
            log::warn!("Demo drop of {} did not land", id);
        }
    }
}

fn replay_demo_gestures(board: &mut SchedulerBoard) {
    let ten = pointer_at(board, 0, 600);
    let ten_thirty = pointer_at(board, 0, 630);
    let noon = pointer_at(board, 1, 720);

    drag(board, "1", ten);
    drag(board, "2", ten_thirty);
    drag(board, "block-1", noon);
    drag(board, "break", pointer_at(board, 0, 690));

    // nest an event in the block registered where the block is drawn
    let block_id = ItemId::new("block-1");
    let block_rect = board
        .store()
        .get(&block_id)
        .and_then(|block| block.span())
        .map(|span| {
            let grid = board.store().grid();
            let top = GRID_TOP + grid.top_for_minute(span.start_minute_of_day());
            let height = grid.minutes_to_pixels(span.duration_minutes() as f32);
            Rect::from_min_size(
                Pos2::new(COLUMN_WIDTH * 2.0, top),
                vec2(COLUMN_WIDTH, height),
            )
        });
    if let Some(rect) = block_rect {
        board.zones_mut().register_block(block_id, rect);
        drag(board, "3", rect.center());
    }
}

fn bucket_json(store: &ScheduleStore, key: &BucketKey) -> serde_json::Value {
    let slots: Vec<_> = store
        .render_bucket(key)
        .into_iter()
        .filter_map(|slot| {
            let item = store.get(&slot.item_id)?;
            let span = item.span()?;
            let report = validate_span(store.settings(), span);
            let members: Vec<_> = store
                .members_of(&item.id)
                .iter()
                .map(|member| member.name.clone())
                .collect();
            Some(json!({
                "id": slot.item_id,
                "name": item.name,
                "start": format_time(span.start_minute_of_day()),
                "duration": format_duration(span.duration_minutes()),
                "column": slot.column,
                "total_columns": slot.total_columns,
                "top_px": slot.top_px,
                "height_px": slot.height_px,
                "left_percent": slot.left_percent,
                "width_percent": slot.width_percent,
                "members": members,
                "warnings": report.warnings,
                "errors": report.errors,
            }))
        })
        .collect();

    json!({
        "day": key.day.to_string(),
        "venue": key.venue.name,
        "items": slots,
    })
}
