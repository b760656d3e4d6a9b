// Parameterised tests for the time grid and the display helpers

use test_case::test_case;

use venue_scheduler::services::grid::TimeGrid;
use venue_scheduler::utils::time_format::{format_duration, format_time, parse_duration, parse_time};

fn scenario_grid() -> TimeGrid {
    TimeGrid::new(480, 1320, 15, 12.0)
}

#[test_case(96.0, 600 ; "96px below the top is ten")]
#[test_case(0.0, 480 ; "column top is day start")]
#[test_case(5.9, 480 ; "just under half a slot rounds down")]
#[test_case(6.0, 495 ; "half a slot rounds up")]
#[test_case(18.0, 510 ; "one and a half slots round up")]
#[test_case(672.0, 1320 ; "column bottom is day end")]
#[test_case(-40.0, 480 ; "above the column clamps to start")]
#[test_case(10_000.0, 1320 ; "below the column clamps to end")]
fn test_time_slot_from_pointer(offset: f32, expected: i64) {
    let grid = scenario_grid();
    assert_eq!(grid.time_slot_from_pointer(100.0 + offset, 100.0), expected);
}

#[test_case(480, 1320, 15, 56 ; "full day")]
#[test_case(480, 490, 15, 1 ; "partial slot rounds up")]
#[test_case(600, 600, 15, 0 ; "empty day")]
#[test_case(0, 1440, 60, 24 ; "hourly slots")]
fn test_total_slots(start: i64, end: i64, interval: i64, expected: i64) {
    assert_eq!(TimeGrid::new(start, end, interval, 12.0).total_slots(), expected);
}

#[test_case(15.0, 12.0 ; "one slot")]
#[test_case(60.0, 48.0 ; "one hour")]
#[test_case(7.5, 6.0 ; "half slot")]
#[test_case(0.0, 0.0 ; "zero")]
fn test_minutes_to_pixels(minutes: f32, pixels: f32) {
    let grid = scenario_grid();
    assert_eq!(grid.minutes_to_pixels(minutes), pixels);
    assert_eq!(grid.pixels_to_minutes(pixels), minutes);
}

#[test_case(0, "12:00am")]
#[test_case(540, "9:00am")]
#[test_case(725, "12:05pm")]
#[test_case(1319, "9:59pm")]
fn test_format_time(minute: i64, expected: &str) {
    assert_eq!(format_time(minute), expected);
    assert_eq!(parse_time(expected), Some(minute));
}

#[test_case("45min", Some(45))]
#[test_case("2h", Some(120))]
#[test_case("1h 30min", Some(90))]
#[test_case("", None ; "empty")]
#[test_case("1h thirty", None ; "garbage")]
#[test_case("25h", None ; "longer than a day")]
fn test_parse_duration(input: &str, expected: Option<i64>) {
    assert_eq!(parse_duration(input), expected);
    if let Some(minutes) = expected {
        assert_eq!(format_duration(minutes), input);
    }
}
