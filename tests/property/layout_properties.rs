// Property-based tests for the column layout and the time grid
// Random buckets check that the layout is stable and never stacks overlapping items

use chrono::NaiveDate;
use proptest::prelude::*;

use venue_scheduler::models::item::{ItemId, TimeSpan};
use venue_scheduler::services::grid::TimeGrid;
use venue_scheduler::services::layout::{assign_columns, BucketLayout};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 9).unwrap()
}

/// Up to 24 items between 8:00 and 22:00, 5 minutes to 4 hours long
fn bucket() -> impl Strategy<Value = Vec<(ItemId, TimeSpan)>> {
    prop::collection::vec((480i64..1300, 5i64..240), 0..24).prop_map(|spans| {
        spans
            .into_iter()
            .enumerate()
            .map(|(index, (start, duration))| {
                (
                    ItemId::new(format!("item-{index:02}")),
                    TimeSpan::on_day(day(), start, duration),
                )
            })
            .collect()
    })
}

fn layout(entries: &[(ItemId, TimeSpan)]) -> BucketLayout {
    assign_columns(entries.iter().map(|(id, span)| (id, span)))
}

proptest! {
    /// Property: laying out the same bucket twice gives the same answer
    #[test]
    fn prop_layout_is_idempotent(entries in bucket()) {
        prop_assert_eq!(layout(&entries), layout(&entries));
    }

    /// Property: input order does not influence the layout
    #[test]
    fn prop_layout_ignores_input_order(entries in bucket()) {
        let mut reversed = entries.clone();
        reversed.reverse();
        prop_assert_eq!(layout(&entries), layout(&reversed));
    }

    /// Property: two items sharing a column never overlap
    #[test]
    fn prop_same_column_never_overlaps(entries in bucket()) {
        let result = layout(&entries);
        prop_assert_eq!(result.len(), entries.len());
        for (i, (a_id, a)) in entries.iter().enumerate() {
            for (b_id, b) in entries.iter().skip(i + 1) {
                if result[a_id].column == result[b_id].column {
                    prop_assert!(!a.overlaps(b), "{} and {} share a column", a_id, b_id);
                }
            }
        }
    }

    /// Property: k items overlapping at one instant each get at least k columns,
    /// and overlapping items always agree on the column count
    #[test]
    fn prop_clusters_have_enough_columns(entries in bucket()) {
        let result = layout(&entries);
        for (_, probe) in &entries {
            let instant = probe.start;
            let covering: Vec<&ItemId> = entries
                .iter()
                .filter(|(_, span)| span.start <= instant && instant < span.end)
                .map(|(id, _)| id)
                .collect();
            for id in &covering {
                prop_assert!(result[*id].total_columns >= covering.len());
                prop_assert_eq!(result[*id].total_columns, result[covering[0]].total_columns);
            }
        }
        for position in result.values() {
            prop_assert!(position.column < position.total_columns);
        }
    }

    /// Property: whole slots survive a minutes -> pixels -> minutes trip exactly
    #[test]
    fn prop_pixel_round_trip(
        slots in 0i64..2000,
        interval in prop::sample::select(vec![5i64, 10, 15, 30, 60]),
        pixels_per_slot in prop::sample::select(vec![6.0f32, 7.5, 12.0, 12.5, 36.0]),
    ) {
        let grid = TimeGrid::new(0, 1440, interval, pixels_per_slot);
        let minutes = (slots * interval) as f32;
        prop_assert_eq!(grid.pixels_to_minutes(grid.minutes_to_pixels(minutes)), minutes);
    }

    /// Property: any pointer position maps to a slot boundary inside the day
    #[test]
    fn prop_pointer_always_lands_in_day(pointer_y in -5000.0f32..5000.0, top in -500.0f32..500.0) {
        let grid = TimeGrid::new(480, 1320, 15, 12.0);
        let minute = grid.time_slot_from_pointer(pointer_y, top);
        prop_assert!((480..=1320).contains(&minute));
        prop_assert_eq!(minute % 15, 0);
    }
}
