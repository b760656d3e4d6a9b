//! Side-by-side column layout for overlapping items.
//!
//! Items sharing a day and a venue form a bucket. Within a bucket, items
//! connected by a chain of time overlaps form a cluster; each cluster is
//! packed greedily into lanes so that two items in the same lane never
//! overlap, and every member of the cluster reports the same lane count.
//!
//! The computation is pure: the same bucket always yields the same layout.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::item::{ItemId, ScheduleItem, TimeSpan, Venue};
use crate::models::settings::GridSettings;
use crate::services::grid::TimeGrid;

/// Day + venue pair identifying a bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketKey {
    pub day: NaiveDate,
    pub venue: Venue,
}

impl BucketKey {
    pub fn new(day: NaiveDate, venue: Venue) -> Self {
        Self { day, venue }
    }

    /// Bucket of an item scheduled directly on the grid
    pub fn of(item: &ScheduleItem) -> Option<Self> {
        let venue = item.venue()?;
        let span = item.span()?;
        Some(Self::new(span.day(), venue.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnPosition {
    pub column: usize,
    pub total_columns: usize,
}

impl ColumnPosition {
    pub const FULL_WIDTH: ColumnPosition = ColumnPosition {
        column: 0,
        total_columns: 1,
    };
}

/// Column assignment for every item of one bucket
pub type BucketLayout = BTreeMap<ItemId, ColumnPosition>;

/// Greedily assign columns to a set of spans.
///
/// Entries are ordered by start, then longer first, then id so that the
/// outcome never depends on input order.
pub fn assign_columns<'a, I>(entries: I) -> BucketLayout
where
    I: IntoIterator<Item = (&'a ItemId, &'a TimeSpan)>,
{
    let mut sorted: Vec<(&ItemId, &TimeSpan)> = entries.into_iter().collect();
    sorted.sort_by(|(a_id, a), (b_id, b)| {
        a.start
            .cmp(&b.start)
            .then_with(|| b.duration().cmp(&a.duration()))
            .then_with(|| a_id.cmp(b_id))
    });

    let mut layout = BucketLayout::new();
    for cluster in overlap_clusters(&sorted) {
        if cluster.len() == 1 {
            layout.insert(cluster[0].0.clone(), ColumnPosition::FULL_WIDTH);
            continue;
        }
        pack_cluster(cluster, &mut layout);
    }
    layout
}

/// Partition sorted entries into clusters of transitively overlapping spans.
/// An entry touching several existing clusters merges them.
fn overlap_clusters<'a>(
    sorted: &[(&'a ItemId, &'a TimeSpan)],
) -> Vec<Vec<(&'a ItemId, &'a TimeSpan)>> {
    let mut clusters: Vec<Vec<(&ItemId, &TimeSpan)>> = Vec::new();

    for &entry in sorted {
        let touching: Vec<usize> = clusters
            .iter()
            .enumerate()
            .filter(|(_, cluster)| cluster.iter().any(|(_, span)| span.overlaps(entry.1)))
            .map(|(index, _)| index)
            .collect();

        match touching.split_first() {
            None => clusters.push(vec![entry]),
            Some((&first, rest)) => {
                // Remove from the back so earlier indices stay valid.
                for &index in rest.iter().rev() {
                    let merged = clusters.remove(index);
                    clusters[first].extend(merged);
                }
                clusters[first].push(entry);
            }
        }
    }

    clusters
}

/// Greedy lane packing for one cluster. Every member is backfilled with the
/// number of lanes actually used as its `total_columns`.
fn pack_cluster(mut cluster: Vec<(&ItemId, &TimeSpan)>, layout: &mut BucketLayout) {
    // Stable: equal starts keep the longer-first order.
    cluster.sort_by(|(_, a), (_, b)| a.start.cmp(&b.start));

    let mut lane_ends: Vec<chrono::NaiveDateTime> = Vec::new();
    let mut assigned: Vec<(&ItemId, usize)> = Vec::with_capacity(cluster.len());

    for (id, span) in cluster {
        let column = match lane_ends.iter().position(|end| *end <= span.start) {
            Some(free) => free,
            None => {
                lane_ends.push(span.end);
                lane_ends.len() - 1
            }
        };
        lane_ends[column] = span.end;
        assigned.push((id, column));
    }

    let total_columns = lane_ends.len();
    for (id, column) in assigned {
        layout.insert(
            id.clone(),
            ColumnPosition {
                column,
                total_columns,
            },
        );
    }
}

/// Layout for the scheduled items of one bucket; items without a span are ignored
pub fn layout_items<'a, I>(items: I) -> BucketLayout
where
    I: IntoIterator<Item = &'a ScheduleItem>,
{
    assign_columns(
        items
            .into_iter()
            .filter_map(|item| item.span().map(|span| (&item.id, span))),
    )
}

/// Everything the rendering layer needs to draw one item
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSlot {
    pub item_id: ItemId,
    pub column: usize,
    pub total_columns: usize,
    pub top_px: f32,
    pub height_px: f32,
    pub left_percent: f32,
    pub width_percent: f32,
}

/// Horizontal placement `(left, width)` in percent of the lane width
pub fn horizontal_extent(position: ColumnPosition, gap_percent: f32) -> (f32, f32) {
    let total = position.total_columns.max(1) as f32;
    let gap = if position.total_columns > 1 {
        gap_percent
    } else {
        0.0
    };
    let width = (100.0 - gap * (total - 1.0)) / total;
    let left = position.column as f32 * (width + gap);
    (left, width)
}

/// Compose the time grid with a bucket layout into render tuples, ordered
/// by start time.
pub fn render_layout(
    grid: &TimeGrid,
    settings: &GridSettings,
    items: &[&ScheduleItem],
    layout: &BucketLayout,
) -> Vec<RenderSlot> {
    let mut slots: Vec<(TimeSpan, RenderSlot)> = items
        .iter()
        .filter_map(|item| {
            let span = *item.span()?;
            let position = layout
                .get(&item.id)
                .copied()
                .unwrap_or(ColumnPosition::FULL_WIDTH);
            let (left_percent, width_percent) =
                horizontal_extent(position, settings.column_gap_percent);
            let duration = span.duration_minutes().max(settings.min_duration_minutes);

            Some((
                span,
                RenderSlot {
                    item_id: item.id.clone(),
                    column: position.column,
                    total_columns: position.total_columns,
                    top_px: grid.top_for_minute(span.start_minute_of_day()),
                    height_px: grid.minutes_to_pixels(duration as f32),
                    left_percent,
                    width_percent,
                },
            ))
        })
        .collect();

    slots.sort_by(|(a, a_slot), (b, b_slot)| {
        a.start
            .cmp(&b.start)
            .then_with(|| a_slot.item_id.cmp(&b_slot.item_id))
    });
    slots.into_iter().map(|(_, slot)| slot).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 9).unwrap()
    }

    fn entries(spans: &[(&str, i64, i64)]) -> Vec<(ItemId, TimeSpan)> {
        spans
            .iter()
            .map(|(id, start, end)| {
                (
                    ItemId::new(*id),
                    TimeSpan::on_day(day(), *start, end - start),
                )
            })
            .collect()
    }

    fn layout_of(spans: &[(&str, i64, i64)]) -> BucketLayout {
        let entries = entries(spans);
        assign_columns(entries.iter().map(|(id, span)| (id, span)))
    }

    fn pos(column: usize, total_columns: usize) -> ColumnPosition {
        ColumnPosition {
            column,
            total_columns,
        }
    }

    #[test]
    fn test_empty_bucket() {
        assert!(layout_of(&[]).is_empty());
    }

    #[test]
    fn test_overlapping_pair_splits() {
        let layout = layout_of(&[("a", 600, 660), ("b", 630, 690)]);
        assert_eq!(layout[&ItemId::new("a")], pos(0, 2));
        assert_eq!(layout[&ItemId::new("b")], pos(1, 2));
    }

    #[test]
    fn test_touching_pair_stays_full_width() {
        let layout = layout_of(&[("a", 600, 660), ("b", 660, 720)]);
        assert_eq!(layout[&ItemId::new("a")], ColumnPosition::FULL_WIDTH);
        assert_eq!(layout[&ItemId::new("b")], ColumnPosition::FULL_WIDTH);
    }

    #[test]
    fn test_same_start_longer_first() {
        let layout = layout_of(&[("short", 600, 630), ("long", 600, 720)]);
        assert_eq!(layout[&ItemId::new("long")], pos(0, 2));
        assert_eq!(layout[&ItemId::new("short")], pos(1, 2));
    }

    #[test]
    fn test_lane_reuse_within_cluster() {
        // b ends before c starts, so c reuses b's lane
        let layout = layout_of(&[("a", 600, 720), ("b", 610, 640), ("c", 650, 700)]);
        assert_eq!(layout[&ItemId::new("a")], pos(0, 2));
        assert_eq!(layout[&ItemId::new("b")], pos(1, 2));
        assert_eq!(layout[&ItemId::new("c")], pos(1, 2));
    }

    #[test]
    fn test_separate_clusters_are_independent() {
        let layout = layout_of(&[
            ("a", 600, 660),
            ("b", 630, 690),
            ("c", 800, 860),
        ]);
        assert_eq!(layout[&ItemId::new("c")], ColumnPosition::FULL_WIDTH);
        assert_eq!(layout[&ItemId::new("a")].total_columns, 2);
    }

    #[test]
    fn test_chain_forms_one_cluster() {
        // a-b and b-c overlap, a-c do not: one cluster, two lanes
        let layout = layout_of(&[("a", 600, 660), ("b", 650, 710), ("c", 700, 760)]);
        assert_eq!(layout[&ItemId::new("a")], pos(0, 2));
        assert_eq!(layout[&ItemId::new("b")], pos(1, 2));
        assert_eq!(layout[&ItemId::new("c")], pos(0, 2));
    }

    #[test]
    fn test_three_way_overlap_needs_three_columns() {
        let layout = layout_of(&[("a", 600, 700), ("b", 610, 700), ("c", 620, 700)]);
        for id in ["a", "b", "c"] {
            assert_eq!(layout[&ItemId::new(id)].total_columns, 3);
        }
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let forward = layout_of(&[("a", 600, 660), ("b", 630, 690), ("c", 640, 650)]);
        let backward = layout_of(&[("c", 640, 650), ("b", 630, 690), ("a", 600, 660)]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_horizontal_extent_with_gap() {
        assert_eq!(horizontal_extent(ColumnPosition::FULL_WIDTH, 1.0), (0.0, 100.0));
        let (left, width) = horizontal_extent(pos(1, 2), 1.0);
        assert_eq!(width, 49.5);
        assert_eq!(left, 50.5);
    }

    #[test]
    fn test_render_layout_positions() {
        let grid = TimeGrid::new(480, 1320, 15, 12.0);
        let settings = GridSettings::default();
        let a = ScheduleItem::event("a", "A");
        let mut scheduled = a.clone();
        scheduled.placement = crate::models::item::Placement::Scheduled {
            venue: Venue::new("Wilk"),
            span: TimeSpan::on_day(day(), 600, 5),
        };
        let items = vec![&scheduled];
        let layout = layout_items(items.iter().copied());

        let slots = render_layout(&grid, &settings, &items, &layout);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].top_px, 96.0);
        // five-minute item is drawn at the minimum duration
        assert_eq!(slots[0].height_px, 12.0);
        assert_eq!(slots[0].width_percent, 100.0);
    }
}
