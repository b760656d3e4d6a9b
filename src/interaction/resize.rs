// Item Resize
//
// Dragging the bottom edge of a placed item moves its end time in
// snap-sized steps. The start never moves and the result never drops
// below the minimum duration.

use chrono::{Duration, NaiveDateTime, Timelike};
use egui::{Pos2, Rect, Vec2};

use crate::models::item::{ItemId, ScheduleItem};
use crate::models::settings::GridSettings;
use crate::services::grid::TimeGrid;
use crate::services::schedule::Transition;

/// Height of the hit zone along the bottom edge of tall items
pub const HANDLE_ZONE_HEIGHT: f32 = 20.0;

/// Hit zone of the bottom resize handle for an item drawn at `item_rect`.
/// Short items give their whole lower half to the handle.
pub fn bottom_handle(item_rect: Rect) -> Rect {
    let zone_height = if item_rect.height() < 2.5 * HANDLE_ZONE_HEIGHT {
        item_rect.height() / 2.0
    } else {
        HANDLE_ZONE_HEIGHT
    };
    Rect::from_min_size(
        Pos2::new(item_rect.left(), item_rect.bottom() - zone_height),
        Vec2::new(item_rect.width(), zone_height),
    )
}

/// Context for an active resize
#[derive(Clone, Debug)]
pub struct ResizeContext {
    pub item_id: ItemId,
    pub original_start: NaiveDateTime,
    pub original_end: NaiveDateTime,
    /// Item rect when the resize started
    pub original_rect: Rect,
    pub pointer_pos: Option<Pos2>,
    pub hovered_end: Option<NaiveDateTime>,
}

impl ResizeContext {
    /// `None` for items without a time span
    pub fn new(item: &ScheduleItem, rect: Rect) -> Option<Self> {
        let span = item.span()?;
        Some(Self {
            item_id: item.id.clone(),
            original_start: span.start,
            original_end: span.end,
            original_rect: rect,
            pointer_pos: None,
            hovered_end: None,
        })
    }

    /// End time for a pointer at `pointer_y`, snapped and floored. The end
    /// stops at the close of the grid day unless the item already ran past it.
    pub fn end_for_pointer(
        &self,
        grid: &TimeGrid,
        settings: &GridSettings,
        pointer_y: f32,
    ) -> Option<NaiveDateTime> {
        let delta = grid.pixels_to_minutes(pointer_y - self.original_rect.bottom());
        if !delta.is_finite() {
            return None;
        }
        let original = (self.original_end - self.original_start).num_minutes();
        let start_minute = i64::from(self.original_start.time().num_seconds_from_midnight()) / 60;
        let latest = (grid.day_end_minute() - start_minute)
            .max(original)
            .max(settings.min_duration_minutes);

        let snap = settings.resize_snap_minutes.max(1);
        let steps = ((original as f32 + delta) / snap as f32 + 0.5).floor() as i64;
        let minutes = steps
            .saturating_mul(snap)
            .clamp(settings.min_duration_minutes, latest);
        self.original_start
            .checked_add_signed(Duration::try_minutes(minutes)?)
    }
}

/// Owns the single resize gesture in flight
#[derive(Debug, Default)]
pub struct ResizeManager {
    active: Option<ResizeContext>,
}

impl ResizeManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, context: ResizeContext) {
        log::debug!("Resize started: {}", context.item_id);
        self.active = Some(context);
    }

    pub fn active(&self) -> Option<&ResizeContext> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_resizing_item(&self, item_id: &ItemId) -> bool {
        self.active
            .as_ref()
            .map_or(false, |c| &c.item_id == item_id)
    }

    /// Track the pointer; returns the end time the item would get
    pub fn update_hover(
        &mut self,
        grid: &TimeGrid,
        settings: &GridSettings,
        pointer_pos: Pos2,
    ) -> Option<NaiveDateTime> {
        let state = self.active.as_mut()?;
        state.pointer_pos = Some(pointer_pos);
        if let Some(end) = state.end_for_pointer(grid, settings, pointer_pos.y) {
            state.hovered_end = Some(end);
        }
        state.hovered_end
    }

    /// End the gesture, yielding the resize to apply if the end moved
    pub fn finish(&mut self) -> Option<(ItemId, Transition)> {
        let context = self.active.take()?;
        let end_at = context.hovered_end?;
        if end_at == context.original_end {
            return None;
        }
        Some((context.item_id, Transition::Resize { end_at }))
    }

    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }
}
