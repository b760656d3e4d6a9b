use chrono::{Duration, NaiveDateTime};
use egui::{Pos2, Vec2};

use crate::models::item::{ItemId, ItemKindTag, ItemState, ScheduleItem};

use super::drop::DropResolution;

/// What travels with the pointer while an item is dragged
#[derive(Clone, Debug, PartialEq)]
pub struct DragPayload {
    pub drag_kind: ItemKindTag,
    pub item_id: ItemId,
    pub state: ItemState,
    pub start_at: Option<NaiveDateTime>,
    pub end_at: Option<NaiveDateTime>,
    /// Pointer position minus the item's visual origin at grab time
    pub grab_offset: Vec2,
}

impl DragPayload {
    pub fn from_item(item: &ScheduleItem, grab_offset: Vec2) -> Self {
        Self {
            drag_kind: item.kind_tag(),
            item_id: item.id.clone(),
            state: item.state(),
            start_at: item.start_at(),
            end_at: item.end_at(),
            grab_offset,
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        match (self.start_at, self.end_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Top-left corner of the drag preview for a raw pointer position
    pub fn preview_origin(&self, pointer: Pos2) -> Pos2 {
        pointer - self.grab_offset
    }
}

#[derive(Clone, Debug)]
pub struct DragContext {
    pub payload: DragPayload,
    pub pointer_pos: Option<Pos2>,
    pub hovered: Option<DropResolution>,
}

impl DragContext {
    pub fn new(payload: DragPayload) -> Self {
        Self {
            payload,
            pointer_pos: None,
            hovered: None,
        }
    }
}

/// Owns the single drag gesture in flight
#[derive(Debug, Default)]
pub struct DragManager {
    active: Option<DragContext>,
}

impl DragManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, payload: DragPayload) {
        if let Some(previous) = self.active.take() {
            log::debug!(
                "Dropping stale drag of {} before starting a new one",
                previous.payload.item_id
            );
        }
        log::debug!(
            "Drag started: {} ({})",
            payload.item_id,
            payload.state
        );
        self.active = Some(DragContext::new(payload));
    }

    pub fn active(&self) -> Option<&DragContext> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_dragging_item(&self, id: &ItemId) -> bool {
        self.active
            .as_ref()
            .map_or(false, |ctx| &ctx.payload.item_id == id)
    }

    pub fn update_hover(&mut self, pointer_pos: Pos2, hovered: Option<DropResolution>) {
        if let Some(state) = self.active.as_mut() {
            state.pointer_pos = Some(pointer_pos);
            state.hovered = hovered;
        }
    }

    pub fn finish(&mut self) -> Option<DragContext> {
        self.active.take()
    }

    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some(ctx) => {
                log::debug!("Drag of {} cancelled", ctx.payload.item_id);
                true
            }
            None => false,
        }
    }
}
