//! Drop targets and how a released drag turns into a transition.
//!
//! Column zones are picked by the horizontal center of the drag preview, so
//! a wide preview straddling two columns lands in the one holding most of
//! it. Block bodies and the panel are picked by plain containment of the
//! raw pointer.

use chrono::NaiveDate;
use egui::{Pos2, Rect};

use super::drag::DragPayload;
use crate::models::item::{ItemId, ItemKindTag, ItemState, Venue};
use crate::services::schedule::{GridTarget, ScheduleStore, Transition};

#[derive(Clone, Debug, PartialEq)]
pub enum DropZone {
    /// One day/venue column of the grid; `rect.top()` is the day start
    Column {
        day: NaiveDate,
        venue: Venue,
        rect: Rect,
    },
    /// Body of a block placed on the grid
    Block { block_id: ItemId, rect: Rect },
    /// The pick panel; dropping here unschedules
    Panel { rect: Rect },
}

/// Where a drop would land
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropResolution {
    Grid(GridTarget),
    Block {
        block_id: ItemId,
        offset_minutes: i64,
    },
    Panel,
}

/// Drop zones registered by the rendering layer for the current frame
#[derive(Clone, Debug, Default)]
pub struct DropZones {
    zones: Vec<DropZone>,
}

impl DropZones {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.zones.clear();
    }

    pub fn register_column(&mut self, day: NaiveDate, venue: Venue, rect: Rect) {
        self.zones.push(DropZone::Column { day, venue, rect });
    }

    /// Later registrations sit on top of earlier ones
    pub fn register_block(&mut self, block_id: ItemId, rect: Rect) {
        self.zones.push(DropZone::Block { block_id, rect });
    }

    pub fn register_panel(&mut self, rect: Rect) {
        self.zones.push(DropZone::Panel { rect });
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DropZone> {
        self.zones.iter()
    }

    /// Resolve the drop target under `pointer` for `payload`.
    ///
    /// Returns `None` when the pointer is outside every registered zone.
    pub fn resolve(
        &self,
        store: &ScheduleStore,
        payload: &DragPayload,
        pointer: Pos2,
    ) -> Option<DropResolution> {
        if !pointer.x.is_finite() || !pointer.y.is_finite() {
            return None;
        }
        let origin = payload.preview_origin(pointer);

        if payload.drag_kind == ItemKindTag::Event {
            if let Some(hit) = self.resolve_block(store, origin, pointer) {
                return Some(hit);
            }
        }

        let over_panel = self.zones.iter().any(|zone| match zone {
            DropZone::Panel { rect } => rect.contains(pointer),
            _ => false,
        });
        if over_panel {
            return Some(DropResolution::Panel);
        }

        let preview_center_x = origin.x + store.settings().drag_preview_width / 2.0;
        self.zones.iter().find_map(|zone| match zone {
            DropZone::Column { day, venue, rect }
                if rect.x_range().contains(preview_center_x)
                    && rect.y_range().contains(pointer.y) =>
            {
                let minute = store.grid().time_slot_from_pointer(origin.y, rect.top());
                Some(DropResolution::Grid(GridTarget::new(
                    *day,
                    venue.clone(),
                    minute,
                )))
            }
            _ => None,
        })
    }

    fn resolve_block(
        &self,
        store: &ScheduleStore,
        origin: Pos2,
        pointer: Pos2,
    ) -> Option<DropResolution> {
        self.zones.iter().rev().find_map(|zone| {
            let DropZone::Block { block_id, rect } = zone else {
                return None;
            };
            if !rect.contains(pointer) {
                return None;
            }
            // Only blocks actually on the grid accept members.
            let block = store.get(block_id).filter(|block| block.is_block())?;
            let duration = block
                .venue()
                .and(block.span())
                .map(|span| span.duration_minutes())?;

            let ratio = if rect.height() > 0.0 {
                ((origin.y - rect.top()) / rect.height()).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let ratio = if ratio.is_finite() { ratio } else { 0.0 };

            Some(DropResolution::Block {
                block_id: block_id.clone(),
                offset_minutes: (duration as f32 * ratio).round() as i64,
            })
        })
    }
}

/// Transition a drop should trigger, chosen from the payload's state at
/// drag start. `None` means the drop changes nothing.
pub fn dispatch(payload: &DragPayload, resolution: &DropResolution) -> Option<Transition> {
    match resolution {
        DropResolution::Grid(target) => Some(match payload.state {
            ItemState::Available => Transition::Place(target.clone()),
            ItemState::Infinite => Transition::Spawn(target.clone()),
            ItemState::Scheduled => Transition::Move(target.clone()),
            ItemState::InBlock => Transition::Release(target.clone()),
        }),
        DropResolution::Block {
            block_id,
            offset_minutes,
        } => {
            if &payload.item_id == block_id {
                return None;
            }
            Some(match payload.state {
                ItemState::Infinite => Transition::SpawnInBlock {
                    block_id: block_id.clone(),
                    offset_minutes: *offset_minutes,
                },
                ItemState::Available | ItemState::Scheduled | ItemState::InBlock => {
                    Transition::Nest {
                        block_id: block_id.clone(),
                        offset_minutes: *offset_minutes,
                    }
                }
            })
        }
        DropResolution::Panel => match payload.state {
            ItemState::Scheduled | ItemState::InBlock => Some(Transition::Unschedule),
            ItemState::Available | ItemState::Infinite => None,
        },
    }
}
