//! Gesture front door for a rendering layer.
//!
//! `SchedulerBoard` owns the store together with the drag, resize and drop
//! zone state, and turns pointer and key input into store transitions. A
//! frame typically re-registers its drop zones, forwards pointer
//! movement, and reads layouts back out of [`SchedulerBoard::store`].

use chrono::NaiveDateTime;
use egui::{Event, Key, Pos2, Rect};

use super::drag::{DragManager, DragPayload};
use super::drop::{self, DropResolution, DropZones};
use super::resize::{ResizeContext, ResizeManager};
use super::shortcuts::{self, ShortcutAction};
use crate::models::item::{ItemId, ScheduleItem};
use crate::services::schedule::{ScheduleStore, Transition};

pub struct SchedulerBoard {
    store: ScheduleStore,
    drag: DragManager,
    resize: ResizeManager,
    zones: DropZones,
}

impl SchedulerBoard {
    pub fn new(store: ScheduleStore) -> Self {
        Self {
            store,
            drag: DragManager::new(),
            resize: ResizeManager::new(),
            zones: DropZones::new(),
        }
    }

    pub fn store(&self) -> &ScheduleStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ScheduleStore {
        &mut self.store
    }

    pub fn into_store(self) -> ScheduleStore {
        self.store
    }

    pub fn zones(&self) -> &DropZones {
        &self.zones
    }

    pub fn zones_mut(&mut self) -> &mut DropZones {
        &mut self.zones
    }

    pub fn drag(&self) -> &DragManager {
        &self.drag
    }

    pub fn resize(&self) -> &ResizeManager {
        &self.resize
    }

    /// Select an item on click
    pub fn click(&mut self, id: &ItemId) -> bool {
        self.store.select(id)
    }

    /// Start dragging `id`, grabbed at `pointer` while drawn at `item_origin`
    pub fn begin_drag(&mut self, id: &ItemId, pointer: Pos2, item_origin: Pos2) -> bool {
        let Some(item) = self.store.get(id) else {
            log::warn!("Cannot drag unknown item {}", id);
            return false;
        };
        let payload = DragPayload::from_item(item, pointer - item_origin);
        self.resize.cancel();
        self.drag.begin(payload);
        true
    }

    /// Track the pointer during a drag; returns where a drop would land
    pub fn drag_to(&mut self, pointer: Pos2) -> Option<DropResolution> {
        let payload = &self.drag.active()?.payload;
        let hovered = self.zones.resolve(&self.store, payload, pointer);
        self.drag.update_hover(pointer, hovered.clone());
        hovered
    }

    /// Release the drag at `pointer`. Returns the affected item, or `None`
    /// when the drop landed nowhere and nothing changed.
    pub fn drop_at(&mut self, pointer: Pos2) -> Option<ScheduleItem> {
        let context = self.drag.finish()?;
        let payload = context.payload;

        let Some(resolution) = self.zones.resolve(&self.store, &payload, pointer) else {
            log::debug!("Drop of {} outside any target; nothing changed", payload.item_id);
            return None;
        };
        let Some(transition) = drop::dispatch(&payload, &resolution) else {
            log::debug!("Drop of {} on {:?} has no effect", payload.item_id, resolution);
            return None;
        };
        self.store.apply_transition(&payload.item_id, transition)
    }

    /// Start resizing `id`, currently drawn at `item_rect`
    pub fn begin_resize(&mut self, id: &ItemId, item_rect: Rect) -> bool {
        let Some(context) = self
            .store
            .get(id)
            .and_then(|item| ResizeContext::new(item, item_rect))
        else {
            log::warn!("Cannot resize {}: not placed", id);
            return false;
        };
        self.drag.cancel();
        self.resize.begin(context);
        true
    }

    pub fn resize_to(&mut self, pointer: Pos2) -> Option<NaiveDateTime> {
        self.resize
            .update_hover(self.store.grid(), self.store.settings(), pointer)
    }

    pub fn end_resize(&mut self) -> Option<ScheduleItem> {
        let (id, transition) = self.resize.finish()?;
        self.store.apply_transition(&id, transition)
    }

    /// Abandon whatever gesture is in progress without touching the store
    pub fn cancel_gestures(&mut self) -> bool {
        let dragging = self.drag.cancel();
        let resizing = self.resize.cancel();
        dragging || resizing
    }

    pub fn handle_key(&mut self, key: Key) -> Option<ScheduleItem> {
        let action = shortcuts::action_for_key(key)?;
        self.run_shortcut(action)
    }

    /// Apply every shortcut in one frame's input events
    pub fn handle_events(&mut self, events: &[Event]) -> Vec<ScheduleItem> {
        shortcuts::actions_from_events(events)
            .into_iter()
            .filter_map(|action| self.run_shortcut(action))
            .collect()
    }

    fn run_shortcut(&mut self, action: ShortcutAction) -> Option<ScheduleItem> {
        match action {
            ShortcutAction::RemoveSelected => {
                let item = self.store.selected_item()?;
                let id = item.id.clone();
                let transition = if item.is_block() {
                    Transition::Delete
                } else {
                    Transition::Unschedule
                };
                let result = self.store.apply_transition(&id, transition);
                self.store.deselect();
                result
            }
            ShortcutAction::Cancel => {
                self.cancel_gestures();
                self.store.deselect();
                None
            }
        }
    }
}
