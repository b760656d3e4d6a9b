//! Schedule store entry point.
//! Owns every event and block, the board's days and venues, the current
//! selection and the derived column layouts. Item placement only changes
//! through [`ScheduleStore::apply_transition`].

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use chrono::NaiveDate;

use crate::models::catalog::CatalogProvider;
use crate::models::item::{ItemId, ItemState, ScheduleItem, Venue};
use crate::models::settings::GridSettings;
use crate::services::grid::TimeGrid;
use crate::services::layout::{BucketKey, BucketLayout};

pub mod queries;
pub mod transitions;

pub use transitions::{GridTarget, Transition};

/// One entry of the change feed consumed by a persistence adapter.
/// `before` is `None` for spawned copies, `after` is `None` for removals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemChange {
    pub item_id: ItemId,
    pub before: Option<ItemState>,
    pub after: Option<ItemState>,
}

pub struct ScheduleStore {
    settings: GridSettings,
    grid: TimeGrid,
    days: Vec<NaiveDate>,
    venues: Vec<Venue>,
    items: Vec<ScheduleItem>,
    selected: Option<ItemId>,
    layouts: BTreeMap<BucketKey, BucketLayout>,
    dirty: BTreeSet<BucketKey>,
    changes: Vec<ItemChange>,
    next_copy: u64,
}

impl ScheduleStore {
    pub fn new(settings: GridSettings) -> Self {
        let grid = TimeGrid::from_settings(&settings);
        Self {
            settings,
            grid,
            days: Vec::new(),
            venues: Vec::new(),
            items: Vec::new(),
            selected: None,
            layouts: BTreeMap::new(),
            dirty: BTreeSet::new(),
            changes: Vec::new(),
            next_copy: 1,
        }
    }

    /// Seed a store from a catalog. Invalid and duplicate entries are
    /// skipped with a warning.
    pub fn from_catalog(settings: GridSettings, catalog: &dyn CatalogProvider) -> Result<Self> {
        let mut store = Self::new(settings);
        for entry in catalog.entries()? {
            match entry.to_item() {
                Ok(item) => {
                    store.insert_item(item);
                }
                Err(err) => log::warn!("Skipping catalog entry {:?}: {}", entry.id, err),
            }
        }
        log::info!("Seeded schedule with {} items", store.items.len());
        Ok(store)
    }

    /// Add an unplaced item. Only `available` and `infinite` items can be
    /// seeded; placed items only arise from transitions.
    pub fn insert_item(&mut self, item: ScheduleItem) -> bool {
        if !item.state().is_in_panel() {
            log::warn!("Refusing to seed {} in state {}", item.id, item.state());
            return false;
        }
        if self.contains(&item.id) {
            log::warn!("Duplicate item id {}; keeping the first", item.id);
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    pub fn add_day(&mut self, day: NaiveDate) -> bool {
        if self.days.contains(&day) {
            return false;
        }
        self.days.push(day);
        true
    }

    pub fn add_venue(&mut self, venue: Venue) -> bool {
        if self.venues.contains(&venue) {
            return false;
        }
        self.venues.push(venue);
        true
    }

    pub fn items(&self) -> &[ScheduleItem] {
        &self.items
    }

    /// Owned snapshot of every item, for adapters that outlive a borrow
    pub fn get_items(&self) -> Vec<ScheduleItem> {
        self.items.clone()
    }

    pub fn get(&self, id: &ItemId) -> Option<&ScheduleItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    pub fn selected(&self) -> Option<&ItemId> {
        self.selected.as_ref()
    }

    pub fn selected_item(&self) -> Option<&ScheduleItem> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    /// Select an item; unknown ids leave the selection untouched
    pub fn select(&mut self, id: &ItemId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.selected = Some(id.clone());
        true
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Drain the pending change feed
    pub fn take_changes(&mut self) -> Vec<ItemChange> {
        std::mem::take(&mut self.changes)
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Recompute layouts for every bucket touched since the last refresh
    fn refresh_layouts(&mut self) {
        let dirty = std::mem::take(&mut self.dirty);
        for key in dirty {
            let layout = crate::services::layout::layout_items(
                self.items
                    .iter()
                    .filter(|item| BucketKey::of(item).as_ref() == Some(&key)),
            );
            if layout.is_empty() {
                self.layouts.remove(&key);
            } else {
                self.layouts.insert(key, layout);
            }
        }
    }
}
