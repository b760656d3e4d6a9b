use super::ScheduleStore;
use crate::models::item::{ItemId, ItemState, ScheduleItem};
use crate::services::layout::{self, BucketKey, BucketLayout, ColumnPosition, RenderSlot};

impl ScheduleStore {
    /// Items listed in the pick panel: available items and templates.
    pub fn available_items(&self) -> Vec<&ScheduleItem> {
        self.items
            .iter()
            .filter(|item| item.state().is_in_panel())
            .collect()
    }

    /// Items placed directly on the grid, ordered by start time.
    pub fn scheduled_items(&self) -> Vec<&ScheduleItem> {
        let mut items: Vec<&ScheduleItem> = self
            .items
            .iter()
            .filter(|item| item.state() == ItemState::Scheduled)
            .collect();
        items.sort_by(|a, b| a.start_at().cmp(&b.start_at()).then_with(|| a.id.cmp(&b.id)));
        items
    }

    /// Resolved members of a block in membership order. Ids that no longer
    /// point at a nested event are skipped.
    pub fn members_of(&self, block_id: &ItemId) -> Vec<&ScheduleItem> {
        let Some(block) = self.get(block_id) else {
            return Vec::new();
        };
        block
            .member_event_ids()
            .iter()
            .filter_map(|member_id| {
                let member = self
                    .get(member_id)
                    .filter(|member| member.container_block_id() == Some(block_id));
                if member.is_none() {
                    log::warn!("Skipping dangling member {} of block {}", member_id, block_id);
                }
                member
            })
            .collect()
    }

    pub fn bucket_keys(&self) -> Vec<BucketKey> {
        self.layouts.keys().cloned().collect()
    }

    /// Scheduled items of one day/venue bucket
    pub fn bucket_items(&self, key: &BucketKey) -> Vec<&ScheduleItem> {
        self.items
            .iter()
            .filter(|item| BucketKey::of(item).as_ref() == Some(key))
            .collect()
    }

    /// Cached column layout of a bucket; empty for buckets with no items
    pub fn bucket_layout(&self, key: &BucketKey) -> BucketLayout {
        self.layouts.get(key).cloned().unwrap_or_default()
    }

    /// Column of a scheduled item, `None` when it is not on the grid
    pub fn column_position(&self, id: &ItemId) -> Option<ColumnPosition> {
        let key = BucketKey::of(self.get(id)?)?;
        self.layouts.get(&key)?.get(id).copied()
    }

    /// Render tuples for one bucket
    pub fn render_bucket(&self, key: &BucketKey) -> Vec<RenderSlot> {
        let items = self.bucket_items(key);
        match self.layouts.get(key) {
            Some(cached) => layout::render_layout(&self.grid, &self.settings, &items, cached),
            None => Vec::new(),
        }
    }
}
