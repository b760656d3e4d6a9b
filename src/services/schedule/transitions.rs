//! Item state machine.
//!
//! | from                 | transition     | to                    |
//! |----------------------|----------------|-----------------------|
//! | available            | `Place`        | scheduled             |
//! | infinite             | `Spawn`        | new scheduled copy    |
//! | infinite (event)     | `SpawnInBlock` | new in-block copy     |
//! | scheduled            | `Move`         | scheduled             |
//! | inBlock              | `Release`      | scheduled             |
//! | available, scheduled | `Nest`         | inBlock (events only) |
//! | scheduled, inBlock   | `Unschedule`   | available             |
//! | block (any state)    | `Delete`       | removed               |
//! | scheduled, inBlock   | `Resize`, `SetDuration`, `Retime` | unchanged state |
//!
//! Anything else is rejected and the item comes back unchanged. Block
//! membership is only edited here, so both sides of the block/member
//! relation always agree.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::{ItemChange, ScheduleStore};
use crate::models::item::{
    ItemId, ItemKind, ItemState, Placement, ScheduleItem, TimeSpan, Venue, MAX_SPAN_MINUTES,
};
use crate::services::layout::BucketKey;

/// Day, venue and snapped minute of day a drop resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridTarget {
    pub day: NaiveDate,
    pub venue: Venue,
    pub start_minute: i64,
}

impl GridTarget {
    pub fn new(day: NaiveDate, venue: Venue, start_minute: i64) -> Self {
        Self {
            day,
            venue,
            start_minute,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Drop a panel item onto the grid with the default duration
    Place(GridTarget),
    /// Drop a template onto the grid; the template stays in the panel
    Spawn(GridTarget),
    /// Drop an event template onto a block body
    SpawnInBlock { block_id: ItemId, offset_minutes: i64 },
    /// Drag a scheduled item to another cell, keeping its duration
    Move(GridTarget),
    /// Drag a nested event out of its block onto the grid
    Release(GridTarget),
    /// Drop an event onto a block body; `offset_minutes` is measured from
    /// the block start
    Nest { block_id: ItemId, offset_minutes: i64 },
    /// Send an item back to the panel
    Unschedule,
    /// Remove a block (members return to the panel), or unschedule an event
    Delete,
    Resize { end_at: NaiveDateTime },
    SetDuration { minutes: i64 },
    /// Move the start, keeping the duration
    Retime { start_at: NaiveDateTime },
}

impl Transition {
    pub fn name(&self) -> &'static str {
        match self {
            Transition::Place(_) => "place",
            Transition::Spawn(_) => "spawn",
            Transition::SpawnInBlock { .. } => "spawn_in_block",
            Transition::Move(_) => "move",
            Transition::Release(_) => "release",
            Transition::Nest { .. } => "nest",
            Transition::Unschedule => "unschedule",
            Transition::Delete => "delete",
            Transition::Resize { .. } => "resize",
            Transition::SetDuration { .. } => "set_duration",
            Transition::Retime { .. } => "retime",
        }
    }
}

type Outcome = Result<ScheduleItem, &'static str>;

const OUT_OF_RANGE: &str = "duration out of range";

impl ScheduleStore {
    /// Apply `transition` to the item `id`.
    ///
    /// Returns the resulting item: the new copy for spawns, a detached
    /// snapshot for deleted blocks, the untouched item when the transition
    /// is not legal from its current state, and `None` for unknown ids.
    /// Affected bucket layouts are recomputed before returning.
    pub fn apply_transition(
        &mut self,
        id: &ItemId,
        transition: Transition,
    ) -> Option<ScheduleItem> {
        let Some(index) = self.index_of(id) else {
            log::warn!("Ignoring {} for unknown item {}", transition.name(), id);
            return None;
        };

        let name = transition.name();
        let outcome = match transition {
            Transition::Place(target) => self.place(index, &target),
            Transition::Spawn(target) => self.spawn(index, &target),
            Transition::SpawnInBlock {
                block_id,
                offset_minutes,
            } => self.spawn_in_block(index, &block_id, offset_minutes),
            Transition::Move(target) => self.move_to(index, &target),
            Transition::Release(target) => self.release(index, &target),
            Transition::Nest {
                block_id,
                offset_minutes,
            } => self.nest(index, &block_id, offset_minutes),
            Transition::Unschedule => self.unschedule(index),
            Transition::Delete => self.delete(index),
            Transition::Resize { end_at } => self.resize(index, end_at),
            Transition::SetDuration { minutes } => self.set_duration(index, minutes),
            Transition::Retime { start_at } => self.retime(index, start_at),
        };

        match outcome {
            Ok(item) => {
                self.refresh_layouts();
                log::debug!("{} {}: now {} ({})", name, id, item.id, item.state());
                Some(item)
            }
            Err(reason) => {
                log::warn!("Rejected {} for {}: {}", name, id, reason);
                self.get(id).cloned()
            }
        }
    }

    fn place(&mut self, index: usize, target: &GridTarget) -> Outcome {
        if self.items[index].state() != ItemState::Available {
            return Err("only available items can be placed");
        }
        let span = self.span_at(target, self.settings.default_duration_minutes);
        self.set_placement(
            index,
            Placement::Scheduled {
                venue: target.venue.clone(),
                span,
            },
        );
        Ok(self.items[index].clone())
    }

    fn spawn(&mut self, index: usize, target: &GridTarget) -> Outcome {
        if self.items[index].state() != ItemState::Infinite {
            return Err("only templates can spawn copies");
        }
        let span = self.span_at(target, self.settings.default_duration_minutes);
        let copy = self.copy_of(
            index,
            Placement::Scheduled {
                venue: target.venue.clone(),
                span,
            },
        );
        Ok(self.insert_spawned(copy))
    }

    fn spawn_in_block(&mut self, index: usize, block_id: &ItemId, offset_minutes: i64) -> Outcome {
        let template = &self.items[index];
        if template.state() != ItemState::Infinite {
            return Err("only templates can spawn copies");
        }
        if template.is_block() {
            return Err("blocks cannot be nested");
        }
        let (block_index, block_span) = self.nest_target(block_id)?;
        let span = self.nested_span(&block_span, offset_minutes, None)?;
        let copy = self.copy_of(
            index,
            Placement::InBlock {
                block_id: block_id.clone(),
                span,
            },
        );
        let copy_id = copy.id.clone();
        let spawned = self.insert_spawned(copy);
        if let Some(members) = self.items[block_index].members_mut() {
            members.push(copy_id);
        }
        Ok(spawned)
    }

    fn move_to(&mut self, index: usize, target: &GridTarget) -> Outcome {
        let Placement::Scheduled { span: old_span, .. } = self.items[index].placement else {
            return Err("only scheduled items can be moved");
        };
        let span = self.span_at(target, old_span.duration_minutes());
        let members = self.shifted_members(index, span.start - old_span.start)?;
        self.set_placement(
            index,
            Placement::Scheduled {
                venue: target.venue.clone(),
                span,
            },
        );
        self.apply_member_spans(members);
        Ok(self.items[index].clone())
    }

    fn release(&mut self, index: usize, target: &GridTarget) -> Outcome {
        let Placement::InBlock { span: old_span, .. } = self.items[index].placement else {
            return Err("item is not inside a block");
        };
        self.detach_from_container(index);
        let span = self.span_at(target, old_span.duration_minutes());
        self.set_placement(
            index,
            Placement::Scheduled {
                venue: target.venue.clone(),
                span,
            },
        );
        Ok(self.items[index].clone())
    }

    fn nest(&mut self, index: usize, block_id: &ItemId, offset_minutes: i64) -> Outcome {
        let item = &self.items[index];
        if item.is_block() {
            return Err("blocks cannot be nested");
        }
        match item.state() {
            ItemState::Available | ItemState::Scheduled => {}
            ItemState::InBlock => return Err("item is already inside a block"),
            ItemState::Infinite => return Err("templates spawn copies instead of nesting"),
        }
        let prior_duration = item.span().map(TimeSpan::duration_minutes);
        let (_, block_span) = self.nest_target(block_id)?;
        let span = self.nested_span(&block_span, offset_minutes, prior_duration)?;

        let id = self.items[index].id.clone();
        self.remove_from_all_blocks(&id);
        self.set_placement(
            index,
            Placement::InBlock {
                block_id: block_id.clone(),
                span,
            },
        );
        if let Some(block_index) = self.index_of(block_id) {
            if let Some(members) = self.items[block_index].members_mut() {
                if !members.contains(&id) {
                    members.push(id);
                }
            }
        }
        Ok(self.items[index].clone())
    }

    fn unschedule(&mut self, index: usize) -> Outcome {
        match self.items[index].state() {
            ItemState::Scheduled | ItemState::InBlock => {}
            ItemState::Available | ItemState::Infinite => {
                return Err("item is not placed");
            }
        }
        self.detach_from_container(index);
        self.release_members(index);
        self.set_placement(index, Placement::Available);
        self.clear_selection_of(index);
        Ok(self.items[index].clone())
    }

    fn delete(&mut self, index: usize) -> Outcome {
        if !self.items[index].is_block() {
            return self.unschedule(index);
        }

        self.release_members(index);
        self.clear_selection_of(index);
        if let Some(key) = BucketKey::of(&self.items[index]) {
            self.dirty.insert(key);
        }
        let mut removed = self.items.remove(index);
        self.changes.push(ItemChange {
            item_id: removed.id.clone(),
            before: Some(removed.state()),
            after: None,
        });
        removed.placement = Placement::Available;
        Ok(removed)
    }

    fn resize(&mut self, index: usize, end_at: NaiveDateTime) -> Outcome {
        let Some(span) = self.items[index].span().copied() else {
            return Err("only placed items can be resized");
        };
        let floor = span
            .with_length(self.settings.min_duration_minutes)
            .ok_or(OUT_OF_RANGE)?;
        let resized = TimeSpan {
            start: span.start,
            end: end_at.max(floor.end),
        };
        if resized.duration_minutes() > MAX_SPAN_MINUTES {
            return Err(OUT_OF_RANGE);
        }
        self.replace_span(index, resized);
        Ok(self.items[index].clone())
    }

    fn set_duration(&mut self, index: usize, minutes: i64) -> Outcome {
        let Some(span) = self.items[index].span().copied() else {
            return Err("only placed items have a duration");
        };
        let target = span
            .with_length(minutes.max(0))
            .ok_or(OUT_OF_RANGE)?;
        self.resize(index, target.end)
    }

    fn retime(&mut self, index: usize, start_at: NaiveDateTime) -> Outcome {
        let Some(span) = self.items[index].span().copied() else {
            return Err("only placed items can be retimed");
        };
        let delta = start_at - span.start;
        let retimed = span.shifted(delta).ok_or(OUT_OF_RANGE)?;
        let members = self.shifted_members(index, delta)?;
        self.replace_span(index, retimed);
        self.apply_member_spans(members);
        Ok(self.items[index].clone())
    }

    fn span_at(&self, target: &GridTarget, duration_minutes: i64) -> TimeSpan {
        TimeSpan::on_day(
            target.day,
            target.start_minute,
            duration_minutes.max(self.settings.min_duration_minutes),
        )
    }

    /// Span of an event dropped `offset_minutes` into a block, snapped to the
    /// slot grid and kept within the block's start..end range.
    fn nested_span(
        &self,
        block_span: &TimeSpan,
        offset_minutes: i64,
        prior_duration: Option<i64>,
    ) -> Result<TimeSpan, &'static str> {
        let slot = self.grid.slot_interval_minutes();
        let snapped = self.grid.round_to_slot(offset_minutes as f32);
        let latest = (block_span.duration_minutes() - slot).max(0);
        let offset = snapped.clamp(0, latest);
        let duration = prior_duration
            .unwrap_or(self.settings.default_duration_minutes)
            .max(self.settings.min_duration_minutes);
        block_span
            .shifted(Duration::minutes(offset))
            .and_then(|shifted| shifted.with_length(duration))
            .filter(|span| span.duration_minutes() <= MAX_SPAN_MINUTES)
            .ok_or(OUT_OF_RANGE)
    }

    fn nest_target(&self, block_id: &ItemId) -> Result<(usize, TimeSpan), &'static str> {
        let Some(block_index) = self.index_of(block_id) else {
            return Err("target block does not exist");
        };
        let block = &self.items[block_index];
        if !block.is_block() {
            return Err("target is not a block");
        }
        match block.placement {
            Placement::Scheduled { span, .. } => Ok((block_index, span)),
            _ => Err("target block is not on the grid"),
        }
    }

    fn copy_of(&mut self, index: usize, placement: Placement) -> ScheduleItem {
        let template = &self.items[index];
        let mut id = ItemId::new(format!("{}-copy-{}", template.id, self.next_copy));
        self.next_copy += 1;
        while self.contains(&id) {
            id = ItemId::new(format!("{}-copy-{}", self.items[index].id, self.next_copy));
            self.next_copy += 1;
        }

        let template = &self.items[index];
        let kind = match template.kind {
            ItemKind::Event => ItemKind::Event,
            ItemKind::Block { .. } => ItemKind::Block {
                members: Vec::new(),
            },
        };
        ScheduleItem {
            id,
            name: template.name.clone(),
            color: template.color.clone(),
            kind,
            placement,
        }
    }

    fn insert_spawned(&mut self, copy: ScheduleItem) -> ScheduleItem {
        if let Some(key) = BucketKey::of(&copy) {
            self.dirty.insert(key);
        }
        self.changes.push(ItemChange {
            item_id: copy.id.clone(),
            before: None,
            after: Some(copy.state()),
        });
        self.items.push(copy.clone());
        copy
    }

    /// Single write path for placements; records the change and marks the
    /// old and new buckets for relayout.
    fn set_placement(&mut self, index: usize, placement: Placement) {
        let item = &mut self.items[index];
        let before = item.state();
        if let Some(key) = BucketKey::of(item) {
            self.dirty.insert(key);
        }
        item.placement = placement;
        if let Some(key) = BucketKey::of(item) {
            self.dirty.insert(key);
        }
        self.changes.push(ItemChange {
            item_id: item.id.clone(),
            before: Some(before),
            after: Some(item.state()),
        });
    }

    fn replace_span(&mut self, index: usize, span: TimeSpan) {
        let placement = match &self.items[index].placement {
            Placement::Scheduled { venue, .. } => Placement::Scheduled {
                venue: venue.clone(),
                span,
            },
            Placement::InBlock { block_id, .. } => Placement::InBlock {
                block_id: block_id.clone(),
                span,
            },
            Placement::Available | Placement::Infinite => return,
        };
        self.set_placement(index, placement);
    }

    /// Member spans of a block moved by `delta`, computed before anything
    /// is written so a failed shift leaves the block and its members alone
    fn shifted_members(
        &self,
        block_index: usize,
        delta: Duration,
    ) -> Result<Vec<(usize, TimeSpan)>, &'static str> {
        if delta == Duration::zero() {
            return Ok(Vec::new());
        }
        let block_id = &self.items[block_index].id;
        let mut shifted = Vec::new();
        for member_id in self.items[block_index].member_event_ids() {
            let Some(member_index) = self.member_index(block_id, member_id) else {
                log::warn!("Block {} lists dangling member {}", block_id, member_id);
                continue;
            };
            if let Some(span) = self.items[member_index].span() {
                shifted.push((member_index, span.shifted(delta).ok_or(OUT_OF_RANGE)?));
            }
        }
        Ok(shifted)
    }

    fn apply_member_spans(&mut self, spans: Vec<(usize, TimeSpan)>) {
        for (member_index, span) in spans {
            self.replace_span(member_index, span);
        }
    }

    /// Return every member of a block to the panel and empty its member list
    fn release_members(&mut self, block_index: usize) {
        let block_id = self.items[block_index].id.clone();
        let members = match self.items[block_index].members_mut() {
            Some(members) => std::mem::take(members),
            None => return,
        };
        for member_id in members {
            match self.member_index(&block_id, &member_id) {
                Some(member_index) => {
                    self.set_placement(member_index, Placement::Available);
                    self.clear_selection_of(member_index);
                }
                None => log::warn!("Block {} lists dangling member {}", block_id, member_id),
            }
        }
    }

    /// Index of `member_id` if it really is nested in `block_id`
    fn member_index(&self, block_id: &ItemId, member_id: &ItemId) -> Option<usize> {
        let index = self.index_of(member_id)?;
        (self.items[index].container_block_id() == Some(block_id)).then_some(index)
    }

    fn detach_from_container(&mut self, index: usize) {
        let Some(block_id) = self.items[index].container_block_id().cloned() else {
            return;
        };
        let id = self.items[index].id.clone();
        match self.index_of(&block_id) {
            Some(block_index) => {
                if let Some(members) = self.items[block_index].members_mut() {
                    members.retain(|member| member != &id);
                }
            }
            None => log::warn!("Event {} points at missing block {}", id, block_id),
        }
    }

    fn remove_from_all_blocks(&mut self, id: &ItemId) {
        for item in &mut self.items {
            if let Some(members) = item.members_mut() {
                members.retain(|member| member != id);
            }
        }
    }

    fn clear_selection_of(&mut self, index: usize) {
        if self.selected.as_ref() == Some(&self.items[index].id) {
            self.selected = None;
        }
    }
}
