// Item module
// Schedulable events and blocks, their placement on the grid and block membership

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Opaque identifier for an event or block
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A venue column on the grid, referenced by name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
}

impl Venue {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Longest span the engine will create or keep
pub const MAX_SPAN_MINUTES: i64 = 24 * 60;

/// Half-open time range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeSpan {
    /// Create a span, rejecting empty or inverted ranges
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, String> {
        if end <= start {
            return Err("Span end must be after start".to_string());
        }
        Ok(Self { start, end })
    }

    /// Span starting `minute_of_day` minutes after midnight on `day`. The
    /// start stays within `day` and the length within `1..=MAX_SPAN_MINUTES`.
    pub fn on_day(day: NaiveDate, minute_of_day: i64, duration_minutes: i64) -> Self {
        let minute_of_day = minute_of_day.clamp(0, MAX_SPAN_MINUTES - 1);
        let start = day.and_time(NaiveTime::MIN) + Duration::minutes(minute_of_day);
        let length = Duration::minutes(duration_minutes.clamp(1, MAX_SPAN_MINUTES));
        Self {
            start,
            end: start
                .checked_add_signed(length)
                .unwrap_or(NaiveDateTime::MAX),
        }
    }

    /// Same start, ending `minutes` later; `None` outside chrono's range
    pub fn with_length(&self, minutes: i64) -> Option<Self> {
        let end = self.start.checked_add_signed(Duration::try_minutes(minutes)?)?;
        Some(Self {
            start: self.start,
            end,
        })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Calendar day the span starts on; buckets are keyed by this
    pub fn day(&self) -> NaiveDate {
        self.start.date()
    }

    /// Minutes from midnight of the start day to the start instant
    pub fn start_minute_of_day(&self) -> i64 {
        i64::from(self.start.time().num_seconds_from_midnight()) / 60
    }

    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &TimeSpan) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Both ends moved by `delta`; `None` if either leaves chrono's range
    pub fn shifted(&self, delta: Duration) -> Option<Self> {
        Some(Self {
            start: self.start.checked_add_signed(delta)?,
            end: self.end.checked_add_signed(delta)?,
        })
    }
}

/// Event or block discriminator carried by drag payloads and catalog entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKindTag {
    Event,
    Block,
}

/// Kind-specific payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Event,
    /// Ordered, duplicate-free member event ids
    Block { members: Vec<ItemId> },
}

impl ItemKind {
    pub fn tag(&self) -> ItemKindTag {
        match self {
            ItemKind::Event => ItemKindTag::Event,
            ItemKind::Block { .. } => ItemKindTag::Block,
        }
    }
}

/// Lifecycle state label; exactly one holds for every item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    Available,
    Infinite,
    Scheduled,
    InBlock,
}

impl ItemState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemState::Available => "available",
            ItemState::Infinite => "infinite",
            ItemState::Scheduled => "scheduled",
            ItemState::InBlock => "in_block",
        }
    }

    /// Whether items in this state are listed in the pick panel
    pub fn is_in_panel(&self) -> bool {
        matches!(self, ItemState::Available | ItemState::Infinite)
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an item currently lives. The state label is derived from this, so
/// the venue/time/container fields can only exist in the states that own them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Available,
    Infinite,
    Scheduled { venue: Venue, span: TimeSpan },
    InBlock { block_id: ItemId, span: TimeSpan },
}

impl Placement {
    pub fn state(&self) -> ItemState {
        match self {
            Placement::Available => ItemState::Available,
            Placement::Infinite => ItemState::Infinite,
            Placement::Scheduled { .. } => ItemState::Scheduled,
            Placement::InBlock { .. } => ItemState::InBlock,
        }
    }

    pub fn span(&self) -> Option<&TimeSpan> {
        match self {
            Placement::Scheduled { span, .. } | Placement::InBlock { span, .. } => Some(span),
            Placement::Available | Placement::Infinite => None,
        }
    }
}

/// An event or block that can be placed on the schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleItem {
    pub id: ItemId,
    pub name: String,
    pub color: Option<String>,
    pub(crate) kind: ItemKind,
    pub(crate) placement: Placement,
}

impl ScheduleItem {
    /// New unplaced event
    ///
    /// # Examples
    /// ```
    /// use venue_scheduler::models::item::{ItemState, ScheduleItem};
    ///
    /// let event = ScheduleItem::event("e1", "Novice Latin");
    /// assert_eq!(event.state(), ItemState::Available);
    /// assert!(event.venue().is_none());
    /// ```
    pub fn event(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            color: None,
            kind: ItemKind::Event,
            placement: Placement::Available,
        }
    }

    /// New unplaced block with no members
    pub fn block(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            color: None,
            kind: ItemKind::Block {
                members: Vec::new(),
            },
            placement: Placement::Available,
        }
    }

    /// Turn a freshly built item into a reusable template
    pub fn into_template(mut self) -> Self {
        self.placement = Placement::Infinite;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    pub fn kind_tag(&self) -> ItemKindTag {
        self.kind.tag()
    }

    pub fn is_block(&self) -> bool {
        matches!(self.kind, ItemKind::Block { .. })
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn state(&self) -> ItemState {
        self.placement.state()
    }

    pub fn span(&self) -> Option<&TimeSpan> {
        self.placement.span()
    }

    pub fn start_at(&self) -> Option<NaiveDateTime> {
        self.span().map(|span| span.start)
    }

    pub fn end_at(&self) -> Option<NaiveDateTime> {
        self.span().map(|span| span.end)
    }

    pub fn duration(&self) -> Option<Duration> {
        self.span().map(TimeSpan::duration)
    }

    /// Venue, only while scheduled directly on the grid
    pub fn venue(&self) -> Option<&Venue> {
        match &self.placement {
            Placement::Scheduled { venue, .. } => Some(venue),
            _ => None,
        }
    }

    /// Owning block, only while nested
    pub fn container_block_id(&self) -> Option<&ItemId> {
        match &self.placement {
            Placement::InBlock { block_id, .. } => Some(block_id),
            _ => None,
        }
    }

    /// Member event ids; empty for events
    pub fn member_event_ids(&self) -> &[ItemId] {
        match &self.kind {
            ItemKind::Block { members } => members,
            ItemKind::Event => &[],
        }
    }

    pub(crate) fn members_mut(&mut self) -> Option<&mut Vec<ItemId>> {
        match &mut self.kind {
            ItemKind::Block { members } => Some(members),
            ItemKind::Event => None,
        }
    }

    /// Validate the item for seeding into a store
    pub fn validate(&self) -> Result<(), String> {
        if self.id.as_str().trim().is_empty() {
            return Err("Item id cannot be empty".to_string());
        }

        if self.name.trim().is_empty() {
            return Err("Item name cannot be empty".to_string());
        }

        if let Some(ref color) = self.color {
            if !color.starts_with('#') || (color.len() != 7 && color.len() != 4 && color.len() != 9)
            {
                return Err("Color must be in hex format (#RRGGBB, #RGB or #RRGGBBAA)".to_string());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 9).unwrap()
    }

    #[test]
    fn test_new_event_is_available() {
        let event = ScheduleItem::event("1", "Pre Champ Latin");
        assert_eq!(event.state(), ItemState::Available);
        assert_eq!(event.kind_tag(), ItemKindTag::Event);
        assert!(event.start_at().is_none());
        assert!(event.end_at().is_none());
        assert!(event.venue().is_none());
        assert!(event.container_block_id().is_none());
        assert!(event.member_event_ids().is_empty());
    }

    #[test]
    fn test_template_state() {
        let template = ScheduleItem::event("t", "Break").into_template();
        assert_eq!(template.state(), ItemState::Infinite);
        assert!(template.state().is_in_panel());
    }

    #[test]
    fn test_block_has_empty_members() {
        let block = ScheduleItem::block("b1", "Latin Block");
        assert!(block.is_block());
        assert!(block.member_event_ids().is_empty());
    }

    #[test]
    fn test_span_rejects_inverted_range() {
        let start = day().and_hms_opt(10, 0, 0).unwrap();
        assert!(TimeSpan::new(start, start).is_err());
        assert!(TimeSpan::new(start, start - Duration::minutes(5)).is_err());
        assert!(TimeSpan::new(start, start + Duration::minutes(5)).is_ok());
    }

    #[test]
    fn test_span_on_day() {
        let span = TimeSpan::on_day(day(), 600, 60);
        assert_eq!(span.start, day().and_hms_opt(10, 0, 0).unwrap());
        assert_eq!(span.end, day().and_hms_opt(11, 0, 0).unwrap());
        assert_eq!(span.start_minute_of_day(), 600);
        assert_eq!(span.duration_minutes(), 60);
        assert_eq!(span.day(), day());
    }

    #[test]
    fn test_span_on_day_clamps_out_of_range_input() {
        let span = TimeSpan::on_day(day(), -90, i64::MAX);
        assert_eq!(span.start, day().and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(span.duration_minutes(), MAX_SPAN_MINUTES);

        let last = TimeSpan::on_day(NaiveDate::MAX, 1439, 60);
        assert_eq!(last.end, NaiveDateTime::MAX);
        assert!(last.end > last.start);
    }

    #[test]
    fn test_span_arithmetic_stays_in_range() {
        let span = TimeSpan::on_day(day(), 600, 60);
        assert_eq!(span.with_length(90).unwrap().duration_minutes(), 90);
        assert!(span.with_length(i64::MAX).is_none());
        assert_eq!(
            span.shifted(Duration::minutes(30)).unwrap(),
            TimeSpan::on_day(day(), 630, 60)
        );
        assert!(span.shifted(NaiveDateTime::MAX - span.start).is_none());
    }

    #[test]
    fn test_touching_spans_do_not_overlap() {
        let a = TimeSpan::on_day(day(), 600, 60);
        let b = TimeSpan::on_day(day(), 660, 60);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_overlapping_spans() {
        let a = TimeSpan::on_day(day(), 600, 60);
        let b = TimeSpan::on_day(day(), 630, 60);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_validate_rejects_bad_color() {
        let item = ScheduleItem::event("1", "Waltz").with_color("purple");
        assert!(item.validate().unwrap_err().contains("hex format"));

        let item = ScheduleItem::event("1", "Waltz").with_color("#4f165d");
        assert!(item.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let item = ScheduleItem::event("1", "   ");
        assert_eq!(item.validate().unwrap_err(), "Item name cannot be empty");
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(ItemState::InBlock.to_string(), "in_block");
        assert_eq!(ItemState::Scheduled.as_str(), "scheduled");
    }
}
