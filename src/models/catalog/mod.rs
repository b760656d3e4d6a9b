// Catalog module
// Seed entries for the pick panel and the providers that supply them

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::item::{ItemKindTag, ScheduleItem};

/// Catalog record describing one pick-panel entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub kind: ItemKindTag,
    #[serde(default)]
    pub color: Option<String>,
    /// Templates stay in the panel and spawn a copy on every drop
    #[serde(default)]
    pub infinite: bool,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ItemKindTag) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            color: None,
            infinite: false,
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn infinite(mut self, infinite: bool) -> Self {
        self.infinite = infinite;
        self
    }

    /// Build the unplaced item this entry seeds
    pub fn to_item(&self) -> Result<ScheduleItem, String> {
        let mut item = match self.kind {
            ItemKindTag::Event => ScheduleItem::event(self.id.clone(), self.name.clone()),
            ItemKindTag::Block => ScheduleItem::block(self.id.clone(), self.name.clone()),
        };
        if let Some(ref color) = self.color {
            item = item.with_color(color.clone());
        }
        if self.infinite {
            item = item.into_template();
        }
        item.validate()?;
        Ok(item)
    }
}

/// Supplies the initial list of `available`/`infinite` items
pub trait CatalogProvider {
    fn entries(&self) -> Result<Vec<CatalogEntry>>;
}

/// Catalog stored as a JSON array of entries
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, entries: &[CatalogEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create dir {}", parent.display()))?;
        }

        let data = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write catalog to {}", self.path.display()))?;
        Ok(())
    }
}

impl CatalogProvider for JsonCatalog {
    fn entries(&self) -> Result<Vec<CatalogEntry>> {
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read catalog from {}", self.path.display()))?;
        let entries: Vec<CatalogEntry> = serde_json::from_str(&data).with_context(|| {
            format!("failed to deserialize catalog from {}", self.path.display())
        })?;
        log::info!(
            "Loaded {} catalog entries from {}",
            entries.len(),
            self.path.display()
        );
        Ok(entries)
    }
}

/// Built-in demo competition: Latin and Standard events, a couple of blocks
/// and two reusable templates.
pub struct DemoCatalog;

const DEMO_EVENT_COLOR: &str = "#4f165d";
const DEMO_BLOCK_COLOR: &str = "#1d4ed8";

impl CatalogProvider for DemoCatalog {
    fn entries(&self) -> Result<Vec<CatalogEntry>> {
        let events = [
            ("1", "Pre Champ Latin"),
            ("2", "Amateur Latin"),
            ("3", "Novice Latin"),
            ("4", "Class 485"),
            ("5", "Class 385"),
            ("6", "Pre Champ Standard"),
            ("7", "Amateur Standard"),
            ("8", "Novice Standard"),
        ];

        let mut entries: Vec<CatalogEntry> = events
            .iter()
            .map(|(id, name)| {
                CatalogEntry::new(*id, *name, ItemKindTag::Event).color(DEMO_EVENT_COLOR)
            })
            .collect();

        entries.push(
            CatalogEntry::new("block-1", "Latin Block", ItemKindTag::Block)
                .color(DEMO_BLOCK_COLOR),
        );
        entries.push(
            CatalogEntry::new("block-2", "Standard Block", ItemKindTag::Block)
                .color(DEMO_BLOCK_COLOR),
        );
        entries.push(
            CatalogEntry::new("break", "Break", ItemKindTag::Event)
                .color("#6b7280")
                .infinite(true),
        );
        entries.push(
            CatalogEntry::new("session", "Session", ItemKindTag::Block)
                .color("#0f766e")
                .infinite(true),
        );

        Ok(entries)
    }
}
