// Settings module
// Grid geometry and layout tuning, persisted as TOML

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Validation failures for [`GridSettings`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("day start ({start}) must be before day end ({end})")]
    EmptyDay { start: i64, end: i64 },
    #[error("slot interval must be positive, got {0}")]
    SlotInterval(i64),
    #[error("pixels per slot must be a positive number, got {0}")]
    PixelsPerSlot(f32),
    #[error("minimum duration must be positive, got {0}")]
    MinDuration(i64),
    #[error("default duration ({default}) is shorter than the minimum duration ({min})")]
    DefaultDuration { default: i64, min: i64 },
    #[error("resize snap must be positive, got {0}")]
    ResizeSnap(i64),
    #[error("drag preview width must be a non-negative number, got {0}")]
    PreviewWidth(f32),
    #[error("column gap must be within [0, 50) percent, got {0}")]
    ColumnGap(f32),
}

/// Time axis and layout configuration. Minutes are minutes from midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub day_start_minute: i64,
    pub day_end_minute: i64,
    pub slot_interval_minutes: i64,
    pub pixels_per_slot: f32,
    /// Duration given to items dropped from the panel
    pub default_duration_minutes: i64,
    pub min_duration_minutes: i64,
    /// Step used when dragging an item's bottom edge
    pub resize_snap_minutes: i64,
    /// Width of the floating preview; its centre picks the target column
    pub drag_preview_width: f32,
    /// Horizontal gap between side-by-side columns, in percent of the lane
    pub column_gap_percent: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            day_start_minute: 480, // 8:00am
            day_end_minute: 1320, // 10:00pm
            slot_interval_minutes: 15,
            pixels_per_slot: 36.0,
            default_duration_minutes: 60,
            min_duration_minutes: 15,
            resize_snap_minutes: 15,
            drag_preview_width: 180.0,
            column_gap_percent: 1.0,
        }
    }
}

impl GridSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.day_start_minute >= self.day_end_minute {
            return Err(SettingsError::EmptyDay {
                start: self.day_start_minute,
                end: self.day_end_minute,
            });
        }
        if self.slot_interval_minutes <= 0 {
            return Err(SettingsError::SlotInterval(self.slot_interval_minutes));
        }
        if !self.pixels_per_slot.is_finite() || self.pixels_per_slot <= 0.0 {
            return Err(SettingsError::PixelsPerSlot(self.pixels_per_slot));
        }
        if self.min_duration_minutes <= 0 {
            return Err(SettingsError::MinDuration(self.min_duration_minutes));
        }
        if self.default_duration_minutes < self.min_duration_minutes {
            return Err(SettingsError::DefaultDuration {
                default: self.default_duration_minutes,
                min: self.min_duration_minutes,
            });
        }
        if self.resize_snap_minutes <= 0 {
            return Err(SettingsError::ResizeSnap(self.resize_snap_minutes));
        }
        if !self.drag_preview_width.is_finite() || self.drag_preview_width < 0.0 {
            return Err(SettingsError::PreviewWidth(self.drag_preview_width));
        }
        if !(0.0..50.0).contains(&self.column_gap_percent) {
            return Err(SettingsError::ColumnGap(self.column_gap_percent));
        }
        Ok(())
    }

    /// Default location: `<config dir>/settings.toml`
    pub fn default_path() -> PathBuf {
        if let Some(dirs) = ProjectDirs::from("com", "VenueScheduler", "Scheduler") {
            dirs.config_dir().join("settings.toml")
        } else {
            log::warn!("Unable to resolve project directory; using current dir for settings");
            PathBuf::from("settings.toml")
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: GridSettings =
            toml::from_str(content).context("failed to parse grid settings")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize grid settings")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("invalid settings in {}", path.display()))
    }

    /// Missing files and broken files both yield defaults; the latter is logged.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No settings at {}; using defaults", path.display());
            return Self::default();
        }

        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Falling back to default grid settings: {err:?}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create dir {}", parent.display()))?;
        }

        fs::write(path, self.to_toml()?)
            .with_context(|| format!("failed to write settings to {}", path.display()))?;
        Ok(())
    }
}
