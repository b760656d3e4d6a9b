//! Advisory checks on a proposed time span.
//!
//! Errors mark spans the grid cannot show; warnings flag spans that are
//! legal but unusual. Nothing here blocks a transition; callers decide what
//! to do with the report.

use chrono::Duration;

use crate::models::item::TimeSpan;
use crate::models::settings::GridSettings;

/// Spans longer than this are flagged
pub const LONG_SPAN_MINUTES: i64 = 240;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

pub fn validate_span(settings: &GridSettings, span: &TimeSpan) -> ValidationReport {
    let mut report = ValidationReport::default();

    let start = span.start_minute_of_day();
    let end = start + span.duration_minutes();
    let duration = span.duration_minutes();

    if start < settings.day_start_minute {
        report.errors.push(format!(
            "Starts before the day opens at {}",
            crate::utils::time_format::format_time(settings.day_start_minute)
        ));
    }
    if start >= settings.day_end_minute {
        report.errors.push(format!(
            "Starts after the day closes at {}",
            crate::utils::time_format::format_time(settings.day_end_minute)
        ));
    } else if end > settings.day_end_minute {
        report.errors.push(format!(
            "Ends after the day closes at {}",
            crate::utils::time_format::format_time(settings.day_end_minute)
        ));
    }
    if duration < settings.min_duration_minutes {
        report.errors.push(format!(
            "Shorter than the minimum of {}",
            crate::utils::time_format::format_duration(settings.min_duration_minutes)
        ));
    }

    if span.duration() > Duration::minutes(LONG_SPAN_MINUTES) {
        report.warnings.push(format!(
            "Runs for {}",
            crate::utils::time_format::format_duration(duration)
        ));
    }
    if start >= settings.day_start_minute && start < settings.day_start_minute + 60 {
        report
            .warnings
            .push("Starts within the first hour of the day".to_string());
    }
    if end <= settings.day_end_minute && end > settings.day_end_minute - 60 {
        report
            .warnings
            .push("Ends within the last hour of the day".to_string());
    }

    report
}
