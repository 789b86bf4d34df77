//! Helpers to convert session data into display strings and chart values.

use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

use crate::egui_app::state::StatusTone;
use crate::scan::DisasterCategory;
use crate::session::{ScanPhase, SessionState};

const TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Confidence as a percentage with one decimal place, e.g. `92.0%`.
pub fn confidence_percent(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

/// Headline badge for the result dashboard.
pub fn category_badge(category: DisasterCategory) -> &'static str {
    match category {
        DisasterCategory::ForestFire => "Wildfire Detected",
        DisasterCategory::Tsunami => "Tsunami Detected",
        DisasterCategory::Normal => "Normal Patterns",
        DisasterCategory::Unknown => "Scan Required",
    }
}

/// Short tag for history cards, e.g. `FOREST FIRE`.
pub fn history_tag(category: DisasterCategory) -> String {
    category.as_str().replace('_', " ")
}

/// Date and time of a scan in the given offset.
pub fn format_timestamp(timestamp_ms: i64, offset: UtcOffset) -> String {
    let nanos = i128::from(timestamp_ms) * 1_000_000;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|at| at.to_offset(offset).format(TIME_FORMAT).ok())
        .unwrap_or_else(|| "Unknown time".to_string())
}

/// The local UTC offset, or UTC when it cannot be determined.
pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// Two-slice ring chart: the confidence and what remains of the unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfidenceSlices {
    pub confidence: f32,
    pub variance: f32,
}

pub fn confidence_slices(confidence: f64) -> ConfidenceSlices {
    let confidence = confidence.clamp(0.0, 1.0) as f32;
    ConfidenceSlices {
        confidence,
        variance: 1.0 - confidence,
    }
}

/// Status-bar message for the session's current phase.
pub fn session_status(session: &SessionState) -> (String, StatusTone) {
    let image_name = session.selected_image().map(|image| image.name().to_string());
    match session.phase() {
        ScanPhase::Idle => ("Awaiting satellite imagery".into(), StatusTone::Idle),
        ScanPhase::AwaitingImageDecode => ("Loading image...".into(), StatusTone::Busy),
        ScanPhase::Analyzing => (
            format!("Analyzing {}", image_name.unwrap_or_default()),
            StatusTone::Busy,
        ),
        ScanPhase::ResultReady => match session.result() {
            Some(result) => (
                format!(
                    "{}: {} confidence",
                    category_badge(result.category()),
                    confidence_percent(result.confidence())
                ),
                StatusTone::Info,
            ),
            None => ("Ready".into(), StatusTone::Info),
        },
        ScanPhase::Failed => (
            session.error().unwrap_or("Scan failed").to_string(),
            StatusTone::Error,
        ),
    }
}
