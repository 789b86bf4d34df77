//! Upload → analyze → display lifecycle for a single scan session.
//!
//! [`SessionState::reduce`] is the only way to change the state. It performs
//! no I/O; instead it returns a [`SessionEffect`] that the caller runs,
//! feeding the outcome back in as another [`SessionEvent`].
//!
//! Every file selection starts a new [`RequestGeneration`]. Completions carry
//! the generation they were issued for and are dropped when a newer one has
//! started, so a slow response can never overwrite a newer scan.

mod decode;
mod events;

pub use decode::{
    DecodeError, IMAGE_EXTENSIONS, ImageSource, PREVIEW_MAX_EDGE, decode_image_bytes,
    decode_source,
};
pub use events::{SessionEffect, SessionEvent};

use std::fmt;

use crate::scan::{AnalysisResult, ScanHistory, ScanHistoryItem, ScanImage};

/// Error shown when a selected file is not a readable image.
pub const DECODE_FAILED_MESSAGE: &str = "The selected file could not be read as an image.";

/// Where the session is in the scan lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScanPhase {
    #[default]
    Idle,
    AwaitingImageDecode,
    Analyzing,
    ResultReady,
    Failed,
}

/// Monotonic token identifying the most recent request sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestGeneration(u64);

impl RequestGeneration {
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for RequestGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// All in-memory state of the scan workflow.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    phase: ScanPhase,
    selected_image: Option<ScanImage>,
    result: Option<AnalysisResult>,
    history: ScanHistory,
    error: Option<String>,
    generation: RequestGeneration,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    pub fn selected_image(&self) -> Option<&ScanImage> {
        self.selected_image.as_ref()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn history(&self) -> &ScanHistory {
        &self.history
    }

    /// User-facing error from the latest request, if it failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn generation(&self) -> RequestGeneration {
        self.generation
    }

    /// True exactly while the latest request waits on the classifier.
    pub fn is_analyzing(&self) -> bool {
        self.phase == ScanPhase::Analyzing
    }

    /// True while any step of the latest request is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, ScanPhase::AwaitingImageDecode | ScanPhase::Analyzing)
    }

    /// The dashboard is shown only when both halves are present.
    pub fn dashboard(&self) -> Option<(&ScanImage, &AnalysisResult)> {
        self.selected_image.as_ref().zip(self.result.as_ref())
    }

    /// Apply one event and return the follow-up work, if any.
    pub fn reduce(&mut self, event: SessionEvent) -> Option<SessionEffect> {
        match event {
            SessionEvent::FileSelected { source } => {
                self.generation = self.generation.next();
                self.error = None;
                self.result = None;
                self.phase = ScanPhase::AwaitingImageDecode;
                tracing::info!(
                    generation = %self.generation,
                    "Selected {}",
                    source.display_name()
                );
                Some(SessionEffect::Decode {
                    generation: self.generation,
                    source,
                })
            }
            SessionEvent::ImageDecoded { generation, image } => {
                if !self.is_current(generation, "decoded image") {
                    return None;
                }
                let payload = image.payload();
                self.selected_image = Some(image);
                self.phase = ScanPhase::Analyzing;
                Some(SessionEffect::Analyze {
                    generation,
                    payload,
                })
            }
            SessionEvent::DecodeFailed { generation, error } => {
                if !self.is_current(generation, "decode failure") {
                    return None;
                }
                tracing::warn!("Image decode failed: {error}");
                self.fail(DECODE_FAILED_MESSAGE.to_string());
                None
            }
            SessionEvent::AnalysisSucceeded {
                generation,
                result,
                completed_at_ms,
            } => {
                if !self.is_current(generation, "analysis result") {
                    return None;
                }
                // A current-generation result always follows ImageDecoded.
                let Some(image) = self.selected_image.clone() else {
                    tracing::error!(%generation, "Analysis finished without a selected image");
                    return None;
                };
                let evicted = self
                    .history
                    .push_front(ScanHistoryItem::new(image, result.clone(), completed_at_ms));
                if evicted > 0 {
                    tracing::debug!(evicted, "Trimmed scan history");
                }
                self.result = Some(result);
                self.error = None;
                self.phase = ScanPhase::ResultReady;
                None
            }
            SessionEvent::AnalysisFailed { generation, error } => {
                if !self.is_current(generation, "analysis failure") {
                    return None;
                }
                self.fail(error.to_string());
                None
            }
            SessionEvent::HistorySelected { id } => {
                let Some(item) = self.history.get(id) else {
                    tracing::debug!(%id, "Ignoring selection of unknown history entry");
                    return None;
                };
                let (image, result) = (item.image.clone(), item.result.clone());
                // Outstanding work belongs to a view the user just left.
                self.generation = self.generation.next();
                self.selected_image = Some(image);
                self.result = Some(result);
                self.error = None;
                self.phase = ScanPhase::ResultReady;
                None
            }
            SessionEvent::HistoryCleared => {
                let removed = self.history.clear();
                tracing::info!(removed, "Cleared scan history");
                None
            }
        }
    }

    fn is_current(&self, generation: RequestGeneration, what: &str) -> bool {
        if generation == self.generation {
            return true;
        }
        tracing::debug!(
            %generation,
            current = %self.generation,
            "Discarding stale {what}"
        );
        false
    }

    fn fail(&mut self, message: String) {
        self.result = None;
        self.error = Some(message);
        self.phase = ScanPhase::Failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ANALYSIS_FAILED_MESSAGE, AnalysisError, AnalysisFailure, ImagePayload};
    use crate::scan::{DisasterCategory, HISTORY_LIMIT, PreviewImage};

    fn image(name: &str) -> ScanImage {
        let payload = ImagePayload::from_bytes(&[1, 2, 3], "image/png").unwrap();
        let preview = PreviewImage {
            width: 1,
            height: 1,
            rgba: vec![0; 4],
        };
        ScanImage::new(name, payload, preview)
    }

    fn result(category: DisasterCategory, confidence: f64) -> AnalysisResult {
        AnalysisResult::new(category, confidence, "why", vec!["smoke plume".into()], "act").unwrap()
    }

    fn transport_error() -> AnalysisError {
        AnalysisError::from(AnalysisFailure::Transport("connection reset".into()))
    }

    /// Select a file and return the generation of the new request.
    fn select(state: &mut SessionState, name: &str) -> RequestGeneration {
        match state.reduce(SessionEvent::file(name)) {
            Some(SessionEffect::Decode { generation, .. }) => generation,
            other => panic!("expected decode effect, got {other:?}"),
        }
    }

    fn decode(state: &mut SessionState, generation: RequestGeneration, name: &str) {
        let effect = state.reduce(SessionEvent::ImageDecoded {
            generation,
            image: image(name),
        });
        assert!(matches!(effect, Some(SessionEffect::Analyze { .. })));
    }

    fn complete(state: &mut SessionState, generation: RequestGeneration, at: i64) {
        state.reduce(SessionEvent::AnalysisSucceeded {
            generation,
            result: result(DisasterCategory::ForestFire, 0.92),
            completed_at_ms: at,
        });
    }

    fn full_scan(state: &mut SessionState, name: &str, at: i64) {
        let generation = select(state, name);
        decode(state, generation, name);
        complete(state, generation, at);
    }

    #[test]
    fn starts_idle_and_empty() {
        let state = SessionState::new();
        assert_eq!(state.phase(), ScanPhase::Idle);
        assert!(state.selected_image().is_none());
        assert!(state.result().is_none());
        assert!(state.error().is_none());
        assert!(state.history().is_empty());
        assert!(!state.is_analyzing());
    }

    #[test]
    fn successful_scan_walks_every_phase() {
        let mut state = SessionState::new();
        let generation = select(&mut state, "fire.png");
        assert_eq!(state.phase(), ScanPhase::AwaitingImageDecode);
        assert!(state.is_busy());
        assert!(!state.is_analyzing());

        decode(&mut state, generation, "fire.png");
        assert_eq!(state.phase(), ScanPhase::Analyzing);
        assert!(state.is_analyzing());
        assert_eq!(state.selected_image().map(|i| i.name()), Some("fire.png"));

        complete(&mut state, generation, 42);
        assert_eq!(state.phase(), ScanPhase::ResultReady);
        assert!(!state.is_analyzing());
        assert_eq!(state.result().map(|r| r.category()), Some(DisasterCategory::ForestFire));
        let latest = state.history().latest().unwrap();
        assert_eq!(latest.timestamp_ms, 42);
        assert_eq!(latest.result.category(), DisasterCategory::ForestFire);
        assert!(state.dashboard().is_some());
    }

    #[test]
    fn analyze_effect_carries_decoded_payload() {
        let mut state = SessionState::new();
        let generation = select(&mut state, "a.png");
        let effect = state.reduce(SessionEvent::ImageDecoded {
            generation,
            image: image("a.png"),
        });
        let Some(SessionEffect::Analyze { payload, generation: issued }) = effect else {
            panic!("expected analyze effect");
        };
        assert_eq!(issued, generation);
        assert_eq!(payload.mime_type(), "image/png");
    }

    #[test]
    fn transport_failure_sets_fixed_message_and_keeps_history() {
        let mut state = SessionState::new();
        full_scan(&mut state, "first.png", 1);
        let generation = select(&mut state, "second.png");
        decode(&mut state, generation, "second.png");
        state.reduce(SessionEvent::AnalysisFailed {
            generation,
            error: transport_error(),
        });
        assert_eq!(state.phase(), ScanPhase::Failed);
        assert_eq!(state.error(), Some(ANALYSIS_FAILED_MESSAGE));
        assert!(state.result().is_none());
        assert_eq!(state.history().len(), 1);
        assert!(state.dashboard().is_none());
    }

    #[test]
    fn decode_failure_reports_decode_message() {
        let mut state = SessionState::new();
        let generation = select(&mut state, "notes.txt");
        state.reduce(SessionEvent::DecodeFailed {
            generation,
            error: crate::session::DecodeError::UnknownFormat,
        });
        assert_eq!(state.phase(), ScanPhase::Failed);
        assert_eq!(state.error(), Some(DECODE_FAILED_MESSAGE));
    }

    #[test]
    fn new_selection_clears_error_and_result_immediately() {
        let mut state = SessionState::new();
        let generation = select(&mut state, "a.png");
        decode(&mut state, generation, "a.png");
        state.reduce(SessionEvent::AnalysisFailed {
            generation,
            error: transport_error(),
        });
        assert!(state.error().is_some());

        let next = select(&mut state, "b.png");
        assert!(state.error().is_none());
        assert!(state.result().is_none());
        decode(&mut state, next, "b.png");
        assert!(state.is_analyzing());
        assert!(state.error().is_none());
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut state = SessionState::new();
        let first = select(&mut state, "slow.png");
        decode(&mut state, first, "slow.png");
        let second = select(&mut state, "fast.png");
        decode(&mut state, second, "fast.png");

        state.reduce(SessionEvent::AnalysisFailed {
            generation: first,
            error: transport_error(),
        });
        assert!(state.error().is_none());
        assert!(state.is_analyzing());

        complete(&mut state, second, 5);
        complete(&mut state, first, 6);
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.history().latest().map(|i| i.timestamp_ms), Some(5));
        assert_eq!(state.selected_image().map(|i| i.name()), Some("fast.png"));
    }

    #[test]
    fn stale_decode_does_not_issue_analysis() {
        let mut state = SessionState::new();
        let first = select(&mut state, "old.png");
        let _second = select(&mut state, "new.png");
        let effect = state.reduce(SessionEvent::ImageDecoded {
            generation: first,
            image: image("old.png"),
        });
        assert!(effect.is_none());
        assert_eq!(state.phase(), ScanPhase::AwaitingImageDecode);
        assert!(state.selected_image().is_none());
    }

    #[test]
    fn history_is_capped_and_newest_first() {
        let mut state = SessionState::new();
        for at in 0..11 {
            full_scan(&mut state, &format!("scan-{at}.png"), at);
        }
        assert_eq!(state.history().len(), HISTORY_LIMIT);
        let stamps: Vec<i64> = state.history().iter().map(|i| i.timestamp_ms).collect();
        assert_eq!(stamps, (1..11).rev().collect::<Vec<_>>());
    }

    #[test]
    fn history_selection_restores_without_effect_or_reordering() {
        let mut state = SessionState::new();
        full_scan(&mut state, "a.png", 1);
        full_scan(&mut state, "b.png", 2);
        let order_before: Vec<_> = state.history().iter().map(|i| i.id).collect();
        let older = state.history().as_slice()[1].clone();

        let effect = state.reduce(SessionEvent::HistorySelected { id: older.id });
        assert!(effect.is_none());
        assert_eq!(state.phase(), ScanPhase::ResultReady);
        assert_eq!(state.selected_image(), Some(&older.image));
        assert_eq!(state.result(), Some(&older.result));
        let order_after: Vec<_> = state.history().iter().map(|i| i.id).collect();
        assert_eq!(order_before, order_after);
    }

    #[test]
    fn history_selection_supersedes_in_flight_request() {
        let mut state = SessionState::new();
        full_scan(&mut state, "a.png", 1);
        let id = state.history().latest().unwrap().id;
        let pending = select(&mut state, "b.png");
        decode(&mut state, pending, "b.png");

        state.reduce(SessionEvent::HistorySelected { id });
        complete(&mut state, pending, 2);
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.selected_image().map(|i| i.name()), Some("a.png"));
    }

    #[test]
    fn unknown_history_id_is_ignored() {
        let mut state = SessionState::new();
        full_scan(&mut state, "a.png", 1);
        let before = state.generation();
        state.reduce(SessionEvent::HistorySelected {
            id: crate::scan::ScanId::new(),
        });
        assert_eq!(state.generation(), before);
        assert_eq!(state.selected_image().map(|i| i.name()), Some("a.png"));
    }

    #[test]
    fn clearing_history_keeps_current_view() {
        let mut state = SessionState::new();
        full_scan(&mut state, "a.png", 1);
        full_scan(&mut state, "b.png", 2);
        let image_before = state.selected_image().cloned();
        let result_before = state.result().cloned();

        state.reduce(SessionEvent::HistoryCleared);
        assert!(state.history().is_empty());
        assert_eq!(state.selected_image().cloned(), image_before);
        assert_eq!(state.result().cloned(), result_before);
        assert_eq!(state.phase(), ScanPhase::ResultReady);
    }
}
