//! Bridges the scan session to the egui UI and background workers.

mod jobs;

use std::path::PathBuf;
use std::sync::{Arc, mpsc::TryRecvError};

use rfd::FileDialog;

use crate::classifier::Classifier;
use crate::egui_app::state::{StatusTone, UiState};
use crate::egui_app::view_model;
use crate::scan::ScanId;
use crate::session::{IMAGE_EXTENSIONS, ImageSource, SessionEffect, SessionEvent, SessionState};
use jobs::ControllerJobs;

/// Upper bound on job messages applied per frame.
const MAX_MESSAGES_PER_POLL: usize = 32;

/// Owns the session and runs the effects the reducer asks for.
pub struct EguiController {
    pub ui: UiState,
    session: SessionState,
    classifier: Arc<dyn Classifier>,
    jobs: ControllerJobs,
}

impl EguiController {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            ui: UiState::default(),
            session: SessionState::new(),
            classifier,
            jobs: ControllerJobs::new(),
        }
    }

    /// Read-only view of the scan session.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Let workers wake the UI when they finish.
    pub fn set_repaint_context(&mut self, ctx: egui::Context) {
        self.jobs.set_repaint_context(ctx);
    }

    /// Open the native image picker; cancelling does nothing.
    pub fn select_image_via_dialog(&mut self) {
        let Some(path) = FileDialog::new()
            .set_title("Select satellite imagery")
            .add_filter("Satellite imagery", IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        self.select_image_path(path);
    }

    /// Start a new scan of an image on disk.
    pub fn select_image_path(&mut self, path: PathBuf) {
        self.dispatch(SessionEvent::FileSelected {
            source: ImageSource::Path(path),
        });
    }

    /// Start a new scan of in-memory image bytes, e.g. from a drop.
    pub fn select_image_bytes(&mut self, name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        self.dispatch(SessionEvent::FileSelected {
            source: ImageSource::Bytes {
                name: name.into(),
                bytes: bytes.into(),
            },
        });
    }

    /// Show a past scan without calling the classifier.
    pub fn select_history_item(&mut self, id: ScanId) {
        self.dispatch(SessionEvent::HistorySelected { id });
    }

    pub fn clear_history(&mut self) {
        self.dispatch(SessionEvent::HistoryCleared);
    }

    /// Apply finished worker results. Returns true when anything changed.
    pub fn poll_background_jobs(&mut self) -> bool {
        let mut applied = false;
        for _ in 0..MAX_MESSAGES_PER_POLL {
            match self.jobs.try_recv_message() {
                Ok(message) => {
                    self.dispatch(message.into_event());
                    applied = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::error!("Background job channel disconnected");
                    break;
                }
            }
        }
        applied
    }

    /// True while any worker, current or superseded, is still running.
    pub fn has_pending_jobs(&self) -> bool {
        self.jobs.pending() > 0
    }

    /// Show a warning until the next session change replaces it.
    pub fn report_warning(&mut self, text: impl Into<String>) {
        self.set_status(text, StatusTone::Warning);
    }

    fn dispatch(&mut self, event: SessionEvent) {
        if let Some(effect) = self.session.reduce(event) {
            self.run_effect(effect);
        }
        self.refresh_status();
    }

    fn run_effect(&mut self, effect: SessionEffect) {
        match effect {
            SessionEffect::Decode { generation, source } => {
                self.jobs.spawn_decode(generation, source);
            }
            SessionEffect::Analyze {
                generation,
                payload,
            } => {
                tracing::info!(%generation, "Submitting image for analysis");
                self.jobs
                    .spawn_analysis(generation, payload, Arc::clone(&self.classifier));
            }
        }
    }

    fn refresh_status(&mut self) {
        let (text, tone) = view_model::session_status(&self.session);
        self.set_status(text, tone);
    }

    fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.ui.status.set(text, tone);
    }
}
