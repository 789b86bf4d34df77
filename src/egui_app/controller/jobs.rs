use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{
    Arc,
    mpsc::{Receiver, Sender, TryRecvError},
};
use std::thread;

use time::OffsetDateTime;

use crate::classifier::{AnalysisError, AnalysisFailure, Classifier, ImagePayload};
use crate::scan::{AnalysisResult, ScanImage};
use crate::session::{
    DecodeError, ImageSource, RequestGeneration, SessionEvent, decode_source,
};

/// Results posted by worker threads back to the UI thread.
#[derive(Debug)]
pub(crate) enum JobMessage {
    ImageDecoded {
        generation: RequestGeneration,
        result: Result<ScanImage, DecodeError>,
    },
    AnalysisFinished {
        generation: RequestGeneration,
        result: Result<AnalysisResult, AnalysisError>,
        completed_at_ms: i64,
    },
}

impl JobMessage {
    pub(crate) fn into_event(self) -> SessionEvent {
        match self {
            Self::ImageDecoded {
                generation,
                result: Ok(image),
            } => SessionEvent::ImageDecoded { generation, image },
            Self::ImageDecoded {
                generation,
                result: Err(error),
            } => SessionEvent::DecodeFailed { generation, error },
            Self::AnalysisFinished {
                generation,
                result: Ok(result),
                completed_at_ms,
            } => SessionEvent::AnalysisSucceeded {
                generation,
                result,
                completed_at_ms,
            },
            Self::AnalysisFinished {
                generation,
                result: Err(error),
                ..
            } => SessionEvent::AnalysisFailed { generation, error },
        }
    }
}

/// Worker bookkeeping: one channel shared by every background job.
pub(crate) struct ControllerJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    pending: usize,
    repaint: Option<egui::Context>,
}

impl ControllerJobs {
    pub(super) fn new() -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel();
        Self {
            message_tx,
            message_rx,
            pending: 0,
            repaint: None,
        }
    }

    pub(super) fn set_repaint_context(&mut self, ctx: egui::Context) {
        self.repaint = Some(ctx);
    }

    /// Jobs spawned whose message has not been received yet, stale ones included.
    pub(super) fn pending(&self) -> usize {
        self.pending
    }

    pub(super) fn try_recv_message(&mut self) -> Result<JobMessage, TryRecvError> {
        let message = self.message_rx.try_recv()?;
        self.pending = self.pending.saturating_sub(1);
        Ok(message)
    }

    pub(super) fn spawn_decode(&mut self, generation: RequestGeneration, source: ImageSource) {
        let tx = self.message_tx.clone();
        let repaint = self.repaint.clone();
        self.pending += 1;
        thread::spawn(move || {
            let result = catch_unwind(AssertUnwindSafe(|| decode_source(&source)))
                .unwrap_or_else(|payload| {
                    let message = panic_to_string(payload);
                    tracing::error!(%generation, "Decode worker panicked: {message}");
                    Err(DecodeError::WorkerPanicked(message))
                });
            tracing::debug!(%generation, ok = result.is_ok(), "Decode job finished");
            let _ = tx.send(JobMessage::ImageDecoded { generation, result });
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }

    pub(super) fn spawn_analysis(
        &mut self,
        generation: RequestGeneration,
        payload: Arc<ImagePayload>,
        classifier: Arc<dyn Classifier>,
    ) {
        let tx = self.message_tx.clone();
        let repaint = self.repaint.clone();
        self.pending += 1;
        thread::spawn(move || {
            let result = catch_unwind(AssertUnwindSafe(|| classifier.analyze(&payload)))
                .unwrap_or_else(|cause| {
                    let message = panic_to_string(cause);
                    tracing::error!(%generation, "Analysis worker panicked: {message}");
                    Err(AnalysisFailure::Response(format!("worker panicked: {message}")).into())
                });
            tracing::debug!(%generation, ok = result.is_ok(), "Analysis job finished");
            let _ = tx.send(JobMessage::AnalysisFinished {
                generation,
                result,
                completed_at_ms: now_epoch_ms(),
            });
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }
}

fn panic_to_string(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn now_epoch_ms() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    i64::try_from(nanos / 1_000_000).unwrap_or(i64::MAX)
}
