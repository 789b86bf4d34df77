use std::path::PathBuf;
use std::sync::Arc;

use super::decode::{DecodeError, ImageSource};
use super::RequestGeneration;
use crate::classifier::{AnalysisError, ImagePayload};
use crate::scan::{AnalysisResult, ScanId, ScanImage};

/// Inputs to [`super::SessionState::reduce`].
#[derive(Debug)]
pub enum SessionEvent {
    /// The user picked or dropped an image.
    FileSelected { source: ImageSource },
    ImageDecoded {
        generation: RequestGeneration,
        image: ScanImage,
    },
    DecodeFailed {
        generation: RequestGeneration,
        error: DecodeError,
    },
    AnalysisSucceeded {
        generation: RequestGeneration,
        result: AnalysisResult,
        /// Completion time in Unix epoch milliseconds.
        completed_at_ms: i64,
    },
    AnalysisFailed {
        generation: RequestGeneration,
        error: AnalysisError,
    },
    /// Restore a past scan without contacting the classifier.
    HistorySelected { id: ScanId },
    HistoryCleared,
}

impl SessionEvent {
    /// Convenience for selecting a file on disk.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::FileSelected {
            source: ImageSource::Path(path.into()),
        }
    }
}

/// Work the caller must perform after a transition.
#[derive(Debug, Clone)]
pub enum SessionEffect {
    /// Read and decode the source, then report `ImageDecoded` or `DecodeFailed`.
    Decode {
        generation: RequestGeneration,
        source: ImageSource,
    },
    /// Classify the payload, then report `AnalysisSucceeded` or `AnalysisFailed`.
    Analyze {
        generation: RequestGeneration,
        payload: Arc<ImagePayload>,
    },
}
