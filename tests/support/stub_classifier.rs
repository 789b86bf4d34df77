use std::{
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::Duration,
};

use orbitaleye::classifier::{AnalysisError, AnalysisFailure, Classifier, ImagePayload};
use orbitaleye::scan::{AnalysisResult, DisasterCategory};

/// Canned classifier outcome.
#[derive(Clone, Debug)]
pub enum Outcome {
    Classify(DisasterCategory, f64),
    TransportError,
    Panic,
}

/// In-process classifier that counts calls and replays scripted outcomes.
pub struct StubClassifier {
    calls: AtomicUsize,
    outcome: Mutex<Outcome>,
    /// Payload that should respond slowly, with its own outcome.
    slow: Option<(String, Duration, Outcome)>,
}

impl StubClassifier {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            outcome: Mutex::new(outcome),
            slow: None,
        }
    }

    pub fn with_slow_payload(mut self, payload: &ImagePayload, delay: Duration, outcome: Outcome) -> Self {
        self.slow = Some((payload.base64_data().to_string(), delay, outcome));
        self
    }

    pub fn set_outcome(&self, outcome: Outcome) {
        *self.outcome.lock().expect("outcome lock") = outcome;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for StubClassifier {
    fn analyze(&self, image: &ImagePayload) -> Result<AnalysisResult, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = match &self.slow {
            Some((data, delay, outcome)) if data == image.base64_data() => {
                thread::sleep(*delay);
                outcome.clone()
            }
            _ => self.outcome.lock().expect("outcome lock").clone(),
        };
        match outcome {
            Outcome::Classify(category, confidence) => Ok(AnalysisResult::new(
                category,
                confidence,
                "Thermal anomalies with a smoke plume drifting east.",
                vec!["smoke plume".into(), "burn scar".into()],
                "Alert regional fire services.",
            )
            .expect("stub confidence in range")),
            Outcome::TransportError => {
                Err(AnalysisFailure::Transport("connection refused".into()).into())
            }
            Outcome::Panic => panic!("stub classifier panicked"),
        }
    }
}
