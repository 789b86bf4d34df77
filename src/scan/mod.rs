//! Data shapes shared by the classifier, the scan session and the UI.

mod category;
mod history;
mod image;

pub use category::DisasterCategory;
pub use history::{HISTORY_LIMIT, ScanHistory, ScanHistoryItem, ScanId};
pub use image::{PreviewImage, ScanImage};

/// Confidence reported outside the closed unit interval.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("Confidence {0} is outside [0, 1]")]
pub struct ConfidenceOutOfRange(pub f64);

/// Structured classification of one satellite image.
///
/// Fields are private so the confidence invariant holds for every value.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisResult {
    category: DisasterCategory,
    confidence: f64,
    reasoning: String,
    detected_features: Vec<String>,
    recommended_action: String,
}

impl AnalysisResult {
    /// Build a result, rejecting confidences that are not finite values in `[0, 1]`.
    pub fn new(
        category: DisasterCategory,
        confidence: f64,
        reasoning: impl Into<String>,
        detected_features: Vec<String>,
        recommended_action: impl Into<String>,
    ) -> Result<Self, ConfidenceOutOfRange> {
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(ConfidenceOutOfRange(confidence));
        }
        Ok(Self {
            category,
            confidence,
            reasoning: reasoning.into(),
            detected_features,
            recommended_action: recommended_action.into(),
        })
    }

    pub fn category(&self) -> DisasterCategory {
        self.category
    }

    /// Classifier certainty in `[0, 1]`.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    /// Visual indicators in the order the classifier ranked them.
    pub fn detected_features(&self) -> &[String] {
        &self.detected_features
    }

    pub fn recommended_action(&self) -> &str {
        &self.recommended_action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds_inclusive() {
        assert!(AnalysisResult::new(DisasterCategory::Normal, 0.0, "", vec![], "").is_ok());
        assert!(AnalysisResult::new(DisasterCategory::Normal, 1.0, "", vec![], "").is_ok());
    }

    #[test]
    fn rejects_out_of_range_confidence() {
        for bad in [-0.01, 1.01, 92.0, f64::NAN, f64::INFINITY] {
            let err = AnalysisResult::new(DisasterCategory::Tsunami, bad, "", vec![], "");
            assert!(err.is_err(), "{bad} should be rejected");
        }
    }
}
