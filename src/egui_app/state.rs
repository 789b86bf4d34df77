//! UI-facing state that the renderer reads directly.

use egui::Color32;

/// Maximum status lines kept for the hover log.
const STATUS_LOG_LIMIT: usize = 50;

/// Aggregate UI state owned by the controller.
#[derive(Clone, Debug)]
pub struct UiState {
    pub status: StatusBarState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: StatusBarState::idle(),
        }
    }
}

/// Severity of the current status message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Busy,
    Info,
    Warning,
    Error,
}

impl StatusTone {
    /// Badge label and color for the tone.
    pub fn badge(self) -> (&'static str, Color32) {
        match self {
            Self::Idle => ("Standby", Color32::from_rgb(51, 65, 85)),
            Self::Busy => ("Scanning", Color32::from_rgb(59, 130, 246)),
            Self::Info => ("Online", Color32::from_rgb(16, 185, 129)),
            Self::Warning => ("Warning", Color32::from_rgb(245, 158, 11)),
            Self::Error => ("Error", Color32::from_rgb(239, 68, 68)),
        }
    }
}

/// Status badge + text shown in the bottom bar.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub tone: StatusTone,
    pub badge_label: String,
    pub badge_color: Color32,
    /// Most recent messages, oldest first.
    pub log: Vec<String>,
}

impl StatusBarState {
    /// Status shown before any image has been selected.
    pub fn idle() -> Self {
        let (label, color) = StatusTone::Idle.badge();
        Self {
            text: "Awaiting satellite imagery".into(),
            tone: StatusTone::Idle,
            badge_label: label.into(),
            badge_color: color,
            log: Vec::new(),
        }
    }

    /// Replace the message, skipping the log when nothing changed.
    pub fn set(&mut self, text: impl Into<String>, tone: StatusTone) {
        let text = text.into();
        if text == self.text && tone == self.tone {
            return;
        }
        let (label, color) = tone.badge();
        self.badge_label = label.into();
        self.badge_color = color;
        self.tone = tone;
        self.log.push(text.clone());
        if self.log.len() > STATUS_LOG_LIMIT {
            let excess = self.log.len() - STATUS_LOG_LIMIT;
            self.log.drain(..excess);
        }
        self.text = text;
    }

    /// Log entries joined for a tooltip.
    pub fn log_text(&self) -> String {
        self.log.join("\n")
    }
}
