use std::fmt;

use uuid::Uuid;

use super::{AnalysisResult, ScanImage};

/// Maximum number of scans retained in the mission log.
pub const HISTORY_LIMIT: usize = 10;

/// Unique identifier of a history entry, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScanId(Uuid);

impl ScanId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScanId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Snapshot of one completed scan.
#[derive(Clone, Debug)]
pub struct ScanHistoryItem {
    pub id: ScanId,
    /// Completion time in Unix epoch milliseconds.
    pub timestamp_ms: i64,
    pub image: ScanImage,
    pub result: AnalysisResult,
}

impl ScanHistoryItem {
    pub fn new(image: ScanImage, result: AnalysisResult, timestamp_ms: i64) -> Self {
        Self {
            id: ScanId::new(),
            timestamp_ms,
            image,
            result,
        }
    }
}

/// Newest-first list of past scans, capped at [`HISTORY_LIMIT`].
#[derive(Clone, Debug, Default)]
pub struct ScanHistory {
    items: Vec<ScanHistoryItem>,
}

impl ScanHistory {
    /// Insert at the head, evicting the oldest entries beyond the limit.
    ///
    /// Returns how many entries were evicted.
    pub fn push_front(&mut self, item: ScanHistoryItem) -> usize {
        self.items.insert(0, item);
        let evicted = self.items.len().saturating_sub(HISTORY_LIMIT);
        self.items.truncate(HISTORY_LIMIT);
        evicted
    }

    /// Drop every entry, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        removed
    }

    pub fn get(&self, id: ScanId) -> Option<&ScanHistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn latest(&self) -> Option<&ScanHistoryItem> {
        self.items.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScanHistoryItem> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[ScanHistoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
