use std::fmt;

/// Classification label assigned to a satellite scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisasterCategory {
    /// Smoke plumes, active flame fronts or burn scars.
    ForestFire,
    /// Coastal inundation, receding water or destroyed shoreline infrastructure.
    Tsunami,
    /// Ordinary urban, forest or ocean patterns.
    Normal,
    /// Anything the classifier returned outside the known labels.
    Unknown,
}

impl DisasterCategory {
    /// Labels the classifier is asked to choose from.
    pub const CLASSIFIED: [Self; 3] = [Self::ForestFire, Self::Tsunami, Self::Normal];

    /// Wire label used by the classifier schema.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ForestFire => "FOREST_FIRE",
            Self::Tsunami => "TSUNAMI",
            Self::Normal => "NORMAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Map a label returned by the classifier onto a category.
    ///
    /// Matching ignores case and treats spaces and dashes as underscores, so
    /// `"forest fire"` still resolves. Anything else becomes [`Self::Unknown`].
    pub fn from_label(label: &str) -> Self {
        let normalized: String = label
            .trim()
            .chars()
            .map(|ch| match ch {
                ' ' | '-' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();
        match normalized.as_str() {
            "FOREST_FIRE" => Self::ForestFire,
            "TSUNAMI" => Self::Tsunami,
            "NORMAL" => Self::Normal,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for DisasterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
