//! Reference-geometry detection by name
//!
//! Axes, planes, datums, sketches and coordinate systems come through STEP import as
//! ordinary shapes. They are recognized by keywords in their label or internal name.

use crate::constants::DEFAULT_EXCLUDE_KEYWORDS;

/// Keyword-based filter for helper geometry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFilter {
    keywords: Vec<String>,
    enabled: bool,
}

impl Default for ReferenceFilter {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDE_KEYWORDS.iter().copied(), true)
    }
}

impl ReferenceFilter {
    /// Build a filter; keywords are trimmed and lowercased, empty ones dropped
    pub fn new<I, S>(keywords: I, enabled: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords, enabled }
    }

    /// Build a filter from a comma-separated keyword list
    pub fn from_csv(csv: &str, enabled: bool) -> Self {
        Self::new(csv.split(','), enabled)
    }

    /// A filter that never excludes anything
    pub fn disabled() -> Self {
        Self {
            keywords: Vec::new(),
            enabled: false,
        }
    }

    /// Whether the filter can exclude anything at all
    pub fn is_active(&self) -> bool {
        self.enabled && !self.keywords.is_empty()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Substring match of any keyword in the lowercased name. Empty names never match.
    pub fn looks_like_reference(&self, name: &str) -> bool {
        if name.trim().is_empty() {
            return false;
        }
        let lowered = name.to_lowercase();
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }

    /// Check the display name (label, else internal name) and the internal name
    ///
    /// Some kernels keep meaningful labels separate from generated internal names,
    /// so a match on either excludes the object.
    pub fn is_reference(&self, label: Option<&str>, internal_name: &str) -> bool {
        if !self.is_active() {
            return false;
        }
        let display = label.filter(|l| !l.is_empty()).unwrap_or(internal_name);
        self.looks_like_reference(display) || self.looks_like_reference(internal_name)
    }
}
