//! Mapping of the provider's status vocabulary onto internal meaning.

/// Interpretation of a provider-reported status string.
///
/// The provider's vocabulary is not contractually fixed, so the mapping
/// keeps an explicit fallback branch instead of assuming the enumeration is
/// complete: anything unrecognized is treated as still in progress and left
/// to the polling ceiling to bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderTrackStatus {
    /// The provider is still rendering the track.
    InProgress,
    /// The provider reports the track as rendered.
    Complete,
    /// The provider reports the job as failed.
    Failed,
    /// The status string matched no known indicator.
    Unrecognized(String),
}

impl ProviderTrackStatus {
    /// Classifies a raw provider status string.
    ///
    /// Matching is case-insensitive and whitespace-tolerant.
    #[must_use]
    pub fn from_provider(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "composing" => Self::InProgress,
            "completed" | "composed" => Self::Complete,
            "failed" => Self::Failed,
            _ => Self::Unrecognized(value.to_owned()),
        }
    }
}
