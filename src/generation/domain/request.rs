//! Validated composition request parameters and prompt derivation.

use super::{GenerationDomainError, Mood};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Requested track length in seconds, bounded to the provider's limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackDuration(u32);

impl TrackDuration {
    /// Shortest accepted track length.
    pub const MIN_SECONDS: u32 = 10;

    /// Longest accepted track length.
    pub const MAX_SECONDS: u32 = 300;

    /// Creates a validated duration.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationDomainError::InvalidDuration`] when the value
    /// falls outside `[10, 300]`.
    pub const fn new(seconds: u32) -> Result<Self, GenerationDomainError> {
        if seconds < Self::MIN_SECONDS || seconds > Self::MAX_SECONDS {
            return Err(GenerationDomainError::InvalidDuration(seconds));
        }
        Ok(Self(seconds))
    }

    /// Returns the duration in seconds.
    #[must_use]
    pub const fn seconds(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TrackDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Optional mood intensity modifier, normalized into `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MoodIntensity(f64);

impl MoodIntensity {
    /// Creates a validated intensity.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationDomainError::InvalidIntensity`] when the value is
    /// not a finite number in `[0.0, 1.0]`.
    pub fn new(value: f64) -> Result<Self, GenerationDomainError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(GenerationDomainError::InvalidIntensity(value));
        }
        Ok(Self(value))
    }

    /// Returns the numeric intensity.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for MoodIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Optional free-text style theme woven into the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Theme(String);

impl Theme {
    /// Creates a validated theme.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationDomainError::EmptyTheme`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, GenerationDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(GenerationDomainError::EmptyTheme);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the theme as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Theme {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated parameters of a composition request.
///
/// Bundles everything the provider needs to render a track, including the
/// derivation of the free-text prompt sent on the compose call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionRequest {
    mood: Mood,
    duration: TrackDuration,
    theme: Option<Theme>,
    intensity: Option<MoodIntensity>,
}

impl CompositionRequest {
    /// Creates a request with the required mood and duration.
    #[must_use]
    pub const fn new(mood: Mood, duration: TrackDuration) -> Self {
        Self {
            mood,
            duration,
            theme: None,
            intensity: None,
        }
    }

    /// Sets the style theme.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Sets the mood intensity.
    #[must_use]
    pub fn with_intensity(mut self, intensity: MoodIntensity) -> Self {
        self.intensity = Some(intensity);
        self
    }

    /// Returns the requested mood.
    #[must_use]
    pub const fn mood(&self) -> Mood {
        self.mood
    }

    /// Returns the requested duration.
    #[must_use]
    pub const fn duration(&self) -> TrackDuration {
        self.duration
    }

    /// Returns the style theme, if any.
    #[must_use]
    pub const fn theme(&self) -> Option<&Theme> {
        self.theme.as_ref()
    }

    /// Returns the mood intensity, if any.
    #[must_use]
    pub const fn intensity(&self) -> Option<MoodIntensity> {
        self.intensity
    }

    /// Derives the free-text prompt sent to the provider.
    #[must_use]
    pub fn prompt_text(&self) -> String {
        let mut text = match self.intensity {
            Some(intensity) => format!(
                "A {} music track with a mood intensity of {intensity}.",
                self.mood
            ),
            None => format!("A {} music track.", self.mood),
        };
        if let Some(theme) = &self.theme {
            text.push_str(&format!(" In a {theme} style."));
        }
        text
    }
}
