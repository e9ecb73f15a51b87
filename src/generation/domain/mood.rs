//! Fixed mood vocabulary for composition requests.

use super::GenerationDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Moods accepted by the service, in canonical lowercase form.
const VOCABULARY: [&str; 50] = [
    "joyful",
    "calm",
    "melancholy",
    "energetic",
    "relaxing",
    "gloomy",
    "serene",
    "adventurous",
    "upbeat",
    "contemplative",
    "exhilarated",
    "peaceful",
    "frantic",
    "optimistic",
    "pensive",
    "giddy",
    "tranquil",
    "reflective",
    "vibrant",
    "somber",
    "eager",
    "content",
    "restless",
    "hopeful",
    "wistful",
    "euphoric",
    "composed",
    "agitated",
    "blissful",
    "apprehensive",
    "inspired",
    "nostalgic",
    "curious",
    "playful",
    "solemn",
    "determined",
    "bewildered",
    "grateful",
    "weary",
    "proud",
    "anxious",
    "elated",
    "tender",
    "disturbed",
    "thoughtful",
    "excited",
    "sullen",
    "reverent",
    "dreamy",
    "alert",
];

/// Validated member of the fixed mood vocabulary.
///
/// Domain-level free text is rejected; only the enumerated moods are
/// representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mood(&'static str);

impl Mood {
    /// Creates a validated mood from caller input.
    ///
    /// Input is normalized (trimmed, lowercased) before lookup.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationDomainError::UnknownMood`] when the value is not
    /// part of the vocabulary.
    pub fn new(value: &str) -> Result<Self, GenerationDomainError> {
        let normalized = value.trim().to_ascii_lowercase();
        VOCABULARY
            .iter()
            .copied()
            .find(|entry| *entry == normalized)
            .map(Self)
            .ok_or_else(|| GenerationDomainError::UnknownMood(value.to_owned()))
    }

    /// Returns the canonical lowercase form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }

    /// Returns the full accepted vocabulary in canonical form.
    #[must_use]
    pub const fn vocabulary() -> &'static [&'static str] {
        &VOCABULARY
    }
}

impl TryFrom<&str> for Mood {
    type Error = GenerationDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for Mood {
    fn as_ref(&self) -> &str {
        self.0
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Mood {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for Mood {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::new(&value).map_err(serde::de::Error::custom)
    }
}
