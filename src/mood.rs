//! Mood emoji picked by the user and the tone read back out of a reflection.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The emoji mood a user can pin to a day.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mood {
    Happy,
    Calm,
    Sad,
    Angry,
    Tired,
    Excited,
}

impl Mood {
    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Calm => "😌",
            Mood::Sad => "😢",
            Mood::Angry => "😠",
            Mood::Tired => "😴",
            Mood::Excited => "🤩",
        }
    }

    /// Lenient parse for stored keys; unknown keys yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        Mood::from_str(key.trim()).ok()
    }
}

/// Overall feeling of a reflection text, used to tint the journal view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MoodTone {
    Calm,
    Warm,
    Energetic,
    Sad,
    Love,
    Playful,
    Default,
}

// Checked in order; the first tone with a matching keyword wins.
const TONE_KEYWORDS: &[(MoodTone, &[&str])] = &[
    (MoodTone::Calm, &["calm", "gentle", "soft", "peaceful"]),
    (MoodTone::Warm, &["warm", "hope", "bright", "light"]),
    (MoodTone::Energetic, &["energetic", "dynamic", "strong"]),
    (MoodTone::Sad, &["sad", "heavy", "quiet", "tired"]),
    (MoodTone::Love, &["love", "heart", "tender", "affection"]),
    (MoodTone::Playful, &["playful", "fun", "curious"]),
];

impl MoodTone {
    pub fn from_reflection(text: &str) -> Self {
        let text = text.to_lowercase();
        TONE_KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| text.contains(w)))
            .map(|(tone, _)| *tone)
            .unwrap_or(MoodTone::Default)
    }

    /// Two-stop background palette, as hex colors.
    pub fn palette(&self) -> (&'static str, &'static str) {
        match self {
            MoodTone::Calm => ("#d9eaff", "#eef5ff"),
            MoodTone::Warm => ("#ffe6f3", "#ffeef6"),
            MoodTone::Energetic => ("#fff7d1", "#ffeab6"),
            MoodTone::Sad => ("#d7d8e0", "#f1f1f6"),
            MoodTone::Love => ("#ffd9e8", "#ffe9f4"),
            MoodTone::Playful => ("#defaff", "#e6f6ff"),
            MoodTone::Default => ("#ffe6ff", "#e0f2ff"),
        }
    }
}
