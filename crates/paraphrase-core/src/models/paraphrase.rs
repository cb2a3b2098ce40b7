use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rewriting style requested from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ParaphraseMode {
    WordChanger,
    Fluency,
    #[default]
    Standard,
    Formal,
    Smooth,
    Creative,
    Smarter,
    Shorten,
    Academic,
    Expand,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown paraphrase mode: {0}")]
pub struct ParseModeError(pub String);

impl ParaphraseMode {
    /// All modes, in the order a mode selector shows them.
    pub const ALL: [ParaphraseMode; 10] = [
        ParaphraseMode::WordChanger,
        ParaphraseMode::Fluency,
        ParaphraseMode::Standard,
        ParaphraseMode::Formal,
        ParaphraseMode::Smooth,
        ParaphraseMode::Creative,
        ParaphraseMode::Smarter,
        ParaphraseMode::Shorten,
        ParaphraseMode::Academic,
        ParaphraseMode::Expand,
    ];

    /// Value sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParaphraseMode::WordChanger => "word_changer",
            ParaphraseMode::Fluency => "fluency",
            ParaphraseMode::Standard => "standard",
            ParaphraseMode::Formal => "formal",
            ParaphraseMode::Smooth => "smooth",
            ParaphraseMode::Creative => "creative",
            ParaphraseMode::Smarter => "smarter",
            ParaphraseMode::Shorten => "shorten",
            ParaphraseMode::Academic => "academic",
            ParaphraseMode::Expand => "expand",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ParaphraseMode::WordChanger => "Word Changer",
            ParaphraseMode::Fluency => "Fluency",
            ParaphraseMode::Standard => "Standard",
            ParaphraseMode::Formal => "Formal",
            ParaphraseMode::Smooth => "Smooth",
            ParaphraseMode::Creative => "Creative",
            ParaphraseMode::Smarter => "Smarter",
            ParaphraseMode::Shorten => "Shorten",
            ParaphraseMode::Academic => "Academic",
            ParaphraseMode::Expand => "Expand",
        }
    }
}

impl fmt::Display for ParaphraseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ParaphraseMode {
    type Err = ParseModeError;

    /// Accepts the wire value or the label, case-insensitively, with spaces
    /// or dashes in place of underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ParaphraseRequest {
    pub text: String,
    #[serde(default)]
    pub mode: ParaphraseMode,
}

impl ParaphraseRequest {
    pub fn new(text: impl Into<String>, mode: ParaphraseMode) -> Self {
        Self {
            text: text.into(),
            mode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ParaphraseResponse {
    pub paraphrased_text: String,
    pub original_length: u64,
    pub paraphrased_length: u64,
}
