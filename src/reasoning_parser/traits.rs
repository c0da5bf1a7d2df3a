use crate::config::{ConfigError, ConfigValidator};
use crate::errors::ExtractResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of splitting text into the display and reasoning channels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningSplit {
    /// Text outside the reasoning block.
    pub display_text: String,

    /// Text between the reasoning delimiters.
    pub reasoning_text: String,
}

impl ReasoningSplit {
    /// Create a new ReasoningSplit with the given display and reasoning text.
    pub fn new(display_text: String, reasoning_text: String) -> Self {
        Self {
            display_text,
            reasoning_text,
        }
    }

    /// Create a split with only display text.
    pub fn display(text: String) -> Self {
        Self {
            display_text: text,
            reasoning_text: String::new(),
        }
    }

    /// Check if this split contains any text.
    pub fn is_empty(&self) -> bool {
        self.display_text.is_empty() && self.reasoning_text.is_empty()
    }
}

impl fmt::Display for ReasoningSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ReasoningSplit {{ display: {} bytes, reasoning: {} bytes }}",
            self.display_text.len(),
            self.reasoning_text.len()
        )
    }
}

/// Phase of the reasoning state machine. Phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReasoningPhase {
    /// Looking for the open tag; text is display.
    AwaitingOpen,
    /// Inside the reasoning block; text is reasoning.
    InReasoning,
    /// Close tag seen; all further text is display.
    Done,
}

/// Open/close tags delimiting the reasoning channel. Both are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DelimiterPairDef", into = "DelimiterPairDef")]
pub struct DelimiterPair {
    open: String,
    close: String,
}

#[derive(Serialize, Deserialize)]
struct DelimiterPairDef {
    open: String,
    close: String,
}

impl DelimiterPair {
    /// Create a validated delimiter pair.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Result<Self, ConfigError> {
        let pair = Self::new_unchecked(open, close);
        ConfigValidator::validate_delimiters(&pair.open, &pair.close)?;
        Ok(pair)
    }

    pub(crate) fn new_unchecked(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// `<think>` / `</think>`, used by most open-weight reasoning models.
    pub fn think() -> Self {
        Self::new_unchecked("<think>", "</think>")
    }

    pub fn open(&self) -> &str {
        &self.open
    }

    pub fn close(&self) -> &str {
        &self.close
    }
}

impl TryFrom<DelimiterPairDef> for DelimiterPair {
    type Error = ConfigError;

    fn try_from(def: DelimiterPairDef) -> Result<Self, Self::Error> {
        Self::new(def.open, def.close)
    }
}

impl From<DelimiterPair> for DelimiterPairDef {
    fn from(pair: DelimiterPair) -> Self {
        Self {
            open: pair.open,
            close: pair.close,
        }
    }
}

/// Trait for splitting the reasoning channel out of a cumulative text stream.
pub trait ReasoningParser: Send + Sync {
    /// Classify the cumulative text received so far.
    ///
    /// `full_text` must extend the text passed to the previous call. The returned
    /// split only contains text that can no longer turn out to be part of a
    /// delimiter, and each channel only ever grows.
    fn update(&mut self, full_text: &str) -> ExtractResult<&ReasoningSplit>;

    /// Classify the complete text at end of stream.
    ///
    /// Withheld partial delimiters are released and the split is re-derived from
    /// the full text; the result is final.
    fn finalize(&mut self, full_text: &str) -> ExtractResult<&ReasoningSplit>;

    /// The split committed so far.
    fn current(&self) -> &ReasoningSplit;

    /// Current phase of the state machine.
    fn phase(&self) -> ReasoningPhase;

    /// Reset the parser state for reuse.
    fn reset(&mut self);

    /// Identifier of the parser kind, for logging.
    fn parser_type(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_pair_validation() {
        assert!(DelimiterPair::new("<think>", "</think>").is_ok());
        assert!(DelimiterPair::new("", "</think>").is_err());
        assert!(DelimiterPair::new("<think>", "").is_err());
    }

    #[test]
    fn test_delimiter_pair_serde() {
        let pair: DelimiterPair =
            serde_json::from_str(r#"{"open": "◁think▷", "close": "◁/think▷"}"#).unwrap();
        assert_eq!(pair.open(), "◁think▷");
        assert_eq!(pair.close(), "◁/think▷");

        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json["open"], "◁think▷");

        assert!(serde_json::from_str::<DelimiterPair>(r#"{"open": "", "close": "x"}"#).is_err());
    }

    #[test]
    fn test_split_display() {
        let split = ReasoningSplit::new("answer".to_string(), "thought".to_string());
        assert_eq!(
            split.to_string(),
            "ReasoningSplit { display: 6 bytes, reasoning: 7 bytes }"
        );
        assert!(!split.is_empty());
        assert!(ReasoningSplit::default().is_empty());
    }
}
