// Passthrough reasoning parser for models without reasoning delimiters.
// All text is display text.

use crate::{
    errors::{ExtractError, ExtractResult},
    reasoning_parser::traits::{ReasoningParser, ReasoningPhase, ReasoningSplit},
};

#[derive(Debug, Clone, Default)]
pub struct PassthroughReasoningParser {
    split: ReasoningSplit,
}

impl PassthroughReasoningParser {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReasoningParser for PassthroughReasoningParser {
    fn update(&mut self, full_text: &str) -> ExtractResult<&ReasoningSplit> {
        let seen = self.split.display_text.len();
        ExtractError::ensure_cumulative(full_text, seen)?;
        self.split.display_text.push_str(&full_text[seen..]);
        Ok(&self.split)
    }

    fn finalize(&mut self, full_text: &str) -> ExtractResult<&ReasoningSplit> {
        self.update(full_text)
    }

    fn current(&self) -> &ReasoningSplit {
        &self.split
    }

    fn phase(&self) -> ReasoningPhase {
        ReasoningPhase::Done
    }

    fn reset(&mut self) {
        self.split = ReasoningSplit::default();
    }

    fn parser_type(&self) -> &str {
        "passthrough"
    }
}
