// Incremental reasoning splitter driven by a configurable delimiter pair.
//
// The splitter re-reads cumulative text from a remembered cursor. Everything
// before the cursor has been committed to a channel; everything after it is
// either new or a withheld partial delimiter.

use tracing::{debug, warn};

use crate::{
    boundary::partial_tag_suffix,
    errors::{ExtractError, ExtractResult},
    reasoning_parser::traits::{DelimiterPair, ReasoningParser, ReasoningPhase, ReasoningSplit},
};

/// Split `text` in one pass, the way a complete message is classified.
///
/// The first open tag starts reasoning and the first close tag after it ends it.
/// Without an open tag everything is display; without a close tag everything
/// after the open tag is reasoning.
pub fn split_reasoning(text: &str, tags: &DelimiterPair) -> ReasoningSplit {
    let Some(open_idx) = text.find(tags.open()) else {
        return ReasoningSplit::display(text.to_string());
    };

    let before = &text[..open_idx];
    let after_open = &text[open_idx + tags.open().len()..];

    match after_open.find(tags.close()) {
        Some(close_idx) => {
            let reasoning = &after_open[..close_idx];
            let after_close = &after_open[close_idx + tags.close().len()..];
            ReasoningSplit::new(format!("{}{}", before, after_close), reasoning.to_string())
        }
        None => ReasoningSplit::new(before.to_string(), after_open.to_string()),
    }
}

/// Reasoning splitter with the `AwaitingOpen -> InReasoning -> Done` state machine.
#[derive(Debug, Clone)]
pub struct ReasoningSplitter {
    tags: DelimiterPair,
    phase: ReasoningPhase,
    /// Byte offset into the cumulative text up to which input is committed
    cursor: usize,
    /// Length of the longest cumulative text seen
    seen_len: usize,
    split: ReasoningSplit,
}

impl ReasoningSplitter {
    /// Create a new splitter for the given delimiters.
    pub fn new(tags: DelimiterPair) -> Self {
        Self {
            tags,
            phase: ReasoningPhase::AwaitingOpen,
            cursor: 0,
            seen_len: 0,
            split: ReasoningSplit::default(),
        }
    }

    pub fn tags(&self) -> &DelimiterPair {
        &self.tags
    }

    /// Number of bytes withheld because they may start a delimiter.
    pub fn pending_len(&self) -> usize {
        self.seen_len - self.cursor
    }

    /// Reject text that cannot continue this stream before any offset is sliced.
    ///
    /// A same-length rewrite can move a char boundary under the committed cursor.
    fn check_input(&self, text: &str) -> ExtractResult<()> {
        ExtractError::ensure_cumulative(text, self.seen_len)?;
        ExtractError::ensure_cumulative(text, self.cursor)
    }

    fn advance(&mut self, text: &str) {
        loop {
            let rest = &text[self.cursor..];
            match self.phase {
                ReasoningPhase::AwaitingOpen => {
                    if let Some(idx) = rest.find(self.tags.open()) {
                        self.split.display_text.push_str(&rest[..idx]);
                        self.cursor += idx + self.tags.open().len();
                        self.phase = ReasoningPhase::InReasoning;
                        debug!(offset = self.cursor, "Reasoning block opened");
                        continue;
                    }
                    let commit = committable_len(rest, self.tags.open());
                    self.split.display_text.push_str(&rest[..commit]);
                    self.cursor += commit;
                    return;
                }
                ReasoningPhase::InReasoning => {
                    if let Some(idx) = rest.find(self.tags.close()) {
                        self.split.reasoning_text.push_str(&rest[..idx]);
                        self.cursor += idx + self.tags.close().len();
                        self.phase = ReasoningPhase::Done;
                        debug!(
                            offset = self.cursor,
                            reasoning_len = self.split.reasoning_text.len(),
                            "Reasoning block closed"
                        );
                        continue;
                    }
                    let commit = committable_len(rest, self.tags.close());
                    self.split.reasoning_text.push_str(&rest[..commit]);
                    self.cursor += commit;
                    return;
                }
                ReasoningPhase::Done => {
                    self.split.display_text.push_str(rest);
                    self.cursor = text.len();
                    return;
                }
            }
        }
    }
}

/// Length of the prefix of `rest` that cannot be part of `tag`.
fn committable_len(rest: &str, tag: &str) -> usize {
    rest.len() - partial_tag_suffix(rest, tag).map_or(0, str::len)
}

impl ReasoningParser for ReasoningSplitter {
    fn update(&mut self, full_text: &str) -> ExtractResult<&ReasoningSplit> {
        self.check_input(full_text)?;
        self.seen_len = full_text.len();
        self.advance(full_text);
        Ok(&self.split)
    }

    fn finalize(&mut self, full_text: &str) -> ExtractResult<&ReasoningSplit> {
        self.check_input(full_text)?;
        self.seen_len = full_text.len();
        self.advance(full_text);

        // Nothing can complete a withheld partial tag any more
        let rest = &full_text[self.cursor..];
        match self.phase {
            ReasoningPhase::InReasoning => self.split.reasoning_text.push_str(rest),
            _ => self.split.display_text.push_str(rest),
        }
        self.cursor = full_text.len();

        let authoritative = split_reasoning(full_text, &self.tags);
        if authoritative != self.split {
            warn!(
                incremental = %self.split,
                authoritative = %authoritative,
                "Incremental reasoning split diverged from full pass"
            );
            self.split = authoritative;
        }
        Ok(&self.split)
    }

    fn current(&self) -> &ReasoningSplit {
        &self.split
    }

    fn phase(&self) -> ReasoningPhase {
        self.phase
    }

    fn reset(&mut self) {
        self.phase = ReasoningPhase::AwaitingOpen;
        self.cursor = 0;
        self.seen_len = 0;
        self.split = ReasoningSplit::default();
    }

    fn parser_type(&self) -> &str {
        "delimited"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_splitter() -> ReasoningSplitter {
        ReasoningSplitter::new(DelimiterPair::new("<open>", "<close>").unwrap())
    }

    /// Feed `text` as growing prefixes split at the given byte offsets.
    fn feed_prefixes(splitter: &mut ReasoningSplitter, text: &str, cuts: &[usize]) {
        for &cut in cuts {
            splitter.update(&text[..cut]).unwrap();
        }
    }

    #[test]
    fn test_split_reasoning_well_formed() {
        let tags = DelimiterPair::new("<open>", "<close>").unwrap();
        let split = split_reasoning("before<open>middle<close>after", &tags);
        assert_eq!(split.display_text, "beforeafter");
        assert_eq!(split.reasoning_text, "middle");
    }

    #[test]
    fn test_split_reasoning_no_open_tag() {
        let tags = DelimiterPair::think();
        let split = split_reasoning("plain answer </think> here", &tags);
        assert_eq!(split.display_text, "plain answer </think> here");
        assert_eq!(split.reasoning_text, "");
    }

    #[test]
    fn test_split_reasoning_unterminated() {
        let tags = DelimiterPair::new("<open>", "<close>").unwrap();
        let split = split_reasoning("before<open>middle", &tags);
        assert_eq!(split.display_text, "before");
        assert_eq!(split.reasoning_text, "middle");
    }

    #[test]
    fn test_single_update_crosses_all_phases() {
        let mut splitter = create_test_splitter();
        let split = splitter
            .update("before<open>middle<close>after")
            .unwrap()
            .clone();
        assert_eq!(split.display_text, "beforeafter");
        assert_eq!(split.reasoning_text, "middle");
        assert_eq!(splitter.phase(), ReasoningPhase::Done);
    }

    #[test]
    fn test_partial_open_tag_is_withheld() {
        let mut splitter = create_test_splitter();
        let split = splitter.update("before<op").unwrap();
        assert_eq!(split.display_text, "before");
        assert_eq!(splitter.pending_len(), 3);
        assert_eq!(splitter.phase(), ReasoningPhase::AwaitingOpen);

        let split = splitter.update("before<open>mid").unwrap();
        assert_eq!(split.display_text, "before");
        assert_eq!(split.reasoning_text, "mid");
        assert_eq!(splitter.phase(), ReasoningPhase::InReasoning);
    }

    #[test]
    fn test_partial_tag_that_never_completes() {
        let mut splitter = create_test_splitter();
        splitter.update("a <op").unwrap();
        let split = splitter.update("a <opinion").unwrap();
        assert_eq!(split.display_text, "a <opinion");
        assert_eq!(splitter.pending_len(), 0);
    }

    #[test]
    fn test_partial_close_tag_is_withheld() {
        let mut splitter = create_test_splitter();
        let split = splitter.update("<open>thinking<clo").unwrap();
        assert_eq!(split.reasoning_text, "thinking");

        let split = splitter.update("<open>thinking<close>done").unwrap();
        assert_eq!(split.reasoning_text, "thinking");
        assert_eq!(split.display_text, "done");
    }

    #[test]
    fn test_text_after_close_is_display() {
        let mut splitter = create_test_splitter();
        splitter.update("<open>r<close>").unwrap();
        let split = splitter.update("<open>r<close> a <open> b").unwrap();
        assert_eq!(split.display_text, " a <open> b");
        assert_eq!(split.reasoning_text, "r");
    }

    #[test]
    fn test_finalize_unterminated_reasoning() {
        let mut splitter = create_test_splitter();
        splitter.update("before<open>mid").unwrap();
        let split = splitter.finalize("before<open>middle").unwrap();
        assert_eq!(split.display_text, "before");
        assert_eq!(split.reasoning_text, "middle");
    }

    #[test]
    fn test_finalize_releases_withheld_text() {
        let mut splitter = create_test_splitter();
        splitter.update("x <ope").unwrap();
        let split = splitter.finalize("x <ope").unwrap();
        assert_eq!(split.display_text, "x <ope");

        let mut splitter = create_test_splitter();
        let split = splitter.finalize("<open>thought <clos").unwrap();
        assert_eq!(split.display_text, "");
        assert_eq!(split.reasoning_text, "thought <clos");
    }

    #[test]
    fn test_char_by_char_matches_full_pass() {
        let text = "pre <op<open>a <clo b<close> post<clo";
        let tags = DelimiterPair::new("<open>", "<close>").unwrap();

        let mut splitter = create_test_splitter();
        let cuts: Vec<usize> = (0..=text.len()).collect();
        feed_prefixes(&mut splitter, text, &cuts);
        let incremental = splitter.finalize(text).unwrap().clone();

        assert_eq!(incremental, split_reasoning(text, &tags));
        assert_eq!(incremental.display_text, "pre <op post<clo");
        assert_eq!(incremental.reasoning_text, "a <clo b");
    }

    #[test]
    fn test_channels_only_grow() {
        let text = "x<open>yy<close>zz";
        let mut splitter = create_test_splitter();
        let mut previous = ReasoningSplit::default();
        for cut in 0..=text.len() {
            let split = splitter.update(&text[..cut]).unwrap().clone();
            assert!(split.display_text.starts_with(&previous.display_text));
            assert!(split.reasoning_text.starts_with(&previous.reasoning_text));
            previous = split;
        }
    }

    #[test]
    fn test_multibyte_delimiters() {
        let tags = DelimiterPair::new("◁think▷", "◁/think▷").unwrap();
        let text = "◁think▷推理◁/think▷答案";
        let mut splitter = ReasoningSplitter::new(tags.clone());

        let mut cut = 0;
        while cut <= text.len() {
            if text.is_char_boundary(cut) {
                let split = splitter.update(&text[..cut]).unwrap();
                assert!(!split.display_text.contains('◁'));
            }
            cut += 1;
        }
        let split = splitter.finalize(text).unwrap();
        assert_eq!(split.reasoning_text, "推理");
        assert_eq!(split.display_text, "答案");
    }

    #[test]
    fn test_shrinking_input_is_rejected() {
        let mut splitter = create_test_splitter();
        splitter.update("hello world").unwrap();
        assert!(matches!(
            splitter.update("hello"),
            Err(ExtractError::NonMonotonicInput { .. })
        ));
    }

    #[test]
    fn test_rewrite_splitting_a_char_at_cursor_is_rejected() {
        let tags = DelimiterPair::new("◁think▷", "◁/think▷").unwrap();
        let mut splitter = ReasoningSplitter::new(tags);
        assert_eq!(splitter.tags().open(), "◁think▷");

        splitter.update("ab◁").unwrap();
        assert_eq!(splitter.pending_len(), 3);

        // Same length, but byte 2 now falls inside '日'
        assert_eq!(
            splitter.update("a日x"),
            Err(ExtractError::NonMonotonicInput {
                consumed: 2,
                received: 5
            })
        );
        assert_eq!(
            splitter.finalize("a日x"),
            Err(ExtractError::NonMonotonicInput {
                consumed: 2,
                received: 5
            })
        );
        assert_eq!(splitter.current().display_text, "ab");

        let split = splitter.finalize("ab◁think▷r").unwrap();
        assert_eq!(split.display_text, "ab");
        assert_eq!(split.reasoning_text, "r");
    }

    #[test]
    fn test_reset_state() {
        let mut splitter = create_test_splitter();
        splitter.update("<open>reasoning<close> normal").unwrap();
        splitter.reset();
        assert_eq!(splitter.phase(), ReasoningPhase::AwaitingOpen);
        assert!(splitter.current().is_empty());
        assert_eq!(splitter.pending_len(), 0);
    }
}
