// Incremental splitter for `<tool><param>value</param></tool>` markup.
//
// Works on cumulative display text. Text before a catalogued opening tag is
// committed to display; markup from `<tool>` through `</tool>` is turned into a
// `RawToolCall` and never shows up in display. At most one call is open at a time.

use std::sync::Arc;

use tracing::debug;

use crate::{
    boundary::{find_earliest, floor_char_boundary, partial_suffix_of_any, partial_tag_suffix},
    errors::{ExtractError, ExtractResult},
    tool_parser::{
        catalogue::ToolCatalogue,
        ids::{ToolCallIdGenerator, UuidIdGenerator},
        params::{parse_tool_body, ParseMode, DEFAULT_MAX_PARAM_ITERATIONS},
        types::RawToolCall,
    },
};

/// The tool call waiting for its closing tag
#[derive(Debug, Clone)]
struct ActiveToolCall {
    call: RawToolCall,
    /// Catalogue position of the tool
    tool_index: usize,
    /// Byte offset just past the opening tag
    body_start: usize,
    close_tag: String,
    /// Earliest offset where the closing tag could still start
    scan_from: usize,
}

/// Tool-call splitter over cumulative display text.
#[derive(Debug)]
pub struct XmlToolSplitter {
    catalogue: Arc<ToolCatalogue>,
    ids: Box<dyn ToolCallIdGenerator>,
    max_param_iterations: usize,
    /// Byte offset up to which input is committed to display or consumed as markup
    cursor: usize,
    seen_len: usize,
    display_text: String,
    done: Vec<RawToolCall>,
    active: Option<ActiveToolCall>,
}

impl XmlToolSplitter {
    pub fn new(catalogue: Arc<ToolCatalogue>) -> Self {
        Self {
            catalogue,
            ids: Box::new(UuidIdGenerator),
            max_param_iterations: DEFAULT_MAX_PARAM_ITERATIONS,
            cursor: 0,
            seen_len: 0,
            display_text: String::new(),
            done: Vec::new(),
            active: None,
        }
    }

    pub fn with_id_generator(mut self, ids: Box<dyn ToolCallIdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_max_param_iterations(mut self, max_param_iterations: usize) -> Self {
        self.max_param_iterations = max_param_iterations;
        self
    }

    pub fn catalogue(&self) -> &ToolCatalogue {
        &self.catalogue
    }

    /// Consume the cumulative text seen so far.
    pub fn update(&mut self, full_text: &str) -> ExtractResult<()> {
        self.check_input(full_text)?;
        self.seen_len = full_text.len();
        self.advance(full_text, ParseMode::Streaming);
        Ok(())
    }

    /// Consume the complete text. An unterminated call is closed and reported.
    pub fn finalize(&mut self, full_text: &str) -> ExtractResult<()> {
        self.check_input(full_text)?;
        self.seen_len = full_text.len();
        self.advance(full_text, ParseMode::Final);

        match self.active.take() {
            Some(mut active) => {
                active.call.is_done = true;
                debug!(
                    tool = %active.call.name,
                    id = %active.call.id,
                    params = active.call.raw_params.len(),
                    "Stream ended inside tool call, forcing completion"
                );
                self.done.push(active.call);
            }
            None => {
                self.display_text.push_str(&full_text[self.cursor..]);
            }
        }
        self.cursor = full_text.len();
        Ok(())
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// Completed calls followed by the open one, in creation order
    pub fn tool_calls(&self) -> Vec<RawToolCall> {
        self.calls().cloned().collect()
    }

    pub fn calls(&self) -> impl Iterator<Item = &RawToolCall> + '_ {
        self.done
            .iter()
            .chain(self.active.as_ref().map(|active| &active.call))
    }

    pub fn has_active_call(&self) -> bool {
        self.active.is_some()
    }

    /// Clear all stream state. The id generator keeps its position.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.seen_len = 0;
        self.display_text.clear();
        self.done.clear();
        self.active = None;
    }

    /// Every offset `advance` slices at must still be a char boundary of `text`.
    fn check_input(&self, text: &str) -> ExtractResult<()> {
        ExtractError::ensure_cumulative(text, self.seen_len)?;
        ExtractError::ensure_cumulative(text, self.cursor)?;
        if let Some(active) = &self.active {
            ExtractError::ensure_cumulative(text, active.body_start)?;
            ExtractError::ensure_cumulative(text, active.scan_from)?;
        }
        Ok(())
    }

    fn advance(&mut self, text: &str, mode: ParseMode) {
        loop {
            if let Some(mut active) = self.active.take() {
                let found = text[active.scan_from..].find(&active.close_tag);
                match found {
                    Some(rel) => {
                        let close_pos = active.scan_from + rel;
                        let body = &text[active.body_start..close_pos];
                        self.parse_body(&mut active, body, ParseMode::Final);
                        active.call.is_done = true;
                        debug!(
                            tool = %active.call.name,
                            id = %active.call.id,
                            params = active.call.raw_params.len(),
                            "Tool call closed"
                        );
                        self.cursor = close_pos + active.close_tag.len();
                        self.done.push(active.call);
                        continue;
                    }
                    None => {
                        let lookback = active.close_tag.len() - 1;
                        active.scan_from =
                            floor_char_boundary(text, text.len().saturating_sub(lookback))
                                .max(active.body_start);

                        let mut body = &text[active.body_start..];
                        if mode == ParseMode::Streaming {
                            if let Some(partial) = partial_tag_suffix(body, &active.close_tag) {
                                body = &body[..body.len() - partial.len()];
                            }
                        }
                        self.parse_body(&mut active, body, mode);
                        self.active = Some(active);
                        return;
                    }
                }
            }

            let rest = &text[self.cursor..];
            match find_earliest(rest, self.catalogue.open_tags()) {
                Some((pos, tool_index)) => {
                    self.display_text.push_str(&rest[..pos]);
                    let Some(spec) = self.catalogue.spec_at(tool_index) else {
                        return;
                    };
                    let body_start = self.cursor + pos + spec.name.len() + 2;
                    let call = RawToolCall::new(spec.name.clone(), self.ids.next_id());
                    debug!(
                        tool = %call.name,
                        id = %call.id,
                        offset = body_start,
                        "Tool call opened"
                    );

                    self.active = Some(ActiveToolCall {
                        call,
                        tool_index,
                        body_start,
                        close_tag: spec.close_tag(),
                        scan_from: body_start,
                    });
                    self.cursor = body_start;
                }
                None => {
                    let withheld =
                        partial_suffix_of_any(rest, self.catalogue.open_tags()).map_or(0, str::len);
                    let commit = rest.len() - withheld;
                    self.display_text.push_str(&rest[..commit]);
                    self.cursor += commit;
                    return;
                }
            }
        }
    }

    fn parse_body(&self, active: &mut ActiveToolCall, body: &str, mode: ParseMode) {
        let params = self
            .catalogue
            .spec_at(active.tool_index)
            .map(|spec| spec.params.as_slice())
            .unwrap_or_default();
        active
            .call
            .apply(parse_tool_body(body, params, mode, self.max_param_iterations));
    }
}
