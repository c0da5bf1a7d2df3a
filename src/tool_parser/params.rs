// Parameter sub-parser for the body of an XML tool call.
//
// The body is re-parsed from scratch on every update, so the result is a pure
// function of (body, params, mode). Incremental and one-shot runs agree as long
// as the final pass uses `ParseMode::Final`.

use std::collections::BTreeMap;

use tracing::debug;

use crate::boundary::{find_earliest, partial_suffix_of_any, partial_tag_suffix};

/// Default cap on parameter-open attempts per body
pub const DEFAULT_MAX_PARAM_ITERATIONS: usize = 10;

/// How to treat an unterminated trailing parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// More text may arrive; hold back a partial tag at the end
    Streaming,
    /// The body is complete
    Final,
}

/// Result of parsing one tool body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedParams {
    pub raw_params: BTreeMap<String, String>,
    pub done_params: Vec<String>,
}

/// Parse `<param>value</param>` pairs out of a tool body.
///
/// Only names listed in `params` are recognized. The earliest opening tag wins and
/// declared order breaks ties. Text between parameters is dropped. Text after the
/// last closed parameter is kept as its continuation. An unterminated parameter
/// gets the rest of the body as a provisional value and ends the parse.
pub fn parse_tool_body(
    body: &str,
    params: &[String],
    mode: ParseMode,
    max_iterations: usize,
) -> ParsedParams {
    let mut parsed = ParsedParams::default();
    if params.is_empty() {
        return parsed;
    }

    let open_tags: Vec<String> = params.iter().map(|p| format!("<{}>", p)).collect();
    let mut cursor = 0;
    let mut iterations = 0;
    // Name and untrimmed value span of the last closed parameter
    let mut last_closed: Option<(&String, usize, usize)> = None;

    loop {
        let Some((pos, index)) =
            find_earliest(&body[cursor..], open_tags.iter().map(String::as_str))
        else {
            if let Some((name, value_start, value_end)) = last_closed {
                let mut tail = &body[cursor..];
                if mode == ParseMode::Streaming {
                    if let Some(partial) =
                        partial_suffix_of_any(tail, open_tags.iter().map(String::as_str))
                    {
                        tail = &tail[..tail.len() - partial.len()];
                    }
                }
                if !tail.is_empty() {
                    let value = format!("{}{}", &body[value_start..value_end], tail);
                    parsed
                        .raw_params
                        .insert(name.clone(), trim_param_value(&value).to_string());
                }
            }
            break;
        };

        if iterations >= max_iterations {
            debug!(
                "Parameter iteration cap of {} reached, keeping partial result",
                max_iterations
            );
            break;
        }
        iterations += 1;

        let name = &params[index];
        let value_start = cursor + pos + open_tags[index].len();
        let close_tag = format!("</{}>", name);

        match body[value_start..].find(&close_tag) {
            Some(rel) => {
                let value_end = value_start + rel;
                let value = trim_param_value(&body[value_start..value_end]);
                parsed.raw_params.insert(name.clone(), value.to_string());
                if !parsed.done_params.contains(name) {
                    parsed.done_params.push(name.clone());
                }
                last_closed = Some((name, value_start, value_end));
                cursor = value_end + close_tag.len();
            }
            None => {
                let mut value = &body[value_start..];
                if mode == ParseMode::Streaming {
                    if let Some(partial) = partial_tag_suffix(value, &close_tag) {
                        value = &value[..value.len() - partial.len()];
                    }
                }
                parsed
                    .raw_params
                    .insert(name.clone(), trim_param_value(value).to_string());
                parsed.done_params.retain(|p| p != name);
                break;
            }
        }
    }

    parsed
}

/// Strip the whitespace a model puts around a parameter value.
///
/// Single-line values are trimmed at both ends. Multi-line values lose leading
/// whitespace on the first line and trailing whitespace on the last line, and a
/// first or last line left empty is dropped along with its newline.
pub fn trim_param_value(value: &str) -> &str {
    if !value.contains('\n') {
        return value.trim();
    }

    let is_inline_space = |c: char| c.is_whitespace() && c != '\n';

    let mut trimmed = value.trim_start_matches(is_inline_space);
    trimmed = trimmed.strip_prefix('\n').unwrap_or(trimmed);

    trimmed = trimmed.trim_end_matches(is_inline_space);
    if let Some(rest) = trimmed.strip_suffix('\n') {
        trimmed = rest.strip_suffix('\r').unwrap_or(rest);
    }
    trimmed
}
