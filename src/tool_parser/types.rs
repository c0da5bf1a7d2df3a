use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::tool_parser::params::ParsedParams;

/// Tool call extracted from XML markup in model output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawToolCall {
    /// Name of the tool (the XML tag name)
    pub name: String,
    /// Identifier minted when the opening tag was first seen
    pub id: String,
    /// Parameter values seen so far; unfinished ones are provisional
    pub raw_params: BTreeMap<String, String>,
    /// Parameters whose closing tag has been seen, in order of completion
    pub done_params: Vec<String>,
    /// Whether the tool's closing tag was seen (or the stream ended)
    pub is_done: bool,
}

impl RawToolCall {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            raw_params: BTreeMap::new(),
            done_params: Vec::new(),
            is_done: false,
        }
    }

    /// Value of a parameter, provisional or final
    pub fn param(&self, name: &str) -> Option<&str> {
        self.raw_params.get(name).map(String::as_str)
    }

    /// Whether the parameter's closing tag has been seen
    pub fn is_param_done(&self, name: &str) -> bool {
        self.done_params.iter().any(|p| p == name)
    }

    /// Replace the parameters with a fresh parse of the tool body
    pub(crate) fn apply(&mut self, parsed: ParsedParams) {
        self.raw_params = parsed.raw_params;
        self.done_params = parsed.done_params;
    }
}
