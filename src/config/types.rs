use super::{ConfigResult, ConfigValidator};
use crate::reasoning_parser::DelimiterPair;
use crate::tool_parser::{params::DEFAULT_MAX_PARAM_ITERATIONS, ToolCatalogue};
use serde::{Deserialize, Serialize};

/// Per-stream extraction configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Tags delimiting the reasoning channel (None = no reasoning extraction)
    #[serde(default)]
    pub reasoning_tags: Option<DelimiterPair>,
    /// Tools that may be invoked with XML tags, with their ordered parameter names
    #[serde(default)]
    pub tools: ToolCatalogue,
    /// Maximum parameter-open attempts per tool body before parsing stops early
    #[serde(default = "default_max_param_iterations")]
    pub max_param_iterations: usize,
}

fn default_max_param_iterations() -> usize {
    DEFAULT_MAX_PARAM_ITERATIONS
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            reasoning_tags: None,
            tools: ToolCatalogue::default(),
            max_param_iterations: DEFAULT_MAX_PARAM_ITERATIONS,
        }
    }
}

impl ExtractorConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: ExtractorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        ConfigValidator::validate(self)
    }
}
