use super::{ConfigResult, ExtractorConfig};
use crate::reasoning_parser::DelimiterPair;
use crate::tool_parser::{ToolCatalogue, ToolSpec};

/// Builder for ExtractorConfig that wraps the config itself
#[derive(Debug, Clone, Default)]
pub struct ExtractorConfigBuilder {
    config: ExtractorConfig,
    tools: Vec<ToolSpec>,
}

impl ExtractorConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from an existing configuration (takes ownership)
    pub fn from_config(config: ExtractorConfig) -> Self {
        let tools = config.tools.specs().to_vec();
        Self { config, tools }
    }

    /// Set the reasoning delimiters
    pub fn reasoning_tags(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.config.reasoning_tags = Some(DelimiterPair::new_unchecked(open, close));
        self
    }

    /// Disable reasoning extraction
    pub fn no_reasoning(mut self) -> Self {
        self.config.reasoning_tags = None;
        self
    }

    /// Append a tool with its ordered parameter names
    pub fn tool<I, S>(mut self, name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools.push(ToolSpec::new(name, params));
        self
    }

    /// Replace the whole tool catalogue
    pub fn tools(mut self, catalogue: ToolCatalogue) -> Self {
        self.tools = catalogue.specs().to_vec();
        self
    }

    /// Set the per-body parameter iteration cap
    pub fn max_param_iterations(mut self, max: usize) -> Self {
        self.config.max_param_iterations = max;
        self
    }

    /// Build the ExtractorConfig with validation
    pub fn build(self) -> ConfigResult<ExtractorConfig> {
        let config = self.build_unchecked();
        config.validate()?;
        Ok(config)
    }

    /// Build the ExtractorConfig without validation
    pub fn build_unchecked(self) -> ExtractorConfig {
        let mut config = self.config;
        config.tools = ToolCatalogue::from_specs_unchecked(self.tools);
        config
    }
}

impl ExtractorConfig {
    /// Create a new builder
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder::new()
    }

    /// Create a builder from this configuration
    pub fn to_builder(&self) -> ExtractorConfigBuilder {
        ExtractorConfigBuilder::from_config(self.clone())
    }
}
