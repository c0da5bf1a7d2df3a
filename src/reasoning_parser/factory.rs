// Factory for reasoning parsers, resolving delimiter presets from model ids.

use std::collections::HashMap;

use crate::reasoning_parser::{
    parsers::{PassthroughReasoningParser, ReasoningSplitter},
    traits::{DelimiterPair, ReasoningParser},
};

/// Registry of delimiter presets and model patterns.
#[derive(Debug, Clone, Default)]
pub struct DelimiterRegistry {
    /// Preset name to delimiter pair
    presets: HashMap<String, DelimiterPair>,
    /// Model pattern to preset name mappings, checked in order
    patterns: Vec<(String, String)>,
}

impl DelimiterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named delimiter preset.
    pub fn register_preset(&mut self, name: &str, tags: DelimiterPair) {
        self.presets.insert(name.to_string(), tags);
    }

    /// Register a model pattern to preset mapping.
    /// Patterns are checked in order, first match wins.
    pub fn register_pattern(&mut self, pattern: &str, preset: &str) {
        self.patterns.push((pattern.to_lowercase(), preset.to_string()));
    }

    /// Get a preset by exact name.
    pub fn preset(&self, name: &str) -> Option<&DelimiterPair> {
        self.presets.get(name)
    }

    /// Find the preset for a model id by case-insensitive substring match.
    pub fn find_for_model(&self, model_id: &str) -> Option<&DelimiterPair> {
        let model_lower = model_id.to_lowercase();
        self.patterns
            .iter()
            .find(|(pattern, _)| model_lower.contains(pattern.as_str()))
            .and_then(|(_, preset)| self.presets.get(preset))
    }
}

/// Factory for creating reasoning parsers based on model type.
#[derive(Debug, Clone)]
pub struct ReasoningParserFactory {
    registry: DelimiterRegistry,
}

impl ReasoningParserFactory {
    /// Create a new factory with the default presets registered.
    pub fn new() -> Self {
        let mut registry = DelimiterRegistry::new();

        registry.register_preset("think", DelimiterPair::think());
        // Kimi uses Unicode delimiters
        registry.register_preset(
            "kimi",
            DelimiterPair::new_unchecked("◁think▷", "◁/think▷"),
        );

        registry.register_pattern("deepseek-r1", "think");
        registry.register_pattern("qwen3", "think");
        registry.register_pattern("qwen", "think");
        registry.register_pattern("qwq", "think");
        registry.register_pattern("glm45", "think");
        registry.register_pattern("step3", "think");
        registry.register_pattern("kimi", "kimi");

        Self { registry }
    }

    /// Delimiters used for the given model id, if it is a known reasoning model.
    pub fn delimiters_for_model(&self, model_id: &str) -> Option<DelimiterPair> {
        self.registry.find_for_model(model_id).cloned()
    }

    /// Create a fresh parser for the given model id.
    /// Falls back to a passthrough parser if the model is not recognized.
    pub fn create(&self, model_id: &str) -> Box<dyn ReasoningParser> {
        Self::create_with(self.delimiters_for_model(model_id))
    }

    /// Create a fresh parser for explicit delimiters (None = passthrough).
    pub fn create_with(tags: Option<DelimiterPair>) -> Box<dyn ReasoningParser> {
        match tags {
            Some(tags) => Box::new(ReasoningSplitter::new(tags)),
            None => Box::new(PassthroughReasoningParser::new()),
        }
    }

    /// Get the internal registry for custom registration.
    pub fn registry_mut(&mut self) -> &mut DelimiterRegistry {
        &mut self.registry
    }
}

impl Default for ReasoningParserFactory {
    fn default() -> Self {
        Self::new()
    }
}
