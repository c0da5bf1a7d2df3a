// Stream driver composing the reasoning splitter with the tool-call splitter.
//
// Cumulative text goes through the reasoning parser first; its display channel
// is then fed, also cumulatively, to the tool splitter.

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    config::{ConfigResult, ExtractorConfig},
    reasoning_parser::{DelimiterPair, ReasoningParser, ReasoningParserFactory},
    tool_parser::{RawToolCall, ToolCallIdGenerator, ToolCatalogue, XmlToolSplitter},
};

pub use crate::errors::{ExtractError, ExtractResult};

/// Classified view of one stream at a point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSnapshot {
    pub display_text: String,
    pub reasoning_text: String,
    /// Completed calls followed by the one still open, in creation order
    pub tool_calls: Vec<RawToolCall>,
}

/// What changed between two snapshots of the same stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDelta {
    pub display_text: String,
    pub reasoning_text: String,
    /// Calls that are new or whose parameters or status changed
    pub tool_calls: Vec<RawToolCall>,
}

impl SnapshotDelta {
    pub fn is_empty(&self) -> bool {
        self.display_text.is_empty() && self.reasoning_text.is_empty() && self.tool_calls.is_empty()
    }
}

impl ExtractionSnapshot {
    /// Compute the increment from `previous` to this snapshot.
    ///
    /// Text that does not extend the previous snapshot is returned whole.
    pub fn delta_since(&self, previous: &ExtractionSnapshot) -> SnapshotDelta {
        let appended = |current: &str, before: &str| {
            current
                .strip_prefix(before)
                .unwrap_or(current)
                .to_string()
        };

        SnapshotDelta {
            display_text: appended(&self.display_text, &previous.display_text),
            reasoning_text: appended(&self.reasoning_text, &previous.reasoning_text),
            tool_calls: self
                .tool_calls
                .iter()
                .filter(|call| !previous.tool_calls.contains(call))
                .cloned()
                .collect(),
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Incremental extractor for one stream.
///
/// Call [`update`](Self::update) with the full text received so far, as often as
/// needed, then [`finalize`](Self::finalize) once with the complete text.
pub struct StreamExtractor {
    reasoning: Box<dyn ReasoningParser>,
    tools: XmlToolSplitter,
    /// Final text and snapshot, once the stream is complete
    finalized: Option<(String, ExtractionSnapshot)>,
}

impl StreamExtractor {
    pub fn new(reasoning_tags: Option<DelimiterPair>, catalogue: Arc<ToolCatalogue>) -> Self {
        Self {
            reasoning: ReasoningParserFactory::create_with(reasoning_tags),
            tools: XmlToolSplitter::new(catalogue),
            finalized: None,
        }
    }

    /// Create an extractor from a validated configuration.
    pub fn from_config(config: &ExtractorConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::new(config.reasoning_tags.clone(), Arc::new(config.tools.clone()))
            .with_max_param_iterations(config.max_param_iterations))
    }

    pub fn with_id_generator(mut self, ids: Box<dyn ToolCallIdGenerator>) -> Self {
        self.tools = self.tools.with_id_generator(ids);
        self
    }

    pub fn with_max_param_iterations(mut self, max_param_iterations: usize) -> Self {
        self.tools = self.tools.with_max_param_iterations(max_param_iterations);
        self
    }

    /// Process the cumulative text received so far.
    pub fn update(&mut self, full_text: &str) -> ExtractResult<ExtractionSnapshot> {
        if self.finalized.is_some() {
            return Err(ExtractError::AlreadyFinalized);
        }

        let split = self.reasoning.update(full_text)?;
        self.tools.update(&split.display_text)?;
        Ok(self.snapshot())
    }

    /// Process the complete text and return the authoritative snapshot.
    ///
    /// Repeating the call with the same text returns the same snapshot.
    pub fn finalize(&mut self, full_text: &str) -> ExtractResult<ExtractionSnapshot> {
        if let Some((final_text, snapshot)) = &self.finalized {
            if final_text == full_text {
                return Ok(snapshot.clone());
            }
            return Err(ExtractError::AlreadyFinalized);
        }

        let split = self.reasoning.finalize(full_text)?;
        match self.tools.finalize(&split.display_text) {
            Err(ExtractError::NonMonotonicInput { consumed, received }) => {
                warn!(
                    consumed,
                    received,
                    "Final display text does not extend streamed text, re-splitting tool calls"
                );
                self.tools.reset();
                self.tools.finalize(&split.display_text)?;
            }
            other => other?,
        }

        let snapshot = self.snapshot();
        debug!(
            display_len = snapshot.display_text.len(),
            reasoning_len = snapshot.reasoning_text.len(),
            tool_calls = snapshot.tool_calls.len(),
            "Stream finalized"
        );
        self.finalized = Some((full_text.to_string(), snapshot.clone()));
        Ok(snapshot)
    }

    /// Current state without consuming input
    pub fn snapshot(&self) -> ExtractionSnapshot {
        ExtractionSnapshot {
            display_text: self.tools.display_text().to_string(),
            reasoning_text: self.reasoning.current().reasoning_text.clone(),
            tool_calls: self.tools.tool_calls(),
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized.is_some()
    }

    pub fn reasoning_parser(&self) -> &dyn ReasoningParser {
        self.reasoning.as_ref()
    }

    /// Start over for a new stream. Tool-call ids keep counting.
    pub fn reset(&mut self) {
        self.reasoning.reset();
        self.tools.reset();
        self.finalized = None;
    }
}

impl fmt::Debug for StreamExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamExtractor")
            .field("reasoning", &self.reasoning.parser_type())
            .field("phase", &self.reasoning.phase())
            .field("tools", &self.tools)
            .field("finalized", &self.finalized.is_some())
            .finish()
    }
}

/// Creates per-stream extractors sharing one configuration.
#[derive(Debug, Clone)]
pub struct ExtractorFactory {
    config: Arc<ExtractorConfig>,
    catalogue: Arc<ToolCatalogue>,
    presets: ReasoningParserFactory,
}

impl ExtractorFactory {
    pub fn new(config: ExtractorConfig) -> ConfigResult<Self> {
        config.validate()?;
        let catalogue = Arc::new(config.tools.clone());
        Ok(Self {
            config: Arc::new(config),
            catalogue,
            presets: ReasoningParserFactory::new(),
        })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Fresh extractor with random tool-call ids
    pub fn create(&self) -> StreamExtractor {
        self.build(self.config.reasoning_tags.clone())
    }

    /// Fresh extractor using the configured delimiters, or the model's preset
    /// when none are configured.
    pub fn create_for_model(&self, model_id: &str) -> StreamExtractor {
        let tags = self
            .config
            .reasoning_tags
            .clone()
            .or_else(|| self.presets.delimiters_for_model(model_id));
        debug!(model_id, reasoning = tags.is_some(), "Creating extractor for model");
        self.build(tags)
    }

    /// Fresh extractor with a caller-provided id generator
    pub fn create_with_ids(&self, ids: Box<dyn ToolCallIdGenerator>) -> StreamExtractor {
        self.create().with_id_generator(ids)
    }

    fn build(&self, tags: Option<DelimiterPair>) -> StreamExtractor {
        StreamExtractor::new(tags, Arc::clone(&self.catalogue))
            .with_max_param_iterations(self.config.max_param_iterations)
    }
}
