pub mod boundary;
pub mod config;
pub mod errors;
pub mod extractor;
pub mod logging;
pub mod reasoning_parser;
pub mod tool_parser;

pub use config::{ConfigError, ConfigResult, ExtractorConfig, ExtractorConfigBuilder};
pub use extractor::{
    ExtractError, ExtractionSnapshot, ExtractorFactory, SnapshotDelta, StreamExtractor,
};
pub use reasoning_parser::{DelimiterPair, ReasoningParser, ReasoningPhase, ReasoningSplit};
pub use tool_parser::{RawToolCall, ToolCatalogue, ToolSpec};
