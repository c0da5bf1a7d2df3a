/// Tool call extraction for inline XML-style markup
pub mod catalogue;
pub mod ids;
pub mod params;
pub mod splitter;
pub mod types;

pub use catalogue::{ToolCatalogue, ToolSpec};
pub use ids::{SequentialIdGenerator, ToolCallIdGenerator, UuidIdGenerator};
pub use params::{parse_tool_body, trim_param_value, ParseMode, ParsedParams};
pub use splitter::XmlToolSplitter;
pub use types::RawToolCall;
