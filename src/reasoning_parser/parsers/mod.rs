pub mod passthrough;
pub mod splitter;

pub use passthrough::PassthroughReasoningParser;
pub use splitter::{split_reasoning, ReasoningSplitter};
