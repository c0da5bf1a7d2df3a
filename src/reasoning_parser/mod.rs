pub mod factory;
pub mod parsers;
pub mod traits;

pub use factory::{DelimiterRegistry, ReasoningParserFactory};
pub use parsers::{split_reasoning, PassthroughReasoningParser, ReasoningSplitter};
pub use traits::{DelimiterPair, ReasoningParser, ReasoningPhase, ReasoningSplit};
