use std::fmt;

use uuid::Uuid;

/// Source of identifiers for newly opened tool calls
pub trait ToolCallIdGenerator: Send + Sync + fmt::Debug {
    fn next_id(&mut self) -> String;
}

/// Random `call_<uuid>` identifiers
#[derive(Debug, Clone, Default)]
pub struct UuidIdGenerator;

impl ToolCallIdGenerator for UuidIdGenerator {
    fn next_id(&mut self) -> String {
        format!("call_{}", Uuid::new_v4().simple())
    }
}

/// Deterministic `<prefix>_<n>` identifiers, for reproducible runs
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("call")
    }
}

impl ToolCallIdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> String {
        let id = format!("{}_{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
