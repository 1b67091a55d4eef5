//! Reassembly of tool calls that arrive split over several stream chunks.

use std::collections::BTreeMap;

use super::types::ToolCall;

#[derive(Debug, Default)]
struct PartialToolCall {
    id: String,
    name: String,
    arguments: String,
}

/// Collects tool-call fragments keyed by their index in the response
#[derive(Debug, Default)]
pub struct ToolCallAccumulator {
    pending: BTreeMap<u32, PartialToolCall>,
}

impl ToolCallAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id and name arrive once, arguments are appended fragment by fragment
    pub fn push(
        &mut self,
        index: u32,
        id: Option<&str>,
        name: Option<&str>,
        arguments: Option<&str>,
    ) {
        let entry = self.pending.entry(index).or_default();
        if let Some(id) = id.filter(|s| !s.is_empty()) {
            entry.id = id.to_string();
        }
        if let Some(name) = name.filter(|s| !s.is_empty()) {
            entry.name.push_str(name);
        }
        if let Some(arguments) = arguments {
            entry.arguments.push_str(arguments);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Completed calls in index order; the accumulator is left empty
    pub fn drain(&mut self) -> Vec<ToolCall> {
        std::mem::take(&mut self.pending)
            .into_values()
            .map(|p| ToolCall {
                id: p.id,
                name: p.name,
                arguments: if p.arguments.is_empty() {
                    "{}".to_string()
                } else {
                    p.arguments
                },
            })
            .collect()
    }
}
