//! Parser configuration.

use clrname_scanner::DEFAULT_MAX_NESTING_DEPTH;
use serde::{Deserialize, Serialize};

/// Options controlling a parse.
///
/// Deserializes from camelCase keys; missing keys take their defaults and an
/// explicit `"maxNestingDepth": null` removes the nesting bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseOptions {
    /// Record every state transition in [`ParseResult::trace`](crate::ParseResult::trace).
    pub trace: bool,
    /// Maximum generic argument nesting; `None` is unbounded.
    pub max_nesting_depth: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            trace: false,
            max_nesting_depth: Some(DEFAULT_MAX_NESTING_DEPTH),
        }
    }
}

impl ParseOptions {
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_max_nesting_depth(mut self, max_nesting_depth: Option<usize>) -> Self {
        self.max_nesting_depth = max_nesting_depth;
        self
    }
}
