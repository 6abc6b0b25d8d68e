//! Resolver configuration.

use serde::{Deserialize, Serialize};

/// Options controlling type resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverOptions {
    /// Report unparsable or unresolvable names as errors instead of `None`.
    pub throw_on_error: bool,
    /// Compare assembly and type names case-insensitively.
    pub ignore_case: bool,
}

impl ResolverOptions {
    pub fn with_throw_on_error(mut self, throw_on_error: bool) -> Self {
        self.throw_on_error = throw_on_error;
        self
    }

    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }
}
