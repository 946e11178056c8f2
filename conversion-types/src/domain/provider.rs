//! Fallback provider health as reported to operators.

use serde::{Deserialize, Serialize};

/// Snapshot of one fallback provider, in chain order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub name: String,
    pub priority: u32,
    pub available: bool,
}

impl std::fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Provider{{name='{}', priority={}, available={}}}",
            self.name, self.priority, self.available
        )
    }
}
