//! Configuration for evidence reconciliation

use serde::{Deserialize, Serialize};

/// Input bounds keeping reconciliation time proportional to document size.
///
/// Untrusted documents can declare arbitrary numbers of references, so
/// every count is capped before any work is done.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReconciliationLimits {
    /// Maximum raw token entries across all sources of one signature
    pub max_tokens: usize,
    /// Maximum declared references across all sources of one signature
    pub max_references: usize,
    /// Maximum timestamps attached to one signature
    pub max_timestamps: usize,
}

impl Default for ReconciliationLimits {
    fn default() -> Self {
        Self {
            max_tokens: 1_000,
            max_references: 2_000,
            max_timestamps: 64,
        }
    }
}
