//! Configuration for the DAG Builder

use serde::{Deserialize, Serialize};

/// Builder configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Ledger's native unit; outputs in it create no token dependency
    pub native_token: String,
    /// Reserved attribute key that resolves a node's kind
    pub type_attribute: String,
    /// Output slots allowed per node (anti-DoS); slot indices run below it
    pub max_output_slots: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            native_token: "HTR".to_string(),
            type_attribute: "type".to_string(),
            max_output_slots: 255,
        }
    }
}
