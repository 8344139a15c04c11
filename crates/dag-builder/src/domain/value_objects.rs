//! Value objects for the DAG Builder
//!
//! Node kinds, output descriptors and input references.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Free-form key/value metadata attached to nodes and outputs.
pub type Attributes = BTreeMap<String, String>;

/// Resolved category of a node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Not declared yet; may be resolved exactly once.
    #[default]
    Unresolved,
    Genesis,
    Block,
    Transaction,
    Token,
    /// Any kind the recorder has no dedicated variant for.
    Custom(String),
}

impl NodeKind {
    /// Parse the value of a type attribute.
    ///
    /// `"unknown"` and `"unresolved"` map to [`NodeKind::Unresolved`], which
    /// never resolves anything. Unrecognised names become [`NodeKind::Custom`].
    pub fn parse(value: &str) -> Self {
        match value {
            "" | "unknown" | "unresolved" => NodeKind::Unresolved,
            "genesis" => NodeKind::Genesis,
            "block" => NodeKind::Block,
            "transaction" | "tx" => NodeKind::Transaction,
            "token" => NodeKind::Token,
            other => NodeKind::Custom(other.to_string()),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, NodeKind::Unresolved)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Unresolved => f.write_str("unresolved"),
            NodeKind::Genesis => f.write_str("genesis"),
            NodeKind::Block => f.write_str("block"),
            NodeKind::Transaction => f.write_str("transaction"),
            NodeKind::Token => f.write_str("token"),
            NodeKind::Custom(name) => f.write_str(name),
        }
    }
}

/// Reference to one output slot of another node.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DagInput {
    /// Name of the node whose output is spent
    pub node: String,
    /// Output slot being spent
    pub index: usize,
}

impl DagInput {
    pub fn new(node: impl Into<String>, index: usize) -> Self {
        Self {
            node: node.into(),
            index,
        }
    }
}

/// Value-bearing output descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagOutput {
    pub amount: u64,
    /// Token name; empty for placeholders
    pub token: String,
    pub attrs: Attributes,
}

impl DagOutput {
    pub fn new(amount: u64, token: impl Into<String>, attrs: Attributes) -> Self {
        Self {
            amount,
            token: token.into(),
            attrs,
        }
    }
}
