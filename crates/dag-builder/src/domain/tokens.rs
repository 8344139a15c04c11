//! Token records emitted by the tokenizer
//!
//! One variant per relationship kind the recorder understands, plus
//! [`Token::Other`] for syntax the tokenizer recognises but the recorder
//! has no rule for.

use super::value_objects::Attributes;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    /// `from` lists `to` as a DAG parent
    Parent { from: String, to: String },
    /// `from` spends output `index` of `to`
    Spend {
        from: String,
        to: String,
        index: usize,
    },
    /// Free-form attribute; the reserved type key resolves the node kind
    Attribute {
        name: String,
        key: String,
        value: String,
    },
    /// `from` must be emitted after `to`
    OrderBefore { from: String, to: String },
    /// Declare output `index` of `name`
    Output {
        name: String,
        index: usize,
        amount: u64,
        token: String,
        attrs: Attributes,
    },
    /// Chain of blocks `prefix<begin>..=prefix<end>`
    Blockchain {
        prefix: String,
        first_parent: Option<String>,
        begin: usize,
        end: usize,
    },
    /// Anything else the tokenizer produced
    Other { tag: String, args: Vec<String> },
}

impl Token {
    /// Tag used in logs and error messages.
    pub fn tag(&self) -> &str {
        match self {
            Token::Parent { .. } => "PARENT",
            Token::Spend { .. } => "SPEND",
            Token::Attribute { .. } => "ATTRIBUTE",
            Token::OrderBefore { .. } => "ORDER_BEFORE",
            Token::Output { .. } => "OUTPUT",
            Token::Blockchain { .. } => "BLOCKCHAIN",
            Token::Other { tag, .. } => tag,
        }
    }
}
