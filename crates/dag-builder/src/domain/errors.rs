//! Error types for the DAG Builder

use super::value_objects::NodeKind;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// All errors that can occur while building a DAG
#[derive(Debug, Error)]
pub enum BuilderError {
    /// A node's kind was declared inconsistently
    #[error("Kind mismatch for node {name}: {current} != {requested}")]
    KindMismatch {
        name: String,
        current: NodeKind,
        requested: NodeKind,
    },

    /// Lookup of a name that was never registered
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// Output slot index beyond the configured limit
    #[error("Output slot {index} of node {name} out of range (max {max} slots)")]
    SlotOutOfRange {
        name: String,
        index: usize,
        max: usize,
    },

    /// An earlier recording failure left the registry half-applied
    #[error("Builder unusable after earlier failure: {0}")]
    Poisoned(String),

    /// Token variant the recorder does not understand
    #[error("Unsupported token: {0}")]
    UnsupportedToken(String),

    /// The dependency graph is not a DAG
    #[error(
        "Cycle detected in dependency graph: {} node(s) never emitted",
        .0.unresolved.len()
    )]
    CyclicDependency(Box<CycleDiagnostics>),

    /// Tokenizer failed
    #[error("Tokenizer failed: {0}")]
    Tokenize(#[from] TokenizeError),

    /// Filler failed
    #[error("Filler failed: {0}")]
    Fill(#[from] FillError),

    /// Exporter failed
    #[error("Exporter failed: {0}")]
    Export(#[from] ExportError),
}

/// State left behind by a failed topological sort.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CycleDiagnostics {
    /// Dependencies still pending, per never-emitted node
    pub remaining: BTreeMap<String, BTreeSet<String>>,
    /// node -> nodes that depend on it
    pub reverse: BTreeMap<String, BTreeSet<String>>,
    /// Nodes emitted before the candidate pool ran dry
    pub emitted: BTreeSet<String>,
    /// Nodes never emitted
    pub unresolved: BTreeSet<String>,
}

impl CycleDiagnostics {
    /// Extract one concrete cycle from the remaining dependency sets.
    ///
    /// Every never-emitted node still waits on at least one never-emitted
    /// node, so walking the remaining sets from any of them must revisit a
    /// name. The returned path starts and ends with that name.
    pub fn cycle(&self) -> Vec<String> {
        let Some(start) = self.unresolved.iter().next() else {
            return Vec::new();
        };

        let mut path: Vec<&str> = Vec::new();
        let mut current = start.as_str();
        loop {
            if let Some(pos) = path.iter().position(|name| *name == current) {
                let mut cycle: Vec<String> = path[pos..].iter().map(|s| s.to_string()).collect();
                cycle.push(current.to_string());
                return cycle;
            }
            path.push(current);

            let next = self
                .remaining
                .get(current)
                .and_then(|deps| deps.iter().find(|dep| self.unresolved.contains(*dep)));
            match next {
                Some(next) => current = next.as_str(),
                None => return Vec::new(),
            }
        }
    }
}

/// Tokenizer error
#[derive(Debug, Error)]
pub enum TokenizeError {
    #[error("Syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Filler error
#[derive(Debug, Error)]
pub enum FillError {
    #[error("Cannot fill node {name}: {reason}")]
    Node { name: String, reason: String },

    #[error("Filler failed: {0}")]
    Other(String),
}

/// Exporter error
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Dependency {dependency} of {name} was not exported first")]
    MissingDependency { name: String, dependency: String },

    #[error("Cannot resolve vertex {name}: {reason}")]
    Resolve { name: String, reason: String },
}
