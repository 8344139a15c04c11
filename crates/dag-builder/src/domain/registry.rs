//! Node registry
//!
//! Owns every node of a build session by name. Nodes are created on first
//! reference, kinds are reconciled across references, and nothing is ever
//! removed.

use super::entities::{DagNode, NodeFill};
use super::errors::BuilderError;
use super::value_objects::NodeKind;
use crate::config::BuilderConfig;
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct NodeRegistry {
    /// Nodes in registration order
    nodes: Vec<DagNode>,
    /// name -> position in `nodes`
    index: HashMap<String, usize>,
    native_token: String,
    type_attribute: String,
    max_output_slots: usize,
}

impl NodeRegistry {
    pub fn new(config: &BuilderConfig) -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            native_token: config.native_token.clone(),
            type_attribute: config.type_attribute.clone(),
            max_output_slots: config.max_output_slots,
        }
    }

    /// Return the node, creating it with `default_kind` if needed.
    ///
    /// An existing unresolved node is upgraded to `default_kind`. An existing
    /// concrete kind that differs from a concrete `default_kind` is a
    /// [`BuilderError::KindMismatch`].
    pub fn get_or_create(
        &mut self,
        name: &str,
        default_kind: NodeKind,
    ) -> Result<&mut DagNode, BuilderError> {
        let pos = match self.index.get(name) {
            Some(&pos) => {
                resolve_kind(&mut self.nodes[pos], default_kind)?;
                pos
            }
            None => {
                let pos = self.nodes.len();
                self.nodes.push(DagNode::new(name, default_kind));
                self.index.insert(name.to_string(), pos);
                pos
            }
        };
        Ok(&mut self.nodes[pos])
    }

    /// Diagnostic lookup.
    pub fn get(&self, name: &str) -> Result<&DagNode, BuilderError> {
        self.index
            .get(name)
            .map(|&pos| &self.nodes[pos])
            .ok_or_else(|| BuilderError::UnknownNode(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Registration index of `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub(crate) fn node_at(&self, pos: usize) -> &DagNode {
        &self.nodes[pos]
    }

    pub(crate) fn node_mut(&mut self, name: &str) -> Result<&mut DagNode, BuilderError> {
        match self.index.get(name) {
            Some(&pos) => Ok(&mut self.nodes[pos]),
            None => Err(BuilderError::UnknownNode(name.to_string())),
        }
    }

    /// Nodes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &DagNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn native_token(&self) -> &str {
        &self.native_token
    }

    pub fn type_attribute(&self) -> &str {
        &self.type_attribute
    }

    pub fn max_output_slots(&self) -> usize {
        self.max_output_slots
    }

    /// Slot count `name` needs to hold slot `index`, if within the limit.
    pub(crate) fn slot_len(&self, name: &str, index: usize) -> Result<usize, BuilderError> {
        index
            .checked_add(1)
            .filter(|&len| len <= self.max_output_slots)
            .ok_or_else(|| BuilderError::SlotOutOfRange {
                name: name.to_string(),
                index,
                max: self.max_output_slots,
            })
    }

    /// Filler views of every node, in registration order.
    pub fn fill_view(&mut self) -> Vec<NodeFill<'_>> {
        self.nodes.iter_mut().map(NodeFill::new).collect()
    }
}

/// Resolve `node.kind` towards `kind`. Unresolved never overrides anything.
pub(crate) fn resolve_kind(node: &mut DagNode, kind: NodeKind) -> Result<(), BuilderError> {
    if !kind.is_resolved() || node.kind == kind {
        return Ok(());
    }
    if !node.kind.is_resolved() {
        node.kind = kind;
        return Ok(());
    }

    warn!(
        node = %node.name,
        current = %node.kind,
        requested = %kind,
        "Conflicting kind declaration"
    );
    Err(BuilderError::KindMismatch {
        name: node.name.clone(),
        current: node.kind.clone(),
        requested: kind,
    })
}
