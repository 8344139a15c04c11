//! Relationship recorder
//!
//! The only code path that adds edges, outputs and attributes to registry
//! nodes. Every operation registers the node it links to no later than the
//! node doing the linking, and every operation is idempotent.

use super::errors::BuilderError;
use super::registry::{resolve_kind, NodeRegistry};
use super::value_objects::{Attributes, DagInput, DagOutput, NodeKind};
use tracing::debug;

impl NodeRegistry {
    /// `from` lists `to` as a DAG parent. `to` is registered first.
    pub fn add_parent_edge(&mut self, from: &str, to: &str) -> Result<(), BuilderError> {
        self.get_or_create(to, NodeKind::Unresolved)?;
        let from_node = self.get_or_create(from, NodeKind::Unresolved)?;
        from_node.parents.insert(to.to_string());
        debug!(from, to, "Recorded parent edge");
        Ok(())
    }

    /// `from` spends output `index` of `to`. `to` is registered first and
    /// grows a placeholder slot when `index` is past its end.
    pub fn add_spending_edge(
        &mut self,
        from: &str,
        to: &str,
        index: usize,
    ) -> Result<(), BuilderError> {
        let len = self.slot_len(to, index)?;
        let to_node = self.get_or_create(to, NodeKind::Unresolved)?;
        to_node.outputs.ensure_len(len);
        let from_node = self.get_or_create(from, NodeKind::Unresolved)?;
        from_node.inputs.insert(DagInput::new(to, index));
        debug!(from, to, index, "Recorded spending edge");
        Ok(())
    }

    /// Declare output `index` of `name`. A non-native token registers a
    /// token node and becomes an ordering dependency of `name`.
    ///
    /// The token node is resolved before the slot is written, so a kind
    /// conflict leaves `name` without the output.
    pub fn set_output(
        &mut self,
        name: &str,
        index: usize,
        amount: u64,
        token: &str,
        attrs: Attributes,
    ) -> Result<(), BuilderError> {
        self.slot_len(name, index)?;
        self.get_or_create(name, NodeKind::Unresolved)?;
        let token_dep = if token != self.native_token() {
            self.get_or_create(token, NodeKind::Token)?;
            Some(token.to_string())
        } else {
            None
        };

        let node = self.node_mut(name)?;
        node.outputs.set(index, DagOutput::new(amount, token, attrs));
        node.deps.extend(token_dep);
        debug!(name, index, amount, token, "Recorded output");
        Ok(())
    }

    /// `from` must be emitted after `to`. `from` is registered first.
    pub fn add_deps(&mut self, from: &str, to: &str) -> Result<(), BuilderError> {
        self.get_or_create(from, NodeKind::Unresolved)?;
        self.get_or_create(to, NodeKind::Unresolved)?;
        self.node_mut(from)?.deps.insert(to.to_string());
        debug!(from, to, "Recorded ordering dependency");
        Ok(())
    }

    /// Attach `key = value` to `name`. The reserved type key resolves the
    /// node kind instead of landing in `attrs`.
    pub fn add_attribute(&mut self, name: &str, key: &str, value: &str) -> Result<(), BuilderError> {
        let is_type = key == self.type_attribute();
        let node = self.get_or_create(name, NodeKind::Unresolved)?;
        if is_type {
            resolve_kind(node, NodeKind::parse(value))?;
        } else {
            node.attrs.insert(key.to_string(), value.to_string());
        }
        debug!(name, key, value, "Recorded attribute");
        Ok(())
    }

    /// Chain of block nodes `prefix<begin>..=prefix<end>`, each parented to
    /// the previous one and the first to `first_parent` when given.
    pub fn add_blockchain(
        &mut self,
        prefix: &str,
        first_parent: Option<&str>,
        begin: usize,
        end: usize,
    ) -> Result<(), BuilderError> {
        let mut prev = first_parent.map(str::to_string);
        for i in begin..=end {
            let name = format!("{prefix}{i}");
            self.get_or_create(&name, NodeKind::Block)?;
            if let Some(parent) = &prev {
                self.add_parent_edge(&name, parent)?;
            }
            prev = Some(name);
        }
        debug!(prefix, ?first_parent, begin, end, "Recorded blockchain");
        Ok(())
    }
}
