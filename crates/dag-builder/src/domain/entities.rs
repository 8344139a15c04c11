//! Core entities for the DAG Builder

use super::value_objects::{Attributes, DagInput, DagOutput, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Sparse, growable list of output slots.
///
/// Slots that were never declared hold a placeholder (`None`) which reads as
/// a zero-value output, but stays distinguishable from an explicitly
/// declared zero amount.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSlots(Vec<Option<DagOutput>>);

/// View of a single output slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputSlot<'a> {
    Placeholder,
    Declared(&'a DagOutput),
}

impl<'a> OutputSlot<'a> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, OutputSlot::Placeholder)
    }

    pub fn amount(&self) -> u64 {
        match self {
            OutputSlot::Placeholder => 0,
            OutputSlot::Declared(output) => output.amount,
        }
    }

    pub fn token(&self) -> &'a str {
        match *self {
            OutputSlot::Placeholder => "",
            OutputSlot::Declared(output) => &output.token,
        }
    }

    pub fn declared(&self) -> Option<&'a DagOutput> {
        match *self {
            OutputSlot::Placeholder => None,
            OutputSlot::Declared(output) => Some(output),
        }
    }
}

impl OutputSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Grow to at least `len` slots, padding with placeholders.
    pub fn ensure_len(&mut self, len: usize) {
        if self.0.len() < len {
            self.0.resize(len, None);
        }
    }

    /// Declare slot `index`, growing the list as needed.
    pub fn set(&mut self, index: usize, output: DagOutput) {
        match self.0.get_mut(index) {
            Some(slot) => *slot = Some(output),
            None => {
                self.0.resize(index, None);
                self.0.push(Some(output));
            }
        }
    }

    /// Slot at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<OutputSlot<'_>> {
        self.0.get(index).map(|slot| match slot {
            Some(output) => OutputSlot::Declared(output),
            None => OutputSlot::Placeholder,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = OutputSlot<'_>> {
        self.0.iter().map(|slot| match slot {
            Some(output) => OutputSlot::Declared(output),
            None => OutputSlot::Placeholder,
        })
    }

    /// Declared outputs only.
    pub fn declared(&self) -> impl Iterator<Item = &DagOutput> {
        self.0.iter().flatten()
    }
}

/// One ledger entry placeholder being assembled before export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagNode {
    /// Unique name within the build session
    pub name: String,
    pub kind: NodeKind,
    /// Names this vertex lists as DAG parents
    pub parents: BTreeSet<String>,
    /// Output slots of other nodes this node spends
    pub inputs: BTreeSet<DagInput>,
    pub outputs: OutputSlots,
    /// Pure ordering constraints: names that must be emitted first
    pub deps: BTreeSet<String>,
    pub attrs: Attributes,
}

impl DagNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parents: BTreeSet::new(),
            inputs: BTreeSet::new(),
            outputs: OutputSlots::new(),
            deps: BTreeSet::new(),
            attrs: Attributes::new(),
        }
    }

    /// Full dependency set: parents, spent nodes, ordering deps and the
    /// tokens of declared outputs other than `native_token`.
    pub fn dependencies(&self, native_token: &str) -> BTreeSet<&str> {
        let parents = self.parents.iter().map(String::as_str);
        let inputs = self.inputs.iter().map(|input| input.node.as_str());
        let deps = self.deps.iter().map(String::as_str);
        let tokens = self
            .outputs
            .declared()
            .map(|output| output.token.as_str())
            .filter(|token| !token.is_empty() && *token != native_token);

        parents.chain(inputs).chain(deps).chain(tokens).collect()
    }
}

/// Filler view of a node: everything is read-only except `attrs`.
#[derive(Debug)]
pub struct NodeFill<'a> {
    pub name: &'a str,
    pub kind: &'a NodeKind,
    pub parents: &'a BTreeSet<String>,
    pub inputs: &'a BTreeSet<DagInput>,
    pub outputs: &'a OutputSlots,
    pub deps: &'a BTreeSet<String>,
    pub attrs: &'a mut Attributes,
}

impl<'a> NodeFill<'a> {
    pub(crate) fn new(node: &'a mut DagNode) -> Self {
        let DagNode {
            name,
            kind,
            parents,
            inputs,
            outputs,
            deps,
            attrs,
        } = node;

        Self {
            name: name.as_str(),
            kind,
            parents,
            inputs,
            outputs,
            deps,
            attrs,
        }
    }
}

/// Exported vertices in emission order, addressable by node name.
#[derive(Debug, Clone)]
pub struct DagArtifacts<V> {
    list: Vec<(String, V)>,
    by_name: HashMap<String, usize>,
}

impl<V> DagArtifacts<V> {
    pub fn new(list: Vec<(String, V)>) -> Self {
        let by_name = list
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), i))
            .collect();
        Self { list, by_name }
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.by_name.get(name).map(|&i| &self.list[i].1)
    }

    /// Node names in emission order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.list.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.list.iter().map(|(name, vertex)| (name.as_str(), vertex))
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn into_vec(self) -> Vec<(String, V)> {
        self.list
    }
}
