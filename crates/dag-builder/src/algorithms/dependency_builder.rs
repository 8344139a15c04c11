//! Dependency Set Builder
//!
//! Snapshots the registry into per-node dependency sets keyed by
//! registration index, plus the reverse mapping.

use crate::domain::errors::BuilderError;
use crate::domain::registry::NodeRegistry;
use std::collections::BTreeSet;

/// Dependency sets of a registry snapshot, indexed by registration order.
#[derive(Debug, Clone, Default)]
pub struct DependencySets {
    /// node -> nodes it waits on
    pub direct: Vec<BTreeSet<usize>>,
    /// node -> nodes waiting on it
    pub reverse: Vec<BTreeSet<usize>>,
}

impl DependencySets {
    pub fn len(&self) -> usize {
        self.direct.len()
    }

    pub fn is_empty(&self) -> bool {
        self.direct.is_empty()
    }

    /// Total number of dependency edges.
    pub fn edge_count(&self) -> usize {
        self.direct.iter().map(BTreeSet::len).sum()
    }
}

/// Build the full dependency set of every node.
///
/// A node depends on its parents, the sources of its inputs, its ordering
/// dependencies and the non-native tokens of its declared outputs. Every
/// referenced name must be registered.
pub fn build_dependency_sets(registry: &NodeRegistry) -> Result<DependencySets, BuilderError> {
    let count = registry.len();
    let mut direct = Vec::with_capacity(count);
    let mut reverse = vec![BTreeSet::new(); count];

    for (pos, node) in registry.iter().enumerate() {
        let mut deps = BTreeSet::new();
        for name in node.dependencies(registry.native_token()) {
            let dep = registry
                .position(name)
                .ok_or_else(|| BuilderError::UnknownNode(name.to_string()))?;
            deps.insert(dep);
            reverse[dep].insert(pos);
        }
        direct.push(deps);
    }

    Ok(DependencySets { direct, reverse })
}
