//! Kahn's Topological Sort Algorithm
//!
//! O((V + E) log V), detects cycles, deterministic for a given
//! registration order.

use super::dependency_builder::{build_dependency_sets, DependencySets};
use crate::domain::entities::DagNode;
use crate::domain::errors::{BuilderError, CycleDiagnostics};
use crate::domain::registry::NodeRegistry;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};
use tracing::{debug, error};

/// One-shot iterator over registry nodes in dependency order.
///
/// The whole order is computed and validated before the first node is
/// yielded, so a cyclic registry never produces a partial sequence.
#[derive(Debug)]
pub struct TopologicalOrder<'a> {
    registry: &'a NodeRegistry,
    order: std::vec::IntoIter<usize>,
}

impl<'a> TopologicalOrder<'a> {
    /// Registry the nodes are borrowed from, for lookups by name.
    pub fn registry(&self) -> &'a NodeRegistry {
        self.registry
    }
}

impl<'a> Iterator for TopologicalOrder<'a> {
    type Item = &'a DagNode;

    fn next(&mut self) -> Option<Self::Item> {
        self.order.next().map(|pos| self.registry.node_at(pos))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl ExactSizeIterator for TopologicalOrder<'_> {}

/// Sort the registry so that every node follows its whole dependency set.
///
/// Among nodes that become eligible at the same time, the one registered
/// first is emitted first.
pub fn kahns_topological_sort(registry: &NodeRegistry) -> Result<TopologicalOrder<'_>, BuilderError> {
    let sets = build_dependency_sets(registry)?;
    let order = kahns_order(registry, sets)?;
    Ok(TopologicalOrder {
        registry,
        order: order.into_iter(),
    })
}

fn kahns_order(registry: &NodeRegistry, sets: DependencySets) -> Result<Vec<usize>, BuilderError> {
    let DependencySets {
        direct: mut remaining,
        reverse,
    } = sets;
    let count = remaining.len();

    // 1. Seed with nodes that depend on nothing
    let mut candidates: BinaryHeap<Reverse<usize>> = remaining
        .iter()
        .enumerate()
        .filter(|(_, deps)| deps.is_empty())
        .map(|(pos, _)| Reverse(pos))
        .collect();

    // 2. Emit the earliest-registered candidate, release its dependents
    let mut order = Vec::with_capacity(count);
    let mut emitted = vec![false; count];
    while let Some(Reverse(pos)) = candidates.pop() {
        emitted[pos] = true;
        order.push(pos);

        for &dependent in &reverse[pos] {
            let deps = &mut remaining[dependent];
            if deps.remove(&pos) && deps.is_empty() {
                candidates.push(Reverse(dependent));
            }
        }
    }

    // 3. Every node must have been emitted exactly once
    if order.len() != count {
        let diagnostics = cycle_diagnostics(registry, &remaining, &reverse, &emitted);
        error!(
            unresolved = ?diagnostics.unresolved,
            remaining = ?diagnostics.remaining,
            reverse = ?diagnostics.reverse,
            emitted = diagnostics.emitted.len(),
            "Fail because there is at least one cycle in the dependencies"
        );
        return Err(BuilderError::CyclicDependency(Box::new(diagnostics)));
    }

    debug!(nodes = count, "Topological sort complete");
    Ok(order)
}

fn cycle_diagnostics(
    registry: &NodeRegistry,
    remaining: &[BTreeSet<usize>],
    reverse: &[BTreeSet<usize>],
    emitted: &[bool],
) -> CycleDiagnostics {
    let name = |pos: usize| registry.node_at(pos).name.clone();
    let names = |set: &BTreeSet<usize>| set.iter().map(|&pos| name(pos)).collect::<BTreeSet<_>>();

    let mut diagnostics = CycleDiagnostics::default();
    for (pos, done) in emitted.iter().enumerate() {
        if *done {
            diagnostics.emitted.insert(name(pos));
        } else {
            diagnostics.unresolved.insert(name(pos));
            diagnostics.remaining.insert(name(pos), names(&remaining[pos]));
        }
    }
    diagnostics.reverse = reverse
        .iter()
        .enumerate()
        .filter(|(_, dependents)| !dependents.is_empty())
        .map(|(pos, dependents)| (name(pos), names(dependents)))
        .collect::<BTreeMap<_, _>>();

    diagnostics
}
