//! Domain invariants for the DAG Builder

use super::entities::DagNode;
use super::registry::NodeRegistry;
use std::collections::HashSet;

/// INVARIANT-1: Dependency Order
/// Every member of a node's full dependency set is emitted strictly before it.
pub fn invariant_dependency_order(order: &[&DagNode], registry: &NodeRegistry) -> bool {
    let mut emitted: HashSet<&str> = HashSet::new();

    for node in order {
        let all_emitted = node
            .dependencies(registry.native_token())
            .into_iter()
            .all(|dep| emitted.contains(dep));
        if !all_emitted {
            return false;
        }
        emitted.insert(node.name.as_str());
    }

    true
}

/// INVARIANT-2: Completeness
/// Every registered node is emitted exactly once.
pub fn invariant_completeness(order: &[&DagNode], registry: &NodeRegistry) -> bool {
    let mut seen: HashSet<&str> = HashSet::new();
    for node in order {
        if !seen.insert(node.name.as_str()) {
            return false; // emitted twice
        }
    }

    seen.len() == registry.len() && registry.iter().all(|node| seen.contains(node.name.as_str()))
}

/// INVARIANT-3: No Cycles
/// The union of all dependency relations forms a DAG.
pub fn invariant_no_cycles(registry: &NodeRegistry) -> bool {
    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();

    for node in registry.iter() {
        if has_cycle_dfs(registry, &node.name, &mut visited, &mut rec_stack) {
            return false;
        }
    }

    true
}

fn has_cycle_dfs<'a>(
    registry: &'a NodeRegistry,
    name: &'a str,
    visited: &mut HashSet<&'a str>,
    rec_stack: &mut HashSet<&'a str>,
) -> bool {
    if rec_stack.contains(name) {
        return true; // Back edge found - cycle!
    }

    if visited.contains(name) {
        return false;
    }

    visited.insert(name);
    rec_stack.insert(name);

    if let Ok(node) = registry.get(name) {
        for dep in node.dependencies(registry.native_token()) {
            if has_cycle_dfs(registry, dep, visited, rec_stack) {
                return true;
            }
        }
    }

    rec_stack.remove(name);
    false
}
