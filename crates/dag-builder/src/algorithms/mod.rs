//! Algorithms module for the DAG Builder
//!
//! Contains:
//! - Dependency set builder
//! - Kahn's topological sort

pub mod dependency_builder;
pub mod kahns;

pub use dependency_builder::{build_dependency_sets, DependencySets};
pub use kahns::{kahns_topological_sort, TopologicalOrder};
