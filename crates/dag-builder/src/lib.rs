//! # DAG Builder
//!
//! Turns a declarative description of ledger entries (blocks, transactions,
//! tokens) and their relationships into a validated, acyclic dependency graph,
//! then yields the entries in an order that respects every relationship.
//!
//! ## Architecture
//!
//! - **Domain**: Node registry, relationship recorder, tokens, invariants
//! - **Algorithms**: Dependency sets, Kahn's sort
//! - **Ports**: Inbound (DagBuilderApi) and Outbound (Tokenizer, Filler, Exporter)
//! - **Application**: Build orchestration
//!
//! ## Relationships
//!
//! A node's full dependency set is the union of its parents, the sources of
//! the outputs it spends, its explicit ordering dependencies and the tokens
//! its outputs are denominated in. That union must be acyclic.

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use algorithms::TopologicalOrder;
pub use application::service::DagBuilder;
pub use config::BuilderConfig;
pub use domain::entities::*;
pub use domain::errors::{BuilderError, CycleDiagnostics, ExportError, FillError, TokenizeError};
pub use domain::registry::NodeRegistry;
pub use domain::tokens::Token;
pub use domain::value_objects::*;
pub use ports::inbound::DagBuilderApi;
pub use ports::outbound::{Exporter, Filler, Tokenizer};
