//! Domain module for the DAG Builder
//!
//! Contains the node model, the registry and its relationship recorder,
//! token records, errors, and invariants.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod recorder;
pub mod registry;
pub mod tokens;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use registry::NodeRegistry;
pub use tokens::Token;
pub use value_objects::*;
