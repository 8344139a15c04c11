//! Application module for the DAG Builder

pub mod service;

pub use service::DagBuilder;
