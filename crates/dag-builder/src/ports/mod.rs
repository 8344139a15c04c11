//! Ports module for the DAG Builder
//!
//! Defines inbound (API) and outbound (SPI) port traits.

pub mod inbound;
pub mod outbound;

pub use inbound::DagBuilderApi;
pub use outbound::{Exporter, Filler, Tokenizer};
