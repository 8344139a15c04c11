//! Outbound Ports (Driven Ports / SPI)
//!
//! The tokenizer, filler and exporter are external collaborators. The
//! builder only ever talks to them through these traits.

use crate::algorithms::TopologicalOrder;
use crate::domain::entities::NodeFill;
use crate::domain::errors::{ExportError, FillError, TokenizeError};
use crate::domain::tokens::Token;

/// Script tokenizer
///
/// Turns the declarative source into a lazy stream of token records.
pub trait Tokenizer {
    fn tokenize<'a>(
        &'a self,
        source: &'a str,
    ) -> Box<dyn Iterator<Item = Result<Token, TokenizeError>> + 'a>;
}

/// Attribute filler
///
/// Completes timestamps, weights and other numeric attributes before export.
/// It sees every node but may only write `attrs`. Ledger settings and the
/// difficulty adjustment algorithm belong to the implementation.
pub trait Filler {
    fn fill(&mut self, nodes: &mut [NodeFill<'_>]) -> Result<(), FillError>;
}

/// Vertex exporter
///
/// Turns nodes, in dependency order, into resolved ledger vertices.
pub trait Exporter {
    type Vertex;

    /// Called at most once per build, with a validated order.
    fn export(
        &mut self,
        nodes: TopologicalOrder<'_>,
    ) -> Result<Vec<(String, Self::Vertex)>, ExportError>;
}
