//! Inbound Ports (Driving Ports / API)

use crate::algorithms::TopologicalOrder;
use crate::domain::entities::DagArtifacts;
use crate::domain::errors::BuilderError;
use crate::domain::tokens::Token;

/// Primary DAG Builder API
pub trait DagBuilderApi {
    type Vertex;

    /// Feed a token stream into the relationship recorder.
    ///
    /// Stops at the first failing token. The builder is poisoned afterwards:
    /// later recording, sorting and build calls return
    /// [`BuilderError::Poisoned`].
    fn parse_tokens<I>(&mut self, tokens: I) -> Result<(), BuilderError>
    where
        I: IntoIterator<Item = Token>;

    /// Build all vertices from the current registry.
    ///
    /// This:
    /// 1. Runs the filler over every node
    /// 2. Sorts the registry topologically
    /// 3. Hands the order to the exporter
    fn build(&mut self) -> Result<DagArtifacts<Self::Vertex>, BuilderError>;

    /// Tokenize `source`, parse the tokens, then [`DagBuilderApi::build`].
    fn build_from_source(&mut self, source: &str)
        -> Result<DagArtifacts<Self::Vertex>, BuilderError>;

    /// Nodes in dependency order.
    fn topological_sort(&self) -> Result<TopologicalOrder<'_>, BuilderError>;
}
