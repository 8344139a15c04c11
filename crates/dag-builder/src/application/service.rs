//! DAG Builder Service
//!
//! Main service implementing DagBuilderApi.

use crate::algorithms::{kahns_topological_sort, TopologicalOrder};
use crate::config::BuilderConfig;
use crate::domain::entities::DagArtifacts;
use crate::domain::errors::BuilderError;
use crate::domain::registry::NodeRegistry;
use crate::domain::tokens::Token;
use crate::domain::value_objects::Attributes;
use crate::ports::inbound::DagBuilderApi;
use crate::ports::outbound::{Exporter, Filler, Tokenizer};

use tracing::{debug, info, warn};

/// DAG Builder
///
/// Orchestrates the build pipeline:
/// 1. Record tokens into the node registry
/// 2. Fill node attributes
/// 3. Execute Kahn's algorithm
/// 4. Export vertices in dependency order
///
/// A failed recording operation may leave the registry half-applied. From
/// then on every recording, sorting and build call returns
/// [`BuilderError::Poisoned`].
pub struct DagBuilder<T, F, E> {
    config: BuilderConfig,
    registry: NodeRegistry,
    /// First recording failure, if any
    failure: Option<String>,
    tokenizer: T,
    filler: F,
    exporter: E,
}

impl<T, F, E> DagBuilder<T, F, E>
where
    T: Tokenizer,
    F: Filler,
    E: Exporter,
{
    /// Create a new builder with default config
    pub fn new(tokenizer: T, filler: F, exporter: E) -> Self {
        Self::with_config(BuilderConfig::default(), tokenizer, filler, exporter)
    }

    /// Create a new builder with custom config
    pub fn with_config(config: BuilderConfig, tokenizer: T, filler: F, exporter: E) -> Self {
        Self {
            registry: NodeRegistry::new(&config),
            failure: None,
            config,
            tokenizer,
            filler,
            exporter,
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn filler(&self) -> &F {
        &self.filler
    }

    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    /// Message of the recording failure that poisoned this builder.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Dispatch a single token to the recorder.
    pub fn parse_token(&mut self, token: Token) -> Result<(), BuilderError> {
        self.record(|registry| dispatch(registry, token))
    }

    fn ensure_usable(&self) -> Result<(), BuilderError> {
        match &self.failure {
            Some(cause) => Err(BuilderError::Poisoned(cause.clone())),
            None => Ok(()),
        }
    }

    fn poison(&mut self, err: BuilderError) -> BuilderError {
        warn!(error = %err, "Recording failed, builder poisoned");
        self.failure = Some(err.to_string());
        err
    }

    /// Run one recorder operation, poisoning the builder on failure.
    fn record(
        &mut self,
        op: impl FnOnce(&mut NodeRegistry) -> Result<(), BuilderError>,
    ) -> Result<(), BuilderError> {
        self.ensure_usable()?;
        op(&mut self.registry).map_err(|err| self.poison(err))
    }

    pub fn add_parent_edge(&mut self, from: &str, to: &str) -> Result<&mut Self, BuilderError> {
        self.record(|registry| registry.add_parent_edge(from, to))?;
        Ok(self)
    }

    pub fn add_spending_edge(
        &mut self,
        from: &str,
        to: &str,
        index: usize,
    ) -> Result<&mut Self, BuilderError> {
        self.record(|registry| registry.add_spending_edge(from, to, index))?;
        Ok(self)
    }

    pub fn set_output(
        &mut self,
        name: &str,
        index: usize,
        amount: u64,
        token: &str,
        attrs: Attributes,
    ) -> Result<&mut Self, BuilderError> {
        self.record(|registry| registry.set_output(name, index, amount, token, attrs))?;
        Ok(self)
    }

    pub fn add_deps(&mut self, from: &str, to: &str) -> Result<&mut Self, BuilderError> {
        self.record(|registry| registry.add_deps(from, to))?;
        Ok(self)
    }

    pub fn add_attribute(
        &mut self,
        name: &str,
        key: &str,
        value: &str,
    ) -> Result<&mut Self, BuilderError> {
        self.record(|registry| registry.add_attribute(name, key, value))?;
        Ok(self)
    }

    pub fn add_blockchain(
        &mut self,
        prefix: &str,
        first_parent: Option<&str>,
        begin: usize,
        end: usize,
    ) -> Result<&mut Self, BuilderError> {
        self.record(|registry| registry.add_blockchain(prefix, first_parent, begin, end))?;
        Ok(self)
    }
}

impl<T, F, E> DagBuilderApi for DagBuilder<T, F, E>
where
    T: Tokenizer,
    F: Filler,
    E: Exporter,
{
    type Vertex = E::Vertex;

    fn parse_tokens<I>(&mut self, tokens: I) -> Result<(), BuilderError>
    where
        I: IntoIterator<Item = Token>,
    {
        for token in tokens {
            self.parse_token(token)?;
        }
        Ok(())
    }

    fn build(&mut self) -> Result<DagArtifacts<Self::Vertex>, BuilderError> {
        self.ensure_usable()?;
        info!(nodes = self.registry.len(), "Building DAG");

        // 1. Fill attributes
        self.filler.fill(&mut self.registry.fill_view())?;

        // 2. Sort, refusing cyclic graphs before the exporter sees anything
        let order = kahns_topological_sort(&self.registry)?;

        // 3. Export
        let vertices = self.exporter.export(order)?;
        let artifacts = DagArtifacts::new(vertices);

        info!(
            nodes = self.registry.len(),
            vertices = artifacts.len(),
            "DAG build complete"
        );

        Ok(artifacts)
    }

    fn build_from_source(
        &mut self,
        source: &str,
    ) -> Result<DagArtifacts<Self::Vertex>, BuilderError> {
        self.ensure_usable()?;
        info!(bytes = source.len(), "Tokenizing DAG source");

        let mut failure = None;
        for token in self.tokenizer.tokenize(source) {
            let recorded = token
                .map_err(BuilderError::from)
                .and_then(|token| dispatch(&mut self.registry, token));
            if let Err(err) = recorded {
                failure = Some(err);
                break;
            }
        }
        if let Some(err) = failure {
            return Err(self.poison(err));
        }

        self.build()
    }

    fn topological_sort(&self) -> Result<TopologicalOrder<'_>, BuilderError> {
        self.ensure_usable()?;
        kahns_topological_sort(&self.registry)
    }
}

/// Route a token to the matching recorder operation.
fn dispatch(registry: &mut NodeRegistry, token: Token) -> Result<(), BuilderError> {
    debug!(token = token.tag(), "Parsing token");
    match token {
        Token::Parent { from, to } => registry.add_parent_edge(&from, &to),
        Token::Spend { from, to, index } => registry.add_spending_edge(&from, &to, index),
        Token::Attribute { name, key, value } => registry.add_attribute(&name, &key, &value),
        Token::OrderBefore { from, to } => registry.add_deps(&from, &to),
        Token::Output {
            name,
            index,
            amount,
            token,
            attrs,
        } => registry.set_output(&name, index, amount, &token, attrs),
        Token::Blockchain {
            prefix,
            first_parent,
            begin,
            end,
        } => registry.add_blockchain(&prefix, first_parent.as_deref(), begin, end),
        Token::Other { tag, .. } => Err(BuilderError::UnsupportedToken(tag)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::NodeKind;
    use crate::ports::outbound::mocks::{MockExporter, MockFiller, MockTokenizer};

    type TestBuilder = DagBuilder<MockTokenizer, MockFiller, MockExporter>;

    fn make_builder() -> TestBuilder {
        DagBuilder::new(
            MockTokenizer::default(),
            MockFiller::default(),
            MockExporter::default(),
        )
    }

    fn s(value: &str) -> String {
        value.to_string()
    }

    fn scenario_tokens() -> Vec<Token> {
        vec![
            Token::Blockchain {
                prefix: s("blk"),
                first_parent: None,
                begin: 0,
                end: 1,
            },
            Token::Output {
                name: s("blk0"),
                index: 0,
                amount: 100,
                token: s("HTR"),
                attrs: Attributes::new(),
            },
            Token::Spend {
                from: s("tx1"),
                to: s("blk0"),
                index: 0,
            },
        ]
    }

    #[test]
    fn test_parse_tokens_dispatches_every_variant() {
        let mut builder = make_builder();
        builder
            .parse_tokens(vec![
                Token::Parent {
                    from: s("b1"),
                    to: s("b0"),
                },
                Token::Spend {
                    from: s("tx1"),
                    to: s("b0"),
                    index: 1,
                },
                Token::Attribute {
                    name: s("tx1"),
                    key: s("type"),
                    value: s("transaction"),
                },
                Token::OrderBefore {
                    from: s("tx2"),
                    to: s("tx1"),
                },
                Token::Output {
                    name: s("tx2"),
                    index: 0,
                    amount: 5,
                    token: s("TK1"),
                    attrs: Attributes::new(),
                },
                Token::Blockchain {
                    prefix: s("a"),
                    first_parent: Some(s("b1")),
                    begin: 0,
                    end: 0,
                },
            ])
            .unwrap();

        let reg = builder.registry();
        assert!(reg.get("b1").unwrap().parents.contains("b0"));
        assert_eq!(reg.get("b0").unwrap().outputs.len(), 2);
        assert_eq!(reg.get("tx1").unwrap().kind, NodeKind::Transaction);
        assert!(reg.get("tx2").unwrap().deps.contains("tx1"));
        assert!(reg.get("tx2").unwrap().deps.contains("TK1"));
        assert_eq!(reg.get("TK1").unwrap().kind, NodeKind::Token);
        assert!(reg.get("a0").unwrap().parents.contains("b1"));
    }

    #[test]
    fn test_unsupported_token() {
        let mut builder = make_builder();
        let result = builder.parse_tokens(vec![Token::Other {
            tag: s("NC_CALL"),
            args: vec![s("tx1")],
        }]);

        assert!(matches!(result, Err(BuilderError::UnsupportedToken(tag)) if tag == "NC_CALL"));
    }

    #[test]
    fn test_parse_stops_at_first_error() {
        let mut builder = make_builder();
        let result = builder.parse_tokens(vec![
            Token::Attribute {
                name: s("b1"),
                key: s("type"),
                value: s("block"),
            },
            Token::Attribute {
                name: s("b1"),
                key: s("type"),
                value: s("token"),
            },
            Token::Parent {
                from: s("never"),
                to: s("b1"),
            },
        ]);

        assert!(matches!(result, Err(BuilderError::KindMismatch { .. })));
        assert!(!builder.registry().contains("never"));
    }

    #[test]
    fn test_build_refused_after_failed_parse() {
        let mut builder = make_builder();
        let result = builder.parse_tokens(vec![
            Token::Attribute {
                name: s("TK1"),
                key: s("type"),
                value: s("block"),
            },
            Token::Output {
                name: s("tx1"),
                index: 0,
                amount: 5,
                token: s("TK1"),
                attrs: Attributes::new(),
            },
        ]);
        assert!(matches!(result, Err(BuilderError::KindMismatch { .. })));
        assert!(builder.failure().is_some());

        assert!(matches!(builder.build(), Err(BuilderError::Poisoned(_))));
        assert!(matches!(
            builder.topological_sort(),
            Err(BuilderError::Poisoned(_))
        ));
        assert_eq!(builder.filler().runs, 0);
        assert_eq!(builder.exporter().calls, 0);
    }

    #[test]
    fn test_recording_refused_after_failure() {
        let mut builder = make_builder();
        assert!(builder.add_spending_edge("tx1", "b0", usize::MAX).is_err());

        let result = builder.add_parent_edge("b1", "b0");
        assert!(matches!(result, Err(BuilderError::Poisoned(cause)) if cause.contains("b0")));
        assert!(builder.registry().is_empty());
    }

    #[test]
    fn test_build_from_source_failure_poisons() {
        let mut builder = make_builder();
        assert!(builder.build_from_source("garbage").is_err());

        assert!(matches!(builder.build(), Err(BuilderError::Poisoned(_))));
    }

    #[test]
    fn test_cycle_does_not_poison() {
        let mut builder = make_builder();
        builder.add_deps("A", "B").unwrap().add_deps("B", "A").unwrap();
        assert!(builder.build().is_err());

        assert!(builder.failure().is_none());
        assert!(matches!(
            builder.build(),
            Err(BuilderError::CyclicDependency(_))
        ));
    }

    #[test]
    fn test_build_end_to_end() {
        let mut builder = make_builder();
        builder.parse_tokens(scenario_tokens()).unwrap();

        let artifacts = builder.build().unwrap();

        assert_eq!(
            artifacts.names().collect::<Vec<_>>(),
            vec!["blk0", "blk1", "tx1"]
        );
        assert_eq!(artifacts.get("blk1").map(String::as_str), Some("block"));
        assert_eq!(builder.filler().runs, 1);
        assert_eq!(builder.exporter().calls, 1);
        // filler ran before export
        assert!(builder.registry().get("tx1").unwrap().attrs.contains_key("timestamp"));
    }

    #[test]
    fn test_build_from_source() {
        let tokenizer = MockTokenizer::default().with_script("blk0 <-- tx1", scenario_tokens());
        let mut builder = DagBuilder::new(tokenizer, MockFiller::default(), MockExporter::default());

        let artifacts = builder.build_from_source("blk0 <-- tx1").unwrap();

        assert_eq!(artifacts.len(), 3);
    }

    #[test]
    fn test_build_from_source_tokenize_error() {
        let mut builder = make_builder();
        let result = builder.build_from_source("garbage");

        assert!(matches!(result, Err(BuilderError::Tokenize(_))));
        assert_eq!(builder.exporter().calls, 0);
    }

    #[test]
    fn test_cycle_never_reaches_exporter() {
        let mut builder = make_builder();
        builder.add_deps("A", "B").unwrap().add_deps("B", "A").unwrap();

        let result = builder.build();

        assert!(matches!(result, Err(BuilderError::CyclicDependency(_))));
        assert_eq!(builder.exporter().calls, 0);
    }

    #[test]
    fn test_fluent_recorder() {
        let mut builder = make_builder();
        builder
            .add_blockchain("b", None, 0, 1)
            .unwrap()
            .add_parent_edge("tx1", "b1")
            .unwrap()
            .set_output("tx1", 0, 10, "HTR", Attributes::new())
            .unwrap()
            .add_spending_edge("tx2", "tx1", 0)
            .unwrap()
            .add_attribute("tx2", "type", "transaction")
            .unwrap();

        let names: Vec<_> = builder
            .topological_sort()
            .unwrap()
            .map(|node| node.name.as_str())
            .collect();
        assert_eq!(names, vec!["b0", "b1", "tx1", "tx2"]);
    }

    #[test]
    fn test_custom_native_token() {
        let config = BuilderConfig {
            native_token: s("QCH"),
            ..Default::default()
        };
        let mut builder = DagBuilder::with_config(
            config,
            MockTokenizer::default(),
            MockFiller::default(),
            MockExporter::default(),
        );
        builder
            .set_output("tx1", 0, 1, "QCH", Attributes::new())
            .unwrap()
            .set_output("tx1", 1, 1, "HTR", Attributes::new())
            .unwrap();

        assert_eq!(builder.config().native_token, "QCH");
        assert!(!builder.registry().contains("QCH"));
        assert_eq!(builder.registry().get("HTR").unwrap().kind, NodeKind::Token);
    }
}
