//! Materialization driver.
//! Resolves overrides against the option model and runs the rule engine over a
//! rendered tree, turning it into the final project layout.

use crate::config::{OptionModel, Overrides, ResolvedConfiguration};
use crate::error::Result;
use crate::rules::{EngineReport, Rule, RuleEngine, RuleSet};
use crate::tree::ProjectTree;
use log::info;

/// Owns the option model and the rule table for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Materializer {
    model: OptionModel,
    engine: RuleEngine,
}

impl Materializer {
    pub fn new(model: OptionModel, rules: RuleSet) -> Self {
        Self { model, engine: RuleEngine::new(rules) }
    }

    pub fn model(&self) -> &OptionModel {
        &self.model
    }

    pub fn resolve(&self, overrides: &Overrides) -> Result<ResolvedConfiguration> {
        self.model.resolve(overrides)
    }

    /// Rules that would fire for `overrides`, without touching any tree.
    pub fn plan(&self, overrides: &Overrides) -> Result<Vec<&Rule>> {
        let config = self.resolve(overrides)?;
        Ok(self.engine.plan(&config))
    }

    /// Resolves `overrides` and materializes `tree` in place.
    ///
    /// This is destructive: files are deleted and rewritten on disk. Callers that
    /// need the rendered tree afterwards must copy it first.
    ///
    /// # Errors
    /// * `Error::UnknownOption` / `Error::InvalidOptionValue` from resolution, before any mutation
    /// * `Error::MissingExpectedPath` if the tree does not match the rule table
    pub fn materialize<'t>(
        &self,
        tree: &'t mut ProjectTree,
        overrides: &Overrides,
    ) -> Result<&'t mut ProjectTree> {
        let config = self.resolve(overrides)?;
        self.materialize_resolved(tree, &config)?;
        Ok(tree)
    }

    /// Materializes `tree` for an already resolved configuration.
    pub fn materialize_resolved(
        &self,
        tree: &mut ProjectTree,
        config: &ResolvedConfiguration,
    ) -> Result<EngineReport> {
        let report = self.engine.apply(tree, config)?;
        tree.mark_materialized();
        info!(
            "Materialized '{}': {} rule(s) fired, {} path(s) removed, {} file(s) rewritten",
            tree.root().display(),
            report.fired.len(),
            report.removed,
            report.rewritten
        );
        Ok(report)
    }
}

impl Default for Materializer {
    fn default() -> Self {
        Materializer::new(OptionModel::standard(), RuleSet::standard())
    }
}
