//! Ordered post-generation rules.
//!
//! Every rule pairs a predicate over the resolved configuration with the
//! file-system actions it implies. Predicates never look at the tree, so the
//! set of rules that will fire is known before anything is touched.
//!
//! Ordering of rules that touch overlapping paths:
//! - `remove-docs` and the `docs-*` rules are exclusive (the latter need a framework).
//!   `remove-docs` also takes the root mkdocs config, which otherwise only
//!   `docs-unused-config` would remove.
//! - `docs-unused-config` runs before `docs-requote-author`, which edits the conf
//!   file that the former keeps for Sphinx projects.
//! - `docs-unused-pages` runs before `docs-authors-page`; the page it removes has
//!   the kept extension, so the two never target the same file.
//! - `nox` and `tox` are exclusive; exactly one fires.

use crate::config::ResolvedConfiguration;
use crate::constants::options;
use crate::error::Result;
use crate::layout::{DocsFlavor, ProjectPath};
use crate::rewrite::{rewrite_quoted, unescape_entities};
use crate::tree::ProjectTree;
use log::{debug, info};
use std::fmt;

/// A file-system mutation performed by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    DeleteFile(ProjectPath),
    /// Recursive.
    DeleteDir(ProjectPath),
    /// Deletes every file below the directory carrying the unused docs extension.
    DeleteUnusedDocPages(ProjectPath),
    /// Requotes the value of a free-text option inside a file.
    RewriteQuoted { file: ProjectPath, option: &'static str },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::DeleteFile(path) => write!(f, "delete {path}"),
            Action::DeleteDir(path) => write!(f, "delete {path} recursively"),
            Action::DeleteUnusedDocPages(path) => write!(f, "prune unused pages in {path}"),
            Action::RewriteQuoted { file, option } => write!(f, "requote {option} in {file}"),
        }
    }
}

/// What running an action changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionEffect {
    pub removed: usize,
    pub rewritten: usize,
}

impl Action {
    fn run(&self, rule: &str, tree: &mut ProjectTree, config: &ResolvedConfiguration) -> Result<ActionEffect> {
        let mut effect = ActionEffect::default();
        match *self {
            Action::DeleteFile(path) => {
                effect.removed += tree.delete_file(rule, &path.resolve(config)?)? as usize;
            }
            Action::DeleteDir(path) => {
                effect.removed += tree.delete_dir(rule, &path.resolve(config)?)? as usize;
            }
            Action::DeleteUnusedDocPages(path) => {
                let Some(flavor) = DocsFlavor::from_config(config) else {
                    return Ok(effect);
                };
                effect.removed +=
                    tree.delete_with_extension(rule, &path.resolve(config)?, flavor.unused_extension())?;
            }
            Action::RewriteQuoted { file, option } => {
                let relative = file.resolve(config)?;
                if !tree.require(rule, &relative)? {
                    return Ok(effect);
                }
                let value = unescape_entities(config.get(option).unwrap_or_default());
                let outcome = rewrite_quoted(tree.path(&relative), &value)?;
                effect.rewritten += outcome.changed() as usize;
            }
        }
        Ok(effect)
    }
}

/// A predicate over the configuration and the actions it triggers, in order.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: &'static str,
    pub when: fn(&ResolvedConfiguration) -> bool,
    pub actions: Vec<Action>,
}

impl Rule {
    pub fn new(name: &'static str, when: fn(&ResolvedConfiguration) -> bool, actions: Vec<Action>) -> Self {
        Self { name, when, actions }
    }

    pub fn applies(&self, config: &ResolvedConfiguration) -> bool {
        (self.when)(config)
    }
}

/// An immutable, ordered rule table.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The rule table for the python package skeleton.
    pub fn standard() -> Self {
        use Action::*;
        use ProjectPath::*;

        Self::new(vec![
            Rule::new(
                "remove-cli",
                |c| c.is(options::COMMAND_LINE_INTERFACE, "None"),
                vec![DeleteFile(CliModule), DeleteFile(MainModule)],
            ),
            Rule::new("remove-license", |c| c.is(options::LICENSE, "Other"), vec![DeleteFile(License)]),
            Rule::new(
                "remove-authors",
                |c| !c.is(options::CREATE_AUTHOR_FILE, "y"),
                vec![DeleteFile(Authors)],
            ),
            Rule::new(
                "remove-docs",
                |c| DocsFlavor::from_config(c).is_none(),
                vec![DeleteDir(DocsDir), DeleteFile(MkDocsConfig)],
            ),
            Rule::new(
                "docs-unused-config",
                |c| DocsFlavor::from_config(c).is_some(),
                vec![DeleteFile(UnusedDocsConfig)],
            ),
            Rule::new(
                "docs-unused-pages",
                |c| DocsFlavor::from_config(c).is_some(),
                vec![DeleteUnusedDocPages(DocsSource)],
            ),
            Rule::new(
                "docs-authors-page",
                |c| DocsFlavor::from_config(c).is_some() && !c.is(options::CREATE_AUTHOR_FILE, "y"),
                vec![DeleteFile(DocsAuthorsPage)],
            ),
            Rule::new(
                "docs-requote-author",
                |c| {
                    DocsFlavor::from_config(c) == Some(DocsFlavor::Sphinx)
                        && unescape_entities(c.get(options::FULL_NAME).unwrap_or_default()).contains('"')
                },
                vec![RewriteQuoted { file: SphinxConf, option: options::FULL_NAME }],
            ),
            Rule::new(
                "remove-nox",
                |c| !c.is(options::TEST_AUTOMATION_TOOL, "Nox"),
                vec![DeleteFile(NoxFile)],
            ),
            Rule::new(
                "remove-tox",
                |c| c.is(options::TEST_AUTOMATION_TOOL, "Nox"),
                vec![DeleteFile(ToxFile)],
            ),
            Rule::new(
                "remove-tests",
                |c| !c.is(options::HAVE_TESTS, "y"),
                vec![DeleteFile(PytestConfig), DeleteFile(FixtureModule), DeleteDir(TestsDir)],
            ),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::standard()
    }
}

/// Summary of one engine pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineReport {
    pub fired: Vec<&'static str>,
    pub removed: usize,
    pub rewritten: usize,
}

/// Applies a [`RuleSet`] to project trees.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: RuleSet,
}

impl RuleEngine {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Returns the rules that fire for `config`, in execution order.
    pub fn plan<'a>(&'a self, config: &ResolvedConfiguration) -> Vec<&'a Rule> {
        self.rules.iter().filter(|rule| rule.applies(config)).collect()
    }

    /// Runs every applicable rule against `tree` in declared order.
    ///
    /// # Errors
    /// * `Error::MissingExpectedPath` if a rule targets a path a freshly rendered tree lacks
    /// * Any IO error raised while deleting or rewriting
    pub fn apply(&self, tree: &mut ProjectTree, config: &ResolvedConfiguration) -> Result<EngineReport> {
        let mut report = EngineReport::default();

        for rule in self.rules.iter() {
            if !rule.applies(config) {
                debug!("Rule '{}' skipped", rule.name);
                continue;
            }
            info!("Applying rule '{}'", rule.name);
            for action in &rule.actions {
                debug!("[{}] {action}", rule.name);
                let effect = action.run(rule.name, tree, config)?;
                report.removed += effect.removed;
                report.rewritten += effect.rewritten;
            }
            report.fired.push(rule.name);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OptionModel, Overrides};

    fn config(pairs: &[(&str, &str)]) -> ResolvedConfiguration {
        let overrides: Overrides = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        OptionModel::standard().resolve(&overrides).unwrap()
    }

    fn planned(pairs: &[(&str, &str)]) -> Vec<&'static str> {
        let engine = RuleEngine::new(RuleSet::standard());
        engine.plan(&config(pairs)).iter().map(|r| r.name).collect()
    }

    #[test]
    fn test_defaults_plan() {
        assert_eq!(planned(&[]), vec!["docs-unused-config", "docs-unused-pages", "remove-nox"]);
    }

    #[test]
    fn test_no_docs_short_circuits_docs_rules() {
        let plan = planned(&[("documentation_framework", "None"), ("create_author_file", "n")]);
        assert_eq!(plan, vec!["remove-authors", "remove-docs", "remove-nox"]);
    }

    #[test]
    fn test_remove_docs_takes_both_configs() {
        let rules = RuleSet::standard();
        let rule = rules.iter().find(|r| r.name == "remove-docs").unwrap();
        assert!(rule.actions.contains(&Action::DeleteDir(ProjectPath::DocsDir)));
        assert!(rule.actions.contains(&Action::DeleteFile(ProjectPath::MkDocsConfig)));
    }

    #[test]
    fn test_test_runner_rules_are_exclusive() {
        for tool in ["Nox", "Tox"] {
            let plan = planned(&[("test_automation_tool", tool)]);
            let fired = plan.iter().filter(|n| **n == "remove-nox" || **n == "remove-tox").count();
            assert_eq!(fired, 1);
        }
    }

    #[test]
    fn test_requote_needs_sphinx_and_a_quote() {
        let quoted = ("full_name", r#"name "quote" name"#);
        assert!(planned(&[quoted]).contains(&"docs-requote-author"));
        assert!(planned(&[("full_name", "name &quot;quote&quot; name")]).contains(&"docs-requote-author"));
        assert!(!planned(&[quoted, ("documentation_framework", "MkDocs")]).contains(&"docs-requote-author"));
        assert!(!planned(&[("full_name", "O'Connor")]).contains(&"docs-requote-author"));
    }
}
