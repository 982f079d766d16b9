//! Typed locations inside a rendered project.
//!
//! Rules never build paths from strings. Each [`ProjectPath`] resolves against a
//! [`ResolvedConfiguration`] into a path relative to the project root, so the
//! pairing of a predicate with the files it touches stays visible in one place.

use crate::config::ResolvedConfiguration;
use crate::constants::{files, options};
use crate::error::{Error, Result};
use std::fmt;
use std::path::PathBuf;

/// The documentation framework a project was generated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocsFlavor {
    Sphinx,
    MkDocs,
}

impl DocsFlavor {
    /// Returns `None` when the project has no documentation.
    pub fn from_config(config: &ResolvedConfiguration) -> Option<Self> {
        match config.get(options::DOCUMENTATION_FRAMEWORK) {
            Some("Sphinx") => Some(DocsFlavor::Sphinx),
            Some("MkDocs") => Some(DocsFlavor::MkDocs),
            _ => None,
        }
    }

    /// Extension of the doc pages this framework reads.
    pub fn extension(self) -> &'static str {
        match self {
            DocsFlavor::Sphinx => "rst",
            DocsFlavor::MkDocs => "markdown",
        }
    }

    /// Extension of the pages rendered for the other framework.
    pub fn unused_extension(self) -> &'static str {
        match self {
            DocsFlavor::Sphinx => DocsFlavor::MkDocs.extension(),
            DocsFlavor::MkDocs => DocsFlavor::Sphinx.extension(),
        }
    }
}

/// A file or directory of the project skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectPath {
    CliModule,
    MainModule,
    SetupScript,
    License,
    Authors,
    DocsDir,
    DocsSource,
    SphinxConf,
    MkDocsConfig,
    /// The configuration file of the framework that was not chosen.
    UnusedDocsConfig,
    /// The authors page in the kept documentation flavor.
    DocsAuthorsPage,
    NoxFile,
    ToxFile,
    PytestConfig,
    FixtureModule,
    TestsDir,
}

impl ProjectPath {
    /// Resolves this location to a path relative to the project root.
    ///
    /// # Errors
    /// * `Error::RuleError` if the location depends on an option value the
    ///   configuration does not provide (e.g. a docs page without a docs framework)
    pub fn resolve(self, config: &ResolvedConfiguration) -> Result<PathBuf> {
        let path = match self {
            ProjectPath::CliModule => package_dir(config)?.join(files::CLI_MODULE),
            ProjectPath::MainModule => package_dir(config)?.join(files::MAIN_MODULE),
            ProjectPath::SetupScript => PathBuf::from(files::SETUP),
            ProjectPath::License => PathBuf::from(files::LICENSE),
            ProjectPath::Authors => PathBuf::from(files::AUTHORS),
            ProjectPath::DocsDir => PathBuf::from(files::DOCS_DIR),
            ProjectPath::DocsSource => docs_source(),
            ProjectPath::SphinxConf => docs_source().join(files::SPHINX_CONF),
            ProjectPath::MkDocsConfig => PathBuf::from(files::MKDOCS_CONFIG),
            ProjectPath::UnusedDocsConfig => match docs_flavor(config, self)? {
                DocsFlavor::Sphinx => ProjectPath::MkDocsConfig.resolve(config)?,
                DocsFlavor::MkDocs => ProjectPath::SphinxConf.resolve(config)?,
            },
            ProjectPath::DocsAuthorsPage => {
                let flavor = docs_flavor(config, self)?;
                docs_source().join(format!("{}.{}", files::AUTHORS_PAGE_STEM, flavor.extension()))
            }
            ProjectPath::NoxFile => PathBuf::from(files::NOX_FILE),
            ProjectPath::ToxFile => PathBuf::from(files::TOX_FILE),
            ProjectPath::PytestConfig => PathBuf::from(files::PYTEST_CONFIG),
            ProjectPath::FixtureModule => PathBuf::from(files::FIXTURE_MODULE),
            ProjectPath::TestsDir => PathBuf::from(files::TESTS_DIR),
        };
        Ok(path)
    }
}

impl fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProjectPath::CliModule => "cli module",
            ProjectPath::MainModule => "executable module",
            ProjectPath::SetupScript => "setup script",
            ProjectPath::License => "license file",
            ProjectPath::Authors => "authors file",
            ProjectPath::DocsDir => "docs directory",
            ProjectPath::DocsSource => "docs source tree",
            ProjectPath::SphinxConf => "sphinx conf",
            ProjectPath::MkDocsConfig => "mkdocs config",
            ProjectPath::UnusedDocsConfig => "unused docs config",
            ProjectPath::DocsAuthorsPage => "docs authors page",
            ProjectPath::NoxFile => "nox config",
            ProjectPath::ToxFile => "tox config",
            ProjectPath::PytestConfig => "pytest config",
            ProjectPath::FixtureModule => "test fixture module",
            ProjectPath::TestsDir => "tests directory",
        };
        write!(f, "{name}")
    }
}

fn package_dir(config: &ResolvedConfiguration) -> Result<PathBuf> {
    let slug = config
        .get(options::PROJECT_SLUG)
        .ok_or_else(|| Error::RuleError(format!("option '{}' is not set", options::PROJECT_SLUG)))?;
    Ok(PathBuf::from(files::SRC_DIR).join(slug))
}

fn docs_source() -> PathBuf {
    PathBuf::from(files::DOCS_DIR).join(files::DOCS_SOURCE_DIR)
}

fn docs_flavor(config: &ResolvedConfiguration, path: ProjectPath) -> Result<DocsFlavor> {
    DocsFlavor::from_config(config)
        .ok_or_else(|| Error::RuleError(format!("{path} requires a documentation framework")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OptionModel, Overrides};

    fn config(pairs: &[(&str, &str)]) -> ResolvedConfiguration {
        let overrides: Overrides = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        OptionModel::standard().resolve(&overrides).unwrap()
    }

    #[test]
    fn test_package_paths_follow_slug() {
        let config = config(&[("project_slug", "jar")]);
        assert_eq!(ProjectPath::CliModule.resolve(&config).unwrap(), PathBuf::from("src/jar/cli.py"));
        assert_eq!(
            ProjectPath::MainModule.resolve(&config).unwrap(),
            PathBuf::from("src/jar/__main__.py")
        );
    }

    #[test]
    fn test_unused_docs_config() {
        let sphinx = config(&[("documentation_framework", "Sphinx")]);
        let mkdocs = config(&[("documentation_framework", "MkDocs")]);
        assert_eq!(ProjectPath::UnusedDocsConfig.resolve(&sphinx).unwrap(), PathBuf::from("mkdocs.yml"));
        assert_eq!(
            ProjectPath::UnusedDocsConfig.resolve(&mkdocs).unwrap(),
            PathBuf::from("docs/source/conf.py")
        );
    }

    #[test]
    fn test_docs_paths_need_a_framework() {
        let none = config(&[("documentation_framework", "None")]);
        assert!(matches!(ProjectPath::DocsAuthorsPage.resolve(&none), Err(Error::RuleError(_))));
        assert_eq!(
            ProjectPath::DocsAuthorsPage.resolve(&config(&[])).unwrap(),
            PathBuf::from("docs/source/authors.rst")
        );
    }
}
