//! Combinatorial validation of the materialization pipeline.
//!
//! The harness expands a [`CombinationSpace`] into override maps, and for each
//! one renders the skeleton into its own scratch directory, materializes it,
//! checks structural expectations and optionally runs an external tool inside
//! the result. Combinations are independent: a failure is recorded in that
//! combination's report and the remaining ones still run.

use crate::config::{OptionModel, Overrides, ResolvedConfiguration};
use crate::constants::options;
use crate::error::{Error, Result};
use crate::layout::{DocsFlavor, ProjectPath};
use crate::materialize::Materializer;
use crate::rewrite::unescape_entities;
use crate::rules::EngineReport;
use crate::skeleton::Skeleton;
use crate::tree::ProjectTree;
use chrono::Datelike;
use indexmap::IndexMap;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Option names mapped to the values to vary. Options left out keep their default.
pub type CombinationSpace = IndexMap<String, Vec<String>>;

/// Expands `space` into its Cartesian product.
///
/// Options appear in each override map in the order of `space`. An empty space
/// yields a single empty map (all defaults); an option with no values yields
/// nothing.
pub fn all_combinations(space: &CombinationSpace) -> Vec<Overrides> {
    space.iter().fold(vec![Overrides::new()], |partials, (name, values)| {
        partials
            .iter()
            .flat_map(|partial| {
                values.iter().map(move |value| {
                    let mut next = partial.clone();
                    next.insert(name.clone(), value.clone());
                    next
                })
            })
            .collect()
    })
}

/// Every closed-set option of `model` with all of its values.
pub fn full_space(model: &OptionModel) -> CombinationSpace {
    model
        .iter()
        .filter_map(|option| option.choices().map(|c| (option.name.clone(), c.to_vec())))
        .collect()
}

/// A structural assertion on a materialized tree. Paths are relative to its root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Exists(PathBuf),
    Absent(PathBuf),
    Contains { file: PathBuf, needle: String },
    Lacks { file: PathBuf, needle: String },
    /// No file below `dir` has the given extension.
    NoneMatching { dir: PathBuf, extension: String },
}

impl Check {
    pub fn contains<P: Into<PathBuf>, S: Into<String>>(file: P, needle: S) -> Self {
        Check::Contains { file: file.into(), needle: needle.into() }
    }

    pub fn lacks<P: Into<PathBuf>, S: Into<String>>(file: P, needle: S) -> Self {
        Check::Lacks { file: file.into(), needle: needle.into() }
    }

    /// # Errors
    /// * `Error::CheckFailed` if the assertion does not hold
    pub fn verify(&self, tree: &ProjectTree) -> Result<()> {
        let holds = match self {
            Check::Exists(path) => tree.exists(path),
            Check::Absent(path) => !tree.exists(path),
            Check::Contains { file, needle } => tree.read_to_string(file)?.contains(needle.as_str()),
            Check::Lacks { file, needle } => !tree.read_to_string(file)?.contains(needle.as_str()),
            Check::NoneMatching { dir, extension } => !tree.entries()?.iter().any(|entry| {
                entry.starts_with(dir)
                    && entry.extension().and_then(|e| e.to_str()) == Some(extension.as_str())
            }),
        };

        if holds {
            Ok(())
        } else {
            Err(Error::CheckFailed(self.to_string()))
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Exists(path) => write!(f, "'{}' exists", path.display()),
            Check::Absent(path) => write!(f, "'{}' is absent", path.display()),
            Check::Contains { file, needle } => write!(f, "'{}' contains {needle:?}", file.display()),
            Check::Lacks { file, needle } => write!(f, "'{}' does not contain {needle:?}", file.display()),
            Check::NoneMatching { dir, extension } => {
                write!(f, "no '*.{extension}' file under '{}'", dir.display())
            }
        }
    }
}

/// The expectations every materialized python package skeleton must meet.
pub fn expectations(config: &ResolvedConfiguration) -> Result<Vec<Check>> {
    use ProjectPath::*;
    let path = |p: ProjectPath| p.resolve(config);
    let mut checks = Vec::new();

    let setup = path(SetupScript)?;
    if config.is(options::COMMAND_LINE_INTERFACE, "None") {
        checks.push(Check::Absent(path(CliModule)?));
        checks.push(Check::Absent(path(MainModule)?));
        checks.push(Check::lacks(setup, "entry_points"));
    } else {
        checks.push(Check::Exists(path(CliModule)?));
        checks.push(Check::Exists(path(MainModule)?));
        checks.push(Check::contains(setup, "entry_points"));
    }

    if config.is(options::LICENSE, "Other") {
        checks.push(Check::Absent(path(License)?));
    } else {
        checks.push(Check::contains(path(License)?, chrono::Local::now().year().to_string()));
    }

    let authors = config.is(options::CREATE_AUTHOR_FILE, "y");
    checks.push(if authors { Check::Exists(path(Authors)?) } else { Check::Absent(path(Authors)?) });

    let flavor = DocsFlavor::from_config(config);
    match flavor {
        None => {
            checks.push(Check::Absent(path(DocsDir)?));
            checks.push(Check::Absent(path(MkDocsConfig)?));
        }
        Some(flavor) => {
            let (kept, removed) = match flavor {
                DocsFlavor::Sphinx => (SphinxConf, MkDocsConfig),
                DocsFlavor::MkDocs => (MkDocsConfig, SphinxConf),
            };
            checks.push(Check::Exists(path(kept)?));
            checks.push(Check::Absent(path(removed)?));
            checks.push(Check::NoneMatching {
                dir: path(DocsSource)?,
                extension: flavor.unused_extension().to_string(),
            });
            let page = path(DocsAuthorsPage)?;
            checks.push(if authors { Check::Exists(page) } else { Check::Absent(page) });
        }
    }

    let name = unescape_entities(config.get(options::FULL_NAME).unwrap_or_default());
    if flavor == Some(DocsFlavor::Sphinx) && name.contains('"') {
        checks.push(Check::contains(path(SphinxConf)?, format!("'{name}'")));
        checks.push(Check::lacks(path(SphinxConf)?, format!("\"{name}\"")));
    }

    if config.is(options::TEST_AUTOMATION_TOOL, "Nox") {
        let noxfile = path(NoxFile)?;
        checks.push(Check::Absent(path(ToxFile)?));
        checks.push(Check::Exists(noxfile.clone()));
        checks.push(match flavor {
            Some(DocsFlavor::Sphinx) => Check::contains(noxfile, "session.install('sphinx"),
            Some(DocsFlavor::MkDocs) => Check::contains(noxfile, "session.install('mkdocs"),
            None => Check::lacks(noxfile, "def docs("),
        });
    } else {
        checks.push(Check::Absent(path(NoxFile)?));
        checks.push(Check::Exists(path(ToxFile)?));
    }

    for tests_path in [PytestConfig, FixtureModule, TestsDir] {
        let p = path(tests_path)?;
        checks.push(if config.is(options::HAVE_TESTS, "y") { Check::Exists(p) } else { Check::Absent(p) });
    }

    Ok(checks)
}

/// A downstream tool run inside the materialized project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ExternalCommand {
    pub fn new<S: Into<String>>(program: S, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    /// Runs the command with `dir` as working directory, blocking until it exits.
    ///
    /// # Errors
    /// * `Error::ExternalToolFailure` if the command cannot start or exits non-zero
    pub fn run<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        debug!("Executing: {self} in '{}'", dir.as_ref().display());
        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(dir.as_ref())
            .output()
            .map_err(|e| Error::ExternalToolFailure { command: self.to_string(), status: e.to_string() })?;

        if output.status.success() {
            Ok(())
        } else {
            warn!("{self} failed:\n{}", String::from_utf8_lossy(&output.stderr));
            Err(Error::ExternalToolFailure { command: self.to_string(), status: output.status.to_string() })
        }
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Outcome of one combination.
#[derive(Debug)]
pub struct CombinationReport {
    pub overrides: Overrides,
    pub outcome: Result<EngineReport>,
}

impl CombinationReport {
    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

impl fmt::Display for CombinationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.overrides.is_empty() {
            "defaults".to_string()
        } else {
            self.overrides.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join(" ")
        };
        match &self.outcome {
            Ok(report) => write!(f, "ok    {label} ({} rule(s))", report.fired.len()),
            Err(e) => write!(f, "FAIL  {label}: {e}"),
        }
    }
}

/// Reports of every combination, in the order the space enumerates them.
#[derive(Debug, Default)]
pub struct MatrixReport {
    pub combinations: Vec<CombinationReport>,
}

impl MatrixReport {
    pub fn failures(&self) -> impl Iterator<Item = &CombinationReport> {
        self.combinations.iter().filter(|c| !c.passed())
    }

    pub fn all_passed(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Drives skeleton rendering and materialization across a combination space.
pub struct Harness<'a> {
    skeleton: Skeleton<'a>,
    materializer: &'a Materializer,
    expectations: fn(&ResolvedConfiguration) -> Result<Vec<Check>>,
    external: Option<ExternalCommand>,
}

impl<'a> Harness<'a> {
    pub fn new(skeleton: Skeleton<'a>, materializer: &'a Materializer) -> Self {
        Self { skeleton, materializer, expectations, external: None }
    }

    pub fn with_expectations(mut self, expectations: fn(&ResolvedConfiguration) -> Result<Vec<Check>>) -> Self {
        self.expectations = expectations;
        self
    }

    pub fn with_external(mut self, command: ExternalCommand) -> Self {
        self.external = Some(command);
        self
    }

    /// Runs a single combination in its own scratch directory.
    ///
    /// The directory is removed when this returns, whether the combination
    /// passed or not.
    pub fn run_one(&self, overrides: &Overrides) -> Result<EngineReport> {
        let config = self.materializer.resolve(overrides)?;
        let scratch = TempDir::new()?;
        let slug = config.get(options::PROJECT_SLUG).unwrap_or("project");

        let mut tree = self.skeleton.render_into(&config, scratch.path().join(slug))?;
        let report = self.materializer.materialize_resolved(&mut tree, &config)?;

        for check in (self.expectations)(&config)? {
            check.verify(&tree)?;
        }

        let again = self.materializer.materialize_resolved(&mut tree, &config)?;
        if again.removed > 0 || again.rewritten > 0 {
            return Err(Error::CheckFailed(format!(
                "second materialization changed the tree ({} removed, {} rewritten)",
                again.removed, again.rewritten
            )));
        }

        if let Some(command) = &self.external {
            command.run(tree.root())?;
        }
        Ok(report)
    }

    fn report(&self, overrides: Overrides) -> CombinationReport {
        let outcome = self.run_one(&overrides);
        let report = CombinationReport { overrides, outcome };
        info!("{report}");
        report
    }

    /// Runs every combination of `space` one after another.
    pub fn run(&self, space: &CombinationSpace) -> MatrixReport {
        let combinations = all_combinations(space).into_iter().map(|o| self.report(o)).collect();
        MatrixReport { combinations }
    }

    /// Runs every combination of `space` on the rayon thread pool.
    pub fn run_parallel(&self, space: &CombinationSpace) -> MatrixReport {
        let combinations = all_combinations(space).into_par_iter().map(|o| self.report(o)).collect();
        MatrixReport { combinations }
    }
}
