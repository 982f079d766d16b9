//! On-disk project tree mutated by the rule engine.

use crate::error::{Error, Result};
use globset::{Glob, GlobSetBuilder};
use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Whether the tree still has the shape the renderer produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeState {
    /// Fresh from rendering. Every path a rule targets must exist.
    Rendered,
    /// Rules already ran. Targets that are gone are skipped.
    Materialized,
}

/// A rendered project rooted at a directory.
///
/// Deletions are addressed by paths relative to the root. The tree is owned
/// exclusively by whoever materializes it; nothing else writes to the directory
/// during a run.
#[derive(Debug)]
pub struct ProjectTree {
    root: PathBuf,
    state: TreeState,
}

impl ProjectTree {
    /// Opens a freshly rendered project.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        Self::with_state(root, TreeState::Rendered)
    }

    /// Opens a project that has already been materialized, so rules can be
    /// re-applied without failing on the paths they removed the first time.
    pub fn open_materialized<P: AsRef<Path>>(root: P) -> Result<Self> {
        Self::with_state(root, TreeState::Materialized)
    }

    fn with_state<P: AsRef<Path>>(root: P, state: TreeState) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::IoError(io::Error::new(
                io::ErrorKind::NotFound,
                format!("project directory '{}' does not exist", root.display()),
            )));
        }
        Ok(Self { root: root.to_path_buf(), state })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state(&self) -> TreeState {
        self.state
    }

    pub(crate) fn mark_materialized(&mut self) {
        self.state = TreeState::Materialized;
    }

    pub fn path(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    pub fn exists(&self, relative: &Path) -> bool {
        self.path(relative).exists()
    }

    /// Checks that `relative` exists. Returns false when it is already gone from a
    /// materialized tree.
    pub fn require(&self, rule: &str, relative: &Path) -> Result<bool> {
        if self.exists(relative) {
            Ok(true)
        } else {
            self.missing(rule, relative)
        }
    }

    /// Deletes a single file. Returns whether anything was removed.
    pub fn delete_file(&mut self, rule: &str, relative: &Path) -> Result<bool> {
        let target = self.path(relative);
        if !target.is_file() {
            return self.missing(rule, relative);
        }
        debug!("[{rule}] Removing file '{}'", relative.display());
        fs::remove_file(target)?;
        Ok(true)
    }

    /// Deletes a directory and everything below it. Returns whether anything was removed.
    pub fn delete_dir(&mut self, rule: &str, relative: &Path) -> Result<bool> {
        let target = self.path(relative);
        if !target.is_dir() {
            return self.missing(rule, relative);
        }
        debug!("[{rule}] Removing directory '{}'", relative.display());
        fs::remove_dir_all(target)?;
        Ok(true)
    }

    /// Deletes every file below `relative` whose extension is `extension`.
    ///
    /// The directory itself must exist on a rendered tree; finding no matching
    /// file is not an error. Returns the number of files removed.
    pub fn delete_with_extension(
        &mut self,
        rule: &str,
        relative: &Path,
        extension: &str,
    ) -> Result<usize> {
        let base = self.path(relative);
        if !base.is_dir() {
            return self.missing(rule, relative).map(|_| 0);
        }

        let matcher = GlobSetBuilder::new()
            .add(Glob::new(&format!("**/*.{extension}"))?)
            .build()?;

        let mut matched = Vec::new();
        for entry in WalkDir::new(&base) {
            let entry = entry.map_err(|e| Error::IoError(e.into()))?;
            let Ok(inner) = entry.path().strip_prefix(&base) else {
                continue;
            };
            if entry.file_type().is_file() && matcher.is_match(inner) {
                matched.push(entry.path().to_path_buf());
            }
        }

        for path in &matched {
            debug!("[{rule}] Removing file '{}'", path.display());
            fs::remove_file(path)?;
        }
        Ok(matched.len())
    }

    pub fn read_to_string(&self, relative: &Path) -> Result<String> {
        Ok(fs::read_to_string(self.path(relative))?)
    }

    /// Lists every file and directory below the root, relative to it, sorted.
    pub fn entries(&self) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::IoError(e.into()))?;
            if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                entries.push(relative.to_path_buf());
            }
        }
        Ok(entries)
    }

    fn missing(&self, rule: &str, relative: &Path) -> Result<bool> {
        match self.state {
            TreeState::Rendered => Err(Error::MissingExpectedPath {
                rule: rule.to_string(),
                path: relative.to_path_buf(),
            }),
            TreeState::Materialized => {
                debug!("[{rule}] '{}' already absent", relative.display());
                Ok(false)
            }
        }
    }
}
