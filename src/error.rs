//! Error handling for pyskel.
//! Defines the error taxonomy shared by configuration resolution, the rule engine,
//! the content rewriter and the validation harness.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving a configuration or materializing a project.
#[derive(Error, Debug)]
pub enum Error {
    /// An override names an option the model does not declare.
    #[error("Unknown option '{option}'.")]
    UnknownOption { option: String },

    /// An override supplies a value outside the option's allowed values.
    #[error("Invalid value '{value}' for option '{option}' (allowed: {allowed}).")]
    InvalidOptionValue { option: String, value: String, allowed: String },

    /// A rule targets a path that is absent from a freshly rendered tree.
    /// This is a rule/template mismatch, never a user error.
    #[error("Rule '{rule}' expected '{}' to exist.", path.display())]
    MissingExpectedPath { rule: String, path: PathBuf },

    /// A downstream build or test tool exited unsuccessfully.
    #[error("External tool '{command}' failed: {status}.")]
    ExternalToolFailure { command: String, status: String },

    /// A structural assertion of the validation harness did not hold.
    #[error("Check failed: {0}.")]
    CheckFailed(String),

    /// An option model declaration is inconsistent, e.g. a pattern that does not compile.
    #[error("Invalid option model: {0}.")]
    InvalidModel(String),

    /// A path or content rule referenced an option combination it cannot handle.
    #[error("Rule error: {0}.")]
    RuleError(String),

    #[error("Answers error: {0}.")]
    AnswersError(String),

    #[error("Template error: {0}.")]
    TemplateError(String),

    #[error("Prompt error: {0}.")]
    PromptError(#[from] dialoguer::Error),

    #[error("Glob error: {0}.")]
    GlobError(#[from] globset::Error),

    #[error("Template rendering error: {0}.")]
    MinijinjaError(#[from] minijinja::Error),

    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
