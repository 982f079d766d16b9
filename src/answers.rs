//! Loading of option overrides.
//! Overrides come from an answers file (JSON or YAML), from stdin, or from
//! `key=value` pairs on the command line; later sources win.

use crate::config::Overrides;
use crate::constants::ANSWERS_FILES;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use std::io::Read;
use std::path::Path;

/// Converts a single answer to its option value.
///
/// Booleans map to the `y`/`n` values used by yes/no options.
fn answer_value(key: &str, value: serde_json::Value) -> Result<String> {
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Bool(true) => Ok("y".to_string()),
        serde_json::Value::Bool(false) => Ok("n".to_string()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(Error::AnswersError(format!(
            "answer for '{key}' must be a string or a boolean, got {other}"
        ))),
    }
}

/// Parses answers given as a JSON or YAML mapping.
///
/// Empty input yields no overrides. Order is preserved.
pub fn parse_answers(content: &str) -> Result<Overrides> {
    if content.trim().is_empty() {
        return Ok(Overrides::new());
    }

    let raw: IndexMap<String, serde_json::Value> = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::AnswersError(format!("Invalid answers format: {e}")))?,
    };

    raw.into_iter()
        .map(|(key, value)| answer_value(&key, value).map(|v| (key, v)))
        .collect()
}

/// Loads answers from a file, or from the first answers file found in a directory.
///
/// # Errors
/// * `Error::AnswersError` if a directory holds none of the supported answers files
pub fn load_answers_file<P: AsRef<Path>>(path: P) -> Result<Overrides> {
    let path = path.as_ref();
    let file = if path.is_dir() {
        ANSWERS_FILES.iter().map(|name| path.join(name)).find(|candidate| candidate.exists()).ok_or_else(
            || {
                Error::AnswersError(format!(
                    "No answers file found in '{}' (tried: {})",
                    path.display(),
                    ANSWERS_FILES.join(", ")
                ))
            },
        )?
    } else {
        path.to_path_buf()
    };

    debug!("Loading answers from {}", file.display());
    parse_answers(&std::fs::read_to_string(&file)?)
}

pub fn load_from_stdin() -> Result<Overrides> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    parse_answers(&buffer)
}

/// Parses a `key=value` assignment. The value may itself contain `=`.
pub fn parse_assignment(s: &str) -> Result<(String, String)> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(Error::AnswersError(format!("expected KEY=VALUE, got '{s}'"))),
    }
}

/// Layers `overlay` on top of `base`; keys keep their first position.
pub fn merge(mut base: Overrides, overlay: Overrides) -> Overrides {
    for (key, value) in overlay {
        base.insert(key, value);
    }
    base
}
