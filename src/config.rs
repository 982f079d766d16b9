//! Configuration model for project materialization.
//! Declares the option set, each option's allowed values and defaults, and resolves
//! a partial override map into an immutable [`ResolvedConfiguration`].

use crate::constants::options;
use crate::error::{Error, Result};
use cruet::Inflector;
use indexmap::IndexMap;
use log::debug;
use regex::Regex;
use serde::Serialize;

/// Partial option assignment supplied by the user, in the order it was given.
pub type Overrides = IndexMap<String, String>;

/// Values an option accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedValues {
    /// A closed, ordered set. "None" and "Other" are ordinary members.
    OneOf(Vec<String>),
    /// Free text, optionally constrained by a regular expression.
    Text { pattern: Option<String> },
}

/// How an option's value is chosen when no override is supplied.
#[derive(Debug, Clone)]
pub enum DefaultValue {
    Fixed(String),
    /// Computed from an option declared earlier in the model.
    Derived { from: &'static str, derive: fn(&str) -> String },
}

/// A named configuration choice.
#[derive(Debug, Clone)]
pub struct ConfigOption {
    pub name: String,
    pub help: String,
    pub values: AllowedValues,
    pub default: DefaultValue,
}

impl ConfigOption {
    /// Creates a closed-set option whose default is its first value.
    pub fn choice(name: &str, help: &str, values: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            values: AllowedValues::OneOf(values.iter().map(|v| v.to_string()).collect()),
            default: DefaultValue::Fixed(values.first().copied().unwrap_or_default().to_string()),
        }
    }

    /// Creates a free-text option.
    pub fn text(name: &str, help: &str, default: &str) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            values: AllowedValues::Text { pattern: None },
            default: DefaultValue::Fixed(default.to_string()),
        }
    }

    /// Constrains a free-text option with a regular expression.
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        if let AllowedValues::Text { .. } = self.values {
            self.values = AllowedValues::Text { pattern: Some(pattern.to_string()) };
        }
        self
    }

    pub fn derived_from(mut self, from: &'static str, derive: fn(&str) -> String) -> Self {
        self.default = DefaultValue::Derived { from, derive };
        self
    }

    /// Returns the closed set of values, if the option has one.
    pub fn choices(&self) -> Option<&[String]> {
        match &self.values {
            AllowedValues::OneOf(values) => Some(values),
            AllowedValues::Text { .. } => None,
        }
    }

    /// Checks that `value` is acceptable for this option.
    pub fn validate(&self, value: &str) -> Result<()> {
        let valid = match &self.values {
            AllowedValues::OneOf(values) => values.iter().any(|v| v == value),
            AllowedValues::Text { pattern: None } => true,
            AllowedValues::Text { pattern: Some(pattern) } => self.compile(pattern)?.is_match(value),
        };

        if valid {
            Ok(())
        } else {
            Err(Error::InvalidOptionValue {
                option: self.name.clone(),
                value: value.to_string(),
                allowed: self.describe_allowed(),
            })
        }
    }

    fn compile(&self, pattern: &str) -> Result<Regex> {
        Regex::new(pattern).map_err(|e| Error::InvalidModel(format!("pattern of option '{}': {e}", self.name)))
    }

    fn describe_allowed(&self) -> String {
        match &self.values {
            AllowedValues::OneOf(values) => values.join(", "),
            AllowedValues::Text { pattern: Some(pattern) } => format!("text matching {pattern}"),
            AllowedValues::Text { pattern: None } => "any text".to_string(),
        }
    }
}

/// The immutable option set of a project skeleton.
#[derive(Debug, Clone)]
pub struct OptionModel {
    options: IndexMap<String, ConfigOption>,
}

impl OptionModel {
    /// Builds a model, checking that every pattern compiles, every fixed default
    /// is allowed and every derived default refers to an option declared before it.
    pub fn new(options: Vec<ConfigOption>) -> Result<Self> {
        let mut declared: IndexMap<String, ConfigOption> = IndexMap::new();
        for option in options {
            if let AllowedValues::Text { pattern: Some(pattern) } = &option.values {
                option.compile(pattern)?;
            }
            match &option.default {
                DefaultValue::Fixed(value) => option.validate(value)?,
                DefaultValue::Derived { from, .. } => {
                    if !declared.contains_key(*from) {
                        return Err(Error::UnknownOption { option: from.to_string() });
                    }
                }
            }
            declared.insert(option.name.clone(), option);
        }
        Ok(Self { options: declared })
    }

    /// The option set of the python package skeleton.
    pub fn standard() -> Self {
        let options = standard_options().into_iter().map(|o| (o.name.clone(), o)).collect();
        Self { options }
    }

    pub fn get(&self, name: &str) -> Option<&ConfigOption> {
        self.options.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigOption> {
        self.options.values()
    }

    /// Resolves `overrides` against the model.
    ///
    /// Options are resolved in declaration order so derived defaults can see the
    /// values chosen before them.
    ///
    /// # Errors
    /// * `Error::UnknownOption` if an override names an undeclared option
    /// * `Error::InvalidOptionValue` if an override (or a derived default) is not allowed
    pub fn resolve(&self, overrides: &Overrides) -> Result<ResolvedConfiguration> {
        if let Some(unknown) = overrides.keys().find(|key| !self.options.contains_key(*key)) {
            return Err(Error::UnknownOption { option: unknown.clone() });
        }

        let mut values: IndexMap<String, String> = IndexMap::new();
        for (name, option) in &self.options {
            let value = match overrides.get(name) {
                Some(value) => value.clone(),
                None => match &option.default {
                    DefaultValue::Fixed(value) => value.clone(),
                    DefaultValue::Derived { from, derive } => {
                        derive(values.get(*from).map(String::as_str).unwrap_or_default())
                    }
                },
            };
            option.validate(&value)?;
            debug!("Resolved option {name} = '{value}'");
            values.insert(name.clone(), value);
        }

        Ok(ResolvedConfiguration { values })
    }
}

impl Default for OptionModel {
    fn default() -> Self {
        OptionModel::standard()
    }
}

fn standard_options() -> Vec<ConfigOption> {
    vec![
        ConfigOption::text(options::FULL_NAME, "Author's full name", "Audrey Roy Greenfeld"),
        ConfigOption::text(options::EMAIL, "Author's email", "audreyr@example.com"),
        ConfigOption::text(options::PROJECT_NAME, "Project name", "My Python Package"),
        ConfigOption::text(options::PROJECT_SLUG, "Python package name", "")
            .with_pattern(r"^[_a-zA-Z][_a-zA-Z0-9]*$")
            .derived_from(options::PROJECT_NAME, |name| name.to_snake_case()),
        ConfigOption::choice(
            options::LICENSE,
            "Open source license",
            &[
                "MIT License",
                "BSD License",
                "Apache 2.0 License",
                "GNU General Public License v3",
                "Other",
            ],
        ),
        ConfigOption::choice(
            options::COMMAND_LINE_INTERFACE,
            "Command line interface",
            &["Click", "Argparse", "None"],
        ),
        ConfigOption::choice(
            options::DOCUMENTATION_FRAMEWORK,
            "Documentation framework",
            &["Sphinx", "MkDocs", "None"],
        ),
        ConfigOption::choice(options::TEST_AUTOMATION_TOOL, "Test automation tool", &["Tox", "Nox"]),
        ConfigOption::choice(options::HAVE_TESTS, "Create a test suite", &["y", "n"]),
        ConfigOption::choice(options::CREATE_AUTHOR_FILE, "Create an AUTHORS file", &["y", "n"]),
    ]
}

/// One snapshot of option values for a single materialization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedConfiguration {
    values: IndexMap<String, String>,
}

impl ResolvedConfiguration {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns true if `name` resolved to exactly `value`.
    pub fn is(&self, name: &str, value: &str) -> bool {
        self.get(name) == Some(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(pairs: &[(&str, &str)]) -> Overrides {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_standard_model_is_consistent() {
        assert!(OptionModel::new(standard_options()).is_ok());
    }

    #[test]
    fn test_resolve_defaults() {
        let config = OptionModel::standard().resolve(&Overrides::new()).unwrap();
        assert!(config.is(options::LICENSE, "MIT License"));
        assert!(config.is(options::TEST_AUTOMATION_TOOL, "Tox"));
        assert!(config.is(options::PROJECT_SLUG, "my_python_package"));
    }

    #[test]
    fn test_derived_default_follows_override() {
        let config = OptionModel::standard()
            .resolve(&overrides(&[(options::PROJECT_NAME, "Cookie Jar")]))
            .unwrap();
        assert_eq!(config.get(options::PROJECT_SLUG), Some("cookie_jar"));
    }

    #[test]
    fn test_unknown_option() {
        let err = OptionModel::standard().resolve(&overrides(&[("use_pytest", "y")])).unwrap_err();
        assert!(matches!(err, Error::UnknownOption { option } if option == "use_pytest"));
    }

    #[test]
    fn test_invalid_choice() {
        let err = OptionModel::standard()
            .resolve(&overrides(&[(options::DOCUMENTATION_FRAMEWORK, "Doxygen")]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOptionValue { option, .. } if option == "documentation_framework"));
    }

    #[test]
    fn test_invalid_slug() {
        let err = OptionModel::standard()
            .resolve(&overrides(&[(options::PROJECT_SLUG, "my-package")]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOptionValue { .. }));
    }

    #[test]
    fn test_invalid_pattern_rejected_by_model() {
        let options = vec![ConfigOption::text("slug", "Slug", "jar").with_pattern("^[a-z")];
        let err = OptionModel::new(options).unwrap_err();
        assert!(matches!(err, Error::InvalidModel(msg) if msg.contains("'slug'")));
    }

    #[test]
    fn test_derived_default_must_follow_its_source() {
        let options = vec![ConfigOption::text("slug", "Slug", "").derived_from("name", |n| n.to_string())];
        assert!(matches!(OptionModel::new(options), Err(Error::UnknownOption { .. })));
    }
}
