//! User input and interaction handling.
//! Asks for the options that were not supplied up front.

use crate::config::{ConfigOption, DefaultValue, OptionModel, Overrides};
use crate::error::Result;
use dialoguer::{Input, Select};

/// Source of answers for options without an override.
pub trait Prompter {
    /// Asks for a value of `option`. `default` is the value resolution would pick.
    fn answer(&self, option: &ConfigOption, default: &str) -> Result<String>;
}

/// Terminal prompts backed by dialoguer.
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        DialoguerPrompter::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn answer(&self, option: &ConfigOption, default: &str) -> Result<String> {
        match option.choices() {
            Some(choices) => {
                let default_index = choices.iter().position(|c| c == default).unwrap_or(0);
                let selection = Select::new()
                    .with_prompt(&option.help)
                    .default(default_index)
                    .items(choices)
                    .interact()?;
                Ok(choices[selection].clone())
            }
            None => {
                let input: String = Input::new()
                    .with_prompt(&option.help)
                    .default(default.to_string())
                    .validate_with(|value: &String| {
                        option.validate(value).map_err(|e| e.to_string())
                    })
                    .interact_text()?;
                Ok(input)
            }
        }
    }
}

/// Prompts for every option of `model` missing from `overrides`, in declaration order.
///
/// Derived defaults are computed from the answers given so far, so the suggested
/// slug follows the project name that was just entered.
pub fn prompt_missing(
    prompter: &dyn Prompter,
    model: &OptionModel,
    overrides: Overrides,
) -> Result<Overrides> {
    let mut answers = Overrides::new();

    for option in model.iter() {
        let value = match overrides.get(&option.name) {
            Some(value) => value.clone(),
            None => {
                let default = match &option.default {
                    DefaultValue::Fixed(value) => value.clone(),
                    DefaultValue::Derived { from, derive } => {
                        derive(answers.get(*from).map(String::as_str).unwrap_or_default())
                    }
                };
                prompter.answer(option, &default)?
            }
        };
        answers.insert(option.name.clone(), value);
    }

    // Unknown keys are kept so that resolution reports them.
    for (key, value) in overrides {
        answers.entry(key).or_insert(value);
    }
    Ok(answers)
}
