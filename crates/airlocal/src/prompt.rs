//! Terminal answer source for the creation questionnaire

use airlocal_core::hostname::validate_not_empty;
use airlocal_core::questions::{AnswerSource, Choice, Question};
use airlocal_core::{Error, Result};
use dialoguer::{Confirm, Input, Select};

fn prompt_error(e: dialoguer::Error) -> Error {
    Error::Io(std::io::Error::other(e))
}

/// Asks questions with dialoguer prompts
pub struct TerminalSource;

impl AnswerSource for TerminalSource {
    fn input(&mut self, question: &Question, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::new().with_prompt(question.message);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }

        if question.is_required() {
            input
                .validate_with(|value: &String| validate_not_empty(value))
                .interact_text()
                .map_err(prompt_error)
        } else {
            input
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_error)
        }
    }

    fn confirm(&mut self, question: &Question, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(question.message)
            .default(default)
            .interact()
            .map_err(prompt_error)
    }

    fn select(&mut self, question: &Question, choices: &[Choice], default: usize) -> Result<usize> {
        let labels: Vec<&str> = choices.iter().map(|c| c.label).collect();
        Select::new()
            .with_prompt(question.message)
            .items(&labels)
            .default(default)
            .interact()
            .map_err(prompt_error)
    }
}
