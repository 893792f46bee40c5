use anyhow::{Context, Result};
use inquire::{Confirm, CustomType, Select, Text};
use tracing::debug;

/// Trait for prompting user for input.
///
/// Every interactive step of the configuration goes through this trait, so
/// flows can be driven by canned answers in tests.
pub trait Prompter {
    /// Ask for free text.
    fn text(&mut self, message: &str, help: Option<&str>) -> Result<String>;

    /// Ask a yes/no question.
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;

    /// Ask to pick one of `options`, returning its index.
    fn select(&mut self, message: &str, options: &[String], default: usize) -> Result<usize>;

    /// Ask for an integer. Range checks are up to the caller.
    fn number(&mut self, message: &str) -> Result<i64>;
}

impl<T> Prompter for &mut T
where
    T: Prompter + ?Sized,
{
    fn text(&mut self, message: &str, help: Option<&str>) -> Result<String> {
        (**self).text(message, help)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        (**self).confirm(message, default)
    }

    fn select(&mut self, message: &str, options: &[String], default: usize) -> Result<usize> {
        (**self).select(message, options, default)
    }

    fn number(&mut self, message: &str) -> Result<i64> {
        (**self).number(message)
    }
}

/// Real implementation using `inquire`.
pub struct InquirePrompter;

impl InquirePrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for InquirePrompter {
    fn text(&mut self, message: &str, help: Option<&str>) -> Result<String> {
        debug!("Prompting for text: {message}");
        let mut prompt = Text::new(message);
        if let Some(help) = help {
            prompt = prompt.with_help_message(help);
        }

        prompt.prompt().context("failed to read answer from stdin")
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        debug!("Confirming: {message}");
        Confirm::new(message)
            .with_default(default)
            .prompt()
            .context("failed to read confirmation from stdin")
    }

    fn select(&mut self, message: &str, options: &[String], default: usize) -> Result<usize> {
        debug!("Selecting one of {options:?}");
        let answer = Select::new(message, options.to_vec())
            .with_starting_cursor(default)
            .raw_prompt()
            .context("failed to read choice from stdin")?;

        Ok(answer.index)
    }

    fn number(&mut self, message: &str) -> Result<i64> {
        debug!("Prompting for number: {message}");
        CustomType::<i64>::new(message)
            .with_error_message("Please type a whole number")
            .prompt()
            .context("failed to read number from stdin")
    }
}
