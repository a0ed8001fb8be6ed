//! Interactive prompting for missing command arguments.
//!
//! # Responsibility
//! - Ask for one value at a time over an explicit input/output pair.
//!
//! # Invariants
//! - Answers are trimmed; an empty answer to an optional prompt is `None`.
//! - End of input on a required prompt is an error, never a silent default.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{BufRead, Write};
use std::str::FromStr;

#[derive(Debug)]
pub enum PromptError {
    Io(std::io::Error),
    /// Input ended before a required value was given.
    MissingRequired(String),
}

impl Display for PromptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read input: {err}"),
            Self::MissingRequired(label) => {
                write!(f, "required input for `{label}` not provided before end of input")
            }
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::MissingRequired(_) => None,
        }
    }
}

impl From<std::io::Error> for PromptError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Line-oriented prompter owned by the CLI layer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Asks for text. Required prompts repeat until a non-blank answer.
    pub fn text(&mut self, label: &str, required: bool) -> Result<Option<String>, PromptError> {
        loop {
            let Some(answer) = self.ask(label, required)? else {
                return missing(label, required);
            };
            if !answer.is_empty() {
                return Ok(Some(answer));
            }
            if !required {
                return Ok(None);
            }
        }
    }

    /// Asks for a number. Unparsable answers are reported and asked again.
    pub fn number<T: FromStr>(
        &mut self,
        label: &str,
        required: bool,
    ) -> Result<Option<T>, PromptError> {
        loop {
            let Some(answer) = self.ask(label, required)? else {
                return missing(label, required);
            };
            if answer.is_empty() && !required {
                return Ok(None);
            }
            match answer.parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "Invalid number, please try again.")?,
            }
        }
    }

    /// Writes the prompt and reads one trimmed line; `None` at end of input.
    fn ask(&mut self, label: &str, required: bool) -> Result<Option<String>, PromptError> {
        let marker = if required { "*required" } else { "optional" };
        write!(self.output, "{label} ({marker}): ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

fn missing<T>(label: &str, required: bool) -> Result<Option<T>, PromptError> {
    if required {
        Err(PromptError::MissingRequired(label.to_string()))
    } else {
        Ok(None)
    }
}
