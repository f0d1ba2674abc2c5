//! Line-buffered interactive prompts.
//!
//! Questions go to stderr so that stdout stays reserved for the generated
//! command, which the shell wrapper captures.

use crate::config::{DEFAULT_MODEL, FREE_MODELS};
use anyhow::{bail, Result};
use std::io::{self, BufRead, Stderr, StdinLock, Write};

/// A question/answer channel: answers are read from `input`, questions and
/// guidance are written to `output`.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<StdinLock<'static>, Stderr> {
    /// Console on the process stdin and stderr.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print a question and return the trimmed answer. End of input reads as
    /// an empty answer.
    pub fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    /// Write one line of guidance.
    pub fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// Ask for an OpenRouter API key. An empty answer is an error.
    pub fn prompt_api_key(&mut self) -> Result<String> {
        self.say("\nNo API key found. You need a free OpenRouter API key to use terminalai.")?;
        self.say("Get one at: https://openrouter.ai/keys (takes 30 seconds)\n")?;

        let api_key = self.ask("Enter your OpenRouter API key: ")?;
        if api_key.is_empty() {
            bail!("No API key provided");
        }
        Ok(api_key)
    }

    /// Offer the recommended models plus a custom id. Unrecognised answers
    /// fall back to the default model.
    pub fn choose_model(&mut self) -> Result<String> {
        self.say("\nSelect a model:\n")?;
        for (index, model) in FREE_MODELS.iter().enumerate() {
            let marker = if index == 0 { " (recommended)" } else { "" };
            self.say(&format!("  {}. {}{}", index + 1, model.name, marker))?;
            self.say(&format!("     {}\n", model.id))?;
        }
        let custom = FREE_MODELS.len() + 1;
        self.say(&format!("  {}. Enter custom model ID\n", custom))?;

        let answer = self.ask(&format!("Choose (1-{}): ", custom))?;
        let model = match answer.parse::<usize>() {
            Ok(n) if (1..=FREE_MODELS.len()).contains(&n) => FREE_MODELS[n - 1].id.to_string(),
            Ok(n) if n == custom => {
                self.say("\nFind model IDs at: https://openrouter.ai/models\n")?;
                let id = self.ask("Enter model ID: ")?;
                if id.is_empty() {
                    self.say("No model provided. Using default.")?;
                    DEFAULT_MODEL.to_string()
                } else {
                    id
                }
            }
            _ => {
                self.say("Invalid choice. Using default model.")?;
                DEFAULT_MODEL.to_string()
            }
        };
        Ok(model)
    }

    /// Ask whether to install for every supported shell. Only an explicit
    /// "n" declines.
    pub fn confirm_all_shells(&mut self) -> Result<bool> {
        let answer = self.ask("Install for all supported shells? (Y/n): ")?;
        Ok(!answer.eq_ignore_ascii_case("n"))
    }
}
