//! Confirmation capability injected into destructive operations.

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

/// Literal answer required before removing or overwriting state.
pub const CONFIRM_PHRASE: &str = "YES";

/// Asks the user to approve an action.
pub trait Confirm {
    /// Returns true only if the user affirmatively approved.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be read.
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Approves only when the typed line equals a fixed phrase exactly.
pub struct PhrasePrompt<R, W> {
    input: R,
    output: W,
    phrase: String,
}

impl PhrasePrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the terminal
    #[must_use]
    pub fn terminal(phrase: &str) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), phrase)
    }
}

impl<R: BufRead, W: Write> PhrasePrompt<R, W> {
    /// Prompt on arbitrary streams
    pub fn new(input: R, output: W, phrase: &str) -> Self {
        Self {
            input,
            output,
            phrase: phrase.to_string(),
        }
    }
}

impl<R: BufRead, W: Write> Confirm for PhrasePrompt<R, W> {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        write!(self.output, "Type \"{}\" to confirm {prompt} ", self.phrase)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read confirmation")?;
        if read == 0 {
            // EOF declines
            return Ok(false);
        }

        Ok(line.trim_end_matches(['\r', '\n']) == self.phrase)
    }
}

/// Answers every prompt the same way, for batch callers and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(self.0)
    }
}
