//! Line-based prompting with retry on invalid input.

use std::io::{BufRead, Write};

/// Why a prompt did not produce a value.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// Input reached end of file
    #[error("input closed")]
    Closed,

    /// Reading input or writing the prompt failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads answers from `R` and writes prompts and output to `W`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writer for regular output.
    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Ask for a line of text, without the trailing newline.
    pub fn line(&mut self, prompt: &str) -> Result<String, PromptError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(PromptError::Closed);
        }
        Ok(buf.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Ask until a non-blank line is entered; returns it trimmed.
    pub fn non_blank(&mut self, prompt: &str, retry: &str) -> Result<String, PromptError> {
        loop {
            let answer = self.line(prompt)?;
            let answer = answer.trim();
            if !answer.is_empty() {
                return Ok(answer.to_string());
            }
            writeln!(self.output, "{}", retry)?;
        }
    }

    /// Ask until a non-negative integer is entered.
    pub fn count(&mut self, prompt: &str) -> Result<u32, PromptError> {
        loop {
            let answer = self.line(prompt)?;
            match answer.trim().parse::<i64>() {
                Ok(value) if value < 0 => {
                    writeln!(self.output, "Invalid input. Please enter a positive number.")?;
                }
                Ok(value) => match u32::try_from(value) {
                    Ok(value) => return Ok(value),
                    Err(_) => writeln!(self.output, "Invalid input. That number is too large.")?,
                },
                Err(_) => writeln!(self.output, "Invalid input. Please enter a valid integer.")?,
            }
        }
    }

    /// Ask for a 1-based position in a list of `len` items, 0 meaning none.
    ///
    /// Returns the 0-based index of the chosen item.
    pub fn choose(&mut self, prompt: &str, len: usize) -> Result<Option<usize>, PromptError> {
        loop {
            let choice = self.count(prompt)? as usize;
            if choice == 0 {
                return Ok(None);
            }
            if choice <= len {
                return Ok(Some(choice - 1));
            }
            writeln!(self.output, "Invalid choice. Please enter a number between 1 and {}", len)?;
        }
    }

    /// Ask a y/n question; anything but `y` is a no.
    pub fn confirm(&mut self, prompt: &str) -> Result<bool, PromptError> {
        Ok(self.line(prompt)?.trim().eq_ignore_ascii_case("y"))
    }
}
