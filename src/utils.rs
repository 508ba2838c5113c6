//! Utility functions
use std::io::{stdin, stdout, BufRead, Write};

use crate::errors::{ForkMoverError, ForkMoverErrorKind};

/// Something able to ask the user for a confirmation
pub trait Confirm {
    /// Ask `question`, returns true only on an explicit yes
    /// # Errors
    /// Error if the answer can't be read
    fn confirm(&mut self, question: &str) -> Result<bool, ForkMoverError>;
}

/// Ask on the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, question: &str) -> Result<bool, ForkMoverError> {
        print!("{question} [y/N]: ");
        let answer = input(&mut stdin().lock())?;
        Ok(is_affirmative(&answer))
    }
}

/// Whether `answer` is a yes
pub(crate) fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Get input from the user, without the line ending
pub(crate) fn input(reader: &mut impl BufRead) -> Result<String, ForkMoverError> {
    let mut s = String::new();
    let _ = stdout().flush();
    reader.read_line(&mut s).map_err(|e| {
        ForkMoverError::new(ForkMoverErrorKind::Input)
            .with_text(&format!("Did not enter a correct string: {e}"))
    })?;
    if let Some('\n') = s.chars().next_back() {
        s.pop();
    }
    if let Some('\r') = s.chars().next_back() {
        s.pop();
    }
    Ok(s)
}
