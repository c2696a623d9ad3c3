//! Masked API key prompt
//!
//! Reads the key with its own rustyline editor whose highlighter draws
//! every typed character as `*`. The editor keeps no history, so the key
//! never reaches the chat shell's history.

use crate::error::{Result, ThreadchatError};
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Config as EditorConfig, Editor, Helper};
use std::borrow::Cow;

/// Helper that renders the input line as asterisks
#[derive(Debug, Default, Clone, Copy)]
pub struct MaskedInput;

impl Highlighter for MaskedInput {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Owned("*".repeat(line.chars().count()))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        // redraw after every keystroke so no character is shown in clear
        true
    }
}

impl Completer for MaskedInput {
    type Candidate = String;
}

impl Hinter for MaskedInput {
    type Hint = String;
}

impl Validator for MaskedInput {}

impl Helper for MaskedInput {}

/// Ask for a secret without echoing it
///
/// Returns `Ok(None)` for a blank answer, CTRL-C or CTRL-D.
///
/// # Errors
///
/// Returns [`ThreadchatError::Readline`] if the terminal cannot be read
pub fn read_masked(prompt: &str) -> Result<Option<String>> {
    let config = EditorConfig::builder().auto_add_history(false).build();
    let mut rl: Editor<MaskedInput, DefaultHistory> = Editor::with_config(config)?;
    rl.set_helper(Some(MaskedInput));

    match rl.readline(prompt) {
        Ok(secret) if !secret.trim().is_empty() => Ok(Some(secret.trim().to_string())),
        Ok(_) | Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(ThreadchatError::Readline(err).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_masks_every_character() {
        let masked = MaskedInput.highlight("sk-abc123", 9);
        assert_eq!(masked, "*********");
    }

    #[test]
    fn test_highlight_counts_characters_not_bytes() {
        assert_eq!(MaskedInput.highlight("ké", 2), "**");
    }

    #[test]
    fn test_highlight_empty_line() {
        assert_eq!(MaskedInput.highlight("", 0), "");
    }

    #[test]
    fn test_every_keystroke_triggers_redraw() {
        assert!(MaskedInput.highlight_char("s", 1, false));
        assert!(MaskedInput.highlight_char("sk-", 3, false));
    }
}
