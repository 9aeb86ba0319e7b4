//! Line-oriented message processing.
//!
//! Input alternates settings lines (starting with `*`) and message lines.
//! Each message line is stripped of whitespace, enciphered with the machine
//! as left by the previous lines, and written out in groups of five.

use std::io::{BufRead, Write};

use thiserror::Error;
use tracing::debug;

use crate::config::{ConfigError, Settings};
use crate::error::EnigmaError;
use crate::machine::Machine;

/// Symbols per output group.
const GROUP: usize = 5;

/// Errors produced while processing a message stream.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("line {line}: message before the first settings line")]
    MissingSettings { line: usize },

    #[error("line {line}: {source}")]
    Config {
        line: usize,
        #[source]
        source: ConfigError,
    },

    #[error("line {line}: {source}")]
    Engine {
        line: usize,
        #[source]
        source: EnigmaError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// A machine fed one input line at a time.
#[derive(Debug, Clone)]
pub struct Session {
    machine: Machine,
    configured: bool,
    line: usize,
}

impl Session {
    pub fn new(machine: Machine) -> Self {
        Session {
            machine,
            configured: false,
            line: 0,
        }
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Handles one input line, returning the output line for messages and
    /// `None` for settings lines.
    pub fn process_line(&mut self, text: &str) -> Result<Option<String>> {
        self.line += 1;
        let line = self.line;

        if Settings::is_settings_line(text) {
            Settings::parse(text, self.machine.num_rotors())
                .and_then(|s| s.apply(&mut self.machine))
                .map_err(|source| SessionError::Config { line, source })?;
            self.configured = true;
            debug!(line, settings = %self.machine.settings(), "machine reset");
            return Ok(None);
        }

        let msg: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if msg.is_empty() {
            return Ok(Some(String::new()));
        }
        if !self.configured {
            return Err(SessionError::MissingSettings { line });
        }
        let out = self
            .machine
            .convert(&msg)
            .map_err(|source| SessionError::Engine { line, source })?;
        Ok(Some(format_groups(&out)))
    }

    /// Processes every line of `input`, writing results to `output`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for text in input.lines() {
            if let Some(out) = self.process_line(&text?)? {
                writeln!(output, "{}", out)?;
            }
        }
        output.flush()?;
        Ok(())
    }
}

/// Splits `msg` into space-separated groups of five symbols; the last
/// group may be shorter.
pub fn format_groups(msg: &str) -> String {
    let mut out = String::with_capacity(msg.len() + msg.len() / GROUP);
    for (i, c) in msg.chars().enumerate() {
        if i > 0 && i % GROUP == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}
