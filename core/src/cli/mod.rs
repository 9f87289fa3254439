//! Helpers for interacting with an operator on a terminal.
//!
//! # Design
//! `Cli` owns its input, output and `CliConfig`, so a session against the
//! real process streams and one against in-memory buffers run the same
//! code. Nothing is stored between calls apart from that config.

pub mod args;
pub mod color;

use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};
use std::thread;
use std::time::Duration;

use log::debug;

use crate::config::CliConfig;
use crate::error::CliError;

pub use args::{parse_options, OptionMap};

/// Platform line separator.
pub const EOL: &str = if cfg!(windows) { "\r\n" } else { "\n" };

pub const INVALID_CHOICE: &str = "This is not a valid option. Please try again.";

/// Recognized `--name[=value]` options from the process arguments.
pub fn options(names: &[&str]) -> OptionMap {
    parse_options(
        std::env::args_os().map(|a| a.to_string_lossy().into_owned()),
        names,
    )
}

/// Text to write: a single string, or lines joined with `EOL`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text(String);

impl Text {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text(s.to_string())
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Text(s)
    }
}

impl From<&[&str]> for Text {
    fn from(lines: &[&str]) -> Self {
        Text(lines.join(EOL))
    }
}

impl<const N: usize> From<[&str; N]> for Text {
    fn from(lines: [&str; N]) -> Self {
        Text(lines.join(EOL))
    }
}

impl From<Vec<String>> for Text {
    fn from(lines: Vec<String>) -> Self {
        Text(lines.join(EOL))
    }
}

/// What `Cli::read` asks, and which answers it accepts.
///
/// An empty `allowed` list accepts any line. With no prompt text nothing is
/// printed before reading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    pub prompt: Option<String>,
    pub allowed: Vec<String>,
}

impl Prompt {
    pub fn ask(text: &str) -> Self {
        Self {
            prompt: Some(text.to_string()),
            allowed: Vec::new(),
        }
    }

    pub fn choose(text: &str, allowed: &[&str]) -> Self {
        Self {
            prompt: Some(text.to_string()),
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Restrict answers without printing a question.
    pub fn only(allowed: &[&str]) -> Self {
        Self {
            prompt: None,
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn render(&self) -> Option<String> {
        let text = self.prompt.as_deref().filter(|t| !t.is_empty())?;
        if self.allowed.is_empty() {
            Some(format!("{text}: "))
        } else {
            Some(format!("{text} [ {} ]: ", self.allowed.join(", ")))
        }
    }

    fn accepts(&self, input: &str) -> bool {
        self.allowed.is_empty() || self.allowed.iter().any(|a| a == input)
    }
}

/// A terminal session over an input and an output stream.
pub struct Cli<R, W> {
    input: R,
    output: W,
    config: CliConfig,
}

impl Cli<StdinLock<'static>, Stdout> {
    /// Session bound to the process's stdin and stdout.
    pub fn stdio(config: CliConfig) -> Self {
        let stdin: Stdin = io::stdin();
        Cli::new(stdin.lock(), io::stdout(), config)
    }
}

impl<R: BufRead, W: Write> Cli<R, W> {
    pub fn new(input: R, output: W, config: CliConfig) -> Self {
        Self {
            input,
            output,
            config,
        }
    }

    pub fn config(&self) -> &CliConfig {
        &self.config
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Read one trimmed line, re-asking until it is an allowed answer.
    ///
    /// Fails with `InputClosed` if the input ends before an answer arrives.
    pub fn read(&mut self, prompt: &Prompt) -> Result<String, CliError> {
        loop {
            if let Some(question) = prompt.render() {
                self.output.write_all(question.as_bytes())?;
                self.output.flush()?;
            }

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(CliError::InputClosed);
            }
            let answer = line.trim();

            if prompt.accepts(answer) {
                return Ok(answer.to_string());
            }
            debug!("rejected answer {answer:?}, expected one of {:?}", prompt.allowed);
            self.write(format!("{INVALID_CHOICE}{EOL}"))?;
        }
    }

    /// Write `text` followed by `EOL`.
    pub fn write(&mut self, text: impl Into<Text>) -> Result<(), CliError> {
        self.write_styled(text, None, None)
    }

    /// Write `text` followed by `EOL`, colored when either color is given.
    ///
    /// A background without a foreground is an invalid foreground.
    pub fn write_styled(
        &mut self,
        text: impl Into<Text>,
        foreground: Option<&str>,
        background: Option<&str>,
    ) -> Result<(), CliError> {
        let text = text.into();
        let rendered = if foreground.is_some() || background.is_some() {
            self.color(text.as_str(), foreground.unwrap_or_default(), background)?
        } else {
            text.0
        };
        self.output.write_all(rendered.as_bytes())?;
        self.output.write_all(EOL.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }

    /// Color `text`, or return it untouched when ANSI output is disabled.
    pub fn color(
        &self,
        text: &str,
        foreground: &str,
        background: Option<&str>,
    ) -> Result<String, CliError> {
        if !self.config.ansi {
            return Ok(text.to_string());
        }
        color::color(text, foreground, background)
    }

    /// Block for `seconds`.
    ///
    /// With `countdown`, print `n... ` for each remaining second and end the
    /// line. Without it and with zero seconds, print the wait message and
    /// block until a line is entered.
    pub fn wait(&mut self, seconds: u64, countdown: bool) -> Result<(), CliError> {
        let tick = self.config.tick();
        if countdown {
            for remaining in (1..=seconds).rev() {
                write!(self.output, "{remaining}... ")?;
                self.output.flush()?;
                thread::sleep(tick);
            }
            self.write("")
        } else if seconds > 0 {
            thread::sleep(Duration::from_millis(
                self.config.tick_ms.saturating_mul(seconds),
            ));
            Ok(())
        } else {
            let message = self.config.wait_msg.clone();
            self.write(message)?;
            self.read(&Prompt::default()).map(|_| ())
        }
    }
}
