//! Default port implementations.

use crate::ports::Console;
use cfgfix_domain::{Prompter, parse_yes_no};
use std::io::{BufRead, Write};
use tracing::debug;

/// Writes status text to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn show(&mut self, text: &str) {
        print!("{text}");
        if !text.ends_with('\n') {
            println!();
        }
    }
}

/// Collects status text in memory, for embedding and testing.
#[derive(Debug, Clone, Default)]
pub struct BufferConsole {
    pub shown: Vec<String>,
}

impl Console for BufferConsole {
    fn show(&mut self, text: &str) {
        self.shown.push(text.to_string());
    }
}

/// Line-oriented prompter over any reader/writer pair (usually stdin and
/// stdout).
///
/// End of input is treated as "no answer": `ask` returns `None` and
/// `confirm` falls back to its default.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!("input closed");
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn interactive(&self) -> bool {
        true
    }

    fn ask(&mut self, question: &str) -> anyhow::Result<Option<String>> {
        self.read_line(&format!("{question}: "))
    }

    fn confirm(&mut self, question: &str, default: bool) -> anyhow::Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            let Some(answer) = self.read_line(&format!("{question} {hint} "))? else {
                return Ok(default);
            };
            if answer.is_empty() {
                return Ok(default);
            }
            match parse_yes_no(&answer) {
                Some(yes) => return Ok(yes),
                None => writeln!(self.output, "Please answer y or n.")?,
            }
        }
    }
}
