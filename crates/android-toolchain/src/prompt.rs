//! Interactive prompts
//!
//! Questions asked during installation go through [`Prompt`] so the
//! installer can be driven by any input source.

use std::io::{BufRead, ErrorKind, Write};

use tracing::debug;

/// Line-oriented user interaction
pub trait Prompt {
    /// Prints an informational line.
    fn say(&mut self, message: &str);

    /// Prints an error line.
    fn warn(&mut self, message: &str);

    /// Asks a yes/no question. With a default, empty input selects it.
    fn confirm(&mut self, question: &str, default: Option<bool>) -> bool;

    /// Reads one trimmed line after printing `label`. `None` at end of
    /// input.
    fn ask(&mut self, label: &str) -> Option<String>;
}

/// Prompt over a reader and two writers (normally stdin, stdout and
/// stderr)
pub struct TerminalPrompt<R, W, E> {
    input: R,
    output: W,
    errors: E,
}

impl TerminalPrompt<std::io::StdinLock<'static>, std::io::Stdout, std::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write, E: Write> TerminalPrompt<R, W, E> {
    pub fn new(input: R, output: W, errors: E) -> Self {
        Self { input, output, errors }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn errors(&self) -> &E {
        &self.errors
    }

    /// Lines that aren't valid UTF-8 are read lossily so callers reject
    /// them like any other wrong answer.
    fn read_line(&mut self) -> Option<String> {
        let mut line = Vec::new();
        loop {
            match self.input.read_until(b'\n', &mut line) {
                Ok(0) => return None,
                Ok(_) => return Some(String::from_utf8_lossy(&line).trim().to_string()),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    debug!("Can't read input: {}", e);
                    return None;
                }
            }
        }
    }
}

impl<R: BufRead, W: Write, E: Write> Prompt for TerminalPrompt<R, W, E> {
    fn say(&mut self, message: &str) {
        let _ = writeln!(self.output, "{}", message);
    }

    fn warn(&mut self, message: &str) {
        let _ = writeln!(self.errors, "error: {}", message);
    }

    fn confirm(&mut self, question: &str, default: Option<bool>) -> bool {
        self.say(question);
        let label = match default {
            Some(true) => "yes*/no> ",
            Some(false) => "yes/no*> ",
            None => "yes/no> ",
        };

        loop {
            let Some(answer) = self.ask(label) else {
                return default.unwrap_or(false);
            };
            if answer.is_empty() {
                match default {
                    Some(value) => return value,
                    None => continue,
                }
            }

            match answer.to_lowercase().as_str() {
                "y" | "yes" => return true,
                "n" | "no" => return false,
                _ => self.warn("Wrong answer! Enter \"yes\" or \"no\""),
            }
        }
    }

    fn ask(&mut self, label: &str) -> Option<String> {
        let _ = write!(self.output, "{}", label);
        let _ = self.output.flush();
        self.read_line()
    }
}
