// Console module: the line-oriented terminal every prompt and menu talks
// to. `StdConsole` is the real terminal; `ScriptedConsole` replays a fixed
// list of lines and records what was printed, which is how the menu engine
// and the application flows are tested.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crossterm::tty::IsTty;
use dialoguer::console::Term;

/// Line-based input and output.
///
/// Reads block until a full line is available. End of input is reported as
/// `io::ErrorKind::UnexpectedEof`: once the stream is closed no prompt can
/// ever be answered.
pub trait Console {
    /// Show `prompt` and read one line, without its line terminator.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;

    /// Like [`Console::read_line`] but the typed characters are not echoed.
    fn read_secret(&mut self, prompt: &str) -> io::Result<String>;

    /// Print one line of output.
    fn say(&mut self, line: &str) -> io::Result<()>;
}

impl<C: Console + ?Sized> Console for &mut C {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        (**self).read_line(prompt)
    }

    fn read_secret(&mut self, prompt: &str) -> io::Result<String> {
        (**self).read_secret(prompt)
    }

    fn say(&mut self, line: &str) -> io::Result<()> {
        (**self).say(line)
    }
}

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "input stream closed")
}

/// The process' own terminal.
pub struct StdConsole {
    term: Term,
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    fn read_stdin_line(&self) -> io::Result<String> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(closed());
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(line)
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for StdConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        self.term.write_str(prompt)?;
        self.term.flush()?;
        self.read_stdin_line()
    }

    fn read_secret(&mut self, prompt: &str) -> io::Result<String> {
        self.term.write_str(prompt)?;
        self.term.flush()?;
        // Masking needs a real terminal; piped input is read as-is.
        if io::stdin().is_tty() {
            self.term.read_secure_line()
        } else {
            self.read_stdin_line()
        }
    }

    fn say(&mut self, line: &str) -> io::Result<()> {
        self.term.write_line(line)
    }
}

/// A console fed from a fixed list of lines that records its output.
///
/// Each recorded line is either something printed with [`Console::say`] or
/// a prompt; prompts are stored with their text so tests can count them.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    output: Vec<String>,
    prompts: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            output: Vec::new(),
            prompts: Vec::new(),
        }
    }

    /// Lines printed so far, prompts excluded.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Prompts shown so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Input lines not consumed yet.
    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    /// How many printed lines are exactly `line`.
    pub fn count(&self, line: &str) -> usize {
        self.output.iter().filter(|l| *l == line).count()
    }

    fn next_line(&mut self, prompt: &str) -> io::Result<String> {
        self.prompts.push(prompt.to_string());
        self.input.pop_front().ok_or_else(closed)
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        self.next_line(prompt)
    }

    fn read_secret(&mut self, prompt: &str) -> io::Result<String> {
        self.next_line(prompt)
    }

    fn say(&mut self, line: &str) -> io::Result<()> {
        self.output.push(line.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_console_replays_lines_in_order() {
        let mut console = ScriptedConsole::new(["first", "second"]);
        assert_eq!(console.read_line("a: ").unwrap(), "first");
        assert_eq!(console.read_secret("b: ").unwrap(), "second");
        assert_eq!(console.prompts(), ["a: ", "b: "]);
        assert_eq!(console.remaining(), 0);
    }

    #[test]
    fn scripted_console_reports_closed_input() {
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        let err = console.read_line("? ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn scripted_console_records_output() {
        let mut console = ScriptedConsole::default();
        console.say("hi").unwrap();
        console.say("hi").unwrap();
        assert_eq!(console.count("hi"), 2);
        assert_eq!(console.output(), ["hi", "hi"]);
    }

    #[test]
    fn mutable_reference_is_a_console() {
        fn first_line<C: Console>(mut console: C) -> String {
            console.read_line("? ").unwrap()
        }

        let mut console = ScriptedConsole::new(["x", "y"]);
        assert_eq!(first_line(&mut console), "x");
        assert_eq!(console.remaining(), 1);
    }
}
