// Interaction driver: prompt, parse the answer with a caller-supplied
// constructor, and ask again until the constructor accepts it. Every line
// the user types goes through here, menu selections included.

use std::io;

use thiserror::Error;

use crate::console::Console;
use crate::values::Rejection;

/// Why a prompt gave up without producing a value.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The console failed or the input stream was closed.
    #[error("could not read input: {0}")]
    Io(#[from] io::Error),

    /// The constructor failed for a reason retrying cannot fix.
    #[error(transparent)]
    Aborted(anyhow::Error),
}

impl PromptError {
    /// True when the input stream ended; no later prompt can succeed either.
    pub fn is_closed(&self) -> bool {
        matches!(self, PromptError::Io(err) if err.kind() == io::ErrorKind::UnexpectedEof)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Echo {
    Visible,
    Hidden,
}

fn read_raw<C>(console: &mut C, prompt: &str, echo: Echo) -> io::Result<String>
where
    C: Console + ?Sized,
{
    match echo {
        Echo::Visible => console.read_line(prompt),
        Echo::Hidden => console.read_secret(prompt),
    }
}

fn attempt<C, T, E, F>(
    console: &mut C,
    prompt: &str,
    echo: Echo,
    parse: &mut F,
) -> Result<Result<T, Rejection>, PromptError>
where
    C: Console + ?Sized,
    F: FnMut(&str) -> Result<T, E>,
    E: Into<Rejection>,
{
    let line = read_raw(console, prompt, echo)?;
    let outcome: Result<T, Rejection> = parse(line.trim()).map_err(Into::into);
    match outcome {
        Ok(value) => Ok(Ok(value)),
        Err(Rejection::Fatal(err)) => Err(PromptError::Aborted(err)),
        Err(rejection) => Ok(Err(rejection)),
    }
}

fn retry<C, T, E, F>(console: &mut C, prompt: &str, echo: Echo, mut parse: F) -> Result<T, PromptError>
where
    C: Console + ?Sized,
    F: FnMut(&str) -> Result<T, E>,
    E: Into<Rejection>,
{
    let prompt = format!("{prompt}: ");
    loop {
        match attempt(console, &prompt, echo, &mut parse)? {
            Ok(value) => return Ok(value),
            Err(rejection) => {
                tracing::debug!(prompt = %prompt.trim_end(), %rejection, "input rejected");
                console.say(&rejection.to_string())?;
            }
        }
    }
}

/// Show `prompt`, read one line and hand it (trimmed) to `parse`.
///
/// Invalid and malformed input is reported on one line and the prompt is
/// shown again. A fatal rejection, an I/O failure or the end of input ends
/// the loop with an error.
pub fn read<C, T, E, F>(console: &mut C, prompt: &str, parse: F) -> Result<T, PromptError>
where
    C: Console + ?Sized,
    F: FnMut(&str) -> Result<T, E>,
    E: Into<Rejection>,
{
    retry(console, prompt, Echo::Visible, parse)
}

/// [`read`] without echoing what the user types.
pub fn read_secret<C, T, E, F>(console: &mut C, prompt: &str, parse: F) -> Result<T, PromptError>
where
    C: Console + ?Sized,
    F: FnMut(&str) -> Result<T, E>,
    E: Into<Rejection>,
{
    retry(console, prompt, Echo::Hidden, parse)
}

/// A single round of [`read`]: the prompt is shown verbatim and a rejected
/// answer is returned to the caller instead of being retried.
pub fn read_once<C, T, E, F>(
    console: &mut C,
    prompt: &str,
    mut parse: F,
) -> Result<Result<T, Rejection>, PromptError>
where
    C: Console + ?Sized,
    F: FnMut(&str) -> Result<T, E>,
    E: Into<Rejection>,
{
    attempt(console, prompt, Echo::Visible, &mut parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use std::str::FromStr;

    use crate::values::{Email, Key, Password, Pegi};

    #[test]
    fn read_retries_until_the_value_is_valid() {
        let mut console = ScriptedConsole::new(["bad", "good"]);
        let mut calls = 0;
        let value = read(&mut console, "Word", |raw: &str| {
            calls += 1;
            if raw == "good" {
                Ok(raw.to_string())
            } else {
                Err(Rejection::invalid("not good"))
            }
        })
        .unwrap();

        assert_eq!(value, "good");
        assert_eq!(calls, 2);
        assert_eq!(console.output(), ["not good"]);
        assert_eq!(console.prompts(), ["Word: ", "Word: "]);
        assert_eq!(console.remaining(), 0);
    }

    #[test]
    fn read_trims_input() {
        let mut console = ScriptedConsole::new(["  domenico@gmail.com  "]);
        let email = read(&mut console, "Email", Email::from_str).unwrap();
        assert_eq!(email.as_str(), "domenico@gmail.com");
    }

    #[test]
    fn read_prints_value_help_message() {
        let mut console = ScriptedConsole::new([".a", "ok"]);
        let key = read(&mut console, "Key", Key::from_str).unwrap();
        assert_eq!(key.as_str(), "ok");
        assert_eq!(console.output().len(), 1);
        assert!(console.output()[0].starts_with("Invalid key"));
    }

    #[test]
    fn read_treats_malformed_like_invalid() {
        let mut console = ScriptedConsole::new(["twelve", "13", "12"]);
        let pegi = read(&mut console, "Pegi", |raw: &str| raw.parse::<Pegi>()).unwrap();
        assert_eq!(pegi.value(), 12);
        assert_eq!(console.output().len(), 2);
    }

    #[test]
    fn fatal_rejection_aborts_without_retry() {
        let mut console = ScriptedConsole::new(["anything", "never read"]);
        let err = read(&mut console, "Value", |_: &str| -> Result<(), Rejection> {
            Err(anyhow::anyhow!("constructor is broken").into())
        })
        .unwrap_err();

        assert!(matches!(err, PromptError::Aborted(_)));
        assert!(console.output().is_empty());
        assert_eq!(console.remaining(), 1);
    }

    #[test]
    fn closed_input_ends_the_loop() {
        let mut console = ScriptedConsole::new(["b@d"]);
        let err = read(&mut console, "Key", Key::from_str).unwrap_err();
        assert!(err.is_closed());
    }

    #[test]
    fn read_secret_uses_masked_input() {
        let mut console = ScriptedConsole::new(["short", "long enough"]);
        let password = read_secret(&mut console, "Password", Password::from_str).unwrap();
        assert_eq!(password.as_str(), "long enough");
        assert_eq!(console.output().len(), 1);
    }

    #[test]
    fn read_once_returns_rejection() {
        let mut console = ScriptedConsole::new(["!"]);
        let outcome = read_once(&mut console, "? ", Key::from_str).unwrap();
        assert!(matches!(outcome, Err(Rejection::Invalid(_))));
        assert_eq!(console.prompts(), ["? "]);
    }
}
