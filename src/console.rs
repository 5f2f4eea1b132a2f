use dialoguer::{Input, Password};
use std::collections::VecDeque;
use std::io::{self, Write};

/// Line-based terminal seam used by the menus.
///
/// `Ok(None)` from a read means end of input; the menus treat it as quit.
pub trait Console {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.read_line(prompt)
    }

    fn print(&mut self, text: &str) -> io::Result<()>;
}

/// Interactive terminal console: `dialoguer` prompts, hidden password entry.
#[derive(Debug, Default)]
pub struct StdConsole;

impl StdConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for StdConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        end_of_input_as_none(
            Input::<String>::new()
                .with_prompt(prompt_label(prompt))
                .allow_empty(true)
                .interact_text(),
        )
    }

    fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        end_of_input_as_none(
            Password::new()
                .with_prompt(prompt_label(prompt))
                .allow_empty_password(true)
                .interact(),
        )
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{text}")?;
        out.flush()
    }
}

/// dialoguer appends its own `: ` after the prompt.
fn prompt_label(prompt: &str) -> &str {
    prompt.trim_end().trim_end_matches(':')
}

fn end_of_input_as_none(res: Result<String, dialoguer::Error>) -> io::Result<Option<String>> {
    match res {
        Ok(line) => Ok(Some(line)),
        Err(e) => {
            let dialoguer::Error::IO(e) = e;
            if e.kind() == io::ErrorKind::UnexpectedEof {
                Ok(None)
            } else {
                Err(e)
            }
        }
    }
}

/// Replays canned input lines and records everything printed.
///
/// Prompts are recorded in the transcript too, so a test can assert on what the
/// user would have seen.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn output(&self) -> String {
        self.transcript.join("\n")
    }

    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.transcript.push(prompt.to_string());
        Ok(self.input.pop_front())
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        self.transcript.push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_console_replays_then_signals_eof() {
        let mut c = ScriptedConsole::new(["1", "alice"]);
        assert_eq!(c.read_line("> ").unwrap().as_deref(), Some("1"));
        assert_eq!(c.read_secret("pw: ").unwrap().as_deref(), Some("alice"));
        assert_eq!(c.read_line("> ").unwrap(), None);
        c.print("bye").unwrap();
        assert_eq!(c.transcript(), ["> ", "pw: ", "> ", "bye"]);
        assert_eq!(c.remaining_input(), 0);
    }

    #[test]
    fn prompt_label_drops_trailing_colon() {
        assert_eq!(prompt_label("Password: "), "Password");
        assert_eq!(prompt_label("Role [user/admin]: "), "Role [user/admin]");
        assert_eq!(prompt_label("Choose"), "Choose");
    }

    #[test]
    fn terminal_eof_reads_as_end_of_input() {
        let eof = dialoguer::Error::IO(io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
        assert_eq!(end_of_input_as_none(Err(eof)).unwrap(), None);

        let broken = dialoguer::Error::IO(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        assert_eq!(
            end_of_input_as_none(Err(broken)).unwrap_err().kind(),
            io::ErrorKind::BrokenPipe
        );
        assert_eq!(
            end_of_input_as_none(Ok("x".to_string())).unwrap().as_deref(),
            Some("x")
        );
    }
}
