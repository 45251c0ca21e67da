//! Styled status lines on stderr.
//!
//! stdout is reserved for converted markdown (`mkstar transform`), so every
//! human-facing message goes through [`Output`].

use console::{Style, Term};

/// Message tone, mapped to a terminal style.
#[derive(Clone, Copy)]
enum Tone {
    Plain,
    Success,
    Warning,
    Error,
    Heading,
}

/// Status writer for the CLI commands.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    /// Print an unstyled message.
    pub(crate) fn info(&self, msg: &str) {
        self.write(Tone::Plain, msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.write(Tone::Success, msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.write(Tone::Warning, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.write(Tone::Error, msg);
    }

    /// Print the title of a block of output (a run phase, the summary).
    pub(crate) fn heading(&self, msg: &str) {
        self.write(Tone::Heading, msg);
    }

    /// Print an indented `label: value` line of a summary.
    pub(crate) fn field(&self, label: &str, value: impl std::fmt::Display) {
        self.write(Tone::Plain, &format!("  {label}: {value}"));
    }

    fn write(&self, tone: Tone, msg: &str) {
        let style = match tone {
            Tone::Plain => Style::new(),
            Tone::Success => Style::new().green(),
            Tone::Warning => Style::new().yellow(),
            Tone::Error => Style::new().red(),
            Tone::Heading => Style::new().cyan().bold(),
        };
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }
}
