//! User-facing notifications.
//!
//! Notifications go to stderr so they never mix with records written to
//! stdout. In interactive mode they block until the user presses Enter.

use console::{Term, style};

/// Outcome a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Failure,
}

/// Something that can show a notification to the user.
pub trait Notify {
    fn notify(&mut self, level: Level, message: &str);
}

/// Notifications on a terminal.
pub struct TermNotifier {
    term: Term,
    blocking: bool,
}

impl TermNotifier {
    /// Notifies on stderr. When `blocking`, each notification waits for
    /// Enter if stderr is a terminal.
    #[must_use]
    pub fn stderr(blocking: bool) -> Self {
        Self {
            term: Term::stderr(),
            blocking,
        }
    }
}

impl Notify for TermNotifier {
    fn notify(&mut self, level: Level, message: &str) {
        match level {
            Level::Success => log::info!("{message}"),
            Level::Failure => log::error!("{message}"),
        }

        if let Err(e) = self.term.write_line(&notice_line(level, message)) {
            log::warn!("Failed to write notification: {e}");
        }

        if self.blocking && self.term.is_term() {
            let _ = self
                .term
                .write_str(&style("Press Enter to continue").dim().to_string());
            let _ = self.term.read_line();
        }
    }
}

/// The styled line shown for a notification.
#[must_use]
pub fn notice_line(level: Level, message: &str) -> String {
    let mark = match level {
        Level::Success => style("✔").green().bold(),
        Level::Failure => style("✘").red().bold(),
    };
    format!("{mark} {message}")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Keeps every notification for inspection.
    pub type Recorded = Vec<(Level, String)>;

    impl Notify for Recorded {
        fn notify(&mut self, level: Level, message: &str) {
            self.push((level, message.to_owned()));
        }
    }

    #[test]
    fn notice_line_marks_level() {
        let ok = console::strip_ansi_codes(&notice_line(Level::Success, "Copied")).into_owned();
        let failed = console::strip_ansi_codes(&notice_line(Level::Failure, "Nope")).into_owned();

        assert_eq!(ok, "✔ Copied");
        assert_eq!(failed, "✘ Nope");
    }
}
