//! User-facing output: styled messages on stdout, errors and progress on stderr.

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use styles::Styles;

/// Styling and terminal state for one invocation.
pub struct OutputContext {
    pub styles: Styles,
    /// Whether stderr is a terminal; spinners are only drawn there.
    pub is_tty: bool,
    /// Suppress everything except errors.
    pub quiet: bool,
}

impl OutputContext {
    /// Colours are used only on a terminal, and never with `--no-color` or
    /// a non-empty `NO_COLOR`.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let no_color = no_color || no_color_requested(std::env::var_os("NO_COLOR").as_deref());
        let colour = !no_color && Term::stdout().is_term();
        Self {
            styles: if colour { Styles::coloured() } else { Styles::default() },
            is_tty: Term::stderr().is_term(),
            quiet,
        }
    }

    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// `✓ msg`
    pub fn success(&self, msg: &str) {
        self.line("✓", self.styles.ok, msg);
    }

    /// `ℹ msg`
    pub fn info(&self, msg: &str) {
        self.line("ℹ", self.styles.info, msg);
    }

    /// `✗ msg` on stderr, printed even when quiet.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    pub fn section(&self, title: &str) {
        if !self.quiet {
            println!("  {}", title.style(self.styles.section));
        }
    }

    /// `key  value`, key dimmed.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.label));
        }
    }

    fn line(&self, mark: &str, style: owo_colors::Style, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", mark.style(style));
        }
    }
}

/// `NO_COLOR` disables colour whenever it is set to anything but the empty
/// string (no-color.org).
#[must_use]
pub fn no_color_requested(value: Option<&std::ffi::OsStr>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
