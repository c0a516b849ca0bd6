//! Colour palette for terminal output.

use owo_colors::Style;

/// Styles applied by `OutputContext`. The default palette is plain text.
#[derive(Default, Clone)]
pub struct Styles {
    pub ok: Style,
    pub warning: Style,
    pub error: Style,
    pub info: Style,
    /// Keys of key/value lines.
    pub label: Style,
    /// Container and volume names inside messages.
    pub name: Style,
    /// Section titles in `config show`.
    pub section: Style,
}

impl Styles {
    /// Palette used when stdout is a colour-capable terminal.
    #[must_use]
    pub fn coloured() -> Self {
        Self {
            ok: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red(),
            info: Style::new().blue(),
            label: Style::new().dimmed(),
            name: Style::new().bold(),
            section: Style::new().bold().cyan(),
        }
    }
}
