use anstyle::{AnsiColor, Reset, Style};

const YELLOW: Style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Yellow)));
const BLUE: Style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Blue)));
const GRAY: Style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::BrightBlack)));

/// Text formatting helper. When disabled every method returns its input unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colors {
    enabled: bool,
}

impl Colors {
    #[must_use]
    pub const fn ansi() -> Self {
        Self { enabled: true }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self { enabled: false }
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.enabled {
            format!("{style}{text}{Reset}")
        } else {
            text.to_string()
        }
    }

    #[must_use]
    pub fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    #[must_use]
    pub fn blue(&self, text: &str) -> String {
        self.paint(BLUE, text)
    }

    #[must_use]
    pub fn gray(&self, text: &str) -> String {
        self.paint(GRAY, text)
    }
}
