//! Terminal styling for log lines.
//!
//! Wraps text in ANSI markers on posix systems and leaves it untouched elsewhere.

const BOLD: &str = "\x1b[1m";
const RESET_STYLE: &str = "\x1b[22m";
const RESET_COLOR: &str = "\x1b[39m";

/// Foreground colors used in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Blue,
    Green,
    Yellow,
    Magenta,
}

impl Color {
    fn marker(self) -> &'static str {
        match self {
            Color::Blue => "\x1b[36m",
            Color::Green => "\x1b[32m",
            Color::Yellow => "\x1b[33m",
            Color::Magenta => "\x1b[35m",
        }
    }
}

/// Make the text bolder in the logs.
pub fn emphasize(s: &str) -> String {
    style(s, BOLD, RESET_STYLE, cfg!(unix))
}

/// Add color to the text in the logs.
pub fn colorize(s: &str, color: Color) -> String {
    style(s, color.marker(), RESET_COLOR, cfg!(unix))
}

fn style(s: &str, marker: &str, reset: &str, enabled: bool) -> String {
    if enabled {
        format!("{}{}{}", marker, s, reset)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_wraps_when_enabled() {
        assert_eq!(style("x", "<", ">", true), "<x>");
    }

    #[test]
    fn style_passes_through_when_disabled() {
        assert_eq!(style("x", "<", ">", false), "x");
    }

    #[cfg(unix)]
    #[test]
    fn emphasize_uses_bold_markers() {
        assert_eq!(emphasize("d8"), "\x1b[1md8\x1b[22m");
    }

    #[cfg(unix)]
    #[test]
    fn colorize_resets_only_the_color() {
        assert_eq!(colorize("ok", Color::Green), "\x1b[32mok\x1b[39m");
        let nested = colorize(&emphasize("bin"), Color::Blue);
        assert!(nested.starts_with("\x1b[36m\x1b[1m"));
        assert!(nested.ends_with("\x1b[22m\x1b[39m"));
    }
}
