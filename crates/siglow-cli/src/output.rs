//! Colored terminal output for the CLI.
//!
//! Respects the `NO_COLOR` environment variable and the `--color` flag.

use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Resolve `ColorChoice` from CLI flag and environment.
///
/// Priority: `NO_COLOR` env > `--color` flag > auto-detect TTY.
pub fn resolve_color_choice(flag: Option<&str>) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    match flag {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

/// Styled writer over stderr; stdout is reserved for lowered output.
pub struct StyledOutput {
    stderr: StandardStream,
}

impl StyledOutput {
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stderr: StandardStream::stderr(choice),
        }
    }

    /// Underlying stream, for codespan-reporting
    pub fn stream(&mut self) -> &mut StandardStream {
        &mut self.stderr
    }

    fn write_styled(&mut self, text: &str, color: Option<Color>, bold: bool) {
        let mut spec = ColorSpec::new();
        spec.set_fg(color).set_bold(bold);
        let _ = self.stderr.set_color(&spec);
        let _ = write!(self.stderr, "{}", text);
        let _ = self.stderr.reset();
    }

    /// `error: <text>` with a red label
    pub fn error_line(&mut self, text: &str) {
        self.write_styled("error", Some(Color::Red), true);
        let _ = writeln!(self.stderr, ": {}", text);
    }

    /// One-line run summary, colored by outcome
    pub fn summary(&mut self, errors: usize, warnings: usize, overloads: usize) {
        let (label, color) = if errors > 0 {
            ("failed", Color::Red)
        } else if warnings > 0 {
            ("finished with warnings", Color::Yellow)
        } else {
            ("ok", Color::Green)
        };
        self.write_styled(label, Some(color), true);
        let _ = writeln!(
            self.stderr,
            ": {} overload(s), {} error(s), {} warning(s)",
            overloads, errors, warnings
        );
    }
}
