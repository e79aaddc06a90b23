//! Output formatting for the dotgather CLI.
//!
//! Messages go to stderr. Routine messages are dimmed, warnings and errors
//! bold, and paths are shown in centered banners sized to the terminal.

use colored::Colorize;
use std::sync::atomic::{AtomicU8, Ordering};

/// Width used when the terminal size cannot be read.
const FALLBACK_WIDTH: usize = 80;

/// Verbosity level for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Suppress informational messages, show only warnings and errors.
    Quiet = 0,
    /// Default verbosity level, show all standard messages.
    Normal = 1,
    /// Show verbose debug messages in addition to standard output.
    Verbose = 2,
}

/// Global verbosity setting (default: Normal).
static VERBOSITY: AtomicU8 = AtomicU8::new(1);

/// Sets the global verbosity level for all output functions.
pub fn set_verbosity(level: Verbosity) {
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Gets the current global verbosity level.
pub fn get_verbosity() -> Verbosity {
    match VERBOSITY.load(Ordering::Relaxed) {
        0 => Verbosity::Quiet,
        2 => Verbosity::Verbose,
        _ => Verbosity::Normal,
    }
}

fn quiet() -> bool {
    get_verbosity() == Verbosity::Quiet
}

/// Prints a success message in green (respects quiet mode).
pub fn success(message: &str) {
    if quiet() {
        return;
    }
    eprintln!("{} {}", "✓".green().bold(), message.green());
}

/// Prints an error message in bold red (always shown).
pub fn error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

/// Prints a warning message in bold yellow (always shown).
pub fn warning(message: &str) {
    eprintln!("{}", message.yellow().bold());
}

/// Prints an informational message in dimmed color (respects quiet mode).
pub fn info(message: &str) {
    if quiet() {
        return;
    }
    eprintln!("{}", message.dimmed());
}

/// Prints a verbose debug message (only in verbose mode).
pub fn verbose(message: &str) {
    if get_verbosity() != Verbosity::Verbose {
        return;
    }
    eprintln!("{}", message.dimmed());
}

/// Terminal width in columns.
fn width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| usize::from(cols))
        .ok()
        .filter(|&cols| cols > 0)
        .unwrap_or(FALLBACK_WIDTH)
}

/// `[ text ]` centered in `width` columns, padded with `fill`.
#[must_use]
pub fn centered(text: &str, width: usize, fill: char) -> String {
    let label = format!("[ {text} ]");
    let len = label.chars().count();
    if len >= width {
        return label;
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    let pad = |n| std::iter::repeat_n(fill, n).collect::<String>();
    format!("{}{label}{}", pad(left), pad(right))
}

/// Lines whose values end in the same column as `longest`.
///
/// The first line pairs `longest_prefix` with `longest`; every other value
/// is left-padded with `_` to the length of `longest`.
#[must_use]
pub fn aligned(longest_prefix: &str, longest: &str, others: &[(&str, &str)]) -> Vec<String> {
    let target = longest.chars().count();
    std::iter::once(format!("{longest_prefix}{longest}"))
        .chain(others.iter().map(|(prefix, text)| {
            let padding = target.saturating_sub(text.chars().count());
            format!("{prefix}{}{text}", "_".repeat(padding))
        }))
        .collect()
}

/// Prints a centered banner (respects quiet mode).
pub fn banner(text: &str) {
    if quiet() {
        return;
    }
    eprintln!("{}", centered(text, width(), '-').dimmed());
}

/// Prints a pair (or more) of paths as aligned banners (respects quiet mode).
pub fn paths(longest_prefix: &str, longest: &str, others: &[(&str, &str)]) {
    if quiet() {
        return;
    }
    let cols = width();
    for line in aligned(longest_prefix, longest, others) {
        eprintln!("{}", centered(&line, cols, '-'));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_round_trip() {
        let levels = [Verbosity::Quiet, Verbosity::Normal, Verbosity::Verbose];
        for level in &levels {
            set_verbosity(*level);
            assert_eq!(get_verbosity(), *level);
        }
        set_verbosity(Verbosity::Normal);
    }

    #[test]
    fn test_centered() {
        assert_eq!(centered("ab", 12, '-'), "---[ ab ]---");
        assert_eq!(centered("ab", 11, '-'), "--[ ab ]---");
        assert_eq!(centered("too long", 4, '-'), "[ too long ]");
    }

    #[test]
    fn test_aligned_pads_shorter_values() {
        let lines = aligned(
            "Target >> ",
            "/dots/host/data/etc/hosts",
            &[("Source >> ", "/etc/hosts")],
        );
        assert_eq!(lines[0], "Target >> /dots/host/data/etc/hosts");
        assert_eq!(lines[1], "Source >> _______________/etc/hosts");
        assert_eq!(lines[0].len(), lines[1].len());
    }
}
