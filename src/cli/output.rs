//! Colored terminal output.
//!
//! Colors are dropped when the stream is not a terminal, or everywhere after
//! `owo_colors::set_override(false)` (`--no-color`).

use std::fmt::Display;
use std::io::Write;

use owo_colors::{OwoColorize, Stream};

/// Success message (green, stdout).
pub fn success(message: impl Display) {
    println!(
        "{}",
        message.if_supports_color(Stream::Stdout, |text| text.green())
    );
}

/// Neutral information (cyan, stdout).
pub fn notice(message: impl Display) {
    println!(
        "{}",
        message.if_supports_color(Stream::Stdout, |text| text.cyan())
    );
}

/// Warning (yellow, stdout).
pub fn warning(message: impl Display) {
    println!(
        "{}",
        message.if_supports_color(Stream::Stdout, |text| text.yellow())
    );
}

/// Failed verdict (red, stdout).
pub fn failure(message: impl Display) {
    println!(
        "{}",
        message.if_supports_color(Stream::Stdout, |text| text.red())
    );
}

/// Error (red, stderr).
pub fn error(message: impl Display) {
    eprintln!(
        "{}",
        message.if_supports_color(Stream::Stderr, |text| text.red())
    );
}

/// Start a progress line, finished later by one of the functions above.
pub fn progress(message: impl Display) {
    print!("{} ", message);
    let _ = std::io::stdout().flush();
}
