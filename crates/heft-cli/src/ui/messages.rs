//! Status messages.

use owo_colors::{OwoColorize, Stream::Stderr};

pub fn success(message: &str) {
    let mark = "✓".if_supports_color(Stderr, |t| t.green().bold().to_string());
    eprintln!("{} {}", mark, message);
}

pub fn info(message: &str) {
    let mark = "ℹ".if_supports_color(Stderr, |t| t.blue().bold().to_string());
    eprintln!("{} {}", mark, message);
}

pub fn warning(message: &str) {
    let mark = "⚠".if_supports_color(Stderr, |t| t.yellow().bold().to_string());
    eprintln!("{} {}", mark, message.if_supports_color(Stderr, |t| t.yellow()));
}

/// Printed only when debugging is enabled through config or `RUST_LOG`.
pub fn debug(enabled: bool, message: &str) {
    if enabled || std::env::var_os("RUST_LOG").is_some() {
        eprintln!(
            "{} {}",
            "◆".if_supports_color(Stderr, |t| t.dimmed()),
            message.if_supports_color(Stderr, |t| t.dimmed())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        success("Success message");
        info("Info message");
        warning("Warning message");
        debug(true, "Debug message");
    }
}
