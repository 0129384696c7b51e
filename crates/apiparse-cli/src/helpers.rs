//! Shared CLI helpers — path expansion and reply printing.

use std::path::PathBuf;

use colored::Colorize;

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Print a model reply to stdout under a header naming the model.
pub fn print_response(model: &str, response: &str) {
    println!();
    println!("{}", model.cyan().bold());
    if response.trim().is_empty() {
        println!("{}", "(empty response)".dimmed());
    } else {
        println!("{response}");
    }
    println!();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_tilde_home() {
        let result = expand_tilde("~/.apiparse/config.json");
        assert!(result.ends_with(".apiparse/config.json"));
        assert!(!result.starts_with("~"));
    }

    #[test]
    fn expand_tilde_no_tilde() {
        let result = expand_tilde("/etc/apiparse.json");
        assert_eq!(result, PathBuf::from("/etc/apiparse.json"));
    }

    #[test]
    fn expand_tilde_bare() {
        let result = expand_tilde("~");
        assert!(!result.to_string_lossy().contains('~'));
    }

    #[test]
    fn expand_tilde_only_at_start() {
        let result = expand_tilde("configs/~backup.json");
        assert_eq!(result, PathBuf::from("configs/~backup.json"));
    }
}
