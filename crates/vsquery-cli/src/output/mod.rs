//! Output formatting utilities
//!
//! API payloads go to stdout untouched; status messages go to stderr so
//! they never mix with JSON piped into other tools.

use console::style;

/// Print a response body exactly as received
pub fn print_body(body: &str) {
    println!("{body}");
}

/// Print a success message with green checkmark
pub fn print_success(message: &str) {
    eprintln!("{} {}", style("✓").green().bold(), message);
}

/// Print an informational message with blue info icon
pub fn print_info(message: &str) {
    eprintln!("{} {}", style("ℹ").blue(), message);
}

/// Compress a path to use tilde notation for home directory
pub fn compress_path(path: &std::path::Path) -> String {
    if let Ok(home_dir) = std::env::var("HOME") {
        let home_path = std::path::Path::new(&home_dir);
        if let Ok(relative) = path.strip_prefix(home_path) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}
