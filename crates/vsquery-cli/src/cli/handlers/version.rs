//! Version command

/// Print the version number
pub fn handle_version() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}
