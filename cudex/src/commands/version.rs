/// Get the version string for cudex and libcudex
pub fn get_version_string() -> String {
    format!(
        "cudex {}\nlibcudex {}",
        env!("CARGO_PKG_VERSION"),
        libcudex::version()
    )
}

/// Print version information to stdout
pub fn print_version() {
    println!("{}", get_version_string());
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
