/// Get the version string for parcel and libparcel
pub fn get_version_string() -> String {
    format!(
        "parcel {}\nlibparcel {}\nprotocol {}",
        env!("CARGO_PKG_VERSION"),
        libparcel::version(),
        libparcel::spec::v0::VERSION
    )
}

/// Print version information to stdout
pub fn print_version() {
    println!("{}", get_version_string());
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
