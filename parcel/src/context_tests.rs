use super::*;
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_verbosity_from_count() {
    assert_eq!(VerbosityLevel::from_count(0), VerbosityLevel::Normal);
    assert_eq!(VerbosityLevel::from_count(1), VerbosityLevel::Verbose);
    assert_eq!(VerbosityLevel::from_count(2), VerbosityLevel::Debug);
    assert_eq!(VerbosityLevel::from_count(3), VerbosityLevel::Trace);
    assert_eq!(VerbosityLevel::from_count(9), VerbosityLevel::Trace);
}

#[test]
fn test_verbosity_filter_directive() {
    assert_eq!(VerbosityLevel::Normal.filter_directive(), "warn");
    assert_eq!(VerbosityLevel::Verbose.filter_directive(), "info");
    assert_eq!(VerbosityLevel::Debug.filter_directive(), "debug");
    assert_eq!(VerbosityLevel::Trace.filter_directive(), "trace");
}

#[test]
fn test_config_path_prefers_flag() {
    let path = Path::new("/tmp/parcel-flag.yaml");
    assert_eq!(
        config_path(Some(path)),
        ConfigSource::Explicit(path.to_path_buf())
    );
}

#[test]
fn test_build_reads_config_file() {
    let file = write_config("network:\n  timeout: 7\ndns:\n  max_aliases: 3\n");
    let overrides = CliOverrides {
        config_path: Some(file.path().to_path_buf()),
        ..Default::default()
    };

    let ctx = AppContext::build(&overrides, OutputFormat::Json).unwrap();

    assert_eq!(ctx.config.network.timeout, 7);
    assert_eq!(ctx.config.dns.max_aliases, 3);
    assert_eq!(ctx.format, OutputFormat::Json);
}

#[test]
fn test_build_flags_override_config_file() {
    let file = write_config("network:\n  timeout: 7\n");
    let overrides = CliOverrides {
        config_path: Some(file.path().to_path_buf()),
        insecure: true,
        timeout: Some(2),
    };

    let ctx = AppContext::build(&overrides, OutputFormat::Pretty).unwrap();

    assert_eq!(ctx.config.network.timeout, 2);
    assert!(ctx.config.network.insecure);
}

#[test]
fn test_build_missing_explicit_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let overrides = CliOverrides {
        config_path: Some(dir.path().join("absent.yaml")),
        ..Default::default()
    };

    let err = AppContext::build(&overrides, OutputFormat::Pretty)
        .unwrap_err();
    assert!(matches!(err, libparcel::ParcelError::Config { .. }));
}

#[test]
fn test_build_insecure_from_env() {
    let file = write_config("network:\n  insecure: false\n");
    let overrides = CliOverrides {
        config_path: Some(file.path().to_path_buf()),
        ..Default::default()
    };

    unsafe {
        std::env::set_var(INSECURE_ENV, "1");
    }
    let ctx = AppContext::build(&overrides, OutputFormat::Pretty);
    unsafe {
        std::env::remove_var(INSECURE_ENV);
    }

    assert!(ctx.unwrap().config.network.insecure);
}

#[test]
fn test_is_truthy() {
    for value in ["1", "true", "TRUE", "yes", " on "] {
        assert!(is_truthy(value), "{value:?}");
    }
    for value in ["0", "false", "", "nope"] {
        assert!(!is_truthy(value), "{value:?}");
    }
}

#[test]
fn test_parcel_from_context() {
    let file = write_config("network:\n  insecure: true\n");
    let overrides = CliOverrides {
        config_path: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    let ctx = AppContext::build(&overrides, OutputFormat::Pretty).unwrap();

    assert_eq!(ctx.parcel().unwrap().client().scheme(), "http");
}
