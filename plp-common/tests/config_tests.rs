//! Tests for configuration resolution and graceful degradation
//!
//! Note: Uses serial_test to prevent ENV variable race conditions. Tests
//! that manipulate PLP_* variables are marked with #[serial] so they run
//! sequentially, not in parallel.

use plp_common::config::{load_toml_config, Settings, DEFAULT_SEARCH_BASE_URL};
use serial_test::serial;
use std::env;
use std::io::Write;
use std::time::Duration;

fn clear_plp_env() {
    for name in [
        "PLP_SEARCH_BASE_URL",
        "PLP_REQUEST_TIMEOUT_SECS",
        "PLP_MAX_CONCURRENT_SENTENCES",
        "PLP_GATHER_TIMEOUT_SECS",
        "PLP_DATABASE",
        "PLP_LISTEN",
        "PLP_LOG",
    ] {
        env::remove_var(name);
    }
}

#[test]
#[serial]
fn missing_config_file_falls_back_to_defaults() {
    clear_plp_env();

    let settings = Settings::resolve(Some(std::path::Path::new(
        "/nonexistent/playlistpoetry/config.toml",
    )));

    assert_eq!(settings.search_base_url, DEFAULT_SEARCH_BASE_URL);
    assert_eq!(settings.request_timeout, Duration::from_secs(15));
    assert_eq!(settings.max_concurrent_sentences, 8);
    assert!(settings.database.is_none());
    assert_eq!(settings.listen, "127.0.0.1:5000");
    assert_eq!(settings.log_level, "info");
}

#[test]
#[serial]
fn toml_values_override_defaults() {
    clear_plp_env();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
search_base_url = "http://localhost:9090/v1"
request_timeout_secs = 3
max_concurrent_sentences = 2
database = "/tmp/plp-cache.db"

[logging]
level = "debug"
"#
    )
    .unwrap();

    let settings = Settings::resolve(Some(file.path()));

    assert_eq!(settings.search_base_url, "http://localhost:9090/v1");
    assert_eq!(settings.request_timeout, Duration::from_secs(3));
    assert_eq!(settings.max_concurrent_sentences, 2);
    assert_eq!(
        settings.database.as_deref(),
        Some(std::path::Path::new("/tmp/plp-cache.db"))
    );
    assert_eq!(settings.log_level, "debug");
}

#[test]
#[serial]
fn env_overrides_toml() {
    clear_plp_env();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"search_base_url = "http://from-toml:1/v1""#).unwrap();

    env::set_var("PLP_SEARCH_BASE_URL", "http://from-env:2/v1");
    env::set_var("PLP_LISTEN", "0.0.0.0:8080");

    let settings = Settings::resolve(Some(file.path()));
    clear_plp_env();

    assert_eq!(settings.search_base_url, "http://from-env:2/v1");
    assert_eq!(settings.listen, "0.0.0.0:8080");
}

#[test]
#[serial]
fn zero_concurrency_limit_is_rejected() {
    clear_plp_env();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_concurrent_sentences = 0").unwrap();

    let settings = Settings::resolve(Some(file.path()));
    assert_eq!(settings.max_concurrent_sentences, 8);
}

#[test]
fn malformed_toml_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "search_base_url = [not toml").unwrap();

    assert!(load_toml_config(Some(file.path())).is_err());
}
