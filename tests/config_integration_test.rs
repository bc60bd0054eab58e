//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables should be run with --test-threads=1
//! to avoid interference between tests.

use fhirlake::config::load_config;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("FHIRLAKE_APPLICATION_LOG_LEVEL");
    std::env::remove_var("FHIRLAKE_FHIR_BASE_URL");
    std::env::remove_var("FHIRLAKE_FHIR_PAGE_SIZE");
    std::env::remove_var("FHIRLAKE_POSTGRES_HOST");
    std::env::remove_var("FHIRLAKE_POSTGRES_PASSWORD");
    std::env::remove_var("FHIRLAKE_BRONZE_ROOT_DIR");
    std::env::remove_var("TEST_FHIRLAKE_PG_PASSWORD");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

const COMPLETE_CONFIG: &str = r#"
[application]
log_level = "debug"

[fhir]
base_url = "http://hapi.fhir.org/baseR4"
timeout_seconds = 15
page_size = 25
resource_types = ["Patient", "Condition"]

[postgres]
host = "localhost"
port = 5433
user = "etl"
password = "secret"
dbname = "medical_db"
max_connections = 4

[bronze]
root_dir = "data/bronze"

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#;

#[test]
fn test_load_complete_config() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(COMPLETE_CONFIG);
    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.fhir.base_url, "http://hapi.fhir.org/baseR4");
    assert_eq!(config.fhir.timeout_seconds, 15);
    assert_eq!(config.fhir.page_size, 25);
    assert_eq!(config.fhir.resource_types.len(), 2);
    assert_eq!(config.postgres.port, 5433);
    assert_eq!(config.postgres.max_connections, 4);
    assert_eq!(config.bronze.root_dir, "data/bronze");
}

#[test]
fn test_env_var_substitution_in_password() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_FHIRLAKE_PG_PASSWORD", "from-env");

    let temp_file = write_config(
        r#"
[fhir]
base_url = "http://hapi.fhir.org/baseR4"

[postgres]
host = "localhost"
user = "etl"
password = "${TEST_FHIRLAKE_PG_PASSWORD}"
dbname = "medical_db"
"#,
    );

    let config = load_config(temp_file.path()).unwrap();
    assert_eq!(config.postgres.password, "from-env");

    cleanup_env_vars();
}

#[test]
fn test_env_overrides_take_precedence() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("FHIRLAKE_FHIR_BASE_URL", "http://other.example.com/fhir");
    std::env::set_var("FHIRLAKE_FHIR_PAGE_SIZE", "7");
    std::env::set_var("FHIRLAKE_BRONZE_ROOT_DIR", "/tmp/bronze");

    let temp_file = write_config(COMPLETE_CONFIG);
    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.fhir.base_url, "http://other.example.com/fhir");
    assert_eq!(config.fhir.page_size, 7);
    assert_eq!(config.bronze.root_dir, "/tmp/bronze");

    cleanup_env_vars();
}

#[test]
fn test_missing_required_section_fails() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[fhir]
base_url = "http://hapi.fhir.org/baseR4"
"#,
    );

    assert!(load_config(temp_file.path()).is_err());
}

#[test]
fn test_invalid_values_fail_validation() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[fhir]
base_url = "not-a-url"

[postgres]
host = "localhost"
user = "etl"
dbname = "medical_db"
"#,
    );

    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("base_url"));
}
