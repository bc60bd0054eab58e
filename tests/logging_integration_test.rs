//! Integration tests for logging functionality

use fhirlake::config::LoggingConfig;
use fhirlake::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert_eq!(config.local_path, "logs");
}

// tracing_subscriber can only be initialized once per process, so this file
// carries exactly one init test.
#[test]
fn test_init_logging_with_file_layer_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "daily".to_string(),
    };

    let guard = init_logging("debug", &config).unwrap();

    assert!(log_path.exists());
    tracing::info!("logging initialized for test");
    drop(guard);
}
