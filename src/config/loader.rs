//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::FhirLakeConfig;
use crate::domain::errors::FhirLakeError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into FhirLakeConfig
/// 4. Applies environment variable overrides (FHIRLAKE_* prefix)
/// 5. Validates the configuration
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use fhirlake::config::loader::load_config;
///
/// let config = load_config("fhirlake.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<FhirLakeConfig> {
    let path = path.as_ref();

    // Check if file exists
    if !path.exists() {
        return Err(FhirLakeError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    // Read file contents
    let contents = fs::read_to_string(path).map_err(|e| {
        FhirLakeError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    // Perform environment variable substitution
    let contents = substitute_env_vars(&contents)?;

    // Parse TOML
    let mut config: FhirLakeConfig = toml::from_str(&contents)
        .map_err(|e| FhirLakeError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    // Apply environment variable overrides
    apply_env_overrides(&mut config);

    // Validate configuration
    config.validate().map_err(|e| {
        FhirLakeError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Arguments
///
/// * `input` - String containing ${VAR} placeholders
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        // Skip comment lines - don't process env vars in comments
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        // Process non-comment lines for env var substitution
        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(FhirLakeError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using FHIRLAKE_* prefix
///
/// Environment variables follow the pattern: FHIRLAKE_<SECTION>_<KEY>
/// For example: FHIRLAKE_FHIR_BASE_URL, FHIRLAKE_POSTGRES_HOST
///
/// # Arguments
///
/// * `config` - Mutable reference to the configuration to update
fn apply_env_overrides(config: &mut FhirLakeConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("FHIRLAKE_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // FHIR overrides
    if let Ok(val) = std::env::var("FHIRLAKE_FHIR_BASE_URL") {
        config.fhir.base_url = val;
    }
    if let Ok(val) = std::env::var("FHIRLAKE_FHIR_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.fhir.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("FHIRLAKE_FHIR_PAGE_SIZE") {
        if let Ok(size) = val.parse() {
            config.fhir.page_size = size;
        }
    }

    // PostgreSQL overrides
    if let Ok(val) = std::env::var("FHIRLAKE_POSTGRES_HOST") {
        config.postgres.host = val;
    }
    if let Ok(val) = std::env::var("FHIRLAKE_POSTGRES_PORT") {
        if let Ok(port) = val.parse() {
            config.postgres.port = port;
        }
    }
    if let Ok(val) = std::env::var("FHIRLAKE_POSTGRES_USER") {
        config.postgres.user = val;
    }
    if let Ok(val) = std::env::var("FHIRLAKE_POSTGRES_PASSWORD") {
        config.postgres.password = val;
    }
    if let Ok(val) = std::env::var("FHIRLAKE_POSTGRES_DBNAME") {
        config.postgres.dbname = val;
    }

    // Bronze overrides
    if let Ok(val) = std::env::var("FHIRLAKE_BRONZE_ROOT_DIR") {
        config.bronze.root_dir = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("FHIRLAKE_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("FHIRLAKE_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
