use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Parses and validates configuration text
///
/// # Errors
///
/// * `ConfigError::Parse` - The text is not valid TOML for `Config`
/// * `ConfigError::Validation` / `InvalidUrl` / `InvalidSelector` - A value is out of range
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads and parses a configuration file from the given path
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use forum_harvest::config::load_config;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// println!("Report goes to {}", config.output.file);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    parse_config(&std::fs::read_to_string(path)?)
}

/// Hex-encoded SHA-256 digest of configuration text
///
/// The digest is printed with the run summary, so a report can be traced
/// back to the configuration that produced it.
pub fn config_digest(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Digest of a configuration file on disk
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    Ok(config_digest(&std::fs::read_to_string(path)?))
}

/// Loads a configuration together with the digest of the exact text parsed
///
/// The file is read once, so the digest always matches the returned config.
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, config_digest(&content)))
}
