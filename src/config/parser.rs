use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads, parses and validates a finder configuration file
///
/// Missing `[crawler]`, `[output]` and `[search]` sections fall back to
/// their defaults; `[user-agent]` must always be present.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use ui_faculty_finder::config::load_config;
///
/// let config = load_config(Path::new("finder.toml")).unwrap();
/// println!("Crawling at most {} pages", config.crawler.max_pages);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with_hash(path).map(|(config, _)| config)
}

/// Like [`load_config`], also returning the SHA-256 hex digest of the file
///
/// The digest is recorded with each crawl run. The file is read once, so
/// it always describes the content that was parsed.
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, content_hash(&content)))
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn content_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
