//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use mxdraw::{MxDrawError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for MxDrawError {
    fn from(err: ConfigError) -> Self {
        MxDrawError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (mxdraw/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, MxDrawError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("mxdraw/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "mxdraw", "mxdraw") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, MxDrawError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Result<AppConfig, MxDrawError> {
    let config: AppConfig =
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use mxdraw::config::FontBackend;

    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config(
            r##"
            [defaults]
            font_size = 14.0

            [layout]
            margin = 30.0

            [text]
            backend = "fixed"

            [style]
            background_color = "#ffffff"
            "##,
        )
        .unwrap();

        assert_eq!(config.defaults().font_size, 14.0);
        assert_eq!(config.defaults().end_arrow, "classic");
        assert_eq!(config.layout().margin(), 30.0);
        assert_eq!(config.layout().cap_trim(), 1.0);
        assert_eq!(config.text().backend(), FontBackend::Fixed);
        assert!(config.style().background_color().unwrap().is_some());
    }

    #[test]
    fn test_parse_text_font_settings() {
        let config = parse_config(
            r#"
            [text]
            glyph_paths = false
            font_files = ["fonts/Helvetica.ttf"]
            "#,
        )
        .unwrap();

        assert_eq!(config.text().backend(), FontBackend::System);
        assert!(!config.text().glyph_paths());
        assert_eq!(
            config.text().font_files(),
            [std::path::PathBuf::from("fonts/Helvetica.ttf")]
        );
    }

    #[test]
    fn test_parse_invalid_config() {
        let err = parse_config("[layout]\nmargin = \"wide\"").unwrap_err();
        assert!(matches!(err, MxDrawError::Config(_)));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = load_config(Some("does/not/exist.toml")).unwrap_err();
        assert!(err.to_string().contains("Missing configuration file"));
    }
}
