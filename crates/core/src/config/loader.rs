use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides; nested keys use `__`
/// (`REELHOUSE_LIBRARY__DESTINATION_ROOT`).
pub const CONFIG_ENV_PREFIX: &str = "REELHOUSE_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(CONFIG_ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[library]
destination_root = "/media/movies"

[matcher]
similarity_threshold = 0.9
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.library.destination_root, PathBuf::from("/media/movies"));
        assert!((config.matcher.similarity_threshold - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_config_from_str_missing_library() {
        let toml = r#"
[watcher]
poll_interval_ms = 1000
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[library]
destination_root = "/media/movies"
staging_dir = "/var/lib/reelhouse/staging"

[download_client]
backend = "qbittorrent"

[download_client.qbittorrent]
url = "http://localhost:8080"
username = "admin"
password = "adminadmin"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(
            config.library.staging_dir,
            PathBuf::from("/var/lib/reelhouse/staging")
        );
        let qb = config.download_client.unwrap().qbittorrent.unwrap();
        assert_eq!(qb.timeout_secs, 30);
        assert!(qb.category.is_none());
    }
}
