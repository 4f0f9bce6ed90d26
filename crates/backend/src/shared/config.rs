use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub seeds: SeedsConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for an uploaded import file, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedsConfig {
    #[serde(default = "default_workbook_path")]
    pub workbook_path: String,
}

impl Default for SeedsConfig {
    fn default() -> Self {
        Self {
            workbook_path: default_workbook_path(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    /// Password assigned to imported members (the CSV has no password column)
    #[serde(default = "default_member_password")]
    pub default_member_password: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_member_password: default_member_password(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_workbook_path() -> String {
    "db/seeds/excel/seeds.xlsx".to_string()
}

fn default_member_password() -> String {
    "password".to_string()
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/bizhub.db"

[server]
port = 3000
max_upload_bytes = 26214400

[seeds]
workbook_path = "db/seeds/excel/seeds.xlsx"

[import]
default_member_password = "password"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Resolves a configured path: absolute paths are kept, relative ones are
/// taken relative to the executable directory
fn resolve_path(configured: &str) -> PathBuf {
    let path = Path::new(configured);

    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(path);
        }
    }

    PathBuf::from(configured)
}

/// Get the database file path from configuration
pub fn get_database_path(config: &Config) -> PathBuf {
    resolve_path(&config.database.path)
}

/// Get the seed workbook path from configuration
pub fn get_workbook_path(config: &Config) -> PathBuf {
    resolve_path(&config.seeds.workbook_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.database.path, "target/db/bizhub.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.max_upload_bytes, 25 * 1024 * 1024);
        assert_eq!(config.seeds.workbook_path, "db/seeds/excel/seeds.xlsx");
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("[database]\npath = \"x.db\"\n").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.import.default_member_password, "password");
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let resolved = resolve_path("/var/lib/bizhub/app.db");
        assert_eq!(resolved, PathBuf::from("/var/lib/bizhub/app.db"));
    }
}
