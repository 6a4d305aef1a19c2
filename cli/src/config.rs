//! Configuration file handling for the CLI.
//!
//! Stores the instance URL, the operator token and remembered table layouts in
//! `$XDG_CONFIG_HOME/tube-admin/config.toml`. Connection settings are layered:
//! command-line flags, then `TUBE_ADMIN_*` variables, then the file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tube_admin_business::{BusinessConfig, TableState};

/// CLI configuration stored on disk
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSection,

    /// Sort and page size per table identifier
    #[serde(default)]
    pub tables: BTreeMap<String, TableState>,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSection {
    pub url: Option<String>,
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

const ENV_PREFIX: &str = "TUBE_ADMIN_";
const ENV_URL: &str = "TUBE_ADMIN_URL";
const ENV_TOKEN: &str = "TUBE_ADMIN_TOKEN";
const ENV_TIMEOUT: &str = "TUBE_ADMIN_TIMEOUT_SECS";

/// Connection values given on the command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct ServerOverrides<'a> {
    pub url: Option<&'a str>,
    pub token: Option<&'a str>,
    pub timeout_secs: Option<u64>,
}

fn layer(
    vars: &mut BTreeMap<String, String>,
    url: Option<&str>,
    token: Option<&str>,
    timeout_secs: Option<u64>,
) {
    let values = [
        (ENV_URL, url.map(str::to_owned)),
        (ENV_TOKEN, token.map(str::to_owned)),
        (ENV_TIMEOUT, timeout_secs.map(|secs| secs.to_string())),
    ];
    for (key, value) in values {
        if let Some(value) = value {
            vars.insert(key.to_owned(), value);
        }
    }
}

impl Config {
    /// `$XDG_CONFIG_HOME/tube-admin/config.toml` on Linux, the platform
    /// equivalent elsewhere.
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("", "", "tube-admin")
            .context("Failed to determine config directory")?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Missing files load as the default configuration.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    pub fn set_server(&mut self, url: &str, token: &str) {
        self.server.url = Some(url.to_owned());
        self.server.token = Some(token.to_owned());
    }

    pub fn table_state(&self, identifier: &str) -> Option<TableState> {
        self.tables.get(identifier).copied()
    }

    pub fn set_table_state(&mut self, identifier: &str, state: TableState) {
        self.tables.insert(identifier.to_owned(), state);
    }

    pub fn business_config(&self, overrides: ServerOverrides<'_>) -> Result<BusinessConfig> {
        self.business_config_with_env(std::env::vars(), overrides)
    }

    /// Merge file values, `TUBE_ADMIN_*` variables and flags, later layers
    /// winning, and deserialize the result like the environment.
    pub fn business_config_with_env<I>(
        &self,
        env: I,
        overrides: ServerOverrides<'_>,
    ) -> Result<BusinessConfig>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut vars = BTreeMap::new();
        layer(
            &mut vars,
            self.server.url.as_deref(),
            self.server.token.as_deref(),
            self.server.timeout_secs,
        );
        vars.extend(env.into_iter().filter(|(key, _)| key.starts_with(ENV_PREFIX)));
        layer(
            &mut vars,
            overrides.url,
            overrides.token,
            overrides.timeout_secs,
        );

        if !vars.contains_key(ENV_URL) {
            bail!("No instance URL configured. Run `tube-admin login` or pass --url.");
        }
        BusinessConfig::from_vars(vars).context("Invalid connection settings")
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tube_admin_business::{Sort, SortOrder};

    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.server.url.is_none());
        assert!(config.tables.is_empty());
    }

    #[test]
    fn test_missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set_server("https://videos.example.org", "secret");
        config.set_table_state(
            "user-list",
            TableState {
                sort: Sort::new("username", SortOrder::Descending),
                rows_per_page: 50,
            },
        );
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.table_state("user-list").unwrap().rows_per_page, 50);
        assert!(loaded.table_state("video-list").is_none());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "server = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    fn no_env() -> Vec<(String, String)> {
        Vec::new()
    }

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect()
    }

    #[test]
    fn test_flags_override_file() {
        let mut config = Config::default();
        config.set_server("https://file.example.org", "file-token");

        let business = config
            .business_config_with_env(
                no_env(),
                ServerOverrides {
                    url: Some("https://flag.example.org"),
                    ..ServerOverrides::default()
                },
            )
            .unwrap();
        assert_eq!(business.api_base_url, "https://flag.example.org");
        assert_eq!(business.access_token(), Some("file-token"));
        assert_eq!(business.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_timeout_is_honored() {
        let mut config = Config::default();
        config.set_server("https://file.example.org", "file-token");
        config.server.timeout_secs = Some(60);

        let from_file = config
            .business_config_with_env(no_env(), ServerOverrides::default())
            .unwrap();
        assert_eq!(from_file.request_timeout(), Duration::from_secs(60));

        let env = env(&[("TUBE_ADMIN_TIMEOUT_SECS", "5"), ("HOME", "/root")]);
        let from_env = config
            .business_config_with_env(env.clone(), ServerOverrides::default())
            .unwrap();
        assert_eq!(from_env.request_timeout(), Duration::from_secs(5));
        assert_eq!(from_env.api_base_url, "https://file.example.org");

        let from_flag = config
            .business_config_with_env(
                env,
                ServerOverrides {
                    timeout_secs: Some(2),
                    ..ServerOverrides::default()
                },
            )
            .unwrap();
        assert_eq!(from_flag.request_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::default();
        config.set_server("https://file.example.org", "file-token");

        let business = config
            .business_config_with_env(
                env(&[
                    ("TUBE_ADMIN_URL", "https://env.example.org"),
                    ("TUBE_ADMIN_TOKEN", "env-token"),
                ]),
                ServerOverrides::default(),
            )
            .unwrap();
        assert_eq!(business.api_base_url, "https://env.example.org");
        assert_eq!(business.access_token(), Some("env-token"));
    }

    #[test]
    fn test_invalid_timeout_is_an_error() {
        let mut config = Config::default();
        config.set_server("https://file.example.org", "file-token");

        let result = config.business_config_with_env(
            env(&[("TUBE_ADMIN_TIMEOUT_SECS", "soon")]),
            ServerOverrides::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_url_is_an_error() {
        let result = Config::default().business_config_with_env(
            no_env(),
            ServerOverrides {
                token: Some("t"),
                ..ServerOverrides::default()
            },
        );
        assert!(result.is_err());
    }
}
