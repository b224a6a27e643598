use std::{fmt, fs::File, io::BufReader, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AdapterError;

/// Environment variable holding the GitHub personal access token.
pub const TOKEN_ENV: &str = "GITHUB_PERSONAL_ACCESS_TOKEN";
/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "REPO_REGISTER_CONFIG";
/// Environment variable overriding `server.port`.
pub const PORT_ENV: &str = "PORT";

const DEFAULT_CONFIG_PATH: &str = "config.yml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub github: GitHubConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self { Self { port: 8080 } }
}

#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Never read from the file; filled from [`TOKEN_ENV`] by [`Config::load`].
    #[serde(skip)]
    pub token: String,
    pub endpoint: Url,
    /// Total number of attempts, including the first one.
    pub retries: u32,
    pub retry_delay_ms: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            endpoint: Url::parse("https://api.github.com/graphql").expect("valid default endpoint"),
            retries: 3,
            retry_delay_ms: 1000,
            timeout_secs: 30,
            user_agent: concat!("repo-register/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl GitHubConfig {
    pub fn retry_delay(&self) -> Duration { Duration::from_millis(self.retry_delay_ms) }

    pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

// Keep the token out of debug logs.
impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &if self.token.is_empty() { "<unset>" } else { "<redacted>" })
            .field("endpoint", &self.endpoint.as_str())
            .field("retries", &self.retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Config {
    /// Loads `.env`, the optional YAML config file and the environment overrides.
    ///
    /// `path` takes precedence over [`CONFIG_PATH_ENV`]; a missing file at the
    /// default location is not an error, a missing explicit file is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(Into::into));
        let mut config = match &explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file {}", path.display()))?;
        serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Applies environment overrides and checks that a token is present.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), AdapterError> {
        if let Some(port) = var(PORT_ENV) {
            self.server.port = port.trim().parse().map_err(|_| {
                AdapterError::Configuration(format!("{PORT_ENV} is not a valid port: {port}"))
            })?;
        }
        match var(TOKEN_ENV).map(|t| t.trim().to_string()) {
            Some(token) if !token.is_empty() => self.github.token = token,
            _ => {
                return Err(AdapterError::Configuration(format!(
                    "{TOKEN_ENV} must be set to a GitHub access token"
                )));
            }
        }
        if self.github.retries == 0 {
            return Err(AdapterError::Configuration("github.retries must be at least 1".into()));
        }
        Ok(())
    }
}
