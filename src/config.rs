use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::crawl::{CrawlLimits, RatePacer};
use crate::graph::Namespaces;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub rate: RateConfig,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub namespaces: Namespaces,
}

/// Traversal budget and fan-out limits
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_fan_out")]
    pub max_following: usize,
    #[serde(default = "default_fan_out")]
    pub max_repos: usize,
    #[serde(default = "default_fan_out")]
    pub max_organizations: usize,
    #[serde(default = "default_fan_out")]
    pub max_members: usize,
    #[serde(default = "default_fan_out")]
    pub max_contributors: usize,
    #[serde(default = "default_max_reconnects")]
    pub max_reconnects: usize,
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            max_following: default_fan_out(),
            max_repos: default_fan_out(),
            max_organizations: default_fan_out(),
            max_members: default_fan_out(),
            max_contributors: default_fan_out(),
            max_reconnects: default_max_reconnects(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}

fn default_max_iterations() -> usize {
    5
}

fn default_fan_out() -> usize {
    30
}

fn default_max_reconnects() -> usize {
    5
}

fn default_reconnect_delay_ms() -> u64 {
    2000
}

/// Quota pacing
#[derive(Debug, Clone, Deserialize)]
pub struct RateConfig {
    /// Cool down once remaining requests drop to this value or below
    #[serde(default = "default_safety_margin")]
    pub safety_margin: u32,
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            safety_margin: default_safety_margin(),
            cooldown_secs: default_cooldown_secs(),
        }
    }
}

fn default_safety_margin() -> u32 {
    10
}

fn default_cooldown_secs() -> u64 {
    60
}

/// GitHub REST API client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Name of the environment variable holding the access token
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_env: default_token_env(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_user_agent() -> String {
    "foafhub".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in FOAFHUB_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // Optional: the token usually comes from .env
        let _ = dotenv::dotenv();

        let config_path = std::env::var("FOAFHUB_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&config_str)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.crawl.max_iterations == 0 {
            anyhow::bail!("crawl.max_iterations must be greater than 0");
        }

        if self.github.user_agent.trim().is_empty() {
            anyhow::bail!("github.user_agent must not be empty (GitHub rejects requests without one)");
        }

        url::Url::parse(&self.github.api_url)
            .with_context(|| format!("github.api_url is not a valid URL: {}", self.github.api_url))?;

        for (name, value) in [
            ("namespaces.accounts", &self.namespaces.accounts),
            ("namespaces.organizations", &self.namespaces.organizations),
            ("namespaces.repositories", &self.namespaces.repositories),
            ("namespaces.vocabulary", &self.namespaces.vocabulary),
        ] {
            url::Url::parse(value)
                .with_context(|| format!("{} is not an absolute IRI: {}", name, value))?;
        }

        Ok(())
    }

    /// Access token from the configured environment variable, if set
    pub fn github_token(&self) -> Option<String> {
        std::env::var(&self.github.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }

    /// Traversal limits derived from `[crawl]`
    pub fn crawl_limits(&self) -> CrawlLimits {
        CrawlLimits {
            max_iterations: self.crawl.max_iterations,
            max_following: self.crawl.max_following,
            max_repos: self.crawl.max_repos,
            max_organizations: self.crawl.max_organizations,
            max_members: self.crawl.max_members,
            max_contributors: self.crawl.max_contributors,
            max_reconnects: self.crawl.max_reconnects,
            reconnect_delay: Duration::from_millis(self.crawl.reconnect_delay_ms),
        }
    }

    /// Rate pacer derived from `[rate]`
    pub fn rate_pacer(&self) -> RatePacer {
        RatePacer::new(
            self.rate.safety_margin,
            Duration::from_secs(self.rate.cooldown_secs),
        )
    }
}
