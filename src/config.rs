//! Configuration management for Malipo
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//!
//! A provider is "configured" when its section is present. Sections come
//! from the YAML file or are created on the fly when one of the provider's
//! credential variables is set in the environment.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MalipoError, Result};

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/malipo.yaml";

/// Provider deployment to talk to
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Test deployment; no real money moves
    #[default]
    Sandbox,
    /// Live deployment
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sandbox => write!(f, "sandbox"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = MalipoError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sandbox" | "test" => Ok(Self::Sandbox),
            "production" | "live" | "prod" => Ok(Self::Production),
            other => Err(MalipoError::Config(format!(
                "Invalid environment: {}. Must be one of: sandbox, production",
                other
            ))),
        }
    }
}

/// Main configuration structure for Malipo
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Environment used by providers that do not override it
    #[serde(default)]
    pub environment: Environment,

    /// PayChangu settings; absent means not configured
    #[serde(default)]
    pub paychangu: Option<PayChanguConfig>,

    /// pawaPay settings; absent means not configured
    #[serde(default)]
    pub pawapay: Option<PawaPayConfig>,

    /// OneKhusa settings; absent means not configured
    #[serde(default)]
    pub onekhusa: Option<OneKhusaConfig>,
}

/// PayChangu provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct PayChanguConfig {
    /// Secret API key sent as a bearer token
    #[serde(default)]
    pub secret_key: String,

    /// Optional base URL override (tests, proxies)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// pawaPay provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct PawaPayConfig {
    /// API token sent as a bearer token
    #[serde(default)]
    pub api_token: String,

    /// Overrides the top-level environment for this provider
    #[serde(default)]
    pub environment: Option<Environment>,

    /// Optional base URL override (tests, proxies)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// OneKhusa provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct OneKhusaConfig {
    /// OAuth2 client identifier
    #[serde(default)]
    pub client_id: String,

    /// OAuth2 client secret
    #[serde(default)]
    pub client_secret: String,

    /// Sent as `X-Organisation-Id` on every request
    #[serde(default)]
    pub organisation_id: String,

    /// Overrides the top-level environment for this provider
    #[serde(default)]
    pub environment: Option<Environment>,

    /// Optional base URL override (tests, proxies)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Token endpoint; defaults to `{base_url}/v1/oauth/token`
    #[serde(default)]
    pub token_url: Option<String>,

    /// Optional OAuth2 scope
    #[serde(default)]
    pub scope: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for PayChanguConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            base_url: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for PawaPayConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            environment: None,
            base_url: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for OneKhusaConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            organisation_id: String::new(),
            environment: None,
            base_url: None,
            token_url: None,
            scope: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl PayChanguConfig {
    /// Creates a configuration with the given secret key
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            ..Self::default()
        }
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl PawaPayConfig {
    /// Creates a configuration with the given API token
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            ..Self::default()
        }
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl OneKhusaConfig {
    /// Creates a configuration with the given client credentials
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        organisation_id: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            organisation_id: organisation_id.into(),
            ..Self::default()
        }
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl fmt::Debug for PayChanguConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayChanguConfig")
            .field("secret_key", &redact(&self.secret_key))
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl fmt::Debug for PawaPayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PawaPayConfig")
            .field("api_token", &redact(&self.api_token))
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl fmt::Debug for OneKhusaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneKhusaConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("organisation_id", &self.organisation_id)
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .field("scope", &self.scope)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        ""
    } else {
        "***"
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    /// Parse configuration from a YAML file, without overrides
    ///
    /// # Errors
    ///
    /// Returns [`MalipoError::Config`] if the file cannot be read or parsed
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| MalipoError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| MalipoError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Some(value) = env_var("MALIPO_ENVIRONMENT") {
            match value.parse() {
                Ok(environment) => self.environment = environment,
                Err(_) => tracing::warn!("Invalid MALIPO_ENVIRONMENT: {}", value),
            }
        }

        // PayChangu
        if let Some(secret_key) = env_var("PAYCHANGU_SECRET_KEY") {
            self.paychangu.get_or_insert_with(Default::default).secret_key = secret_key;
        }
        if let Some(paychangu) = self.paychangu.as_mut() {
            if let Some(base_url) = env_var("PAYCHANGU_BASE_URL") {
                paychangu.base_url = Some(base_url);
            }
        }

        // pawaPay
        if let Some(api_token) = env_var("PAWAPAY_API_TOKEN") {
            self.pawapay.get_or_insert_with(Default::default).api_token = api_token;
        }
        if let Some(pawapay) = self.pawapay.as_mut() {
            if let Some(value) = env_var("PAWAPAY_ENVIRONMENT") {
                match value.parse() {
                    Ok(environment) => pawapay.environment = Some(environment),
                    Err(_) => tracing::warn!("Invalid PAWAPAY_ENVIRONMENT: {}", value),
                }
            }
            if let Some(base_url) = env_var("PAWAPAY_BASE_URL") {
                pawapay.base_url = Some(base_url);
            }
        }

        // OneKhusa
        let client_id = env_var("ONEKHUSA_CLIENT_ID");
        let client_secret = env_var("ONEKHUSA_CLIENT_SECRET");
        let organisation_id = env_var("ONEKHUSA_ORGANISATION_ID");
        if client_id.is_some() || client_secret.is_some() || organisation_id.is_some() {
            let onekhusa = self.onekhusa.get_or_insert_with(Default::default);
            if let Some(client_id) = client_id {
                onekhusa.client_id = client_id;
            }
            if let Some(client_secret) = client_secret {
                onekhusa.client_secret = client_secret;
            }
            if let Some(organisation_id) = organisation_id {
                onekhusa.organisation_id = organisation_id;
            }
        }
        if let Some(onekhusa) = self.onekhusa.as_mut() {
            if let Some(value) = env_var("ONEKHUSA_ENVIRONMENT") {
                match value.parse() {
                    Ok(environment) => onekhusa.environment = Some(environment),
                    Err(_) => tracing::warn!("Invalid ONEKHUSA_ENVIRONMENT: {}", value),
                }
            }
            if let Some(base_url) = env_var("ONEKHUSA_BASE_URL") {
                onekhusa.base_url = Some(base_url);
            }
            if let Some(token_url) = env_var("ONEKHUSA_TOKEN_URL") {
                onekhusa.token_url = Some(token_url);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(environment) = cli.environment {
            tracing::debug!("Environment overridden from command line: {}", environment);
            self.environment = environment;
        }
    }

    /// Names of the providers that have a configuration section
    pub fn configured_providers(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.paychangu.is_some() {
            names.push("paychangu");
        }
        if self.pawapay.is_some() {
            names.push("pawapay");
        }
        if self.onekhusa.is_some() {
            names.push("onekhusa");
        }
        names
    }

    /// Validate the configuration
    ///
    /// Every configured provider must carry non-empty credentials and a
    /// positive timeout.
    ///
    /// # Errors
    ///
    /// Returns [`MalipoError::MissingCredentials`] or [`MalipoError::Config`]
    /// for the first failing check
    pub fn validate(&self) -> Result<()> {
        if let Some(paychangu) = &self.paychangu {
            require("paychangu", "secret_key", &paychangu.secret_key)?;
            require_timeout("paychangu", paychangu.timeout_ms)?;
        }

        if let Some(pawapay) = &self.pawapay {
            require("pawapay", "api_token", &pawapay.api_token)?;
            require_timeout("pawapay", pawapay.timeout_ms)?;
        }

        if let Some(onekhusa) = &self.onekhusa {
            require("onekhusa", "client_id", &onekhusa.client_id)?;
            require("onekhusa", "client_secret", &onekhusa.client_secret)?;
            require("onekhusa", "organisation_id", &onekhusa.organisation_id)?;
            require_timeout("onekhusa", onekhusa.timeout_ms)?;
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn require(provider: &str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MalipoError::MissingCredentials(format!("{}.{} is empty", provider, field)).into());
    }
    Ok(())
}

fn require_timeout(provider: &str, timeout_ms: u64) -> Result<()> {
    if timeout_ms == 0 {
        return Err(MalipoError::Config(format!(
            "{}.timeout_ms must be greater than 0",
            provider
        ))
        .into());
    }
    Ok(())
}
