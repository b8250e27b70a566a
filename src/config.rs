//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `REALTY_DESK_*` environment overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Headless content store (Sanity) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
    #[serde(default)]
    pub project_id: String,

    #[serde(default = "default_dataset")]
    pub dataset: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Read token; when set the CDN is bypassed
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_use_cdn")]
    pub use_cdn: bool,

    #[serde(default = "default_perspective")]
    pub perspective: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_dataset() -> String {
    "production".to_string()
}

fn default_api_version() -> String {
    "2024-12-01".to_string()
}

fn default_use_cdn() -> bool {
    true
}

fn default_perspective() -> String {
    "published".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: default_dataset(),
            api_version: default_api_version(),
            token: None,
            use_cdn: default_use_cdn(),
            perspective: default_perspective(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

/// Identity provider (Clerk) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// When false, requests pass through without a session (dev mode)
    #[serde(default = "default_auth_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub publishable_key: String,

    /// Frontend API host, e.g. `clerk.example.com`
    #[serde(default)]
    pub frontend_api: String,

    /// JWKS endpoint; derived from `frontend_api` when empty
    #[serde(default)]
    pub jwks_url: String,

    /// Accepted `azp` origins; empty accepts any
    #[serde(default)]
    pub authorized_parties: Vec<String>,

    /// Where anonymous page requests are redirected. This service has no
    /// sign-in route of its own; when empty, the provider's hosted Account
    /// Portal page is derived from `frontend_api`.
    #[serde(default)]
    pub sign_in_url: String,

    #[serde(default = "default_after_sign_up_url")]
    pub after_sign_up_url: String,
}

fn default_auth_enabled() -> bool {
    true
}

fn default_after_sign_up_url() -> String {
    "/onboarding".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: default_auth_enabled(),
            publishable_key: String::new(),
            frontend_api: String::new(),
            jwks_url: String::new(),
            authorized_parties: Vec::new(),
            sign_in_url: String::new(),
            after_sign_up_url: default_after_sign_up_url(),
        }
    }
}

impl AuthConfig {
    /// JWKS endpoint, falling back to the frontend API's well-known path
    pub fn resolved_jwks_url(&self) -> String {
        if !self.jwks_url.is_empty() {
            return self.jwks_url.clone();
        }
        format!("https://{}/.well-known/jwks.json", self.frontend_api)
    }

    /// Configured sign-in URL, or the Account Portal page for `frontend_api`.
    ///
    /// `clerk.example.com` maps to `accounts.example.com`; development
    /// instances (`<slug>.clerk.accounts.dev`) map to `<slug>.accounts.dev`.
    pub fn resolved_sign_in_url(&self) -> String {
        if !self.sign_in_url.is_empty() {
            return self.sign_in_url.clone();
        }

        let portal = if let Some(slug) = self.frontend_api.strip_suffix(".clerk.accounts.dev") {
            Some(format!("{}.accounts.dev", slug))
        } else {
            self.frontend_api
                .strip_prefix("clerk.")
                .map(|domain| format!("accounts.{}", domain))
        };

        match portal {
            Some(host) => format!("https://{}/sign-in", host),
            None => "/sign-in".to_string(),
        }
    }

    /// Browser SDK script served by the frontend API
    pub fn browser_sdk_url(&self) -> String {
        format!(
            "https://{}/npm/@clerk/clerk-js@5/dist/clerk.browser.js",
            self.frontend_api
        )
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub fn filter_directive(&self) -> String {
        format!("realty_desk={},tower_http={}", self.level, self.level)
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment.
    ///
    /// Nothing is logged here because this runs before the subscriber is
    /// installed; call [`LoadedConfig::log_outcome`] once tracing is up.
    pub fn load_default() -> LoadedConfig {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("realty-desk").join("config.toml")),
            Some(PathBuf::from("/etc/realty-desk/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths, |key| std::env::var(key).ok())
    }

    /// Load the first existing file that parses, then apply overrides
    fn load_first(paths: &[PathBuf], lookup: impl Fn(&str) -> Option<String>) -> LoadedConfig {
        let mut failures = Vec::new();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load(path) {
                Ok(mut config) => {
                    config.apply_overrides(&lookup);
                    return LoadedConfig {
                        config,
                        source: Some(path.clone()),
                        failures,
                    };
                }
                Err(e) => failures.push(e),
            }
        }

        let mut config = Config::default();
        config.apply_overrides(&lookup);
        LoadedConfig {
            config,
            source: None,
            failures,
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(host) = lookup("REALTY_DESK_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("REALTY_DESK_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }

        // Content store overrides
        if let Some(project_id) = lookup("REALTY_DESK_SANITY_PROJECT_ID") {
            self.content.project_id = project_id;
        }
        if let Some(dataset) = lookup("REALTY_DESK_SANITY_DATASET") {
            self.content.dataset = dataset;
        }
        if let Some(api_version) = lookup("REALTY_DESK_SANITY_API_VERSION") {
            self.content.api_version = api_version;
        }
        if let Some(token) = lookup("REALTY_DESK_SANITY_TOKEN") {
            self.content.token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(use_cdn) = lookup("REALTY_DESK_SANITY_USE_CDN") {
            self.content.use_cdn = parse_flag(&use_cdn);
        }

        // Auth overrides
        if let Some(key) = lookup("REALTY_DESK_CLERK_PUBLISHABLE_KEY") {
            self.auth.publishable_key = key;
        }
        if let Some(frontend_api) = lookup("REALTY_DESK_CLERK_FRONTEND_API") {
            self.auth.frontend_api = frontend_api;
        }
        if let Some(jwks_url) = lookup("REALTY_DESK_CLERK_JWKS_URL") {
            self.auth.jwks_url = jwks_url;
        }
        if let Some(enabled) = lookup("REALTY_DESK_AUTH_ENABLED") {
            self.auth.enabled = parse_flag(&enabled);
        }

        // Logging overrides
        if let Some(level) = lookup("REALTY_DESK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("REALTY_DESK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Result of [`Config::load_default`]: the config plus where it came from
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the config was read from; `None` means defaults plus environment
    pub source: Option<PathBuf>,
    /// Config files that exist but could not be read or parsed
    pub failures: Vec<ConfigError>,
}

impl LoadedConfig {
    /// Report the load outcome; unreadable files are warnings, not silent fallbacks
    pub fn log_outcome(&self) {
        for failure in &self.failures {
            tracing::warn!("Skipping config file: {}", failure);
        }
        match &self.source {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    value.to_lowercase() != "false" && value != "0"
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Realty Desk Configuration
#
# Environment variables override these settings:
# - REALTY_DESK_HOST / REALTY_DESK_PORT
# - REALTY_DESK_SANITY_PROJECT_ID / REALTY_DESK_SANITY_DATASET
# - REALTY_DESK_SANITY_API_VERSION / REALTY_DESK_SANITY_TOKEN
# - REALTY_DESK_SANITY_USE_CDN
# - REALTY_DESK_CLERK_PUBLISHABLE_KEY / REALTY_DESK_CLERK_FRONTEND_API
# - REALTY_DESK_CLERK_JWKS_URL / REALTY_DESK_AUTH_ENABLED
# - REALTY_DESK_LOG_LEVEL / REALTY_DESK_LOG_FORMAT

[server]
host = "0.0.0.0"
port = 3000
cors_origins = ["http://localhost:3000"]

[content]
# Sanity project and dataset
project_id = ""
dataset = "production"
api_version = "2024-12-01"

# Read token (optional). Setting a token bypasses the CDN.
# token = ""

use_cdn = true
perspective = "published"

# Per-request timeout in milliseconds
request_timeout_ms = 10000

[auth]
# Disable to run without sessions (dashboard renders empty analytics)
enabled = true

# Clerk publishable key and frontend API host
publishable_key = ""
frontend_api = ""

# Defaults to https://<frontend_api>/.well-known/jwks.json
# jwks_url = ""

# Accepted azp origins (empty accepts any)
authorized_parties = []

# Redirect target for anonymous dashboard requests. Must be the provider's
# hosted sign-in page (or an app route serving one). Defaults to the
# Account Portal: https://accounts.<domain>/sign-in for clerk.<domain>.
# sign_in_url = ""

after_sign_up_url = "/onboarding"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
