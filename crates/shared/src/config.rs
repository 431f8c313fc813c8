//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

/// Runtime environment the process was started in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Local development: pretty logs, `config/development.toml`.
    #[default]
    Development,
    /// Deployed: JSON logs, `config/production.toml`.
    Production,
}

impl RunMode {
    /// Reads the run mode from `APP_ENV`, falling back to `RUN_MODE`.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var("APP_ENV")
            .or_else(|_| std::env::var("RUN_MODE"))
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    /// Parses a run mode name. Unknown names mean development.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    /// Name used to select the environment config file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    /// Returns true when running in production.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Runtime environment.
    #[serde(default)]
    pub run_mode: RunMode,
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Hosted identity provider and API keys.
    pub supabase: SupabaseConfig,
    /// Login gating.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Paginated retrieval and cross-check settings.
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,
    /// Background reconciliation monitor.
    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Identity provider configuration.
#[derive(Clone, Deserialize)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Public (anonymous) key sent with end-user auth calls.
    pub anon_key: String,
    /// Privileged key for admin user management.
    pub service_role_key: String,
    /// Secret used to verify access tokens (HS256).
    pub jwt_secret: String,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &"[hidden]")
            .field("service_role_key", &"[hidden]")
            .field("jwt_secret", &"[hidden]")
            .finish()
    }
}

/// Login gating configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Only emails under this domain may sign in.
    #[serde(default = "default_allowed_domain")]
    pub allowed_domain: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            allowed_domain: default_allowed_domain(),
        }
    }
}

fn default_allowed_domain() -> String {
    "svninvest.com.br".to_string()
}

impl AuthConfig {
    /// Returns true if `email` belongs to the allowed domain.
    #[must_use]
    pub fn is_allowed_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        let domain = self.allowed_domain.trim().to_lowercase();
        match email.rsplit_once('@') {
            Some((local, host)) => !local.is_empty() && host == domain,
            None => false,
        }
    }
}

/// Paginated retrieval settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconciliationConfig {
    /// Rows per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Upper bound on pages fetched in one retrieval.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Largest accepted difference between paginated and direct totals.
    #[serde(default = "default_tolerance")]
    pub tolerance: Decimal,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            tolerance: default_tolerance(),
        }
    }
}

fn default_page_size() -> u64 {
    1000
}

fn default_max_pages() -> u32 {
    100
}

fn default_tolerance() -> Decimal {
    Decimal::ONE
}

/// Background monitor settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Whether the server spawns the monitor task.
    #[serde(default)]
    pub enabled: bool,
    /// Minutes between rounds.
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
    /// Advisors whose months are checked each round.
    #[serde(default)]
    pub advisor_ids: Vec<Uuid>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_minutes: default_interval_minutes(),
            advisor_ids: Vec::new(),
        }
    }
}

fn default_interval_minutes() -> u64 {
    60
}

/// Plain environment variables mapped onto config keys.
const ENV_ALIASES: &[(&str, &str)] = &[
    ("DATABASE_URL", "database.url"),
    ("SUPABASE_URL", "supabase.url"),
    ("SUPABASE_ANON_KEY", "supabase.anon_key"),
    ("SUPABASE_SERVICE_ROLE_KEY", "supabase.service_role_key"),
    ("SUPABASE_JWT_SECRET", "supabase.jwt_secret"),
    ("ALLOWED_DOMAIN", "auth.allowed_domain"),
    ("PORT", "server.port"),
];

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Later sources win: `config/default`, `config/{run_mode}`,
    /// `ASSESSORIA__SECTION__KEY` variables, then the plain deployment
    /// variables (`DATABASE_URL`, `SUPABASE_*`, `ALLOWED_DOMAIN`, `PORT`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = RunMode::from_env();

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::File::with_name(&format!("config/{}", run_mode.as_str())).required(false),
            )
            .add_source(
                config::Environment::with_prefix("ASSESSORIA")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("monitor.advisor_ids")
                    .try_parsing(true),
            )
            .set_override("run_mode", run_mode.as_str())?;

        for (var, key) in ENV_ALIASES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        builder.build()?.try_deserialize()
    }
}
