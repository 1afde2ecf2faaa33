//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Root configuration for the quiz service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings (bind address, limits, headers).
    pub server: ServerConfig,

    /// Relational database connection.
    pub database: DatabaseConfig,

    /// Session cookies, OAuth providers and route protection.
    pub auth: AuthConfig,

    /// Administrator allowlist.
    pub admin: AdminConfig,

    /// Rate limiting for public write endpoints.
    pub rate_limit: RateLimitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Public base URL, used to build OAuth redirect URIs.
    pub public_url: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,

    /// Maximum body size in bytes.
    pub max_body_size: usize,

    /// Add security response headers.
    pub security_headers: bool,

    /// Take the client IP from the first `X-Forwarded-For` entry.
    /// Only enable behind a proxy that overwrites the header.
    pub trust_forwarded_for: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            public_url: "http://localhost:3000".to_string(),
            request_timeout_secs: 30,
            max_body_size: 1024 * 1024, // 1MB
            security_headers: true,
            trust_forwarded_for: false,
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL (`postgres://...` or `sqlite://...`).
    pub url: String,

    /// Maximum pooled connections.
    pub max_connections: u32,

    /// Create missing tables on startup.
    pub create_schema: bool,

    /// Log every SQL statement.
    pub sql_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://quizhub.db?mode=rwc".to_string(),
            max_connections: 10,
            create_schema: true,
            sql_logging: false,
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Cookie carrying the session token. Also the name written on sign-in.
    pub session_cookie: String,

    /// Additional cookie names the route guard accepts as "signed in"
    /// (e.g. the `__Secure-` prefixed variant).
    pub extra_session_cookies: Vec<String>,

    /// Session lifetime in seconds.
    pub session_ttl_secs: u64,

    /// Set the `Secure` attribute on cookies.
    pub secure_cookies: bool,

    /// Login view; protected paths redirect here.
    pub login_path: String,

    /// Dashboard view; signed-in visitors of the login view redirect here.
    pub dashboard_path: String,

    /// Protected path patterns, checked in order.
    /// Segments are literal except `*`, which matches exactly one segment.
    pub protected_paths: Vec<String>,

    /// OAuth providers offered on the login view.
    pub providers: Vec<OAuthProviderConfig>,
}

impl AuthConfig {
    /// Every cookie name that marks a request as carrying a session.
    pub fn session_cookie_names(&self) -> Vec<String> {
        let mut names = vec![self.session_cookie.clone()];
        names.extend(self.extra_session_cookies.iter().cloned());
        names
    }

    /// Look up a provider by its name.
    pub fn provider(&self, name: &str) -> Option<&OAuthProviderConfig> {
        self.providers.iter().find(|p| p.name == name)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie: "quizhub_session".to_string(),
            extra_session_cookies: vec!["__Secure-quizhub_session".to_string()],
            session_ttl_secs: 30 * 24 * 60 * 60,
            secure_cookies: false,
            login_path: "/login".to_string(),
            dashboard_path: "/dashboard".to_string(),
            protected_paths: default_protected_paths(),
            providers: Vec::new(),
        }
    }
}

fn default_protected_paths() -> Vec<String> {
    [
        "/dashboard",
        "/dashboard/*",
        "/profile",
        "/quiz/create",
        "/quiz/*/edit",
        "/quiz/*/play",
        "/admin",
        "/admin/*",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

/// A single OAuth 2 provider (authorization-code flow).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OAuthProviderConfig {
    /// Short name used in URLs (e.g. "google", "github").
    pub name: String,

    /// Human readable label for the login view.
    #[serde(default)]
    pub display_name: Option<String>,

    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    pub authorize_url: String,

    pub token_url: String,

    pub userinfo_url: String,

    #[serde(default)]
    pub scopes: Vec<String>,
}

impl OAuthProviderConfig {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// Administrator configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdminConfig {
    /// Emails granted administrative access.
    pub emails: Vec<String>,
}

/// Typed, normalized administrator allowlist.
///
/// Built once at startup from [`AdminConfig`] and shared through application
/// state; comparisons are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowlist {
    emails: HashSet<String>,
}

impl AdminAllowlist {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            emails: emails
                .into_iter()
                .map(|e| e.as_ref().trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(&email.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

impl From<&AdminConfig> for AdminAllowlist {
    fn from(config: &AdminConfig) -> Self {
        Self::new(&config.emails)
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Maximum contact submissions per client per window.
    pub contact_max_requests: u32,

    /// Window length in milliseconds.
    pub contact_window_ms: u64,

    /// Upper bound on tracked keys before stale windows are swept eagerly.
    pub max_keys: usize,

    /// Interval of the background sweep of stale windows, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            contact_max_requests: 5,
            contact_window_ms: 60_000,
            max_keys: 10_000,
            sweep_interval_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,

    /// Emit JSON log lines instead of the human readable format.
    pub json_logs: bool,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "quizhub=info,tower_http=info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
