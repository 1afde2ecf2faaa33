//! Configuration validation.
//!
//! Semantic checks that serde cannot express. Returns every error found,
//! not just the first, and runs before the config is accepted.

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new("server.bind_address", "must be a socket address"));
    }
    if url::Url::parse(&config.server.public_url).is_err() {
        errors.push(ValidationError::new("server.public_url", "must be an absolute URL"));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new("server.request_timeout_secs", "must be greater than 0"));
    }
    if config.server.max_body_size == 0 {
        errors.push(ValidationError::new("server.max_body_size", "must be greater than 0"));
    }

    if config.database.url.is_empty() {
        errors.push(ValidationError::new("database.url", "must not be empty"));
    }
    if config.database.max_connections == 0 {
        errors.push(ValidationError::new("database.max_connections", "must be greater than 0"));
    }

    let auth = &config.auth;
    if auth.session_cookie.is_empty() {
        errors.push(ValidationError::new("auth.session_cookie", "must not be empty"));
    }
    if auth.session_ttl_secs == 0 {
        errors.push(ValidationError::new("auth.session_ttl_secs", "must be greater than 0"));
    }
    for (field, path) in [("auth.login_path", &auth.login_path), ("auth.dashboard_path", &auth.dashboard_path)] {
        if !path.starts_with('/') {
            errors.push(ValidationError::new(field, "must start with '/'"));
        }
    }
    for (i, pattern) in auth.protected_paths.iter().enumerate() {
        if !pattern.starts_with('/') {
            errors.push(ValidationError::new(
                format!("auth.protected_paths[{i}]"),
                "must start with '/'",
            ));
        }
    }
    for (i, provider) in auth.providers.iter().enumerate() {
        let prefix = format!("auth.providers[{i}]");
        if provider.name.is_empty() || !provider.name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            errors.push(ValidationError::new(
                format!("{prefix}.name"),
                "must be non-empty and contain only letters, digits or '-'",
            ));
        }
        if auth.providers[..i].iter().any(|p| p.name == provider.name) {
            errors.push(ValidationError::new(format!("{prefix}.name"), "duplicate provider name"));
        }
        if provider.client_id.is_empty() {
            errors.push(ValidationError::new(format!("{prefix}.client_id"), "must not be empty"));
        }
        for (field, value) in [
            ("authorize_url", &provider.authorize_url),
            ("token_url", &provider.token_url),
            ("userinfo_url", &provider.userinfo_url),
        ] {
            if url::Url::parse(value).is_err() {
                errors.push(ValidationError::new(format!("{prefix}.{field}"), "must be an absolute URL"));
            }
        }
    }

    for (i, email) in config.admin.emails.iter().enumerate() {
        if !email.contains('@') {
            errors.push(ValidationError::new(format!("admin.emails[{i}]"), "must be an email address"));
        }
    }

    let rl = &config.rate_limit;
    if rl.contact_max_requests == 0 {
        errors.push(ValidationError::new("rate_limit.contact_max_requests", "must be greater than 0"));
    }
    if rl.contact_window_ms == 0 {
        errors.push(ValidationError::new("rate_limit.contact_window_ms", "must be greater than 0"));
    }
    if rl.max_keys == 0 {
        errors.push(ValidationError::new("rate_limit.max_keys", "must be greater than 0"));
    }
    if rl.sweep_interval_secs == 0 {
        errors.push(ValidationError::new("rate_limit.sweep_interval_secs", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new("observability.metrics_address", "must be a socket address"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::OAuthProviderConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&AppConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.server.bind_address = "nope".into();
        config.rate_limit.contact_window_ms = 0;
        config.auth.protected_paths.push("admin".into());
        config.admin.emails.push("not-an-email".into());

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "server.bind_address",
                "auth.protected_paths[8]",
                "admin.emails[0]",
                "rate_limit.contact_window_ms",
            ]
        );
    }

    #[test]
    fn test_duplicate_provider() {
        let provider = OAuthProviderConfig {
            name: "github".into(),
            display_name: None,
            client_id: "id".into(),
            client_secret: "secret".into(),
            authorize_url: "https://github.com/login/oauth/authorize".into(),
            token_url: "https://github.com/login/oauth/access_token".into(),
            userinfo_url: "https://api.github.com/user".into(),
            scopes: vec![],
        };
        let mut config = AppConfig::default();
        config.auth.providers = vec![provider.clone(), provider];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "auth.providers[1].name");
    }
}
