//! OAuth 2 authorization-code flow.

use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::error::AuthError;
use crate::config::OAuthProviderConfig;

/// Profile of a signed-in account as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub provider_account_id: String,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

/// Turns an authorization code into an [`Identity`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn exchange(
        &self,
        provider: &OAuthProviderConfig,
        code: &str,
        redirect_uri: &str,
    ) -> Result<Identity, AuthError>;
}

/// Random value for the `state` parameter.
pub fn generate_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// The consent URL the browser is redirected to.
pub fn authorize_url(provider: &OAuthProviderConfig, redirect_uri: &str, state: &str) -> Result<Url, AuthError> {
    let mut url = Url::parse(&provider.authorize_url)?;
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &provider.client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("scope", &provider.scopes.join(" "))
        .append_pair("state", state);
    Ok(url)
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Real provider client speaking to the configured token and userinfo
/// endpoints.
#[derive(Debug, Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
}

impl HttpIdentityProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn exchange(
        &self,
        provider: &OAuthProviderConfig,
        code: &str,
        redirect_uri: &str,
    ) -> Result<Identity, AuthError> {
        let token: TokenResponse = self
            .client
            .post(&provider.token_url)
            .header(ACCEPT, "application/json")
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("client_id", provider.client_id.as_str()),
                ("client_secret", provider.client_secret.as_str()),
            ])
            .send()
            .await?
            .json()
            .await?;

        let access_token = match (token.access_token, token.error) {
            (Some(access_token), None) => access_token,
            (_, error) => {
                let reason = token.error_description.or(error).unwrap_or_else(|| "no access token".into());
                return Err(AuthError::Provider(reason));
            }
        };

        let profile: Value = self
            .client
            .get(&provider.userinfo_url)
            .bearer_auth(access_token)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, concat!("quizhub/", env!("CARGO_PKG_VERSION")))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::debug!(provider = %provider.name, "Fetched provider profile");
        identity_from_profile(&profile)
    }
}

fn string_field(profile: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match profile.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Read a profile in either OpenID Connect (`sub`, `picture`) or GitHub
/// (`id`, `login`, `avatar_url`) shape.
pub fn identity_from_profile(profile: &Value) -> Result<Identity, AuthError> {
    Ok(Identity {
        provider_account_id: string_field(profile, &["sub", "id"]).ok_or(AuthError::MissingAccountId)?,
        email: string_field(profile, &["email"])
            .map(|email| email.trim().to_lowercase())
            .ok_or(AuthError::MissingEmail)?,
        name: string_field(profile, &["name", "login"]),
        image: string_field(profile, &["picture", "avatar_url"]),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn provider() -> OAuthProviderConfig {
        OAuthProviderConfig {
            name: "github".into(),
            display_name: None,
            client_id: "client".into(),
            client_secret: "secret".into(),
            authorize_url: "https://github.com/login/oauth/authorize".into(),
            token_url: "https://github.com/login/oauth/access_token".into(),
            userinfo_url: "https://api.github.com/user".into(),
            scopes: vec!["read:user".into(), "user:email".into()],
        }
    }

    #[test]
    fn test_authorize_url() {
        let url = authorize_url(&provider(), "http://localhost:3000/api/auth/callback/github", "xyz").unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert!(pairs.contains(&("client_id".into(), "client".into())));
        assert!(pairs.contains(&("scope".into(), "read:user user:email".into())));
        assert!(pairs.contains(&("state".into(), "xyz".into())));
        assert!(pairs.contains(&(
            "redirect_uri".into(),
            "http://localhost:3000/api/auth/callback/github".into()
        )));
    }

    #[test]
    fn test_oidc_profile() {
        let identity = identity_from_profile(&json!({
            "sub": "1234",
            "email": "Ada@Example.com",
            "name": "Ada",
            "picture": "https://img/ada.png"
        }))
        .unwrap();

        assert_eq!(identity.provider_account_id, "1234");
        assert_eq!(identity.email, "ada@example.com");
        assert_eq!(identity.image.as_deref(), Some("https://img/ada.png"));
    }

    #[test]
    fn test_github_profile() {
        let identity = identity_from_profile(&json!({
            "id": 42,
            "login": "octocat",
            "email": "octo@example.com",
            "avatar_url": "https://img/octo.png"
        }))
        .unwrap();

        assert_eq!(identity.provider_account_id, "42");
        assert_eq!(identity.name.as_deref(), Some("octocat"));
    }

    #[test]
    fn test_profile_without_email() {
        let err = identity_from_profile(&json!({ "id": 1, "email": null })).unwrap_err();
        assert!(matches!(err, AuthError::MissingEmail));
    }

    #[test]
    fn test_state_is_random() {
        assert_eq!(generate_state().len(), 32);
        assert_ne!(generate_state(), generate_state());
    }
}
