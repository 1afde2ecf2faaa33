use thiserror::Error;

/// Failures of the OAuth sign-in flow.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("state parameter missing or mismatched")]
    StateMismatch,

    #[error("provider returned an error: {0}")]
    Provider(String),

    #[error("provider profile has no email address")]
    MissingEmail,

    #[error("provider profile has no account id")]
    MissingAccountId,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),
}
