use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::contact::{Mutation, NewContact};
use crate::http::error::ApiError;
use crate::http::extract::{ApiJson, ClientIp};
use crate::http::server::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct ContactInput {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 10, max = 5000, message = "must be between 10 and 5000 characters"))]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContactAccepted {
    pub success: bool,
    pub id: Uuid,
}

/// Store a contact message. The per-IP limit is checked before the body is
/// validated so malformed floods are throttled too.
pub async fn submit(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    ApiJson(input): ApiJson<ContactInput>,
) -> Result<(StatusCode, Json<ContactAccepted>), ApiError> {
    let decision = state.contact_limit.check(&state.contact_limiter, &ip);
    if !decision.allowed {
        return Err(ApiError::TooManyRequests {
            retry_after_secs: decision.reset_after.as_secs_f64().ceil().max(1.0) as u64,
        });
    }

    input.validate()?;

    let contact = Mutation::create(
        &state.db,
        NewContact {
            name: input.name.trim().to_owned(),
            email: input.email.trim().to_owned(),
            message: input.message,
            ip: (ip != "unknown").then_some(ip),
        },
    )
    .await?;

    tracing::info!(contact_id = %contact.id, "Contact message received");
    Ok((
        StatusCode::CREATED,
        Json(ContactAccepted {
            success: true,
            id: contact.id,
        }),
    ))
}
