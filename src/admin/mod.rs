//! Administration API, mounted at `/api/admin`.
//!
//! Every route requires a signed-in user whose email is on the admin
//! allowlist.

pub mod auth;
pub mod handlers;

use axum::middleware;
use axum::routing::{delete, get, patch, post};
use axum::Router;

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/contacts", get(list_contacts))
        .route("/contacts/{id}", patch(update_contact).delete(delete_contact))
        .route("/users", get(list_users))
        .route("/users/{id}", patch(update_user).delete(delete_user))
        .route("/quizzes/{id}", patch(update_quiz).delete(delete_quiz))
        .route("/categories", post(create_category))
        .route("/categories/{id}", delete(delete_category))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
