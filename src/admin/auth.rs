use axum::{body::Body, http::Request, middleware::Next, response::Response};

use crate::auth::AdminUser;

/// Rejects non-admins (401 without a session, 403 otherwise) before any
/// admin handler runs. The resolved user stays cached on the request.
pub async fn admin_auth_middleware(AdminUser(admin): AdminUser, request: Request<Body>, next: Next) -> Response {
    tracing::info!(
        admin = %admin.user.email,
        method = %request.method(),
        path = %request.uri().path(),
        "Admin request"
    );
    next.run(request).await
}
