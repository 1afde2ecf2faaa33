//! HTTP server setup.
//!
//! # Responsibilities
//! - Assemble the API, page and admin routers
//! - Wire up middleware (request id, tracing, metrics, timeout, limits,
//!   security headers, route guard)
//! - Serve with graceful shutdown and run the limiter sweeper alongside

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderName;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{auth, categories, contact, health, pages, play, quizzes, rankings, users};
use crate::admin;
use crate::auth::IdentityProvider;
use crate::config::{AdminAllowlist, AppConfig};
use crate::lifecycle::Shutdown;
use crate::observability;
use crate::routing::{route_guard_middleware, RouteGuard};
use crate::security::{self, rate_limit, ContactLimit, FixedWindowLimiter};

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub admins: Arc<AdminAllowlist>,
    pub contact_limiter: Arc<FixedWindowLimiter>,
    pub contact_limit: ContactLimit,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig, identity: Arc<dyn IdentityProvider>) -> Self {
        let admins = AdminAllowlist::from(&config.admin);
        if admins.is_empty() {
            tracing::warn!("No administrators configured");
        }
        Self {
            db,
            admins: Arc::new(admins),
            contact_limiter: Arc::new(FixedWindowLimiter::new(config.rate_limit.max_keys)),
            contact_limit: ContactLimit::from(&config.rate_limit),
            identity,
            config: Arc::new(config),
        }
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/auth/providers", get(auth::providers))
        .route("/auth/signin/{provider}", get(auth::signin))
        .route("/auth/callback/{provider}", get(auth::callback))
        .route("/auth/signout", post(auth::signout))
        .route("/auth/session", get(auth::session))
        .route("/categories", get(categories::list))
        .route("/categories/{slug}", get(categories::show))
        .route("/quizzes", get(quizzes::discover).post(quizzes::create))
        .route(
            "/quizzes/{id}",
            get(quizzes::show).put(quizzes::update).delete(quizzes::delete),
        )
        .route("/quizzes/{id}/play", get(play::play))
        .route("/quizzes/{id}/check", post(play::check))
        .route("/quizzes/{id}/submit", post(play::submit))
        .route("/quizzes/{id}/leaderboard", get(rankings::leaderboard))
        .route("/rankings", get(rankings::global))
        .route("/users/me/quizzes", get(users::my_quizzes))
        .route("/users/me/scores", get(users::my_scores))
        .route("/contact", post(contact::submit))
}

/// Build the full application router.
#[allow(deprecated)]
pub fn build_router(state: AppState) -> Result<Router, regex::Error> {
    let config = state.config.clone();
    let guard = Arc::new(RouteGuard::from_config(&config.auth)?);

    let mut router = Router::new()
        .route("/", get(pages::home))
        .route("/login", get(pages::login))
        .route("/dashboard", get(pages::dashboard))
        .nest("/api/admin", admin::router(state.clone()))
        .nest("/api", api_routes())
        .fallback(pages::not_found)
        .layer(middleware::from_fn_with_state(guard, route_guard_middleware))
        .with_state(state);

    if config.server.security_headers {
        router = security::headers::apply(router);
    }

    Ok(router
        .layer(RequestBodyLimitLayer::new(config.server.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
        .layer(middleware::from_fn(observability::metrics::track_requests))
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
        .layer(TraceLayer::new_for_http().make_span_with(observability::tracing::request_span))
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)))
}

/// HTTP server for the application.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    pub fn new(state: AppState) -> Result<Self, regex::Error> {
        let router = build_router(state.clone())?;
        Ok(Self { router, state })
    }

    /// Run until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let sweep_every = Duration::from_secs(self.state.config.rate_limit.sweep_interval_secs);
        let sweeper = tokio::spawn(rate_limit::run_sweeper(
            self.state.contact_limiter.clone(),
            sweep_every,
            shutdown.subscribe(),
        ));

        let mut stop = shutdown.subscribe();
        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop.recv().await;
            })
            .await?;

        let _ = sweeper.await;
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
