//! End-to-end checks of the page guard over a real listener.

use std::time::Duration;

use reqwest::header::{COOKIE, LOCATION};
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use tokio::net::TcpListener;

use quizhub::http::HttpServer;
use quizhub::lifecycle::Shutdown;

mod common;

async fn start() -> (String, Shutdown) {
    let app = common::app().await;
    let state = quizhub::AppState::new(
        app.db.clone(),
        app.config.clone(),
        std::sync::Arc::new(common::FakeIdentityProvider {
            identity: quizhub::auth::Identity {
                provider_account_id: "1".into(),
                email: "guard@quizhub.test".into(),
                name: None,
                image: None,
            },
        }),
    );
    let server = HttpServer::new(state).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    (base, shutdown)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_anonymous_dashboard_redirects_to_login() {
    let (base, shutdown) = start().await;

    let res = client().get(format!("{base}/dashboard?tab=scores")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        res.headers().get(LOCATION).unwrap(),
        "/login?callbackUrl=%2Fdashboard%3Ftab%3Dscores"
    );
    assert!(res.headers().contains_key("x-request-id"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_bogus_cookie_passes_guard_but_not_handler() {
    let (base, shutdown) = start().await;

    // The guard only sees a cookie; the dashboard handler resolves it.
    let res = client()
        .get(format!("{base}/dashboard"))
        .header(COOKIE, "quizhub_session=not-a-real-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert!(res.headers().get(LOCATION).unwrap().to_str().unwrap().starts_with("/login"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_api_and_public_pages_are_not_guarded() {
    let (base, shutdown) = start().await;
    let client = client();

    let res = client.get(format!("{base}/api/users/me/quizzes")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client.get(format!("{base}/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("x-content-type-options").unwrap(), "nosniff");

    let res = client.get(format!("{base}/api/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    shutdown.trigger();
}
