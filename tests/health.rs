mod common;

use axum::{extract::State, http::StatusCode};
use vitalityboost::routes::health::health_check;

#[tokio::test]
async fn health_check_returns_ok() -> anyhow::Result<()> {
    let app = common::setup().await?;

    let response = health_check(State(app.state.clone()))
        .await
        .expect("health check");
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.database, "ok");
    assert_eq!(data.payments, None);
    Ok(())
}

#[tokio::test]
async fn unknown_path_is_not_found() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let response = common::send(&app.state, common::get("/no/such/page", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn huge_upload_limit_still_builds_the_router() -> anyhow::Result<()> {
    let app = common::setup_with(|config| config.max_upload_bytes = usize::MAX).await?;
    let response = common::send(&app.state, common::get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}
