#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, PaginatorTrait, EntityTrait, Set};
use tempfile::TempDir;
use tower::ServiceExt;
use vitalityboost::{
    config::AppConfig,
    db::{bootstrap, create_orm_conn, run_migrations},
    entity::{Orders, products::ActiveModel as ProductActive},
    middleware::session::{SESSION_COOKIE_NAME, SessionData},
    models::PaymentMethod,
    payment::{
        CheckoutRedirect, CheckoutSessionRequest, PaymentError, PaymentNotification,
        PaymentProvider,
    },
    routes,
    state::AppState,
};

pub struct TestApp {
    pub state: AppState,
    _dir: TempDir,
}

pub async fn setup() -> anyhow::Result<TestApp> {
    setup_with(|_| {}).await
}

pub async fn setup_with(configure: impl FnOnce(&mut AppConfig)) -> anyhow::Result<TestApp> {
    let dir = tempfile::tempdir()?;
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());

    let mut config = AppConfig::for_database(url);
    configure(&mut config);

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;
    bootstrap(&orm, &config).await?;

    Ok(TestApp {
        state: AppState::new(orm, config),
        _dir: dir,
    })
}

pub async fn insert_product(
    state: &AppState,
    title: &str,
    price: i64,
    active: bool,
    category_id: Option<i32>,
) -> anyhow::Result<i32> {
    let now = Utc::now();
    let product = ProductActive {
        id: NotSet,
        title: Set(title.to_string()),
        price: Set(price),
        active: Set(active),
        stock: Set(10),
        category_id: Set(category_id),
        image_id: Set(None),
        short_desc: Set(format!("{title} in short")),
        long_desc: Set(String::new()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.orm)
    .await?;
    Ok(product.id)
}

pub async fn order_count(state: &AppState) -> anyhow::Result<u64> {
    Ok(Orders::find().count(&state.orm).await?)
}

// `Cookie` header value for a session holding `data`.
pub fn session_cookie(state: &AppState, data: &SessionData) -> String {
    let token = state.sessions.encode(data).expect("encode session");
    format!("{SESSION_COOKIE_NAME}={token}")
}

pub fn admin_cookie(state: &AppState) -> String {
    session_cookie(
        state,
        &SessionData {
            admin: true,
            ..Default::default()
        },
    )
}

pub fn session_set_cookie_header(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(SESSION_COOKIE_NAME))
        .map(str::to_string)
}

// The `name=value` part of the session cookie set by a response.
pub fn set_cookie(response: &Response<Body>) -> Option<String> {
    session_set_cookie_header(response)
        .and_then(|value| value.split(';').next().map(str::to_string))
}

pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub async fn send(state: &AppState, request: Request<Body>) -> Response<Body> {
    routes::app(state.clone())
        .oneshot(request)
        .await
        .expect("router is infallible")
}

pub fn form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8_lossy(&bytes).into_owned()
}

// Records checkout requests instead of calling out; optionally fails every call.
#[derive(Default)]
pub struct FakeProvider {
    pub requests: Mutex<Vec<CheckoutSessionRequest>>,
    pub fail: bool,
}

impl FakeProvider {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<CheckoutSessionRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

#[async_trait]
impl PaymentProvider for FakeProvider {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn supports(&self, method: PaymentMethod) -> bool {
        method.is_external()
    }

    async fn create_checkout(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutRedirect, PaymentError> {
        self.requests.lock().expect("lock").push(request.clone());
        if self.fail {
            return Err(PaymentError::Request("connection refused".to_string()));
        }
        Ok(CheckoutRedirect {
            session_id: format!("cs_{}", request.order_id),
            url: format!("https://pay.example/c/{}", request.order_id),
        })
    }

    fn parse_notification(
        &self,
        _payload: &[u8],
        _signature: Option<&str>,
    ) -> Result<PaymentNotification, PaymentError> {
        Err(PaymentError::NotConfigured)
    }
}

pub fn with_fake_provider(state: &AppState, provider: Arc<FakeProvider>) -> AppState {
    state.clone().with_payment_provider(provider)
}
