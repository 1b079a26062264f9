use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};

use crate::{
    dto::auth::LoginForm,
    error::{AppError, AppResult},
    middleware::session::VisitorSession,
    services::auth_service,
    state::AppState,
};

#[derive(Template, WebTemplate)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub username: String,
    pub error: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout).post(logout))
}

pub async fn login_page(session: VisitorSession) -> Response {
    if session.data.admin {
        return Redirect::to("/admin").into_response();
    }
    LoginTemplate {
        username: String::new(),
        error: None,
    }
    .into_response()
}

pub async fn login(
    State(state): State<AppState>,
    mut session: VisitorSession,
    Form(payload): Form<LoginForm>,
) -> AppResult<Response> {
    let username = payload.username.clone();
    match auth_service::login(&state.orm, payload).await {
        Ok(_) => {
            session.data.admin = true;
            Ok((session.save()?, Redirect::to("/admin")).into_response())
        }
        Err(AppError::InvalidCredentials) => {
            let page = LoginTemplate {
                username,
                error: Some(AppError::InvalidCredentials.to_string()),
            };
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
        Err(err) => Err(err),
    }
}

pub async fn logout(mut session: VisitorSession) -> AppResult<Response> {
    session.data.admin = false;
    Ok((session.save()?, Redirect::to("/admin/login")).into_response())
}
