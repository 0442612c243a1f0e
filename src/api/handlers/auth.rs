//! Signup, login and logout

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::api::error::ApiError;
use crate::api::middleware::session::{expired_session_cookie, session_cookie};
use crate::api::middleware::MaybeUser;
use crate::api::pages::Page;
use crate::api::state::AppState;
use crate::domain::DomainError;
use crate::infrastructure::user::SignupRequest;

pub const SIGNUP_SUCCESS: &str = "Signup Success Please Login";
pub const EMAIL_TAKEN: &str = "Email Already Exist";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

fn signup_page(current: &MaybeUser, username: &str, email: &str) -> Page {
    Page::new("signup.html")
        .user(current.user())
        .with("form", &json!({ "username": username, "email": email }))
}

fn login_page(current: &MaybeUser, email: &str) -> Page {
    Page::new("login.html")
        .user(current.user())
        .with("form", &json!({ "email": email }))
}

/// GET /signup
pub async fn signup_form(current: MaybeUser) -> Result<Response, ApiError> {
    signup_page(&current, "", "").render()
}

/// POST /signup
///
/// Both outcomes answer 200: the login page on success, the signup page with
/// a warning when the email is taken.
pub async fn signup(
    State(state): State<AppState>,
    current: MaybeUser,
    Form(form): Form<SignupForm>,
) -> Result<Response, ApiError> {
    let request = SignupRequest {
        username: form.username.clone(),
        email: form.email.clone(),
        password: form.password,
    };

    match state.user_service.signup(request).await {
        Ok(user) => login_page(&current, user.email())
            .flash(Some(SIGNUP_SUCCESS.to_string()))
            .render(),
        Err(DomainError::Conflict { .. }) => signup_page(&current, &form.username, &form.email)
            .error(EMAIL_TAKEN)
            .render(),
        Err(DomainError::Validation { message }) => {
            signup_page(&current, &form.username, &form.email)
                .error(message)
                .status(StatusCode::UNPROCESSABLE_ENTITY)
                .render()
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /login
pub async fn login_form(current: MaybeUser) -> Result<Response, ApiError> {
    login_page(&current, "").render()
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    current: MaybeUser,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let Some(user) = state
        .user_service
        .authenticate(&form.email, &form.password)
        .await?
    else {
        return login_page(&current, &form.email)
            .error(INVALID_CREDENTIALS)
            .render();
    };

    if let Some(previous) = &current.0 {
        state.session_service.end(&previous.token).await?;
    }

    let session = state.session_service.start(user.id()).await?;
    info!(user_id = %user.id(), "User logged in");

    Ok((
        [(
            header::SET_COOKIE,
            session_cookie(&state.session_config, session.token()),
        )],
        Redirect::to("/"),
    )
        .into_response())
}

/// GET /logout
pub async fn logout(
    State(state): State<AppState>,
    current: MaybeUser,
) -> Result<Response, ApiError> {
    if let Some(current) = &current.0 {
        state.session_service.end(&current.token).await?;
        info!(user_id = %current.user.id(), "User logged out");
    }

    Ok((
        [(header::SET_COOKIE, expired_session_cookie(&state.session_config))],
        Redirect::to("/login"),
    )
        .into_response())
}
