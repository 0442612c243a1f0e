use axum::{extract::State, response::Response};

use crate::api::error::ApiError;
use crate::api::middleware::MaybeUser;
use crate::api::pages::Page;
use crate::api::state::AppState;

use super::take_flash;

/// GET /
pub async fn index(
    State(state): State<AppState>,
    current: MaybeUser,
) -> Result<Response, ApiError> {
    let flash = take_flash(&state, current.0.as_ref()).await?;

    Page::new("index.html")
        .user(current.user())
        .flash(flash)
        .render()
}
