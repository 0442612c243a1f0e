use axum::{extract::State, response::Response};

use crate::api::error::ApiError;
use crate::api::middleware::RequireUser;
use crate::api::pages::Page;
use crate::api::state::AppState;

/// GET /triggers: the farmer audit trail, newest first
pub async fn triggers(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Response, ApiError> {
    let entries = state.audit_service.list().await?;

    Page::new("triggers.html")
        .user(Some(&current.user))
        .with("entries", &entries)
        .render()
}
