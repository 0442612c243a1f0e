//! HTML page handlers

pub mod audit;
pub mod auth;
pub mod farmers;
pub mod farming;
pub mod health;
pub mod home;
pub mod products;

use crate::api::error::ApiError;
use crate::api::middleware::CurrentUser;
use crate::api::state::AppState;

/// Pop the pending flash message for the current session, if any
async fn take_flash(
    state: &AppState,
    current: Option<&CurrentUser>,
) -> Result<Option<String>, ApiError> {
    match current {
        Some(current) => Ok(state.session_service.take_flash(&current.token).await?),
        None => Ok(None),
    }
}

/// Queue a message for the next page this session renders
async fn set_flash(
    state: &AppState,
    current: &CurrentUser,
    message: &str,
) -> Result<(), ApiError> {
    state
        .session_service
        .set_flash(&current.token, message.to_string())
        .await?;
    Ok(())
}
