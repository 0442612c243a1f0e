//! Farming type maintenance

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::middleware::RequireUser;
use crate::api::pages::Page;
use crate::api::state::AppState;
use crate::domain::DomainError;

use super::{set_flash, take_flash};

pub const FARMING_ADDED: &str = "Farming Type Added";
pub const FARMING_EXISTS: &str = "Farming Type Already Exist";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FarmingForm {
    pub farmingtype: String,
}

/// GET /addfarming
pub async fn farming_page(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Response, ApiError> {
    let farming_types = state.farming_service.list().await?;
    let flash = take_flash(&state, Some(&current)).await?;

    Page::new("addfarming.html")
        .user(Some(&current.user))
        .flash(flash)
        .with("farming_types", &farming_types)
        .with("form", &FarmingForm::default())
        .render()
}

/// POST /addfarming
pub async fn add_farming(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Form(form): Form<FarmingForm>,
) -> Result<Response, ApiError> {
    let message = match state.farming_service.add(&form.farmingtype).await {
        Ok(_) => FARMING_ADDED,
        Err(DomainError::Conflict { .. }) => FARMING_EXISTS,
        Err(DomainError::Validation { message }) => {
            let farming_types = state.farming_service.list().await?;
            return Page::new("addfarming.html")
                .user(Some(&current.user))
                .error(message)
                .with("farming_types", &farming_types)
                .with("form", &form)
                .status(StatusCode::UNPROCESSABLE_ENTITY)
                .render();
        }
        Err(e) => return Err(e.into()),
    };

    set_flash(&state, &current, message).await?;
    Ok(Redirect::to("/addfarming").into_response())
}
