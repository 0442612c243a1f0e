//! Agro product listings

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::middleware::{MaybeUser, RequireUser};
use crate::api::pages::Page;
use crate::api::state::AppState;
use crate::domain::{DomainError, ProductInput};

use super::{set_flash, take_flash};

pub const PRODUCT_ADDED: &str = "Product Added";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProductForm {
    pub productname: String,
    pub productdesc: String,
    pub price: String,
}

impl From<ProductForm> for ProductInput {
    fn from(form: ProductForm) -> Self {
        Self {
            name: form.productname,
            description: form.productdesc,
            price: form.price,
        }
    }
}

/// GET /agroproducts, open to everyone
pub async fn list_products(
    State(state): State<AppState>,
    current: MaybeUser,
) -> Result<Response, ApiError> {
    let products = state.product_service.list().await?;
    let flash = take_flash(&state, current.0.as_ref()).await?;

    Page::new("agroproducts.html")
        .user(current.user())
        .flash(flash)
        .with("products", &products)
        .render()
}

/// GET /addagroproduct
pub async fn product_form(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Response, ApiError> {
    let flash = take_flash(&state, Some(&current)).await?;

    Page::new("addagroproduct.html")
        .user(Some(&current.user))
        .flash(flash)
        .with("form", &ProductForm::default())
        .render()
}

/// POST /addagroproduct
pub async fn add_product(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Form(form): Form<ProductForm>,
) -> Result<Response, ApiError> {
    match state
        .product_service
        .create(&current.user, form.clone().into())
        .await
    {
        Ok(_) => {
            set_flash(&state, &current, PRODUCT_ADDED).await?;
            Ok(Redirect::to("/agroproducts").into_response())
        }
        Err(DomainError::Validation { message }) => Page::new("addagroproduct.html")
            .user(Some(&current.user))
            .error(message)
            .with("form", &form)
            .status(StatusCode::UNPROCESSABLE_ENTITY)
            .render(),
        Err(e) => Err(e.into()),
    }
}
