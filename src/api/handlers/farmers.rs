//! Farmer registration, listing, editing and deletion

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::middleware::{CurrentUser, RequireUser};
use crate::api::pages::Page;
use crate::api::state::AppState;
use crate::domain::{DomainError, Farmer, FarmerId, FarmerInput};

use super::{set_flash, take_flash};

pub const RECORD_SAVED: &str = "Your Record Has Been Saved";
pub const RECORD_UPDATED: &str = "Farmer Details Updated";
pub const RECORD_DELETED: &str = "Farmer Record Deleted";

const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

/// Farmer form as posted by the browser
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FarmerForm {
    pub farmername: String,
    pub adharnumber: String,
    pub age: String,
    pub gender: String,
    pub phonenumber: String,
    pub address: String,
    pub farmingtype: String,
}

impl From<FarmerForm> for FarmerInput {
    fn from(form: FarmerForm) -> Self {
        Self {
            farmer_name: form.farmername,
            adhar_number: form.adharnumber,
            age: form.age,
            gender: form.gender,
            phone_number: form.phonenumber,
            address: form.address,
            farming_type: form.farmingtype,
        }
    }
}

impl From<&Farmer> for FarmerForm {
    fn from(farmer: &Farmer) -> Self {
        let profile = farmer.profile();
        Self {
            farmername: profile.farmer_name.clone(),
            adharnumber: profile.adhar_number.clone(),
            age: profile.age.to_string(),
            gender: profile.gender.clone(),
            phonenumber: profile.phone_number.clone(),
            address: profile.address.clone(),
            farmingtype: profile.farming.clone(),
        }
    }
}

/// Choice list for a `<select>`. A stored value outside the known options is
/// kept as an extra entry so editing a record never silently replaces it.
fn choices<I, S>(known: I, current: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut options: Vec<String> = known.into_iter().map(Into::into).collect();
    if !current.is_empty() && !options.iter().any(|option| option == current) {
        options.push(current.to_string());
    }
    options
}

/// Where a farmer form posts back to
enum FormTarget {
    Register,
    Edit(FarmerId),
}

async fn form_page(
    state: &AppState,
    current: &CurrentUser,
    target: FormTarget,
    form: &FarmerForm,
) -> Result<Page, ApiError> {
    let farming_types = state.farming_service.list().await?;
    let farming_options = choices(
        farming_types.iter().map(|farming| farming.label()),
        &form.farmingtype,
    );
    let gender_options = choices(GENDERS, &form.gender);
    let (heading, action, submit_label) = match target {
        FormTarget::Register => ("Register Farmer", "/register".to_string(), "Submit"),
        FormTarget::Edit(rid) => ("Edit Farmer", format!("/edit/{}", rid), "Update"),
    };

    Ok(Page::new("farmer_form.html")
        .user(Some(&current.user))
        .with("heading", heading)
        .with("action", &action)
        .with("submit_label", submit_label)
        .with("farming_options", &farming_options)
        .with("gender_options", &gender_options)
        .with("form", form))
}

/// GET /register
pub async fn register_form(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Response, ApiError> {
    let flash = take_flash(&state, Some(&current)).await?;

    form_page(&state, &current, FormTarget::Register, &FarmerForm::default())
        .await?
        .flash(flash)
        .render()
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Form(form): Form<FarmerForm>,
) -> Result<Response, ApiError> {
    match state.farmer_service.create(form.clone().into()).await {
        Ok(_) => {
            set_flash(&state, &current, RECORD_SAVED).await?;
            Ok(Redirect::to("/farmerdetails").into_response())
        }
        Err(DomainError::Validation { message }) => {
            form_page(&state, &current, FormTarget::Register, &form)
                .await?
                .error(message)
                .status(StatusCode::UNPROCESSABLE_ENTITY)
                .render()
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /farmerdetails
pub async fn farmer_details(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Response, ApiError> {
    let farmers = state.farmer_service.list().await?;
    let flash = take_flash(&state, Some(&current)).await?;

    Page::new("farmerdetails.html")
        .user(Some(&current.user))
        .flash(flash)
        .with("farmers", &farmers)
        .render()
}

/// GET /edit/{rid}
pub async fn edit_form(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Path(rid): Path<String>,
) -> Result<Response, ApiError> {
    let rid = FarmerId::parse(&rid)?;
    let farmer = state
        .farmer_service
        .get(rid)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Farmer '{}' not found", rid)))?;

    form_page(&state, &current, FormTarget::Edit(rid), &FarmerForm::from(&farmer))
        .await?
        .render()
}

/// POST /edit/{rid}
pub async fn edit(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Path(rid): Path<String>,
    Form(form): Form<FarmerForm>,
) -> Result<Response, ApiError> {
    let rid = FarmerId::parse(&rid)?;

    match state.farmer_service.update(rid, form.clone().into()).await {
        Ok(_) => {
            set_flash(&state, &current, RECORD_UPDATED).await?;
            Ok(Redirect::to("/farmerdetails").into_response())
        }
        Err(DomainError::Validation { message }) => {
            form_page(&state, &current, FormTarget::Edit(rid), &form)
                .await?
                .error(message)
                .status(StatusCode::UNPROCESSABLE_ENTITY)
                .render()
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /delete/{rid}
///
/// Deleting an unknown id still redirects; there is nothing left to remove.
pub async fn delete(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Path(rid): Path<String>,
) -> Result<Response, ApiError> {
    let rid = FarmerId::parse(&rid)?;
    if state.farmer_service.delete(rid).await? {
        set_flash(&state, &current, RECORD_DELETED).await?;
    }

    Ok(Redirect::to("/farmerdetails").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FarmerProfile;

    #[test]
    fn test_form_field_names_match_html() {
        let form: FarmerForm = serde_urlencoded::from_str(
            "farmername=John+Doe&adharnumber=123456789012&age=35&gender=Male\
             &phonenumber=9876543210&address=123+Main+Street&farmingtype=Seed+Farming",
        )
        .unwrap();

        let input = FarmerInput::from(form);
        assert_eq!(input.farmer_name, "John Doe");
        assert_eq!(input.age, "35");
        assert_eq!(input.farming_type, "Seed Farming");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let form: FarmerForm = serde_urlencoded::from_str("farmername=Solo").unwrap();

        assert_eq!(form.farmername, "Solo");
        assert!(form.age.is_empty());
    }

    #[test]
    fn test_form_prefilled_from_farmer() {
        let farmer = Farmer::new(
            FarmerId::new(5),
            FarmerProfile {
                farmer_name: "Asha".to_string(),
                adhar_number: "000011112222".to_string(),
                age: 41,
                gender: "Female".to_string(),
                phone_number: "9000000000".to_string(),
                address: "Village Road".to_string(),
                farming: "Dairy Farming".to_string(),
            },
        );

        let form = FarmerForm::from(&farmer);
        assert_eq!(form.age, "41");
        assert_eq!(form.adharnumber, "000011112222");
        assert_eq!(form.farmingtype, "Dairy Farming");
    }

    #[test]
    fn test_choices_keep_unknown_current_value() {
        assert_eq!(choices(GENDERS, "Female"), vec!["Male", "Female", "Other"]);
        assert_eq!(
            choices(GENDERS, "female"),
            vec!["Male", "Female", "Other", "female"]
        );
        assert_eq!(choices(GENDERS, ""), vec!["Male", "Female", "Other"]);
        assert_eq!(
            choices(Vec::<String>::new(), "Goat Rearing"),
            vec!["Goat Rearing"]
        );
    }
}
