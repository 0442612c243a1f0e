//! Embedded Tera templates and page rendering

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use once_cell::sync::Lazy;
use serde::Serialize;
use tera::{Context, Tera};

use crate::domain::User;

use super::error::ApiError;

static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();

    tera.add_raw_templates(vec![
        ("base.html", include_str!("../../templates/base.html")),
        ("index.html", include_str!("../../templates/index.html")),
        ("signup.html", include_str!("../../templates/signup.html")),
        ("login.html", include_str!("../../templates/login.html")),
        ("farmer_form.html", include_str!("../../templates/farmer_form.html")),
        ("farmerdetails.html", include_str!("../../templates/farmerdetails.html")),
        ("addfarming.html", include_str!("../../templates/addfarming.html")),
        ("agroproducts.html", include_str!("../../templates/agroproducts.html")),
        ("addagroproduct.html", include_str!("../../templates/addagroproduct.html")),
        ("triggers.html", include_str!("../../templates/triggers.html")),
        ("error.html", include_str!("../../templates/error.html")),
    ])
    .expect("embedded templates must parse");

    tera
});

/// Render a template by name
pub fn render_template(name: &str, context: &Context) -> Result<String, tera::Error> {
    TEMPLATES.render(name, context)
}

/// A page under construction: template name plus context
#[derive(Debug)]
pub struct Page {
    template: &'static str,
    status: StatusCode,
    context: Context,
}

impl Page {
    pub fn new(template: &'static str) -> Self {
        Self {
            template,
            status: StatusCode::OK,
            context: Context::new(),
        }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// The signed-in user shown in the navigation bar
    pub fn user(mut self, user: Option<&User>) -> Self {
        if let Some(user) = user {
            self.context.insert("user", user);
        }
        self
    }

    pub fn flash(mut self, message: Option<String>) -> Self {
        if let Some(message) = message {
            self.context.insert("flash", &message);
        }
        self
    }

    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.context.insert("error", &message.into());
        self
    }

    pub fn with<T: Serialize + ?Sized>(mut self, key: &str, value: &T) -> Self {
        self.context.insert(key, value);
        self
    }

    /// Render to a response, mapping template failures to a 500 page
    pub fn render(self) -> Result<Response, ApiError> {
        let body = render_template(self.template, &self.context)
            .map_err(|e| ApiError::internal(format!("template {}: {:?}", self.template, e)))?;

        Ok((self.status, Html(body)).into_response())
    }
}
