//! In-process HTTP harness for end-to-end tests
//!
//! Every `TestApp` owns a private in-memory database seeded with one user
//! (`testuser` / `test@test.com` / `password123`) and one farming type
//! (`Seed Farming`). Requests go straight into the router; the session cookie
//! is kept between requests like a browser would.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use cookie::Cookie;
use sqlx::SqlitePool;
use tower::ServiceExt;

use crate::api::{create_router, AppState};
use crate::config::AppConfig;
use crate::infrastructure::storage::migrated_test_pool;
use crate::infrastructure::user::SignupRequest;

pub const SEED_USERNAME: &str = "testuser";
pub const SEED_EMAIL: &str = "test@test.com";
pub const SEED_PASSWORD: &str = "password123";
pub const SEED_FARMING: &str = "Seed Farming";

const MAX_REDIRECTS: usize = 5;

pub struct TestApp {
    pub state: AppState,
    pub pool: SqlitePool,
    router: Router,
    cookie_name: String,
    session_cookie: Option<String>,
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// Path of the request that produced this response
    pub path: String,
    pub location: Option<String>,
    pub set_cookie: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn is_redirect_to(&self, path: &str) -> bool {
        self.status == StatusCode::SEE_OTHER && self.location.as_deref() == Some(path)
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let mut config = AppConfig::for_tests();
        config.farming.default_types = vec![SEED_FARMING.to_string()];

        let pool = migrated_test_pool().await;
        let state = crate::create_app_state_with_pool(pool.clone(), &config)
            .await
            .expect("app state");

        state
            .user_service
            .signup(SignupRequest {
                username: SEED_USERNAME.to_string(),
                email: SEED_EMAIL.to_string(),
                password: SEED_PASSWORD.to_string(),
            })
            .await
            .expect("seed user");

        Self {
            router: create_router(state.clone()),
            cookie_name: config.session.cookie_name.clone(),
            state,
            pool,
            session_cookie: None,
        }
    }

    /// A fresh app with the seed user already logged in
    pub async fn logged_in() -> Self {
        let mut app = Self::new().await;
        let response = app.login(SEED_EMAIL, SEED_PASSWORD).await;
        assert!(response.is_redirect_to("/"), "seed login failed: {:?}", response);
        app
    }

    pub fn has_session(&self) -> bool {
        self.session_cookie.is_some()
    }

    /// Create another account directly through the service layer
    pub async fn create_user(&self, username: &str, email: &str, password: &str) {
        self.state
            .user_service
            .signup(SignupRequest {
                username: username.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
            .expect("create user");
    }

    pub async fn login(&mut self, email: &str, password: &str) -> TestResponse {
        self.post_form("/login", &[("email", email), ("password", password)])
            .await
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(Method::GET, path, None).await
    }

    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = serde_urlencoded::to_string(fields).expect("form encoding");
        self.send(Method::POST, path, Some(body)).await
    }

    /// GET and follow redirects to the final page
    pub async fn get_following(&mut self, path: &str) -> TestResponse {
        let response = self.get(path).await;
        self.follow(response).await
    }

    /// POST a form and follow redirects to the final page
    pub async fn post_form_following(
        &mut self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> TestResponse {
        let response = self.post_form(path, fields).await;
        self.follow(response).await
    }

    async fn follow(&mut self, mut response: TestResponse) -> TestResponse {
        for _ in 0..MAX_REDIRECTS {
            if !response.status.is_redirection() {
                return response;
            }
            let location = response.location.clone().expect("redirect without location");
            response = self.get(&location).await;
        }
        panic!("too many redirects, last response: {:?}", response);
    }

    async fn send(&mut self, method: Method, path: &str, form: Option<String>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(cookie) = &self.session_cookie {
            builder = builder.header(header::COOKIE, format!("{}={}", self.cookie_name, cookie));
        }

        let request = match form {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        if let Some(raw) = &set_cookie {
            self.store_cookie(raw);
        }

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body");

        TestResponse {
            status,
            path: path.to_string(),
            location,
            set_cookie,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    fn store_cookie(&mut self, raw: &str) {
        let Ok(cookie) = Cookie::parse(raw) else {
            return;
        };
        if cookie.name() != self.cookie_name {
            return;
        }

        let expired = cookie.value().is_empty()
            || cookie.max_age().is_some_and(|age| age.is_zero());
        self.session_cookie = if expired {
            None
        } else {
            Some(cookie.value().to_string())
        };
    }
}
