#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{test, App};
use todo_api::auth::{PasswordHasher, SessionManager, SESSION_COOKIE};
use todo_api::models::RegisterRequest;
use todo_api::repository::Repositories;
use todo_api::method_override::MethodOverride;
use todo_api::AppState;

pub const TEST_PASSWORD: &str = "Password123!";

/// State over fresh in-memory repositories with the cheapest bcrypt cost.
pub fn test_state() -> AppState {
    AppState::new(
        Repositories::in_memory(),
        PasswordHasher::default(),
        SessionManager::new("integration_test_secret", 1),
    )
}

/// The application as `main` assembles it, minus CORS.
pub async fn init_app(
    state: &AppState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    let state = state.clone();
    test::init_service(
        App::new()
            .wrap(state.security())
            .wrap(Logger::default())
            .wrap(MethodOverride)
            .configure(move |cfg| state.configure(cfg)),
    )
    .await
}

pub async fn create_user(state: &AppState, username: &str, email: &str) -> todo_api::models::User {
    state
        .users
        .add_user(RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: TEST_PASSWORD.to_string(),
        })
        .await
        .expect("Failed to create test user")
}

/// Posts the login form and returns the session cookie it set.
pub async fn login(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    username: &str,
    password: &str,
) -> Option<Cookie<'static>> {
    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("username", username), ("password", password)])
        .to_request();
    let resp = test::call_service(app, req).await;
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned());
    cookie
}

/// A session cookie minted directly, bypassing the login form.
pub fn session_cookie(state: &AppState, username: &str, roles: &str) -> Cookie<'static> {
    let token = state
        .sessions
        .issue(username, roles)
        .expect("Failed to issue session");
    state.sessions.cookie(token)
}
