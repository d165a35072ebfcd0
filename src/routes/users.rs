//! `/api/users` endpoints.
//!
//! Lookups answer 404 with an empty body for any client-side failure; the
//! update endpoint answers 400 with the failure message as plain text.
//! Storage failures are 500 on every endpoint.

use actix_web::{delete, get, route, web, HttpResponse, ResponseError};

use crate::error::AppError;
use crate::models::UserUpdate;
use crate::service::UserService;

fn lookup_failed(err: AppError) -> HttpResponse {
    if err.is_server_error() {
        return err.error_response();
    }
    log::debug!("user lookup failed: {}", err);
    HttpResponse::NotFound().finish()
}

fn update_failed(err: AppError) -> HttpResponse {
    if err.is_server_error() {
        return err.error_response();
    }
    HttpResponse::BadRequest()
        .content_type("text/plain; charset=utf-8")
        .body(err.to_string())
}

/// Every user. An empty store answers 404.
#[get("/all")]
pub async fn get_all_users(users: web::Data<UserService>) -> HttpResponse {
    match users.get_all_users().await {
        Ok(all) => HttpResponse::Ok().json(all),
        Err(err) => lookup_failed(err),
    }
}

/// Overwrites the user named in the body; both GET and PUT are accepted.
///
/// ## Responses:
/// - `200 OK`: `User: <username> updated successfully` as plain text.
/// - `400 Bad Request`: the failure message as plain text.
#[route("/update", method = "GET", method = "PUT")]
pub async fn update_user(
    users: web::Data<UserService>,
    update: web::Json<UserUpdate>,
) -> HttpResponse {
    match users.update_user(update.into_inner()).await {
        Ok(user) => HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(format!("User: {} updated successfully", user.username)),
        Err(err) => update_failed(err),
    }
}

#[get("/username/{username}")]
pub async fn get_user_by_username(
    users: web::Data<UserService>,
    username: web::Path<String>,
) -> HttpResponse {
    match users.get_user_by_username(&username).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(err) => lookup_failed(err),
    }
}

#[get("/email/{email}")]
pub async fn get_user_by_email(
    users: web::Data<UserService>,
    email: web::Path<String>,
) -> HttpResponse {
    match users.get_user_by_email(&email).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(err) => lookup_failed(err),
    }
}

#[delete("/username/{username}")]
pub async fn delete_user(
    users: web::Data<UserService>,
    username: web::Path<String>,
) -> HttpResponse {
    match users.delete_user(&username).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => lookup_failed(err),
    }
}

/// Registered last so the literal segments above take precedence.
#[get("/{id}")]
pub async fn get_user_by_id(users: web::Data<UserService>, id: web::Path<i64>) -> HttpResponse {
    match users.get_user_by_id(id.into_inner()).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(err) => lookup_failed(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::PasswordHasher;
    use crate::models::RegisterRequest;
    use crate::repository::InMemoryUserRepository;
    use actix_web::{http::StatusCode, test, App};
    use std::sync::Arc;

    fn users() -> UserService {
        UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            PasswordHasher::default(),
        )
    }

    #[actix_rt::test]
    async fn test_lookup_failures_are_empty_404() {
        let service = users();
        service
            .add_user(RegisterRequest {
                username: "alice".into(),
                email: "alice@example.com".into(),
                password: "password123".into(),
            })
            .await
            .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .service(web::scope("/api/users").service(get_user_by_email).service(get_user_by_id)),
        )
        .await;

        for uri in ["/api/users/email/not-an-email", "/api/users/email/bob@example.com", "/api/users/42"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
            assert!(test::read_body(resp).await.is_empty());
        }
    }

    #[::core::prelude::v1::test]
    fn test_update_failure_echoes_message() {
        let resp = update_failed(AppError::NotFound("User not found".into()));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = update_failed(AppError::Database("gone".into()));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
