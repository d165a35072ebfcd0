use crate::{
    auth::{CurrentUser, SessionManager},
    error::{AppError, LOGIN_PATH},
    models::RegisterRequest,
    service::UserService,
};
use actix_web::{get, http::header, post, route, web, HttpResponse, Responder};
use serde::Deserialize;

/// Fields posted by the login form.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Notices shown on the login page after a redirect.
#[derive(Debug, Deserialize)]
pub struct LoginPageQuery {
    pub error: Option<String>,
    pub logout: Option<String>,
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Landing page. Shows who is logged in, if anyone.
#[get("/")]
pub async fn index(user: Option<CurrentUser>) -> impl Responder {
    let greeting = match user {
        Some(user) => format!(
            "<p>Signed in as {}.</p><form method=\"post\" action=\"/logout\"><button>Log out</button></form>",
            escape(user.username())
        ),
        None => "<p><a href=\"/login\">Log in</a></p>".to_string(),
    };
    html(format!(
        "<!DOCTYPE html><html><head><title>Tasks</title></head><body><h1>Tasks</h1>{}</body></html>",
        greeting
    ))
}

#[get("/login")]
pub async fn login_page(query: web::Query<LoginPageQuery>) -> impl Responder {
    let notice = if query.error.is_some() {
        "<p class=\"error\">Invalid username or password.</p>"
    } else if query.logout.is_some() {
        "<p class=\"info\">You have been logged out.</p>"
    } else {
        ""
    };
    html(format!(
        "<!DOCTYPE html><html><head><title>Log in</title></head><body>\
         <h1>Log in</h1>{}\
         <form method=\"post\" action=\"/login\">\
         <label>Username <input name=\"username\" required></label>\
         <label>Password <input name=\"password\" type=\"password\" required></label>\
         <button type=\"submit\">Log in</button>\
         </form></body></html>",
        notice
    ))
}

/// Form login. Success sets the session cookie and redirects to `/`;
/// bad credentials redirect back to `/login?error`.
#[post("/login")]
pub async fn login(
    users: web::Data<UserService>,
    sessions: web::Data<SessionManager>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    match users.authenticate(&form.username, &form.password).await {
        Ok(user) => {
            let token = sessions.issue(&user.username, &user.roles)?;
            log::info!("{} logged in", user.username);
            Ok(HttpResponse::Found()
                .insert_header((header::LOCATION, "/"))
                .cookie(sessions.cookie(token))
                .finish())
        }
        Err(AppError::Unauthorized(_)) => Ok(redirect(&format!("{}?error", LOGIN_PATH))),
        Err(err) => Err(err),
    }
}

/// Drops the session cookie and returns to the login page.
#[route("/logout", method = "GET", method = "POST")]
pub async fn logout(sessions: web::Data<SessionManager>, user: Option<CurrentUser>) -> impl Responder {
    if let Some(user) = user {
        log::info!("{} logged out", user.username());
    }
    HttpResponse::Found()
        .insert_header((header::LOCATION, format!("{}?logout", LOGIN_PATH)))
        .cookie(sessions.removal_cookie())
        .finish()
}

/// Register a new user
///
/// ## Responses:
/// - `201 Created`: The new `User` (without password digest).
/// - `400 Bad Request`: Invalid input.
/// - `409 Conflict`: Username or email already taken.
#[post("/register")]
pub async fn register(
    users: web::Data<UserService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let user = users.add_user(register_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}
