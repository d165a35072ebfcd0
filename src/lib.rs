#![doc = "The `todo_api` library crate."]
#![doc = ""]
#![doc = "Domain models, the user and task services, the persistence gateway, the"]
#![doc = "form-login security chain and the HTTP routes of the task backend."]
#![doc = "The binary (`main.rs`) wires them into an actix-web server."]

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod method_override;
pub mod models;
pub mod repository;
pub mod routes;
pub mod service;

pub use app::AppState;
pub use error::{AppError, AppResult};
