//! Domain services: validation and business rules layered over the repositories.

pub mod task_service;
pub mod user_service;

pub use task_service::TaskService;
pub use user_service::UserService;
