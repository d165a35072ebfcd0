pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;

use actix_web::web;

/// Pages, session endpoints and the REST API.
///
/// Literal path segments are registered before `{id}` so that e.g.
/// `/api/tasks/today` never reaches the id extractor.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(auth::index)
        .service(auth::login_page)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::register)
        .service(
            web::scope("/api/users")
                .service(users::get_all_users)
                .service(users::update_user)
                .service(users::get_user_by_username)
                .service(users::get_user_by_email)
                .service(users::delete_user)
                .service(users::get_user_by_id),
        )
        .service(
            web::scope("/api/tasks")
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::update_task)
                .service(tasks::get_pending_tasks)
                .service(tasks::get_completed_tasks)
                .service(tasks::get_today_tasks)
                .service(tasks::get_task_by_title)
                .service(tasks::delete_task)
                .service(tasks::get_task),
        );
}
