use crate::{error::AppError, models::TaskInput, service::TaskService};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;

/// Retrieves every task, oldest first.
///
/// ## Responses:
/// - `200 OK`: A JSON array of `Task` objects, possibly empty.
/// - `500 Internal Server Error`: For storage errors.
#[get("")]
pub async fn get_tasks(tasks: web::Data<TaskService>) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(tasks.get_all_tasks().await?))
}

/// Creates a new task.
///
/// ## Request Body:
/// A JSON object matching `TaskInput`:
/// - `title`: required, unique, 1 to 200 characters.
/// - `description` (optional): at most 1000 characters.
/// - `completed` (optional): defaults to `false`.
/// - `due_date` (optional): `YYYY-MM-DD`.
///
/// ## Responses:
/// - `201 Created`: The stored `Task`.
/// - `400 Bad Request`: Invalid or malformed input.
/// - `409 Conflict`: A task with this title already exists.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskService>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = tasks.add_task(task_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Updates the task whose title matches the body's `title`.
///
/// ## Responses:
/// - `200 OK`: The updated `Task`; its id and title are unchanged.
/// - `400 Bad Request`: Invalid input.
/// - `404 Not Found`: No task has this title.
#[put("")]
pub async fn update_task(
    tasks: web::Data<TaskService>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = tasks.update_task(task_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

#[get("/pending")]
pub async fn get_pending_tasks(tasks: web::Data<TaskService>) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(tasks.get_pending_tasks().await?))
}

#[get("/completed")]
pub async fn get_completed_tasks(
    tasks: web::Data<TaskService>,
) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(tasks.get_completed_tasks().await?))
}

/// Open tasks due today (server-local date).
#[get("/today")]
pub async fn get_today_tasks(tasks: web::Data<TaskService>) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(tasks.get_today_tasks().await?))
}

#[get("/title/{title}")]
pub async fn get_task_by_title(
    tasks: web::Data<TaskService>,
    title: web::Path<String>,
) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(tasks.get_task_by_title(&title).await?))
}

/// Deletes the task with the given title.
///
/// ## Responses:
/// - `204 No Content`: On successful deletion.
/// - `404 Not Found`: No task has this title.
#[delete("/title/{title}")]
pub async fn delete_task(
    tasks: web::Data<TaskService>,
    title: web::Path<String>,
) -> Result<impl Responder, AppError> {
    tasks.delete_task(&title).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Retrieves a task by its UUID. Registered after the literal paths.
#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(tasks.get_task_by_id(task_id.into_inner()).await?))
}
