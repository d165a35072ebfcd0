use std::sync::Arc;

use chrono::{Local, NaiveDate};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{Task, TaskInput};
use crate::repository::TaskRepository;

/// Business rules for to-do tasks. Titles are unique and act as the update key.
#[derive(Clone)]
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    /// Stores a new task. A taken title is reported by the store as `Conflict`.
    pub async fn add_task(&self, input: TaskInput) -> AppResult<Task> {
        validate(&input)?;
        let task = self.repository.insert(Task::new(input)).await?;
        log::info!("created task {:?} ({})", task.title, task.id);
        Ok(task)
    }

    pub async fn get_task_by_id(&self, id: Uuid) -> AppResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(task_not_found)
    }

    pub async fn get_task_by_title(&self, title: &str) -> AppResult<Task> {
        if title.trim().is_empty() {
            return Err(AppError::Validation("Title cannot be blank".into()));
        }
        self.repository
            .find_by_title(title)
            .await?
            .ok_or_else(task_not_found)
    }

    /// Every task; empty when there are none.
    pub async fn get_all_tasks(&self) -> AppResult<Vec<Task>> {
        self.repository.find_all().await
    }

    /// Finds the task with `input.title` and replaces its description,
    /// completion flag and due date. The id is kept.
    pub async fn update_task(&self, input: TaskInput) -> AppResult<Task> {
        validate(&input)?;
        let mut task = self.get_task_by_title(&input.title).await?;
        task.apply(input);

        let updated = self.repository.update(task).await?;
        log::info!("updated task {:?}", updated.title);
        Ok(updated)
    }

    pub async fn delete_task(&self, title: &str) -> AppResult<()> {
        let task = self.get_task_by_title(title).await?;
        if !self.repository.delete(task.id).await? {
            return Err(task_not_found());
        }
        log::info!("deleted task {:?}", task.title);
        Ok(())
    }

    pub async fn get_pending_tasks(&self) -> AppResult<Vec<Task>> {
        self.filtered(|task| !task.completed).await
    }

    pub async fn get_completed_tasks(&self) -> AppResult<Vec<Task>> {
        self.filtered(|task| task.completed).await
    }

    /// Open tasks due on today's local calendar date.
    pub async fn get_today_tasks(&self) -> AppResult<Vec<Task>> {
        self.get_tasks_due_on(Local::now().date_naive()).await
    }

    /// Open tasks whose due date is exactly `date`.
    pub async fn get_tasks_due_on(&self, date: NaiveDate) -> AppResult<Vec<Task>> {
        self.filtered(|task| task.is_due_on(date)).await
    }

    async fn filtered<F>(&self, keep: F) -> AppResult<Vec<Task>>
    where
        F: Fn(&Task) -> bool,
    {
        let tasks = self.get_all_tasks().await?;
        Ok(tasks.into_iter().filter(|task| keep(task)).collect())
    }
}

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

fn validate(input: &TaskInput) -> AppResult<()> {
    input.validate()?;
    if input.title.trim().is_empty() {
        return Err(AppError::Validation("Title cannot be blank".into()));
    }
    Ok(())
}
