use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{TaskRepository, UserRepository, EMAIL_TAKEN, TITLE_TAKEN, USERNAME_TAKEN};
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, Task, User};

#[derive(Debug, Default)]
struct UserTable {
    next_id: i64,
    rows: BTreeMap<i64, User>,
}

impl UserTable {
    /// Uniqueness check over every row except `skip_id`.
    fn check_unique(&self, username: &str, email: &str, skip_id: Option<i64>) -> AppResult<()> {
        let others = self.rows.values().filter(|u| Some(u.id) != skip_id);
        for user in others {
            if user.username == username {
                return Err(AppError::Conflict(USERNAME_TAKEN.into()));
            }
            if user.email.eq_ignore_ascii_case(email) {
                return Err(AppError::Conflict(EMAIL_TAKEN.into()));
            }
        }
        Ok(())
    }
}

/// In-memory implementation of `UserRepository` (for development/testing).
///
/// The uniqueness check and the write happen under one write lock.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let mut table = self.table.write().await;
        table.check_unique(&user.username, &user.email, None)?;

        table.next_id += 1;
        let stored = User {
            id: table.next_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            roles: user.roles,
            created_at: Utc::now(),
        };
        table.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&user.id) {
            return Err(AppError::NotFound("User not found".into()));
        }
        table.check_unique(&user.username, &user.email, Some(user.id))?;
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}

/// In-memory implementation of `TaskRepository` (for development/testing).
#[derive(Debug, Default, Clone)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: Task) -> AppResult<Task> {
        let mut tasks = self.tasks.write().await;
        if tasks.values().any(|t| t.title == task.title) {
            return Err(AppError::Conflict(TITLE_TAKEN.into()));
        }
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Task>> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> AppResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.values().find(|t| t.title == title).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        let mut all: Vec<Task> = tasks.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.title.cmp(&b.title)));
        Ok(all)
    }

    async fn update(&self, task: Task) -> AppResult<Task> {
        let mut tasks = self.tasks.write().await;
        if !tasks.contains_key(&task.id) {
            return Err(AppError::NotFound("Task not found".into()));
        }
        if tasks.values().any(|t| t.id != task.id && t.title == task.title) {
            return Err(AppError::Conflict(TITLE_TAKEN.into()));
        }
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tasks.write().await.remove(&id).is_some())
    }
}
