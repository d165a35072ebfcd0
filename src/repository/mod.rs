//! Persistence gateway for users and tasks.
//!
//! The services only see the [`UserRepository`] and [`TaskRepository`]
//! traits. Unique keys (username, email, task title) are enforced by the
//! implementations at write time and reported as `AppError::Conflict`.

pub mod memory;
pub mod postgres;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{NewUser, Task, User};

pub use memory::{InMemoryTaskRepository, InMemoryUserRepository};
pub use postgres::{PgTaskRepository, PgUserRepository};

/// Conflict messages shared by both store implementations.
pub const USERNAME_TAKEN: &str = "Username already exists";
pub const EMAIL_TAKEN: &str = "Email already exists";
pub const TITLE_TAKEN: &str = "Task already exists";

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user, assigning its id. Fails with `Conflict` on a taken username or email.
    async fn insert(&self, user: NewUser) -> AppResult<User>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// All users ordered by id.
    async fn find_all(&self) -> AppResult<Vec<User>>;

    /// Replaces the stored record with the same id. Fails with `NotFound` if it is gone.
    async fn update(&self, user: User) -> AppResult<User>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task. Fails with `Conflict` when the title is taken.
    async fn insert(&self, task: Task) -> AppResult<Task>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Task>>;

    async fn find_by_title(&self, title: &str) -> AppResult<Option<Task>>;

    /// All tasks, oldest first.
    async fn find_all(&self) -> AppResult<Vec<Task>>;

    async fn update(&self, task: Task) -> AppResult<Task>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Which store backs the running application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    InMemory,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StorageKind::Postgres => write!(f, "postgres"),
            StorageKind::InMemory => write!(f, "in-memory"),
        }
    }
}

/// The repositories the services are built on.
#[derive(Clone)]
pub struct Repositories {
    pub kind: StorageKind,
    pub users: Arc<dyn UserRepository>,
    pub tasks: Arc<dyn TaskRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            kind: StorageKind::InMemory,
            users: Arc::new(InMemoryUserRepository::new()),
            tasks: Arc::new(InMemoryTaskRepository::new()),
        }
    }

    /// Connects to Postgres when `DATABASE_URL` is configured, running pending
    /// migrations; otherwise falls back to the in-memory store.
    pub async fn from_config(config: &Config) -> AppResult<Self> {
        match &config.database_url {
            Some(url) => {
                let pool = postgres::connect(url, config.database_max_connections).await?;
                Ok(Self {
                    kind: StorageKind::Postgres,
                    users: Arc::new(PgUserRepository::new(pool.clone())),
                    tasks: Arc::new(PgTaskRepository::new(pool)),
                })
            }
            None => {
                log::warn!("DATABASE_URL not set; data will not survive a restart");
                Ok(Self::in_memory())
            }
        }
    }
}
