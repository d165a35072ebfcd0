use actix_web::web;

use crate::auth::{PasswordHasher, SecurityMiddleware, SecurityPolicy, SessionManager};
use crate::config::Config;
use crate::repository::{Repositories, StorageKind};
use crate::routes;
use crate::service::{TaskService, UserService};

/// Shared handler state, built once and cloned into every worker.
#[derive(Clone)]
pub struct AppState {
    pub users: web::Data<UserService>,
    pub tasks: web::Data<TaskService>,
    pub sessions: web::Data<SessionManager>,
    pub storage: web::Data<StorageKind>,
}

impl AppState {
    pub fn new(repositories: Repositories, hasher: PasswordHasher, sessions: SessionManager) -> Self {
        Self {
            users: web::Data::new(UserService::new(repositories.users, hasher)),
            tasks: web::Data::new(TaskService::new(repositories.tasks)),
            sessions: web::Data::new(sessions),
            storage: web::Data::new(repositories.kind),
        }
    }

    pub fn from_config(repositories: Repositories, config: &Config) -> Self {
        Self::new(
            repositories,
            PasswordHasher::new(config.bcrypt_cost),
            SessionManager::new(&config.session_secret, config.session_ttl_hours),
        )
    }

    /// Registers the state and every route on an `App`.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.users.clone())
            .app_data(self.tasks.clone())
            .app_data(self.sessions.clone())
            .app_data(self.storage.clone())
            .configure(routes::config);
    }

    /// The security chain guarding the routes, using this state's session keys.
    pub fn security(&self) -> SecurityMiddleware {
        SecurityMiddleware::new(SecurityPolicy::default(), self.sessions.get_ref().clone())
    }
}
