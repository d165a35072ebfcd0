use std::sync::Arc;

use validator::{validate_email, Validate};

use crate::auth::PasswordHasher;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, RegisterRequest, User, UserUpdate, DEFAULT_ROLE};
use crate::repository::UserRepository;

/// Business rules for user accounts.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, hasher: PasswordHasher) -> Self {
        Self { repository, hasher }
    }

    /// Registers a new account with a hashed password and the default role.
    ///
    /// A taken username or email is reported by the store as `Conflict`.
    pub async fn add_user(&self, request: RegisterRequest) -> AppResult<User> {
        request.validate()?;

        let user = NewUser {
            username: request.username,
            email: request.email,
            password_hash: self.hasher.hash(&request.password)?,
            roles: DEFAULT_ROLE.to_string(),
        };

        let stored = self.repository.insert(user).await.map_err(|e| {
            if let AppError::Conflict(msg) = &e {
                log::info!("registration rejected: {}", msg);
            }
            e
        })?;
        log::info!("created user {} (id {})", stored.username, stored.id);
        Ok(stored)
    }

    pub async fn get_user_by_username(&self, username: &str) -> AppResult<User> {
        require_present(username, "Username")?;
        self.repository
            .find_by_username(username)
            .await?
            .ok_or_else(user_not_found)
    }

    pub async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        require_present(email, "Email")?;
        if !validate_email(email) {
            return Err(AppError::Validation("Email should be valid".into()));
        }
        self.repository
            .find_by_email(email)
            .await?
            .ok_or_else(user_not_found)
    }

    pub async fn get_user_by_id(&self, id: i64) -> AppResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(user_not_found)
    }

    /// Overwrites the account named by `update.username` with the supplied fields.
    ///
    /// The email is always replaced; password and roles only when given. The
    /// new password is hashed before it is stored.
    pub async fn update_user(&self, update: UserUpdate) -> AppResult<User> {
        update.validate()?;
        let mut user = self.get_user_by_username(&update.username).await?;

        user.email = update.email;
        if let Some(password) = update.password {
            user.password_hash = self.hasher.hash(&password)?;
        }
        if let Some(roles) = update.roles {
            require_present(&roles, "Roles")?;
            user.roles = roles;
        }

        let updated = self.repository.update(user).await?;
        log::info!("updated user {}", updated.username);
        Ok(updated)
    }

    pub async fn delete_user(&self, username: &str) -> AppResult<()> {
        let user = self.get_user_by_username(username).await?;
        if !self.repository.delete(user.id).await? {
            return Err(user_not_found());
        }
        log::info!("deleted user {}", user.username);
        Ok(())
    }

    /// Every account; an empty store is reported as `NotFound`.
    pub async fn get_all_users(&self) -> AppResult<Vec<User>> {
        let users = self.repository.find_all().await?;
        if users.is_empty() {
            return Err(AppError::NotFound("No users found".into()));
        }
        Ok(users)
    }

    /// Checks a login attempt. Unknown users and wrong passwords are indistinguishable.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<User> {
        let invalid = || AppError::Unauthorized("Invalid credentials".into());

        let user = self
            .repository
            .find_by_username(username)
            .await?
            .ok_or_else(invalid)?;

        if !self.hasher.verify(password, &user.password_hash) {
            log::info!("failed login for {}", username);
            return Err(invalid());
        }
        Ok(user)
    }
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".into())
}

fn require_present(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} cannot be blank", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryUserRepository;
    use pretty_assertions::assert_eq;

    fn service() -> UserService {
        UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            PasswordHasher::default(),
        )
    }

    fn register(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "plaintext-secret".to_string(),
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_add_user_hashes_password_and_assigns_role() {
        let users = service();
        let user = users.add_user(register("alice", "alice@example.com")).await.unwrap();

        assert_eq!(user.roles, DEFAULT_ROLE);
        assert_ne!(user.password_hash, "plaintext-secret");
        assert!(PasswordHasher::default().verify("plaintext-secret", &user.password_hash));
    }

    #[test_log::test(tokio::test)]
    async fn test_add_user_rejects_duplicates_without_mutation() {
        let users = service();
        users.add_user(register("alice", "alice@example.com")).await.unwrap();

        let same_name = users.add_user(register("alice", "other@example.com")).await;
        assert!(matches!(same_name, Err(AppError::Conflict(msg)) if msg == "Username already exists"));

        let same_email = users.add_user(register("bob", "alice@example.com")).await;
        assert!(matches!(same_email, Err(AppError::Conflict(msg)) if msg == "Email already exists"));

        let all = users.get_all_users().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].email, "alice@example.com");
    }

    #[test_log::test(tokio::test)]
    async fn test_lookups() {
        let users = service();
        let alice = users.add_user(register("alice", "alice@example.com")).await.unwrap();

        assert_eq!(users.get_user_by_id(alice.id).await.unwrap(), alice);
        assert_eq!(users.get_user_by_username("alice").await.unwrap(), alice);
        assert_eq!(users.get_user_by_email("alice@example.com").await.unwrap(), alice);

        assert!(matches!(users.get_user_by_id(99).await, Err(AppError::NotFound(_))));
        assert!(matches!(users.get_user_by_username("bob").await, Err(AppError::NotFound(_))));
        assert!(matches!(users.get_user_by_username("  ").await, Err(AppError::Validation(_))));
        assert!(matches!(users.get_user_by_email("nope").await, Err(AppError::Validation(_))));
    }

    #[test_log::test(tokio::test)]
    async fn test_update_user_overwrites_supplied_fields() {
        let users = service();
        let alice = users.add_user(register("alice", "alice@example.com")).await.unwrap();

        let updated = users
            .update_user(UserUpdate {
                username: "alice".into(),
                email: "alice@work.example.com".into(),
                password: Some("new-password".into()),
                roles: Some("ROLE_USER,ROLE_ADMIN".into()),
            })
            .await
            .unwrap();

        assert_eq!(updated.id, alice.id);
        assert_eq!(updated.email, "alice@work.example.com");
        assert!(updated.has_role("ROLE_ADMIN"));
        assert!(users.authenticate("alice", "new-password").await.is_ok());
        assert!(users.authenticate("alice", "plaintext-secret").await.is_err());

        let missing = users
            .update_user(UserUpdate {
                username: "ghost".into(),
                email: "ghost@example.com".into(),
                password: None,
                roles: None,
            })
            .await;
        assert!(matches!(missing, Err(AppError::NotFound(msg)) if msg == "User not found"));
    }

    #[test_log::test(tokio::test)]
    async fn test_delete_user_and_empty_listing() {
        let users = service();
        assert!(matches!(users.get_all_users().await, Err(AppError::NotFound(_))));

        users.add_user(register("alice", "alice@example.com")).await.unwrap();
        users.delete_user("alice").await.unwrap();

        assert!(matches!(users.delete_user("alice").await, Err(AppError::NotFound(_))));
        assert!(matches!(users.get_all_users().await, Err(AppError::NotFound(_))));
    }

    #[test_log::test(tokio::test)]
    async fn test_authenticate() {
        let users = service();
        users.add_user(register("alice", "alice@example.com")).await.unwrap();

        assert_eq!(
            users.authenticate("alice", "plaintext-secret").await.unwrap().username,
            "alice"
        );
        assert!(matches!(
            users.authenticate("alice", "wrong").await,
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            users.authenticate("nobody", "plaintext-secret").await,
            Err(AppError::Unauthorized(_))
        ));
    }
}
