use std::sync::Arc;
use std::sync::OnceLock;

use async_trait::async_trait;
use auth::PasswordHasher;
use chrono::Utc;

use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for identity operations.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: PasswordHasher,
    /// Verified against when the username is unknown so that both login
    /// failure paths cost one bcrypt comparison at the configured cost.
    unknown_user_hash: OnceLock<String>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `password_hasher` - Hasher used for new credentials and logins
    pub fn new(repository: Arc<UR>, password_hasher: PasswordHasher) -> Self {
        Self {
            repository,
            password_hasher,
            unknown_user_hash: OnceLock::new(),
        }
    }

    async fn unknown_user_hash(&self) -> Result<String, UserError> {
        if let Some(hash) = self.unknown_user_hash.get() {
            return Ok(hash.clone());
        }

        let hasher = self.password_hasher;
        let hash = tokio::task::spawn_blocking(move || hasher.hash("unknown-user"))
            .await
            .map_err(|e| UserError::Unknown(e.to_string()))??;

        Ok(self.unknown_user_hash.get_or_init(|| hash).clone())
    }

    async fn hash_password(&self, password: &Password) -> Result<String, UserError> {
        let hasher = self.password_hasher;
        let password = password.clone();

        tokio::task::spawn_blocking(move || hasher.hash(password.expose()))
            .await
            .map_err(|e| UserError::Unknown(e.to_string()))?
            .map_err(UserError::from)
    }

    async fn verify_password(&self, password: &str, stored_hash: String) -> Result<bool, UserError> {
        let hasher = self.password_hasher;
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| UserError::Unknown(e.to_string()))
    }

    async fn create_with_role(
        &self,
        username: Username,
        password: &Password,
        role: Role,
    ) -> Result<User, UserError> {
        let password_hash = self.hash_password(password).await?;

        let user = User {
            id: UserId::new(),
            username,
            password_hash,
            role,
            created_at: Utc::now(),
        };

        self.repository.create(user).await
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(UserError::UsernameAlreadyExists(
                command.username.to_string(),
            ));
        }

        let user = self
            .create_with_role(command.username, &command.password, Role::User)
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }

    async fn authenticate(&self, username: &Username, password: &str) -> Result<User, UserError> {
        let user = self.repository.find_by_username(username).await?;

        let stored_hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.unknown_user_hash().await?,
        };

        let verified = self.verify_password(password, stored_hash).await?;

        match user {
            Some(user) if verified => Ok(user),
            _ => {
                tracing::debug!(username = %username, "Login rejected");
                Err(UserError::InvalidCredentials)
            }
        }
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn ensure_admin(
        &self,
        username: &Username,
        password: &Password,
    ) -> Result<bool, UserError> {
        if self.repository.find_by_username(username).await?.is_some() {
            return Ok(false);
        }

        let admin = self
            .create_with_role(username.clone(), password, Role::Admin)
            .await?;

        tracing::info!(user_id = %admin.id, username = %admin.username, "Admin account seeded");

        Ok(true)
    }
}
