use async_trait::async_trait;

use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;

/// Port for identity operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new regular user.
    ///
    /// # Arguments
    /// * `command` - Validated username and password
    ///
    /// # Returns
    /// Created user entity with role `user`
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `HashingFailed` - Password could not be hashed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError>;

    /// Check a username/password pair.
    ///
    /// # Returns
    /// The matching user
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or password mismatch
    /// * `DatabaseError` - Database operation failed
    async fn authenticate(&self, username: &Username, password: &str) -> Result<User, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Create the admin account unless the username is already taken.
    ///
    /// # Returns
    /// True when an account was created
    ///
    /// # Errors
    /// * `HashingFailed` - Password could not be hashed
    /// * `DatabaseError` - Database operation failed
    async fn ensure_admin(&self, username: &Username, password: &Password)
        -> Result<bool, UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by username.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;
}
