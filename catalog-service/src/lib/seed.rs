use thiserror::Error;

use crate::config::AdminConfig;
use crate::config::SeedConfig;
use crate::domain::category::errors::CategoryError;
use crate::domain::category::models::CategoryName;
use crate::domain::category::ports::CategoryServicePort;
use crate::domain::user::models::Password;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserServicePort;
use crate::user::errors::UserError;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to seed admin account: {0}")]
    Admin(#[from] UserError),

    #[error("Failed to seed category: {0}")]
    Category(#[from] CategoryError),
}

/// Ensure the administrator account and the configured categories exist.
///
/// Safe to run on every start; existing records are left untouched.
pub async fn initial_seed(
    user_service: &dyn UserServicePort,
    category_service: &dyn CategoryServicePort,
    admin: &AdminConfig,
    seed: &SeedConfig,
) -> Result<(), SeedError> {
    let username = Username::new(&admin.username).map_err(UserError::from)?;
    let password = Password::new(admin.password.clone()).map_err(UserError::from)?;

    if user_service.ensure_admin(&username, &password).await? {
        tracing::info!(username = %username, "Admin account created");
    }

    for name in seed.category_names() {
        let name = CategoryName::new(name).map_err(CategoryError::from)?;
        if category_service.ensure_category(name.clone()).await? {
            tracing::info!(category = %name, "Seed category created");
        }
    }

    Ok(())
}
