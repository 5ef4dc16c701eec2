use anyhow::{Context, Result};
use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::repositories::{NewUser, UserRepository};

/// Creates the configured admin account unless a user with that email exists.
pub async fn initialize_admin_user(db: &DatabaseConnection, config: &Config) -> Result<()> {
    let users = UserRepository::new(db);

    let existing_admin = users
        .find_by_email(&config.admin_email)
        .await
        .context("Failed to check existing admin")?;

    if existing_admin.is_some() {
        tracing::info!("Admin user already exists, skipping initialization");
        return Ok(());
    }

    tracing::info!("Creating default admin user...");

    let hashed_password = bcrypt::hash(&config.admin_password, bcrypt::DEFAULT_COST)
        .context("Failed to hash admin password")?;

    users
        .create(NewUser {
            name: config.admin_name.clone(),
            email: config.admin_email.clone(),
            password_hash: hashed_password,
            department_category: config.admin_department_category.clone(),
            role: RoleEnum::Admin,
        })
        .await
        .context("Failed to insert admin user")?;

    tracing::info!(
        email = %config.admin_email,
        category = %config.admin_department_category,
        "Admin user created"
    );
    tracing::warn!("Please change the default admin password after first login");

    Ok(())
}
