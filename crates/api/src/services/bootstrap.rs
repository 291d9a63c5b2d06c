//! Admin bootstrap service for initial setup.
//!
//! Creates the first super admin on startup when the users table is empty.
//! This is a one-time operation; any existing user disables it.

use shared::password::{hash_password, PasswordError};
use sqlx::PgPool;
use tracing::{info, warn};

use domain::models::Role;
use persistence::repositories::UserRepository;

use crate::config::BootstrapConfig;

/// Error types for admin bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),
}

/// Bootstrap the first super admin if enabled and no user exists yet.
///
/// This function should be called after migrations on startup.
/// It is idempotent - if any user already exists, it does nothing.
pub async fn bootstrap_admin(
    pool: &PgPool,
    config: &BootstrapConfig,
) -> Result<(), BootstrapError> {
    if !config.enabled {
        return Ok(());
    }

    let repo = UserRepository::new(pool.clone());

    if repo.any_exists().await? {
        info!("Users already exist - skipping admin bootstrap");
        return Ok(());
    }

    let password_hash = hash_password(&config.admin_password)?;

    let created = repo
        .create_user(
            &config.admin_name,
            &config.admin_email.to_lowercase(),
            &password_hash,
            Role::SuperAdmin.as_str(),
        )
        .await;

    // Two instances can race past the any_exists check; the unique email
    // constraint turns the loser into a no-op.
    if let Err(sqlx::Error::Database(db_err)) = &created {
        if db_err.code().as_deref() == Some("23505") {
            info!("Bootstrap admin was created concurrently - skipping");
            return Ok(());
        }
    }
    let user = created?;

    info!(
        email = %user.email,
        user_id = %user.id,
        "Bootstrap super admin created"
    );

    if config.admin_password == "admin123" {
        warn!(
            "SECURITY: The bootstrap super admin uses the default password. \
             Set GS__BOOTSTRAP__ADMIN_PASSWORD before exposing this instance."
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_error_from_sqlx() {
        let error: BootstrapError = sqlx::Error::RowNotFound.into();
        assert!(format!("{}", error).starts_with("Database error"));
    }

    #[test]
    fn test_disabled_config_short_circuits() {
        let config = BootstrapConfig {
            enabled: false,
            ..BootstrapConfig::default()
        };
        assert!(!config.enabled);
    }
}
