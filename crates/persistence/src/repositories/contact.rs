//! Contact message repository for database operations.

use sqlx::PgPool;

use crate::entities::ContactMessageEntity;

/// Repository for contact form messages.
#[derive(Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    /// Creates a new ContactRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Store a message from the public contact form.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<ContactMessageEntity, sqlx::Error> {
        sqlx::query_as::<_, ContactMessageEntity>(
            r#"
            INSERT INTO contact_messages (name, email, message)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, message, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(message)
        .fetch_one(&self.pool)
        .await
    }

    /// List all messages, newest first.
    pub async fn list(&self) -> Result<Vec<ContactMessageEntity>, sqlx::Error> {
        sqlx::query_as::<_, ContactMessageEntity>(
            r#"
            SELECT id, name, email, message, created_at
            FROM contact_messages
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    // Note: ContactRepository tests require database connection and are covered by integration tests
}
