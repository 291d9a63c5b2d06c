//! Registrant repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::RegistrantEntity;
use crate::metrics::QueryTimer;

use domain::models::generate_check_in_code;

/// Outcome of an attendance marking attempt.
#[derive(Debug, Clone)]
pub enum MarkAttendedOutcome {
    /// This call set the timestamp.
    Marked(RegistrantEntity),
    /// The timestamp was already set. The entity is returned unchanged.
    AlreadyAttended(RegistrantEntity),
    NotFound,
}

/// Repository for registrant database operations.
#[derive(Clone)]
pub struct RegistrantRepository {
    pool: PgPool,
}

impl RegistrantRepository {
    /// Creates a new RegistrantRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a registrant with a freshly allocated check-in code.
    ///
    /// The unique index on check_in_code is the authority on collisions: a
    /// duplicate insert is rejected by the database and retried here with a
    /// new code. The in-process generate step never checks first.
    pub async fn create(
        &self,
        activity_id: Uuid,
        name: &str,
        school: &str,
        phone: Option<&str>,
        email: &str,
    ) -> Result<RegistrantEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_registrant");
        loop {
            let code = generate_check_in_code();
            let result = sqlx::query_as::<_, RegistrantEntity>(
                r#"
                INSERT INTO registrants (activity_id, name, school, phone, email, status, check_in_code)
                VALUES ($1, $2, $3, $4, $5, 'pending', $6)
                RETURNING id, activity_id, name, school, phone, email, status,
                          check_in_code, attended_at, created_at
                "#,
            )
            .bind(activity_id)
            .bind(name)
            .bind(school)
            .bind(phone)
            .bind(email)
            .bind(&code)
            .fetch_one(&self.pool)
            .await;

            match result {
                Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                    // Code collision, try again with a fresh one.
                    continue;
                }
                other => {
                    timer.record();
                    return other;
                }
            }
        }
    }

    /// Find a registrant by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RegistrantEntity>, sqlx::Error> {
        sqlx::query_as::<_, RegistrantEntity>(
            r#"
            SELECT id, activity_id, name, school, phone, email, status,
                   check_in_code, attended_at, created_at
            FROM registrants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a registrant by check-in code.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<RegistrantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_registrant_by_code");
        let result = sqlx::query_as::<_, RegistrantEntity>(
            r#"
            SELECT id, activity_id, name, school, phone, email, status,
                   check_in_code, attended_at, created_at
            FROM registrants
            WHERE check_in_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List an activity's registrants, newest first, optionally filtered by
    /// status.
    pub async fn list_by_activity(
        &self,
        activity_id: Uuid,
        status: Option<&str>,
    ) -> Result<Vec<RegistrantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_registrants_by_activity");
        let result = match status {
            Some(status) => {
                sqlx::query_as::<_, RegistrantEntity>(
                    r#"
                    SELECT id, activity_id, name, school, phone, email, status,
                           check_in_code, attended_at, created_at
                    FROM registrants
                    WHERE activity_id = $1 AND status = $2
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(activity_id)
                .bind(status)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, RegistrantEntity>(
                    r#"
                    SELECT id, activity_id, name, school, phone, email, status,
                           check_in_code, attended_at, created_at
                    FROM registrants
                    WHERE activity_id = $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(activity_id)
                .fetch_all(&self.pool)
                .await
            }
        };
        timer.record();
        result
    }

    /// Set a registrant's status string.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> Result<Option<RegistrantEntity>, sqlx::Error> {
        sqlx::query_as::<_, RegistrantEntity>(
            r#"
            UPDATE registrants
            SET status = $1
            WHERE id = $2
            RETURNING id, activity_id, name, school, phone, email, status,
                      check_in_code, attended_at, created_at
            "#,
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Mark a registrant attended by ID, first caller wins.
    ///
    /// The conditional update only fires while attended_at is NULL, so a
    /// racing duplicate call observes the already-set value unchanged.
    pub async fn mark_attended(&self, id: Uuid) -> Result<MarkAttendedOutcome, sqlx::Error> {
        let timer = QueryTimer::new("mark_registrant_attended");
        let updated = sqlx::query_as::<_, RegistrantEntity>(
            r#"
            UPDATE registrants
            SET attended_at = NOW()
            WHERE id = $1 AND attended_at IS NULL
            RETURNING id, activity_id, name, school, phone, email, status,
                      check_in_code, attended_at, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        if let Some(entity) = updated {
            return Ok(MarkAttendedOutcome::Marked(entity));
        }
        match self.find_by_id(id).await? {
            Some(entity) => Ok(MarkAttendedOutcome::AlreadyAttended(entity)),
            None => Ok(MarkAttendedOutcome::NotFound),
        }
    }

    /// Mark a registrant attended by check-in code, first caller wins.
    pub async fn mark_attended_by_code(
        &self,
        code: &str,
    ) -> Result<MarkAttendedOutcome, sqlx::Error> {
        let timer = QueryTimer::new("mark_registrant_attended_by_code");
        let updated = sqlx::query_as::<_, RegistrantEntity>(
            r#"
            UPDATE registrants
            SET attended_at = NOW()
            WHERE check_in_code = $1 AND attended_at IS NULL
            RETURNING id, activity_id, name, school, phone, email, status,
                      check_in_code, attended_at, created_at
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        if let Some(entity) = updated {
            return Ok(MarkAttendedOutcome::Marked(entity));
        }
        match self.find_by_code(code).await? {
            Some(entity) => Ok(MarkAttendedOutcome::AlreadyAttended(entity)),
            None => Ok(MarkAttendedOutcome::NotFound),
        }
    }

    /// Return the registrant's check-in code, allocating one if it is still
    /// NULL. Registrants from before QR attendance have no code; this
    /// backfills them on first access and is idempotent after that.
    pub async fn ensure_check_in_code(&self, id: Uuid) -> Result<Option<String>, sqlx::Error> {
        let Some(registrant) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        if let Some(code) = registrant.check_in_code {
            return Ok(Some(code));
        }

        loop {
            let code = generate_check_in_code();
            let result = sqlx::query(
                r#"
                UPDATE registrants
                SET check_in_code = $1
                WHERE id = $2 AND check_in_code IS NULL
                "#,
            )
            .bind(&code)
            .bind(id)
            .execute(&self.pool)
            .await;

            match result {
                Ok(done) if done.rows_affected() > 0 => return Ok(Some(code)),
                Ok(_) => {
                    // A concurrent caller backfilled first, return theirs.
                    let existing = self.find_by_id(id).await?;
                    return Ok(existing.and_then(|entity| entity.check_in_code));
                }
                Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                    continue;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    // Note: RegistrantRepository tests require database connection and are covered by integration tests
}
