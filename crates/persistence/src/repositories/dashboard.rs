//! Dashboard metrics repository for database operations.

use chrono::{Duration, NaiveDate, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use domain::models::{
    chart_label, ActivityRegistrationCount, CatalogTotals, DailyRegistrationCount,
    DashboardMetrics, RegistrantTotals, REGISTRATION_TREND_DAYS,
};

/// Repository for dashboard metrics database operations.
#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get complete dashboard metrics for one year (normally the active one).
    ///
    /// With no year there is nothing to count; returns empty metrics.
    pub async fn get_metrics(&self, year_id: Option<Uuid>) -> Result<DashboardMetrics, sqlx::Error> {
        let Some(year_id) = year_id else {
            return Ok(DashboardMetrics::new());
        };

        let today = Utc::now().date_naive();
        let start = today - Duration::days(REGISTRATION_TREND_DAYS);

        // Run all queries in parallel for performance
        let (registrants, catalog, per_activity, daily_rows) = tokio::try_join!(
            self.get_registrant_totals(year_id),
            self.get_catalog_totals(year_id),
            self.get_per_activity_counts(year_id),
            self.get_daily_counts(year_id, start),
        )?;

        Ok(DashboardMetrics {
            registrants,
            catalog,
            per_activity,
            daily_registrations: fill_daily_series(start, REGISTRATION_TREND_DAYS, &daily_rows),
            generated_at: Utc::now(),
        })
    }

    /// Registrant totals across the year's activities.
    async fn get_registrant_totals(&self, year_id: Uuid) -> Result<RegistrantTotals, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) as total,
                COUNT(*) FILTER (WHERE r.status = 'verified') as verified,
                COUNT(*) FILTER (WHERE r.attended_at IS NOT NULL) as attended
            FROM registrants r
            JOIN activities a ON a.id = r.activity_id
            WHERE a.year_id = $1
            "#,
        )
        .bind(year_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(RegistrantTotals {
            total: row.get::<i64, _>("total"),
            verified: row.get::<i64, _>("verified"),
            attended: row.get::<i64, _>("attended"),
        })
    }

    /// Year and activity counts.
    async fn get_catalog_totals(&self, year_id: Uuid) -> Result<CatalogTotals, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM years) as years,
                (SELECT COUNT(*) FROM activities WHERE year_id = $1) as activities
            "#,
        )
        .bind(year_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(CatalogTotals {
            years: row.get::<i64, _>("years"),
            activities: row.get::<i64, _>("activities"),
        })
    }

    /// Per-activity registration counts for the bar chart, in the same order
    /// the public catalog lists activities.
    async fn get_per_activity_counts(
        &self,
        year_id: Uuid,
    ) -> Result<Vec<ActivityRegistrationCount>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT a.id as activity_id, a.title, COUNT(r.id) as count
            FROM activities a
            LEFT JOIN registrants r ON r.activity_id = a.id
            WHERE a.year_id = $1
            GROUP BY a.id, a.title, a.date, a.created_at
            ORDER BY a.date ASC NULLS LAST, a.created_at DESC
            "#,
        )
        .bind(year_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ActivityRegistrationCount {
                activity_id: row.get("activity_id"),
                label: chart_label(row.get::<String, _>("title").as_str()),
                count: row.get::<i64, _>("count"),
            })
            .collect())
    }

    /// Raw per-day registration counts since `start`. Days without
    /// registrations are absent here and filled in by [`fill_daily_series`].
    async fn get_daily_counts(
        &self,
        year_id: Uuid,
        start: NaiveDate,
    ) -> Result<Vec<(NaiveDate, i64)>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT (r.created_at AT TIME ZONE 'UTC')::date as day, COUNT(*) as count
            FROM registrants r
            JOIN activities a ON a.id = r.activity_id
            WHERE a.year_id = $1
              AND (r.created_at AT TIME ZONE 'UTC')::date >= $2
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(year_id)
        .bind(start)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.get::<NaiveDate, _>("day"), row.get::<i64, _>("count")))
            .collect())
    }
}

/// Expand sparse per-day counts into a dense series of `days + 1` points,
/// from `start` through `start + days` inclusive, zero-filling quiet days.
fn fill_daily_series(
    start: NaiveDate,
    days: i64,
    rows: &[(NaiveDate, i64)],
) -> Vec<DailyRegistrationCount> {
    (0..=days)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let count = rows
                .iter()
                .find(|(day, _)| *day == date)
                .map(|(_, count)| *count)
                .unwrap_or(0);
            DailyRegistrationCount { date, count }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fill_daily_series_zero_fills_gaps() {
        let start = date(2025, 8, 1);
        let rows = vec![(date(2025, 8, 2), 3), (date(2025, 8, 4), 1)];

        let series = fill_daily_series(start, 4, &rows);

        assert_eq!(series.len(), 5);
        assert_eq!(series[0].count, 0);
        assert_eq!(series[1].count, 3);
        assert_eq!(series[2].count, 0);
        assert_eq!(series[3].count, 1);
        assert_eq!(series[4].count, 0);
    }

    #[test]
    fn test_fill_daily_series_includes_both_endpoints() {
        let start = date(2025, 8, 1);
        let series = fill_daily_series(start, REGISTRATION_TREND_DAYS, &[]);

        assert_eq!(series.len(), (REGISTRATION_TREND_DAYS + 1) as usize);
        assert_eq!(series[0].date, start);
        assert_eq!(
            series.last().unwrap().date,
            start + Duration::days(REGISTRATION_TREND_DAYS)
        );
    }

    #[test]
    fn test_fill_daily_series_empty_rows() {
        let series = fill_daily_series(date(2025, 1, 1), 2, &[]);
        assert!(series.iter().all(|point| point.count == 0));
    }
}
