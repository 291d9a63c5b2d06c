//! Query timing instrumentation for repositories.
//!
//! Repositories wrap each statement in a [`QueryTimer`] named after the
//! operation; the elapsed time lands in the `database_query_duration_seconds`
//! histogram with a `query` label, which is what the Grafana latency panels
//! group by.

use metrics::histogram;
use std::time::Instant;

/// Times one database operation and reports it under a fixed name.
///
/// ```ignore
/// let timer = QueryTimer::new("find_registrant_by_code");
/// let row = sqlx::query_as::<_, RegistrantEntity>(SQL).fetch_optional(pool).await;
/// timer.record();
/// ```
///
/// Dropping the timer without calling [`record`](QueryTimer::record) discards
/// the sample, so early returns on error skip reporting rather than reporting
/// a misleading duration.
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }

    /// Report the elapsed time since construction.
    pub fn record(self) {
        histogram!(
            "database_query_duration_seconds",
            "query" => self.query_name
        )
        .record(self.start.elapsed().as_secs_f64());
    }
}
