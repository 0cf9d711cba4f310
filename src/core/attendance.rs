use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::core::holiday;
use crate::core::scope::Scope;
use crate::error::ApiError;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};

/// Outcome of closing an attendance day. `message` is set when the worked
/// hours fell short of the configured threshold.
#[derive(Debug)]
pub struct EndOutcome {
    pub record: AttendanceRecord,
    pub message: Option<String>,
}

fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

fn classify(total_hours: f64, required_hours: f64) -> AttendanceStatus {
    if total_hours >= required_hours {
        AttendanceStatus::Present
    } else {
        AttendanceStatus::Incomplete
    }
}

async fn fetch(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
) -> Result<Option<AttendanceRecord>, ApiError> {
    let record = sqlx::query_as::<_, AttendanceRecord>(
        "SELECT * FROM attendance WHERE user_id = ? AND date = ?",
    )
    .bind(user_id)
    .bind(date)
    .fetch_optional(pool)
    .await?;
    Ok(record)
}

/// Opens the attendance day. The UNIQUE(user_id, date) index is the
/// mutual-exclusion gate: of two concurrent starts exactly one row lands,
/// the loser observes the unique violation and gets Conflict.
pub async fn start(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
    photo_url: &str,
) -> Result<AttendanceRecord, ApiError> {
    if photo_url.trim().is_empty() {
        return Err(ApiError::validation("Start photo required"));
    }

    if holiday::is_holiday(pool, date).await? {
        return Err(ApiError::forbidden(
            "This is a public holiday. Attendance not allowed.",
        ));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO attendance (user_id, date, start_time, status, start_photo)
        VALUES (?, ?, ?, 'Incomplete', ?)
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(Utc::now())
    .bind(photo_url)
    .execute(pool)
    .await;

    match result {
        Ok(_) => {}
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(ApiError::conflict("Attendance already started"));
        }
        Err(e) => return Err(e.into()),
    }

    let record = fetch(pool, user_id, date)
        .await?
        .ok_or_else(|| ApiError::Internal("attendance row missing after insert".into()))?;

    tracing::info!(user_id, %date, "attendance started");
    Ok(record)
}

/// Closes the attendance day. The record is written exactly once more and is
/// never reopened: the UPDATE is guarded on `end_time IS NULL`, so a second
/// checkout loses the race and gets Conflict. A short day is still closed,
/// kept as Incomplete rather than rejected, so the record stays auditable.
pub async fn end(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
    photo_url: &str,
    required_hours: f64,
) -> Result<EndOutcome, ApiError> {
    if photo_url.trim().is_empty() {
        return Err(ApiError::validation("End photo required"));
    }

    let record = fetch(pool, user_id, date)
        .await?
        .ok_or_else(|| ApiError::invalid_state("Attendance not started"))?;

    if record.is_closed() {
        return Err(ApiError::conflict("Attendance already ended"));
    }

    let now = Utc::now();
    let total_hours = round_hours((now - record.start_time).num_seconds() as f64 / 3600.0);
    let status = classify(total_hours, required_hours);

    let done = sqlx::query(
        r#"
        UPDATE attendance
        SET end_time = ?, end_photo = ?, total_hours = ?, status = ?
        WHERE user_id = ? AND date = ? AND end_time IS NULL
        "#,
    )
    .bind(now)
    .bind(photo_url)
    .bind(total_hours)
    .bind(status)
    .bind(user_id)
    .bind(date)
    .execute(pool)
    .await?;

    if done.rows_affected() == 0 {
        // Lost the race to a concurrent checkout.
        return Err(ApiError::conflict("Attendance already ended"));
    }

    let record = fetch(pool, user_id, date)
        .await?
        .ok_or_else(|| ApiError::Internal("attendance row missing after update".into()))?;

    let message = if status == AttendanceStatus::Present {
        None
    } else {
        Some(format!(
            "Work {:.2} more hours",
            required_hours - total_hours
        ))
    };

    tracing::info!(user_id, %date, total_hours, ?status, "attendance ended");
    Ok(EndOutcome { record, message })
}

pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<AttendanceRecord>, ApiError> {
    let records = sqlx::query_as::<_, AttendanceRecord>(
        "SELECT * FROM attendance WHERE user_id = ? ORDER BY date DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(records)
}

/// Filters for the scoped team projection. `date` pins a single day;
/// `from`/`to` bound an inclusive range for report-style listings.
#[derive(Debug, Default)]
pub struct AttendanceFilter {
    pub date: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub subject_id: Option<i64>,
}

/// Scoped team projection. A subject filter outside the actor's scope yields
/// an empty list rather than an error; existence is not leaked.
pub async fn list_team(
    pool: &SqlitePool,
    scope: &Scope,
    filter: &AttendanceFilter,
) -> Result<Vec<AttendanceRecord>, ApiError> {
    if let Some(subject) = filter.subject_id {
        if !scope.contains(subject) {
            return Ok(Vec::new());
        }
    }

    let mut sql = String::from("SELECT * FROM attendance WHERE 1=1");
    match (filter.subject_id, scope) {
        (Some(_), _) => sql.push_str(" AND user_id = ?"),
        (None, Scope::All) => {}
        (None, Scope::Ids(ids)) => {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let placeholders = vec!["?"; ids.len()].join(", ");
            sql.push_str(&format!(" AND user_id IN ({placeholders})"));
        }
    }
    if filter.date.is_some() {
        sql.push_str(" AND date = ?");
    }
    if filter.from.is_some() {
        sql.push_str(" AND date >= ?");
    }
    if filter.to.is_some() {
        sql.push_str(" AND date <= ?");
    }
    sql.push_str(" ORDER BY date DESC");

    let mut query = sqlx::query_as::<_, AttendanceRecord>(&sql);
    match (filter.subject_id, scope) {
        (Some(subject), _) => query = query.bind(subject),
        (None, Scope::All) => {}
        (None, Scope::Ids(ids)) => {
            for id in ids {
                query = query.bind(id);
            }
        }
    }
    if let Some(date) = filter.date {
        query = query.bind(date);
    }
    if let Some(from) = filter.from {
        query = query.bind(from);
    }
    if let Some(to) = filter.to {
        query = query.bind(to);
    }

    let records = query.fetch_all(pool).await?;
    Ok(records)
}
