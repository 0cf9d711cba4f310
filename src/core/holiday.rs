use chrono::{Datelike, NaiveDate};
use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::model::holiday::{Holiday, HolidayType};

pub async fn is_holiday(pool: &SqlitePool, date: NaiveDate) -> Result<bool, ApiError> {
    let hit = sqlx::query_scalar::<_, i64>("SELECT 1 FROM holidays WHERE date = ? LIMIT 1")
        .bind(date)
        .fetch_optional(pool)
        .await?;
    Ok(hit.is_some())
}

/// At most one holiday per date; the UNIQUE index decides ties.
pub async fn add_holiday(
    pool: &SqlitePool,
    name: &str,
    date: NaiveDate,
    kind: HolidayType,
    created_by: i64,
) -> Result<Holiday, ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::validation("Name and date are required"));
    }

    let result = sqlx::query(
        "INSERT INTO holidays (name, date, year, type, created_by) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(name.trim())
    .bind(date)
    .bind(date.year())
    .bind(kind)
    .bind(created_by)
    .execute(pool)
    .await;

    let id = match result {
        Ok(done) => done.last_insert_rowid(),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(ApiError::conflict("Holiday already exists for this date"));
        }
        Err(e) => return Err(e.into()),
    };

    let holiday = sqlx::query_as::<_, Holiday>("SELECT * FROM holidays WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(holiday)
}

pub async fn list(pool: &SqlitePool, year: Option<i32>) -> Result<Vec<Holiday>, ApiError> {
    let holidays = match year {
        Some(year) => {
            sqlx::query_as::<_, Holiday>(
                "SELECT * FROM holidays WHERE year = ? ORDER BY date ASC",
            )
            .bind(year)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Holiday>("SELECT * FROM holidays ORDER BY date ASC")
                .fetch_all(pool)
                .await?
        }
    };

    Ok(holidays)
}

/// Holidays on or after `from`, ascending. Re-queried each call.
pub async fn list_upcoming(
    pool: &SqlitePool,
    from: NaiveDate,
) -> Result<Vec<Holiday>, ApiError> {
    let holidays = sqlx::query_as::<_, Holiday>(
        "SELECT * FROM holidays WHERE date >= ? ORDER BY date ASC",
    )
    .bind(from)
    .fetch_all(pool)
    .await?;

    Ok(holidays)
}

/// True when any holiday falls within `[from, to]` inclusive.
pub async fn any_in_range(
    pool: &SqlitePool,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<bool, ApiError> {
    let hit = sqlx::query_scalar::<_, i64>(
        "SELECT 1 FROM holidays WHERE date >= ? AND date <= ? LIMIT 1",
    )
    .bind(from)
    .bind(to)
    .fetch_optional(pool)
    .await?;
    Ok(hit.is_some())
}
