use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Schema, one statement per entry. The UNIQUE(user_id, date) index on
/// attendance and the UNIQUE date on holidays are load-bearing: they are the
/// mutual-exclusion gates for concurrent starts and duplicate holidays.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        user_name     TEXT    NOT NULL UNIQUE,
        email         TEXT    NOT NULL UNIQUE,
        password      TEXT    NOT NULL,
        role          TEXT    NOT NULL,
        department    TEXT,
        phone_number  TEXT,
        is_active     BOOLEAN NOT NULL DEFAULT 1,
        is_on_leave   BOOLEAN NOT NULL DEFAULT 0,
        leave_balance INTEGER NOT NULL DEFAULT 0,
        superior_id   INTEGER REFERENCES users(id),
        created_at    TEXT    NOT NULL DEFAULT (datetime('now'))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS attendance (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id     INTEGER NOT NULL REFERENCES users(id),
        date        TEXT    NOT NULL,
        start_time  TEXT    NOT NULL,
        end_time    TEXT,
        total_hours REAL    NOT NULL DEFAULT 0,
        status      TEXT    NOT NULL DEFAULT 'Incomplete',
        start_photo TEXT    NOT NULL,
        end_photo   TEXT,
        UNIQUE (user_id, date)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS leave_requests (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id     INTEGER NOT NULL REFERENCES users(id),
        reason      TEXT    NOT NULL,
        from_date   TEXT    NOT NULL,
        to_date     TEXT    NOT NULL,
        leave_type  TEXT    NOT NULL DEFAULT 'CASUAL',
        status      TEXT    NOT NULL DEFAULT 'PENDING',
        approved_by INTEGER REFERENCES users(id),
        remarks     TEXT,
        created_at  TEXT    NOT NULL DEFAULT (datetime('now'))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS holidays (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        name       TEXT    NOT NULL,
        date       TEXT    NOT NULL UNIQUE,
        year       INTEGER NOT NULL,
        type       TEXT    NOT NULL DEFAULT 'PUBLIC',
        created_by INTEGER NOT NULL REFERENCES users(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS notifications (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        kind            TEXT    NOT NULL,
        recipient_id    INTEGER NOT NULL REFERENCES users(id),
        recipient_email TEXT    NOT NULL,
        subject         TEXT    NOT NULL,
        body            TEXT    NOT NULL,
        created_at      TEXT    NOT NULL DEFAULT (datetime('now')),
        delivered_at    TEXT
    )
    "#,
];

pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for stmt in SCHEMA {
        sqlx::query(stmt).execute(pool).await?;
    }
    Ok(())
}

pub async fn init_db(database_url: &str) -> SqlitePool {
    let options = SqliteConnectOptions::from_str(database_url)
        .expect("Invalid DATABASE_URL")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .expect("Failed to connect to database");

    migrate(&pool).await.expect("Failed to run migrations");

    pool
}
