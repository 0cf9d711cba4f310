#![allow(dead_code)]

use chrono::NaiveDate;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use staffsync::db::migrate;
use staffsync::model::role::Role;

/// In-memory database. A single connection so every task in a test shares
/// the same database; contention then plays out on the SQL constraints, which
/// is exactly what the concurrency tests exercise.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    migrate(&pool).await.expect("migrations");
    pool
}

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date literal")
}

pub async fn seed_user(
    pool: &SqlitePool,
    name: &str,
    role: Role,
    superior_id: Option<i64>,
    leave_balance: i64,
) -> i64 {
    sqlx::query(
        r#"
        INSERT INTO users (user_name, email, password, role, leave_balance, superior_id)
        VALUES (?, ?, 'x', ?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(format!("{name}@test.local"))
    .bind(role)
    .bind(leave_balance)
    .bind(superior_id)
    .execute(pool)
    .await
    .expect("seed user")
    .last_insert_rowid()
}

/// Full chain: SuperAdmin -> HR -> Manager -> Employee.
pub struct Team {
    pub super_admin: i64,
    pub hr: i64,
    pub manager: i64,
    pub employee: i64,
}

pub async fn seed_team(pool: &SqlitePool) -> Team {
    let super_admin = seed_user(pool, "root", Role::SuperAdmin, None, 0).await;
    let hr = seed_user(pool, "hanna", Role::Hr, Some(super_admin), 12).await;
    let manager = seed_user(pool, "mira", Role::Manager, Some(hr), 12).await;
    let employee = seed_user(pool, "emil", Role::Employee, Some(manager), 12).await;
    Team {
        super_admin,
        hr,
        manager,
        employee,
    }
}

pub async fn leave_balance(pool: &SqlitePool, user_id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT leave_balance FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("leave balance")
}

pub async fn is_on_leave(pool: &SqlitePool, user_id: i64) -> bool {
    sqlx::query_scalar::<_, bool>("SELECT is_on_leave FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("on leave flag")
}
