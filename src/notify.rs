use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::time::Duration;
use tracing::{error, info};

/// Leave-decision notifications. The engine only records that a notification
/// is owed; delivery belongs to an external mail service and must never
/// affect the committed decision. Rows are written in the same transaction
/// as the decision (outbox) and drained by `run_dispatcher`.

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, sqlx::Type)]
pub enum NotificationKind {
    LeaveApproved,
    LeaveRejected,
}

#[derive(Debug, Clone)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    pub recipient_id: i64,
    pub recipient_email: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Notification {
    pub id: i64,
    pub kind: NotificationKind,
    pub recipient_id: i64,
    pub recipient_email: String,
    pub subject: String,
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

/// Writes the event into the outbox. Called with the deciding transaction so
/// the event commits or rolls back together with the state change.
pub async fn enqueue<'e, E>(executor: E, event: &NotificationEvent) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO notifications (kind, recipient_id, recipient_email, subject, body)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(event.kind)
    .bind(event.recipient_id)
    .bind(&event.recipient_email)
    .bind(&event.subject)
    .bind(&event.body)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn pending(pool: &SqlitePool) -> Result<Vec<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(
        "SELECT * FROM notifications WHERE delivered_at IS NULL ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await
}

/// Delivers one batch of pending notifications. The transport here is the
/// log; a real deployment swaps in SMTP behind the same drain.
pub async fn drain_once(pool: &SqlitePool) -> anyhow::Result<usize> {
    let batch = pending(pool).await?;
    let count = batch.len();

    for notification in batch {
        info!(
            id = notification.id,
            kind = ?notification.kind,
            to = %notification.recipient_email,
            subject = %notification.subject,
            "delivering notification"
        );

        sqlx::query("UPDATE notifications SET delivered_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(notification.id)
            .execute(pool)
            .await?;
    }

    Ok(count)
}

/// Background dispatcher loop. Delivery failures are logged and swallowed;
/// the rows stay pending and the next tick retries them.
pub async fn run_dispatcher(pool: SqlitePool, poll_interval: Duration) {
    loop {
        if let Err(e) = drain_once(&pool).await {
            error!(error = %e, "notification dispatch failed");
        }
        actix_web::rt::time::sleep(poll_interval).await;
    }
}
