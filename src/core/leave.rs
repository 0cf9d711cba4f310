use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::core::hierarchy;
use crate::core::holiday;
use crate::core::scope::Scope;
use crate::error::ApiError;
use crate::model::leave::{LeaveRequest, LeaveStatus, LeaveType};
use crate::notify::{self, NotificationEvent, NotificationKind};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LeaveDecision {
    Approve,
    Reject,
}

const DEFAULT_REJECT_REMARKS: &str = "Your leave request was not approved";

async fn fetch(pool: &SqlitePool, leave_id: i64) -> Result<Option<LeaveRequest>, ApiError> {
    let leave = sqlx::query_as::<_, LeaveRequest>("SELECT * FROM leave_requests WHERE id = ?")
        .bind(leave_id)
        .fetch_optional(pool)
        .await?;
    Ok(leave)
}

/// Creates a PENDING request. Ranges touching a holiday are rejected up
/// front: public holidays are absorbed automatically, so the requester must
/// not spend leave on them.
pub async fn apply(
    pool: &SqlitePool,
    user_id: i64,
    reason: &str,
    from_date: NaiveDate,
    to_date: NaiveDate,
    leave_type: LeaveType,
) -> Result<LeaveRequest, ApiError> {
    if reason.trim().is_empty() {
        return Err(ApiError::validation("Missing fields"));
    }
    if from_date > to_date {
        return Err(ApiError::validation("fromDate cannot be after toDate"));
    }

    if holiday::any_in_range(pool, from_date, to_date).await? {
        return Err(ApiError::validation(
            "Public holidays are ignored automatically",
        ));
    }

    let done = sqlx::query(
        r#"
        INSERT INTO leave_requests (user_id, reason, from_date, to_date, leave_type, status)
        VALUES (?, ?, ?, ?, ?, 'PENDING')
        "#,
    )
    .bind(user_id)
    .bind(reason.trim())
    .bind(from_date)
    .bind(to_date)
    .bind(leave_type)
    .execute(pool)
    .await?;

    let leave = fetch(pool, done.last_insert_rowid())
        .await?
        .ok_or_else(|| ApiError::Internal("leave row missing after insert".into()))?;

    tracing::info!(user_id, leave_id = leave.id, "leave applied");
    Ok(leave)
}

/// Requester-only cancellation, permitted while PENDING. Cancellation is a
/// terminal status, not a delete; history stays intact.
pub async fn cancel(
    pool: &SqlitePool,
    leave_id: i64,
    requester_id: i64,
) -> Result<LeaveRequest, ApiError> {
    let leave = sqlx::query_as::<_, LeaveRequest>(
        "SELECT * FROM leave_requests WHERE id = ? AND user_id = ?",
    )
    .bind(leave_id)
    .bind(requester_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Leave not found"))?;

    if leave.is_terminal() {
        return Err(ApiError::invalid_state(
            "Only pending leaves can be cancelled",
        ));
    }

    let done = sqlx::query(
        "UPDATE leave_requests SET status = 'CANCELLED' WHERE id = ? AND status = 'PENDING'",
    )
    .bind(leave_id)
    .execute(pool)
    .await?;

    if done.rows_affected() == 0 {
        return Err(ApiError::invalid_state(
            "Only pending leaves can be cancelled",
        ));
    }

    let leave = fetch(pool, leave_id)
        .await?
        .ok_or_else(|| ApiError::Internal("leave row missing after update".into()))?;

    tracing::info!(leave_id, requester_id, "leave cancelled");
    Ok(leave)
}

/// Approves or rejects a PENDING request. Only the requester's direct
/// superior may decide. The status flip is a conditional update guarded on
/// PENDING, and the approval side effects (balance decrement, on-leave flag)
/// plus the outbox event commit in the same transaction, so two concurrent
/// decisions cannot both land and the balance is decremented exactly once.
pub async fn decide(
    pool: &SqlitePool,
    leave_id: i64,
    decider_id: i64,
    decision: LeaveDecision,
    remarks: Option<String>,
) -> Result<LeaveRequest, ApiError> {
    let leave = fetch(pool, leave_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Leave not found"))?;

    if hierarchy::direct_superior_of(pool, leave.user_id).await? != Some(decider_id) {
        return Err(ApiError::forbidden(
            "Only the direct superior can decide this leave",
        ));
    }

    let requester = hierarchy::fetch_user(pool, leave.user_id).await?;

    let (status, remarks) = match decision {
        LeaveDecision::Approve => (LeaveStatus::Approved, None),
        LeaveDecision::Reject => (
            LeaveStatus::Rejected,
            Some(remarks.unwrap_or_else(|| DEFAULT_REJECT_REMARKS.to_string())),
        ),
    };

    let mut tx = pool.begin().await?;

    let done = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = ?, approved_by = ?, remarks = ?
        WHERE id = ? AND status = 'PENDING'
        "#,
    )
    .bind(status)
    .bind(decider_id)
    .bind(&remarks)
    .bind(leave_id)
    .execute(&mut *tx)
    .await?;

    if done.rows_affected() == 0 {
        // Already decided or cancelled; the transaction rolls back on drop.
        return Err(ApiError::invalid_state("Leave already processed"));
    }

    let event = match decision {
        LeaveDecision::Approve => {
            sqlx::query(
                "UPDATE users SET leave_balance = leave_balance - 1, is_on_leave = 1 WHERE id = ?",
            )
            .bind(requester.id)
            .execute(&mut *tx)
            .await?;

            NotificationEvent {
                kind: NotificationKind::LeaveApproved,
                recipient_id: requester.id,
                recipient_email: requester.email.clone(),
                subject: "Leave Approved".to_string(),
                body: format!(
                    "Your {:?} leave from {} to {} has been approved.",
                    leave.leave_type, leave.from_date, leave.to_date
                ),
            }
        }
        LeaveDecision::Reject => NotificationEvent {
            kind: NotificationKind::LeaveRejected,
            recipient_id: requester.id,
            recipient_email: requester.email.clone(),
            subject: "Leave Rejected".to_string(),
            body: remarks.clone().unwrap_or_default(),
        },
    };

    notify::enqueue(&mut *tx, &event).await?;

    tx.commit().await?;

    let leave = fetch(pool, leave_id)
        .await?
        .ok_or_else(|| ApiError::Internal("leave row missing after decision".into()))?;

    tracing::info!(leave_id, decider_id, ?decision, "leave decided");
    Ok(leave)
}

pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<LeaveRequest>, ApiError> {
    let leaves = sqlx::query_as::<_, LeaveRequest>(
        "SELECT * FROM leave_requests WHERE user_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(leaves)
}

/// Scoped team projection over the actor's visibility scope.
pub async fn list_team(pool: &SqlitePool, scope: &Scope) -> Result<Vec<LeaveRequest>, ApiError> {
    let leaves = match scope {
        Scope::All => {
            sqlx::query_as::<_, LeaveRequest>(
                "SELECT * FROM leave_requests ORDER BY created_at DESC, id DESC",
            )
            .fetch_all(pool)
            .await?
        }
        Scope::Ids(ids) => {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let placeholders = vec!["?"; ids.len()].join(", ");
            let sql = format!(
                "SELECT * FROM leave_requests WHERE user_id IN ({placeholders}) \
                 ORDER BY created_at DESC, id DESC"
            );
            let mut query = sqlx::query_as::<_, LeaveRequest>(&sql);
            for id in ids {
                query = query.bind(id);
            }
            query.fetch_all(pool).await?
        }
    };

    Ok(leaves)
}
