mod common;

use common::{d, is_on_leave, leave_balance, seed_team, test_pool};

use staffsync::core::holiday;
use staffsync::core::leave::{self, LeaveDecision};
use staffsync::error::ApiError;
use staffsync::model::holiday::HolidayType;
use staffsync::model::leave::{LeaveStatus, LeaveType};
use staffsync::notify::{self, NotificationKind};

#[actix_web::test]
async fn apply_creates_a_pending_request() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    let leave = leave::apply(
        &pool,
        team.employee,
        "Family function",
        d("2025-03-10"),
        d("2025-03-12"),
        LeaveType::Casual,
    )
    .await
    .unwrap();

    assert_eq!(leave.status, LeaveStatus::Pending);
    assert_eq!(leave.user_id, team.employee);
    assert_eq!(leave.leave_type, LeaveType::Casual);
    assert!(leave.approved_by.is_none());
}

#[actix_web::test]
async fn apply_validates_inputs() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    let err = leave::apply(
        &pool,
        team.employee,
        "   ",
        d("2025-03-10"),
        d("2025-03-12"),
        LeaveType::Sick,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let err = leave::apply(
        &pool,
        team.employee,
        "reason",
        d("2025-03-12"),
        d("2025-03-10"),
        LeaveType::Sick,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[actix_web::test]
async fn apply_rejects_holiday_overlap() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    holiday::add_holiday(&pool, "Founders Day", d("2025-03-11"), HolidayType::Company, team.hr)
        .await
        .unwrap();

    let err = leave::apply(
        &pool,
        team.employee,
        "trip",
        d("2025-03-10"),
        d("2025-03-12"),
        LeaveType::Earned,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    // a range ending just before the holiday goes through
    let leave = leave::apply(
        &pool,
        team.employee,
        "trip",
        d("2025-03-09"),
        d("2025-03-10"),
        LeaveType::Earned,
    )
    .await
    .unwrap();
    assert_eq!(leave.status, LeaveStatus::Pending);
}

#[actix_web::test]
async fn cancel_is_a_soft_terminal_state() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    let leave = leave::apply(
        &pool,
        team.employee,
        "errand",
        d("2025-04-01"),
        d("2025-04-01"),
        LeaveType::Casual,
    )
    .await
    .unwrap();

    let cancelled = leave::cancel(&pool, leave.id, team.employee).await.unwrap();
    assert_eq!(cancelled.status, LeaveStatus::Cancelled);

    // history preserved, not deleted
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM leave_requests")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    // terminal: cannot cancel or decide again
    let err = leave::cancel(&pool, leave.id, team.employee).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidState(_)));
    let err = leave::decide(&pool, leave.id, team.manager, LeaveDecision::Approve, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidState(_)));
}

#[actix_web::test]
async fn cancel_by_someone_else_is_not_found() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    let leave = leave::apply(
        &pool,
        team.employee,
        "errand",
        d("2025-04-01"),
        d("2025-04-01"),
        LeaveType::Casual,
    )
    .await
    .unwrap();

    let err = leave::cancel(&pool, leave.id, team.manager).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    let err = leave::cancel(&pool, 9999, team.employee).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[actix_web::test]
async fn approval_updates_requester_and_queues_notification() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    let leave = leave::apply(
        &pool,
        team.employee,
        "Family function",
        d("2025-03-10"),
        d("2025-03-12"),
        LeaveType::Casual,
    )
    .await
    .unwrap();

    let balance_before = leave_balance(&pool, team.employee).await;

    let decided = leave::decide(&pool, leave.id, team.manager, LeaveDecision::Approve, None)
        .await
        .unwrap();

    assert_eq!(decided.status, LeaveStatus::Approved);
    assert_eq!(decided.approved_by, Some(team.manager));
    assert_eq!(leave_balance(&pool, team.employee).await, balance_before - 1);
    assert!(is_on_leave(&pool, team.employee).await);

    let queued = notify::pending(&pool).await.unwrap();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].kind, NotificationKind::LeaveApproved);
    assert_eq!(queued[0].recipient_id, team.employee);
    assert_eq!(queued[0].recipient_email, "emil@test.local");
}

#[actix_web::test]
async fn second_decision_fails_without_double_decrement() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    let leave = leave::apply(
        &pool,
        team.employee,
        "reason",
        d("2025-03-10"),
        d("2025-03-10"),
        LeaveType::Sick,
    )
    .await
    .unwrap();

    leave::decide(&pool, leave.id, team.manager, LeaveDecision::Approve, None)
        .await
        .unwrap();
    let balance_after_first = leave_balance(&pool, team.employee).await;

    let err = leave::decide(&pool, leave.id, team.manager, LeaveDecision::Reject, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidState(_)));

    assert_eq!(leave_balance(&pool, team.employee).await, balance_after_first);
    // the failed decision must not enqueue anything either
    assert_eq!(notify::pending(&pool).await.unwrap().len(), 1);
}

#[actix_web::test]
async fn only_the_direct_superior_may_decide() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;
    let other_manager =
        common::seed_user(&pool, "nora", staffsync::model::role::Role::Manager, Some(team.hr), 0)
            .await;

    let leave = leave::apply(
        &pool,
        team.employee,
        "reason",
        d("2025-03-10"),
        d("2025-03-10"),
        LeaveType::Sick,
    )
    .await
    .unwrap();

    // another manager
    let err = leave::decide(&pool, leave.id, other_manager, LeaveDecision::Approve, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
    // HR is two levels up from an employee, not the direct superior
    let err = leave::decide(&pool, leave.id, team.hr, LeaveDecision::Approve, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    let balance = leave_balance(&pool, team.employee).await;
    assert_eq!(balance, 12);
    assert!(!is_on_leave(&pool, team.employee).await);
    let reloaded = leave::list_for_user(&pool, team.employee).await.unwrap();
    assert_eq!(reloaded[0].status, LeaveStatus::Pending);
}

#[actix_web::test]
async fn nobody_decides_for_the_root_admin() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    let leave = leave::apply(
        &pool,
        team.super_admin,
        "offsite",
        d("2025-06-02"),
        d("2025-06-03"),
        LeaveType::Earned,
    )
    .await
    .unwrap();

    // the root has no superior in the directory, so every decider is refused
    let err = leave::decide(&pool, leave.id, team.hr, LeaveDecision::Approve, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
    let err = leave::decide(&pool, leave.id, team.manager, LeaveDecision::Reject, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    let reloaded = leave::list_for_user(&pool, team.super_admin).await.unwrap();
    assert_eq!(reloaded[0].status, LeaveStatus::Pending);
}

#[actix_web::test]
async fn hr_decides_for_managers() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    let leave = leave::apply(
        &pool,
        team.manager,
        "conference",
        d("2025-05-05"),
        d("2025-05-06"),
        LeaveType::Earned,
    )
    .await
    .unwrap();

    let decided = leave::decide(&pool, leave.id, team.hr, LeaveDecision::Approve, None)
        .await
        .unwrap();
    assert_eq!(decided.status, LeaveStatus::Approved);
    assert!(is_on_leave(&pool, team.manager).await);
}

#[actix_web::test]
async fn rejection_stores_remarks_and_notifies() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    let leave = leave::apply(
        &pool,
        team.employee,
        "reason",
        d("2025-03-10"),
        d("2025-03-10"),
        LeaveType::Casual,
    )
    .await
    .unwrap();

    let decided = leave::decide(
        &pool,
        leave.id,
        team.manager,
        LeaveDecision::Reject,
        Some("Short staffed that week".into()),
    )
    .await
    .unwrap();

    assert_eq!(decided.status, LeaveStatus::Rejected);
    assert_eq!(decided.remarks.as_deref(), Some("Short staffed that week"));
    // rejection does not touch balance or flag
    assert_eq!(leave_balance(&pool, team.employee).await, 12);
    assert!(!is_on_leave(&pool, team.employee).await);

    let queued = notify::pending(&pool).await.unwrap();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].kind, NotificationKind::LeaveRejected);
    assert_eq!(queued[0].body, "Short staffed that week");
}

#[actix_web::test]
async fn rejection_without_remarks_gets_a_default() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    let leave = leave::apply(
        &pool,
        team.employee,
        "reason",
        d("2025-03-10"),
        d("2025-03-10"),
        LeaveType::Casual,
    )
    .await
    .unwrap();

    let decided = leave::decide(&pool, leave.id, team.manager, LeaveDecision::Reject, None)
        .await
        .unwrap();
    assert!(decided.remarks.is_some());
}

#[actix_web::test]
async fn dispatcher_drains_the_outbox() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    let leave = leave::apply(
        &pool,
        team.employee,
        "reason",
        d("2025-03-10"),
        d("2025-03-10"),
        LeaveType::Casual,
    )
    .await
    .unwrap();
    leave::decide(&pool, leave.id, team.manager, LeaveDecision::Approve, None)
        .await
        .unwrap();

    let delivered = notify::drain_once(&pool).await.unwrap();
    assert_eq!(delivered, 1);
    assert!(notify::pending(&pool).await.unwrap().is_empty());

    // idempotent when nothing is queued
    assert_eq!(notify::drain_once(&pool).await.unwrap(), 0);
}
