mod common;

use common::{d, seed_team, test_pool};
use futures::join;

use staffsync::core::{attendance, holiday};
use staffsync::error::ApiError;
use staffsync::model::attendance::AttendanceStatus;
use staffsync::model::holiday::HolidayType;

const PHOTO: &str = "https://cdn.test/checkin.jpg";

#[actix_web::test]
async fn start_opens_an_incomplete_day() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    let record = attendance::start(&pool, team.employee, d("2025-03-10"), PHOTO)
        .await
        .unwrap();

    assert_eq!(record.user_id, team.employee);
    assert_eq!(record.date, d("2025-03-10"));
    assert_eq!(record.status, AttendanceStatus::Incomplete);
    assert_eq!(record.start_photo, PHOTO);
    assert_eq!(record.total_hours, 0.0);
    assert!(record.end_time.is_none());
}

#[actix_web::test]
async fn start_requires_a_photo() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    let err = attendance::start(&pool, team.employee, d("2025-03-10"), "  ")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[actix_web::test]
async fn second_start_conflicts() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    attendance::start(&pool, team.employee, d("2025-03-10"), PHOTO)
        .await
        .unwrap();
    let err = attendance::start(&pool, team.employee, d("2025-03-10"), PHOTO)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[actix_web::test]
async fn concurrent_starts_yield_exactly_one_record() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    let (a, b) = join!(
        attendance::start(&pool, team.employee, d("2025-03-10"), PHOTO),
        attendance::start(&pool, team.employee, d("2025-03-10"), PHOTO),
    );

    assert_eq!(
        [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(),
        1,
        "exactly one start must win"
    );
    let loser = if a.is_err() { a } else { b };
    assert!(matches!(loser.unwrap_err(), ApiError::Conflict(_)));

    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM attendance WHERE user_id = ? AND date = ?",
    )
    .bind(team.employee)
    .bind(d("2025-03-10"))
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[actix_web::test]
async fn holiday_blocks_start_and_creates_nothing() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    holiday::add_holiday(
        &pool,
        "Republic Day",
        d("2025-01-26"),
        HolidayType::Public,
        team.hr,
    )
    .await
    .unwrap();

    let err = attendance::start(&pool, team.employee, d("2025-01-26"), PHOTO)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[actix_web::test]
async fn end_before_start_is_invalid() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    let err = attendance::end(&pool, team.employee, d("2025-03-10"), PHOTO, 8.0)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidState(_)));
}

#[actix_web::test]
async fn short_day_still_closes_as_incomplete() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    attendance::start(&pool, team.employee, d("2025-03-10"), PHOTO)
        .await
        .unwrap();
    let outcome = attendance::end(&pool, team.employee, d("2025-03-10"), PHOTO, 8.0)
        .await
        .unwrap();

    // a few milliseconds of "work" cannot meet an 8 hour threshold
    assert_eq!(outcome.record.status, AttendanceStatus::Incomplete);
    assert!(outcome.record.end_time.is_some());
    assert_eq!(outcome.record.end_photo.as_deref(), Some(PHOTO));
    let message = outcome.message.expect("shortfall message");
    assert!(message.starts_with("Work "), "got: {message}");
}

#[actix_web::test]
async fn met_threshold_marks_present() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    attendance::start(&pool, team.employee, d("2025-03-10"), PHOTO)
        .await
        .unwrap();
    // near-zero threshold deployments accept any closed day
    let outcome = attendance::end(&pool, team.employee, d("2025-03-10"), PHOTO, 0.0)
        .await
        .unwrap();

    assert_eq!(outcome.record.status, AttendanceStatus::Present);
    assert!(outcome.message.is_none());
}

#[actix_web::test]
async fn double_end_conflicts_and_leaves_the_record_alone() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    attendance::start(&pool, team.employee, d("2025-03-10"), PHOTO)
        .await
        .unwrap();
    let first = attendance::end(&pool, team.employee, d("2025-03-10"), PHOTO, 8.0)
        .await
        .unwrap();

    let err = attendance::end(&pool, team.employee, d("2025-03-10"), "other.jpg", 8.0)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));

    let records = attendance::list_for_user(&pool, team.employee).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].end_time, first.record.end_time);
    assert_eq!(records[0].total_hours, first.record.total_hours);
    assert_eq!(records[0].end_photo.as_deref(), Some(PHOTO));
}

#[actix_web::test]
async fn own_history_is_newest_first() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    attendance::start(&pool, team.employee, d("2025-03-10"), PHOTO)
        .await
        .unwrap();
    attendance::start(&pool, team.employee, d("2025-03-11"), PHOTO)
        .await
        .unwrap();

    let records = attendance::list_for_user(&pool, team.employee).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].date, d("2025-03-11"));
    assert_eq!(records[1].date, d("2025-03-10"));
}
