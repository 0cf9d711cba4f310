mod common;

use common::{seed_team, seed_user, test_pool};

use staffsync::core::hierarchy;
use staffsync::core::scope::Scope;
use staffsync::error::ApiError;
use staffsync::model::role::Role;

#[actix_web::test]
async fn superior_chain_walks_one_level_up() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    assert_eq!(
        hierarchy::direct_superior_of(&pool, team.employee).await.unwrap(),
        Some(team.manager)
    );
    assert_eq!(
        hierarchy::direct_superior_of(&pool, team.manager).await.unwrap(),
        Some(team.hr)
    );
    assert_eq!(
        hierarchy::direct_superior_of(&pool, team.hr).await.unwrap(),
        Some(team.super_admin)
    );
    assert_eq!(
        hierarchy::direct_superior_of(&pool, team.super_admin).await.unwrap(),
        None
    );

    let err = hierarchy::direct_superior_of(&pool, 9999).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[actix_web::test]
async fn superior_role_is_validated_at_write_time() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;

    // well-formed pointers
    hierarchy::check_superior(&pool, Role::Employee, Some(team.manager))
        .await
        .unwrap();
    hierarchy::check_superior(&pool, Role::Manager, Some(team.hr))
        .await
        .unwrap();
    hierarchy::check_superior(&pool, Role::SuperAdmin, None)
        .await
        .unwrap();

    // an Employee pointing at HR would recreate the stray-FK inconsistency
    let err = hierarchy::check_superior(&pool, Role::Employee, Some(team.hr))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let err = hierarchy::check_superior(&pool, Role::Manager, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let err = hierarchy::check_superior(&pool, Role::SuperAdmin, Some(team.hr))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[actix_web::test]
async fn scope_fetch_returns_members_in_one_pass() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;
    let second = seed_user(&pool, "nora", Role::Employee, Some(team.manager), 0).await;

    let users =
        hierarchy::fetch_users_in_scope(&pool, &Scope::Ids(vec![team.employee, second]))
            .await
            .unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].id, team.employee);
    assert_eq!(users[1].id, second);

    let everyone = hierarchy::fetch_users_in_scope(&pool, &Scope::All)
        .await
        .unwrap();
    assert_eq!(everyone.len(), 5);

    let none = hierarchy::fetch_users_in_scope(&pool, &Scope::Ids(Vec::new()))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[actix_web::test]
async fn second_manager_reports_to_the_same_hr() {
    let pool = test_pool().await;
    let team = seed_team(&pool).await;
    let second = seed_user(&pool, "nora", Role::Manager, Some(team.hr), 0).await;

    assert_eq!(
        hierarchy::direct_superior_of(&pool, second).await.unwrap(),
        Some(team.hr)
    );
}
