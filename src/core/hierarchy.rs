use sqlx::SqlitePool;

use crate::core::scope::Scope;
use crate::error::ApiError;
use crate::model::role::Role;
use crate::model::user::User;

/// Read-side lookups over the reporting chain. The hierarchy is a tree with
/// the SuperAdmin as root; each user carries a single parent pointer.

pub async fn fetch_user(pool: &SqlitePool, user_id: i64) -> Result<User, ApiError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// Direct superior of a user, if any (the SuperAdmin has none).
pub async fn direct_superior_of(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Option<i64>, ApiError> {
    let superior = sqlx::query_scalar::<_, Option<i64>>(
        "SELECT superior_id FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(superior)
}

/// All users inside a visibility scope, in one query.
pub async fn fetch_users_in_scope(
    pool: &SqlitePool,
    scope: &Scope,
) -> Result<Vec<User>, ApiError> {
    let users = match scope {
        Scope::All => {
            sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id ASC")
                .fetch_all(pool)
                .await?
        }
        Scope::Ids(ids) => {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let placeholders = vec!["?"; ids.len()].join(", ");
            let sql = format!("SELECT * FROM users WHERE id IN ({placeholders}) ORDER BY id ASC");
            let mut query = sqlx::query_as::<_, User>(&sql);
            for id in ids {
                query = query.bind(id);
            }
            query.fetch_all(pool).await?
        }
    };
    Ok(users)
}

/// Validates the parent pointer a new user would be created with: the
/// superior must exist and carry the expected parent role for `role`.
pub async fn check_superior(
    pool: &SqlitePool,
    role: Role,
    superior_id: Option<i64>,
) -> Result<(), ApiError> {
    match (role.expected_superior(), superior_id) {
        (None, None) => Ok(()),
        (None, Some(_)) => Err(ApiError::validation("A SuperAdmin has no superior")),
        (Some(_), None) => Err(ApiError::validation(format!(
            "A {role} must have a superior"
        ))),
        (Some(expected), Some(id)) => {
            let superior = fetch_user(pool, id).await?;
            if superior.role == expected {
                Ok(())
            } else {
                Err(ApiError::validation(format!(
                    "A {role} must report to a {expected}"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::role::Role;

    #[test]
    fn chain_is_closed() {
        assert_eq!(Role::Employee.expected_superior(), Some(Role::Manager));
        assert_eq!(Role::Manager.expected_superior(), Some(Role::Hr));
        assert_eq!(Role::Hr.expected_superior(), Some(Role::SuperAdmin));
        assert_eq!(Role::SuperAdmin.expected_superior(), None);
    }

    #[test]
    fn creation_goes_one_level_down() {
        assert_eq!(Role::SuperAdmin.creates(), Some(Role::Hr));
        assert_eq!(Role::Hr.creates(), Some(Role::Manager));
        assert_eq!(Role::Manager.creates(), Some(Role::Employee));
        assert_eq!(Role::Employee.creates(), None);
    }
}
