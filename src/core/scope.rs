use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::model::role::Role;

/// Set of subject ids an actor may read records for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Unrestricted (SuperAdmin, system-wide views only).
    All,
    Ids(Vec<i64>),
}

impl Scope {
    pub fn contains(&self, user_id: i64) -> bool {
        match self {
            Scope::All => true,
            Scope::Ids(ids) => ids.contains(&user_id),
        }
    }
}

/// Computes the visibility scope for an actor. Recomputed on every request;
/// the hierarchy can change between calls, so nothing here is cached.
///
/// `active_only` excludes deactivated subordinates (attendance listings do,
/// leave listings keep them so pending history stays reachable).
pub async fn resolve(
    pool: &SqlitePool,
    actor_id: i64,
    role: Role,
    active_only: bool,
) -> Result<Scope, ApiError> {
    let scope = match role {
        Role::SuperAdmin => Scope::All,
        Role::Employee => Scope::Ids(vec![actor_id]),
        Role::Manager => {
            let mut sql =
                String::from("SELECT id FROM users WHERE superior_id = ? AND role = 'Employee'");
            if active_only {
                sql.push_str(" AND is_active = 1");
            }
            let mut ids = sqlx::query_scalar::<_, i64>(&sql)
                .bind(actor_id)
                .fetch_all(pool)
                .await?;
            ids.push(actor_id);
            Scope::Ids(ids)
        }
        // HR's team view is one level down only: their Managers, not the
        // Managers' Employees.
        Role::Hr => {
            let ids = sqlx::query_scalar::<_, i64>(
                "SELECT id FROM users WHERE superior_id = ? AND role = 'Manager'",
            )
            .bind(actor_id)
            .fetch_all(pool)
            .await?;
            Scope::Ids(ids)
        }
    };

    Ok(scope)
}

#[cfg(test)]
mod tests {
    use super::Scope;

    #[test]
    fn scope_membership() {
        assert!(Scope::All.contains(42));
        assert!(Scope::Ids(vec![1, 2]).contains(2));
        assert!(!Scope::Ids(vec![1, 2]).contains(3));
        assert!(!Scope::Ids(Vec::new()).contains(1));
    }
}
