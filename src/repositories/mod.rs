pub(crate) mod classes;
pub(crate) mod lessons;
pub(crate) mod quiz_options;
pub(crate) mod quiz_questions;
pub(crate) mod quizzes;

use sqlx::{Postgres, Transaction};

/// Serialize order-mutating operations on one parent within one entity
/// scope. Advisory, transaction-scoped: released on commit or rollback.
pub(crate) async fn acquire_parent_lock(
    tx: &mut Transaction<'_, Postgres>,
    scope: &str,
    parent_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1), hashtext($2))")
        .bind(scope)
        .bind(parent_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
