use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use time::PrimitiveDateTime;

use crate::db::models::QuizOption;
use crate::ordering::plan::{ShiftPlan, Sibling};
use crate::ordering::store::{AtomicBatchExecutor, PrimaryWrite, SiblingRepository};

pub(crate) const COLUMNS: &str =
    "id, question_id, label, is_correct, position, created_at, updated_at";

const ORDER_SCOPE: &str = "quiz_options";

#[derive(Debug)]
pub(crate) struct OptionWrite {
    pub(crate) id: String,
    pub(crate) question_id: String,
    pub(crate) label: String,
    pub(crate) is_correct: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn list_by_question(
    pool: &PgPool,
    question_id: &str,
) -> Result<Vec<QuizOption>, sqlx::Error> {
    sqlx::query_as::<_, QuizOption>(&format!(
        "SELECT {COLUMNS} FROM quiz_options WHERE question_id = $1 ORDER BY position"
    ))
    .bind(question_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    question_id: &str,
    option_id: &str,
) -> Result<Option<QuizOption>, sqlx::Error> {
    sqlx::query_as::<_, QuizOption>(&format!(
        "SELECT {COLUMNS} FROM quiz_options WHERE question_id = $1 AND id = $2"
    ))
    .bind(question_id)
    .bind(option_id)
    .fetch_optional(pool)
    .await
}

/// Ordering adapter for the options of one question.
pub(crate) struct OptionOrderStore {
    tx: Transaction<'static, Postgres>,
}

impl OptionOrderStore {
    pub(crate) async fn begin(pool: &PgPool, question_id: &str) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;
        super::acquire_parent_lock(&mut tx, ORDER_SCOPE, question_id).await?;
        Ok(Self { tx })
    }
}

#[async_trait]
impl SiblingRepository for OptionOrderStore {
    type Error = sqlx::Error;

    async fn load_siblings(&mut self, parent_id: &str) -> Result<Vec<Sibling>, sqlx::Error> {
        let rows: Vec<(String, i32)> =
            sqlx::query_as("SELECT id, position FROM quiz_options WHERE question_id = $1")
                .bind(parent_id)
                .fetch_all(&mut *self.tx)
                .await?;
        Ok(rows.into_iter().map(|(id, order)| Sibling { id, order }).collect())
    }
}

#[async_trait]
impl AtomicBatchExecutor<OptionWrite> for OptionOrderStore {
    async fn commit(
        mut self,
        _parent_id: &str,
        plan: ShiftPlan,
        primary: PrimaryWrite<OptionWrite>,
    ) -> Result<(), sqlx::Error> {
        for shift in &plan {
            sqlx::query("UPDATE quiz_options SET position = $1 WHERE id = $2")
                .bind(shift.new_order)
                .bind(&shift.item_id)
                .execute(&mut *self.tx)
                .await?;
        }

        match primary {
            PrimaryWrite::Upsert { item, order } => {
                sqlx::query(
                    "INSERT INTO quiz_options (id, question_id, label, is_correct, position, created_at, updated_at)
                     VALUES ($1,$2,$3,$4,$5,$6,$7)
                     ON CONFLICT (id) DO UPDATE SET
                        label = EXCLUDED.label,
                        is_correct = EXCLUDED.is_correct,
                        position = EXCLUDED.position,
                        updated_at = EXCLUDED.updated_at",
                )
                .bind(&item.id)
                .bind(&item.question_id)
                .bind(&item.label)
                .bind(item.is_correct)
                .bind(order)
                .bind(item.created_at)
                .bind(item.updated_at)
                .execute(&mut *self.tx)
                .await?;
            }
            PrimaryWrite::Delete { item_id } => {
                sqlx::query("DELETE FROM quiz_options WHERE id = $1")
                    .bind(&item_id)
                    .execute(&mut *self.tx)
                    .await?;
            }
        }

        self.tx.commit().await
    }
}
