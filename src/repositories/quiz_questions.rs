use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use time::PrimitiveDateTime;

use crate::db::models::QuizQuestion;
use crate::db::types::QuestionKind;
use crate::ordering::plan::{ShiftPlan, Sibling};
use crate::ordering::store::{AtomicBatchExecutor, PrimaryWrite, SiblingRepository};

pub(crate) const COLUMNS: &str =
    "id, quiz_id, prompt, kind, score, position, created_at, updated_at";

const ORDER_SCOPE: &str = "quiz_questions";

#[derive(Debug)]
pub(crate) struct QuestionWrite {
    pub(crate) id: String,
    pub(crate) quiz_id: String,
    pub(crate) prompt: String,
    pub(crate) kind: QuestionKind,
    pub(crate) score: f64,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn list_by_quiz(
    pool: &PgPool,
    quiz_id: &str,
) -> Result<Vec<QuizQuestion>, sqlx::Error> {
    sqlx::query_as::<_, QuizQuestion>(&format!(
        "SELECT {COLUMNS} FROM quiz_questions WHERE quiz_id = $1 ORDER BY position"
    ))
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    quiz_id: &str,
    question_id: &str,
) -> Result<Option<QuizQuestion>, sqlx::Error> {
    sqlx::query_as::<_, QuizQuestion>(&format!(
        "SELECT {COLUMNS} FROM quiz_questions WHERE quiz_id = $1 AND id = $2"
    ))
    .bind(quiz_id)
    .bind(question_id)
    .fetch_optional(pool)
    .await
}

/// Ordering adapter for the questions of one quiz. Same shape as
/// `lessons::LessonOrderStore`: transaction plus per-quiz advisory lock.
pub(crate) struct QuestionOrderStore {
    tx: Transaction<'static, Postgres>,
}

impl QuestionOrderStore {
    pub(crate) async fn begin(pool: &PgPool, quiz_id: &str) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;
        super::acquire_parent_lock(&mut tx, ORDER_SCOPE, quiz_id).await?;
        Ok(Self { tx })
    }
}

#[async_trait]
impl SiblingRepository for QuestionOrderStore {
    type Error = sqlx::Error;

    async fn load_siblings(&mut self, parent_id: &str) -> Result<Vec<Sibling>, sqlx::Error> {
        let rows: Vec<(String, i32)> =
            sqlx::query_as("SELECT id, position FROM quiz_questions WHERE quiz_id = $1")
                .bind(parent_id)
                .fetch_all(&mut *self.tx)
                .await?;
        Ok(rows.into_iter().map(|(id, order)| Sibling { id, order }).collect())
    }
}

#[async_trait]
impl AtomicBatchExecutor<QuestionWrite> for QuestionOrderStore {
    async fn commit(
        mut self,
        _parent_id: &str,
        plan: ShiftPlan,
        primary: PrimaryWrite<QuestionWrite>,
    ) -> Result<(), sqlx::Error> {
        for shift in &plan {
            sqlx::query("UPDATE quiz_questions SET position = $1 WHERE id = $2")
                .bind(shift.new_order)
                .bind(&shift.item_id)
                .execute(&mut *self.tx)
                .await?;
        }

        match primary {
            PrimaryWrite::Upsert { item, order } => {
                sqlx::query(
                    "INSERT INTO quiz_questions (id, quiz_id, prompt, kind, score, position, created_at, updated_at)
                     VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
                     ON CONFLICT (id) DO UPDATE SET
                        prompt = EXCLUDED.prompt,
                        kind = EXCLUDED.kind,
                        score = EXCLUDED.score,
                        position = EXCLUDED.position,
                        updated_at = EXCLUDED.updated_at",
                )
                .bind(&item.id)
                .bind(&item.quiz_id)
                .bind(&item.prompt)
                .bind(item.kind)
                .bind(item.score)
                .bind(order)
                .bind(item.created_at)
                .bind(item.updated_at)
                .execute(&mut *self.tx)
                .await?;
            }
            PrimaryWrite::Delete { item_id } => {
                sqlx::query("DELETE FROM quiz_questions WHERE id = $1")
                    .bind(&item_id)
                    .execute(&mut *self.tx)
                    .await?;
            }
        }

        self.tx.commit().await
    }
}
