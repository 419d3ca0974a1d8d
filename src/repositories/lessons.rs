use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use time::PrimitiveDateTime;

use crate::db::models::Lesson;
use crate::ordering::plan::{ShiftPlan, Sibling};
use crate::ordering::store::{AtomicBatchExecutor, PrimaryWrite, SiblingRepository};

pub(crate) const COLUMNS: &str =
    "id, class_id, title, content, position, created_at, updated_at";

const ORDER_SCOPE: &str = "lessons";

/// Full row image carried through the ordering protocol as the primary
/// write. Position is assigned by the protocol, not the caller.
#[derive(Debug)]
pub(crate) struct LessonWrite {
    pub(crate) id: String,
    pub(crate) class_id: String,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn list_by_class(
    pool: &PgPool,
    class_id: &str,
) -> Result<Vec<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        "SELECT {COLUMNS} FROM lessons WHERE class_id = $1 ORDER BY position"
    ))
    .bind(class_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    class_id: &str,
    lesson_id: &str,
) -> Result<Option<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        "SELECT {COLUMNS} FROM lessons WHERE class_id = $1 AND id = $2"
    ))
    .bind(class_id)
    .bind(lesson_id)
    .fetch_optional(pool)
    .await
}

/// One order-mutating operation on the lessons of a class. Holds an open
/// transaction with the per-class advisory lock already taken, so the
/// read-plan-commit cycle is serialized against other writers of the same
/// class.
pub(crate) struct LessonOrderStore {
    tx: Transaction<'static, Postgres>,
}

impl LessonOrderStore {
    pub(crate) async fn begin(pool: &PgPool, class_id: &str) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;
        super::acquire_parent_lock(&mut tx, ORDER_SCOPE, class_id).await?;
        Ok(Self { tx })
    }
}

#[async_trait]
impl SiblingRepository for LessonOrderStore {
    type Error = sqlx::Error;

    async fn load_siblings(&mut self, parent_id: &str) -> Result<Vec<Sibling>, sqlx::Error> {
        let rows: Vec<(String, i32)> =
            sqlx::query_as("SELECT id, position FROM lessons WHERE class_id = $1")
                .bind(parent_id)
                .fetch_all(&mut *self.tx)
                .await?;
        Ok(rows.into_iter().map(|(id, order)| Sibling { id, order }).collect())
    }
}

#[async_trait]
impl AtomicBatchExecutor<LessonWrite> for LessonOrderStore {
    async fn commit(
        mut self,
        _parent_id: &str,
        plan: ShiftPlan,
        primary: PrimaryWrite<LessonWrite>,
    ) -> Result<(), sqlx::Error> {
        for shift in &plan {
            sqlx::query("UPDATE lessons SET position = $1 WHERE id = $2")
                .bind(shift.new_order)
                .bind(&shift.item_id)
                .execute(&mut *self.tx)
                .await?;
        }

        match primary {
            PrimaryWrite::Upsert { item, order } => {
                sqlx::query(
                    "INSERT INTO lessons (id, class_id, title, content, position, created_at, updated_at)
                     VALUES ($1,$2,$3,$4,$5,$6,$7)
                     ON CONFLICT (id) DO UPDATE SET
                        title = EXCLUDED.title,
                        content = EXCLUDED.content,
                        position = EXCLUDED.position,
                        updated_at = EXCLUDED.updated_at",
                )
                .bind(&item.id)
                .bind(&item.class_id)
                .bind(&item.title)
                .bind(&item.content)
                .bind(order)
                .bind(item.created_at)
                .bind(item.updated_at)
                .execute(&mut *self.tx)
                .await?;
            }
            PrimaryWrite::Delete { item_id } => {
                sqlx::query("DELETE FROM lessons WHERE id = $1")
                    .bind(&item_id)
                    .execute(&mut *self.tx)
                    .await?;
            }
        }

        self.tx.commit().await
    }
}
