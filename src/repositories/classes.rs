use sqlx::PgPool;

use crate::db::models::SchoolClass;

pub(crate) const COLUMNS: &str = "id, name, subject, description, created_at, updated_at";

pub(crate) struct CreateClass<'a> {
    pub(crate) id: &'a str,
    pub(crate) name: &'a str,
    pub(crate) subject: Option<&'a str>,
    pub(crate) description: Option<&'a str>,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) struct UpdateClass {
    pub(crate) name: Option<String>,
    pub(crate) subject: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateClass<'_>,
) -> Result<SchoolClass, sqlx::Error> {
    sqlx::query_as::<_, SchoolClass>(&format!(
        "INSERT INTO classes (id, name, subject, description, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.name)
    .bind(params.subject)
    .bind(params.description)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    class_id: &str,
) -> Result<Option<SchoolClass>, sqlx::Error> {
    sqlx::query_as::<_, SchoolClass>(&format!("SELECT {COLUMNS} FROM classes WHERE id = $1"))
        .bind(class_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(
    pool: &PgPool,
    skip: i64,
    limit: i64,
) -> Result<Vec<SchoolClass>, sqlx::Error> {
    sqlx::query_as::<_, SchoolClass>(&format!(
        "SELECT {COLUMNS} FROM classes ORDER BY created_at DESC OFFSET $1 LIMIT $2"
    ))
    .bind(skip.max(0))
    .bind(limit.clamp(1, 1000))
    .fetch_all(pool)
    .await
}

pub(crate) async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM classes").fetch_one(pool).await
}

pub(crate) async fn update(
    pool: &PgPool,
    class_id: &str,
    params: UpdateClass,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE classes SET
            name = COALESCE($1, name),
            subject = COALESCE($2, subject),
            description = COALESCE($3, description),
            updated_at = $4
         WHERE id = $5",
    )
    .bind(params.name)
    .bind(params.subject)
    .bind(params.description)
    .bind(params.updated_at)
    .bind(class_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn delete_by_id(pool: &PgPool, class_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM classes WHERE id = $1").bind(class_id).execute(pool).await?;
    Ok(())
}
