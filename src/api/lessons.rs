use axum::{routing::get, Json, Router};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::ordering;
use crate::repositories;
use crate::repositories::lessons::{LessonOrderStore, LessonWrite};
use crate::schemas::lesson::{LessonCreate, LessonResponse, LessonUpdate};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:class_id/lessons", get(list_lessons).post(create_lesson))
        .route(
            "/:class_id/lessons/:lesson_id",
            get(get_lesson).put(update_lesson).delete(delete_lesson),
        )
}

async fn ensure_class_exists(state: &AppState, class_id: &str) -> Result<(), ApiError> {
    repositories::classes::find_by_id(state.db(), class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch class"))?
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound("Class not found".to_string()))
}

async fn create_lesson(
    axum::extract::Path(class_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
    Json(payload): Json<LessonCreate>,
) -> Result<(axum::http::StatusCode, Json<LessonResponse>), ApiError> {
    ensure_class_exists(&state, &class_id).await?;
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let now = primitive_now_utc();
    let lesson_id = Uuid::new_v4().to_string();

    let store = LessonOrderStore::begin(state.db(), &class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start lesson transaction"))?;

    ordering::insert_item(
        store,
        &class_id,
        LessonWrite {
            id: lesson_id.clone(),
            class_id: class_id.clone(),
            title: payload.title.trim().to_string(),
            content: payload.content,
            created_at: now,
            updated_at: now,
        },
        payload.position,
    )
    .await
    .map_err(|e| ApiError::resequence(e, "Failed to create lesson"))?;

    let lesson = repositories::lessons::find_by_id(state.db(), &class_id, &lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch created lesson"))?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

    Ok((axum::http::StatusCode::CREATED, Json(LessonResponse::from(lesson))))
}

async fn list_lessons(
    axum::extract::Path(class_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<LessonResponse>>, ApiError> {
    ensure_class_exists(&state, &class_id).await?;

    let lessons = repositories::lessons::list_by_class(state.db(), &class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list lessons"))?;

    Ok(Json(lessons.into_iter().map(LessonResponse::from).collect()))
}

async fn get_lesson(
    axum::extract::Path((class_id, lesson_id)): axum::extract::Path<(String, String)>,
    state: axum::extract::State<AppState>,
) -> Result<Json<LessonResponse>, ApiError> {
    let lesson = repositories::lessons::find_by_id(state.db(), &class_id, &lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch lesson"))?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

    Ok(Json(LessonResponse::from(lesson)))
}

async fn update_lesson(
    axum::extract::Path((class_id, lesson_id)): axum::extract::Path<(String, String)>,
    state: axum::extract::State<AppState>,
    Json(payload): Json<LessonUpdate>,
) -> Result<Json<LessonResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let existing = repositories::lessons::find_by_id(state.db(), &class_id, &lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch lesson"))?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

    let store = LessonOrderStore::begin(state.db(), &class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start lesson transaction"))?;

    ordering::move_item(
        store,
        &class_id,
        &lesson_id,
        LessonWrite {
            id: existing.id.clone(),
            class_id: existing.class_id.clone(),
            title: payload.title.unwrap_or(existing.title),
            content: payload.content.unwrap_or(existing.content),
            created_at: existing.created_at,
            updated_at: primitive_now_utc(),
        },
        payload.position,
    )
    .await
    .map_err(|e| ApiError::resequence(e, "Failed to update lesson"))?;

    let lesson = repositories::lessons::find_by_id(state.db(), &class_id, &lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated lesson"))?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

    Ok(Json(LessonResponse::from(lesson)))
}

async fn delete_lesson(
    axum::extract::Path((class_id, lesson_id)): axum::extract::Path<(String, String)>,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    let store = LessonOrderStore::begin(state.db(), &class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start lesson transaction"))?;

    ordering::delete_item(store, &class_id, &lesson_id)
        .await
        .map_err(|e| ApiError::resequence(e, "Failed to delete lesson"))?;

    Ok(axum::http::StatusCode::NO_CONTENT)
}
