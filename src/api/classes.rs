use axum::{routing::get, Json, Router};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::pagination::{default_limit, PaginatedResponse};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::class::{ClassCreate, ClassResponse, ClassUpdate};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_classes).post(create_class))
        .route(
            "/:class_id",
            get(get_class).patch(update_class).delete(delete_class),
        )
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

async fn create_class(
    state: axum::extract::State<AppState>,
    Json(payload): Json<ClassCreate>,
) -> Result<(axum::http::StatusCode, Json<ClassResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let now = primitive_now_utc();
    let class = repositories::classes::create(
        state.db(),
        repositories::classes::CreateClass {
            id: &Uuid::new_v4().to_string(),
            name: payload.name.trim(),
            subject: payload.subject.as_deref(),
            description: payload.description.as_deref(),
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create class"))?;

    Ok((axum::http::StatusCode::CREATED, Json(ClassResponse::from(class))))
}

async fn list_classes(
    state: axum::extract::State<AppState>,
    axum::extract::Query(query): axum::extract::Query<ListQuery>,
) -> Result<Json<PaginatedResponse<ClassResponse>>, ApiError> {
    let classes = repositories::classes::list(state.db(), query.skip, query.limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list classes"))?;
    let total_count = repositories::classes::count(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count classes"))?;

    Ok(Json(PaginatedResponse {
        items: classes.into_iter().map(ClassResponse::from).collect(),
        total_count,
        skip: query.skip,
        limit: query.limit,
    }))
}

async fn get_class(
    axum::extract::Path(class_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
) -> Result<Json<ClassResponse>, ApiError> {
    let class = repositories::classes::find_by_id(state.db(), &class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch class"))?
        .ok_or_else(|| ApiError::NotFound("Class not found".to_string()))?;

    Ok(Json(ClassResponse::from(class)))
}

async fn update_class(
    axum::extract::Path(class_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
    Json(payload): Json<ClassUpdate>,
) -> Result<Json<ClassResponse>, ApiError> {
    if repositories::classes::find_by_id(state.db(), &class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch class"))?
        .is_none()
    {
        return Err(ApiError::NotFound("Class not found".to_string()));
    }

    repositories::classes::update(
        state.db(),
        &class_id,
        repositories::classes::UpdateClass {
            name: payload.name,
            subject: payload.subject,
            description: payload.description,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update class"))?;

    let class = repositories::classes::find_by_id(state.db(), &class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch class"))?
        .ok_or_else(|| ApiError::NotFound("Class not found".to_string()))?;

    Ok(Json(ClassResponse::from(class)))
}

async fn delete_class(
    axum::extract::Path(class_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    if repositories::classes::find_by_id(state.db(), &class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch class"))?
        .is_none()
    {
        return Err(ApiError::NotFound("Class not found".to_string()));
    }

    repositories::classes::delete_by_id(state.db(), &class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete class"))?;

    Ok(axum::http::StatusCode::NO_CONTENT)
}
