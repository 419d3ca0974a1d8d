use axum::{
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{Quiz, QuizQuestion};
use crate::ordering;
use crate::repositories;
use crate::repositories::quiz_options::{OptionOrderStore, OptionWrite};
use crate::repositories::quiz_questions::{QuestionOrderStore, QuestionWrite};
use crate::schemas::quiz::{
    OptionCreate, OptionResponse, OptionUpdate, QuestionCreate, QuestionResponse, QuestionUpdate,
    QuizCreate, QuizDetailResponse, QuizResponse,
};

/// Routes mounted under `/classes`.
pub(crate) fn class_router() -> Router<AppState> {
    Router::new().route("/:class_id/quizzes", get(list_quizzes).post(create_quiz))
}

/// Routes mounted under `/quizzes`.
pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:quiz_id", get(get_quiz).delete(delete_quiz))
        .route("/:quiz_id/questions", post(add_question))
        .route(
            "/:quiz_id/questions/:question_id",
            put(update_question).delete(delete_question),
        )
        .route("/:quiz_id/questions/:question_id/options", post(add_option))
        .route(
            "/:quiz_id/questions/:question_id/options/:option_id",
            put(update_option).delete(delete_option),
        )
}

async fn fetch_quiz(state: &AppState, quiz_id: &str) -> Result<Quiz, ApiError> {
    repositories::quizzes::find_by_id(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))
}

async fn fetch_question(
    state: &AppState,
    quiz_id: &str,
    question_id: &str,
) -> Result<QuizQuestion, ApiError> {
    repositories::quiz_questions::find_by_id(state.db(), quiz_id, question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch question"))?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))
}

async fn question_response(
    state: &AppState,
    question: QuizQuestion,
) -> Result<QuestionResponse, ApiError> {
    let options = repositories::quiz_options::list_by_question(state.db(), &question.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list options"))?;
    Ok(QuestionResponse::from_rows(question, options))
}

async fn create_quiz(
    axum::extract::Path(class_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
    Json(payload): Json<QuizCreate>,
) -> Result<(axum::http::StatusCode, Json<QuizResponse>), ApiError> {
    if repositories::classes::find_by_id(state.db(), &class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch class"))?
        .is_none()
    {
        return Err(ApiError::NotFound("Class not found".to_string()));
    }
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let now = primitive_now_utc();
    let quiz = repositories::quizzes::create(
        state.db(),
        repositories::quizzes::CreateQuiz {
            id: &Uuid::new_v4().to_string(),
            class_id: &class_id,
            title: payload.title.trim(),
            description: payload.description.as_deref(),
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create quiz"))?;

    Ok((axum::http::StatusCode::CREATED, Json(QuizResponse::from(quiz))))
}

async fn list_quizzes(
    axum::extract::Path(class_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<QuizResponse>>, ApiError> {
    if repositories::classes::find_by_id(state.db(), &class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch class"))?
        .is_none()
    {
        return Err(ApiError::NotFound("Class not found".to_string()));
    }

    let quizzes = repositories::quizzes::list_by_class(state.db(), &class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list quizzes"))?;

    Ok(Json(quizzes.into_iter().map(QuizResponse::from).collect()))
}

async fn get_quiz(
    axum::extract::Path(quiz_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
) -> Result<Json<QuizDetailResponse>, ApiError> {
    let quiz = fetch_quiz(&state, &quiz_id).await?;

    let question_rows = repositories::quiz_questions::list_by_quiz(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list questions"))?;

    let mut questions = Vec::with_capacity(question_rows.len());
    for question in question_rows {
        questions.push(question_response(&state, question).await?);
    }

    Ok(Json(QuizDetailResponse { quiz: QuizResponse::from(quiz), questions }))
}

async fn delete_quiz(
    axum::extract::Path(quiz_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    fetch_quiz(&state, &quiz_id).await?;

    repositories::quizzes::delete_by_id(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete quiz"))?;

    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn add_question(
    axum::extract::Path(quiz_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
    Json(payload): Json<QuestionCreate>,
) -> Result<(axum::http::StatusCode, Json<QuestionResponse>), ApiError> {
    fetch_quiz(&state, &quiz_id).await?;
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let now = primitive_now_utc();
    let question_id = Uuid::new_v4().to_string();

    let store = QuestionOrderStore::begin(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start question transaction"))?;

    ordering::insert_item(
        store,
        &quiz_id,
        QuestionWrite {
            id: question_id.clone(),
            quiz_id: quiz_id.clone(),
            prompt: payload.prompt.trim().to_string(),
            kind: payload.kind,
            score: payload.score,
            created_at: now,
            updated_at: now,
        },
        payload.position,
    )
    .await
    .map_err(|e| ApiError::resequence(e, "Failed to create question"))?;

    for option in payload.options {
        insert_option(&state, &question_id, option).await?;
    }

    let question = fetch_question(&state, &quiz_id, &question_id).await?;
    let response = question_response(&state, question).await?;
    Ok((axum::http::StatusCode::CREATED, Json(response)))
}

async fn update_question(
    axum::extract::Path((quiz_id, question_id)): axum::extract::Path<(String, String)>,
    state: axum::extract::State<AppState>,
    Json(payload): Json<QuestionUpdate>,
) -> Result<Json<QuestionResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let existing = fetch_question(&state, &quiz_id, &question_id).await?;

    let store = QuestionOrderStore::begin(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start question transaction"))?;

    ordering::move_item(
        store,
        &quiz_id,
        &question_id,
        QuestionWrite {
            id: existing.id.clone(),
            quiz_id: existing.quiz_id.clone(),
            prompt: payload.prompt.unwrap_or(existing.prompt),
            kind: payload.kind.unwrap_or(existing.kind),
            score: payload.score.unwrap_or(existing.score),
            created_at: existing.created_at,
            updated_at: primitive_now_utc(),
        },
        payload.position,
    )
    .await
    .map_err(|e| ApiError::resequence(e, "Failed to update question"))?;

    let question = fetch_question(&state, &quiz_id, &question_id).await?;
    let response = question_response(&state, question).await?;
    Ok(Json(response))
}

async fn delete_question(
    axum::extract::Path((quiz_id, question_id)): axum::extract::Path<(String, String)>,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    let store = QuestionOrderStore::begin(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start question transaction"))?;

    ordering::delete_item(store, &quiz_id, &question_id)
        .await
        .map_err(|e| ApiError::resequence(e, "Failed to delete question"))?;

    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn insert_option(
    state: &AppState,
    question_id: &str,
    option: OptionCreate,
) -> Result<String, ApiError> {
    let now = primitive_now_utc();
    let option_id = Uuid::new_v4().to_string();

    let store = OptionOrderStore::begin(state.db(), question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start option transaction"))?;

    ordering::insert_item(
        store,
        question_id,
        OptionWrite {
            id: option_id.clone(),
            question_id: question_id.to_string(),
            label: option.label.trim().to_string(),
            is_correct: option.is_correct,
            created_at: now,
            updated_at: now,
        },
        option.position,
    )
    .await
    .map_err(|e| ApiError::resequence(e, "Failed to create option"))?;

    Ok(option_id)
}

async fn add_option(
    axum::extract::Path((quiz_id, question_id)): axum::extract::Path<(String, String)>,
    state: axum::extract::State<AppState>,
    Json(payload): Json<OptionCreate>,
) -> Result<(axum::http::StatusCode, Json<OptionResponse>), ApiError> {
    fetch_question(&state, &quiz_id, &question_id).await?;
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let option_id = insert_option(&state, &question_id, payload).await?;

    let option = repositories::quiz_options::find_by_id(state.db(), &question_id, &option_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch created option"))?
        .ok_or_else(|| ApiError::NotFound("Option not found".to_string()))?;

    Ok((axum::http::StatusCode::CREATED, Json(OptionResponse::from(option))))
}

async fn update_option(
    axum::extract::Path((quiz_id, question_id, option_id)): axum::extract::Path<(
        String,
        String,
        String,
    )>,
    state: axum::extract::State<AppState>,
    Json(payload): Json<OptionUpdate>,
) -> Result<Json<OptionResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    fetch_question(&state, &quiz_id, &question_id).await?;

    let existing = repositories::quiz_options::find_by_id(state.db(), &question_id, &option_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch option"))?
        .ok_or_else(|| ApiError::NotFound("Option not found".to_string()))?;

    let store = OptionOrderStore::begin(state.db(), &question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start option transaction"))?;

    ordering::move_item(
        store,
        &question_id,
        &option_id,
        OptionWrite {
            id: existing.id.clone(),
            question_id: existing.question_id.clone(),
            label: payload.label.unwrap_or(existing.label),
            is_correct: payload.is_correct.unwrap_or(existing.is_correct),
            created_at: existing.created_at,
            updated_at: primitive_now_utc(),
        },
        payload.position,
    )
    .await
    .map_err(|e| ApiError::resequence(e, "Failed to update option"))?;

    let option = repositories::quiz_options::find_by_id(state.db(), &question_id, &option_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated option"))?
        .ok_or_else(|| ApiError::NotFound("Option not found".to_string()))?;

    Ok(Json(OptionResponse::from(option)))
}

async fn delete_option(
    axum::extract::Path((quiz_id, question_id, option_id)): axum::extract::Path<(
        String,
        String,
        String,
    )>,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    fetch_question(&state, &quiz_id, &question_id).await?;

    let store = OptionOrderStore::begin(state.db(), &question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start option transaction"))?;

    ordering::delete_item(store, &question_id, &option_id)
        .await
        .map_err(|e| ApiError::resequence(e, "Failed to delete option"))?;

    Ok(axum::http::StatusCode::NO_CONTENT)
}
