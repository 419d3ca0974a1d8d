use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Quiz, QuizOption, QuizQuestion};
use crate::db::types::QuestionKind;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuizCreate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct OptionCreate {
    #[validate(length(min = 1, message = "label must not be empty"))]
    pub(crate) label: String,
    #[serde(default)]
    #[serde(alias = "isCorrect")]
    pub(crate) is_correct: bool,
    #[serde(default)]
    #[serde(alias = "order")]
    pub(crate) position: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct OptionUpdate {
    #[validate(length(min = 1, message = "label must not be empty"))]
    pub(crate) label: Option<String>,
    #[serde(alias = "isCorrect")]
    pub(crate) is_correct: Option<bool>,
    #[serde(default)]
    #[serde(alias = "order")]
    pub(crate) position: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuestionCreate {
    #[validate(length(min = 1, message = "prompt must not be empty"))]
    pub(crate) prompt: String,
    #[serde(default = "default_kind")]
    pub(crate) kind: QuestionKind,
    #[serde(default = "default_score")]
    #[validate(range(exclusive_min = 0.0, message = "score must be positive"))]
    pub(crate) score: f64,
    #[serde(default)]
    #[serde(alias = "order")]
    pub(crate) position: Option<i32>,
    #[serde(default)]
    #[validate(nested)]
    pub(crate) options: Vec<OptionCreate>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuestionUpdate {
    #[validate(length(min = 1, message = "prompt must not be empty"))]
    pub(crate) prompt: Option<String>,
    pub(crate) kind: Option<QuestionKind>,
    #[validate(range(exclusive_min = 0.0, message = "score must be positive"))]
    pub(crate) score: Option<f64>,
    #[serde(default)]
    #[serde(alias = "order")]
    pub(crate) position: Option<i32>,
}

fn default_kind() -> QuestionKind {
    QuestionKind::SingleChoice
}

fn default_score() -> f64 {
    1.0
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizResponse {
    pub(crate) id: String,
    pub(crate) class_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl From<Quiz> for QuizResponse {
    fn from(quiz: Quiz) -> Self {
        Self {
            id: quiz.id,
            class_id: quiz.class_id,
            title: quiz.title,
            description: quiz.description,
            created_at: format_primitive(quiz.created_at),
            updated_at: format_primitive(quiz.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OptionResponse {
    pub(crate) id: String,
    pub(crate) question_id: String,
    pub(crate) label: String,
    pub(crate) is_correct: bool,
    pub(crate) position: i32,
}

impl From<QuizOption> for OptionResponse {
    fn from(option: QuizOption) -> Self {
        Self {
            id: option.id,
            question_id: option.question_id,
            label: option.label,
            is_correct: option.is_correct,
            position: option.position,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionResponse {
    pub(crate) id: String,
    pub(crate) quiz_id: String,
    pub(crate) prompt: String,
    pub(crate) kind: QuestionKind,
    pub(crate) score: f64,
    pub(crate) position: i32,
    pub(crate) options: Vec<OptionResponse>,
}

impl QuestionResponse {
    pub(crate) fn from_rows(question: QuizQuestion, options: Vec<QuizOption>) -> Self {
        Self {
            id: question.id,
            quiz_id: question.quiz_id,
            prompt: question.prompt,
            kind: question.kind,
            score: question.score,
            position: question.position,
            options: options.into_iter().map(OptionResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizDetailResponse {
    #[serde(flatten)]
    pub(crate) quiz: QuizResponse,
    pub(crate) questions: Vec<QuestionResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_defaults() {
        let payload: QuestionCreate =
            serde_json::from_str(r#"{"prompt": "2 + 2?"}"#).expect("payload");
        assert_eq!(payload.kind, QuestionKind::SingleChoice);
        assert_eq!(payload.score, 1.0);
        assert!(payload.options.is_empty());
        assert_eq!(payload.position, None);
    }

    #[test]
    fn nested_option_validation_runs() {
        let payload: QuestionCreate = serde_json::from_str(
            r#"{"prompt": "2 + 2?", "options": [{"label": "", "isCorrect": true}]}"#,
        )
        .expect("payload");
        assert!(payload.validate().is_err());
    }

    #[test]
    fn option_accepts_camel_case_aliases() {
        let payload: OptionCreate =
            serde_json::from_str(r#"{"label": "4", "isCorrect": true, "order": 1}"#)
                .expect("payload");
        assert!(payload.is_correct);
        assert_eq!(payload.position, Some(1));
    }
}
