//! Screening questionnaire endpoints.

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::store::{Order, Query, Record, QUESTIONNAIRE};
use crate::AppState;

use super::error::ApiError;

const QUESTION_COLUMNS: &[&str] = &[
    "question_id",
    "question_text",
    "question_order",
    "max_score",
    "critical_item",
];

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub success: bool,
    pub questions: Vec<Record>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct QuestionnaireHealth {
    pub status: &'static str,
    pub service: &'static str,
}

/// All questions ordered by `question_order`
/// GET /api/questionnaire/questions
pub async fn list_questions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<QuestionsResponse>, ApiError> {
    let query = Query::new(QUESTIONNAIRE)
        .select(QUESTION_COLUMNS)
        .order_by("question_order", Order::Asc);

    let questions = state.store.fetch(&query).await.map_err(|err| {
        ApiError::fetch("Error fetching questions", err).with_field(
            "message",
            Value::String("Failed to fetch questions from database".to_string()),
        )
    })?;

    let message = if questions.is_empty() {
        warn!("No questions found in database");
        Some("No questions found")
    } else {
        info!(count = questions.len(), "Fetched questionnaire");
        None
    };

    Ok(Json(QuestionsResponse {
        success: true,
        count: questions.len(),
        questions,
        message,
    }))
}

/// GET /api/questionnaire/health
pub async fn health() -> Json<QuestionnaireHealth> {
    Json(QuestionnaireHealth {
        status: "ok",
        service: "BloomSense Questionnaire API",
    })
}
