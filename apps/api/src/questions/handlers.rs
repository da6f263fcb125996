use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::export::Download;
use crate::questions::{
    generate_dsa, generate_questions, generate_questions_pdf, DsaDifficulty, QuestionRequest,
};
use crate::resume::handlers::TextResponse;
use crate::state::AppState;

#[derive(Serialize)]
pub struct QuestionsResponse {
    pub questions: String,
}

#[derive(Deserialize)]
pub struct DsaRequest {
    pub difficulty: DsaDifficulty,
}

/// POST /api/v1/questions
pub async fn handle_questions(
    State(state): State<AppState>,
    Json(req): Json<QuestionRequest>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let questions = generate_questions(state.model.as_ref(), &req).await?;
    Ok(Json(QuestionsResponse { questions }))
}

/// POST /api/v1/questions/pdf
pub async fn handle_questions_pdf(
    State(state): State<AppState>,
    Json(req): Json<QuestionRequest>,
) -> Result<Download, AppError> {
    generate_questions_pdf(state.model.as_ref(), &req).await
}

/// POST /api/v1/questions/dsa
pub async fn handle_dsa(
    State(state): State<AppState>,
    Json(req): Json<DsaRequest>,
) -> Result<Json<TextResponse>, AppError> {
    let response = generate_dsa(state.model.as_ref(), req.difficulty).await?;
    Ok(Json(TextResponse { response }))
}
