use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::handlers::to_clip;
use crate::interview::flow::{self, AnswerOutcome};
use crate::interview::store::SessionHandle;
use crate::interview::{MockDifficulty, MockInterview, MockTopic};
use crate::routes::upload::UploadForm;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct StartInterviewRequest {
    pub topic: MockTopic,
    pub difficulty: MockDifficulty,
}

#[derive(Serialize)]
pub struct AnswerResponse {
    #[serde(flatten)]
    pub outcome: AnswerOutcome,
    pub session: MockInterview,
}

async fn find_session(state: &AppState, id: Uuid) -> Result<SessionHandle, AppError> {
    state
        .interviews
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))
}

/// POST /api/v1/interviews
/// Creates a session and poses the first question.
pub async fn handle_start(
    State(state): State<AppState>,
    Json(req): Json<StartInterviewRequest>,
) -> Result<(StatusCode, Json<MockInterview>), AppError> {
    let idle = MockInterview::new(req.topic, req.difficulty);
    let started = flow::start(state.model.as_ref(), &idle).await?;
    state.interviews.insert(started.clone()).await;
    let active = state.interviews.len().await;
    info!(session_id = %started.id, "Interview session created ({active} active)");
    Ok((StatusCode::CREATED, Json(started)))
}

/// POST /api/v1/interviews/:id/start
/// Poses a first question on an existing idle (restarted) session.
pub async fn handle_resume_start(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MockInterview>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    *session = flow::start(state.model.as_ref(), &session).await?;
    Ok(Json(session.clone()))
}

/// GET /api/v1/interviews/:id
/// Takes the session lock, so a read issued while an answer is being evaluated waits
/// for that answer's model calls to finish and returns the updated snapshot.
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MockInterview>, AppError> {
    let handle = find_session(&state, id).await?;
    let session = handle.lock().await.clone();
    Ok(Json(session))
}

/// POST /api/v1/interviews/:id/answer
/// Multipart: either an `audio` file (transcribed first) or a `text` field.
pub async fn handle_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<AnswerResponse>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut form = UploadForm::collect(multipart).await?;

    // Held across the model calls so concurrent answers to one session queue up.
    let mut session = handle.lock().await;
    session.ensure_accepting_answers()?;

    let answer = match form.take_file("audio") {
        Some(audio) => state.transcriber.transcribe(&to_clip(audio)).await?,
        None => form.text("text").to_string(),
    };

    let (next, outcome) = flow::submit_answer(state.model.as_ref(), &session, &answer).await?;
    *session = next;
    Ok(Json(AnswerResponse {
        outcome,
        session: session.clone(),
    }))
}

/// POST /api/v1/interviews/:id/restart
pub async fn handle_restart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MockInterview>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    *session = flow::restart(&session)?;
    Ok(Json(session.clone()))
}
