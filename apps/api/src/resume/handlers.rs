use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::export::Download;
use crate::normalize::ResumeDocument;
use crate::resume::{optimize_to_docx, run_action, ResumeAction};
use crate::routes::upload::UploadForm;
use crate::state::AppState;

#[derive(Serialize)]
pub struct TextResponse {
    pub response: String,
}

/// Pulls `job_description` and `resume` out of the form. The description may be empty.
async fn collect_inputs(multipart: Multipart) -> Result<(ResumeDocument, String), AppError> {
    let mut form = UploadForm::collect(multipart).await?;
    let job_description = form.text("job_description").to_string();
    let upload = form.require_file("resume", "Please upload a resume.")?;
    Ok((
        ResumeDocument::new(upload.bytes, upload.file_name),
        job_description,
    ))
}

async fn respond(
    state: AppState,
    multipart: Multipart,
    action: ResumeAction,
) -> Result<Json<TextResponse>, AppError> {
    let (resume, job_description) = collect_inputs(multipart).await?;
    let response = run_action(
        state.model.as_ref(),
        &state.normalizer,
        action,
        &resume,
        &job_description,
    )
    .await?;
    Ok(Json(TextResponse { response }))
}

/// POST /api/v1/resume/review
pub async fn handle_review(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TextResponse>, AppError> {
    respond(state, multipart, ResumeAction::Review).await
}

/// POST /api/v1/resume/match
pub async fn handle_match(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TextResponse>, AppError> {
    respond(state, multipart, ResumeAction::Match).await
}

/// POST /api/v1/resume/learning-path
pub async fn handle_learning_path(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TextResponse>, AppError> {
    respond(state, multipart, ResumeAction::LearningPath).await
}

/// POST /api/v1/resume/optimize
/// Responds with the optimized resume as a DOCX attachment.
pub async fn handle_optimize(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Download, AppError> {
    let (resume, job_description) = collect_inputs(multipart).await?;
    optimize_to_docx(
        state.model.as_ref(),
        &state.normalizer,
        &resume,
        &job_description,
    )
    .await
}
