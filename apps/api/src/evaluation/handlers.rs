use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::errors::AppError;
use crate::evaluation::voice::{answer_spoken_question, VoiceReply};
use crate::evaluation::{evaluate_candidate, CandidateEvaluation};
use crate::normalize::AudioClip;
use crate::routes::upload::{UploadForm, UploadedFile};
use crate::state::AppState;

pub(crate) fn to_clip(upload: UploadedFile) -> AudioClip {
    AudioClip::new(
        upload.bytes,
        upload.content_type.as_deref(),
        upload.file_name.as_deref(),
    )
}

/// POST /api/v1/evaluation
/// Multipart fields: `job_description` (text), `video` (file).
pub async fn handle_evaluate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CandidateEvaluation>, AppError> {
    let mut form = UploadForm::collect(multipart).await?;
    let job_description = form.text("job_description").to_string();
    let video = form.require_file("video", "Please upload an interview video.")?;

    let evaluation = evaluate_candidate(
        state.model.as_ref(),
        &state.decoder,
        &to_clip(video),
        &job_description,
    )
    .await?;
    Ok(Json(evaluation))
}

/// POST /api/v1/voice
/// Multipart field: `audio` (file).
pub async fn handle_voice(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<VoiceReply>, AppError> {
    let mut form = UploadForm::collect(multipart).await?;
    let audio = form.require_file("audio", "Please record a question.")?;

    let reply = answer_spoken_question(
        state.model.as_ref(),
        state.transcriber.as_ref(),
        &to_clip(audio),
    )
    .await?;
    Ok(Json(reply))
}
