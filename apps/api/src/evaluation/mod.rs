//! Candidate evaluation from an interview recording: pitch statistics + model assessment.

pub mod handlers;
pub mod voice;

use anyhow::anyhow;
use serde::Serialize;
use tracing::info;

use crate::composer::compose_candidate_evaluation;
use crate::errors::AppError;
use crate::llm_client::GenerativeModel;
use crate::normalize::pitch::{analyze, PitchAnalysis, PitchOutcome, NO_VALID_PITCH};
use crate::normalize::{AudioClip, AudioDecoder, Waveform};

#[derive(Debug, Clone, Serialize)]
pub struct CandidateEvaluation {
    /// `None` when no voiced frame was found.
    pub speech: Option<PitchAnalysis>,
    pub evaluation: String,
}

/// Decodes the recording's audio track and assesses it against the job description.
pub async fn evaluate_candidate(
    model: &dyn GenerativeModel,
    decoder: &AudioDecoder,
    recording: &AudioClip,
    job_description: &str,
) -> Result<CandidateEvaluation, AppError> {
    let waveform = decoder.decode_mono(recording).await?;
    assess_waveform(model, waveform, job_description).await
}

/// Pitch analysis on the blocking pool, then one model call. Silence short-circuits
/// to the sentinel text without calling the model.
pub async fn assess_waveform(
    model: &dyn GenerativeModel,
    waveform: Waveform,
    job_description: &str,
) -> Result<CandidateEvaluation, AppError> {
    let outcome = tokio::task::spawn_blocking(move || {
        analyze(&waveform.samples, waveform.sample_rate)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow!("pitch analysis task failed: {e}")))?;

    let analysis = match outcome {
        PitchOutcome::NoValidPitch => {
            return Ok(CandidateEvaluation {
                speech: None,
                evaluation: NO_VALID_PITCH.to_string(),
            })
        }
        PitchOutcome::Voiced(analysis) => analysis,
    };
    info!(
        "Pitch analysis: {}/{} frames voiced, mean {:.1} Hz, confidence {:.1}",
        analysis.voiced_frames, analysis.total_frames, analysis.mean_hz, analysis.confidence
    );

    let request = compose_candidate_evaluation(job_description, &analysis);
    let evaluation = model.generate_text(&request).await?;
    Ok(CandidateEvaluation {
        speech: Some(analysis),
        evaluation,
    })
}
