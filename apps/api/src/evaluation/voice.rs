// Voice assistant: spoken question → transcript → model answer.

use serde::Serialize;

use crate::composer::compose_voice_request;
use crate::errors::AppError;
use crate::llm_client::GenerativeModel;
use crate::normalize::{AudioClip, Transcriber};

#[derive(Debug, Clone, Serialize)]
pub struct VoiceReply {
    pub transcript: String,
    pub response: String,
}

pub async fn answer_spoken_question(
    model: &dyn GenerativeModel,
    transcriber: &dyn Transcriber,
    clip: &AudioClip,
) -> Result<VoiceReply, AppError> {
    let transcript = transcriber.transcribe(clip).await?;
    let response = model
        .generate_text(&compose_voice_request(&transcript))
        .await?;
    Ok(VoiceReply {
        transcript,
        response,
    })
}
