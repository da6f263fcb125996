//! Speech-to-text. The clip is converted to WAV and handed to the generative model with a
//! transcription instruction; an empty reply or the no-speech marker is a recognition failure.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::info;

use super::{AudioClip, AudioDecoder, NormalizeError};
use crate::composer::{compose_transcription_request, NO_SPEECH_MARKER};
use crate::llm_client::GenerativeModel;

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, clip: &AudioClip) -> Result<String, NormalizeError>;
}

/// Transcribes through the same generative model used for everything else.
#[derive(Clone)]
pub struct ModelTranscriber {
    model: Arc<dyn GenerativeModel>,
    decoder: AudioDecoder,
}

impl ModelTranscriber {
    pub fn new(model: Arc<dyn GenerativeModel>, decoder: AudioDecoder) -> Self {
        Self { model, decoder }
    }
}

#[async_trait]
impl Transcriber for ModelTranscriber {
    async fn transcribe(&self, clip: &AudioClip) -> Result<String, NormalizeError> {
        let wav = if clip.is_wav() {
            clip.bytes.to_vec()
        } else {
            self.decoder.to_wav(clip).await?
        };

        let request = compose_transcription_request(STANDARD.encode(&wav));
        let response = self.model.generate(&request).await?;
        let transcript = interpret_transcript(response.text)?;
        info!("Transcribed {} chars of speech", transcript.len());
        Ok(transcript)
    }
}

/// Accepts a model reply as a transcript, or reports that no speech was recognized.
pub fn interpret_transcript(reply: Option<String>) -> Result<String, NormalizeError> {
    let text = reply.map(|t| t.trim().to_string()).unwrap_or_default();
    if text.is_empty() {
        return Err(NormalizeError::Unrecognized("empty transcript".to_string()));
    }
    if text.contains(NO_SPEECH_MARKER) {
        return Err(NormalizeError::Unrecognized(
            "model reported no intelligible speech".to_string(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{ContentPart, LlmError, ModelRequest, ModelResponse};
    use bytes::Bytes;
    use std::sync::Mutex;

    struct ScriptedModel {
        reply: Option<String>,
        seen: Mutex<Vec<ModelRequest>>,
    }

    #[async_trait]
    impl GenerativeModel for ScriptedModel {
        async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, LlmError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(ModelResponse {
                text: self.reply.clone(),
                finish_reason: None,
            })
        }
    }

    fn transcriber(reply: Option<&str>) -> (ModelTranscriber, Arc<ScriptedModel>) {
        let model = Arc::new(ScriptedModel {
            reply: reply.map(String::from),
            seen: Mutex::new(Vec::new()),
        });
        (
            ModelTranscriber::new(model.clone(), AudioDecoder::new("prepwise-no-such-binary")),
            model,
        )
    }

    fn wav_clip() -> AudioClip {
        AudioClip::new(Bytes::from_static(b"RIFF....WAVE"), Some("audio/wav"), Some("a.wav"))
    }

    #[test]
    fn test_interpret_rejects_blank_and_marker() {
        assert!(matches!(
            interpret_transcript(None),
            Err(NormalizeError::Unrecognized(_))
        ));
        assert!(matches!(
            interpret_transcript(Some("   ".into())),
            Err(NormalizeError::Unrecognized(_))
        ));
        assert!(matches!(
            interpret_transcript(Some(NO_SPEECH_MARKER.into())),
            Err(NormalizeError::Unrecognized(_))
        ));
        assert_eq!(
            interpret_transcript(Some(" A list is mutable. ".into())).unwrap(),
            "A list is mutable."
        );
    }

    #[tokio::test]
    async fn test_wav_clip_is_sent_inline_without_conversion() {
        let (transcriber, model) = transcriber(Some("Tuples are immutable."));
        let transcript = transcriber.transcribe(&wav_clip()).await.unwrap();
        assert_eq!(transcript, "Tuples are immutable.");

        let seen = model.seen.lock().unwrap();
        let audio = seen[0]
            .parts
            .iter()
            .find_map(|p| match p {
                ContentPart::InlineData(d) => Some(d.clone()),
                ContentPart::Text(_) => None,
            })
            .unwrap();
        assert_eq!(audio.mime_type, "audio/wav");
        assert_eq!(STANDARD.decode(audio.data).unwrap(), b"RIFF....WAVE");
    }

    #[tokio::test]
    async fn test_missing_reply_is_recognition_failure() {
        let (transcriber, _) = transcriber(None);
        assert!(matches!(
            transcriber.transcribe(&wav_clip()).await,
            Err(NormalizeError::Unrecognized(_))
        ));
    }
}
