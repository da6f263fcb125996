use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::interview::InterviewStore;
use crate::jobs::JobSearchClient;
use crate::llm_client::{GeminiClient, GenerativeModel};
use crate::normalize::{
    AudioDecoder, ModelTranscriber, PdftoppmRasterizer, ResumeNormalizer, Transcriber,
};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Every generative call goes through this seam. Production: `GeminiClient`.
    pub model: Arc<dyn GenerativeModel>,
    pub jobs: JobSearchClient,
    /// PDF → first-page JPEG (or text layer, per `RESUME_RENDERING`).
    pub normalizer: ResumeNormalizer,
    pub decoder: AudioDecoder,
    pub transcriber: Arc<dyn Transcriber>,
    pub interviews: InterviewStore,
    pub config: Config,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let gemini = GeminiClient::new(
            config.google_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
        )?;
        info!("Gemini client initialized (model: {})", gemini.model());
        let model: Arc<dyn GenerativeModel> = Arc::new(gemini);
        let jobs = JobSearchClient::new(
            config.jsearch_api_key.clone(),
            config.jsearch_base_url.clone(),
        )?;
        let normalizer = ResumeNormalizer::new(
            Arc::new(PdftoppmRasterizer::new(config.pdftoppm_bin.clone())),
            config.resume_rendering,
        );
        let decoder = AudioDecoder::new(config.ffmpeg_bin.clone());
        let transcriber = Arc::new(ModelTranscriber::new(model.clone(), decoder.clone()));

        Ok(Self {
            model,
            jobs,
            normalizer,
            decoder,
            transcriber,
            interviews: InterviewStore::with_idle_ttl(chrono::Duration::seconds(
                config.interview_idle_ttl_secs.into(),
            )),
            config: config.clone(),
        })
    }
}
