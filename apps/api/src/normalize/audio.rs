//! Audio extraction via ffmpeg: mono PCM for pitch analysis, WAV for transcription.

use bytes::Bytes;
use tracing::info;

use super::{run_tool, NormalizeError};

/// All waveforms are resampled to this rate.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

const WAV_MIME_TYPES: [&str; 3] = ["audio/wav", "audio/x-wav", "audio/wave"];

/// An uploaded audio or video clip.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub bytes: Bytes,
    pub mime_type: String,
    /// File extension without the dot, used for the temp file ffmpeg reads.
    pub extension: String,
}

impl AudioClip {
    pub fn new(bytes: Bytes, content_type: Option<&str>, file_name: Option<&str>) -> Self {
        let mime_type = content_type
            .unwrap_or("application/octet-stream")
            .to_ascii_lowercase();
        let extension = file_name
            .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext))
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| extension_for_mime(&mime_type).to_string());
        Self {
            bytes,
            mime_type,
            extension,
        }
    }

    pub fn is_wav(&self) -> bool {
        WAV_MIME_TYPES.contains(&self.mime_type.as_str()) || self.extension == "wav"
    }
}

fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "video/mp4" | "audio/mp4" => "mp4",
        "audio/webm" | "video/webm" => "webm",
        "audio/ogg" => "ogg",
        "audio/mpeg" => "mp3",
        m if WAV_MIME_TYPES.contains(&m) => "wav",
        _ => "bin",
    }
}

/// Mono waveform at a known sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Waveform {
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Thin wrapper over the ffmpeg binary.
#[derive(Debug, Clone)]
pub struct AudioDecoder {
    ffmpeg_bin: String,
}

impl AudioDecoder {
    pub fn new(ffmpeg_bin: impl Into<String>) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
        }
    }

    /// Extracts the audio track as mono `f32` samples at `TARGET_SAMPLE_RATE`.
    pub async fn decode_mono(&self, clip: &AudioClip) -> Result<Waveform, NormalizeError> {
        let pcm = self.convert(clip, &["-f", "f32le", "-acodec", "pcm_f32le"]).await?;
        let samples = pcm_f32le_to_samples(&pcm);
        if samples.is_empty() {
            return Err(NormalizeError::InvalidAudio(
                "clip contains no audio samples".to_string(),
            ));
        }
        let waveform = Waveform {
            samples,
            sample_rate: TARGET_SAMPLE_RATE,
        };
        info!(
            "Decoded {:.1}s of audio from {} ({} bytes)",
            waveform.duration_secs(),
            clip.extension,
            clip.bytes.len()
        );
        Ok(waveform)
    }

    /// Re-encodes the clip as a mono 16 kHz WAV file.
    pub async fn to_wav(&self, clip: &AudioClip) -> Result<Vec<u8>, NormalizeError> {
        self.convert(clip, &["-f", "wav"]).await
    }

    async fn convert(&self, clip: &AudioClip, format_args: &[&str]) -> Result<Vec<u8>, NormalizeError> {
        if clip.bytes.is_empty() {
            return Err(NormalizeError::InvalidAudio("clip is empty".to_string()));
        }

        // Containers like MP4 keep their index at the end, so ffmpeg needs a seekable file.
        // The guard removes the file when it drops, on the error path too.
        let input = tempfile::Builder::new()
            .prefix("prepwise-clip-")
            .suffix(&format!(".{}", clip.extension))
            .tempfile()?;
        tokio::fs::write(input.path(), &clip.bytes).await?;

        let rate = TARGET_SAMPLE_RATE.to_string();
        let mut args: Vec<&std::ffi::OsStr> = Vec::new();
        for arg in ["-hide_banner", "-loglevel", "error", "-nostdin", "-i"] {
            args.push(arg.as_ref());
        }
        args.push(input.path().as_os_str());
        for arg in ["-vn", "-ac", "1", "-ar", rate.as_str()] {
            args.push(arg.as_ref());
        }
        for arg in format_args {
            args.push(arg.as_ref());
        }
        args.push("pipe:1".as_ref());

        run_tool(&self.ffmpeg_bin, args, None)
            .await
            .map_err(|e| match e {
                NormalizeError::ToolFailed { stderr, .. } => NormalizeError::InvalidAudio(stderr),
                other => other,
            })
    }
}

/// Reinterprets little-endian `f32` PCM. A trailing partial sample is dropped.
pub fn pcm_f32le_to_samples(pcm: &[u8]) -> Vec<f32> {
    pcm.chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
