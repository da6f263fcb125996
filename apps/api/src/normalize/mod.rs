// Content Normalizer: turns uploads into something the model can consume.
// Rasterization and audio decoding shell out to poppler / ffmpeg; pitch analysis is pure Rust.

pub mod audio;
pub mod pdf;
pub mod pitch;
pub mod transcribe;

use std::ffi::OsStr;
use std::process::Stdio;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::llm_client::LlmError;

pub use audio::{AudioClip, AudioDecoder, Waveform};
pub use pdf::{PageRasterizer, PdftoppmRasterizer, ResumeDocument, ResumeNormalizer};
pub use transcribe::{ModelTranscriber, Transcriber};

/// Error type for normalization. Maps onto `AppError::Decode` / `Recognition` at the edge.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("{tool} binary not found: {source}")]
    ToolNotFound {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} failed (exit code {exit_code:?}): {stderr}")]
    ToolFailed {
        tool: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("invalid PDF: {0}")]
    InvalidPdf(String),

    #[error("renderer produced no image for the first page")]
    EmptyRender,

    #[error("invalid audio: {0}")]
    InvalidAudio(String),

    #[error("speech not recognized: {0}")]
    Unrecognized(String),

    #[error("transcription call failed: {0}")]
    Transcription(#[from] LlmError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How the resume is handed to the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResumeRendering {
    /// First page rendered to JPEG and sent as inline image data.
    #[default]
    FirstPageImage,
    /// Text layer extracted from the whole document and sent as a text part.
    ExtractedText,
}

impl FromStr for ResumeRendering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(ResumeRendering::FirstPageImage),
            "text" => Ok(ResumeRendering::ExtractedText),
            other => Err(format!("unknown resume rendering mode '{other}'")),
        }
    }
}

/// Runs an external tool to completion, optionally feeding `stdin`, and returns its stdout.
pub(crate) async fn run_tool<I, S>(
    bin: &str,
    args: I,
    stdin: Option<Vec<u8>>,
) -> Result<Vec<u8>, NormalizeError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = tokio::process::Command::new(bin);
    command
        .args(args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command.spawn().map_err(|source| NormalizeError::ToolNotFound {
        tool: bin.to_string(),
        source,
    })?;

    // Feed stdin from a separate task so a full stdout pipe cannot deadlock the write.
    let writer = match (stdin, child.stdin.take()) {
        (Some(input), Some(mut pipe)) => Some(tokio::spawn(async move {
            pipe.write_all(&input).await?;
            pipe.shutdown().await
        })),
        _ => None,
    };

    let output = child.wait_with_output().await?;

    if let Some(writer) = writer {
        match writer.await {
            Ok(Ok(())) => {}
            // The tool may exit before reading everything; its exit status tells the story.
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(e.into()),
            Err(join) => return Err(std::io::Error::other(join.to_string()).into()),
        }
    }

    if !output.status.success() {
        return Err(NormalizeError::ToolFailed {
            tool: bin.to_string(),
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    debug!("{bin} produced {} bytes", output.stdout.len());
    Ok(output.stdout)
}

/// True when `bin` can be spawned. Used by tests that need poppler or ffmpeg.
#[cfg(test)]
pub(crate) fn tool_available(bin: &str, version_flag: &str) -> bool {
    std::process::Command::new(bin)
        .arg(version_flag)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}
