//! Resume normalization: first-page rasterization (or text extraction) of an uploaded PDF.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use tracing::{debug, info};

use super::{run_tool, NormalizeError, ResumeRendering};
use crate::llm_client::ContentPart;

pub const RESUME_IMAGE_MIME: &str = "image/jpeg";

/// Resolution handed to the rasterizer.
const RENDER_DPI: u32 = 200;

/// An uploaded resume. Only the raw bytes are kept; rendering happens on demand.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub bytes: Bytes,
    pub file_name: Option<String>,
}

impl ResumeDocument {
    pub fn new(bytes: Bytes, file_name: Option<String>) -> Self {
        Self { bytes, file_name }
    }

    /// Rejects anything that does not start with a PDF header.
    pub fn ensure_pdf(&self) -> Result<(), NormalizeError> {
        if self.bytes.is_empty() {
            return Err(NormalizeError::InvalidPdf("file is empty".to_string()));
        }
        // Readers accept up to 1KB of leading bytes before the header.
        let window = &self.bytes[..self.bytes.len().min(1024)];
        if !window.windows(5).any(|w| w == b"%PDF-") {
            return Err(NormalizeError::InvalidPdf(
                "missing %PDF- header".to_string(),
            ));
        }
        Ok(())
    }
}

/// Renders the first page of a PDF to JPEG bytes.
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    async fn render_first_page(&self, pdf: &[u8]) -> Result<Vec<u8>, NormalizeError>;
}

/// Poppler-backed rasterizer: `pdftoppm -f 1 -l 1 -singlefile -jpeg -r 200 -`,
/// PDF on stdin, JPEG on stdout.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    bin: String,
}

impl PdftoppmRasterizer {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

#[async_trait]
impl PageRasterizer for PdftoppmRasterizer {
    async fn render_first_page(&self, pdf: &[u8]) -> Result<Vec<u8>, NormalizeError> {
        let dpi = RENDER_DPI.to_string();
        let args = [
            "-f",
            "1",
            "-l",
            "1",
            "-singlefile",
            "-jpeg",
            "-r",
            dpi.as_str(),
            "-",
        ];
        let image = run_tool(&self.bin, args, Some(pdf.to_vec()))
            .await
            .map_err(|e| match e {
                NormalizeError::ToolFailed { stderr, .. } => NormalizeError::InvalidPdf(stderr),
                other => other,
            })?;
        if image.is_empty() {
            return Err(NormalizeError::EmptyRender);
        }
        Ok(image)
    }
}

/// Turns a `ResumeDocument` into the content part sent alongside the prompt.
#[derive(Clone)]
pub struct ResumeNormalizer {
    rasterizer: Arc<dyn PageRasterizer>,
    rendering: ResumeRendering,
}

impl ResumeNormalizer {
    pub fn new(rasterizer: Arc<dyn PageRasterizer>, rendering: ResumeRendering) -> Self {
        Self {
            rasterizer,
            rendering,
        }
    }

    pub fn rendering(&self) -> ResumeRendering {
        self.rendering
    }

    pub async fn normalize(&self, resume: &ResumeDocument) -> Result<ContentPart, NormalizeError> {
        resume.ensure_pdf()?;
        match self.rendering {
            ResumeRendering::FirstPageImage => {
                let encoded = self.first_page_base64(resume).await?;
                Ok(ContentPart::inline(RESUME_IMAGE_MIME, encoded))
            }
            ResumeRendering::ExtractedText => {
                let text = extract_text(resume.bytes.clone()).await?;
                Ok(ContentPart::text(text))
            }
        }
    }

    /// Base64 of the first page rendered as JPEG.
    pub async fn first_page_base64(&self, resume: &ResumeDocument) -> Result<String, NormalizeError> {
        let image = self.rasterizer.render_first_page(&resume.bytes).await?;
        info!(
            "Rendered first page of {} ({} PDF bytes -> {} JPEG bytes)",
            resume.file_name.as_deref().unwrap_or("uploaded resume"),
            resume.bytes.len(),
            image.len()
        );
        Ok(STANDARD.encode(image))
    }
}

/// Extracts the text layer with `pdf-extract`. CPU-bound, so it runs on the blocking pool.
async fn extract_text(pdf: Bytes) -> Result<String, NormalizeError> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf))
        .await
        .map_err(|e| NormalizeError::Io(std::io::Error::other(e.to_string())))?
        .map_err(|e| NormalizeError::InvalidPdf(e.to_string()))?;

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(NormalizeError::InvalidPdf(
            "no text layer found in PDF".to_string(),
        ));
    }
    debug!("Extracted {} chars of resume text", text.len());
    Ok(text)
}
