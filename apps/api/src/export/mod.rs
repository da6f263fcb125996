// Export Renderer: stateless text → DOCX and text → PDF transforms.
// No layout intelligence; the model's text is written as-is.

pub mod docx;
pub mod font_metrics;
pub mod pdf;

use axum::http::header;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub use docx::{render_docx, OPTIMIZED_RESUME_HEADING};
pub use pdf::render_text_pdf;

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("DOCX export failed: {0}")]
    Docx(String),

    #[error("PDF export failed: {0}")]
    Pdf(String),
}

/// A rendered file returned as an attachment download.
#[derive(Debug, Clone)]
pub struct Download {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub file_name: &'static str,
}

impl Download {
    pub fn docx(bytes: Vec<u8>, file_name: &'static str) -> Self {
        Self {
            bytes,
            mime_type: DOCX_MIME,
            file_name,
        }
    }

    pub fn pdf(bytes: Vec<u8>, file_name: &'static str) -> Self {
        Self {
            bytes,
            mime_type: PDF_MIME,
            file_name,
        }
    }
}

impl IntoResponse for Download {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, self.mime_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", self.file_name),
                ),
            ],
            self.bytes,
        )
            .into_response()
    }
}
