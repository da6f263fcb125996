//! Input Collector for multipart forms: text fields and uploaded files, keyed by field name.

use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub bytes: Bytes,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Default)]
pub struct UploadForm {
    texts: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl UploadForm {
    /// Drains the multipart stream. A part with a filename is a file, anything else is text.
    /// Repeated field names keep the last value.
    pub async fn collect(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);

            if file_name.is_some() {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read {name}: {e}")))?;
                debug!("Received file field {} ({} bytes)", name, bytes.len());
                form.files.insert(
                    name,
                    UploadedFile {
                        bytes,
                        file_name,
                        content_type,
                    },
                );
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read {name}: {e}")))?;
                form.texts.insert(name, text);
            }
        }
        Ok(form)
    }

    /// Raw text of a field; absent fields read as empty.
    pub fn text(&self, name: &str) -> &str {
        self.texts.get(name).map(String::as_str).unwrap_or("")
    }

    /// The named file, or `None` when it is absent or empty.
    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name).filter(|f| !f.bytes.is_empty())
    }

    /// Like `take_file`, but a missing upload becomes `InputMissing` with `message`.
    pub fn require_file(&mut self, name: &str, message: &str) -> Result<UploadedFile, AppError> {
        self.take_file(name)
            .ok_or_else(|| AppError::InputMissing(message.to_string()))
    }

    #[cfg(test)]
    pub fn from_parts(texts: &[(&str, &str)], files: Vec<(&str, UploadedFile)>) -> Self {
        Self {
            texts: texts
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: files
                .into_iter()
                .map(|(k, f)| (k.to_string(), f))
                .collect(),
        }
    }
}
