//! Interview-question and DSA-question generation.

pub mod handlers;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::composer::{compose_dsa_request, compose_question_request};
use crate::errors::AppError;
use crate::export::{render_text_pdf, Download};
use crate::llm_client::GenerativeModel;

pub const QUESTIONS_PDF_FILE: &str = "interview_questions.pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionLevel {
    Basic,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionTopic {
    #[default]
    #[serde(rename = "Data Science")]
    DataScience,
    Python,
    #[serde(rename = "Machine Learning")]
    MachineLearning,
    #[serde(rename = "Deep Learning")]
    DeepLearning,
    #[serde(rename = "Docker for Data Science")]
    DockerForDataScience,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DsaDifficulty {
    Easy,
    Intermediate,
    Advanced,
}

impl fmt::Display for QuestionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuestionLevel::Basic => "Basic",
            QuestionLevel::Intermediate => "Intermediate",
            QuestionLevel::Advanced => "Advanced",
        })
    }
}

impl fmt::Display for QuestionTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuestionTopic::DataScience => "Data Science",
            QuestionTopic::Python => "Python",
            QuestionTopic::MachineLearning => "Machine Learning",
            QuestionTopic::DeepLearning => "Deep Learning",
            QuestionTopic::DockerForDataScience => "Docker for Data Science",
        })
    }
}

impl fmt::Display for DsaDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DsaDifficulty::Easy => "Easy",
            DsaDifficulty::Intermediate => "Intermediate",
            DsaDifficulty::Advanced => "Advanced",
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRequest {
    pub level: QuestionLevel,
    #[serde(default)]
    pub topic: QuestionTopic,
    #[serde(default)]
    pub with_answers: bool,
}

pub async fn generate_questions(
    model: &dyn GenerativeModel,
    req: &QuestionRequest,
) -> Result<String, AppError> {
    let request = compose_question_request(req.level, req.topic, req.with_answers);
    Ok(model.generate_text(&request).await?)
}

/// Same generation as `generate_questions`, exported as a flat-text PDF.
pub async fn generate_questions_pdf(
    model: &dyn GenerativeModel,
    req: &QuestionRequest,
) -> Result<Download, AppError> {
    let questions = generate_questions(model, req).await?;
    let bytes = render_text_pdf(&questions)?;
    Ok(Download::pdf(bytes, QUESTIONS_PDF_FILE))
}

pub async fn generate_dsa(
    model: &dyn GenerativeModel,
    difficulty: DsaDifficulty,
) -> Result<String, AppError> {
    Ok(model.generate_text(&compose_dsa_request(difficulty)).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm_client::{LlmError, ModelRequest, ModelResponse, FALLBACK_RESPONSE};

    #[derive(Default)]
    struct EchoModel {
        prompts: Mutex<Vec<String>>,
        empty: bool,
    }

    #[async_trait]
    impl GenerativeModel for EchoModel {
        async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, LlmError> {
            let prompt = request.text_parts().join("");
            self.prompts.lock().unwrap().push(prompt.clone());
            if self.empty {
                return Ok(ModelResponse::default());
            }
            Ok(ModelResponse::from_text(format!("1. {prompt}")))
        }
    }

    #[test]
    fn test_request_defaults() {
        let req: QuestionRequest = serde_json::from_str(r#"{"level":"Basic"}"#).unwrap();
        assert_eq!(req.level, QuestionLevel::Basic);
        assert_eq!(req.topic, QuestionTopic::DataScience);
        assert!(!req.with_answers);
    }

    #[test]
    fn test_topic_accepts_display_names() {
        let req: QuestionRequest = serde_json::from_str(
            r#"{"level":"Advanced","topic":"Docker for Data Science","with_answers":true}"#,
        )
        .unwrap();
        assert_eq!(req.topic, QuestionTopic::DockerForDataScience);
        assert!(serde_json::from_str::<QuestionRequest>(r#"{"level":"Expert"}"#).is_err());
    }

    #[tokio::test]
    async fn test_generate_questions_prompt() {
        let model = EchoModel::default();
        let req = QuestionRequest {
            level: QuestionLevel::Intermediate,
            topic: QuestionTopic::MachineLearning,
            with_answers: false,
        };
        generate_questions(&model, &req).await.unwrap();
        assert_eq!(
            model.prompts.lock().unwrap()[0],
            "Generate 30 Intermediate interview questions for Machine Learning.\nOnly provide questions."
        );
    }

    #[tokio::test]
    async fn test_questions_pdf_download() {
        let model = EchoModel::default();
        let req = QuestionRequest {
            level: QuestionLevel::Basic,
            topic: QuestionTopic::Python,
            with_answers: true,
        };
        let download = generate_questions_pdf(&model, &req).await.unwrap();
        assert_eq!(download.file_name, QUESTIONS_PDF_FILE);
        assert!(download.bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_dsa_prompt_and_fallback() {
        let model = EchoModel {
            empty: true,
            ..Default::default()
        };
        let text = generate_dsa(&model, DsaDifficulty::Advanced).await.unwrap();
        assert_eq!(text, FALLBACK_RESPONSE);
        assert_eq!(
            model.prompts.lock().unwrap()[0],
            "Generate Advanced DSA questions for Data Science with answers."
        );
    }
}
