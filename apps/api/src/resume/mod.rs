//! Resume pipeline: one code path for every resume panel, parameterized by template.

pub mod handlers;

use tracing::info;

use crate::composer::{compose_resume_request, PromptTemplate};
use crate::errors::AppError;
use crate::export::{render_docx, Download, OPTIMIZED_RESUME_HEADING};
use crate::llm_client::GenerativeModel;
use crate::normalize::{ResumeDocument, ResumeNormalizer};

pub const OPTIMIZED_RESUME_FILE: &str = "optimized_resume.docx";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeAction {
    Review,
    Match,
    LearningPath,
    Optimize,
}

impl ResumeAction {
    pub fn template(self) -> PromptTemplate {
        match self {
            ResumeAction::Review => PromptTemplate::ProfileReview,
            ResumeAction::Match => PromptTemplate::MatchPercentage,
            ResumeAction::LearningPath => PromptTemplate::LearningPath,
            ResumeAction::Optimize => PromptTemplate::ResumeOptimization,
        }
    }
}

/// Normalize → compose → invoke. Returns the model text (or the fallback string).
pub async fn run_action(
    model: &dyn GenerativeModel,
    normalizer: &ResumeNormalizer,
    action: ResumeAction,
    resume: &ResumeDocument,
    job_description: &str,
) -> Result<String, AppError> {
    let content = normalizer.normalize(resume).await?;
    let request = compose_resume_request(action.template(), content, job_description);
    let text = model.generate_text(&request).await?;
    info!(
        "Resume action {} completed ({:?}, {} chars)",
        action.template().id(),
        normalizer.rendering(),
        text.len()
    );
    Ok(text)
}

/// Runs the optimization prompt and wraps the reply in a Word document.
pub async fn optimize_to_docx(
    model: &dyn GenerativeModel,
    normalizer: &ResumeNormalizer,
    resume: &ResumeDocument,
    job_description: &str,
) -> Result<Download, AppError> {
    let text = run_action(
        model,
        normalizer,
        ResumeAction::Optimize,
        resume,
        job_description,
    )
    .await?;
    let bytes = render_docx(OPTIMIZED_RESUME_HEADING, &text)?;
    Ok(Download::docx(bytes, OPTIMIZED_RESUME_FILE))
}
