//! Model-backed transitions. Each function computes the model replies first and only then
//! applies the event, so a failed call leaves the caller's session as it was.

use serde::Serialize;
use tracing::info;

use crate::composer::{compose_answer_evaluation, compose_mock_question, compose_overall_feedback};
use crate::errors::AppError;
use crate::llm_client::GenerativeModel;

use super::session::{InterviewEvent, MockInterview};

#[derive(Debug, Clone, Serialize)]
pub struct AnswerOutcome {
    pub answer: String,
    pub evaluation: String,
    pub next_question: String,
    /// Present only on the answer that completes a batch.
    pub feedback: Option<String>,
}

async fn next_question(
    model: &dyn GenerativeModel,
    session: &MockInterview,
) -> Result<String, AppError> {
    let request = compose_mock_question(session.difficulty, session.topic);
    Ok(model.generate_text(&request).await?)
}

pub async fn start(
    model: &dyn GenerativeModel,
    session: &MockInterview,
) -> Result<MockInterview, AppError> {
    session.ensure_can_start()?;
    let question = next_question(model, session).await?;
    info!(session_id = %session.id, "Mock interview started");
    Ok(session.apply(InterviewEvent::Started { question })?)
}

pub async fn submit_answer(
    model: &dyn GenerativeModel,
    session: &MockInterview,
    answer: &str,
) -> Result<(MockInterview, AnswerOutcome), AppError> {
    session.ensure_accepting_answers()?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(AppError::InputMissing("Please provide an answer.".to_string()));
    }

    let evaluation = model
        .generate_text(&compose_answer_evaluation(answer))
        .await?;
    let question = next_question(model, session).await?;

    let mut next = session.apply(InterviewEvent::Answered {
        answer: answer.to_string(),
        evaluation: evaluation.clone(),
        next_question: question.clone(),
    })?;

    let feedback = if next.feedback_due() {
        let text = model
            .generate_text(&compose_overall_feedback(&next.answers))
            .await?;
        next = next.apply(InterviewEvent::FeedbackGiven {
            feedback: text.clone(),
        })?;
        info!(
            session_id = %next.id,
            answers = next.answers.len(),
            "Overall feedback given"
        );
        Some(text)
    } else {
        None
    };

    Ok((
        next,
        AnswerOutcome {
            answer: answer.to_string(),
            evaluation,
            next_question: question,
            feedback,
        },
    ))
}

pub fn restart(session: &MockInterview) -> Result<MockInterview, AppError> {
    Ok(session.apply(InterviewEvent::Restarted)?)
}
