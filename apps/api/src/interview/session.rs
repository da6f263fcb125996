//! The mock-interview session record and its event-driven state machine.
//!
//! `Idle → QuestionPosed → AnswerEvaluated → … → FeedbackGiven → Idle (on restart)`.
//! `apply` never mutates in place: it returns the next record, so a failed model call
//! upstream leaves the stored session untouched.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Answers per overall-feedback batch.
pub const FEEDBACK_BATCH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MockTopic {
    Python,
    #[serde(rename = "SQL", alias = "Sql", alias = "sql")]
    Sql,
}

impl fmt::Display for MockTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MockTopic::Python => "Python",
            MockTopic::Sql => "SQL",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MockDifficulty {
    Easy,
    Intermediate,
    Hard,
}

impl fmt::Display for MockDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MockDifficulty::Easy => "Easy",
            MockDifficulty::Intermediate => "Intermediate",
            MockDifficulty::Hard => "Hard",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewPhase {
    Idle,
    QuestionPosed,
    AnswerEvaluated,
    FeedbackGiven,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InterviewError {
    #[error("the interview has already started; restart it first")]
    AlreadyStarted,

    #[error("the interview has not started yet")]
    NotStarted,

    #[error("answer is empty")]
    EmptyAnswer,

    #[error("overall feedback is not due: {answers} answers, {given} feedback rounds")]
    FeedbackNotDue { answers: usize, given: usize },
}

#[derive(Debug, Clone)]
pub enum InterviewEvent {
    Started {
        question: String,
    },
    Answered {
        answer: String,
        evaluation: String,
        next_question: String,
    },
    FeedbackGiven {
        feedback: String,
    },
    Restarted,
}

#[derive(Debug, Clone, Serialize)]
pub struct MockInterview {
    pub id: Uuid,
    pub topic: MockTopic,
    pub difficulty: MockDifficulty,
    pub phase: InterviewPhase,
    pub question: Option<String>,
    pub answers: Vec<String>,
    pub last_evaluation: Option<String>,
    pub feedback: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MockInterview {
    pub fn new(topic: MockTopic, difficulty: MockDifficulty) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            topic,
            difficulty,
            phase: InterviewPhase::Idle,
            question: None,
            answers: Vec::new(),
            last_evaluation: None,
            feedback: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn ensure_can_start(&self) -> Result<(), InterviewError> {
        match self.phase {
            InterviewPhase::Idle => Ok(()),
            _ => Err(InterviewError::AlreadyStarted),
        }
    }

    /// Answers are accepted in every phase except `Idle`; feedback does not end the loop.
    pub fn ensure_accepting_answers(&self) -> Result<(), InterviewError> {
        match self.phase {
            InterviewPhase::Idle => Err(InterviewError::NotStarted),
            _ => Ok(()),
        }
    }

    /// True when a full batch of answers has no feedback yet.
    pub fn feedback_due(&self) -> bool {
        self.answers.len() / FEEDBACK_BATCH > self.feedback.len()
    }

    pub fn apply(&self, event: InterviewEvent) -> Result<Self, InterviewError> {
        let mut next = self.clone();
        match event {
            InterviewEvent::Started { question } => {
                self.ensure_can_start()?;
                next.question = Some(question);
                next.phase = InterviewPhase::QuestionPosed;
            }
            InterviewEvent::Answered {
                answer,
                evaluation,
                next_question,
            } => {
                self.ensure_accepting_answers()?;
                if answer.trim().is_empty() {
                    return Err(InterviewError::EmptyAnswer);
                }
                next.answers.push(answer);
                next.last_evaluation = Some(evaluation);
                next.question = Some(next_question);
                next.phase = InterviewPhase::AnswerEvaluated;
            }
            InterviewEvent::FeedbackGiven { feedback } => {
                if !self.feedback_due() {
                    return Err(InterviewError::FeedbackNotDue {
                        answers: self.answers.len(),
                        given: self.feedback.len(),
                    });
                }
                next.feedback.push(feedback);
                next.phase = InterviewPhase::FeedbackGiven;
            }
            InterviewEvent::Restarted => {
                next.phase = InterviewPhase::Idle;
                next.question = None;
                next.answers.clear();
                next.last_evaluation = None;
                next.feedback.clear();
            }
        }
        next.updated_at = Utc::now();
        Ok(next)
    }
}
