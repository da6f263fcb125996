//! Prompt Composer — pure functions that merge a fixed template with user content into a
//! `ModelRequest`. No I/O, no validation beyond literal placeholder substitution.

pub mod templates;

use std::fmt::Display;

use crate::llm_client::{ContentPart, ModelRequest};
use crate::normalize::pitch::PitchAnalysis;

pub use templates::PromptTemplate;

/// The model is told to answer with exactly this when a clip has no intelligible speech.
pub const NO_SPEECH_MARKER: &str = "[NO_SPEECH]";

const TRANSCRIPTION_INSTRUCTION: &str = "Transcribe the spoken words in this audio clip \
verbatim. Reply with the transcript only, no commentary. If the clip contains no intelligible \
speech, reply with exactly [NO_SPEECH].";

/// Resume actions: `[template, resume part, job description]`, the order the model expects.
/// A blank description is left out, since Gemini rejects empty text parts.
pub fn compose_resume_request(
    template: PromptTemplate,
    resume: ContentPart,
    job_description: &str,
) -> ModelRequest {
    let request = ModelRequest::prompt(template.body()).with_part(resume);
    if job_description.trim().is_empty() {
        request
    } else {
        request.with_text(job_description)
    }
}

/// Bulk interview questions from the question-generation template.
pub fn compose_question_request(
    level: impl Display,
    topic: impl Display,
    with_answers: bool,
) -> ModelRequest {
    let answers = if with_answers {
        templates::WITH_ANSWERS
    } else {
        templates::QUESTIONS_ONLY
    };
    let prompt = PromptTemplate::QuestionGeneration
        .body()
        .replace("{level}", &level.to_string())
        .replace("{topic}", &topic.to_string())
        .replace("{answers}", answers);
    ModelRequest::prompt(prompt)
}

pub fn compose_dsa_request(difficulty: impl Display) -> ModelRequest {
    ModelRequest::prompt(format!(
        "Generate {difficulty} DSA questions for Data Science with answers."
    ))
}

pub fn compose_mock_question(difficulty: impl Display, topic: impl Display) -> ModelRequest {
    ModelRequest::prompt(format!(
        "Generate a {difficulty} difficulty interview question for {topic}."
    ))
}

pub fn compose_answer_evaluation(answer: &str) -> ModelRequest {
    ModelRequest::prompt(format!("Evaluate this interview answer: {answer}"))
}

/// Prior answers are re-concatenated into a fresh prompt; no conversation state is kept.
pub fn compose_overall_feedback(answers: &[String]) -> ModelRequest {
    ModelRequest::prompt(format!(
        "Overall feedback on these answers: {}",
        answers.join("\n")
    ))
}

pub fn compose_candidate_evaluation(job_description: &str, speech: &PitchAnalysis) -> ModelRequest {
    ModelRequest::prompt(format!(
        "Evaluate candidate:
Job Description: {job_description}
Speech Analysis: Avg Pitch: {:.2} Hz, Pitch Variability: {:.2}, Confidence Score: {:.1}/100
Assess projects from audio and alignment with job requirements.
Provide: Qualification (Yes/No), Strengths/Weaknesses, Recommendations.",
        speech.mean_hz, speech.std_hz, speech.confidence
    ))
}

/// The voice assistant forwards the transcript as the whole prompt.
pub fn compose_voice_request(transcript: &str) -> ModelRequest {
    ModelRequest::prompt(transcript)
}

pub fn compose_transcription_request(wav_base64: String) -> ModelRequest {
    ModelRequest::prompt(TRANSCRIPTION_INSTRUCTION)
        .with_part(ContentPart::inline("audio/wav", wav_base64))
}
