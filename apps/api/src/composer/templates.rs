// Fixed instructional templates. Each request starts from exactly one of these.

use serde::{Deserialize, Serialize};

/// The five enumerated prompt templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptTemplate {
    ProfileReview,
    MatchPercentage,
    LearningPath,
    ResumeOptimization,
    QuestionGeneration,
}

impl PromptTemplate {
    #[cfg(test)]
    pub const ALL: [PromptTemplate; 5] = [
        PromptTemplate::ProfileReview,
        PromptTemplate::MatchPercentage,
        PromptTemplate::LearningPath,
        PromptTemplate::ResumeOptimization,
        PromptTemplate::QuestionGeneration,
    ];

    pub fn id(self) -> &'static str {
        match self {
            PromptTemplate::ProfileReview => "profile-review",
            PromptTemplate::MatchPercentage => "match-percentage",
            PromptTemplate::LearningPath => "learning-path",
            PromptTemplate::ResumeOptimization => "resume-optimization",
            PromptTemplate::QuestionGeneration => "question-generation",
        }
    }

    pub fn body(self) -> &'static str {
        match self {
            PromptTemplate::ProfileReview => PROFILE_REVIEW,
            PromptTemplate::MatchPercentage => MATCH_PERCENTAGE,
            PromptTemplate::LearningPath => LEARNING_PATH,
            PromptTemplate::ResumeOptimization => RESUME_OPTIMIZATION,
            PromptTemplate::QuestionGeneration => QUESTION_GENERATION,
        }
    }
}

pub const PROFILE_REVIEW: &str = "\
You are an experienced HR with tech expertise in Data Science, Full Stack, Web Development, \
Big Data Engineering, DevOps, or Data Analysis.
Your task is to review the provided resume against the job description for these roles.
Please evaluate the candidate's profile, highlighting strengths and weaknesses in relation to \
the specified job role.";

pub const MATCH_PERCENTAGE: &str = "\
You are a skilled ATS (Applicant Tracking System) scanner with expertise in Data Science, \
Full Stack, Web Development, Big Data Engineering, DevOps, and Data Analysis.
Your task is to evaluate the resume against the job description. Provide:
1. The percentage match.
2. Keywords missing.
3. Final evaluation.";

pub const LEARNING_PATH: &str = "\
You are an experienced learning coach and technical expert. Create a 6-month personalized \
study plan for an individual aiming to excel in the role described by the job description, \
focusing on the skills, topics, and tools specified in the provided job description. \
Ensure the study plan includes:
- A list of topics and tools for each month.
- Suggested resources (books, online courses, documentation).
- Recommended practical exercises or projects.
- Periodic assessments or milestones.
- Tips for real-world applications.";

pub const RESUME_OPTIMIZATION: &str = "\
You are an AI-powered resume optimization expert. Your task is to enhance the provided resume \
for ATS (Applicant Tracking System) compatibility based on the job description.
Ensure the resume includes:
- Relevant keywords from the job description.
- Proper formatting for ATS readability.
- Optimized bullet points for skills and achievements.
- Improved professional summary.
- Updated job titles and descriptions as per industry standards.
Generate the optimized resume content in a structured format.";

/// Replace `{level}`, `{topic}` and `{answers}` before sending.
pub const QUESTION_GENERATION: &str = "\
Generate 30 {level} interview questions for {topic}.
{answers}";

pub const WITH_ANSWERS: &str = "Also provide answers.";
pub const QUESTIONS_ONLY: &str = "Only provide questions.";
