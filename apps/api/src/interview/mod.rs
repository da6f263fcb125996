// Speech-based mock interview: session record, model-backed transitions, session map, HTTP.

pub mod flow;
pub mod handlers;
pub mod session;
pub mod store;

pub use session::{MockDifficulty, MockInterview, MockTopic};
pub use store::InterviewStore;
