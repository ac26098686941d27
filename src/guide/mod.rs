//! AI guide chat.
//!
//! Submodules:
//! - `prompt`: fixed system instruction and per-question prompt composition.
//! - `gemini`: blocking client for the Gemini `generateContent` endpoint.
//! - `session`: the chat message log and its one-request-at-a-time guard.

pub mod gemini;
pub mod prompt;
pub mod session;

use crate::model::GuideError;

/// One outbound question, fully composed.
///
/// The request is single-turn: earlier chat messages are never included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideRequest {
    pub system_instruction: String,
    pub prompt: String,
    /// Name of the reserve the user was viewing, kept for logging.
    pub context: Option<String>,
}

/// Outcome of one request, kept explicit until the session turns it into a
/// chat bubble.
#[derive(Debug)]
pub enum GuideReply {
    Answered(String),
    Failed(GuideError),
}

impl From<Result<String, GuideError>> for GuideReply {
    fn from(result: Result<String, GuideError>) -> Self {
        match result {
            Ok(text) => GuideReply::Answered(text),
            Err(err) => GuideReply::Failed(err),
        }
    }
}

/// Anything that can answer a guide request: the live Gemini client, the
/// scripted development backend, or a test mock.
#[cfg_attr(test, mockall::automock)]
pub trait GuideBackend: Send + Sync {
    fn generate(&self, request: &GuideRequest) -> Result<String, GuideError>;
}
