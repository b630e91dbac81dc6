use serde::{Deserialize, Serialize};

/// Body of `POST /ask_question`.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Natural language question about the loaded repository.
    pub question: String,
}

/// Answer envelope returned by `POST /ask_question`.
///
/// The answer is plain text; placeholder answers (no repository loaded,
/// gateway failure) use the same field.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}
