use thiserror::Error;

pub type Result<T> = std::result::Result<T, BlueprintError>;

/// Errors from interpreting an LLM response as a diagram blueprint.
///
/// Callers are expected to treat this as a signal to fall back to the
/// deterministic blueprint, not to surface it to the user.
#[derive(Debug, Error)]
pub enum BlueprintError {
    /// The response was not a JSON object matching the blueprint schema.
    #[error("malformed blueprint JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}
