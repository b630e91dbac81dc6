use serde::Deserialize;

/// Request payload for /load_repository.
#[derive(Debug, Deserialize)]
pub struct LoadRepositoryRequest {
    /// Local directory path or Git clone URL; detected automatically.
    pub source: String,
    /// Optional branch for URL sources; ignored for local paths.
    #[serde(default)]
    pub branch: Option<String>,
}
