use serde::Deserialize;

/// Request payload for /generate_diagram.
#[derive(Debug, Deserialize)]
pub struct GenerateDiagramRequest {
    /// Wire name of the diagram family, e.g. "ARCHITECTURE_DIAGRAM" or
    /// "SEQUENCE_DIAGRAM". Unknown values render as an architecture diagram.
    pub diagram_type: String,
    /// Optional area to emphasize, e.g. "authentication flow".
    #[serde(default)]
    pub focus: Option<String>,
}
