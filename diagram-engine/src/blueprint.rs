//! Blueprint model, LLM response parsing, and the deterministic fallback.
//!
//! A [`Blueprint`] is the structured node/edge description of a system,
//! independent of any rendering dialect. It arrives one of two ways:
//! - parsed from an LLM response via [`parse_blueprint`] (the model is asked
//!   for bare JSON but routinely wraps it in a code fence, which is stripped)
//! - built locally via [`fallback_blueprint`] when the LLM call or the parse
//!   fails, grouping the file index by top-level directory
//!
//! Every field is defaulted so a sparse LLM response still deserializes;
//! the renderer tolerates whatever is missing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use repo_indexer::RepositoryIndex;

use crate::errors::Result;

/// Structured node/edge description of a system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Blueprint {
    #[serde(default)]
    pub diagram_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub granularity: String,
    /// Layout hint; only the flowchart dialect reads it.
    #[serde(default = "default_layout")]
    pub layout: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    /// Derived counts, recomputed via [`Blueprint::refresh_metadata`].
    #[serde(default)]
    pub metadata: BlueprintMetadata,
}

/// One diagram element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    /// Shape selector: `component`, `service`, `database`, `actor`,
    /// `external`, `module`, or `class`.
    #[serde(rename = "type", default = "default_node_kind")]
    pub kind: String,
}

/// One directed connection between node ids.
///
/// Endpoints are not validated against `nodes`; a dangling reference is
/// rendered as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub label: String,
}

/// Counts derived from the node and edge lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlueprintMetadata {
    #[serde(default)]
    pub node_count: usize,
    #[serde(default)]
    pub edge_count: usize,
}

fn default_layout() -> String {
    "top-down".to_string()
}

fn default_node_kind() -> String {
    "component".to_string()
}

impl Blueprint {
    /// Recomputes the derived node/edge counts.
    pub fn refresh_metadata(&mut self) {
        self.metadata = BlueprintMetadata {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
        };
    }
}

/// Parses an LLM response into a [`Blueprint`].
///
/// The model is instructed to return only a JSON object, but in practice it
/// often wraps the object in a Markdown code fence. A leading ```` ```json ````
/// (checked first) or bare ```` ``` ```` marker and a trailing ```` ``` ````
/// marker are stripped before parsing.
///
/// # Errors
/// [`BlueprintError::Malformed`](crate::errors::BlueprintError) if the
/// remainder is not a JSON object matching the schema.
pub fn parse_blueprint(raw: &str) -> Result<Blueprint> {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    Ok(serde_json::from_str(text.trim())?)
}

/// Builds a blueprint directly from the file index, with no LLM involved.
///
/// Files are grouped by their top-level path segment; files at the repository
/// root form a synthetic `root` group. Groups keep first-occurrence order,
/// which is deterministic because the index itself is sorted. Each group
/// becomes one `module` node and consecutive groups are joined by a linear
/// chain of unlabeled edges.
pub fn fallback_blueprint(index: &RepositoryIndex) -> Blueprint {
    let mut groups: Vec<&str> = Vec::new();
    for record in &index.files {
        let module = match record.path.split_once('/') {
            Some((top, _)) => top,
            None => "root",
        };
        if !groups.iter().any(|g| *g == module) {
            groups.push(module);
        }
    }

    let nodes: Vec<Node> = groups
        .iter()
        .map(|module| Node {
            id: sanitize_id(module),
            label: (*module).to_string(),
            kind: "module".to_string(),
        })
        .collect();

    let edges: Vec<Edge> = nodes
        .windows(2)
        .map(|pair| Edge {
            from: pair[0].id.clone(),
            to: pair[1].id.clone(),
            label: String::new(),
        })
        .collect();

    debug!(
        groups = nodes.len(),
        files = index.total_files(),
        "built fallback blueprint from file index"
    );

    Blueprint {
        diagram_type: "ARCHITECTURE_DIAGRAM".to_string(),
        title: "Project Modules".to_string(),
        description: "Fallback: top-level directory modules.".to_string(),
        granularity: "low".to_string(),
        layout: "top-down".to_string(),
        nodes,
        edges,
        metadata: BlueprintMetadata::default(),
    }
}

/// Lowercases and replaces everything outside `[a-z0-9_]` with `_`.
fn sanitize_id(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
