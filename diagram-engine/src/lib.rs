//! Diagram blueprints and Mermaid rendering.
//!
//! Two-step pipeline: an LLM response (or the deterministic fallback)
//! becomes a [`Blueprint`], and the blueprint is rendered into one of five
//! Mermaid dialects. Parsing is strict JSON after code-fence stripping;
//! rendering is intentionally permissive and never fails.

pub mod blueprint;
pub mod errors;
pub mod mermaid;

pub use blueprint::{Blueprint, BlueprintMetadata, Edge, Node, fallback_blueprint, parse_blueprint};
pub use errors::{BlueprintError, Result};
pub use mermaid::{DiagramType, render};
