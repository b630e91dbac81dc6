//! Mermaid renderers for the five supported diagram dialects.
//!
//! Rendering is a pure function of `(Blueprint, DiagramType)`. Node ids are
//! emitted exactly as they appear in the blueprint; an edge referencing an
//! undeclared id still renders, Mermaid itself will just draw an implied
//! node for it.

use std::fmt;

use crate::blueprint::{Blueprint, Edge, Node};

/// The dialect a diagram request asks for.
///
/// Wire names are the upper-snake strings used in requests and blueprints
/// (`FLOWCHART`, `ARCHITECTURE_DIAGRAM`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagramType {
    Flowchart,
    #[default]
    Architecture,
    Sequence,
    DataFlow,
    Class,
}

impl DiagramType {
    /// Parses a wire name. Unknown names are `None`; callers usually fall
    /// back to [`DiagramType::default`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "FLOWCHART" => Some(Self::Flowchart),
            "ARCHITECTURE_DIAGRAM" => Some(Self::Architecture),
            "SEQUENCE_DIAGRAM" => Some(Self::Sequence),
            "DATA_FLOW_DIAGRAM" => Some(Self::DataFlow),
            "CLASS_DIAGRAM" => Some(Self::Class),
            _ => None,
        }
    }

    /// The canonical wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flowchart => "FLOWCHART",
            Self::Architecture => "ARCHITECTURE_DIAGRAM",
            Self::Sequence => "SEQUENCE_DIAGRAM",
            Self::DataFlow => "DATA_FLOW_DIAGRAM",
            Self::Class => "CLASS_DIAGRAM",
        }
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders a blueprint into the requested Mermaid dialect.
pub fn render(blueprint: &Blueprint, diagram_type: DiagramType) -> String {
    match diagram_type {
        DiagramType::Sequence => render_sequence(&blueprint.edges),
        DiagramType::Class => render_class(&blueprint.nodes, &blueprint.edges),
        DiagramType::Flowchart | DiagramType::Architecture | DiagramType::DataFlow => {
            render_graph(blueprint, diagram_type)
        }
    }
}

fn render_sequence(edges: &[Edge]) -> String {
    let mut lines = vec!["sequenceDiagram".to_string()];
    for edge in edges {
        lines.push(format!("    {}->>{}: {}", edge.from, edge.to, edge.label));
    }
    lines.join("\n")
}

fn render_class(nodes: &[Node], edges: &[Edge]) -> String {
    let mut lines = vec!["classDiagram".to_string()];
    for node in nodes {
        lines.push(format!(
            "    class {} {{\n        {}\n    }}",
            node.id, node.label
        ));
    }
    for edge in edges {
        lines.push(format!("    {} --> {} : {}", edge.from, edge.to, edge.label));
    }
    lines.join("\n")
}

fn render_graph(blueprint: &Blueprint, diagram_type: DiagramType) -> String {
    let mut lines = Vec::new();

    match diagram_type {
        DiagramType::Flowchart => {
            let orientation = if blueprint.layout == "top-down" {
                "TD"
            } else {
                "LR"
            };
            lines.push(format!("flowchart {orientation}"));
        }
        DiagramType::DataFlow => lines.push("graph LR".to_string()),
        _ => lines.push("graph TB".to_string()),
    }

    for node in &blueprint.nodes {
        let line = match node.kind.as_str() {
            "database" => format!("    {}[({})]", node.id, node.label),
            "external" => format!("    {}[/{}/]", node.id, node.label),
            "actor" => format!("    {}(({}))", node.id, node.label),
            _ => format!("    {}[{}]", node.id, node.label),
        };
        lines.push(line);
    }

    for edge in &blueprint.edges {
        if edge.label.is_empty() {
            lines.push(format!("    {} --> {}", edge.from, edge.to));
        } else {
            lines.push(format!("    {} -->|{}| {}", edge.from, edge.to, edge.label));
        }
    }

    lines.join("\n")
}
