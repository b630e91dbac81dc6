//! Fixed prompt templates for the three LLM tasks.
//!
//! Pure templating over pre-assembled context strings. The only branching
//! is the optional focus line in the blueprint prompt; everything else is
//! slot filling. Output goes to the gateway verbatim.

/// Prompt asking for a concise project summary.
pub fn summary_prompt(file_tree: &str, snippets: &str) -> String {
    format!(
        r#"You are a senior software engineer. Analyse the following repository and produce a concise project summary.

FILE TREE:
{file_tree}

KEY FILE CONTENTS (truncated):
{snippets}

Produce a summary that includes:
1. Project name / purpose
2. Tech stack (languages, frameworks, databases)
3. High-level architecture (services, modules, layers)
4. Entry points and important files
5. External dependencies and integrations

Be factual — only describe what is present in the code.
"#
    )
}

/// Prompt answering one question against the selected code context.
pub fn question_prompt(summary: &str, context: &str, question: &str) -> String {
    format!(
        r#"You are an expert software engineer who has full access to a codebase.
Use ONLY the provided code context to answer the user's question.
If the answer is not in the code, say so.

PROJECT SUMMARY:
{summary}

RELEVANT CODE CONTEXT:
{context}

USER QUESTION:
{question}

Provide a clear, detailed answer. Include file paths and code references where applicable.
"#
    )
}

/// Prompt asking for a diagram blueprint as a bare JSON object.
///
/// The focus line is included only when `focus` is non-empty.
pub fn blueprint_prompt(
    diagram_type: &str,
    focus: &str,
    summary: &str,
    file_tree: &str,
    snippets: &str,
) -> String {
    let focus_text = if focus.is_empty() {
        String::new()
    } else {
        format!("\nFOCUS AREA: {focus}")
    };

    format!(
        r#"You are an expert software architect. Analyse this repository and create a diagram blueprint.

DIAGRAM TYPE: {diagram_type}
{focus_text}

PROJECT SUMMARY:
{summary}

FILE TREE:
{file_tree}

KEY CODE:
{snippets}

Create a JSON blueprint with this structure:
{{
    "diagram_type": "{diagram_type}",
    "title": "<descriptive title>",
    "description": "<one-paragraph description>",
    "granularity": "high|medium|low",
    "layout": "top-down|left-right|layered",
    "nodes": [
        {{"id": "snake_case_id", "label": "Display Name", "type": "component|service|database|actor|external|module|class"}}
    ],
    "edges": [
        {{"from": "source_id", "to": "target_id", "label": "optional description"}}
    ]
}}

Rules:
- Only include elements actually present in the codebase
- Use snake_case for IDs, no spaces
- Keep it readable: 5-20 nodes ideally
- Identify communication patterns (REST, Kafka, DB queries, imports, etc.)

Return ONLY the JSON object.
"#
    )
}
