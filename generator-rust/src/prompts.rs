use serde_json::{json, Value};

/// Instruction sent to every provider. The `previewHtml` rules are what make
/// the preview renderable in a sandboxed frame without a build pipeline.
pub const SYSTEM_INSTRUCTION: &str = r#"
You are an expert Senior Frontend Engineer and UI/UX Designer specializing in React, Next.js, and Tailwind CSS.
Your task is to generate high-quality, responsive, and accessible UI components based on user prompts.

You must strictly return a JSON object with the following properties:
1. 'name': A short, descriptive name for the component.
2. 'description': A brief explanation of the design choices.
3. 'code': The clean, copy-paste ready TypeScript/React code (using 'import' statements).
4. 'previewHtml': A standalone HTML string for the live preview.

CRITICAL 'previewHtml' REQUIREMENTS:
- It must be a completely standalone HTML document that runs in an isolated iframe without any build step.
- Include the Tailwind CSS CDN script.
- Include the React and ReactDOM UMD scripts (v18+) as global scripts.
- Include the Babel Standalone script so JSX is transformed in the browser.
- Define the generated component inside a <script type="text/babel"> tag.
- Use 'const { useState, useEffect, useRef } = React;' to destructure hooks instead of importing them.
- Use 'lucide-react' icons if needed (load via unpkg).
- Mount the component to 'document.getElementById("root")'.
- Ensure the component is rendered at the end of the script.
"#;

/// Appended for chat-completion providers, which only get a JSON mode hint.
pub const RAW_JSON_DIRECTIVE: &str = "IMPORTANT: RETURN ONLY RAW JSON.";

/// Appended for Anthropic, which has no JSON mode at all.
pub const NO_MARKDOWN_DIRECTIVE: &str = "IMPORTANT: RETURN ONLY RAW JSON. NO MARKDOWN.";

pub(crate) fn system_prompt_with(directive: &str) -> String {
    format!("{SYSTEM_INSTRUCTION}\n{directive}")
}

/// Response schema for providers that support schema-constrained output.
/// Uses the OpenAPI subset understood by the Gemini API.
#[must_use]
pub fn component_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": {
                "type": "STRING",
                "description": "A short, descriptive name for the component"
            },
            "description": {
                "type": "STRING",
                "description": "A brief explanation of the design choices"
            },
            "code": {
                "type": "STRING",
                "description": "The clean React/TypeScript code for the user to copy"
            },
            "previewHtml": {
                "type": "STRING",
                "description": "The standalone HTML string for the live preview iframe"
            }
        },
        "required": ["name", "description", "code", "previewHtml"]
    })
}
