//! Prompt construction and structured-output parsing for fact extraction

use serde::{Deserialize, Serialize};
use std::fmt;

use leadqual_core::{ExtractedFacts, Turn, TurnRole};

use crate::LlmError;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

const EXTRACTION_INSTRUCTIONS: &str = "\
You extract lead qualification facts from a real-estate conversation.

Return a single JSON object with exactly these fields:
{\"budget\": string or null, \"authority\": string or null, \"need\": string or null, \
\"timeline\": string or null, \"contact\": {\"full_name\": string or null, \
\"phone\": string or null, \"email\": string or null}}

Rules:
- Use only what the USER explicitly states in the transcript below. Ignore \
assistant turns entirely.
- A field the user did not explicitly state in this transcript is null, even \
if it could be guessed.
- Capture a field whenever it is stated, regardless of which question was \
asked last.
- Keep the user's own wording for budget, need and timeline; do not invent \
numbers.
- Respond with the JSON object only, no commentary.";

/// Build the extraction prompt for a conversation window.
///
/// `known_facts` is the context string of previously captured facts (so the
/// service restates a field only when the user corrects it), and
/// `rubric_description` is the organization's rubric summary when one is
/// configured.
pub fn extraction_messages(
    window: &[Turn],
    known_facts: &str,
    rubric_description: Option<&str>,
) -> Vec<Message> {
    let mut system = String::from(EXTRACTION_INSTRUCTIONS);

    system.push_str("\n\nAlready captured:\n");
    system.push_str(known_facts);

    if let Some(rubric) = rubric_description {
        system.push_str("\n\nOrganization rubric, for vocabulary alignment:\n");
        system.push_str(rubric);
    }

    let transcript = window
        .iter()
        .map(|turn| {
            let speaker = match turn.role {
                TurnRole::User => "user",
                TurnRole::Assistant => "assistant",
            };
            format!("{}: {}", speaker, turn.text)
        })
        .collect::<Vec<_>>()
        .join("\n");

    vec![Message::system(system), Message::user(transcript)]
}

/// Parse the service's reply into a structured fact object.
///
/// Tolerates surrounding prose and code fences by locating the outermost
/// JSON object; anything else is `LlmError::InvalidResponse`.
pub fn parse_extracted(text: &str) -> Result<ExtractedFacts, LlmError> {
    let start = text
        .find('{')
        .ok_or_else(|| LlmError::InvalidResponse("no JSON object in reply".to_string()))?;
    let end = text
        .rfind('}')
        .ok_or_else(|| LlmError::InvalidResponse("unterminated JSON object".to_string()))?;
    if end < start {
        return Err(LlmError::InvalidResponse("unterminated JSON object".to_string()));
    }

    serde_json::from_str(&text[start..=end])
        .map_err(|e| LlmError::InvalidResponse(e.to_string()))
}
