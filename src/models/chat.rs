//! Assistant request/response models.
//!
//! Chat payloads keep snake_case keys (`conversation_history`, `research_actions`) to stay
//! compatible with existing chat clients.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// A chat turn. Either `message` (+ optional history) or a `messages` array is accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// Split into (prompt, prior history).
    ///
    /// With a `messages` array, the last `user` entry is the prompt and everything before it
    /// is history.
    pub fn into_prompt(self) -> (String, Vec<ChatMessage>) {
        if let Some(message) = self.message {
            return (message, self.conversation_history);
        }

        let mut messages = self.messages;
        match messages.iter().rposition(|m| m.role == "user") {
            Some(idx) => {
                let prompt = messages.remove(idx).content;
                messages.truncate(idx);
                (prompt, messages)
            }
            None => (String::new(), messages),
        }
    }
}

/// Suggested follow-up action for the UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResearchAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub research_actions: Vec<ResearchAction>,
}

/// Kind of document an outline is generated for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutlineKind {
    #[default]
    Paper,
    Thesis,
    Proposal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutlineRequest {
    #[serde(default)]
    pub topic: String,
    #[serde(rename = "type", default)]
    pub kind: OutlineKind,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OutlineSection {
    pub title: String,
    pub subsections: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Outline {
    pub title: String,
    pub sections: Vec<OutlineSection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionsRequest {
    #[serde(default)]
    pub topic: String,
}
