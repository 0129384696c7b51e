//! Core types — the prompt pair handed to the dispatcher and the role-tagged
//! chat messages that chat-style providers expect on the wire.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Prompt request
// ─────────────────────────────────────────────

/// The (system context, user prompt) pair for one dispatch.
///
/// Built fresh per call and never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptRequest {
    /// Instructions for the model (system role).
    pub context: String,
    /// The user's message.
    pub prompt: String,
}

impl PromptRequest {
    pub fn new(context: impl Into<String>, prompt: impl Into<String>) -> Self {
        PromptRequest {
            context: context.into(),
            prompt: prompt.into(),
        }
    }
}

// ─────────────────────────────────────────────
// Chat messages
// ─────────────────────────────────────────────

/// A chat message in the `{"role": ..., "content": ...}` format shared by
/// Workers AI and OpenAI chat completions.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "role")]
pub enum ChatMessage {
    #[serde(rename = "system")]
    System { content: String },

    #[serde(rename = "user")]
    User { content: String },
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage::System {
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage::User {
            content: content.into(),
        }
    }

    /// Text content regardless of role.
    pub fn content(&self) -> &str {
        match self {
            ChatMessage::System { content } | ChatMessage::User { content } => content,
        }
    }

    /// Role name as sent on the wire.
    pub fn role(&self) -> &'static str {
        match self {
            ChatMessage::System { .. } => "system",
            ChatMessage::User { .. } => "user",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_message_serializes_with_role() {
        let json = serde_json::to_value(ChatMessage::system("be terse")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "system", "content": "be terse"}));
    }

    #[test]
    fn test_user_message_serializes_with_role() {
        let json = serde_json::to_value(ChatMessage::user("hello")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hello"}));
    }

    #[test]
    fn test_message_deserializes_by_role() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"role": "user", "content": "hi"}"#).unwrap();
        assert_eq!(msg, ChatMessage::user("hi"));
        assert_eq!(msg.role(), "user");
        assert_eq!(msg.content(), "hi");
    }

    #[test]
    fn test_empty_system_content_is_kept() {
        let json = serde_json::to_string(&ChatMessage::system("")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":""}"#);
    }

    #[test]
    fn test_prompt_request_new() {
        let req = PromptRequest::new("ctx", "ask");
        assert_eq!(req.context, "ctx");
        assert_eq!(req.prompt, "ask");
    }
}
