//! Prompt rendering — turns a (context, prompt) pair into the exact message
//! list or request body a route expects.
//!
//! Delimiters are byte-exact.

use serde_json::json;

use apiparse_core::config::BedrockSampling;
use apiparse_core::{ChatMessage, PromptRequest};

use crate::registry::{BedrockFamily, PromptWrapping};

impl PromptWrapping {
    /// Render the system/user message pair for a chat-style route.
    pub fn render(&self, request: &PromptRequest) -> Vec<ChatMessage> {
        let PromptRequest { context, prompt } = request;
        match self {
            PromptWrapping::Separate => vec![
                ChatMessage::system(context.as_str()),
                ChatMessage::user(prompt.as_str()),
            ],
            PromptWrapping::BracketTags => vec![
                ChatMessage::system(""),
                ChatMessage::user(format!(
                    "[CONTEXT]{context}[/CONTEXT][PROMPT]{prompt}[/PROMPT]"
                )),
            ],
            PromptWrapping::ColonTags => vec![
                ChatMessage::system(""),
                ChatMessage::user(format!("CONTEXT: {context}\nPROMPT: {prompt}")),
            ],
        }
    }
}

impl BedrockFamily {
    /// The instruction string for template families, `None` for Claude.
    pub fn render_template(&self, request: &PromptRequest) -> Option<String> {
        let PromptRequest { context, prompt } = request;
        match self {
            BedrockFamily::Mistral => Some(format!("[INST]{context}[/INST] [QUERY]{prompt}[/QUERY]")),
            BedrockFamily::Llama2 => Some(format!("[INST]<<SYS>>{context}<</SYS>>{prompt}[/INST]")),
            BedrockFamily::Llama3 => Some(format!(
                "<|begin_of_text|><|start_header_id|>system<|end_header_id|>\n\n{context}<|eot_id|>\
                 <|start_header_id|>user<|end_header_id|>\n\n{prompt}<|eot_id|>\
                 <|start_header_id|>assistant<|end_header_id|>\n\n"
            )),
            BedrockFamily::Claude3 => None,
        }
    }

    /// Serialize the `InvokeModel` body for this family.
    pub fn render_body(&self, request: &PromptRequest, sampling: &BedrockSampling) -> String {
        let body = match self.render_template(request) {
            Some(prompt) => json!({
                "prompt": prompt,
                "temperature": sampling.temperature,
            }),
            None => json!({
                "anthropic_version": sampling.anthropic_version,
                "max_tokens": sampling.claude_max_tokens,
                "system": request.context,
                "messages": [{
                    "role": "user",
                    "content": [{"type": "text", "text": request.prompt}],
                }],
            }),
        };
        body.to_string()
    }
}
