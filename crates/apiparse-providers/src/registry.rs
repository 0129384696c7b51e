//! Routing table — static specs for every supported model identifier.
//!
//! Each `ModelSpec` maps one identifier to its provider family and the
//! parameters that provider needs: endpoint path, prompt wrapping, output
//! normalization, or payload family. The table is built at compile time and
//! never mutated.

use serde_json::Value;

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// The three provider families behind the dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Provider {
    WorkersAi,
    OpenAi,
    Bedrock,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::WorkersAi, Provider::OpenAi, Provider::Bedrock];

    /// Human-readable name for logs and errors.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Provider::WorkersAi => "Workers AI",
            Provider::OpenAi => "OpenAI",
            Provider::Bedrock => "Bedrock",
        }
    }
}

// ─────────────────────────────────────────────
// Route parameters
// ─────────────────────────────────────────────

/// How the context and prompt are laid out in a chat-style message pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptWrapping {
    /// Context as the system message, prompt as the user message.
    Separate,
    /// Empty system message; user message `[CONTEXT]..[/CONTEXT][PROMPT]..[/PROMPT]`.
    BracketTags,
    /// Empty system message; user message `CONTEXT: ..\nPROMPT: ..`.
    ColonTags,
}

/// Post-processing applied to extracted text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputNormalization {
    None,
    /// Remove every literal `*` (markdown emphasis) from the reply.
    StripEmphasis,
}

impl OutputNormalization {
    pub fn apply(&self, text: String) -> String {
        match self {
            OutputNormalization::None => text,
            OutputNormalization::StripEmphasis => text.replace('*', ""),
        }
    }
}

/// Bedrock model families. Each owns one payload shape and one response path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BedrockFamily {
    Mistral,
    Claude3,
    Llama2,
    Llama3,
}

impl BedrockFamily {
    pub fn response_path(&self) -> ResponsePath {
        match self {
            BedrockFamily::Mistral => ResponsePath::OUTPUTS_TEXT,
            BedrockFamily::Claude3 => ResponsePath::CONTENT_TEXT,
            BedrockFamily::Llama2 | BedrockFamily::Llama3 => ResponsePath::GENERATION,
        }
    }
}

/// Location of the reply text inside a provider's JSON response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResponsePath {
    /// Dotted form used in errors, e.g. `outputs[0].text`.
    pub display: &'static str,
    /// RFC 6901 pointer used for lookup.
    pointer: &'static str,
}

impl ResponsePath {
    pub const OUTPUTS_TEXT: ResponsePath = ResponsePath {
        display: "outputs[0].text",
        pointer: "/outputs/0/text",
    };
    pub const CONTENT_TEXT: ResponsePath = ResponsePath {
        display: "content[0].text",
        pointer: "/content/0/text",
    };
    pub const GENERATION: ResponsePath = ResponsePath {
        display: "generation",
        pointer: "/generation",
    };
    pub const RESULT_RESPONSE: ResponsePath = ResponsePath {
        display: "result.response",
        pointer: "/result/response",
    };
    pub const CHOICE_CONTENT: ResponsePath = ResponsePath {
        display: "choices[0].message.content",
        pointer: "/choices/0/message/content",
    };

    /// The string at this path, or `None` if absent or not a string.
    pub fn extract<'v>(&self, value: &'v Value) -> Option<&'v str> {
        value.pointer(self.pointer).and_then(Value::as_str)
    }
}

// ─────────────────────────────────────────────
// ModelSpec
// ─────────────────────────────────────────────

/// Provider family plus the per-identifier parameters it needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    WorkersAi {
        /// Model path under `/ai/run/`, e.g. `@cf/meta/llama-3-8b-instruct`.
        path: &'static str,
        wrapping: PromptWrapping,
        normalization: OutputNormalization,
    },
    OpenAi {
        model: &'static str,
    },
    Bedrock {
        family: BedrockFamily,
    },
}

impl Route {
    pub fn provider(&self) -> Provider {
        match self {
            Route::WorkersAi { .. } => Provider::WorkersAi,
            Route::OpenAi { .. } => Provider::OpenAi,
            Route::Bedrock { .. } => Provider::Bedrock,
        }
    }
}

/// One row of the routing table.
#[derive(Clone, Debug)]
pub struct ModelSpec {
    /// Identifier accepted by the dispatcher.
    pub id: &'static str,
    pub route: Route,
}

const fn workers_ai(id: &'static str, path: &'static str) -> ModelSpec {
    ModelSpec {
        id,
        route: Route::WorkersAi {
            path,
            wrapping: PromptWrapping::Separate,
            normalization: OutputNormalization::None,
        },
    }
}

const fn openai(id: &'static str) -> ModelSpec {
    ModelSpec {
        id,
        route: Route::OpenAi { model: id },
    }
}

const fn bedrock(id: &'static str, family: BedrockFamily) -> ModelSpec {
    ModelSpec {
        id,
        route: Route::Bedrock { family },
    }
}

/// Every supported model, grouped by provider.
pub static MODELS: &[ModelSpec] = &[
    // Workers AI
    workers_ai("llama-2-7b-chat-fp16", "@cf/meta/llama-2-7b-chat-fp16"),
    workers_ai("llama-3-8b-instruct", "@cf/meta/llama-3-8b-instruct"),
    ModelSpec {
        id: "phi-2",
        route: Route::WorkersAi {
            path: "@cf/microsoft/phi-2",
            wrapping: PromptWrapping::BracketTags,
            normalization: OutputNormalization::None,
        },
    },
    // gemma wraps its answers in markdown emphasis
    ModelSpec {
        id: "gemma-7b-it",
        route: Route::WorkersAi {
            path: "@hf/google/gemma-7b-it",
            wrapping: PromptWrapping::ColonTags,
            normalization: OutputNormalization::StripEmphasis,
        },
    },
    workers_ai(
        "mistral-7b-instruct-v0.2",
        "@hf/mistralai/mistral-7b-instruct-v0.2",
    ),
    // OpenAI
    openai("gpt-3.5-turbo-0125"),
    openai("gpt-4-turbo-2024-04-09"),
    openai("gpt-4o-mini"),
    openai("gpt-4o"),
    // Bedrock
    bedrock("mistral.mistral-large-2402-v1:0", BedrockFamily::Mistral),
    bedrock("anthropic.claude-3-sonnet-20240229-v1:0", BedrockFamily::Claude3),
    bedrock("meta.llama2-13b-chat-v1", BedrockFamily::Llama2),
    bedrock("meta.llama2-70b-chat-v1", BedrockFamily::Llama2),
    bedrock("meta.llama3-70b-instruct-v1:0", BedrockFamily::Llama3),
];

// ─────────────────────────────────────────────
// Lookup
// ─────────────────────────────────────────────

/// Find a model by exact identifier.
pub fn find_model(id: &str) -> Option<&'static ModelSpec> {
    MODELS.iter().find(|spec| spec.id == id)
}

/// Bedrock family for an identifier, if it is routed to Bedrock.
pub fn bedrock_family(id: &str) -> Option<BedrockFamily> {
    match find_model(id)?.route {
        Route::Bedrock { family } => Some(family),
        _ => None,
    }
}

/// All models routed to `provider`, in table order.
pub fn models_for(provider: Provider) -> impl Iterator<Item = &'static ModelSpec> {
    MODELS
        .iter()
        .filter(move |spec| spec.route.provider() == provider)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
