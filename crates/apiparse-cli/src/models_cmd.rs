//! `apiparse models` — print the routing table grouped by provider.

use colored::Colorize;

use apiparse_providers::{models_for, ModelSpec, Provider, Route};

pub fn run() {
    println!();
    for provider in Provider::ALL {
        println!("{}", provider.display_name().cyan().bold());
        for spec in models_for(provider) {
            println!("  {:<42} {}", spec.id, describe(spec).dimmed());
        }
        println!();
    }
}

/// One-line summary of how a model is called.
fn describe(spec: &ModelSpec) -> String {
    match &spec.route {
        Route::WorkersAi {
            path,
            wrapping,
            normalization,
        } => format!("{path} ({wrapping:?}, {normalization:?})"),
        Route::OpenAi { model } => format!("chat/completions model={model}"),
        Route::Bedrock { family } => format!("{family:?} -> {}", family.response_path().display),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiparse_providers::find_model;

    #[test]
    fn test_describe_routes() {
        assert_eq!(
            describe(find_model("gemma-7b-it").unwrap()),
            "@hf/google/gemma-7b-it (ColonTags, StripEmphasis)"
        );
        assert_eq!(
            describe(find_model("gpt-4o").unwrap()),
            "chat/completions model=gpt-4o"
        );
        assert_eq!(
            describe(find_model("meta.llama3-70b-instruct-v1:0").unwrap()),
            "Llama3 -> generation"
        );
    }
}
