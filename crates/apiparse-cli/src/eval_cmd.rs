//! `apiparse eval` — run the extraction suite against one or more models.

use std::path::Path;

use anyhow::{bail, Result};
use colored::Colorize;
use tracing::{info, warn};

use apiparse_core::config::load_config;
use apiparse_providers::{find_model, Dispatcher, ModelDispatch};

use crate::suite::{self, Case, Checker, CASES, DEFAULT_CONTEXT};

/// Pass/fail counts for one model.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
}

/// Run the eval command.
pub async fn run(
    models: Vec<String>,
    case: Option<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    let cases: Vec<&Case> = match &case {
        Some(name) => match suite::find_case(name) {
            Some(c) => vec![c],
            None => bail!(
                "unknown case '{}'. Available: {}",
                name,
                CASES.iter().map(|c| c.name).collect::<Vec<_>>().join(", ")
            ),
        },
        None => CASES.iter().collect(),
    };

    let models: Vec<String> = if models.is_empty() {
        suite::DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()
    } else {
        models
    };
    if let Some(unknown) = models.iter().find(|m| find_model(m).is_none()) {
        bail!("unrecognized model '{unknown}' (see `apiparse models`)");
    }

    let config = load_config(config_path);
    let dispatcher = Dispatcher::new(&config);
    let checker = Checker::new()?;

    let mut total = Tally::default();
    for model in &models {
        println!();
        println!("{} {}", "▶".cyan(), model.bold());
        let tally = run_model(&dispatcher, &checker, model, &cases).await;
        println!(
            "  {} passed, {} failed",
            tally.passed.to_string().green(),
            tally.failed.to_string().red()
        );
        total.passed += tally.passed;
        total.failed += tally.failed;
    }

    println!();
    println!(
        "{} {} passed, {} failed across {} model(s)",
        "Summary:".bold(),
        total.passed,
        total.failed,
        models.len()
    );

    if total.failed > 0 {
        bail!("{} case(s) failed", total.failed);
    }
    Ok(())
}

/// Run `cases` against `model`, printing one line per case.
pub async fn run_model(
    dispatcher: &dyn ModelDispatch,
    checker: &Checker,
    model: &str,
    cases: &[&Case],
) -> Tally {
    let mut tally = Tally::default();

    for case in cases {
        info!(model = model, case = case.name, "running case");
        let failures = match dispatcher.dispatch(model, DEFAULT_CONTEXT, case.prompt).await {
            Ok(reply) => checker.failures(case, &reply),
            Err(e) => {
                warn!(model = model, case = case.name, error = %e, "dispatch failed");
                vec![format!("error: {e}")]
            }
        };

        if failures.is_empty() {
            tally.passed += 1;
            println!("  {} {}", "✓".green(), case.name);
        } else {
            tally.failed += 1;
            println!("  {} {}", "✗".red(), case.name);
            for failure in &failures {
                println!("      {}", failure.dimmed());
            }
        }
    }
    tally
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use apiparse_core::DispatchError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with a fixed string and records every prompt it was sent.
    struct StubDispatch {
        reply: Result<String, ()>,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl StubDispatch {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ModelDispatch for StubDispatch {
        async fn dispatch(
            &self,
            model: &str,
            context: &str,
            prompt: &str,
        ) -> Result<String, DispatchError> {
            assert_eq!(context, DEFAULT_CONTEXT);
            self.seen
                .lock()
                .unwrap()
                .push((model.to_string(), prompt.to_string()));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(DispatchError::transport("Stub", "connection refused")),
            }
        }
    }

    const BERLIN_REPLY: &str = "NAME: Jan\nMAIL: jan@foo.com\nADDRESS: Mollstrasse 1\nZIP: 10117\n\
        LOCATION: Berlin\nCOUNTRY: DE\nREQUEST: Order\nPRODUCT: Hummingbird 42\n\
        DATE: 2026-08-12\nGPS: 52.52,13.40\nTIMEZONE: Europe/Berlin";

    #[tokio::test]
    async fn test_run_model_counts_passes_and_failures() {
        let stub = StubDispatch::replying(BERLIN_REPLY);
        let checker = Checker::new().unwrap();
        let cases = vec![
            suite::find_case("default").unwrap(),
            suite::find_case("gps").unwrap(),
            suite::find_case("complaint").unwrap(),
        ];

        let tally = run_model(&stub, &checker, "phi-2", &cases).await;
        assert_eq!(tally, Tally { passed: 2, failed: 1 });

        let seen = stub.seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|(m, _)| m == "phi-2"));
        assert_eq!(seen[2].1, suite::find_case("complaint").unwrap().prompt);
    }

    #[tokio::test]
    async fn test_dispatch_error_counts_as_failure() {
        let stub = StubDispatch::failing();
        let checker = Checker::new().unwrap();
        let cases: Vec<&Case> = CASES.iter().collect();

        let tally = run_model(&stub, &checker, "gpt-4o", &cases).await;
        assert_eq!(tally, Tally { passed: 0, failed: 10 });
    }

    #[tokio::test]
    async fn test_unknown_case_is_rejected() {
        let err = run(vec![], Some("no_such_case".into()), None).await.unwrap_err();
        assert!(err.to_string().contains("unknown case"));
    }

    #[tokio::test]
    async fn test_unknown_model_is_rejected() {
        let err = run(vec!["gpt-5".into()], None, None).await.unwrap_err();
        assert!(err.to_string().contains("unrecognized model"));
    }
}
