//! apiparse CLI — entry point.
//!
//! # Commands
//!
//! - `apiparse run -m MODEL -p PROMPT [-c CONTEXT]` — one dispatch, print the reply
//! - `apiparse models` — list every routable model
//! - `apiparse status` — show config path and credential status
//! - `apiparse init` — write a default config file
//! - `apiparse eval [-m MODEL]... [--case NAME]` — run the extraction suite

mod eval_cmd;
mod helpers;
mod init;
mod models_cmd;
mod status;
mod suite;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use apiparse_core::config::load_config;
use apiparse_providers::{CallOptions, Dispatcher};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// apiparse — route prompts to Workers AI, OpenAI, or Bedrock models
#[derive(Parser)]
#[command(name = "apiparse", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one prompt to a model and print the reply
    Run {
        /// Model identifier (see `apiparse models`)
        #[arg(short, long)]
        model: String,

        /// System context. Defaults to the field-extraction context.
        #[arg(short, long)]
        context: Option<String>,

        /// User prompt
        #[arg(short, long)]
        prompt: String,

        /// Per-call timeout in seconds (overrides config)
        #[arg(long)]
        timeout: Option<u64>,

        /// Config file path
        #[arg(long)]
        config: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// List supported models grouped by provider
    Models,

    /// Show configuration and credential status
    Status,

    /// Write a default config file
    Init {
        /// Config file path
        #[arg(long)]
        config: Option<String>,
    },

    /// Run the extraction suite against one or more models
    Eval {
        /// Model to evaluate (repeatable). Defaults to the Workers AI set.
        #[arg(short, long = "model")]
        models: Vec<String>,

        /// Run only this case
        #[arg(long)]
        case: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            model,
            context,
            prompt,
            timeout,
            config,
            logs,
        } => {
            init_logging(logs);
            let path = config.map(|p| helpers::expand_tilde(&p));
            run_prompt(model, context, prompt, timeout, path).await
        }
        Commands::Models => {
            models_cmd::run();
            Ok(())
        }
        Commands::Status => status::run(),
        Commands::Init { config } => {
            let path = config.map(|p| helpers::expand_tilde(&p));
            init::run(path.as_deref())
        }
        Commands::Eval {
            models,
            case,
            config,
            logs,
        } => {
            init_logging(logs);
            let path = config.map(|p| helpers::expand_tilde(&p));
            eval_cmd::run(models, case, path.as_deref()).await
        }
    }
}

// ─────────────────────────────────────────────
// Run command
// ─────────────────────────────────────────────

async fn run_prompt(
    model: String,
    context: Option<String>,
    prompt: String,
    timeout: Option<u64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path.as_deref());
    let dispatcher = Dispatcher::new(&config);
    let context = context.unwrap_or_else(|| suite::DEFAULT_CONTEXT.to_string());

    // Ctrl-C cancels the in-flight request.
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received, cancelling request");
            on_signal.cancel();
        }
    });

    let mut options = CallOptions::default().with_cancellation(cancel);
    if let Some(secs) = timeout {
        options = options.with_timeout(Duration::from_secs(secs));
    }

    info!(model = %model, "running single prompt");
    let reply = dispatcher
        .dispatch_with(&model, &context, &prompt, &options)
        .await
        .with_context(|| format!("dispatch to '{model}' failed"))?;

    helpers::print_response(&model, &reply);
    Ok(())
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("apiparse=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
