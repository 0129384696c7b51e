//! `apiparse status` — show configuration and which provider credentials are set.

use anyhow::Result;
use colored::Colorize;

use apiparse_core::config::{get_config_path, load_config, Config};
use apiparse_providers::{models_for, Provider};

/// Run the status command.
pub fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();

    println!();
    println!("{}", "apiparse status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found, using defaults)".dimmed().to_string()
        }
    );
    println!(
        "  {:<18} {}s",
        "Timeout:".bold(),
        config.http.timeout_secs
    );

    println!();
    println!("  {}", "Providers:".bold());
    for provider in Provider::ALL {
        let (configured, missing) = credential_state(&config, provider);
        let status = if configured {
            format!("{} (credentials set)", "✓".green())
        } else {
            format!("{} {}", "· missing".dimmed(), missing.join(", ").dimmed())
        };
        println!(
            "    {:<12} {:<3} models  {}",
            provider.display_name(),
            models_for(provider).count(),
            status
        );
    }

    println!();
    println!(
        "  {:<18} {}",
        "Bedrock region:".bold(),
        config.credentials.region()
    );
    println!(
        "  {:<18} {}",
        "Bedrock endpoint:".bold(),
        config
            .endpoints
            .bedrock_endpoint_for(config.credentials.region())
    );
    println!();

    Ok(())
}

/// Whether `provider` can be called, and which variables are unset.
fn credential_state(config: &Config, provider: Provider) -> (bool, Vec<&'static str>) {
    let creds = &config.credentials;
    let required: Vec<(&'static str, &str)> = match provider {
        Provider::WorkersAi => vec![
            ("CLOUDFLARE_TOKEN", creds.cloudflare_token.as_str()),
            ("CLOUDFLARE_ACCOUNT_ID", creds.cloudflare_account_id.as_str()),
        ],
        Provider::OpenAi => vec![("OPENAI_API_KEY", creds.openai_api_key.as_str())],
        Provider::Bedrock => vec![
            ("AWS_ACCESS_KEY_ID", creds.aws_access_key_id.as_str()),
            ("AWS_SECRET_ACCESS_KEY", creds.aws_secret_access_key.as_str()),
        ],
    };
    let missing: Vec<&'static str> = required
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect();
    (missing.is_empty(), missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_state_all_missing() {
        let config = Config::default();
        let (ok, missing) = credential_state(&config, Provider::WorkersAi);
        assert!(!ok);
        assert_eq!(missing, vec!["CLOUDFLARE_TOKEN", "CLOUDFLARE_ACCOUNT_ID"]);
    }

    #[test]
    fn test_credential_state_matches_config_helpers() {
        let mut config = Config::default();
        config.credentials.openai_api_key = "sk".into();
        config.credentials.aws_access_key_id = "AKID".into();

        let (openai, _) = credential_state(&config, Provider::OpenAi);
        assert_eq!(openai, config.credentials.has_openai());

        let (bedrock, missing) = credential_state(&config, Provider::Bedrock);
        assert_eq!(bedrock, config.credentials.has_bedrock());
        assert_eq!(missing, vec!["AWS_SECRET_ACCESS_KEY"]);
    }
}
