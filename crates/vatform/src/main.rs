//! vatform
//!
//! Command-line front end for the business ID / VAT number check form.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use vatform::config::{Config, parse_country_code, parse_endpoint_url};
use vatform::form::{FormLabels, MIN_IDENTIFIER_LEN, Presentation, SubmitOutcome, sanitize};
use vatform::{Banner, ValidationFormController};

/// Check Finnish business IDs and EU VAT numbers against the registry.
#[derive(Parser, Debug)]
#[command(name = "vatform", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit an identifier to the validation endpoint.
    Check {
        /// Business ID or VAT number, as typed.
        identifier: String,

        /// Challenge proof token.
        #[arg(long, env = "CHALLENGE_TOKEN", default_value = "")]
        challenge_token: String,

        /// Country code (overrides VAT_COUNTRY_CODE).
        #[arg(long)]
        country_code: Option<String>,

        /// Site hosting the validation route (overrides VAT_ENDPOINT_URL).
        #[arg(long)]
        endpoint: Option<String>,

        /// Request timeout in seconds (overrides VAT_REQUEST_TIMEOUT_SECS).
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Print the form copy and challenge widget settings as JSON.
    Describe,
    /// Print the identifier as it would be submitted.
    Sanitize {
        /// Raw input.
        raw: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Check {
            identifier,
            challenge_token,
            country_code,
            endpoint,
            timeout_secs,
        } => {
            let mut config = Config::from_env().context("failed to load configuration")?;
            if let Some(code) = country_code {
                config.country_code = parse_country_code(&code)?;
            }
            if let Some(endpoint) = endpoint {
                config.endpoint_url = parse_endpoint_url(&endpoint)?;
            }
            if let Some(secs) = timeout_secs {
                config.request_timeout = Duration::from_secs(secs);
            }

            check(&config, &identifier, &challenge_token).await
        }
        Command::Describe => {
            let config = Config::from_env().context("failed to load configuration")?;
            let form = ValidationFormController::from_config(&config)
                .context("failed to create validation client")?;
            println!("{}", serde_json::to_string_pretty(&describe(&form))?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Sanitize { raw } => {
            let sanitized = sanitize(&raw);
            println!("{sanitized}");
            if sanitized.len() < MIN_IDENTIFIER_LEN {
                eprintln!("too short to submit: {} < {MIN_IDENTIFIER_LEN}", sanitized.len());
                return Ok(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn check(config: &Config, identifier: &str, token: &str) -> Result<ExitCode> {
    let form = ValidationFormController::from_config(config)
        .context("failed to create validation client")?;
    info!(endpoint = %config.endpoint_url, country = %config.country_code, "Configuration loaded");

    form.set_input(identifier);
    form.on_verify(token);

    if form.submit_form().await == SubmitOutcome::Blocked {
        if !form.has_token() {
            eprintln!("submission blocked: no challenge token (use --challenge-token)");
        } else {
            eprintln!(
                "submission blocked: identifier must have at least {MIN_IDENTIFIER_LEN} characters after sanitizing, got {:?}",
                form.sanitized()
            );
        }
        return Ok(ExitCode::from(2));
    }

    Ok(render(&form.presentation(), form.state().result()))
}

fn render(view: &Presentation, result: Option<&vatform::ValidationResult>) -> ExitCode {
    match &view.banner {
        Some(banner @ Banner::Success { .. }) => {
            println!("{}", banner.message());
            for line in result.map(|r| r.address_lines()).unwrap_or_default() {
                println!("  {line}");
            }
            ExitCode::SUCCESS
        }
        Some(banner @ Banner::NotFound) => {
            println!("{}", banner.message());
            ExitCode::from(1)
        }
        Some(banner @ Banner::Failure) => {
            eprintln!("{}", banner.message());
            ExitCode::from(2)
        }
        // Valid but the registry withheld the name.
        None => ExitCode::SUCCESS,
    }
}

/// Everything a renderer needs to draw the form.
fn describe(form: &ValidationFormController) -> serde_json::Value {
    serde_json::json!({
        "labels": FormLabels::default(),
        "challenge": form.challenge(),
        "country_code": form.country_code(),
        "min_identifier_len": MIN_IDENTIFIER_LEN,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vatform=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_check_overrides() {
        let cli = Cli::try_parse_from([
            "vatform",
            "check",
            "FI 2331972-7",
            "--challenge-token",
            "proof",
            "--country-code",
            "FI",
            "--timeout-secs",
            "3",
        ])
        .unwrap();
        let Command::Check {
            identifier,
            challenge_token,
            country_code,
            endpoint,
            timeout_secs,
        } = cli.command
        else {
            panic!("expected check");
        };
        assert_eq!(identifier, "FI 2331972-7");
        assert_eq!(challenge_token, "proof");
        assert_eq!(country_code.as_deref(), Some("FI"));
        assert_eq!(endpoint, None);
        assert_eq!(timeout_secs, Some(3));
    }

    #[test]
    fn describe_carries_labels_and_site_key() {
        let config = Config::from_vars(|key| match key {
            "TURNSTILE_SITE_KEY" => Some("1x00000000000000000000AA".to_string()),
            "VAT_COUNTRY_CODE" => Some("SE".to_string()),
            _ => None,
        })
        .unwrap();
        let form = ValidationFormController::from_config(&config).unwrap();

        let described = describe(&form);
        assert_eq!(described["challenge"]["site_key"], "1x00000000000000000000AA");
        assert_eq!(described["country_code"], "se");
        assert_eq!(described["labels"]["submit_label"], "Tarkista");
        assert_eq!(described["min_identifier_len"], 8);
    }
}
