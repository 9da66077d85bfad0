use colored::*;
use eyre::Result;

use dd_install_telemetry::config::Config;

use crate::cli::{ConfigAction, OutputFormat};

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    let config = &redacted(config);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            println!("{}", "Telemetry Configuration".bold());
            println!();
            println!("  log_level: {}", config.log_level.as_filter());
            println!("  timeout_secs: {}", config.timeout().as_secs());
            match &config.intake_url {
                Some(url) => println!("  intake_url: {}", url),
                None => println!("  intake_url: {}", "(derived from site)".dimmed()),
            }
            println!();

            println!("{}:", "properties".cyan());
            if config.properties.is_empty() {
                println!("  {}", "(none)".dimmed());
            }
            for (key, value) in &config.properties {
                println!("  {}: {}", key, value);
            }
        }
    }

    Ok(())
}

/// Copy of `config` safe to print
fn redacted(config: &Config) -> Config {
    let mut config = config.clone();
    if let Some(value) = config.properties.get_mut("APIKEY") {
        if !value.is_empty() {
            *value = "<redacted>".to_string();
        }
    }
    config
}
