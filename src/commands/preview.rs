use colored::*;
use eyre::Result;
use serde::Serialize;

use dd_install_telemetry::config::Config;
use dd_install_telemetry::emitter::Preview;
use dd_install_telemetry::event::TelemetryEvent;

use crate::cli::OutputFormat;

/// Machine-readable preview; never carries the API key itself
#[derive(Debug, Serialize)]
struct PreviewOutput<'a> {
    url: &'a str,
    api_key_set: bool,
    body: &'a TelemetryEvent,
}

impl<'a> From<&'a Preview> for PreviewOutput<'a> {
    fn from(preview: &'a Preview) -> Self {
        Self {
            url: &preview.url,
            api_key_set: preview.config.has_api_key(),
            body: &preview.event,
        }
    }
}

pub fn run(event: &str, format: OutputFormat, properties: &[String], config: &Config) -> Result<()> {
    let emitter = super::build_emitter(properties, config)?;
    let preview = emitter.preview(event);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&PreviewOutput::from(&preview))?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&PreviewOutput::from(&preview))?);
        }
        OutputFormat::Text => {
            println!("{}", "Telemetry preview".bold());
            println!();
            println!("  {}: {}", "url".cyan(), preview.url);
            if preview.config.has_api_key() {
                println!("  {}: {}", "api key".cyan(), "set".green());
            } else {
                println!("  {}: {} (report would be skipped)", "api key".cyan(), "empty".yellow());
            }
            println!("  {}: {}", "install id".cyan(), preview.config.install_id);
            println!("  {}: {}", "origin".cyan(), preview.config.origin);
            println!();
            println!("{}", serde_json::to_string_pretty(&preview.event)?);
        }
    }

    Ok(())
}
