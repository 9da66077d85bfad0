pub mod completions;
pub mod config;
pub mod preview;
pub mod report;

use eyre::{Context, Result};

use dd_install_telemetry::config::Config;
use dd_install_telemetry::emitter::{Emitter, LogFacadeSink};
use dd_install_telemetry::event::BuildInfo;
use dd_install_telemetry::resolver::Resolver;
use dd_install_telemetry::source::{EnvSource, MapSource, ProcessEnv, PropertySource};
use dd_install_telemetry::transport::UreqClient;

/// Build an emitter: CLI properties, then environment, then config file
pub fn build_emitter(properties: &[String], config: &Config) -> Result<Emitter> {
    let session = MapSource::from_pairs("session", properties).context("Invalid --property value")?;
    let defaults = MapSource::new("config", config.properties.clone().into_iter().collect());

    let sources: Vec<Box<dyn PropertySource>> = vec![
        Box::new(session),
        Box::new(EnvSource::default()),
        Box::new(defaults),
    ];

    let emitter = Emitter::new(
        Resolver::new(sources, Box::new(ProcessEnv)),
        Box::new(UreqClient::new(config.timeout())),
        Box::new(LogFacadeSink),
        BuildInfo::compiled(),
    )
    .with_intake_override(config.intake_url.clone());

    Ok(emitter)
}
