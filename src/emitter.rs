//! Installation telemetry emitter
//!
//! One report call resolves the configuration, builds the onboarding event
//! and POSTs it to the instrumentation telemetry intake once. Failures are
//! logged to the host's [`LogSink`] and returned as [`TransmissionError`];
//! they are never retried and never panic.

use crate::error::TransmissionError;
use crate::event::{BuildInfo, TelemetryEvent};
use crate::resolver::{Resolver, TelemetryConfig};
use crate::transport::{self, HttpClient};

pub const SKIPPED_MESSAGE: &str = "API key empty, not reporting telemetry";

/// Successful outcome of a report call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The intake accepted the event
    Sent,
    /// No API key configured, nothing was sent
    Skipped,
}

/// Host-side sink for single-line diagnostics
pub trait LogSink {
    fn log(&self, line: &str);
}

/// Forwards sink lines to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacadeSink;

impl LogSink for LogFacadeSink {
    fn log(&self, line: &str) {
        log::info!("{}", line);
    }
}

/// Intake endpoint for a site
pub fn intake_url(site: &str) -> String {
    format!("https://instrumentation-telemetry-intake.{}/api/v2/apmtelemetry", site)
}

/// What a report call would send, without sending it
#[derive(Debug, Clone)]
pub struct Preview {
    pub config: TelemetryConfig,
    pub url: String,
    pub event: TelemetryEvent,
}

pub struct Emitter {
    resolver: Resolver,
    client: Box<dyn HttpClient>,
    sink: Box<dyn LogSink>,
    build: BuildInfo,
    intake_override: Option<String>,
}

impl Emitter {
    pub fn new(resolver: Resolver, client: Box<dyn HttpClient>, sink: Box<dyn LogSink>, build: BuildInfo) -> Self {
        Self {
            resolver,
            client,
            sink,
            build,
            intake_override: None,
        }
    }

    /// Send to `url` instead of the site-derived intake
    pub fn with_intake_override(mut self, url: Option<String>) -> Self {
        self.intake_override = url.filter(|u| !u.is_empty());
        self
    }

    /// Report `event_name` to the intake
    pub fn report(&self, event_name: &str) -> Result<Delivery, TransmissionError> {
        log::debug!("Sending installation telemetry: {}", event_name);

        let config = self.resolver.resolve();
        if !config.has_api_key() {
            self.sink.log(SKIPPED_MESSAGE);
            return Ok(Delivery::Skipped);
        }

        match self.send(event_name, &config) {
            Ok(()) => Ok(Delivery::Sent),
            Err(e) => {
                self.sink.log(&format!("Error sending telemetry: {}", e));
                Err(e)
            }
        }
    }

    /// Resolve and build the event for `event_name`
    pub fn preview(&self, event_name: &str) -> Preview {
        let config = self.resolver.resolve();
        let url = self.url_for(&config);
        let event = TelemetryEvent::new(event_name, &config, &self.build);
        Preview { config, url, event }
    }

    fn url_for(&self, config: &TelemetryConfig) -> String {
        match &self.intake_override {
            Some(url) => url.clone(),
            None => intake_url(&config.site),
        }
    }

    fn send(&self, event_name: &str, config: &TelemetryConfig) -> Result<(), TransmissionError> {
        let url = self.url_for(config);
        transport::validate_url(&url)?;

        let event = TelemetryEvent::new(event_name, config, &self.build);
        let body = serde_json::to_vec(&event)?;
        log::debug!("POST {} ({} bytes) install_id={}", url, body.len(), config.install_id);

        let status = self.client.post(
            &url,
            &body,
            &[("DD-Api-Key", config.api_key.as_str()), ("Content-Type", "application/json")],
        )?;

        if !(200..300).contains(&status) {
            return Err(TransmissionError::Status(status));
        }

        log::debug!("Intake accepted {} with HTTP {}", event_name, status);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FakeClient, RecordingSink};
    use super::*;
    use crate::event::EVENT_INSTALL_SUCCESS;
    use crate::resolver::{DEFAULT_ORIGIN, INSTALL_ID_VAR, ORIGIN_VAR};
    use crate::source::{MapSource, MemoryStore, PropertySource, VariableStore};
    use std::collections::HashMap;

    const FIXED_ID: &str = "11111111-1111-1111-1111-111111111111";

    fn session(pairs: &[(&str, &str)]) -> Vec<Box<dyn PropertySource>> {
        let values: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        vec![Box::new(MapSource::new("session", values))]
    }

    fn emitter(
        pairs: &[(&str, &str)],
        store: &MemoryStore,
        client: &FakeClient,
        sink: &RecordingSink,
    ) -> Emitter {
        Emitter::new(
            Resolver::new(session(pairs), Box::new(store.clone())),
            Box::new(client.clone()),
            Box::new(sink.clone()),
            BuildInfo::new("7.50.0", "1.2.3"),
        )
    }

    #[test]
    fn test_no_api_key_skips_without_network() {
        let store = MemoryStore::new();
        let client = FakeClient::status(202);
        let sink = RecordingSink::default();
        let emitter = emitter(&[], &store, &client, &sink);

        for name in ["agent.installation.success", "agent.installation.error", "anything"] {
            assert_eq!(emitter.report(name).unwrap(), Delivery::Skipped);
        }

        assert!(client.captured().is_empty());
        assert_eq!(sink.lines(), vec![SKIPPED_MESSAGE; 3]);
    }

    #[test]
    fn test_empty_api_key_skips() {
        let store = MemoryStore::new();
        let client = FakeClient::status(202);
        let sink = RecordingSink::default();
        let emitter = emitter(&[("APIKEY", "")], &store, &client, &sink);

        assert_eq!(emitter.report(EVENT_INSTALL_SUCCESS).unwrap(), Delivery::Skipped);
        assert!(client.captured().is_empty());
    }

    #[test]
    fn test_sample_report_matches_wire_contract() {
        let store = MemoryStore::new().with_var(INSTALL_ID_VAR, FIXED_ID);
        let client = FakeClient::status(202);
        let sink = RecordingSink::default();
        let emitter = emitter(&[("APIKEY", "abc123")], &store, &client, &sink);

        assert_eq!(emitter.report(EVENT_INSTALL_SUCCESS).unwrap(), Delivery::Sent);

        let captured = client.captured();
        assert_eq!(captured.len(), 1);
        let request = &captured[0];
        assert_eq!(
            request.url,
            "https://instrumentation-telemetry-intake.datadoghq.com/api/v2/apmtelemetry"
        );
        assert_eq!(request.header("DD-Api-Key"), Some("abc123"));
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(
            request.body,
            r#"{"request_type":"apm-onboarding-event","api_version":"v1","payload":{"event_name":"agent.installation.success","tags":{"agent_platform":"windows","agent_version":"7.50.0","script_version":"1.2.3","install_id":"11111111-1111-1111-1111-111111111111","origin":"WindowsAgentInstaller"}}}"#
        );
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_generated_install_id_is_persisted_and_sent() {
        let store = MemoryStore::new();
        let client = FakeClient::status(200);
        let sink = RecordingSink::default();
        let emitter = emitter(&[("APIKEY", "abc123")], &store, &client, &sink);

        emitter.report(EVENT_INSTALL_SUCCESS).unwrap();

        let persisted = store.get(INSTALL_ID_VAR).unwrap();
        assert!(uuid::Uuid::parse_str(&persisted).is_ok());
        assert_eq!(client.captured()[0].event().payload.tags.install_id, persisted);
    }

    #[test]
    fn test_install_id_stable_across_reports() {
        let store = MemoryStore::new().with_var(INSTALL_ID_VAR, FIXED_ID);
        let client = FakeClient::status(202);
        let sink = RecordingSink::default();
        let emitter = emitter(&[("APIKEY", "abc123")], &store, &client, &sink);

        emitter.report("agent.installation.success").unwrap();
        emitter.report("agent.installation.error").unwrap();

        let ids: Vec<String> = client
            .captured()
            .iter()
            .map(|c| c.event().payload.tags.install_id)
            .collect();
        assert_eq!(ids, vec![FIXED_ID.to_string(), FIXED_ID.to_string()]);
    }

    #[test]
    fn test_site_used_verbatim() {
        let store = MemoryStore::new();
        let client = FakeClient::status(202);
        let sink = RecordingSink::default();
        let emitter = emitter(&[("APIKEY", "abc123"), ("SITE", "us5.datadoghq.com")], &store, &client, &sink);

        emitter.report(EVENT_INSTALL_SUCCESS).unwrap();
        assert_eq!(
            client.captured()[0].url,
            "https://instrumentation-telemetry-intake.us5.datadoghq.com/api/v2/apmtelemetry"
        );
    }

    #[test]
    fn test_origin_tag() {
        let client = FakeClient::status(202);
        let sink = RecordingSink::default();

        let store = MemoryStore::new();
        emitter(&[("APIKEY", "abc123")], &store, &client, &sink)
            .report(EVENT_INSTALL_SUCCESS)
            .unwrap();

        let store = MemoryStore::new().with_var(ORIGIN_VAR, "chocolatey");
        emitter(&[("APIKEY", "abc123")], &store, &client, &sink)
            .report(EVENT_INSTALL_SUCCESS)
            .unwrap();

        let origins: Vec<String> = client.captured().iter().map(|c| c.event().payload.tags.origin).collect();
        assert_eq!(origins, vec![DEFAULT_ORIGIN.to_string(), "chocolatey".to_string()]);
    }

    #[test]
    fn test_transport_failure_logs_once() {
        let store = MemoryStore::new();
        let client = FakeClient::failing("connection refused");
        let sink = RecordingSink::default();
        let emitter = emitter(&[("APIKEY", "abc123")], &store, &client, &sink);

        let result = emitter.report(EVENT_INSTALL_SUCCESS);

        assert!(matches!(result, Err(TransmissionError::Transport(_))));
        assert_eq!(sink.lines(), vec!["Error sending telemetry: connection refused".to_string()]);
    }

    #[test]
    fn test_non_success_status_is_error() {
        let store = MemoryStore::new();
        let client = FakeClient::status(500);
        let sink = RecordingSink::default();
        let emitter = emitter(&[("APIKEY", "abc123")], &store, &client, &sink);

        let result = emitter.report(EVENT_INSTALL_SUCCESS);

        assert!(matches!(result, Err(TransmissionError::Status(500))));
        assert_eq!(sink.lines(), vec!["Error sending telemetry: intake returned HTTP 500".to_string()]);
    }

    #[test]
    fn test_fully_qualified_site_used_verbatim() {
        let store = MemoryStore::new();
        let client = FakeClient::status(202);
        let sink = RecordingSink::default();
        let emitter = emitter(&[("APIKEY", "abc123"), ("SITE", "datadoghq.com.")], &store, &client, &sink);

        assert_eq!(emitter.report(EVENT_INSTALL_SUCCESS).unwrap(), Delivery::Sent);
        assert_eq!(
            client.captured()[0].url,
            "https://instrumentation-telemetry-intake.datadoghq.com./api/v2/apmtelemetry"
        );
    }

    #[test]
    fn test_malformed_site_fails_before_network() {
        let store = MemoryStore::new();
        let client = FakeClient::status(202);
        let sink = RecordingSink::default();
        let emitter = emitter(&[("APIKEY", "abc123"), ("SITE", "bad site")], &store, &client, &sink);

        let result = emitter.report(EVENT_INSTALL_SUCCESS);

        assert!(matches!(result, Err(TransmissionError::InvalidUrl { .. })));
        assert!(client.captured().is_empty());
        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn test_intake_override() {
        let store = MemoryStore::new();
        let client = FakeClient::status(202);
        let sink = RecordingSink::default();
        let emitter = emitter(&[("APIKEY", "abc123")], &store, &client, &sink)
            .with_intake_override(Some("http://127.0.0.1:9/api/v2/apmtelemetry".to_string()));

        emitter.report(EVENT_INSTALL_SUCCESS).unwrap();
        assert_eq!(client.captured()[0].url, "http://127.0.0.1:9/api/v2/apmtelemetry");
    }

    #[test]
    fn test_preview_does_not_send() {
        let store = MemoryStore::new().with_var(INSTALL_ID_VAR, FIXED_ID);
        let client = FakeClient::status(202);
        let sink = RecordingSink::default();
        let emitter = emitter(&[("APIKEY", "abc123")], &store, &client, &sink);

        let preview = emitter.preview(EVENT_INSTALL_SUCCESS);

        assert_eq!(preview.url, intake_url("datadoghq.com"));
        assert_eq!(preview.event.event_name(), EVENT_INSTALL_SUCCESS);
        assert_eq!(preview.event.payload.tags.install_id, FIXED_ID);
        assert!(client.captured().is_empty());
        assert!(sink.lines().is_empty());
    }
}
