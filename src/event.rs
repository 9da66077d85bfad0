//! Onboarding event envelope sent to the instrumentation telemetry intake

use serde::{Deserialize, Serialize};

use crate::resolver::TelemetryConfig;

pub const REQUEST_TYPE: &str = "apm-onboarding-event";
pub const API_VERSION: &str = "v1";
pub const AGENT_PLATFORM: &str = "windows";

pub const EVENT_INSTALL_SUCCESS: &str = "agent.installation.success";
pub const EVENT_INSTALL_ERROR: &str = "agent.installation.error";

/// Versions compiled into the installer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    /// Version of the agent package being installed
    pub agent_version: String,
    /// Version of this installer binary
    pub installer_version: String,
}

impl BuildInfo {
    pub fn new(agent_version: impl Into<String>, installer_version: impl Into<String>) -> Self {
        Self {
            agent_version: agent_version.into(),
            installer_version: installer_version.into(),
        }
    }

    pub fn compiled() -> Self {
        Self::new(env!("DD_AGENT_VERSION"), env!("CARGO_PKG_VERSION"))
    }
}

/// Top-level envelope; field order is part of the wire format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub request_type: String,
    pub api_version: String,
    pub payload: EventPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    pub event_name: String,
    pub tags: EventTags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTags {
    pub agent_platform: String,
    pub agent_version: String,
    pub script_version: String,
    pub install_id: String,
    pub origin: String,
}

impl TelemetryEvent {
    pub fn new(event_name: &str, config: &TelemetryConfig, build: &BuildInfo) -> Self {
        Self {
            request_type: REQUEST_TYPE.to_string(),
            api_version: API_VERSION.to_string(),
            payload: EventPayload {
                event_name: event_name.to_string(),
                tags: EventTags {
                    agent_platform: AGENT_PLATFORM.to_string(),
                    agent_version: build.agent_version.clone(),
                    script_version: build.installer_version.clone(),
                    install_id: config.install_id.clone(),
                    origin: config.origin.clone(),
                },
            },
        }
    }

    pub fn event_name(&self) -> &str {
        &self.payload.event_name
    }
}
