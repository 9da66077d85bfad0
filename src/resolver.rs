//! Telemetry configuration resolution

use std::fmt;

use crate::source::{PropertySource, VariableStore};

pub const DEFAULT_SITE: &str = "datadoghq.com";
pub const DEFAULT_ORIGIN: &str = "WindowsAgentInstaller";

pub const APIKEY_PROPERTY: &str = "APIKEY";
pub const SITE_PROPERTY: &str = "SITE";

pub const INSTALL_ID_VAR: &str = "DD_INSTALL_ID";
pub const ORIGIN_VAR: &str = "DD_ORIGIN";

/// Settings for a single report call
#[derive(Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Empty means "do not report"
    pub api_key: String,
    pub site: String,
    pub install_id: String,
    pub origin: String,
}

impl TelemetryConfig {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// The API key must never end up in a log file
impl fmt::Debug for TelemetryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelemetryConfig")
            .field("api_key", &if self.has_api_key() { "<redacted>" } else { "<empty>" })
            .field("site", &self.site)
            .field("install_id", &self.install_id)
            .field("origin", &self.origin)
            .finish()
    }
}

/// Resolves [`TelemetryConfig`] from layered sources
pub struct Resolver {
    sources: Vec<Box<dyn PropertySource>>,
    vars: Box<dyn VariableStore>,
}

impl Resolver {
    /// `sources` are queried in order; the first non-empty value wins
    pub fn new(sources: Vec<Box<dyn PropertySource>>, vars: Box<dyn VariableStore>) -> Self {
        Self { sources, vars }
    }

    /// Never fails. Generating the install id is the only side effect.
    pub fn resolve(&self) -> TelemetryConfig {
        TelemetryConfig {
            api_key: self.property(APIKEY_PROPERTY).unwrap_or_default(),
            site: self
                .property(SITE_PROPERTY)
                .unwrap_or_else(|| DEFAULT_SITE.to_string()),
            install_id: self.install_id(),
            origin: self.origin(),
        }
    }

    fn property(&self, key: &str) -> Option<String> {
        for source in &self.sources {
            if let Some(value) = source.property(key).filter(|v| !v.is_empty()) {
                log::debug!("Resolved {} from {} source", key, source.name());
                return Some(value);
            }
        }
        None
    }

    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).filter(|v| !v.is_empty())
    }

    fn origin(&self) -> String {
        self.var(ORIGIN_VAR).unwrap_or_else(|| DEFAULT_ORIGIN.to_string())
    }

    fn install_id(&self) -> String {
        if let Some(id) = self.var(INSTALL_ID_VAR) {
            return id;
        }
        let id = uuid::Uuid::new_v4().to_string();
        log::debug!("Generated install id {}", id);
        self.vars.set(INSTALL_ID_VAR, &id);
        id
    }
}
