//! Property and variable sources
//!
//! The resolver reads settings from an ordered list of [`PropertySource`]s
//! (session properties, process environment, config file) and keeps the
//! install-correlation id in a [`VariableStore`].

use eyre::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A named, read-only key/value layer
pub trait PropertySource: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Raw value for `key`, empty strings included
    fn property(&self, key: &str) -> Option<String>;
}

/// Get/set storage for values that must outlive a single report call
pub trait VariableStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// Fixed set of properties, e.g. from the host session or the config file
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    name: String,
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new(name: impl Into<String>, values: HashMap<String, String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Parse `KEY=VALUE` pairs; the value may be empty or contain `=`
    pub fn from_pairs(name: impl Into<String>, pairs: &[String]) -> Result<Self> {
        let mut values = HashMap::new();
        for pair in pairs {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| eyre::eyre!("Invalid property '{}', expected KEY=VALUE", pair))?;
            let key = key.trim();
            if key.is_empty() {
                eyre::bail!("Invalid property '{}', key is empty", pair);
            }
            values.insert(key.to_string(), value.to_string());
        }
        Ok(Self::new(name, values))
    }
}

impl PropertySource for MapSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn property(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Process environment, addressed through property-name aliases
///
/// Only aliased keys are looked up so that a bare `SITE` variable in the
/// environment is never picked up by accident.
#[derive(Debug, Clone)]
pub struct EnvSource {
    aliases: HashMap<String, String>,
}

impl EnvSource {
    /// Environment source with no aliases
    pub fn empty() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    pub fn with_alias(mut self, key: &str, var: &str) -> Self {
        self.aliases.insert(key.to_string(), var.to_string());
        self
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::empty().with_alias("APIKEY", "DD_API_KEY").with_alias("SITE", "DD_SITE")
    }
}

impl PropertySource for EnvSource {
    fn name(&self) -> &str {
        "environment"
    }

    fn property(&self, key: &str) -> Option<String> {
        let var = self.aliases.get(key)?;
        std::env::var(var).ok()
    }
}

/// Variables of the current process, inherited by anything it spawns
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl VariableStore for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set(&self, key: &str, value: &str) {
        // SAFETY: the installer hooks run sequentially on one thread; nothing
        // else reads the environment while the id is being written.
        unsafe {
            std::env::set_var(key, value);
        }
    }
}

/// In-memory store; clones share the same map
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    vars: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }
}

impl VariableStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let vars = self.vars.lock().unwrap_or_else(|e| e.into_inner());
        vars.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut vars = self.vars.lock().unwrap_or_else(|e| e.into_inner());
        vars.insert(key.to_string(), value.to_string());
    }
}
