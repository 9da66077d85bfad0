//! HTTP transport for the intake POST

use std::time::Duration;

use crate::error::TransmissionError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Sends one POST and reports the response status
pub trait HttpClient {
    fn post(&self, url: &str, body: &[u8], headers: &[(&str, &str)]) -> Result<u16, TransmissionError>;
}

/// Blocking client backed by `ureq`, bounded by a global timeout
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder().timeout_global(Some(timeout)).build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl HttpClient for UreqClient {
    fn post(&self, url: &str, body: &[u8], headers: &[(&str, &str)]) -> Result<u16, TransmissionError> {
        let mut request = self.agent.post(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        match request.send(body) {
            Ok(response) => Ok(response.status().as_u16()),
            Err(ureq::Error::StatusCode(code)) => Err(TransmissionError::Status(code)),
            Err(e) => Err(TransmissionError::Transport(e.to_string())),
        }
    }
}

/// Check that `url` is an absolute http(s) URL with a host
pub fn validate_url(url: &str) -> Result<(), TransmissionError> {
    let invalid = |reason: &str| TransmissionError::InvalidUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let uri: ureq::http::Uri = url.parse().map_err(|e: ureq::http::uri::InvalidUri| invalid(&e.to_string()))?;

    match uri.scheme_str() {
        Some("https") | Some("http") => {}
        Some(other) => return Err(invalid(&format!("unsupported scheme '{}'", other))),
        None => return Err(invalid("missing scheme")),
    }

    match uri.host() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(invalid("missing host")),
    }
}
