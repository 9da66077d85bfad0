//! Entry points invoked by the installer at the end of an install

use crate::emitter::{Delivery, Emitter};
use crate::error::TransmissionError;
use crate::event::{EVENT_INSTALL_ERROR, EVENT_INSTALL_SUCCESS};

/// Advisory status handed back to the installer host
///
/// The host decides whether `Failure` blocks anything; telemetry itself
/// never aborts an install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionResult {
    Success,
    Failure,
}

impl ActionResult {
    pub fn exit_code(&self) -> i32 {
        match self {
            ActionResult::Success => 0,
            ActionResult::Failure => 1,
        }
    }
}

impl From<&Result<Delivery, TransmissionError>> for ActionResult {
    fn from(result: &Result<Delivery, TransmissionError>) -> Self {
        match result {
            Ok(_) => ActionResult::Success,
            Err(_) => ActionResult::Failure,
        }
    }
}

/// Report a successful installation
pub fn report_success(emitter: &Emitter) -> ActionResult {
    report(emitter, EVENT_INSTALL_SUCCESS)
}

/// Report a failed installation
pub fn report_failure(emitter: &Emitter) -> ActionResult {
    report(emitter, EVENT_INSTALL_ERROR)
}

pub fn report(emitter: &Emitter, event_name: &str) -> ActionResult {
    ActionResult::from(&emitter.report(event_name))
}
