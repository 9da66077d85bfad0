//! Best-effort installation telemetry
//!
//! Reports `agent.installation.success` / `agent.installation.error` events
//! to the instrumentation telemetry intake. A report never fails the
//! install: the outcome is an advisory [`actions::ActionResult`].

pub mod actions;
pub mod config;
pub mod emitter;
pub mod error;
pub mod event;
pub mod resolver;
pub mod source;
pub mod transport;

pub use actions::{ActionResult, report_failure, report_success};
pub use emitter::{Delivery, Emitter, LogFacadeSink, LogSink};
pub use error::TransmissionError;
pub use event::{BuildInfo, TelemetryEvent};
pub use resolver::{Resolver, TelemetryConfig};
