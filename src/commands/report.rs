use eyre::Result;

use dd_install_telemetry::actions::{self, ActionResult};
use dd_install_telemetry::config::Config;

use crate::cli::ReportAction;

/// Run a report action and map it to a process exit code
///
/// Without `strict` the exit code is always 0: the installer must not fail
/// because telemetry could not be delivered.
pub fn run(action: ReportAction, strict: bool, properties: &[String], config: &Config) -> Result<i32> {
    let emitter = match super::build_emitter(properties, config) {
        Ok(emitter) => emitter,
        Err(e) => {
            log::warn!("Not reporting telemetry: {:#}", e);
            return Ok(exit_code(ActionResult::Failure, strict));
        }
    };

    let result = match action {
        ReportAction::Success => actions::report_success(&emitter),
        ReportAction::Failure => actions::report_failure(&emitter),
        ReportAction::Event { name } => actions::report(&emitter, &name),
    };

    log::debug!("Telemetry action finished: {:?}", result);

    Ok(exit_code(result, strict))
}

fn exit_code(result: ActionResult, strict: bool) -> i32 {
    if strict {
        result.exit_code()
    } else {
        ActionResult::Success.exit_code()
    }
}
