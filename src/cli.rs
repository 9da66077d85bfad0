use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "dd-install-telemetry",
    about = "Report agent installation telemetry to the instrumentation intake",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to dd-install-telemetry\\logs under %LOCALAPPDATA% on Windows\n\
                  (~/.local/share on Linux, ~/Library/Application Support on macOS)"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config.yaml")]
    pub config: Option<PathBuf>,

    /// Session property, e.g. APIKEY=... or SITE=datadoghq.eu
    #[arg(short, long = "property", value_name = "KEY=VALUE", global = true)]
    pub properties: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Non-strict reports must never fail the caller
    pub fn is_best_effort(&self) -> bool {
        matches!(self.command, Commands::Report { strict: false, .. })
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send an installation event
    Report {
        #[command(subcommand)]
        action: ReportAction,

        /// Exit non-zero when the event could not be delivered
        #[arg(long, global = true)]
        strict: bool,
    },

    /// Show the intake URL and payload without sending
    Preview {
        /// Event name
        #[arg(long, default_value = "agent.installation.success")]
        event: String,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ReportAction {
    /// Installation finished successfully
    Success,

    /// Installation failed
    Failure,

    /// Arbitrary event name
    Event {
        /// Event name, e.g. agent.installation.success
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },
}
