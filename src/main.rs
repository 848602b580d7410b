//! inheritdoc CLI: inherited-method groups for documentation pages.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use inheritdoc::cli::{run_ancestors, run_check, run_resolve};
use inheritdoc::config::{CliOverrides, OutputFormat, ResolvedConfig};
use inheritdoc::error::{DocError, OutputErrorCode};
use inheritdoc::output::{emit_response, ErrorResponse};
use inheritdoc::resolve::GroupOrder;

// ============================================================================
// CLI Structure
// ============================================================================

/// Inherited-member resolution for API documentation pages.
///
/// Reads a JSON declaration file and reports, for a type, which ancestors
/// its page credits with each inherited method.
#[derive(Parser, Debug)]
#[command(
    name = "inheritdoc",
    version,
    about = "Inherited-member resolution for API documentation pages"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Output format: json or text (env: INHERITDOC_FORMAT).
    #[arg(long, global = true, value_parser = parse_format)]
    format: Option<OutputFormat>,

    /// Group order: preorder, breadth-first or linearized (env: INHERITDOC_ORDER).
    #[arg(long, global = true, value_parser = parse_order)]
    order: Option<GroupOrder>,
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    s.parse()
}

fn parse_order(s: &str) -> Result<GroupOrder, String> {
    s.parse()
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inherited-method groups for a type.
    Resolve {
        /// Declaration file (JSON).
        #[arg(long)]
        input: PathBuf,
        /// Qualified name of the type whose page is generated.
        #[arg(long = "type")]
        type_name: String,
    },
    /// Ancestors of a type in stable pre-order.
    Ancestors {
        /// Declaration file (JSON).
        #[arg(long)]
        input: PathBuf,
        /// Qualified name of the type.
        #[arg(long = "type")]
        type_name: String,
    },
    /// Validate a declaration file, including cycle detection.
    Check {
        /// Declaration file (JSON).
        #[arg(long)]
        input: PathBuf,
    },
}

// ============================================================================
// Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::new(&err);

            // Errors go to stdout as JSON, same as successful responses.
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), DocError> {
    let config = ResolvedConfig::resolve(&CliOverrides {
        order: cli.global.order,
        format: cli.global.format,
    })?;
    tracing::debug!(
        "Resolved config: order={} ({:?}), format={} ({:?})",
        config.order.value,
        config.order.source,
        config.format.value,
        config.format.source
    );

    let output = match cli.command {
        Command::Resolve { input, type_name } => run_resolve(&input, &type_name, &config)?,
        Command::Ancestors { input, type_name } => run_ancestors(&input, &type_name, &config)?,
        Command::Check { input } => run_check(&input, &config)?,
    };

    let mut stdout = io::stdout();
    stdout
        .write_all(output.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| DocError::internal(format!("failed to write output: {}", e)))
}

// ============================================================================
// Tests
// ============================================================================
