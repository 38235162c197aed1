mod commands;
mod helpers;

use clap::Parser;
use potlammps_core::domain::{ErrorCategory, PotentialError};
use tracing_subscriber::EnvFilter;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{}", error.diagnostic_line());
            if let Some(summary_line) = error.fatal_exit_line() {
                eprintln!("{}", summary_line);
            }
            error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("potlammps".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            init_tracing(cli.verbose);
            dispatch_parsed(cli.command)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // a subscriber may already be installed when running in-process
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "potlammps",
    version,
    about = "Generate LAMMPS potential commands from potential-LAMMPS documents"
)]
struct Cli {
    /// Log debug messages to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Print the pair_style, pair_coeff and mass commands for a potential
    PairInfo(commands::PairInfoArgs),
    /// Print a script that reads a data file and then defines the potential
    DataScript(commands::DataScriptArgs),
    /// Print a script that reads a restart file and then redefines the potential
    RestartScript(commands::RestartScriptArgs),
    /// Print the flat metadata of a potential as JSON
    Metadata(commands::MetadataArgs),
    /// Build a database query or filter local potentials
    Query(commands::QueryArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::PairInfo(args) => commands::run_pair_info_command(args),
        CliCommand::DataScript(args) => commands::run_data_script_command(args),
        CliCommand::RestartScript(args) => commands::run_restart_script_command(args),
        CliCommand::Metadata(args) => commands::run_metadata_command(args),
        CliCommand::Query(args) => commands::run_query_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Potential(#[from] PotentialError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::Usage(_) => ErrorCategory::InputValidationError,
            Self::Potential(error) => error.category(),
            Self::Internal(_) => ErrorCategory::IoSystemError,
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            Self::Usage(_) => "INPUT.CLI_USAGE",
            Self::Potential(error) => error.placeholder(),
            Self::Internal(_) => "IO.CLI",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Usage(message) => message.trim_end().to_string(),
            Self::Potential(error) => error.to_string(),
            Self::Internal(error) => format!("{error:#}"),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder(), self.message())
    }

    pub fn fatal_exit_line(&self) -> Option<String> {
        self.category()
            .is_fatal()
            .then(|| format!("FATAL EXIT CODE: {}", self.exit_code()))
    }
}

#[cfg(test)]
mod tests {
    use super::{CliError, run};
    use potlammps_core::domain::PotentialError;

    #[test]
    fn help_exits_successfully() {
        assert_eq!(run(["--help"]).expect("help should succeed"), 0);
        assert_eq!(run(["pair-info", "--help"]).expect("help should succeed"), 0);
    }

    #[test]
    fn unknown_subcommands_are_usage_errors() {
        let error = run(["generate"]).expect_err("unknown subcommand");
        assert!(matches!(error, CliError::Usage(_)));
        assert_eq!(error.exit_code(), 2);
        assert!(error.diagnostic_line().starts_with("ERROR: [INPUT.CLI_USAGE] "));
    }

    #[test]
    fn core_errors_keep_their_codes() {
        let error = CliError::from(PotentialError::LengthMismatch {
            expected: 2,
            actual: 1,
        });
        assert_eq!(error.exit_code(), 2);
        assert_eq!(
            error.fatal_exit_line().as_deref(),
            Some("FATAL EXIT CODE: 2")
        );
        assert!(error.diagnostic_line().contains("[INPUT.MASS_LENGTH]"));
    }

    #[test]
    fn internal_errors_report_context_chain() {
        let error = CliError::from(
            anyhow::anyhow!("disk full").context("failed to write 'in.lammps'"),
        );
        assert_eq!(error.exit_code(), 3);
        assert_eq!(
            error.diagnostic_line(),
            "ERROR: [IO.CLI] failed to write 'in.lammps': disk full"
        );
    }
}
