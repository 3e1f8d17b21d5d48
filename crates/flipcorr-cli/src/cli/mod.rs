mod commands;
mod helpers;

use clap::Parser;
use flipcorr_core::domain::CorrectionError;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            let correction_error = error.as_correction_error();
            eprintln!("{}", correction_error.diagnostic_line());
            if let Some(summary_line) = correction_error.fatal_exit_line() {
                eprintln!("{}", summary_line);
            }
            correction_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("flipcorr".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();

    match Cli::try_parse_from(&full_args) {
        Ok(cli) => {
            helpers::init_tracing(cli.verbose);
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

#[derive(Parser)]
#[command(
    name = "flipcorr",
    version,
    about = "Flipping-ratio correction for DNS polarization analysis"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Correct SF/NSF data and write both outputs as JSON workspaces
    Correct(commands::CorrectArgs),
    /// Check a run configuration and its inputs without writing outputs
    Validate(commands::ValidateArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Correct(args) => commands::run_correct_command(args),
        CliCommand::Validate(args) => commands::run_validate_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(CorrectionError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<CorrectionError> for CliError {
    fn from(error: CorrectionError) -> Self {
        Self::Compute(error)
    }
}

impl CliError {
    fn as_correction_error(&self) -> CorrectionError {
        match self {
            Self::Usage(message) => {
                CorrectionError::input_validation("INPUT.CLI_USAGE", message.trim_end())
            }
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => CorrectionError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CliError, run};
    use flipcorr_core::domain::CorrectionErrorCategory;

    #[test]
    fn unknown_subcommand_is_a_usage_error() {
        let error = run(["calibrate"]).expect_err("unknown subcommand should fail");
        assert!(matches!(error, CliError::Usage(_)));
        let mapped = error.as_correction_error();
        assert_eq!(mapped.code(), "INPUT.CLI_USAGE");
        assert_eq!(mapped.exit_code(), 2);
    }

    #[test]
    fn help_exits_successfully() {
        assert_eq!(run(["--help"]).expect("help should succeed"), 0);
    }

    #[test]
    fn internal_errors_map_to_io_category() {
        let error = CliError::from(anyhow::anyhow!("disk vanished"));
        let mapped = error.as_correction_error();
        assert_eq!(mapped.category(), CorrectionErrorCategory::IoSystemError);
        assert!(mapped.message().contains("disk vanished"));
    }
}
