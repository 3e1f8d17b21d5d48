use super::CliError;
use super::helpers::*;
use flipcorr_core::domain::CorrectionError;
use flipcorr_core::modules::{FlippingRatioCorrector, StoreCorrector};
use std::path::PathBuf;
use tracing::info;

#[derive(clap::Args)]
pub(super) struct CorrectArgs {
    /// Run configuration (JSON) naming the six input workspaces
    #[arg(long)]
    config: PathBuf,

    /// Directory receiving `<sfOutputWorkspace>.json` and `<nsfOutputWorkspace>.json`
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(clap::Args)]
pub(super) struct ValidateArgs {
    /// Run configuration (JSON) naming the six input workspaces
    #[arg(long)]
    config: PathBuf,
}

pub(super) fn run_correct_command(args: CorrectArgs) -> Result<i32, CliError> {
    let loaded = load_config(&args.config)?;
    let mut store = loaded.load_store()?;
    let request = loaded.config.request();
    let corrector = FlippingRatioCorrector::new(loaded.config.parameters());

    corrector.publish_by_name(&mut store, &request)?;
    ensure_output_dir(&args.output_dir)?;

    for name in [&request.sf_output, &request.nsf_output] {
        let spectrum = store.get(name).ok_or_else(|| {
            CorrectionError::internal(
                "SYS.OUTPUT_MISSING",
                format!("corrected workspace '{name}' was not registered"),
            )
        })?;
        let path = write_output(&args.output_dir, name, spectrum)?;
        info!(workspace = %name, path = %path.display(), "output written");
        println!("Wrote {}", path.display());
    }

    Ok(0)
}

pub(super) fn run_validate_command(args: ValidateArgs) -> Result<i32, CliError> {
    let loaded = load_config(&args.config)?;
    let store = loaded.load_store()?;
    let request = loaded.config.request();

    FlippingRatioCorrector::new(loaded.config.parameters()).validate_by_name(&store, &request)?;
    println!("Configuration '{}' is valid.", args.config.display());
    Ok(0)
}
