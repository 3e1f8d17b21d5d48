use anyhow::Context;
use flipcorr_core::domain::{CorrectionError, Spectrum};
use flipcorr_core::modules::config::{LoadedRunConfig, load_run_config};
use flipcorr_core::modules::serialization::write_spectrum;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber. `RUST_LOG` wins over the verbosity flag;
/// repeated calls keep the first subscriber.
pub(super) fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub(super) fn load_config(path: &Path) -> Result<LoadedRunConfig, CorrectionError> {
    load_run_config(path).map_err(CorrectionError::from)
}

pub(super) fn ensure_output_dir(path: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create output directory '{}'", path.display()))
}

pub(super) fn output_path(output_dir: &Path, workspace_name: &str) -> PathBuf {
    output_dir.join(format!("{}.json", workspace_name.trim()))
}

pub(super) fn write_output(
    output_dir: &Path,
    workspace_name: &str,
    spectrum: &Spectrum,
) -> Result<PathBuf, CorrectionError> {
    let path = output_path(output_dir, workspace_name);
    write_spectrum(&path, spectrum)?;
    Ok(path)
}
