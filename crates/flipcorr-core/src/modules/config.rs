//! JSON run configuration for a flipping-ratio correction.
//!
//! Keys follow the property names of the DNS reduction algorithm; workspace
//! paths are relative to the configuration file.

use super::correction::{CorrectionParameters, CorrectionRequest};
use super::serialization::load_into_store;
use super::store::WorkspaceStore;
use crate::domain::{CorrectionError, CorrectionResult, InputRole};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CorrectionRunConfig {
    pub sf_data_workspace: PathBuf,
    pub nsf_data_workspace: PathBuf,
    pub sf_ni_cr_workspace: PathBuf,
    pub nsf_ni_cr_workspace: PathBuf,
    pub sf_bkgr_workspace: PathBuf,
    pub nsf_bkgr_workspace: PathBuf,
    pub sf_output_workspace: String,
    pub nsf_output_workspace: String,
    #[serde(default)]
    pub double_spin_flip_scattering_probability: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum RunConfigError {
    #[error("failed to read run configuration '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse run configuration '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{key} '{name}' must be a plain file stem without path separators")]
    InvalidOutputName { key: &'static str, name: String },
}

impl From<RunConfigError> for CorrectionError {
    fn from(error: RunConfigError) -> Self {
        match error {
            RunConfigError::Read { .. } => {
                CorrectionError::io_system("IO.RUN_CONFIG_READ", error.to_string())
            }
            RunConfigError::Parse { .. } => {
                CorrectionError::input_validation("INPUT.RUN_CONFIG_PARSE", error.to_string())
            }
            RunConfigError::InvalidOutputName { .. } => {
                CorrectionError::input_validation("INPUT.RUN_CONFIG_OUTPUT", error.to_string())
            }
        }
    }
}

/// A configuration together with the directory its paths are relative to.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRunConfig {
    pub config: CorrectionRunConfig,
    pub base_dir: PathBuf,
}

pub fn load_run_config(path: impl AsRef<Path>) -> Result<LoadedRunConfig, RunConfigError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| RunConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: CorrectionRunConfig =
        serde_json::from_str(&source).map_err(|source| RunConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config.check_output_names()?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Ok(LoadedRunConfig { config, base_dir })
}

/// Output names become file stems under the output directory.
fn is_plain_stem(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

impl CorrectionRunConfig {
    fn check_output_names(&self) -> Result<(), RunConfigError> {
        for (key, name) in [
            ("sfOutputWorkspace", &self.sf_output_workspace),
            ("nsfOutputWorkspace", &self.nsf_output_workspace),
        ] {
            if !is_plain_stem(name) {
                return Err(RunConfigError::InvalidOutputName {
                    key,
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn workspace_path(&self, role: InputRole) -> &Path {
        match role {
            InputRole::SfData => &self.sf_data_workspace,
            InputRole::NsfData => &self.nsf_data_workspace,
            InputRole::SfCalibration => &self.sf_ni_cr_workspace,
            InputRole::NsfCalibration => &self.nsf_ni_cr_workspace,
            InputRole::SfBackground => &self.sf_bkgr_workspace,
            InputRole::NsfBackground => &self.nsf_bkgr_workspace,
        }
    }

    pub fn parameters(&self) -> CorrectionParameters {
        CorrectionParameters::with_double_spin_flip_probability(
            self.double_spin_flip_scattering_probability,
        )
    }

    /// Inputs are stored under their role slug so one file may serve
    /// several roles.
    pub fn request(&self) -> CorrectionRequest {
        CorrectionRequest {
            sf_data: InputRole::SfData.slug().to_string(),
            nsf_data: InputRole::NsfData.slug().to_string(),
            sf_calibration: InputRole::SfCalibration.slug().to_string(),
            nsf_calibration: InputRole::NsfCalibration.slug().to_string(),
            sf_background: InputRole::SfBackground.slug().to_string(),
            nsf_background: InputRole::NsfBackground.slug().to_string(),
            sf_output: self.sf_output_workspace.clone(),
            nsf_output: self.nsf_output_workspace.clone(),
        }
    }
}

impl LoadedRunConfig {
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Reads the six workspaces (and any `_NORM` siblings) into a fresh
    /// store. A missing normalization is left for the corrector to report.
    pub fn load_store(&self) -> CorrectionResult<WorkspaceStore> {
        let mut store = WorkspaceStore::new();
        for role in InputRole::ALL {
            let path = self.resolve(self.config.workspace_path(role));
            let normalized = load_into_store(&mut store, role.slug(), &path)?;
            if normalized {
                debug!(%role, path = %path.display(), "workspace loaded");
            } else {
                warn!(%role, path = %path.display(), "workspace has no normalization file");
            }
        }
        Ok(store)
    }
}
