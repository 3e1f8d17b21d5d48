use super::store::{WorkspaceStore, normalization_name};
use crate::domain::{CorrectionError, CorrectionResult, Spectrum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub fn normalize_text_artifact(content: &str) -> String {
    let mut normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

pub fn write_text_artifact(path: &Path, content: &str) -> std::io::Result<()> {
    fs::write(path, normalize_text_artifact(content))
}

pub fn read_spectrum(path: &Path) -> CorrectionResult<Spectrum> {
    let source = fs::read_to_string(path).map_err(|source| {
        CorrectionError::io_system(
            "IO.WORKSPACE_READ",
            format!("failed to read workspace '{}': {}", path.display(), source),
        )
    })?;
    serde_json::from_str(&source).map_err(|source| {
        CorrectionError::input_validation(
            "INPUT.WORKSPACE_PARSE",
            format!("failed to parse workspace '{}': {}", path.display(), source),
        )
    })
}

pub fn write_spectrum(path: &Path, spectrum: &Spectrum) -> CorrectionResult<()> {
    let content = serde_json::to_string_pretty(spectrum).map_err(|source| {
        CorrectionError::internal(
            "SYS.WORKSPACE_SERIALIZE",
            format!("failed to serialize workspace: {}", source),
        )
    })?;
    write_text_artifact(path, &content).map_err(|source| {
        CorrectionError::io_system(
            "IO.WORKSPACE_WRITE",
            format!("failed to write workspace '{}': {}", path.display(), source),
        )
    })
}

/// `<dir>/<stem>_NORM.json` next to a workspace file.
pub fn normalization_path(path: &Path) -> Option<PathBuf> {
    let stem = path.file_stem()?.to_str()?;
    Some(path.with_file_name(format!("{}.json", normalization_name(stem))))
}

/// Loads a workspace under `name` and, when its `_NORM` sibling file
/// exists, the normalization under `name_NORM`. Returns whether a
/// normalization was found.
pub fn load_into_store(
    store: &mut WorkspaceStore,
    name: &str,
    path: &Path,
) -> CorrectionResult<bool> {
    store.insert(name, read_spectrum(path)?)?;

    let Some(norm_path) = normalization_path(path).filter(|candidate| candidate.is_file()) else {
        debug!(workspace = name, "no normalization file next to workspace");
        return Ok(false);
    };
    store.insert(&normalization_name(name), read_spectrum(&norm_path)?)?;
    debug!(workspace = name, normalization = %norm_path.display(), "normalization loaded");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::{
        load_into_store, normalization_path, normalize_text_artifact, read_spectrum,
        write_spectrum,
    };
    use crate::domain::{DetectorBank, SampleLogs, Spectrum};
    use crate::modules::store::WorkspaceStore;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn sample() -> Spectrum {
        let mut logs = SampleLogs::new();
        logs.add_multiple("flipper,polarisation,deterota", "ON,x,-7.53");
        Spectrum::from_counts(vec![4.0, 9.0], DetectorBank::uniform(2, 7.53, 5.0, 0.8), logs)
            .expect("spectrum")
    }

    #[test]
    fn normalize_text_artifact_uses_canonical_line_endings() {
        let normalized = normalize_text_artifact("alpha\r\nbeta\rgamma");
        assert_eq!(normalized, "alpha\nbeta\ngamma\n");
    }

    #[test]
    fn written_workspace_reads_back_identically() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("vana_sf.json");
        let spectrum = sample();

        write_spectrum(&path, &spectrum).expect("write should succeed");
        let first = fs::read(&path).expect("workspace should be readable");
        write_spectrum(&path, &spectrum).expect("second write should succeed");
        let second = fs::read(&path).expect("workspace should be readable");

        assert_eq!(first, second);
        assert!(first.ends_with(b"}\n"));
        assert_eq!(read_spectrum(&path).expect("read should succeed"), spectrum);
    }

    #[test]
    fn normalization_file_sits_next_to_workspace() {
        assert_eq!(
            normalization_path(Path::new("data/sf_nicr.json")),
            Some(Path::new("data/sf_nicr_NORM.json").to_path_buf())
        );
    }

    #[test]
    fn load_into_store_picks_up_normalization_sibling() {
        let temp = TempDir::new().expect("tempdir should be created");
        let data_path = temp.path().join("sf_nicr.json");
        let spectrum = sample();
        write_spectrum(&data_path, &spectrum).expect("data");
        write_spectrum(
            &temp.path().join("sf_nicr_NORM.json"),
            &Spectrum::uniform_like(&spectrum, 1.0, 1.0),
        )
        .expect("norm");

        let mut store = WorkspaceStore::new();
        let found = load_into_store(&mut store, "calibration", &data_path).expect("load");
        assert!(found);
        assert!(store.contains("calibration"));
        assert!(store.normalization_for("calibration").is_some());

        let lone_path = temp.path().join("lone.json");
        write_spectrum(&lone_path, &spectrum).expect("lone");
        let found = load_into_store(&mut store, "lone", &lone_path).expect("load");
        assert!(!found);
        assert!(store.normalization_for("lone").is_none());
    }

    #[test]
    fn unreadable_and_malformed_workspaces_have_distinct_codes() {
        let temp = TempDir::new().expect("tempdir should be created");
        let missing = read_spectrum(&temp.path().join("missing.json")).expect_err("missing");
        assert_eq!(missing.code(), "IO.WORKSPACE_READ");
        assert_eq!(missing.exit_code(), 3);

        let malformed_path = temp.path().join("bad.json");
        fs::write(&malformed_path, "{ not json").expect("write");
        let malformed = read_spectrum(&malformed_path).expect_err("malformed");
        assert_eq!(malformed.code(), "INPUT.WORKSPACE_PARSE");
    }
}
