use crate::domain::{CorrectionError, Spectrum};
use std::collections::BTreeMap;

pub const NORMALIZATION_SUFFIX: &str = "_NORM";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("workspace name must not be empty")]
    EmptyName,
    #[error("workspace '{0}' already exists")]
    DuplicateName(String),
}

impl From<StoreError> for CorrectionError {
    fn from(error: StoreError) -> Self {
        CorrectionError::input_validation("INPUT.STORE_NAME", error.to_string())
    }
}

pub fn normalization_name(name: &str) -> String {
    format!("{}{}", name.trim(), NORMALIZATION_SUFFIX)
}

/// Named spectra owned by the caller.
///
/// Names are unique; the normalization of workspace `name` is stored as
/// `name_NORM`.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceStore {
    entries: BTreeMap<String, Spectrum>,
}

impl WorkspaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, spectrum: Spectrum) -> Result<(), StoreError> {
        let key = validated_name(name)?;
        if self.entries.contains_key(&key) {
            return Err(StoreError::DuplicateName(key));
        }
        self.entries.insert(key, spectrum);
        Ok(())
    }

    /// Returns the replaced spectrum, if any.
    pub fn insert_or_replace(
        &mut self,
        name: &str,
        spectrum: Spectrum,
    ) -> Result<Option<Spectrum>, StoreError> {
        let key = validated_name(name)?;
        Ok(self.entries.insert(key, spectrum))
    }

    pub fn get(&self, name: &str) -> Option<&Spectrum> {
        self.entries.get(name.trim())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Spectrum> {
        self.entries.get_mut(name.trim())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name.trim())
    }

    pub fn remove(&mut self, name: &str) -> Option<Spectrum> {
        self.entries.remove(name.trim())
    }

    pub fn normalization_for(&self, name: &str) -> Option<&Spectrum> {
        self.entries.get(&normalization_name(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validated_name(name: &str) -> Result<String, StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyName);
    }
    Ok(trimmed.to_string())
}
