//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the record store. The core never reads process-wide environment variables; the
//! binary resolves them and hands the result over.

use crate::constants::{
    APPOINTMENTS_FILENAME, DEFAULT_DATA_DIR, DOCTORS_FILENAME, PATIENTS_FILENAME,
};
use crate::{StoreError, StoreResult};
use std::path::{Path, PathBuf};

/// Store configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    data_dir: PathBuf,
    patients_file: String,
    doctors_file: String,
    appointments_file: String,
}

impl StoreConfig {
    /// Create a new `StoreConfig` using the default collection file names.
    pub fn new(data_dir: PathBuf) -> StoreResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(StoreError::InvalidInput("data_dir cannot be empty".into()));
        }

        Ok(Self {
            data_dir,
            patients_file: PATIENTS_FILENAME.into(),
            doctors_file: DOCTORS_FILENAME.into(),
            appointments_file: APPOINTMENTS_FILENAME.into(),
        })
    }

    /// Override the three collection file names.
    ///
    /// Names must be plain file names; they are always resolved inside the data directory.
    pub fn with_file_names(
        mut self,
        patients_file: &str,
        doctors_file: &str,
        appointments_file: &str,
    ) -> StoreResult<Self> {
        for name in [patients_file, doctors_file, appointments_file] {
            validate_file_name(name)?;
        }
        self.patients_file = patients_file.into();
        self.doctors_file = doctors_file.into();
        self.appointments_file = appointments_file.into();
        Ok(self)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn patients_path(&self) -> PathBuf {
        self.data_dir.join(&self.patients_file)
    }

    pub fn doctors_path(&self) -> PathBuf {
        self.data_dir.join(&self.doctors_file)
    }

    pub fn appointments_path(&self) -> PathBuf {
        self.data_dir.join(&self.appointments_file)
    }
}

/// Resolve the data directory without reading environment variables.
///
/// An override that is empty or whitespace-only is ignored, in which case the default
/// `data/` directory relative to the working directory is used.
pub fn resolve_data_dir(override_dir: Option<String>) -> PathBuf {
    override_dir
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

fn validate_file_name(name: &str) -> StoreResult<()> {
    if name.trim().is_empty() {
        return Err(StoreError::InvalidInput(
            "collection file name cannot be empty".into(),
        ));
    }

    let mut components = Path::new(name).components();
    let is_plain = matches!(
        (components.next(), components.next()),
        (Some(std::path::Component::Normal(_)), None)
    );
    if !is_plain {
        return Err(StoreError::InvalidInput(format!(
            "collection file name must not contain path separators: '{}'",
            name
        )));
    }

    Ok(())
}
