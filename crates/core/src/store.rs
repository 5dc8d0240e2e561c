//! The record store.
//!
//! [`RecordStore`] owns the three collection files under one data directory. Every operation
//! is a whole-collection cycle: read and decode the full file, work on it in memory, and for
//! mutations rewrite the full file. There is no locking; the store assumes a single process
//! owns the directory.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//!   patients.txt       # systemId,registeredIdNumber,name,hashedPassword,medicalHistory
//!   doctors.txt        # systemId,name,hashedPassword,specialization
//!   appointments.txt   # appointmentId,patientSystemId,doctorSystemId,date,time,status,notes
//! ```
//!
//! ## Failure policy
//!
//! - Queries never fail: an unreadable file is logged and treated as an empty collection.
//! - Mutations refuse to run on a file they could not read ([`StoreError::FileRead`]), so a
//!   transient read error never turns into an overwrite with an empty collection.
//! - Malformed rows are skipped; [`RecordStore::load_report`] exposes how many.
//!
//! The per-entity operations live in the `repositories` module.

use crate::codec::{self, Decoded};
use crate::config::StoreConfig;
use crate::constants::{DEFAULT_DOCTOR_PASSWORD, SEED_DOCTORS};
use crate::credentials::PasswordHash;
use crate::records::{Appointment, Doctor, Patient, Record};
use crate::{StoreError, StoreResult};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

/// Number of malformed rows skipped in each collection on the most recent read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub patients_skipped: usize,
    pub doctors_skipped: usize,
    pub appointments_skipped: usize,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.patients_skipped == 0 && self.doctors_skipped == 0 && self.appointments_skipped == 0
    }
}

/// Durable CRUD over the patient, doctor and appointment collections.
#[derive(Clone, Debug)]
pub struct RecordStore {
    cfg: Arc<StoreConfig>,
}

impl RecordStore {
    /// Opens the store, preparing the data directory on first use.
    ///
    /// Creates the data directory and empty patient/appointment files when absent. When the
    /// doctor collection is absent or holds no rows, it is seeded with the default roster, all
    /// sharing the hashed default password. Opening an already-seeded directory never adds
    /// doctors again.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if:
    /// - the data directory cannot be created ([`StoreError::StorageDirCreation`])
    /// - a collection file cannot be created or the roster cannot be written
    ///   ([`StoreError::FileWrite`])
    /// - the doctor file exists but cannot be read ([`StoreError::FileRead`])
    pub fn open(cfg: Arc<StoreConfig>) -> StoreResult<Self> {
        fs::create_dir_all(cfg.data_dir()).map_err(StoreError::StorageDirCreation)?;

        let store = Self { cfg };
        touch(&store.cfg.patients_path())?;
        touch(&store.cfg.appointments_path())?;
        store.seed_doctors_if_empty()?;

        Ok(store)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.cfg
    }

    /// Re-reads every collection and reports how many malformed rows each one contains.
    ///
    /// Unreadable files count as empty.
    pub fn load_report(&self) -> LoadReport {
        let skipped = |result: StoreResult<usize>| result.unwrap_or(0);
        LoadReport {
            patients_skipped: skipped(
                self.read_collection::<Patient>(&self.cfg.patients_path())
                    .map(|d| d.skipped_rows),
            ),
            doctors_skipped: skipped(
                self.read_collection::<Doctor>(&self.cfg.doctors_path())
                    .map(|d| d.skipped_rows),
            ),
            appointments_skipped: skipped(
                self.read_collection::<Appointment>(&self.cfg.appointments_path())
                    .map(|d| d.skipped_rows),
            ),
        }
    }

    fn seed_doctors_if_empty(&self) -> StoreResult<()> {
        let path = self.cfg.doctors_path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(StoreError::FileRead(e)),
        };

        if !codec::parse_rows(&contents).is_empty() {
            return Ok(());
        }

        let password = PasswordHash::from_plaintext(DEFAULT_DOCTOR_PASSWORD);
        let roster: Vec<Doctor> = SEED_DOCTORS
            .iter()
            .map(|(system_id, name, specialization)| Doctor {
                system_id: (*system_id).into(),
                name: (*name).into(),
                hashed_password: password.as_str().into(),
                specialization: (*specialization).into(),
            })
            .collect();

        self.save(&path, &roster)?;
        tracing::info!(
            "seeded {} default doctors into {}",
            roster.len(),
            path.display()
        );
        Ok(())
    }

    /// Reads and decodes one collection. A missing file is an empty collection.
    pub(crate) fn read_collection<R: Record>(&self, path: &Path) -> StoreResult<Decoded<R>> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(StoreError::FileRead(e)),
        };

        let decoded = codec::decode::<R>(&contents);
        if decoded.skipped_rows > 0 {
            tracing::warn!(
                "skipped {} malformed {} row(s) in {}",
                decoded.skipped_rows,
                R::KIND,
                path.display()
            );
        }
        Ok(decoded)
    }

    /// Loads a collection for a query, degrading to empty when the file is unreadable.
    pub(crate) fn load<R: Record>(&self, path: &Path) -> Vec<R> {
        match self.read_collection(path) {
            Ok(decoded) => decoded.records,
            Err(e) => {
                tracing::warn!(
                    "could not read {} collection {}: {}",
                    R::KIND,
                    path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Loads a collection that is about to be rewritten. Read failures are fatal here.
    pub(crate) fn load_for_update<R: Record>(&self, path: &Path) -> StoreResult<Vec<R>> {
        self.read_collection(path).map(|decoded| decoded.records)
    }

    /// Rewrites a whole collection file.
    pub(crate) fn save<R: Record>(&self, path: &Path, records: &[R]) -> StoreResult<()> {
        fs::write(path, codec::encode(records)).map_err(|e| {
            tracing::warn!(
                "could not write {} collection {}: {}",
                R::KIND,
                path.display(),
                e
            );
            StoreError::FileWrite(e)
        })?;
        tracing::debug!(
            "saved {} {} record(s) to {}",
            records.len(),
            R::KIND,
            path.display()
        );
        Ok(())
    }
}

/// Creates an empty file if absent, leaving existing content untouched.
fn touch(path: &Path) -> StoreResult<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
        .map_err(StoreError::FileWrite)
}
