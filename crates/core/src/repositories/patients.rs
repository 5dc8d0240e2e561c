//! Patient collection operations.

use super::helpers::replace_by_id;
use crate::ids::PATIENT_IDS;
use crate::records::{Patient, Record};
use crate::store::RecordStore;
use crate::{StoreError, StoreResult};

impl RecordStore {
    /// Appends a patient.
    ///
    /// # Errors
    ///
    /// - [`StoreError::DuplicatePatientId`] if the system id is taken
    /// - [`StoreError::DuplicateRegisteredId`] if the registered id number is taken
    /// - [`StoreError::FileRead`] / [`StoreError::FileWrite`] on I/O failure
    pub fn add_patient(&self, patient: Patient) -> StoreResult<()> {
        let path = self.config().patients_path();
        let mut patients: Vec<Patient> = self.load_for_update(&path)?;

        for existing in &patients {
            if existing.system_id == patient.system_id {
                tracing::warn!("patient system id {} already exists", patient.system_id);
                return Err(StoreError::DuplicatePatientId(patient.system_id));
            }
            if existing.registered_id_number == patient.registered_id_number {
                tracing::warn!(
                    "patient registered id {} already exists",
                    patient.registered_id_number
                );
                return Err(StoreError::DuplicateRegisteredId(
                    patient.registered_id_number,
                ));
            }
        }

        patients.push(patient);
        self.save(&path, &patients)
    }

    pub fn patient_by_id(&self, system_id: &str) -> Option<Patient> {
        self.all_patients()
            .into_iter()
            .find(|p| p.system_id == system_id)
    }

    pub fn patient_by_registered_id(&self, registered_id: &str) -> Option<Patient> {
        self.all_patients()
            .into_iter()
            .find(|p| p.registered_id_number == registered_id)
    }

    /// All patients in file (insertion) order.
    pub fn all_patients(&self) -> Vec<Patient> {
        self.load(&self.config().patients_path())
    }

    /// Replaces the patient with the same system id.
    ///
    /// # Errors
    ///
    /// - [`StoreError::PatientNotFound`] when no patient has that system id
    /// - [`StoreError::DuplicateRegisteredId`] when another patient holds the new registered
    ///   id number
    ///
    /// The file is left untouched on error.
    pub fn update_patient(&self, patient: Patient) -> StoreResult<()> {
        let path = self.config().patients_path();
        let mut patients: Vec<Patient> = self.load_for_update(&path)?;

        if patients.iter().any(|p| {
            p.system_id != patient.system_id
                && p.registered_id_number == patient.registered_id_number
        }) {
            tracing::warn!(
                "patient registered id {} already exists",
                patient.registered_id_number
            );
            return Err(StoreError::DuplicateRegisteredId(
                patient.registered_id_number,
            ));
        }

        let system_id = patient.id().to_string();
        if !replace_by_id(&mut patients, patient) {
            return Err(StoreError::PatientNotFound(system_id));
        }

        self.save(&path, &patients)
    }

    /// Next unused patient system id (`pat101`, `pat102`, ...).
    pub fn generate_new_patient_id(&self) -> String {
        let patients = self.all_patients();
        PATIENT_IDS.next_after(patients.iter().map(|p| p.system_id.as_str()))
    }
}
