//! Doctor collection operations.
//!
//! A doctor's system id doubles as the login username.

use crate::ids::DOCTOR_IDS;
use crate::records::Doctor;
use crate::store::RecordStore;
use crate::{StoreError, StoreResult};

impl RecordStore {
    pub fn doctor_by_id(&self, system_id: &str) -> Option<Doctor> {
        self.all_doctors()
            .into_iter()
            .find(|d| d.system_id == system_id)
    }

    /// Username and system id are the same identifier.
    pub fn doctor_by_username(&self, username: &str) -> Option<Doctor> {
        self.doctor_by_id(username)
    }

    /// All doctors in file order.
    pub fn all_doctors(&self) -> Vec<Doctor> {
        self.load(&self.config().doctors_path())
    }

    /// Appends a doctor. Used for seeding and administrative additions.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuplicateDoctor`] if the system id is taken.
    pub fn add_doctor(&self, doctor: Doctor) -> StoreResult<()> {
        let path = self.config().doctors_path();
        let mut doctors: Vec<Doctor> = self.load_for_update(&path)?;

        if doctors.iter().any(|d| d.system_id == doctor.system_id) {
            tracing::warn!("doctor with system id {} already exists", doctor.system_id);
            return Err(StoreError::DuplicateDoctor(doctor.system_id));
        }

        doctors.push(doctor);
        self.save(&path, &doctors)
    }

    /// Next unused doctor id after the highest `docNNN` on file.
    pub fn generate_new_doctor_id(&self) -> String {
        let doctors = self.all_doctors();
        DOCTOR_IDS.next_after(doctors.iter().map(|d| d.system_id.as_str()))
    }
}
