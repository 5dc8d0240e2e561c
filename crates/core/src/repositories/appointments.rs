//! Appointment collection operations and the booking-conflict rule.
//!
//! For any `(doctor, date, time)` at most one appointment may be active, where active means
//! the status is not a cancellation label. Appointments are never removed: cancelling is an
//! [`update_appointment`](RecordStore::update_appointment) that sets a cancellation label,
//! which frees the slot for a new booking while the cancelled record stays on file.

use super::helpers::replace_by_id;
use crate::ids::APPOINTMENT_IDS;
use crate::records::Appointment;
use crate::store::RecordStore;
use crate::{StoreError, StoreResult};

impl RecordStore {
    /// Appends an appointment if its slot is free.
    ///
    /// # Errors
    ///
    /// - [`StoreError::SlotTaken`] if another active appointment holds the same doctor, date
    ///   and time
    /// - [`StoreError::DuplicateAppointment`] if the appointment id is taken
    pub fn add_appointment(&self, appointment: Appointment) -> StoreResult<()> {
        let path = self.config().appointments_path();
        let mut appointments: Vec<Appointment> = self.load_for_update(&path)?;

        if appointments
            .iter()
            .any(|a| a.appointment_id == appointment.appointment_id)
        {
            tracing::warn!(
                "appointment id {} already exists",
                appointment.appointment_id
            );
            return Err(StoreError::DuplicateAppointment(appointment.appointment_id));
        }

        if appointments
            .iter()
            .any(|a| a.occupies_slot() && a.same_slot(&appointment))
        {
            tracing::warn!(
                "doctor {} already has an appointment at {} {}",
                appointment.doctor_system_id,
                appointment.date,
                appointment.time
            );
            return Err(StoreError::SlotTaken {
                doctor_id: appointment.doctor_system_id,
                date: appointment.date,
                time: appointment.time,
            });
        }

        appointments.push(appointment);
        self.save(&path, &appointments)
    }

    pub fn appointment_by_id(&self, appointment_id: &str) -> Option<Appointment> {
        self.all_appointments()
            .into_iter()
            .find(|a| a.appointment_id == appointment_id)
    }

    pub fn appointments_by_patient_id(&self, patient_id: &str) -> Vec<Appointment> {
        self.appointments_matching(|a| a.patient_system_id == patient_id)
    }

    pub fn appointments_by_doctor_id(&self, doctor_id: &str) -> Vec<Appointment> {
        self.appointments_matching(|a| a.doctor_system_id == doctor_id)
    }

    /// Appointments on `date`, restricted to one doctor unless `doctor_id` is empty.
    pub fn appointments_by_date(&self, date: &str, doctor_id: &str) -> Vec<Appointment> {
        self.appointments_matching(|a| {
            a.date == date && (doctor_id.is_empty() || a.doctor_system_id == doctor_id)
        })
    }

    /// All appointments in file order, cancelled ones included.
    pub fn all_appointments(&self) -> Vec<Appointment> {
        self.load(&self.config().appointments_path())
    }

    /// Replaces the appointment with the same id.
    ///
    /// This is how appointments are cancelled and how their status moves along
    /// (`Booked`, `Confirmed`, `Completed`, ...). The status is free text; no transition is
    /// checked here, but the result must still leave at most one active appointment in the
    /// slot.
    ///
    /// # Errors
    ///
    /// - [`StoreError::AppointmentNotFound`] when no appointment has that id
    /// - [`StoreError::SlotTaken`] when the updated appointment is active and another active
    ///   appointment holds the same doctor, date and time
    pub fn update_appointment(&self, appointment: Appointment) -> StoreResult<()> {
        let path = self.config().appointments_path();
        let mut appointments: Vec<Appointment> = self.load_for_update(&path)?;

        let updated = appointment.clone();
        if !replace_by_id(&mut appointments, appointment) {
            return Err(StoreError::AppointmentNotFound(updated.appointment_id));
        }

        let active_in_slot = appointments
            .iter()
            .filter(|a| a.occupies_slot() && a.same_slot(&updated))
            .count();
        if updated.occupies_slot() && active_in_slot > 1 {
            tracing::warn!(
                "cannot reactivate {}: doctor {} already has an appointment at {} {}",
                updated.appointment_id,
                updated.doctor_system_id,
                updated.date,
                updated.time
            );
            return Err(StoreError::SlotTaken {
                doctor_id: updated.doctor_system_id,
                date: updated.date,
                time: updated.time,
            });
        }

        self.save(&path, &appointments)
    }

    /// Next unused appointment id (`app1001`, `app1002`, ...).
    pub fn generate_new_appointment_id(&self) -> String {
        let appointments = self.all_appointments();
        APPOINTMENT_IDS.next_after(appointments.iter().map(|a| a.appointment_id.as_str()))
    }

    fn appointments_matching(&self, keep: impl Fn(&Appointment) -> bool) -> Vec<Appointment> {
        self.all_appointments()
            .into_iter()
            .filter(|a| keep(a))
            .collect()
    }
}
