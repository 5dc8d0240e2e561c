//! Patient-facing workflows: registration, login, finding a doctor, booking and cancelling.

use super::required;
use crate::constants::{
    DATE_FORMAT, ID_ALLOCATION_ATTEMPTS, NOTE_BOOKED_BY_PATIENT, SAME_DAY_BUFFER_MINUTES,
    STATUS_BOOKED, STATUS_CANCELLED_BY_USER, STATUS_COMPLETED, TIME_FORMAT, TIME_SLOTS,
};
use crate::credentials::PasswordHash;
use crate::records::{Appointment, Doctor, Patient};
use crate::repositories::helpers::insert_with_fresh_id;
use crate::store::RecordStore;
use crate::validation::{parse_date, parse_time, validate_new_password};
use crate::{StoreError, StoreResult};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::{BTreeSet, HashSet};

/// Details captured by the registration form.
#[derive(Clone, Debug, Default)]
pub struct RegisterPatient {
    pub name: String,
    pub registered_id: String,
    pub password: String,
    pub confirm_password: String,
    pub medical_history: String,
}

/// Registers a new patient and returns the stored record.
///
/// Name, registered ID and password are required; the password must match its confirmation
/// and be at least eight characters long. The system id is allocated by the store.
///
/// # Errors
///
/// - [`StoreError::InvalidInput`], [`StoreError::PasswordMismatch`],
///   [`StoreError::PasswordTooShort`] for form problems
/// - [`StoreError::DuplicateRegisteredId`] when the registered ID is already in use
pub fn register_patient(store: &RecordStore, form: RegisterPatient) -> StoreResult<Patient> {
    let name = required("name", &form.name)?;
    let registered_id = required("registered id", &form.registered_id)?;
    validate_new_password(&form.password, &form.confirm_password)?;

    if store
        .patient_by_registered_id(registered_id.as_str())
        .is_some()
    {
        return Err(StoreError::DuplicateRegisteredId(
            registered_id.into_inner(),
        ));
    }

    let hashed_password = PasswordHash::from_plaintext(&form.password).into_string();
    let medical_history = form.medical_history.trim().to_string();

    let patient = insert_with_fresh_id(
        "patient",
        ID_ALLOCATION_ATTEMPTS,
        || store.generate_new_patient_id(),
        |system_id| {
            let patient = Patient {
                system_id,
                registered_id_number: registered_id.as_str().into(),
                name: name.as_str().into(),
                hashed_password: hashed_password.clone(),
                medical_history: medical_history.clone(),
            };
            store.add_patient(patient.clone())?;
            Ok(patient)
        },
        |e| matches!(e, StoreError::DuplicatePatientId(_)),
    )?;

    tracing::info!("registered patient {}", patient.system_id);
    Ok(patient)
}

/// Authenticates a patient by registered ID and password.
///
/// Unknown IDs, walk-in records without a password and wrong passwords all produce the same
/// [`StoreError::InvalidCredentials`].
pub fn login_patient(store: &RecordStore, registered_id: &str, password: &str) -> StoreResult<Patient> {
    let registered_id = required("registered id", registered_id)?;
    if password.is_empty() {
        return Err(StoreError::InvalidInput("password is required".into()));
    }

    let patient = store
        .patient_by_registered_id(registered_id.as_str())
        .ok_or(StoreError::InvalidCredentials)?;

    if !PasswordHash::from_plaintext(password).matches(&patient.hashed_password) {
        tracing::warn!("failed login for registered id {}", registered_id);
        return Err(StoreError::InvalidCredentials);
    }

    Ok(patient)
}

/// Distinct doctor specializations, sorted.
pub fn specializations(store: &RecordStore) -> Vec<String> {
    store
        .all_doctors()
        .into_iter()
        .map(|d| d.specialization)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Doctors whose specialization equals `specialization`, in file order.
pub fn doctors_by_specialization(store: &RecordStore, specialization: &str) -> Vec<Doctor> {
    store
        .all_doctors()
        .into_iter()
        .filter(|d| d.specialization == specialization)
        .collect()
}

/// Free slots on the clinic grid for one doctor and day.
///
/// Slots held by an active appointment are removed. Days before `now` have no slots, and on
/// the current day a slot must start more than five minutes from `now`.
///
/// # Errors
///
/// [`StoreError::DoctorNotFound`] when the doctor does not exist.
pub fn available_slots(
    store: &RecordStore,
    doctor_id: &str,
    date: NaiveDate,
    now: NaiveDateTime,
) -> StoreResult<Vec<&'static str>> {
    if store.doctor_by_id(doctor_id).is_none() {
        return Err(StoreError::DoctorNotFound(doctor_id.to_string()));
    }

    let date_text = date.format(DATE_FORMAT).to_string();
    let held: HashSet<String> = store
        .appointments_by_date(&date_text, doctor_id)
        .into_iter()
        .filter(Appointment::occupies_slot)
        .map(|a| a.time)
        .collect();

    Ok(TIME_SLOTS
        .iter()
        .copied()
        .filter(|slot| !held.contains(*slot))
        .filter(|slot| slot_is_in_future(date, slot, now))
        .collect())
}

/// Books a grid slot for a patient with status `Booked`.
///
/// # Errors
///
/// - [`StoreError::PatientNotFound`] / [`StoreError::DoctorNotFound`]
/// - [`StoreError::InvalidDate`] / [`StoreError::InvalidTime`] for malformed input
/// - [`StoreError::UnavailableSlot`] when the time is off the grid or already past
/// - [`StoreError::SlotTaken`] when another booking holds the slot
pub fn book_appointment(
    store: &RecordStore,
    patient_id: &str,
    doctor_id: &str,
    date: &str,
    time: &str,
    now: NaiveDateTime,
) -> StoreResult<Appointment> {
    let day = parse_date(date)?;
    let slot_time = parse_time(time)?;
    let time = slot_time.format(TIME_FORMAT).to_string();

    if store.patient_by_id(patient_id).is_none() {
        return Err(StoreError::PatientNotFound(patient_id.to_string()));
    }
    if store.doctor_by_id(doctor_id).is_none() {
        return Err(StoreError::DoctorNotFound(doctor_id.to_string()));
    }
    if !TIME_SLOTS.contains(&time.as_str()) || !slot_is_in_future(day, &time, now) {
        return Err(StoreError::UnavailableSlot(format!("{} {}", date.trim(), time)));
    }

    let appointment = insert_with_fresh_id(
        "appointment",
        ID_ALLOCATION_ATTEMPTS,
        || store.generate_new_appointment_id(),
        |appointment_id| {
            let appointment = Appointment {
                appointment_id,
                patient_system_id: patient_id.into(),
                doctor_system_id: doctor_id.into(),
                date: day.format(DATE_FORMAT).to_string(),
                time: time.clone(),
                status: STATUS_BOOKED.into(),
                notes: NOTE_BOOKED_BY_PATIENT.into(),
            };
            store.add_appointment(appointment.clone())?;
            Ok(appointment)
        },
        |e| matches!(e, StoreError::DuplicateAppointment(_)),
    )?;

    tracing::info!(
        "patient {} booked {} with {} at {} {}",
        patient_id,
        appointment.appointment_id,
        doctor_id,
        appointment.date,
        appointment.time
    );
    Ok(appointment)
}

/// A patient's appointments from `today` on that are neither cancelled nor completed,
/// ordered by date and time.
pub fn upcoming_appointments(store: &RecordStore, patient_id: &str, today: NaiveDate) -> Vec<Appointment> {
    let mut upcoming: Vec<Appointment> = store
        .appointments_by_patient_id(patient_id)
        .into_iter()
        .filter(|a| !a.is_cancelled() && !a.status.eq_ignore_ascii_case(STATUS_COMPLETED))
        .filter(|a| parse_date(&a.date).map(|d| d >= today).unwrap_or(false))
        .collect();

    upcoming.sort_by(|a, b| (&a.date, &a.time).cmp(&(&b.date, &b.time)));
    upcoming
}

/// Cancels one of the patient's own appointments by setting `Cancelled by User`.
///
/// The record stays on file and its slot becomes bookable again.
///
/// # Errors
///
/// - [`StoreError::AppointmentNotFound`]
/// - [`StoreError::NotOwner`] when the appointment belongs to another patient
pub fn cancel_appointment_by_patient(
    store: &RecordStore,
    patient_id: &str,
    appointment_id: &str,
) -> StoreResult<Appointment> {
    let mut appointment = store
        .appointment_by_id(appointment_id)
        .ok_or_else(|| StoreError::AppointmentNotFound(appointment_id.to_string()))?;

    if appointment.patient_system_id != patient_id {
        return Err(StoreError::NotOwner {
            appointment_id: appointment_id.to_string(),
            owner_id: patient_id.to_string(),
        });
    }

    appointment.status = STATUS_CANCELLED_BY_USER.into();
    store.update_appointment(appointment.clone())?;
    tracing::info!("patient {} cancelled {}", patient_id, appointment_id);
    Ok(appointment)
}

fn slot_is_in_future(date: NaiveDate, slot: &str, now: NaiveDateTime) -> bool {
    if date < now.date() {
        return false;
    }
    if date > now.date() {
        return true;
    }
    match parse_time(slot) {
        Ok(t) => t > now.time() + Duration::minutes(SAME_DAY_BUFFER_MINUTES),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_store(data_dir: &Path) -> RecordStore {
        let cfg = StoreConfig::new(data_dir.to_path_buf()).expect("StoreConfig::new should succeed");
        RecordStore::open(Arc::new(cfg)).expect("open should succeed")
    }

    fn form(name: &str, registered_id: &str, password: &str) -> RegisterPatient {
        RegisterPatient {
            name: name.into(),
            registered_id: registered_id.into(),
            password: password.into(),
            confirm_password: password.into(),
            medical_history: String::new(),
        }
    }

    fn at(date: &str, time: &str) -> NaiveDateTime {
        parse_date(date)
            .expect("valid date")
            .and_time(parse_time(time).expect("valid time"))
    }

    #[test]
    fn test_register_allocates_ids_and_hashes_password() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());

        let alice = register_patient(&store, form(" Alice ", "N123", "password1"))
            .expect("registration should succeed");
        let bob = register_patient(&store, form("Bob", "N456", "password2"))
            .expect("registration should succeed");

        assert_eq!(alice.system_id, "pat101");
        assert_eq!(bob.system_id, "pat102");
        assert_eq!(alice.name, "Alice");
        assert_eq!(
            alice.hashed_password,
            PasswordHash::from_plaintext("password1").as_str()
        );
        assert_eq!(store.patient_by_registered_id("N123"), Some(alice));
    }

    #[test]
    fn test_register_enforces_form_rules() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());

        assert!(matches!(
            register_patient(&store, form("", "N1", "password1")),
            Err(StoreError::InvalidInput(_))
        ));
        assert!(matches!(
            register_patient(&store, form("Al", "N1", "short")),
            Err(StoreError::PasswordTooShort(_))
        ));

        let mut mismatched = form("Al", "N1", "password1");
        mismatched.confirm_password = "password2".into();
        assert!(matches!(
            register_patient(&store, mismatched),
            Err(StoreError::PasswordMismatch)
        ));

        register_patient(&store, form("Al", "N1", "password1")).expect("should register");
        assert!(matches!(
            register_patient(&store, form("Other", "N1", "password1")),
            Err(StoreError::DuplicateRegisteredId(_))
        ));
        assert_eq!(store.all_patients().len(), 1);
    }

    #[test]
    fn test_login_patient() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());
        register_patient(&store, form("Alice", "N123", "password1")).expect("should register");

        let patient = login_patient(&store, "N123", "password1").expect("login should succeed");
        assert_eq!(patient.name, "Alice");

        assert!(matches!(
            login_patient(&store, "N123", "wrong-password"),
            Err(StoreError::InvalidCredentials)
        ));
        assert!(matches!(
            login_patient(&store, "N999", "password1"),
            Err(StoreError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_login_rejects_walk_in_without_password() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());
        store
            .add_patient(Patient {
                system_id: "pat101".into(),
                registered_id_number: "WALKIN-pat101".into(),
                name: "Walk In".into(),
                hashed_password: String::new(),
                medical_history: String::new(),
            })
            .expect("add should succeed");

        assert!(matches!(
            login_patient(&store, "WALKIN-pat101", "anything"),
            Err(StoreError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_specializations_group_seed_roster() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());

        assert_eq!(
            specializations(&store),
            vec!["General Medicine", "Heart Doctor", "Nutritionist"]
        );
        let names: Vec<_> = doctors_by_specialization(&store, "Nutritionist")
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["Sarah", "Mariam"]);
        assert!(doctors_by_specialization(&store, "Dentist").is_empty());
    }

    #[test]
    fn test_available_slots_exclude_held_but_not_cancelled() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());
        let alice = register_patient(&store, form("Alice", "N1", "password1")).expect("register");
        let now = at("2024-06-30", "12:00");

        let held = book_appointment(&store, &alice.system_id, "doc001", "2024-07-01", "09:00", now)
            .expect("booking should succeed");
        let released =
            book_appointment(&store, &alice.system_id, "doc001", "2024-07-01", "09:30", now)
                .expect("booking should succeed");
        cancel_appointment_by_patient(&store, &alice.system_id, &released.appointment_id)
            .expect("cancel should succeed");

        let day = parse_date("2024-07-01").expect("valid date");
        let slots = available_slots(&store, "doc001", day, now).expect("doctor exists");

        assert!(!slots.contains(&held.time.as_str()));
        assert!(slots.contains(&"09:30"), "cancelled slot should be free again");
        assert_eq!(slots.len(), TIME_SLOTS.len() - 1);

        let other = available_slots(&store, "doc002", day, now).expect("doctor exists");
        assert_eq!(other.len(), TIME_SLOTS.len());
    }

    #[test]
    fn test_available_slots_respect_current_time() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());
        let today = parse_date("2024-07-01").expect("valid date");

        let slots =
            available_slots(&store, "doc001", today, at("2024-07-01", "14:26")).expect("slots");
        assert_eq!(slots, vec!["15:00", "15:30", "16:00", "16:30"]);

        let slots =
            available_slots(&store, "doc001", today, at("2024-07-02", "08:00")).expect("slots");
        assert!(slots.is_empty(), "past days have no slots");

        assert!(matches!(
            available_slots(&store, "doc999", today, at("2024-06-01", "08:00")),
            Err(StoreError::DoctorNotFound(_))
        ));
    }

    #[test]
    fn test_book_appointment_rejects_bad_requests() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());
        let alice = register_patient(&store, form("Alice", "N1", "password1")).expect("register");
        let now = at("2024-06-30", "12:00");

        assert!(matches!(
            book_appointment(&store, &alice.system_id, "doc001", "2024-07-01", "09:15", now),
            Err(StoreError::UnavailableSlot(_))
        ));
        assert!(matches!(
            book_appointment(&store, &alice.system_id, "doc001", "2024-06-29", "09:00", now),
            Err(StoreError::UnavailableSlot(_))
        ));
        assert!(matches!(
            book_appointment(&store, &alice.system_id, "doc001", "1 July", "09:00", now),
            Err(StoreError::InvalidDate(_))
        ));
        assert!(matches!(
            book_appointment(&store, "pat999", "doc001", "2024-07-01", "09:00", now),
            Err(StoreError::PatientNotFound(_))
        ));
        assert!(matches!(
            book_appointment(&store, &alice.system_id, "doc999", "2024-07-01", "09:00", now),
            Err(StoreError::DoctorNotFound(_))
        ));

        let booked = book_appointment(&store, &alice.system_id, "doc001", "2024-07-01", "09:00", now)
            .expect("booking should succeed");
        assert_eq!(booked.appointment_id, "app1001");
        assert_eq!(booked.status, STATUS_BOOKED);
        assert_eq!(booked.notes, NOTE_BOOKED_BY_PATIENT);

        assert!(matches!(
            book_appointment(&store, &alice.system_id, "doc001", "2024-07-01", "09:00", now),
            Err(StoreError::SlotTaken { .. })
        ));
    }

    #[test]
    fn test_upcoming_appointments_filters_and_orders() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());
        let alice = register_patient(&store, form("Alice", "N1", "password1")).expect("register");
        let now = at("2024-06-01", "08:00");

        let later = book_appointment(&store, &alice.system_id, "doc002", "2024-07-03", "10:00", now)
            .expect("book");
        let sooner = book_appointment(&store, &alice.system_id, "doc001", "2024-07-01", "16:00", now)
            .expect("book");
        let cancelled =
            book_appointment(&store, &alice.system_id, "doc001", "2024-07-02", "09:00", now)
                .expect("book");
        cancel_appointment_by_patient(&store, &alice.system_id, &cancelled.appointment_id).expect("cancel");

        let mut completed =
            book_appointment(&store, &alice.system_id, "doc003", "2024-07-02", "11:00", now)
                .expect("book");
        completed.status = STATUS_COMPLETED.into();
        store.update_appointment(completed).expect("update");

        let today = parse_date("2024-07-01").expect("valid date");
        let ids: Vec<_> = upcoming_appointments(&store, &alice.system_id, today)
            .into_iter()
            .map(|a| a.appointment_id)
            .collect();
        assert_eq!(ids, vec![sooner.appointment_id, later.appointment_id.clone()]);

        let after = parse_date("2024-07-02").expect("valid date");
        assert_eq!(
            upcoming_appointments(&store, &alice.system_id, after).len(),
            1
        );
    }

    #[test]
    fn test_cancel_requires_ownership() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());
        let alice = register_patient(&store, form("Alice", "N1", "password1")).expect("register");
        let bob = register_patient(&store, form("Bob", "N2", "password2")).expect("register");
        let now = at("2024-06-01", "08:00");

        let booked = book_appointment(&store, &alice.system_id, "doc001", "2024-07-01", "10:00", now)
            .expect("book");

        assert!(matches!(
            cancel_appointment_by_patient(&store, &bob.system_id, &booked.appointment_id),
            Err(StoreError::NotOwner { .. })
        ));
        assert!(matches!(
            cancel_appointment_by_patient(&store, &alice.system_id, "app9999"),
            Err(StoreError::AppointmentNotFound(_))
        ));

        let cancelled =
            cancel_appointment_by_patient(&store, &alice.system_id, &booked.appointment_id).expect("cancel");
        assert_eq!(cancelled.status, STATUS_CANCELLED_BY_USER);
        assert_eq!(
            store.appointment_by_id(&booked.appointment_id),
            Some(cancelled)
        );
    }
}
