//! Doctor-facing workflows: login, the day schedule, status changes, walk-ins and reports.

use super::required;
use crate::constants::{
    DATE_FORMAT, DOCTOR_ASSIGNABLE_STATUSES, ID_ALLOCATION_ATTEMPTS, NOTE_WALK_IN,
    STATUS_BOOKED_WALK_IN, STATUS_CANCELLED_BY_CLINIC, TIME_FORMAT, WALK_IN_MEDICAL_HISTORY,
    WALK_IN_REGISTERED_ID_PREFIX,
};
use crate::credentials::PasswordHash;
use crate::records::{Appointment, Doctor, Patient};
use crate::repositories::helpers::insert_with_fresh_id;
use crate::store::RecordStore;
use crate::validation::{parse_date, parse_time};
use crate::{StoreError, StoreResult};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

/// Placeholder shown when an appointment's patient cannot be resolved.
const UNKNOWN_PATIENT: &str = "N/A";

/// Authenticates a doctor by system id (their username) and password.
///
/// # Errors
///
/// [`StoreError::InvalidCredentials`] for an unknown id or a wrong password.
pub fn login_doctor(store: &RecordStore, doctor_id: &str, password: &str) -> StoreResult<Doctor> {
    let doctor_id = required("doctor id", doctor_id)?;
    if password.is_empty() {
        return Err(StoreError::InvalidInput("password is required".into()));
    }

    let doctor = store
        .doctor_by_username(doctor_id.as_str())
        .ok_or(StoreError::InvalidCredentials)?;

    if !PasswordHash::from_plaintext(password).matches(&doctor.hashed_password) {
        tracing::warn!("failed login for doctor {}", doctor_id);
        return Err(StoreError::InvalidCredentials);
    }

    Ok(doctor)
}

/// One row of a doctor's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    #[serde(flatten)]
    pub appointment: Appointment,
    /// `None` when the patient record is missing.
    pub patient_name: Option<String>,
}

impl ScheduleEntry {
    pub fn patient_label(&self) -> &str {
        match self.patient_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => UNKNOWN_PATIENT,
        }
    }

    fn report_line(&self) -> String {
        format!(
            "- Time: {}, Patient: {} (ID: {}), Status: {}, Notes: {}",
            self.appointment.time,
            self.patient_label(),
            self.appointment.patient_system_id,
            self.appointment.status,
            self.appointment.notes
        )
    }
}

/// The doctor's appointments on `date`, cancelled ones included, ordered by time.
pub fn day_schedule(store: &RecordStore, doctor_id: &str, date: NaiveDate) -> Vec<ScheduleEntry> {
    let date = date.format(DATE_FORMAT).to_string();
    let mut appointments = store.appointments_by_date(&date, doctor_id);
    appointments.sort_by(|a, b| a.time.cmp(&b.time));
    with_patient_names(store, appointments)
}

/// Sets one of the doctor-assignable statuses on an appointment of this doctor.
///
/// The status is matched case-insensitively and stored in its canonical spelling. Setting
/// the status the appointment already has writes nothing.
///
/// # Errors
///
/// - [`StoreError::UnknownStatus`] for anything outside the assignable set
/// - [`StoreError::AppointmentNotFound`]
/// - [`StoreError::NotOwner`] when the appointment belongs to another doctor
/// - [`StoreError::SlotTaken`] when reactivating a cancelled appointment whose slot has been
///   booked again
pub fn set_status(
    store: &RecordStore,
    doctor_id: &str,
    appointment_id: &str,
    status: &str,
) -> StoreResult<Appointment> {
    let status = DOCTOR_ASSIGNABLE_STATUSES
        .iter()
        .find(|s| s.eq_ignore_ascii_case(status.trim()))
        .ok_or_else(|| StoreError::UnknownStatus(status.to_string()))?;

    let mut appointment = owned_appointment(store, doctor_id, appointment_id)?;
    if appointment.status == *status {
        return Ok(appointment);
    }

    appointment.status = (*status).to_string();
    store.update_appointment(appointment.clone())?;
    tracing::info!(
        "doctor {} set {} to {}",
        doctor_id,
        appointment_id,
        appointment.status
    );
    Ok(appointment)
}

/// Cancels an appointment on the clinic's side, releasing its slot.
///
/// A non-empty `reason` replaces the appointment notes.
///
/// # Errors
///
/// - [`StoreError::AppointmentNotFound`]
/// - [`StoreError::NotOwner`] when the appointment belongs to another doctor
pub fn cancel_by_clinic(
    store: &RecordStore,
    doctor_id: &str,
    appointment_id: &str,
    reason: Option<&str>,
) -> StoreResult<Appointment> {
    let mut appointment = owned_appointment(store, doctor_id, appointment_id)?;

    appointment.status = STATUS_CANCELLED_BY_CLINIC.into();
    if let Some(reason) = reason.map(str::trim).filter(|r| !r.is_empty()) {
        appointment.notes = reason.to_string();
    }

    store.update_appointment(appointment.clone())?;
    tracing::info!("doctor {} cancelled {}", doctor_id, appointment_id);
    Ok(appointment)
}

/// The patient behind one of the doctor's appointments.
///
/// # Errors
///
/// - [`StoreError::AppointmentNotFound`] / [`StoreError::NotOwner`]
/// - [`StoreError::PatientNotFound`] when the appointment points at a missing patient
pub fn appointment_patient(
    store: &RecordStore,
    doctor_id: &str,
    appointment_id: &str,
) -> StoreResult<Patient> {
    let appointment = owned_appointment(store, doctor_id, appointment_id)?;
    store
        .patient_by_id(&appointment.patient_system_id)
        .ok_or(StoreError::PatientNotFound(appointment.patient_system_id))
}

/// A walk-in booking entered by a doctor.
#[derive(Clone, Debug, Default)]
pub struct WalkIn {
    pub patient_name: String,
    /// Registered ID of the patient, if known.
    pub registered_id: Option<String>,
    pub date: String,
    pub time: String,
}

/// Books a walk-in appointment with the doctor.
///
/// When the registered ID resolves, the existing patient is used. Otherwise a temporary
/// patient without a password is created, registered under the supplied ID or
/// `WALKIN-<system id>`. Any valid `HH:MM` time is accepted; the grid only applies to
/// patient bookings.
///
/// # Errors
///
/// - [`StoreError::InvalidInput`] / [`StoreError::InvalidDate`] / [`StoreError::InvalidTime`]
/// - [`StoreError::DoctorNotFound`]
/// - [`StoreError::SlotTaken`] when the doctor already has an active appointment then
pub fn add_walk_in(store: &RecordStore, doctor_id: &str, walk_in: WalkIn) -> StoreResult<Appointment> {
    let patient_name = required("patient name", &walk_in.patient_name)?;
    let date = parse_date(&walk_in.date)?.format(DATE_FORMAT).to_string();
    let time = parse_time(&walk_in.time)?.format(TIME_FORMAT).to_string();

    if store.doctor_by_id(doctor_id).is_none() {
        return Err(StoreError::DoctorNotFound(doctor_id.to_string()));
    }

    // Refuse before creating a temporary patient for a slot that cannot be booked.
    if store
        .appointments_by_date(&date, doctor_id)
        .iter()
        .any(|a| a.occupies_slot() && a.time == time)
    {
        return Err(StoreError::SlotTaken {
            doctor_id: doctor_id.to_string(),
            date,
            time,
        });
    }

    let registered_id = walk_in
        .registered_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    let patient_id = match registered_id.and_then(|id| store.patient_by_registered_id(id)) {
        Some(patient) => patient.system_id,
        None => create_walk_in_patient(store, patient_name.as_str(), registered_id)?.system_id,
    };

    let appointment = insert_with_fresh_id(
        "appointment",
        ID_ALLOCATION_ATTEMPTS,
        || store.generate_new_appointment_id(),
        |appointment_id| {
            let appointment = Appointment {
                appointment_id,
                patient_system_id: patient_id.clone(),
                doctor_system_id: doctor_id.into(),
                date: date.clone(),
                time: time.clone(),
                status: STATUS_BOOKED_WALK_IN.into(),
                notes: NOTE_WALK_IN.into(),
            };
            store.add_appointment(appointment.clone())?;
            Ok(appointment)
        },
        |e| matches!(e, StoreError::DuplicateAppointment(_)),
    )?;

    tracing::info!(
        "doctor {} added walk-in {} for {}",
        doctor_id,
        appointment.appointment_id,
        patient_id
    );
    Ok(appointment)
}

fn create_walk_in_patient(
    store: &RecordStore,
    name: &str,
    registered_id: Option<&str>,
) -> StoreResult<Patient> {
    insert_with_fresh_id(
        "patient",
        ID_ALLOCATION_ATTEMPTS,
        || store.generate_new_patient_id(),
        |system_id| {
            let registered_id_number = match registered_id {
                Some(id) => id.to_string(),
                None => format!("{WALK_IN_REGISTERED_ID_PREFIX}{system_id}"),
            };
            let patient = Patient {
                system_id,
                registered_id_number,
                name: name.to_string(),
                hashed_password: String::new(),
                medical_history: WALK_IN_MEDICAL_HISTORY.into(),
            };
            store.add_patient(patient.clone())?;
            Ok(patient)
        },
        |e| matches!(e, StoreError::DuplicatePatientId(_)),
    )
}

/// Which appointments a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Today,
    Date(NaiveDate),
    Month { year: i32, month: u32 },
}

impl ReportKind {
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Today => "Today's Booked Appointments",
            ReportKind::Date(_) => "Appointments for Selected Date",
            ReportKind::Month { .. } => "Monthly Summary",
        }
    }
}

/// A plain-text schedule report for one doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoctorReport {
    pub title: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub generated_at: NaiveDateTime,
    /// The day (`YYYY-MM-DD`) or month (`June 2024`) covered.
    pub period: String,
    /// Number of appointments, only reported for monthly summaries.
    pub total: Option<usize>,
    pub entries: Vec<ScheduleEntry>,
}

impl DoctorReport {
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Report Type: {}", self.title)?;
        writeln!(
            f,
            "Generated for: Dr. {} (ID: {})",
            self.doctor_name, self.doctor_id
        )?;
        writeln!(
            f,
            "Date Generated: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(f)?;

        match self.total {
            Some(total) => {
                writeln!(f, "Summary for {}:", self.period)?;
                writeln!(f, "Total appointments in {}: {}", self.period, total)?;
            }
            None => writeln!(f, "Appointments for {}:", self.period)?,
        }

        if self.entries.is_empty() {
            writeln!(f, "No appointments found for this selection.")?;
        }
        for entry in &self.entries {
            writeln!(f, "{}", entry.report_line())?;
        }
        Ok(())
    }
}

/// Builds a report over the doctor's appointments, cancelled ones included.
///
/// Day reports are ordered by time; monthly summaries by date then time.
///
/// # Errors
///
/// - [`StoreError::DoctorNotFound`]
/// - [`StoreError::InvalidDate`] for a month outside `1..=12`
pub fn report(
    store: &RecordStore,
    doctor_id: &str,
    kind: ReportKind,
    now: NaiveDateTime,
) -> StoreResult<DoctorReport> {
    let doctor = store
        .doctor_by_id(doctor_id)
        .ok_or_else(|| StoreError::DoctorNotFound(doctor_id.to_string()))?;

    let (period, total, entries) = match kind {
        ReportKind::Today | ReportKind::Date(_) => {
            let day = match kind {
                ReportKind::Date(day) => day,
                _ => now.date(),
            };
            (
                day.format(DATE_FORMAT).to_string(),
                None,
                day_schedule(store, doctor_id, day),
            )
        }
        ReportKind::Month { year, month } => {
            let first = NaiveDate::from_ymd_opt(year, month, 1)
                .ok_or_else(|| StoreError::InvalidDate(format!("{year}-{month:02}")))?;
            let mut appointments: Vec<Appointment> = store
                .appointments_by_doctor_id(doctor_id)
                .into_iter()
                .filter(|a| {
                    parse_date(&a.date)
                        .map(|d| d.year() == first.year() && d.month() == first.month())
                        .unwrap_or(false)
                })
                .collect();
            appointments.sort_by(|a, b| (&a.date, &a.time).cmp(&(&b.date, &b.time)));
            let entries = with_patient_names(store, appointments);
            (
                first.format("%B %Y").to_string(),
                Some(entries.len()),
                entries,
            )
        }
    };

    Ok(DoctorReport {
        title: kind.title().to_string(),
        doctor_id: doctor.system_id,
        doctor_name: doctor.name,
        generated_at: now,
        period,
        total,
        entries,
    })
}

fn owned_appointment(
    store: &RecordStore,
    doctor_id: &str,
    appointment_id: &str,
) -> StoreResult<Appointment> {
    let appointment = store
        .appointment_by_id(appointment_id)
        .ok_or_else(|| StoreError::AppointmentNotFound(appointment_id.to_string()))?;

    if appointment.doctor_system_id != doctor_id {
        return Err(StoreError::NotOwner {
            appointment_id: appointment_id.to_string(),
            owner_id: doctor_id.to_string(),
        });
    }
    Ok(appointment)
}

fn with_patient_names(store: &RecordStore, appointments: Vec<Appointment>) -> Vec<ScheduleEntry> {
    let patients = store.all_patients();
    appointments
        .into_iter()
        .map(|appointment| {
            let patient_name = patients
                .iter()
                .find(|p| p.system_id == appointment.patient_system_id)
                .map(|p| p.name.clone());
            ScheduleEntry {
                appointment,
                patient_name,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::constants::{DEFAULT_DOCTOR_PASSWORD, STATUS_CONFIRMED};
    use crate::services::patients::{book_appointment, register_patient, RegisterPatient};
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_store(data_dir: &Path) -> RecordStore {
        let cfg = StoreConfig::new(data_dir.to_path_buf()).expect("StoreConfig::new should succeed");
        RecordStore::open(Arc::new(cfg)).expect("open should succeed")
    }

    fn day(text: &str) -> NaiveDate {
        parse_date(text).expect("valid date")
    }

    fn now() -> NaiveDateTime {
        day("2024-06-01").and_time(parse_time("08:00").expect("valid time"))
    }

    fn register(store: &RecordStore, name: &str, registered_id: &str) -> Patient {
        register_patient(
            store,
            RegisterPatient {
                name: name.into(),
                registered_id: registered_id.into(),
                password: "password1".into(),
                confirm_password: "password1".into(),
                medical_history: String::new(),
            },
        )
        .expect("registration should succeed")
    }

    fn walk_in(name: &str, registered_id: Option<&str>, time: &str) -> WalkIn {
        WalkIn {
            patient_name: name.into(),
            registered_id: registered_id.map(str::to_string),
            date: "2024-06-03".into(),
            time: time.into(),
        }
    }

    #[test]
    fn test_login_doctor_with_seed_password() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());

        let doctor = login_doctor(&store, "doc004", DEFAULT_DOCTOR_PASSWORD).expect("should log in");
        assert_eq!(doctor.name, "Mohamed");

        assert!(matches!(
            login_doctor(&store, "doc004", "wrong"),
            Err(StoreError::InvalidCredentials)
        ));
        assert!(matches!(
            login_doctor(&store, "doc999", DEFAULT_DOCTOR_PASSWORD),
            Err(StoreError::InvalidCredentials)
        ));
        assert!(matches!(
            login_doctor(&store, "  ", DEFAULT_DOCTOR_PASSWORD),
            Err(StoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_day_schedule_orders_by_time_and_names_patients() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());
        let alice = register(&store, "Alice", "N1");

        book_appointment(&store, &alice.system_id, "doc001", "2024-06-03", "14:00", now())
            .expect("book");
        book_appointment(&store, &alice.system_id, "doc001", "2024-06-03", "09:30", now())
            .expect("book");
        book_appointment(&store, &alice.system_id, "doc002", "2024-06-03", "09:00", now())
            .expect("book");
        store
            .add_appointment(Appointment {
                appointment_id: "app5000".into(),
                patient_system_id: "pat999".into(),
                doctor_system_id: "doc001".into(),
                date: "2024-06-03".into(),
                time: "11:00".into(),
                status: "Booked".into(),
                notes: String::new(),
            })
            .expect("add");

        let schedule = day_schedule(&store, "doc001", day("2024-06-03"));
        let times: Vec<_> = schedule.iter().map(|e| e.appointment.time.as_str()).collect();
        assert_eq!(times, vec!["09:30", "11:00", "14:00"]);
        assert_eq!(schedule[0].patient_label(), "Alice");
        assert_eq!(schedule[1].patient_name, None);
        assert_eq!(schedule[1].patient_label(), "N/A");
    }

    #[test]
    fn test_set_status_checks_status_and_owner() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());
        let alice = register(&store, "Alice", "N1");
        let booked =
            book_appointment(&store, &alice.system_id, "doc001", "2024-06-03", "10:00", now())
                .expect("book");

        let updated = set_status(&store, "doc001", &booked.appointment_id, "confirmed")
            .expect("status change should succeed");
        assert_eq!(updated.status, STATUS_CONFIRMED);
        assert_eq!(store.appointment_by_id(&booked.appointment_id), Some(updated.clone()));

        let unchanged = set_status(&store, "doc001", &booked.appointment_id, "Confirmed")
            .expect("no-op should succeed");
        assert_eq!(unchanged, updated);

        assert!(matches!(
            set_status(&store, "doc001", &booked.appointment_id, "Cancelled by clinic"),
            Err(StoreError::UnknownStatus(_))
        ));
        assert!(matches!(
            set_status(&store, "doc002", &booked.appointment_id, "Completed"),
            Err(StoreError::NotOwner { .. })
        ));
        assert!(matches!(
            set_status(&store, "doc001", "app9999", "Completed"),
            Err(StoreError::AppointmentNotFound(_))
        ));
    }

    #[test]
    fn test_set_status_refuses_to_double_book_reused_slot() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());
        let alice = register(&store, "Alice", "N1");
        let bob = register(&store, "Bob", "N2");

        let first =
            book_appointment(&store, &alice.system_id, "doc001", "2024-06-03", "10:00", now())
                .expect("book");
        cancel_by_clinic(&store, "doc001", &first.appointment_id, None).expect("cancel");
        book_appointment(&store, &bob.system_id, "doc001", "2024-06-03", "10:00", now())
            .expect("freed slot should be bookable");

        assert!(matches!(
            set_status(&store, "doc001", &first.appointment_id, "Booked"),
            Err(StoreError::SlotTaken { .. })
        ));

        let active = day_schedule(&store, "doc001", day("2024-06-03"))
            .into_iter()
            .filter(|e| e.appointment.occupies_slot())
            .count();
        assert_eq!(active, 1);
    }

    #[test]
    fn test_cancel_by_clinic_frees_slot_and_records_reason() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());
        let alice = register(&store, "Alice", "N1");
        let booked =
            book_appointment(&store, &alice.system_id, "doc001", "2024-06-03", "10:00", now())
                .expect("book");

        let cancelled = cancel_by_clinic(&store, "doc001", &booked.appointment_id, Some("Doctor ill"))
            .expect("cancel should succeed");
        assert_eq!(cancelled.status, STATUS_CANCELLED_BY_CLINIC);
        assert_eq!(cancelled.notes, "Doctor ill");

        book_appointment(&store, &alice.system_id, "doc001", "2024-06-03", "10:00", now())
            .expect("slot should be free again");

        assert!(matches!(
            cancel_by_clinic(&store, "doc002", &booked.appointment_id, None),
            Err(StoreError::NotOwner { .. })
        ));
    }

    #[test]
    fn test_appointment_patient_resolves_owner() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());
        let alice = register(&store, "Alice", "N1");
        let booked =
            book_appointment(&store, &alice.system_id, "doc001", "2024-06-03", "10:00", now())
                .expect("book");

        let patient = appointment_patient(&store, "doc001", &booked.appointment_id)
            .expect("patient should resolve");
        assert_eq!(patient, alice);
    }

    #[test]
    fn test_walk_in_creates_temporary_patient() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());

        let appointment = add_walk_in(&store, "doc003", walk_in("Walter", None, "12:15"))
            .expect("walk-in should succeed");
        assert_eq!(appointment.status, STATUS_BOOKED_WALK_IN);
        assert_eq!(appointment.notes, NOTE_WALK_IN);
        assert_eq!(appointment.time, "12:15");

        let patient = store
            .patient_by_id(&appointment.patient_system_id)
            .expect("temporary patient should exist");
        assert_eq!(patient.name, "Walter");
        assert_eq!(patient.registered_id_number, format!("WALKIN-{}", patient.system_id));
        assert_eq!(patient.medical_history, WALK_IN_MEDICAL_HISTORY);
        assert!(!patient.can_log_in());

        let appointment = add_walk_in(&store, "doc003", walk_in("Wendy", Some("N77"), "12:30"))
            .expect("walk-in should succeed");
        let patient = store
            .patient_by_id(&appointment.patient_system_id)
            .expect("temporary patient should exist");
        assert_eq!(patient.registered_id_number, "N77");
    }

    #[test]
    fn test_walk_in_reuses_registered_patient() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());
        let alice = register(&store, "Alice", "N1");

        let appointment = add_walk_in(&store, "doc001", walk_in("Alice", Some("N1"), "09:00"))
            .expect("walk-in should succeed");
        assert_eq!(appointment.patient_system_id, alice.system_id);
        assert_eq!(store.all_patients().len(), 1);
    }

    #[test]
    fn test_walk_in_taken_slot_creates_no_patient() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());

        add_walk_in(&store, "doc001", walk_in("First", None, "09:00")).expect("walk-in");
        assert!(matches!(
            add_walk_in(&store, "doc001", walk_in("Second", None, "09:00")),
            Err(StoreError::SlotTaken { .. })
        ));
        assert_eq!(store.all_patients().len(), 1);

        assert!(matches!(
            add_walk_in(&store, "doc001", walk_in("Third", None, "9am")),
            Err(StoreError::InvalidTime(_))
        ));
        assert!(matches!(
            add_walk_in(&store, "doc001", walk_in("", None, "10:00")),
            Err(StoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_day_report_renders_lines() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());
        let alice = register(&store, "Alice", "N1");
        book_appointment(&store, &alice.system_id, "doc001", "2024-06-03", "10:00", now())
            .expect("book");

        let report = report(&store, "doc001", ReportKind::Date(day("2024-06-03")), now())
            .expect("report should build");
        let text = report.render();

        assert!(text.starts_with("Report Type: Appointments for Selected Date\n"));
        assert!(text.contains("Generated for: Dr. Nancy (ID: doc001)"));
        assert!(text.contains("Appointments for 2024-06-03:"));
        assert!(text.contains(&format!(
            "- Time: 10:00, Patient: Alice (ID: {}), Status: Booked, Notes: Booked by patient.",
            alice.system_id
        )));
        assert_eq!(report.total, None);
        assert_eq!(report.to_string(), text);

        let empty = super::report(&store, "doc001", ReportKind::Today, now()).expect("report");
        assert!(empty.render().contains("No appointments found for this selection."));
    }

    #[test]
    fn test_month_report_counts_appointments() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());
        let alice = register(&store, "Alice", "N1");
        for (date, time) in [("2024-06-20", "09:00"), ("2024-06-03", "10:00"), ("2024-07-01", "09:00")] {
            book_appointment(&store, &alice.system_id, "doc001", date, time, now()).expect("book");
        }

        let report = report(&store, "doc001", ReportKind::Month { year: 2024, month: 6 }, now())
            .expect("report should build");
        assert_eq!(report.total, Some(2));
        assert_eq!(report.period, "June 2024");
        let dates: Vec<_> = report.entries.iter().map(|e| e.appointment.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-06-03", "2024-06-20"]);
        assert!(report.render().contains("Total appointments in June 2024: 2"));

        assert!(matches!(
            super::report(&store, "doc001", ReportKind::Month { year: 2024, month: 13 }, now()),
            Err(StoreError::InvalidDate(_))
        ));
        assert!(matches!(
            super::report(&store, "doc999", ReportKind::Today, now()),
            Err(StoreError::DoctorNotFound(_))
        ));
    }
}
