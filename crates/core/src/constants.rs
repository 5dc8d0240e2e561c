//! Constants used throughout the clinic core crate.
//!
//! File names, identifier layouts, status labels and the seed roster live here so the
//! store, the workflow services and the CLI agree on them.

/// Default directory for record files when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Filename for the patient collection.
pub const PATIENTS_FILENAME: &str = "patients.txt";

/// Filename for the doctor collection.
pub const DOCTORS_FILENAME: &str = "doctors.txt";

/// Filename for the appointment collection.
pub const APPOINTMENTS_FILENAME: &str = "appointments.txt";

/// Field delimiter for every collection file.
pub const FIELD_DELIMITER: char = ',';

/// Quote character used to wrap fields that need escaping.
pub const QUOTE: char = '"';

pub const PATIENT_ID_PREFIX: &str = "pat";
pub const PATIENT_ID_BASE: u32 = 101;
pub const PATIENT_ID_WIDTH: usize = 3;

pub const DOCTOR_ID_PREFIX: &str = "doc";
pub const DOCTOR_ID_BASE: u32 = 1;
pub const DOCTOR_ID_WIDTH: usize = 3;

pub const APPOINTMENT_ID_PREFIX: &str = "app";
pub const APPOINTMENT_ID_BASE: u32 = 1001;
pub const APPOINTMENT_ID_WIDTH: usize = 4;

/// Attempts made to allocate a fresh identifier before giving up.
pub const ID_ALLOCATION_ATTEMPTS: usize = 5;

/// Prefix for the registered ID of walk-in patients who did not supply one.
pub const WALK_IN_REGISTERED_ID_PREFIX: &str = "WALKIN-";

/// Medical history recorded for temporary walk-in patients.
pub const WALK_IN_MEDICAL_HISTORY: &str = "Walk-in appointment.";

pub const STATUS_BOOKED: &str = "Booked";
pub const STATUS_BOOKED_WALK_IN: &str = "Booked (Walk-in)";
pub const STATUS_CONFIRMED: &str = "Confirmed";
pub const STATUS_COMPLETED: &str = "Completed";
pub const STATUS_NO_SHOW: &str = "No Show";
pub const STATUS_RESCHEDULED: &str = "Rescheduled";
pub const STATUS_CANCELLED_BY_USER: &str = "Cancelled by User";
pub const STATUS_CANCELLED_BY_CLINIC: &str = "Cancelled by clinic";

/// Lowercased labels that release a slot.
pub const CANCELLATION_LABELS: [&str; 2] = ["cancelled by user", "cancelled by clinic"];

/// Statuses a doctor may assign from the schedule view.
pub const DOCTOR_ASSIGNABLE_STATUSES: [&str; 5] = [
    STATUS_BOOKED,
    STATUS_CONFIRMED,
    STATUS_COMPLETED,
    STATUS_NO_SHOW,
    STATUS_RESCHEDULED,
];

pub const NOTE_BOOKED_BY_PATIENT: &str = "Booked by patient.";
pub const NOTE_WALK_IN: &str = "Added by doctor as walk-in.";

/// Half-hour booking grid of the clinic day.
pub const TIME_SLOTS: [&str; 12] = [
    "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "14:00", "14:30", "15:00", "15:30",
    "16:00", "16:30",
];

/// Same-day slots must start later than now plus this many minutes.
pub const SAME_DAY_BUFFER_MINUTES: i64 = 5;

pub const MIN_PASSWORD_LEN: usize = 8;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Plaintext password shared by the seed roster.
pub const DEFAULT_DOCTOR_PASSWORD: &str = "doctorpass";

/// `(system id, name, specialization)` of the doctors written on first run.
pub const SEED_DOCTORS: [(&str, &str, &str); 5] = [
    ("doc001", "Nancy", "General Medicine"),
    ("doc002", "Sarah", "Nutritionist"),
    ("doc003", "Mariam", "Nutritionist"),
    ("doc004", "Mohamed", "Heart Doctor"),
    ("doc005", "Magdy", "Heart Doctor"),
];
