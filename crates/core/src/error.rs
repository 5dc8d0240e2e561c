#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to read record file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write record file: {0}")]
    FileWrite(std::io::Error),

    #[error("patient system id already exists: {0}")]
    DuplicatePatientId(String),
    #[error("patient registered id already exists: {0}")]
    DuplicateRegisteredId(String),
    #[error("doctor already exists: {0}")]
    DuplicateDoctor(String),
    #[error("appointment already exists: {0}")]
    DuplicateAppointment(String),
    #[error("doctor {doctor_id} already has an appointment at {date} {time}")]
    SlotTaken {
        doctor_id: String,
        date: String,
        time: String,
    },

    #[error("patient not found: {0}")]
    PatientNotFound(String),
    #[error("doctor not found: {0}")]
    DoctorNotFound(String),
    #[error("appointment not found: {0}")]
    AppointmentNotFound(String),
    #[error("failed to allocate a unique {0} id after {1} attempts")]
    IdAllocation(&'static str, usize),

    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),
    #[error("invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),
    #[error("invalid time (expected HH:MM): {0}")]
    InvalidTime(String),
    #[error("{0} is not a bookable time slot")]
    UnavailableSlot(String),
    #[error("unknown appointment status: {0}")]
    UnknownStatus(String),
    #[error("appointment {appointment_id} does not belong to {owner_id}")]
    NotOwner {
        appointment_id: String,
        owner_id: String,
    },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
