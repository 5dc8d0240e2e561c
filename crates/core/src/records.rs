//! Record types persisted by the store.
//!
//! Each type is a flat set of string fields in the exact column order of its collection file.
//! Fields are free text: the store validates uniqueness and slot conflicts, nothing
//! else.

use crate::constants::CANCELLATION_LABELS;
use serde::{Deserialize, Serialize};

/// A type that maps one-to-one onto a row of a collection file.
pub trait Record: Sized {
    /// Human-readable collection name used in logs.
    const KIND: &'static str;

    /// Number of columns in the collection file.
    const FIELD_COUNT: usize;

    /// The unique identifier of the record.
    fn id(&self) -> &str;

    /// Field values in column order.
    fn to_fields(&self) -> Vec<&str>;

    /// Builds a record from exactly [`Record::FIELD_COUNT`] fields; `None` on any other count.
    fn from_fields(fields: Vec<String>) -> Option<Self>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub system_id: String,
    pub registered_id_number: String,
    pub name: String,
    /// Hex SHA-256 of the password; empty for walk-in patients who cannot log in.
    #[serde(skip_serializing, default)]
    pub hashed_password: String,
    pub medical_history: String,
}

impl Patient {
    /// Walk-in records are created without credentials.
    pub fn can_log_in(&self) -> bool {
        !self.hashed_password.is_empty()
    }
}

impl Record for Patient {
    const KIND: &'static str = "patient";
    const FIELD_COUNT: usize = 5;

    fn id(&self) -> &str {
        &self.system_id
    }

    fn to_fields(&self) -> Vec<&str> {
        vec![
            self.system_id.as_str(),
            self.registered_id_number.as_str(),
            self.name.as_str(),
            self.hashed_password.as_str(),
            self.medical_history.as_str(),
        ]
    }

    fn from_fields(fields: Vec<String>) -> Option<Self> {
        let [system_id, registered_id_number, name, hashed_password, medical_history]: [String;
            5] = fields.try_into().ok()?;
        Some(Self {
            system_id,
            registered_id_number,
            name,
            hashed_password,
            medical_history,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    /// Also the doctor's login username.
    pub system_id: String,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub hashed_password: String,
    pub specialization: String,
}

impl Record for Doctor {
    const KIND: &'static str = "doctor";
    const FIELD_COUNT: usize = 4;

    fn id(&self) -> &str {
        &self.system_id
    }

    fn to_fields(&self) -> Vec<&str> {
        vec![
            self.system_id.as_str(),
            self.name.as_str(),
            self.hashed_password.as_str(),
            self.specialization.as_str(),
        ]
    }

    fn from_fields(fields: Vec<String>) -> Option<Self> {
        let [system_id, name, hashed_password, specialization]: [String; 4] =
            fields.try_into().ok()?;
        Some(Self {
            system_id,
            name,
            hashed_password,
            specialization,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub appointment_id: String,
    pub patient_system_id: String,
    pub doctor_system_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, 24-hour
    pub time: String,
    pub status: String,
    pub notes: String,
}

impl Appointment {
    /// True when the status is one of the cancellation labels (case-insensitive).
    pub fn is_cancelled(&self) -> bool {
        is_cancellation_label(&self.status)
    }

    /// A non-cancelled appointment holds its doctor's date/time slot.
    pub fn occupies_slot(&self) -> bool {
        !self.is_cancelled()
    }

    pub fn same_slot(&self, other: &Appointment) -> bool {
        self.doctor_system_id == other.doctor_system_id
            && self.date == other.date
            && self.time == other.time
    }
}

pub fn is_cancellation_label(status: &str) -> bool {
    let lowered = status.trim().to_lowercase();
    CANCELLATION_LABELS.contains(&lowered.as_str())
}

impl Record for Appointment {
    const KIND: &'static str = "appointment";
    const FIELD_COUNT: usize = 7;

    fn id(&self) -> &str {
        &self.appointment_id
    }

    fn to_fields(&self) -> Vec<&str> {
        vec![
            self.appointment_id.as_str(),
            self.patient_system_id.as_str(),
            self.doctor_system_id.as_str(),
            self.date.as_str(),
            self.time.as_str(),
            self.status.as_str(),
            self.notes.as_str(),
        ]
    }

    fn from_fields(fields: Vec<String>) -> Option<Self> {
        let [appointment_id, patient_system_id, doctor_system_id, date, time, status, notes]: [String; 7] =
            fields.try_into().ok()?;
        Some(Self {
            appointment_id,
            patient_system_id,
            doctor_system_id,
            date,
            time,
            status,
            notes,
        })
    }
}
