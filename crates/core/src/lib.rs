//! # Clinic Core
//!
//! Record store and business rules for a small outpatient clinic.
//!
//! This crate contains pure data operations over three flat collection files:
//! - Patients, doctors and appointments stored one record per line in a quoted,
//!   comma-delimited format under a single data directory
//! - Identifier allocation (`pat101`, `doc001`, `app1001`, ...)
//! - The booking-conflict rule: one active appointment per doctor, date and time
//! - Workflow services for the patient-facing and doctor-facing front ends
//!
//! **No presentation concerns**: prompts, tables and message wording belong in `clinic-cli`.

pub mod codec;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod ids;
pub mod records;
mod repositories;
pub mod services;
pub mod store;
pub mod validation;

pub use config::StoreConfig;
pub use credentials::PasswordHash;
pub use error::{StoreError, StoreResult};
pub use records::{Appointment, Doctor, Patient};
pub use store::{LoadReport, RecordStore};
