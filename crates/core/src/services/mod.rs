//! Workflow services used by the patient-facing and doctor-facing front ends.
//!
//! These functions carry the business rules that sit above the record store: registration
//! and login, specialization grouping, the clinic's slot grid, walk-in bookings, status
//! changes and schedule reports. They take the store by reference and never format
//! user-facing messages; errors are returned as [`StoreError`](crate::StoreError) variants.

pub mod doctors;
pub mod patients;

use crate::{StoreError, StoreResult};
use clinic_types::NonEmptyText;

/// Trims `value` and rejects it when empty, naming the missing field.
pub(crate) fn required(field: &str, value: &str) -> StoreResult<NonEmptyText> {
    NonEmptyText::new(value).map_err(|_| StoreError::InvalidInput(format!("{field} is required")))
}
