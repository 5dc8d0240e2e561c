//! Input validation utilities.
//!
//! The record store itself accepts any text. These checks are applied by the workflow
//! services before anything reaches the store, so that dates and times are stored in one
//! canonical spelling and slot comparisons by string equality stay meaningful.

use crate::constants::{DATE_FORMAT, MIN_PASSWORD_LEN, TIME_FORMAT};
use crate::{StoreError, StoreResult};
use chrono::{NaiveDate, NaiveTime};

/// Parses a `YYYY-MM-DD` date, rejecting non-canonical spellings such as `2024-6-1`.
pub fn parse_date(input: &str) -> StoreResult<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .ok()
        .filter(|d| d.format(DATE_FORMAT).to_string() == input)
        .ok_or_else(|| StoreError::InvalidDate(input.to_string()))
}

/// Parses a 24-hour `HH:MM` time, rejecting non-canonical spellings such as `9:00`.
pub fn parse_time(input: &str) -> StoreResult<NaiveTime> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, TIME_FORMAT)
        .ok()
        .filter(|t| t.format(TIME_FORMAT).to_string() == input)
        .ok_or_else(|| StoreError::InvalidTime(input.to_string()))
}

/// Checks a new password against its confirmation and the minimum length.
pub fn validate_new_password(password: &str, confirmation: &str) -> StoreResult<()> {
    if password.is_empty() {
        return Err(StoreError::InvalidInput("password cannot be empty".into()));
    }

    if password != confirmation {
        return Err(StoreError::PasswordMismatch);
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(StoreError::PasswordTooShort(MIN_PASSWORD_LEN));
    }

    Ok(())
}
