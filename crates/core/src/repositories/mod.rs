//! Per-collection operations on [`RecordStore`](crate::RecordStore).
//!
//! Each submodule adds an `impl RecordStore` block for one entity type: lookups, inserts
//! guarded by the uniqueness rules, replace-by-id updates and identifier generation.

mod appointments;
mod doctors;
pub(crate) mod helpers;
mod patients;
