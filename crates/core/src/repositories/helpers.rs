//! Repository-related utilities shared by the collection modules.

use crate::records::Record;
use crate::{StoreError, StoreResult};

/// Replaces the record whose id matches `record.id()`.
///
/// Returns `false` when no record carries that id, leaving `records` untouched.
pub(crate) fn replace_by_id<R: Record>(records: &mut [R], record: R) -> bool {
    match records.iter_mut().find(|r| r.id() == record.id()) {
        Some(slot) => {
            *slot = record;
            true
        }
        None => false,
    }
}

/// Inserts a record under a freshly allocated identifier, retrying on id collisions.
///
/// `allocate` produces a candidate id and `insert` tries to store the record under it. If
/// `insert` fails with an error for which `is_collision` holds (another writer took the id
/// between allocation and insert), a new id is allocated. Gives up after `attempts` tries.
///
/// # Errors
///
/// Returns the first non-collision error from `insert`, or [`StoreError::IdAllocation`]
/// when every attempt collided.
pub(crate) fn insert_with_fresh_id<T>(
    kind: &'static str,
    attempts: usize,
    mut allocate: impl FnMut() -> String,
    mut insert: impl FnMut(String) -> StoreResult<T>,
    is_collision: impl Fn(&StoreError) -> bool,
) -> StoreResult<T> {
    for _attempt in 0..attempts {
        let id = allocate();
        match insert(id) {
            Ok(value) => return Ok(value),
            Err(e) if is_collision(&e) => {
                tracing::warn!("{} id collision, allocating another: {}", kind, e);
                continue;
            }
            Err(e) => return Err(e),
        }
    }

    Err(StoreError::IdAllocation(kind, attempts))
}
