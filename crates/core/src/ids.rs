//! Identifier allocation for the three collections.
//!
//! Identifiers are a fixed prefix followed by a zero-padded decimal counter, for example
//! `pat101`, `doc004` or `app1001`. New identifiers are allocated by scanning the existing
//! collection for the highest counter carrying the same prefix and adding one, so allocation
//! stays collision-free after sparse imports or hand-edited files. The counter never drops
//! below the layout's base value.

use crate::constants::{
    APPOINTMENT_ID_BASE, APPOINTMENT_ID_PREFIX, APPOINTMENT_ID_WIDTH, DOCTOR_ID_BASE,
    DOCTOR_ID_PREFIX, DOCTOR_ID_WIDTH, PATIENT_ID_BASE, PATIENT_ID_PREFIX, PATIENT_ID_WIDTH,
};

/// Prefix, starting value and zero-padding of one identifier family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdLayout {
    pub prefix: &'static str,
    pub base: u32,
    pub width: usize,
}

pub const PATIENT_IDS: IdLayout = IdLayout {
    prefix: PATIENT_ID_PREFIX,
    base: PATIENT_ID_BASE,
    width: PATIENT_ID_WIDTH,
};

pub const DOCTOR_IDS: IdLayout = IdLayout {
    prefix: DOCTOR_ID_PREFIX,
    base: DOCTOR_ID_BASE,
    width: DOCTOR_ID_WIDTH,
};

pub const APPOINTMENT_IDS: IdLayout = IdLayout {
    prefix: APPOINTMENT_ID_PREFIX,
    base: APPOINTMENT_ID_BASE,
    width: APPOINTMENT_ID_WIDTH,
};

impl IdLayout {
    /// Numeric counter of `id` when it belongs to this family.
    ///
    /// The suffix after the prefix must be all ASCII digits; anything else (foreign prefixes,
    /// `WALKIN-` style ids, trailing letters) is not part of the sequence.
    pub fn counter_of(&self, id: &str) -> Option<u32> {
        let suffix = id.strip_prefix(self.prefix)?;
        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        suffix.parse().ok()
    }

    pub fn format(&self, counter: u32) -> String {
        format!("{}{:0width$}", self.prefix, counter, width = self.width)
    }

    /// Next identifier after the highest counter found in `existing`.
    ///
    /// A counter of `u32::MAX` cannot be followed and is left out of the scan; the next id is
    /// taken after the highest remaining counter instead.
    pub fn next_after<'a>(&self, existing: impl IntoIterator<Item = &'a str>) -> String {
        let next = existing
            .into_iter()
            .filter_map(|id| self.counter_of(id))
            .filter(|&counter| counter < u32::MAX)
            .max()
            .map(|max| max + 1)
            .unwrap_or(self.base)
            .max(self.base);
        self.format(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_ids_start_at_base() {
        assert_eq!(PATIENT_IDS.next_after([]), "pat101");
        assert_eq!(DOCTOR_IDS.next_after([]), "doc001");
        assert_eq!(APPOINTMENT_IDS.next_after([]), "app1001");
    }

    #[test]
    fn test_next_after_uses_max_not_count() {
        let existing = ["pat101", "pat150", "pat102"];
        assert_eq!(PATIENT_IDS.next_after(existing), "pat151");
    }

    #[test]
    fn test_next_after_ignores_foreign_ids() {
        let existing = ["doc001", "doc005", "dr-smith", "doc01a", "pat900", "doc"];
        assert_eq!(DOCTOR_IDS.next_after(existing), "doc006");
    }

    #[test]
    fn test_next_after_never_drops_below_base() {
        // Legacy ids below the base must not pull the sequence back into the seed range.
        assert_eq!(PATIENT_IDS.next_after(["pat001", "pat002"]), "pat101");
    }

    #[test]
    fn test_next_after_skips_exhausted_counter() {
        let existing = ["app1001", "app4294967295", "app1002"];
        assert_eq!(APPOINTMENT_IDS.next_after(existing), "app1003");
        assert_eq!(APPOINTMENT_IDS.next_after(["app4294967295"]), "app1001");
    }

    #[test]
    fn test_format_widens_past_padding() {
        assert_eq!(DOCTOR_IDS.format(1000), "doc1000");
        assert_eq!(DOCTOR_IDS.counter_of("doc1000"), Some(1000));
        assert_eq!(APPOINTMENT_IDS.format(7), "app0007");
    }
}
