//! Merging imported entries into an existing file's entries.

use crate::types::{NO_TRANSLATION, StringEntry};

/// Counts from one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Existing entries that received an incoming value.
    pub updated: usize,
    /// Existing entries with no incoming counterpart.
    pub kept: usize,
    /// Incoming entries appended as untranslated.
    pub added: usize,
    /// Merged entries whose value is [`NO_TRANSLATION`], appended or not.
    pub untranslated: usize,
}

/// Merges `incoming` into `existing`.
///
/// Existing entries keep their order and are never removed. An entry with a
/// matching name takes the incoming value; its comment stays unless it is
/// empty. Incoming entries left unmatched are appended with the value
/// [`NO_TRANSLATION`].
pub fn merge(existing: &[StringEntry], incoming: Vec<StringEntry>) -> Vec<StringEntry> {
    merge_with_report(existing, incoming).0
}

pub fn merge_with_report(
    existing: &[StringEntry],
    incoming: Vec<StringEntry>,
) -> (Vec<StringEntry>, MergeReport) {
    let mut pool = incoming;
    let mut report = MergeReport::default();
    let mut merged = Vec::with_capacity(existing.len() + pool.len());

    for entry in existing {
        let Some(idx) = pool.iter().position(|e| e.name == entry.name) else {
            report.kept += 1;
            merged.push(entry.clone());
            continue;
        };
        let found = pool.remove(idx);
        let comment = match entry.non_empty_comment() {
            Some(comment) => Some(comment.to_string()),
            None => found.comment,
        };
        report.updated += 1;
        merged.push(StringEntry {
            name: entry.name.clone(),
            value: found.value,
            comment,
        });
    }

    report.added = pool.len();
    merged.extend(pool.into_iter().map(|mut e| {
        e.value = NO_TRANSLATION.to_string();
        e
    }));
    report.untranslated = merged.iter().filter(|e| e.is_untranslated()).count();
    (merged, report)
}
