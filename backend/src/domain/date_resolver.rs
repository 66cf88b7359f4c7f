//! Date resolution for entry lookups.
//!
//! Given a profile and a target calendar day, decide which stored entry
//! (if any) is effective for that day: the exact match when one exists,
//! otherwise the most recent entry strictly before it, otherwise nothing.

use anyhow::Result;
use shared::Entry;

use crate::storage::traits::EntryStorage;

/// Result of resolving a target date against a profile's entry set.
///
/// Exactly one of three shapes: exact hit (fallback fields empty),
/// fallback hit (exact empty, `fallback_date` is the fallback's own
/// date), or all-empty ("no prior data; start blank").
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntry {
    pub exact: Option<Entry>,
    pub fallback: Option<Entry>,
    pub fallback_date: Option<String>,
}

impl ResolvedEntry {
    fn none() -> Self {
        Self {
            exact: None,
            fallback: None,
            fallback_date: None,
        }
    }
}

/// Resolves target dates against a profile's entries.
///
/// Read-only consumer of the entry store; never writes.
#[derive(Clone)]
pub struct DateResolver<E: EntryStorage> {
    entries: E,
}

impl<E: EntryStorage> DateResolver<E> {
    pub fn new(entries: E) -> Self {
        Self { entries }
    }

    /// Step 1: the entry whose date equals `target_date`, if any.
    pub async fn exact_entry(&self, profile_id: &str, target_date: &str) -> Result<Option<Entry>> {
        self.entries.get_entry_by_date(profile_id, target_date).await
    }

    /// Step 2: the entry with the maximum date strictly before
    /// `target_date`, if any.
    pub async fn entry_before(&self, profile_id: &str, target_date: &str) -> Result<Option<Entry>> {
        self.entries
            .get_entry_before_date(profile_id, target_date)
            .await
    }

    /// The full three-tier resolution, short-circuiting on an exact hit.
    pub async fn resolve(&self, profile_id: &str, target_date: &str) -> Result<ResolvedEntry> {
        if let Some(entry) = self.exact_entry(profile_id, target_date).await? {
            return Ok(ResolvedEntry {
                exact: Some(entry),
                fallback: None,
                fallback_date: None,
            });
        }

        match self.entry_before(profile_id, target_date).await? {
            Some(entry) => {
                let fallback_date = entry.entry_date.clone();
                Ok(ResolvedEntry {
                    exact: None,
                    fallback: Some(entry),
                    fallback_date: Some(fallback_date),
                })
            }
            None => Ok(ResolvedEntry::none()),
        }
    }

    /// Flat existence set of entry dates, descending. Drives
    /// calendar-highlight UI; no fallback semantics apply.
    pub async fn list_entry_dates(&self, profile_id: &str) -> Result<Vec<String>> {
        self.entries.list_entry_dates(profile_id).await
    }
}
