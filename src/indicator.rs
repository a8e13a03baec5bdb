//! The per-month cache of "days that have at least one task"
//!
//! This is what lets the calendar grid be decorated without re-reading every document on
//! every render. It is never persisted: it is rebuilt on month navigation and on sign-in,
//! and patched in place after local mutations.

use std::collections::HashSet;

use crate::auth::UserId;
use crate::calendar::MonthCursor;
use crate::date_key::DateKey;
use crate::error::Error;
use crate::traits::DocumentStore;

/// The set of days with tasks, scoped to exactly one visible month
#[derive(Clone, Debug)]
pub struct IndicatorCache {
    cursor: MonthCursor,
    days: HashSet<DateKey>,
}

impl IndicatorCache {
    /// An empty cache for the given month
    pub fn new(cursor: MonthCursor) -> Self {
        Self {
            cursor,
            days: HashSet::new(),
        }
    }

    /// The month this cache is currently scoped to
    pub fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    pub fn has_tasks(&self, key: &DateKey) -> bool {
        self.days.contains(key)
    }

    /// Rebuild the cache for `cursor` from the store.
    ///
    /// The previous entries are dropped before the store is queried, so a failed refresh
    /// leaves an empty cache for the new month rather than entries of the old one
    pub async fn refresh<S: DocumentStore>(
        &mut self,
        store: &S,
        user: &UserId,
        cursor: MonthCursor,
    ) -> Result<(), Error> {
        self.cursor = cursor;
        self.days.clear();

        let documents = store
            .list_documents_for_month(user, cursor.year(), cursor.month())
            .await
            .map_err(Error::store_unavailable)?;

        for (key, doc) in documents {
            if !doc.is_empty() {
                self.days.insert(key);
            }
        }
        log::debug!("Indicator cache for {}: {} days with tasks", cursor, self.days.len());
        Ok(())
    }

    /// Set or clear the entry of a single day after a local mutation, sparing a rescan.
    /// Days outside the cached month are ignored (their month will be rebuilt when
    /// navigated to anyway)
    pub fn patch(&mut self, key: &DateKey, has_tasks: bool) {
        if !self.cursor.contains(key) {
            return;
        }
        if has_tasks {
            self.days.insert(*key);
        } else {
            self.days.remove(key);
        }
    }
}
