use async_trait::async_trait;

use crate::auth::UserId;
use crate::date_key::DateKey;
use crate::task::TaskDocument;

/// The error type store implementations report through.
/// The typed taxonomy the rest of the crate works with is [`crate::error::Error`].
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// A per-user document store holding one [`TaskDocument`] per day.
///
/// Implementations may be remote (e.g. [`Client`](crate::client::Client)) or local
/// (e.g. [`Cache`](crate::cache::Cache)); callers cannot tell them apart.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the day document stored under this key.
    /// Returns `Ok(None)` when no document exists for this day (which is not an error)
    async fn get_document(&self, user: &UserId, key: &DateKey) -> Result<Option<TaskDocument>, StoreError>;

    /// Write the whole day document under this key, replacing any previous content
    async fn set_document(&self, user: &UserId, key: &DateKey, doc: &TaskDocument) -> Result<(), StoreError>;

    /// Enumerate every day document of this user
    async fn list_documents(&self, user: &UserId) -> Result<Vec<(DateKey, TaskDocument)>, StoreError>;

    /// Enumerate the day documents of one month.
    ///
    /// The default implementation scans the whole collection and filters; stores that
    /// support range queries on the key should override it
    async fn list_documents_for_month(
        &self,
        user: &UserId,
        year: i32,
        month: u32,
    ) -> Result<Vec<(DateKey, TaskDocument)>, StoreError> {
        let all = self.list_documents(user).await?;
        Ok(all
            .into_iter()
            .filter(|(key, _)| key.year() == year && key.month() == month)
            .collect())
    }
}
