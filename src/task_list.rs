//! CRUD on the ordered task list of one day
//!
//! Every mutation is a whole-document read-modify-write: load the current list, change it,
//! write it all back. There is no partial update and no concurrency token; the last write
//! wins, which is the accepted trade-off for a single-user tool.

use std::sync::Arc;

use crate::auth::UserId;
use crate::date_key::DateKey;
use crate::error::Error;
use crate::task::{Task, TaskDocument, TaskUid};
use crate::traits::DocumentStore;

/// The task lists of one user, backed by a document store
pub struct TaskLists<S: DocumentStore> {
    store: Arc<S>,
    user: UserId,
}

impl<S: DocumentStore> TaskLists<S> {
    pub fn new(store: Arc<S>, user: UserId) -> Self {
        Self { store, user }
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// The ordered task list of this day.
    ///
    /// A missing document is a day that never had tasks: an empty list, not an error.
    /// A store failure is reported as [`Error::StoreUnavailable`] so callers can keep the
    /// two cases apart, even though both render as an empty day
    pub async fn load(&self, key: &DateKey) -> Result<Vec<Task>, Error> {
        match self.store.get_document(&self.user, key).await.map_err(Error::store_unavailable)? {
            None => {
                log::debug!("No document for {}, treating as an empty day", key);
                Ok(Vec::new())
            },
            Some(doc) => Ok(doc.into_tasks()),
        }
    }

    /// Append a task at the end of this day's list and return the written list.
    ///
    /// The day's first task makes its indicator appear; callers patch the
    /// [`IndicatorCache`](crate::indicator::IndicatorCache) when the returned list has
    /// exactly one element
    pub async fn append(&self, key: &DateKey, text: &str) -> Result<Vec<Task>, Error> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput);
        }

        let mut tasks = self.load(key).await?;
        tasks.push(Task::new(text));
        self.write_back(key, &tasks).await?;
        Ok(tasks)
    }

    /// Flip the completion state of one task and return the written list
    pub async fn toggle_done(&self, key: &DateKey, uid: &TaskUid) -> Result<Vec<Task>, Error> {
        let mut tasks = self.load_for_mutation(key).await?;

        let task = tasks.iter_mut()
            .find(|task| task.uid() == uid)
            .ok_or(Error::NotFound { key: *key })?;
        let done = task.done();
        task.set_done(!done);

        self.write_back(key, &tasks).await?;
        Ok(tasks)
    }

    /// Remove one task, keeping the relative order of the others, and return the written
    /// list. The day's indicator should be cleared when it comes back empty
    pub async fn remove(&self, key: &DateKey, uid: &TaskUid) -> Result<Vec<Task>, Error> {
        let mut tasks = self.load_for_mutation(key).await?;

        let position = tasks.iter()
            .position(|task| task.uid() == uid)
            .ok_or(Error::NotFound { key: *key })?;
        tasks.remove(position);

        self.write_back(key, &tasks).await?;
        Ok(tasks)
    }

    /// Unlike [`Self::load`], mutating a day that has no document is an error: the task the
    /// caller is pointing at cannot exist
    async fn load_for_mutation(&self, key: &DateKey) -> Result<Vec<Task>, Error> {
        match self.store.get_document(&self.user, key).await.map_err(Error::store_unavailable)? {
            None => Err(Error::NotFound { key: *key }),
            Some(doc) => Ok(doc.into_tasks()),
        }
    }

    async fn write_back(&self, key: &DateKey, tasks: &[Task]) -> Result<(), Error> {
        let doc = TaskDocument::new(tasks.to_vec());
        self.store.set_document(&self.user, key, &doc).await.map_err(Error::store_unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Cache;

    fn lists() -> TaskLists<Cache> {
        TaskLists::new(Arc::new(Cache::in_memory()), "some-user".to_string())
    }

    fn key() -> DateKey {
        "2024-01-15".parse().unwrap()
    }

    #[tokio::test]
    async fn an_unknown_day_is_an_empty_list() {
        assert!(lists().load(&key()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_then_load() {
        let lists = lists();
        lists.append(&key(), "Comprar leite").await.unwrap();

        let tasks = lists.load(&key()).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text(), "Comprar leite");
        assert_eq!(tasks[0].done(), false);
    }

    #[tokio::test]
    async fn append_trims_and_rejects_empty_text() {
        let lists = lists();
        assert!(matches!(lists.append(&key(), "   ").await, Err(Error::InvalidInput)));
        // Rejected before any store call: the day is still empty
        assert!(lists.load(&key()).await.unwrap().is_empty());

        let tasks = lists.append(&key(), "  ok  ").await.unwrap();
        assert_eq!(tasks[0].text(), "ok");
    }

    #[tokio::test]
    async fn toggling_twice_is_idempotent() {
        let lists = lists();
        let tasks = lists.append(&key(), "Comprar leite").await.unwrap();
        let uid = tasks[0].uid().to_string();

        let tasks = lists.toggle_done(&key(), &uid).await.unwrap();
        assert_eq!(tasks[0].done(), true);
        let tasks = lists.toggle_done(&key(), &uid).await.unwrap();
        assert_eq!(tasks[0].done(), false);
    }

    #[tokio::test]
    async fn remove_keeps_the_relative_order() {
        let lists = lists();
        lists.append(&key(), "a").await.unwrap();
        let snapshot = lists.append(&key(), "b").await.unwrap();
        lists.append(&key(), "c").await.unwrap();

        let uid_b = snapshot[1].uid().to_string();
        let tasks = lists.remove(&key(), &uid_b).await.unwrap();
        let texts: Vec<&str> = tasks.iter().map(Task::text).collect();
        assert_eq!(texts, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn mutating_a_vanished_task_is_not_found() {
        let lists = lists();
        assert!(matches!(
            lists.toggle_done(&key(), &"gone".to_string()).await,
            Err(Error::NotFound { .. })
        ));

        let tasks = lists.append(&key(), "a").await.unwrap();
        let uid = tasks[0].uid().to_string();
        lists.remove(&key(), &uid).await.unwrap();
        assert!(matches!(
            lists.remove(&key(), &uid).await,
            Err(Error::NotFound { .. })
        ));
    }
}
