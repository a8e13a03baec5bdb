//! This module provides a local store for day documents
//!
//! It keeps every user's documents in memory, optionally persisted to a JSON backing file.
//! Tests also use it to mock the remote store (see the `local_store_mocks_remote_store`
//! feature).

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(feature = "local_store_mocks_remote_store")]
use std::sync::Arc;
#[cfg(feature = "local_store_mocks_remote_store")]
use crate::mock_behaviour::MockBehaviour;

use crate::auth::UserId;
use crate::date_key::DateKey;
use crate::task::TaskDocument;
use crate::traits::{DocumentStore, StoreError};

/// A document store that keeps its data in a local file
pub struct Cache {
    backing_file: Option<PathBuf>,
    data: Mutex<CachedData>,

    /// In case we mock a remote store, this may be used to trigger has-been-asked-to errors
    #[cfg(feature = "local_store_mocks_remote_store")]
    mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>,
}

#[derive(Default, Debug, PartialEq, Serialize, Deserialize)]
struct CachedData {
    users: HashMap<UserId, BTreeMap<DateKey, TaskDocument>>,
}

impl Cache {
    /// Get the default path to the cache file of a given user
    pub fn cache_file_for(user: &UserId) -> PathBuf {
        let file_name = format!("{}.json", sanitize_filename::sanitize(user));
        PathBuf::from("~/.config/tarefas").join(file_name)
    }

    /// Initialize a cache from the content of a valid backing file if it exists.
    /// Returns an error otherwise
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let data = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(file) => serde_json::from_reader(file)?,
        };

        Ok(Self {
            backing_file: Some(PathBuf::from(path)),
            data: Mutex::new(data),
            #[cfg(feature = "local_store_mocks_remote_store")]
            mock_behaviour: None,
        })
    }

    /// Initialize an empty cache that will persist to the given backing file
    pub fn new(path: &Path) -> Self {
        Self {
            backing_file: Some(PathBuf::from(path)),
            data: Mutex::new(CachedData::default()),
            #[cfg(feature = "local_store_mocks_remote_store")]
            mock_behaviour: None,
        }
    }

    /// Initialize an empty cache that lives in memory only
    pub fn in_memory() -> Self {
        Self {
            backing_file: None,
            data: Mutex::new(CachedData::default()),
            #[cfg(feature = "local_store_mocks_remote_store")]
            mock_behaviour: None,
        }
    }

    #[cfg(feature = "local_store_mocks_remote_store")]
    pub fn set_mock_behaviour(&mut self, mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>) {
        self.mock_behaviour = mock_behaviour;
    }

    /// Store the current contents to the backing file, if there is one
    fn save_to_file(&self) {
        let path = match &self.backing_file {
            None => return,
            Some(path) => path,
        };

        let file = match std::fs::File::create(path) {
            Err(err) => {
                log::warn!("Unable to save file {:?}: {}", path, err);
                return;
            },
            Ok(f) => f,
        };

        let data = self.data.lock().unwrap();
        if let Err(err) = serde_json::to_writer(file, &*data) {
            log::warn!("Unable to serialize: {}", err);
            return;
        };
    }

    /// Insert a day document directly, bypassing the [`DocumentStore`] interface.
    /// Mostly useful to populate test stores
    pub fn add_document(&self, user: &UserId, key: DateKey, doc: TaskDocument) {
        let mut data = self.data.lock().unwrap();
        data.users.entry(user.clone()).or_default().insert(key, doc);
    }

    /// Compares two caches to check they have the same current content
    pub fn has_same_contents_than(&self, other: &Self) -> bool {
        let data_l = self.data.lock().unwrap();
        let data_r = other.data.lock().unwrap();
        *data_l == *data_r
    }
}

#[async_trait]
impl DocumentStore for Cache {
    async fn get_document(&self, user: &UserId, key: &DateKey) -> Result<Option<TaskDocument>, StoreError> {
        #[cfg(feature = "local_store_mocks_remote_store")]
        if let Some(mock) = &self.mock_behaviour {
            mock.lock().unwrap().can_get_document()?;
        }

        let data = self.data.lock().unwrap();
        Ok(data.users.get(user).and_then(|docs| docs.get(key)).cloned())
    }

    async fn set_document(&self, user: &UserId, key: &DateKey, doc: &TaskDocument) -> Result<(), StoreError> {
        #[cfg(feature = "local_store_mocks_remote_store")]
        if let Some(mock) = &self.mock_behaviour {
            mock.lock().unwrap().can_set_document()?;
        }

        {
            let mut data = self.data.lock().unwrap();
            data.users.entry(user.clone()).or_default().insert(*key, doc.clone());
        }
        self.save_to_file();
        Ok(())
    }

    async fn list_documents(&self, user: &UserId) -> Result<Vec<(DateKey, TaskDocument)>, StoreError> {
        #[cfg(feature = "local_store_mocks_remote_store")]
        if let Some(mock) = &self.mock_behaviour {
            mock.lock().unwrap().can_list_documents()?;
        }

        let data = self.data.lock().unwrap();
        Ok(data.users.get(user)
            .map(|docs| docs.iter().map(|(key, doc)| (*key, doc.clone())).collect())
            .unwrap_or_default())
    }

    // The documents are kept ordered by key, so one month is a plain range rather than a
    // whole-collection scan
    async fn list_documents_for_month(
        &self,
        user: &UserId,
        year: i32,
        month: u32,
    ) -> Result<Vec<(DateKey, TaskDocument)>, StoreError> {
        #[cfg(feature = "local_store_mocks_remote_store")]
        if let Some(mock) = &self.mock_behaviour {
            mock.lock().unwrap().can_list_documents()?;
        }

        let first = match DateKey::from_ymd(year, month, 1) {
            None => return Err(format!("not a valid month: {}-{}", year, month).into()),
            Some(first) => first,
        };
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        let next_first = match DateKey::from_ymd(next_year, next_month, 1) {
            None => return Err(format!("not a valid month: {}-{}", next_year, next_month).into()),
            Some(first) => first,
        };

        let data = self.data.lock().unwrap();
        Ok(data.users.get(user)
            .map(|docs| {
                docs.range(first..next_first)
                    .map(|(key, doc)| (*key, doc.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;

    #[tokio::test]
    async fn serde_cache() {
        let cache_path = std::env::temp_dir().join("tarefas-cache-test.json");

        let user: UserId = "some-user".to_string();
        let cache = Cache::new(&cache_path);
        cache.add_document(
            &user,
            "2024-01-15".parse().unwrap(),
            TaskDocument::new(vec![Task::new("Comprar leite")]),
        );
        cache.save_to_file();

        let retrieved_cache = Cache::from_file(&cache_path).unwrap();
        assert!(cache.has_same_contents_than(&retrieved_cache));
    }

    #[tokio::test]
    async fn month_listing_is_a_range() {
        let user: UserId = "some-user".to_string();
        let cache = Cache::in_memory();
        for key in ["2023-12-31", "2024-01-01", "2024-01-31", "2024-02-01"].iter() {
            cache.add_document(&user, key.parse().unwrap(), TaskDocument::new(vec![Task::new("x")]));
        }

        let in_january = cache.list_documents_for_month(&user, 2024, 1).await.unwrap();
        let keys: Vec<String> = in_january.iter().map(|(key, _)| key.to_string()).collect();
        assert_eq!(keys, vec!["2024-01-01", "2024-01-31"]);
    }
}
