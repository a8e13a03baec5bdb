//! This module provides a client to connect to the remote document store (the Firestore
//! REST API, which is where the original application keeps its day documents)

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};
use url::Url;

use crate::auth::UserId;
use crate::config;
use crate::date_key::DateKey;
use crate::task::TaskDocument;
use crate::traits::{DocumentStore, StoreError};

static FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com/v1/";

/// How many documents are requested per page when enumerating a collection
const LIST_PAGE_SIZE: u32 = 300;

/// A document store that fetches its data from Firestore.
///
/// Documents live under `users/{user id}/tasks/{date key}` (collection names can be
/// overridden through [`config`]). Requests authenticate with the Firebase ID token of the
/// signed-in user, which is exactly the scope the store rules grant anyway.
pub struct Client {
    base: Url,
    id_token: String,
    http: reqwest::Client,
}

impl Client {
    /// Create a client for the given Firebase project. This does not start a connection
    pub fn new<S: AsRef<str>, T: ToString>(project_id: S, id_token: T) -> Result<Self, StoreError> {
        let base = Url::parse(FIRESTORE_ENDPOINT)?
            .join(&format!("projects/{}/databases/(default)/documents/", project_id.as_ref()))?;

        Ok(Self {
            base,
            id_token: id_token.to_string(),
            http: reqwest::Client::new(),
        })
    }

    /// Create a client against a custom endpoint (e.g. the Firestore emulator)
    pub fn with_endpoint<S: AsRef<str>, T: ToString>(endpoint: &str, project_id: S, id_token: T) -> Result<Self, StoreError> {
        let base = Url::parse(endpoint)?
            .join(&format!("projects/{}/databases/(default)/documents/", project_id.as_ref()))?;

        Ok(Self {
            base,
            id_token: id_token.to_string(),
            http: reqwest::Client::new(),
        })
    }

    fn collection_url(&self, user: &UserId) -> Result<Url, StoreError> {
        let users = config::USERS_COLLECTION.lock().unwrap().clone();
        let tasks = config::TASKS_COLLECTION.lock().unwrap().clone();
        Ok(self.base.join(&format!("{}/{}/{}/", users, user, tasks))?)
    }

    fn document_url(&self, user: &UserId, key: &DateKey) -> Result<Url, StoreError> {
        Ok(self.collection_url(user)?.join(&key.to_string())?)
    }

    async fn authorized_get(&self, url: Url) -> Result<reqwest::Response, StoreError> {
        let res = self.http
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.id_token))
            .send()
            .await?;
        Ok(res)
    }
}

/// Serialize a day document into the Firestore typed-value representation
fn encode_document(doc: &TaskDocument) -> Value {
    let values: Vec<Value> = doc.tasks().iter()
        .map(|task| json!({
            "mapValue": { "fields": {
                "uid":   { "stringValue": task.uid() },
                "texto": { "stringValue": task.text() },
                "feita": { "booleanValue": task.done() },
            }}
        }))
        .collect();

    json!({ "fields": { "tarefas": { "arrayValue": { "values": values } } } })
}

/// Parse a Firestore document resource back into a day document.
///
/// Firestore omits empty arrays, and documents written by older versions have no `uid`
/// field, so every level tolerates absence (missing uids are re-generated by serde)
fn decode_document(resource: &Value) -> Result<TaskDocument, StoreError> {
    let mut tasks: Vec<Value> = Vec::new();

    if let Some(values) = resource.pointer("/fields/tarefas/arrayValue/values").and_then(Value::as_array) {
        for value in values {
            let fields = match value.pointer("/mapValue/fields") {
                None => return Err(format!("malformed task entry in document: {}", value).into()),
                Some(fields) => fields,
            };

            let mut task = serde_json::Map::new();
            if let Some(uid) = fields.pointer("/uid/stringValue") {
                task.insert("uid".to_string(), uid.clone());
            }
            task.insert("texto".to_string(),
                fields.pointer("/texto/stringValue").cloned().unwrap_or_else(|| Value::String(String::new())));
            task.insert("feita".to_string(),
                fields.pointer("/feita/booleanValue").cloned().unwrap_or(Value::Bool(false)));
            tasks.push(Value::Object(task));
        }
    }

    Ok(serde_json::from_value(json!({ "tarefas": tasks }))?)
}

/// The date key of a document resource is the last segment of its `name` path
fn key_of_resource(resource: &Value) -> Option<DateKey> {
    let name = resource.get("name").and_then(Value::as_str)?;
    let last_segment = name.rsplit('/').next()?;
    match last_segment.parse() {
        Err(_) => {
            log::warn!("Ignoring document with a non-date key: {}", name);
            None
        },
        Ok(key) => Some(key),
    }
}

#[async_trait]
impl DocumentStore for Client {
    async fn get_document(&self, user: &UserId, key: &DateKey) -> Result<Option<TaskDocument>, StoreError> {
        let res = self.authorized_get(self.document_url(user, key)?).await?;

        if res.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !res.status().is_success() {
            return Err(format!("Unable to fetch document {}: {}", key, res.status()).into());
        }

        let resource: Value = serde_json::from_str(&res.text().await?)?;
        Ok(Some(decode_document(&resource)?))
    }

    async fn set_document(&self, user: &UserId, key: &DateKey, doc: &TaskDocument) -> Result<(), StoreError> {
        let body = serde_json::to_string(&encode_document(doc))?;
        let res = self.http
            .patch(self.document_url(user, key)?)
            .header(AUTHORIZATION, format!("Bearer {}", self.id_token))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(format!("Unable to write document {}: {}", key, res.status()).into());
        }
        Ok(())
    }

    async fn list_documents(&self, user: &UserId) -> Result<Vec<(DateKey, TaskDocument)>, StoreError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.collection_url(user)?;
            url.query_pairs_mut().append_pair("pageSize", &LIST_PAGE_SIZE.to_string());
            if let Some(token) = &page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }

            let res = self.authorized_get(url).await?;
            if !res.status().is_success() {
                return Err(format!("Unable to list documents: {}", res.status()).into());
            }
            let page: Value = serde_json::from_str(&res.text().await?)?;

            if let Some(resources) = page.get("documents").and_then(Value::as_array) {
                for resource in resources {
                    if let Some(key) = key_of_resource(resource) {
                        documents.push((key, decode_document(resource)?));
                    }
                }
            }

            page_token = page.get("nextPageToken").and_then(Value::as_str).map(str::to_string);
            if page_token.is_none() {
                break;
            }
        }

        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;

    #[test]
    fn firestore_codec_roundtrip() {
        let mut done = Task::new("Pagar contas");
        done.set_done(true);
        let doc = TaskDocument::new(vec![Task::new("Comprar leite"), done]);

        let encoded = encode_document(&doc);
        let decoded = decode_document(&encoded).unwrap();
        assert_eq!(decoded, doc);
    }

    #[test]
    fn decoding_tolerates_missing_fields() {
        // A document with no `tarefas` field at all (e.g. just created, then emptied)
        let decoded = decode_document(&json!({ "name": "x", "fields": {} })).unwrap();
        assert!(decoded.is_empty());

        // Tasks written by the original application: no uid field
        let legacy = json!({ "fields": { "tarefas": { "arrayValue": { "values": [
            { "mapValue": { "fields": { "texto": { "stringValue": "a" }, "feita": { "booleanValue": false } } } },
        ]}}}});
        let decoded = decode_document(&legacy).unwrap();
        assert_eq!(decoded.tasks().len(), 1);
        assert!(!decoded.tasks()[0].uid().is_empty());
    }

    #[test]
    fn resource_keys() {
        let resource = json!({ "name": "projects/p/databases/(default)/documents/users/u1/tasks/2024-01-15" });
        assert_eq!(key_of_resource(&resource), "2024-01-15".parse().ok());

        let junk = json!({ "name": "projects/p/databases/(default)/documents/users/u1/tasks/not-a-date" });
        assert_eq!(key_of_resource(&junk), None);
    }
}
