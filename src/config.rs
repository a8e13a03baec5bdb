//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

/// The top-level collection day documents are scoped under (documents live at
/// `{USERS_COLLECTION}/{user id}/{TASKS_COLLECTION}/{date key}`).
/// Feel free to override it when initing this library.
pub static USERS_COLLECTION: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("users".to_string())));

/// The per-user sub-collection holding one document per day.
/// Feel free to override it when initing this library.
pub static TASKS_COLLECTION: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("tasks".to_string())));
