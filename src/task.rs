//! To-do tasks and the per-day document that stores them

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persistent, unique identifier for a task.
///
/// The position of a task in its day's list is only a display artifact: it is valid for the
/// lifetime of one loaded snapshot and may change under concurrent writes. Mutations address
/// tasks by uid instead, so a stale position can be detected rather than silently hitting
/// the wrong task.
pub type TaskUid = String;

fn new_uid() -> TaskUid {
    Uuid::new_v4().to_hyphenated().to_string()
}

/// A short to-do task, belonging to one day
///
/// The serialized field names (`texto`, `feita`) are the document format the original
/// application wrote; documents created before uids existed deserialize with fresh ones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default = "new_uid")]
    uid: TaskUid,
    #[serde(rename = "texto")]
    text: String,
    #[serde(rename = "feita")]
    done: bool,
}

impl Task {
    /// Create a brand new task. This will pick a new (random) uid.
    pub fn new<S: ToString>(text: S) -> Self {
        Self {
            uid: new_uid(),
            text: text.to_string(),
            done: false,
        }
    }

    pub fn uid(&self) -> &str { &self.uid }
    pub fn text(&self) -> &str { &self.text }
    pub fn done(&self) -> bool { self.done }

    pub fn set_done(&mut self, done: bool) {
        self.done = done;
    }
}

/// The unit of persistence: the ordered task list of one day.
///
/// One document exists per date that has ever had a non-empty list; a document holding an
/// empty list is indistinguishable from a missing one as far as the UI is concerned.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDocument {
    #[serde(rename = "tarefas")]
    tasks: Vec<Task>,
}

impl TaskDocument {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_keeps_the_original_field_names() {
        let mut task = Task::new("Comprar leite");
        task.set_done(true);
        let json = serde_json::to_value(&TaskDocument::new(vec![task])).unwrap();

        let expected_fields = &json["tarefas"][0];
        assert_eq!(expected_fields["texto"], "Comprar leite");
        assert_eq!(expected_fields["feita"], true);
        assert!(expected_fields["uid"].is_string());
    }

    #[test]
    fn documents_without_uids_get_fresh_ones() {
        // What the original application wrote, before uids existed
        let doc: TaskDocument = serde_json::from_str(
            r#"{"tarefas": [{"texto": "a", "feita": false}, {"texto": "b", "feita": true}]}"#,
        ).unwrap();

        assert_eq!(doc.tasks().len(), 2);
        assert!(!doc.tasks()[0].uid().is_empty());
        assert_ne!(doc.tasks()[0].uid(), doc.tasks()[1].uid());
        assert_eq!(doc.tasks()[1].text(), "b");
        assert!(doc.tasks()[1].done());
    }
}
