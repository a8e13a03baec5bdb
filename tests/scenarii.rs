//! Shared helpers for the integration scenarios: a driven agenda over an in-memory store

use std::sync::Arc;

use tarefas::app::{self, Agenda, UiEvent, ViewReceiver};
use tarefas::cache::Cache;
use tarefas::calendar::DayCell;
use tarefas::{AgendaView, DateKey, Task, TaskDocument};

pub const USER_A: &str = "user-a";
pub const USER_B: &str = "user-b";

/// A driven agenda, its frame stream, and the store behind it
pub struct Harness {
    pub agenda: Agenda<Cache>,
    pub views: ViewReceiver,
    pub store: Arc<Cache>,
}

pub fn harness_on(store: Arc<Cache>) -> Harness {
    let (view_tx, views) = app::view_channel();
    Harness {
        agenda: Agenda::new(store.clone(), view_tx),
        views,
        store,
    }
}

pub fn empty_harness() -> Harness {
    harness_on(Arc::new(Cache::in_memory()))
}

impl Harness {
    pub async fn sign_in(&mut self, user: &str) {
        self.agenda.handle_event(UiEvent::AuthChanged(Some(user.to_string()))).await;
    }

    pub async fn sign_out(&mut self) {
        self.agenda.handle_event(UiEvent::AuthChanged(None)).await;
    }

    /// The latest published frame
    pub fn view(&self) -> AgendaView {
        self.views.borrow().clone()
    }
}

/// The nth day of the month "today" falls in. The agenda always signs in on today's month,
/// so scenarios select their days relative to the real clock, like the application does
pub fn this_month(day: u32) -> DateKey {
    let today = DateKey::today();
    DateKey::from_ymd(today.year(), today.month(), day).unwrap()
}

pub fn one_task_doc(text: &str) -> TaskDocument {
    TaskDocument::new(vec![Task::new(text)])
}

/// The grid cell of the given day of month
pub fn cell_on(view: &AgendaView, day: u32) -> &DayCell {
    view.grid().cells().iter()
        .find(|cell| cell.day() == day)
        .expect("grid has no cell for this day")
}
