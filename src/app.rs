//! The application driver
//!
//! One inbound event queue (user interactions and auth changes), one driver task that owns
//! all mutable state, one outbound stream of rendered frames. The driver is the only
//! writer: store calls are awaited sequentially inside each handler, so no further
//! synchronization is needed.
//!
//! Failures never propagate past the handler that triggered them: they are logged, the
//! state machine stays where it was, and the UI keeps showing the previous (possibly
//! stale) frame until the next successful operation.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::auth::{AuthReceiver, UserId};
use crate::calendar::MonthCursor;
use crate::date_key::DateKey;
use crate::error::Error;
use crate::indicator::IndicatorCache;
use crate::task::Task;
use crate::task_list::TaskLists;
use crate::traits::DocumentStore;
use crate::view::{self, AgendaView};

/// An interaction for the driver to process.
///
/// Task events carry the position of the card in the currently rendered list, which is all
/// a renderer knows; the driver resolves it to a task uid against its loaded snapshot
#[derive(Clone, Debug)]
pub enum UiEvent {
    /// A user signed in (with their identifier) or out (`None`)
    AuthChanged(Option<UserId>),
    /// A rendered in-month day cell was clicked
    SelectDay(DateKey),
    /// The add button was clicked with this input text
    AddTask(String),
    /// The check icon of the card at this position was clicked
    ToggleTask(usize),
    /// The trash icon of the card at this position was clicked
    RemoveTask(usize),
    PrevMonth,
    NextMonth,
}

/// See [`event_channel`]
pub type EventSender = mpsc::UnboundedSender<UiEvent>;
/// See [`event_channel`]
pub type EventReceiver = mpsc::UnboundedReceiver<UiEvent>;

/// Create the queue the rendering collaborator feeds interactions into
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// See [`view_channel`]
pub type ViewSender = watch::Sender<AgendaView>;
/// See [`view_channel`]
pub type ViewReceiver = watch::Receiver<AgendaView>;

/// Create the channel rendered frames are published on.
/// It starts out with the signed-out frame
pub fn view_channel() -> (ViewSender, ViewReceiver) {
    watch::channel(AgendaView::default())
}

/// Everything owned on behalf of one signed-in user. Dropped wholesale on sign-out, so
/// nothing can leak into the next session
struct Session<S: DocumentStore> {
    lists: TaskLists<S>,
    cursor: MonthCursor,
    selected: DateKey,
    indicators: IndicatorCache,
    /// The loaded snapshot of the selected day's list (the "active" day)
    active_tasks: Vec<Task>,
}

/// The agenda application: a state machine over (session, cursor, selection, indicators)
pub struct Agenda<S: DocumentStore> {
    store: Arc<S>,
    session: Option<Session<S>>,
    views: ViewSender,
}

impl<S: DocumentStore> Agenda<S> {
    pub fn new(store: Arc<S>, views: ViewSender) -> Self {
        Self {
            store,
            session: None,
            views,
        }
    }

    /// Process events until the queue closes. This is the only place state is mutated from
    pub async fn run(mut self, mut events: EventReceiver) {
        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }
        log::info!("Event queue closed, stopping the agenda driver");
    }

    /// Handle one event and publish the resulting frame
    pub async fn handle_event(&mut self, event: UiEvent) {
        log::trace!("Handling {:?}", event);
        match event {
            UiEvent::AuthChanged(user) => self.auth_changed(user).await,
            UiEvent::SelectDay(key) => self.select_day(key).await,
            UiEvent::AddTask(text) => self.add_task(&text).await,
            UiEvent::ToggleTask(index) => self.toggle_task(index).await,
            UiEvent::RemoveTask(index) => self.remove_task(index).await,
            UiEvent::PrevMonth => self.navigate_month(false).await,
            UiEvent::NextMonth => self.navigate_month(true).await,
        }
        self.publish();
    }

    /// The frame for the current state
    pub fn current_view(&self) -> AgendaView {
        match &self.session {
            None => AgendaView::default(),
            Some(session) => view::project(
                session.cursor,
                &session.indicators,
                &session.selected,
                &DateKey::today(),
                &session.active_tasks,
            ),
        }
    }

    async fn auth_changed(&mut self, user: Option<UserId>) {
        // Drop the previous user's session before anything else happens
        self.session = None;

        let user = match user {
            None => {
                log::info!("Signed out");
                return;
            },
            Some(user) => user,
        };
        log::info!("Signed in as {}", user);

        let today = DateKey::today();
        let cursor = MonthCursor::containing(&today);
        self.session = Some(Session {
            lists: TaskLists::new(self.store.clone(), user),
            cursor,
            selected: today,
            indicators: IndicatorCache::new(cursor),
            active_tasks: Vec::new(),
        });

        // Publish the cleared frame right away: the previous user's data must not stay on
        // screen while this user's data loads
        self.publish();

        self.refresh_indicators().await;
        self.reload_active_day().await;
    }

    async fn select_day(&mut self, key: DateKey) {
        let session = match &mut self.session {
            None => return,
            Some(session) => session,
        };
        session.selected = key;
        self.reload_active_day().await;
    }

    async fn add_task(&mut self, text: &str) {
        let session = match &mut self.session {
            None => return,
            Some(session) => session,
        };

        match session.lists.append(&session.selected, text).await {
            Ok(tasks) => {
                if tasks.len() == 1 {
                    // This day just got its first task
                    session.indicators.patch(&session.selected, true);
                }
                session.active_tasks = tasks;
            },
            Err(Error::InvalidInput) => {
                log::debug!("Ignoring a task with an empty text");
            },
            Err(err) => {
                log::warn!("Unable to add a task to {}: {}", session.selected, err);
            },
        }
    }

    async fn toggle_task(&mut self, index: usize) {
        let (key, uid) = match self.uid_at(index) {
            None => return self.resync_active_day(index).await,
            Some(found) => found,
        };

        let session = match &mut self.session {
            None => return,
            Some(session) => session,
        };
        match session.lists.toggle_done(&key, &uid).await {
            Ok(tasks) => session.active_tasks = tasks,
            Err(err @ Error::NotFound { .. }) => {
                log::warn!("{}, resynchronizing", err);
                self.reload_active_day().await;
            },
            Err(err) => {
                log::warn!("Unable to toggle a task of {}: {}", key, err);
            },
        }
    }

    async fn remove_task(&mut self, index: usize) {
        let (key, uid) = match self.uid_at(index) {
            None => return self.resync_active_day(index).await,
            Some(found) => found,
        };

        let session = match &mut self.session {
            None => return,
            Some(session) => session,
        };
        match session.lists.remove(&key, &uid).await {
            Ok(tasks) => {
                if tasks.is_empty() {
                    // That was the day's last task
                    session.indicators.patch(&key, false);
                }
                session.active_tasks = tasks;
            },
            Err(err @ Error::NotFound { .. }) => {
                log::warn!("{}, resynchronizing", err);
                self.reload_active_day().await;
            },
            Err(err) => {
                log::warn!("Unable to remove a task of {}: {}", key, err);
            },
        }
    }

    async fn navigate_month(&mut self, forward: bool) {
        let session = match &mut self.session {
            None => return,
            Some(session) => session,
        };
        // The selection stays where it is: its tasks remain the active list even when the
        // grid shows another month
        session.cursor = if forward { session.cursor.next() } else { session.cursor.prev() };
        self.refresh_indicators().await;
    }

    /// Resolve a card position against the loaded snapshot
    fn uid_at(&self, index: usize) -> Option<(DateKey, String)> {
        let session = self.session.as_ref()?;
        let task = session.active_tasks.get(index)?;
        Some((session.selected, task.uid().to_string()))
    }

    /// A card position did not match the snapshot (it changed under the renderer):
    /// reload instead of mutating the wrong task
    async fn resync_active_day(&mut self, index: usize) {
        if self.session.is_none() {
            return;
        }
        log::warn!("Stale task position {}, resynchronizing", index);
        self.reload_active_day().await;
    }

    async fn refresh_indicators(&mut self) {
        let session = match &mut self.session {
            None => return,
            Some(session) => session,
        };
        let Session { indicators, lists, cursor, .. } = session;
        if let Err(err) = indicators.refresh(&*self.store, lists.user(), *cursor).await {
            log::warn!("Unable to refresh the task indicators for {}: {}", cursor, err);
        }
    }

    async fn reload_active_day(&mut self) {
        let session = match &mut self.session {
            None => return,
            Some(session) => session,
        };
        match session.lists.load(&session.selected).await {
            Ok(tasks) => session.active_tasks = tasks,
            Err(err) => {
                // Shown as an empty day, like the original application; the error stays
                // visible in the logs
                log::warn!("Unable to load {}: {}", session.selected, err);
                session.active_tasks = Vec::new();
            },
        }
    }

    fn publish(&self) {
        // Nobody listening is fine (e.g. in tests that inspect `current_view` directly)
        let _ = self.views.send(self.current_view());
    }
}

/// Forward sign-in/sign-out changes from an identity provider into the event queue.
///
/// Like the original auth listener, this fires once with the current state on startup,
/// then once per change. Returns when either end is closed
pub async fn forward_auth_changes(mut auth: AuthReceiver, events: EventSender) {
    loop {
        let current = auth.borrow_and_update().clone();
        if events.send(UiEvent::AuthChanged(current)).is_err() {
            return;
        }
        if auth.changed().await.is_err() {
            return;
        }
    }
}
