//! This crate provides the core of a per-day task agenda: a single user keeps a short task
//! list on each calendar day, browses a month grid, and sees at a glance which days of the
//! visible month already contain tasks.
//!
//! Day documents live in a remote per-user document store. The [`client`] module talks to
//! the real one (Firestore); the [`cache`] module is a local store with the same interface,
//! useful for tests and demos. Both implement [`traits::DocumentStore`].
//!
//! State lives in one [`Agenda`](app::Agenda) driver: interactions go in through an event
//! queue, rendered [`AgendaView`](view::AgendaView) frames come out on a watch channel, so
//! the rendering collaborator never touches state or I/O.

pub mod traits;

mod date_key;
pub use date_key::{DateKey, InvalidDateKey};
mod task;
pub use task::{Task, TaskDocument, TaskUid};
mod error;
pub use error::Error;

mod task_list;
pub use task_list::TaskLists;
mod indicator;
pub use indicator::IndicatorCache;
pub mod calendar;
pub use calendar::{CellFlags, MonthCursor, MonthGrid};
pub mod view;
pub use view::AgendaView;
pub mod app;
pub use app::{Agenda, UiEvent};

pub mod auth;

pub mod client;
pub mod cache;

pub mod config;
pub mod utils;

pub mod mock_behaviour;
