//! Render-ready view models
//!
//! A pure projection of the application state, so the rendering collaborator never touches
//! state or I/O. User-facing strings and CSS class names are the original application's
//! (it is a Portuguese app).

use serde::{Deserialize, Serialize};

use crate::calendar::{CellFlags, DayCell, MonthCursor, MonthGrid};
use crate::date_key::DateKey;
use crate::indicator::IndicatorCache;
use crate::task::Task;

/// One task card, addressed by its current position in the list.
///
/// The index is only valid against the snapshot this view was projected from; the driver
/// resolves it back to a task uid before mutating anything.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskCardView {
    index: usize,
    text: String,
    done: bool,
}

impl TaskCardView {
    pub fn index(&self) -> usize { self.index }
    pub fn text(&self) -> &str { &self.text }
    pub fn done(&self) -> bool { self.done }
}

/// Everything the renderer needs for one frame
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgendaView {
    signed_in: bool,
    month_label: String,
    grid: MonthGrid,
    day_title: String,
    tasks: Vec<TaskCardView>,
    /// The placeholder shown instead of the list when there is nothing to show
    empty_message: Option<String>,
}

impl AgendaView {
    pub fn signed_in(&self) -> bool { self.signed_in }
    pub fn month_label(&self) -> &str { &self.month_label }
    pub fn grid(&self) -> &MonthGrid { &self.grid }
    pub fn day_title(&self) -> &str { &self.day_title }
    pub fn tasks(&self) -> &[TaskCardView] { &self.tasks }
    pub fn empty_message(&self) -> Option<&str> { self.empty_message.as_deref() }
}

/// What is displayed while nobody is signed in
impl Default for AgendaView {
    fn default() -> Self {
        Self {
            signed_in: false,
            month_label: String::new(),
            grid: MonthGrid::default(),
            day_title: "Faça login para ver as tarefas".to_string(),
            tasks: Vec::new(),
            empty_message: None,
        }
    }
}

/// Project the application state into one frame. No I/O happens here.
///
/// `today` is taken as a parameter so the whole frame agrees on what "today" is
pub fn project(
    cursor: MonthCursor,
    indicators: &IndicatorCache,
    selected: &DateKey,
    today: &DateKey,
    tasks: &[Task],
) -> AgendaView {
    AgendaView {
        signed_in: true,
        month_label: cursor.label(),
        grid: MonthGrid::build(cursor, indicators, selected, today),
        day_title: format!("Tarefas de {}", selected),
        tasks: tasks.iter().enumerate()
            .map(|(index, task)| TaskCardView {
                index,
                text: task.text().to_string(),
                done: task.done(),
            })
            .collect(),
        empty_message: if tasks.is_empty() { Some("Nenhuma tarefa.".to_string()) } else { None },
    }
}

/// The CSS classes of one day cell, as the original stylesheet names them.
/// Blank leading cells get the `empty` class
pub fn cell_classes(cell: &DayCell) -> Vec<&'static str> {
    let mut classes = Vec::new();
    if cell.flags().contains(CellFlags::HAS_TASK) {
        classes.push("has-task");
    }
    if cell.flags().contains(CellFlags::SELECTED) {
        classes.push("dia-selecionado");
    }
    if cell.flags().contains(CellFlags::TODAY) {
        classes.push("dia-atual");
    }
    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_out_by_default() {
        let view = AgendaView::default();
        assert!(!view.signed_in());
        assert_eq!(view.day_title(), "Faça login para ver as tarefas");
        assert!(view.tasks().is_empty());
        assert!(view.grid().cells().is_empty());
    }

    #[test]
    fn projection_of_a_day_with_tasks() {
        let selected: DateKey = "2024-01-15".parse().unwrap();
        let today: DateKey = "2024-01-20".parse().unwrap();
        let cursor = MonthCursor::containing(&selected);
        let mut indicators = IndicatorCache::new(cursor);
        indicators.patch(&selected, true);

        let mut done = Task::new("Pagar contas");
        done.set_done(true);
        let tasks = vec![Task::new("Comprar leite"), done];

        let view = project(cursor, &indicators, &selected, &today, &tasks);
        assert!(view.signed_in());
        assert_eq!(view.month_label(), "Janeiro 2024");
        assert_eq!(view.day_title(), "Tarefas de 2024-01-15");
        assert_eq!(view.empty_message(), None);

        assert_eq!(view.tasks().len(), 2);
        assert_eq!(view.tasks()[0].index(), 0);
        assert_eq!(view.tasks()[0].text(), "Comprar leite");
        assert!(!view.tasks()[0].done());
        assert_eq!(view.tasks()[1].index(), 1);
        assert!(view.tasks()[1].done());

        let cell = &view.grid().cells()[14];
        assert_eq!(cell_classes(cell), vec!["has-task", "dia-selecionado"]);
        let today_cell = &view.grid().cells()[19];
        assert_eq!(cell_classes(today_cell), vec!["dia-atual"]);
    }

    #[test]
    fn empty_day_gets_the_placeholder() {
        let selected: DateKey = "2024-01-15".parse().unwrap();
        let cursor = MonthCursor::containing(&selected);
        let view = project(cursor, &IndicatorCache::new(cursor), &selected, &selected, &[]);
        assert_eq!(view.empty_message(), Some("Nenhuma tarefa."));
    }
}
