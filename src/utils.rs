//! Some utility functions

use crate::calendar::CellFlags;
use crate::view::{AgendaView, TaskCardView};

/// A debug utility that pretty-prints a rendered frame
pub fn print_view(view: &AgendaView) {
    if !view.signed_in() {
        println!("{}", view.day_title());
        return;
    }

    println!("== {} ==", view.month_label());
    let mut week: Vec<String> = vec!["   ".to_string(); view.grid().leading_blanks() as usize];
    for cell in view.grid().cells() {
        let marker = if cell.flags().contains(CellFlags::HAS_TASK) { "*" } else { " " };
        week.push(format!("{:2}{}", cell.day(), marker));
        if week.len() == 7 {
            println!("{}", week.join(" "));
            week.clear();
        }
    }
    if !week.is_empty() {
        println!("{}", week.join(" "));
    }

    println!("{}", view.day_title());
    match view.empty_message() {
        Some(message) => println!("    {}", message),
        None => {
            for card in view.tasks() {
                print_task_card(card);
            }
        },
    }
}

pub fn print_task_card(card: &TaskCardView) {
    let completion = if card.done() { "✓" } else { " " };
    println!("    {} {}\t#{}", completion, card.text(), card.index());
}
