use std::sync::Arc;

use tarefas::app::{self, Agenda, UiEvent};
use tarefas::cache::Cache;
use tarefas::utils::print_view;

#[tokio::main]
async fn main() {
    env_logger::init();

    let store = Arc::new(Cache::in_memory());
    let (view_tx, view_rx) = app::view_channel();
    let mut agenda = Agenda::new(store, view_tx);

    agenda.handle_event(UiEvent::AuthChanged(Some("demo-user".to_string()))).await;
    agenda.handle_event(UiEvent::AddTask("Comprar leite".to_string())).await;
    agenda.handle_event(UiEvent::AddTask("Pagar contas".to_string())).await;
    agenda.handle_event(UiEvent::ToggleTask(0)).await;
    print_view(&view_rx.borrow());

    agenda.handle_event(UiEvent::NextMonth).await;
    print_view(&view_rx.borrow());
}
