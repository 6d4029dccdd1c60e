//! Key handling for the popup.

use crate::fields::Focus;
use crate::surface::TerminalSurface;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::{Stream, StreamExt};
use leetsearch_core::PopupController;
use leetsearch_core::backend::SearchBackend;
use leetsearch_core::config::ConfigStore;
use ratatui::backend::Backend;
use std::collections::VecDeque;
use std::io;

/// Cards skipped by PageUp/PageDown
const PAGE: usize = 5;

/// Whether the event loop should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub type TuiController<S, A, T> = PopupController<S, A, TerminalSurface<T>>;

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Terminal event source.
///
/// Events read while a search is in flight are held back and replayed, in
/// order, once it resolves. Only quit keys act immediately.
pub struct Events<E> {
    stream: E,
    held: VecDeque<Event>,
}

impl<E> Events<E>
where
    E: Stream<Item = io::Result<Event>> + Unpin,
{
    pub fn new(stream: E) -> Self {
        Self {
            stream,
            held: VecDeque::new(),
        }
    }

    /// Next event, held-back ones first. `None` once the terminal closes.
    pub async fn next(&mut self) -> Option<Event> {
        if let Some(event) = self.held.pop_front() {
            return Some(event);
        }
        loop {
            match self.stream.next().await? {
                Ok(event) => return Some(event),
                Err(e) => tracing::error!("Event stream error: {}", e),
            }
        }
    }

    /// Resolves when a quit key is pressed. Other events are held back.
    async fn quit_requested(&mut self) {
        loop {
            match self.stream.next().await {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press && is_quit(&key) => {
                    return;
                }
                Some(Ok(event)) => self.held.push_back(event),
                Some(Err(e)) => tracing::error!("Event stream error: {}", e),
                None => std::future::pending::<()>().await,
            }
        }
    }
}

/// Run a search with whatever is in the query box.
///
/// Returns false if the user quit while the request was still in flight.
/// The search future is dropped in that case.
pub async fn submit_query<S, A, T, E>(
    controller: &mut TuiController<S, A, T>,
    events: &mut Events<E>,
) -> bool
where
    S: ConfigStore,
    A: SearchBackend,
    T: Backend,
    E: Stream<Item = io::Result<Event>> + Unpin,
{
    let query = controller.view().fields.query.text().to_string();
    tokio::select! {
        outcome = controller.search(&query) => {
            tracing::debug!("Search '{}' finished: {:?}", query, outcome);
            true
        }
        () = events.quit_requested() => {
            tracing::info!("Quit while searching '{}'", query);
            false
        }
    }
}

/// Apply one key press. Edits in the filter box re-filter immediately.
pub async fn handle_key<S, A, T, E>(
    controller: &mut TuiController<S, A, T>,
    key: KeyEvent,
    events: &mut Events<E>,
) -> Flow
where
    S: ConfigStore,
    A: SearchBackend,
    T: Backend,
    E: Stream<Item = io::Result<Event>> + Unpin,
{
    if is_quit(&key) {
        return Flow::Quit;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Enter => {
            if controller.view().fields.focus == Focus::Query
                && !submit_query(controller, events).await
            {
                return Flow::Quit;
            }
            return Flow::Continue;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            let filter_visible = controller.state().filter_visible;
            controller.view_mut().fields.toggle_focus(filter_visible);
        }
        KeyCode::Down => controller.view_mut().scroll_down(1),
        KeyCode::Up => controller.view_mut().scroll_up(1),
        KeyCode::PageDown => controller.view_mut().scroll_down(PAGE),
        KeyCode::PageUp => controller.view_mut().scroll_up(PAGE),
        _ => {
            if edit_focused(controller.view_mut(), key, ctrl)
                && controller.view().fields.focus == Focus::Filter
            {
                let needle = controller.view().fields.filter.text().to_string();
                controller.apply_filter(&needle);
                return Flow::Continue;
            }
        }
    }

    controller.view_mut().redraw();
    Flow::Continue
}

/// Apply a text-editing key to the focused field. Returns true if the text changed.
fn edit_focused<T: Backend>(surface: &mut TerminalSurface<T>, key: KeyEvent, ctrl: bool) -> bool {
    let field = surface.fields.focused_mut();
    match key.code {
        KeyCode::Char('u') if ctrl => field.clear(),
        KeyCode::Char(_) if ctrl => false,
        KeyCode::Char(c) => {
            field.enter_char(c);
            true
        }
        KeyCode::Backspace => field.delete_char(),
        KeyCode::Left => {
            field.move_left();
            false
        }
        KeyCode::Right => {
            field.move_right();
            false
        }
        KeyCode::Home => {
            field.move_home();
            false
        }
        KeyCode::End => {
            field.move_end();
            false
        }
        _ => false,
    }
}
