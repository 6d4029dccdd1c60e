//! Ratatui rendering of the popup state.

use crate::colors;
use crate::fields::{Fields, Focus, InputField};
use leetsearch_core::view::{PopupState, PopupView, ResultsPane, UserCard};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

/// Terminal-backed popup surface.
///
/// Keeps the last state it was given so key edits that don't involve the
/// controller (typing in the query box) can redraw without it.
pub struct TerminalSurface<T: Backend> {
    terminal: Terminal<T>,
    pub fields: Fields,
    /// Index of the first visible card
    pub scroll: usize,
    state: PopupState,
}

impl<T: Backend> TerminalSurface<T> {
    pub fn new(terminal: Terminal<T>) -> Self {
        Self {
            terminal,
            fields: Fields::default(),
            scroll: 0,
            state: PopupState::default(),
        }
    }

    pub fn terminal(&self) -> &Terminal<T> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<T> {
        &mut self.terminal
    }

    /// Last state received from the controller
    pub fn state(&self) -> &PopupState {
        &self.state
    }

    pub fn scroll_down(&mut self, by: usize) {
        let max = self.state.results.cards().len().saturating_sub(1);
        self.scroll = (self.scroll + by).min(max);
    }

    pub fn scroll_up(&mut self, by: usize) {
        self.scroll = self.scroll.saturating_sub(by);
    }

    pub fn redraw(&mut self) {
        let Self {
            terminal,
            fields,
            scroll,
            state,
        } = self;
        if let Err(e) = terminal.draw(|f| draw_popup(f, fields, state, *scroll)) {
            tracing::error!("Failed to draw popup: {}", e);
        }
    }
}

impl<T: Backend> PopupView for TerminalSurface<T> {
    fn render(&mut self, state: &PopupState) {
        if state.results != self.state.results {
            self.scroll = 0;
        }
        self.state = state.clone();
        if !state.filter_visible {
            self.fields.focus = Focus::Query;
        }
        self.redraw();
    }
}

/// Draw the whole popup.
// Terminal coordinates are u16, cursor offsets come from usize char counts
#[allow(clippy::cast_possible_truncation)]
pub fn draw_popup(f: &mut Frame, fields: &Fields, state: &PopupState, scroll: usize) {
    let bg_block = Block::default().style(Style::default().bg(colors::BG));
    f.render_widget(bg_block, f.area());

    let mut constraints = vec![Constraint::Length(3)];
    if state.filter_visible {
        constraints.push(Constraint::Length(3));
    }
    constraints.extend([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ]);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(f.area());

    let search_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(16)])
        .split(chunks[0]);

    let query_focused = fields.focus == Focus::Query;
    render_input(
        f,
        search_row[0],
        " College ",
        &fields.query,
        "Enter a college name...",
        query_focused,
    );
    render_trigger(f, search_row[1], state);

    let mut idx = 1;
    if state.filter_visible {
        render_input(
            f,
            chunks[idx],
            " Filter ",
            &fields.filter,
            "Filter by username, name or country",
            !query_focused,
        );
        idx += 1;
    }

    let stats_line = state.stats.map_or_else(Line::default, |stats| {
        Line::from(vec![
            Span::styled(stats.matched_label(), Style::default().fg(colors::ON_SURFACE)),
            Span::styled("  ·  ", Style::default().fg(colors::OUTLINE)),
            Span::styled(stats.filtered_label(), Style::default().fg(colors::ON_SURFACE)),
            Span::styled("  ·  ", Style::default().fg(colors::OUTLINE)),
            Span::styled(stats.refreshed_label(), Style::default().fg(colors::SUBTEXT)),
        ])
    });
    f.render_widget(Paragraph::new(stats_line), chunks[idx]);

    render_results(f, chunks[idx + 1], &state.results, scroll);

    let help = Line::from(Span::styled(
        "Enter search · Tab switch field · ↑/↓ scroll · Esc quit",
        Style::default()
            .fg(colors::OUTLINE)
            .add_modifier(Modifier::DIM),
    ));
    f.render_widget(Paragraph::new(help), chunks[idx + 2]);

    let (area, field) = if query_focused || !state.filter_visible {
        (search_row[0], &fields.query)
    } else {
        (chunks[1], &fields.filter)
    };
    let max_x = area.width.saturating_sub(2);
    f.set_cursor_position((area.x + 1 + (field.cursor() as u16).min(max_x), area.y + 1));
}

fn render_input(
    f: &mut Frame,
    area: Rect,
    title: &str,
    field: &InputField,
    placeholder: &str,
    focused: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().bg(colors::SURFACE))
        .border_style(Style::default().fg(if focused {
            colors::PRIMARY
        } else {
            colors::OUTLINE
        }));

    let text = if field.text().is_empty() {
        Span::styled(placeholder, Style::default().fg(colors::OUTLINE))
    } else {
        Span::styled(field.text(), Style::default().fg(colors::ON_SURFACE))
    };
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn render_trigger(f: &mut Frame, area: Rect, state: &PopupState) {
    let style = if state.trigger.is_enabled() {
        Style::default()
            .fg(colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(colors::OUTLINE)
            .add_modifier(Modifier::DIM)
    };
    let button = Paragraph::new(Span::styled(state.trigger.label(), style))
        .alignment(ratatui::layout::Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::OUTLINE)),
        );
    f.render_widget(button, area);
}

fn render_results(f: &mut Frame, area: Rect, pane: &ResultsPane, scroll: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Results ")
        .border_style(Style::default().fg(colors::OUTLINE));

    match pane {
        ResultsPane::Cleared => f.render_widget(block, area),
        ResultsPane::Notice(notice) => {
            let color = if notice.is_error() {
                colors::ERROR
            } else {
                colors::SUBTEXT
            };
            let text = Paragraph::new(Span::styled(notice.text(), Style::default().fg(color)))
                .wrap(Wrap { trim: true })
                .block(block);
            f.render_widget(text, area);
        }
        ResultsPane::Users(cards) => {
            let items: Vec<ListItem> = cards.iter().map(card_item).collect();
            let list = List::new(items).block(block);
            let mut list_state = ListState::default().with_offset(scroll);
            f.render_stateful_widget(list, area, &mut list_state);
        }
    }
}

fn card_item(card: &UserCard) -> ListItem<'static> {
    let header = Line::from(vec![
        Span::styled(
            card.username.clone(),
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  Rank: {}", card.rank),
            Style::default().fg(colors::SUCCESS),
        ),
    ]);
    let meta = Line::from(vec![
        Span::styled(
            card.display_name.clone(),
            Style::default().fg(colors::ON_SURFACE),
        ),
        Span::styled("  ·  ", Style::default().fg(colors::OUTLINE)),
        Span::styled(card.country.clone(), Style::default().fg(colors::SUBTEXT)),
    ]);
    let school = Line::from(vec![
        Span::styled(card.school.clone(), Style::default().fg(colors::SUBTEXT)),
        Span::styled(
            format!("  {}", card.profile_url),
            Style::default()
                .fg(colors::OUTLINE)
                .add_modifier(Modifier::DIM),
        ),
    ]);
    ListItem::new(vec![header, meta, school])
}
