use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::state::{PickerItem, PickerState};

pub fn checkbox_line(item: &PickerItem) -> String {
    format!("[{}] {}", if item.checked { "x" } else { " " }, item.label)
}

pub fn draw_picker(f: &mut Frame, picker: &PickerState, root: &str) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(f.area());

    let items: Vec<ListItem<'_>> = picker
        .items()
        .iter()
        .map(|item| {
            let style = if item.checked {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(checkbox_line(item), style)))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Select one or more event files in {} ", root)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut list_state = ListState::default().with_selected(Some(picker.cursor()));
    f.render_stateful_widget(list, rows[0], &mut list_state);

    let help = Paragraph::new(" space: toggle  a: all  enter: view  q/ESC: quit  Ctrl+C: exit")
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, rows[1]);
}
