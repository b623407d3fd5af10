//! Side panels: key help, tag list, log tail

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use tbtail_logging::LogLine;
use tracing::Level;

const TIPS: &[&str] = &[
    "1-9 or up/down: select tag",
    "s: smoothing (0/10/50/100/200)",
    "m: x axis (step/rel/abs)",
    "x: xlim in steps (start:end)",
    "y: ylim (min:max)",
    "ESC: cancel input",
    "q: back to selection",
    "Ctrl+C: quit",
];

pub fn draw_tips(f: &mut Frame, area: Rect) {
    let lines: Vec<Line<'_>> = TIPS.iter().map(|tip| Line::from(format!(" {}", tip))).collect();
    let tips = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Tips "));
    f.render_widget(tips, area);
}

pub fn draw_tags(f: &mut Frame, area: Rect, tags: &[String], tag_index: usize) {
    let selected = tag_index.min(tags.len().saturating_sub(1));
    let items: Vec<ListItem<'_>> = tags
        .iter()
        .enumerate()
        .map(|(i, tag)| {
            let style = if i == selected {
                Style::default().fg(Color::Black).bg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(format!("{}. {}", i + 1, tag), style)))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Tags "));
    f.render_widget(list, area);
}

fn level_color(level: Level) -> Color {
    match level {
        Level::ERROR => Color::Red,
        Level::WARN => Color::Yellow,
        Level::INFO => Color::White,
        _ => Color::Gray,
    }
}

/// Lines that fit in a bordered panel of `height`, newest last
///
/// The prompt takes the bottom row when present.
pub fn visible_log<'a>(lines: &'a [LogLine], prompt: Option<&str>, height: u16) -> &'a [LogLine] {
    let rows = usize::from(height.saturating_sub(2));
    let rows = if prompt.is_some() { rows.saturating_sub(1) } else { rows };
    &lines[lines.len().saturating_sub(rows)..]
}

pub fn draw_log(f: &mut Frame, area: Rect, lines: &[LogLine], prompt: Option<&str>) {
    let mut rendered: Vec<Line<'_>> = visible_log(lines, prompt, area.height)
        .iter()
        .map(|line| Line::styled(line.to_string(), Style::default().fg(level_color(line.level))))
        .collect();

    if let Some(prompt) = prompt {
        rendered.push(Line::styled(
            format!("> {}", prompt),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    }

    let log = Paragraph::new(rendered).block(Block::default().borders(Borders::ALL).title(" Log "));
    f.render_widget(log, area);
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use super::*;

    fn line(message: &str) -> LogLine {
        LogLine {
            timestamp: Local::now(),
            level: Level::INFO,
            target: "tbtail".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_visible_log_keeps_newest() {
        let lines: Vec<LogLine> = (0..10).map(|i| line(&i.to_string())).collect();

        let shown = visible_log(&lines, None, 5);
        assert_eq!(shown.len(), 3);
        assert_eq!(shown[2].message, "9");

        assert_eq!(visible_log(&lines, Some("xlim"), 5).len(), 2);
        assert!(visible_log(&lines, None, 1).is_empty());
    }
}
