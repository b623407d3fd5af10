//! Terminal rendering
//!
//! Pure drawing over borrowed state. Nothing here mutates the tailer or the
//! state machines.

pub mod chart;
pub mod panels;
pub mod picker;

use std::io::{self, Stdout};

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use tbtail_core::ChartModel;
use tbtail_logging::LogLine;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Raw mode plus alternate screen, restored on drop even when unwinding
pub struct TerminalSession {
    terminal: Tui,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }

        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    pub fn terminal(&mut self) -> &mut Tui {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Everything one viewer redraw shows
pub struct ViewerFrame<'a> {
    pub model: Option<&'a ChartModel>,
    pub tags: &'a [String],
    pub tag_index: usize,
    pub log_lines: &'a [LogLine],
    /// Live limit-editor prompt, shown as the last log line
    pub prompt: Option<&'a str>,
}

/// Chart on the left, tips/tags/log stacked on the right
pub fn viewer_layout(area: Rect) -> (Rect, Rect, Rect, Rect) {
    let (chart_share, side_share) = if area.width > 100 { (4, 1) } else { (3, 1) };
    let total = chart_share + side_share;

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(chart_share, total),
            Constraint::Ratio(side_share, total),
        ])
        .split(area);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(2, 8),
            Constraint::Ratio(4, 8),
            Constraint::Ratio(2, 8),
        ])
        .split(columns[1]);

    (columns[0], side[0], side[1], side[2])
}

pub fn draw_viewer(f: &mut Frame, view: &ViewerFrame<'_>) {
    let (chart_area, tips_area, tags_area, log_area) = viewer_layout(f.area());

    chart::draw_chart(f, chart_area, view.model);
    panels::draw_tips(f, tips_area);
    panels::draw_tags(f, tags_area, view.tags, view.tag_index);
    panels::draw_log(f, log_area, view.log_lines, view.prompt);
}
