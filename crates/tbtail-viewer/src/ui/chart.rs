use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph};
use tbtail_core::ChartModel;
use tbtail_core::analytics::format_tick;

/// Line colors, assigned by run position
pub const PALETTE: [Color; 6] = [
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
];

pub fn series_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

/// Three evenly spaced tick values across `bounds`
pub fn ticks(bounds: [f64; 2]) -> [f64; 3] {
    [bounds[0], (bounds[0] + bounds[1]) / 2.0, bounds[1]]
}

/// Compact y-axis label
pub fn format_value(y: f64) -> String {
    let magnitude = y.abs();
    if magnitude != 0.0 && !(1e-3..1e5).contains(&magnitude) {
        format!("{:.2e}", y)
    } else {
        format!("{:.4}", y)
    }
}

pub fn draw_chart(f: &mut Frame, area: Rect, model: Option<&ChartModel>) {
    let Some(model) = model else {
        let waiting = Paragraph::new("Waiting for scalar data...")
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL).title(" tbtail "));
        f.render_widget(waiting, area);
        return;
    };

    let datasets: Vec<Dataset<'_>> = model
        .series
        .iter()
        .map(|line| {
            Dataset::default()
                .name(line.label.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(series_color(line.color_index)))
                .data(&line.points)
        })
        .collect();

    let (x_bounds, y_bounds) = model.bounds();
    let x_labels: Vec<Span<'_>> = ticks(x_bounds)
        .iter()
        .map(|&x| Span::raw(format_tick(model.x_scale, x)))
        .collect();
    let y_labels: Vec<Span<'_>> = ticks(y_bounds)
        .iter()
        .map(|&y| Span::raw(format_value(y)))
        .collect();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(format!(" {} ", model.title), Style::default().fg(Color::White))),
        )
        .x_axis(
            Axis::default()
                .title(model.x_label.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(y_bounds)
                .labels(y_labels),
        )
        .legend_position(Some(LegendPosition::TopRight))
        .hidden_legend_constraints((Constraint::Ratio(2, 3), Constraint::Ratio(2, 3)));

    f.render_widget(chart, area);
}
