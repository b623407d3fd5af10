//! A viewer session end to end, minus the real terminal

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::time::{Duration, Instant};

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use tbtail_core::{ChartModel, Diagnostic, Event, NullSink, RecordWriter, Tailer};
use tbtail_viewer::input::Input;
use tbtail_viewer::ui::{self, ViewerFrame};
use tbtail_viewer::{Outcome, PickerOutcome, PickerState, RescanClock, ViewState, discover};
use tempfile::TempDir;

fn append(path: &Path, events: &[Event]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let file = OpenOptions::new().create(true).append(true).open(path).unwrap();
    let mut writer = RecordWriter::new(file);
    for event in events {
        writer.write_event(event).unwrap();
    }
    writer.flush().unwrap();
}

fn epoch_events(steps: std::ops::Range<i64>) -> Vec<Event> {
    steps
        .map(|s| {
            Event::new(s * 10, Some(100.0 + s as f64 * 10.0))
                .with_scalar("loss", 1.0 / (s + 1) as f32)
                .with_scalar("train/epoch", s as f32 * 0.25)
        })
        .collect()
}

fn render(tailer: &Tailer, state: &ViewState, model: Option<&ChartModel>) -> String {
    let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
    terminal
        .draw(|f| {
            ui::draw_viewer(
                f,
                &ViewerFrame {
                    model,
                    tags: tailer.tags(),
                    tag_index: state.tag_index(),
                    log_lines: &[],
                    prompt: state.prompt().as_deref(),
                },
            )
        })
        .unwrap();

    let buffer = terminal.backend().buffer();
    let area = buffer.area;
    let mut text = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

#[test]
fn test_pick_view_and_follow_growth() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("baseline/events.out.tfevents.200.host");
    let b = dir.path().join("tuned/events.out.tfevents.100.host");
    append(&a, &epoch_events(0..3));
    append(&b, &epoch_events(0..2));

    // Pick both runs
    let files = discover(dir.path()).unwrap();
    let labels: Vec<String> = files.iter().enumerate().map(|(i, f)| f.label(i)).collect();
    let mut picker = PickerState::new(labels, &[]);
    picker.handle_input(Input::Char('a'));
    let PickerOutcome::Confirmed(indices) = picker.handle_input(Input::Enter) else {
        panic!("picker did not confirm");
    };
    let specs: Vec<_> = indices.iter().map(|&i| files[i].run_spec()).collect();
    let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["baseline", "tuned"]);

    let mut tailer = Tailer::new(specs);
    tailer.rescan(true, &mut NullSink);
    assert_eq!(tailer.tags(), &["loss".to_string(), "train/epoch".to_string()]);

    let mut state = ViewState::new(vec![0, 10, 50, 100, 200], "train/epoch");
    let model = ChartModel::build(&tailer, &state.chart_request()).unwrap();
    assert_eq!(model.title, "loss (smooth=0, last_step=20)");
    assert_eq!(model.series.len(), 2);

    let screen = render(&tailer, &state, Some(&model));
    assert!(screen.contains("loss (smooth=0, last_step=20)"));
    assert!(screen.contains("1. loss"));
    assert!(screen.contains("2. train/epoch"));

    // The writer keeps going; the clock picks it up on its slow cadence
    let start = Instant::now();
    let mut clock = RescanClock::new(Duration::from_secs(15));
    clock.mark(start);
    append(&a, &epoch_events(3..5));

    assert!(clock.tick(start + Duration::from_secs(1), &mut tailer, &mut NullSink).is_none());
    let report = clock
        .tick(start + Duration::from_secs(15), &mut tailer, &mut NullSink)
        .unwrap();
    assert_eq!(report.records, 2);
    assert_eq!(report.runs_skipped, 1);

    let model = ChartModel::build(&tailer, &state.chart_request()).unwrap();
    assert_eq!(model.last_step, Some(40));
    // Epoch reached 1.0 at step 40, 40 s after the first sample
    assert!(model.series[0].label.starts_with("baseline (eta 00:40"));

    // Narrow to the tail in step space, then switch axis mode
    let mut sink: Vec<Diagnostic> = Vec::new();
    state.handle_input(Input::Char('x'), &tailer, &mut sink);
    for c in "15:100".chars() {
        state.handle_input(Input::Char(c), &tailer, &mut sink);
    }
    let screen = render(&tailer, &state, Some(&model));
    assert!(screen.contains("> Enter xlim"));

    state.handle_input(Input::Enter, &tailer, &mut sink);
    assert_eq!(state.xlim(), Some((15, 40)));
    assert_eq!(sink.last().unwrap().message, "clamped xlim (steps) to 15:40");

    state.handle_input(Input::Char('m'), &tailer, &mut sink);
    let model = ChartModel::build(&tailer, &state.chart_request()).unwrap();
    state.apply_rejections(&model, &mut sink);
    assert_eq!(model.x_label, "time since start (s)");
    assert_eq!(model.x_limits, Some((20.0, 40.0)));

    assert_eq!(state.handle_input(Input::Char('q'), &tailer, &mut sink), Outcome::Reselect);

    // Back in the picker the previous choice is pre-checked
    let files = discover(dir.path()).unwrap();
    let labels: Vec<String> = files.iter().enumerate().map(|(i, f)| f.label(i)).collect();
    let previous = vec![labels[1].clone()];
    let picker = PickerState::new(labels, &previous);
    assert_eq!(picker.checked(), vec![1]);
}

#[test]
fn test_waiting_screen_without_tags() {
    let tailer = Tailer::new(Vec::new());
    let state = ViewState::new(vec![0], "train/epoch");
    assert!(ChartModel::build(&tailer, &state.chart_request()).is_none());

    let screen = render(&tailer, &state, None);
    assert!(screen.contains("Waiting for scalar data"));
    assert!(screen.contains("Tips"));
}
