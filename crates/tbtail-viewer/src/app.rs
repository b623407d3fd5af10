//! Picker and viewer loops
//!
//! Both loops draw, wait up to one poll interval for a key and react. The
//! viewer additionally ticks the rescan clock, so new records show up
//! without any input.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use tbtail_core::{ChartModel, RunSpec, Tailer, TracingSink};
use tbtail_logging::LogBuffer;
use tracing::{debug, info};

use crate::config::ViewerConfig;
use crate::discovery::{Target, discover};
use crate::input::Input;
use crate::scheduler::RescanClock;
use crate::state::{Outcome, PickerOutcome, PickerState, ViewState};
use crate::ui::{self, TerminalSession, Tui, ViewerFrame};

/// Log lines pulled from the capture buffer per frame
const LOG_TAIL: usize = 64;

/// Next key press within `config.poll_interval()`, if any
fn next_input(config: &ViewerConfig) -> Result<Option<Input>> {
    if !event::poll(config.poll_interval())? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(Input::from(key))),
        _ => Ok(None),
    }
}

/// Show the viewer for `specs` until the user leaves
///
/// Returns `Outcome::Reselect` for `q` and `Outcome::Exit` for Ctrl+C.
pub fn run_viewer(
    terminal: &mut Tui,
    specs: Vec<RunSpec>,
    config: &ViewerConfig,
    logs: &LogBuffer,
) -> Result<Outcome> {
    let mut sink = TracingSink;
    let mut tailer = Tailer::new(specs);

    let started = Instant::now();
    let report = tailer.rescan(true, &mut sink);
    info!(
        runs = tailer.runs().len(),
        records = report.records,
        tags = tailer.tags().len(),
        "initial scan took {:.1}ms",
        started.elapsed().as_secs_f64() * 1000.0
    );

    let mut state = ViewState::new(config.smoothing_levels.clone(), config.progress_tag.clone());
    let mut clock = RescanClock::new(config.rescan_interval());
    clock.mark(Instant::now());

    loop {
        let model = ChartModel::build(&tailer, &state.chart_request());
        if let Some(model) = &model {
            state.apply_rejections(model, &mut sink);
        }

        let log_lines = logs.recent(LOG_TAIL);
        let prompt = state.prompt();
        terminal.draw(|f| {
            ui::draw_viewer(
                f,
                &ViewerFrame {
                    model: model.as_ref(),
                    tags: tailer.tags(),
                    tag_index: state.tag_index(),
                    log_lines: &log_lines,
                    prompt: prompt.as_deref(),
                },
            )
        })?;

        if let Some(input) = next_input(config)? {
            match state.handle_input(input, &tailer, &mut sink) {
                Outcome::Continue => {}
                outcome => return Ok(outcome),
            }
        }

        if let Some(report) = clock.tick(Instant::now(), &mut tailer, &mut sink) {
            debug!(
                scanned = report.runs_scanned,
                skipped = report.runs_skipped,
                records = report.records,
                new_tags = report.new_tags,
                "rescan"
            );
        }
    }
}

/// Let the user pick runs under `root`
///
/// Files whose path is in `previous` start checked. `None` means the user
/// quit.
pub fn select_runs(
    terminal: &mut Tui,
    root: &Path,
    previous: &[PathBuf],
    config: &ViewerConfig,
) -> Result<Option<Vec<RunSpec>>> {
    let files = discover(root)?;
    let labels: Vec<String> = files.iter().enumerate().map(|(i, f)| f.label(i)).collect();
    let preselected: Vec<String> = files
        .iter()
        .zip(&labels)
        .filter(|(file, _)| previous.contains(&file.path))
        .map(|(_, label)| label.clone())
        .collect();

    let mut picker = PickerState::new(labels, &preselected);
    let root_label = root.display().to_string();

    loop {
        terminal.draw(|f| ui::picker::draw_picker(f, &picker, &root_label))?;

        let Some(input) = next_input(config)? else {
            continue;
        };
        match picker.handle_input(input) {
            PickerOutcome::Pending => {}
            PickerOutcome::Confirmed(indices) => {
                let specs = indices
                    .into_iter()
                    .filter_map(|i| files.get(i))
                    .map(|file| file.run_spec())
                    .collect();
                return Ok(Some(specs));
            }
            PickerOutcome::Quit | PickerOutcome::Exit => return Ok(None),
        }
    }
}

/// Own the terminal for the whole interactive session
pub fn run(target: Target, config: &ViewerConfig, logs: &LogBuffer) -> Result<()> {
    let mut session = TerminalSession::enter()?;
    let terminal = session.terminal();

    match target {
        Target::File(spec) => {
            info!(run = %spec.name, path = %spec.path.display(), "viewing single file");
            run_viewer(terminal, vec![spec], config, logs)?;
        }
        Target::Directory(root) => {
            let mut previous: Vec<PathBuf> = Vec::new();
            while let Some(specs) = select_runs(terminal, &root, &previous, config)? {
                previous = specs.iter().map(|spec| spec.path.clone()).collect();
                info!(runs = specs.len(), "viewing selected runs");

                if run_viewer(terminal, specs, config, logs)? == Outcome::Exit {
                    break;
                }
            }
        }
    }
    Ok(())
}
