//! Interactive selection state for one viewer session
//!
//! Key presses move the state between `Normal`, the two limit editors and the
//! terminal `TerminatedReselect`. Every user-visible outcome is reported to a
//! [`DiagnosticSink`], which the binary routes into the log panel.

use tbtail_core::analytics::{
    ChartModel, ChartRequest, LimitRejection, XAxisMode, clamp_step_limit, resolve_y_limit,
    selected_tag,
};
use tbtail_core::{DiagnosticSink, Severity, Tailer};

use super::limit_input::parse_limit;
use crate::input::Input;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing an x range in steps; holds the buffer
    EditingXLim(String),
    /// Typing a y range; holds the buffer
    EditingYLim(String),
    /// Session over, control returns to run selection
    TerminatedReselect,
}

/// What the caller should do after an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Reselect,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn name(self) -> &'static str {
        match self {
            Axis::X => "xlim",
            Axis::Y => "ylim",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewState {
    mode: Mode,
    tag_index: usize,
    smoothing_index: usize,
    smoothing_levels: Vec<usize>,
    x_mode: XAxisMode,
    xlim: Option<(i64, i64)>,
    ylim: Option<(f64, f64)>,
    progress_tag: String,
}

impl ViewState {
    /// Fresh state; an empty level list falls back to no smoothing
    pub fn new(smoothing_levels: Vec<usize>, progress_tag: impl Into<String>) -> Self {
        let smoothing_levels = if smoothing_levels.is_empty() {
            vec![0]
        } else {
            smoothing_levels
        };

        Self {
            mode: Mode::Normal,
            tag_index: 0,
            smoothing_index: 0,
            smoothing_levels,
            x_mode: XAxisMode::Step,
            xlim: None,
            ylim: None,
            progress_tag: progress_tag.into(),
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn tag_index(&self) -> usize {
        self.tag_index
    }

    pub fn smoothing(&self) -> usize {
        self.smoothing_levels[self.smoothing_index]
    }

    pub fn x_mode(&self) -> XAxisMode {
        self.x_mode
    }

    pub fn xlim(&self) -> Option<(i64, i64)> {
        self.xlim
    }

    pub fn ylim(&self) -> Option<(f64, f64)> {
        self.ylim
    }

    pub fn is_terminated(&self) -> bool {
        self.mode == Mode::TerminatedReselect
    }

    /// Current selection as a chart request
    pub fn chart_request(&self) -> ChartRequest<'_> {
        ChartRequest {
            tag_index: self.tag_index,
            smoothing: self.smoothing(),
            mode: self.x_mode,
            xlim: self.xlim,
            ylim: self.ylim,
            progress_tag: &self.progress_tag,
        }
    }

    /// Live prompt while a limit editor is open
    pub fn prompt(&self) -> Option<String> {
        match &self.mode {
            Mode::EditingXLim(buffer) => Some(format!(
                "Enter xlim in steps as start:end (ESC to cancel): {}",
                buffer
            )),
            Mode::EditingYLim(buffer) => {
                Some(format!("Enter ylim as min:max (ESC to cancel): {}", buffer))
            }
            _ => None,
        }
    }

    pub fn handle_input(
        &mut self,
        input: Input,
        tailer: &Tailer,
        sink: &mut dyn DiagnosticSink,
    ) -> Outcome {
        if input == Input::Interrupt {
            return Outcome::Exit;
        }

        match std::mem::take(&mut self.mode) {
            Mode::Normal => self.handle_normal(input, tailer, sink),
            Mode::EditingXLim(buffer) => self.handle_editing(Axis::X, buffer, input, tailer, sink),
            Mode::EditingYLim(buffer) => self.handle_editing(Axis::Y, buffer, input, tailer, sink),
            Mode::TerminatedReselect => {
                self.mode = Mode::TerminatedReselect;
                Outcome::Reselect
            }
        }
    }

    fn handle_normal(&mut self, input: Input, tailer: &Tailer, sink: &mut dyn DiagnosticSink) -> Outcome {
        let tag_count = tailer.tags().len();

        match input {
            Input::Char(c @ '1'..='9') => {
                let n = c as usize - '0' as usize;
                if n <= tag_count {
                    self.tag_index = n - 1;
                }
            }
            Input::Up => {
                self.tag_index = self.tag_index.min(tag_count.saturating_sub(1)).saturating_sub(1);
            }
            Input::Down => {
                if tag_count > 0 {
                    self.tag_index = (self.tag_index + 1).min(tag_count - 1);
                }
            }
            Input::Char('s' | 'S') => {
                self.smoothing_index = (self.smoothing_index + 1) % self.smoothing_levels.len();
                sink.info(format!("smoothing set to {}", self.smoothing()));
            }
            Input::Char('m' | 'M') => {
                self.x_mode = self.x_mode.next();
                sink.info(format!("X axis set to {}", self.x_mode));
            }
            Input::Char('x' | 'X') => {
                self.mode = Mode::EditingXLim(String::new());
                sink.info("Enter xlim in steps as start:end (empty to clear). Press Enter to apply.".into());
            }
            Input::Char('y' | 'Y') => {
                self.mode = Mode::EditingYLim(String::new());
                sink.info("Enter ylim as min:max (empty to clear). Press Enter to apply.".into());
            }
            Input::Char('q' | 'Q') => {
                self.mode = Mode::TerminatedReselect;
                return Outcome::Reselect;
            }
            _ => {}
        }
        Outcome::Continue
    }

    fn handle_editing(
        &mut self,
        axis: Axis,
        mut buffer: String,
        input: Input,
        tailer: &Tailer,
        sink: &mut dyn DiagnosticSink,
    ) -> Outcome {
        match input {
            Input::Enter => {
                match axis {
                    Axis::X => self.finalize_xlim(&buffer, tailer, sink),
                    Axis::Y => self.finalize_ylim(&buffer, tailer, sink),
                }
                return Outcome::Continue;
            }
            Input::Escape => {
                sink.info(format!("{} input cancelled", axis.name()));
                return Outcome::Continue;
            }
            Input::Backspace | Input::Delete => {
                buffer.pop();
            }
            Input::Char(c) if !c.is_control() => buffer.push(c),
            _ => {}
        }

        self.mode = match axis {
            Axis::X => Mode::EditingXLim(buffer),
            Axis::Y => Mode::EditingYLim(buffer),
        };
        Outcome::Continue
    }

    fn finalize_xlim(&mut self, raw: &str, tailer: &Tailer, sink: &mut dyn DiagnosticSink) {
        let request = match parse_limit::<i64>(raw) {
            Ok(Some(request)) => request,
            Ok(None) => {
                self.xlim = None;
                sink.info("xlim cleared".into());
                return;
            }
            Err(e) => {
                sink.warn(format!("failed to parse xlim: {}", e));
                return;
            }
        };

        let observed = selected_tag(tailer.tags(), self.tag_index).and_then(|tag| tailer.step_range(tag));
        match clamp_step_limit(request, observed) {
            Ok(clamped) => {
                self.xlim = Some(clamped);
                let verb = if clamped == request { "set" } else { "clamped" };
                sink.info(format!("{} xlim (steps) to {}:{}", verb, clamped.0, clamped.1));
            }
            Err(rejection) => {
                self.xlim = None;
                sink.warn(finalize_message(Axis::X, rejection));
            }
        }
    }

    fn finalize_ylim(&mut self, raw: &str, tailer: &Tailer, sink: &mut dyn DiagnosticSink) {
        let request = match parse_limit::<f64>(raw) {
            Ok(Some(request)) => request,
            Ok(None) => {
                self.ylim = None;
                sink.info("ylim cleared".into());
                return;
            }
            Err(e) => {
                sink.warn(format!("failed to parse ylim: {}", e));
                return;
            }
        };

        // Clamp against the values currently displayed, ignoring any old limits
        let unbounded = ChartRequest {
            xlim: None,
            ylim: None,
            ..self.chart_request()
        };
        let observed = ChartModel::build(tailer, &unbounded).and_then(|model| model.y_range);

        match resolve_y_limit(request, observed) {
            Ok(clamped) => {
                self.ylim = Some(clamped);
                let verb = if clamped == request { "set" } else { "clamped" };
                sink.info(format!("{} ylim to {}:{}", verb, clamped.0, clamped.1));
            }
            Err(rejection) => {
                self.ylim = None;
                sink.warn(finalize_message(Axis::Y, rejection));
            }
        }
    }

    /// Drop stored limits the latest frame could not honor
    ///
    /// A zero-width projection only skips the frame; the request survives
    /// until more data arrives.
    pub fn apply_rejections(&mut self, model: &ChartModel, sink: &mut dyn DiagnosticSink) {
        if let Some(rejection) = model.x_rejection {
            if rejection.clears_request() {
                self.xlim = None;
                sink.warn(frame_message(Axis::X, rejection));
            } else {
                sink.report(Severity::Debug, frame_message(Axis::X, rejection));
            }
        }

        if let Some(rejection) = model.y_rejection {
            if rejection.clears_request() {
                self.ylim = None;
                sink.warn(frame_message(Axis::Y, rejection));
            } else {
                sink.report(Severity::Debug, frame_message(Axis::Y, rejection));
            }
        }
    }
}

fn finalize_message(axis: Axis, rejection: LimitRejection) -> String {
    match rejection {
        LimitRejection::NoData => format!("no data available to apply {}; ignoring", axis.name()),
        _ => format!("requested {} is outside data range; ignoring", axis.name()),
    }
}

fn frame_message(axis: Axis, rejection: LimitRejection) -> String {
    let name = axis.name();
    match rejection {
        LimitRejection::NoData => format!("no data range available for {}; ignoring", name),
        LimitRejection::OutsideRange => format!("requested {} is outside data range; ignoring", name),
        LimitRejection::NoPointsInRange => {
            format!("requested {} selects no points in current x mode; clearing", name)
        }
        LimitRejection::NonPositiveWidth => format!("computed {} has non-positive width; ignoring", name),
    }
}
