//! Terminal viewer for TensorBoard event files
//!
//! Pick runs from a directory tree, watch their scalars grow in a live
//! chart, go back to the picker with `q`.

pub mod app;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod input;
pub mod scheduler;
pub mod state;
pub mod ui;

pub use cli::Cli;
pub use config::{ConfigError, ViewerConfig};
pub use discovery::{DiscoveredFile, DiscoveryError, Target, discover};
pub use input::Input;
pub use scheduler::RescanClock;
pub use state::{Mode, Outcome, PickerOutcome, PickerState, ViewState};
