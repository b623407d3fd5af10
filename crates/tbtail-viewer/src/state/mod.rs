//! State machines driven by key input
//!
//! Neither owns the terminal; the UI layer renders them and the app loop
//! feeds them [`Input`](crate::input::Input)s.

pub mod limit_input;
pub mod picker_state;
pub mod view_state;

pub use limit_input::{LimitParseError, parse_limit};
pub use picker_state::{PickerItem, PickerOutcome, PickerState};
pub use view_state::{Mode, Outcome, ViewState};
