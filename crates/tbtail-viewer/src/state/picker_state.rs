//! Multi-select run picker

use crate::input::Input;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerItem {
    pub label: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    Pending,
    /// Indices of the chosen items, in list order
    Confirmed(Vec<usize>),
    Quit,
    Exit,
}

#[derive(Debug, Clone, Default)]
pub struct PickerState {
    items: Vec<PickerItem>,
    cursor: usize,
}

impl PickerState {
    /// Build the list, pre-checking every label found in `preselected`
    pub fn new(labels: impl IntoIterator<Item = String>, preselected: &[String]) -> Self {
        let items: Vec<PickerItem> = labels
            .into_iter()
            .map(|label| PickerItem {
                checked: preselected.contains(&label),
                label,
            })
            .collect();

        let cursor = items.iter().position(|item| item.checked).unwrap_or(0);
        Self { items, cursor }
    }

    pub fn items(&self) -> &[PickerItem] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn checked(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.checked)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn toggle(&mut self) {
        if let Some(item) = self.items.get_mut(self.cursor) {
            item.checked = !item.checked;
        }
    }

    pub fn handle_input(&mut self, input: Input) -> PickerOutcome {
        match input {
            Input::Interrupt => return PickerOutcome::Exit,
            Input::Escape | Input::Char('q' | 'Q') => return PickerOutcome::Quit,
            Input::Up | Input::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            Input::Down | Input::Char('j') => {
                if self.cursor + 1 < self.items.len() {
                    self.cursor += 1;
                }
            }
            Input::Char(' ') => self.toggle(),
            Input::Char('a') => {
                let all = self.items.iter().all(|item| item.checked);
                for item in &mut self.items {
                    item.checked = !all;
                }
            }
            Input::Enter => {
                let checked = self.checked();
                if !checked.is_empty() {
                    return PickerOutcome::Confirmed(checked);
                }
                // Nothing ticked: take the highlighted entry
                if self.cursor < self.items.len() {
                    return PickerOutcome::Confirmed(vec![self.cursor]);
                }
            }
            _ => {}
        }
        PickerOutcome::Pending
    }
}
