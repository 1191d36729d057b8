use serde::Serialize;
use ts_rs::TS;

/// Single-selection state of the queue.
///
/// Selecting the selected row again clears the selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
#[ts(export)]
pub enum Selection {
    #[default]
    NoneSelected,
    Selected(usize),
}

impl Selection {
    pub fn toggle(self, index: usize) -> Self {
        match self {
            Selection::Selected(current) if current == index => Selection::NoneSelected,
            _ => Selection::Selected(index),
        }
    }

    pub fn index(self) -> Option<usize> {
        match self {
            Selection::NoneSelected => None,
            Selection::Selected(index) => Some(index),
        }
    }

    pub fn is_selected(self, index: usize) -> bool {
        self.index() == Some(index)
    }
}
