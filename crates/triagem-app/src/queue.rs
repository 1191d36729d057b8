//! Queue screen state: the cached snapshot, single selection, and the
//! destructive actions (delete one, clear all).
//!
//! Destructive actions are two-step. `request_*` returns a [`Confirmation`]
//! for the front end to show; only [`QueuePresenter::confirm`] touches the
//! repository. Dropping a confirmation cancels it.

use std::collections::BTreeSet;

use jiff::Timestamp;

use triagem_core::models::patient::{PatientId, PatientRecord};
use triagem_storage::PatientRepository;

use crate::error::PresenterError;
use crate::messages;
use crate::notice::{Notice, NoticeSlot, Tone};
use crate::render::QueueRow;
use crate::selection::Selection;

#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingAction {
    Delete {
        index: usize,
        id: Option<PatientId>,
    },
    ClearAll {
        ids: BTreeSet<PatientId>,
    },
}

/// A destructive action waiting for the user to confirm it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a confirmation does nothing until passed to QueuePresenter::confirm"]
pub struct Confirmation {
    action: PendingAction,
}

impl Confirmation {
    pub fn title(&self) -> &'static str {
        messages::CONFIRM_TITLE
    }

    pub fn prompt(&self) -> &'static str {
        match self.action {
            PendingAction::Delete { .. } => messages::CONFIRM_DELETE,
            PendingAction::ClearAll { .. } => messages::CONFIRM_CLEAR_ALL,
        }
    }

    pub fn confirm_label(&self) -> &'static str {
        match self.action {
            PendingAction::Delete { .. } => messages::DELETE_LABEL,
            PendingAction::ClearAll { .. } => messages::CLEAR_ALL_LABEL,
        }
    }

    pub fn cancel_label(&self) -> &'static str {
        messages::CANCEL_LABEL
    }
}

#[derive(Debug, Default)]
pub struct QueuePresenter {
    records: Vec<PatientRecord>,
    selection: Selection,
    notice: NoticeSlot,
}

impl QueuePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected(&self) -> Option<&PatientRecord> {
        self.selection.index().and_then(|i| self.records.get(i))
    }

    /// Whether the delete action should be enabled.
    pub fn can_delete(&self) -> bool {
        self.selected().is_some()
    }

    pub fn notice(&self, now: Timestamp) -> Option<&Notice> {
        self.notice.visible_at(now)
    }

    pub fn notices(&mut self) -> &mut NoticeSlot {
        &mut self.notice
    }

    /// Replace the cached list with a new snapshot. A selection that no
    /// longer points at a row is cleared.
    pub fn apply_snapshot(&mut self, records: Vec<PatientRecord>) {
        tracing::debug!(count = records.len(), "queue snapshot applied");
        self.records = records;
        if let Some(index) = self.selection.index()
            && index >= self.records.len()
        {
            self.selection = Selection::NoneSelected;
        }
    }

    /// Toggle selection of the row at `index`.
    pub fn select(&mut self, index: usize) -> Result<Selection, PresenterError> {
        if index >= self.records.len() {
            return Err(PresenterError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        self.selection = self.selection.toggle(index);
        Ok(self.selection)
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::NoneSelected;
    }

    /// Start deleting the selected patient.
    ///
    /// With nothing selected this posts a warning and fails with
    /// [`PresenterError::NoSelection`]; the repository is never called.
    pub fn request_delete(&mut self) -> Result<Confirmation, PresenterError> {
        let Some(index) = self.selection.index() else {
            self.notice.post(
                Notice::new(Tone::Warning, messages::NO_SELECTION, Timestamp::now())
                    .with_title(messages::NO_SELECTION_TITLE),
            );
            return Err(PresenterError::NoSelection);
        };

        let record = self.records.get(index).ok_or(PresenterError::IndexOutOfRange {
            index,
            len: self.records.len(),
        })?;

        Ok(Confirmation {
            action: PendingAction::Delete {
                index,
                id: record.id.clone(),
            },
        })
    }

    /// Start clearing the whole queue. Cached rows without an identifier
    /// cannot be addressed in the store and are left out.
    pub fn request_clear_all(&self) -> Confirmation {
        let ids = self
            .records
            .iter()
            .filter_map(|record| record.id.clone())
            .collect();
        Confirmation {
            action: PendingAction::ClearAll { ids },
        }
    }

    /// Carry out a confirmed action against the repository.
    ///
    /// Selection is cleared only once the store acknowledges. On failure an
    /// error notice is posted and nothing else changes.
    pub async fn confirm(
        &mut self,
        confirmation: Confirmation,
        repo: &dyn PatientRepository,
    ) -> Result<(), PresenterError> {
        match confirmation.action {
            PendingAction::Delete { index, id: None } => {
                tracing::warn!(index, "delete requested for patient without id");
                self.notice.post_now(Tone::Error, messages::MISSING_IDENTIFIER);
                Err(PresenterError::MissingIdentifier { index })
            }
            PendingAction::Delete {
                index,
                id: Some(id),
            } => match repo.delete_by_id(&id).await {
                Ok(()) => {
                    tracing::info!(index, id = %id, "patient removed from queue");
                    self.selection = Selection::NoneSelected;
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(id = %id, error = %e, "failed to delete patient");
                    self.notice.post_now(Tone::Error, messages::PERSISTENCE_FAILED);
                    Err(e.into())
                }
            },
            PendingAction::ClearAll { ids } => {
                if ids.is_empty() {
                    self.selection = Selection::NoneSelected;
                    return Ok(());
                }
                match repo.batch_delete(&ids).await {
                    Ok(()) => {
                        tracing::info!(count = ids.len(), "queue cleared");
                        self.selection = Selection::NoneSelected;
                        Ok(())
                    }
                    Err(e) => {
                        tracing::error!(count = ids.len(), error = %e, "failed to clear queue");
                        self.notice.post_now(Tone::Error, messages::PERSISTENCE_FAILED);
                        Err(e.into())
                    }
                }
            }
        }
    }

    /// View models for the rows currently shown.
    pub fn rows(&self) -> Vec<QueueRow> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| QueueRow::new(index, record, self.selection.is_selected(index)))
            .collect()
    }
}
