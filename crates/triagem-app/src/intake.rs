//! Registration screen state.

use jiff::Timestamp;

use triagem_core::models::patient::PatientId;
use triagem_core::validation::{Field, PatientForm};
use triagem_storage::PatientRepository;

use crate::error::PresenterError;
use crate::messages;
use crate::notice::{Notice, NoticeSlot, Tone};

#[derive(Debug, Default)]
pub struct IntakePresenter {
    form: PatientForm,
    notice: NoticeSlot,
}

impl IntakePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &PatientForm {
        &self.form
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.form.name = value,
            Field::Age => self.form.age = value,
            Field::Description => self.form.description = value,
            Field::Severity => self.form.severity = value,
        }
    }

    pub fn notice(&self, now: Timestamp) -> Option<&Notice> {
        self.notice.visible_at(now)
    }

    pub fn notices(&mut self) -> &mut NoticeSlot {
        &mut self.notice
    }

    /// Validate the form and add the patient to the queue.
    ///
    /// The form is cleared only after the store acknowledges the create.
    /// Validation and persistence failures post an error notice and leave
    /// the form as typed.
    pub async fn submit(&mut self, repo: &dyn PatientRepository) -> Result<PatientId, PresenterError> {
        let record = match self.form.validate() {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!(error = %e, "intake form rejected");
                let err = PresenterError::from(e);
                self.notice.post_now(Tone::Error, err.user_message());
                return Err(err);
            }
        };

        match repo.create(&record.document()).await {
            Ok(id) => {
                tracing::info!(id = %id, severity = record.severity, "patient added to queue");
                self.notice.post_now(Tone::Success, messages::PATIENT_ADDED);
                self.form.clear();
                Ok(id)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to save patient");
                self.notice.post_now(Tone::Error, messages::PERSISTENCE_FAILED);
                Err(e.into())
            }
        }
    }
}
