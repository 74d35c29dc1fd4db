use std::sync::{Arc, Weak};

use serde::Serialize;
use thiserror::Error;

use form_spec::{
    FieldValue, FormSpec, Record, ValidationResult, VisibilityMap, validate, visible_fields,
};

use crate::transport::{SubmitRequest, Transport, TransportError};

/// Where a controller is in its edit/submit cycle.
///
/// Only the states a caller can observe are listed. Validation runs inside
/// [`FormController::begin_submit`]: an invalid record leaves the controller
/// in `Editing` with [`FormController::errors`] filled in. A completed
/// submission is kept as [`FormController::last_submission`] and the
/// controller starts over in `Editing` with a fresh record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Editing,
    Submitting,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(ValidationResult),
    #[error("a submission is already in flight")]
    InFlight,
    #[error("submission failed: {0}")]
    Transport(#[from] TransportError),
}

/// Follow-up question fetch triggered by a category change.
///
/// Runs without borrowing the controller so edits can continue while it is
/// outstanding; feed the reply back through [`FormController::apply_questions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRequest {
    topic: String,
}

impl QuestionRequest {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub async fn run<T: Transport>(self, transport: &T) -> QuestionReply {
        let result = transport.fetch_questions(&self.topic).await;
        QuestionReply {
            topic: self.topic,
            result,
        }
    }
}

#[derive(Debug)]
pub struct QuestionReply {
    pub topic: String,
    pub result: Result<Vec<String>, TransportError>,
}

/// A submission that passed validation, holding a frozen copy of the record.
///
/// The controller counts as `Submitting` for as long as this value lives.
/// Dropping it without [`FormController::finish_submit`], for example when a
/// caller times out the transport call, abandons the submission and the
/// controller is back in `Editing` with its record untouched.
#[derive(Debug)]
pub struct PendingSubmission {
    request: SubmitRequest,
    _in_flight: Arc<()>,
}

impl PendingSubmission {
    pub fn request(&self) -> &SubmitRequest {
        &self.request
    }

    pub fn record(&self) -> &Record {
        &self.request.record
    }
}

/// Result of a completed submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub form_id: String,
    pub record: Record,
    pub follow_up_questions: Vec<String>,
}

/// Holds the live record of one form instance and drives validation,
/// follow-up question fetches and submission.
#[derive(Debug, Clone)]
pub struct FormController {
    form: FormSpec,
    record: Record,
    errors: ValidationResult,
    in_flight: Weak<()>,
    questions: Vec<String>,
    last_submission: Option<Submission>,
    submit_error: Option<String>,
}

impl FormController {
    pub fn new(form: FormSpec) -> Self {
        let record = form.initial_record();
        Self {
            form,
            record,
            errors: ValidationResult::default(),
            in_flight: Weak::new(),
            questions: Vec::new(),
            last_submission: None,
            submit_error: None,
        }
    }

    pub fn form(&self) -> &FormSpec {
        &self.form
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Errors from the last rejected submit.
    pub fn errors(&self) -> &ValidationResult {
        &self.errors
    }

    pub fn phase(&self) -> Phase {
        if self.in_flight.strong_count() > 0 {
            Phase::Submitting
        } else {
            Phase::Editing
        }
    }

    /// Follow-up questions for the current category.
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn last_submission(&self) -> Option<&Submission> {
        self.last_submission.as_ref()
    }

    /// User-facing message for the last failed submission, if any.
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.form.category_value(&self.record)
    }

    pub fn visible_fields(&self) -> VisibilityMap {
        visible_fields(&self.form, &self.record)
    }

    /// Updates one field of the live record.
    ///
    /// Returns a fetch request when the category changed to a new non-empty
    /// value. Clearing the category drops the displayed questions.
    pub fn set_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<QuestionRequest> {
        let name = name.into();
        let is_category = self.form.category.as_deref() == Some(name.as_str());
        let previous = self.record.set(name, value);
        if !is_category {
            return None;
        }

        let previous = previous
            .as_ref()
            .and_then(FieldValue::as_text)
            .filter(|text| !text.is_empty());
        let current = self.category();
        if previous == current {
            return None;
        }

        match current {
            Some(topic) => {
                tracing::debug!(form = %self.form.id, topic, "category changed");
                Some(QuestionRequest {
                    topic: topic.to_string(),
                })
            }
            None => {
                self.questions.clear();
                None
            }
        }
    }

    /// Applies a fetch reply if it still matches the current category.
    ///
    /// Returns `false` for stale replies, which are dropped. A failed fetch is
    /// logged and shows up as an empty question list.
    pub fn apply_questions(&mut self, reply: QuestionReply) -> bool {
        if self.category() != Some(reply.topic.as_str()) {
            tracing::debug!(
                form = %self.form.id,
                topic = %reply.topic,
                "discarding follow-up questions for a stale category"
            );
            return false;
        }

        match reply.result {
            Ok(questions) => self.questions = questions,
            Err(err) => {
                tracing::warn!(
                    form = %self.form.id,
                    topic = %reply.topic,
                    error = %err,
                    "failed to fetch follow-up questions"
                );
                self.questions.clear();
            }
        }
        true
    }

    /// Validates the live record and, when valid, freezes a copy for
    /// submission.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitError> {
        if self.phase() == Phase::Submitting {
            return Err(SubmitError::InFlight);
        }

        self.submit_error = None;
        let result = validate(&self.form, &self.record);
        if !result.is_valid() {
            tracing::debug!(form = %self.form.id, invalid = result.len(), "submit rejected");
            self.errors = result.clone();
            return Err(SubmitError::Invalid(result));
        }

        self.errors = ValidationResult::default();
        let token = Arc::new(());
        self.in_flight = Arc::downgrade(&token);
        Ok(PendingSubmission {
            request: SubmitRequest {
                form_id: self.form.id.clone(),
                category: self.category().map(str::to_string),
                record: self.record.clone(),
            },
            _in_flight: token,
        })
    }

    /// Completes a submission with the transport's answer.
    ///
    /// On success the controller starts over with a fresh record. On failure
    /// the live record is kept and [`submit_error`](Self::submit_error) is set.
    pub fn finish_submit(
        &mut self,
        pending: PendingSubmission,
        result: Result<Vec<String>, TransportError>,
    ) -> Result<Submission, SubmitError> {
        match result {
            Ok(follow_up_questions) => {
                let PendingSubmission {
                    request: SubmitRequest {
                        form_id, record, ..
                    },
                    ..
                } = pending;
                let submission = Submission {
                    form_id,
                    record,
                    follow_up_questions,
                };
                tracing::info!(
                    form = %submission.form_id,
                    fields = submission.record.len(),
                    "form submitted"
                );
                self.last_submission = Some(submission.clone());
                self.reset();
                Ok(submission)
            }
            Err(err) => {
                tracing::warn!(form = %self.form.id, error = %err, "submission failed");
                self.submit_error = Some(format!("Submission failed: {err}"));
                Err(SubmitError::Transport(err))
            }
        }
    }

    /// Validates, submits through `transport` and completes in one go.
    ///
    /// Cancelling the returned future drops the pending submission, so the
    /// controller returns to `Editing`.
    pub async fn submit<T: Transport>(&mut self, transport: &T) -> Result<Submission, SubmitError> {
        let pending = self.begin_submit()?;
        let result = transport.submit(pending.request()).await;
        self.finish_submit(pending, result)
    }

    fn reset(&mut self) {
        self.record = self.form.initial_record();
        self.errors = ValidationResult::default();
        self.questions.clear();
    }
}
