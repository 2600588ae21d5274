use crate::{
    data::{
        student::{Student, StudentDraft, StudentField},
        validation::{self, FieldErrors},
    },
    error::RegistrarResult,
};
use jiff::Timestamp;
use std::time::Duration;

pub const SUCCESS_MESSAGE: &str = "Student registered successfully!";
pub const GENERIC_FAILURE: &str = "Failed to register student. Please try again.";
///how long the success banner stays up
pub const FLASH_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    draft: StudentDraft,
    errors: FieldErrors,
    phase: FormPhase,
    failure: Option<&'static str>,
}

impl RegistrationForm {
    /// Builds a form from posted `name=value` pairs, where names are field paths.
    ///
    /// Unknown names are ignored.
    pub fn from_fields<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut form = Self::default();
        for (name, value) in fields {
            if let Some(field) = StudentField::from_path(name) {
                form.set_field(field, value.to_string());
            }
        }
        form
    }

    pub fn set_field(&mut self, field: StudentField, value: String) {
        self.draft.set(field, value);
        self.errors.remove(field);
    }

    /// Runs the shared validator. Returns the draft to send if it passed.
    pub fn begin_submit(&mut self, now: Timestamp) -> Option<StudentDraft> {
        self.failure = None;
        self.errors = validation::check(&self.draft, now);

        if self.errors.is_empty() {
            self.phase = FormPhase::Submitting;
            Some(self.draft.clone())
        } else {
            self.phase = FormPhase::Idle;
            None
        }
    }

    pub fn finish_submit(&mut self, outcome: RegistrarResult<Student>) {
        match outcome {
            Ok(_) => {
                *self = Self {
                    phase: FormPhase::Succeeded,
                    ..Self::default()
                };
            }
            Err(e) => {
                self.phase = FormPhase::Idle;
                match e.field_errors() {
                    Some(errors) => self.errors = errors,
                    None => {
                        warn!(?e, "Registration failed");
                        self.failure = Some(GENERIC_FAILURE);
                    }
                }
            }
        }
    }

    /// Validates, then sends the draft with `send` only if it passed.
    pub async fn submit<F, Fut>(&mut self, now: Timestamp, send: F)
    where
        F: FnOnce(StudentDraft) -> Fut,
        Fut: Future<Output = RegistrarResult<Student>>,
    {
        if let Some(draft) = self.begin_submit(now) {
            let outcome = send(draft).await;
            self.finish_submit(outcome);
        }
    }

    pub const fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn value(&self, field: StudentField) -> String {
        self.draft.value_of(field)
    }

    pub fn error(&self, field: StudentField) -> Option<&str> {
        self.errors.get(field)
    }

    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub const fn failure(&self) -> Option<&'static str> {
        self.failure
    }

    pub fn success_message(&self) -> Option<&'static str> {
        (self.phase == FormPhase::Succeeded).then_some(SUCCESS_MESSAGE)
    }
}
