//! Per-wizard session state.

use alumni_core::attachment::Attachment;
use alumni_core::countdown::Countdown;
use alumni_core::entity::SubmissionEntity;
use alumni_core::otp::OtpInput;
use alumni_core::types::RecordId;
use alumni_core::wizard::WizardStep;
use tokio_util::sync::CancellationToken;

use crate::error::WizardError;

/// Everything a wizard holds while it is open. Discarded on close.
pub(crate) struct WizardSession<E: SubmissionEntity> {
    pub step: WizardStep,
    pub email: String,
    pub otp: OtpInput,
    pub countdown: Countdown,
    pub existing_record: Option<E::Record>,
    /// The only source of the update target.
    pub existing_id: Option<RecordId>,
    pub form: E::Form,
    /// Caller-supplied defaults the form falls back to.
    pub base_form: E::Form,
    pub attachment: Option<Attachment>,
    pub last_error: Option<String>,
    pub busy: bool,
    pub closed: bool,
    /// Cancels the running countdown task, if any.
    pub timer: Option<CancellationToken>,
}

impl<E: SubmissionEntity> WizardSession<E> {
    pub fn new(base_form: E::Form) -> Self {
        Self {
            step: WizardStep::EmailEntry,
            email: String::new(),
            otp: OtpInput::new(),
            countdown: Countdown::new(),
            existing_record: None,
            existing_id: None,
            form: base_form.clone(),
            base_form,
            attachment: None,
            last_error: None,
            busy: false,
            closed: false,
            timer: None,
        }
    }

    /// Reject operations on a closed wizard.
    pub fn ensure_open(&self) -> Result<(), WizardError> {
        if self.closed {
            return Err(WizardError::Closed);
        }
        Ok(())
    }

    /// Reject network operations while one is in flight.
    pub fn ensure_idle(&self) -> Result<(), WizardError> {
        self.ensure_open()?;
        if self.busy {
            return Err(WizardError::Busy);
        }
        Ok(())
    }

    pub fn can_resend(&self) -> bool {
        self.step == WizardStep::OtpEntry && self.countdown.is_expired() && !self.busy && !self.closed
    }

    /// Swap in a fresh countdown token, cancelling the previous one.
    pub fn replace_timer(&mut self) -> CancellationToken {
        if let Some(old) = self.timer.take() {
            old.cancel();
        }
        let token = CancellationToken::new();
        self.timer = Some(token.clone());
        token
    }

    pub fn stop_timer(&mut self) {
        if let Some(token) = self.timer.take() {
            token.cancel();
        }
    }

    pub fn snapshot(&self) -> WizardSnapshot<E> {
        let missing_fields = E::missing_fields(&self.form);
        WizardSnapshot {
            step: self.step,
            email: self.email.clone(),
            otp: self.otp.clone(),
            countdown: self.countdown,
            can_resend: self.can_resend(),
            existing_record: self.existing_record.clone(),
            existing_id: self.existing_id,
            form: self.form.clone(),
            attachment_name: self.attachment.as_ref().map(|a| a.file_name.clone()),
            can_submit: missing_fields.is_empty() && !self.busy,
            missing_fields,
            last_error: self.last_error.clone(),
            busy: self.busy,
            closed: self.closed,
        }
    }
}

/// Read-only copy of a session for rendering.
#[derive(Debug, Clone)]
pub struct WizardSnapshot<E: SubmissionEntity> {
    pub step: WizardStep,
    pub email: String,
    pub otp: OtpInput,
    pub countdown: Countdown,
    pub can_resend: bool,
    pub existing_record: Option<E::Record>,
    pub existing_id: Option<RecordId>,
    pub form: E::Form,
    pub attachment_name: Option<String>,
    /// Required fields still empty, sorted.
    pub missing_fields: Vec<String>,
    pub can_submit: bool,
    pub last_error: Option<String>,
    pub busy: bool,
    pub closed: bool,
}

impl<E: SubmissionEntity> WizardSnapshot<E> {
    /// Whether the session will update an existing record on submit.
    pub fn is_update(&self) -> bool {
        self.existing_id.is_some()
    }
}
