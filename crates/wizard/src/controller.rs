//! Generic verified-submission wizard.
//!
//! A [`Wizard`] owns one session and walks it through
//! `EmailEntry -> OtpEntry -> FormEntry`. Network operations follow the
//! same pattern: check and mark the session busy under the lock, release
//! the lock for the request, then re-acquire it and apply the outcome
//! unless the wizard was closed in the meantime.

use std::sync::Arc;

use alumni_client::WizardBackend;
use alumni_core::attachment::{validate_attachment, Attachment};
use alumni_core::email::validate_email;
use alumni_core::entity::{RecordLookup, SubmissionEntity};
use alumni_core::nomination::MSG_NOT_REGISTERED;
use alumni_core::otp::validate_code;
use alumni_core::submission::{build_request, SubmitRoute};
use alumni_core::wizard::{require_step, validate_step_transition, WizardStep};
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::error::{WizardError, MSG_ELIGIBILITY_FAILED, MSG_SEND_FAILED, MSG_VERIFY_FAILED};
use crate::observer::{Notification, NullObserver, WizardObserver};
use crate::session::{WizardSession, WizardSnapshot};
use crate::timer::spawn_countdown;

/// One open wizard for the flow `E`.
pub struct Wizard<E: SubmissionEntity> {
    session_id: Uuid,
    backend: Arc<dyn WizardBackend>,
    observer: Arc<dyn WizardObserver>,
    session: Arc<Mutex<WizardSession<E>>>,
}

impl<E: SubmissionEntity> Wizard<E> {
    /// Open a wizard with a blank form.
    pub fn new(backend: Arc<dyn WizardBackend>) -> Self {
        Self::with_form(backend, E::blank_form(""))
    }

    /// Open a wizard whose form starts from caller-supplied defaults,
    /// e.g. a pre-selected sponsorship level.
    pub fn with_form(backend: Arc<dyn WizardBackend>, base_form: E::Form) -> Self {
        let session_id = Uuid::now_v7();
        tracing::debug!(%session_id, flow = E::NAME, "Wizard opened");
        Self {
            session_id,
            backend,
            observer: Arc::new(NullObserver),
            session: Arc::new(Mutex::new(WizardSession::new(base_form))),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn WizardObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub async fn snapshot(&self) -> WizardSnapshot<E> {
        self.session.lock().await.snapshot()
    }

    // -----------------------------------------------------------------------
    // Email step
    // -----------------------------------------------------------------------

    /// Record the email without sending anything.
    pub async fn set_email(&self, email: &str) -> Result<(), WizardError> {
        let mut s = self.session.lock().await;
        s.ensure_open()?;
        self.on_step(&mut s, WizardStep::EmailEntry)?;
        s.email = email.trim().to_string();
        Ok(())
    }

    /// Validate `email` and ask the backend to send it a code.
    ///
    /// On success the wizard moves to the OTP step and the countdown
    /// restarts at its full window. On failure it stays on the email step.
    pub async fn request_code(&self, email: &str) -> Result<(), WizardError> {
        let email = {
            let mut s = self.session.lock().await;
            s.ensure_idle()?;
            self.on_step(&mut s, WizardStep::EmailEntry)?;
            s.email = email.trim().to_string();
            let email = validate_email(email).map_err(|e| self.fail(&mut s, e.into()))?;
            s.busy = true;
            s.last_error = None;
            email
        };
        self.dispatch_code(email).await
    }

    // -----------------------------------------------------------------------
    // OTP step
    // -----------------------------------------------------------------------

    /// Send a fresh code. Only allowed once the countdown has run out.
    pub async fn resend_code(&self) -> Result<(), WizardError> {
        let email = {
            let mut s = self.session.lock().await;
            s.ensure_idle()?;
            self.on_step(&mut s, WizardStep::OtpEntry)?;
            if !s.countdown.is_expired() {
                let wait = s.countdown.display();
                return Err(self.fail(
                    &mut s,
                    WizardError::Validation(format!("You can request a new code in {wait}")),
                ));
            }
            s.busy = true;
            s.last_error = None;
            s.email.clone()
        };
        self.dispatch_code(email).await
    }

    /// Type `value` into digit box `slot`. Returns the focused box.
    pub async fn enter_digit(&self, slot: usize, value: &str) -> Result<usize, WizardError> {
        let mut s = self.session.lock().await;
        s.ensure_open()?;
        self.on_step(&mut s, WizardStep::OtpEntry)?;
        Ok(s.otp.enter(slot, value)?)
    }

    /// Backspace in digit box `slot`. Returns the focused box.
    pub async fn backspace(&self, slot: usize) -> Result<usize, WizardError> {
        let mut s = self.session.lock().await;
        s.ensure_open()?;
        self.on_step(&mut s, WizardStep::OtpEntry)?;
        Ok(s.otp.backspace(slot)?)
    }

    /// Replace the boxes with a typed or pasted code.
    pub async fn fill_code(&self, code: &str) -> Result<(), WizardError> {
        let mut s = self.session.lock().await;
        s.ensure_open()?;
        self.on_step(&mut s, WizardStep::OtpEntry)?;
        s.otp.fill(code);
        Ok(())
    }

    /// Check the entered code with the backend.
    ///
    /// An incomplete code is rejected without a request. On success the
    /// wizard loads any prior record for the email and moves to the form.
    /// On rejection it stays on the OTP step; the countdown keeps running.
    pub async fn verify_code(&self) -> Result<(), WizardError> {
        let (email, code) = {
            let mut s = self.session.lock().await;
            s.ensure_idle()?;
            self.on_step(&mut s, WizardStep::OtpEntry)?;
            let code = s.otp.code();
            if let Err(e) = validate_code(&code) {
                return Err(self.fail(&mut s, e.into()));
            }
            s.busy = true;
            s.last_error = None;
            (s.email.clone(), code)
        };

        let outcome = self.verify_and_lookup(&email, &code).await;

        let mut s = self.reacquire().await?;
        s.busy = false;
        let record = outcome.map_err(|e| self.fail(&mut s, e))?;

        self.load_record(&mut s, record);
        self.advance(&mut s, WizardStep::FormEntry)?;
        tracing::info!(
            session_id = %self.session_id,
            purpose = %E::PURPOSE,
            update = s.existing_id.is_some(),
            "Email verified"
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Form step
    // -----------------------------------------------------------------------

    /// Apply an edit to the working form.
    pub async fn edit_form<F>(&self, edit: F) -> Result<(), WizardError>
    where
        F: FnOnce(&mut E::Form),
    {
        let mut s = self.session.lock().await;
        s.ensure_open()?;
        self.on_step(&mut s, WizardStep::FormEntry)?;
        edit(&mut s.form);
        // The verified email is not editable.
        let email = s.email.clone();
        E::bind_email(&mut s.form, &email);
        Ok(())
    }

    /// Attach a file. A file breaking the type or size rule is refused and
    /// any previous attachment stays as it was.
    pub async fn attach(&self, file: Attachment) -> Result<(), WizardError> {
        let mut s = self.session.lock().await;
        s.ensure_open()?;
        self.on_step(&mut s, WizardStep::FormEntry)?;
        if E::ATTACHMENT_FIELD.is_none() {
            return Err(self.fail(
                &mut s,
                WizardError::Validation(format!("{} submissions do not take a file", E::NAME)),
            ));
        }
        if let Err(e) = validate_attachment(&file) {
            return Err(self.fail(&mut s, e.into()));
        }
        tracing::debug!(
            session_id = %self.session_id,
            file_name = %file.file_name,
            size = file.size(),
            "Attachment accepted"
        );
        s.attachment = Some(file);
        s.last_error = None;
        Ok(())
    }

    pub async fn clear_attachment(&self) -> Result<(), WizardError> {
        let mut s = self.session.lock().await;
        s.ensure_open()?;
        s.attachment = None;
        Ok(())
    }

    /// Required fields still empty. Submit is enabled when this is empty.
    pub async fn missing_fields(&self) -> Vec<String> {
        E::missing_fields(&self.session.lock().await.form)
    }

    pub async fn can_submit(&self) -> bool {
        let s = self.session.lock().await;
        !s.busy && !s.closed && E::can_submit(&s.form)
    }

    /// Create or update the record.
    ///
    /// The route is an update exactly when verification found a prior
    /// record. On success the observer is notified and the wizard closes;
    /// on failure it stays on the form with every value kept.
    pub async fn submit(&self) -> Result<SubmitRoute, WizardError> {
        let request = {
            let mut s = self.session.lock().await;
            s.ensure_idle()?;
            self.on_step(&mut s, WizardStep::FormEntry)?;
            let request = build_request::<E>(&s.form, s.existing_id, s.attachment.as_ref())
                .map_err(|e| self.fail(&mut s, e.into()))?;
            s.busy = true;
            s.last_error = None;
            request
        };

        tracing::info!(
            session_id = %self.session_id,
            path = %request.path(),
            update = request.route.is_update(),
            "Submitting"
        );
        let outcome = self.backend.submit(&request).await;

        let mut s = self.reacquire().await?;
        s.busy = false;
        if let Err(e) = outcome {
            return Err(self.fail(&mut s, WizardError::from_api(e, E::SUBMIT_FAILURE_FALLBACK)));
        }

        let message = E::success_message(request.route);
        tracing::info!(session_id = %self.session_id, flow = E::NAME, "{message}");
        self.observer.notify(Notification::Success(message.to_string()));
        self.observer.on_success();
        self.shut(&mut s);
        drop(s);
        self.observer.on_close();
        Ok(request.route)
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Go back one step, clearing the inline error but keeping every
    /// entered value.
    pub async fn back(&self) -> Result<WizardStep, WizardError> {
        let mut s = self.session.lock().await;
        s.ensure_idle()?;
        let Some(previous) = s.step.previous() else {
            return Err(WizardError::InvalidStep(format!(
                "Cannot go back from '{}'",
                s.step
            )));
        };
        self.advance(&mut s, previous)?;
        Ok(previous)
    }

    /// Close the wizard. Pending results are dropped when they arrive.
    pub async fn close(&self) {
        let mut s = self.session.lock().await;
        if s.closed {
            return;
        }
        self.shut(&mut s);
        drop(s);
        tracing::debug!(session_id = %self.session_id, "Wizard closed");
        self.observer.on_close();
    }

    // ---- private helpers ----

    /// Eligibility gate (if the flow has one), then the code itself.
    async fn send_code(&self, email: &str) -> Result<(), WizardError> {
        if E::REQUIRES_REGISTERED_ALUMNI {
            let registered = self
                .backend
                .is_registered_alumni(email)
                .await
                .map_err(|e| WizardError::from_api(e, MSG_ELIGIBILITY_FAILED))?;
            if !registered {
                return Err(WizardError::Rejected {
                    status: None,
                    message: MSG_NOT_REGISTERED.to_string(),
                });
            }
        }
        self.backend
            .send_otp(email, E::PURPOSE)
            .await
            .map_err(|e| WizardError::from_api(e, MSG_SEND_FAILED))
    }

    /// Shared tail of `request_code` and `resend_code`. Expects the
    /// session to be marked busy.
    async fn dispatch_code(&self, email: String) -> Result<(), WizardError> {
        let outcome = self.send_code(&email).await;

        let mut s = self.reacquire().await?;
        s.busy = false;
        outcome.map_err(|e| self.fail(&mut s, e))?;

        self.advance(&mut s, WizardStep::OtpEntry)?;
        s.otp.clear();
        s.countdown.restart();
        let cancel = s.replace_timer();
        spawn_countdown(Arc::downgrade(&self.session), cancel, self.session_id);

        tracing::info!(
            session_id = %self.session_id,
            purpose = %E::PURPOSE,
            email = %email,
            "Verification code sent"
        );
        Ok(())
    }

    async fn verify_and_lookup(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<serde_json::Value>, WizardError> {
        let verified = self
            .backend
            .verify_otp(email, code, E::PURPOSE)
            .await
            .map_err(|e| WizardError::from_api(e, MSG_VERIFY_FAILED))?;

        match E::LOOKUP {
            RecordLookup::FromVerification => Ok(verified.existing_record()),
            RecordLookup::Never => Ok(None),
            RecordLookup::ByEmail => match self.backend.find_by_email(E::COLLECTION, email).await {
                Ok(found) => Ok(found),
                Err(e) => {
                    tracing::warn!(
                        session_id = %self.session_id,
                        error = %e,
                        "Prior record lookup failed, starting blank"
                    );
                    Ok(None)
                }
            },
        }
    }

    /// Prefill from a prior record, or start from the caller defaults.
    fn load_record(&self, s: &mut WizardSession<E>, value: Option<serde_json::Value>) {
        let record = value.and_then(|v| match E::parse_record(v) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(session_id = %self.session_id, error = %e, "Ignoring prior record");
                None
            }
        });

        match record {
            Some(record) => {
                s.form = E::prefill(&record, &s.email, &s.base_form);
                s.existing_id = E::record_id(&record);
                s.existing_record = Some(record);
            }
            None => {
                // Drop values prefilled for a different email.
                if s.existing_record.take().is_some() {
                    s.form = s.base_form.clone();
                }
                s.existing_id = None;
                let email = s.email.clone();
                E::bind_email(&mut s.form, &email);
            }
        }
    }

    async fn reacquire(&self) -> Result<MutexGuard<'_, WizardSession<E>>, WizardError> {
        let s = self.session.lock().await;
        if s.closed {
            tracing::debug!(session_id = %self.session_id, "Dropping result for closed wizard");
            return Err(WizardError::Closed);
        }
        Ok(s)
    }

    fn on_step(&self, s: &mut WizardSession<E>, expected: WizardStep) -> Result<(), WizardError> {
        require_step(s.step, expected).map_err(|e| self.fail(s, e.into()))
    }

    fn advance(&self, s: &mut WizardSession<E>, next: WizardStep) -> Result<(), WizardError> {
        validate_step_transition(s.step, next).map_err(|e| self.fail(s, e.into()))?;
        s.step = next;
        s.last_error = None;
        Ok(())
    }

    fn shut(&self, s: &mut WizardSession<E>) {
        s.closed = true;
        s.stop_timer();
    }

    /// Record `err` as the inline error and pass it back.
    fn fail(&self, s: &mut WizardSession<E>, err: WizardError) -> WizardError {
        if err.is_reportable() {
            tracing::debug!(session_id = %self.session_id, step = %s.step, error = %err, "Wizard operation failed");
            s.last_error = Some(err.to_string());
            self.observer.notify(Notification::Error(err.to_string()));
        }
        err
    }
}
