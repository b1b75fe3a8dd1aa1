//! Drives one wizard from the terminal until it is submitted or
//! cancelled.
//!
//! At any prompt `:q` cancels and `:b` goes back a step. End of input
//! cancels as well. When a current value is shown in brackets, Enter keeps
//! it and `:-` clears it.

use std::path::Path;

use alumni_client::ConnectApi;
use alumni_core::attachment::{Attachment, ACCEPTED_MIME_TYPE};
use alumni_core::submission::SubmitRoute;
use alumni_core::wizard::{WizardStep, TOTAL_STEPS};
use alumni_wizard::{Notification, Wizard, WizardError, WizardObserver, WizardSnapshot};
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::fields::{pick_choice, TerminalForm};
use crate::prompt::{Prompter, CLEAR};

const CANCEL: &str = ":q";
const BACK: &str = ":b";
const RESEND: &str = ":r";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Submitted(SubmitRoute),
    Cancelled,
}

/// Logs what the wizard reports. Success messages go to stdout as the
/// final line of a run.
#[derive(Debug, Default)]
pub struct TerminalObserver;

impl WizardObserver for TerminalObserver {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Success(message) => println!("{message}"),
            Notification::Error(message) => tracing::debug!(%message, "Wizard reported an error"),
        }
    }

    fn on_close(&self) {
        tracing::debug!("Wizard closed");
    }
}

/// Run `wizard` to completion.
pub async fn run<E, R, W>(wizard: &Wizard<E>, prompter: &mut Prompter<R, W>) -> anyhow::Result<Outcome>
where
    E: TerminalForm,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    tracing::info!(session_id = %wizard.session_id(), flow = E::NAME, "Wizard started");
    prompter
        .say(&format!(
            "{} (type {CANCEL} to cancel, {BACK} to go back, {CLEAR} to clear a value)",
            E::NAME
        ))
        .await?;

    let mut shown = None;
    loop {
        let snap = wizard.snapshot().await;
        if shown != Some(snap.step) {
            prompter
                .say(&format!("Step {}/{TOTAL_STEPS}: {}", snap.step.to_number(), snap.step))
                .await?;
            shown = Some(snap.step);
        }
        let step = match snap.step {
            WizardStep::EmailEntry => email_step(wizard, prompter, &snap).await?,
            WizardStep::OtpEntry => otp_step(wizard, prompter, &snap).await?,
            WizardStep::FormEntry => form_step(wizard, prompter, &snap).await?,
        };
        if let Some(outcome) = step {
            return Ok(outcome);
        }
    }
}

/// Print the registration reference lists. Failures only degrade the hint.
pub async fn show_reference_lists<R, W>(api: &ConnectApi, prompter: &mut Prompter<R, W>) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match api.list_courses().await {
        Ok(courses) if !courses.is_empty() => {
            let codes: Vec<&str> = courses.iter().map(|c| c.code.as_str()).collect();
            prompter.say(&format!("Courses: {}", codes.join(", "))).await?;
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "Could not load courses"),
    }
    match api.list_countries().await {
        Ok(countries) if !countries.is_empty() => {
            prompter
                .say(&format!("{} countries available", countries.len()))
                .await?;
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "Could not load countries"),
    }
    Ok(())
}

// ---- steps ----

type Step = anyhow::Result<Option<Outcome>>;

async fn email_step<E, R, W>(wizard: &Wizard<E>, prompter: &mut Prompter<R, W>, snap: &WizardSnapshot<E>) -> Step
where
    E: TerminalForm,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let Some(answer) = prompter.ask_or_keep("Email", &snap.email).await? else {
        return cancel(wizard).await;
    };
    match answer.as_str() {
        CANCEL => cancel(wizard).await,
        BACK => Ok(None),
        email => {
            match wizard.request_code(email).await {
                Ok(()) => prompter.say(&format!("A 4-digit code was sent to {email}.")).await?,
                Err(e) => report(prompter, e).await?,
            }
            Ok(None)
        }
    }
}

async fn otp_step<E, R, W>(wizard: &Wizard<E>, prompter: &mut Prompter<R, W>, snap: &WizardSnapshot<E>) -> Step
where
    E: TerminalForm,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let label = if snap.can_resend {
        format!("Code ({RESEND} to resend)")
    } else {
        format!("Code (resend in {})", snap.countdown.display())
    };
    let Some(answer) = prompter.ask(&label).await? else {
        return cancel(wizard).await;
    };

    let result = match answer.as_str() {
        CANCEL => return cancel(wizard).await,
        BACK => wizard.back().await.map(|_| ()),
        RESEND => wizard.resend_code().await,
        code => match wizard.fill_code(code).await {
            Ok(()) => wizard.verify_code().await,
            Err(e) => Err(e),
        },
    };
    if let Err(e) = result {
        report(prompter, e).await?;
    }
    Ok(None)
}

async fn form_step<E, R, W>(wizard: &Wizard<E>, prompter: &mut Prompter<R, W>, snap: &WizardSnapshot<E>) -> Step
where
    E: TerminalForm,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let heading = if snap.is_update() {
        "Your existing details were loaded; press Enter to keep a value."
    } else {
        "Fill in your details."
    };
    prompter.say(heading).await?;

    for field in E::FIELDS {
        for (n, choice) in field.choices.iter().enumerate() {
            prompter.say(&format!("  {}. {choice}", n + 1)).await?;
        }
        loop {
            let current = E::get(&wizard.snapshot().await.form, field.key);
            let Some(answer) = prompter.ask_or_keep(field.label, &current).await? else {
                return cancel(wizard).await;
            };
            match answer.as_str() {
                CANCEL => return cancel(wizard).await,
                BACK => {
                    if let Err(e) = wizard.back().await {
                        report(prompter, e).await?;
                    }
                    return Ok(None);
                }
                _ => {}
            }

            let value = pick_choice(field, &answer);
            let mut applied = Ok(());
            wizard
                .edit_form(|form| applied = E::set(form, field.key, &value))
                .await?;
            match applied {
                Ok(()) => break,
                Err(message) => prompter.say(&format!("! {message}")).await?,
            }
        }
    }

    if E::ATTACHMENT_FIELD.is_some() {
        if let Some(outcome) = attachment_prompt(wizard, prompter).await? {
            return Ok(Some(outcome));
        }
    }

    let snap = wizard.snapshot().await;
    if !snap.missing_fields.is_empty() {
        let labels = E::missing_labels(&snap.form);
        prompter
            .say(&format!("Still required: {}", labels.join(", ")))
            .await?;
        return Ok(None);
    }

    let Some(answer) = prompter.ask("Submit? [y/N]").await? else {
        return cancel(wizard).await;
    };
    match answer.to_ascii_lowercase().as_str() {
        "y" | "yes" => match wizard.submit().await {
            Ok(route) => Ok(Some(Outcome::Submitted(route))),
            Err(WizardError::Closed) => Ok(Some(Outcome::Cancelled)),
            Err(e) => {
                report(prompter, e).await?;
                Ok(None)
            }
        },
        CANCEL => cancel(wizard).await,
        _ => Ok(None),
    }
}

/// Ask for an optional file. Returns an outcome only when the user cancels.
async fn attachment_prompt<E, R, W>(wizard: &Wizard<E>, prompter: &mut Prompter<R, W>) -> Step
where
    E: TerminalForm,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let current = wizard.snapshot().await.attachment_name.unwrap_or_default();
        let Some(answer) = prompter
            .ask_or_keep("Payment proof PDF (path, optional)", &current)
            .await?
        else {
            return cancel(wizard).await;
        };
        if answer == CANCEL {
            return cancel(wizard).await;
        }
        if answer.is_empty() {
            if !current.is_empty() {
                wizard.clear_attachment().await?;
            }
            return Ok(None);
        }
        if answer == current {
            return Ok(None);
        }

        let path = Path::new(&answer);
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                prompter.say(&format!("! Cannot read {answer}: {e}")).await?;
                continue;
            }
        };
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| answer.clone());
        match wizard
            .attach(Attachment::new(file_name, mime_for(path), bytes))
            .await
        {
            Ok(()) => return Ok(None),
            Err(e) => report(prompter, e).await?,
        }
    }
}

/// Only the extension is consulted.
fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => ACCEPTED_MIME_TYPE,
        _ => "application/octet-stream",
    }
}

async fn cancel<E: TerminalForm>(wizard: &Wizard<E>) -> Step {
    wizard.close().await;
    Ok(Some(Outcome::Cancelled))
}

async fn report<R, W>(prompter: &mut Prompter<R, W>, err: WizardError) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    prompter.say(&format!("! {err}")).await?;
    Ok(())
}
