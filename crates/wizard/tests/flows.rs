//! Nomination and sponsorship specifics: eligibility gate, lookup by
//! email and pre-selected defaults.

mod common;

use alumni_core::attachment::{Attachment, ACCEPTED_MIME_TYPE};
use alumni_core::nomination::{Nomination, MSG_NOT_REGISTERED, NOMINATION_CATEGORIES};
use alumni_core::sponsorship::{Sponsorship, SponsorshipForm};
use alumni_core::submission::SubmitRoute;
use alumni_core::types::OtpPurpose;
use alumni_core::wizard::WizardStep;
use alumni_wizard::{Wizard, WizardError};
use assert_matches::assert_matches;
use common::{json_body, Call, MockBackend, RecordingObserver, Reply};
use serde_json::json;

// ---------------------------------------------------------------------------
// Nomination
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unregistered_nominator_gets_no_code() {
    let backend = MockBackend::new();
    backend.set_registered(Reply::Ok(false));
    let wizard = Wizard::<Nomination>::new(backend.clone());

    let err = wizard.request_code("stranger@mail.com").await.unwrap_err();

    assert_eq!(err.to_string(), MSG_NOT_REGISTERED);
    assert_eq!(
        backend.calls(),
        vec![Call::CheckAlumni {
            email: "stranger@mail.com".into()
        }]
    );
    let snap = wizard.snapshot().await;
    assert_eq!(snap.step, WizardStep::EmailEntry);
    assert_eq!(snap.last_error.as_deref(), Some(MSG_NOT_REGISTERED));
}

#[tokio::test]
async fn eligibility_check_failure_is_reported() {
    let backend = MockBackend::new();
    backend.set_registered(Reply::Reject(500, None));
    let wizard = Wizard::<Nomination>::new(backend.clone());

    let err = wizard.request_code("old@alum.edu").await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to verify email");
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn registered_nominator_submits_new_nomination() {
    let backend = MockBackend::new();
    // A record in the verify response must not turn a nomination into an update.
    backend.set_existing(json!({ "ID": 4, "Category": "Outstanding Alumni" }));
    let observer = RecordingObserver::new();
    let wizard = Wizard::<Nomination>::new(backend.clone()).with_observer(observer.clone());

    wizard.request_code("old@alum.edu").await.unwrap();
    wizard.fill_code("4321").await.unwrap();
    wizard.verify_code().await.unwrap();

    let snap = wizard.snapshot().await;
    assert!(!snap.is_update());
    assert_eq!(snap.form.nominator_email, "old@alum.edu");

    wizard
        .edit_form(|f| {
            f.category = NOMINATION_CATEGORIES[0].into();
            f.first_name = "Maria".into();
            f.last_name = "Lopez".into();
        })
        .await
        .unwrap();
    assert_eq!(wizard.submit().await.unwrap(), SubmitRoute::Create);

    let calls = backend.calls();
    assert_eq!(
        calls[..2],
        [
            Call::CheckAlumni {
                email: "old@alum.edu".into()
            },
            Call::SendOtp {
                email: "old@alum.edu".into(),
                purpose: OtpPurpose::Nomination
            },
        ]
    );
    assert!(!calls.iter().any(|c| matches!(c, Call::FindByEmail { .. })));

    let (_, path, body) = backend.submissions().remove(0);
    assert_eq!(path, "/nominations");
    assert_eq!(json_body(&body)["category"], NOMINATION_CATEGORIES[0]);
    assert_eq!(observer.events()[0], "success: Nomination submitted successfully!");
}

#[tokio::test]
async fn unknown_category_is_refused_locally() {
    let backend = MockBackend::new();
    let wizard = Wizard::<Nomination>::new(backend.clone());
    wizard.request_code("old@alum.edu").await.unwrap();
    wizard.fill_code("4321").await.unwrap();
    wizard.verify_code().await.unwrap();
    wizard
        .edit_form(|f| {
            f.category = "Best Dressed".into();
            f.first_name = "Maria".into();
            f.last_name = "Lopez".into();
        })
        .await
        .unwrap();

    assert_matches!(wizard.submit().await, Err(WizardError::Validation(_)));
    assert!(backend.submissions().is_empty());
}

#[tokio::test]
async fn duplicate_category_rejection_is_verbatim() {
    let backend = MockBackend::new();
    backend.set_submit(Reply::Reject(
        409,
        Some("You have already submitted a nomination for this category"),
    ));
    let wizard = Wizard::<Nomination>::new(backend.clone());
    wizard.request_code("old@alum.edu").await.unwrap();
    wizard.fill_code("4321").await.unwrap();
    wizard.verify_code().await.unwrap();
    wizard
        .edit_form(|f| {
            f.category = NOMINATION_CATEGORIES[1].into();
            f.first_name = "Maria".into();
            f.last_name = "Lopez".into();
        })
        .await
        .unwrap();

    let err = wizard.submit().await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "You have already submitted a nomination for this category"
    );
    assert_eq!(wizard.snapshot().await.step, WizardStep::FormEntry);
}

// ---------------------------------------------------------------------------
// Sponsorship
// ---------------------------------------------------------------------------

#[tokio::test]
async fn prior_sponsorship_is_looked_up_and_updated() {
    let backend = MockBackend::new();
    backend.set_lookup(Reply::Ok(Some(json!({
        "ID": 12,
        "FirstName": "Maria",
        "LastName": "Cruz",
        "Company": "Corp",
        "Address": "Bacolod City",
        "ContactNumber": "0917",
        "Level": ""
    }))));
    let observer = RecordingObserver::new();
    let wizard = Wizard::<Sponsorship>::with_form(backend.clone(), SponsorshipForm::with_level("gold"))
        .with_observer(observer.clone());

    wizard.request_code("sponsor@corp.com").await.unwrap();
    wizard.fill_code("1111").await.unwrap();
    wizard.verify_code().await.unwrap();

    assert!(backend.calls().contains(&Call::FindByEmail {
        collection: "sponsorships".into(),
        email: "sponsor@corp.com".into()
    }));
    let snap = wizard.snapshot().await;
    assert_eq!(snap.existing_id, Some(12));
    assert_eq!(snap.form.first_name, "Maria");
    assert_eq!(snap.form.level, "gold");
    assert_eq!(snap.form.email, "sponsor@corp.com");

    assert_eq!(wizard.submit().await.unwrap(), SubmitRoute::Update(12));
    let (_, path, _) = backend.submissions().remove(0);
    assert_eq!(path, "/sponsorships/12");
    assert_eq!(
        observer.events()[0],
        "success: Sponsorship application updated successfully!"
    );
}

#[tokio::test]
async fn failed_sponsorship_lookup_starts_blank() {
    let backend = MockBackend::new();
    backend.set_lookup(Reply::Down);
    let wizard = Wizard::<Sponsorship>::with_form(backend.clone(), SponsorshipForm::with_level("silver"));

    wizard.request_code("sponsor@corp.com").await.unwrap();
    wizard.fill_code("1111").await.unwrap();
    wizard.verify_code().await.unwrap();

    let snap = wizard.snapshot().await;
    assert_eq!(snap.step, WizardStep::FormEntry);
    assert!(!snap.is_update());
    assert_eq!(snap.form.level, "silver");
    assert_eq!(snap.form.first_name, "");
}

#[tokio::test]
async fn sponsorship_takes_no_file() {
    let backend = MockBackend::new();
    let wizard = Wizard::<Sponsorship>::new(backend.clone());
    wizard.request_code("sponsor@corp.com").await.unwrap();
    wizard.fill_code("1111").await.unwrap();
    wizard.verify_code().await.unwrap();

    let err = wizard
        .attach(Attachment::new("logo.pdf", ACCEPTED_MIME_TYPE, vec![1, 2, 3]))
        .await
        .unwrap_err();

    assert_matches!(err, WizardError::Validation(_));
    assert_eq!(wizard.snapshot().await.attachment_name, None);
}
