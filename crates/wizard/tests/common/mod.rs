//! In-memory backend and observer doubles for wizard tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use alumni_client::{ApiError, VerifyResponse, WizardBackend};
use alumni_core::submission::{SubmissionBody, SubmissionRequest, SubmitRoute};
use alumni_core::types::OtpPurpose;
use alumni_wizard::{Notification, WizardObserver};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;

/// Scripted outcome of one backend call.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    /// Non-2xx status with an optional `error` message.
    Reject(u16, Option<&'static str>),
    /// The backend cannot be reached.
    Down,
}

impl<T: Clone> Reply<T> {
    fn resolve(&self) -> Result<T, ApiError> {
        match self {
            Self::Ok(v) => Ok(v.clone()),
            Self::Reject(status, error) => Err(ApiError::Rejected {
                status: *status,
                error: error.map(str::to_string),
            }),
            Self::Down => Err(ApiError::InvalidUrl("connection refused".into())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SendOtp { email: String, purpose: OtpPurpose },
    VerifyOtp { email: String, code: String, purpose: OtpPurpose },
    CheckAlumni { email: String },
    FindByEmail { collection: String, email: String },
    Submit { route: SubmitRoute, path: String, body: SubmissionBody },
}

struct Script {
    send: Reply<()>,
    verify: Reply<VerifyResponse>,
    registered: Reply<bool>,
    lookup: Reply<Option<Value>>,
    submit: Reply<Value>,
}

/// Calls that can be held open until a test releases them.
#[derive(Default)]
struct Gates {
    send: Option<Arc<Notify>>,
    verify: Option<Arc<Notify>>,
    submit: Option<Arc<Notify>>,
}

/// Counts every call and answers from a script that tests may change
/// between steps.
pub struct MockBackend {
    calls: Mutex<Vec<Call>>,
    script: Mutex<Script>,
    /// A held call waits for a permit before answering.
    gates: Mutex<Gates>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(Script {
                send: Reply::Ok(()),
                verify: Reply::Ok(VerifyResponse::default()),
                registered: Reply::Ok(true),
                lookup: Reply::Ok(None),
                submit: Reply::Ok(json!({ "message": "ok" })),
            }),
            gates: Mutex::new(Gates::default()),
        }
    }
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn submissions(&self) -> Vec<(SubmitRoute, String, SubmissionBody)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Submit { route, path, body } => Some((route, path, body)),
                _ => None,
            })
            .collect()
    }

    pub fn set_send(&self, reply: Reply<()>) {
        self.script.lock().unwrap().send = reply;
    }

    pub fn set_verify(&self, reply: Reply<VerifyResponse>) {
        self.script.lock().unwrap().verify = reply;
    }

    /// Verification succeeds and reports `record` as the prior record.
    pub fn set_existing(&self, record: Value) {
        self.set_verify(Reply::Ok(VerifyResponse {
            exists: true,
            record: Some(record),
        }));
    }

    pub fn set_registered(&self, reply: Reply<bool>) {
        self.script.lock().unwrap().registered = reply;
    }

    pub fn set_lookup(&self, reply: Reply<Option<Value>>) {
        self.script.lock().unwrap().lookup = reply;
    }

    pub fn set_submit(&self, reply: Reply<Value>) {
        self.script.lock().unwrap().submit = reply;
    }

    /// Hold `send_otp` until the returned handle is notified.
    pub fn hold_send(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().send = Some(gate.clone());
        gate
    }

    /// Hold `verify_otp` until the returned handle is notified.
    pub fn hold_verify(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().verify = Some(gate.clone());
        gate
    }

    /// Hold `submit` until the returned handle is notified.
    pub fn hold_submit(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().submit = Some(gate.clone());
        gate
    }

    async fn pass(&self, gate: impl FnOnce(&Gates) -> Option<Arc<Notify>>) {
        let gate = gate(&self.gates.lock().unwrap());
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl WizardBackend for MockBackend {
    async fn send_otp(&self, email: &str, purpose: OtpPurpose) -> Result<(), ApiError> {
        self.record(Call::SendOtp {
            email: email.to_string(),
            purpose,
        });
        self.pass(|g| g.send.clone()).await;
        self.script.lock().unwrap().send.resolve()
    }

    async fn verify_otp(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<VerifyResponse, ApiError> {
        self.record(Call::VerifyOtp {
            email: email.to_string(),
            code: code.to_string(),
            purpose,
        });
        self.pass(|g| g.verify.clone()).await;
        self.script.lock().unwrap().verify.resolve()
    }

    async fn is_registered_alumni(&self, email: &str) -> Result<bool, ApiError> {
        self.record(Call::CheckAlumni {
            email: email.to_string(),
        });
        self.script.lock().unwrap().registered.resolve()
    }

    async fn find_by_email(&self, collection: &str, email: &str) -> Result<Option<Value>, ApiError> {
        self.record(Call::FindByEmail {
            collection: collection.to_string(),
            email: email.to_string(),
        });
        self.script.lock().unwrap().lookup.resolve()
    }

    async fn submit(&self, request: &SubmissionRequest) -> Result<Value, ApiError> {
        self.record(Call::Submit {
            route: request.route,
            path: request.path(),
            body: request.body.clone(),
        });
        self.pass(|g| g.submit.clone()).await;
        self.script.lock().unwrap().submit.resolve()
    }
}

/// Records observer callbacks as short strings, in order.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl WizardObserver for RecordingObserver {
    fn notify(&self, notification: Notification) {
        let kind = match notification {
            Notification::Success(_) => "success",
            Notification::Error(_) => "error",
        };
        self.events
            .lock()
            .unwrap()
            .push(format!("{kind}: {}", notification.message()));
    }

    fn on_success(&self) {
        self.events.lock().unwrap().push("on_success".into());
    }

    fn on_close(&self) {
        self.events.lock().unwrap().push("on_close".into());
    }
}

/// JSON body of a plain submission.
pub fn json_body(body: &SubmissionBody) -> &Value {
    match body {
        SubmissionBody::Json(v) => v,
        other => panic!("expected a JSON body, got {other:?}"),
    }
}
