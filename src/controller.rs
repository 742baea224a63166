use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use crate::analytics::AnalyticsHooks;
use crate::feedback::{FeedbackMessage, FeedbackSurface};
use crate::lock;
use crate::site::SiteProfile;
use crate::submission::{validate, ClientContext, FormSubmission, RawFields, ValidationResult};
use crate::transport::{Delivery, Transport, TransportError};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// The submit control of a form, plus the ability to clear its fields.
pub trait FormControls: Send {
    fn submit_label(&self) -> String;
    fn set_submit_label(&mut self, label: &str);
    fn set_submit_enabled(&mut self, enabled: bool);
    fn reset(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    pub label: String,
    pub enabled: bool,
    /// Every enabled/disabled change, in order.
    pub enabled_history: Vec<bool>,
    pub resets: usize,
}

/// In-memory controls that can be inspected after the controller is done with them.
#[derive(Clone)]
pub struct SharedControls(Arc<Mutex<ControlState>>);

impl SharedControls {
    pub fn new(label: &str) -> Self {
        Self(Arc::new(Mutex::new(ControlState {
            label: label.to_string(),
            enabled: true,
            enabled_history: Vec::new(),
            resets: 0,
        })))
    }

    pub fn snapshot(&self) -> ControlState {
        lock(&self.0).clone()
    }
}

impl FormControls for SharedControls {
    fn submit_label(&self) -> String {
        lock(&self.0).label.clone()
    }

    fn set_submit_label(&mut self, label: &str) {
        lock(&self.0).label = label.to_string();
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        let mut state = lock(&self.0);
        state.enabled = enabled;
        state.enabled_history.push(enabled);
    }

    fn reset(&mut self) {
        lock(&self.0).resets += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionState {
    Idle,
    Submitting,
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    Invalid(Vec<String>),
    /// Another submission from this form is still in flight.
    Busy,
    Transport(TransportError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Invalid(errors) => write!(f, "Invalid submission: {}", errors.join("; ")),
            SubmitError::Busy => write!(f, "A submission is already in progress"),
            SubmitError::Transport(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SubmitError {}

impl From<TransportError> for SubmitError {
    fn from(err: TransportError) -> Self {
        SubmitError::Transport(err)
    }
}

/// Drives one form: validation, delivery to the webhook, feedback and analytics.
pub struct FormController {
    profile: &'static SiteProfile,
    endpoint: Option<String>,
    timeout: Duration,
    transport: Arc<dyn Transport>,
    controls: Mutex<Box<dyn FormControls>>,
    feedback: Arc<dyn FeedbackSurface>,
    analytics: AnalyticsHooks,
    state: Mutex<SubmissionState>,
}

impl FormController {
    pub fn new(
        profile: &'static SiteProfile,
        transport: Arc<dyn Transport>,
        controls: Box<dyn FormControls>,
        feedback: Arc<dyn FeedbackSurface>,
    ) -> Self {
        Self {
            profile,
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
            transport,
            controls: Mutex::new(controls),
            feedback,
            analytics: AnalyticsHooks::none(),
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_analytics(mut self, analytics: AnalyticsHooks) -> Self {
        self.analytics = analytics;
        self
    }

    pub fn profile(&self) -> &'static SiteProfile {
        self.profile
    }

    pub fn state(&self) -> SubmissionState {
        *lock(&self.state)
    }

    /// Validate and deliver one submission.
    ///
    /// A second call while a delivery is in flight is rejected with
    /// [`SubmitError::Busy`] without touching the form.
    pub async fn handle_submit(
        &self,
        raw: &RawFields,
        client: &ClientContext,
    ) -> Result<Delivery, SubmitError> {
        let mut claim = self.claim()?;

        let submission = FormSubmission::build(self.profile, raw, client, Utc::now());

        if let ValidationResult::Invalid(errors) = validate(&submission, self.profile.rules) {
            tracing::debug!(
                site = %self.profile.id,
                errors = errors.len(),
                "Submission failed validation"
            );
            self.feedback
                .show(FeedbackMessage::validation(self.profile, &errors));
            return Err(SubmitError::Invalid(errors));
        }

        claim.lock_controls();

        let body = submission.to_json();
        match self.deliver(&body).await {
            Ok(delivery) => {
                tracing::info!(site = %self.profile.id, ?delivery, "Submission delivered");
                self.feedback.show(FeedbackMessage::success(self.profile));
                lock(&self.controls).reset();
                self.analytics
                    .track(&self.profile.conversion, self.profile.conversion.event_name, &body);
                claim.settle(SubmissionState::Success);
                Ok(delivery)
            }
            Err(err) => {
                tracing::error!(site = %self.profile.id, "Form submission error: {err}");
                self.feedback
                    .show(FeedbackMessage::error(self.profile, self.profile.error_text));
                claim.settle(SubmissionState::Failed);
                Err(SubmitError::Transport(err))
            }
        }
    }

    async fn deliver(&self, body: &serde_json::Value) -> Result<Delivery, TransportError> {
        let url = self
            .endpoint
            .as_deref()
            .ok_or(TransportError::NotConfigured)?;

        match tokio::time::timeout(self.timeout, self.transport.post_json(url, body)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::TimedOut(self.timeout)),
        }
    }

    fn claim(&self) -> Result<Claim<'_>, SubmitError> {
        let mut state = lock(&self.state);
        if *state == SubmissionState::Submitting {
            tracing::warn!(site = %self.profile.id, "Rejected submit while another is in flight");
            return Err(SubmitError::Busy);
        }
        let previous = *state;
        *state = SubmissionState::Submitting;
        Ok(Claim {
            controller: self,
            previous,
            original_label: None,
            outcome: None,
        })
    }
}

/// Holds the in-flight slot of a controller.
///
/// Dropping it always releases the slot and, if the controls were locked,
/// restores them. An unsettled claim puts back the previous state when the
/// controls were never locked and ends in `Failed` when delivery was cancelled.
struct Claim<'a> {
    controller: &'a FormController,
    previous: SubmissionState,
    original_label: Option<String>,
    outcome: Option<SubmissionState>,
}

impl Claim<'_> {
    fn lock_controls(&mut self) {
        let mut controls = lock(&self.controller.controls);
        self.original_label = Some(controls.submit_label());
        controls.set_submit_enabled(false);
        controls.set_submit_label(self.controller.profile.busy_label);
    }

    fn settle(&mut self, outcome: SubmissionState) {
        self.outcome = Some(outcome);
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        let locked = self.original_label.is_some();

        if let Some(label) = self.original_label.take() {
            let mut controls = lock(&self.controller.controls);
            controls.set_submit_enabled(true);
            controls.set_submit_label(&label);
        }

        let next = match self.outcome {
            Some(outcome) => outcome,
            None if locked => SubmissionState::Failed,
            None => self.previous,
        };
        *lock(&self.controller.state) = next;
    }
}
