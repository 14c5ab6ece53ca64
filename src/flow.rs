//! Mind-map request flow: form contents, submission gating and result
//! classification.
//!
//! ```text
//! Idle -> Submitting -> Rendered | Failed | RateLimited
//! ```
//!
//! Every submission is tagged with a sequence number. Only the resolution of
//! the latest submission is applied; older ones are reported as stale.

use crate::api::{GenerateError, MapMode, MindMapRequest, MindMapResponse};
use tracing::debug;

pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to generate a mind map.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate mind map. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlowState {
    #[default]
    Idle,
    Submitting,
    Rendered,
    Failed(String),
    RateLimited,
}

impl FlowState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FlowState::Rendered | FlowState::Failed(_) | FlowState::RateLimited
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MindMapForm {
    pub topic: String,
    pub text: String,
    pub mode: MapMode,
}

impl MindMapForm {
    /// A submission needs a topic, and in text mode a body of text too.
    pub fn is_complete(&self) -> bool {
        if self.topic.trim().is_empty() {
            return false;
        }
        self.mode != MapMode::Text || !self.text.trim().is_empty()
    }

    pub fn to_request(&self) -> MindMapRequest {
        let text = (self.mode == MapMode::Text).then(|| self.text.trim().to_string());
        MindMapRequest::new(self.topic.trim(), self.mode, text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub seq: u64,
    pub request: MindMapRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Incomplete form. Nothing happens.
    Ignored,
    /// Refused locally without a network call.
    Rejected,
    Started(Submission),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Stale,
    Rendered { topic: String, source: String },
    Failed,
    RateLimited,
}

#[derive(Debug, Default)]
pub struct RequestFlow {
    pub form: MindMapForm,
    state: FlowState,
    latest_seq: u64,
    in_flight: Option<MindMapRequest>,
}

impl RequestFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == FlowState::Submitting
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Starts a submission. A submission made while another is in flight
    /// supersedes it.
    pub fn submit(&mut self, logged_in: bool) -> SubmitOutcome {
        if !self.form.is_complete() {
            return SubmitOutcome::Ignored;
        }

        if !logged_in {
            self.state = FlowState::Failed(LOGIN_REQUIRED_MESSAGE.to_string());
            return SubmitOutcome::Rejected;
        }

        self.latest_seq += 1;
        let request = self.form.to_request();
        self.in_flight = Some(request.clone());
        self.state = FlowState::Submitting;
        debug!(seq = self.latest_seq, topic = %request.topic, "submission started");

        SubmitOutcome::Started(Submission {
            seq: self.latest_seq,
            request,
        })
    }

    pub fn resolve(
        &mut self,
        seq: u64,
        result: Result<MindMapResponse, GenerateError>,
    ) -> Resolution {
        if seq != self.latest_seq || self.state != FlowState::Submitting {
            debug!(seq, latest = self.latest_seq, "ignoring stale generation result");
            return Resolution::Stale;
        }

        let topic = self
            .in_flight
            .take()
            .map(|r| r.topic)
            .unwrap_or_default();

        match result {
            Ok(response) => {
                self.state = FlowState::Rendered;
                Resolution::Rendered {
                    topic,
                    source: response.diagram_source,
                }
            }
            Err(GenerateError::Unauthorized) => {
                self.state = FlowState::Failed(LOGIN_REQUIRED_MESSAGE.to_string());
                Resolution::Failed
            }
            Err(GenerateError::RateLimited(_)) => {
                self.state = FlowState::RateLimited;
                Resolution::RateLimited
            }
            Err(GenerateError::Unknown(_)) => {
                self.state = FlowState::Failed(GENERIC_FAILURE_MESSAGE.to_string());
                Resolution::Failed
            }
        }
    }

    /// Editing the form after an outcome returns to `Idle`.
    pub fn mark_edited(&mut self) {
        if self.state.is_terminal() {
            self.state = FlowState::Idle;
        }
    }

    pub fn dismiss_rate_limit(&mut self) {
        if self.state == FlowState::RateLimited {
            self.state = FlowState::Idle;
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            FlowState::Failed(message) => Some(message),
            _ => None,
        }
    }
}
