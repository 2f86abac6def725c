use async_trait::async_trait;
use serde::Serialize;

use crate::domain::ids::{InstructorId, RequestId};

/// Scheduling events worth telling the outside world about. Emitted
/// only after the owning transaction has committed.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase", tag = "event")]
pub enum ScheduleEvent {
    RequestAccepted { request_id: RequestId, instructor_id: InstructorId, slots: usize },
    RequestUndone { request_id: RequestId, instructor_id: InstructorId },
    RequestRescheduled { request_id: RequestId, instructor_id: InstructorId, slots: usize },
    TimetablePublished { blocks: usize },
}

/// Best-effort delivery of scheduling events.
///
/// A notifier failure must never roll back or delay scheduling state;
/// implementations log and swallow their own errors.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: ScheduleEvent);
}

/// Posts each event as JSON to a configured endpoint.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    endpoint: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(endpoint: impl Into<String>) -> Self {
        WebhookNotifier { endpoint: endpoint.into(), client: reqwest::Client::new() }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, event: ScheduleEvent) {
        match self.client.post(&self.endpoint).json(&event).send().await {
            Ok(response) if response.status().is_success() => {
                log::debug!("Notification delivered to {}", self.endpoint);
            }
            Ok(response) => {
                log::warn!("Notification endpoint {} answered {}", self.endpoint, response.status());
            }
            Err(e) => {
                log::warn!("Notification to {} failed: {}", self.endpoint, e);
            }
        }
    }
}

/// Discards every event. Used by tests and the CLI.
#[derive(Debug, Clone, Default)]
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, _event: ScheduleEvent) {}
}
