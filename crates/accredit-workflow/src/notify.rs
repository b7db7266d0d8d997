//! Outbound notification contract.
//!
//! Delivery transport lives outside this crate. Workflow components only
//! see [`NotificationDispatcher`], and a failed delivery is reported in
//! the returned [`DispatchOutcome`], never as an error.

use std::future::Future;

use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub recipients: Vec<String>,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl DispatchOutcome {
    pub fn delivered() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

pub trait NotificationDispatcher: Send + Sync {
    /// Attempt delivery. Must not panic; all failures are reported
    /// through the outcome.
    fn send(&self, notification: &Notification) -> impl Future<Output = DispatchOutcome> + Send;
}

/// Log-only dispatcher for deployments with no transport wired in.
#[derive(Debug, Clone, Default)]
pub struct TracingDispatcher;

impl NotificationDispatcher for TracingDispatcher {
    async fn send(&self, notification: &Notification) -> DispatchOutcome {
        info!(
            recipients = ?notification.recipients,
            subject = %notification.subject,
            "Notification dispatched"
        );
        DispatchOutcome::delivered()
    }
}

/// Send and log a failure without propagating it.
pub(crate) async fn dispatch_logged<N: NotificationDispatcher>(
    dispatcher: &N,
    notification: Notification,
) -> DispatchOutcome {
    let outcome = dispatcher.send(&notification).await;
    if !outcome.success {
        warn!(
            recipients = ?notification.recipients,
            subject = %notification.subject,
            error = outcome.error.as_deref().unwrap_or("unknown"),
            "Notification delivery failed"
        );
    }
    outcome
}
