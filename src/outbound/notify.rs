//! New-request alerts: message formatting, best-effort fan-out, and the
//! background worker that keeps delivery off the request path.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use super::messaging::MessageSender;

/// Details of a newly created request, as sent to volunteers
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub resource: String,
    pub address: String,
    pub phone: String,
    pub time: String,
}

pub fn format_alert(alert: &Alert) -> String {
    format!(
        "⚠️ New {} request received!\nLocation: {}\nPhone: {}\nTime: {}",
        alert.resource, alert.address, alert.phone, alert.time
    )
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    pub failed: usize,
}

/// Sends each alert to every configured recipient independently
pub struct NotificationDispatcher {
    sender: Arc<dyn MessageSender>,
    recipients: Vec<String>,
}

impl NotificationDispatcher {
    pub fn new(sender: Arc<dyn MessageSender>, recipients: Vec<String>) -> Self {
        Self { sender, recipients }
    }

    /// Deliver to all recipients; one failure never stops the rest
    pub async fn notify(&self, alert: &Alert) -> DeliveryReport {
        let body = format_alert(alert);
        let mut report = DeliveryReport::default();

        for recipient in &self.recipients {
            match self.sender.send(recipient, &body).await {
                Ok(id) => {
                    tracing::info!("Alert sent to {}: {}", recipient, id);
                    report.sent += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to send alert to {}: {}", recipient, e);
                    report.failed += 1;
                }
            }
        }

        report
    }
}

/// Handle for enqueueing alerts to the background worker
#[derive(Clone, Debug)]
pub struct AlertQueue {
    tx: mpsc::Sender<Alert>,
}

impl AlertQueue {
    /// Start the worker task; it exits once every queue handle is dropped
    pub fn spawn(dispatcher: NotificationDispatcher, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<Alert>(capacity);

        let worker = tokio::spawn(async move {
            while let Some(alert) = rx.recv().await {
                let report = dispatcher.notify(&alert).await;
                tracing::debug!(
                    "Alert for {} request processed: {} sent, {} failed",
                    alert.resource,
                    report.sent,
                    report.failed
                );
            }
            tracing::info!("Alert worker stopped");
        });

        (Self { tx }, worker)
    }

    /// Hand an alert to the worker without waiting
    ///
    /// Returns false (after logging) if the queue is full or the worker is gone.
    pub fn enqueue(&self, alert: Alert) -> bool {
        match self.tx.try_send(alert) {
            Ok(()) => true,
            Err(TrySendError::Full(alert)) => {
                tracing::warn!("Alert queue full; dropping alert for {} request", alert.resource);
                false
            }
            Err(TrySendError::Closed(alert)) => {
                tracing::error!("Alert worker not running; dropping alert for {} request", alert.resource);
                false
            }
        }
    }
}
