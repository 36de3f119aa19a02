use super::email::render_dip_digest;
use super::notifications_model::{AlertKind, DispatchSummary, RecordOutcome};
use super::notifications_traits::{
    Mailer, NotificationLogRepositoryTrait, RecipientRepositoryTrait,
};
use crate::alerts::{AlertServiceTrait, DipAlert};
use crate::constants::{NOTIFICATION_COOLDOWN_HOURS, NOTIFICATION_LOG_RETENTION_DAYS};
use crate::errors::Result;
use chrono::{Duration, Utc};
use log::{info, warn};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Runs the end of the alert pipeline: evaluate every watchlist, suppress
/// alerts still inside the cooldown window, and deliver one digest email per
/// owner.
///
/// Log rows are written only after a successful send. A failed send leaves
/// the cooldown slots unclaimed so the next run retries delivery.
pub struct NotificationService {
    alert_service: Arc<dyn AlertServiceTrait>,
    log_repository: Arc<dyn NotificationLogRepositoryTrait>,
    recipients: Arc<dyn RecipientRepositoryTrait>,
    mailer: Arc<dyn Mailer>,
}

impl NotificationService {
    pub fn new(
        alert_service: Arc<dyn AlertServiceTrait>,
        log_repository: Arc<dyn NotificationLogRepositoryTrait>,
        recipients: Arc<dyn RecipientRepositoryTrait>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            alert_service,
            log_repository,
            recipients,
            mailer,
        }
    }

    /// Evaluates all watchlists and dispatches due alerts.
    pub async fn run(&self) -> Result<DispatchSummary> {
        let alerts = self.alert_service.evaluate_all().await?;
        let mut summary = DispatchSummary::default();
        if alerts.is_empty() {
            info!("Notification run: no dips triggered");
            return Ok(summary);
        }

        let mut by_owner: BTreeMap<String, Vec<DipAlert>> = BTreeMap::new();
        for alert in alerts {
            by_owner.entry(alert.owner_id.clone()).or_default().push(alert);
        }

        let cooldown_start = Utc::now() - Duration::hours(NOTIFICATION_COOLDOWN_HOURS);
        for (owner_id, owner_alerts) in by_owner {
            let mut due = Vec::with_capacity(owner_alerts.len());
            for alert in owner_alerts {
                let suppressed = self
                    .log_repository
                    .was_sent_within(
                        &owner_id,
                        &alert.symbol,
                        AlertKind::WatchlistDip,
                        cooldown_start,
                    )
                    .await?;
                if suppressed {
                    summary.skipped += 1;
                } else {
                    due.push(alert);
                }
            }

            if due.is_empty() {
                continue;
            }

            let recipient = match self.recipients.get_for_owner(&owner_id).await? {
                Some(recipient) => recipient,
                None => {
                    warn!("No alert recipient configured for owner {}", owner_id);
                    summary.errors += 1;
                    continue;
                }
            };

            let message = render_dip_digest(&recipient.email, &due);
            match self.mailer.send(&message).await {
                Ok(message_id) => {
                    info!(
                        "Sent dip digest to owner {} ({} alerts, message {})",
                        owner_id,
                        due.len(),
                        message_id
                    );
                    let sent_at = Utc::now();
                    for alert in &due {
                        match self
                            .log_repository
                            .try_record_sent(
                                &owner_id,
                                &alert.symbol,
                                AlertKind::WatchlistDip,
                                sent_at,
                            )
                            .await?
                        {
                            RecordOutcome::Recorded => summary.sent += 1,
                            // A concurrent run got there first. The email went
                            // out, but the other run owns the dedup slot.
                            RecordOutcome::AlreadyRecorded => summary.skipped += 1,
                        }
                    }
                }
                Err(e) => {
                    // No log rows on failure so the next run retries.
                    warn!("Failed to send dip digest to owner {}: {}", owner_id, e);
                    summary.errors += 1;
                }
            }
        }

        info!(
            "Notification run complete: {} sent, {} skipped, {} errors",
            summary.sent, summary.skipped, summary.errors
        );
        Ok(summary)
    }

    /// Drops log rows past the retention window.
    pub async fn prune_log(&self) -> Result<usize> {
        let cutoff = Utc::now() - Duration::days(NOTIFICATION_LOG_RETENTION_DAYS);
        let removed = self.log_repository.prune_older_than(cutoff).await?;
        if removed > 0 {
            info!("Pruned {} expired notification log rows", removed);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::notifications::{
        AlertRecipient, EmailMessage, NotificationError, NotificationLogEntry,
    };
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    struct StubAlerts {
        alerts: Vec<DipAlert>,
    }

    #[async_trait]
    impl AlertServiceTrait for StubAlerts {
        async fn evaluate_for_owner(&self, owner_id: &str) -> Result<Vec<DipAlert>> {
            Ok(self
                .alerts
                .iter()
                .filter(|a| a.owner_id == owner_id)
                .cloned()
                .collect())
        }

        async fn evaluate_all(&self) -> Result<Vec<DipAlert>> {
            Ok(self.alerts.clone())
        }
    }

    #[derive(Default)]
    struct MemoryLog {
        rows: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl NotificationLogRepositoryTrait for MemoryLog {
        async fn was_sent_within(
            &self,
            owner_id: &str,
            symbol: &str,
            _kind: AlertKind,
            _since: DateTime<Utc>,
        ) -> Result<bool> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .any(|(o, s)| o == owner_id && s == symbol))
        }

        async fn try_record_sent(
            &self,
            owner_id: &str,
            symbol: &str,
            _kind: AlertKind,
            _sent_at: DateTime<Utc>,
        ) -> Result<RecordOutcome> {
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|(o, s)| o == owner_id && s == symbol) {
                return Ok(RecordOutcome::AlreadyRecorded);
            }
            rows.push((owner_id.to_string(), symbol.to_string()));
            Ok(RecordOutcome::Recorded)
        }

        async fn list_for_owner(&self, _owner_id: &str) -> Result<Vec<NotificationLogEntry>> {
            Ok(Vec::new())
        }

        async fn prune_older_than(&self, _cutoff: DateTime<Utc>) -> Result<usize> {
            Ok(0)
        }
    }

    struct StubRecipients;

    #[async_trait]
    impl RecipientRepositoryTrait for StubRecipients {
        async fn get_for_owner(&self, owner_id: &str) -> Result<Option<AlertRecipient>> {
            if owner_id == "no-email" {
                return Ok(None);
            }
            Ok(Some(AlertRecipient {
                owner_id: owner_id.to_string(),
                email: format!("{}@example.com", owner_id),
            }))
        }
    }

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<EmailMessage>>,
        fail: bool,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, message: &EmailMessage) -> Result<String> {
            if self.fail {
                return Err(Error::Notification(NotificationError::Mailer {
                    status: 500,
                    message: "boom".to_string(),
                }));
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok("msg-1".to_string())
        }
    }

    fn alert(owner: &str, symbol: &str) -> DipAlert {
        DipAlert {
            owner_id: owner.to_string(),
            symbol: symbol.to_string(),
            current_price: dec!(180.50),
            reference_high: dec!(213.45),
            dip_percent: dec!(15.44),
            threshold_percent: dec!(10),
            evaluated_at: Utc::now(),
        }
    }

    fn service(
        alerts: Vec<DipAlert>,
        log: Arc<MemoryLog>,
        mailer: Arc<RecordingMailer>,
    ) -> NotificationService {
        NotificationService::new(
            Arc::new(StubAlerts { alerts }),
            log,
            Arc::new(StubRecipients),
            mailer,
        )
    }

    #[tokio::test]
    async fn test_one_digest_per_owner() {
        let log = Arc::new(MemoryLog::default());
        let mailer = Arc::new(RecordingMailer::default());
        let svc = service(
            vec![alert("u1", "AAPL"), alert("u1", "MSFT"), alert("u2", "AAPL")],
            log.clone(),
            mailer.clone(),
        );

        let summary = svc.run().await.unwrap();
        assert_eq!(summary.sent, 3);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.errors, 0);

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "u1@example.com");
        assert_eq!(sent[1].to, "u2@example.com");
    }

    #[tokio::test]
    async fn test_cooldown_suppresses_repeat_alerts() {
        let log = Arc::new(MemoryLog::default());
        let mailer = Arc::new(RecordingMailer::default());
        let svc = service(vec![alert("u1", "AAPL")], log.clone(), mailer.clone());

        let first = svc.run().await.unwrap();
        assert_eq!(first.sent, 1);

        let second = svc.run().await.unwrap();
        assert_eq!(second.sent, 0);
        assert_eq!(second.skipped, 1);
        assert_eq!(mailer.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mailer_failure_leaves_log_unclaimed() {
        let log = Arc::new(MemoryLog::default());
        let mailer = Arc::new(RecordingMailer {
            sent: Mutex::new(Vec::new()),
            fail: true,
        });
        let svc = service(vec![alert("u1", "AAPL")], log.clone(), mailer);

        let summary = svc.run().await.unwrap();
        assert_eq!(summary.sent, 0);
        assert_eq!(summary.errors, 1);
        assert!(log.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_recipient_counts_as_error() {
        let log = Arc::new(MemoryLog::default());
        let mailer = Arc::new(RecordingMailer::default());
        let svc = service(vec![alert("no-email", "AAPL")], log.clone(), mailer.clone());

        let summary = svc.run().await.unwrap();
        assert_eq!(summary.sent, 0);
        assert_eq!(summary.errors, 1);
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_watchlists_are_a_noop() {
        let log = Arc::new(MemoryLog::default());
        let mailer = Arc::new(RecordingMailer::default());
        let svc = service(vec![], log, mailer.clone());

        let summary = svc.run().await.unwrap();
        assert_eq!(summary, DispatchSummary::default());
        assert!(mailer.sent.lock().unwrap().is_empty());
    }
}
