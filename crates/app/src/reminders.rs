//! Delivers deadline reminders once their time has come.
//!
//! A reminder is marked as notified only after a successful delivery, so a
//! failing [`Notifier`] leaves it pending for the next poll.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use engine::{Deadline, Engine, EngineError, REMINDER_TITLE};

#[derive(Debug, thiserror::Error)]
#[error("notification not delivered: {0}")]
pub struct NotifyError(pub String);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub deadline_id: String,
    pub user_id: String,
    pub title: String,
    pub body: String,
}

impl From<&Deadline> for Notification {
    fn from(deadline: &Deadline) -> Self {
        Self {
            deadline_id: deadline.id.clone(),
            user_id: deadline.user_id.clone(),
            title: REMINDER_TITLE.to_string(),
            body: deadline.reminder_message(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn deliver(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Writes reminders to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            user_id = %notification.user_id,
            deadline_id = %notification.deadline_id,
            "{}: {}",
            notification.title,
            notification.body
        );
        Ok(())
    }
}

/// Delivers every due reminder and returns how many went out.
pub async fn run_once<N: Notifier>(
    engine: &Engine,
    notifier: &N,
    now: DateTime<Utc>,
) -> Result<usize, EngineError> {
    let mut delivered = 0;
    for deadline in engine.due_deadlines(now).await? {
        let notification = Notification::from(&deadline);
        match notifier.deliver(&notification) {
            Ok(()) => {
                engine.mark_notified(&deadline.id, now).await?;
                delivered += 1;
            }
            Err(err) => tracing::warn!("reminder for deadline {}: {err}", deadline.id),
        }
    }
    Ok(delivered)
}

pub async fn run<N: Notifier>(engine: Arc<Engine>, notifier: N, every: Duration) {
    let mut interval = tokio::time::interval(every);
    loop {
        interval.tick().await;
        match run_once(&engine, &notifier, Utc::now()).await {
            Ok(0) => {}
            Ok(sent) => tracing::debug!("sent {sent} reminders"),
            Err(err) => tracing::error!("failed to poll reminders: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::TimeZone;
    use engine::{DeadlineNew, MoneyCents, User};
    use migration::MigratorTrait;

    use super::*;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Notification>>);

    impl Notifier for Recorder {
        fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
            self.0.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    struct Offline;

    impl Notifier for Offline {
        fn deliver(&self, _: &Notification) -> Result<(), NotifyError> {
            Err(NotifyError("offline".to_string()))
        }
    }

    async fn engine_with_deadline() -> (Engine, User) {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder().database(db).build().await.unwrap();
        let user = engine
            .sign_up("alice", "alice@example.com", "password")
            .await
            .unwrap();
        engine
            .create_deadline(
                &user.id,
                DeadlineNew {
                    title: "Rent".to_string(),
                    amount: MoneyCents::new(500_000),
                    category: "Bills".to_string(),
                    notes: None,
                    start_date: "01/06/2025".to_string(),
                    end_date: "03/06/2025".to_string(),
                    remind_time: "09:30".to_string(),
                },
            )
            .await
            .unwrap();
        (engine, user)
    }

    #[tokio::test]
    async fn nothing_is_sent_before_the_reminder_time() {
        let (engine, _) = engine_with_deadline().await;
        let recorder = Recorder::default();
        let early = Utc.with_ymd_and_hms(2025, 6, 3, 9, 0, 0).unwrap();

        assert_eq!(run_once(&engine, &recorder, early).await.unwrap(), 0);
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn due_reminder_is_sent_once() {
        let (engine, user) = engine_with_deadline().await;
        let recorder = Recorder::default();
        let now = Utc.with_ymd_and_hms(2025, 6, 3, 9, 30, 0).unwrap();

        assert_eq!(run_once(&engine, &recorder, now).await.unwrap(), 1);
        assert_eq!(run_once(&engine, &recorder, now).await.unwrap(), 0);

        let sent = recorder.0.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].user_id, user.id);
        assert_eq!(sent[0].title, "Budget Reminder");
        assert_eq!(sent[0].body, "Deadline: Rent is due today.");
    }

    #[tokio::test]
    async fn failed_delivery_stays_pending() {
        let (engine, _) = engine_with_deadline().await;
        let now = Utc.with_ymd_and_hms(2025, 6, 4, 0, 0, 0).unwrap();

        assert_eq!(run_once(&engine, &Offline, now).await.unwrap(), 0);

        let recorder = Recorder::default();
        assert_eq!(run_once(&engine, &recorder, now).await.unwrap(), 1);
    }
}
