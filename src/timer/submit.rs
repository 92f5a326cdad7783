use anyhow::{anyhow, bail, Result};
use tracing::{error, info};

use crate::{
    api::{Entry, EntryClient},
    storage::timer_store::TimerStore,
};

use super::{format::format_entry, manager::TimerManager};

/// Result of a successful stop and submit.
#[derive(Debug)]
pub struct Submission {
    pub timer_id: String,
    pub text: String,
    pub entry: Entry,
}

/// Stops a timer and turns it into a remote entry. The timer stays stopped even when the backend
/// rejects the entry; the error is handed back so it can be shown to the user. A timer that is
/// already stopped was submitted when it stopped, so it is rejected without calling the backend.
pub async fn stop_and_submit<S: TimerStore>(
    manager: &mut TimerManager<S>,
    client: &dyn EntryClient,
    id: &str,
) -> Result<Submission> {
    match manager.get_timer(id) {
        None => bail!("Timer {id} not found"),
        Some(timer) if timer.is_stopped() => bail!("Timer {id} is already stopped"),
        Some(_) => {}
    }

    let now = manager.now();
    let timer = manager
        .stop_timer(id)
        .ok_or_else(|| anyhow!("Timer {id} not found"))?;

    let text = format_entry(timer.total_elapsed_seconds(now) as i64, timer.description());
    let timer_id = timer.id().to_string();

    let entry = client
        .create_entry(&text)
        .await
        .inspect_err(|e| error!("Failed to submit {text:?} for timer {timer_id}: {e:?}"))?;

    info!("Submitted timer {timer_id} as entry {}", entry.id);
    Ok(Submission {
        timer_id,
        text,
        entry,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    };

    use anyhow::{anyhow, Result};
    use chrono::{Duration, Local, TimeZone, Utc};

    use crate::{
        api::{Entry, MockEntryClient},
        storage::timer_store::MockTimerStore,
        timer::{id::IdGenerator, manager::TimerManager},
        utils::clock::test_clock::ManualClock,
    };

    use super::stop_and_submit;

    fn setup() -> (TimerManager<MockTimerStore>, ManualClock) {
        let mut store = MockTimerStore::new();
        store.expect_load().returning(|| Ok(vec![]));
        store.expect_save().returning(|_| Ok(()));

        let now = Local
            .with_ymd_and_hms(2024, 6, 3, 14, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let clock = ManualClock::new(now);
        let counter = Arc::new(AtomicU64::new(0));
        let ids: Box<dyn IdGenerator> =
            Box::new(move || format!("id{}", counter.fetch_add(1, Ordering::SeqCst)));

        (
            TimerManager::new(store, Box::new(clock.clone()), ids),
            clock,
        )
    }

    fn entry(raw_text: &str) -> Entry {
        Entry {
            id: "remote-1".into(),
            raw_text: raw_text.into(),
            status: "pending".into(),
            duration_minutes: None,
            description: None,
            entry_date: None,
        }
    }

    #[tokio::test]
    async fn test_submits_formatted_entry() -> Result<()> {
        let (mut manager, clock) = setup();
        let id = manager.start_timer("Fix auth bug").id().to_string();
        clock.advance(Duration::minutes(89) + Duration::seconds(45));

        let mut client = MockEntryClient::new();
        client
            .expect_create_entry()
            .withf(|text: &str| text == "1h30m Fix auth bug")
            .times(1)
            .returning(|text| Ok(entry(text)));

        let submission = stop_and_submit(&mut manager, &client, &id).await?;

        assert_eq!(submission.timer_id, id);
        assert_eq!(submission.text, "1h30m Fix auth bug");
        assert_eq!(submission.entry.id, "remote-1");
        assert!(manager.get_timer(&id).unwrap().is_stopped());
        Ok(())
    }

    #[tokio::test]
    async fn test_failure_keeps_timer_stopped() {
        let (mut manager, clock) = setup();
        let id = manager.start_timer("Standup").id().to_string();
        clock.advance(Duration::minutes(15));

        let mut client = MockEntryClient::new();
        client
            .expect_create_entry()
            .returning(|_| Err(anyhow!("connection refused")));

        let result = stop_and_submit(&mut manager, &client, &id).await;

        assert!(result.is_err());
        let timer = manager.get_timer(&id).unwrap();
        assert!(timer.is_stopped());
        assert_eq!(timer.accumulated_seconds(), 15 * 60);
        assert_eq!(manager.completed_today().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_timer_is_not_submitted() {
        let (mut manager, _) = setup();

        let mut client = MockEntryClient::new();
        client.expect_create_entry().never();

        let err = stop_and_submit(&mut manager, &client, "nope")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[tokio::test]
    async fn test_stopped_timer_is_submitted_once() -> Result<()> {
        let (mut manager, clock) = setup();
        let id = manager.start_timer("Code review").id().to_string();
        clock.advance(Duration::minutes(30));

        let mut client = MockEntryClient::new();
        client
            .expect_create_entry()
            .times(1)
            .returning(|text| Ok(entry(text)));

        stop_and_submit(&mut manager, &client, &id).await?;
        let stopped_at = manager.get_timer(&id).unwrap().stopped_at();

        clock.advance(Duration::minutes(5));
        let err = stop_and_submit(&mut manager, &client, &id)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("already stopped"));
        assert_eq!(manager.get_timer(&id).unwrap().stopped_at(), stopped_at);
        Ok(())
    }
}
