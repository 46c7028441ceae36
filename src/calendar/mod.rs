//! Calendar view-model: the reactive state machine behind the calendar screens.
//!
//! A [`CalendarViewModel`] owns one background task that serializes every state
//! transition. The task waits on three sources at once: UI commands, results of
//! spawned save/delete work, and the active range subscription. Each input is
//! folded through [`CalendarUiState::reduce`] and the new snapshot is published on
//! a `watch` channel that screens observe.
//!
//! The range subscription is the only path by which `entries_by_date` changes.
//! Moving to another month drops the previous subscription stream before the new
//! one is created, so an emission for a superseded month can never be applied.

pub mod state;

pub use state::{CalendarCommand, CalendarEvent, CalendarUiState, Effect};

use crate::domain::{DailyEntry, YearMonth};
use crate::errors::{AppError, AppResult};
use crate::repository::EntryListStream;
use crate::usecase::CalendarUseCases;
use chrono::NaiveDate;
use futures::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Handle to a running calendar state machine.
///
/// Dropping the handle (or calling [`CalendarViewModel::shutdown`]) stops the
/// background task and cancels its range subscription.
pub struct CalendarViewModel {
    commands: mpsc::UnboundedSender<CalendarCommand>,
    state: watch::Receiver<CalendarUiState>,
    task: JoinHandle<()>,
}

impl CalendarViewModel {
    /// Starts the state machine on the current tokio runtime and subscribes to
    /// `initial_month`. The first published snapshot is already loading.
    pub fn spawn(use_cases: CalendarUseCases, initial_month: YearMonth) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (outcomes_tx, outcomes) = mpsc::unbounded_channel();

        // Init is reduced before the channel exists, so no observer can see the
        // pre-load snapshot as a finished load.
        let mut initial = CalendarUiState::new(initial_month);
        let init_effect = initial.reduce(CalendarEvent::Init);
        let (state_tx, state) = watch::channel(initial);

        let mut runtime = CalendarRuntime {
            use_cases,
            state: state_tx,
            commands: command_rx,
            outcomes_tx,
            outcomes,
            subscription: None,
            generation: 0,
        };
        if let Some(effect) = init_effect {
            runtime.start(effect);
        }
        let task = tokio::spawn(runtime.run());
        info!("Calendar view-model started for {}", initial_month);

        CalendarViewModel {
            commands,
            state,
            task,
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> CalendarUiState {
        self.state.borrow().clone()
    }

    /// A receiver that is notified on every transition.
    pub fn subscribe(&self) -> watch::Receiver<CalendarUiState> {
        self.state.clone()
    }

    /// Waits until a published snapshot satisfies `predicate` and returns it.
    pub async fn wait_until<F>(&self, mut predicate: F) -> AppResult<CalendarUiState>
    where
        F: FnMut(&CalendarUiState) -> bool,
    {
        let mut receiver = self.state.clone();
        let state = receiver
            .wait_for(|state| predicate(state))
            .await
            .map_err(|_| stopped())?;
        Ok(state.clone())
    }

    pub fn on_month_changed(&self, month: YearMonth) -> AppResult<()> {
        self.send(CalendarCommand::MonthChanged(month))
    }

    pub fn on_day_selected(&self, date: NaiveDate) -> AppResult<()> {
        self.send(CalendarCommand::DaySelected(date))
    }

    pub fn on_edit_dismissed(&self) -> AppResult<()> {
        self.send(CalendarCommand::EditDismissed)
    }

    pub fn on_entry_saved(&self, entry: DailyEntry) -> AppResult<()> {
        self.send(CalendarCommand::EntrySaved(entry))
    }

    pub fn on_entry_deleted(&self, date: NaiveDate) -> AppResult<()> {
        self.send(CalendarCommand::EntryDeleted(date))
    }

    pub fn on_error_dismissed(&self) -> AppResult<()> {
        self.send(CalendarCommand::ErrorDismissed)
    }

    /// Stops accepting commands and waits for the background task to finish.
    pub async fn shutdown(self) -> AppResult<()> {
        drop(self.commands);
        self.task
            .await
            .map_err(|e| AppError::Calendar(format!("Calendar task failed: {}", e)))
    }

    fn send(&self, command: CalendarCommand) -> AppResult<()> {
        debug!("Calendar command: {:?}", command);
        self.commands.send(command).map_err(|_| stopped())
    }
}

fn stopped() -> AppError {
    AppError::Calendar("calendar view-model has stopped".to_string())
}

struct CalendarRuntime {
    use_cases: CalendarUseCases,
    state: watch::Sender<CalendarUiState>,
    commands: mpsc::UnboundedReceiver<CalendarCommand>,
    outcomes_tx: mpsc::UnboundedSender<CalendarEvent>,
    outcomes: mpsc::UnboundedReceiver<CalendarEvent>,
    subscription: Option<EntryListStream>,
    generation: u64,
}

impl CalendarRuntime {
    async fn run(mut self) {
        loop {
            // Commands first: a queued month change must drop the old stream
            // before that stream is polled again.
            let event = tokio::select! {
                biased;

                command = self.commands.recv() => match command {
                    Some(command) => CalendarEvent::Command(command),
                    None => break,
                },
                Some(outcome) = self.outcomes.recv() => outcome,
                emission = next_emission(&mut self.subscription) => match emission {
                    Ok(entries) => CalendarEvent::EntriesLoaded(entries),
                    Err(e) => {
                        warn!("Range subscription read failed: {}", e);
                        CalendarEvent::LoadFailed(e.to_string())
                    }
                },
            };
            self.apply(event);
        }

        debug!("Calendar view-model stopped");
    }

    fn apply(&mut self, event: CalendarEvent) {
        let mut effect = None;
        self.state.send_modify(|state| effect = state.reduce(event));
        if let Some(effect) = effect {
            self.start(effect);
        }
    }

    fn start(&mut self, effect: Effect) {
        match effect {
            Effect::Subscribe(month) => {
                // Cancel the superseded subscription before opening the next one.
                self.subscription = None;
                self.generation += 1;
                let (start, end) = month.bounds();
                debug!(generation = self.generation, month = %month, "Subscribing to range");
                self.subscription = Some(self.use_cases.get_entries.call(start, end));
            }
            Effect::Save(entry) => {
                let save = self.use_cases.save_entry.clone();
                let outcomes = self.outcomes_tx.clone();
                tokio::spawn(async move {
                    let result = save.call(entry).await.map_err(|e| e.to_string());
                    if let Err(message) = &result {
                        warn!("Saving entry failed: {}", message);
                    }
                    let _ = outcomes.send(CalendarEvent::SaveFinished(result));
                });
            }
            Effect::Delete(date) => {
                let delete = self.use_cases.delete_entry.clone();
                let outcomes = self.outcomes_tx.clone();
                tokio::spawn(async move {
                    let result = delete.call(date).await.map_err(|e| e.to_string());
                    if let Err(message) = &result {
                        warn!("Deleting entry for {} failed: {}", date, message);
                    }
                    let _ = outcomes.send(CalendarEvent::DeleteFinished(result));
                });
            }
        }
    }
}

/// Next item of the active subscription; pends forever while there is none.
async fn next_emission(
    subscription: &mut Option<EntryListStream>,
) -> AppResult<Vec<DailyEntry>> {
    loop {
        let item = match subscription.as_mut() {
            Some(stream) => stream.next().await,
            None => std::future::pending().await,
        };
        match item {
            Some(item) => return item,
            None => {
                debug!("Range subscription ended");
                *subscription = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Mood;
    use crate::repository::MoodRepository;
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio_stream::wrappers::UnboundedReceiverStream;

    type Feed = mpsc::UnboundedSender<AppResult<Vec<DailyEntry>>>;

    /// Repository whose range subscriptions are driven by the test.
    #[derive(Default)]
    struct ScriptedRepository {
        feeds: Mutex<Vec<(NaiveDate, NaiveDate, Feed)>>,
        saved: Mutex<Vec<DailyEntry>>,
        fail_writes: AtomicBool,
    }

    impl ScriptedRepository {
        fn feed(&self, index: usize) -> Option<(NaiveDate, NaiveDate, Feed)> {
            self.feeds.lock().unwrap().get(index).cloned()
        }

        async fn wait_for_feed(&self, index: usize) -> (NaiveDate, NaiveDate, Feed) {
            for _ in 0..200 {
                if let Some(feed) = self.feed(index) {
                    return feed;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            panic!("subscription {} was never opened", index);
        }

        fn write_result(&self) -> AppResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                Err(AppError::Entry("disk full".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl MoodRepository for ScriptedRepository {
        fn get_entry(&self, _date: NaiveDate) -> BoxFuture<'_, AppResult<Option<DailyEntry>>> {
            async { Ok(None) }.boxed()
        }

        fn get_entries_in_range(&self, start: NaiveDate, end: NaiveDate) -> EntryListStream {
            let (tx, rx) = mpsc::unbounded_channel();
            self.feeds.lock().unwrap().push((start, end, tx));
            UnboundedReceiverStream::new(rx).boxed()
        }

        fn save(&self, entry: DailyEntry) -> BoxFuture<'_, AppResult<()>> {
            let result = self.write_result();
            if result.is_ok() {
                self.saved.lock().unwrap().push(entry);
            }
            async move { result }.boxed()
        }

        fn delete(&self, _date: NaiveDate) -> BoxFuture<'_, AppResult<()>> {
            let result = self.write_result();
            async move { result }.boxed()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(d: NaiveDate, mood: Mood) -> DailyEntry {
        DailyEntry::new(d, mood, "").unwrap()
    }

    fn spawn(repo: &Arc<ScriptedRepository>, month: YearMonth) -> CalendarViewModel {
        CalendarViewModel::spawn(CalendarUseCases::new(repo.clone()), month)
    }

    #[tokio::test]
    async fn test_init_subscribes_to_month_bounds() {
        let repo = Arc::new(ScriptedRepository::default());
        let vm = spawn(&repo, YearMonth::new(2024, 2).unwrap());

        let (start, end, feed) = repo.wait_for_feed(0).await;
        assert_eq!((start, end), (date(2024, 2, 1), date(2024, 2, 29)));
        assert!(vm.state().is_loading);

        feed.send(Ok(vec![entry(date(2024, 2, 14), Mood::Happy)]))
            .unwrap();
        let state = vm.wait_until(|s| !s.is_loading).await.unwrap();
        assert_eq!(state.entries_by_date.len(), 1);
    }

    #[tokio::test]
    async fn test_first_snapshot_is_already_loading() {
        let repo = Arc::new(ScriptedRepository::default());
        let vm = spawn(&repo, YearMonth::new(2024, 3).unwrap());

        // Nothing has yielded to the background task yet.
        assert!(vm.state().is_loading);
        assert!(repo.feed(0).is_some());

        let (_, _, feed) = repo.feed(0).unwrap();
        feed.send(Ok(vec![entry(date(2024, 3, 15), Mood::Calm)]))
            .unwrap();
        let state = vm.wait_until(|s| !s.is_loading).await.unwrap();
        assert_eq!(state.entries_by_date.len(), 1);
    }

    #[tokio::test]
    async fn test_queued_month_change_wins_over_ready_emission() {
        let repo = Arc::new(ScriptedRepository::default());
        let march = YearMonth::new(2024, 3).unwrap();
        let vm = spawn(&repo, march);
        let (_, _, march_feed) = repo.feed(0).unwrap();

        // Both are queued before the background task first runs.
        march_feed
            .send(Ok(vec![entry(date(2024, 3, 15), Mood::Happy)]))
            .unwrap();
        vm.on_month_changed(march.next()).unwrap();

        let (start, _, april_feed) = repo.wait_for_feed(1).await;
        assert_eq!(start, date(2024, 4, 1));
        assert!(march_feed.is_closed());

        let state = vm.state();
        assert_eq!(state.current_month, march.next());
        assert!(state.is_loading);
        assert!(state.entries_by_date.is_empty());

        april_feed.send(Ok(vec![])).unwrap();
        let state = vm.wait_until(|s| !s.is_loading).await.unwrap();
        assert!(state.entries_by_date.is_empty());
    }

    #[tokio::test]
    async fn test_month_switch_cancels_previous_subscription() {
        let repo = Arc::new(ScriptedRepository::default());
        let march = YearMonth::new(2024, 3).unwrap();
        let vm = spawn(&repo, march);
        let (_, _, march_feed) = repo.wait_for_feed(0).await;

        vm.on_month_changed(march.next()).unwrap();
        let (start, _, april_feed) = repo.wait_for_feed(1).await;
        assert_eq!(start, date(2024, 4, 1));

        // The March stream was dropped, so a late March emission cannot be delivered.
        assert!(march_feed.is_closed());
        assert!(march_feed
            .send(Ok(vec![entry(date(2024, 3, 15), Mood::Calm)]))
            .is_err());

        april_feed
            .send(Ok(vec![entry(date(2024, 4, 2), Mood::Anxious)]))
            .unwrap();
        let state = vm.wait_until(|s| !s.is_loading).await.unwrap();
        assert_eq!(state.current_month, march.next());
        assert_eq!(
            state.entries_by_date.keys().copied().collect::<Vec<_>>(),
            vec![date(2024, 4, 2)]
        );
    }

    #[tokio::test]
    async fn test_save_success_dismisses_without_local_patch() {
        let repo = Arc::new(ScriptedRepository::default());
        let vm = spawn(&repo, YearMonth::new(2024, 3).unwrap());
        let (_, _, feed) = repo.wait_for_feed(0).await;
        feed.send(Ok(vec![])).unwrap();
        vm.wait_until(|s| !s.is_loading).await.unwrap();

        vm.on_day_selected(date(2024, 3, 15)).unwrap();
        vm.wait_until(|s| s.show_edit_modal).await.unwrap();

        let saved = entry(date(2024, 3, 15), Mood::Happy);
        vm.on_entry_saved(saved.clone()).unwrap();
        let state = vm.wait_until(|s| !s.show_edit_modal).await.unwrap();

        assert_eq!(state.selected_date, None);
        assert!(state.entries_by_date.is_empty());
        assert_eq!(*repo.saved.lock().unwrap(), vec![saved.clone()]);

        feed.send(Ok(vec![saved.clone()])).unwrap();
        let state = vm
            .wait_until(|s| !s.entries_by_date.is_empty())
            .await
            .unwrap();
        assert_eq!(state.entry_for(date(2024, 3, 15)), Some(&saved));
    }

    #[tokio::test]
    async fn test_write_failure_keeps_edit_state() {
        let repo = Arc::new(ScriptedRepository::default());
        repo.fail_writes.store(true, Ordering::SeqCst);
        let vm = spawn(&repo, YearMonth::new(2024, 3).unwrap());

        vm.on_day_selected(date(2024, 3, 15)).unwrap();
        vm.on_entry_deleted(date(2024, 3, 15)).unwrap();

        let state = vm
            .wait_until(|s| s.error_message.is_some())
            .await
            .unwrap();
        assert!(state.show_edit_modal);
        assert_eq!(state.selected_date, Some(date(2024, 3, 15)));
        assert!(state.error_message.unwrap().contains("disk full"));

        vm.on_error_dismissed().unwrap();
        vm.wait_until(|s| s.error_message.is_none()).await.unwrap();
    }

    #[tokio::test]
    async fn test_subscription_error_keeps_last_good_entries() {
        let repo = Arc::new(ScriptedRepository::default());
        let vm = spawn(&repo, YearMonth::new(2024, 3).unwrap());
        let (_, _, feed) = repo.wait_for_feed(0).await;

        feed.send(Ok(vec![entry(date(2024, 3, 1), Mood::Calm)]))
            .unwrap();
        vm.wait_until(|s| !s.is_loading).await.unwrap();

        feed.send(Err(AppError::Entry("I/O fault".to_string())))
            .unwrap();
        let state = vm
            .wait_until(|s| s.error_message.is_some())
            .await
            .unwrap();

        assert!(!state.is_loading);
        assert_eq!(state.entries_by_date.len(), 1);
    }

    #[tokio::test]
    async fn test_commands_fail_after_shutdown() {
        let repo = Arc::new(ScriptedRepository::default());
        let vm = spawn(&repo, YearMonth::new(2024, 3).unwrap());
        let receiver = vm.subscribe();

        vm.shutdown().await.unwrap();

        assert!(receiver.has_changed().is_err());
    }
}
