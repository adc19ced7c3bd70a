use super::{
    clock::Clock,
    countdown::{CountdownClock, NextEventView},
    hijri::HijriDate,
    next_event::{Schedule, select},
    prayer::{Language, Prayer},
    time_of_day::{TimeOfDay, TimeParseError},
};
use crate::provider::{ProviderError, TimingsProvider, TimingsQuery, TimingsTable};
use crate::{error, event, info, prayer, warn};
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};
use tokio_util::sync::CancellationToken;

/// One row of the rendered schedule.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ScheduleRow {
    pub label: String,
    pub arabic_label: String,
    pub display_time: String,
    pub is_next: bool,
    pub remaining: Option<TimeOfDay>,
}

/// Everything the presentation layer needs for one re-render.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ScheduleSnapshot {
    pub rows: Vec<ScheduleRow>,
    pub next: Option<NextEventView>,
    pub hijri: Option<String>,
    pub hijri_ar: Option<String>,
}

/// Output of the schedule view. `Loading` is explicit so that absent data is
/// never rendered as a stale or default schedule.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "status", content = "schedule", rename_all = "snake_case")]
pub enum ScheduleOutput {
    Loading,
    Ready(ScheduleSnapshot),
}

enum ScheduleCommand {
    Refresh,
}

/// A parsed timings table together with its display metadata.
struct LoadedTable {
    events: Vec<(String, TimeOfDay)>,
    prayers: Vec<Prayer>,
    hijri: Option<HijriDate>,
    schedule: Schedule,
}

type FetchResult = (u64, Result<TimingsTable, ProviderError>);

/// Handle of a running schedule view.
///
/// The 60 s timer and all channels live in the monitor task; dropping the
/// handle (or calling [`ScheduleView::shutdown`]) cancels that task.
/// Fetches still in flight at that moment finish detached and their results
/// are dropped.
pub struct ScheduleView {
    output: watch::Receiver<ScheduleOutput>,
    commands: mpsc::Sender<ScheduleCommand>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ScheduleView {
    /// A receiver that observes every re-emitted [`ScheduleOutput`].
    pub fn subscribe(&self) -> watch::Receiver<ScheduleOutput> { self.output.clone() }

    /// The latest output.
    pub fn current(&self) -> ScheduleOutput { self.output.borrow().clone() }

    /// Requests a fresh fetch, superseding any fetch still in flight.
    pub async fn refresh(&self) {
        if self.commands.send(ScheduleCommand::Refresh).await.is_err() {
            warn!("Schedule monitor is gone, refresh ignored");
        }
    }

    /// Stops the monitor and waits for it to release its timer.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!("Schedule monitor ended abnormally: {e}");
            }
        }
    }
}

impl Drop for ScheduleView {
    fn drop(&mut self) { self.cancel.cancel(); }
}

/// Keeps the annotated schedule and the countdown to the next prayer live.
///
/// Two inputs drive it, handled one at a time in arrival order:
/// - a periodic tick that recomputes the countdown and requests a refetch
///   when the upcoming prayer arrives,
/// - fetch results, tagged with a generation so that only the most recently
///   requested fetch is ever applied.
pub struct ScheduleMonitor {
    query: TimingsQuery,
    language: Language,
    provider: Arc<dyn TimingsProvider>,
    clock: Arc<dyn Clock>,
    loaded: Option<LoadedTable>,
    countdown: CountdownClock,
    generation: u64,
    output: watch::Sender<ScheduleOutput>,
    results_tx: mpsc::Sender<FetchResult>,
}

impl ScheduleMonitor {
    /// Interval between two countdown recomputations.
    pub const TICK_INTERVAL: Duration = Duration::from_secs(60);

    /// Spawns the monitor task and returns its view handle.
    ///
    /// # Arguments
    /// * `query` – Location and calculation settings of the timings lookup.
    /// * `language` – Display language of the prayer labels.
    /// * `provider` – The timings source.
    /// * `clock` – The local wall clock.
    pub fn start(
        query: TimingsQuery,
        language: Language,
        provider: Arc<dyn TimingsProvider>,
        clock: Arc<dyn Clock>,
    ) -> ScheduleView {
        let (output_tx, output_rx) = watch::channel(ScheduleOutput::Loading);
        let (results_tx, results_rx) = mpsc::channel(4);
        let (commands_tx, commands_rx) = mpsc::channel(4);
        let cancel = CancellationToken::new();
        let monitor = Self {
            query,
            language,
            provider,
            clock,
            loaded: None,
            countdown: CountdownClock::new(),
            generation: 0,
            output: output_tx,
            results_tx,
        };
        let handle = tokio::spawn(monitor.run(results_rx, commands_rx, cancel.clone()));
        ScheduleView { output: output_rx, commands: commands_tx, cancel, handle: Some(handle) }
    }

    async fn run(
        mut self,
        mut results_rx: mpsc::Receiver<FetchResult>,
        mut commands_rx: mpsc::Receiver<ScheduleCommand>,
        cancel: CancellationToken,
    ) {
        let mut ticker = interval_at(Instant::now() + Self::TICK_INTERVAL, Self::TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.request_fetch();
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                Some((generation, result)) = results_rx.recv() => {
                    self.apply_fetch(generation, result);
                }
                Some(ScheduleCommand::Refresh) = commands_rx.recv() => self.request_fetch(),
                _ = ticker.tick() => self.on_tick(),
            }
        }
        info!("Schedule monitor stopped");
    }

    /// Spawns a fire-and-forget fetch for a new generation.
    fn request_fetch(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        let provider = Arc::clone(&self.provider);
        let query = self.query;
        let results_tx = self.results_tx.clone();
        event!("Requesting timings, generation {generation}");
        tokio::spawn(async move {
            let result = provider.fetch_timings(&query).await;
            // the receiver is gone once the view was torn down
            let _ = results_tx.send((generation, result)).await;
        });
    }

    fn apply_fetch(&mut self, generation: u64, result: Result<TimingsTable, ProviderError>) {
        if generation != self.generation {
            event!("Discarding timings of superseded generation {generation}");
            return;
        }
        let table = match result {
            Ok(table) => table,
            Err(e) => {
                warn!("Timings unavailable: {e:?}. Keeping the previous schedule.");
                return;
            }
        };
        match Self::parse_table(&table, self.language) {
            Ok(events) => {
                let now = self.clock.now();
                let schedule = select(&events, now);
                if let Some(next) = schedule.next() {
                    prayer!("Next prayer is {} at {}", next.label(), next.time());
                }
                self.countdown.prime(&schedule, now);
                self.loaded = Some(LoadedTable {
                    events,
                    prayers: table.rows().iter().map(|r| r.prayer).collect(),
                    hijri: table.hijri().cloned(),
                    schedule,
                });
                self.publish(now);
            }
            Err(e) => error!("Rejecting timings table: {e:?}. Keeping the previous schedule."),
        }
    }

    /// Parses every row or none: one bad time rejects the whole table.
    fn parse_table(
        table: &TimingsTable,
        language: Language,
    ) -> Result<Vec<(String, TimeOfDay)>, TimeParseError> {
        table
            .rows()
            .iter()
            .map(|row| {
                let time = TimeOfDay::parse_hh_mm(&row.time)?;
                Ok((row.prayer.name_in(language).to_string(), time))
            })
            .collect()
    }

    fn on_tick(&mut self) {
        let now = self.clock.now();
        let Some(countdown) =
            self.countdown.tick(self.loaded.as_ref().map(|l| &l.schedule), now)
        else {
            event!("Tick at {now} without a schedule");
            return;
        };
        event!("Tick at {now}: {} in {}", countdown.view().label(), countdown.view().remaining());
        if let Some(due) = countdown.refresh_due() {
            prayer!("{} has arrived ({}). Refreshing the schedule.", due.label(), due.at());
            if let Some(loaded) = self.loaded.as_mut() {
                loaded.schedule = select(&loaded.events, now);
            }
            self.request_fetch();
        }
        self.publish(now);
    }

    fn publish(&self, now: TimeOfDay) {
        let Some(loaded) = self.loaded.as_ref() else {
            return;
        };
        let rows = loaded
            .schedule
            .entries()
            .iter()
            .zip(&loaded.prayers)
            .map(|(entry, prayer)| ScheduleRow {
                label: entry.label().to_string(),
                arabic_label: prayer.name_ar().to_string(),
                display_time: entry.time().to_12h(),
                is_next: entry.is_next(),
                remaining: entry.is_next().then(|| entry.time() - now),
            })
            .collect();
        let snapshot = ScheduleSnapshot {
            rows,
            next: NextEventView::of(&loaded.schedule, now),
            hijri: loaded.hijri.as_ref().map(HijriDate::formatted),
            hijri_ar: loaded.hijri.as_ref().map(HijriDate::formatted_ar),
        };
        self.output.send_replace(ScheduleOutput::Ready(snapshot));
    }
}
