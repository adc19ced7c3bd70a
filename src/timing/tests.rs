use super::{
    clock::ManualClock,
    countdown::{CountdownClock, remaining},
    hijri::HijriDate,
    next_event::select,
    prayer::{Language, Prayer},
    schedule_view::{ScheduleMonitor, ScheduleOutput},
    time_of_day::{TimeOfDay, TimeParseError},
};
use crate::provider::{ProviderError, TimingsProvider, TimingsQuery, TimingsRow, TimingsTable};
use crate::{info, log};
use async_trait::async_trait;
use rand::Rng;
use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use strum::IntoEnumIterator;
use tokio::sync::watch;

fn t(s: &str) -> TimeOfDay { TimeOfDay::parse_hh_mm(s).unwrap() }

fn table(rows: &[(&str, &str)]) -> Vec<(String, TimeOfDay)> {
    rows.iter().map(|(l, s)| ((*l).to_string(), t(s))).collect()
}

fn next_label(rows: &[(String, TimeOfDay)], now: TimeOfDay) -> String {
    select(rows, now).next().unwrap().label().to_string()
}

#[test]
fn test_time_parsing() {
    assert_eq!(t("05:00").minutes(), 300);
    assert_eq!(t("00:00"), TimeOfDay::MIDNIGHT);
    assert_eq!(t("23:59").minutes(), 1439);
    assert_eq!(t("4:07").minutes(), 247);
    assert_eq!(t("05:00 (WIB)").minutes(), 300);
    assert_eq!(t(" 18:15"), TimeOfDay::from_hm(18, 15).unwrap());

    for bad in ["", "5", "05-00", "ab:cd", "05:0", "05:000", "005:00", "12:30pm"] {
        assert!(
            matches!(TimeOfDay::parse_hh_mm(bad), Err(TimeParseError::Malformed(_))),
            "{bad:?} should be malformed"
        );
    }
    for bad in ["24:00", "12:60", "99:99"] {
        assert!(
            matches!(TimeOfDay::parse_hh_mm(bad), Err(TimeParseError::OutOfRange(_))),
            "{bad:?} should be out of range"
        );
    }
}

#[test]
fn test_parse_errors_name_the_rejected_value() {
    let e = TimeOfDay::parse_hh_mm("24:00 (WIB)").unwrap_err();
    assert_eq!(e, TimeParseError::OutOfRange("24:00 (WIB)".to_string()));
    assert!(format!("{e:?}").contains("24:00 (WIB)"));
    let e = TimeOfDay::parse_hh_mm("noon").unwrap_err();
    assert!(format!("{e:?}").contains("noon"));
}

#[test]
fn test_time_formatting() {
    assert_eq!(t("06:30").to_string(), "06:30");
    assert_eq!(TimeOfDay::from_minutes(301).to_string(), "05:01");
    assert_eq!(t("00:05").to_12h(), "12:05 AM");
    assert_eq!(t("05:07").to_12h(), "5:07 AM");
    assert_eq!(t("12:00").to_12h(), "12:00 PM");
    assert_eq!(t("18:15").to_12h(), "6:15 PM");
    assert_eq!(t("23:59").to_12h(), "11:59 PM");
}

#[test]
fn test_wraparound_arithmetic() {
    assert_eq!(t("00:10") - t("23:50"), t("00:20"));
    assert_eq!(t("12:00") - t("12:00"), TimeOfDay::MIDNIGHT);
    assert_eq!(t("23:50") + t("00:20"), t("00:10"));
    assert_eq!(TimeOfDay::from_minutes(1440 * 3 + 5).minutes(), 5);
    assert_eq!(TimeOfDay::from(chrono::NaiveTime::from_hms_opt(17, 42, 59).unwrap()), t("17:42"));
}

#[test]
fn test_select_scenario_midday() {
    let rows = table(&[("A", "05:00"), ("B", "12:30"), ("C", "18:15")]);
    let now = t("06:00");
    let schedule = select(&rows, now);
    assert_eq!(schedule.len(), 3);
    assert_eq!(schedule.next_index(), Some(1));
    let next = schedule.next().unwrap();
    assert_eq!(next.label(), "B");
    assert_eq!(remaining(next, now).to_string(), "06:30");
}

#[test]
fn test_select_scenario_single_entry_wraps() {
    let rows = table(&[("A", "05:00")]);
    let now = t("23:59");
    let schedule = select(&rows, now);
    let next = schedule.next().unwrap();
    assert_eq!(next.label(), "A");
    assert_eq!(remaining(next, now).to_string(), "05:01");
}

#[test]
fn test_select_wraps_after_last_entry() {
    let rows = table(&[("Fajr", "04:30"), ("Dhuhr", "12:00"), ("Isha", "19:45")]);
    let now = t("19:46");
    let schedule = select(&rows, now);
    assert_eq!(schedule.next().unwrap().label(), "Fajr");
    assert_eq!(remaining(schedule.next().unwrap(), now), t("08:44"));
}

#[test]
fn test_select_does_not_lock_in_first_entry() {
    // first entry already passed, a later entry is still ahead today
    let rows = table(&[("Fajr", "04:30"), ("Dhuhr", "12:00"), ("Asr", "15:30")]);
    assert_eq!(next_label(&rows, t("13:00")), "Asr");
    assert_eq!(next_label(&rows, t("04:29")), "Fajr");
    assert_eq!(next_label(&rows, t("15:31")), "Fajr");
}

#[test]
fn test_select_same_minute_is_not_next() {
    let rows = table(&[("A", "05:00"), ("B", "12:30")]);
    assert_eq!(next_label(&rows, t("12:30")), "A");
    assert_eq!(next_label(&rows, t("05:00")), "B");
    // every delta zero: index 0 stays next
    let single = table(&[("A", "05:00")]);
    assert_eq!(next_label(&single, t("05:00")), "A");
    let dup = table(&[("A", "05:00"), ("B", "05:00")]);
    assert_eq!(next_label(&dup, t("05:00")), "A");
}

#[test]
fn test_select_tie_goes_to_first_declared() {
    let rows = table(&[("A", "03:00"), ("B", "08:00"), ("C", "08:00")]);
    assert_eq!(next_label(&rows, t("07:00")), "B");
}

#[test]
fn test_select_empty_table() {
    let rows: Vec<(String, TimeOfDay)> = Vec::new();
    let schedule = select(&rows, t("10:00"));
    assert!(schedule.is_empty());
    assert!(schedule.next().is_none());
}

#[test]
fn test_exactly_one_next_randomized() {
    info!("Running randomized exactly-one-next check");
    let mut rng = rand::rng();
    for _ in 0..500 {
        let n = rng.random_range(1..=7);
        let rows: Vec<(String, TimeOfDay)> = (0..n)
            .map(|i| (format!("E{i}"), TimeOfDay::from_minutes(rng.random_range(0..1440))))
            .collect();
        let now = TimeOfDay::from_minutes(rng.random_range(0..1440));
        let schedule = select(&rows, now);
        assert_eq!(schedule.entries().iter().filter(|e| e.is_next()).count(), 1);

        // the selected entry is at least as close as every other upcoming entry
        let chosen = remaining(schedule.next().unwrap(), now);
        for entry in schedule.entries() {
            let delta = remaining(entry, now);
            if !delta.is_zero() {
                assert!(chosen <= delta || chosen.is_zero(), "{rows:?} at {now}");
            }
        }
    }
}

#[test]
fn test_countdown_monotonic_and_edge_triggered() {
    let rows = table(&[("A", "05:00"), ("B", "05:10")]);
    let mut now = t("04:55");
    let schedule = select(&rows, now);
    let mut clock = CountdownClock::new();

    let mut last = clock.tick(Some(&schedule), now).unwrap();
    assert_eq!(last.view().remaining().to_string(), "00:05");
    assert!(last.refresh_due().is_none());
    for step in 1..5u16 {
        now = now + TimeOfDay::from_minutes(1);
        let cd = clock.tick(Some(&schedule), now).unwrap();
        assert_eq!(last.view().remaining() - cd.view().remaining(), TimeOfDay::from_minutes(1));
        assert_eq!(cd.view().remaining().minutes(), 5 - step);
        assert!(cd.refresh_due().is_none());
        last = cd;
    }

    // 05:00, the crossing fires exactly once
    now = t("05:00");
    let cd = clock.tick(Some(&schedule), now).unwrap();
    assert!(cd.view().remaining().is_zero());
    let due = cd.refresh_due().unwrap();
    assert_eq!((due.label(), due.at()), ("A", t("05:00")));
    log!("Zero crossing fired for {}", due.label());
    assert!(clock.tick(Some(&schedule), now).unwrap().refresh_due().is_none());

    // a refetch landing in the same minute does not fire again
    let refreshed = select(&rows, now);
    let cd = clock.tick(Some(&refreshed), now).unwrap();
    assert_eq!(cd.view().label(), "B");
    assert!(cd.refresh_due().is_none());

    let cd = clock.tick(Some(&refreshed), t("05:10")).unwrap();
    assert!(cd.refresh_due().is_some());
}

#[test]
fn test_countdown_without_schedule_is_noop() {
    let mut clock = CountdownClock::new();
    assert!(clock.tick(None, t("05:00")).is_none());
    let empty: Vec<(String, TimeOfDay)> = Vec::new();
    assert!(clock.tick(Some(&select(&empty, t("05:00"))), t("05:00")).is_none());
}

#[test]
fn test_countdown_detects_skipped_event_minute() {
    let rows = table(&[("Fajr", "05:00"), ("Dhuhr", "12:00")]);
    let schedule = select(&rows, t("04:58"));
    let mut clock = CountdownClock::new();
    clock.prime(&schedule, t("04:58"));

    // the 05:00 tick never happens
    let cd = clock.tick(Some(&schedule), t("05:01")).unwrap();
    assert_eq!(cd.view().label(), "Fajr");
    assert_eq!(cd.view().remaining(), t("23:59"));
    let due = cd.refresh_due().unwrap();
    assert_eq!((due.label(), due.at()), ("Fajr", t("05:00")));

    // once re-selected the countdown runs on without firing again
    let moved_on = select(&rows, t("05:01"));
    let cd = clock.tick(Some(&moved_on), t("05:01")).unwrap();
    assert_eq!(cd.view().label(), "Dhuhr");
    assert!(cd.refresh_due().is_none());
    assert!(clock.tick(Some(&moved_on), t("05:02")).unwrap().refresh_due().is_none());
}

#[test]
fn test_countdown_single_event_fires_once_per_day() {
    let rows = table(&[("Fajr", "05:00")]);
    let mut clock = CountdownClock::new();
    let schedule = select(&rows, t("04:59"));
    assert!(clock.tick(Some(&schedule), t("04:59")).unwrap().refresh_due().is_none());
    assert!(clock.tick(Some(&schedule), t("05:00")).unwrap().refresh_due().is_some());
    // the all-zero fallback keeps Fajr next; the wrap to 23:59 is not a new crossing
    let refreshed = select(&rows, t("05:00"));
    clock.prime(&refreshed, t("05:00"));
    assert!(clock.tick(Some(&refreshed), t("05:01")).unwrap().refresh_due().is_none());
    assert!(clock.tick(Some(&refreshed), t("05:02")).unwrap().refresh_due().is_none());
}

#[test]
fn test_prayer_catalogue() {
    let order: Vec<String> = Prayer::iter().map(|p| p.to_string()).collect();
    assert_eq!(order, ["Fajr", "Sunrise", "Dhuhr", "Asr", "Maghrib", "Isha"]);
    assert_eq!(Prayer::Fajr.name_in(Language::Indonesian), "Subuh");
    assert_eq!(Prayer::Isha.name_in(Language::English), "Isha");
    assert_eq!("Maghrib".parse::<Prayer>().unwrap(), Prayer::Maghrib);
    assert_eq!("id".parse::<Language>().unwrap(), Language::Indonesian);
}

#[test]
fn test_hijri_date_formatting() {
    let hijri: HijriDate = serde_json::from_str(
        r#"{"date":"14-09-1446","format":"DD-MM-YYYY","day":"14",
            "weekday":{"en":"Al Juma'a","ar":"الجمعة"},
            "month":{"number":9,"en":"Ramaḍān","ar":"رَمَضان"},
            "year":"1446","designation":{"abbreviated":"AH","expanded":"Anno Hegirae"}}"#,
    )
    .unwrap();
    assert_eq!(hijri.formatted(), "14 Ramaḍān 1446 (Al Juma'a)");
    assert_eq!(hijri.formatted_ar(), "14 رَمَضان 1446");
}

/// Serves a configurable table, optionally after a delay, and counts calls.
struct MockTimings {
    responses: Mutex<Vec<(Duration, Result<TimingsTable, ProviderError>)>>,
    fallback: TimingsTable,
    calls: AtomicUsize,
}

impl MockTimings {
    fn new(fallback: TimingsTable) -> Self {
        Self { responses: Mutex::new(Vec::new()), fallback, calls: AtomicUsize::new(0) }
    }

    fn queue(self, delay: Duration, result: Result<TimingsTable, ProviderError>) -> Self {
        self.responses.lock().unwrap().push((delay, result));
        self
    }

    fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

#[async_trait]
impl TimingsProvider for MockTimings {
    async fn fetch_timings(&self, _query: &TimingsQuery) -> Result<TimingsTable, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() { None } else { Some(responses.remove(0)) }
        };
        match next {
            Some((delay, result)) => {
                tokio::time::sleep(delay).await;
                result
            }
            None => Ok(self.fallback.clone()),
        }
    }
}

fn timings(rows: &[(Prayer, &str)]) -> TimingsTable {
    TimingsTable::new(
        rows.iter().map(|(p, s)| TimingsRow { prayer: *p, time: (*s).to_string() }).collect(),
        None,
    )
}

fn query() -> TimingsQuery { TimingsQuery { latitude: 21.42, longitude: 39.83, method: 4, madhhab: 0 } }

async fn wait_ready(rx: &mut watch::Receiver<ScheduleOutput>) -> super::schedule_view::ScheduleSnapshot {
    let out = rx.wait_for(|o| matches!(o, ScheduleOutput::Ready(_))).await.unwrap().clone();
    match out {
        ScheduleOutput::Ready(snapshot) => snapshot,
        ScheduleOutput::Loading => unreachable!(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_monitor_publishes_schedule() {
    let table = timings(&[(Prayer::Fajr, "05:00"), (Prayer::Dhuhr, "12:30"), (Prayer::Maghrib, "18:15")]);
    let provider = Arc::new(MockTimings::new(table));
    let clock = Arc::new(ManualClock::new(t("06:00")));
    let view = ScheduleMonitor::start(query(), Language::English, provider.clone(), clock.clone());
    let mut rx = view.subscribe();

    let snapshot = wait_ready(&mut rx).await;
    let labels: Vec<&str> = snapshot.rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["Fajr", "Dhuhr", "Maghrib"]);
    assert_eq!(snapshot.rows[1].display_time, "12:30 PM");
    assert_eq!(snapshot.rows[1].arabic_label, "الظهر");
    assert!(snapshot.rows[1].is_next);
    assert_eq!(snapshot.rows[1].remaining, Some(t("06:30")));
    assert_eq!(snapshot.rows[0].remaining, None);
    assert_eq!(snapshot.next.as_ref().unwrap().label(), "Dhuhr");
    assert_eq!(provider.calls(), 1);
    view.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_monitor_refreshes_on_zero_crossing() {
    let table = timings(&[(Prayer::Fajr, "05:00"), (Prayer::Dhuhr, "05:02")]);
    let provider = Arc::new(MockTimings::new(table));
    let clock = Arc::new(ManualClock::new(t("04:59")));
    let view = ScheduleMonitor::start(query(), Language::English, provider.clone(), clock.clone());
    let mut rx = view.subscribe();
    assert_eq!(wait_ready(&mut rx).await.next.unwrap().label(), "Fajr");

    clock.set(t("05:00"));
    tokio::time::sleep(ScheduleMonitor::TICK_INTERVAL).await;
    let moved_on = rx
        .wait_for(|o| match o {
            ScheduleOutput::Ready(s) => s.next.as_ref().is_some_and(|n| n.label() == "Dhuhr"),
            ScheduleOutput::Loading => false,
        })
        .await;
    assert!(moved_on.is_ok());
    drop(moved_on);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(provider.calls(), 2);

    // staying on the same minute does not trigger another fetch
    tokio::time::sleep(ScheduleMonitor::TICK_INTERVAL).await;
    assert_eq!(provider.calls(), 2);
    view.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_monitor_moves_on_when_event_minute_is_skipped() {
    let table = timings(&[(Prayer::Fajr, "05:00"), (Prayer::Dhuhr, "12:00")]);
    let provider = Arc::new(MockTimings::new(table));
    let clock = Arc::new(ManualClock::new(t("04:58")));
    let view = ScheduleMonitor::start(query(), Language::English, provider.clone(), clock.clone());
    let mut rx = view.subscribe();
    assert_eq!(wait_ready(&mut rx).await.next.unwrap().label(), "Fajr");

    clock.set(t("05:01"));
    tokio::time::sleep(ScheduleMonitor::TICK_INTERVAL).await;
    let out = rx
        .wait_for(|o| match o {
            ScheduleOutput::Ready(s) => s.next.as_ref().is_some_and(|n| n.label() == "Dhuhr"),
            ScheduleOutput::Loading => false,
        })
        .await
        .unwrap()
        .clone();
    let ScheduleOutput::Ready(snapshot) = out else { unreachable!() };
    assert_eq!(snapshot.next.unwrap().remaining(), t("06:59"));
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(provider.calls(), 2);
    view.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_monitor_rejects_bad_table_and_keeps_previous() {
    let good = timings(&[(Prayer::Fajr, "05:00"), (Prayer::Dhuhr, "12:30")]);
    let bad = timings(&[(Prayer::Fajr, "05:00"), (Prayer::Dhuhr, "noon")]);
    let provider = Arc::new(MockTimings::new(good.clone()).queue(Duration::ZERO, Ok(good)).queue(Duration::ZERO, Ok(bad)));
    let clock = Arc::new(ManualClock::new(t("06:00")));
    let view = ScheduleMonitor::start(query(), Language::English, provider.clone(), clock.clone());
    let mut rx = view.subscribe();
    let before = wait_ready(&mut rx).await;

    view.refresh().await;
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(provider.calls(), 2);
    match view.current() {
        ScheduleOutput::Ready(after) => assert_eq!(after, before),
        ScheduleOutput::Loading => panic!("previous schedule was dropped"),
    }
    view.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_monitor_stays_loading_without_data() {
    let provider = Arc::new(
        MockTimings::new(timings(&[]))
            .queue(Duration::ZERO, Err(ProviderError::MissingEvent(Prayer::Fajr))),
    );
    let clock = Arc::new(ManualClock::new(t("06:00")));
    let view = ScheduleMonitor::start(query(), Language::English, provider.clone(), clock);
    tokio::time::sleep(ScheduleMonitor::TICK_INTERVAL * 2).await;
    assert_eq!(provider.calls(), 1);
    assert_eq!(view.current(), ScheduleOutput::Loading);
    view.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_monitor_discards_superseded_fetch() {
    let slow = timings(&[(Prayer::Fajr, "01:00")]);
    let fast = timings(&[(Prayer::Fajr, "02:00")]);
    let provider = Arc::new(
        MockTimings::new(fast.clone())
            .queue(Duration::from_secs(300), Ok(slow))
            .queue(Duration::ZERO, Ok(fast)),
    );
    let clock = Arc::new(ManualClock::new(t("00:30")));
    let view = ScheduleMonitor::start(query(), Language::English, provider.clone(), clock);
    let mut rx = view.subscribe();
    view.refresh().await;

    let snapshot = wait_ready(&mut rx).await;
    assert_eq!(snapshot.rows[0].display_time, "2:00 AM");
    tokio::time::sleep(Duration::from_secs(600)).await;
    match view.current() {
        ScheduleOutput::Ready(s) => assert_eq!(s.rows[0].display_time, "2:00 AM"),
        ScheduleOutput::Loading => panic!("schedule vanished"),
    }
    view.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_monitor_teardown_drops_late_results() {
    let provider = Arc::new(
        MockTimings::new(timings(&[(Prayer::Fajr, "05:00")]))
            .queue(Duration::from_secs(30), Ok(timings(&[(Prayer::Fajr, "05:00")]))),
    );
    let clock = Arc::new(ManualClock::new(t("06:00")));
    let view = ScheduleMonitor::start(query(), Language::English, provider.clone(), clock);
    let mut rx = view.subscribe();
    tokio::time::sleep(Duration::from_secs(1)).await;
    view.shutdown().await;

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(*rx.borrow_and_update(), ScheduleOutput::Loading);
    assert!(rx.changed().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_monitor_uses_language() {
    let provider = Arc::new(MockTimings::new(timings(&[(Prayer::Fajr, "05:00"), (Prayer::Isha, "19:30")])));
    let clock = Arc::new(ManualClock::new(t("20:00")));
    let view = ScheduleMonitor::start(query(), Language::Indonesian, provider, clock.clone());
    let mut rx = view.subscribe();
    let snapshot = wait_ready(&mut rx).await;
    assert_eq!(snapshot.rows[0].label, "Subuh");
    assert_eq!(snapshot.rows[1].label, "Isya");
    assert_eq!(snapshot.next.unwrap().remaining(), t("09:00"));

    clock.advance(1);
    tokio::time::sleep(ScheduleMonitor::TICK_INTERVAL).await;
    let snapshot = rx
        .wait_for(|o| match o {
            ScheduleOutput::Ready(s) => s.rows[0].remaining == Some(t("08:59")),
            ScheduleOutput::Loading => false,
        })
        .await;
    assert!(snapshot.is_ok());
    drop(snapshot);
    view.shutdown().await;
}
