use tracewin::domain::Timestamp;
use tracewin::engine::{
    Consumer, ConsumerSet, Dispatcher, RefreshPeriod, RunSummary, TimeFilter, Timestamped, Window, WindowHooks,
};

const SEC: u64 = 1_000_000_000;

struct Ev(u64);

impl Timestamped for Ev {
    fn timestamp(&self) -> Timestamp {
        Timestamp(self.0)
    }
}

/// Every forwarded timestamp, never reset
#[derive(Default)]
struct Seen(Vec<u64>);

impl Consumer<Ev> for Seen {
    fn ingest(&mut self, event: &Ev) {
        self.0.push(event.0);
    }
}

impl ConsumerSet<Ev> for Seen {
    fn ingest_all(&mut self, event: &Ev) {
        self.ingest(event);
    }
}

#[derive(Default)]
struct Hooks {
    begins: Vec<Timestamp>,
    /// Flushed windows with the number of events forwarded before each
    windows: Vec<(Window, usize)>,
    break_calls: u32,
    keep_going: bool,
}

impl WindowHooks<Seen> for Hooks {
    fn on_begin(&mut self, _seen: &mut Seen, timestamp: Timestamp) {
        self.begins.push(timestamp);
    }

    fn on_refresh(&mut self, seen: &mut Seen, window: Window) {
        self.windows.push((window, seen.0.len()));
    }

    fn should_break(&mut self, _seen: &Seen) -> bool {
        self.break_calls += 1;
        !self.keep_going
    }
}

fn run(timestamps: &[u64], filter: TimeFilter, refresh: u32, hooks: &mut Hooks) -> (Seen, RunSummary) {
    let mut seen = Seen::default();
    let events = timestamps.iter().map(|&ts| Ev(ts));
    let summary = Dispatcher::new(filter, RefreshPeriod(refresh)).run(events, &mut seen, hooks);
    (seen, summary)
}

/// Sorted pseudo-random timestamps over roughly `span_secs` seconds
fn stream(seed: u64, len: usize, span_secs: u64) -> Vec<u64> {
    let mut state = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
    let mut out: Vec<u64> = (0..len)
        .map(|_| {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            (state >> 11) % (span_secs * SEC)
        })
        .collect();
    out.sort_unstable();
    out
}

#[test]
fn test_forwarded_count_matches_range() {
    for seed in 0..40u64 {
        let events = stream(seed, 200, 20);
        let begin = (seed % 3 != 0).then(|| Timestamp((seed % 7) * SEC));
        let end = (seed % 4 != 0).then(|| Timestamp((8 + seed % 9) * SEC));
        let filter = TimeFilter::new(begin, end);

        let mut hooks = Hooks::default();
        let (seen, summary) = run(&events, filter, (seed % 4) as u32, &mut hooks);

        let expected = events.iter().filter(|&&ts| filter.contains(Timestamp(ts))).count();
        assert_eq!(seen.0.len(), expected, "seed {seed}");
        assert_eq!(summary.events_forwarded, expected as u64);
    }
}

#[test]
fn test_flush_end_is_triggering_event() {
    for seed in 0..20u64 {
        let events = stream(seed, 300, 30);
        let mut hooks = Hooks::default();
        let (seen, _) = run(&events, TimeFilter::unbounded(), 1 + (seed % 3) as u32, &mut hooks);

        let mut previous_start = Timestamp(0);
        for (window, forwarded_before) in &hooks.windows {
            assert!(window.start >= previous_start);
            previous_start = window.start;
            // The trigger is the next event delivered after the flush
            assert_eq!(seen.0[*forwarded_before], window.end.as_nanos());
            assert!(window.last_event.is_some_and(|last| last <= window.end));
        }
    }
}

#[test]
fn test_zero_refresh_never_flushes() {
    let mut hooks = Hooks::default();
    let (_, summary) = run(&stream(7, 500, 60), TimeFilter::unbounded(), 0, &mut hooks);
    assert!(hooks.windows.is_empty());
    assert_eq!(summary.windows_flushed, 0);
    assert!(summary.final_window().is_some());
}

#[test]
fn test_dense_stream_two_second_period() {
    let events: Vec<u64> = (0..100).map(|i| i * SEC / 10).collect();
    let mut hooks = Hooks::default();
    run(&events, TimeFilter::unbounded(), 2, &mut hooks);

    let ends: Vec<u64> = hooks.windows.iter().map(|(w, _)| w.end.as_nanos()).collect();
    assert_eq!(ends, vec![2 * SEC, 4 * SEC, 6 * SEC, 8 * SEC]);
}

#[test]
fn test_gap_fires_single_flush() {
    let mut events: Vec<u64> = (0..10).map(|i| i * SEC / 10).collect();
    events.extend((0..10).map(|i| 100 * SEC + i * SEC / 10));

    let mut hooks = Hooks::default();
    run(&events, TimeFilter::unbounded(), 5, &mut hooks);

    assert_eq!(hooks.windows.len(), 1);
    let (window, _) = hooks.windows[0];
    assert_eq!(window.start, Timestamp(0));
    assert_eq!(window.end, Timestamp(100 * SEC));
}

#[test]
fn test_begin_bound() {
    let events = [SEC, 2 * SEC, 3 * SEC + 5, 3 * SEC + 9, 4 * SEC];
    let mut hooks = Hooks::default();
    let (seen, summary) =
        run(&events, TimeFilter::new(Some(Timestamp(3 * SEC)), None), 0, &mut hooks);

    assert_eq!(seen.0, vec![3 * SEC + 5, 3 * SEC + 9, 4 * SEC]);
    assert_eq!(hooks.begins, vec![Timestamp(3 * SEC + 5)]);
    assert_eq!(summary.trace_start, Some(Timestamp(3 * SEC + 5)));
}

#[test]
fn test_begin_past_trace() {
    let mut hooks = Hooks::default();
    let (seen, summary) =
        run(&[1, 2, 3], TimeFilter::new(Some(Timestamp(10)), None), 1, &mut hooks);

    assert!(seen.0.is_empty());
    assert!(hooks.begins.is_empty());
    assert_eq!(summary.trace_start, None);
    assert_eq!(summary.trace_end, None);
    assert_eq!(summary.final_window(), None);
}

#[test]
fn test_end_bound_stops() {
    let mut hooks = Hooks::default();
    let (seen, summary) =
        run(&[1, 5, 10, 11, 12], TimeFilter::new(None, Some(Timestamp(10))), 0, &mut hooks);

    assert_eq!(seen.0, vec![1, 5, 10]);
    assert_eq!(summary.trace_end, Some(Timestamp(10)));
    assert!(summary.stopped_early);
    assert_eq!(summary.events_read, 4);
    assert_eq!(hooks.break_calls, 1);
}

#[test]
fn test_break_predicate_can_continue() {
    let mut hooks = Hooks { keep_going: true, ..Hooks::default() };
    let (seen, summary) =
        run(&[1, 5, 10, 11, 12], TimeFilter::new(None, Some(Timestamp(10))), 0, &mut hooks);

    assert_eq!(seen.0, vec![1, 5, 10, 11, 12]);
    assert_eq!(hooks.break_calls, 2);
    assert!(!summary.stopped_early);
    assert_eq!(summary.trace_end, Some(Timestamp(12)));
}

#[test]
fn test_boundary_event_opens_new_window() {
    let mut hooks = Hooks::default();
    let (seen, summary) = run(&[1, 2, 2_000_000_001], TimeFilter::unbounded(), 1, &mut hooks);

    assert_eq!(hooks.windows.len(), 1);
    let (window, forwarded_before) = hooks.windows[0];
    assert_eq!(window.start, Timestamp(1));
    assert_eq!(window.last_event, Some(Timestamp(2)));
    assert_eq!(window.end, Timestamp(2_000_000_001));
    assert_eq!(forwarded_before, 2);
    assert_eq!(seen.0.len(), 3);

    let last = summary.final_window().unwrap();
    assert_eq!(last.start, Timestamp(2_000_000_001));
    assert_eq!(last.end, Timestamp(2_000_000_001));
}

#[test]
fn test_empty_stream() {
    let mut hooks = Hooks::default();
    let (seen, summary) = run(&[], TimeFilter::new(Some(Timestamp(5)), Some(Timestamp(9))), 1, &mut hooks);

    assert!(seen.0.is_empty());
    assert!(hooks.begins.is_empty() && hooks.windows.is_empty());
    assert_eq!(hooks.break_calls, 0);
    assert_eq!(summary.events_read, 0);
    assert_eq!(summary.final_window(), None);
}

#[test]
fn test_dispatcher_is_reusable() {
    let dispatcher = Dispatcher::new(TimeFilter::unbounded(), RefreshPeriod(1));
    for _ in 0..2 {
        let mut seen = Seen::default();
        let mut hooks = Hooks::default();
        let summary = dispatcher.run([0, SEC, 2 * SEC].map(Ev), &mut seen, &mut hooks);
        assert_eq!(summary.windows_flushed, 2);
        assert_eq!(seen.0.len(), 3);
    }
}
