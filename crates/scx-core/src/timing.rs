//! Opt-in phase timing.
//!
//! Samples are kept in a process-wide buffer so phases run on scoped worker
//! threads land in the same report as the calling thread's phases.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde_json::json;

/// Environment variable that enables timing collection.
pub const TIMING_ENV: &str = "SCX_TIMING";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingReport {
    pub phases: Vec<PhaseTiming>,
}

/// Aggregate for one named phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTiming {
    pub name: String,
    pub count: usize,
    pub total: Duration,
    pub p50: Duration,
    pub max: Duration,
}

#[derive(Debug)]
struct Sample {
    name: &'static str,
    elapsed: Duration,
}

static SAMPLES: Mutex<Vec<Sample>> = Mutex::new(Vec::new());
static TIMING_ENABLED: AtomicBool = AtomicBool::new(false);

/// Returns true when `SCX_TIMING` is set to `1`, `true`, `yes` or `on`.
#[must_use]
pub fn timing_enabled_from_env() -> bool {
    std::env::var(TIMING_ENV)
        .ok()
        .is_some_and(|value| is_truthy(value.trim()))
}

pub fn set_timing_enabled(enabled: bool) {
    TIMING_ENABLED.store(enabled, Ordering::Relaxed);
    if !enabled {
        clear_timings();
    }
}

#[must_use]
pub fn is_timing_enabled() -> bool {
    TIMING_ENABLED.load(Ordering::Relaxed)
}

pub fn clear_timings() {
    with_samples(Vec::clear);
}

/// Run `f`, recording its wall time under `name` when timing is enabled.
pub fn timed<R>(name: &'static str, f: impl FnOnce() -> R) -> R {
    if !is_timing_enabled() {
        return f();
    }

    let started = Instant::now();
    let result = f();
    record_sample(name, started.elapsed());
    result
}

/// Drain recorded samples into a report grouped by phase name.
#[must_use]
pub fn collect_report() -> TimingReport {
    let samples = with_samples(std::mem::take);

    let mut grouped: BTreeMap<&'static str, Vec<Duration>> = BTreeMap::new();
    for sample in samples {
        grouped.entry(sample.name).or_default().push(sample.elapsed);
    }

    let phases = grouped
        .into_iter()
        .map(|(name, mut values)| {
            values.sort_unstable();
            PhaseTiming {
                name: name.to_string(),
                count: values.len(),
                total: values.iter().sum(),
                p50: values[(values.len() - 1) / 2],
                max: values[values.len() - 1],
            }
        })
        .collect();

    TimingReport { phases }
}

impl TimingReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let phases = self
            .phases
            .iter()
            .map(|phase| {
                json!({
                    "name": phase.name,
                    "count": phase.count,
                    "total_us": phase.total.as_micros(),
                    "p50_us": phase.p50.as_micros(),
                    "max_us": phase.max.as_micros(),
                })
            })
            .collect::<Vec<_>>();

        json!({ "phases": phases })
    }

    /// Render as a fixed-width table for stderr.
    #[must_use]
    pub fn display_table(&self) -> String {
        use std::fmt::Write as _;

        if self.phases.is_empty() {
            return "No timing samples recorded.".to_string();
        }

        let mut out = String::new();
        out.push_str("phase                 count      total        p50        max\n");
        out.push_str("-----------------------------------------------------------\n");
        for phase in &self.phases {
            let _ = writeln!(
                out,
                "{:<20} {:>6} {:>10} {:>10} {:>10}",
                phase.name,
                phase.count,
                format_duration(phase.total),
                format_duration(phase.p50),
                format_duration(phase.max),
            );
        }
        out
    }
}

fn with_samples<R>(f: impl FnOnce(&mut Vec<Sample>) -> R) -> R {
    // A poisoned buffer only means a timed closure panicked; the samples are still usable.
    let mut guard = SAMPLES
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    f(&mut guard)
}

fn record_sample(name: &'static str, elapsed: Duration) {
    with_samples(|samples| samples.push(Sample { name, elapsed }));
}

fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();

    if micros >= 1_000_000 {
        format!("{}.{:03}s", micros / 1_000_000, (micros % 1_000_000) / 1_000)
    } else if micros >= 1_000 {
        format!("{}.{:03}ms", micros / 1_000, micros % 1_000)
    } else {
        format!("{micros}µs")
    }
}

fn is_truthy(value: &str) -> bool {
    ["1", "true", "yes", "on"]
        .iter()
        .any(|truthy| value.eq_ignore_ascii_case(truthy))
}

#[cfg(test)]
mod tests {
    use super::*;

    static TEST_GUARD: Mutex<()> = Mutex::new(());

    fn guard() -> std::sync::MutexGuard<'static, ()> {
        TEST_GUARD.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    #[test]
    fn timed_is_transparent_when_disabled() {
        let _guard = guard();
        set_timing_enabled(false);

        assert_eq!(timed("disabled", || 7_u8), 7);
        assert!(collect_report().is_empty());
    }

    #[test]
    fn samples_from_scoped_threads_are_collected() {
        let _guard = guard();
        set_timing_enabled(true);
        clear_timings();

        std::thread::scope(|scope| {
            scope.spawn(|| timed("worker", || std::thread::sleep(Duration::from_millis(1))));
            timed("caller", || std::thread::sleep(Duration::from_millis(1)));
        });

        let report = collect_report();
        let names: Vec<_> = report.phases.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["caller", "worker"]);
        assert!(report.phases.iter().all(|p| p.total > Duration::ZERO));

        set_timing_enabled(false);
    }

    #[test]
    fn report_groups_by_phase() {
        let _guard = guard();
        clear_timings();

        record_sample("search.fuse", Duration::from_micros(3_000));
        record_sample("search.fuse", Duration::from_micros(1_000));
        record_sample("search.fuse", Duration::from_micros(2_000));
        record_sample("search.fetch", Duration::from_micros(5_000));

        let report = collect_report();
        assert_eq!(report.phases.len(), 2);

        let fuse = &report.phases[1];
        assert_eq!(fuse.name, "search.fuse");
        assert_eq!(fuse.count, 3);
        assert_eq!(fuse.total, Duration::from_micros(6_000));
        assert_eq!(fuse.p50, Duration::from_micros(2_000));
        assert_eq!(fuse.max, Duration::from_micros(3_000));

        let json = report.to_json();
        assert_eq!(json["phases"][0]["name"], "search.fetch");
        assert_eq!(json["phases"][1]["count"], 3);
        assert!(report.display_table().contains("search.fuse"));
    }

    #[test]
    fn truthy_parser_is_case_insensitive() {
        assert!(is_truthy("TrUe"));
        assert!(is_truthy("1"));
        assert!(is_truthy("ON"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
    }

    #[test]
    fn durations_pick_a_readable_unit() {
        assert_eq!(format_duration(Duration::from_micros(12)), "12µs");
        assert_eq!(format_duration(Duration::from_micros(1_500)), "1.500ms");
        assert_eq!(format_duration(Duration::from_millis(2_250)), "2.250s");
    }
}
