//! Summaries over a session of timed solves

use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub const PLUS_TWO_PENALTY_MS: u64 = 2000;

/// A finished, timed attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedResult {
    pub time_ms: u64,
    #[serde(default)]
    pub plus_two: bool,
    #[serde(default)]
    pub dnf: bool,
}

impl TimedResult {
    /// The time including penalties, or `None` for a DNF
    #[must_use]
    pub fn effective_ms(&self) -> Option<u64> {
        if self.dnf {
            return None;
        }

        Some(if self.plus_two {
            self.time_ms + PLUS_TWO_PENALTY_MS
        } else {
            self.time_ms
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub best: Option<u64>,
    pub worst: Option<u64>,
    pub mean: Option<f64>,
    pub ao5: Option<f64>,
    pub ao12: Option<f64>,
    pub best_ao5: Option<f64>,
    pub best_ao12: Option<f64>,
    /// Every attempt, DNFs included
    pub solve_count: usize,
}

/// Average of `times` after dropping the single best and single worst
fn trimmed_mean(times: &[u64]) -> f64 {
    let sorted = times.iter().sorted_unstable().collect_vec();
    let kept = &sorted[1..sorted.len() - 1];

    kept.iter().copied().sum::<u64>() as f64 / kept.len() as f64
}

/// The average of the `n` most recent times
fn average_of(times: &[u64], n: usize) -> Option<f64> {
    times.get(..n).map(trimmed_mean)
}

fn best_average_of(times: &[u64], n: usize) -> Option<f64> {
    times.windows(n).map(trimmed_mean).min_by(f64::total_cmp)
}

/// Summarize a session's results, given most recent first.
///
/// DNFs count towards `solve_count` but are left out of every time based statistic.
#[must_use]
pub fn session_stats(results: &[TimedResult]) -> SessionStats {
    let times = results
        .iter()
        .filter_map(TimedResult::effective_ms)
        .collect_vec();

    if times.is_empty() {
        return SessionStats {
            solve_count: results.len(),
            ..SessionStats::default()
        };
    }

    SessionStats {
        best: times.iter().copied().min(),
        worst: times.iter().copied().max(),
        mean: Some(times.iter().sum::<u64>() as f64 / times.len() as f64),
        ao5: average_of(&times, 5),
        ao12: average_of(&times, 12),
        best_ao5: best_average_of(&times, 5),
        best_ao12: best_average_of(&times, 12),
        solve_count: results.len(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{SessionStats, TimedResult, session_stats};

    fn ok(time_ms: u64) -> TimedResult {
        TimedResult {
            time_ms,
            plus_two: false,
            dnf: false,
        }
    }

    #[test]
    fn empty_session() {
        assert_eq!(session_stats(&[]), SessionStats::default());
    }

    #[test]
    fn only_dnfs() {
        let dnf = TimedResult {
            dnf: true,
            ..ok(9000)
        };

        let stats = session_stats(&[dnf, dnf]);

        assert_eq!(stats.solve_count, 2);
        assert_eq!(stats.best, None);
        assert_eq!(stats.mean, None);
    }

    #[test]
    fn penalties() {
        let results = [
            TimedResult {
                plus_two: true,
                ..ok(10_000)
            },
            TimedResult {
                dnf: true,
                ..ok(1000)
            },
            ok(11_000),
        ];

        let stats = session_stats(&results);

        assert_eq!(stats.best, Some(11_000));
        assert_eq!(stats.worst, Some(12_000));
        assert_eq!(stats.mean, Some(11_500.0));
        assert_eq!(stats.ao5, None);
        assert_eq!(stats.solve_count, 3);
    }

    #[test]
    fn averages_drop_the_extremes() {
        let results = [20_000, 9000, 10_000, 11_000, 1000, 12_000, 30_000].map(ok);

        let stats = session_stats(&results);

        // Latest five are 20, 9, 10, 11 and 1 seconds
        assert_eq!(stats.ao5, Some(10_000.0));
        // Windows average 10, 10 and 11 seconds
        assert_eq!(stats.best_ao5, Some(10_000.0));
        assert_eq!(stats.ao12, None);
        assert_eq!(stats.best_ao12, None);
        assert_eq!(stats.best, Some(1000));
        assert_eq!(stats.worst, Some(30_000));
    }

    #[test]
    fn best_average_over_all_windows() {
        let results = [
            30_000, 30_000, 30_000, 30_000, 30_000, 5000, 5000, 5000, 5000, 5000, 5000, 5000,
            5000,
        ]
        .map(ok);

        let stats = session_stats(&results);

        assert_eq!(stats.ao5, Some(30_000.0));
        assert_eq!(stats.best_ao5, Some(5000.0));
        assert_eq!(stats.ao12, Some(15_000.0));
        assert_eq!(stats.best_ao12, Some(12_500.0));
    }
}
