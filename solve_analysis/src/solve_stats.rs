//! Timing breakdown of a solve that has already been split into phases

use itertools::Itertools;
use serde::Serialize;

use crate::cfop::CfopAnalysis;

/// Gaps between moves longer than this count as pauses
pub const PAUSE_THRESHOLD_MS: u64 = 500;
/// How much of a pause is still attributed to executing the phase
pub const EXECUTION_THRESHOLD_MS: u64 = 300;
pub const TPS_WINDOW_MS: u64 = 1000;
pub const TPS_SAMPLE_INTERVAL_MS: u64 = 100;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseStats {
    pub name: String,
    pub move_count: usize,
    /// Time between the phase's first and last move
    pub duration_ms: u64,
    pub tps: f64,
    /// Time between the previous phase's last move and this phase's first
    pub recognition_ms: u64,
    pub execution_ms: u64,
    pub start_ms: u64,
    pub end_ms: u64,
}

impl PhaseStats {
    fn empty(name: String, move_count: usize) -> PhaseStats {
        PhaseStats {
            name,
            move_count,
            duration_ms: 0,
            tps: 0.0,
            recognition_ms: 0,
            execution_ms: 0,
            start_ms: 0,
            end_ms: 0,
        }
    }

    fn total_ms(&self) -> u64 {
        self.duration_ms + self.recognition_ms
    }
}

/// Percentages of the solve spent in each stage
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Splits {
    pub cross: f64,
    pub f2l: f64,
    pub oll: f64,
    pub pll: f64,
}

impl Splits {
    /// The commonly quoted target for a balanced CFOP solve
    pub const IDEAL: Splits = Splits {
        cross: 12.0,
        f2l: 50.0,
        oll: 13.0,
        pll: 25.0,
    };
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TpsSample {
    pub time_ms: u64,
    pub tps: f64,
    pub phase: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveStats {
    pub total_ms: u64,
    pub total_moves: usize,
    pub tps: f64,
    pub phases: Vec<PhaseStats>,
    pub tps_over_time: Vec<TpsSample>,
    pub pause_ms: u64,
    pub execution_ms: u64,
    pub splits: Splits,
    pub ideal_splits: Splits,
}

fn turns_per_second(moves: usize, duration_ms: u64) -> f64 {
    if duration_ms == 0 {
        return 0.0;
    }

    moves as f64 / (duration_ms as f64 / 1000.0)
}

fn gaps(timings: &[u64]) -> impl Iterator<Item = u64> {
    timings
        .iter()
        .tuple_windows()
        .map(|(before, after)| after.saturating_sub(*before))
}

/// `first` is the index of the phase's first move in the whole solve
fn phase_stats(name: String, move_count: usize, timings: &[u64], first: usize) -> PhaseStats {
    let end = (first + move_count).min(timings.len());

    let Some(phase_timings) = timings.get(first..end).filter(|slice| !slice.is_empty()) else {
        return PhaseStats::empty(name, move_count);
    };

    let start_ms = phase_timings[0];
    let end_ms = phase_timings[phase_timings.len() - 1];
    let duration_ms = end_ms.saturating_sub(start_ms);

    let previous_ms = first.checked_sub(1).map_or(0, |i| timings[i]);

    let paused_ms: u64 = gaps(phase_timings)
        .filter(|&gap| gap > PAUSE_THRESHOLD_MS)
        .map(|gap| gap - EXECUTION_THRESHOLD_MS)
        .sum();

    PhaseStats {
        name,
        move_count,
        duration_ms,
        tps: turns_per_second(move_count, duration_ms),
        recognition_ms: start_ms.saturating_sub(previous_ms),
        execution_ms: duration_ms.saturating_sub(paused_ms),
        start_ms,
        end_ms,
    }
}

fn tps_over_time(timings: &[u64], move_phases: &[&str]) -> Vec<TpsSample> {
    if timings.len() < 2 {
        return Vec::new();
    }

    let last = timings[timings.len() - 1];
    let half_window = TPS_WINDOW_MS / 2;

    (0..=last)
        .step_by(TPS_SAMPLE_INTERVAL_MS as usize)
        .map(|time_ms| {
            let window = time_ms.saturating_sub(half_window)..=time_ms + half_window;
            let in_window = timings.iter().filter(|&&time| window.contains(&time)).count();

            let latest_move = timings
                .partition_point(|&time| time <= time_ms)
                .saturating_sub(1);

            let phase = move_phases
                .get(latest_move)
                .or(move_phases.last())
                .map_or_else(String::new, |name| (*name).to_owned());

            TpsSample {
                time_ms,
                tps: in_window as f64 / (TPS_WINDOW_MS as f64 / 1000.0),
                phase,
            }
        })
        .collect()
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }

    part as f64 / total as f64 * 100.0
}

/// Work out per phase timings from the time of every move, in milliseconds since the solve started.
///
/// `timings[i]` is when the `i`th move of the analysed solution was performed. Returns `None` if there are no timings.
#[must_use]
pub fn solve_stats(analysis: &CfopAnalysis, timings: &[u64], total_ms: u64) -> Option<SolveStats> {
    if timings.is_empty() {
        return None;
    }

    let mut first = 0;
    let phases = analysis
        .phases()
        .map(|phase| {
            let stats = phase_stats(phase.name.clone(), phase.moves.len(), timings, first);
            first += phase.moves.len();
            stats
        })
        .collect_vec();

    let move_phases = analysis
        .phases()
        .flat_map(|phase| phase.moves.iter().map(|_| phase.name.as_str()))
        .collect_vec();

    let cross_ms = phases[0].total_ms();
    let f2l_ms: u64 = phases[1..5].iter().map(PhaseStats::total_ms).sum();
    let oll_ms = phases[5].total_ms();
    let pll_ms = phases[6].total_ms();
    let phases_ms = cross_ms + f2l_ms + oll_ms + pll_ms;

    let pause_ms: u64 = gaps(timings).filter(|&gap| gap > PAUSE_THRESHOLD_MS).sum();

    let total_moves = analysis.total_moves();

    Some(SolveStats {
        total_ms,
        total_moves,
        tps: turns_per_second(total_moves, total_ms),
        tps_over_time: tps_over_time(timings, &move_phases),
        phases,
        pause_ms,
        execution_ms: total_ms.saturating_sub(pause_ms),
        splits: Splits {
            cross: percent(cross_ms, phases_ms),
            f2l: percent(f2l_ms, phases_ms),
            oll: percent(oll_ms, phases_ms),
            pll: percent(pll_ms, phases_ms),
        },
        ideal_splits: Splits::IDEAL,
    })
}

#[cfg(test)]
mod tests {
    use cube_core::{CubeFaces, parse_scramble};

    use super::{Splits, phase_stats, solve_stats, tps_over_time};
    use crate::cfop::analyze_solve;

    #[test]
    fn phase_timings() {
        let timings = [100, 400, 500, 700, 1500, 1600];

        let stats = phase_stats("F2L 1".to_owned(), 3, &timings, 2);

        assert_eq!(stats.start_ms, 500);
        assert_eq!(stats.end_ms, 1500);
        assert_eq!(stats.duration_ms, 1000);
        assert_eq!(stats.recognition_ms, 100);
        // The 800ms gap is a pause, of which 300ms still counts
        assert_eq!(stats.execution_ms, 500);
        assert!((stats.tps - 3.0).abs() < 1e-9);
    }

    #[test]
    fn first_phase_recognizes_from_zero() {
        let stats = phase_stats("Cross".to_owned(), 2, &[250, 300], 0);

        assert_eq!(stats.recognition_ms, 250);
        assert_eq!(stats.duration_ms, 50);
        assert_eq!(stats.execution_ms, 50);
    }

    #[test]
    fn phases_without_timings_are_zeroed() {
        let stats = phase_stats("OLL".to_owned(), 4, &[100, 200], 2);

        assert_eq!(stats.move_count, 4);
        assert_eq!(stats.duration_ms, 0);
        assert!(stats.tps.abs() < f64::EPSILON);
    }

    #[test]
    fn samples_are_tagged_with_the_latest_phase() {
        let samples = tps_over_time(&[0, 150, 1300], &["Cross", "Cross", "PLL"]);

        assert_eq!(samples.len(), 14);
        assert_eq!(samples[0].phase, "Cross");
        assert!((samples[0].tps - 2.0).abs() < 1e-9);
        assert_eq!(samples[12].phase, "Cross");
        assert_eq!(samples[13].time_ms, 1300);
        assert_eq!(samples[13].phase, "PLL");
        assert!((samples[13].tps - 1.0).abs() < 1e-9);

        assert!(tps_over_time(&[5], &["PLL"]).is_empty());
    }

    #[test]
    fn splits_and_totals() {
        // R U R' U' from solved is all PLL
        let analysis = analyze_solve(&CubeFaces::solved(), &parse_scramble("R U R' U'"));

        let stats = solve_stats(&analysis, &[200, 400, 1400, 1600], 2000).unwrap();

        assert_eq!(stats.total_moves, 4);
        assert!((stats.tps - 2.0).abs() < 1e-9);
        assert_eq!(stats.pause_ms, 1000);
        assert_eq!(stats.execution_ms, 1000);
        assert_eq!(stats.phases.len(), 7);
        assert!((stats.splits.pll - 100.0).abs() < 1e-9);
        assert!(stats.splits.cross.abs() < f64::EPSILON);
        assert_eq!(stats.ideal_splits, Splits::IDEAL);
        assert!(stats.tps_over_time.iter().all(|sample| sample.phase == "PLL"));
    }

    #[test]
    fn needs_timings() {
        let analysis = analyze_solve(&CubeFaces::solved(), &[]);

        assert!(solve_stats(&analysis, &[], 1000).is_none());
    }
}
