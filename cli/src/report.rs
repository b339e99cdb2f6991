use cube_core::format_moves;
use itertools::Itertools;
use scramble_tracker::{ScrambleTrackerState, TrackerStatus};
use solve_analysis::{CfopPhase, solve_stats::SolveStats};

/// One line describing a phase, without the name
pub fn phase_summary(phase: &CfopPhase) -> String {
    if phase.skipped {
        return "skip".to_owned();
    }

    if phase.moves.is_empty() {
        return "-".to_owned();
    }

    let count = phase.moves.len();
    let plural = if count == 1 { "" } else { "s" };

    format!("{count:>2} move{plural}  {}", format_moves(&phase.moves))
}

/// What the user should do next, given the tracker's state
pub fn progress(state: &ScrambleTrackerState) -> String {
    match state.status {
        TrackerStatus::Idle => "waiting for a scramble".to_owned(),
        TrackerStatus::Scrambling => {
            let remaining = state.moves[state.current_index..]
                .iter()
                .map(|entry| entry.move_.to_string())
                .join(" ");

            format!(
                "[{}/{}] {remaining}",
                state.current_index,
                state.moves.len()
            )
        }
        TrackerStatus::Diverged => format!("undo: {}", format_moves(&state.recovery_moves)),
        TrackerStatus::Completed => "scramble done".to_owned(),
        TrackerStatus::Solving => format!("solving, {} moves", state.solution_moves.len()),
        TrackerStatus::Solved => "solved".to_owned(),
    }
}

/// Lines breaking down where the time went in a timed solve
pub fn timing_lines(stats: &SolveStats) -> Vec<String> {
    let mut lines = stats
        .phases
        .iter()
        .map(|phase| {
            format!(
                "{:<6} {:>6}ms recognition {:>6}ms execution {:>5.2} tps",
                phase.name, phase.recognition_ms, phase.execution_ms, phase.tps
            )
        })
        .collect_vec();

    lines.push(format!(
        "splits: cross {:.0}% f2l {:.0}% oll {:.0}% pll {:.0}%",
        stats.splits.cross, stats.splits.f2l, stats.splits.oll, stats.splits.pll
    ));

    lines
}

#[cfg(test)]
mod tests {
    use cube_core::{CubeFaces, parse_scramble};
    use pretty_assertions::assert_eq;
    use scramble_tracker::ScrambleTracker;
    use solve_analysis::{analyze_solve, solve_stats::solve_stats};

    use super::{phase_summary, progress, timing_lines};

    #[test]
    fn summarizes_phases() {
        let solution = parse_scramble("D R U R'");
        let scrambled = CubeFaces::solved().apply_moves(&parse_scramble("R U' R' D'"));

        let analysis = analyze_solve(&scrambled, &solution);

        assert_eq!(phase_summary(&analysis.cross), " 1 move  D");
        assert_eq!(phase_summary(&analysis.f2l[0]), "skip");
        assert_eq!(phase_summary(&analysis.f2l[1]), " 3 moves  R U R'");
        assert_eq!(phase_summary(&analysis.f2l[3]), "skip");
    }

    #[test]
    fn describes_progress() {
        let mut tracker = ScrambleTracker::default();
        assert_eq!(progress(tracker.state()), "waiting for a scramble");

        tracker.set_scramble("R U2 F");
        tracker.perform_move("R");
        tracker.perform_move("U");
        assert_eq!(progress(tracker.state()), "[1/3] U F");

        tracker.perform_move("B");
        tracker.perform_move("L2");
        assert_eq!(progress(tracker.state()), "undo: L2 B'");
    }

    #[test]
    fn timing_breakdown() {
        let analysis = analyze_solve(&CubeFaces::solved(), &parse_scramble("R U"));
        let stats = solve_stats(&analysis, &[100, 300], 400).unwrap();

        let lines = timing_lines(&stats);

        assert_eq!(lines.len(), 8);
        assert!(lines[6].starts_with("PLL"));
        assert_eq!(lines[7], "splits: cross 0% f2l 0% oll 0% pll 100%");
    }
}
