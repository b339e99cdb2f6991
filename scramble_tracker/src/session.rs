use cube_core::{CubeFaces, FaceletsError, Move};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use solve_analysis::{
    CfopAnalysis, analyze_cfop,
    solve_stats::{SolveStats, solve_stats},
};

use crate::{
    config::TrackerConfig,
    tracker::{ScrambleTracker, ScrambleTrackerState, TrackerStatus},
};

/// Everything worth keeping about a finished solve
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveRecord {
    pub time_ms: u64,
    pub scramble: String,
    pub solution: Vec<Move>,
    pub cfop_analysis: CfopAnalysis,
    /// When each move of the solution was performed, if the moves were timed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub move_timings: Vec<u64>,
}

impl SolveRecord {
    /// Per phase timings, if the moves were timed
    #[must_use]
    pub fn stats(&self) -> Option<SolveStats> {
        solve_stats(&self.cfop_analysis, &self.move_timings, self.time_ms)
    }
}

/// A tracker together with the cube it is watching.
///
/// Every move is applied to a model of the physical cube so that the session notices on its own when the cube gets solved.
#[derive(Clone, Debug, Default)]
pub struct SolveSession {
    tracker: ScrambleTracker,
    cube: CubeFaces,
    /// The cube before and after every solution move
    history: Vec<CubeFaces>,
    move_timings: Vec<u64>,
}

impl SolveSession {
    #[must_use]
    pub fn new(config: TrackerConfig) -> SolveSession {
        SolveSession {
            tracker: ScrambleTracker::new(config),
            ..SolveSession::default()
        }
    }

    #[must_use]
    pub fn state(&self) -> &ScrambleTrackerState {
        self.tracker.state()
    }

    #[must_use]
    pub fn tracker(&self) -> &ScrambleTracker {
        &self.tracker
    }

    /// What the physical cube is believed to look like
    #[must_use]
    pub fn cube(&self) -> &CubeFaces {
        &self.cube
    }

    pub fn set_scramble(&mut self, scramble: &str) {
        self.tracker.set_scramble(scramble);
        self.clear_history();
    }

    /// Go back to idle. The cube is left as it is.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.clear_history();
    }

    pub fn start_solving(&mut self) {
        self.tracker.start_solving();

        if self.state().status == TrackerStatus::Solving {
            self.clear_history();
            self.history.push(self.cube.clone());
        }
    }

    /// Perform a move given in notation. Tokens that aren't face turns are ignored and give `None`.
    pub fn perform_move(&mut self, token: &str) -> Option<Move> {
        self.perform(token, None)
    }

    /// Like [`SolveSession::perform_move`], also noting that it happened `at_ms` milliseconds into the solve
    pub fn perform_timed_move(&mut self, token: &str, at_ms: u64) -> Option<Move> {
        self.perform(token, Some(at_ms))
    }

    fn perform(&mut self, token: &str, at_ms: Option<u64>) -> Option<Move> {
        let performed = self.tracker.perform_move(token)?;

        self.cube = self.cube.apply_move(&performed);

        if self.state().status == TrackerStatus::Solving {
            self.history.push(self.cube.clone());
            self.move_timings.extend(at_ms);
        }

        self.check_solved();

        Some(performed)
    }

    fn check_solved(&mut self) {
        let solved = self.cube.is_solved();

        if solved != self.state().is_solved {
            self.tracker.set_solved(solved);
        }

        if !solved {
            return;
        }

        match self.state().status {
            TrackerStatus::Scrambling | TrackerStatus::Diverged => {
                self.tracker.sync_with_facelets(&self.cube);
            }
            TrackerStatus::Solving => self.tracker.finish_solve(),
            TrackerStatus::Idle | TrackerStatus::Completed | TrackerStatus::Solved => {}
        }
    }

    /// Replace the cube with one read from a facelet string and let the tracker catch up to it.
    ///
    /// Ignored once solving has started, since the solve's history has to follow from its moves alone.
    ///
    /// # Errors
    ///
    /// Fails if the facelet string doesn't describe a cube.
    pub fn sync_with_facelets(&mut self, facelets: &str) -> Result<(), FaceletsError> {
        let cube = CubeFaces::from_facelets(facelets)?;

        if matches!(
            self.state().status,
            TrackerStatus::Solving | TrackerStatus::Solved
        ) {
            debug!("Ignoring a facelet sync while {:?}", self.state().status);
            return Ok(());
        }

        self.cube = cube;
        self.tracker.sync_with_facelets(&self.cube);
        self.check_solved();

        Ok(())
    }

    /// Put together the record of the solve once the cube has been solved
    #[must_use]
    pub fn finish(&self, time_ms: u64) -> Option<SolveRecord> {
        let state = self.state();

        if state.status != TrackerStatus::Solved {
            return None;
        }

        let cfop_analysis = analyze_cfop(&state.solution_moves, &self.history)
            .inspect_err(|err| warn!("Can't analyse the solve: {err}"))
            .ok()?;

        info!(
            "Solved `{}` in {time_ms}ms with {} moves",
            state.original_scramble,
            state.solution_moves.len()
        );

        Some(SolveRecord {
            time_ms,
            scramble: state.original_scramble.clone(),
            solution: state.solution_moves.clone(),
            cfop_analysis,
            move_timings: self.move_timings.clone(),
        })
    }

    fn clear_history(&mut self) {
        self.history.clear();
        self.move_timings.clear();
    }
}
