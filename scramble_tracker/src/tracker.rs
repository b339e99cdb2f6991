//! Following a scramble one physical move at a time.
//!
//! The tracker is a pure reducer: [`ScrambleTrackerState::reduce`] consumes the old state and an event and returns the next state. [`ScrambleTracker`] wraps that up for callers that just want to feed it moves.

use std::{cmp::Ordering, collections::VecDeque};

use cube_core::{CubeFaces, Move, parse_scramble};
use log::{debug, info, trace, warn};
use serde::Serialize;

use crate::config::TrackerConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerStatus {
    #[default]
    Idle,
    Scrambling,
    /// A move that isn't part of the scramble was performed and has to be undone
    Diverged,
    Completed,
    Solving,
    Solved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveStatus {
    Pending,
    Current,
    Completed,
    /// The current step, on hold until a divergence is undone
    Recovery,
}

/// One step of the scramble
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrambleMoveState {
    /// What is still left to do for this step
    #[serde(rename = "move")]
    pub move_: Move,
    pub original_move: Move,
    pub status: MoveStatus,
    /// Part of the step has been done, so `move_` differs from `original_move`
    pub was_modified: bool,
}

impl ScrambleMoveState {
    fn fresh(original_move: Move, status: MoveStatus) -> ScrambleMoveState {
        ScrambleMoveState {
            move_: original_move.clone(),
            original_move,
            status,
            was_modified: false,
        }
    }
}

/// The moves that undo a divergence. The most recent mistake is undone first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecoveryStack(VecDeque<Move>);

impl RecoveryStack {
    /// The move the user has to do next
    #[must_use]
    pub fn peek(&self) -> Option<&Move> {
        self.0.front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The recovery moves in the order they have to be performed
    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.0.iter()
    }

    /// Record that `mistake` has to be undone before anything already on the stack
    fn push_mistake(&mut self, mistake: &Move) {
        self.0.push_front(mistake.inverse());
    }

    fn pop(&mut self) -> Option<Move> {
        self.0.pop_front()
    }

    fn replace_next(&mut self, remaining: Move) {
        if let Some(next) = self.0.front_mut() {
            *next = remaining;
        }
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

impl<'a> IntoIterator for &'a RecoveryStack {
    type Item = &'a Move;
    type IntoIter = std::collections::vec_deque::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackerEvent {
    /// Start following a new scramble, given in move notation
    SetScramble(String),
    PerformMove(Move),
    SetSolved(bool),
    StartSolving,
    /// The solve was found to be finished by someone watching the cube
    FinishSolve,
    /// Jump to wherever in the scramble the cube's actual state is
    SyncFacelets(CubeFaces),
    Reset,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrambleTrackerState {
    pub status: TrackerStatus,
    pub original_scramble: String,
    pub moves: Vec<ScrambleMoveState>,
    /// Index into `moves` of the step being performed
    pub current_index: usize,
    pub recovery_moves: RecoveryStack,
    /// Every wrong move since the divergence began
    pub diverged_moves: Vec<Move>,
    pub is_solved: bool,
    pub solution_moves: Vec<Move>,
    /// The divergence has grown past the point of guiding the user back, and the cube's state should be resynchronized some other way
    pub should_reset_cube: bool,
}

impl Default for ScrambleTrackerState {
    fn default() -> Self {
        ScrambleTrackerState {
            status: TrackerStatus::Idle,
            original_scramble: String::new(),
            moves: Vec::new(),
            current_index: 0,
            recovery_moves: RecoveryStack::default(),
            diverged_moves: Vec::new(),
            is_solved: true,
            solution_moves: Vec::new(),
            should_reset_cube: false,
        }
    }
}

impl ScrambleTrackerState {
    /// What is left of the scramble step being performed
    #[must_use]
    pub fn current_move(&self) -> Option<&Move> {
        self.moves.get(self.current_index).map(|entry| &entry.move_)
    }

    /// Compute the state after `event`.
    ///
    /// Events that make no sense in the current status leave the state unchanged.
    #[must_use]
    pub fn reduce(self, event: TrackerEvent, config: &TrackerConfig) -> ScrambleTrackerState {
        trace!("{:?} <- {event:?}", self.status);

        match event {
            TrackerEvent::SetScramble(scramble) => {
                ScrambleTrackerState::with_scramble(scramble, self.is_solved)
            }
            TrackerEvent::PerformMove(performed) => match self.status {
                TrackerStatus::Scrambling => self.scramble_move(performed, config),
                TrackerStatus::Diverged => self.recovery_move(performed, config),
                TrackerStatus::Solving => {
                    let mut solution_moves = self.solution_moves;
                    solution_moves.push(performed);

                    ScrambleTrackerState {
                        solution_moves,
                        ..self
                    }
                }
                TrackerStatus::Idle | TrackerStatus::Completed | TrackerStatus::Solved => self,
            },
            TrackerEvent::SetSolved(is_solved) => ScrambleTrackerState { is_solved, ..self },
            TrackerEvent::StartSolving => {
                if self.status != TrackerStatus::Completed {
                    return self;
                }

                info!("Solve started");

                ScrambleTrackerState {
                    status: TrackerStatus::Solving,
                    solution_moves: Vec::new(),
                    ..self
                }
            }
            TrackerEvent::FinishSolve => {
                if self.status != TrackerStatus::Solving {
                    return self;
                }

                info!("Solve finished in {} moves", self.solution_moves.len());

                ScrambleTrackerState {
                    status: TrackerStatus::Solved,
                    ..self
                }
            }
            TrackerEvent::SyncFacelets(cube) => match self.status {
                TrackerStatus::Scrambling | TrackerStatus::Diverged | TrackerStatus::Completed => {
                    self.sync(&cube)
                }
                TrackerStatus::Idle | TrackerStatus::Solving | TrackerStatus::Solved => self,
            },
            TrackerEvent::Reset => ScrambleTrackerState::default(),
        }
    }

    fn with_scramble(scramble: String, is_solved: bool) -> ScrambleTrackerState {
        let parsed = parse_scramble(&scramble);

        if parsed.is_empty() {
            debug!("`{scramble}` has no moves to follow");

            return ScrambleTrackerState {
                is_solved,
                ..ScrambleTrackerState::default()
            };
        }

        let moves = parsed
            .into_iter()
            .enumerate()
            .map(|(i, move_)| {
                let status = if i == 0 {
                    MoveStatus::Current
                } else {
                    MoveStatus::Pending
                };

                ScrambleMoveState::fresh(move_, status)
            })
            .collect();

        ScrambleTrackerState {
            status: TrackerStatus::Scrambling,
            original_scramble: scramble,
            moves,
            is_solved: false,
            ..ScrambleTrackerState::default()
        }
    }

    fn scramble_move(mut self, performed: Move, config: &TrackerConfig) -> ScrambleTrackerState {
        let Some(entry) = self.moves.get_mut(self.current_index) else {
            return self;
        };

        if !performed.is_same_face(&entry.move_) {
            debug!(
                "Expected {} at step {} but got {performed}",
                entry.move_, self.current_index
            );

            entry.status = MoveStatus::Recovery;

            self.status = TrackerStatus::Diverged;
            self.recovery_moves.clear();
            self.recovery_moves.push_mistake(&performed);
            self.diverged_moves = vec![performed];
            self.should_reset_cube = self.diverged_moves.len() > config.max_divergence;

            return self;
        }

        match entry.move_.remaining_after(&performed) {
            Some(remaining) => {
                trace!("{remaining} left of step {}", self.current_index);

                entry.move_ = remaining;
                entry.was_modified = true;
            }
            None => {
                *entry = ScrambleMoveState::fresh(entry.original_move.clone(), MoveStatus::Completed);
                self.current_index += 1;

                match self.moves.get_mut(self.current_index) {
                    Some(next) => next.status = MoveStatus::Current,
                    None => {
                        info!("Scramble complete");
                        self.status = TrackerStatus::Completed;
                    }
                }
            }
        }

        self
    }

    fn recovery_move(mut self, performed: Move, config: &TrackerConfig) -> ScrambleTrackerState {
        let Some(expected) = self.recovery_moves.peek() else {
            return self;
        };

        if performed.is_same_face(expected) {
            match expected.remaining_after(&performed) {
                Some(remaining) => self.recovery_moves.replace_next(remaining),
                None => {
                    self.recovery_moves.pop();

                    if self.recovery_moves.is_empty() {
                        debug!("Recovered, back at step {}", self.current_index);
                        self.rejoin_scramble();
                    }
                }
            }

            return self;
        }

        debug!("Diverged further with {performed}");

        if self.diverged_moves.len() < config.max_divergence {
            self.recovery_moves.push_mistake(&performed);
        } else if !self.should_reset_cube {
            warn!(
                "More than {} moves away from the scramble, the cube needs to be resynchronized",
                config.max_divergence
            );
        }

        self.diverged_moves.push(performed);
        self.should_reset_cube = self.diverged_moves.len() > config.max_divergence;

        self
    }

    fn rejoin_scramble(&mut self) {
        for (i, entry) in self.moves.iter_mut().enumerate() {
            entry.status = match i.cmp(&self.current_index) {
                Ordering::Less => MoveStatus::Completed,
                Ordering::Equal => MoveStatus::Current,
                Ordering::Greater => MoveStatus::Pending,
            };
        }

        self.status = TrackerStatus::Scrambling;
        self.recovery_moves.clear();
        self.diverged_moves.clear();
        self.should_reset_cube = false;
    }

    /// Find the longest prefix of the scramble that takes a solved cube to `cube` and continue from there
    fn sync(mut self, cube: &CubeFaces) -> ScrambleTrackerState {
        let mut prefix_state = CubeFaces::solved();
        let mut matched = (prefix_state == *cube).then_some(0);

        for (i, entry) in self.moves.iter().enumerate() {
            prefix_state = prefix_state.apply_move(&entry.original_move);

            if prefix_state == *cube {
                matched = Some(i + 1);
            }
        }

        let Some(done) = matched else {
            debug!("The cube isn't at any point of the scramble");
            return self;
        };

        debug!("Synchronized to step {done} of {}", self.moves.len());

        for (i, entry) in self.moves.iter_mut().enumerate() {
            let status = match i.cmp(&done) {
                Ordering::Less => MoveStatus::Completed,
                Ordering::Equal => MoveStatus::Current,
                Ordering::Greater => MoveStatus::Pending,
            };

            *entry = ScrambleMoveState::fresh(entry.original_move.clone(), status);
        }

        self.current_index = done;
        self.recovery_moves.clear();
        self.diverged_moves.clear();
        self.should_reset_cube = false;
        self.is_solved = cube.is_solved();

        self.status = if done == self.moves.len() {
            info!("Scramble complete");
            TrackerStatus::Completed
        } else {
            TrackerStatus::Scrambling
        };

        self
    }
}

/// Owns a tracker's state and feeds it events
#[derive(Clone, Debug, Default)]
pub struct ScrambleTracker {
    state: ScrambleTrackerState,
    config: TrackerConfig,
}

impl ScrambleTracker {
    #[must_use]
    pub fn new(config: TrackerConfig) -> ScrambleTracker {
        ScrambleTracker {
            state: ScrambleTrackerState::default(),
            config,
        }
    }

    #[must_use]
    pub fn state(&self) -> &ScrambleTrackerState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn dispatch(&mut self, event: TrackerEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(event, &self.config);
    }

    pub fn set_scramble(&mut self, scramble: &str) {
        self.dispatch(TrackerEvent::SetScramble(scramble.to_owned()));
    }

    /// Feed the tracker a move in notation, returning it if it parsed.
    ///
    /// Tokens that aren't face turns are ignored.
    pub fn perform_move(&mut self, token: &str) -> Option<Move> {
        let Some(performed) = Move::parse(token) else {
            trace!("Ignoring `{token}`");
            return None;
        };

        self.dispatch(TrackerEvent::PerformMove(performed.clone()));

        Some(performed)
    }

    pub fn set_solved(&mut self, is_solved: bool) {
        self.dispatch(TrackerEvent::SetSolved(is_solved));
    }

    pub fn start_solving(&mut self) {
        self.dispatch(TrackerEvent::StartSolving);
    }

    pub fn finish_solve(&mut self) {
        self.dispatch(TrackerEvent::FinishSolve);
    }

    pub fn sync_with_facelets(&mut self, cube: &CubeFaces) {
        self.dispatch(TrackerEvent::SyncFacelets(cube.clone()));
    }

    pub fn reset(&mut self) {
        self.dispatch(TrackerEvent::Reset);
    }

    #[must_use]
    pub fn should_reset_cube(&self) -> bool {
        self.state.should_reset_cube
    }
}
