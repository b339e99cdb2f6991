//! Splitting a finished solve into the phases of the CFOP method.
//!
//! The face holding a color's center is where that color's cross is built, so the cross face plays the role of the down face and the opposite face is the last layer. Every goal is checked against the centers, which never move.

use cube_core::{
    Color, CubeFaces, Face, Move,
    pieces::{self, Sticker},
};
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const F2L_SLOT_COUNT: usize = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Expected {expected} cube states for {moves} moves but got {found}")]
    HistoryLength {
        moves: usize,
        expected: usize,
        found: usize,
    },
}

/// A contiguous run of the solve's moves
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfopPhase {
    pub name: String,
    pub moves: Vec<Move>,
    /// The phase's goal was already met when it began
    pub skipped: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CfopAnalysis {
    pub cross_color: Color,
    pub cross: CfopPhase,
    pub f2l: [CfopPhase; F2L_SLOT_COUNT],
    pub oll: CfopPhase,
    pub pll: CfopPhase,
}

impl CfopAnalysis {
    /// Every phase in solve order
    pub fn phases(&self) -> impl Iterator<Item = &CfopPhase> {
        std::iter::once(&self.cross)
            .chain(&self.f2l)
            .chain([&self.oll, &self.pll])
    }

    #[must_use]
    pub fn total_moves(&self) -> usize {
        self.phases().map(|phase| phase.moves.len()).sum()
    }

    /// The analysed moves, put back together
    #[must_use]
    pub fn moves(&self) -> Vec<Move> {
        self.phases()
            .flat_map(|phase| phase.moves.iter().cloned())
            .collect()
    }
}

/// The stickers that have to be solved for each goal when building on `down`.
///
/// `slots` follows the order of [`pieces::CORNERS`], so slot numbers name positions on the cube.
struct Goals {
    down: Face,
    cross: Vec<Sticker>,
    slots: Vec<Vec<Sticker>>,
}

impl Goals {
    fn new(down: Face) -> Goals {
        let cross = pieces::edges_of(down).flatten().copied().collect_vec();

        let slots = pieces::corners_of(down)
            .map(|corner| {
                let (a, b) = corner
                    .iter()
                    .map(|&(face, _)| face)
                    .filter(|&face| face != down)
                    .collect_tuple()
                    .expect("a corner touches three faces");

                let edge = pieces::edge_between(a, b).expect("two faces of a corner are adjacent");

                corner.iter().chain(edge).copied().collect_vec()
            })
            .collect_vec();

        Goals { down, cross, slots }
    }

    fn cross_solved(&self, cube: &CubeFaces) -> bool {
        cube.stickers_solved(&self.cross)
    }

    /// Whether the corner and edge pair of slot `slot` is solved on top of an intact cross
    fn slot_solved(&self, cube: &CubeFaces, slot: usize) -> bool {
        self.cross_solved(cube) && cube.stickers_solved(&self.slots[slot])
    }

    /// How many corner and edge pairs are solved on top of an intact cross
    fn solved_slots(&self, cube: &CubeFaces) -> usize {
        if !self.cross_solved(cube) {
            return 0;
        }

        self.slots
            .iter()
            .filter(|slot| cube.stickers_solved(slot))
            .count()
    }

    fn last_layer_oriented(&self, cube: &CubeFaces) -> bool {
        self.solved_slots(cube) == F2L_SLOT_COUNT && cube.is_face_solved(self.down.opposite())
    }
}

/// Hands out consecutive slices of the move list
struct Segmenter<'a> {
    moves: &'a [Move],
    states: &'a [CubeFaces],
    start: usize,
}

impl Segmenter<'_> {
    /// The first state at or after the current position where `goal` holds
    fn reached_at(&self, goal: impl Fn(&CubeFaces) -> bool) -> Option<usize> {
        (self.start..self.states.len()).find(|&i| goal(&self.states[i]))
    }

    /// Take the moves up to `end`, or every remaining move if the goal is never reached
    fn take(&mut self, name: String, end: Option<usize>) -> CfopPhase {
        let reached = end.is_some();
        let end = end.unwrap_or(self.moves.len());

        debug!("{name}: moves {}..{end}", self.start);

        let phase = CfopPhase {
            name,
            moves: self.moves[self.start..end].to_vec(),
            skipped: reached && end == self.start,
        };

        self.start = end;

        phase
    }
}

/// Find which color's cross appears first, preferring colors earlier in [`Color::ALL`] on ties
fn find_cross(states: &[CubeFaces]) -> Option<(Color, usize)> {
    Color::ALL
        .into_iter()
        .filter_map(|color| {
            let goals = Goals::new(color.home_face());
            states
                .iter()
                .position(|cube| goals.cross_solved(cube))
                .map(|at| (color, at))
        })
        .min_by_key(|&(_, at)| at)
}

/// Split a solve into Cross, four F2L pairs, OLL and PLL.
///
/// `F2L n` ends once the pair in slot `n` is solved, whichever order the pairs were actually solved in. `states[0]` is the cube before the first move and `states[i]` the cube after `moves[i - 1]`. The phases always partition `moves`: a goal that is never reached takes every remaining move, leaving the later phases empty.
///
/// # Errors
///
/// Fails if there isn't exactly one more state than there are moves.
pub fn analyze_cfop(moves: &[Move], states: &[CubeFaces]) -> Result<CfopAnalysis, AnalysisError> {
    if states.len() != moves.len() + 1 {
        return Err(AnalysisError::HistoryLength {
            moves: moves.len(),
            expected: moves.len() + 1,
            found: states.len(),
        });
    }

    let (cross_color, cross_end) = match find_cross(states) {
        Some((color, at)) => (color, Some(at)),
        None => (Color::ALL[0], None),
    };

    debug!("Cross color is {cross_color}");

    let goals = Goals::new(cross_color.home_face());

    let mut segmenter = Segmenter {
        moves,
        states,
        start: 0,
    };

    let cross = segmenter.take("Cross".to_owned(), cross_end);

    let f2l = std::array::from_fn(|i| {
        let end = segmenter.reached_at(|cube| goals.slot_solved(cube, i));
        segmenter.take(format!("F2L {}", i + 1), end)
    });

    let oll_end = segmenter.reached_at(|cube| goals.last_layer_oriented(cube));
    let oll = segmenter.take("OLL".to_owned(), oll_end);

    let remaining = &moves[segmenter.start..];
    let pll = CfopPhase {
        name: "PLL".to_owned(),
        moves: remaining.to_vec(),
        skipped: remaining.is_empty() && states[segmenter.start].is_solved(),
    };

    Ok(CfopAnalysis {
        cross_color,
        cross,
        f2l,
        oll,
        pll,
    })
}

/// Analyse a solve starting from `scrambled`, working out the intermediate states itself
#[must_use]
pub fn analyze_solve(scrambled: &CubeFaces, moves: &[Move]) -> CfopAnalysis {
    let mut states = Vec::with_capacity(moves.len() + 1);
    states.push(scrambled.clone());

    for move_ in moves {
        let next = states[states.len() - 1].apply_move(move_);
        states.push(next);
    }

    analyze_cfop(moves, &states).expect("one state was recorded per move")
}
