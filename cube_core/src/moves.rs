use std::{
    fmt::{self, Display},
    hash::{Hash, Hasher},
    str::FromStr,
};

use internment::ArcIntern;
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the six outer layers of the cube
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Face {
    U,
    D,
    F,
    B,
    L,
    R,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::U, Face::D, Face::F, Face::B, Face::L, Face::R];

    #[must_use]
    pub fn from_letter(letter: char) -> Option<Face> {
        Some(match letter {
            'U' => Face::U,
            'D' => Face::D,
            'F' => Face::F,
            'B' => Face::B,
            'L' => Face::L,
            'R' => Face::R,
            _ => return None,
        })
    }

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Face::U => 'U',
            Face::D => 'D',
            Face::F => 'F',
            Face::B => 'B',
            Face::L => 'L',
            Face::R => 'R',
        }
    }

    /// The face on the other side of the cube
    #[must_use]
    pub fn opposite(self) -> Face {
        match self {
            Face::U => Face::D,
            Face::D => Face::U,
            Face::F => Face::B,
            Face::B => Face::F,
            Face::L => Face::R,
            Face::R => Face::L,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("`{0}` is not a face turn")]
pub struct ParseMoveError(pub String);

/// A single turn of one face.
///
/// The amount is stored as a count of clockwise quarter turns in `1..=3`, so a move is never the identity. Two moves are equal when they turn the same face by the same amount, regardless of how they were written.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Move {
    face: Face,
    quarter_turns: u8,
    original: ArcIntern<str>,
}

impl Move {
    /// Create a move turning `face` clockwise by `quarter_turns` quarter turns, taken mod 4.
    ///
    /// Returns `None` if the amount is a multiple of four.
    #[must_use]
    pub fn new(face: Face, quarter_turns: i32) -> Option<Move> {
        let quarter_turns = u8::try_from(quarter_turns.rem_euclid(4)).ok()?;

        if quarter_turns == 0 {
            return None;
        }

        Some(Move {
            face,
            quarter_turns,
            original: ArcIntern::from(canonical_notation(face, quarter_turns).as_str()),
        })
    }

    /// Parse a single token of face turn notation such as `R`, `U'` or `F2`.
    ///
    /// Anything else, including wide turns, slice moves and rotations, is not a face turn and gives `None`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Move> {
        let token = token.trim();
        let mut chars = token.chars();
        let face = Face::from_letter(chars.next()?)?;

        let quarter_turns = match chars.as_str() {
            "" => 1,
            "'" => 3,
            "2" | "2'" | "'2" => 2,
            _ => return None,
        };

        Some(Move {
            face,
            quarter_turns,
            original: ArcIntern::from(token),
        })
    }

    #[must_use]
    pub fn face(&self) -> Face {
        self.face
    }

    /// The number of clockwise quarter turns, always in `1..=3`
    #[must_use]
    pub fn quarter_turns(&self) -> u8 {
        self.quarter_turns
    }

    /// The notation this move was parsed from
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    #[must_use]
    pub fn is_half_turn(&self) -> bool {
        self.quarter_turns == 2
    }

    /// Whether both moves turn the same face, ignoring direction and amount
    #[must_use]
    pub fn is_same_face(&self, other: &Move) -> bool {
        self.face == other.face
    }

    /// The move that undoes this one
    #[must_use]
    pub fn inverse(&self) -> Move {
        Move {
            face: self.face,
            quarter_turns: 4 - self.quarter_turns,
            original: ArcIntern::from(canonical_notation(self.face, 4 - self.quarter_turns).as_str()),
        }
    }

    /// The net effect of performing `self` followed by `other` on the same face.
    ///
    /// Returns `None` when the two cancel out.
    #[must_use]
    pub fn combine(&self, other: &Move) -> Option<Move> {
        debug_assert!(self.is_same_face(other), "{self} and {other} turn different faces");

        Move::new(
            self.face,
            i32::from(self.quarter_turns) + i32::from(other.quarter_turns),
        )
    }

    /// Treating `self` as a move that still has to be done, find what is left to do after `performed` was done.
    ///
    /// Returns `None` once nothing is left. Performing `U` against an expected `U2` leaves `U`; performing `U'` against `U` leaves `U2`.
    #[must_use]
    pub fn remaining_after(&self, performed: &Move) -> Option<Move> {
        self.combine(&performed.inverse())
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.face == other.face && self.quarter_turns == other.quarter_turns
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.face.hash(state);
        self.quarter_turns.hash(state);
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", canonical_notation(self.face, self.quarter_turns))
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::parse(s).ok_or_else(|| ParseMoveError(s.to_owned()))
    }
}

impl TryFrom<String> for Move {
    type Error = ParseMoveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Move> for String {
    fn from(value: Move) -> Self {
        value.original.to_string()
    }
}

fn canonical_notation(face: Face, quarter_turns: u8) -> String {
    match quarter_turns {
        2 => format!("{face}2"),
        3 => format!("{face}'"),
        _ => face.to_string(),
    }
}

/// Split a scramble on whitespace and parse every token.
///
/// Tokens that aren't face turns are dropped rather than rejecting the whole scramble.
#[must_use]
pub fn parse_scramble(text: &str) -> Vec<Move> {
    text.split_whitespace()
        .filter_map(|token| {
            let parsed = Move::parse(token);
            if parsed.is_none() {
                debug!("Dropping `{token}` from scramble");
            }
            parsed
        })
        .collect()
}

/// Write moves back out as space separated notation
#[must_use]
pub fn format_moves<'a>(moves: impl IntoIterator<Item = &'a Move>) -> String {
    moves.into_iter().map(Move::original).join(" ")
}
