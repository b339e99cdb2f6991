use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::moves::{Face, Move};

/// Facelet string of the solved cube, in `U R F D L B` face order
pub const SOLVED_FACELETS: &str = "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";

/// The order faces are written in a facelet string
const FACELET_ORDER: [Face; 6] = [Face::U, Face::R, Face::F, Face::D, Face::L, Face::B];

/// `new[i] = old[CLOCKWISE[i]]` rotates the nine facelets of a face a quarter turn clockwise
const CLOCKWISE: [usize; 9] = [6, 3, 0, 7, 4, 1, 8, 5, 2];

/// A run of three facelets on a face adjacent to the turned face
type Strip = (Face, [usize; 3]);

/// The four strips around each face, in the order facelets travel during a clockwise turn: each strip receives the facelets of the strip after it, element by element.
fn adjacent_strips(face: Face) -> [Strip; 4] {
    match face {
        Face::U => [
            (Face::F, [0, 1, 2]),
            (Face::R, [0, 1, 2]),
            (Face::B, [0, 1, 2]),
            (Face::L, [0, 1, 2]),
        ],
        Face::D => [
            (Face::F, [6, 7, 8]),
            (Face::L, [6, 7, 8]),
            (Face::B, [6, 7, 8]),
            (Face::R, [6, 7, 8]),
        ],
        Face::F => [
            (Face::U, [6, 7, 8]),
            (Face::L, [8, 5, 2]),
            (Face::D, [2, 1, 0]),
            (Face::R, [0, 3, 6]),
        ],
        Face::B => [
            (Face::U, [0, 1, 2]),
            (Face::R, [2, 5, 8]),
            (Face::D, [8, 7, 6]),
            (Face::L, [6, 3, 0]),
        ],
        Face::L => [
            (Face::U, [0, 3, 6]),
            (Face::B, [8, 5, 2]),
            (Face::D, [0, 3, 6]),
            (Face::F, [0, 3, 6]),
        ],
        Face::R => [
            (Face::U, [2, 5, 8]),
            (Face::F, [2, 5, 8]),
            (Face::D, [2, 5, 8]),
            (Face::B, [6, 3, 0]),
        ],
    }
}

/// Sticker colors, with the standard western color scheme. Serialized as their [`Color::letter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "W")]
    White,
    #[serde(rename = "Y")]
    Yellow,
    #[serde(rename = "G")]
    Green,
    #[serde(rename = "B")]
    Blue,
    #[serde(rename = "R")]
    Red,
    #[serde(rename = "O")]
    Orange,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Red,
        Color::Orange,
    ];

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Color::White => 'W',
            Color::Yellow => 'Y',
            Color::Green => 'G',
            Color::Blue => 'B',
            Color::Red => 'R',
            Color::Orange => 'O',
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Yellow => "Yellow",
            Color::Green => "Green",
            Color::Blue => "Blue",
            Color::Red => "Red",
            Color::Orange => "Orange",
        }
    }

    /// The face this color sits on in the solved state
    #[must_use]
    pub fn home_face(self) -> Face {
        match self {
            Color::White => Face::U,
            Color::Yellow => Face::D,
            Color::Green => Face::F,
            Color::Blue => Face::B,
            Color::Red => Face::R,
            Color::Orange => Face::L,
        }
    }

    /// The color of `face` in the solved state
    #[must_use]
    pub fn of_home_face(face: Face) -> Color {
        match face {
            Face::U => Color::White,
            Face::D => Color::Yellow,
            Face::F => Color::Green,
            Face::B => Color::Blue,
            Face::R => Color::Red,
            Face::L => Color::Orange,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FaceletsError {
    #[error("Expected 54 facelets but got {0}")]
    InvalidLength(usize),
    #[error("Unknown facelet `{0}` at position {1}")]
    UnknownFacelet(char, usize),
    #[error("Expected 9 facelets of `{0}` but got {1}")]
    WrongCount(char, usize),
    #[error("The center of {face} must be `{face}` but is `{found}`")]
    MisplacedCenter { face: Face, found: char },
}

/// The colors of all 54 facelets.
///
/// Each face is stored row by row as seen when looking straight at it, index 4 being the center. `U` has its last row against `F`, `D` has its first row against `F`, and the side faces have their first row against `U`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CubeFaces {
    faces: [[Color; 9]; 6],
}

impl Default for CubeFaces {
    fn default() -> Self {
        Self::solved()
    }
}

impl CubeFaces {
    #[must_use]
    pub fn solved() -> CubeFaces {
        CubeFaces {
            faces: Face::ALL.map(|face| [Color::of_home_face(face); 9]),
        }
    }

    #[must_use]
    pub fn face(&self, face: Face) -> &[Color; 9] {
        &self.faces[face.index()]
    }

    #[must_use]
    pub fn sticker(&self, face: Face, index: usize) -> Color {
        self.faces[face.index()][index]
    }

    #[must_use]
    pub fn center(&self, face: Face) -> Color {
        self.sticker(face, 4)
    }

    /// Whether every sticker in the list matches the center of the face it is on
    #[must_use]
    pub fn stickers_solved(&self, stickers: &[(Face, usize)]) -> bool {
        stickers
            .iter()
            .all(|&(face, index)| self.sticker(face, index) == self.center(face))
    }

    /// Return the state after performing `move_`
    #[must_use]
    pub fn apply_move(&self, move_: &Move) -> CubeFaces {
        let mut out = self.clone();
        for _ in 0..move_.quarter_turns() {
            out.turn_clockwise(move_.face());
        }
        out
    }

    /// Return the state after performing every move in order
    #[must_use]
    pub fn apply_moves<'a>(&self, moves: impl IntoIterator<Item = &'a Move>) -> CubeFaces {
        let mut out = self.clone();
        for move_ in moves {
            for _ in 0..move_.quarter_turns() {
                out.turn_clockwise(move_.face());
            }
        }
        out
    }

    fn turn_clockwise(&mut self, face: Face) {
        let old = self.faces;
        let turned = face.index();

        self.faces[turned] = CLOCKWISE.map(|i| old[turned][i]);

        let strips = adjacent_strips(face);
        for (k, (dst_face, dst)) in strips.iter().enumerate() {
            let (src_face, src) = &strips[(k + 1) % 4];
            for (&d, &s) in dst.iter().zip(src) {
                self.faces[dst_face.index()][d] = old[src_face.index()][s];
            }
        }
    }

    /// Whether all nine facelets of `face` share a color
    #[must_use]
    pub fn is_face_solved(&self, face: Face) -> bool {
        let stickers = self.face(face);
        stickers.iter().all(|&color| color == stickers[4])
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        Face::ALL.into_iter().all(|face| self.is_face_solved(face))
    }

    /// Write the cube as 54 letters in `U R F D L B` face order, each sticker named by the face its color belongs to
    #[must_use]
    pub fn to_facelets(&self) -> String {
        FACELET_ORDER
            .iter()
            .flat_map(|&face| self.face(face).iter())
            .map(|color| color.home_face().letter())
            .collect()
    }

    /// Read a cube from the format written by [`CubeFaces::to_facelets`].
    ///
    /// # Errors
    ///
    /// Fails unless the string has 54 face letters, nine of each, with every center on its own face.
    pub fn from_facelets(facelets: &str) -> Result<CubeFaces, FaceletsError> {
        let letters = facelets.trim().chars().collect::<Vec<_>>();

        if letters.len() != 54 {
            return Err(FaceletsError::InvalidLength(letters.len()));
        }

        let mut counts = [0_usize; 6];
        let mut out = CubeFaces::solved();

        for (i, &letter) in letters.iter().enumerate() {
            let home = Face::from_letter(letter).ok_or(FaceletsError::UnknownFacelet(letter, i))?;
            counts[home.index()] += 1;

            let face = FACELET_ORDER[i / 9];
            out.faces[face.index()][i % 9] = Color::of_home_face(home);
        }

        for face in Face::ALL {
            let count = counts[face.index()];
            if count != 9 {
                return Err(FaceletsError::WrongCount(face.letter(), count));
            }
        }

        for (block, face) in FACELET_ORDER.iter().enumerate() {
            let found = letters[block * 9 + 4];
            if found != face.letter() {
                return Err(FaceletsError::MisplacedCenter { face: *face, found });
            }
        }

        Ok(out)
    }
}

impl FromStr for CubeFaces {
    type Err = FaceletsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CubeFaces::from_facelets(s)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Color, CubeFaces, FaceletsError, SOLVED_FACELETS};
    use crate::moves::{Face, Move, parse_scramble};

    fn m(token: &str) -> Move {
        Move::parse(token).unwrap()
    }

    fn after(alg: &str) -> CubeFaces {
        CubeFaces::solved().apply_moves(&parse_scramble(alg))
    }

    #[test]
    fn solved_cube_is_solved() {
        let cube = CubeFaces::solved();
        assert!(cube.is_solved());
        assert_eq!(cube.center(Face::U), Color::White);
        assert_eq!(cube.center(Face::L), Color::Orange);
        assert_eq!(cube.to_facelets(), SOLVED_FACELETS);
    }

    #[test]
    fn any_single_move_unsolves() {
        for face in Face::ALL {
            for amount in 1..=3 {
                let cube = CubeFaces::solved().apply_move(&Move::new(face, amount).unwrap());
                assert!(!cube.is_solved(), "{face}{amount}");
            }
        }
    }

    #[test]
    fn quarter_turns_have_order_four() {
        let start = after("R U2 F' L D B2 U' R2");

        for face in Face::ALL {
            let quarter = Move::new(face, 1).unwrap();
            let mut cube = start.clone();
            for i in 0..4 {
                assert_eq!(cube == start, i == 0, "{face} after {i} turns");
                cube = cube.apply_move(&quarter);
            }
            assert_eq!(cube, start);
        }
    }

    #[test]
    fn half_turn_is_two_quarter_turns() {
        let start = after("F D' L2 B U R'");

        for face in Face::ALL {
            let quarter = Move::new(face, 1).unwrap();
            let half = Move::new(face, 2).unwrap();
            assert_eq!(
                start.apply_move(&half),
                start.apply_move(&quarter).apply_move(&quarter)
            );
        }
    }

    #[test]
    fn inverse_undoes_move() {
        let start = after("L2 D F' U");

        for face in Face::ALL {
            for amount in 1..=3 {
                let move_ = Move::new(face, amount).unwrap();
                assert_eq!(start.apply_move(&move_).apply_move(&move_.inverse()), start);
            }
        }
    }

    #[test]
    fn centers_never_move() {
        let cube = after("R U F' L2 D B' U2 R' F2 D'");
        for face in Face::ALL {
            assert_eq!(cube.center(face), Color::of_home_face(face));
        }
    }

    #[test]
    fn known_facelet_strings() {
        assert_eq!(
            after("R").to_facelets(),
            "UUFUUFUUFRRRRRRRRRFFDFFDFFDDDBDDBDDBLLLLLLLLLUBBUBBUBB"
        );
        assert_eq!(
            after("F").to_facelets(),
            "UUUUUULLLURRURRURRFFFFFFFFFRRRDDDDDDLLDLLDLLDBBBBBBBBB"
        );
        assert_eq!(
            after("U").to_facelets(),
            "UUUUUUUUUBBBRRRRRRRRRFFFFFFDDDDDDDDDFFFLLLLLLLLLBBBBBB"
        );
        assert_eq!(
            after("R U R' U'").to_facelets(),
            "UULUUFUUFRRUBRRURRFFDFFUFFFDDRDDDDDDBLLLLLLLLBRRBBBBBB"
        );
    }

    #[test]
    fn sexy_move_has_order_six() {
        let sexy = parse_scramble("R U R' U'");
        let mut cube = CubeFaces::solved();
        for i in 1..=6 {
            cube = cube.apply_moves(&sexy);
            assert_eq!(cube.is_solved(), i == 6);
        }
    }

    #[test]
    fn facelets_parse_back() {
        let cube = after("D2 R' F U2 B L'");
        assert_eq!(cube.to_facelets().parse::<CubeFaces>().unwrap(), cube);
        assert!(
            SOLVED_FACELETS
                .parse::<CubeFaces>()
                .unwrap()
                .is_solved()
        );
    }

    #[test]
    fn rejects_bad_facelets() {
        assert_eq!(
            CubeFaces::from_facelets("UUU"),
            Err(FaceletsError::InvalidLength(3))
        );

        let mut unknown = SOLVED_FACELETS.to_owned();
        unknown.replace_range(10..11, "X");
        assert_eq!(
            CubeFaces::from_facelets(&unknown),
            Err(FaceletsError::UnknownFacelet('X', 10))
        );

        let mut lopsided = SOLVED_FACELETS.to_owned();
        lopsided.replace_range(0..1, "R");
        assert_eq!(
            CubeFaces::from_facelets(&lopsided),
            Err(FaceletsError::WrongCount('U', 8))
        );

        let mut swapped = SOLVED_FACELETS.to_owned();
        swapped.replace_range(4..5, "R");
        swapped.replace_range(13..14, "U");
        assert_eq!(
            CubeFaces::from_facelets(&swapped),
            Err(FaceletsError::MisplacedCenter {
                face: Face::U,
                found: 'R'
            })
        );
    }

    #[test]
    fn clone_is_independent() {
        let cube = after("R");
        let copy = cube.clone();
        let turned = copy.apply_move(&m("U"));
        assert_eq!(copy, cube);
        assert_ne!(turned, cube);
    }

    #[test]
    fn serializes_with_serde() {
        let cube = after("F2 L");
        let json = serde_json::to_string(&cube).unwrap();
        assert_eq!(serde_json::from_str::<CubeFaces>(&json).unwrap(), cube);

        assert_eq!(serde_json::to_string(&Color::Orange).unwrap(), "\"O\"");
        assert_eq!(serde_json::from_str::<Color>("\"Y\"").unwrap(), Color::Yellow);
    }
}
