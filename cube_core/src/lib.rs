#![warn(clippy::pedantic)]
#![allow(
    clippy::too_many_lines,
    clippy::similar_names,
    clippy::missing_panics_doc
)]

pub mod faces;
pub mod moves;
pub mod pieces;

pub use faces::{Color, CubeFaces, FaceletsError, SOLVED_FACELETS};
pub use moves::{Face, Move, ParseMoveError, format_moves, parse_scramble};
