//! Which facelets belong to the same physical piece

use crate::moves::Face;

/// A facelet, named by the face it is on and its index within that face
pub type Sticker = (Face, usize);

pub const EDGES: [[Sticker; 2]; 12] = [
    [(Face::U, 7), (Face::F, 1)],
    [(Face::U, 5), (Face::R, 1)],
    [(Face::U, 1), (Face::B, 1)],
    [(Face::U, 3), (Face::L, 1)],
    [(Face::D, 1), (Face::F, 7)],
    [(Face::D, 5), (Face::R, 7)],
    [(Face::D, 7), (Face::B, 7)],
    [(Face::D, 3), (Face::L, 7)],
    [(Face::F, 5), (Face::R, 3)],
    [(Face::F, 3), (Face::L, 5)],
    [(Face::B, 3), (Face::R, 5)],
    [(Face::B, 5), (Face::L, 3)],
];

pub const CORNERS: [[Sticker; 3]; 8] = [
    [(Face::U, 6), (Face::F, 0), (Face::L, 2)],
    [(Face::U, 8), (Face::F, 2), (Face::R, 0)],
    [(Face::U, 2), (Face::B, 0), (Face::R, 2)],
    [(Face::U, 0), (Face::B, 2), (Face::L, 0)],
    [(Face::D, 0), (Face::F, 6), (Face::L, 8)],
    [(Face::D, 2), (Face::F, 8), (Face::R, 6)],
    [(Face::D, 8), (Face::B, 6), (Face::R, 8)],
    [(Face::D, 6), (Face::B, 8), (Face::L, 6)],
];

fn touches(stickers: &[Sticker], face: Face) -> bool {
    stickers.iter().any(|&(on, _)| on == face)
}

/// The four edges with a sticker on `face`
pub fn edges_of(face: Face) -> impl Iterator<Item = &'static [Sticker; 2]> {
    EDGES.iter().filter(move |edge| touches(*edge, face))
}

/// The four corners with a sticker on `face`
pub fn corners_of(face: Face) -> impl Iterator<Item = &'static [Sticker; 3]> {
    CORNERS.iter().filter(move |corner| touches(*corner, face))
}

/// The edge sitting between two adjacent faces
#[must_use]
pub fn edge_between(a: Face, b: Face) -> Option<&'static [Sticker; 2]> {
    EDGES
        .iter()
        .find(|edge| touches(*edge, a) && touches(*edge, b))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{CORNERS, EDGES, corners_of, edge_between, edges_of};
    use crate::{
        faces::CubeFaces,
        moves::{Face, Move},
    };

    #[test]
    fn every_non_center_sticker_is_on_one_piece() {
        let mut seen = HashSet::new();

        for sticker in EDGES.iter().flatten().chain(CORNERS.iter().flatten()) {
            assert_ne!(sticker.1, 4);
            assert!(seen.insert(*sticker), "{sticker:?} appears twice");
        }

        assert_eq!(seen.len(), 48);
    }

    #[test]
    fn four_of_each_per_face() {
        for face in Face::ALL {
            assert_eq!(edges_of(face).count(), 4);
            assert_eq!(corners_of(face).count(), 4);
            assert!(edge_between(face, face.opposite()).is_none());
        }

        assert_eq!(
            edge_between(Face::F, Face::R),
            Some(&[(Face::F, 5), (Face::R, 3)])
        );
    }

    #[test]
    fn a_turn_only_disturbs_its_own_layer() {
        for face in Face::ALL {
            let cube = CubeFaces::solved().apply_move(&Move::new(face, 1).unwrap());

            for edge in &EDGES {
                let in_layer = edge.iter().any(|&(on, _)| on == face);
                assert_eq!(cube.stickers_solved(edge), !in_layer, "{face} {edge:?}");
            }

            for corner in &CORNERS {
                let in_layer = corner.iter().any(|&(on, _)| on == face);
                assert_eq!(cube.stickers_solved(corner), !in_layer, "{face} {corner:?}");
            }
        }
    }
}
