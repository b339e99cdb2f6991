use cube_core::{CubeFaces, Face, Move, format_moves, parse_scramble};
use pretty_assertions::assert_eq;

const SCRAMBLE: &str = "D2 F' R U2 B L' D R2 F2 U' L2 B' R D' F U2";

fn undo(moves: &[Move]) -> Vec<Move> {
    moves.iter().rev().map(Move::inverse).collect()
}

#[test_log::test]
fn every_face_turn_has_order_four() {
    let start = CubeFaces::solved().apply_moves(&parse_scramble(SCRAMBLE));

    for face in Face::ALL {
        let quarter = Move::new(face, 1).unwrap();
        let half = Move::new(face, 2).unwrap();

        let mut cube = start.clone();
        for _ in 0..4 {
            cube = cube.apply_move(&quarter);
        }
        assert_eq!(cube, start, "{face}");

        assert_eq!(
            start.apply_move(&half),
            start.apply_move(&quarter).apply_move(&quarter),
            "{face}"
        );
    }
}

#[test_log::test]
fn any_single_turn_unsolves() {
    for face in Face::ALL {
        for amount in 1..=3 {
            let move_ = Move::new(face, amount).unwrap();
            assert!(!CubeFaces::solved().apply_move(&move_).is_solved(), "{move_}");
            assert_eq!(move_.combine(&move_.inverse()), None);
        }
    }
}

#[test_log::test]
fn undoing_a_scramble() {
    let scramble = parse_scramble(SCRAMBLE);
    let scrambled = CubeFaces::solved().apply_moves(&scramble);

    assert!(!scrambled.is_solved());
    assert!(scrambled.apply_moves(&undo(&scramble)).is_solved());

    assert_eq!(
        format_moves(&undo(&parse_scramble("R U2 F'"))),
        "F U2 R'"
    );
}

#[test_log::test]
fn facelets_survive_a_scramble() {
    let scrambled = CubeFaces::solved().apply_moves(&parse_scramble(SCRAMBLE));

    let facelets = scrambled.to_facelets();

    assert_eq!(facelets.len(), 54);
    assert_eq!(facelets.parse::<CubeFaces>().unwrap(), scrambled);
}
