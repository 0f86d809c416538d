use crate::board::{Board, Color};
use crate::movegen::MoveGenerator;

/// Whether `side`'s king is attacked by any enemy pseudo-legal move.
///
/// A board without that king is never in check.
pub fn is_in_check(board: &Board, side: Color) -> bool {
    let king_square = match board.find_king(side) {
        Some(square) => square,
        None => return false,
    };

    let generator = MoveGenerator::new();
    board
        .pieces()
        .filter(|(_, piece)| piece.color != side)
        .any(|(from, piece)| {
            generator
                .pseudo_legal_moves(board, from, piece.color, false)
                .contains(&king_square)
        })
}
