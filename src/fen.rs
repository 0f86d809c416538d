//! FEN placement codec.
//!
//! Only the placement and side-to-move fields carry information. Castling
//! rights, en passant target and the move clocks are written as the fixed
//! placeholder `- - 0 1` and ignored on input.

use crate::board::{Board, Color, Piece, Square};
use thiserror::Error;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1";

const PLACEHOLDER_FIELDS: &str = "- - 0 1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("placement must have 8 ranks separated by '/', found {0}")]
    RowCount(usize),
    #[error("invalid empty-square count '{0}'")]
    InvalidDigit(char),
    #[error("rank {row} has more than 8 columns")]
    RowOverflow { row: usize },
    #[error("rank {row} covers {columns} columns instead of 8")]
    RowIncomplete { row: usize, columns: usize },
    #[error("unknown symbol '{0}'")]
    UnknownSymbol(char),
    #[error("board holds a piece with no FEN letter")]
    UnknownPiece,
}

/// Parse a FEN string into a board and the side to move.
///
/// Only the literal side field `w` selects White. A missing or unrecognised
/// side field yields Black.
pub fn parse(fen: &str) -> Result<(Board, Color), FenError> {
    let mut fields = fen.split(' ');
    let placement = fields.next().unwrap_or_default();
    let side_to_move = match fields.next() {
        Some("w") => Color::White,
        _ => Color::Black,
    };

    let board = parse_placement(placement)?;
    Ok((board, side_to_move))
}

/// Parse just the placement field (`rnbqkbnr/pppppppp/...`).
pub fn parse_placement(placement: &str) -> Result<Board, FenError> {
    let mut ranks: Vec<&str> = placement.split('/').collect();
    // Trailing empty fields are ignored, so "8/8/8/8/8/8/8/8/" is accepted
    while ranks.len() > 1 && ranks.last() == Some(&"") {
        ranks.pop();
    }
    if ranks.len() != 8 {
        return Err(FenError::RowCount(ranks.len()));
    }

    let mut board = Board::empty();
    for (row, rank) in ranks.iter().enumerate() {
        let mut col = 0usize;
        for c in rank.chars() {
            if let Some(count) = c.to_digit(10) {
                let count = count as usize;
                if col + count > 8 {
                    return Err(FenError::RowOverflow { row: row + 1 });
                }
                if count == 0 {
                    return Err(FenError::InvalidDigit(c));
                }
                col += count;
            } else if let Some(piece) = Piece::from_fen_char(c) {
                if col >= 8 {
                    return Err(FenError::RowOverflow { row: row + 1 });
                }
                board.set(Square::new(row as u8, col as u8), Some(piece));
                col += 1;
            } else {
                return Err(FenError::UnknownSymbol(c));
            }
        }

        if col != 8 {
            return Err(FenError::RowIncomplete {
                row: row + 1,
                columns: col,
            });
        }
    }

    Ok(board)
}

/// Serialize a board and side to move as `<placement> <w|b> - - 0 1`.
pub fn serialize(board: &Board, side_to_move: Color) -> String {
    let mut fen = placement(board);
    fen.push(' ');
    fen.push(match side_to_move {
        Color::White => 'w',
        Color::Black => 'b',
    });
    fen.push(' ');
    fen.push_str(PLACEHOLDER_FIELDS);
    fen
}

/// The placement field alone, ranks 8 down to 1.
pub fn placement(board: &Board) -> String {
    let mut result = String::with_capacity(72);
    for row in 0..8 {
        let mut empty = 0;
        for cell in board.row(row) {
            match cell {
                Some(piece) => {
                    if empty > 0 {
                        result.push_str(&empty.to_string());
                        empty = 0;
                    }
                    result.push(piece.to_fen_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            result.push_str(&empty.to_string());
        }
        if row < 7 {
            result.push('/');
        }
    }
    result
}
