use crate::board::{Board, Color, Piece, Square};
use crate::fen::{self, FenError};
use log::{debug, info, warn};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("no history entry {index} (history has {len} entries)")]
    HistoryIndex { index: usize, len: usize },
    #[error(transparent)]
    Fen(#[from] FenError),
}

/// The position being played plus the FEN log of every position reached.
///
/// History always holds at least the current position and only ever grows,
/// except on `reset`.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    side_to_move: Color,
    history: Vec<String>,
}

impl GameState {
    pub fn new() -> Self {
        let mut state = Self {
            board: Board::initial(),
            side_to_move: Color::White,
            history: Vec::new(),
        };
        state.reset();
        state
    }

    /// A game starting from `fen`, with `fen` as the only history entry.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let (board, side_to_move) = fen::parse(fen)?;
        Ok(Self {
            board,
            side_to_move,
            history: vec![fen.to_string()],
        })
    }

    pub fn reset(&mut self) {
        self.board = Board::initial();
        self.side_to_move = Color::White;
        self.history.clear();
        self.history.push(fen::serialize(&self.board, self.side_to_move));
        info!("board reset to the starting position");
    }

    /// Replace the position with `fen`. The input string is logged verbatim.
    ///
    /// On error nothing changes.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let (board, side_to_move) = fen::parse(fen).map_err(|e| {
            warn!("rejected FEN '{}': {}", fen, e);
            e
        })?;

        self.board = board;
        self.side_to_move = side_to_move;
        self.history.push(fen.to_string());
        info!("loaded FEN '{}', {} to move", fen, side_to_move);
        Ok(())
    }

    /// Load the history entry at `index` (0 is the oldest) as a new position.
    pub fn revisit(&mut self, index: usize) -> Result<(), GameError> {
        let fen = self
            .history
            .get(index)
            .cloned()
            .ok_or(GameError::HistoryIndex {
                index,
                len: self.history.len(),
            })?;
        self.load_fen(&fen)?;
        Ok(())
    }

    /// Move whatever stands on `from` to `to`, flip the turn and log the new FEN.
    ///
    /// No legality check happens here; callers validate against
    /// `MoveGenerator::pseudo_legal_moves` first. Returns the captured piece.
    pub fn apply_move(&mut self, from: Square, to: Square) -> Option<Piece> {
        let moving = self.board.get(from);
        let captured = self.board.get(to);
        self.board.set(to, moving);
        self.board.set(from, None);
        self.side_to_move = self.side_to_move.opposite();
        self.history.push(fen::serialize(&self.board, self.side_to_move));

        debug!("applied {}{} (captured {:?})", from, to, captured);
        captured
    }

    pub fn current_board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}
