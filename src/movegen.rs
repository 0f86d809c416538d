use crate::board::{Board, Color, Piece, PieceKind, Square};

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (2, 1), (2, -1), (-2, 1), (-2, -1),
    (1, 2), (1, -2), (-1, 2), (-1, -2),
];

const KING_STEPS: [(i8, i8); 8] = [
    (1, 0), (-1, 0), (0, 1), (0, -1),
    (1, 1), (1, -1), (-1, 1), (-1, -1),
];

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

/// Pseudo-legal move rules. Stateless; every query works on the board it is given.
///
/// Moves that leave the mover's own king attacked are still generated.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Destinations for the piece on `square`.
    ///
    /// Empty when the square is off the board or empty, or when `respect_turn`
    /// is set and the piece does not belong to `side_to_move`.
    pub fn pseudo_legal_moves(
        &self,
        board: &Board,
        square: Square,
        side_to_move: Color,
        respect_turn: bool,
    ) -> Vec<Square> {
        let mut moves = Vec::new();
        if !square.is_on_board() {
            return moves;
        }
        let piece = match board.get(square) {
            Some(piece) => piece,
            None => return moves,
        };
        if respect_turn && piece.color != side_to_move {
            return moves;
        }

        match piece.kind {
            PieceKind::Pawn => self.add_pawn_moves(board, square, piece, &mut moves),
            PieceKind::Knight => self.add_step_moves(board, square, piece, &KNIGHT_JUMPS, &mut moves),
            PieceKind::Bishop => self.add_ray_moves(board, square, piece, &DIAGONALS, &mut moves),
            PieceKind::Rook => self.add_ray_moves(board, square, piece, &ORTHOGONALS, &mut moves),
            PieceKind::Queen => {
                self.add_ray_moves(board, square, piece, &ORTHOGONALS, &mut moves);
                self.add_ray_moves(board, square, piece, &DIAGONALS, &mut moves);
            }
            PieceKind::King => self.add_step_moves(board, square, piece, &KING_STEPS, &mut moves),
        }
        moves
    }

    /// Every pseudo-legal move available to `side`.
    pub fn generate_moves(&self, board: &Board, side: Color) -> Vec<Move> {
        board
            .pieces()
            .filter(|(_, piece)| piece.color == side)
            .flat_map(|(from, _)| {
                self.pseudo_legal_moves(board, from, side, true)
                    .into_iter()
                    .map(move |to| Move::new(from, to))
            })
            .collect()
    }

    /// True if `mv` moves one of `side`'s pieces to a square it can reach.
    pub fn is_move_valid(&self, board: &Board, side: Color, mv: &Move) -> bool {
        self.pseudo_legal_moves(board, mv.from, side, true)
            .contains(&mv.to)
    }

    fn add_pawn_moves(&self, board: &Board, from: Square, pawn: Piece, moves: &mut Vec<Square>) {
        let (direction, start_row) = match pawn.color {
            Color::White => (-1, 6),
            Color::Black => (1, 1),
        };

        // Single push, then the double push only once the first square is known empty
        if let Some(one) = from.offset(direction, 0) {
            if board.get(one).is_none() {
                moves.push(one);
                if from.row == start_row {
                    if let Some(two) = from.offset(2 * direction, 0) {
                        if board.get(two).is_none() {
                            moves.push(two);
                        }
                    }
                }
            }
        }

        for dc in [-1, 1] {
            if let Some(target) = from.offset(direction, dc) {
                if is_enemy(board.get(target), pawn.color) {
                    moves.push(target);
                }
            }
        }
    }

    fn add_step_moves(
        &self,
        board: &Board,
        from: Square,
        piece: Piece,
        steps: &[(i8, i8)],
        moves: &mut Vec<Square>,
    ) {
        for &(dr, dc) in steps {
            if let Some(target) = from.offset(dr, dc) {
                let occupant = board.get(target);
                if occupant.is_none() || is_enemy(occupant, piece.color) {
                    moves.push(target);
                }
            }
        }
    }

    fn add_ray_moves(
        &self,
        board: &Board,
        from: Square,
        piece: Piece,
        directions: &[(i8, i8)],
        moves: &mut Vec<Square>,
    ) {
        for &(dr, dc) in directions {
            let mut current = from;
            while let Some(target) = current.offset(dr, dc) {
                match board.get(target) {
                    None => moves.push(target),
                    occupant => {
                        if is_enemy(occupant, piece.color) {
                            moves.push(target);
                        }
                        break;
                    }
                }
                current = target;
            }
        }
    }
}

fn is_enemy(occupant: Option<Piece>, color: Color) -> bool {
    matches!(occupant, Some(p) if p.color != color)
}
