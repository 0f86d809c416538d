use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    pub fn to_fen_char(&self) -> char {
        let c = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_fen_char(c: char) -> Option<Piece> {
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(color, kind))
    }

    /// Unicode chess symbol, for display only.
    pub fn glyph(&self) -> char {
        match (self.color, self.kind) {
            (Color::White, PieceKind::King) => '♔',
            (Color::White, PieceKind::Queen) => '♕',
            (Color::White, PieceKind::Rook) => '♖',
            (Color::White, PieceKind::Bishop) => '♗',
            (Color::White, PieceKind::Knight) => '♘',
            (Color::White, PieceKind::Pawn) => '♙',
            (Color::Black, PieceKind::King) => '♚',
            (Color::Black, PieceKind::Queen) => '♛',
            (Color::Black, PieceKind::Rook) => '♜',
            (Color::Black, PieceKind::Bishop) => '♝',
            (Color::Black, PieceKind::Knight) => '♞',
            (Color::Black, PieceKind::Pawn) => '♟',
        }
    }
}

/// A board cell. Row 0 is rank 8 (top of the diagram), row 7 is rank 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Offset this square by a (row, col) delta, or `None` if it leaves the board.
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Square> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if Board::is_in_bounds(row, col) {
            Some(Square::new(row as u8, col as u8))
        } else {
            None
        }
    }

    pub fn is_on_board(&self) -> bool {
        self.row < 8 && self.col < 8
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square::new(row, col)))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.is_on_board() {
            return write!(f, "({}, {})", self.row, self.col);
        }
        let file = (b'a' + self.col) as char;
        let rank = (b'8' - self.row) as char;
        write!(f, "{}{}", file, rank)
    }
}

impl FromStr for Square {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file, rank),
            _ => return Err(format!("invalid square '{}'", s)),
        };

        let col = match file.to_ascii_lowercase() {
            f @ 'a'..='h' => f as u8 - b'a',
            _ => return Err(format!("invalid file '{}'", file)),
        };
        let row = match rank {
            r @ '1'..='8' => b'8' - r as u8,
            _ => return Err(format!("invalid rank '{}'", rank)),
        };

        Ok(Square::new(row, col))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    pub fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
        }
    }

    /// Standard starting layout. Side to move is tracked by the caller (White).
    pub fn initial() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Board::empty();
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            board.squares[0][col] = Some(Piece::new(Color::Black, kind));
            board.squares[1][col] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            board.squares[6][col] = Some(Piece::new(Color::White, PieceKind::Pawn));
            board.squares[7][col] = Some(Piece::new(Color::White, kind));
        }
        board
    }

    pub fn get(&self, square: Square) -> Option<Piece> {
        self.squares[square.row as usize][square.col as usize]
    }

    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.row as usize][square.col as usize] = piece;
    }

    pub fn is_in_bounds(row: i8, col: i8) -> bool {
        (0..8).contains(&row) && (0..8).contains(&col)
    }

    /// First square (row-major) holding `color`'s king.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        let king = Piece::new(color, PieceKind::King);
        Square::all().find(|&sq| self.get(sq) == Some(king))
    }

    /// Occupied squares with their pieces, in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }

    /// The cells of `row`, left to right.
    pub fn row(&self, row: usize) -> &[Option<Piece>; 8] {
        &self.squares[row]
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::initial()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut result = String::new();
        for row in self.squares.iter() {
            for (col, cell) in row.iter().enumerate() {
                match cell {
                    Some(piece) => result.push(piece.to_fen_char()),
                    None => result.push('.'),
                }
                if col < 7 {
                    result.push(' ');
                }
            }
            result.push('\n');
        }
        write!(f, "{}", result)
    }
}
