use crate::board::{Board, PieceKind, Square};
use crate::check::is_in_check;
use crate::game::GameState;
use crate::movegen::{Move, MoveGenerator};
use anyhow::{anyhow, Result};
use log::{debug, warn};
use std::io::{self, BufRead, Write};

const HELP: &str = "\
Commands:
  board                 show the board
  select <square>       show where the piece on <square> can move
  move <from> <to>      move a piece, e.g. 'move e2 e4'
  check                 tell whether the side to move is in check
  fen <FEN>             load a position
  reset                 back to the starting position
  history               list every position reached
  load <n>              load entry <n> of the history
  help                  this text
  quit                  leave
";

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Draw pieces with chess glyphs instead of FEN letters.
    pub unicode: bool,
    /// Label files and ranks around the diagram.
    pub coordinates: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            unicode: false,
            coordinates: true,
        }
    }
}

struct Selection {
    from: Square,
    targets: Vec<Square>,
}

/// Text front end: reads commands, drives `GameState` and prints the results.
pub struct ConsoleHandler {
    game: GameState,
    move_generator: MoveGenerator,
    config: ConsoleConfig,
    selection: Option<Selection>,
}

impl ConsoleHandler {
    pub fn new(config: ConsoleConfig) -> Self {
        ConsoleHandler {
            game: GameState::new(),
            move_generator: MoveGenerator::new(),
            config,
            selection: None,
        }
    }

    pub fn with_game(game: GameState, config: ConsoleConfig) -> Self {
        ConsoleHandler {
            game,
            move_generator: MoveGenerator::new(),
            config,
            selection: None,
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut reader = stdin.lock();
        let mut line = String::new();

        print!("{}", self.render());
        stdout.flush()?;

        while reader.read_line(&mut line)? > 0 {
            let command = line.trim();
            if command == "quit" {
                break;
            }

            let response = self.handle_command(command)?;
            print!("{}", response);
            stdout.flush()?;
            line.clear();
        }
        Ok(())
    }

    pub fn handle_command(&mut self, command: &str) -> Result<String> {
        let parts: Vec<&str> = command.split_whitespace().collect();
        if parts.is_empty() {
            return Ok("".to_string());
        }

        let response = match parts[0] {
            "board" => Ok(self.render()),
            "select" => self.handle_select(&parts[1..]),
            "move" => self.handle_move(&parts[1..]),
            "check" => Ok(self.handle_check()),
            "fen" => Ok(self.handle_fen(command)),
            "reset" => Ok(self.handle_reset()),
            "history" => Ok(self.handle_history()),
            "load" => self.handle_load(&parts[1..]),
            "help" => Ok(HELP.to_string()),
            "quit" => Ok("".to_string()),
            other => Ok(format!(
                "Unknown command '{}'. Type 'help' for the list of commands.\n",
                other
            )),
        };

        // Bad arguments are reported to the user, not propagated.
        Ok(response.unwrap_or_else(|e| format!("{}\n", e)))
    }

    fn handle_select(&mut self, args: &[&str]) -> Result<String> {
        let from = parse_square(args.first())?;
        let board = self.game.current_board();
        let side = self.game.side_to_move();

        let piece = match board.get(from) {
            Some(piece) => piece,
            None => {
                self.selection = None;
                return Ok(format!("No piece on {}.\n", from));
            }
        };
        if piece.color != side {
            self.selection = None;
            return Ok(format!("It is {}'s turn.\n", side));
        }

        let mut out = String::new();
        if is_in_check(board, side) {
            out.push_str(&format!("{} is in check.\n", side));
        }

        let targets = self.move_generator.pseudo_legal_moves(board, from, side, true);
        debug!("{} on {} can reach {} squares", piece.to_fen_char(), from, targets.len());
        if targets.is_empty() {
            out.push_str(&format!("The piece on {} has no moves.\n", from));
        } else {
            let list: Vec<String> = targets.iter().map(|sq| sq.to_string()).collect();
            out.push_str(&format!("Moves from {}: {}\n", from, list.join(" ")));
        }

        self.selection = Some(Selection { from, targets });
        out.push_str(&self.render());
        Ok(out)
    }

    fn handle_move(&mut self, args: &[&str]) -> Result<String> {
        let from = parse_square(args.first())?;
        let to = parse_square(args.get(1))?;
        let mover = self.game.side_to_move();
        let mv = Move::new(from, to);
        self.selection = None;

        if !self
            .move_generator
            .is_move_valid(self.game.current_board(), mover, &mv)
        {
            warn!("rejected move {}{} for {}", from, to, mover);
            return Ok(format!("Illegal move {} {}.\n", from, to));
        }

        let mut out = String::new();
        let captured = self.game.apply_move(from, to);
        if matches!(captured, Some(p) if p.kind == PieceKind::King) {
            out.push_str(&format!("Checkmate! {} wins.\n", mover));
        }
        let next = self.game.side_to_move();
        if is_in_check(self.game.current_board(), next) {
            out.push_str(&format!("{} is in check.\n", next));
        }
        out.push_str(&self.render());
        Ok(out)
    }

    fn handle_check(&self) -> String {
        let side = self.game.side_to_move();
        if is_in_check(self.game.current_board(), side) {
            format!("{} is in check.\n", side)
        } else {
            format!("{} is not in check.\n", side)
        }
    }

    fn handle_fen(&mut self, command: &str) -> String {
        let fen = command
            .trim_start()
            .strip_prefix("fen")
            .unwrap_or_default()
            .trim();
        if fen.is_empty() {
            return "Usage: fen <FEN>\n".to_string();
        }

        // A loaded position starts a fresh history
        match GameState::from_fen(fen) {
            Ok(game) => {
                self.selection = None;
                self.game = game;
                self.render()
            }
            Err(e) => {
                warn!("rejected FEN '{}': {}", fen, e);
                format!("Error loading FEN: {}\n", e)
            }
        }
    }

    fn handle_reset(&mut self) -> String {
        self.selection = None;
        self.game.reset();
        self.render()
    }

    fn handle_history(&self) -> String {
        let mut out = String::new();
        for (i, fen) in self.game.history().iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, fen));
        }
        out
    }

    fn handle_load(&mut self, args: &[&str]) -> Result<String> {
        let n: usize = args
            .first()
            .and_then(|s| s.parse().ok())
            .filter(|&n| n > 0)
            .ok_or_else(|| anyhow!("Usage: load <n>, with n counted from 1"))?;

        self.selection = None;
        match self.game.revisit(n - 1) {
            Ok(()) => Ok(self.render()),
            Err(e) => Ok(format!("Error loading position: {}\n", e)),
        }
    }

    /// Diagram of the current position, marking the selected piece's targets.
    pub fn render(&self) -> String {
        let board: &Board = self.game.current_board();
        let targets: &[Square] = self
            .selection
            .as_ref()
            .map(|s| s.targets.as_slice())
            .unwrap_or(&[]);

        let mut result = String::new();
        for row in 0..8u8 {
            if self.config.coordinates {
                result.push((b'8' - row) as char);
                result.push(' ');
            }
            for col in 0..8u8 {
                let square = Square::new(row, col);
                let cell = match board.get(square) {
                    Some(piece) if self.config.unicode => piece.glyph(),
                    Some(piece) => piece.to_fen_char(),
                    None if targets.contains(&square) => '*',
                    None => '.',
                };
                result.push(cell);
                if col < 7 {
                    result.push(' ');
                }
            }
            result.push('\n');
        }
        if self.config.coordinates {
            result.push_str("  a b c d e f g h\n");
        }
        if let Some(selection) = &self.selection {
            result.push_str(&format!("Selected: {}\n", selection.from));
        }
        result.push_str(&format!("{} to move\n", self.game.side_to_move()));
        result
    }
}

fn parse_square(arg: Option<&&str>) -> Result<Square> {
    let text = arg.ok_or_else(|| anyhow!("Missing square, expected something like 'e2'"))?;
    text.parse::<Square>().map_err(|e| anyhow!(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Color, Piece};
    use crate::fen;

    fn console() -> ConsoleHandler {
        ConsoleHandler::new(ConsoleConfig::default())
    }

    #[test]
    fn test_initial_render() {
        let handler = console();
        let out = handler.render();
        assert!(out.starts_with("8 r n b q k b n r\n"));
        assert!(out.contains("1 R N B Q K B N R\n"));
        assert!(out.ends_with("White to move\n"));
    }

    #[test]
    fn test_unicode_render_without_coordinates() {
        let handler = ConsoleHandler::new(ConsoleConfig {
            unicode: true,
            coordinates: false,
        });
        let out = handler.render();
        assert!(out.starts_with("♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜\n"));
        assert!(!out.contains("a b c"));
    }

    #[test]
    fn test_select_lists_targets() {
        let mut handler = console();
        let out = handler.handle_command("select e2").unwrap();
        assert!(out.contains("Moves from e2: e3 e4"));
        // e3 and e4 are highlighted on the diagram
        assert!(out.contains("4 . . . . * . . .\n"));
        assert!(out.contains("3 . . . . * . . .\n"));
    }

    #[test]
    fn test_select_wrong_turn_and_empty() {
        let mut handler = console();
        let out = handler.handle_command("select e7").unwrap();
        assert_eq!(out, "It is White's turn.\n");
        let out = handler.handle_command("select e4").unwrap();
        assert_eq!(out, "No piece on e4.\n");
    }

    #[test]
    fn test_move_applies_and_flips_turn() {
        let mut handler = console();
        let out = handler.handle_command("move e2 e4").unwrap();
        assert!(out.ends_with("Black to move\n"));
        assert_eq!(handler.game().history().len(), 2);
        assert_eq!(
            handler.game().history()[1],
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b - - 0 1"
        );
    }

    #[test]
    fn test_illegal_move_is_rejected() {
        let mut handler = console();
        let out = handler.handle_command("move e2 e5").unwrap();
        assert_eq!(out, "Illegal move e2 e5.\n");
        assert_eq!(handler.game().history().len(), 1);
        assert_eq!(handler.game().side_to_move(), Color::White);
    }

    #[test]
    fn test_bad_square_reports_error() {
        let mut handler = console();
        let out = handler.handle_command("move z9 e4").unwrap();
        assert!(out.contains("invalid"));
        let out = handler.handle_command("select").unwrap();
        assert!(out.starts_with("Missing square"));
    }

    #[test]
    fn test_king_capture_announced() {
        let mut handler = console();
        handler
            .handle_command("fen 4k3/8/8/8/8/8/8/4R1K1 w - - 0 1")
            .unwrap();
        let out = handler.handle_command("check").unwrap();
        assert_eq!(out, "White is not in check.\n");

        let out = handler.handle_command("move e1 e8").unwrap();
        assert!(out.starts_with("Checkmate! White wins.\n"));
        assert_eq!(handler.game().current_board().find_king(Color::Black), None);
    }

    #[test]
    fn test_check_warning_on_select() {
        let mut handler = console();
        handler
            .handle_command("fen 4k3/8/8/8/8/8/8/4R1K1 b - - 0 1")
            .unwrap();
        let out = handler.handle_command("select e8").unwrap();
        assert!(out.starts_with("Black is in check.\n"));
    }

    #[test]
    fn test_fen_error_leaves_state() {
        let mut handler = console();
        let out = handler.handle_command("fen 8/8/8 w - - 0 1").unwrap();
        assert!(out.starts_with("Error loading FEN:"));
        assert_eq!(handler.game().history().len(), 1);
        assert_eq!(*handler.game().current_board(), Board::initial());
    }

    #[test]
    fn test_fen_starts_fresh_history() {
        let mut handler = console();
        handler.handle_command("move e2 e4").unwrap();
        assert_eq!(handler.game().history().len(), 2);

        let fen = "4k3/8/8/8/8/8/8/4K3 b - - 0 1";
        let out = handler.handle_command(&format!("fen {}", fen)).unwrap();
        assert!(out.ends_with("Black to move\n"));
        assert_eq!(handler.game().history(), [fen.to_string()]);

        handler.handle_command("move e8 d8").unwrap();
        let out = handler.handle_command("history").unwrap();
        assert_eq!(out.lines().count(), 2);
        assert!(out.starts_with(&format!("1. {}\n", fen)));
    }

    #[test]
    fn test_history_and_load() {
        let mut handler = console();
        handler.handle_command("move e2 e4").unwrap();
        handler.handle_command("move e7 e5").unwrap();

        let out = handler.handle_command("history").unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], format!("1. {}", fen::START_FEN));

        handler.handle_command("load 1").unwrap();
        assert_eq!(handler.game().history().len(), 4);
        assert_eq!(*handler.game().current_board(), Board::initial());
        assert_eq!(handler.game().side_to_move(), Color::White);

        let out = handler.handle_command("load 9").unwrap();
        assert!(out.starts_with("Error loading position"));
        let out = handler.handle_command("load 0").unwrap();
        assert!(out.starts_with("Usage: load"));
    }

    #[test]
    fn test_reset_clears_history() {
        let mut handler = console();
        handler.handle_command("move g1 f3").unwrap();
        handler.handle_command("reset").unwrap();
        assert_eq!(handler.game().history(), [fen::START_FEN.to_string()]);
        assert_eq!(
            handler.game().current_board().get(Square::new(7, 6)),
            Some(Piece::new(Color::White, PieceKind::Knight))
        );
    }

    #[test]
    fn test_unknown_command() {
        let mut handler = console();
        let out = handler.handle_command("castle").unwrap();
        assert!(out.starts_with("Unknown command 'castle'"));
        assert_eq!(handler.handle_command("   ").unwrap(), "");
    }
}
