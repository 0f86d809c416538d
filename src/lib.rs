pub mod board;
pub mod check;
pub mod console;
pub mod fen;
pub mod game;
pub mod movegen;
