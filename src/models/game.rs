use std::fmt::Display;

use chrono::{DateTime, Utc};

use crate::errors::AppError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    NotPlayed,
    WhiteWin,
    BlackWin,
    Draw,
}

impl GameResult {
    pub fn from_str<S: AsRef<str>>(str: S) -> Self {
        match str.as_ref().trim() {
            "1-0" => Self::WhiteWin,
            "1 - 0" => Self::WhiteWin,
            "0-1" => Self::BlackWin,
            "0 - 1" => Self::BlackWin,
            "1/2-1/2" => Self::Draw,
            "1/2 - 1/2" => Self::Draw,
            "½-½" => Self::Draw,
            "½ - ½" => Self::Draw,
            _ => Self::NotPlayed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::NotPlayed)
    }
}

impl TryFrom<&str> for GameResult {
    type Error = AppError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "1-0" => Ok(Self::WhiteWin),
            "0-1" => Ok(Self::BlackWin),
            "1/2-1/2" => Ok(Self::Draw),
            "½-½" => Ok(Self::Draw),
            "*" => Ok(Self::NotPlayed),
            _ => Err(AppError::InvalidResult(value.to_owned())),
        }
    }
}

impl Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameResult::NotPlayed => write!(f, "*"),
            GameResult::WhiteWin => write!(f, "1-0"),
            GameResult::BlackWin => write!(f, "0-1"),
            GameResult::Draw => write!(f, "1/2-1/2"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub ply: u32,
    pub notation: String,
    pub played_at: DateTime<Utc>,
}

impl Move {
    pub fn new(ply: u32, notation: &str) -> Result<Self, AppError> {
        if ply < 1 {
            return Err(AppError::InvalidPly(ply));
        }
        let notation = notation.trim();
        if notation.is_empty() {
            return Err(AppError::MissingValue("notation"));
        }
        Ok(Self {
            ply,
            notation: notation.to_owned(),
            played_at: Utc::now(),
        })
    }

    pub fn restore(ply: u32, notation: String, played_at: DateTime<Utc>) -> Self {
        Self {
            ply,
            notation,
            played_at,
        }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.ply, self.notation)
    }
}

#[derive(Debug)]
pub struct Game {
    pub id: i64,
    pub competition_id: i64,
    pub white_id: i64,
    pub black_id: i64,
    result: GameResult,
    moves: Vec<Move>,
}

impl Game {
    // Hydration from storage: the move list is already ply-ordered and the
    // result already validated, so no per-element checks here.
    pub fn restore(
        id: i64,
        competition_id: i64,
        white_id: i64,
        black_id: i64,
        result: GameResult,
        moves: Vec<Move>,
    ) -> Self {
        Self {
            id,
            competition_id,
            white_id,
            black_id,
            result,
            moves,
        }
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_terminal()
    }

    pub fn add_move(&mut self, mv: Move) -> Result<(), AppError> {
        if self.is_finished() {
            return Err(AppError::GameFinished);
        }
        if let Some(last) = self.moves.last() {
            if mv.ply <= last.ply {
                return Err(AppError::MoveOutOfOrder {
                    last: last.ply,
                    ply: mv.ply,
                });
            }
        }
        self.moves.push(mv);
        Ok(())
    }

    pub fn set_result(&mut self, result: GameResult) -> Result<(), AppError> {
        if !result.is_terminal() {
            return Err(AppError::InvalidResult(result.to_string()));
        }
        if self.is_finished() {
            return Err(AppError::AlreadyDecided);
        }
        self.result = result;
        Ok(())
    }
}
