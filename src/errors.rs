use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Player with id `{0}` does not exist")]
    PlayerNotFound(i64),
    #[error("Competition with id `{0}` does not exist")]
    CompetitionNotFound(i64),
    #[error("Game with id `{0}` does not exist")]
    GameNotFound(i64),
    #[error("A value is required for `{0}`")]
    MissingValue(&'static str),
    #[error("Rating `{0}` is invalid, ratings cannot be negative")]
    NegativeRating(i64),
    #[error("Ply `{0}` is invalid, the first half-move is ply 1")]
    InvalidPly(u32),
    #[error("Move with ply `{ply}` must come after ply `{last}`")]
    MoveOutOfOrder { last: u32, ply: u32 },
    #[error("A player cannot play against themselves")]
    SamePlayer,
    #[error("Another player already uses the email `{0}`")]
    DuplicateEmail(String),
    #[error("Player with id `{0}` is already registered in this competition")]
    AlreadyRegistered(i64),
    #[error("Player with id `{0}` is not registered in this competition")]
    NotRegistered(i64),
    #[error("Cannot add moves to a finished game")]
    GameFinished,
    #[error("The result of this game was already recorded")]
    AlreadyDecided,
    #[error("Result `{0}` is invalid, possible values are: 1-0, 0-1 and 1/2-1/2")]
    InvalidResult(String),
    #[error("Unknown JSON Error")]
    JsonUnknownError,
    #[error("Missing JSON content-type header")]
    MissingContentType,
    #[error("JSON Syntax error: {0}")]
    JsonSyntaxError(String),
    #[error("Invalid JSON data")]
    JsonDataError,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn code(&self) -> String {
        match self {
            AppError::PlayerNotFound(_) => String::from("PlayerNotFound"),
            AppError::CompetitionNotFound(_) => String::from("CompetitionNotFound"),
            AppError::GameNotFound(_) => String::from("GameNotFound"),
            AppError::MissingValue(_) => String::from("MissingValue"),
            AppError::NegativeRating(_) => String::from("NegativeRating"),
            AppError::InvalidPly(_) => String::from("InvalidPly"),
            AppError::MoveOutOfOrder { last: _, ply: _ } => String::from("MoveOutOfOrder"),
            AppError::SamePlayer => String::from("SamePlayer"),
            AppError::DuplicateEmail(_) => String::from("DuplicateEmail"),
            AppError::AlreadyRegistered(_) => String::from("AlreadyRegistered"),
            AppError::NotRegistered(_) => String::from("NotRegistered"),
            AppError::GameFinished => String::from("GameFinished"),
            AppError::AlreadyDecided => String::from("AlreadyDecided"),
            AppError::InvalidResult(_) => String::from("InvalidResult"),
            AppError::JsonUnknownError => String::from("JsonUnknownError"),
            AppError::MissingContentType => String::from("MissingContentType"),
            AppError::JsonSyntaxError(_) => String::from("JsonSyntaxError"),
            AppError::JsonDataError => String::from("JsonDataError"),
            AppError::Database(_) => String::from("DatabaseError"),
        }
    }
}
