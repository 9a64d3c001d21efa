use axum::{
    Json as AxumJson,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    errors::AppError,
    repositories::{
        competition_repo::DbCompetition,
        game_repo::{DbGame, DbMove},
        player_repo::DbPlayer,
    },
    services::{
        competition_service::CompetitionDbData,
        game_service::{GameDbData, RatingChange},
    },
};

#[derive(Debug, Serialize)]
#[serde(tag = "status")]
#[serde(rename_all = "camelCase")]
pub enum AppResponse {
    Error { error: ErrorResponse },
    Success { payload: SuccessResponse },
}

pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    AxumJson<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(json) => Ok(Json(json.0)),
            Err(rej) => match rej {
                JsonRejection::JsonDataError(_) => Err(AppError::JsonDataError),
                JsonRejection::JsonSyntaxError(e) => Err(AppError::JsonSyntaxError(e.to_string())),
                JsonRejection::MissingJsonContentType(_) => Err(AppError::MissingContentType),
                _ => Err(AppError::JsonUnknownError),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing)]
    pub status_code: StatusCode,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationItem {
    player_id: i64,
    registered_at: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMove {
    ply: u32,
    notation: String,
    played_at: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[serde(rename_all_fields = "camelCase")]
#[serde(tag = "type")]
pub enum SuccessResponse {
    PlayerCreated {
        player: DbPlayer,
    },
    PlayerData {
        player: DbPlayer,
    },
    PlayerUpdated {
        player: DbPlayer,
    },
    PlayerList {
        players: Vec<DbPlayer>,
    },
    Leaderboard {
        players: Vec<DbPlayer>,
    },
    PlayerDeleted {
        id: i64,
    },
    CompetitionCreated {
        id: i64,
    },
    CompetitionList {
        competitions: Vec<DbCompetition>,
    },
    CompetitionData {
        id: i64,
        name: String,
        location: String,
        start_date: NaiveDate,
        registrations: Vec<RegistrationItem>,
        players: Vec<DbPlayer>,
    },
    CompetitionDeleted {
        id: i64,
    },
    PlayerRegistered {
        competition_id: i64,
        player_id: i64,
    },
    PlayerUnregistered {
        competition_id: i64,
        player_id: i64,
    },
    GameCreated {
        id: i64,
    },
    GameList {
        games: Vec<DbGame>,
    },
    GameData {
        id: i64,
        competition_id: i64,
        white_id: i64,
        black_id: i64,
        result: String,
        moves: Vec<GameMove>,
    },
    GameDeleted {
        id: i64,
    },
    MoveAdded {
        game_id: i64,
        ply: u32,
        notation: String,
    },
    ResultRecorded {
        game_id: i64,
        result: String,
        white_id: i64,
        white_rating: u32,
        black_id: i64,
        black_rating: u32,
    },
}

impl From<(CompetitionDbData, Vec<DbPlayer>)> for AppResponse {
    fn from((data, players): (CompetitionDbData, Vec<DbPlayer>)) -> Self {
        let registrations = data
            .registrations
            .iter()
            .map(|r| RegistrationItem {
                player_id: r.player_id,
                registered_at: r.registered_at,
            })
            .sorted_unstable_by(|a, b| {
                a.registered_at
                    .cmp(&b.registered_at)
                    .then_with(|| a.player_id.cmp(&b.player_id))
            })
            .collect();
        Self::Success {
            payload: SuccessResponse::CompetitionData {
                id: data.competition.id,
                name: data.competition.name,
                location: data.competition.location,
                start_date: data.competition.start_date,
                registrations,
                players,
            },
        }
    }
}

impl From<Vec<DbCompetition>> for AppResponse {
    fn from(value: Vec<DbCompetition>) -> Self {
        Self::Success {
            payload: SuccessResponse::CompetitionList {
                competitions: value,
            },
        }
    }
}

impl From<GameDbData> for AppResponse {
    fn from(value: GameDbData) -> Self {
        let moves = value
            .moves
            .into_iter()
            .map(|m: DbMove| GameMove {
                ply: m.ply,
                notation: m.notation,
                played_at: m.played_at,
            })
            .collect();
        Self::Success {
            payload: SuccessResponse::GameData {
                id: value.game.id,
                competition_id: value.game.competition_id,
                white_id: value.game.white_id,
                black_id: value.game.black_id,
                result: value.game.result,
                moves,
            },
        }
    }
}

impl From<RatingChange> for AppResponse {
    fn from(value: RatingChange) -> Self {
        Self::Success {
            payload: SuccessResponse::ResultRecorded {
                game_id: value.game_id,
                result: value.result.to_string(),
                white_id: value.white_id,
                white_rating: value.white_rating,
                black_id: value.black_id,
                black_rating: value.black_rating,
            },
        }
    }
}

impl IntoResponse for AppResponse {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppResponse::Error { error: e } => (e.status_code, AxumJson(e)).into_response(),
            AppResponse::Success { payload: _ } => (StatusCode::OK, AxumJson(self)).into_response(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match &self {
            AppError::PlayerNotFound(_) => StatusCode::NOT_FOUND,
            AppError::CompetitionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::GameNotFound(_) => StatusCode::NOT_FOUND,
            AppError::MissingValue(_) => StatusCode::BAD_REQUEST,
            AppError::NegativeRating(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidPly(_) => StatusCode::BAD_REQUEST,
            AppError::MoveOutOfOrder { last: _, ply: _ } => StatusCode::BAD_REQUEST,
            AppError::SamePlayer => StatusCode::BAD_REQUEST,
            AppError::DuplicateEmail(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadyRegistered(_) => StatusCode::BAD_REQUEST,
            AppError::NotRegistered(_) => StatusCode::BAD_REQUEST,
            AppError::GameFinished => StatusCode::BAD_REQUEST,
            AppError::AlreadyDecided => StatusCode::BAD_REQUEST,
            AppError::InvalidResult(_) => StatusCode::BAD_REQUEST,
            AppError::JsonUnknownError => StatusCode::BAD_REQUEST,
            AppError::MissingContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::JsonSyntaxError(_) => StatusCode::BAD_REQUEST,
            AppError::JsonDataError => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        AppResponse::Error {
            error: ErrorResponse {
                code: self.code(),
                message: format!("{}", self),
                status_code,
            },
        }
        .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::game::GameResult;

    #[test]
    fn test_error_envelope_carries_code_and_message() {
        let error = AppError::AlreadyRegistered(7);
        let response = AppResponse::Error {
            error: ErrorResponse {
                code: error.code(),
                message: format!("{}", error),
                status_code: StatusCode::BAD_REQUEST,
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"]["code"], "AlreadyRegistered");
        assert!(json["error"]["message"].as_str().unwrap().contains("7"));
        assert!(json["error"].get("statusCode").is_none());
    }

    #[test]
    fn test_success_envelope_uses_camel_case_fields() {
        let response: AppResponse = RatingChange {
            game_id: 1,
            result: GameResult::WhiteWin,
            white_id: 1,
            white_rating: 1216,
            black_id: 2,
            black_rating: 1184,
        }
        .into();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["payload"]["type"], "resultRecorded");
        assert_eq!(json["payload"]["result"], "1-0");
        assert_eq!(json["payload"]["whiteRating"], 1216);
        assert_eq!(json["payload"]["blackRating"], 1184);
    }
}
