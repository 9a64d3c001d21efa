use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, post},
};
use sqlx::SqlitePool;

use crate::{
    AppState,
    payloads::{NewGame, NewMove, ResultPayload},
    responses::{AppResponse, Json, SuccessResponse},
    services::game_service,
};

async fn create_game(
    State(pool): State<SqlitePool>,
    Json(payload): Json<NewGame>,
) -> impl IntoResponse {
    match game_service::create_game(&pool, payload).await {
        Ok(id) => AppResponse::Success {
            payload: SuccessResponse::GameCreated { id },
        }
        .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn get_game(State(pool): State<SqlitePool>, Path(id): Path<i64>) -> impl IntoResponse {
    match game_service::read_game(&pool, id).await {
        Ok(data) => Into::<AppResponse>::into(data).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn list_games(
    State(pool): State<SqlitePool>,
    Path(competition_id): Path<i64>,
) -> impl IntoResponse {
    match game_service::list_games(&pool, competition_id).await {
        Ok(games) => AppResponse::Success {
            payload: SuccessResponse::GameList { games },
        }
        .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn add_move(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<NewMove>,
) -> impl IntoResponse {
    match game_service::add_move(&pool, id, payload).await {
        Ok(mv) => AppResponse::Success {
            payload: SuccessResponse::MoveAdded {
                game_id: id,
                ply: mv.ply,
                notation: mv.notation,
            },
        }
        .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn set_result(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<ResultPayload>,
) -> impl IntoResponse {
    match game_service::set_result(&pool, id, payload).await {
        Ok(change) => Into::<AppResponse>::into(change).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn delete_game(State(pool): State<SqlitePool>, Path(id): Path<i64>) -> impl IntoResponse {
    match game_service::delete_game(&pool, id).await {
        Ok(()) => AppResponse::Success {
            payload: SuccessResponse::GameDeleted { id },
        }
        .into_response(),
        Err(e) => e.into_response(),
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_game))
        .route("/{id}", get(get_game))
        .route("/{id}", delete(delete_game))
        .route("/competition/{competition_id}", get(list_games))
        .route("/{id}/moves", post(add_move))
        .route("/{id}/result", post(set_result))
        .with_state(state)
}
