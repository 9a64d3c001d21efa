use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use sqlx::SqlitePool;

use crate::{
    AppState,
    payloads::{NewPlayer, UpdatePlayer},
    responses::{AppResponse, Json, SuccessResponse},
    services::player_service,
};

async fn create_player(
    State(pool): State<SqlitePool>,
    Json(payload): Json<NewPlayer>,
) -> impl IntoResponse {
    match player_service::create_player(&pool, payload).await {
        Ok(player) => AppResponse::Success {
            payload: SuccessResponse::PlayerCreated { player },
        }
        .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn list_players(State(pool): State<SqlitePool>) -> impl IntoResponse {
    match player_service::list_players(&pool).await {
        Ok(players) => AppResponse::Success {
            payload: SuccessResponse::PlayerList { players },
        }
        .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn leaderboard(State(pool): State<SqlitePool>) -> impl IntoResponse {
    match player_service::leaderboard(&pool).await {
        Ok(players) => AppResponse::Success {
            payload: SuccessResponse::Leaderboard { players },
        }
        .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn get_player(State(pool): State<SqlitePool>, Path(id): Path<i64>) -> impl IntoResponse {
    match player_service::get_player(&pool, id).await {
        Ok(player) => AppResponse::Success {
            payload: SuccessResponse::PlayerData { player },
        }
        .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn update_player(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePlayer>,
) -> impl IntoResponse {
    match player_service::update_player(&pool, id, payload).await {
        Ok(player) => AppResponse::Success {
            payload: SuccessResponse::PlayerUpdated { player },
        }
        .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn delete_player(State(pool): State<SqlitePool>, Path(id): Path<i64>) -> impl IntoResponse {
    match player_service::delete_player(&pool, id).await {
        Ok(()) => AppResponse::Success {
            payload: SuccessResponse::PlayerDeleted { id },
        }
        .into_response(),
        Err(e) => e.into_response(),
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_player))
        .route("/", get(list_players))
        .route("/leaderboard", get(leaderboard))
        .route("/{id}", get(get_player))
        .route("/{id}", put(update_player))
        .route("/{id}", delete(delete_player))
        .with_state(state)
}
