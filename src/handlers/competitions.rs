use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, post},
};
use sqlx::SqlitePool;

use crate::{
    AppState,
    payloads::{NewCompetition, RegistrationPayload},
    responses::{AppResponse, Json, SuccessResponse},
    services::competition_service,
};

async fn create_competition(
    State(pool): State<SqlitePool>,
    Json(payload): Json<NewCompetition>,
) -> impl IntoResponse {
    match competition_service::create_competition(&pool, payload).await {
        Ok(id) => AppResponse::Success {
            payload: SuccessResponse::CompetitionCreated { id },
        }
        .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn list_competitions(State(pool): State<SqlitePool>) -> impl IntoResponse {
    match competition_service::list_competitions(&pool).await {
        Ok(competitions) => Into::<AppResponse>::into(competitions).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn get_competition(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let data = match competition_service::read_competition(&pool, id).await {
        Ok(data) => data,
        Err(e) => return e.into_response(),
    };
    match competition_service::registered_players(&pool, id).await {
        Ok(players) => Into::<AppResponse>::into((data, players)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn register_player(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<RegistrationPayload>,
) -> impl IntoResponse {
    match competition_service::register_player(&pool, id, payload.player_id).await {
        Ok(()) => AppResponse::Success {
            payload: SuccessResponse::PlayerRegistered {
                competition_id: id,
                player_id: payload.player_id,
            },
        }
        .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn unregister_player(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<RegistrationPayload>,
) -> impl IntoResponse {
    match competition_service::unregister_player(&pool, id, payload.player_id).await {
        Ok(()) => AppResponse::Success {
            payload: SuccessResponse::PlayerUnregistered {
                competition_id: id,
                player_id: payload.player_id,
            },
        }
        .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn delete_competition(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match competition_service::delete_competition(&pool, id).await {
        Ok(()) => AppResponse::Success {
            payload: SuccessResponse::CompetitionDeleted { id },
        }
        .into_response(),
        Err(e) => e.into_response(),
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_competition))
        .route("/", get(list_competitions))
        .route("/{id}", get(get_competition))
        .route("/{id}", delete(delete_competition))
        .route("/{id}/register", post(register_player))
        .route("/{id}/unregister", post(unregister_player))
        .with_state(state)
}
