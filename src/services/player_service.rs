use crate::{
    errors::AppError,
    models::player::{DEFAULT_RATING, Player, require_text},
    payloads::{NewPlayer, UpdatePlayer},
    repositories::player_repo::{self, DbPlayer},
};

impl From<DbPlayer> for Player {
    fn from(value: DbPlayer) -> Self {
        Self {
            id: value.id,
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            rating: value.rating,
        }
    }
}

fn map_unique_violation(err: sqlx::Error, email: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::DuplicateEmail(email.to_owned())
        }
        _ => AppError::Database(err),
    }
}

pub async fn create_player(
    pool: &sqlx::SqlitePool,
    payload: NewPlayer,
) -> Result<DbPlayer, AppError> {
    let first_name = require_text(&payload.first_name, "firstName")?;
    let last_name = require_text(&payload.last_name, "lastName")?;
    let email = require_text(&payload.email, "email")?;
    let rating = match payload.rating {
        Some(rating) if rating < 0 => return Err(AppError::NegativeRating(rating)),
        Some(rating) => rating as u32,
        None => DEFAULT_RATING,
    };
    if player_repo::get_player_by_email(pool, &email)
        .await?
        .is_some()
    {
        return Err(AppError::DuplicateEmail(email));
    }
    // The nocase unique index closes the race window left by the pre-check.
    let id = player_repo::create_player(pool, &first_name, &last_name, &email, rating)
        .await
        .map_err(|e| map_unique_violation(e, &email))?;
    let player = player_repo::get_player(pool, id)
        .await?
        .ok_or(AppError::PlayerNotFound(id))?;
    Ok(player)
}

pub async fn update_player(
    pool: &sqlx::SqlitePool,
    id: i64,
    payload: UpdatePlayer,
) -> Result<DbPlayer, AppError> {
    let row = player_repo::get_player(pool, id)
        .await?
        .ok_or(AppError::PlayerNotFound(id))?;
    let email = payload.email.trim();
    if let Some(other) = player_repo::get_player_by_email(pool, email).await? {
        if other.id != id {
            return Err(AppError::DuplicateEmail(email.to_owned()));
        }
    }
    let mut player: Player = row.into();
    player.update_identity(&payload.first_name, &payload.last_name, &payload.email)?;
    player_repo::update_player(pool, &player)
        .await
        .map_err(|e| map_unique_violation(e, &player.email))?;
    let player = player_repo::get_player(pool, id)
        .await?
        .ok_or(AppError::PlayerNotFound(id))?;
    Ok(player)
}

pub async fn get_player(pool: &sqlx::SqlitePool, id: i64) -> Result<DbPlayer, AppError> {
    player_repo::get_player(pool, id)
        .await?
        .ok_or(AppError::PlayerNotFound(id))
}

pub async fn list_players(pool: &sqlx::SqlitePool) -> Result<Vec<DbPlayer>, AppError> {
    player_repo::list_players(pool)
        .await
        .map_err(|e| Into::<AppError>::into(e))
}

pub async fn leaderboard(pool: &sqlx::SqlitePool) -> Result<Vec<DbPlayer>, AppError> {
    player_repo::leaderboard(pool)
        .await
        .map_err(|e| Into::<AppError>::into(e))
}

pub async fn delete_player(pool: &sqlx::SqlitePool, id: i64) -> Result<(), AppError> {
    player_repo::delete_player(pool, id)
        .await
        .map_err(|e| Into::<AppError>::into(e))
}
