use chrono::Utc;
use serde::Serialize;
use sqlx::{Sqlite, Transaction, prelude::FromRow};

use crate::models::game::Game;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DbGame {
    pub id: i64,
    pub competition_id: i64,
    pub white_id: i64,
    pub black_id: i64,
    pub result: String,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DbMove {
    pub id: i64,
    pub game_id: i64,
    pub ply: u32,
    pub notation: String,
    pub played_at: i64,
}

pub async fn create_game(
    pool: &sqlx::SqlitePool,
    competition_id: i64,
    white_id: i64,
    black_id: i64,
) -> sqlx::Result<i64> {
    let now = Utc::now();
    let result = sqlx::query(
        "insert into games (competition_id, white_id, black_id, result, updated_at)
            values (?1, ?2, ?3, '*', ?4)",
    )
    .bind(competition_id)
    .bind(white_id)
    .bind(black_id)
    .bind(now.timestamp())
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn get_game(pool: &sqlx::SqlitePool, id: i64) -> sqlx::Result<Option<DbGame>> {
    sqlx::query_as("select * from games where id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn select_moves(pool: &sqlx::SqlitePool, game_id: i64) -> sqlx::Result<Vec<DbMove>> {
    sqlx::query_as("select * from moves where game_id = ?1 order by ply asc")
        .bind(game_id)
        .fetch_all(pool)
        .await
}

pub async fn list_games_by_competition(
    pool: &sqlx::SqlitePool,
    competition_id: i64,
) -> sqlx::Result<Vec<DbGame>> {
    sqlx::query_as("select * from games where competition_id = ?1")
        .bind(competition_id)
        .fetch_all(pool)
        .await
}

// Persisting a game replaces its whole move list, the list is owned by the
// game.
pub async fn replace_moves(pool: &sqlx::SqlitePool, game: &Game) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    sqlx::query("delete from moves where game_id = ?1")
        .bind(game.id)
        .execute(&mut *tx)
        .await?;
    for mv in game.moves() {
        sqlx::query(
            "insert into moves (game_id, ply, notation, played_at)
                values (?1, ?2, ?3, ?4)",
        )
        .bind(game.id)
        .bind(mv.ply)
        .bind(&mv.notation)
        .bind(mv.played_at.timestamp())
        .execute(&mut *tx)
        .await?;
    }
    sqlx::query("update games set updated_at = ?1 where id = ?2")
        .bind(Utc::now().timestamp())
        .bind(game.id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

// Compare-and-swap on the result column: of two concurrent writers one sees
// zero affected rows and must report the game as already decided.
pub async fn record_result(
    tx: &mut Transaction<'_, Sqlite>,
    game_id: i64,
    result: &str,
) -> sqlx::Result<u64> {
    let now = Utc::now();
    let done = sqlx::query(
        "update games set result = ?1, updated_at = ?2 where id = ?3 and result = '*'",
    )
    .bind(result)
    .bind(now.timestamp())
    .bind(game_id)
    .execute(tx.as_mut())
    .await?;
    Ok(done.rows_affected())
}

pub async fn delete_game(pool: &sqlx::SqlitePool, id: i64) -> sqlx::Result<()> {
    sqlx::query("delete from games where id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
