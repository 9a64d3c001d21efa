use chrono::Utc;
use serde::Serialize;
use sqlx::{Sqlite, Transaction, prelude::FromRow};

use crate::models::player::Player;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DbPlayer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub rating: u32,
    pub updated_at: i64,
}

pub async fn create_player(
    pool: &sqlx::SqlitePool,
    first_name: &str,
    last_name: &str,
    email: &str,
    rating: u32,
) -> sqlx::Result<i64> {
    let now = Utc::now();
    let result = sqlx::query(
        "insert into players (first_name, last_name, email, rating, updated_at)
            values (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(rating)
    .bind(now.timestamp())
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn get_player(pool: &sqlx::SqlitePool, id: i64) -> sqlx::Result<Option<DbPlayer>> {
    sqlx::query_as("select * from players where id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_player_by_email(
    pool: &sqlx::SqlitePool,
    email: &str,
) -> sqlx::Result<Option<DbPlayer>> {
    sqlx::query_as("select * from players where email = ?1 collate nocase")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn list_players(pool: &sqlx::SqlitePool) -> sqlx::Result<Vec<DbPlayer>> {
    sqlx::query_as("select * from players")
        .fetch_all(pool)
        .await
}

pub async fn leaderboard(pool: &sqlx::SqlitePool) -> sqlx::Result<Vec<DbPlayer>> {
    sqlx::query_as("select * from players order by rating desc, last_name asc, first_name asc")
        .fetch_all(pool)
        .await
}

pub async fn update_player(pool: &sqlx::SqlitePool, player: &Player) -> sqlx::Result<()> {
    let now = Utc::now();
    sqlx::query(
        "update players set
            first_name = ?1,
            last_name = ?2,
            email = ?3,
            updated_at = ?4
        where id = ?5",
    )
    .bind(&player.first_name)
    .bind(&player.last_name)
    .bind(&player.email)
    .bind(now.timestamp())
    .bind(player.id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update_rating(
    tx: &mut Transaction<'_, Sqlite>,
    player_id: i64,
    rating: u32,
) -> sqlx::Result<()> {
    let now = Utc::now();
    sqlx::query("update players set rating = ?1, updated_at = ?2 where id = ?3")
        .bind(rating)
        .bind(now.timestamp())
        .bind(player_id)
        .execute(tx.as_mut())
        .await?;
    Ok(())
}

pub async fn delete_player(pool: &sqlx::SqlitePool, id: i64) -> sqlx::Result<()> {
    sqlx::query("delete from players where id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
