use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::prelude::FromRow;

use crate::{models::competition::Competition, repositories::player_repo::DbPlayer};

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DbCompetition {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DbRegistration {
    pub id: i64,
    pub competition_id: i64,
    pub player_id: i64,
    pub registered_at: i64,
}

pub async fn create_competition(
    pool: &sqlx::SqlitePool,
    name: &str,
    location: &str,
    start_date: NaiveDate,
) -> sqlx::Result<i64> {
    let now = Utc::now();
    let result = sqlx::query(
        "insert into competitions (name, location, start_date, updated_at)
            values (?1, ?2, ?3, ?4)",
    )
    .bind(name)
    .bind(location)
    .bind(start_date)
    .bind(now.timestamp())
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn get_competition(
    pool: &sqlx::SqlitePool,
    id: i64,
) -> sqlx::Result<Option<DbCompetition>> {
    sqlx::query_as("select * from competitions where id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_competitions(pool: &sqlx::SqlitePool) -> sqlx::Result<Vec<DbCompetition>> {
    sqlx::query_as("select * from competitions order by start_date asc")
        .fetch_all(pool)
        .await
}

pub async fn select_registrations(
    pool: &sqlx::SqlitePool,
    competition_id: i64,
) -> sqlx::Result<Vec<DbRegistration>> {
    sqlx::query_as("select * from registrations where competition_id = ?1")
        .bind(competition_id)
        .fetch_all(pool)
        .await
}

// Persisting a competition replaces its whole registration set, the set is
// owned by the competition.
pub async fn replace_registrations(
    pool: &sqlx::SqlitePool,
    competition: &Competition,
) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    sqlx::query("delete from registrations where competition_id = ?1")
        .bind(competition.id)
        .execute(&mut *tx)
        .await?;
    for registration in competition.registrations() {
        sqlx::query(
            "insert into registrations (competition_id, player_id, registered_at)
                values (?1, ?2, ?3)",
        )
        .bind(registration.competition_id)
        .bind(registration.player_id)
        .bind(registration.registered_at.timestamp())
        .execute(&mut *tx)
        .await?;
    }
    sqlx::query("update competitions set updated_at = ?1 where id = ?2")
        .bind(Utc::now().timestamp())
        .bind(competition.id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

pub async fn select_registered_players(
    pool: &sqlx::SqlitePool,
    competition_id: i64,
) -> sqlx::Result<Vec<DbPlayer>> {
    sqlx::query_as(
        "select
            p.id,
            p.first_name,
            p.last_name,
            p.email,
            p.rating,
            p.updated_at
        from registrations r
        inner join players p on r.player_id = p.id
        where r.competition_id = ?1
        order by p.last_name asc, p.first_name asc",
    )
    .bind(competition_id)
    .fetch_all(pool)
    .await
}

pub async fn delete_competition(pool: &sqlx::SqlitePool, id: i64) -> sqlx::Result<()> {
    sqlx::query("delete from competitions where id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::models::competition::Registration;

    #[sqlx::test]
    async fn test_create_and_get_competition(pool: sqlx::SqlitePool) {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let id = create_competition(&pool, "Open 2025", "Bruxelles", start)
            .await
            .expect("competition inserted");
        let competition = get_competition(&pool, id)
            .await
            .expect("failed to get competition")
            .expect("competition missing");
        assert_eq!(competition.name, "Open 2025");
        assert_eq!(competition.start_date, start);
    }

    #[sqlx::test(fixtures(
        path = "../../fixtures",
        scripts("create_players", "create_competition", "register_players")
    ))]
    async fn test_replace_registrations_swaps_the_set(pool: sqlx::SqlitePool) {
        let before = select_registrations(&pool, 1)
            .await
            .expect("failed to select registrations");
        assert_eq!(before.len(), 2);

        let registered_at = DateTime::from_timestamp_secs(0).unwrap();
        let competition = Competition::restore(
            1,
            "Open 2025".to_string(),
            "Bruxelles".to_string(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            vec![Registration {
                competition_id: 1,
                player_id: 3,
                registered_at,
            }],
        );
        replace_registrations(&pool, &competition)
            .await
            .expect("failed to replace registrations");

        let after = select_registrations(&pool, 1)
            .await
            .expect("failed to select registrations");
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].player_id, 3);
    }

    #[sqlx::test(fixtures(
        path = "../../fixtures",
        scripts("create_players", "create_competition", "register_players")
    ))]
    async fn test_registered_players_come_sorted_by_name(pool: sqlx::SqlitePool) {
        let players = select_registered_players(&pool, 1)
            .await
            .expect("failed to select registered players");
        assert_eq!(players.len(), 2);
        assert!(players[0].last_name <= players[1].last_name);
    }
}
