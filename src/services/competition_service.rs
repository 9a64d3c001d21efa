use chrono::DateTime;

use crate::{
    errors::AppError,
    models::{
        competition::{Competition, Registration},
        player::require_text,
    },
    payloads::NewCompetition,
    repositories::{
        competition_repo::{self, DbCompetition, DbRegistration},
        player_repo::{self, DbPlayer},
    },
};

pub struct CompetitionDbData {
    pub competition: DbCompetition,
    pub registrations: Vec<DbRegistration>,
}

impl From<CompetitionDbData> for Competition {
    fn from(value: CompetitionDbData) -> Self {
        let registrations = value
            .registrations
            .into_iter()
            .map(|r| Registration {
                competition_id: r.competition_id,
                player_id: r.player_id,
                registered_at: DateTime::from_timestamp_secs(r.registered_at).unwrap_or_default(),
            })
            .collect();
        Competition::restore(
            value.competition.id,
            value.competition.name,
            value.competition.location,
            value.competition.start_date,
            registrations,
        )
    }
}

pub async fn create_competition(
    pool: &sqlx::SqlitePool,
    payload: NewCompetition,
) -> Result<i64, AppError> {
    let name = require_text(&payload.name, "name")?;
    let location = require_text(&payload.location, "location")?;
    competition_repo::create_competition(pool, &name, &location, payload.start_date)
        .await
        .map_err(|e| Into::<AppError>::into(e))
}

pub async fn read_competition(
    pool: &sqlx::SqlitePool,
    id: i64,
) -> Result<CompetitionDbData, AppError> {
    let competition = competition_repo::get_competition(pool, id)
        .await?
        .ok_or(AppError::CompetitionNotFound(id))?;
    let registrations = competition_repo::select_registrations(pool, id).await?;
    Ok(CompetitionDbData {
        competition,
        registrations,
    })
}

pub async fn list_competitions(pool: &sqlx::SqlitePool) -> Result<Vec<DbCompetition>, AppError> {
    competition_repo::list_competitions(pool)
        .await
        .map_err(|e| Into::<AppError>::into(e))
}

pub async fn register_player(
    pool: &sqlx::SqlitePool,
    competition_id: i64,
    player_id: i64,
) -> Result<(), AppError> {
    let mut competition: Competition = read_competition(pool, competition_id).await?.into();
    player_repo::get_player(pool, player_id)
        .await?
        .ok_or(AppError::PlayerNotFound(player_id))?;
    competition.register(player_id)?;
    competition_repo::replace_registrations(pool, &competition).await?;
    Ok(())
}

pub async fn unregister_player(
    pool: &sqlx::SqlitePool,
    competition_id: i64,
    player_id: i64,
) -> Result<(), AppError> {
    let mut competition: Competition = read_competition(pool, competition_id).await?.into();
    player_repo::get_player(pool, player_id)
        .await?
        .ok_or(AppError::PlayerNotFound(player_id))?;
    competition.unregister(player_id);
    competition_repo::replace_registrations(pool, &competition).await?;
    Ok(())
}

pub async fn registered_players(
    pool: &sqlx::SqlitePool,
    competition_id: i64,
) -> Result<Vec<DbPlayer>, AppError> {
    competition_repo::get_competition(pool, competition_id)
        .await?
        .ok_or(AppError::CompetitionNotFound(competition_id))?;
    competition_repo::select_registered_players(pool, competition_id)
        .await
        .map_err(|e| Into::<AppError>::into(e))
}

pub async fn delete_competition(pool: &sqlx::SqlitePool, id: i64) -> Result<(), AppError> {
    competition_repo::delete_competition(pool, id)
        .await
        .map_err(|e| Into::<AppError>::into(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[sqlx::test]
    async fn test_create_competition_trims_inputs(pool: sqlx::SqlitePool) {
        let payload = NewCompetition {
            name: " Open 2025 ".to_string(),
            location: " Bruxelles ".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        };
        let id = create_competition(&pool, payload)
            .await
            .expect("failed to create competition");
        let data = read_competition(&pool, id)
            .await
            .expect("failed to read competition");
        assert_eq!(data.competition.name, "Open 2025");
        assert_eq!(data.competition.location, "Bruxelles");
        assert!(data.registrations.is_empty());
    }

    #[sqlx::test]
    async fn test_create_competition_rejects_blank_location(pool: sqlx::SqlitePool) {
        let payload = NewCompetition {
            name: "Open 2025".to_string(),
            location: "  ".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        };
        let err = create_competition(&pool, payload).await.unwrap_err();
        assert!(matches!(err, AppError::MissingValue("location")));
    }

    #[sqlx::test(fixtures(
        path = "../../fixtures",
        scripts("create_players", "create_competition")
    ))]
    async fn test_register_player_persists_membership(pool: sqlx::SqlitePool) {
        register_player(&pool, 1, 3)
            .await
            .expect("failed to register player");
        let competition: Competition = read_competition(&pool, 1).await.unwrap().into();
        assert!(competition.is_registered(3));
    }

    #[sqlx::test(fixtures(
        path = "../../fixtures",
        scripts("create_players", "create_competition", "register_players")
    ))]
    async fn test_register_player_twice_fails(pool: sqlx::SqlitePool) {
        let err = register_player(&pool, 1, 1).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyRegistered(1)));
        let competition: Competition = read_competition(&pool, 1).await.unwrap().into();
        assert!(competition.is_registered(1));
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("create_players")))]
    async fn test_register_player_requires_competition(pool: sqlx::SqlitePool) {
        let err = register_player(&pool, 99, 1).await.unwrap_err();
        assert!(matches!(err, AppError::CompetitionNotFound(99)));
    }

    #[sqlx::test(fixtures(
        path = "../../fixtures",
        scripts("create_players", "create_competition")
    ))]
    async fn test_register_player_requires_player(pool: sqlx::SqlitePool) {
        let err = register_player(&pool, 1, 99).await.unwrap_err();
        assert!(matches!(err, AppError::PlayerNotFound(99)));
    }

    #[sqlx::test(fixtures(
        path = "../../fixtures",
        scripts("create_players", "create_competition", "register_players")
    ))]
    async fn test_unregister_absent_player_is_a_noop(pool: sqlx::SqlitePool) {
        unregister_player(&pool, 1, 3)
            .await
            .expect("failed to unregister player");
        let competition: Competition = read_competition(&pool, 1).await.unwrap().into();
        assert_eq!(competition.registrations().len(), 2);
    }

    #[sqlx::test(fixtures(
        path = "../../fixtures",
        scripts("create_players", "create_competition", "register_players")
    ))]
    async fn test_registered_players_sorted_by_last_name(pool: sqlx::SqlitePool) {
        let players = registered_players(&pool, 1)
            .await
            .expect("failed to list registered players");
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].last_name, "Black");
        assert_eq!(players[1].last_name, "White");
    }
}
