use chrono::DateTime;

use crate::{
    errors::AppError,
    models::{
        competition::Competition,
        game::{Game, GameResult, Move},
        player::Player,
        rating,
    },
    payloads::{NewGame, NewMove, ResultPayload},
    repositories::{
        competition_repo,
        game_repo::{self, DbGame, DbMove},
        player_repo,
    },
    services::competition_service,
};

pub struct GameDbData {
    pub game: DbGame,
    pub moves: Vec<DbMove>,
}

impl From<GameDbData> for Game {
    fn from(value: GameDbData) -> Self {
        let moves = value
            .moves
            .into_iter()
            .map(|m| {
                Move::restore(
                    m.ply,
                    m.notation,
                    DateTime::from_timestamp_secs(m.played_at).unwrap_or_default(),
                )
            })
            .collect();
        Game::restore(
            value.game.id,
            value.game.competition_id,
            value.game.white_id,
            value.game.black_id,
            GameResult::from_str(&value.game.result),
            moves,
        )
    }
}

#[derive(Debug)]
pub struct RatingChange {
    pub game_id: i64,
    pub result: GameResult,
    pub white_id: i64,
    pub white_rating: u32,
    pub black_id: i64,
    pub black_rating: u32,
}

pub async fn create_game(pool: &sqlx::SqlitePool, payload: NewGame) -> Result<i64, AppError> {
    let competition: Competition = competition_service::read_competition(pool, payload.competition_id)
        .await?
        .into();
    for player_id in [payload.white_id, payload.black_id] {
        if !competition.is_registered(player_id) {
            return Err(AppError::NotRegistered(player_id));
        }
        player_repo::get_player(pool, player_id)
            .await?
            .ok_or(AppError::PlayerNotFound(player_id))?;
    }
    if payload.white_id == payload.black_id {
        return Err(AppError::SamePlayer);
    }
    game_repo::create_game(pool, competition.id, payload.white_id, payload.black_id)
        .await
        .map_err(|e| Into::<AppError>::into(e))
}

pub async fn read_game(pool: &sqlx::SqlitePool, id: i64) -> Result<GameDbData, AppError> {
    let game = game_repo::get_game(pool, id)
        .await?
        .ok_or(AppError::GameNotFound(id))?;
    let moves = game_repo::select_moves(pool, id).await?;
    Ok(GameDbData { game, moves })
}

pub async fn list_games(
    pool: &sqlx::SqlitePool,
    competition_id: i64,
) -> Result<Vec<DbGame>, AppError> {
    competition_repo::get_competition(pool, competition_id)
        .await?
        .ok_or(AppError::CompetitionNotFound(competition_id))?;
    game_repo::list_games_by_competition(pool, competition_id)
        .await
        .map_err(|e| Into::<AppError>::into(e))
}

pub async fn add_move(
    pool: &sqlx::SqlitePool,
    game_id: i64,
    payload: NewMove,
) -> Result<Move, AppError> {
    let mut game: Game = read_game(pool, game_id).await?.into();
    let mv = Move::new(payload.ply, &payload.notation)?;
    game.add_move(mv)?;
    game_repo::replace_moves(pool, &game).await?;
    Ok(game.moves().last().unwrap().clone())
}

// Recording a result and paying out the rating exchange is one transaction;
// the compare-and-swap in record_result keeps a second concurrent caller
// from paying out twice.
pub async fn set_result(
    pool: &sqlx::SqlitePool,
    game_id: i64,
    payload: ResultPayload,
) -> Result<RatingChange, AppError> {
    let result = GameResult::try_from(payload.result.as_str())?;
    let mut game: Game = read_game(pool, game_id).await?.into();
    game.set_result(result)?;
    let mut white: Player = player_repo::get_player(pool, game.white_id)
        .await?
        .ok_or(AppError::PlayerNotFound(game.white_id))?
        .into();
    let mut black: Player = player_repo::get_player(pool, game.black_id)
        .await?
        .ok_or(AppError::PlayerNotFound(game.black_id))?
        .into();
    let (white_rating, black_rating) = rating::updated_ratings(white.rating, black.rating, result)?;
    white.set_rating(white_rating);
    black.set_rating(black_rating);

    let mut tx = pool.begin().await?;
    player_repo::update_rating(&mut tx, white.id, white.rating).await?;
    player_repo::update_rating(&mut tx, black.id, black.rating).await?;
    let affected = game_repo::record_result(&mut tx, game.id, &result.to_string()).await?;
    if affected == 0 {
        // Lost the race, another caller decided the game first. Dropping the
        // transaction rolls the rating writes back.
        return Err(AppError::AlreadyDecided);
    }
    tx.commit().await?;
    tracing::info!(
        "game {} decided {}: white {} black {}",
        game.id,
        result,
        white.rating,
        black.rating
    );

    Ok(RatingChange {
        game_id: game.id,
        result,
        white_id: white.id,
        white_rating: white.rating,
        black_id: black.id,
        black_rating: black.rating,
    })
}

pub async fn delete_game(pool: &sqlx::SqlitePool, id: i64) -> Result<(), AppError> {
    game_repo::delete_game(pool, id)
        .await
        .map_err(|e| Into::<AppError>::into(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_game(white_id: i64, black_id: i64) -> NewGame {
        NewGame {
            competition_id: 1,
            white_id,
            black_id,
        }
    }

    #[sqlx::test(fixtures(
        path = "../../fixtures",
        scripts("create_players", "create_competition", "register_players")
    ))]
    async fn test_create_game_starts_open_and_empty(pool: sqlx::SqlitePool) {
        let id = create_game(&pool, new_game(1, 2))
            .await
            .expect("failed to create game");
        let game: Game = read_game(&pool, id).await.unwrap().into();
        assert!(!game.is_finished());
        assert_eq!(game.result(), GameResult::NotPlayed);
        assert!(game.moves().is_empty());
    }

    #[sqlx::test(fixtures(
        path = "../../fixtures",
        scripts("create_players", "create_competition", "register_players")
    ))]
    async fn test_create_game_requires_registration(pool: sqlx::SqlitePool) {
        // Player 3 exists but is not registered in competition 1
        let err = create_game(&pool, new_game(1, 3)).await.unwrap_err();
        assert!(matches!(err, AppError::NotRegistered(3)));
    }

    #[sqlx::test(fixtures(
        path = "../../fixtures",
        scripts("create_players", "create_competition", "register_players")
    ))]
    async fn test_create_game_rejects_same_player(pool: sqlx::SqlitePool) {
        let err = create_game(&pool, new_game(1, 1)).await.unwrap_err();
        assert!(matches!(err, AppError::SamePlayer));
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("create_players")))]
    async fn test_create_game_requires_competition(pool: sqlx::SqlitePool) {
        let payload = NewGame {
            competition_id: 99,
            white_id: 1,
            black_id: 2,
        };
        let err = create_game(&pool, payload).await.unwrap_err();
        assert!(matches!(err, AppError::CompetitionNotFound(99)));
    }

    #[sqlx::test(fixtures(
        path = "../../fixtures",
        scripts("create_players", "create_competition", "register_players", "create_game")
    ))]
    async fn test_add_move_enforces_ply_order(pool: sqlx::SqlitePool) {
        let payload = NewMove {
            ply: 1,
            notation: "e4".to_string(),
        };
        add_move(&pool, 1, payload).await.expect("failed to add move");
        let payload = NewMove {
            ply: 1,
            notation: "e5".to_string(),
        };
        let err = add_move(&pool, 1, payload).await.unwrap_err();
        assert!(matches!(err, AppError::MoveOutOfOrder { last: 1, ply: 1 }));
        let game: Game = read_game(&pool, 1).await.unwrap().into();
        assert_eq!(game.moves().len(), 1);
    }

    #[sqlx::test]
    async fn test_add_move_requires_known_game(pool: sqlx::SqlitePool) {
        let payload = NewMove {
            ply: 1,
            notation: "e4".to_string(),
        };
        let err = add_move(&pool, 42, payload).await.unwrap_err();
        assert!(matches!(err, AppError::GameNotFound(42)));
    }

    #[sqlx::test(fixtures(
        path = "../../fixtures",
        scripts("create_players", "create_competition", "register_players", "create_game")
    ))]
    async fn test_set_result_rejects_unknown_scores(pool: sqlx::SqlitePool) {
        for bad in ["2-0", "white wins", "*"] {
            let payload = ResultPayload {
                result: bad.to_string(),
            };
            let err = set_result(&pool, 1, payload).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidResult(_)));
        }
    }

    #[sqlx::test(fixtures(
        path = "../../fixtures",
        scripts("create_players", "create_competition", "register_players")
    ))]
    async fn test_full_game_flow_updates_ratings_once(pool: sqlx::SqlitePool) {
        let game_id = create_game(&pool, new_game(1, 2))
            .await
            .expect("failed to create game");
        add_move(
            &pool,
            game_id,
            NewMove {
                ply: 1,
                notation: "e4".to_string(),
            },
        )
        .await
        .expect("failed to add move");

        let change = set_result(
            &pool,
            game_id,
            ResultPayload {
                result: "1-0".to_string(),
            },
        )
        .await
        .expect("failed to set result");
        assert_eq!(change.white_rating, 1216);
        assert_eq!(change.black_rating, 1184);

        let white = player_repo::get_player(&pool, 1).await.unwrap().unwrap();
        let black = player_repo::get_player(&pool, 2).await.unwrap().unwrap();
        assert_eq!(white.rating, 1216);
        assert_eq!(black.rating, 1184);

        let err = set_result(
            &pool,
            game_id,
            ResultPayload {
                result: "1/2-1/2".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::AlreadyDecided));

        let err = add_move(
            &pool,
            game_id,
            NewMove {
                ply: 2,
                notation: "e5".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::GameFinished));

        // The losing second attempt must not have touched the ratings
        let white = player_repo::get_player(&pool, 1).await.unwrap().unwrap();
        assert_eq!(white.rating, 1216);
    }
}
