use crate::{errors::AppError, models::game::GameResult};

// Maximum rating points exchanged per game.
pub const K_FACTOR: f64 = 32.0;

fn expected_score(own: u32, opponent: u32) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent as f64 - own as f64) / 400.0))
}

fn apply(current: u32, actual: f64, expected: f64) -> u32 {
    let updated = current as f64 + K_FACTOR * (actual - expected);
    // f64::round rounds half away from zero; ratings never go below zero.
    updated.round().max(0.0) as u32
}

/// Computes both players' new Elo ratings from their pre-game ratings and a
/// terminal result. Pure and deterministic; `NotPlayed` is rejected.
pub fn updated_ratings(
    white: u32,
    black: u32,
    result: GameResult,
) -> Result<(u32, u32), AppError> {
    let (white_score, black_score) = match result {
        GameResult::WhiteWin => (1.0, 0.0),
        GameResult::BlackWin => (0.0, 1.0),
        GameResult::Draw => (0.5, 0.5),
        GameResult::NotPlayed => return Err(AppError::InvalidResult(result.to_string())),
    };
    let white_expected = expected_score(white, black);
    let black_expected = expected_score(black, white);
    Ok((
        apply(white, white_score, white_expected),
        apply(black, black_score, black_expected),
    ))
}
