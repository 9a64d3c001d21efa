pub mod competition_service;
pub mod game_service;
pub mod player_service;
