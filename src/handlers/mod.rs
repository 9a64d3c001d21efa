pub mod competitions;
pub mod games;
pub mod players;
