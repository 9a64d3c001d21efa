use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub rating: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompetition {
    pub name: String,
    pub location: String,
    pub start_date: NaiveDate,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    pub player_id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    pub competition_id: i64,
    pub white_id: i64,
    pub black_id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMove {
    pub ply: u32,
    pub notation: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPayload {
    pub result: String,
}
