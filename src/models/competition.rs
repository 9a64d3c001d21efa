use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    pub competition_id: i64,
    pub player_id: i64,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct Competition {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub start_date: NaiveDate,
    registrations: Vec<Registration>,
}

impl Competition {
    // Hydration from storage: the incoming set is assumed unique per player,
    // the registrations table carries a unique (competition_id, player_id)
    // index.
    pub fn restore(
        id: i64,
        name: String,
        location: String,
        start_date: NaiveDate,
        registrations: Vec<Registration>,
    ) -> Self {
        Self {
            id,
            name,
            location,
            start_date,
            registrations,
        }
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    pub fn is_registered(&self, player_id: i64) -> bool {
        self.registrations.iter().any(|r| r.player_id == player_id)
    }

    pub fn register(&mut self, player_id: i64) -> Result<&Registration, AppError> {
        if self.is_registered(player_id) {
            return Err(AppError::AlreadyRegistered(player_id));
        }
        self.registrations.push(Registration {
            competition_id: self.id,
            player_id,
            registered_at: Utc::now(),
        });
        Ok(self.registrations.last().unwrap())
    }

    pub fn unregister(&mut self, player_id: i64) {
        self.registrations.retain(|r| r.player_id != player_id);
    }
}
