use std::fmt::Display;

use crate::errors::AppError;

pub const DEFAULT_RATING: u32 = 1200;

pub fn require_text(value: &str, field: &'static str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::MissingValue(field));
    }
    Ok(value.to_owned())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub rating: u32,
}

impl Player {
    pub fn update_identity(
        &mut self,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<(), AppError> {
        let first_name = require_text(first_name, "firstName")?;
        let last_name = require_text(last_name, "lastName")?;
        let email = require_text(email, "email")?;
        self.first_name = first_name;
        self.last_name = last_name;
        self.email = email;
        Ok(())
    }

    // Only the rating engine and explicit corrections go through here.
    pub fn set_rating(&mut self, rating: u32) {
        self.rating = rating;
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.last_name, self.first_name, self.rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text_trims() {
        assert_eq!(require_text("  Alice ", "firstName").unwrap(), "Alice");
    }

    #[test]
    fn test_require_text_rejects_blank() {
        let err = require_text("   ", "lastName").unwrap_err();
        assert!(matches!(err, AppError::MissingValue("lastName")));
    }

    #[test]
    fn test_update_identity_trims_all_fields() {
        let mut player = Player {
            id: 1,
            first_name: "Alice".to_string(),
            last_name: "White".to_string(),
            email: "alice@test.com".to_string(),
            rating: DEFAULT_RATING,
        };
        player
            .update_identity(" Bob ", " Black ", " bob@test.com ")
            .unwrap();
        assert_eq!(player.first_name, "Bob");
        assert_eq!(player.last_name, "Black");
        assert_eq!(player.email, "bob@test.com");
        assert_eq!(player.rating, DEFAULT_RATING);
    }

    #[test]
    fn test_update_identity_rejects_blank_email() {
        let mut player = Player {
            id: 1,
            first_name: "Alice".to_string(),
            last_name: "White".to_string(),
            email: "alice@test.com".to_string(),
            rating: DEFAULT_RATING,
        };
        let err = player.update_identity("Alice", "White", " ").unwrap_err();
        assert!(matches!(err, AppError::MissingValue("email")));
        assert_eq!(player.email, "alice@test.com");
    }
}
