use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_MESSAGE, TARGET_SECONDS};

/// One leaderboard entry. At most one exists per distinct name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    /// Sum of the attempt counts submitted with every perfect stop.
    pub total_attempts: u64,
    pub perfect_attempts: u32,
    /// Fewest attempts this player ever needed to stop on the target.
    pub first_perfect_attempt: Option<u32>,
    pub best_time: Option<f64>,
    pub message: String,
    pub created_at_unix_s: u64,
}

impl Player {
    /// Build the record for a player's first perfect stop.
    pub fn from_first_perfect(
        name: &str,
        attempts: u32,
        message: Option<&str>,
        created_at_unix_s: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            total_attempts: u64::from(attempts),
            perfect_attempts: 1,
            first_perfect_attempt: Some(attempts),
            best_time: Some(TARGET_SECONDS),
            message: message.unwrap_or(DEFAULT_MESSAGE).to_string(),
            created_at_unix_s,
        }
    }

    /// Fold another perfect stop into an existing record.
    ///
    /// Returns true when `first_perfect_attempt` improved.
    pub fn record_perfect(&mut self, attempts: u32, message: Option<&str>) -> bool {
        self.perfect_attempts = self.perfect_attempts.saturating_add(1);
        self.total_attempts = self.total_attempts.saturating_add(u64::from(attempts));
        self.best_time = Some(TARGET_SECONDS);
        if let Some(message) = message {
            self.message = message.to_string();
        }

        match self.first_perfect_attempt {
            Some(current) if attempts >= current => false,
            _ => {
                self.first_perfect_attempt = Some(attempts);
                true
            }
        }
    }

    pub fn is_ranked(&self) -> bool {
        self.first_perfect_attempt.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_perfect_fills_defaults() {
        let player = Player::from_first_perfect("A", 5, None, 42);
        assert_eq!(player.first_perfect_attempt, Some(5));
        assert_eq!(player.total_attempts, 5);
        assert_eq!(player.perfect_attempts, 1);
        assert_eq!(player.best_time, Some(10.0));
        assert_eq!(player.message, DEFAULT_MESSAGE);
        assert_eq!(player.created_at_unix_s, 42);
    }

    #[test]
    fn worse_attempt_keeps_best_but_counts() {
        let mut player = Player::from_first_perfect("A", 2, Some("gg"), 0);
        assert!(!player.record_perfect(10, None));
        assert_eq!(player.first_perfect_attempt, Some(2));
        assert_eq!(player.perfect_attempts, 2);
        assert_eq!(player.total_attempts, 12);
        assert_eq!(player.message, "gg");
    }

    #[test]
    fn equal_attempt_is_not_an_improvement() {
        let mut player = Player::from_first_perfect("A", 4, None, 0);
        assert!(!player.record_perfect(4, None));
        assert_eq!(player.first_perfect_attempt, Some(4));
    }

    #[test]
    fn better_attempt_improves_and_replaces_message() {
        let mut player = Player::from_first_perfect("A", 7, None, 0);
        assert!(player.record_perfect(3, Some("too easy")));
        assert_eq!(player.first_perfect_attempt, Some(3));
        assert_eq!(player.message, "too easy");
    }

    #[test]
    fn serializes_camel_case() {
        let player = Player::from_first_perfect("A", 1, None, 0);
        let json = serde_json::to_value(&player).unwrap();
        assert_eq!(json["firstPerfectAttempt"], 1);
        assert_eq!(json["perfectAttempts"], 1);
        assert_eq!(json["bestTime"], 10.0);
    }
}
