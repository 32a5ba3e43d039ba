//! Attempt resolution, leaderboard reads and the leader's message update.

use serde::{Deserialize, Serialize};

use crate::constants::{FOUNDER_ATTEMPTS, FOUNDER_MESSAGE, FOUNDER_NAME};
use crate::error::{AttemptError, StoreError, ValidationError};
use crate::moderation::ContentFilter;
use crate::player::Player;
use crate::rules::{
    is_perfect, normalize_message, normalize_name, validate_attempts, validate_time,
};
use crate::store::PlayerStore;

/// One stopped timer, as submitted by the client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRequest {
    pub player_name: String,
    pub time: f64,
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptOutcome {
    pub is_perfect: bool,
    pub rank: Option<u32>,
    pub top_player: Option<Player>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<Player>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_new_record: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardView {
    pub players: Vec<Player>,
    pub top_player: Option<Player>,
}

/// Decide whether an attempt is perfect and fold it into the leaderboard.
///
/// Input and content checks run before any store access, so a rejected
/// request never mutates state. Misses only read the current leader.
pub fn resolve_attempt(
    store: &dyn PlayerStore,
    filter: &dyn ContentFilter,
    request: &AttemptRequest,
    now_unix_s: u64,
) -> Result<AttemptOutcome, AttemptError> {
    let name = normalize_name(&request.player_name)?;
    validate_time(request.time)?;
    validate_attempts(request.attempts)?;
    let message = normalize_message(request.message.as_deref())?;

    if !filter.is_allowed(name) {
        return Err(AttemptError::ContentRejected { field: "playerName" });
    }
    if message.is_some_and(|m| !filter.is_allowed(m)) {
        return Err(AttemptError::ContentRejected { field: "message" });
    }

    if !is_perfect(request.time) {
        return Ok(AttemptOutcome {
            is_perfect: false,
            rank: None,
            top_player: store.top()?,
            player: None,
            is_new_record: None,
        });
    }

    let (player, improved) = match store.record_perfect(name, request.attempts, message)? {
        Some(recorded) => recorded,
        None => {
            let created = Player::from_first_perfect(name, request.attempts, message, now_unix_s);
            store.create(&created)?;
            (created, true)
        }
    };

    let rank = store.rank(player.id)?;
    let is_new_record = improved && rank == Some(1) && holds_sole_record(store, &player)?;

    Ok(AttemptOutcome {
        is_perfect: true,
        rank,
        top_player: store.top()?,
        player: Some(player),
        is_new_record: Some(is_new_record),
    })
}

// Strictly better than every other ranked player; a tie is not a record.
fn holds_sole_record(store: &dyn PlayerStore, player: &Player) -> Result<bool, StoreError> {
    let Some(best) = player.first_perfect_attempt else {
        return Ok(false);
    };
    Ok(store
        .ranked()?
        .iter()
        .filter(|other| other.id != player.id)
        .all(|other| other.first_perfect_attempt.is_some_and(|f| f > best)))
}

pub fn leaderboard(store: &dyn PlayerStore) -> Result<LeaderboardView, AttemptError> {
    let players = store.ranked()?;
    let top_player = players.first().cloned();
    Ok(LeaderboardView {
        players,
        top_player,
    })
}

/// Replace the taunt message. Only the current top player may do this.
pub fn update_message(
    store: &dyn PlayerStore,
    filter: &dyn ContentFilter,
    player_name: &str,
    message: &str,
) -> Result<Player, AttemptError> {
    let name = normalize_name(player_name)?;
    let message = normalize_message(Some(message))?.ok_or(ValidationError::MissingMessage)?;
    if !filter.is_allowed(message) {
        return Err(AttemptError::ContentRejected { field: "message" });
    }

    match store.top()? {
        Some(leader) if leader.name == name => Ok(store.set_message(leader.id, message)?),
        _ => Err(AttemptError::NotLeader {
            name: name.to_string(),
        }),
    }
}

/// Seed the founder record into an empty store. Returns true if inserted.
pub fn seed_founder(store: &dyn PlayerStore, now_unix_s: u64) -> Result<bool, StoreError> {
    if store.count()? > 0 {
        return Ok(false);
    }
    let founder = Player::from_first_perfect(
        FOUNDER_NAME,
        FOUNDER_ATTEMPTS,
        Some(FOUNDER_MESSAGE),
        now_unix_s,
    );
    store.create(&founder)?;
    Ok(true)
}
