use serde::{Deserialize, Serialize};
use timer_core::{AttemptRequest, Player, ValidationError};

/// Wire body for `POST /api/attempt`.
///
/// Fields are optional so that a missing field surfaces as a validation
/// error instead of a generic JSON parse failure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AttemptBody {
    #[serde(default)]
    pub(crate) player_name: Option<String>,
    #[serde(default)]
    pub(crate) time: Option<f64>,
    #[serde(default)]
    pub(crate) attempts: Option<u32>,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

impl AttemptBody {
    pub(crate) fn into_request(self) -> Result<AttemptRequest, ValidationError> {
        Ok(AttemptRequest {
            player_name: self.player_name.ok_or(ValidationError::MissingName)?,
            time: self.time.ok_or(ValidationError::MissingTime)?,
            attempts: self.attempts.ok_or(ValidationError::MissingAttempts)?,
            message: self.message,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateMessageBody {
    #[serde(default)]
    pub(crate) player_name: Option<String>,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateMessageResponse {
    pub(crate) success: bool,
    pub(crate) player: Player,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    pub(crate) service: &'static str,
    pub(crate) store_backend: &'static str,
    pub(crate) players: usize,
    pub(crate) ranked_players: usize,
}
