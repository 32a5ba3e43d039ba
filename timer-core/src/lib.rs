pub mod constants;
pub mod error;
pub mod game;
pub mod leaderboard;
pub mod moderation;
pub mod player;
pub mod rules;
pub mod store;

pub use error::{AttemptError, GameError, StoreError, ValidationError};
pub use game::{GameSession, Gate, GateConfig, Phase, StopResult};
pub use leaderboard::{
    leaderboard, resolve_attempt, seed_founder, update_message, AttemptOutcome, AttemptRequest,
    LeaderboardView,
};
pub use moderation::{BlockList, ContentFilter};
pub use player::Player;
pub use store::{MemoryStore, PlayerStore};
