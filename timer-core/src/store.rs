use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::error::StoreError;
use crate::player::Player;

/// Capability set the resolver needs from persistence.
///
/// Ranking order is ascending `first_perfect_attempt`, ties broken by
/// creation order (earliest first). Unranked players are never listed.
///
/// Every mutation is a single store operation, so concurrent requests for
/// one name never write back a stale read.
pub trait PlayerStore: Send + Sync {
    fn get_by_name(&self, name: &str) -> Result<Option<Player>, StoreError>;

    /// Insert a new record. A duplicate name is a [`StoreError::Conflict`].
    fn create(&self, player: &Player) -> Result<(), StoreError>;

    /// Fold a perfect stop into the named record.
    ///
    /// Returns the stored record and whether `first_perfect_attempt`
    /// improved, or `None` when no player has this name.
    fn record_perfect(
        &self,
        name: &str,
        attempts: u32,
        message: Option<&str>,
    ) -> Result<Option<(Player, bool)>, StoreError>;

    /// Replace only the message of the record with this id.
    fn set_message(&self, id: Uuid, message: &str) -> Result<Player, StoreError>;

    fn ranked(&self) -> Result<Vec<Player>, StoreError>;

    fn count(&self) -> Result<usize, StoreError>;

    fn top(&self) -> Result<Option<Player>, StoreError> {
        Ok(self.ranked()?.into_iter().next())
    }

    /// 1-based rank, or `None` when the player is not on the leaderboard.
    fn rank(&self, id: Uuid) -> Result<Option<u32>, StoreError> {
        Ok(self
            .ranked()?
            .iter()
            .position(|player| player.id == id)
            .map(|index| index as u32 + 1))
    }
}

#[derive(Debug, Default)]
struct Roster {
    by_name: HashMap<String, Player>,
    /// Names in creation order.
    order: Vec<String>,
}

/// In-process adapter keyed by player name.
#[derive(Debug, Default)]
pub struct MemoryStore {
    roster: RwLock<Roster>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Roster>, StoreError> {
        self.roster
            .read()
            .map_err(|_| StoreError::Backend("player store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Roster>, StoreError> {
        self.roster
            .write()
            .map_err(|_| StoreError::Backend("player store lock poisoned".to_string()))
    }
}

impl PlayerStore for MemoryStore {
    fn get_by_name(&self, name: &str) -> Result<Option<Player>, StoreError> {
        Ok(self.read()?.by_name.get(name).cloned())
    }

    fn create(&self, player: &Player) -> Result<(), StoreError> {
        let mut roster = self.write()?;
        if roster.by_name.contains_key(&player.name) {
            return Err(StoreError::Conflict(format!(
                "player {:?} already exists",
                player.name
            )));
        }
        roster.order.push(player.name.clone());
        roster.by_name.insert(player.name.clone(), player.clone());
        Ok(())
    }

    fn record_perfect(
        &self,
        name: &str,
        attempts: u32,
        message: Option<&str>,
    ) -> Result<Option<(Player, bool)>, StoreError> {
        let mut roster = self.write()?;
        Ok(roster.by_name.get_mut(name).map(|player| {
            let improved = player.record_perfect(attempts, message);
            (player.clone(), improved)
        }))
    }

    fn set_message(&self, id: Uuid, message: &str) -> Result<Player, StoreError> {
        let mut roster = self.write()?;
        let player = roster
            .by_name
            .values_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::Backend(format!("player not found: {id}")))?;
        player.message = message.to_string();
        Ok(player.clone())
    }

    fn ranked(&self) -> Result<Vec<Player>, StoreError> {
        let roster = self.read()?;
        let mut ranked: Vec<Player> = roster
            .order
            .iter()
            .filter_map(|name| roster.by_name.get(name))
            .filter(|p| p.is_ranked())
            .cloned()
            .collect();
        // Stable sort keeps creation order for equal keys.
        ranked.sort_by_key(|p| p.first_perfect_attempt);
        Ok(ranked)
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.by_name.len())
    }
}
