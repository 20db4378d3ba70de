use std::{collections::BTreeMap, sync::Mutex};

use crate::domain::{
    PlayerId, RepoError, RepoRetrieveError, RepoUpdateError,
    player::{Player, PlayerRecord, PlayerRepository},
};

#[derive(Default)]
struct Store {
    players: BTreeMap<PlayerId, PlayerRecord>,
    last_id: i64,
}

/// Process-local player store. Ids start at 1 and are never reused.
#[derive(Default)]
pub struct InMemoryPlayerRepository {
    store: Mutex<Store>,
}

impl InMemoryPlayerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Store>, String> {
        self.store
            .lock()
            .map_err(|_| "player store mutex poisoned".to_string())
    }
}

#[async_trait::async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    async fn create_player(&self, record: PlayerRecord) -> Result<Player, RepoError> {
        let mut store = self.lock().map_err(RepoError::StorageError)?;
        store.last_id += 1;
        let id = PlayerId(store.last_id);
        store.players.insert(id, record.clone());
        Ok(record.with_id(id))
    }

    async fn get_player(&self, id: PlayerId) -> Result<Player, RepoRetrieveError> {
        let store = self.lock().map_err(RepoRetrieveError::StorageError)?;
        store
            .players
            .get(&id)
            .map(|record| record.clone().with_id(id))
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn list_players(&self) -> Result<Vec<Player>, RepoError> {
        let store = self.lock().map_err(RepoError::StorageError)?;
        Ok(store
            .players
            .iter()
            .map(|(id, record)| record.clone().with_id(*id))
            .collect())
    }

    async fn update_player(&self, player: &Player) -> Result<(), RepoUpdateError> {
        let mut store = self.lock().map_err(RepoUpdateError::StorageError)?;
        match store.players.get_mut(&player.id) {
            Some(record) => {
                *record = player.record.clone();
                Ok(())
            }
            None => Err(RepoUpdateError::NotFound),
        }
    }

    async fn remove_player(&self, id: PlayerId) -> Result<(), RepoUpdateError> {
        let mut store = self.lock().map_err(RepoUpdateError::StorageError)?;
        store
            .players
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoUpdateError::NotFound)
    }
}
