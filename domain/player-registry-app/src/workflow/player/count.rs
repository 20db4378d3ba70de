use std::sync::Arc;

use crate::domain::{
    RepoError,
    player::PlayerRepository,
    query::{PlayerFilter, filter_players},
};

#[async_trait::async_trait]
pub trait CountPlayersUseCase {
    async fn count_players(&self, filter: PlayerFilter) -> Result<usize, CountPlayersError>;
}

#[derive(Debug)]
pub enum CountPlayersError {
    RepositoryError,
}

pub struct CountPlayersUseCaseImpl<PR: PlayerRepository> {
    player_repository: Arc<PR>,
}

impl<PR: PlayerRepository> CountPlayersUseCaseImpl<PR> {
    pub fn new(player_repository: Arc<PR>) -> Self {
        Self { player_repository }
    }
}

#[async_trait::async_trait]
impl<PR: PlayerRepository + Send + Sync + 'static> CountPlayersUseCase
    for CountPlayersUseCaseImpl<PR>
{
    async fn count_players(&self, filter: PlayerFilter) -> Result<usize, CountPlayersError> {
        match self.player_repository.list_players().await {
            Ok(players) => Ok(filter_players(players, &filter).len()),
            Err(RepoError::StorageError(e)) => {
                log::error!("Error counting players: {}", e);
                Err(CountPlayersError::RepositoryError)
            }
        }
    }
}
