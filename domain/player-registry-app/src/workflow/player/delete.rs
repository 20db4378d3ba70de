use std::sync::Arc;

use crate::domain::{PlayerId, RepoUpdateError, player::PlayerRepository};

#[async_trait::async_trait]
pub trait DeletePlayerUseCase {
    async fn delete_player(&self, id: PlayerId) -> Result<(), DeletePlayerError>;
}

#[derive(Debug)]
pub enum DeletePlayerError {
    NotFound,
    RepositoryError,
}

pub struct DeletePlayerUseCaseImpl<PR: PlayerRepository> {
    player_repository: Arc<PR>,
}

impl<PR: PlayerRepository> DeletePlayerUseCaseImpl<PR> {
    pub fn new(player_repository: Arc<PR>) -> Self {
        Self { player_repository }
    }
}

#[async_trait::async_trait]
impl<PR: PlayerRepository + Send + Sync + 'static> DeletePlayerUseCase
    for DeletePlayerUseCaseImpl<PR>
{
    async fn delete_player(&self, id: PlayerId) -> Result<(), DeletePlayerError> {
        match self.player_repository.remove_player(id).await {
            Ok(()) => {
                log::info!("Deleted player {}", id);
                Ok(())
            }
            Err(RepoUpdateError::NotFound) => Err(DeletePlayerError::NotFound),
            Err(RepoUpdateError::StorageError(e)) => {
                log::error!("Failed to delete player {}: {}", id, e);
                Err(DeletePlayerError::RepositoryError)
            }
        }
    }
}
