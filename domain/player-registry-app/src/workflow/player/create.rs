use std::sync::Arc;

use crate::domain::{
    RepoError,
    player::{Player, PlayerRepository},
    validation::{PlayerDraft, ValidationError},
};

#[async_trait::async_trait]
pub trait CreatePlayerUseCase {
    async fn create_player(&self, draft: PlayerDraft) -> Result<Player, CreatePlayerError>;
}

#[derive(Debug)]
pub enum CreatePlayerError {
    InvalidPlayer(ValidationError),
    RepositoryError,
}

pub struct CreatePlayerUseCaseImpl<PR: PlayerRepository> {
    player_repository: Arc<PR>,
}

impl<PR: PlayerRepository> CreatePlayerUseCaseImpl<PR> {
    pub fn new(player_repository: Arc<PR>) -> Self {
        Self { player_repository }
    }
}

#[async_trait::async_trait]
impl<PR: PlayerRepository + Send + Sync + 'static> CreatePlayerUseCase
    for CreatePlayerUseCaseImpl<PR>
{
    async fn create_player(&self, draft: PlayerDraft) -> Result<Player, CreatePlayerError> {
        let record = match draft.into_record() {
            Ok(record) => record,
            Err(e) => {
                log::debug!("Rejected new player: {}", e);
                return Err(CreatePlayerError::InvalidPlayer(e));
            }
        };
        match self.player_repository.create_player(record).await {
            Ok(player) => {
                log::info!("Created player {} ({})", player.id, player.record.name);
                Ok(player)
            }
            Err(RepoError::StorageError(e)) => {
                log::error!("Failed to store new player: {}", e);
                Err(CreatePlayerError::RepositoryError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            PlayerId,
            level::LevelProgress,
            memory::InMemoryPlayerRepository,
            player::Race,
        },
        workflow::player::fixtures::draft,
    };

    #[tokio::test]
    async fn test_create_assigns_id_and_level() {
        let repo = Arc::new(InMemoryPlayerRepository::new());
        let use_case = CreatePlayerUseCaseImpl::new(repo.clone());

        let player = use_case
            .create_player(draft("Galadriel", Race::Elf, 1000))
            .await
            .unwrap();
        assert_eq!(player.id, PlayerId(1));
        assert!(!player.record.banned);

        let expected = LevelProgress::from_experience(1000);
        let stored = repo.get_player(player.id).await.unwrap();
        assert_eq!(stored.record.level, expected.level);
        assert_eq!(stored.record.until_next_level, expected.until_next_level);
        assert_eq!(stored, player);
    }

    #[tokio::test]
    async fn test_invalid_player_is_not_stored() {
        let repo = Arc::new(InMemoryPlayerRepository::new());
        let use_case = CreatePlayerUseCaseImpl::new(repo.clone());

        let mut invalid = draft("Galadriel", Race::Elf, 1000);
        invalid.experience = Some(10_000_001);
        assert!(matches!(
            use_case.create_player(invalid).await,
            Err(CreatePlayerError::InvalidPlayer(ValidationError::InvalidField(_)))
        ));

        let mut incomplete = draft("Galadriel", Race::Elf, 1000);
        incomplete.race = None;
        assert!(matches!(
            use_case.create_player(incomplete).await,
            Err(CreatePlayerError::InvalidPlayer(ValidationError::MissingField("race")))
        ));

        assert!(repo.list_players().await.unwrap().is_empty());
    }
}
