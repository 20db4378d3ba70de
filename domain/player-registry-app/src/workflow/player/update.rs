use std::sync::Arc;

use crate::domain::{
    PlayerId, RepoRetrieveError, RepoUpdateError,
    player::{Player, PlayerRepository},
    validation::{PlayerPatch, ValidationError},
};

#[async_trait::async_trait]
pub trait UpdatePlayerUseCase {
    async fn update_player(
        &self,
        id: PlayerId,
        patch: PlayerPatch,
    ) -> Result<Player, UpdatePlayerError>;
}

#[derive(Debug)]
pub enum UpdatePlayerError {
    InvalidField(ValidationError),
    NotFound,
    RepositoryError,
}

pub struct UpdatePlayerUseCaseImpl<PR: PlayerRepository> {
    player_repository: Arc<PR>,
}

impl<PR: PlayerRepository> UpdatePlayerUseCaseImpl<PR> {
    pub fn new(player_repository: Arc<PR>) -> Self {
        Self { player_repository }
    }
}

#[async_trait::async_trait]
impl<PR: PlayerRepository + Send + Sync + 'static> UpdatePlayerUseCase
    for UpdatePlayerUseCaseImpl<PR>
{
    async fn update_player(
        &self,
        id: PlayerId,
        patch: PlayerPatch,
    ) -> Result<Player, UpdatePlayerError> {
        let changes = match patch.into_changes() {
            Ok(changes) => changes,
            Err(e) => {
                log::debug!("Rejected update of player {}: {}", id, e);
                return Err(UpdatePlayerError::InvalidField(e));
            }
        };

        let current = match self.player_repository.get_player(id).await {
            Ok(player) => player,
            Err(RepoRetrieveError::NotFound) => return Err(UpdatePlayerError::NotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error loading player {} for update: {}", id, e);
                return Err(UpdatePlayerError::RepositoryError);
            }
        };

        let updated = changes.apply(&current.record).with_id(id);
        match self.player_repository.update_player(&updated).await {
            Ok(()) => {
                log::info!("Updated player {}", id);
                Ok(updated)
            }
            Err(RepoUpdateError::NotFound) => Err(UpdatePlayerError::NotFound),
            Err(RepoUpdateError::StorageError(e)) => {
                log::error!("Failed to store update of player {}: {}", id, e);
                Err(UpdatePlayerError::RepositoryError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::{
        domain::{
            level::LevelProgress,
            player::{Profession, Race},
        },
        workflow::player::fixtures::seeded,
    };

    #[tokio::test]
    async fn test_update_only_touches_present_fields() {
        let (repo, created) = seeded(&[("Theoden", Race::Human, 500)]).await;
        let use_case = UpdatePlayerUseCaseImpl::new(repo.clone());
        let original = created[0].clone();

        let patch = PlayerPatch {
            title: Some("King of Rohan".to_string()),
            ..Default::default()
        };
        let updated = use_case.update_player(original.id, patch).await.unwrap();
        assert_eq!(updated.record.title, "King of Rohan");
        assert_eq!(updated.record.name, original.record.name);
        assert_eq!(updated.record.race, original.record.race);
        assert_eq!(updated.record.profession, original.record.profession);
        assert_eq!(updated.record.birthday, original.record.birthday);
        assert_eq!(updated.record.experience, original.record.experience);
        assert_eq!(repo.get_player(original.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_recomputes_level() {
        let (repo, created) = seeded(&[("Theoden", Race::Human, 500)]).await;
        let use_case = UpdatePlayerUseCaseImpl::new(repo);

        let patch = PlayerPatch {
            experience: Some(58_000),
            profession: Some(Profession::Warlock),
            banned: Some(true),
            ..Default::default()
        };
        let updated = use_case.update_player(created[0].id, patch).await.unwrap();
        let expected = LevelProgress::from_experience(58_000);
        assert_eq!(updated.record.level, expected.level);
        assert_eq!(updated.record.until_next_level, expected.until_next_level);
        assert_eq!(updated.record.profession, Profession::Warlock);
        assert!(updated.record.banned);
    }

    #[tokio::test]
    async fn test_invalid_field_rejects_whole_update() {
        let (repo, created) = seeded(&[("Theoden", Race::Human, 500)]).await;
        let use_case = UpdatePlayerUseCaseImpl::new(repo.clone());
        let original = created[0].clone();

        let patch = PlayerPatch {
            title: Some("Valid title".to_string()),
            experience: Some(1000),
            name: Some("TwentyCharactersLong".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            use_case.update_player(original.id, patch).await,
            Err(UpdatePlayerError::InvalidField(ValidationError::InvalidField(_)))
        ));

        let patch = PlayerPatch {
            race: Some(Race::Orc),
            birthday: DateTime::from_timestamp_millis(0),
            ..Default::default()
        };
        assert!(matches!(
            use_case.update_player(original.id, patch).await,
            Err(UpdatePlayerError::InvalidField(_))
        ));

        assert_eq!(repo.get_player(original.id).await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_update_missing_player() {
        let (repo, _) = seeded(&[]).await;
        let use_case = UpdatePlayerUseCaseImpl::new(repo);
        assert!(matches!(
            use_case
                .update_player(PlayerId(1), PlayerPatch::default())
                .await,
            Err(UpdatePlayerError::NotFound)
        ));
    }
}
