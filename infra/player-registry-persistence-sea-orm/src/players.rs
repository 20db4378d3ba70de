use chrono::DateTime;
use player_registry_app::domain::{
    PlayerId, RepoError, RepoRetrieveError, RepoUpdateError,
    player::{Player, PlayerRecord, PlayerRepository},
};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, TransactionError,
    TransactionTrait,
};

use crate::entity::player;

pub struct PlayerRepositoryImpl {
    db: DatabaseConnection,
}

impl PlayerRepositoryImpl {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_player(model: player::Model) -> Result<Player, String> {
        let race = model.race.parse().map_err(|e| format!("{}", e))?;
        let profession = model.profession.parse().map_err(|e| format!("{}", e))?;
        let birthday = DateTime::from_timestamp_millis(model.birthday)
            .ok_or_else(|| format!("birthday out of range: {}", model.birthday))?;
        Ok(PlayerRecord {
            name: model.name,
            title: model.title,
            race,
            profession,
            birthday,
            banned: model.banned,
            experience: model.experience,
            level: model.level,
            until_next_level: model.until_next_level,
        }
        .with_id(PlayerId(model.id)))
    }

    fn record_to_model(record: &PlayerRecord) -> player::ActiveModel {
        player::ActiveModel {
            id: sea_orm::NotSet,
            name: sea_orm::Set(record.name.clone()),
            title: sea_orm::Set(record.title.clone()),
            race: sea_orm::Set(record.race.to_string()),
            profession: sea_orm::Set(record.profession.to_string()),
            birthday: sea_orm::Set(record.birthday.timestamp_millis()),
            banned: sea_orm::Set(record.banned),
            experience: sea_orm::Set(record.experience),
            level: sea_orm::Set(record.level),
            until_next_level: sea_orm::Set(record.until_next_level),
        }
    }
}

#[async_trait::async_trait]
impl PlayerRepository for PlayerRepositoryImpl {
    async fn create_player(&self, record: PlayerRecord) -> Result<Player, RepoError> {
        let model = Self::record_to_model(&record)
            .insert(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(record.with_id(PlayerId(model.id)))
    }

    async fn get_player(&self, id: PlayerId) -> Result<Player, RepoRetrieveError> {
        let model = player::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
            .ok_or(RepoRetrieveError::NotFound)?;
        Self::model_to_player(model).map_err(RepoRetrieveError::StorageError)
    }

    async fn list_players(&self) -> Result<Vec<Player>, RepoError> {
        let models = player::Entity::find()
            .order_by_asc(player::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        models
            .into_iter()
            .map(|model| Self::model_to_player(model).map_err(RepoError::StorageError))
            .collect()
    }

    async fn update_player(&self, updated: &Player) -> Result<(), RepoUpdateError> {
        let id = updated.id.0;
        let mut active_model = Self::record_to_model(&updated.record);
        active_model.id = sea_orm::Unchanged(id);

        let res = self
            .db
            .transaction::<_, (), RepoUpdateError>(|c| {
                Box::pin(async move {
                    let existing = player::Entity::find_by_id(id)
                        .one(c)
                        .await
                        .map_err(|e| RepoUpdateError::StorageError(e.to_string()))?;
                    if existing.is_none() {
                        return Err(RepoUpdateError::NotFound);
                    }
                    active_model
                        .update(c)
                        .await
                        .map_err(|e| RepoUpdateError::StorageError(e.to_string()))?;
                    Ok(())
                })
            })
            .await;

        match res {
            Ok(()) => Ok(()),
            Err(TransactionError::Transaction(e)) => Err(e),
            Err(TransactionError::Connection(e)) => {
                Err(RepoUpdateError::StorageError(e.to_string()))
            }
        }
    }

    async fn remove_player(&self, id: PlayerId) -> Result<(), RepoUpdateError> {
        let res = player::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| RepoUpdateError::StorageError(e.to_string()))?;
        if res.rows_affected == 0 {
            return Err(RepoUpdateError::NotFound);
        }
        Ok(())
    }
}
