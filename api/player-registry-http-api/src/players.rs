use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use player_registry_app::domain::{
    PlayerId,
    player::{Player, Profession, Race},
    query::{PageRequest, PlayerFilter, PlayerOrder, PlayerQuery},
    validation::{PlayerDraft, PlayerPatch},
};

use crate::{ApiError, AppState};

#[derive(serde::Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JsonPlayer {
    id: i64,
    name: String,
    title: String,
    race: String,
    profession: String,
    birthday: i64,
    banned: bool,
    experience: i32,
    level: i32,
    until_next_level: i32,
}

impl From<Player> for JsonPlayer {
    fn from(player: Player) -> Self {
        let record = player.record;
        Self {
            id: player.id.0,
            name: record.name,
            title: record.title,
            race: record.race.to_string(),
            profession: record.profession.to_string(),
            birthday: record.birthday.timestamp_millis(),
            banned: record.banned,
            experience: record.experience,
            level: record.level,
            until_next_level: record.until_next_level,
        }
    }
}

/// Body of create and update requests. `id`, `level` and `untilNextLevel`
/// are accepted but ignored.
#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct JsonPlayerBody {
    name: Option<String>,
    title: Option<String>,
    race: Option<String>,
    profession: Option<String>,
    birthday: Option<i64>,
    banned: Option<bool>,
    experience: Option<i32>,
}

fn parse_field<T: std::str::FromStr>(value: Option<String>) -> Result<Option<T>, ()> {
    value.map(|v| v.parse::<T>().map_err(|_| ())).transpose()
}

fn parse_millis(value: Option<i64>) -> Result<Option<DateTime<Utc>>, ()> {
    value
        .map(|ms| DateTime::from_timestamp_millis(ms).ok_or(()))
        .transpose()
}

impl JsonPlayerBody {
    fn into_draft(self) -> Result<PlayerDraft, ApiError> {
        let invalid = |_| ApiError::ValidationFailure;
        Ok(PlayerDraft {
            race: parse_field::<Race>(self.race).map_err(invalid)?,
            profession: parse_field::<Profession>(self.profession).map_err(invalid)?,
            birthday: parse_millis(self.birthday).map_err(invalid)?,
            name: self.name,
            title: self.title,
            banned: self.banned,
            experience: self.experience,
        })
    }

    fn into_patch(self) -> Result<PlayerPatch, ApiError> {
        let invalid = |_| ApiError::FieldValidationFailure;
        Ok(PlayerPatch {
            race: parse_field::<Race>(self.race).map_err(invalid)?,
            profession: parse_field::<Profession>(self.profession).map_err(invalid)?,
            birthday: parse_millis(self.birthday).map_err(invalid)?,
            name: self.name,
            title: self.title,
            banned: self.banned,
            experience: self.experience,
        })
    }
}

#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct JsonPlayerQuery {
    name: Option<String>,
    title: Option<String>,
    race: Option<String>,
    profession: Option<String>,
    after: Option<i64>,
    before: Option<i64>,
    banned: Option<bool>,
    min_experience: Option<i32>,
    max_experience: Option<i32>,
    min_level: Option<i32>,
    max_level: Option<i32>,
    order: Option<String>,
    page_number: Option<usize>,
    page_size: Option<usize>,
}

impl JsonPlayerQuery {
    fn to_filter(&self) -> Result<PlayerFilter, ApiError> {
        let bad_request = |_| ApiError::ValidationFailure;
        Ok(PlayerFilter {
            name: self.name.clone(),
            title: self.title.clone(),
            race: parse_field::<Race>(self.race.clone()).map_err(bad_request)?,
            profession: parse_field::<Profession>(self.profession.clone())
                .map_err(bad_request)?,
            born_after: parse_millis(self.after).map_err(bad_request)?,
            born_before: parse_millis(self.before).map_err(bad_request)?,
            banned: self.banned,
            min_experience: self.min_experience,
            max_experience: self.max_experience,
            min_level: self.min_level,
            max_level: self.max_level,
        })
    }

    fn to_query(&self) -> Result<PlayerQuery, ApiError> {
        let order = self
            .order
            .as_deref()
            .map(|order| {
                order
                    .parse::<PlayerOrder>()
                    .map_err(|_| ApiError::ValidationFailure)
            })
            .transpose()?;
        Ok(PlayerQuery {
            filter: self.to_filter()?,
            order,
            page: PageRequest::new(self.page_number, self.page_size),
        })
    }
}

fn parse_id(raw: &str) -> Result<PlayerId, ApiError> {
    PlayerId::parse(raw).ok_or(ApiError::MalformedIdentifier)
}

fn parse_body(
    body: Result<Json<JsonPlayerBody>, JsonRejection>,
) -> Result<JsonPlayerBody, ApiError> {
    match body {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            log::debug!("Rejected player body: {}", rejection);
            Err(ApiError::ValidationFailure)
        }
    }
}

fn parse_query(
    query: Result<Query<JsonPlayerQuery>, QueryRejection>,
) -> Result<JsonPlayerQuery, ApiError> {
    match query {
        Ok(Query(params)) => Ok(params),
        Err(rejection) => {
            log::debug!("Rejected player query: {}", rejection);
            Err(ApiError::ValidationFailure)
        }
    }
}

pub async fn list_players(
    State(state): State<AppState>,
    query: Result<Query<JsonPlayerQuery>, QueryRejection>,
) -> Result<Json<Vec<JsonPlayer>>, ApiError> {
    let query = parse_query(query)?.to_query()?;
    let players = state.app.player_list_use_case.list_players(query).await?;
    Ok(Json(players.into_iter().map(JsonPlayer::from).collect()))
}

pub async fn count_players(
    State(state): State<AppState>,
    query: Result<Query<JsonPlayerQuery>, QueryRejection>,
) -> Result<Json<usize>, ApiError> {
    let filter = parse_query(query)?.to_filter()?;
    let count = state.app.player_count_use_case.count_players(filter).await?;
    Ok(Json(count))
}

pub async fn create_player(
    State(state): State<AppState>,
    body: Result<Json<JsonPlayerBody>, JsonRejection>,
) -> Result<Json<JsonPlayer>, ApiError> {
    let draft = parse_body(body)?.into_draft()?;
    let player = state.app.player_create_use_case.create_player(draft).await?;
    Ok(Json(player.into()))
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JsonPlayer>, ApiError> {
    let id = parse_id(&id)?;
    let player = state.app.player_get_use_case.get_player(id).await?;
    Ok(Json(player.into()))
}

pub async fn update_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<JsonPlayerBody>, JsonRejection>,
) -> Result<Json<JsonPlayer>, ApiError> {
    let id = parse_id(&id)?;
    let patch = parse_body(body)
        .map_err(|_| ApiError::FieldValidationFailure)?
        .into_patch()?;
    let player = state
        .app
        .player_update_use_case
        .update_player(id, patch)
        .await?;
    Ok(Json(player.into()))
}

pub async fn delete_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.app.player_delete_use_case.delete_player(id).await?;
    Ok(StatusCode::OK)
}
