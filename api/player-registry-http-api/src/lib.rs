use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use log::info;
use player_registry_app::{
    Application,
    workflow::player::{
        count::CountPlayersError, create::CreatePlayerError, delete::DeletePlayerError,
        get::GetPlayerError, list::ListPlayersError, update::UpdatePlayerError,
    },
};

mod players;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Application>,
}

pub fn router(app: Arc<Application>) -> Router {
    Router::new()
        .nest(
            "/rest",
            Router::new()
                .route(
                    "/players",
                    get(players::list_players).post(players::create_player),
                )
                .route("/players/count", get(players::count_players))
                .route(
                    "/players/{id}",
                    get(players::get_player)
                        .post(players::update_player)
                        .delete(players::delete_player),
                ),
        )
        .with_state(AppState { app })
}

pub async fn run(
    app: Arc<Application>,
    host: &str,
    port: u16,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;

    info!("API server listening on {}:{}", host, port);
    axum::serve(listener, router(app))
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("HTTP API shut down gracefully");
    Ok(())
}

/// Error responses carry a status code and no body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    MalformedIdentifier,
    ValidationFailure,
    FieldValidationFailure,
    NotFound,
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedIdentifier
            | ApiError::ValidationFailure
            | ApiError::FieldValidationFailure => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.status().into_response()
    }
}

impl From<ListPlayersError> for ApiError {
    fn from(value: ListPlayersError) -> Self {
        match value {
            ListPlayersError::RepositoryError => ApiError::Internal,
        }
    }
}

impl From<CountPlayersError> for ApiError {
    fn from(value: CountPlayersError) -> Self {
        match value {
            CountPlayersError::RepositoryError => ApiError::Internal,
        }
    }
}

impl From<CreatePlayerError> for ApiError {
    fn from(value: CreatePlayerError) -> Self {
        match value {
            CreatePlayerError::InvalidPlayer(_) => ApiError::ValidationFailure,
            CreatePlayerError::RepositoryError => ApiError::Internal,
        }
    }
}

impl From<GetPlayerError> for ApiError {
    fn from(value: GetPlayerError) -> Self {
        match value {
            GetPlayerError::NotFound => ApiError::NotFound,
            GetPlayerError::RepositoryError => ApiError::Internal,
        }
    }
}

impl From<UpdatePlayerError> for ApiError {
    fn from(value: UpdatePlayerError) -> Self {
        match value {
            UpdatePlayerError::InvalidField(_) => ApiError::FieldValidationFailure,
            UpdatePlayerError::NotFound => ApiError::NotFound,
            UpdatePlayerError::RepositoryError => ApiError::Internal,
        }
    }
}

impl From<DeletePlayerError> for ApiError {
    fn from(value: DeletePlayerError) -> Self {
        match value {
            DeletePlayerError::NotFound => ApiError::NotFound,
            DeletePlayerError::RepositoryError => ApiError::Internal,
        }
    }
}
