//! gRPC server implementation for KalahaService.

use std::sync::Arc;

use tonic::metadata::{MetadataMap, MetadataValue};
use tonic::{Code, Request, Response, Status};

use crate::config::GameDefaults;
use crate::error::{GameError, ServiceError, StoreError};
use crate::games::kalaha::types::max_starting_stones;
use crate::service::GameService;
use crate::store::StoredGame;

pub mod proto {
    tonic::include_proto!("kalaha.v1");
}

use proto::kalaha_service_server::KalahaService;
use proto::*;

const INVALID_STONES: &str = "pit stones can't be zero or negative.";
const INVALID_PIT_SELECTED: &str =
    "Invalid pit selected. The pit should be selected between 1 to 6 or 8 to 13 or etc..";
const UNKNOWN_PIT_SELECTED: &str =
    "Invalid pit selected. The pitId should be one of existing valid pit";

/// The gRPC service implementation.
pub struct KalahaServer {
    service: Arc<GameService>,
    defaults: GameDefaults,
}

impl KalahaServer {
    pub fn new(service: Arc<GameService>, defaults: GameDefaults) -> Self {
        Self { service, defaults }
    }

    /// Run a service call on the blocking pool; the file repository does
    /// synchronous I/O.
    async fn blocking<T, F>(&self, f: F) -> Result<T, Status>
    where
        F: FnOnce(&GameService) -> Result<T, ServiceError> + Send + 'static,
        T: Send + 'static,
    {
        let service = Arc::clone(&self.service);
        tokio::task::spawn_blocking(move || f(&service))
            .await
            .map_err(|e| Status::internal(format!("worker task failed: {}", e)))?
            .map_err(service_error_to_status)
    }

    fn players_message(&self) -> String {
        format!(
            "number of players can't be zero or negative and can't be greater than {}",
            self.defaults.max_players
        )
    }

    /// Validate the requested player count, then narrow it to one the
    /// registered rules can play.
    fn resolve_players(&self, requested: Option<i32>) -> Result<usize, Status> {
        let requested = requested.unwrap_or(self.defaults.default_players as i32);
        if requested <= 0 || requested as usize > self.defaults.max_players {
            return Err(error_status(
                Code::InvalidArgument,
                "InvalidConfiguration",
                self.players_message(),
            ));
        }
        let requested = requested as usize;
        let supported = self.service.registry().supported_player_counts();
        if supported.contains(&requested) {
            return Ok(requested);
        }
        let clamped = supported.last().copied().unwrap_or(2);
        tracing::info!(requested, clamped, "clamping player count to a supported value");
        Ok(clamped)
    }
}

// --- Conversion helpers: engine types -> protobuf ---

pub fn game_to_proto(game: &StoredGame) -> Game {
    let board = &game.board;
    Game {
        game_id: game.game_id.clone(),
        pits: board
            .pits
            .iter()
            .map(|p| Pit {
                pit_id: p.pit_id as i32,
                stones: p.stones,
            })
            .collect(),
        player_turn: board.player_turn.map(|t| t.as_str().to_string()),
        game_status: board.game_status.as_str().to_string(),
        winner: board.winner.map(|w| w.as_str().to_string()),
        number_of_players: board.number_of_players as i32,
    }
}

fn game_response(game: &StoredGame) -> Response<GameResponse> {
    Response::new(GameResponse {
        game: Some(game_to_proto(game)),
    })
}

// --- Error mapping ---

fn error_status(code: Code, kind: &'static str, message: impl Into<String>) -> Status {
    let message = message.into();
    tracing::error!(?code, kind, %message, "request failed");
    let mut metadata = MetadataMap::new();
    metadata.insert("x-error-type", MetadataValue::from_static(kind));
    Status::with_metadata(code, message, metadata)
}

fn service_error_to_status(err: ServiceError) -> Status {
    let code = match &err {
        ServiceError::Game(
            GameError::InvalidConfiguration(_)
            | GameError::InvalidPit { .. }
            | GameError::SowFromStore(_),
        ) => Code::InvalidArgument,
        ServiceError::Game(
            GameError::NotYourTurn(_) | GameError::EmptyPit(_) | GameError::GameCompleted,
        ) => Code::FailedPrecondition,
        ServiceError::Store(StoreError::NotFound(_)) => Code::NotFound,
        ServiceError::Store(StoreError::Io { .. } | StoreError::Json { .. }) => Code::Internal,
    };
    error_status(code, err.kind(), err.to_string())
}

#[tonic::async_trait]
impl KalahaService for KalahaServer {
    // --- CreateGame ---
    async fn create_game(
        &self,
        request: Request<CreateGameRequest>,
    ) -> Result<Response<GameResponse>, Status> {
        let req = request.into_inner();
        let stones = req.stones.unwrap_or(self.defaults.default_stones as i32);
        if stones <= 0 {
            return Err(error_status(
                Code::InvalidArgument,
                "InvalidConfiguration",
                INVALID_STONES,
            ));
        }
        let players = self.resolve_players(req.number_of_players)?;
        let max_stones = max_starting_stones(players);
        if stones as u32 > max_stones {
            return Err(error_status(
                Code::InvalidArgument,
                "InvalidConfiguration",
                format!("pit stones can't be greater than {}.", max_stones),
            ));
        }

        let game = self
            .blocking(move |service| service.create_game(stones as u32, players))
            .await?;
        Ok(game_response(&game))
    }

    // --- LoadGame ---
    async fn load_game(
        &self,
        request: Request<LoadGameRequest>,
    ) -> Result<Response<GameResponse>, Status> {
        let game_id = request.into_inner().game_id;
        let game = self
            .blocking(move |service| service.load_game(&game_id))
            .await?;
        Ok(game_response(&game))
    }

    // --- Sow ---
    async fn sow(&self, request: Request<SowRequest>) -> Result<Response<GameResponse>, Status> {
        let SowRequest { game_id, pit_id } = request.into_inner();
        if pit_id < 1 || pit_id % 7 == 0 {
            return Err(error_status(
                Code::InvalidArgument,
                "InvalidPit",
                INVALID_PIT_SELECTED,
            ));
        }
        let pit_id = pit_id as usize;

        let id = game_id.clone();
        let current = self.blocking(move |service| service.load_game(&id)).await?;
        if pit_id >= current.board.total_pits() {
            return Err(error_status(
                Code::InvalidArgument,
                "InvalidPit",
                UNKNOWN_PIT_SELECTED,
            ));
        }

        let game = self
            .blocking(move |service| service.sow(&game_id, pit_id))
            .await?;
        Ok(game_response(&game))
    }
}
