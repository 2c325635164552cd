//! Server execution logic.

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use gambit_shared::time::Clock;
use tokio::{net::TcpListener, task::JoinHandle, time::MissedTickBehavior};
use tower_http::trace::TraceLayer;

use crate::{
    domain::{GameRecordStore, MessagePusher, RoomRepository},
    usecase::{GetRoomDetailUseCase, GetRoomsUseCase, ReapIdleRoomsUseCase},
};

use super::{
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    router::EventRouter,
    signal::shutdown_signal,
    state::AppState,
};

/// 放置された Room を削除するまでの既定の猶予
pub const DEFAULT_IDLE_ROOM_TIMEOUT: Duration = Duration::from_secs(30 * 60);
/// 放置 Room を確認する既定の間隔
pub const DEFAULT_REAP_INTERVAL: Duration = Duration::from_secs(60);

/// Server settings that are not part of the bind address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    /// 接続中のメンバーがいない Room を残しておく時間
    pub idle_room_timeout: Duration,
    /// 放置 Room の確認間隔
    pub reap_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            idle_room_timeout: DEFAULT_IDLE_ROOM_TIMEOUT,
            reap_interval: DEFAULT_REAP_INTERVAL,
        }
    }
}

/// WebSocket game-room server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     repository,
///     message_pusher,
///     record_store,
///     clock,
///     ServerConfig::default(),
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    /// ReapIdleRoomsUseCase（放置 Room 削除のユースケース）
    reap_idle_rooms_usecase: Arc<ReapIdleRoomsUseCase>,
    config: ServerConfig,
}

impl Server {
    /// Create a new Server instance and wire the usecases to the given dependencies
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        record_store: Arc<dyn GameRecordStore>,
        clock: Arc<dyn Clock>,
        config: ServerConfig,
    ) -> Self {
        let router = Arc::new(EventRouter::new(
            repository.clone(),
            message_pusher.clone(),
            record_store,
            clock.clone(),
        ));
        let state = Arc::new(AppState {
            message_pusher,
            router,
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(repository.clone())),
        });
        let reap_idle_rooms_usecase = Arc::new(ReapIdleRoomsUseCase::new(
            repository,
            clock,
            config.idle_room_timeout,
        ));

        Self {
            state,
            reap_idle_rooms_usecase,
            config,
        }
    }

    fn app(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server until Ctrl+C
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Gambit server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves
    ///
    /// The idle-room reaper runs for as long as the server does.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let reaper = spawn_reaper(self.reap_idle_rooms_usecase.clone(), self.config.reap_interval);
        let app = self.app();

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        reaper.abort();
        tracing::info!("Server shutdown complete");
        result
    }
}

fn spawn_reaper(usecase: Arc<ReapIdleRoomsUseCase>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // 最初の tick は即座に完了する
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let reaped = usecase.execute().await;
            if !reaped.is_empty() {
                tracing::debug!("Reaped {} idle room(s)", reaped.len());
            }
        }
    })
}
