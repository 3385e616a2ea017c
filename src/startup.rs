use crate::{
    app_state::AppState,
    authentication::AuthResolutionLayer,
    configuration::{DatabaseSettings, Settings, StorageBackend},
    request_id::{request_span, RequestUuid},
    routes::{auth, available_services, dashboard, health_check, subscriptions, users},
    storage::{InMemoryStore, PgStore, Store},
};
use axum::Router;
use secrecy::ExposeSecret;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{trace::TraceLayer, ServiceBuilderExt};
use tower_sessions::{cookie::Key, Expiry, MemoryStore, SessionManagerLayer};

pub struct Application {
    local_addr: SocketAddr,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: Settings) -> Application {
        let store: Arc<dyn Store> = match config.database.backend {
            StorageBackend::Postgres => {
                let pool = get_connection_pool(&config.database);
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .expect("Failed to migrate the database");
                Arc::new(PgStore::new(pool))
            }
            StorageBackend::Memory => Arc::new(InMemoryStore::new()),
        };

        Self::build_with_store(config, store).await
    }

    /// Assembles the application around an externally built store. Used by
    /// tests to reach behind the HTTP surface.
    pub async fn build_with_store(config: Settings, store: Arc<dyn Store>) -> Application {
        let listener = TcpListener::bind(format!(
            "{}:{}",
            config.application.host, config.application.port
        ))
        .await
        .expect("Failed to bind a listener");
        let local_addr = listener
            .local_addr()
            .expect("Failed to get the local address");

        Application {
            local_addr,
            listener,
            router: app_router(&config, store),
        }
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        tracing::info!("Listening on {}", self.local_addr);
        axum::serve(self.listener, self.router).await
    }
}

pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(configuration.with_db())
}

fn app_router(config: &Settings, store: Arc<dyn Store>) -> Router {
    let key = Key::try_from(config.application.hmac_secret.expose_secret().as_bytes())
        .expect("hmac_secret must be at least 64 bytes long");

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.application.cookie_secure)
        .with_expiry(Expiry::OnInactivity(config.application.session_ttl()))
        .with_private(key);

    Router::new()
        .merge(health_check::router())
        .merge(auth::router())
        .merge(subscriptions::router())
        .merge(available_services::router())
        .merge(users::router())
        .merge(dashboard::router())
        .layer(
            ServiceBuilder::new()
                .set_x_request_id(RequestUuid)
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .propagate_x_request_id()
                .layer(session_layer)
                .layer(AuthResolutionLayer::new(store.clone())),
        )
        .with_state(AppState::new(store))
}
