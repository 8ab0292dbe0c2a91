use anyhow::Result;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::api::routes::create_router;
use crate::api::handlers::AppState;
use crate::config::settings::AppConfig;
use crate::form::Teardown;
use crate::prediction::HttpPredictor;

pub struct ServerService {
    config: AppConfig,
}

impl ServerService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<()> {
        let predictor = Arc::new(HttpPredictor::new(&self.config.prediction)?);
        info!("Forwarding predictions to {}", predictor.endpoint());

        let state = Arc::new(AppState::new(&self.config, predictor));
        let teardown = state.form.lock().await.teardown_handle();

        let app = create_router(state)
            .layer(CorsLayer::permissive());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.server.port));
        info!("Server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(teardown))
            .await?;

        Ok(())
    }
}

async fn shutdown_signal(teardown: Teardown) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {:?}", e);
        return;
    }
    info!("Shutting down, abandoning in-flight predictions");
    teardown.trigger();
}
