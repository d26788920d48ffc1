//! HTTP API over the published samples.
//!
//! Exposes `/v1/current`, `/v1/history`, `/v1/moreInfo` and `/v1/health`,
//! all read-only snapshots of the shared state.

pub mod config;
pub mod handlers;
pub mod router;

// Re-export commonly used items
pub use config::WebConfig;
pub use router::create_app;

use crate::error::{Result, SystemError};
use crate::state::SharedState;
use std::future::Future;
use std::net::SocketAddr;
use tracing::info;

/// Serve the API until `shutdown` resolves.
pub async fn start_web_server<F>(config: WebConfig, state: SharedState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_app(&config, state);

    // Parse the bind address
    let addr = config
        .bind_address()
        .parse::<SocketAddr>()
        .map_err(|e| SystemError::config_error(format!("Invalid bind address: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Starting hoststat web server on http://{}", addr);
    info!("API endpoints: http://{}/v1/{{current,history,moreInfo,health}}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| SystemError::web_server_error(format!("Server error: {}", e)))?;

    info!("Web server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StateStore;

    #[tokio::test]
    async fn test_rejects_bad_bind_address() {
        let config = WebConfig::new("not an address", 9527);
        let result = start_web_server(config, StateStore::shared(), async {}).await;
        assert!(matches!(result, Err(SystemError::Config(_))));
    }

    #[tokio::test]
    async fn test_port_in_use_is_io_error() {
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let config = WebConfig::new("127.0.0.1", port);
        let result = start_web_server(config, StateStore::shared(), async {}).await;
        match result {
            Err(SystemError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::AddrInUse),
            other => panic!("expected an I/O error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stops_on_shutdown() {
        let config = WebConfig::new("127.0.0.1", 0);
        let result = start_web_server(config, StateStore::shared(), async {}).await;
        assert!(result.is_ok());
    }
}
