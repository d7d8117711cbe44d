use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::PreviewError;

pub const DEFAULT_PORT: u16 = 4000;

/// Fail unless `dir` exists and is a directory.
pub fn check_output_dir(dir: &Path) -> Result<(), PreviewError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(PreviewError::OutputDirMissing(dir.to_path_buf()))
    }
}

/// Static file router for the built site.
pub fn router(root: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(root).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
}

/// Serve `root` on `addr` until `shutdown` resolves.
///
/// Refuses to bind when `root` is not a directory.
pub async fn serve<F>(root: &Path, addr: SocketAddr, shutdown: F) -> Result<(), PreviewError>
where
    F: Future<Output = ()> + Send + 'static,
{
    check_output_dir(root)?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| PreviewError::Bind { addr, source })?;
    let local = listener.local_addr()?;

    info!("Starting preview server on http://localhost:{}", local.port());
    info!("Serving {}", root.display());
    info!("Press Ctrl+C to stop");

    axum::serve(listener, router(root))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Preview server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or on SIGTERM where available.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Received shutdown signal");
}
