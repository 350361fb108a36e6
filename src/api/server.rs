use crate::api::{router, AppState};
use crate::domain::ports::GraasBackend;
use crate::utils::error::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// 綁定位址並在背景啟動服務。port 為 0 時回傳實際綁定的位址。
pub async fn start_server(
    backend: Arc<dyn GraasBackend>,
    addr: SocketAddr,
) -> Result<(SocketAddr, JoinHandle<std::io::Result<()>>)> {
    let app = router(AppState::new(backend));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;
    tracing::info!("🌍 openEO adapter listening on {}", actual_addr);

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    });

    Ok((actual_addr, handle))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
