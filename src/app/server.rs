use crate::app::routes::Gateway;
use crate::utils::error::Result;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

/// Accepts connections until `shutdown` resolves. Each connection is served
/// on its own task.
pub async fn serve<F>(listener: TcpListener, gateway: Arc<Gateway>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => handle_connection(stream, peer_addr, Arc::clone(&gateway)),
                    Err(e) => tracing::error!("Failed to accept connection: {}", e),
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received, no longer accepting connections");
                return Ok(());
            }
        }
    }
}

fn handle_connection(stream: TcpStream, peer_addr: SocketAddr, gateway: Arc<Gateway>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let service = service_fn(move |req| {
            let gateway = Arc::clone(&gateway);
            async move { gateway.handle_request(req).await }
        });

        if let Err(err) = http1::Builder::new()
            .keep_alive(true)
            .serve_connection(io, service)
            .await
        {
            tracing::debug!("Connection from {} ended with error: {}", peer_addr, err);
        }
    });
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
