use picks_gateway::app::server;
use picks_gateway::{Connection, Gateway, QueryExecutor};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[tokio::test]
async fn test_serves_over_tcp_until_shutdown() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>Model Accuracy</h1>").unwrap();

    let gateway = Arc::new(Gateway::new(
        QueryExecutor::new(Connection::disconnected("no credentials in tests")),
        dir.path(),
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(server::serve(listener, gateway, async move {
        let _ = stop_rx.await;
    }));

    let client = reqwest::Client::new();

    let index = client
        .get(format!("http://{}/", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(index.status(), 200);
    assert_eq!(index.text().await.unwrap(), "<h1>Model Accuracy</h1>");

    let games = client
        .get(format!("http://{}/api/games/nfl", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(games.status(), 200);
    let body: serde_json::Value = games.json().await.unwrap();
    assert_eq!(body, serde_json::json!([]));

    stop_tx.send(()).unwrap();
    handle.await.unwrap().unwrap();
}
