use httpmock::prelude::*;
use picks_gateway::core::executor::DEFAULT_DASHBOARD_VIEW;
use picks_gateway::{
    to_json_records, Connection, GatewayError, PostgrestClient, QueryExecutor, QuerySpec, Scalar,
};
use serde_json::{json, Value};

fn executor_for(server: &MockServer) -> QueryExecutor {
    let client = PostgrestClient::new(&server.base_url(), "test-key").unwrap();
    QueryExecutor::new(Connection::connected(client))
}

#[tokio::test]
async fn test_game_table_end_to_end() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/nfl_games")
                .query_param("select", "*")
                .query_param("order", "gameday.asc")
                .header("apikey", "test-key");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([
                    {"gameday": "2024-09-05", "home_team": "KC", "away_team": "BAL", "confidence": 0.62},
                    {"gameday": "2024-09-08T13:00:00", "home_team": "BUF", "away_team": "ARI", "confidence": null}
                ]));
        })
        .await;

    let executor = executor_for(&server);
    let result = executor.fetch_game_table("nfl_games").await;
    api_mock.assert_async().await;

    assert_eq!(result.len(), 2);
    assert!(matches!(
        result.records()[1].get("gameday"),
        Some(Scalar::DateTime(_))
    ));

    let records = to_json_records(&result);
    assert_eq!(records[0]["gameday"], json!("2024-09-05T00:00:00"));
    assert_eq!(records[0]["gameday_formatted"], json!("Thursday, September 05"));
    assert_eq!(records[1]["gameday_formatted"], json!("Sunday, September 08"));
    assert_eq!(records[1]["confidence"], Value::Null);

    let keys: Vec<&String> = records[0].keys().collect();
    assert_eq!(
        keys,
        vec!["gameday", "home_team", "away_team", "confidence", "gameday_formatted"]
    );
}

#[tokio::test]
async fn test_dashboard_view() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/league_dashboard")
                .query_param("order", "game_week_start.asc");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([
                    {"league": "nfl", "game_week_start": "2024-09-02T00:00:00+00:00", "weekly_accuracy": 0.69},
                    {"league": "nba", "game_week_start": "2024-10-21T00:00:00+00:00", "weekly_accuracy": 0.58}
                ]));
        })
        .await;

    let executor = executor_for(&server);
    let result = executor.fetch_dashboard(DEFAULT_DASHBOARD_VIEW).await;
    api_mock.assert_async().await;

    let records = to_json_records(&result);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["game_week_start"], json!("2024-09-02T00:00:00"));
    assert!(!records[0].contains_key("gameday_formatted"));
}

#[tokio::test]
async fn test_empty_table_and_failure_look_the_same() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/cfb_games");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/xfl_games");
            then.status(404)
                .json_body(json!({"code": "42P01", "message": "relation does not exist"}));
        })
        .await;

    let executor = executor_for(&server);

    let empty = executor.fetch_game_table("cfb_games").await;
    let failed = executor.fetch_game_table("xfl_games").await;
    assert!(empty.is_empty());
    assert!(failed.is_empty());
    assert!(to_json_records(&empty).is_empty());
    assert!(to_json_records(&failed).is_empty());

    let err = executor
        .try_execute(&QuerySpec::new("xfl_games"))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::RemoteStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_unreachable_service_degrades() {
    // Nothing listens on port 9 (discard) in test environments.
    let client = PostgrestClient::new("http://127.0.0.1:9", "test-key").unwrap();
    let executor = QueryExecutor::new(Connection::connected(client));

    assert!(executor.fetch_single_row_header("nfl_results").await.is_empty());

    let err = executor
        .try_execute(&QuerySpec::new("nfl_results"))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Http(_)));
}

#[tokio::test]
async fn test_header_row() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/nba_results")
                .query_param("select", "*");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([{"total_games": 412, "correct": 263, "accuracy": 0.638}]));
        })
        .await;

    let executor = executor_for(&server);
    let result = executor.fetch_single_row_header("nba_results").await;
    api_mock.assert_async().await;

    assert_eq!(result.len(), 1);
    assert_eq!(result.first().unwrap().get("correct"), Some(&Scalar::Int(263)));
}
