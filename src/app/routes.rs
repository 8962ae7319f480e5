//! Request routing: the three JSON endpoints plus the static frontend.

use crate::app::response::{
    build_404_response, build_405_response, build_file_response, build_json_response,
    build_options_response, GatewayResponse,
};
use crate::app::static_files;
use crate::core::executor::{QueryExecutor, DEFAULT_DASHBOARD_VIEW};
use crate::core::shaper::{to_json_object, to_json_records};
use hyper::body::Incoming;
use hyper::{Method, Request, StatusCode};
use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::convert::Infallible;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    DashboardPerformance,
    LeagueResults(String),
    LeagueGames(String),
    Static(String),
}

impl Route {
    /// A league segment must be a single, non-empty path segment; anything
    /// else falls through to static files.
    pub fn parse(path: &str) -> Route {
        if path == "/api/dashboard/performance" {
            return Route::DashboardPerformance;
        }
        if let Some(league) = single_segment(path, "/api/results/") {
            return Route::LeagueResults(league.to_string());
        }
        if let Some(league) = single_segment(path, "/api/games/") {
            return Route::LeagueGames(league.to_string());
        }
        Route::Static(path.to_string())
    }
}

fn single_segment<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    path.strip_prefix(prefix)
        .filter(|rest| !rest.is_empty() && !rest.contains('/'))
}

/// Percent-decodes the request path. Paths that are not UTF-8 or carry a
/// NUL byte once decoded are refused.
pub fn decode_path(path: &str) -> Option<Cow<'_, str>> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    if decoded.contains('\0') {
        return None;
    }
    Some(decoded)
}

pub fn results_table(league: &str) -> String {
    format!("{}_results", league.to_lowercase())
}

pub fn games_table(league: &str) -> String {
    format!("{}_games", league.to_lowercase())
}

/// Shared request handler; one instance serves every connection.
#[derive(Debug)]
pub struct Gateway {
    executor: QueryExecutor,
    static_dir: PathBuf,
}

impl Gateway {
    pub fn new(executor: QueryExecutor, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            static_dir: static_dir.into(),
        }
    }

    pub async fn handle_request(
        &self,
        req: Request<Incoming>,
    ) -> Result<GatewayResponse, Infallible> {
        tracing::debug!("{} {}", req.method(), req.uri());
        Ok(self.handle(req.method(), req.uri().path()).await)
    }

    pub async fn handle(&self, method: &Method, path: &str) -> GatewayResponse {
        match *method {
            Method::GET | Method::HEAD => {}
            Method::OPTIONS => return build_options_response(),
            _ => {
                tracing::warn!("Method not allowed: {} {}", method, path);
                return build_405_response();
            }
        }

        let Some(path) = decode_path(path) else {
            tracing::warn!("Rejected undecodable request path: {}", path);
            return build_404_response();
        };

        match Route::parse(&path) {
            Route::DashboardPerformance => self.dashboard_performance().await,
            Route::LeagueResults(league) => self.league_results(&league).await,
            Route::LeagueGames(league) => self.league_games(&league).await,
            Route::Static(path) => self.static_file(&path, *method == Method::HEAD).await,
        }
    }

    async fn dashboard_performance(&self) -> GatewayResponse {
        let result = self.executor.fetch_dashboard(DEFAULT_DASHBOARD_VIEW).await;
        build_json_response(StatusCode::OK, &to_json_records(&result))
    }

    /// The header row for a league, or `{}` with 404 when there is none.
    async fn league_results(&self, league: &str) -> GatewayResponse {
        let result = self
            .executor
            .fetch_single_row_header(&results_table(league))
            .await;

        match result.first() {
            Some(record) => build_json_response(StatusCode::OK, &to_json_object(record)),
            None => build_json_response(StatusCode::NOT_FOUND, &Value::Object(Map::new())),
        }
    }

    async fn league_games(&self, league: &str) -> GatewayResponse {
        let result = self.executor.fetch_game_table(&games_table(league)).await;
        build_json_response(StatusCode::OK, &to_json_records(&result))
    }

    async fn static_file(&self, path: &str, is_head: bool) -> GatewayResponse {
        match static_files::load_from_directory(&self.static_dir, path).await {
            Some(file) => build_file_response(file.content, file.content_type, is_head),
            None => build_404_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("/api/dashboard/performance"), Route::DashboardPerformance);
        assert_eq!(
            Route::parse("/api/results/NFL"),
            Route::LeagueResults("NFL".to_string())
        );
        assert_eq!(
            Route::parse("/api/games/mbb"),
            Route::LeagueGames("mbb".to_string())
        );
        assert_eq!(Route::parse("/"), Route::Static("/".to_string()));
        assert_eq!(
            Route::parse("/api/games/"),
            Route::Static("/api/games/".to_string())
        );
        assert_eq!(
            Route::parse("/api/games/nfl/extra"),
            Route::Static("/api/games/nfl/extra".to_string())
        );
    }

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("/my%20file.js").as_deref(), Some("/my file.js"));
        assert_eq!(decode_path("/api/games/%4EFL").as_deref(), Some("/api/games/NFL"));
        assert_eq!(decode_path("/plain").as_deref(), Some("/plain"));
        assert_eq!(decode_path("/bad%00name"), None);
        assert_eq!(decode_path("/bad%FFname"), None);
    }

    #[test]
    fn test_table_names() {
        assert_eq!(results_table("NFL"), "nfl_results");
        assert_eq!(games_table("Cfb"), "cfb_games");
    }
}
