//! HTTP contract for the leaderboard endpoint
//!
//! Transport-agnostic: the native server and any other binding translate
//! their requests into [`Request`] and write back the [`Response`].

use serde_json::{Value, json};

use super::{Clock, LeaderboardService, Submission};
use crate::error::LeaderboardError;
use crate::persistence::BlobStore;

/// Route served by [`handle`]
pub const LEADERBOARD_PATH: &str = "/leaderboard";

/// Headers carried by every response
pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Headers", "Content-Type, Accept"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Content-Type", "application/json"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Options,
    Other(String),
}

impl Method {
    pub fn parse(method: &str) -> Self {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "OPTIONS" => Method::Options,
            other => Method::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: String,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: String,
}

impl Response {
    fn new(status: u16, body: String) -> Self {
        Self {
            status,
            headers: CORS_HEADERS.to_vec(),
            body,
        }
    }

    fn json(status: u16, value: &Value) -> Self {
        Self::new(status, value.to_string())
    }

    fn error(status: u16, message: &str, details: Option<String>) -> Self {
        let body = match details {
            Some(details) => json!({ "error": message, "details": details }),
            None => json!({ "error": message }),
        };
        Self::json(status, &body)
    }
}

/// Dispatch one request
pub fn handle<S: BlobStore, C: Clock>(
    service: &LeaderboardService<S, C>,
    request: &Request,
) -> Response {
    log::debug!("{:?} {}", request.method, request.path);

    if request.method == Method::Options {
        return Response::new(204, String::new());
    }

    let path = request.path.split('?').next().unwrap_or_default();
    if path.trim_end_matches('/') != LEADERBOARD_PATH {
        return Response::error(404, "Not found", None);
    }

    match &request.method {
        Method::Get => list(service),
        Method::Post => submit(service, &request.body),
        _ => Response::error(405, "Method not allowed", None),
    }
}

fn list<S: BlobStore, C: Clock>(service: &LeaderboardService<S, C>) -> Response {
    let board = service.load();
    match serde_json::to_value(&board) {
        Ok(value) => Response::json(200, &value),
        Err(e) => Response::error(500, "Failed to load leaderboard", Some(e.to_string())),
    }
}

fn submit<S: BlobStore, C: Clock>(service: &LeaderboardService<S, C>, body: &str) -> Response {
    let result = serde_json::from_str::<Value>(body)
        .map_err(|e| LeaderboardError::Unexpected(format!("invalid request body: {e}")))
        .and_then(|value| Submission::from_json(&value))
        .and_then(|submission| service.submit(&submission));

    match result {
        Ok(outcome) => {
            let message = if outcome.persisted {
                "Score updated"
            } else {
                "Score computed but could not be saved"
            };
            Response::json(
                200,
                &json!({
                    "success": outcome.persisted,
                    "scores": outcome.scores,
                    "message": message,
                }),
            )
        }
        Err(e @ LeaderboardError::Validation(_)) => Response::error(e.status(), &e.to_string(), None),
        Err(e) => {
            log::error!("Error updating score: {e}");
            Response::error(e.status(), "Failed to update score", Some(e.to_string()))
        }
    }
}
