//! Native leaderboard server
//!
//! Serves the leaderboard handler over plain HTTP. Requests are handled one
//! at a time, so this process is the single writer for its store.

use std::io::Read;

use anyhow::Result;
use tiny_http::{Header, Response, Server};

use crate::leaderboard::handler::{self, Method, Request};
use crate::leaderboard::{Clock, LeaderboardService};
use crate::persistence::BlobStore;

/// Largest request body read (bytes)
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

/// Bind `addr` and serve until the listener fails
pub fn serve<S: BlobStore, C: Clock>(addr: &str, service: &LeaderboardService<S, C>) -> Result<()> {
    let server =
        Server::http(addr).map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;
    log::info!("Leaderboard listening on http://{}/leaderboard", addr);

    for mut request in server.incoming_requests() {
        let mut body = String::new();
        if let Err(e) = request
            .as_reader()
            .take(MAX_BODY_BYTES)
            .read_to_string(&mut body)
        {
            log::warn!("Failed to read request body: {}", e);
        }

        let req = Request::new(
            Method::parse(&request.method().to_string()),
            request.url(),
            body,
        );
        let resp = handler::handle(service, &req);
        log::info!("{} {} -> {}", request.method(), request.url(), resp.status);

        if let Err(e) = request.respond(to_tiny(resp)) {
            log::warn!("Failed to send response: {}", e);
        }
    }

    anyhow::bail!("HTTP server stopped")
}

fn to_tiny(resp: handler::Response) -> Response<std::io::Cursor<Vec<u8>>> {
    let mut out = Response::from_string(resp.body).with_status_code(resp.status);
    for (name, value) in resp.headers {
        match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            Ok(header) => out.add_header(header),
            Err(()) => log::warn!("Skipping invalid header {}", name),
        }
    }
    out
}
