//! HTTP responses for route lookups.
//!
//! Bodies are JSON: the resolution as the route service sees it. Redirects
//! additionally carry a `Location` header with the base-prefixed target.

use anyhow::{Result, anyhow};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::route::{Resolution, RouteSnapshot};

const JSON: &str = "application/json; charset=utf-8";
const PLAIN: &str = "text/plain; charset=utf-8";

/// Respond with the outcome of a lookup.
pub fn respond_resolution(request: Request, resolution: &Resolution<'_>, base: &str) -> Result<()> {
    let body = serde_json::to_vec(resolution)?;

    match resolution {
        Resolution::Redirect { to, .. } => {
            let location = to.with_base(base);
            let response = Response::from_data(body)
                .with_status_code(StatusCode(301))
                .with_header(make_header("Content-Type", JSON)?)
                .with_header(make_header("Location", &location)?);
            send(request, response)
        }
        Resolution::Page { .. } => send_body(request, 200, JSON, body),
        Resolution::NotFound { .. } => send_body(request, 404, JSON, body),
    }
}

/// Respond with the whole current snapshot, in the `routes.json` format.
pub fn respond_snapshot(request: Request, snapshot: &RouteSnapshot) -> Result<()> {
    let body = snapshot.to_json()?.into_bytes();
    send_body(request, 200, JSON, body)
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

/// Respond with 405 for anything but GET/HEAD.
pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    let response = Response::from_data(b"405 Method Not Allowed".to_vec())
        .with_status_code(StatusCode(405))
        .with_header(make_header("Content-Type", PLAIN)?)
        .with_header(make_header("Allow", "GET, HEAD")?);
    send(request, response)
}

pub fn is_readable_request(request: &Request) -> bool {
    matches!(request.method(), Method::Get | Method::Head)
}

fn send_body(request: Request, status: u16, content_type: &str, body: Vec<u8>) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type)?);
    send(request, response)
}

fn send<R: std::io::Read>(request: Request, response: Response<R>) -> Result<()> {
    // tiny_http drops the body itself for HEAD
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow!("invalid header `{key}: {value}`"))
}
