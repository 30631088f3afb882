use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::authentication::Authentication;
use super::endpoint::Endpoint;
use crate::error::ApiError;

// Turns a non-2xx response into an error carrying whatever body the
// server sent back, which is where Google puts the useful detail.
fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
    Err(ApiError::Status { status, body })
}

pub fn post<T, U, B, R>(
    client: &Client,
    endpoint: &T,
    authentication: &U,
    body: &B,
) -> Result<R, ApiError>
where
    T: Endpoint,
    U: Authentication,
    B: Serialize,
    R: DeserializeOwned,
{
    let url = endpoint.url();
    debug!("POST {}", url);
    let mut request_builder = client.post(&url).json(body);
    for (name, value) in endpoint.headers() {
        request_builder = request_builder.header(name, value);
    }
    request_builder = authentication.apply(request_builder);
    let response = request_builder.send().map_err(ApiError::Transport)?;
    check_status(response)?.json().map_err(ApiError::Decode)
}
