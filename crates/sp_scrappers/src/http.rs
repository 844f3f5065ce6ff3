use std::time::Duration;

use reqwest::{Client, Response};
use sp_core::{Error, Result, Stage};

const USER_AGENT: &str = concat!("seo-planner/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).user_agent(USER_AGENT).build()?)
}

/// Turns a non-2xx response into an upstream error carrying the body.
pub(crate) async fn ensure_success(response: Response, stage: Stage, service: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let body: String = body.trim().chars().take(300).collect();
    Err(Error::upstream(stage, format!("{} returned {}: {}", service, status, body)))
}

/// Maps transport and decoding failures onto the stage they happened in,
/// leaving configuration and zero-result errors untouched.
pub(crate) fn at_stage(stage: Stage) -> impl Fn(Error) -> Error {
    move |err| match err {
        Error::Http(e) => Error::upstream(stage, e.to_string()),
        Error::Serialization(e) => Error::upstream(stage, format!("malformed response: {}", e)),
        other => other,
    }
}
