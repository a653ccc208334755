//! HTTP fetching for upload sources.
//!
//! The upload command accepts local paths or URLs; [`HttpClient`] keeps the
//! HTTP side behind a trait so tests can stub it out.

mod client;
mod basic;

pub use client::HttpClient;
pub use basic::BasicClient;

use anyhow::Result;

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    Ok(resp.bytes().await?.to_vec())
}

/// Loads table bytes from a local file path or fetches them over HTTP.
pub async fn load_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    if source.starts_with("http") {
        fetch_bytes(client, source).await
    } else {
        Ok(std::fs::read(source)?)
    }
}
