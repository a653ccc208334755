use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes one HTTP request. Tests stub this to feed canned table bytes
/// to the upload path.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
