use async_trait::async_trait;
use conduit_action::{HttpRequest, RequestClient, RequestError, Response};
use parking_lot::Mutex;
use serde_json::{Value, json};

/// Records requests instead of sending them and answers `200`.
#[derive(Debug, Default)]
pub struct DryRunClient {
    sent: Mutex<Vec<HttpRequest>>,
}

impl DryRunClient {
    /// Drain the recorded requests.
    pub fn take(&self) -> Vec<HttpRequest> {
        std::mem::take(&mut *self.sent.lock())
    }
}

#[async_trait]
impl RequestClient for DryRunClient {
    async fn send(&self, request: HttpRequest) -> Result<Response, RequestError> {
        tracing::info!(method = %request.method, url = %request.url, "dry run, not sent");
        let response = Response::new(200, request.url.clone());
        self.sent.lock().push(request);
        Ok(response)
    }
}

/// Printable form of a request. Header values are left out.
pub fn describe(request: &HttpRequest) -> Value {
    let headers: Vec<&str> = request.headers.iter().map(|(name, _)| name.as_str()).collect();
    json!({
        "method": request.method.as_str(),
        "url": request.url,
        "headers": headers,
        "json": request.json,
    })
}
