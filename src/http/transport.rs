use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Method};

use crate::error::{AppError, TransportError, TransportErrorKind};
use crate::state::captured::Header;
use crate::state::response_state::CapturedResponse;

/// A request ready for the wire: headers already admitted, body already
/// decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<Header>,
    pub body: Option<String>,
}

/// Issues one HTTP request. Any status code is a successful send.
pub trait Transport: Clone + Send + Sync + 'static {
    fn send(
        &self,
        request: OutgoingRequest,
    ) -> impl Future<Output = Result<CapturedResponse, TransportError>> + Send;
}

/// `reqwest` transport. No cookie store, so ambient credentials are never
/// attached.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .use_rustls_tls()
            .build()
            .map_err(TransportError::from)?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn send(
        &self,
        request: OutgoingRequest,
    ) -> impl Future<Output = Result<CapturedResponse, TransportError>> + Send {
        let client = self.client.clone();
        async move {
            let method = Method::from_bytes(request.method.as_bytes()).map_err(|_| {
                TransportError::new(
                    TransportErrorKind::InvalidRequest,
                    format!("invalid method {:?}", request.method),
                )
            })?;

            let mut builder = client.request(method, &request.url);
            for header in &request.headers {
                builder = builder.header(header.name.as_str(), header.value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await?;

            let status = response.status();
            let headers = response
                .headers()
                .iter()
                .map(|(k, v)| Header::new(k.as_str(), String::from_utf8_lossy(v.as_bytes())))
                .collect();
            let status_text = status.canonical_reason().unwrap_or("").to_string();
            let bytes = response.bytes().await?;

            Ok(CapturedResponse {
                status: status.as_u16(),
                status_text,
                headers,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            })
        }
    }
}
