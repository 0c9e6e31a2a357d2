//! HTTP transport shared by the route, hazard and chat workflows.
//!
//! Every failure mode (no response, non-success status, undecodable body)
//! collapses into a [`FailureReason`] whose message is either the server's
//! `error` field or the endpoint's fixed fallback text.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use shared::{
    error::{ErrorBody, FailureReason},
    protocol::{ChatRequest, ChatResponse, HazardResponse, HealthResponse, RouteRequest, RouteResponse},
};
use tracing::{debug, warn};

const HEALTH_PATH: &str = "health";
const HEALTH_FALLBACK: &str = "Backend health check failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Route,
    Hazard,
    Chat,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Route => "route",
            Endpoint::Hazard => "hazard",
            Endpoint::Chat => "chat",
        }
    }

    /// Message shown when the server gives no usable `error` field.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Endpoint::Route => "Failed to find route",
            Endpoint::Hazard => "Failed to analyze hazard",
            Endpoint::Chat => "Failed to send message",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPart {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Arc<[u8]>,
}

/// A form carrying exactly one binary field plus optional text fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartPayload {
    pub field: String,
    pub file: BinaryPart,
    pub text_fields: Vec<(String, String)>,
}

impl MultipartPayload {
    pub fn new(field: impl Into<String>, file: BinaryPart) -> Self {
        Self {
            field: field.into(),
            file,
            text_fields: Vec::new(),
        }
    }

    pub fn with_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.text_fields.push((name.into(), value.into()));
        self
    }

    fn into_form(self) -> reqwest::Result<Form> {
        let part = Part::bytes(self.file.bytes.to_vec())
            .file_name(self.file.file_name)
            .mime_str(&self.file.content_type)?;
        let mut form = Form::new().part(self.field, part);
        for (name, value) in self.text_fields {
            form = form.text(name, value);
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestPayload {
    Json(Value),
    Multipart(MultipartPayload),
}

impl RequestPayload {
    fn kind(&self) -> &'static str {
        match self {
            RequestPayload::Json(_) => "json",
            RequestPayload::Multipart(_) => "multipart",
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, endpoint: Endpoint, payload: RequestPayload) -> Result<Value, FailureReason>;
}

pub struct HttpTransport {
    http: Client,
    api_base: String,
}

impl HttpTransport {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_base)
    }

    pub fn with_client(http: Client, api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self { http, api_base }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.api_base)
    }

    pub async fn health(&self) -> Result<HealthResponse, FailureReason> {
        let response = self.http.get(self.url(HEALTH_PATH)).send().await.map_err(|err| {
            warn!(endpoint = HEALTH_PATH, error = %err, "health probe got no response");
            FailureReason::network(HEALTH_FALLBACK)
        })?;
        let body = read_response(HEALTH_PATH, HEALTH_FALLBACK, response).await?;
        decode_body(HEALTH_PATH, HEALTH_FALLBACK, body)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, endpoint: Endpoint, payload: RequestPayload) -> Result<Value, FailureReason> {
        let path = endpoint.path();
        let fallback = endpoint.fallback_message();
        debug!(endpoint = path, payload = payload.kind(), "dispatching request");

        let request = self.http.post(self.url(path));
        let request = match payload {
            // `json` declares application/json itself.
            RequestPayload::Json(body) => request.json(&body),
            // No content-type override: reqwest writes the boundary.
            RequestPayload::Multipart(upload) => {
                let form = upload.into_form().map_err(|err| {
                    warn!(endpoint = path, error = %err, "could not build multipart form");
                    FailureReason::malformed(fallback)
                })?;
                request.multipart(form)
            }
        };

        let response = request.send().await.map_err(|err| {
            warn!(endpoint = path, error = %err, "request failed before a response arrived");
            FailureReason::network(fallback)
        })?;
        read_response(path, fallback, response).await
    }
}

async fn read_response(label: &str, fallback: &str, response: Response) -> Result<Value, FailureReason> {
    let status = response.status();
    let body = response.bytes().await.map_err(|err| {
        warn!(endpoint = label, status = status.as_u16(), error = %err, "response body was cut off");
        FailureReason::network(fallback)
    })?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|error| error.message().map(str::to_string))
            .unwrap_or_else(|| fallback.to_string());
        warn!(endpoint = label, status = status.as_u16(), %message, "backend rejected request");
        return Err(FailureReason::server(status.as_u16(), message));
    }

    serde_json::from_slice::<Value>(&body).map_err(|err| {
        warn!(endpoint = label, error = %err, "success response was not JSON");
        FailureReason::malformed(fallback)
    })
}

fn decode_body<T: DeserializeOwned>(label: &str, fallback: &str, body: Value) -> Result<T, FailureReason> {
    serde_json::from_value(body).map_err(|err| {
        warn!(endpoint = label, error = %err, "response body is missing expected fields");
        FailureReason::malformed(fallback)
    })
}

async fn exchange_json<Req, Resp>(
    transport: &dyn Transport,
    endpoint: Endpoint,
    request: &Req,
) -> Result<Resp, FailureReason>
where
    Req: Serialize + Sync,
    Resp: DeserializeOwned,
{
    let payload = serde_json::to_value(request).map_err(|err| {
        warn!(endpoint = endpoint.path(), error = %err, "could not serialize request");
        FailureReason::malformed(endpoint.fallback_message())
    })?;
    let body = transport.send(endpoint, RequestPayload::Json(payload)).await?;
    decode_body(endpoint.path(), endpoint.fallback_message(), body)
}

pub async fn find_route(
    transport: &dyn Transport,
    request: &RouteRequest,
) -> Result<RouteResponse, FailureReason> {
    exchange_json(transport, Endpoint::Route, request).await
}

pub async fn send_chat(
    transport: &dyn Transport,
    request: &ChatRequest,
) -> Result<ChatResponse, FailureReason> {
    exchange_json(transport, Endpoint::Chat, request).await
}

pub async fn analyze_hazard(
    transport: &dyn Transport,
    upload: MultipartPayload,
) -> Result<HazardResponse, FailureReason> {
    let endpoint = Endpoint::Hazard;
    let body = transport
        .send(endpoint, RequestPayload::Multipart(upload))
        .await?;
    decode_body(endpoint.path(), endpoint.fallback_message(), body)
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
