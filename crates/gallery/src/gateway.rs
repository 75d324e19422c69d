//! Remote generation functions
//!
//! The generation algorithms run elsewhere; this module only turns a prompt
//! into one call and normalizes whatever comes back. There is no timeout and
//! no retry here.

use async_trait::async_trait;
use genboard_common::TextStyle;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

use crate::kind::{ArtifactKind, ImageKind, TextKind};

/// A generation that produced no usable payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayFailure {
    /// Reason given by the remote side, if any
    pub message: Option<String>,
}

impl GatewayFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn unexplained() -> Self {
        Self { message: None }
    }
}

impl fmt::Display for GatewayFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => f.write_str(message),
            None => f.write_str("generation failed"),
        }
    }
}

/// One external invocation per call
#[async_trait]
pub trait GenerationGateway<K: ArtifactKind>: Send + Sync {
    /// Returns the payload (image URL or text body) on success
    async fn generate(&self, prompt: &str, options: &K::Options) -> Result<String, GatewayFailure>;
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
struct TextRequest<'a> {
    prompt: &'a str,
    #[serde(rename = "type")]
    style: TextStyle,
}

/// Client for the hosted generation functions.
///
/// Calls `POST {base_url}/functions/v1/{name}` with a JSON body.
pub struct FunctionClient {
    base_url: String,
    api_key: Option<String>,
    image_function: String,
    text_function: String,
    client: reqwest::Client,
}

impl FunctionClient {
    /// Create a client using the default function names
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            image_function: "generate-image".to_string(),
            text_function: "generate-text".to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Override the function names
    pub fn with_functions(mut self, image_function: String, text_function: String) -> Self {
        self.image_function = image_function;
        self.text_function = text_function;
        self
    }

    fn function_url(&self, name: &str) -> String {
        format!("{}/functions/v1/{}", self.base_url, name)
    }

    /// Invoke `function` and pull the string at `field` out of the response
    async fn invoke<B: Serialize + Sync>(
        &self,
        function: &str,
        body: &B,
        field: &str,
    ) -> Result<String, GatewayFailure> {
        let url = self.function_url(function);
        debug!("Invoking generation function: {}", url);

        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key).header("apikey", key);
        }

        let response = request.send().await.map_err(|e| {
            warn!("Failed to reach {}: {}", function, e);
            GatewayFailure::new(format!("Failed to reach generation service: {}", e))
        })?;

        let status = response.status();
        let body: Option<Value> = response.json().await.ok();

        if let Some(message) = body.as_ref().and_then(error_message) {
            warn!("{} returned an error ({}): {}", function, status, message);
            return Err(GatewayFailure::new(message));
        }

        if !status.is_success() {
            warn!("{} failed with status: {}", function, status);
            return Err(GatewayFailure::new(format!(
                "Generation service returned {}",
                status
            )));
        }

        body.as_ref()
            .and_then(|b| b.get(field))
            .and_then(Value::as_str)
            .filter(|payload| !payload.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                warn!("{} response had no {}", function, field);
                GatewayFailure::unexplained()
            })
    }
}

/// Read the error indication out of a function response.
///
/// Accepts both `{"error": "msg"}` and `{"error": {"message": "msg"}}`.
fn error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::String(message) => Some(message.clone()),
        Value::Object(fields) => fields
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl GenerationGateway<ImageKind> for FunctionClient {
    async fn generate(&self, prompt: &str, _options: &()) -> Result<String, GatewayFailure> {
        self.invoke(&self.image_function, &ImageRequest { prompt }, "imageUrl")
            .await
    }
}

#[async_trait]
impl GenerationGateway<TextKind> for FunctionClient {
    async fn generate(&self, prompt: &str, style: &TextStyle) -> Result<String, GatewayFailure> {
        let body = TextRequest {
            prompt,
            style: *style,
        };
        self.invoke(&self.text_function, &body, "text").await
    }
}
