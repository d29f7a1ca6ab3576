//! FluxGen API client

use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ApiError, Result};
use crate::types::*;

const DEFAULT_BASE_URL: &str =
    "https://tasteless-ola-yatharthsanghvi-87194279.koyeb.app/webhook-test";
const DEFAULT_MODEL: &str = "black-forest-labs/FLUX.1-schnell-Free";
const USER_AGENT: &str = concat!("fluxgen-rust/", env!("CARGO_PKG_VERSION"));

/// Shared request state for the generation path
///
/// Owns the loading flag and the current error that the form UI renders.
/// Created once, passed by `&mut` to [`FluxGen::generate_image`], and dropped
/// with the view that owns it. Health and analytics calls never touch it;
/// the dashboard keeps its own flags.
#[derive(Debug, Default)]
pub struct Session {
    loading: bool,
    error: Option<ApiError>,
}

impl Session {
    /// Create an idle session with no error
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a generation request is in flight
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// The most recent generation failure, if not yet dismissed
    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// Dismiss the current error
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn fail(&mut self, error: ApiError) {
        self.error = Some(error);
    }

    fn finish(&mut self) {
        self.loading = false;
    }
}

/// FluxGen API client
///
/// # Example
///
/// ```no_run
/// use fluxgen::{FluxGen, GenerationParams, Session};
///
/// #[tokio::main]
/// async fn main() {
///     let client = FluxGen::new();
///     let mut session = Session::new();
///
///     match client
///         .generate_image(&mut session, &GenerationParams::new("A cat in a spacesuit"))
///         .await
///     {
///         Ok(response) => println!("{} image(s) generated", response.total_images),
///         Err(e) => eprintln!("{} ({})", e, e.category),
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FluxGen {
    base_url: String,
    http: Client,
}

impl FluxGen {
    /// Create a client with the default configuration
    pub fn new() -> Self {
        Self::with_config(FluxGenConfig::new())
    }

    /// Create a client with custom configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use fluxgen::{FluxGen, FluxGenConfig};
    ///
    /// let client = FluxGen::with_config(
    ///     FluxGenConfig::new().with_base_url("https://staging.fluxgen.dev/webhook"),
    /// );
    /// ```
    pub fn with_config(config: FluxGenConfig) -> Self {
        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let http = builder.build().expect("Failed to create HTTP client");

        Self { base_url, http }
    }

    /// The base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ============ Image Generation ============

    /// Generate a batch of images
    ///
    /// Issues a single GET against `generate-image` with `params` encoded in
    /// the query string. Width and height are snapped to the 16-pixel grid
    /// first; a blank seed and an empty negative prompt are omitted.
    ///
    /// The session's loading flag is raised for the duration of the call and
    /// any previously stored error is cleared at call start. On failure the
    /// normalized [`ApiError`] is both stored in the session and returned, so
    /// the caller can short-circuit while the UI renders the error panel.
    ///
    /// A backend replying with an `image/*` body instead of JSON yields a
    /// synthesized single-image response whose bytes are held in
    /// [`GeneratedImage::blob`] under a `local_<millis>` request id.
    pub async fn generate_image(
        &self,
        session: &mut Session,
        params: &GenerationParams,
    ) -> Result<GenerationResponse> {
        session.begin();
        let result = self.generate_inner(params).await;
        if let Err(e) = &result {
            session.fail(e.clone());
        }
        session.finish();
        result
    }

    async fn generate_inner(&self, params: &GenerationParams) -> Result<GenerationResponse> {
        let width = snap_dimension(params.width);
        let height = snap_dimension(params.height);

        let mut query: Vec<(&str, String)> = vec![
            ("message", params.message.clone()),
            ("style", params.style.clone()),
            ("n", params.n.to_string()),
            ("width", width.to_string()),
            ("height", height.to_string()),
            ("steps", params.steps.to_string()),
            ("enhance", params.enhance.to_string()),
        ];
        if let Some(seed) = params.effective_seed() {
            query.push(("seed", seed.to_string()));
        }
        if let Some(negative) = params.negative_prompt.as_deref().filter(|s| !s.is_empty()) {
            query.push(("negative_prompt", negative.to_string()));
        }

        let response = self
            .http
            .get(format!("{}/generate-image", self.base_url))
            .query(&query)
            .send()
            .await
            .map_err(ApiError::network)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !status.is_success() {
            let payload: Value = response.json().await.unwrap_or(Value::Null);
            return Err(ApiError::from_payload(Some(status.as_u16()), &payload));
        }

        // The backend may answer with the raw image instead of JSON
        if content_type.contains("image/") {
            let bytes = response.bytes().await.map_err(ApiError::network)?;
            return Ok(self.local_response(params, width, height, bytes.to_vec()));
        }

        let payload: Value = response.json().await.map_err(ApiError::network)?;

        // An error payload inside a 2xx response is still a failure
        if payload.get("error").is_some() {
            return Err(ApiError::from_payload(Some(status.as_u16()), &payload));
        }

        serde_json::from_value(payload).map_err(ApiError::decode)
    }

    /// Wrap a binary response body into a single-image result
    fn local_response(
        &self,
        params: &GenerationParams,
        width: u32,
        height: u32,
        bytes: Vec<u8>,
    ) -> GenerationResponse {
        let now = Utc::now();
        let request_id = format!("local_{}", now.timestamp_millis());
        let timestamp = now.to_rfc3339();

        GenerationResponse {
            success: true,
            images: vec![GeneratedImage {
                url: format!("local://{}", request_id),
                index: 1,
                b64_json: None,
                metadata: ImageMetadata {
                    original_prompt: params.message.clone(),
                    enhanced_prompt: params.message.clone(),
                    style: params.style.clone(),
                    parameters: EffectiveParameters {
                        width,
                        height,
                        steps: params.steps,
                        seed: params.effective_seed().map(String::from),
                    },
                    timestamp: timestamp.clone(),
                    request_id: request_id.clone(),
                    revised_prompt: None,
                },
                blob: Some(Arc::new(bytes)),
            }],
            total_images: 1,
            model: DEFAULT_MODEL.to_string(),
            generation_time: 0.0,
            request_id,
            timestamp,
        }
    }

    // ============ Health & Analytics ============

    /// Fetch the backend health snapshot
    ///
    /// Tolerates a backend that wraps the object in a one-element array.
    /// Failures carry the full normalized [`ApiError`], including any
    /// category and retry metadata from the backend.
    pub async fn get_health_status(&self) -> Result<HealthStatus> {
        self.get_snapshot("health").await
    }

    /// Fetch the backend analytics snapshot
    ///
    /// Same contract as [`get_health_status`](Self::get_health_status),
    /// targeting the `analytics` endpoint.
    pub async fn get_analytics(&self) -> Result<Analytics> {
        self.get_snapshot("analytics").await
    }

    async fn get_snapshot<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http
            .get(format!("{}/{}", self.base_url, path))
            .send()
            .await
            .map_err(ApiError::network)?;

        let status = response.status();
        if !status.is_success() {
            let payload: Value = response.json().await.unwrap_or(Value::Null);
            return Err(ApiError::from_payload(Some(status.as_u16()), &payload));
        }

        let payload: Value = response.json().await.map_err(ApiError::network)?;
        let payload = match payload {
            // Some deployments wrap the snapshot in a one-element array
            Value::Array(mut items) if !items.is_empty() => items.remove(0),
            other => other,
        };

        serde_json::from_value(payload).map_err(ApiError::decode)
    }

    // ============ Downloads ============

    /// Fetch the raw bytes behind an image URL
    pub async fn fetch_image_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.http.get(url).send().await.map_err(ApiError::network)?;

        let status = response.status();
        if !status.is_success() {
            let payload: Value = response.json().await.unwrap_or(Value::Null);
            return Err(ApiError::from_payload(Some(status.as_u16()), &payload));
        }

        let bytes = response.bytes().await.map_err(ApiError::network)?;
        Ok(bytes.to_vec())
    }
}

impl Default for FluxGen {
    fn default() -> Self {
        Self::new()
    }
}
