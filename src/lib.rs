//! # FluxGen Client
//!
//! Client-state library for the FluxGen AI image generation service: the API
//! client, parameter validation, and the state controllers behind the
//! generation form, the image gallery, and the admin dashboard. Rendering is
//! up to the embedding UI; this crate owns the requests and the state.
//!
//! ## Quick Start
//!
//! ```no_run
//! use fluxgen::{FluxGen, Gallery, GenerationParams, Session};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = FluxGen::new();
//!     let mut session = Session::new();
//!     let mut gallery = Gallery::new();
//!
//!     let params = GenerationParams::new("A mystical forest with glowing mushrooms")
//!         .with_style("fantasy")
//!         .with_count(2);
//!
//!     match client.generate_image(&mut session, &params).await {
//!         Ok(response) => gallery.add_batch(response.images),
//!         Err(e) => eprintln!("{}", e),
//!     }
//! }
//! ```
//!
//! ## Form validation
//!
//! The form controller enforces the client-side rules: a 3 to 1000 character
//! prompt gate, and dimensions snapped to the 16-pixel grid inside
//! [256, 2048] (rounded first, then clamped):
//!
//! ```
//! use fluxgen::{DimensionChoice, FormState};
//!
//! let mut form = FormState::new();
//! form.set_message("A cat in a spacesuit");
//! form.choose_dimensions(DimensionChoice::Custom);
//! form.set_width(1000); // snaps to 1008
//!
//! let params = form.submit().expect("prompt is long enough");
//! assert_eq!(params.width, 1008);
//! ```
//!
//! ## Admin dashboard
//!
//! The dashboard polls health and analytics every [`POLL_INTERVAL`] and
//! fences overlapping fetches so a stale response can never overwrite a
//! newer one:
//!
//! ```no_run
//! use fluxgen::{Dashboard, FluxGen};
//! use tokio::sync::Mutex;
//!
//! # async fn example() {
//! let client = FluxGen::new();
//! let dashboard = Mutex::new(Dashboard::new());
//!
//! Dashboard::refresh_all(&dashboard, &client).await;
//! if let Some(health) = dashboard.lock().await.health() {
//!     println!("backend is {}", health.status);
//! };
//! # }
//! ```
//!
//! ## Error handling
//!
//! Every failure is normalized into one [`ApiError`] shape, whether it came
//! from the transport, a non-2xx response, or an error payload embedded in a
//! 2xx body:
//!
//! ```no_run
//! use fluxgen::{FluxGen, GenerationParams, Session};
//!
//! # async fn example() {
//! let client = FluxGen::new();
//! let mut session = Session::new();
//!
//! if let Err(e) = client
//!     .generate_image(&mut session, &GenerationParams::new("test prompt"))
//!     .await
//! {
//!     if e.is_rate_limit() {
//!         if let Some(wait) = e.retry_after_text() {
//!             eprintln!("rate limited ({}), retry in {}", e.limit_type.as_deref().unwrap_or("?"), wait);
//!         }
//!     } else if e.retryable {
//!         eprintln!("transient failure: {}", e);
//!     } else {
//!         eprintln!("{}", e);
//!     }
//! }
//! # }
//! ```

mod client;
mod dashboard;
mod error;
mod form;
mod gallery;
mod types;

// Re-export main types
pub use client::{FluxGen, Session};
pub use dashboard::{Dashboard, FetchTicket, POLL_INTERVAL};
pub use error::{category, ApiError, Result};
pub use form::{DimensionChoice, FormState};
pub use gallery::{Gallery, SavedImage};
pub use types::{
    // Configuration
    FluxGenConfig,
    // Parameters
    GenerationParams,
    snap_dimension,
    MAX_DIMENSION,
    MAX_PROMPT_LEN,
    MIN_DIMENSION,
    MIN_PROMPT_LEN,
    // Generation results
    EffectiveParameters,
    GeneratedImage,
    GenerationResponse,
    ImageMetadata,
    // Health
    AnalyticsHealth,
    BackendFeatures,
    HealthStatus,
    ImageGenerationHealth,
    RateLimiterHealth,
    ServiceHealth,
    // Analytics
    Analytics,
    AnalyticsOverview,
    AverageParameters,
    RecentRequest,
    TimeWindows,
    TopClient,
    // Presets
    DimensionPreset,
    StylePreset,
    DIMENSION_PRESETS,
    STYLE_PRESETS,
};
