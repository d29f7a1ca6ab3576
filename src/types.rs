//! FluxGen API types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

// ============ Configuration ============

/// Configuration for the FluxGen client
#[derive(Debug, Clone, Default)]
pub struct FluxGenConfig {
    /// Base URL for the backend (default: the hosted FluxGen webhook)
    pub base_url: Option<String>,
    /// Request timeout in seconds. Unset by default: the client relies on
    /// the transport's own behavior and applies no timeout of its own.
    pub timeout: Option<u64>,
}

impl FluxGenConfig {
    /// Create a default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set a request timeout in seconds
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// ============ Generation Parameters ============

/// Smallest accepted prompt length, in characters
pub const MIN_PROMPT_LEN: usize = 3;
/// Largest accepted prompt length, in characters
pub const MAX_PROMPT_LEN: usize = 1000;
/// Smallest accepted image dimension, in pixels
pub const MIN_DIMENSION: u32 = 256;
/// Largest accepted image dimension, in pixels
pub const MAX_DIMENSION: u32 = 2048;

/// Snap a dimension to the backend's grid: round to the nearest multiple of
/// 16 (halves round up), then clamp to [256, 2048].
///
/// Rounding happens before clamping so a clamped value is still a multiple
/// of 16 (both bounds are).
pub fn snap_dimension(px: u32) -> u32 {
    // Saturate so inputs near u32::MAX clamp to the max instead of wrapping
    let rounded = (px.saturating_add(8) / 16) * 16;
    rounded.clamp(MIN_DIMENSION, MAX_DIMENSION)
}

/// Parameters for an image generation request
///
/// Created and mutated client-side as the user edits the form, consumed once
/// at submission. Dimensions are snapped to the 16-pixel grid when the
/// request is issued; the prompt-length gate lives in
/// [`FormState`](crate::FormState).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationParams {
    /// Text prompt (3 to 1000 characters at submission time)
    pub message: String,
    /// Style preset id, `"default"` for no style modification
    pub style: String,
    /// Number of images to generate (1 to 4)
    pub n: u8,
    /// Image width in pixels (256 to 2048, multiple of 16)
    pub width: u32,
    /// Image height in pixels (256 to 2048, multiple of 16)
    pub height: u32,
    /// Diffusion steps (1 to 4)
    pub steps: u8,
    /// Free-form seed; blank or whitespace-only is treated as absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    /// Things the model should avoid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    /// Ask the backend to enhance the prompt before generating
    pub enhance: bool,
}

impl GenerationParams {
    /// Create parameters with the form's initial defaults and the given prompt
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            style: "default".to_string(),
            n: 1,
            width: 1024,
            height: 1024,
            steps: 2,
            seed: None,
            negative_prompt: None,
            enhance: false,
        }
    }

    /// Set the style preset id
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Set the number of images (clamped to 1..=4)
    pub fn with_count(mut self, n: u8) -> Self {
        self.n = n.clamp(1, 4);
        self
    }

    /// Set width and height; both are snapped to the 16-pixel grid
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = snap_dimension(width);
        self.height = snap_dimension(height);
        self
    }

    /// Set the number of diffusion steps (clamped to 1..=4)
    pub fn with_steps(mut self, steps: u8) -> Self {
        self.steps = steps.clamp(1, 4);
        self
    }

    /// Set a generation seed
    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// Set a negative prompt
    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative_prompt.into());
        self
    }

    /// Enable prompt enhancement
    pub fn with_enhance(mut self) -> Self {
        self.enhance = true;
        self
    }

    /// The seed as sent on the wire: trimmed, `None` when blank
    pub(crate) fn effective_seed(&self) -> Option<&str> {
        self.seed
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::new("")
    }
}

// ============ Generation Response ============

/// The parameters a generation was actually produced with
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EffectiveParameters {
    pub width: u32,
    pub height: u32,
    pub steps: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
}

/// Metadata attached to each generated image
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    /// The prompt as submitted
    pub original_prompt: String,
    /// The prompt after backend enhancement (identical when not enhanced)
    pub enhanced_prompt: String,
    /// Style preset id used
    pub style: String,
    /// Effective generation parameters
    pub parameters: EffectiveParameters,
    /// RFC 3339 generation timestamp
    pub timestamp: String,
    /// Backend request identifier (or `local_<millis>` for binary responses)
    pub request_id: String,
    /// Model-revised prompt, when the backend reports one
    #[serde(default, rename = "revised_prompt", skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

/// One generated image
///
/// Immutable once created. `blob` holds the bytes of a locally synthesized
/// image (binary backend response); dropping the image releases them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Resolvable image reference (remote URL, or `local://...` when the
    /// bytes live in `blob`)
    pub url: String,
    /// 1-based index within its batch
    pub index: u32,
    /// Inline base64 payload, when the backend returns one
    #[serde(default, rename = "b64_json", skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,
    pub metadata: ImageMetadata,
    /// Bytes backing a locally created image reference
    #[serde(skip)]
    pub blob: Option<Arc<Vec<u8>>>,
}

/// Successful result of a generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    pub success: bool,
    /// Generated images, in batch order
    pub images: Vec<GeneratedImage>,
    pub total_images: u32,
    /// Model that produced the batch
    pub model: String,
    /// Backend-reported generation time in seconds
    pub generation_time: f64,
    pub request_id: String,
    pub timestamp: String,
}

// ============ Health ============

/// Rate limiter service health
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimiterHealth {
    pub status: String,
    pub active_clients: u64,
}

/// Analytics service health
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsHealth {
    pub status: String,
    pub total_requests: u64,
    pub recent_requests: u64,
}

/// Image generation service health
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationHealth {
    pub status: String,
    pub endpoint: String,
    pub model: String,
}

/// Per-service health breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealth {
    pub rate_limiter: RateLimiterHealth,
    pub analytics: AnalyticsHealth,
    pub image_generation: ImageGenerationHealth,
}

/// Backend feature advertisement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendFeatures {
    pub style_presets: Vec<String>,
    pub supported_formats: Vec<String>,
    pub max_dimensions: String,
    pub max_images: u32,
    pub max_steps: u32,
}

/// Backend-reported health snapshot, replaced wholesale on each fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub uptime: String,
    pub version: String,
    pub services: ServiceHealth,
    pub features: BackendFeatures,
}

// ============ Analytics ============

/// Aggregate request counts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsOverview {
    pub total_requests: u64,
    pub unique_clients: u64,
    pub avg_requests_per_client: f64,
}

/// Request counts per trailing window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindows {
    pub last_hour: u64,
    pub last_day: u64,
    pub last_week: u64,
}

/// Mean of the parameters seen across requests
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageParameters {
    pub steps: f64,
    pub width: f64,
    pub height: f64,
}

/// One of the heaviest API consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopClient {
    pub client_id: String,
    pub requests: u64,
}

/// A recently served generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentRequest {
    pub timestamp: String,
    pub request_id: String,
    pub style: String,
    /// Raw parameters as recorded by the backend
    pub parameters: Value,
}

/// Backend-reported analytics snapshot, replaced wholesale on each fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub timestamp: String,
    pub overview: AnalyticsOverview,
    pub time_windows: TimeWindows,
    pub style_usage: HashMap<String, u64>,
    pub average_parameters: AverageParameters,
    pub top_clients: Vec<TopClient>,
    pub recent_requests: Vec<RecentRequest>,
}

// ============ Presets ============

/// A named artistic style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylePreset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// The styles the form offers, first entry is the default
pub static STYLE_PRESETS: [StylePreset; 8] = [
    StylePreset {
        id: "default",
        name: "Default",
        description: "Standard generation without style modifications",
    },
    StylePreset {
        id: "photorealistic",
        name: "Photorealistic",
        description: "High-quality, realistic photography style",
    },
    StylePreset {
        id: "artistic",
        name: "Artistic",
        description: "Creative, expressive fine art style",
    },
    StylePreset {
        id: "cinematic",
        name: "Cinematic",
        description: "Dramatic lighting and film-like composition",
    },
    StylePreset {
        id: "fantasy",
        name: "Fantasy",
        description: "Magical, mystical, and enchanted themes",
    },
    StylePreset {
        id: "anime",
        name: "Anime",
        description: "Japanese animation and manga style",
    },
    StylePreset {
        id: "vintage",
        name: "Vintage",
        description: "Retro, nostalgic, and classic aesthetic",
    },
    StylePreset {
        id: "minimalist",
        name: "Minimalist",
        description: "Clean, simple, and modern design",
    },
];

/// A named width/height pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionPreset {
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Named dimension presets; free editing is [`DimensionChoice::Custom`](crate::DimensionChoice)
pub static DIMENSION_PRESETS: [DimensionPreset; 5] = [
    DimensionPreset {
        label: "Square (1024x1024)",
        width: 1024,
        height: 1024,
    },
    DimensionPreset {
        label: "Portrait (768x1024)",
        width: 768,
        height: 1024,
    },
    DimensionPreset {
        label: "Landscape (1024x768)",
        width: 1024,
        height: 768,
    },
    DimensionPreset {
        label: "Widescreen (1280x720)",
        width: 1280,
        height: 720,
    },
    DimensionPreset {
        label: "Instagram Square (1088x1088)",
        width: 1088,
        height: 1088,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_dimension_rounds_then_clamps() {
        assert_eq!(snap_dimension(1000), 1008);
        assert_eq!(snap_dimension(1024), 1024);
        // 2040 / 16 = 127.5, halves round up, then clamped to the max
        assert_eq!(snap_dimension(2040), 2048);
        assert_eq!(snap_dimension(4000), 2048);
        assert_eq!(snap_dimension(0), 256);
        assert_eq!(snap_dimension(100), 256);
        assert_eq!(snap_dimension(264), 272);
        assert_eq!(snap_dimension(u32::MAX), 2048);
    }

    #[test]
    fn test_snap_dimension_invariants() {
        for px in [
            0u32,
            1,
            255,
            256,
            257,
            1000,
            1023,
            2040,
            2048,
            2049,
            10_000,
            u32::MAX - 8,
            u32::MAX,
        ] {
            let snapped = snap_dimension(px);
            assert_eq!(snapped % 16, 0, "snap({}) = {} not on grid", px, snapped);
            assert!((MIN_DIMENSION..=MAX_DIMENSION).contains(&snapped));
        }
    }

    #[test]
    fn test_effective_seed_blank_is_absent() {
        let params = GenerationParams::new("a cat");
        assert_eq!(params.effective_seed(), None);

        let params = GenerationParams::new("a cat").with_seed("   ");
        assert_eq!(params.effective_seed(), None);

        let params = GenerationParams::new("a cat").with_seed("  42 ");
        assert_eq!(params.effective_seed(), Some("42"));
    }

    #[test]
    fn test_params_builder_clamps() {
        let params = GenerationParams::new("test")
            .with_count(9)
            .with_steps(0)
            .with_dimensions(1000, 5000);

        assert_eq!(params.n, 4);
        assert_eq!(params.steps, 1);
        assert_eq!(params.width, 1008);
        assert_eq!(params.height, 2048);
    }

    #[test]
    fn test_dimension_presets_are_on_grid() {
        for preset in &DIMENSION_PRESETS {
            assert_eq!(preset.width % 16, 0, "{} width off grid", preset.label);
            assert_eq!(preset.height % 16, 0, "{} height off grid", preset.label);
        }
    }
}
