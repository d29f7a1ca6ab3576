//! Schema tests to ensure client types match the backend wire contract
//!
//! These tests validate:
//! 1. camelCase wire names map onto the snake_case Rust fields
//! 2. Backend literals (`b64_json`, `revised_prompt`) survive the rename
//! 3. Optional fields are correctly represented as Option<T>
//! 4. ApiError serialization omits absent optional fields

use fluxgen::{ApiError, GeneratedImage, GenerationParams, GenerationResponse};
use serde_json::json;

// ============ Deserialization Tests ============

#[test]
fn test_generation_response_deserialization() {
    let json = json!({
        "success": true,
        "images": [
            {
                "url": "https://cdn.fluxgen.dev/req_1-1.png",
                "index": 1,
                "b64_json": "aGVsbG8=",
                "metadata": {
                    "originalPrompt": "a cat",
                    "enhancedPrompt": "a majestic cat, studio lighting",
                    "style": "photorealistic",
                    "parameters": {
                        "width": 1024,
                        "height": 768,
                        "steps": 3,
                        "seed": "42"
                    },
                    "timestamp": "2024-01-15T12:00:00Z",
                    "requestId": "req_1",
                    "revised_prompt": "a majestic cat"
                }
            }
        ],
        "totalImages": 1,
        "model": "black-forest-labs/FLUX.1-schnell-Free",
        "generationTime": 2.41,
        "requestId": "req_1",
        "timestamp": "2024-01-15T12:00:02Z"
    });

    let response: GenerationResponse =
        serde_json::from_value(json).expect("Should deserialize GenerationResponse");

    assert!(response.success);
    assert_eq!(response.total_images, 1);
    assert_eq!(response.generation_time, 2.41);
    assert_eq!(response.request_id, "req_1");

    let image = &response.images[0];
    assert_eq!(image.index, 1);
    assert_eq!(image.b64_json.as_deref(), Some("aGVsbG8="));
    assert!(image.blob.is_none(), "blob is local-only, never on the wire");
    assert_eq!(image.metadata.original_prompt, "a cat");
    assert_eq!(image.metadata.style, "photorealistic");
    assert_eq!(image.metadata.parameters.width, 1024);
    assert_eq!(image.metadata.parameters.seed.as_deref(), Some("42"));
    assert_eq!(image.metadata.revised_prompt.as_deref(), Some("a majestic cat"));
}

#[test]
fn test_generated_image_optional_fields_absent() {
    let json = json!({
        "url": "https://cdn.fluxgen.dev/req_2-1.png",
        "index": 1,
        "metadata": {
            "originalPrompt": "a dog",
            "enhancedPrompt": "a dog",
            "style": "default",
            "parameters": { "width": 1024, "height": 1024, "steps": 2 },
            "timestamp": "2024-01-15T12:00:00Z",
            "requestId": "req_2"
        }
    });

    let image: GeneratedImage =
        serde_json::from_value(json).expect("Should deserialize GeneratedImage");

    assert!(image.b64_json.is_none());
    assert!(image.metadata.revised_prompt.is_none());
    assert!(image.metadata.parameters.seed.is_none());
}

#[test]
fn test_api_error_deserialization_with_defaults() {
    let json = json!({
        "error": "Generation failed",
        "category": "unknown",
        "message": "Backend exploded",
        "code": "INTERNAL",
        "timestamp": "2024-01-15T12:00:00Z"
    });

    let error: ApiError = serde_json::from_value(json).expect("Should deserialize ApiError");

    assert_eq!(error.code, "INTERNAL");
    assert!(!error.retryable, "retryable defaults to false");
    assert!(error.status_code.is_none());
    assert!(error.limit_type.is_none());
    assert!(error.retry_after.is_none());
}

// ============ Serialization Tests ============

#[test]
fn test_generation_params_serialization_skips_absent_options() {
    let params = GenerationParams::new("a cat");
    let value = serde_json::to_value(&params).expect("Should serialize GenerationParams");

    assert_eq!(value["message"], "a cat");
    assert_eq!(value["style"], "default");
    assert!(value.get("seed").is_none(), "unset seed must not serialize");
    assert!(value.get("negative_prompt").is_none());
}

#[test]
fn test_api_error_serialization_is_camel_case() {
    let params = json!({
        "error": "Too many requests",
        "category": "rate_limit",
        "message": "Hourly limit reached",
        "code": "RATE_LIMITED",
        "statusCode": 429,
        "requestId": "req_9",
        "retryable": true,
        "limitType": "hourly",
        "resetTime": 1705320000,
        "retryAfter": 65,
        "timestamp": "2024-01-15T12:00:00Z"
    });

    let error: ApiError = serde_json::from_value(params).expect("Should deserialize ApiError");
    let value = serde_json::to_value(&error).expect("Should serialize ApiError");

    assert_eq!(value["statusCode"], 429);
    assert_eq!(value["requestId"], "req_9");
    assert_eq!(value["limitType"], "hourly");
    assert_eq!(value["resetTime"], 1705320000);
    assert_eq!(value["retryAfter"], 65);
    assert!(value.get("status_code").is_none());
}

#[test]
fn test_generated_image_round_trip_keeps_wire_names() {
    let json = json!({
        "url": "https://cdn.fluxgen.dev/req_3-2.png",
        "index": 2,
        "b64_json": "Zm9v",
        "metadata": {
            "originalPrompt": "a fox",
            "enhancedPrompt": "a fox",
            "style": "vintage",
            "parameters": { "width": 768, "height": 1024, "steps": 4 },
            "timestamp": "2024-01-15T12:00:00Z",
            "requestId": "req_3",
            "revised_prompt": "a red fox"
        }
    });

    let image: GeneratedImage =
        serde_json::from_value(json).expect("Should deserialize GeneratedImage");
    let value = serde_json::to_value(&image).expect("Should serialize GeneratedImage");

    assert_eq!(value["b64_json"], "Zm9v");
    assert_eq!(value["metadata"]["requestId"], "req_3");
    assert_eq!(value["metadata"]["revised_prompt"], "a red fox");
    assert!(value["metadata"].get("request_id").is_none());
    assert!(value.get("blob").is_none(), "blob must never serialize");
}
