// src/docs.rs
//! Interactive API reference: an OpenAPI 3.0 document plus a Swagger UI page
//! that loads it.

use axum::{response::Html, routing::get, Json, Router};
use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::api::{MSG_EXTRACTION_FAILED, MSG_INVALID_URL, MSG_URL_REQUIRED};

pub const DOCS_PATH: &str = "/api-docs";
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

static OPENAPI: Lazy<Value> = Lazy::new(build_openapi);

fn error_response(description: &str, example: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Error" },
                "example": { "error": example }
            }
        }
    })
}

/// Same as [`error_response`] but with one named example per distinct body.
fn error_response_examples(description: &str, examples: &[(&str, &str)]) -> Value {
    let named: serde_json::Map<String, Value> = examples
        .iter()
        .map(|(name, message)| ((*name).to_string(), json!({ "value": { "error": message } })))
        .collect();
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Error" },
                "examples": named
            }
        }
    })
}

fn nullable(kind: &str) -> Value {
    json!({ "type": kind, "nullable": true })
}

fn extract_operation() -> Value {
    json!({
        "summary": "Extract the content of a web article",
        "requestBody": {
            "required": true,
            "content": {
                "application/json": {
                    "schema": {
                        "type": "object",
                        "required": ["url"],
                        "properties": {
                            "url": { "type": "string", "description": "URL of the article to extract" }
                        }
                    }
                }
            }
        },
        "responses": {
            "200": {
                "description": "Article extracted",
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/NormalizedArticle" }
                    }
                }
            },
            "400": error_response_examples(
                "Missing or invalid URL",
                &[("missing_url", MSG_URL_REQUIRED), ("invalid_url", MSG_INVALID_URL)]
            ),
            "500": error_response("Neither extractor could process the URL", MSG_EXTRACTION_FAILED)
        }
    })
}

fn article_schema() -> Value {
    let mut props = serde_json::Map::new();
    for name in [
        "url",
        "title",
        "author",
        "date_published",
        "image",
        "content",
        "source",
        "excerpt",
        "direction",
        "favicon",
        "type",
    ] {
        props.insert(name.to_string(), nullable("string"));
    }
    for name in ["word_count", "total_pages", "rendered_pages", "ttr"] {
        props.insert(name.to_string(), nullable("integer"));
    }
    props.insert(
        "links".to_string(),
        json!({ "type": "array", "items": { "type": "string" }, "nullable": true }),
    );
    json!({ "type": "object", "properties": props })
}

fn build_openapi() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Blog Extractor API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Extracts the content of web articles by combining two extraction engines."
        },
        "servers": [
            { "url": format!("http://localhost:{}", crate::config::DEFAULT_PORT), "description": "Local server" }
        ],
        "paths": {
            "/extractor-blog": { "post": extract_operation() }
        },
        "components": {
            "schemas": {
                "Error": {
                    "type": "object",
                    "properties": { "error": { "type": "string" } },
                    "example": { "error": MSG_INVALID_URL }
                },
                "NormalizedArticle": article_schema()
            }
        }
    })
}

/// The OpenAPI document served at [`OPENAPI_PATH`].
pub fn openapi() -> &'static Value {
    &OPENAPI
}

const SWAGGER_PAGE: &str = r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Blog Extractor API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/api-docs/openapi.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>"##;

pub fn router<S: Clone + Send + Sync + 'static>() -> Router<S> {
    Router::new()
        .route(DOCS_PATH, get(|| async { Html(SWAGGER_PAGE) }))
        .route(OPENAPI_PATH, get(|| async { Json(openapi().clone()) }))
}
