//! HTTP response envelope conventions
//!
//! Shared builders for the redirects issued by the OAuth flow and the JSON
//! error envelope used by the resource endpoints, so every handler speaks
//! the same shape.

use actix_web::{http::header, HttpResponse};
use serde_json::json;

/// Unified response builder for redirects, JSON bodies, and error envelopes
pub struct ResponseBuilder;

impl ResponseBuilder {
    /// Create a redirect response (302 Found) with optional query parameters
    #[must_use]
    pub fn redirect(location: &str) -> RedirectBuilder {
        RedirectBuilder::new(location)
    }

    /// Create an OK response (200) with JSON content
    #[must_use]
    pub fn ok() -> JsonResponseBuilder {
        JsonResponseBuilder { status_code: 200 }
    }

    /// Create a `BadRequest` (400) error response with optional customization
    #[must_use]
    pub fn bad_request() -> ErrorResponseBuilder {
        ErrorResponseBuilder::new(ErrorType::BadRequest)
    }

    /// Create an `InternalServerError` (500) error response with optional customization
    #[must_use]
    pub fn internal_server_error() -> ErrorResponseBuilder {
        ErrorResponseBuilder::new(ErrorType::InternalServerError)
    }

    /// Common validation error: missing field
    #[must_use]
    pub fn missing_field(field_name: &str) -> HttpResponse {
        Self::bad_request()
            .with_error_code("missing_field")
            .with_message(&format!("Missing required field: {field_name}"))
            .build()
    }

    /// Common validation error: invalid field
    #[must_use]
    pub fn invalid_field(field_name: &str, reason: &str) -> HttpResponse {
        Self::bad_request()
            .with_error_code("invalid_field")
            .with_message(&format!("Invalid {field_name}: {reason}"))
            .build()
    }
}

/// Builder for redirect responses. Query parameter values are
/// percent-encoded; keys are appended verbatim.
pub struct RedirectBuilder {
    location: String,
    params: Vec<(String, String)>,
}

impl RedirectBuilder {
    fn new(location: &str) -> Self {
        Self {
            location: location.to_string(),
            params: Vec::new(),
        }
    }

    /// Append a query parameter to the redirect URL
    #[must_use]
    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    /// Build the final redirect response
    #[must_use]
    pub fn build(self) -> HttpResponse {
        let mut location = self.location;
        for (key, value) in &self.params {
            let separator = if location.contains('?') { '&' } else { '?' };
            location.push(separator);
            location.push_str(key);
            location.push('=');
            location.push_str(&urlencoding::encode(value));
        }

        HttpResponse::Found()
            .append_header(("Location", location))
            .finish()
    }
}

/// Builder for JSON responses
pub struct JsonResponseBuilder {
    status_code: u16,
}

impl JsonResponseBuilder {
    /// Build the response with JSON content
    #[must_use]
    pub fn json<T: serde::Serialize>(self, data: &T) -> HttpResponse {
        let mut builder = match self.status_code {
            201 => HttpResponse::Created(),
            _ => HttpResponse::Ok(),
        };
        builder
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .json(data)
    }
}

/// Supported HTTP error response types
enum ErrorType {
    BadRequest,
    InternalServerError,
}

/// Builder for error responses with a fluent interface
pub struct ErrorResponseBuilder {
    error_type: ErrorType,
    error_code: Option<String>,
    message: Option<String>,
}

impl ErrorResponseBuilder {
    fn new(error_type: ErrorType) -> Self {
        Self {
            error_type,
            error_code: None,
            message: None,
        }
    }

    /// Set a custom error code (e.g. "`missing_field`")
    #[must_use]
    pub fn with_error_code(mut self, code: &str) -> Self {
        self.error_code = Some(code.to_string());
        self
    }

    /// Set a custom error message
    #[must_use]
    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    /// Build the final `HttpResponse`
    #[must_use]
    pub fn build(self) -> HttpResponse {
        let (default_code, default_message) = match self.error_type {
            ErrorType::BadRequest => ("invalid_request", "The request is malformed or invalid"),
            ErrorType::InternalServerError => {
                ("server_error", "An internal server error occurred")
            }
        };

        let body = json!({
            "error": self.error_code.unwrap_or_else(|| default_code.to_string()),
            "message": self.message.unwrap_or_else(|| default_message.to_string()),
        });

        let mut response = match self.error_type {
            ErrorType::BadRequest => HttpResponse::BadRequest(),
            ErrorType::InternalServerError => HttpResponse::InternalServerError(),
        };

        response
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    fn location_of(response: &HttpResponse) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    #[test]
    fn redirect_without_params() {
        let response = ResponseBuilder::redirect("/calendar").build();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location_of(&response), "/calendar");
    }

    #[test]
    fn redirect_appends_and_encodes_params() {
        let response = ResponseBuilder::redirect("/documents")
            .with_param("auth", "success")
            .with_param("tokens", r#"{"access_token":"tok"}"#)
            .build();
        assert_eq!(
            location_of(&response),
            "/documents?auth=success&tokens=%7B%22access_token%22%3A%22tok%22%7D"
        );
    }

    #[test]
    fn redirect_uses_ampersand_when_query_present() {
        let response = ResponseBuilder::redirect("/calendar?tab=week")
            .with_param("error", "no_code")
            .build();
        assert_eq!(location_of(&response), "/calendar?tab=week&error=no_code");
    }

    #[test]
    fn error_envelope_defaults() {
        let response = ResponseBuilder::bad_request().build();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ResponseBuilder::internal_server_error().build();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn convenience_validation_errors() {
        let response = ResponseBuilder::missing_field("devices");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ResponseBuilder::invalid_field("preference", "unknown value");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
