//! The server's standard error envelope.
//!
//! Failed mutating requests carry a JSON body with a `detail` field holding
//! either a plain message or a list of per-field validation errors:
//!
//! ```json
//! {"detail": "Category already exists"}
//! {"detail": [{"loc": ["body", "amount"], "msg": "must be positive"}]}
//! ```
//!
//! A validation list is flattened to one `"field.path: message"` line per
//! entry. Bodies without a usable `detail` fall back to a generic message so
//! the user always sees something actionable.

use serde::Deserialize;

/// Fallback shown when the response body carries no usable `detail`.
pub const GENERIC_MESSAGE: &str = "Form submission error";

/// A single validation error within a `detail` list.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldError {
    /// Path to the offending field, e.g. `["body", "amount"]`.
    #[serde(default)]
    pub loc: Vec<String>,
    pub msg: String,
}

impl FieldError {
    /// Render as `"body.amount: must be positive"`.
    fn render(&self) -> String {
        format!("{}: {}", self.loc.join("."), self.msg)
    }
}

/// The `detail` field: a plain message or a validation list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Detail {
    Validation(Vec<FieldError>),
    Message(String),
}

/// The full error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub detail: Detail,
}

impl ErrorEnvelope {
    /// Produce the user-facing message for this envelope.
    ///
    /// A plain string is shown verbatim; a validation list becomes one line
    /// per entry, joined with newlines.
    pub fn render(&self) -> String {
        match &self.detail {
            Detail::Message(msg) => msg.clone(),
            Detail::Validation(errors) => errors
                .iter()
                .map(FieldError::render)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Extract the user-facing message from a raw response body.
///
/// Falls back to [`GENERIC_MESSAGE`] when the body is not JSON or has no
/// `detail` in a recognized shape.
pub fn message_from_body(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.render(),
        Err(_) => GENERIC_MESSAGE.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_rendered_verbatim() {
        let msg = message_from_body(r#"{"detail": "Category already exists"}"#);
        assert_eq!(msg, "Category already exists");
    }

    #[test]
    fn validation_list_flattened_per_entry() {
        let body = r#"{"detail": [{"loc": ["body", "amount"], "msg": "must be positive"}]}"#;
        assert_eq!(message_from_body(body), "body.amount: must be positive");
    }

    #[test]
    fn multiple_validation_errors_join_with_newlines() {
        let body = r#"{"detail": [
            {"loc": ["body", "amount"], "msg": "must be positive"},
            {"loc": ["body", "target_date"], "msg": "invalid date"}
        ]}"#;
        assert_eq!(
            message_from_body(body),
            "body.amount: must be positive\nbody.target_date: invalid date"
        );
    }

    #[test]
    fn missing_loc_renders_bare_message() {
        let body = r#"{"detail": [{"msg": "field required"}]}"#;
        assert_eq!(message_from_body(body), ": field required");
    }

    #[test]
    fn non_json_body_falls_back_to_generic() {
        assert_eq!(message_from_body("<html>Internal Server Error</html>"), GENERIC_MESSAGE);
    }

    #[test]
    fn missing_detail_falls_back_to_generic() {
        assert_eq!(message_from_body(r#"{"error": "nope"}"#), GENERIC_MESSAGE);
    }
}
