//! Form submission against the finance API.
//!
//! Every mutating action in the web UI follows the same shape: collect the
//! form's field values, encode them (JSON body, URL-encoded body, or query
//! string), issue the request, and either perform a success continuation or
//! surface a message from the server's error envelope. [`submit`] is that
//! shape, generalized over:
//!
//! - **Encoding** — sparse JSON (empty fields dropped), full JSON (every
//!   field verbatim), URL-encoded body, query-string-on-delete, or no
//!   payload at all.
//! - **Failure mode** — parse-and-alert (the default) or silent status
//!   check (delete goal / delete transaction, which the UI never alerts on).
//! - **Logical check** — login returns HTTP 200 even on bad credentials and
//!   signals the result in a `sign_in` body field; that is a distinct branch
//!   from the HTTP status check.
//!
//! Transport and application failures never propagate as `Err` from
//! [`submit`]; they resolve to a [`SubmitOutcome`] the caller acts on, so
//! the form state is always left intact for correction.

pub mod envelope;

use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Ordered field-name → value mapping built from the current form state.
///
/// Field order is preserved so serialized payloads and query strings match
/// the order the fields were declared in.
#[derive(Debug, Clone, Default)]
pub struct FormPayload {
    fields: Vec<(String, String)>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. Empty values are kept here; whether they survive
    /// serialization depends on the encoding.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Append a field only if a value is present. Absent optional CLI
    /// arguments behave like untouched form inputs.
    pub fn field_opt(self, name: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.field(name, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields with a non-empty value, in declaration order.
    pub fn sparse_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// All fields verbatim, in declaration order.
    pub fn all_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// JSON object with empty fields dropped.
    pub fn to_json_sparse(&self) -> Value {
        let mut map = Map::new();
        for (k, v) in self.sparse_fields() {
            map.insert(k.to_string(), Value::String(v.to_string()));
        }
        Value::Object(map)
    }

    /// JSON object with every field included, empty or not.
    pub fn to_json_full(&self) -> Value {
        let mut map = Map::new();
        for (k, v) in self.all_fields() {
            map.insert(k.to_string(), Value::String(v.to_string()));
        }
        Value::Object(map)
    }

    /// `application/x-www-form-urlencoded` body carrying every field.
    pub fn to_urlencoded_body(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in self.all_fields() {
            serializer.append_pair(k, v);
        }
        serializer.finish()
    }

    /// Append non-empty fields to a URL's query string.
    pub fn append_query(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in self.sparse_fields() {
            pairs.append_pair(k, v);
        }
    }
}

// ---------------------------------------------------------------------------
// Submission contract
// ---------------------------------------------------------------------------

/// HTTP method for a form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// How the payload travels to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// JSON body, empty fields dropped (goal create).
    JsonSparse,
    /// JSON body, every field verbatim (category create/update).
    JsonFull,
    /// URL-encoded body, every field (login).
    UrlEncoded,
    /// Non-empty fields appended to the URL as a query string, no body
    /// (category delete).
    QueryOnDelete,
    /// No payload at all (goal/transaction delete).
    None,
}

/// What the caller does after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuccessAction {
    /// Navigate to another page.
    Redirect(String),
    /// Re-render the current view.
    Reload,
}

/// How a non-success HTTP status is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Parse the error envelope and surface its message.
    AlertEnvelope,
    /// Status check only; failure is logged and otherwise a no-op. The
    /// delete-goal and delete-transaction flows behave this way.
    Silent,
}

/// Body-marker inspection for endpoints that signal their outcome in the
/// response body rather than the status line. Login reports
/// `{"sign_in": "Success!"}` on success; anything else — a different
/// marker, or an error status — alerts the fixed message.
#[derive(Debug, Clone)]
pub struct LogicalCheck {
    /// Body field to inspect.
    pub field: String,
    /// Value that counts as success.
    pub expect: String,
    /// Message surfaced when the check fails.
    pub alert: String,
}

/// A fully described form submission.
#[derive(Debug, Clone)]
pub struct SubmitSpec {
    pub method: Method,
    pub url: Url,
    pub encoding: Encoding,
    pub on_success: SuccessAction,
    pub failure: FailureMode,
    pub logical_check: Option<LogicalCheck>,
}

/// Resolution of a submission. Never an `Err`: every failure class maps to
/// a variant the caller handles explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The server accepted the submission; perform the continuation.
    Completed(SuccessAction),
    /// The submission was refused; show the message and leave the form
    /// intact for correction.
    Rejected(String),
    /// Silent-mode failure: nothing to show, already logged.
    Failed,
}

// ---------------------------------------------------------------------------
// Submitter
// ---------------------------------------------------------------------------

/// Submit a form payload per the given spec.
///
/// Transport failures (the request never completes) become
/// `Rejected("Network error: ...")` under [`FailureMode::AlertEnvelope`] and
/// a logged [`SubmitOutcome::Failed`] under [`FailureMode::Silent`].
/// Non-success statuses go through the error envelope or the silent path.
/// A passing status with a failing [`LogicalCheck`] is rejected with the
/// check's message rather than the envelope's.
pub fn submit(spec: &SubmitSpec, payload: &FormPayload, timeout: Duration) -> SubmitOutcome {
    let mut url = spec.url.clone();
    if spec.encoding == Encoding::QueryOnDelete {
        payload.append_query(&mut url);
    }

    debug!(method = spec.method.as_str(), url = %url, "submitting form");

    let request = ureq::request(spec.method.as_str(), url.as_str()).timeout(timeout);

    let result = match spec.encoding {
        Encoding::JsonSparse => request.send_json(payload.to_json_sparse()),
        Encoding::JsonFull => request.send_json(payload.to_json_full()),
        Encoding::UrlEncoded => request
            .set("Content-Type", "application/x-www-form-urlencoded")
            .send_string(&payload.to_urlencoded_body()),
        Encoding::QueryOnDelete | Encoding::None => request.call(),
    };

    match result {
        Ok(response) => resolve_success(spec, response),
        Err(ureq::Error::Status(code, response)) => resolve_failure(spec, code, response),
        Err(err) => match spec.failure {
            FailureMode::AlertEnvelope => SubmitOutcome::Rejected(format!("Network error: {err}")),
            FailureMode::Silent => {
                warn!(url = %url, error = %err, "form submission failed in transit");
                SubmitOutcome::Failed
            }
        },
    }
}

/// Handle a success-status response: run the logical check, then hand the
/// continuation back to the caller.
fn resolve_success(spec: &SubmitSpec, response: ureq::Response) -> SubmitOutcome {
    if let Some(check) = &spec.logical_check {
        let body: Value = match response.into_json() {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "unreadable body on logical-check response");
                return SubmitOutcome::Rejected(check.alert.clone());
            }
        };
        let passed = body
            .get(&check.field)
            .and_then(Value::as_str)
            .is_some_and(|marker| marker == check.expect);
        if !passed {
            return SubmitOutcome::Rejected(check.alert.clone());
        }
    }
    SubmitOutcome::Completed(spec.on_success.clone())
}

/// Handle a non-success HTTP status per the submission's failure mode.
fn resolve_failure(spec: &SubmitSpec, code: u16, response: ureq::Response) -> SubmitOutcome {
    match spec.failure {
        FailureMode::AlertEnvelope => {
            // Endpoints with a body marker never surface the envelope: the
            // login page alerts its fixed message for any response that
            // doesn't carry the success marker, status line included.
            if let Some(check) = &spec.logical_check {
                warn!(code, "marker endpoint returned an error status");
                return SubmitOutcome::Rejected(check.alert.clone());
            }
            let body = response.into_string().unwrap_or_default();
            warn!(code, body = %body, "server rejected submission");
            SubmitOutcome::Rejected(envelope::message_from_body(&body))
        }
        FailureMode::Silent => {
            warn!(code, url = %spec.url, "submission failed, silent flow");
            SubmitOutcome::Failed
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> FormPayload {
        FormPayload::new()
            .field("name", "Vacation")
            .field("description", "")
            .field("amount", "1500")
            .field_opt("target_date", None)
    }

    #[test]
    fn sparse_json_drops_empty_and_absent_fields() {
        let json = payload().to_json_sparse();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["name"], "Vacation");
        assert_eq!(obj["amount"], "1500");
        assert!(!obj.contains_key("description"));
        assert!(!obj.contains_key("target_date"));
    }

    #[test]
    fn full_json_keeps_empty_fields_verbatim() {
        let json = payload().to_json_full();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(obj["description"], "");
    }

    #[test]
    fn urlencoded_body_escapes_and_keeps_all_fields() {
        let body = FormPayload::new()
            .field("username", "ann a")
            .field("password", "p&w")
            .to_urlencoded_body();
        assert_eq!(body, "username=ann+a&password=p%26w");
    }

    #[test]
    fn query_append_skips_empty_fields() {
        let mut url = Url::parse("http://localhost/api/v1/spendings/categories/Food/").unwrap();
        FormPayload::new()
            .field("handle_spendings_on_deletion", "TO_DEFAULT")
            .field("new_category_name", "")
            .append_query(&mut url);
        assert_eq!(
            url.query(),
            Some("handle_spendings_on_deletion=TO_DEFAULT")
        );
    }

    #[test]
    fn method_names_match_the_wire() {
        assert_eq!(Method::Post.as_str(), "POST");
        assert_eq!(Method::Patch.as_str(), "PATCH");
        assert_eq!(Method::Delete.as_str(), "DELETE");
    }
}
