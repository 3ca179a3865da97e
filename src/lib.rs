//! budgetctl — a terminal client for the personal-finance web API.
//!
//! Each subcommand mirrors one form or button group in the web UI: it
//! collects field values, serializes them to JSON or query parameters,
//! issues a single HTTP request, and renders the result or reports the
//! outcome. Two components carry all of the request/response handling:
//!
//! - [`form`] — submits a form payload and resolves the outcome (success
//!   continuation or a user-facing rejection message).
//! - [`render`] — fetches JSON and renders text tables; the chart variant
//!   re-encodes image bytes as a base64 data URI.

pub mod api;
pub mod cli;
pub mod config;
pub mod form;
pub mod render;
