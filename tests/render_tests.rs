//! Table and chart fetch tests against a local stub server.
//!
//! The read/render flows never alert: a failed or malformed fetch yields
//! `None` so the caller leaves its current view unchanged. These tests pin
//! that policy and the grouped-summary flattening end to end.

use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use budgetctl::render::{self, chart};
use budgetctl::render::chart::ChartMime;
use tiny_http::{Header, Response, Server};
use url::Url;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Spawn a stub server answering one request with the given content type
/// and raw body bytes.
fn serve_once(content_type: &'static str, body: Vec<u8>) -> String {
    let server = Server::http("127.0.0.1:0").expect("failed to bind stub server");
    let addr = server.server_addr().to_ip().expect("stub server has no ip");
    let base = format!("http://{addr}");

    thread::spawn(move || {
        if let Some(request) = server.incoming_requests().next() {
            let header =
                Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()).unwrap();
            let _ = request.respond(Response::from_data(body).with_header(header));
        }
    });

    base
}

/// A URL nothing listens on.
fn dead_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}/api/v1/spendings/")).unwrap()
}

// ---------------------------------------------------------------------------
// Row fetching
// ---------------------------------------------------------------------------

#[test]
fn fetch_rows_returns_the_record_array() {
    let base = serve_once(
        "application/json",
        br#"[{"id": 1, "amount": 40}, {"id": 2, "amount": 60}]"#.to_vec(),
    );
    let url = Url::parse(&format!("{base}/api/v1/spendings/")).unwrap();

    let records = render::fetch_rows(&url, TIMEOUT).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], 1);
}

#[test]
fn fetch_rows_on_refused_connection_is_logged_not_fatal() {
    assert!(render::fetch_rows(&dead_url(), TIMEOUT).is_none());
}

#[test]
fn fetch_rows_rejects_non_array_bodies() {
    let base = serve_once("application/json", br#"{"detail": "nope"}"#.to_vec());
    let url = Url::parse(&format!("{base}/api/v1/spendings/")).unwrap();

    assert!(render::fetch_rows(&url, TIMEOUT).is_none());
}

// ---------------------------------------------------------------------------
// Grouped summary, end to end
// ---------------------------------------------------------------------------

#[test]
fn grouped_summary_response_flattens_to_single_row() {
    let base = serve_once(
        "application/json",
        br#"[{"month_number": 1, "total_amount": 100,
             "summary": [{"category_name": "Food", "amount": 40}]}]"#
            .to_vec(),
    );
    let url = Url::parse(&format!(
        "{base}/api/v1/spendings/summary/2026/?split_by_category=true"
    ))
    .unwrap();

    let records = render::fetch_rows(&url, TIMEOUT).unwrap();
    let rows = render::grouped_rows(&records, "month_number");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].cells, vec!["1", "Food", "40", "100"]);
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

#[test]
fn chart_bytes_become_a_png_data_uri() {
    let base = serve_once("image/png", b"PNG".to_vec());
    let url = Url::parse(&format!("{base}/api/v1/spendings/summary/chart/2026/")).unwrap();

    let uri = chart::fetch_data_uri(&url, ChartMime::Png, TIMEOUT).unwrap();
    assert_eq!(uri, "data:image/png;base64,UE5H");
}

#[test]
fn full_summary_chart_uses_jpeg_mime() {
    let base = serve_once("image/jpeg", vec![0xff, 0xd8]);
    let url = Url::parse(&format!("{base}/api/v1/spendings/summary/chart/")).unwrap();

    let uri = chart::fetch_data_uri(&url, ChartMime::Jpeg, TIMEOUT).unwrap();
    assert!(uri.starts_with("data:image/jpeg;base64,"));
}

#[test]
fn chart_fetch_failure_leaves_the_image_unchanged() {
    assert!(chart::fetch_data_uri(&dead_url(), ChartMime::Png, TIMEOUT).is_none());
}
