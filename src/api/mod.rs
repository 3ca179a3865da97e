//! Endpoint catalogue for the finance API.
//!
//! The web pages receive their target URLs from server-rendered globals;
//! here they are built explicitly from the configured base URL instead.
//! Path parameters (category names in particular) are percent-encoded via
//! `Url::path_segments_mut`, matching the pages' `encodeURIComponent` use.

use anyhow::{Context, Result};
use url::Url;

/// API route builder rooted at a configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRoutes {
    base: Url,
}

impl ApiRoutes {
    /// Parse the configured base URL. A trailing slash is tolerated.
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url.trim_end_matches('/'))
            .with_context(|| format!("invalid API base URL: {base_url}"))?;
        Ok(Self { base })
    }

    /// Join fixed path segments onto the base. Segments are trusted
    /// literals; user-supplied values go through [`Self::join_encoded`].
    fn join(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        {
            let mut parts = url.path_segments_mut().expect("base URL cannot-be-a-base");
            parts.pop_if_empty();
            parts.extend(["api", "v1"]);
            parts.extend(segments);
            // The API serves every route with a trailing slash.
            parts.push("");
        }
        url
    }

    /// Join fixed segments plus one user-supplied segment that needs
    /// percent-encoding (e.g. a category name containing spaces).
    fn join_encoded(&self, segments: &[&str], tail: &str) -> Url {
        let mut url = self.base.clone();
        {
            let mut parts = url.path_segments_mut().expect("base URL cannot-be-a-base");
            parts.pop_if_empty();
            parts.extend(["api", "v1"]);
            parts.extend(segments);
            parts.push(tail);
            parts.push("");
        }
        url
    }

    // --- authentication ---

    pub fn sign_up(&self) -> Url {
        self.join(&["sign_up"])
    }

    pub fn sign_in(&self) -> Url {
        self.join(&["sign_in"])
    }

    // --- saving goals ---

    pub fn goals(&self) -> Url {
        self.join(&["goals"])
    }

    pub fn goal(&self, goal_id: u64) -> Url {
        self.join(&["goals", &goal_id.to_string()])
    }

    // --- transactions ---

    pub fn transactions(&self) -> Url {
        self.join(&["spendings"])
    }

    pub fn transaction(&self, tx_id: u64) -> Url {
        self.join(&["spendings", &tx_id.to_string()])
    }

    // --- transaction categories ---

    pub fn categories(&self) -> Url {
        self.join(&["spendings", "categories"])
    }

    pub fn category(&self, name: &str) -> Url {
        self.join_encoded(&["spendings", "categories"], name)
    }

    // --- summaries ---

    pub fn summary_full(&self) -> Url {
        self.join(&["spendings", "summary"])
    }

    pub fn summary_full_chart(&self) -> Url {
        self.join(&["spendings", "summary", "chart"])
    }

    pub fn summary_annual(&self, year: i32, split_by_category: bool) -> Url {
        let mut url = self.join(&["spendings", "summary", &year.to_string()]);
        apply_split(&mut url, split_by_category);
        url
    }

    pub fn summary_annual_chart(&self, year: i32, split_by_category: bool) -> Url {
        let mut url = self.join(&["spendings", "summary", "chart", &year.to_string()]);
        apply_split(&mut url, split_by_category);
        url
    }

    pub fn summary_monthly(&self, year: i32, month: u32, split_by_category: bool) -> Url {
        let mut url = self.join(&[
            "spendings",
            "summary",
            &year.to_string(),
            &month.to_string(),
        ]);
        apply_split(&mut url, split_by_category);
        url
    }

    pub fn summary_monthly_chart(&self, year: i32, month: u32, split_by_category: bool) -> Url {
        let mut url = self.join(&[
            "spendings",
            "summary",
            "chart",
            &year.to_string(),
            &month.to_string(),
        ]);
        apply_split(&mut url, split_by_category);
        url
    }
}

/// The summary endpoints take `split_by_category=true`; the flag is simply
/// absent otherwise, matching the pages' URL construction.
fn apply_split(url: &mut Url, split_by_category: bool) {
    if split_by_category {
        url.query_pairs_mut()
            .append_pair("split_by_category", "true");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn routes() -> ApiRoutes {
        ApiRoutes::new("http://127.0.0.1:8000").unwrap()
    }

    #[test]
    fn trailing_slash_on_base_is_tolerated() {
        let routes = ApiRoutes::new("http://127.0.0.1:8000/").unwrap();
        assert_eq!(routes.goals().as_str(), "http://127.0.0.1:8000/api/v1/goals/");
    }

    #[test]
    fn goal_routes_carry_the_id() {
        assert_eq!(
            routes().goal(42).as_str(),
            "http://127.0.0.1:8000/api/v1/goals/42/"
        );
    }

    #[test]
    fn category_names_are_percent_encoded() {
        assert_eq!(
            routes().category("Eating out").as_str(),
            "http://127.0.0.1:8000/api/v1/spendings/categories/Eating%20out/"
        );
    }

    #[test]
    fn annual_summary_split_flag_is_opt_in() {
        let routes = routes();
        assert_eq!(
            routes.summary_annual(2026, false).as_str(),
            "http://127.0.0.1:8000/api/v1/spendings/summary/2026/"
        );
        assert_eq!(
            routes.summary_annual(2026, true).as_str(),
            "http://127.0.0.1:8000/api/v1/spendings/summary/2026/?split_by_category=true"
        );
    }

    #[test]
    fn monthly_chart_url_nests_year_and_month() {
        assert_eq!(
            routes().summary_monthly_chart(2026, 8, true).as_str(),
            "http://127.0.0.1:8000/api/v1/spendings/summary/chart/2026/8/?split_by_category=true"
        );
    }
}
