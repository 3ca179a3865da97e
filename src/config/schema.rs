/// Configuration schema and defaults for budgetctl.
///
/// Defines the TOML-serializable structure with two sections: `[api]` (where
/// the finance API lives, request timeout) and `[pages]` (the web app's page
/// paths used as navigation targets after a successful submission).
///
/// Every field has a built-in default; users only set what they want to
/// override.
use serde::{Deserialize, Serialize};

/// Top-level budgetctl configuration.
///
/// Maps directly to the `~/.budgetctl/config.toml` and `.budgetctl.toml`
/// file schemas. All sections and fields are optional — missing values fall
/// back to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetctlConfig {
    pub api: ApiConfig,
    pub pages: PagesConfig,
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Where the finance API lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the web application.
    pub base_url: String,
    /// Per-request timeout (milliseconds). One request per user action,
    /// no retries.
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_ms: 10_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [pages]
// ---------------------------------------------------------------------------

/// Page paths in the web app. Successful submissions navigate to one of
/// these; list rows link to a details page keyed by the record id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagesConfig {
    pub dashboard: String,
    pub goals: String,
    pub transactions: String,
    pub categories: String,
    /// Prefix a goal id is appended to for the goal details page.
    pub goal_details_prefix: String,
    /// Prefix a transaction id is appended to for the details page.
    pub transaction_details_prefix: String,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            dashboard: "/pages/".to_string(),
            goals: "/pages/goals/".to_string(),
            transactions: "/pages/spendings/".to_string(),
            categories: "/pages/spendings/categories/".to_string(),
            goal_details_prefix: "/pages/goals/".to_string(),
            transaction_details_prefix: "/pages/spendings/".to_string(),
        }
    }
}

impl BudgetctlConfig {
    /// Annotated default config written by `budgetctl config init`.
    pub fn default_toml() -> String {
        let defaults = Self::default();
        format!(
            r#"# budgetctl configuration
# Layering: built-in defaults -> ~/.budgetctl/config.toml -> .budgetctl.toml
# -> BUDGETCTL_* environment variables.

[api]
# Base URL of the finance web application.
base_url = "{}"
# Per-request timeout in milliseconds.
timeout_ms = {}

[pages]
dashboard = "{}"
goals = "{}"
transactions = "{}"
categories = "{}"
goal_details_prefix = "{}"
transaction_details_prefix = "{}"
"#,
            defaults.api.base_url,
            defaults.api.timeout_ms,
            defaults.pages.dashboard,
            defaults.pages.goals,
            defaults.pages.transactions,
            defaults.pages.categories,
            defaults.pages.goal_details_prefix,
            defaults.pages.transaction_details_prefix,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_dev_server() {
        let config = BudgetctlConfig::default();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.api.timeout_ms, 10_000);
        assert_eq!(config.pages.dashboard, "/pages/");
    }

    #[test]
    fn default_toml_round_trips() {
        let parsed: BudgetctlConfig = toml::from_str(&BudgetctlConfig::default_toml()).unwrap();
        assert_eq!(parsed.api.base_url, BudgetctlConfig::default().api.base_url);
        assert_eq!(parsed.pages.goals, BudgetctlConfig::default().pages.goals);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let parsed: BudgetctlConfig =
            toml::from_str("[api]\nbase_url = \"https://fin.example.com\"\n").unwrap();
        assert_eq!(parsed.api.base_url, "https://fin.example.com");
        assert_eq!(parsed.api.timeout_ms, 10_000);
        assert_eq!(parsed.pages.goals, "/pages/goals/");
    }
}
