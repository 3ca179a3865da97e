//! Subcommand handlers, one per form or button group in the web UI.
//!
//! Each handler builds a [`FormPayload`] from its CLI arguments the way the
//! corresponding page builds one from its form fields, hands it to the
//! submitter or the table renderer, and then performs the resolved success
//! continuation: `Redirect` prints the destination page, `Reload`
//! re-renders the current view. A rejection becomes a red alert on stderr
//! and a non-zero exit; silent flows (goal and transaction delete) print
//! nothing on failure.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{Context as _, Result};
use chrono::{Datelike, Local};
use colored::Colorize;
use serde_json::Value;
use url::Url;

use crate::api::ApiRoutes;
use crate::config::{self, schema::PagesConfig};
use crate::form::{
    self, Encoding, FailureMode, FormPayload, LogicalCheck, Method, SubmitOutcome, SubmitSpec,
    SuccessAction,
};
use crate::render::{self, Row};
use crate::render::chart::{self, ChartMime};

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Resolved configuration for one invocation: routes, page targets, timeout.
pub struct Context {
    pub routes: ApiRoutes,
    pub pages: PagesConfig,
    pub timeout: Duration,
}

impl Context {
    pub fn from_config() -> Result<Self> {
        let config = config::load();
        Ok(Self {
            routes: ApiRoutes::new(&config.api.base_url)?,
            pages: config.pages.clone(),
            timeout: Duration::from_millis(config.api.timeout_ms),
        })
    }
}

/// Act on a submission outcome.
///
/// `Reload` invokes the caller's view refresh; `Redirect` prints the page
/// the web UI would navigate to. A rejection bubbles up as an error so the
/// process exits non-zero with the alert message.
fn finish(outcome: SubmitOutcome, done: &str, on_reload: impl FnOnce() -> Result<()>) -> Result<()> {
    match outcome {
        SubmitOutcome::Completed(SuccessAction::Redirect(page)) => {
            println!("{} {}", "✓".green(), done);
            println!("{}", format!("→ {page}").dimmed());
            Ok(())
        }
        SubmitOutcome::Completed(SuccessAction::Reload) => {
            println!("{} {}", "✓".green(), done);
            on_reload()
        }
        SubmitOutcome::Rejected(message) => anyhow::bail!(message),
        // Silent flow: the warning is already in the log.
        SubmitOutcome::Failed => Ok(()),
    }
}

/// Ask for confirmation on destructive actions unless `--yes` was passed.
fn confirmed(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    print!("{prompt} [y/N] ");
    io::stdout().flush().context("failed to flush stdout")?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// `budgetctl login` — URL-encoded credential post.
///
/// The sign-in endpoint reports bad credentials inside an HTTP 200 body, so
/// the submission carries a logical check on the `sign_in` marker.
pub fn run_login(username: &str, password: &str) -> Result<()> {
    let ctx = Context::from_config()?;
    let payload = FormPayload::new()
        .field("username", username)
        .field("password", password);
    let spec = SubmitSpec {
        method: Method::Post,
        url: ctx.routes.sign_in(),
        encoding: Encoding::UrlEncoded,
        on_success: SuccessAction::Redirect(ctx.pages.dashboard.clone()),
        failure: FailureMode::AlertEnvelope,
        logical_check: Some(LogicalCheck {
            field: "sign_in".to_string(),
            expect: "Success!".to_string(),
            alert: "Invalid username or password.".to_string(),
        }),
    };
    finish(
        form::submit(&spec, &payload, ctx.timeout),
        "Signed in.",
        || Ok(()),
    )
}

/// `budgetctl register` — JSON post of username, email, and password.
pub fn run_register(username: &str, email: &str, password: &str) -> Result<()> {
    let ctx = Context::from_config()?;
    let payload = FormPayload::new()
        .field("username", username)
        .field("email", email)
        .field("password", password);
    let spec = SubmitSpec {
        method: Method::Post,
        url: ctx.routes.sign_up(),
        encoding: Encoding::JsonFull,
        on_success: SuccessAction::Redirect(ctx.pages.dashboard.clone()),
        failure: FailureMode::AlertEnvelope,
        logical_check: None,
    };
    finish(
        form::submit(&spec, &payload, ctx.timeout),
        "Account created.",
        || Ok(()),
    )
}

// ---------------------------------------------------------------------------
// Saving goals
// ---------------------------------------------------------------------------

/// `budgetctl goal create` — sparse JSON: untouched fields stay out of the
/// payload so the server applies its own defaults and validation.
#[allow(clippy::too_many_arguments)]
pub fn run_goal_create(
    name: Option<&str>,
    description: Option<&str>,
    amount: Option<&str>,
    target_date: Option<&str>,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<()> {
    let ctx = Context::from_config()?;
    let payload = FormPayload::new()
        .field_opt("name", name)
        .field_opt("description", description)
        .field_opt("amount", amount)
        .field_opt("target_date", target_date)
        .field_opt("start_date", start_date)
        .field_opt("end_date", end_date);
    let spec = SubmitSpec {
        method: Method::Post,
        url: ctx.routes.goals(),
        encoding: Encoding::JsonSparse,
        on_success: SuccessAction::Redirect(ctx.pages.goals.clone()),
        failure: FailureMode::AlertEnvelope,
        logical_check: None,
    };
    finish(
        form::submit(&spec, &payload, ctx.timeout),
        "Goal created.",
        || Ok(()),
    )
}

/// `budgetctl goal delete` — no payload, and failures are a silent no-op
/// (status check only), unlike the category delete flow.
pub fn run_goal_delete(goal_id: u64, yes: bool) -> Result<()> {
    if !confirmed("Are you sure you want to delete this saving goal?", yes)? {
        return Ok(());
    }
    let ctx = Context::from_config()?;
    let spec = SubmitSpec {
        method: Method::Delete,
        url: ctx.routes.goal(goal_id),
        encoding: Encoding::None,
        on_success: SuccessAction::Redirect(ctx.pages.goals.clone()),
        failure: FailureMode::Silent,
        logical_check: None,
    };
    finish(
        form::submit(&spec, &FormPayload::new(), ctx.timeout),
        "Goal deleted.",
        || Ok(()),
    )
}

/// `budgetctl goal list` — filtered fetch rendered as a table, one
/// clickable row per goal.
#[allow(clippy::too_many_arguments)]
pub fn run_goal_list(
    name: Option<&str>,
    status: Option<&str>,
    min_amount: Option<&str>,
    max_amount: Option<&str>,
    start_date_from: Option<&str>,
    start_date_to: Option<&str>,
) -> Result<()> {
    let ctx = Context::from_config()?;
    let filter = FormPayload::new()
        .field_opt("name_search_term", name)
        .field_opt("goal_status", status)
        .field_opt("min_current_amount", min_amount)
        .field_opt("max_target_amount", max_amount)
        .field_opt("start_date_from", start_date_from)
        .field_opt("start_date_to", start_date_to);
    let mut url = ctx.routes.goals();
    filter.append_query(&mut url);

    let Some(records) = render::fetch_rows(&url, ctx.timeout) else {
        return Ok(());
    };
    let rows: Vec<Row> = records
        .iter()
        .map(|goal| goal_row(goal, &ctx.pages))
        .collect();
    render::print_table(
        &[
            "ID", "Name", "Description", "Current", "Target", "Start", "Target date", "End",
            "Status",
        ],
        &rows,
    );
    Ok(())
}

/// Row template for a goal record, linking to its details page.
fn goal_row(goal: &Value, pages: &PagesConfig) -> Row {
    let cells = [
        "id",
        "name",
        "description",
        "current_amount",
        "target_amount",
        "start_date",
        "target_date",
        "end_date",
        "status",
    ]
    .into_iter()
    .map(|key| render::cell(goal, key))
    .collect();
    Row::linked(
        cells,
        format!("{}{}", pages.goal_details_prefix, render::cell(goal, "id")),
    )
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// `budgetctl tx list` — filtered fetch rendered as a table.
pub fn run_tx_list(
    category: Option<&str>,
    description: Option<&str>,
    min_amount: Option<&str>,
    max_amount: Option<&str>,
    date_from: Option<&str>,
    date_to: Option<&str>,
) -> Result<()> {
    let ctx = Context::from_config()?;
    let filter = FormPayload::new()
        .field_opt("category_name", category)
        .field_opt("description_search_term", description)
        .field_opt("min_amount", min_amount)
        .field_opt("max_amount", max_amount)
        .field_opt("date_from", date_from)
        .field_opt("date_to", date_to);
    let mut url = ctx.routes.transactions();
    filter.append_query(&mut url);

    let Some(records) = render::fetch_rows(&url, ctx.timeout) else {
        return Ok(());
    };
    let rows: Vec<Row> = records.iter().map(|tx| tx_row(tx, &ctx.pages)).collect();
    render::print_table(&["ID", "Amount", "Category", "Date", "Description"], &rows);
    Ok(())
}

/// Row template for a transaction record, linking to its details page.
fn tx_row(tx: &Value, pages: &PagesConfig) -> Row {
    let cells = ["id", "amount", "category_name", "date", "description"]
        .into_iter()
        .map(|key| render::cell(tx, key))
        .collect();
    Row::linked(
        cells,
        format!(
            "{}{}",
            pages.transaction_details_prefix,
            render::cell(tx, "id")
        ),
    )
}

/// `budgetctl tx delete` — same silent flow as goal delete.
pub fn run_tx_delete(tx_id: u64, yes: bool) -> Result<()> {
    if !confirmed("Are you sure you want to delete this transaction?", yes)? {
        return Ok(());
    }
    let ctx = Context::from_config()?;
    let spec = SubmitSpec {
        method: Method::Delete,
        url: ctx.routes.transaction(tx_id),
        encoding: Encoding::None,
        on_success: SuccessAction::Redirect(ctx.pages.transactions.clone()),
        failure: FailureMode::Silent,
        logical_check: None,
    };
    finish(
        form::submit(&spec, &FormPayload::new(), ctx.timeout),
        "Transaction deleted.",
        || Ok(()),
    )
}

// ---------------------------------------------------------------------------
// Transaction categories
// ---------------------------------------------------------------------------

/// `budgetctl category list`.
pub fn run_category_list() -> Result<()> {
    let ctx = Context::from_config()?;
    render_categories(&ctx)
}

/// Fetch and print the categories view. Also the `Reload` target for
/// category update/delete.
fn render_categories(ctx: &Context) -> Result<()> {
    let url = ctx.routes.categories();
    let Some(records) = render::fetch_rows(&url, ctx.timeout) else {
        return Ok(());
    };
    let rows: Vec<Row> = records
        .iter()
        .map(|cat| Row::plain(vec![render::cell(cat, "id"), render::cell(cat, "category_name")]))
        .collect();
    render::print_table(&["ID", "Category"], &rows);
    Ok(())
}

/// `budgetctl category create` — full JSON: every field goes out verbatim,
/// empty or not, and the server's validator has the final word.
pub fn run_category_create(name: &str) -> Result<()> {
    let ctx = Context::from_config()?;
    let payload = FormPayload::new().field("category_name", name);
    let spec = SubmitSpec {
        method: Method::Post,
        url: ctx.routes.categories(),
        encoding: Encoding::JsonFull,
        on_success: SuccessAction::Redirect(ctx.pages.categories.clone()),
        failure: FailureMode::AlertEnvelope,
        logical_check: None,
    };
    finish(
        form::submit(&spec, &payload, ctx.timeout),
        "Category created.",
        || Ok(()),
    )
}

/// `budgetctl category update` — full-JSON PATCH, then reload the
/// categories view.
pub fn run_category_update(name: &str, new_name: &str) -> Result<()> {
    let ctx = Context::from_config()?;
    let payload = FormPayload::new().field("category_name", new_name);
    let spec = SubmitSpec {
        method: Method::Patch,
        url: ctx.routes.category(name),
        encoding: Encoding::JsonFull,
        on_success: SuccessAction::Reload,
        failure: FailureMode::AlertEnvelope,
        logical_check: None,
    };
    finish(
        form::submit(&spec, &payload, ctx.timeout),
        "Category updated.",
        || render_categories(&ctx),
    )
}

/// `budgetctl category delete` — DELETE with non-empty fields appended as a
/// query string. Unlike goal/transaction delete this flow does surface the
/// error envelope.
pub fn run_category_delete(
    name: &str,
    on_delete: &str,
    new_category: Option<&str>,
    yes: bool,
) -> Result<()> {
    if !confirmed(
        &format!("Are you sure you want to delete the category \"{name}\"?"),
        yes,
    )? {
        return Ok(());
    }
    let ctx = Context::from_config()?;
    let payload = FormPayload::new()
        .field("handle_spendings_on_deletion", on_delete)
        .field_opt("new_category_name", new_category);
    let spec = SubmitSpec {
        method: Method::Delete,
        url: ctx.routes.category(name),
        encoding: Encoding::QueryOnDelete,
        on_success: SuccessAction::Reload,
        failure: FailureMode::AlertEnvelope,
        logical_check: None,
    };
    finish(
        form::submit(&spec, &payload, ctx.timeout),
        "Category deleted.",
        || render_categories(&ctx),
    )
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// `budgetctl summary annual` — table plus PNG chart, current year by
/// default.
pub fn run_summary_annual(
    year: Option<i32>,
    split_by_category: bool,
    chart_out: Option<&str>,
) -> Result<()> {
    let ctx = Context::from_config()?;
    let year = year.unwrap_or_else(|| Local::now().year());

    let data_url = ctx.routes.summary_annual(year, split_by_category);
    render_summary_table(&ctx, &data_url, "month_number", "Month", split_by_category);

    let chart_url = ctx.routes.summary_annual_chart(year, split_by_category);
    emit_chart(&ctx, &chart_url, ChartMime::Png, chart_out)
}

/// `budgetctl summary monthly` — current year and month by default; a month
/// outside 1..=12 is rejected before any request goes out.
pub fn run_summary_monthly(
    year: Option<i32>,
    month: Option<u32>,
    split_by_category: bool,
    chart_out: Option<&str>,
) -> Result<()> {
    let ctx = Context::from_config()?;
    let now = Local::now();
    let year = year.unwrap_or_else(|| now.year());
    let month = month.unwrap_or_else(|| now.month());
    if !(1..=12).contains(&month) {
        anyhow::bail!("The month number must be between 1 and 12.");
    }

    let data_url = ctx.routes.summary_monthly(year, month, split_by_category);
    render_summary_table(&ctx, &data_url, "day_number", "Day", split_by_category);

    let chart_url = ctx.routes.summary_monthly_chart(year, month, split_by_category);
    emit_chart(&ctx, &chart_url, ChartMime::Png, chart_out)
}

/// `budgetctl summary full` — per-category totals over an optional filter
/// range; the chart endpoint serves JPEG here.
pub fn run_summary_full(
    date_from: Option<&str>,
    date_to: Option<&str>,
    category: Option<&str>,
    description: Option<&str>,
    chart_out: Option<&str>,
) -> Result<()> {
    let ctx = Context::from_config()?;
    let filter = FormPayload::new()
        .field_opt("date_from", date_from)
        .field_opt("date_to", date_to)
        .field_opt("category_name", category)
        .field_opt("description_search_term", description);

    let mut data_url = ctx.routes.summary_full();
    filter.append_query(&mut data_url);
    if let Some(records) = render::fetch_rows(&data_url, ctx.timeout) {
        let rows: Vec<Row> = records
            .iter()
            .map(|record| {
                Row::plain(vec![
                    render::cell(record, "category_name"),
                    render::cell(record, "amount"),
                ])
            })
            .collect();
        render::print_table(&["Category", "Amount"], &rows);
    }

    let mut chart_url = ctx.routes.summary_full_chart();
    filter.append_query(&mut chart_url);
    emit_chart(&ctx, &chart_url, ChartMime::Jpeg, chart_out)
}

/// Fetch a period summary and print it as a four-column table. Grouped
/// responses flatten per inner record; ungrouped ones repeat the bucket
/// total. A failed fetch leaves the view unchanged.
fn render_summary_table(
    ctx: &Context,
    url: &Url,
    period_key: &str,
    period_header: &str,
    split_by_category: bool,
) {
    let Some(records) = render::fetch_rows(url, ctx.timeout) else {
        return;
    };
    let rows = if split_by_category {
        render::grouped_rows(&records, period_key)
    } else {
        render::ungrouped_rows(&records, period_key)
    };
    render::print_table(&[period_header, "Category", "Amount", "Total"], &rows);
}

/// Fetch the companion chart and emit its data URI — to a file when
/// `--chart-out` is given, to stdout otherwise. A failed fetch leaves the
/// current image alone.
fn emit_chart(ctx: &Context, url: &Url, mime: ChartMime, chart_out: Option<&str>) -> Result<()> {
    let Some(data_uri) = chart::fetch_data_uri(url, mime, ctx.timeout) else {
        return Ok(());
    };
    match chart_out {
        Some(path) => {
            std::fs::write(path, &data_uri)
                .with_context(|| format!("failed to write chart to {path}"))?;
            println!("{}", format!("Chart written to {path}").dimmed());
        }
        None => println!("{data_uri}"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Config commands
// ---------------------------------------------------------------------------

/// `budgetctl config show` — print the fully resolved configuration.
pub fn run_config_show() -> Result<()> {
    let config = config::load();
    let rendered = toml::to_string_pretty(&config).context("failed to render config")?;
    if let Some(path) = config::global_config_file() {
        println!("{}", format!("# global config: {}", path.display()).dimmed());
    }
    print!("{rendered}");
    Ok(())
}

/// `budgetctl config init` — write the annotated default config file.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} wrote {}", "✓".green(), path.display());
    Ok(())
}
