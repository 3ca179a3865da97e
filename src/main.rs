use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use budgetctl::cli;

#[derive(Debug, Parser)]
#[command(name = "budgetctl")]
#[command(about = "Terminal client for the personal-finance web API")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and report where the web app would navigate
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Saving goals
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Transactions
    Tx {
        #[command(subcommand)]
        command: TxCommands,
    },
    /// Transaction categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Spending summaries and charts
    Summary {
        #[command(subcommand)]
        command: SummaryCommands,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
enum GoalCommands {
    /// Create a saving goal — unset fields stay out of the payload
    Create {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        target_date: Option<String>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
    },
    /// Delete a saving goal by id
    Delete {
        goal_id: u64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// List saving goals, optionally filtered
    List {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        min_amount: Option<String>,
        #[arg(long)]
        max_amount: Option<String>,
        #[arg(long)]
        start_date_from: Option<String>,
        #[arg(long)]
        start_date_to: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum TxCommands {
    /// List transactions, optionally filtered
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        min_amount: Option<String>,
        #[arg(long)]
        max_amount: Option<String>,
        #[arg(long)]
        date_from: Option<String>,
        #[arg(long)]
        date_to: Option<String>,
    },
    /// Delete a transaction by id
    Delete {
        tx_id: u64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
enum CategoryCommands {
    /// List transaction categories
    List,
    /// Create a transaction category
    Create {
        #[arg(long)]
        name: String,
    },
    /// Rename a transaction category
    Update {
        /// Current category name
        name: String,
        #[arg(long)]
        new_name: String,
    },
    /// Delete a transaction category
    Delete {
        name: String,
        /// What happens to the category's transactions:
        /// DELETE, TO_DEFAULT, TO_EXISTS_CATEGORY, TO_NEW_CATEGORY
        #[arg(long, default_value = "TO_DEFAULT")]
        on_delete: String,
        /// Target category for TO_EXISTS_CATEGORY / TO_NEW_CATEGORY
        #[arg(long)]
        new_category: Option<String>,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
enum SummaryCommands {
    /// Per-month summary for a year (default: current year)
    Annual {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        split_by_category: bool,
        /// Write the chart data URI to a file instead of stdout
        #[arg(long)]
        chart_out: Option<String>,
    },
    /// Per-day summary for a month (default: current month)
    Monthly {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        split_by_category: bool,
        /// Write the chart data URI to a file instead of stdout
        #[arg(long)]
        chart_out: Option<String>,
    },
    /// Per-category totals over an optional filter range
    Full {
        #[arg(long)]
        date_from: Option<String>,
        #[arg(long)]
        date_to: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Write the chart data URI to a file instead of stdout
        #[arg(long)]
        chart_out: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Print the fully resolved configuration
    Show,
    /// Write the annotated default config to ~/.budgetctl/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("BUDGETCTL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let app = App::parse();

    let result = match app.command {
        Commands::Login { username, password } => cli::run_login(&username, &password),
        Commands::Register {
            username,
            email,
            password,
        } => cli::run_register(&username, &email, &password),
        Commands::Goal { command } => match command {
            GoalCommands::Create {
                name,
                description,
                amount,
                target_date,
                start_date,
                end_date,
            } => cli::run_goal_create(
                name.as_deref(),
                description.as_deref(),
                amount.as_deref(),
                target_date.as_deref(),
                start_date.as_deref(),
                end_date.as_deref(),
            ),
            GoalCommands::Delete { goal_id, yes } => cli::run_goal_delete(goal_id, yes),
            GoalCommands::List {
                name,
                status,
                min_amount,
                max_amount,
                start_date_from,
                start_date_to,
            } => cli::run_goal_list(
                name.as_deref(),
                status.as_deref(),
                min_amount.as_deref(),
                max_amount.as_deref(),
                start_date_from.as_deref(),
                start_date_to.as_deref(),
            ),
        },
        Commands::Tx { command } => match command {
            TxCommands::List {
                category,
                description,
                min_amount,
                max_amount,
                date_from,
                date_to,
            } => cli::run_tx_list(
                category.as_deref(),
                description.as_deref(),
                min_amount.as_deref(),
                max_amount.as_deref(),
                date_from.as_deref(),
                date_to.as_deref(),
            ),
            TxCommands::Delete { tx_id, yes } => cli::run_tx_delete(tx_id, yes),
        },
        Commands::Category { command } => match command {
            CategoryCommands::List => cli::run_category_list(),
            CategoryCommands::Create { name } => cli::run_category_create(&name),
            CategoryCommands::Update { name, new_name } => {
                cli::run_category_update(&name, &new_name)
            }
            CategoryCommands::Delete {
                name,
                on_delete,
                new_category,
                yes,
            } => cli::run_category_delete(&name, &on_delete, new_category.as_deref(), yes),
        },
        Commands::Summary { command } => match command {
            SummaryCommands::Annual {
                year,
                split_by_category,
                chart_out,
            } => cli::run_summary_annual(year, split_by_category, chart_out.as_deref()),
            SummaryCommands::Monthly {
                year,
                month,
                split_by_category,
                chart_out,
            } => cli::run_summary_monthly(year, month, split_by_category, chart_out.as_deref()),
            SummaryCommands::Full {
                date_from,
                date_to,
                category,
                description,
                chart_out,
            } => cli::run_summary_full(
                date_from.as_deref(),
                date_to.as_deref(),
                category.as_deref(),
                description.as_deref(),
                chart_out.as_deref(),
            ),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => cli::run_config_show(),
            ConfigCommands::Init { force } => cli::run_config_init(force),
        },
    };

    // Rejections surface here as the alert message the web UI would show.
    if let Err(err) = result {
        eprintln!("{}", err.to_string().red());
        std::process::exit(1);
    }
}
