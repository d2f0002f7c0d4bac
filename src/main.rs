//! Estampa Gestor - Main entry point
//!
//! Command-line reports over the shop's stored orders, expenses, activities
//! and messages, filtered by period.

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use estampa_gestor::analytics;
use estampa_gestor::display;
use estampa_gestor::error::Result;
use estampa_gestor::models::{
    Activity, ChatMessage, Entity, Expense, Order, OrderStatus, ProfitCalculation,
};
use estampa_gestor::period::{
    filter_records, period_label, Dated, Direction, Granularity, Period, PeriodCursor,
};
use estampa_gestor::store::{JsonStore, Store};
use estampa_gestor::Config;

#[derive(Parser)]
#[command(name = "gestor")]
#[command(author, version, about = "Order, expense and activity reports for a small shop")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Directory holding the stored entity files
    #[arg(long, global = true, env = "GESTOR_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Period selection shared by every report.
#[derive(Args, Debug, Clone)]
struct PeriodArgs {
    /// Period granularity: all, year, month, week or day (defaults to the configured one)
    #[arg(short, long)]
    period: Option<Granularity>,

    /// Period value: YYYY, YYYY-MM, YYYY-Www or YYYY-MM-DD (defaults to the current period)
    #[arg(long)]
    value: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show dashboard totals and analytics
    Dashboard {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// List orders
    Orders {
        #[command(flatten)]
        period: PeriodArgs,

        /// Only orders with this status: pending, in-progress, ready, delivered or cancelled
        #[arg(long)]
        status: Option<OrderStatus>,

        /// Search customer name and description
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List expenses with category totals
    Expenses {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// List scheduled activities
    Activities {
        #[command(flatten)]
        period: PeriodArgs,

        /// Only activities not yet completed
        #[arg(long)]
        pending: bool,
    },

    /// List chat messages
    Messages {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Show profit across recorded cost breakdowns
    Profit {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Period navigation helpers
    Period {
        #[command(subcommand)]
        action: PeriodAction,
    },

    /// Show or edit configuration
    Config {
        /// Print current configuration
        #[arg(long)]
        show: bool,

        /// Create default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Subcommand)]
enum PeriodAction {
    /// Print the label for a period value
    Label {
        #[arg(short, long)]
        period: Granularity,

        #[arg(long, default_value = "")]
        value: String,
    },

    /// Step a period value backward or forward
    ///
    /// A week value is read back as January 1st plus whole weeks, so stepping
    /// from a week whose Monday lies in the previous year can repeat or skip
    /// a week (from 2021-W01, next gives 2021-W01 and prev gives 2020-W52).
    Step {
        #[arg(short, long)]
        period: Granularity,

        /// Starting value (defaults to the current period)
        #[arg(long)]
        value: Option<String>,

        /// prev or next
        #[arg(short, long, default_value = "next")]
        direction: Direction,

        /// Number of steps
        #[arg(short = 'n', long, default_value = "1")]
        count: u32,
    },

    /// Print the current period value
    Current {
        #[arg(short, long)]
        period: Granularity,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load and validate configuration
    let mut config = if let Some(ref path) = cli.config {
        Config::load_from(path)?
    } else {
        Config::load()?
    };
    if let Some(ref dir) = cli.data_dir {
        config.general.data_dir = Some(dir.clone());
    }

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(&config.general.log_level)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    config.validate()?;

    match cli.command {
        Some(Commands::Dashboard { period }) => run_dashboard(&config, &period),
        Some(Commands::Orders {
            period,
            status,
            search,
        }) => run_orders(&config, &period, status, search.as_deref()),
        Some(Commands::Expenses { period }) => run_expenses(&config, &period),
        Some(Commands::Activities { period, pending }) => run_activities(&config, &period, pending),
        Some(Commands::Messages { period }) => run_messages(&config, &period),
        Some(Commands::Profit { period }) => run_profit(&config, &period),
        Some(Commands::Period { action }) => {
            run_period(action);
            Ok(())
        }

        Some(Commands::Config { show, init }) => {
            if init {
                let default_config = Config::default();
                default_config.save()?;
                println!(
                    "Created default configuration at {}",
                    Config::config_path()?.display()
                );
            } else if show {
                let contents = toml::to_string_pretty(&config)?;
                println!("{contents}");
            } else {
                println!("Configuration path: {}", Config::config_path()?.display());
            }
            Ok(())
        }

        None => {
            // Default: dashboard for the current period
            let period = PeriodArgs {
                period: None,
                value: None,
            };
            run_dashboard(&config, &period)
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn open_store(config: &Config) -> Result<JsonStore> {
    let data_dir = config.data_dir()?;
    JsonStore::open(&config.storage, &data_dir)
}

/// Turn CLI period flags into a period, defaulting to the current one.
fn resolve_period(config: &Config, args: &PeriodArgs) -> Result<Period> {
    let granularity = args.period.unwrap_or(config.reports.default_granularity);
    match args.value {
        Some(ref value) => Period::parse(granularity, value),
        None => Ok(PeriodCursor::starting_at(granularity, today()).period()),
    }
}

/// Load every `E` and keep those inside `period`, in the local time zone.
fn load_in_period<S: Store, E: Entity + Dated + Clone>(
    store: &S,
    period: &Period,
) -> Result<Vec<E>> {
    let all: Vec<E> = store.get_all()?;
    let total = all.len();
    let kept: Vec<E> = filter_records(&all, E::timestamp, period, &Local)
        .into_iter()
        .cloned()
        .collect();
    tracing::debug!("{} of {} {} in period '{}'", kept.len(), total, E::NAME, period);
    Ok(kept)
}

fn print_header(title: &str, period: &Period) {
    display::print_section(&format!("{} - {}", title, period.label().to_uppercase()));
}

fn run_dashboard(config: &Config, args: &PeriodArgs) -> Result<()> {
    let store = open_store(config)?;
    let period = resolve_period(config, args)?;
    let orders: Vec<Order> = load_in_period(&store, &period)?;
    let currency = &config.reports.currency_symbol;

    print_header("DASHBOARD", &period);

    if orders.is_empty() {
        println!("No orders found for this period.");
        return Ok(());
    }

    display::print_section_simple("OVERVIEW");
    display::display_dashboard(&analytics::dashboard_stats(&orders), currency);
    display::display_kpis(&analytics::kpis(&orders), currency);

    display::print_section_simple("ORDERS BY STATUS");
    display::display_status_distribution(&analytics::status_distribution(&orders));

    display::print_section_simple("RECEIVED VS PENDING");
    display::display_timeline(
        &analytics::financial_timeline(&orders, &period, &Local),
        currency,
    );

    println!();
    Ok(())
}

fn run_orders(
    config: &Config,
    args: &PeriodArgs,
    status: Option<OrderStatus>,
    search: Option<&str>,
) -> Result<()> {
    let store = open_store(config)?;
    let period = resolve_period(config, args)?;
    let orders: Vec<Order> = load_in_period(&store, &period)?;

    let mut shown: Vec<&Order> = orders
        .iter()
        .filter(|o| status.map_or(true, |s| o.status == s))
        .filter(|o| search.map_or(true, |q| o.matches_search(q)))
        .collect();
    analytics::sort_orders(&mut shown);
    shown.truncate(config.reports.list_limit);

    print_header("ORDERS", &period);
    if shown.is_empty() {
        println!("No orders found.");
    } else {
        display::display_orders(&shown, &config.reports.currency_symbol, &Local);
    }
    println!();
    Ok(())
}

fn run_expenses(config: &Config, args: &PeriodArgs) -> Result<()> {
    let store = open_store(config)?;
    let period = resolve_period(config, args)?;
    let mut expenses: Vec<Expense> = load_in_period(&store, &period)?;
    analytics::sort_expenses(&mut expenses);
    let summary = analytics::expense_summary(&expenses);

    print_header("EXPENSES", &period);
    let shown: Vec<&Expense> = expenses.iter().take(config.reports.list_limit).collect();
    display::display_expenses(&shown, &summary, &config.reports.currency_symbol, &Local);
    println!();
    Ok(())
}

fn run_activities(config: &Config, args: &PeriodArgs, pending_only: bool) -> Result<()> {
    let store = open_store(config)?;
    let period = resolve_period(config, args)?;
    let mut activities: Vec<Activity> = load_in_period(&store, &period)?;
    analytics::sort_activities(&mut activities);
    let summary = analytics::activity_summary(&activities, today(), &Local);

    print_header("ACTIVITIES", &period);
    let shown: Vec<&Activity> = activities
        .iter()
        .filter(|a| !pending_only || !a.completed)
        .take(config.reports.list_limit)
        .collect();
    display::display_activities(&shown, &summary, &Local);
    println!();
    Ok(())
}

fn run_messages(config: &Config, args: &PeriodArgs) -> Result<()> {
    let store = open_store(config)?;
    let period = resolve_period(config, args)?;
    let messages: Vec<ChatMessage> = load_in_period(&store, &period)?;

    print_header("MESSAGES", &period);
    let skip = messages.len().saturating_sub(config.reports.list_limit);
    let shown: Vec<&ChatMessage> = messages.iter().skip(skip).collect();
    display::display_messages(&shown, &Local);
    println!();
    Ok(())
}

fn run_profit(config: &Config, args: &PeriodArgs) -> Result<()> {
    let store = open_store(config)?;
    let period = resolve_period(config, args)?;
    let calculations: Vec<ProfitCalculation> = load_in_period(&store, &period)?;

    print_header("PROFIT", &period);
    if calculations.is_empty() {
        println!("No cost breakdowns recorded for this period.");
    } else {
        display::display_profit(
            &analytics::profit_breakdown(&calculations),
            &config.reports.currency_symbol,
        );
    }
    println!();
    Ok(())
}

fn run_period(action: PeriodAction) {
    match action {
        PeriodAction::Label { period, value } => {
            println!("{}", period_label(period, &value));
        }
        PeriodAction::Step {
            period,
            value,
            direction,
            count,
        } => {
            let mut cursor = match value {
                Some(ref v) => PeriodCursor::from_value(period, v, today()),
                None => PeriodCursor::starting_at(period, today()),
            };
            for _ in 0..count {
                cursor.step(direction);
            }
            println!("{}\t{}", cursor.value(), cursor.label());
        }
        PeriodAction::Current { period } => {
            let cursor = PeriodCursor::new(period);
            println!("{}\t{}", cursor.value(), cursor.label());
        }
    }
}
