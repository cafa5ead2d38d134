//! FinTrack CLI
//!
//! Terminal dashboard for the FinTrack personal-finance service:
//! - Log in and manage the stored session
//! - Show the dashboard, budgets, analytics and transactions
//! - Watch the dashboard with periodic refresh

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use serde::Serialize;
use serde_json::json;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use fintrack::api::{
    Account, Analytics, Asset, BudgetAlert, BudgetOverview, Category, CategoryType,
    DashboardStats, FinanceApi, Page, Period, PortfolioSummary, SortSpec, Transaction,
};
use fintrack::api::analytics::DEFAULT_MONTHS;
use fintrack::api::transactions::DEFAULT_PAGE_SIZE;
use fintrack::format::{budget_message, format_change, format_currency, format_date, signed_amount, tooltip};
use fintrack::session::ProfileUpdate;
use fintrack::{
    generate_default_config, ApiClient, AuthFlow, ClientError, ClientResult, Config,
    FileSessionStore, Poller, SessionEvent, TransactionFilters, User, UserStatistics, ViewScope,
};

#[derive(Parser)]
#[command(name = "fintrack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Personal finance dashboard in the terminal")]
#[command(long_about = "FinTrack shows your wealth, budgets, transactions and analytics.\nLog in once; the session is stored and refreshed automatically.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ~/.config/fintrack/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        email: String,
        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user, re-validated against the server
    Whoami,

    /// Show the profile, or update it when any field is given
    Profile {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
    },

    /// Account statistics
    Stats,

    /// Wealth, budgets and portfolio at a glance
    Dashboard {
        /// Period: 1M, 6M, 1Y, YTD or MAX
        #[arg(short, long)]
        period: Option<Period>,
    },

    /// List transactions
    Transactions(TransactionArgs),

    /// Budget overview
    Budgets {
        /// Show budget alerts instead
        #[arg(long)]
        alerts: bool,
    },

    /// Income and expense analytics
    Analytics {
        /// Number of months to cover
        #[arg(short, long, default_value_t = DEFAULT_MONTHS)]
        months: u32,
    },

    /// List categories
    Categories {
        /// Only INCOME or EXPENSE categories
        #[arg(short = 't', long = "type")]
        kind: Option<CategoryType>,
    },

    /// List accounts
    Accounts,

    /// List assets
    Assets,

    /// Portfolio composition
    Portfolio,

    /// Check that the service is reachable
    Health,

    /// Refresh the dashboard on an interval until interrupted
    Watch {
        /// Period: 1M, 6M, 1Y, YTD or MAX
        #[arg(short, long)]
        period: Option<Period>,
        /// Seconds between refreshes (default: polling.interval_secs)
        #[arg(short, long)]
        interval: Option<u64>,
        /// Stop after this many refreshes
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct TransactionArgs {
    /// Match description or category
    #[arg(short, long)]
    search: Option<String>,
    /// Earliest date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Latest date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Category id
    #[arg(long)]
    category: Option<u64>,
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    limit: u32,
    /// Sort field; prefix with '-' for descending (e.g. -date)
    #[arg(long, allow_hyphen_values = true)]
    sort: Option<SortSpec>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        report(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_deref());
    }

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    if let Err(e) = fintrack::logging::init(&config.logging) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let store = FileSessionStore::open(config.session.dir_path())
        .with_context(|| format!("Cannot open session directory {}", config.session.dir))?;
    let client = Arc::new(ApiClient::new(config.api.clone(), Arc::new(store))?);
    let mut events = client.subscribe();

    let app = App {
        auth: AuthFlow::new(Arc::clone(&client)),
        api: FinanceApi::new(client),
        format: cli.format,
        config,
    };

    let result = app.dispatch(cli.command, &mut events).await;
    notify_expiry(&mut events);
    result
}

fn report(error: &anyhow::Error) {
    match error.downcast_ref::<ClientError>() {
        Some(e) if e.requires_login() => {
            eprintln!("Error: {}", e);
            eprintln!("Run `fintrack login --email <EMAIL>` to sign in.");
        }
        Some(ClientError::Timeout) | Some(ClientError::Unavailable) => {
            eprintln!("Error: {}", error);
            eprintln!("The FinTrack service could not be reached. Check api.base_url or try again later.");
        }
        _ => eprintln!("Error: {:#}", error),
    }
}

fn notify_expiry(events: &mut broadcast::Receiver<SessionEvent>) {
    while let Ok(event) = events.try_recv() {
        if event == SessionEvent::Expired {
            eprintln!("Your session has expired and the stored credentials were cleared.");
        }
    }
}

fn write_default_config(output: Option<&Path>) -> Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Cannot write config to {:?}", path))?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Read a password from the terminal without echoing it.
///
/// Piped input is read as a plain line.
fn prompt_password() -> Result<String> {
    eprint!("Password: ");
    std::io::stderr().flush()?;

    if !std::io::stdin().is_terminal() {
        let mut line = String::new();
        std::io::stdin()
            .read_line(&mut line)
            .context("Cannot read password")?;
        return Ok(line.trim_end_matches(['\r', '\n']).to_string());
    }

    let password = {
        let _raw = RawMode::enable()?;
        read_hidden_line()?
    };
    eprintln!();
    password.context("Password entry cancelled")
}

/// Collect keys until Enter; `None` on Esc or Ctrl-C
fn read_hidden_line() -> Result<Option<String>> {
    let mut input = String::new();
    loop {
        let Event::Key(key) = event::read().context("Cannot read password")? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Ok(None),
            KeyCode::Char('c') if ctrl => return Ok(None),
            KeyCode::Enter => return Ok(Some(input)),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) if !ctrl => input.push(c),
            _ => {}
        }
    }
}

/// Terminal raw mode, restored on drop
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

struct App {
    auth: AuthFlow,
    api: FinanceApi,
    format: OutputFormat,
    config: Config,
}

impl App {
    async fn dispatch(
        &self,
        command: Commands,
        events: &mut broadcast::Receiver<SessionEvent>,
    ) -> Result<()> {
        match command {
            Commands::Login { email, password } => self.login(&email, password).await,
            Commands::Logout => {
                self.auth.logout()?;
                println!("Logged out");
                Ok(())
            }
            Commands::Whoami => self.whoami().await,
            Commands::Profile {
                first_name,
                last_name,
                username,
                avatar,
            } => {
                self.require_login()?;
                let update = ProfileUpdate {
                    first_name,
                    last_name,
                    username,
                    avatar,
                };
                let user = if update.is_empty() {
                    self.auth.refresh_user().await?
                } else {
                    self.auth.update_profile(&update).await?
                };
                self.emit(&user, print_user)
            }
            Commands::Stats => {
                self.require_login()?;
                let stats = self.auth.statistics().await?;
                self.emit(&stats, print_statistics)
            }
            Commands::Dashboard { period } => self.dashboard(period).await,
            Commands::Transactions(args) => self.transactions(args).await,
            Commands::Budgets { alerts } => {
                self.require_login()?;
                if alerts {
                    let alerts = self.api.budget_alerts().await?;
                    self.emit(&alerts, |a| print_alerts(a))
                } else {
                    let overview = self.api.budget_overview().await?;
                    self.emit(&overview, print_budgets)
                }
            }
            Commands::Analytics { months } => {
                self.require_login()?;
                let analytics = self.api.analytics(months).await?;
                self.emit(&analytics, print_analytics)
            }
            Commands::Categories { kind } => {
                self.require_login()?;
                let categories = self.api.categories(kind).await?;
                self.emit(&categories, |c| print_categories(c))
            }
            Commands::Accounts => {
                self.require_login()?;
                let accounts = self.api.accounts().await?;
                self.emit(&accounts, |a| print_accounts(a))
            }
            Commands::Assets => {
                self.require_login()?;
                let assets = self.api.assets().await?;
                self.emit(&assets, |a| print_assets(a))
            }
            Commands::Portfolio => {
                self.require_login()?;
                let portfolio = self.api.portfolio_summary().await?;
                self.emit(&portfolio, print_portfolio)
            }
            Commands::Health => {
                let health = self.api.health().await?;
                self.emit(&health, |h| {
                    let status = h.get("status").and_then(|s| s.as_str()).unwrap_or("unknown");
                    println!("Service status: {}", status);
                })
            }
            Commands::Watch {
                period,
                interval,
                count,
            } => self.watch(period, interval, count, events).await,
            Commands::Config { output } => write_default_config(output.as_deref()),
        }
    }

    fn emit<T: Serialize>(&self, value: &T, table: impl FnOnce(&T)) -> Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Table => table(value),
        }
        Ok(())
    }

    fn require_login(&self) -> Result<()> {
        if !self.auth.is_authenticated() {
            bail!("Not logged in. Run `fintrack login --email <EMAIL>` first.");
        }
        Ok(())
    }

    async fn login(&self, email: &str, password: Option<String>) -> Result<()> {
        let password = match password {
            Some(p) => p,
            None => prompt_password()?,
        };

        let user = self.auth.try_login(email, &password).await?;
        println!("Logged in as {} ({})", user.display_name(), user.email);
        Ok(())
    }

    async fn whoami(&self) -> Result<()> {
        let Some(restored) = self.auth.bootstrap()? else {
            println!("Not logged in");
            return Ok(());
        };

        match restored.revalidation.await? {
            Ok(user) => self.emit(&user, print_user),
            Err(e) => {
                eprintln!(
                    "Stored session for {} is no longer valid",
                    restored.user.email
                );
                Err(e.into())
            }
        }
    }

    async fn dashboard(&self, period: Option<Period>) -> Result<()> {
        self.require_login()?;

        // Widgets load concurrently and fail independently
        let scope = ViewScope::new();
        let stats = scope.spawn({
            let api = self.api.clone();
            async move { api.dashboard_stats(period).await }
        });
        let budgets = scope.spawn({
            let api = self.api.clone();
            async move { api.budget_overview().await }
        });
        let portfolio = scope.spawn({
            let api = self.api.clone();
            async move { api.portfolio_summary().await }
        });

        let (stats, budgets, portfolio) =
            futures_util::future::join3(stats.result(), budgets.result(), portfolio.result())
                .await;
        let (stats, budgets, portfolio) = (widget(stats), widget(budgets), widget(portfolio));

        if needs_login(&stats) || needs_login(&budgets) || needs_login(&portfolio) {
            return Err(ClientError::SessionExpired.into());
        }

        match self.format {
            OutputFormat::Json => {
                let body = json!({
                    "stats": widget_json(&stats),
                    "budgets": widget_json(&budgets),
                    "portfolio": widget_json(&portfolio),
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            }
            OutputFormat::Table => {
                match &stats {
                    Ok(s) => print_stats(period, s),
                    Err(e) => print_widget_error("Dashboard", e),
                }
                println!();
                match &budgets {
                    Ok(b) => print_budget_summary(b),
                    Err(e) => print_widget_error("Budgets", e),
                }
                println!();
                match &portfolio {
                    Ok(p) => print_portfolio(p),
                    Err(e) => print_widget_error("Portfolio", e),
                }
            }
        }
        Ok(())
    }

    async fn transactions(&self, args: TransactionArgs) -> Result<()> {
        self.require_login()?;

        let mut filters = TransactionFilters::new(args.limit);
        filters.set_search(args.search.unwrap_or_default());
        filters.set_start_date(args.from);
        filters.set_end_date(args.to);
        filters.set_sort(args.sort);
        filters.set_page(args.page);

        let mut query = filters.to_query();
        query.category = args.category;
        let mut page = self.api.transactions(&query).await?;

        filters.clamp_to(page.count);
        if filters.page() != query.page {
            tracing::debug!(
                requested = query.page,
                last = filters.page(),
                "Requested page is past the end, showing the last page"
            );
            query.page = filters.page();
            page = self.api.transactions(&query).await?;
        }

        self.emit(&page, |p| print_transactions(p, &filters))
    }

    async fn watch(
        &self,
        period: Option<Period>,
        interval: Option<u64>,
        count: Option<usize>,
        events: &mut broadcast::Receiver<SessionEvent>,
    ) -> Result<()> {
        self.require_login()?;

        let interval = interval
            .map(|secs| Duration::from_secs(secs.max(1)))
            .unwrap_or_else(|| self.config.polling.interval());

        let api = self.api.clone();
        let mut poller = Poller::spawn(interval, move || {
            let api = api.clone();
            async move { api.dashboard_stats(period).await }
        });
        tracing::info!(interval_secs = interval.as_secs(), "Watching dashboard");

        let mut shown = 0usize;
        loop {
            tokio::select! {
                update = poller.next() => {
                    let Some(update) = update else { break };
                    match update {
                        Ok(stats) => self.emit(&stats, |s| print_stats(period, s))?,
                        Err(e) if e.requires_login() => return Err(e.into()),
                        Err(e) => eprintln!("Refresh failed: {} (next attempt in {}s)", e, interval.as_secs()),
                    }

                    shown += 1;
                    if count.is_some_and(|n| shown >= n) {
                        break;
                    }
                    if self.format == OutputFormat::Table {
                        println!();
                    }
                }
                event = events.recv() => {
                    if let Ok(SessionEvent::Expired) = event {
                        return Err(ClientError::SessionExpired.into());
                    }
                }
                _ = tokio::signal::ctrl_c() => break,
            }
        }

        poller.stop();
        Ok(())
    }
}

fn widget<T>(result: Option<ClientResult<T>>) -> ClientResult<T> {
    result.unwrap_or(Err(ClientError::Unavailable))
}

fn needs_login<T>(result: &ClientResult<T>) -> bool {
    matches!(result, Err(e) if e.requires_login())
}

fn widget_json<T: Serialize>(result: &ClientResult<T>) -> serde_json::Value {
    match result {
        Ok(value) => serde_json::to_value(value).unwrap_or(serde_json::Value::Null),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

fn print_widget_error(title: &str, error: &ClientError) {
    println!("{}", title);
    println!("  Unavailable: {}", error);
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

fn print_user(user: &User) {
    println!("{}", user.display_name());
    println!("  Email:        {}", user.email);
    if !user.username.is_empty() {
        println!("  Username:     {}", user.username);
    }
    if !user.date_joined.is_empty() {
        println!("  Member since: {}", user.date_joined);
    }
    println!(
        "  Plan:         {}",
        if user.is_premium { "Premium" } else { "Free" }
    );
}

fn print_statistics(stats: &UserStatistics) {
    println!(
        "Member since {} ({} days)",
        stats.user_info.member_since, stats.user_info.member_since_days
    );
    println!(
        "  Accounts:     {} ({})",
        stats.accounts.total_accounts,
        format_currency(stats.accounts.total_balance)
    );
    println!(
        "  Assets:       {} ({})",
        stats.assets.total_assets,
        format_currency(stats.assets.total_value)
    );
    println!(
        "  Transactions: {} total, {} this month",
        stats.transactions.total_transactions, stats.transactions.this_month_transactions
    );
    if let Some(first) = &stats.transactions.first_transaction_date {
        println!("  First recorded: {}", first);
    }
    println!(
        "  Average: {:.1} transactions/month",
        stats.activity.avg_transactions_per_month
    );
    println!("  Wealth:  {}", format_currency(stats.activity.wealth_total));
}

fn print_stats(period: Option<Period>, stats: &DashboardStats) {
    let current = &stats.current;
    match period {
        Some(p) => println!("Dashboard ({})", p),
        None => println!("Dashboard"),
    }

    let rows = [
        ("Total wealth", current.total_wealth, current.wealth_change),
        ("Income", current.income, current.income_change),
        ("Expenses", current.expenses, current.expenses_change),
        ("Savings", current.savings, current.savings_change),
    ];
    for (label, value, change) in rows {
        println!(
            "  {:<14} {:>14} {:>8}",
            label,
            format_currency(value),
            format_change(change).text
        );
    }
    println!("  {:<14} {:>14}", "Transactions", current.transactions_count);

    if !stats.wealth_evolution.is_empty() {
        println!();
        println!("Wealth evolution");
        for point in &stats.wealth_evolution {
            println!("  {}", tooltip(&point.month, point.wealth));
        }
    }

    if !stats.wealth_composition.is_empty() {
        println!();
        println!("Composition");
        for slice in &stats.wealth_composition {
            println!("  {}", tooltip(&slice.name, slice.size));
        }
    }
}

fn print_transactions(page: &Page<Transaction>, filters: &TransactionFilters) {
    if page.results.is_empty() {
        println!("No transactions found");
        return;
    }

    println!(
        "{:<12} {:<32} {:<16} {:>14}",
        "Date", "Description", "Category", "Amount"
    );
    println!("{}", "-".repeat(77));
    for tx in &page.results {
        println!(
            "{:<12} {:<32} {:<16} {:>14}",
            format_date(tx.date),
            truncate(&tx.description, 32),
            truncate(&tx.category.name, 16),
            signed_amount(tx.amount, tx.category.kind).text
        );
    }
    println!();
    println!(
        "Page {} of {} ({} transactions)",
        filters.page(),
        page.total_pages(filters.page_size()),
        page.count
    );
}

fn print_budget_summary(overview: &BudgetOverview) {
    let summary = &overview.summary;
    println!("Budgets");
    println!("  Allocated: {}", format_currency(summary.total_allocated));
    println!(
        "  Spent:     {} ({:.0}%)",
        format_currency(summary.total_spent),
        summary.overall_percentage
    );
    println!("  Remaining: {}", format_currency(summary.total_remaining));
    if summary.over_budget_count > 0 {
        println!(
            "  {} of {} budgets exceeded",
            summary.over_budget_count, summary.budget_count
        );
    }
}

fn print_budgets(overview: &BudgetOverview) {
    print_budget_summary(overview);
    if overview.budgets.is_empty() {
        return;
    }

    println!();
    println!(
        "{:<18} {:>22} {:>6} {:<10} {}",
        "Category", "Spent / Allocated", "%", "Status", "Remaining"
    );
    println!("{}", "-".repeat(80));
    for budget in &overview.budgets {
        println!(
            "{:<18} {:>22} {:>5.0}% {:<10} {} ({} days left)",
            truncate(&budget.category.name, 18),
            format!(
                "{} / {}",
                format_currency(budget.spent),
                format_currency(budget.allocated)
            ),
            budget.percentage,
            budget.status,
            budget_message(budget.spent, budget.allocated).text,
            budget.days_left
        );
    }
}

fn print_alerts(alerts: &[BudgetAlert]) {
    if alerts.is_empty() {
        println!("No budget alerts");
        return;
    }
    for alert in alerts {
        match &alert.message {
            Some(message) => println!("! {}", message),
            None => println!("! {}", serde_json::Value::Object(alert.details.clone())),
        }
    }
}

fn print_analytics(analytics: &Analytics) {
    println!(
        "{:<10} {:>14} {:>14} {:>14}",
        "Month", "Income", "Expenses", "Net"
    );
    println!("{}", "-".repeat(55));
    for month in &analytics.monthly_data {
        println!(
            "{:<10} {:>14} {:>14} {:>14}",
            month.month,
            format_currency(month.income),
            format_currency(month.expenses),
            format_currency(month.net())
        );
    }

    let insights = &analytics.insights;
    println!();
    println!("Over {} months", insights.period_months);
    println!("  Savings rate:        {:.1}%", insights.savings_rate);
    println!(
        "  Avg monthly savings: {}",
        format_currency(insights.avg_monthly_savings)
    );
    if let Some(biggest) = &insights.biggest_expense {
        println!(
            "  Biggest expense:     {} - {} ({}, {})",
            format_currency(biggest.amount),
            biggest.description,
            biggest.category,
            biggest.date
        );
    }

    for trend in &analytics.category_trends {
        let total: f64 = trend.data.iter().map(|p| p.amount).sum();
        println!("  {}", tooltip(&trend.category, total));
    }
}

fn print_categories(categories: &[Category]) {
    if categories.is_empty() {
        println!("No categories");
        return;
    }
    println!("{:<6} {:<24} {}", "ID", "Name", "Type");
    println!("{}", "-".repeat(40));
    for category in categories {
        println!("{:<6} {:<24} {}", category.id, category.name, category.kind);
    }
}

fn print_accounts(accounts: &[Account]) {
    if accounts.is_empty() {
        println!("No accounts");
        return;
    }
    println!("{:<6} {:<24} {:<12} {:>14}", "ID", "Name", "Type", "Balance");
    println!("{}", "-".repeat(59));
    for account in accounts {
        println!(
            "{:<6} {:<24} {:<12} {:>14}",
            account.id,
            truncate(&account.name, 24),
            account.kind,
            format_currency(account.balance)
        );
    }
}

fn print_assets(assets: &[Asset]) {
    if assets.is_empty() {
        println!("No assets");
        return;
    }
    println!("{:<6} {:<24} {:<12} {:>14}", "ID", "Name", "Type", "Value");
    println!("{}", "-".repeat(59));
    for asset in assets {
        println!(
            "{:<6} {:<24} {:<12} {:>14}",
            asset.id,
            truncate(&asset.name, 24),
            asset.kind,
            format_currency(asset.value)
        );
    }
}

fn print_portfolio(portfolio: &PortfolioSummary) {
    println!(
        "Portfolio: {} across {} assets",
        format_currency(portfolio.total_value),
        portfolio.asset_count
    );
    for slice in &portfolio.composition {
        println!(
            "  {:<16} {:>14} {:>6.1}%  ({})",
            slice.name,
            format_currency(slice.value),
            slice.percentage,
            slice.count
        );
    }
}
