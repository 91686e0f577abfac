use analyzer::{LeaderboardRow, RankingKey, RankingQuery, SortDirection};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use configuration::{LoggingSettings, OutputFormat};
use core_types::{MetricsRecord, Window};
use engine::{ArenaEngine, NormalizedCurve};
use serde::Serialize;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the Quant Arena command line.
fn main() -> Result<()> {
    // A missing .env file is fine; ARENA__* overrides may come from the shell.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = configuration::load_config_from(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    if let Some(dir) = &cli.data_dir {
        config.data.directory = dir.clone();
    }
    let _guard = init_tracing(&config.logging)?;

    let format = if cli.json { OutputFormat::Json } else { cli.format };
    let engine = ArenaEngine::load(config).context("Failed to load the arena documents")?;

    match cli.command {
        Commands::Leaderboard(args) => handle_leaderboard(&engine, args, format),
        Commands::Metrics(args) => handle_metrics(&engine, args, format),
        Commands::Series(args) => handle_series(&engine, args, format),
        Commands::Rolling(args) => handle_rolling(&engine, args, format),
        Commands::Correlation(args) => handle_correlation(&engine, args, format),
        Commands::Portfolio(args) => handle_portfolio(&engine, args, format),
        Commands::RiskParity(args) => handle_risk_parity(&engine, args, format),
        Commands::Compare(args) => handle_compare(&engine, args, format),
        Commands::Top(args) => handle_top(&engine, args, format),
        Commands::Strategies(args) => handle_strategies(&engine, args, format),
        Commands::Changelog(args) => handle_changelog(&engine, args, format),
    }
}

/// Logs go to stderr, or to a daily rolling file when a directory is configured.
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingSettings) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .context("Invalid logging.level directive")?;

    match &logging.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "arena.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(Some(guard))
        }
        None => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(None)
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Deterministic strategy analytics: leaderboards, metrics, correlation and portfolios.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file.
    #[arg(long, global = true, default_value = configuration::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Overrides `data.directory` from the configuration.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Shorthand for `--format json`.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the strategies trading an instrument.
    Leaderboard(LeaderboardArgs),
    /// The full metrics record of one strategy.
    Metrics(SeriesArgs),
    /// The windowed price series of one strategy.
    Series(SeriesOutputArgs),
    /// Trailing-window sharpe, volatility and beta.
    Rolling(RollingArgs),
    /// Pairwise return correlation of several strategies.
    Correlation(GroupArgs),
    /// Blend several strategies into one portfolio.
    Portfolio(PortfolioArgs),
    /// Inverse-volatility weights for several strategies.
    RiskParity(GroupArgs),
    /// One strategy across several instruments, rebased to 1.
    Compare(CompareArgs),
    /// Rebased curves of the best strategies on an instrument.
    Top(TopArgs),
    /// Search the strategy catalog.
    Strategies(StrategiesArgs),
    /// Show the latest changelog entries.
    Changelog(ChangelogArgs),
}

#[derive(Parser)]
struct LeaderboardArgs {
    /// Defaults to the first instrument of the dataset.
    #[arg(long)]
    instrument: Option<String>,
    /// 1M, 3M, 6M, 1Y, 3Y, 5Y or Max. Defaults to `leaderboard.default_window`.
    #[arg(long)]
    window: Option<Window>,
    /// Metric to rank by (score, totalReturn, cagr, sharpe, sortino, calmar,
    /// maxDrawdown, volatility, winRate, profitFactor, ulcer).
    #[arg(long, default_value = "score")]
    sort: RankingKey,
    /// asc or desc.
    #[arg(long, default_value = "desc")]
    dir: SortDirection,
    /// Drop strategies below the configured minimum trade count.
    #[arg(long)]
    threshold: bool,
    /// Number of rows. Defaults to `leaderboard.top`.
    #[arg(long)]
    top: Option<usize>,
}

#[derive(Parser)]
struct SeriesArgs {
    /// The strategy id, e.g. "S001".
    strategy: String,
    /// Defaults to the strategy's first instrument.
    #[arg(long)]
    instrument: Option<String>,
    #[arg(long)]
    window: Option<Window>,
}

#[derive(Parser)]
struct SeriesOutputArgs {
    #[command(flatten)]
    series: SeriesArgs,
    /// Rebase the strategy values to start at 1.
    #[arg(long)]
    normalize: bool,
    /// Rows shown in table output.
    #[arg(long, default_value_t = 20)]
    last: usize,
}

#[derive(Parser)]
struct RollingArgs {
    #[command(flatten)]
    series: SeriesArgs,
    /// Trailing window in returns. Defaults to `rolling.window`.
    #[arg(long)]
    length: Option<usize>,
    /// Rows shown in table output.
    #[arg(long, default_value_t = 20)]
    last: usize,
}

#[derive(Parser)]
struct GroupArgs {
    /// Comma-separated strategy ids.
    #[arg(long, value_delimiter = ',', required = true)]
    strategies: Vec<String>,
    #[arg(long)]
    instrument: Option<String>,
    #[arg(long)]
    window: Option<Window>,
}

#[derive(Parser)]
struct PortfolioArgs {
    #[command(flatten)]
    group: GroupArgs,
    /// Comma-separated raw weights, parallel to the strategies.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    weights: Vec<f64>,
}

#[derive(Parser)]
struct CompareArgs {
    strategy: String,
    /// Comma-separated instruments. Defaults to the strategy's recommended list.
    #[arg(long, value_delimiter = ',')]
    instruments: Vec<String>,
    #[arg(long)]
    window: Option<Window>,
}

#[derive(Parser)]
struct TopArgs {
    #[arg(long)]
    instrument: Option<String>,
    #[arg(long)]
    window: Option<Window>,
    #[arg(long, default_value_t = 10)]
    count: usize,
}

#[derive(Parser)]
struct StrategiesArgs {
    /// Case-insensitive match on name or id.
    #[arg(long, default_value = "")]
    query: String,
    /// Comma-separated tags; all must be present.
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,
    /// List every tag in the catalog instead.
    #[arg(long)]
    list_tags: bool,
}

#[derive(Parser)]
struct ChangelogArgs {
    #[arg(long, default_value_t = 5)]
    limit: usize,
}

// ==============================================================================
// Command Handlers
// ==============================================================================

fn handle_leaderboard(
    engine: &ArenaEngine,
    args: LeaderboardArgs,
    format: OutputFormat,
) -> Result<()> {
    let instrument = args
        .instrument
        .unwrap_or_else(|| engine.default_instrument().to_string());
    let window = args.window.unwrap_or_else(|| engine.default_window());
    let query = RankingQuery {
        key: args.sort,
        direction: args.dir,
        apply_threshold: args.threshold,
        top: args.top,
    };

    let rows = engine.ranked_leaderboard(&instrument, window, &query);
    tracing::info!(%instrument, window = %window, rows = rows.len(), "Leaderboard built.");

    if format == OutputFormat::Json {
        return print_json(&rows);
    }
    println!("{}", leaderboard_table(&rows));
    Ok(())
}

fn handle_metrics(engine: &ArenaEngine, args: SeriesArgs, format: OutputFormat) -> Result<()> {
    let (instrument, window) = resolve_series_args(engine, &args)?;
    let metrics = engine.get_metrics_for(&args.strategy, &instrument, window);

    if format == OutputFormat::Json {
        return print_json(&metrics);
    }
    println!("{} on {} ({})", args.strategy, instrument, window);
    println!("{}", metrics_table(&metrics));
    Ok(())
}

fn handle_series(engine: &ArenaEngine, args: SeriesOutputArgs, format: OutputFormat) -> Result<()> {
    let (instrument, window) = resolve_series_args(engine, &args.series)?;
    let full = engine.get_series(&args.series.strategy, &instrument);
    let mut series = engine.slice_series(&full, window);
    if args.normalize {
        series.strategy_values = engine::normalize_values(&series.strategy_values);
    }

    if format == OutputFormat::Json {
        return print_json(&series);
    }
    let mut table = new_table(vec!["Date", "Strategy", "Benchmark"]);
    let tail = series.tail(args.last);
    let rows = tail
        .dates
        .iter()
        .zip(&tail.strategy_values)
        .zip(&tail.benchmark_values);
    for ((date, s), b) in rows {
        table.add_row(vec![date.to_string(), format!("{s:.4}"), format!("{b:.4}")]);
    }
    println!("{table}");
    Ok(())
}

fn handle_rolling(engine: &ArenaEngine, args: RollingArgs, format: OutputFormat) -> Result<()> {
    let (instrument, window) = resolve_series_args(engine, &args.series)?;
    let rolling = engine.rolling_metrics(&args.series.strategy, &instrument, window, args.length);

    if format == OutputFormat::Json {
        return print_json(&rolling);
    }
    let mut table = new_table(vec!["Date", "Sharpe", "Volatility", "Beta"]);
    let start = rolling.len().saturating_sub(args.last);
    for i in start..rolling.len() {
        table.add_row(vec![
            rolling.labels[i].to_string(),
            optional(rolling.sharpe[i], number),
            optional(rolling.volatility[i], percent),
            optional(rolling.beta[i], number),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn handle_correlation(engine: &ArenaEngine, args: GroupArgs, format: OutputFormat) -> Result<()> {
    let (instrument, window) = resolve_group_args(engine, &args);
    let matrix = engine.correlation_matrix(&args.strategies, &instrument, window);

    if format == OutputFormat::Json {
        return print_json(&matrix);
    }
    let mut header = vec![String::new()];
    header.extend(matrix.ids.iter().cloned());
    let mut table = new_table(header);
    for (i, id) in matrix.ids.iter().enumerate() {
        let mut row = vec![id.clone()];
        row.extend((0..matrix.ids.len()).map(|j| optional(matrix.get(i, j), number)));
        table.add_row(row);
    }
    println!("{table}");
    Ok(())
}

fn handle_portfolio(engine: &ArenaEngine, args: PortfolioArgs, format: OutputFormat) -> Result<()> {
    let (instrument, window) = resolve_group_args(engine, &args.group);
    let result = engine.blend_portfolio(&args.group.strategies, &args.weights, &instrument, window);

    if format == OutputFormat::Json {
        return print_json(&result);
    }
    let mut weights = new_table(vec!["Strategy", "Weight"]);
    for (id, w) in args.group.strategies.iter().zip(&result.weights) {
        weights.add_row(vec![id.clone(), percent(*w)]);
    }
    println!("{weights}");
    println!("Total raw weight: {}", number(result.total_weight));

    match &result.metrics {
        Some(metrics) => println!("{}", metrics_table(metrics)),
        None => println!("Not enough overlapping history to blend."),
    }
    Ok(())
}

fn handle_risk_parity(engine: &ArenaEngine, args: GroupArgs, format: OutputFormat) -> Result<()> {
    let (instrument, window) = resolve_group_args(engine, &args);
    let weights = engine.risk_parity_weights(&args.strategies, &instrument, window);

    #[derive(Serialize)]
    struct Allocation<'a> {
        strategy: &'a str,
        weight: rust_decimal::Decimal,
    }
    let allocations: Vec<Allocation> = args
        .strategies
        .iter()
        .zip(weights)
        .map(|(id, weight)| Allocation {
            strategy: id,
            weight,
        })
        .collect();

    if format == OutputFormat::Json {
        return print_json(&allocations);
    }
    let mut table = new_table(vec!["Strategy", "Weight %"]);
    for a in &allocations {
        table.add_row(vec![a.strategy.to_string(), a.weight.to_string()]);
    }
    println!("{table}");
    Ok(())
}

fn handle_compare(engine: &ArenaEngine, args: CompareArgs, format: OutputFormat) -> Result<()> {
    let window = args.window.unwrap_or_else(|| engine.default_window());
    let curves = engine.compare_instruments(&args.strategy, &args.instruments, window)?;
    print_curves(&curves, format)
}

fn handle_top(engine: &ArenaEngine, args: TopArgs, format: OutputFormat) -> Result<()> {
    let instrument = args
        .instrument
        .unwrap_or_else(|| engine.default_instrument().to_string());
    let window = args.window.unwrap_or_else(|| engine.default_window());
    let curves = engine.top_curves(&instrument, window, args.count);
    print_curves(&curves, format)
}

fn handle_strategies(
    engine: &ArenaEngine,
    args: StrategiesArgs,
    format: OutputFormat,
) -> Result<()> {
    if args.list_tags {
        let tags = engine.unique_tags();
        if format == OutputFormat::Json {
            return print_json(&tags);
        }
        println!("{}", tags.join(", "));
        return Ok(());
    }

    let hits = engine.search_strategies(&args.query, &args.tags);
    if format == OutputFormat::Json {
        return print_json(&hits);
    }
    let mut table = new_table(vec!["Id", "Name", "Tags", "Instruments", "Best on"]);
    for s in hits {
        table.add_row(vec![
            s.id.clone(),
            s.name.clone(),
            s.tags.join(", "),
            s.instruments.join(", "),
            s.best_on.clone(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn handle_changelog(engine: &ArenaEngine, args: ChangelogArgs, format: OutputFormat) -> Result<()> {
    let entries = engine.changelog(Some(args.limit));
    if format == OutputFormat::Json {
        return print_json(&entries);
    }
    let mut table = new_table(vec!["Date", "Title", "Details", "Strategy"]);
    for e in entries {
        table.add_row(vec![
            e.date.to_string(),
            e.title.clone(),
            e.details.clone(),
            e.strategy_id.clone().unwrap_or_default(),
        ]);
    }
    println!("{table}");
    Ok(())
}

// ==============================================================================
// Helpers
// ==============================================================================

/// Instrument defaults to the strategy's first listed one, then the dataset default.
fn resolve_series_args(engine: &ArenaEngine, args: &SeriesArgs) -> Result<(String, Window)> {
    let strategy = engine.strategy(&args.strategy)?;
    let instrument = args
        .instrument
        .clone()
        .or_else(|| strategy.instruments.first().cloned())
        .unwrap_or_else(|| engine.default_instrument().to_string());
    let window = args.window.unwrap_or_else(|| engine.default_window());
    Ok((instrument, window))
}

fn resolve_group_args(engine: &ArenaEngine, args: &GroupArgs) -> (String, Window) {
    let instrument = args
        .instrument
        .clone()
        .unwrap_or_else(|| engine.default_instrument().to_string());
    (instrument, args.window.unwrap_or_else(|| engine.default_window()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_curves(curves: &[NormalizedCurve], format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(curves);
    }
    let mut table = new_table(vec!["Curve", "Start", "End", "Points", "Final"]);
    for c in curves {
        table.add_row(vec![
            c.label.clone(),
            c.dates.first().map(ToString::to_string).unwrap_or_default(),
            c.dates.last().map(ToString::to_string).unwrap_or_default(),
            c.values.len().to_string(),
            c.values.last().map(|v| number(*v)).unwrap_or_default(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn new_table<T: Into<comfy_table::Row>>(header: T) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn leaderboard_table(rows: &[LeaderboardRow]) -> Table {
    let mut table = new_table(vec![
        "Rank", "Id", "Strategy", "Score", "Total Return", "CAGR", "Sharpe", "Max DD", "Trades",
    ]);
    for (i, row) in rows.iter().enumerate() {
        let m = &row.metrics;
        table.add_row(vec![
            (i + 1).to_string(),
            row.strategy.id.clone(),
            row.strategy.name.clone(),
            format!("{:.1}", m.arena_score),
            percent(m.total_return),
            percent(m.cagr),
            number(m.sharpe),
            percent(m.max_drawdown),
            m.trades.to_string(),
        ]);
    }
    table
}

fn metrics_table(m: &MetricsRecord) -> Table {
    let mut table = new_table(vec!["Metric", "Value"]);
    let rows = [
        ("Arena Score", format!("{:.1}", m.arena_score)),
        ("Total Return", percent(m.total_return)),
        ("CAGR", percent(m.cagr)),
        ("Sharpe", number(m.sharpe)),
        ("Sortino", number(m.sortino)),
        ("Calmar", number(m.calmar)),
        ("Max Drawdown", percent(m.max_drawdown)),
        ("Volatility", percent(m.volatility)),
        ("Best Month", percent(m.best_month)),
        ("Worst Month", percent(m.worst_month)),
        ("Ulcer", number(m.ulcer)),
        ("Win Rate", percent(m.win_rate)),
        ("Profit Factor", number(m.profit_factor)),
        ("Trades", m.trades.to_string()),
        ("Turnover", number(m.turnover)),
    ];
    for (label, value) in rows {
        table.add_row(vec![label.to_string(), value]);
    }
    table
}

fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn number(value: f64) -> String {
    format!("{value:.2}")
}

fn optional(value: Option<f64>, render: fn(f64) -> String) -> String {
    value.map(render).unwrap_or_else(|| "-".to_string())
}
