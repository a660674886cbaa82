use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use income_explorer::view::{FilterForm, FormField};
use income_explorer::{IncomeExplorer, SortKey, SortOrder, SortSpec};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fetch, filter and sort a company's annual income statements.
///
/// The API key is read from FMP_API_KEY; set INCOME_BACKEND_URL (or pass
/// --backend-url) to filter through a proxy backend instead.
#[derive(Parser, Debug)]
#[command(name = "income-explorer", version)]
struct Cli {
    /// Ticker symbol
    #[arg(long)]
    symbol: Option<String>,

    /// Reporting period (annual or quarter)
    #[arg(long)]
    period: Option<String>,

    /// Proxy backend base URL; filtering then happens server side
    #[arg(long)]
    backend_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    #[arg(long)]
    start_year: Option<String>,
    #[arg(long)]
    end_year: Option<String>,
    #[arg(long)]
    revenue_min: Option<String>,
    #[arg(long)]
    revenue_max: Option<String>,
    #[arg(long)]
    net_income_min: Option<String>,
    #[arg(long)]
    net_income_max: Option<String>,

    /// Sort column: date, revenue or netIncome
    #[arg(long, default_value = "date")]
    sort: SortKey,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut builder = IncomeExplorer::builder().from_env();
    if let Some(symbol) = &cli.symbol {
        builder = builder.symbol(symbol);
    }
    if let Some(period) = &cli.period {
        builder = builder.period(period);
    }
    if let Some(url) = &cli.backend_url {
        builder = builder.backend_url(url);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let mut explorer = builder.build().context("failed to configure data source")?;

    let mut form = FilterForm::new();
    let inputs = [
        (FormField::StartYear, &cli.start_year),
        (FormField::EndYear, &cli.end_year),
        (FormField::RevenueMin, &cli.revenue_min),
        (FormField::RevenueMax, &cli.revenue_max),
        (FormField::NetIncomeMin, &cli.net_income_min),
        (FormField::NetIncomeMax, &cli.net_income_max),
    ];
    for (field, value) in inputs {
        if let Some(v) = value {
            form.set(field, v.as_str());
        }
    }
    let filter = form.submit()?;

    info!(symbol = %explorer.config().symbol, "loading income statements");
    explorer.load_with_filter(filter);
    if let Some(err) = explorer.errors().first() {
        bail!("{}", err.message);
    }

    let order = if cli.desc {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };
    let state = explorer.set_sort(SortSpec::new(cli.sort, order));

    match cli.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(state.visible())?),
        Format::Table => println!("{}", explorer.table().render()),
    }
    Ok(())
}
