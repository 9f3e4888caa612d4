use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, TimeZone, Utc};
use clap::Parser;
use dotenv::dotenv;
use std::time::Duration;

use cryptoprice::{Client, ClientConfig, PriceError, Result};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Currency to convert from
    #[arg(long, default_value = "BTC")]
    from: String,

    /// Currency to convert to
    #[arg(long, default_value = "USD")]
    to: String,

    /// Time for the price lookup: RFC 3339, "YYYY-MM-DDTHH:MM:SS" (local),
    /// "HH:MM[:SS]" (today, local) or unix seconds. Defaults to now.
    #[arg(long)]
    datetime: Option<String>,

    /// Exchange to use for data (default: aggregated average)
    #[arg(long)]
    exchange: Option<String>,

    /// Only use direct trading pairs, never synthetic conversions
    #[arg(long)]
    direct_pair_only: bool,

    /// Timeout in seconds for the HTTP request
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Enable debug output
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    dotenv().ok();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let when = match &args.datetime {
        Some(s) => parse_datetime(s)?,
        None => Utc::now(),
    };

    let mut config =
        ClientConfig::from_env(&args.from.to_uppercase(), &args.to.to_uppercase())?;
    if let Some(exchange) = args.exchange {
        config.exchange = Some(exchange);
    }
    if args.direct_pair_only {
        config.direct_pair_only = true;
    }
    if let Some(secs) = args.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }

    if args.debug {
        eprintln!("from     {}", config.from_symbol);
        eprintln!("to       {}", config.to_symbol);
        eprintln!("datetime {}", when);
    }

    let client = Client::new(config)?;
    let price = client.price_at(when).await?;
    println!("{price}");
    Ok(())
}

/// Parses the `--datetime` flag, trying formats from most to least specific.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return local_to_utc(naive, s);
    }
    for fmt in ["%H:%M:%S", "%H:%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(s, fmt) {
            let today = Local::now().date_naive();
            return local_to_utc(today.and_time(time), s);
        }
    }
    if let Ok(unix) = s.parse::<i64>() {
        if let Some(dt) = DateTime::from_timestamp(unix, 0) {
            return Ok(dt);
        }
    }
    Err(PriceError::Config(format!("unrecognized datetime: {s}")))
}

fn local_to_utc(naive: NaiveDateTime, original: &str) -> Result<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| PriceError::Config(format!("ambiguous local datetime: {original}")))
}
